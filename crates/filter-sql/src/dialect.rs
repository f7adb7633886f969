//! Defines the `Dialect` trait for database-specific SQL syntax.

use filter_core::{CollectionEncoding, FieldType};

pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;

    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - PostgreSQL and SQLite use double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for the zero-based parameter `index`.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL and SQLite use `?`
    fn get_placeholder(&self, index: usize) -> String;

    /// Boolean literal usable as a stand-alone predicate.
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    /// Predicate testing that a boolean column is set.
    fn boolean_check(&self, column: &str) -> String {
        format!("{column} = TRUE")
    }

    /// Membership of `element` in a serialized collection `column`.
    ///
    /// `element` is already-rendered SQL of type `element_type` and must
    /// appear exactly once in the result so positional placeholders stay in
    /// order. Only whole elements match; nothing in `element` may act as a
    /// wildcard.
    fn element_in(
        &self,
        _encoding: CollectionEncoding,
        _element: &str,
        _element_type: FieldType,
        _column: &str,
    ) -> Option<String> {
        None
    }

    /// Substring match of `column` against a bound LIKE `pattern` that uses
    /// `!` as its escape character.
    fn contains(&self, _column: &str, _pattern: &str) -> Option<String> {
        None
    }

    /// Number of elements in a serialized collection.
    fn collection_length(&self, _encoding: CollectionEncoding, _column: &str) -> Option<String> {
        None
    }

    /// Length of a string expression in characters.
    fn string_length(&self, _expr: &str) -> Option<String> {
        None
    }
}

/// Renders `value` as a single-quoted SQL string literal.
fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn like_contains(column: &str, pattern: &str) -> String {
    format!("{column} LIKE {pattern} ESCAPE '!'")
}

fn postgres_type(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Bool => "boolean",
        FieldType::Int | FieldType::Timestamp => "bigint",
        FieldType::Float => "double precision",
        FieldType::String | FieldType::Enum | FieldType::List => "text",
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> String {
        "PostgreSQL".into()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn get_placeholder(&self, index: usize) -> String {
        // PostgreSQL uses $1, $2, etc.
        format!("${}", index + 1)
    }

    fn element_in(
        &self,
        encoding: CollectionEncoding,
        element: &str,
        element_type: FieldType,
        column: &str,
    ) -> Option<String> {
        // Untyped parameters cannot reach polymorphic functions.
        let ty = postgres_type(element_type);
        Some(match encoding {
            CollectionEncoding::JsonArray => {
                format!("{column}::jsonb @> jsonb_build_array(CAST({element} AS {ty}))")
            }
            CollectionEncoding::Delimited { separator } => {
                let sep = string_literal(&separator.to_string());
                let element = match ty {
                    "text" => format!("CAST({element} AS text)"),
                    _ => format!("CAST({element} AS {ty})::text"),
                };
                format!("POSITION(({sep} || {element} || {sep}) IN ({sep} || {column} || {sep})) > 0")
            }
        })
    }

    fn contains(&self, column: &str, pattern: &str) -> Option<String> {
        Some(like_contains(column, pattern))
    }

    fn collection_length(&self, encoding: CollectionEncoding, column: &str) -> Option<String> {
        match encoding {
            CollectionEncoding::JsonArray => Some(format!("jsonb_array_length({column}::jsonb)")),
            CollectionEncoding::Delimited { .. } => None,
        }
    }

    fn string_length(&self, expr: &str) -> Option<String> {
        Some(format!("CHAR_LENGTH({expr})"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> String {
        "MySQL".into()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn get_placeholder(&self, _index: usize) -> String {
        // MySQL uses ?
        "?".into()
    }

    fn element_in(
        &self,
        encoding: CollectionEncoding,
        element: &str,
        _element_type: FieldType,
        column: &str,
    ) -> Option<String> {
        Some(match encoding {
            CollectionEncoding::JsonArray => format!("JSON_CONTAINS({column}, JSON_ARRAY({element}))"),
            CollectionEncoding::Delimited { separator } => {
                let sep = string_literal(&separator.to_string());
                format!("LOCATE(CONCAT({sep}, {element}, {sep}), CONCAT({sep}, {column}, {sep})) > 0")
            }
        })
    }

    fn contains(&self, column: &str, pattern: &str) -> Option<String> {
        Some(like_contains(column, pattern))
    }

    fn collection_length(&self, encoding: CollectionEncoding, column: &str) -> Option<String> {
        match encoding {
            CollectionEncoding::JsonArray => Some(format!("JSON_LENGTH({column})")),
            CollectionEncoding::Delimited { .. } => None,
        }
    }

    fn string_length(&self, expr: &str) -> Option<String> {
        Some(format!("CHAR_LENGTH({expr})"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> String {
        "SQLite".into()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn boolean_check(&self, column: &str) -> String {
        format!("{column} <> 0")
    }

    fn element_in(
        &self,
        encoding: CollectionEncoding,
        element: &str,
        _element_type: FieldType,
        column: &str,
    ) -> Option<String> {
        Some(match encoding {
            CollectionEncoding::JsonArray => {
                format!("{element} IN (SELECT value FROM json_each({column}))")
            }
            CollectionEncoding::Delimited { separator } => {
                let sep = string_literal(&separator.to_string());
                format!("instr({sep} || {column} || {sep}, {sep} || {element} || {sep}) > 0")
            }
        })
    }

    fn contains(&self, column: &str, pattern: &str) -> Option<String> {
        Some(like_contains(column, pattern))
    }

    fn collection_length(&self, encoding: CollectionEncoding, column: &str) -> Option<String> {
        match encoding {
            CollectionEncoding::JsonArray => Some(format!("json_array_length({column})")),
            CollectionEncoding::Delimited { .. } => None,
        }
    }

    fn string_length(&self, expr: &str) -> Option<String> {
        Some(format!("LENGTH({expr})"))
    }
}
