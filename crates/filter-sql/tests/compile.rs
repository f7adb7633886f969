//! End-to-end compilation of memo filters into each SQL dialect.

use filter_core::{
    BuildError, CollectionEncoding, Column, ComparisonOperator, Condition, FieldDef, FieldRef,
    FieldType, Schema, Value, ValueExpr,
};
use filter_sql::{
    Compiler, ConvertContext, Dialect, FilterError, FilterSettings, MySql, Postgres, SqlConverter,
    Sqlite,
};
use filter_syntax::{Expr, symbols};
use tracing_test::traced_test;

const NOW: i64 = 1_700_000_000;

fn fixed_clock() -> i64 {
    NOW
}

fn memo_schema() -> Schema {
    Schema::builder()
        .field(FieldDef::new("pinned", FieldType::Bool).column(Column::qualified("memo", "pinned")))
        .field(
            FieldDef::new("creator_id", FieldType::Int)
                .column(Column::qualified("memo", "creator_id"))
                .allow_ops([ComparisonOperator::Eq, ComparisonOperator::Neq]),
        )
        .field(FieldDef::new("created_ts", FieldType::Timestamp).column(Column::qualified("memo", "created_ts")))
        .field(
            FieldDef::new("visibility", FieldType::Enum)
                .column(Column::qualified("memo", "visibility"))
                .allow_ops([ComparisonOperator::Eq, ComparisonOperator::Neq]),
        )
        .field(
            FieldDef::new("content", FieldType::String)
                .column(Column::qualified("memo", "content"))
                .with_contains(),
        )
        .field(
            FieldDef::new("tags", FieldType::List)
                .column(Column::qualified("memo", "tags"))
                .collection(CollectionEncoding::JsonArray),
        )
        .field(FieldDef::alias("tag", "tags"))
        .field(
            FieldDef::new("labels", FieldType::List)
                .column(Column::qualified("memo", "labels"))
                .collection(CollectionEncoding::Delimited { separator: ',' }),
        )
        .field(FieldDef::alias("vis", "visibility"))
        .build()
        .unwrap()
}

fn compile(dialect: &dyn Dialect, expr: &Expr, offset: usize) -> filter_sql::Result<filter_sql::SqlFragment> {
    let schema = memo_schema();
    Compiler::new(&schema, dialect)
        .with_clock(fixed_clock)
        .compile(expr, offset)
}

#[test]
fn test_top_level_literals() {
    let fragment = compile(&Postgres, &Expr::int(0), 0).unwrap();
    assert_eq!(fragment.sql, "FALSE");
    assert!(fragment.args.is_empty());

    let fragment = compile(&Sqlite, &Expr::int(7), 0).unwrap();
    assert_eq!(fragment.sql, "1");

    let err = compile(&MySql, &Expr::string("x"), 0).unwrap_err();
    assert!(matches!(err, FilterError::Build(BuildError::NonBooleanFilter)));
}

#[test]
fn test_operator_whitelist() {
    for op in ComparisonOperator::ALL {
        let expr = Expr::call(
            match op {
                ComparisonOperator::Eq => symbols::EQUALS,
                ComparisonOperator::Neq => symbols::NOT_EQUALS,
                ComparisonOperator::Lt => symbols::LESS,
                ComparisonOperator::Gt => symbols::GREATER,
                ComparisonOperator::Lte => symbols::LESS_EQUALS,
                ComparisonOperator::Gte => symbols::GREATER_EQUALS,
            },
            vec![Expr::ident("creator_id"), Expr::int(1)],
        );
        let result = compile(&Postgres, &expr, 0);
        if op.is_equality() {
            assert!(result.is_ok(), "{op} should be allowed");
        } else {
            assert!(
                matches!(
                    result,
                    Err(FilterError::Build(BuildError::DisallowedOperator { op: found, .. })) if found == op
                ),
                "{op} should be rejected"
            );
        }
    }
}

#[test]
fn test_in_list_lowering() {
    let expr = Expr::is_in(
        Expr::ident("creator_id"),
        Expr::list(vec![Expr::int(1), Expr::int(2), Expr::int(3)]),
    );
    let expected_args = vec![Value::Int(1), Value::Int(2), Value::Int(3)];

    let fragment = compile(&MySql, &expr, 0).unwrap();
    assert_eq!(fragment.sql, "`memo`.`creator_id` IN (?, ?, ?)");
    assert_eq!(fragment.args, expected_args);

    let fragment = compile(&Postgres, &expr, 0).unwrap();
    assert_eq!(fragment.sql, r#""memo"."creator_id" IN ($1, $2, $3)"#);
    assert_eq!(fragment.args, expected_args);
}

#[test]
fn test_empty_in_list_is_false() {
    let expr = Expr::is_in(Expr::ident("creator_id"), Expr::list(vec![]));
    assert_eq!(compile(&MySql, &expr, 0).unwrap().sql, "FALSE");
    assert_eq!(compile(&Sqlite, &expr, 0).unwrap().sql, "0");
}

#[test]
fn test_numbering_starts_after_offset() {
    let expr = Expr::and(
        Expr::eq(Expr::ident("visibility"), Expr::string("PUBLIC")),
        Expr::contains(Expr::ident("content"), Expr::string("rust")),
    );
    let fragment = compile(&Postgres, &expr, 3).unwrap();
    assert_eq!(
        fragment.sql,
        r#"(("memo"."visibility" = $4) AND "memo"."content" LIKE $5 ESCAPE '!')"#
    );
    assert_eq!(
        fragment.args,
        vec![Value::from("PUBLIC"), Value::from("%rust%")]
    );
}

#[test]
fn test_lowering_is_deterministic() {
    let schema = memo_schema();
    let compiler = Compiler::new(&schema, &Postgres).with_clock(fixed_clock);
    let condition = compiler
        .build(&Expr::or(
            Expr::ident("pinned"),
            Expr::is_in(Expr::string("work"), Expr::ident("tag")),
        ))
        .unwrap();

    let first = compiler.lower(&condition, 1).unwrap();
    let second = compiler.lower(&condition, 1).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.sql,
        r#"("memo"."pinned" = TRUE OR "memo"."tags"::jsonb @> jsonb_build_array(CAST($2 AS text)))"#
    );
}

#[test]
fn test_json_membership_per_dialect() {
    let expr = Expr::is_in(Expr::string("work"), Expr::ident("tags"));
    let cases: [(&dyn Dialect, &str); 3] = [
        (&Sqlite, r#"? IN (SELECT value FROM json_each("memo"."tags"))"#),
        (&MySql, "JSON_CONTAINS(`memo`.`tags`, JSON_ARRAY(?))"),
        (&Postgres, r#""memo"."tags"::jsonb @> jsonb_build_array(CAST($1 AS text))"#),
    ];
    for (dialect, expected) in cases {
        let fragment = compile(dialect, &expr, 0).unwrap();
        assert_eq!(fragment.sql, expected, "{}", dialect.name());
        assert_eq!(fragment.args, vec![Value::from("work")]);
    }
}

#[test]
fn test_delimited_membership_matches_whole_elements() {
    let expr = Expr::is_in(Expr::string("w%"), Expr::ident("labels"));
    let cases: [(&dyn Dialect, &str); 3] = [
        (&Sqlite, r#"instr(',' || "memo"."labels" || ',', ',' || ? || ',') > 0"#),
        (&MySql, "LOCATE(CONCAT(',', ?, ','), CONCAT(',', `memo`.`labels`, ',')) > 0"),
        (
            &Postgres,
            r#"POSITION((',' || CAST($1 AS text) || ',') IN (',' || "memo"."labels" || ',')) > 0"#,
        ),
    ];
    for (dialect, expected) in cases {
        let fragment = compile(dialect, &expr, 0).unwrap();
        assert_eq!(fragment.sql, expected, "{}", dialect.name());
        assert!(!fragment.sql.contains("LIKE"));
        // The element is bound verbatim; `%` carries no wildcard meaning.
        assert_eq!(fragment.args, vec![Value::from("w%")]);
    }
}

#[test]
fn test_null_membership_is_a_client_error() {
    let err = compile(&Postgres, &Expr::is_in(Expr::null(), Expr::ident("tags")), 0).unwrap_err();
    assert!(err.is_client_error());
    assert!(matches!(err, FilterError::Build(BuildError::NullMembership(_))));
}

#[test]
fn test_alias_inherits_operator_whitelist() {
    let fragment = compile(&MySql, &Expr::ne(Expr::ident("vis"), Expr::string("PRIVATE")), 0).unwrap();
    assert_eq!(fragment.sql, "(`memo`.`visibility` != ?)");

    let err = compile(&MySql, &Expr::lt(Expr::ident("vis"), Expr::string("X")), 0).unwrap_err();
    assert!(matches!(
        err,
        FilterError::Build(BuildError::DisallowedOperator { op: ComparisonOperator::Lt, ref field }) if field == "vis"
    ));
}

#[test]
fn test_dual_subquery_composition() {
    let schema = memo_schema();
    let compiler = Compiler::new(&schema, &MySql).with_clock(fixed_clock);
    let condition = compiler
        .build(&Expr::eq(Expr::ident("visibility"), Expr::string("PUBLIC")))
        .unwrap();

    let converter = SqlConverter::new(&MySql);
    let mut memo_ctx = ConvertContext::new();
    let mut related_ctx = ConvertContext::new();
    converter.convert(&mut memo_ctx, &condition).unwrap();
    converter.convert(&mut related_ctx, &condition).unwrap();
    assert_eq!(memo_ctx.sql(), related_ctx.sql());
    assert_eq!(memo_ctx.args, related_ctx.args);

    let mut clause = compiler.where_clause();
    clause
        .push_condition_with(&condition, |sql| {
            format!("`memo_id` IN (SELECT `id` FROM `memo` WHERE {sql})")
        })
        .unwrap()
        .push_condition_with(&condition, |sql| {
            format!("`related_memo_id` IN (SELECT `id` FROM `memo` WHERE {sql})")
        })
        .unwrap();
    let fragment = clause.finish().unwrap();
    assert_eq!(fragment.args, vec![Value::from("PUBLIC"), Value::from("PUBLIC")]);
    assert_eq!(fragment.sql.matches('?').count(), fragment.args.len());
}

#[test]
fn test_contains_rejected_before_lowering() {
    let err = compile(&Sqlite, &Expr::contains(Expr::ident("visibility"), Expr::string("PUB")), 0).unwrap_err();
    assert!(err.is_client_error());
    assert!(matches!(
        err,
        FilterError::Build(BuildError::ContainsNotSupported(ref name)) if name == "visibility"
    ));
}

#[test]
fn test_unknown_identifier() {
    let err = compile(&Sqlite, &Expr::eq(Expr::ident("bogus"), Expr::int(1)), 0).unwrap_err();
    assert!(err.to_string().contains("bogus"));
    assert!(matches!(err, FilterError::Build(BuildError::UnknownIdentifier(_))));
}

#[test]
fn test_now_is_folded_at_compile_time() {
    fn later_clock() -> i64 {
        NOW + 5
    }

    let schema = memo_schema();
    let expr = Expr::ge(Expr::ident("created_ts"), Expr::sub(Expr::now(), Expr::int(3600)));

    let early = Compiler::new(&schema, &Sqlite).with_clock(fixed_clock).compile(&expr, 0).unwrap();
    let late = Compiler::new(&schema, &Sqlite).with_clock(later_clock).compile(&expr, 0).unwrap();
    assert_eq!(early.sql, r#"("memo"."created_ts" >= ?)"#);
    assert_eq!(early.args, vec![Value::Int(NOW - 3600)]);
    assert_eq!(
        late.args[0].as_i64().unwrap() - early.args[0].as_i64().unwrap(),
        5
    );
}

#[test]
fn test_backend_limitation_is_not_a_client_error() {
    let tags = FieldRef {
        name: "labels".into(),
        column: Column::new("labels"),
        ty: FieldType::List,
        collection: Some(CollectionEncoding::Delimited { separator: ',' }),
    };
    let condition = Condition::Comparison {
        left: ValueExpr::Function {
            function: filter_core::ScalarFunction::Size,
            args: vec![ValueExpr::Field(tags)],
        },
        op: ComparisonOperator::Gt,
        right: ValueExpr::Literal(Value::Int(1)),
    };

    let err: FilterError = SqlConverter::new(&Sqlite).lower(&condition, 0).unwrap_err().into();
    assert!(!err.is_client_error());
    assert_eq!(err.to_string(), "SQLite cannot express size() of a collection field");
}

#[traced_test]
#[test]
fn test_settings_drive_compilation() {
    let settings = FilterSettings::from_json(r#"{"dialect": "postgres", "args_offset": 2}"#).unwrap();
    let schema = memo_schema();
    let fragment = settings
        .compiler(&schema)
        .with_clock(fixed_clock)
        .compile(&Expr::gt(Expr::size(Expr::ident("tags")), Expr::int(0)), settings.args_offset)
        .unwrap();
    assert_eq!(
        fragment.sql,
        r#"(jsonb_array_length("memo"."tags"::jsonb) > $3)"#
    );
    assert_eq!(fragment.args, vec![Value::Int(0)]);
}
