//! Composes several predicates into a single `WHERE` clause body.

use crate::{
    context::{ConvertContext, SqlFragment},
    converter::SqlConverter,
    dialect::Dialect,
    error::LowerError,
};
use filter_core::{Condition, Value};

/// Collects predicates joined with `AND`, keeping one argument list in
/// placeholder order across all of them.
///
/// Every condition pushed is lowered with an offset equal to the number of
/// arguments already bound, so numbered placeholders stay consistent even
/// when the same condition is pushed more than once.
pub struct WhereClause<'a> {
    converter: SqlConverter<'a>,
    args_offset: usize,
    predicates: Vec<String>,
    args: Vec<Value>,
}

impl<'a> WhereClause<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            converter: SqlConverter::new(dialect),
            args_offset: 0,
            predicates: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Starts numbering after `args_offset` parameters bound elsewhere in
    /// the statement.
    pub fn with_offset(mut self, args_offset: usize) -> Self {
        self.args_offset = args_offset;
        self
    }

    fn bound(&self) -> usize {
        self.args_offset + self.args.len()
    }

    /// Placeholder for the next argument, for callers writing raw predicates.
    pub fn placeholder(&self) -> String {
        self.converter.dialect().get_placeholder(self.bound())
    }

    /// Adds a hand-written predicate. `args` must match its placeholders.
    pub fn push_raw(&mut self, sql: impl Into<String>, args: impl IntoIterator<Item = Value>) -> &mut Self {
        self.predicates.push(sql.into());
        self.args.extend(args);
        self
    }

    pub fn push_condition(&mut self, condition: &Condition) -> Result<&mut Self, LowerError> {
        self.push_condition_with(condition, |sql| sql)
    }

    /// Lowers `condition` and passes the SQL through `wrap` before adding it,
    /// e.g. to embed it in a subquery.
    pub fn push_condition_with(
        &mut self,
        condition: &Condition,
        wrap: impl FnOnce(String) -> String,
    ) -> Result<&mut Self, LowerError> {
        let mut ctx = ConvertContext::with_offset(self.bound());
        self.converter.convert(&mut ctx, condition)?;
        let fragment = ctx.finish();
        self.predicates.push(wrap(fragment.sql));
        self.args.extend(fragment.args);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Returns `None` when nothing was pushed.
    pub fn finish(self) -> Option<SqlFragment> {
        if self.predicates.is_empty() {
            return None;
        }
        Some(SqlFragment {
            sql: self.predicates.join(" AND "),
            args: self.args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySql, Postgres};
    use filter_core::{Column, ComparisonOperator, FieldRef, FieldType, ValueExpr};

    fn visibility_is(value: &str) -> Condition {
        Condition::Comparison {
            left: ValueExpr::Field(FieldRef {
                name: "visibility".into(),
                column: Column::new("visibility"),
                ty: FieldType::String,
                collection: None,
            }),
            op: ComparisonOperator::Eq,
            right: ValueExpr::Literal(Value::String(value.into())),
        }
    }

    #[test]
    fn test_empty_clause() {
        let clause = WhereClause::new(&Postgres);
        assert!(clause.is_empty());
        assert!(clause.finish().is_none());
    }

    #[test]
    fn test_same_condition_pushed_twice() {
        let condition = visibility_is("PUBLIC");
        let mut clause = WhereClause::new(&Postgres);
        clause.push_raw("\"row_status\" = $1", [Value::from("NORMAL")]);
        clause
            .push_condition_with(&condition, |sql| {
                format!(r#""memo_id" IN (SELECT "id" FROM "memo" WHERE {sql})"#)
            })
            .unwrap()
            .push_condition_with(&condition, |sql| {
                format!(r#""related_memo_id" IN (SELECT "id" FROM "memo" WHERE {sql})"#)
            })
            .unwrap();

        let fragment = clause.finish().unwrap();
        assert_eq!(
            fragment.sql,
            concat!(
                r#""row_status" = $1 AND "#,
                r#""memo_id" IN (SELECT "id" FROM "memo" WHERE ("visibility" = $2)) AND "#,
                r#""related_memo_id" IN (SELECT "id" FROM "memo" WHERE ("visibility" = $3))"#,
            )
        );
        assert_eq!(
            fragment.args,
            vec![Value::from("NORMAL"), Value::from("PUBLIC"), Value::from("PUBLIC")]
        );
    }

    #[test]
    fn test_placeholder_follows_offset() {
        let mut clause = WhereClause::new(&Postgres).with_offset(2);
        assert_eq!(clause.placeholder(), "$3");
        clause.push_condition(&visibility_is("PRIVATE")).unwrap();
        assert_eq!(clause.placeholder(), "$4");

        let clause = WhereClause::new(&MySql).with_offset(2);
        assert_eq!(clause.placeholder(), "?");
    }
}
