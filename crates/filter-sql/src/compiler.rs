use crate::{
    context::SqlFragment,
    converter::SqlConverter,
    dialect::Dialect,
    error::{LowerError, Result},
    where_clause::WhereClause,
};
use filter_core::{Builder, Clock, Condition, Schema, system_clock};
use filter_syntax::Expr;

/// Builds and lowers filters for one schema and dialect in a single call.
#[derive(Clone, Copy)]
pub struct Compiler<'a> {
    schema: &'a Schema,
    dialect: &'a dyn Dialect,
    clock: Clock,
}

impl<'a> Compiler<'a> {
    pub fn new(schema: &'a Schema, dialect: &'a dyn Dialect) -> Self {
        Self {
            schema,
            dialect,
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub fn build(&self, expr: &Expr) -> Result<Condition> {
        Ok(Builder::new(self.schema).with_clock(self.clock).build(expr)?)
    }

    pub fn lower(&self, condition: &Condition, args_offset: usize) -> std::result::Result<SqlFragment, LowerError> {
        SqlConverter::new(self.dialect).lower(condition, args_offset)
    }

    pub fn compile(&self, expr: &Expr, args_offset: usize) -> Result<SqlFragment> {
        let condition = self.build(expr)?;
        Ok(self.lower(&condition, args_offset)?)
    }

    pub fn where_clause(&self) -> WhereClause<'a> {
        WhereClause::new(self.dialect)
    }
}
