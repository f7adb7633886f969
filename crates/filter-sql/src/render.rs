//! Defines the rendering trait and context for converting conditions to SQL.

use crate::{context::ConvertContext, dialect::Dialect, error::LowerError};
use filter_core::{
    Column, ComparisonOperator, Condition, FieldRef, FieldType, LogicalOperator, ScalarFunction,
    Value, ValueExpr,
};
use std::mem;

pub type RenderResult = Result<(), LowerError>;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, r: &mut Renderer<'_>) -> RenderResult;
}

/// Writes SQL text and parameters into a [`ConvertContext`], using the
/// dialect for syntax-specific details.
pub struct Renderer<'a> {
    ctx: &'a mut ConvertContext,
    dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(ctx: &'a mut ConvertContext, dialect: &'a dyn Dialect) -> Self {
        Self { ctx, dialect }
    }

    pub fn push(&mut self, sql: &str) {
        self.ctx.buffer.push_str(sql);
    }

    pub fn add_param(&mut self, value: Value) {
        self.ctx.args.push(value);
        let placeholder = self.dialect.get_placeholder(self.ctx.next_index() - 1);
        self.ctx.buffer.push_str(&placeholder);
    }

    pub fn column(&self, column: &Column) -> String {
        match &column.table {
            Some(table) => format!(
                "{}.{}",
                self.dialect.quote_identifier(table),
                self.dialect.quote_identifier(&column.name)
            ),
            None => self.dialect.quote_identifier(&column.name),
        }
    }

    /// Renders `node` into a detached string; parameters are still appended
    /// to the context in emission order.
    pub fn capture(&mut self, node: &dyn Render) -> Result<String, LowerError> {
        let outer = mem::take(&mut self.ctx.buffer);
        let result = node.render(self);
        let inner = mem::replace(&mut self.ctx.buffer, outer);
        result.map(|()| inner)
    }

    fn unsupported(&self, feature: &str) -> LowerError {
        LowerError::Unsupported {
            dialect: self.dialect.name(),
            feature: feature.to_string(),
        }
    }
}

impl Render for Condition {
    fn render(&self, r: &mut Renderer<'_>) -> RenderResult {
        match self {
            Condition::Constant(value) => {
                let literal = r.dialect.boolean_literal(*value);
                r.push(literal);
            }
            Condition::FieldPredicate(field) => {
                let column = r.column(&field.column);
                let check = r.dialect.boolean_check(&column);
                r.push(&check);
            }
            Condition::Logical { op, left, right } => {
                r.push("(");
                left.render(r)?;
                r.push(match op {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                });
                right.render(r)?;
                r.push(")");
            }
            Condition::Not(inner) => {
                r.push("NOT (");
                inner.render(r)?;
                r.push(")");
            }
            Condition::Comparison { left, op, right } => render_comparison(r, left, *op, right)?,
            Condition::In { field, values } => {
                if values.is_empty() {
                    let literal = r.dialect.boolean_literal(false);
                    r.push(literal);
                    return Ok(());
                }
                let column = r.column(&field.column);
                r.push(&column);
                r.push(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        r.push(", ");
                    }
                    value.render(r)?;
                }
                r.push(")");
            }
            Condition::ElementIn { element, field } => {
                let (Some(encoding), Some(element_type)) = (field.collection, element_type(element))
                else {
                    return Err(LowerError::UnsupportedExpression(self.to_string()));
                };
                let element = r.capture(element)?;
                let column = r.column(&field.column);
                let sql = r
                    .dialect
                    .element_in(encoding, &element, element_type, &column)
                    .ok_or_else(|| r.unsupported("membership in a collection field"))?;
                r.push(&sql);
            }
            Condition::Contains { field, value } => {
                let column = r.column(&field.column);
                let pattern = r.capture(&ValueExpr::Literal(Value::String(like_pattern(value))))?;
                let sql = r
                    .dialect
                    .contains(&column, &pattern)
                    .ok_or_else(|| r.unsupported("contains()"))?;
                r.push(&sql);
            }
        }
        Ok(())
    }
}

fn render_comparison(
    r: &mut Renderer<'_>,
    left: &ValueExpr,
    op: ComparisonOperator,
    right: &ValueExpr,
) -> RenderResult {
    let null = ValueExpr::Literal(Value::Null);
    if *right == null || *left == null {
        let subject = if *right == null { left } else { right };
        let test = match op {
            ComparisonOperator::Eq => " IS NULL",
            ComparisonOperator::Neq => " IS NOT NULL",
            _ => return Err(LowerError::UnsupportedExpression(format!("{left} {op} {right}"))),
        };
        r.push("(");
        if *subject == null {
            r.push("NULL");
        } else {
            subject.render(r)?;
        }
        r.push(test);
        r.push(")");
        return Ok(());
    }

    r.push("(");
    left.render(r)?;
    r.push(match op {
        ComparisonOperator::Eq => " = ",
        ComparisonOperator::Neq => " != ",
        ComparisonOperator::Lt => " < ",
        ComparisonOperator::Gt => " > ",
        ComparisonOperator::Lte => " <= ",
        ComparisonOperator::Gte => " >= ",
    });
    right.render(r)?;
    r.push(")");
    Ok(())
}

impl Render for ValueExpr {
    fn render(&self, r: &mut Renderer<'_>) -> RenderResult {
        match self {
            ValueExpr::Field(field) => {
                let column = r.column(&field.column);
                r.push(&column);
            }
            ValueExpr::Literal(value) => r.add_param(value.clone()),
            ValueExpr::Function { function, args } => match (function, args.as_slice()) {
                (ScalarFunction::Size, [arg]) => render_size(r, arg)?,
                _ => return Err(LowerError::UnsupportedExpression(self.to_string())),
            },
        }
        Ok(())
    }
}

fn render_size(r: &mut Renderer<'_>, arg: &ValueExpr) -> RenderResult {
    let sql = match arg {
        ValueExpr::Field(FieldRef {
            collection: Some(encoding),
            column,
            ..
        }) => {
            let column = r.column(column);
            r.dialect
                .collection_length(*encoding, &column)
                .ok_or_else(|| r.unsupported("size() of a collection field"))?
        }
        ValueExpr::Field(FieldRef {
            ty: FieldType::String,
            ..
        })
        | ValueExpr::Literal(Value::String(_)) => {
            let inner = r.capture(arg)?;
            r.dialect
                .string_length(&inner)
                .ok_or_else(|| r.unsupported("size() of a string"))?
        }
        other => return Err(LowerError::UnsupportedExpression(format!("size({other})"))),
    };
    r.push(&sql);
    Ok(())
}

/// Type of a membership operand, or `None` for null.
fn element_type(element: &ValueExpr) -> Option<FieldType> {
    match element {
        ValueExpr::Field(field) => Some(field.ty),
        ValueExpr::Literal(Value::Bool(_)) => Some(FieldType::Bool),
        ValueExpr::Literal(Value::Int(_)) => Some(FieldType::Int),
        ValueExpr::Literal(Value::Float(_)) => Some(FieldType::Float),
        ValueExpr::Literal(Value::String(_)) => Some(FieldType::String),
        ValueExpr::Literal(Value::Null) => None,
        ValueExpr::Function {
            function: ScalarFunction::Size,
            ..
        } => Some(FieldType::Int),
    }
}

/// Wraps `needle` in `%` wildcards, escaping LIKE metacharacters with `!`.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '!') {
            pattern.push('!');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
