//! Builds a validated [`Condition`] from a parsed expression tree.

use crate::{
    ast::{ComparisonOperator, Condition, FieldRef, LogicalOperator, ScalarFunction, ValueExpr},
    error::{BuildError, Result},
    fold::{Clock, evaluate_bool, evaluate_numeric, expect_args, system_clock},
    function::Function,
    schema::{FieldDef, FieldKind, FieldType, Schema},
    value::Value,
};
use filter_syntax::{Call, Constant, Expr};
use tracing::debug;

/// Builds a condition using the wall clock for `now()`.
pub fn build(expr: &Expr, schema: &Schema) -> Result<Condition> {
    Builder::new(schema).build(expr)
}

#[derive(Debug, Clone, Copy)]
pub struct Builder<'a> {
    schema: &'a Schema,
    clock: Clock,
}

impl<'a> Builder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(&self, expr: &Expr) -> Result<Condition> {
        match self.build_condition(expr) {
            Ok(condition) => {
                debug!(%condition, "filter built");
                Ok(condition)
            }
            Err(error) => {
                debug!(%error, filter = %expr, "filter rejected");
                Err(error)
            }
        }
    }

    fn build_condition(&self, expr: &Expr) -> Result<Condition> {
        match expr {
            Expr::Call(call) => self.build_call(call),
            Expr::Const(constant) => match constant {
                Constant::Bool(v) => Ok(Condition::Constant(*v)),
                Constant::Int(v) => Ok(Condition::Constant(*v != 0)),
                Constant::Uint(v) => Ok(Condition::Constant(*v != 0)),
                Constant::Double(v) => Ok(Condition::Constant(*v != 0.0)),
                Constant::String(_) | Constant::Null => Err(BuildError::NonBooleanFilter),
            },
            Expr::Ident(name) => {
                let def = self.resolve(name)?;
                if def.ty != FieldType::Bool {
                    return Err(BuildError::NotBoolean(name.clone()));
                }
                Ok(Condition::FieldPredicate(def.to_field_ref(name)))
            }
            Expr::List(_) => Err(BuildError::UnsupportedTopLevel),
        }
    }

    fn build_call(&self, call: &Call) -> Result<Condition> {
        match Function::from_symbol(&call.function) {
            Some(Function::And) => self.build_logical(call, LogicalOperator::And),
            Some(Function::Or) => self.build_logical(call, LogicalOperator::Or),
            Some(Function::Not) => {
                expect_args(call, 1)?;
                let inner = self.build_condition(&call.args[0])?;
                Ok(Condition::Not(Box::new(inner)))
            }
            Some(Function::Compare(op)) => self.build_comparison(call, op),
            Some(Function::In) => self.build_in(call),
            Some(Function::Contains) => self.build_contains(call),
            Some(Function::Arithmetic(_) | Function::Size | Function::Now) | None => {
                match evaluate_bool(&Expr::Call(call.clone()))? {
                    Some(v) => Ok(Condition::Constant(v)),
                    None => Err(BuildError::UnsupportedCall(call.function.clone())),
                }
            }
        }
    }

    fn build_logical(&self, call: &Call, op: LogicalOperator) -> Result<Condition> {
        expect_args(call, 2)?;
        let left = self.build_condition(&call.args[0])?;
        let right = self.build_condition(&call.args[1])?;
        Ok(Condition::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn build_comparison(&self, call: &Call, op: ComparisonOperator) -> Result<Condition> {
        expect_args(call, 2)?;
        let left = self.build_value(&call.args[0])?;
        let right = self.build_value(&call.args[1])?;

        if let ValueExpr::Field(field) = &left {
            let def = self.resolve(&field.name)?;
            if !def.allows(op) {
                return Err(BuildError::DisallowedOperator {
                    op,
                    field: field.name.clone(),
                });
            }
        }

        let is_null = |v: &ValueExpr| matches!(v, ValueExpr::Literal(Value::Null));
        if !op.is_equality() && (is_null(&left) || is_null(&right)) {
            return Err(BuildError::InvalidNullComparison(op));
        }

        Ok(Condition::Comparison { left, op, right })
    }

    fn build_in(&self, call: &Call) -> Result<Condition> {
        expect_args(call, 2)?;
        let (element, collection) = (&call.args[0], &call.args[1]);

        // field in [v1, v2, ...]
        if let Some(name) = element.as_ident()
            && let Some(list) = collection.as_list()
        {
            let field = self.field_ref(name)?;
            let values = list
                .iter()
                .map(|item| self.build_value(item))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Condition::In { field, values });
        }

        // value in collection_field
        if let Some(name) = collection.as_ident() {
            let def = self.resolve(name)?;
            if def.collection.is_none() {
                return Err(BuildError::NotACollection(name.to_string()));
            }
            let field = def.to_field_ref(name);
            let element = self.build_value(element)?;
            if element == ValueExpr::Literal(Value::Null) {
                return Err(BuildError::NullMembership(name.to_string()));
            }
            return Ok(Condition::ElementIn { element, field });
        }

        Err(BuildError::MalformedMembership)
    }

    fn build_contains(&self, call: &Call) -> Result<Condition> {
        let name = call
            .target
            .as_deref()
            .and_then(Expr::as_ident)
            .ok_or(BuildError::ContainsTarget)?;

        let def = self.resolve(name)?;
        if !def.supports_contains {
            return Err(BuildError::ContainsNotSupported(name.to_string()));
        }
        expect_args(call, 1)?;

        let Some(Constant::String(value)) = call.args[0].as_const() else {
            return Err(BuildError::ContainsArgument);
        };
        Ok(Condition::Contains {
            field: def.to_field_ref(name),
            value: value.clone(),
        })
    }

    /// Builds an operand of a comparison or membership test.
    fn build_value(&self, expr: &Expr) -> Result<ValueExpr> {
        match expr {
            Expr::Ident(name) => return Ok(ValueExpr::Field(self.field_ref(name)?)),
            Expr::Const(constant) => return literal(constant).map(ValueExpr::Literal),
            _ => {}
        }

        if let Some(v) = evaluate_numeric(expr, self.clock)? {
            return Ok(ValueExpr::Literal(Value::Int(v)));
        }
        if let Some(v) = evaluate_bool(expr)? {
            return Ok(ValueExpr::Literal(Value::Bool(v)));
        }

        if let Expr::Call(call) = expr
            && Function::from_symbol(&call.function) == Some(Function::Size)
        {
            expect_args(call, 1)?;
            let arg = self.build_value(&call.args[0])?;
            match &arg {
                ValueExpr::Field(field)
                    if field.collection.is_some() || field.ty == FieldType::String => {}
                ValueExpr::Literal(Value::String(_)) => {}
                other => return Err(BuildError::InvalidSizeArgument(other.to_string())),
            }
            return Ok(ValueExpr::Function {
                function: ScalarFunction::Size,
                args: vec![arg],
            });
        }

        Err(BuildError::UnsupportedValue(expr.to_string()))
    }

    /// Looks up `name` and follows it to a concrete field if it is an alias.
    fn resolve(&self, name: &str) -> Result<&'a FieldDef> {
        let def = self
            .schema
            .field(name)
            .ok_or_else(|| BuildError::UnknownIdentifier(name.to_string()))?;
        match def.kind {
            FieldKind::Normal => Ok(def),
            FieldKind::VirtualAlias { .. } => self
                .schema
                .resolve_alias(name)
                .ok_or_else(|| BuildError::InvalidAlias(name.to_string())),
        }
    }

    fn field_ref(&self, name: &str) -> Result<FieldRef> {
        self.resolve(name).map(|def| def.to_field_ref(name))
    }
}

fn literal(constant: &Constant) -> Result<Value> {
    Ok(match constant {
        Constant::Bool(v) => Value::Bool(*v),
        Constant::Int(v) => Value::Int(*v),
        Constant::Uint(v) => {
            Value::Int(i64::try_from(*v).map_err(|_| BuildError::IntegerOutOfRange(*v))?)
        }
        Constant::Double(v) => Value::Float(*v),
        Constant::String(v) => Value::String(v.clone()),
        Constant::Null => Value::Null,
    })
}
