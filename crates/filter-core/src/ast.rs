//! The validated condition tree.
//!
//! Every field reference carries the physical column it maps to, resolved by
//! the builder. Renderers trust these nodes completely.

use crate::{
    schema::{CollectionEncoding, Column, FieldType},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 6] = [
        ComparisonOperator::Eq,
        ComparisonOperator::Neq,
        ComparisonOperator::Lt,
        ComparisonOperator::Gt,
        ComparisonOperator::Lte,
        ComparisonOperator::Gte,
    ];

    /// Whether the operator tests equality rather than ordering.
    pub fn is_equality(self) -> bool {
        matches!(self, ComparisonOperator::Eq | ComparisonOperator::Neq)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Eq => write!(f, "=="),
            ComparisonOperator::Neq => write!(f, "!="),
            ComparisonOperator::Lt => write!(f, "<"),
            ComparisonOperator::Gt => write!(f, ">"),
            ComparisonOperator::Lte => write!(f, "<="),
            ComparisonOperator::Gte => write!(f, ">="),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "&&"),
            LogicalOperator::Or => write!(f, "||"),
        }
    }
}

/// A schema field after validation and alias resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    /// The name used in the filter text (may be an alias).
    pub name: String,
    pub column: Column,
    pub ty: FieldType,
    pub collection: Option<CollectionEncoding>,
}

/// Functions kept as calls for the renderer rather than folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarFunction {
    Size,
}

impl fmt::Display for ScalarFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarFunction::Size => write!(f, "size"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    Field(FieldRef),
    Literal(Value),
    Function {
        function: ScalarFunction,
        args: Vec<ValueExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A folded boolean constant.
    Constant(bool),
    /// Truthiness of a boolean field.
    FieldPredicate(FieldRef),
    Logical {
        op: LogicalOperator,
        left: Box<Condition>,
        right: Box<Condition>,
    },
    Not(Box<Condition>),
    Comparison {
        left: ValueExpr,
        op: ComparisonOperator,
        right: ValueExpr,
    },
    /// `field in [v1, v2, ...]`
    In {
        field: FieldRef,
        values: Vec<ValueExpr>,
    },
    /// `value in collection_field`
    ElementIn {
        element: ValueExpr,
        field: FieldRef,
    },
    /// `field.contains("needle")`
    Contains { field: FieldRef, value: String },
}

impl Condition {
    pub fn and(left: Condition, right: Condition) -> Self {
        Condition::Logical {
            op: LogicalOperator::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Condition, right: Condition) -> Self {
        Condition::Logical {
            op: LogicalOperator::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn negate(inner: Condition) -> Self {
        Condition::Not(Box::new(inner))
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpr::Field(field) => write!(f, "{}", field.name),
            ValueExpr::Literal(value) => write!(f, "{value}"),
            ValueExpr::Function { function, args } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Constant(value) => write!(f, "{value}"),
            Condition::FieldPredicate(field) => write!(f, "{}", field.name),
            Condition::Logical { op, left, right } => write!(f, "({left} {op} {right})"),
            Condition::Not(inner) => write!(f, "!{inner}"),
            Condition::Comparison { left, op, right } => write!(f, "({left} {op} {right})"),
            Condition::In { field, values } => {
                write!(f, "({} in [", field.name)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "])")
            }
            Condition::ElementIn { element, field } => write!(f, "({element} in {})", field.name),
            Condition::Contains { field, value } => write!(f, "{}.contains({value:?})", field.name),
        }
    }
}
