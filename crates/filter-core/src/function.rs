//! Closed set of call symbols the builder understands.

use crate::ast::ComparisonOperator;
use filter_syntax::symbols;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
}

impl ArithmeticOp {
    pub fn apply(self, left: i64, right: i64) -> Option<i64> {
        match self {
            ArithmeticOp::Add => left.checked_add(right),
            ArithmeticOp::Subtract => left.checked_sub(right),
            ArithmeticOp::Multiply => left.checked_mul(right),
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticOp::Add => write!(f, "+"),
            ArithmeticOp::Subtract => write!(f, "-"),
            ArithmeticOp::Multiply => write!(f, "*"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    And,
    Or,
    Not,
    Compare(ComparisonOperator),
    Arithmetic(ArithmeticOp),
    In,
    Contains,
    Size,
    Now,
}

impl Function {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            symbols::AND => Function::And,
            symbols::OR => Function::Or,
            symbols::NOT => Function::Not,
            symbols::EQUALS => Function::Compare(ComparisonOperator::Eq),
            symbols::NOT_EQUALS => Function::Compare(ComparisonOperator::Neq),
            symbols::LESS => Function::Compare(ComparisonOperator::Lt),
            symbols::GREATER => Function::Compare(ComparisonOperator::Gt),
            symbols::LESS_EQUALS => Function::Compare(ComparisonOperator::Lte),
            symbols::GREATER_EQUALS => Function::Compare(ComparisonOperator::Gte),
            symbols::ADD => Function::Arithmetic(ArithmeticOp::Add),
            symbols::SUBTRACT => Function::Arithmetic(ArithmeticOp::Subtract),
            symbols::MULTIPLY => Function::Arithmetic(ArithmeticOp::Multiply),
            symbols::IN => Function::In,
            symbols::CONTAINS => Function::Contains,
            symbols::SIZE => Function::Size,
            symbols::NOW => Function::Now,
            _ => return None,
        })
    }
}
