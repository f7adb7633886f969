use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal constants as produced by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    String(String),
    Null,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(b) => write!(f, "{b}"),
            Constant::Int(i) => write!(f, "{i}"),
            Constant::Uint(u) => write!(f, "{u}u"),
            Constant::Double(d) => write!(f, "{d:?}"),
            Constant::String(s) => write!(f, "{s:?}"),
            Constant::Null => write!(f, "null"),
        }
    }
}
