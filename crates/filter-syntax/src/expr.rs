use crate::{constant::Constant, symbols};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the parsed filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Function or operator application, e.g. `_&&_(a, b)` or `tags.contains("x")`.
    Call(Call),
    /// A literal constant.
    Const(Constant),
    /// A bare identifier referring to a schema field.
    Ident(String),
    /// A list literal, e.g. `[1, 2, 3]`.
    List(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub function: String,
    /// Receiver of a method-style call (`target.function(args)`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Box<Expr>>,
    #[serde(default)]
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn ident(name: &str) -> Self {
        Expr::Ident(name.to_string())
    }

    pub fn bool(value: bool) -> Self {
        Expr::Const(Constant::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Expr::Const(Constant::Int(value))
    }

    pub fn uint(value: u64) -> Self {
        Expr::Const(Constant::Uint(value))
    }

    pub fn double(value: f64) -> Self {
        Expr::Const(Constant::Double(value))
    }

    pub fn string(value: &str) -> Self {
        Expr::Const(Constant::String(value.to_string()))
    }

    pub fn null() -> Self {
        Expr::Const(Constant::Null)
    }

    pub fn list(elements: Vec<Expr>) -> Self {
        Expr::List(elements)
    }

    /// Global function call, e.g. `size(x)`.
    pub fn call(function: &str, args: Vec<Expr>) -> Self {
        Expr::Call(Call {
            function: function.to_string(),
            target: None,
            args,
        })
    }

    /// Receiver-style call, e.g. `content.contains("x")`.
    pub fn method(target: Expr, function: &str, args: Vec<Expr>) -> Self {
        Expr::Call(Call {
            function: function.to_string(),
            target: Some(Box::new(target)),
            args,
        })
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::call(symbols::AND, vec![left, right])
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::call(symbols::OR, vec![left, right])
    }

    pub fn not(inner: Expr) -> Self {
        Self::call(symbols::NOT, vec![inner])
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::call(symbols::EQUALS, vec![left, right])
    }

    pub fn ne(left: Expr, right: Expr) -> Self {
        Self::call(symbols::NOT_EQUALS, vec![left, right])
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::call(symbols::LESS, vec![left, right])
    }

    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::call(symbols::GREATER, vec![left, right])
    }

    pub fn le(left: Expr, right: Expr) -> Self {
        Self::call(symbols::LESS_EQUALS, vec![left, right])
    }

    pub fn ge(left: Expr, right: Expr) -> Self {
        Self::call(symbols::GREATER_EQUALS, vec![left, right])
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Self::call(symbols::ADD, vec![left, right])
    }

    pub fn sub(left: Expr, right: Expr) -> Self {
        Self::call(symbols::SUBTRACT, vec![left, right])
    }

    pub fn mul(left: Expr, right: Expr) -> Self {
        Self::call(symbols::MULTIPLY, vec![left, right])
    }

    /// Membership test, `element in collection`.
    pub fn is_in(element: Expr, collection: Expr) -> Self {
        Self::call(symbols::IN, vec![element, collection])
    }

    pub fn contains(target: Expr, needle: Expr) -> Self {
        Self::method(target, symbols::CONTAINS, vec![needle])
    }

    pub fn size(arg: Expr) -> Self {
        Self::call(symbols::SIZE, vec![arg])
    }

    pub fn now() -> Self {
        Self::call(symbols::NOW, Vec::new())
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_const(&self) -> Option<&Constant> {
        match self {
            Expr::Const(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expr]> {
        match self {
            Expr::List(elements) => Some(elements),
            _ => None,
        }
    }
}

fn infix(function: &str) -> Option<&'static str> {
    Some(match function {
        symbols::AND => "&&",
        symbols::OR => "||",
        symbols::EQUALS => "==",
        symbols::NOT_EQUALS => "!=",
        symbols::LESS => "<",
        symbols::GREATER => ">",
        symbols::LESS_EQUALS => "<=",
        symbols::GREATER_EQUALS => ">=",
        symbols::ADD => "+",
        symbols::SUBTRACT => "-",
        symbols::MULTIPLY => "*",
        symbols::IN => "in",
        _ => return None,
    })
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(constant) => write!(f, "{constant}"),
            Expr::Ident(name) => write!(f, "{name}"),
            Expr::List(elements) => {
                write!(f, "[")?;
                write_args(f, elements)?;
                write!(f, "]")
            }
            Expr::Call(call) => write!(f, "{call}"),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(op), None, [left, right]) =
            (infix(&self.function), &self.target, self.args.as_slice())
        {
            return write!(f, "({left} {op} {right})");
        }
        if let (symbols::NOT, None, [inner]) =
            (self.function.as_str(), &self.target, self.args.as_slice())
        {
            return write!(f, "!{inner}");
        }
        if let Some(target) = &self.target {
            write!(f, "{target}.")?;
        }
        write!(f, "{}(", self.function)?;
        write_args(f, &self.args)?;
        write!(f, ")")
    }
}
