//! Parsed filter expression tree.
//!
//! This is the shape a CEL-style parser hands to the compiler: a closed set
//! of node kinds (call, constant, identifier, list). Call nodes keep the CEL
//! function symbols (`_&&_`, `_==_`, `@in`, ...) listed in [`symbols`].

pub mod constant;
pub mod expr;
pub mod symbols;

pub use constant::Constant;
pub use expr::{Call, Expr};
