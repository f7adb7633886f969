//! Function symbols emitted by the CEL parser for operators and builtins.

pub const AND: &str = "_&&_";
pub const OR: &str = "_||_";
pub const NOT: &str = "!_";

pub const EQUALS: &str = "_==_";
pub const NOT_EQUALS: &str = "_!=_";
pub const LESS: &str = "_<_";
pub const GREATER: &str = "_>_";
pub const LESS_EQUALS: &str = "_<=_";
pub const GREATER_EQUALS: &str = "_>=_";

pub const ADD: &str = "_+_";
pub const SUBTRACT: &str = "_-_";
pub const MULTIPLY: &str = "_*_";

pub const IN: &str = "@in";
pub const CONTAINS: &str = "contains";
pub const SIZE: &str = "size";
pub const NOW: &str = "now";
