use crate::ast::ComparisonOperator;
use thiserror::Error;

/// Semantic errors raised while turning a parsed filter into a condition.
///
/// These always mean the filter itself is invalid for the schema, so callers
/// should report them as a bad request rather than a server fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("unknown identifier {0:?}")]
    UnknownIdentifier(String),

    #[error("invalid alias {0:?}")]
    InvalidAlias(String),

    #[error("operator {op} not allowed for field {field:?}")]
    DisallowedOperator {
        op: ComparisonOperator,
        field: String,
    },

    #[error("identifier {0:?} is not boolean")]
    NotBoolean(String),

    #[error("{function} expects {expected} argument(s), got {found}")]
    WrongArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("unsupported call expression {0:?}")]
    UnsupportedCall(String),

    #[error("unsupported value expression {0}")]
    UnsupportedValue(String),

    #[error("unsupported top-level expression")]
    UnsupportedTopLevel,

    #[error("filter must evaluate to a boolean value")]
    NonBooleanFilter,

    #[error("contains requires an identifier target")]
    ContainsTarget,

    #[error("identifier {0:?} does not support contains()")]
    ContainsNotSupported(String),

    #[error("contains argument must be a string literal")]
    ContainsArgument,

    #[error("invalid use of in operator")]
    MalformedMembership,

    #[error("identifier {0:?} is not a collection")]
    NotACollection(String),

    #[error("size() is not defined for {0}")]
    InvalidSizeArgument(String),

    #[error("null can only be compared with == or !=, got {0}")]
    InvalidNullComparison(ComparisonOperator),

    #[error("null cannot be tested for membership in {0:?}")]
    NullMembership(String),

    #[error("integer constant {0} is out of range")]
    IntegerOutOfRange(u64),

    #[error("arithmetic overflow while folding {0}")]
    ArithmeticOverflow(String),
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("duplicate field {0:?}")]
    DuplicateField(String),
}
