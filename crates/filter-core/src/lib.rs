//! Schema-validated condition AST for CEL-style filters.
//!
//! [`builder::Builder`] turns a parsed [`filter_syntax::Expr`] into a
//! [`ast::Condition`], checking every identifier against a [`schema::Schema`]
//! and folding constant sub-expressions on the way. The resulting tree carries
//! everything needed to render SQL, so later stages never consult the schema.

pub mod ast;
pub mod builder;
pub mod error;
pub mod fold;
pub mod function;
pub mod schema;
pub mod value;

pub use ast::{ComparisonOperator, Condition, FieldRef, LogicalOperator, ScalarFunction, ValueExpr};
pub use builder::{Builder, build};
pub use error::{BuildError, Result, SchemaError};
pub use fold::{Clock, system_clock};
pub use schema::{CollectionEncoding, Column, FieldDef, FieldKind, FieldType, Schema};
pub use value::Value;
