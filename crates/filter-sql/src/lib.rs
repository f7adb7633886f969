//! SQL lowering for filter conditions.
//!
//! A [`filter_core::Condition`] is rendered into a parameterized predicate
//! for MySQL, PostgreSQL or SQLite. Output is a [`SqlFragment`]: SQL text plus
//! its arguments in placeholder order, ready to splice into a `WHERE` clause.

pub mod compiler;
pub mod context;
pub mod converter;
pub mod dialect;
pub mod error;
pub mod render;
pub mod settings;
pub mod where_clause;

pub use compiler::Compiler;
pub use context::{ConvertContext, SqlFragment};
pub use converter::SqlConverter;
pub use dialect::{Dialect, MySql, Postgres, Sqlite};
pub use error::{FilterError, LowerError, Result};
pub use settings::{DialectKind, FilterSettings};
pub use where_clause::WhereClause;
