use crate::{
    compiler::Compiler,
    dialect::{Dialect, MySql, Postgres, Sqlite},
    error::{FilterError, Result},
};
use filter_core::Schema;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Names are matched case-insensitively, both when parsed and when
/// deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DialectKind {
    MySql,
    Postgres,
    #[default]
    Sqlite,
}

impl DialectKind {
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectKind::MySql => &MySql,
            DialectKind::Postgres => &Postgres,
            DialectKind::Sqlite => &Sqlite,
        }
    }
}

impl FromStr for DialectKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(DialectKind::MySql),
            "postgres" | "postgresql" => Ok(DialectKind::Postgres),
            "sqlite" => Ok(DialectKind::Sqlite),
            _ => Err(FilterError::UnknownDialect(s.to_string())),
        }
    }
}

impl TryFrom<String> for DialectKind {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DialectKind::MySql => "mysql",
            DialectKind::Postgres => "postgres",
            DialectKind::Sqlite => "sqlite",
        })
    }
}

/// Store-level filter configuration, usually read from the driver section
/// of the application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub dialect: DialectKind,
    /// Parameters the enclosing statement binds before the filter.
    pub args_offset: usize,
}

impl FilterSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn compiler<'a>(&self, schema: &'a Schema) -> Compiler<'a> {
        Compiler::new(schema, self.dialect.dialect())
    }
}
