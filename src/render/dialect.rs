//! Dialect registry and rendering configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlError};

use super::sql::{MssqlRules, MysqlRules, OracleRules, PostgresRules, SqliteRules};
use super::traits::DialectRules;

/// The supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
    Mssql,
    Oracle,
}

impl Dialect {
    /// Look up a dialect by name, case insensitive. Accepts the common
    /// spellings, e.g. `postgresql`, `pg`, `mariadb`, `sqlserver`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "mssql" | "sqlserver" => Ok(Dialect::Mssql),
            "oracle" => Ok(Dialect::Oracle),
            _ => Err(SqlError::InvalidConfiguration(format!(
                "{name} is not a supported dialect"
            ))),
        }
    }

    pub fn rules(self) -> &'static dyn DialectRules {
        match self {
            Dialect::Postgres => &PostgresRules,
            Dialect::Mysql => &MysqlRules,
            Dialect::Sqlite => &SqliteRules,
            Dialect::Mssql => &MssqlRules,
            Dialect::Oracle => &OracleRules,
        }
    }

    pub fn name(self) -> &'static str {
        self.rules().name()
    }
}

impl FromStr for Dialect {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self> {
        Dialect::from_name(s)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where NULL values sort in ORDER BY output, PostgreSQL only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullOrder {
    First,
    Last,
}

/// Knobs that vary rendering within a dialect.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DialectConfig {
    /// Append NULLS FIRST / NULLS LAST to ORDER BY, PostgreSQL only.
    pub null_order: Option<NullOrder>,
    /// SQLite stores timestamps as epoch milliseconds; rewrites date
    /// literals and date-part extraction accordingly.
    pub date_time_millis: bool,
    /// Override the placeholder sigil where the dialect allows it (MSSQL).
    pub placeholder_char: Option<char>,
}
