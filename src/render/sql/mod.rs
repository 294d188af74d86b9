//! Per-dialect rendering rules.

mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;

pub use mssql::MssqlRules;
pub use mysql::MysqlRules;
pub use oracle::OracleRules;
pub use postgres::PostgresRules;
pub use sqlite::SqliteRules;
