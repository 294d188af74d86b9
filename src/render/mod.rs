//! Rendering: compile a query tree to dialect-specific SQL text plus the
//! ordered bound values.

pub mod dialect;
mod renderer;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use crate::ast::{Query, Table, Value};
use crate::error::{Result, SqlError};

pub use dialect::{Dialect, DialectConfig, NullOrder};
pub use traits::{AlterStyle, ArrayStyle, DialectRules, Feature};

use renderer::Renderer;

/// A rendered statement: SQL text, bound values in placeholder order, and
/// an optional prepared-statement name.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub text: String,
    pub values: Vec<Value>,
    pub name: Option<String>,
}

/// Render a query for the given dialect, collecting parameters.
pub fn compile(query: &Query, dialect: Dialect, config: &DialectConfig) -> Result<Compiled> {
    let (text, values) = Renderer::new(dialect.rules(), config, false).run(query)?;
    Ok(Compiled {
        text,
        values,
        name: None,
    })
}

/// Render a named prepared statement. The name must be non-empty.
pub fn compile_named(
    query: &Query,
    name: &str,
    dialect: Dialect,
    config: &DialectConfig,
) -> Result<Compiled> {
    if name.is_empty() {
        return Err(SqlError::InvalidConfiguration(
            "query name must not be empty".to_string(),
        ));
    }
    let mut compiled = compile(query, dialect, config)?;
    compiled.name = Some(name.to_string());
    Ok(compiled)
}

/// Render a query with all values inlined as literals instead of
/// placeholders.
pub fn render_literal(query: &Query, dialect: Dialect, config: &DialectConfig) -> Result<String> {
    let (text, _) = Renderer::new(dialect.rules(), config, true).run(query)?;
    Ok(text)
}

/// Anything renderable as a statement. Implemented by [`Query`] and by
/// [`Table`], where a bare table compiles as `SELECT * FROM t`.
pub trait ToQuery {
    fn to_query_with_config(&self, dialect: Dialect, config: &DialectConfig) -> Result<Compiled>;

    fn to_sql_string_with_config(
        &self,
        dialect: Dialect,
        config: &DialectConfig,
    ) -> Result<String>;

    fn to_query_with(&self, dialect: Dialect) -> Result<Compiled> {
        self.to_query_with_config(dialect, &DialectConfig::default())
    }

    fn to_query(&self) -> Result<Compiled> {
        self.to_query_with(Dialect::default())
    }

    fn to_sql_string(&self, dialect: Dialect) -> Result<String> {
        self.to_sql_string_with_config(dialect, &DialectConfig::default())
    }

    fn to_named_query(&self, name: &str, dialect: Dialect) -> Result<Compiled> {
        if name.is_empty() {
            return Err(SqlError::InvalidConfiguration(
                "query name must not be empty".to_string(),
            ));
        }
        let mut compiled = self.to_query_with(dialect)?;
        compiled.name = Some(name.to_string());
        Ok(compiled)
    }
}

impl ToQuery for Query {
    fn to_query_with_config(&self, dialect: Dialect, config: &DialectConfig) -> Result<Compiled> {
        compile(self, dialect, config)
    }

    fn to_sql_string_with_config(
        &self,
        dialect: Dialect,
        config: &DialectConfig,
    ) -> Result<String> {
        render_literal(self, dialect, config)
    }
}

impl ToQuery for Table {
    fn to_query_with_config(&self, dialect: Dialect, config: &DialectConfig) -> Result<Compiled> {
        compile(&Query::for_table(self.clone()), dialect, config)
    }

    fn to_sql_string_with_config(
        &self,
        dialect: Dialect,
        config: &DialectConfig,
    ) -> Result<String> {
        render_literal(&Query::for_table(self.clone()), dialect, config)
    }
}
