//! MySQL rules: backtick quoting, positionless placeholders, GROUP_CONCAT,
//! direct date-part functions, ON DUPLICATE KEY UPDATE and CHANGE COLUMN.

use crate::ast::{ColumnNode, Table};
use crate::error::{Result, SqlError};
use crate::render::dialect::DialectConfig;
use crate::render::traits::{hex, ArrayStyle, DialectRules, Feature};

pub struct MysqlRules;

impl DialectRules for MysqlRules {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn placeholder(&self, _index: usize, _config: &DialectConfig) -> String {
        "?".to_string()
    }

    fn unsupported(&self) -> &'static [Feature] {
        &[
            Feature::OnConflict,
            Feature::Returning,
            Feature::ForShare,
            Feature::OrIgnore,
        ]
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        format!("x'{}'", hex(bytes))
    }

    fn array_style(&self) -> ArrayStyle {
        ArrayStyle::Tuple
    }

    fn array_agg_function(&self) -> Result<&'static str> {
        Ok("GROUP_CONCAT")
    }

    fn function_call(
        &self,
        name: &str,
        args: &[String],
        _config: &DialectConfig,
    ) -> Result<String> {
        let upper = name.to_ascii_uppercase();
        if upper == "CURRENT_TIMESTAMP" && args.is_empty() {
            return Ok(upper);
        }
        // Date parts are plain functions here, YEAR(x) and friends.
        Ok(format!("{name}({})", args.join(", ")))
    }

    fn match_predicate(&self, left: &str, right: &str) -> Option<String> {
        Some(format!("(MATCH {left} AGAINST ({right}))"))
    }

    fn empty_row_values(&self) -> &'static str {
        "() VALUES ()"
    }

    fn create_table_suffix(&self, table: &Table) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(engine) = table.engine_name() {
            out.push(format!("ENGINE={engine}"));
        }
        if let Some(charset) = table.charset_name() {
            out.push(format!("DEFAULT CHARSET={charset}"));
        }
        out
    }

    fn rename_column_fragments(
        &self,
        _old: &ColumnNode,
        new: &ColumnNode,
        old_text: String,
        new_text: String,
        resolved_type: Option<&str>,
    ) -> Result<Vec<String>> {
        let data_type = resolved_type.ok_or_else(|| {
            SqlError::missing(format!("dataType missing for column {}", new.name))
        })?;
        Ok(vec![
            "CHANGE COLUMN".to_string(),
            old_text,
            format!("{new_text} {data_type}"),
        ])
    }

    fn drop_index_fragments(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        let mut table_text = self.quote_identifier(table.table_name())?;
        if let Some(schema) = table.schema_name() {
            table_text = format!("{}.{table_text}", self.quote_identifier(schema)?);
        }
        Ok(vec![
            "DROP INDEX".to_string(),
            self.quote_identifier(name)?,
            "ON".to_string(),
            table_text,
        ])
    }

    fn indexes_statement(&self, _table: &Table, table_text: &str) -> Vec<String> {
        vec!["SHOW INDEX FROM".to_string(), table_text.to_string()]
    }
}
