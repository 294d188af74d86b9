//! SQLite rules. Small feature surface: most write-side extensions are
//! rejected, date parts go through STRFTIME, TRUNCATE becomes DELETE FROM.

use chrono::{DateTime, Utc};

use crate::ast::Table;
use crate::error::{Result, SqlError};
use crate::render::dialect::DialectConfig;
use crate::render::traits::{
    date_to_string_utc, hex, quote_string, single_argument, ArrayStyle, DialectRules, Feature,
};

pub struct SqliteRules;

impl DialectRules for SqliteRules {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn placeholder(&self, _index: usize, _config: &DialectConfig) -> String {
        "?".to_string()
    }

    fn unsupported(&self) -> &'static [Feature] {
        &[
            Feature::OnConflict,
            Feature::OnDuplicate,
            Feature::Returning,
            Feature::ForUpdate,
            Feature::ForShare,
            Feature::DropColumn,
            Feature::RenameColumn,
            Feature::Cascade,
            Feature::Restrict,
            Feature::InsertDefault,
            Feature::MultipleAddColumns,
        ]
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        format!("x'{}'", hex(bytes))
    }

    fn date_literal(&self, dt: &DateTime<Utc>, config: &DialectConfig) -> String {
        if config.date_time_millis {
            dt.timestamp_millis().to_string()
        } else {
            quote_string(&date_to_string_utc(dt), '\'')
        }
    }

    fn array_style(&self) -> ArrayStyle {
        ArrayStyle::JsonText
    }

    fn array_agg_function(&self) -> Result<&'static str> {
        Ok("GROUP_CONCAT")
    }

    fn function_call(
        &self,
        name: &str,
        args: &[String],
        config: &DialectConfig,
    ) -> Result<String> {
        let upper = name.to_ascii_uppercase();
        let date_part = match upper.as_str() {
            "YEAR" => Some("%Y"),
            "MONTH" => Some("%m"),
            "DAY" => Some("%d"),
            "HOUR" => Some("%H"),
            _ => None,
        };
        if let Some(fmt) = date_part {
            let arg = single_argument(&upper, args)?;
            return Ok(if config.date_time_millis {
                format!("STRFTIME('{fmt}', {arg} / 1000, 'UNIXEPOCH')")
            } else {
                format!("STRFTIME('{fmt}', {arg})")
            });
        }
        match upper.as_str() {
            "LEFT" => {
                let (value, count) = two_arguments(&upper, args)?;
                Ok(format!("SUBSTR({value}, 1, {count})"))
            }
            "RIGHT" => {
                let (value, count) = two_arguments(&upper, args)?;
                Ok(format!("SUBSTR({value}, -{count})"))
            }
            "CURRENT_TIMESTAMP" if args.is_empty() => Ok(upper),
            _ => Ok(format!("{name}({})", args.join(", "))),
        }
    }

    fn match_predicate(&self, left: &str, right: &str) -> Option<String> {
        Some(format!("{left} MATCH {right}"))
    }

    fn truncate_keyword(&self) -> &'static str {
        "DELETE FROM"
    }

    fn drop_index_fragments(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(vec![
            "DROP INDEX".to_string(),
            self.quote_identifier(name)?,
        ])
    }

    fn indexes_statement(&self, _table: &Table, table_text: &str) -> Vec<String> {
        vec![format!("PRAGMA INDEX_LIST({table_text})")]
    }
}

fn two_arguments<'a>(name: &str, args: &'a [String]) -> Result<(&'a String, &'a String)> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(SqlError::missing(format!(
            "{name} takes exactly two arguments"
        ))),
    }
}
