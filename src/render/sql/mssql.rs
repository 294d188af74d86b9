//! SQL Server rules: bracket quoting and @-prefixed numbered placeholders.

use crate::error::{Result, SqlError};
use crate::render::dialect::DialectConfig;
use crate::render::traits::{hex, ArrayStyle, DialectRules, Feature};

pub struct MssqlRules;

impl DialectRules for MssqlRules {
    fn name(&self) -> &'static str {
        "MSSQL"
    }

    fn quote_identifier(&self, ident: &str) -> Result<String> {
        // Brackets have no escape for a closing bracket.
        if ident.contains(']') {
            return Err(SqlError::InvalidConfiguration(format!(
                "identifier {ident} cannot be quoted with brackets"
            )));
        }
        Ok(format!("[{ident}]"))
    }

    fn placeholder(&self, index: usize, config: &DialectConfig) -> String {
        format!("{}{index}", config.placeholder_char.unwrap_or('@'))
    }

    fn unsupported(&self) -> &'static [Feature] {
        &[
            Feature::Replace,
            Feature::OnConflict,
            Feature::OnDuplicate,
            Feature::Returning,
            Feature::ForShare,
            Feature::OrIgnore,
        ]
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        format!("0x{}", hex(bytes))
    }

    fn array_style(&self) -> ArrayStyle {
        ArrayStyle::Tuple
    }
}
