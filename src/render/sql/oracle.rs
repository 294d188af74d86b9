//! Oracle rules: colon placeholders, bare-space aliasing, FETCH / OFFSET
//! row limiting, grouped ALTER clauses and anonymous-block emulation of
//! IF EXISTS / IF NOT EXISTS.

use crate::ast::Table;
use crate::error::{Result, SqlError};
use crate::render::dialect::DialectConfig;
use crate::render::traits::{hex, ArrayStyle, AlterStyle, DialectRules, Feature};

pub struct OracleRules;

impl DialectRules for OracleRules {
    fn name(&self) -> &'static str {
        "Oracle"
    }

    fn placeholder(&self, index: usize, _config: &DialectConfig) -> String {
        format!(":{index}")
    }

    fn alias_separator(&self) -> &'static str {
        " "
    }

    fn unsupported(&self) -> &'static [Feature] {
        &[
            Feature::Replace,
            Feature::OnConflict,
            Feature::OnDuplicate,
            Feature::Returning,
            Feature::Restrict,
            Feature::OrIgnore,
            Feature::ArrayExpression,
        ]
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        format!("utl_raw.cast_to_varchar2(hextoraw('{}'))", hex(bytes))
    }

    fn array_style(&self) -> ArrayStyle {
        ArrayStyle::Tuple
    }

    fn array_agg_function(&self) -> Result<&'static str> {
        Err(SqlError::unsupported(
            self.name(),
            Feature::ArrayAgg.describe(),
        ))
    }

    fn limit_fragments(&self, count: String) -> Vec<String> {
        vec!["FETCH NEXT".to_string(), count, "ROWS ONLY".to_string()]
    }

    fn offset_fragments(&self, count: String) -> Vec<String> {
        vec!["OFFSET".to_string(), count, "ROWS".to_string()]
    }

    /// OFFSET must precede FETCH NEXT regardless of builder call order.
    fn finish_query(&self, fragments: &mut Vec<String>) {
        let offset = fragments.iter().position(|f| f == "OFFSET");
        let fetch = fragments.iter().position(|f| f == "FETCH NEXT");
        if let (Some(o), Some(f)) = (offset, fetch) {
            if o > f {
                let moved: Vec<String> = fragments.drain(o..o + 3).collect();
                fragments.splice(f..f, moved);
            }
        }
    }

    fn cascade_keyword(&self) -> &'static str {
        "CASCADE CONSTRAINTS"
    }

    fn create_prelude(&self, temporary: bool, _if_not_exists: bool) -> Vec<String> {
        vec![if temporary {
            "CREATE GLOBAL TEMPORARY TABLE".to_string()
        } else {
            "CREATE TABLE".to_string()
        }]
    }

    /// ORA-00955: name is already used by an existing object.
    fn finish_create(&self, fragments: Vec<String>, if_not_exists: bool) -> Vec<String> {
        if if_not_exists {
            vec![format!(
                "BEGIN EXECUTE IMMEDIATE '{}'; EXCEPTION WHEN OTHERS THEN IF SQLCODE != -955 THEN RAISE; END IF; END;",
                fragments.join(" ")
            )]
        } else {
            fragments
        }
    }

    /// ORA-00942: table or view does not exist.
    fn finish_drop(&self, fragments: Vec<String>, if_exists: bool) -> Vec<String> {
        if if_exists {
            vec![format!(
                "BEGIN EXECUTE IMMEDIATE '{}'; EXCEPTION WHEN OTHERS THEN IF SQLCODE != -942 THEN RAISE; END IF; END;",
                fragments.join(" ")
            )]
        } else {
            fragments
        }
    }

    fn alter_style(&self) -> AlterStyle {
        AlterStyle::Combined
    }

    fn boolean_predicate(&self, value: bool) -> Option<&'static str> {
        Some(if value { "1 = 1" } else { "0 = 1" })
    }

    fn drop_index_fragments(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        let text = match table.schema_name() {
            Some(schema) => format!(
                "{}.{}",
                self.quote_identifier(schema)?,
                self.quote_identifier(name)?
            ),
            None => self.quote_identifier(name)?,
        };
        Ok(vec!["DROP INDEX".to_string(), text])
    }

    fn indexes_statement(&self, table: &Table, _table_text: &str) -> Vec<String> {
        let mut out = vec![
            "SELECT * FROM USER_INDEXES".to_string(),
            format!("WHERE TABLE_NAME = '{}'", table.table_name()),
        ];
        if let Some(schema) = table.schema_name() {
            out.push(format!("AND TABLE_OWNER = '{schema}'"));
        }
        out
    }
}
