//! The dialect strategy surface.
//!
//! The renderer walks the tree once; everything dialect specific goes
//! through [`DialectRules`]. Defaults implement the PostgreSQL behavior, so
//! each dialect overrides only its deltas.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::ast::{ColumnNode, Table, Value};
use crate::error::{Result, SqlError};

use super::dialect::{DialectConfig, NullOrder};

/// Constructs a dialect may refuse to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Returning,
    OnConflict,
    OnDuplicate,
    Replace,
    OrIgnore,
    ForUpdate,
    ForShare,
    DropColumn,
    RenameColumn,
    Cascade,
    Restrict,
    InsertDefault,
    MultipleAddColumns,
    ArrayAgg,
    ArrayExpression,
}

impl Feature {
    pub fn describe(self) -> &'static str {
        match self {
            Feature::Returning => "the RETURNING clause",
            Feature::OnConflict => "the ON CONFLICT clause",
            Feature::OnDuplicate => "the ON DUPLICATE KEY UPDATE clause",
            Feature::Replace => "REPLACE statements",
            Feature::OrIgnore => "the OR IGNORE clause",
            Feature::ForUpdate => "the FOR UPDATE clause",
            Feature::ForShare => "the FOR SHARE clause",
            Feature::DropColumn => "dropping columns",
            Feature::RenameColumn => "renaming columns",
            Feature::Cascade => "CASCADE in DROP TABLE",
            Feature::Restrict => "RESTRICT in DROP TABLE",
            Feature::InsertDefault => "DEFAULT values in multi-row inserts",
            Feature::MultipleAddColumns => "adding more than one column per ALTER",
            Feature::ArrayAgg => "array aggregation",
            Feature::ArrayExpression => "array expressions",
        }
    }
}

/// How a dialect inlines an array value as a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayStyle {
    /// `(a, b, c)`
    Tuple,
    /// PostgreSQL `'{a,b,c}'`, falling back to JSON text for object arrays.
    Braced,
    /// The whole array as a JSON string literal.
    JsonText,
}

/// How ALTER TABLE column changes are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterStyle {
    /// One ADD / DROP clause per column.
    PerColumn,
    /// Oracle style, columns grouped into `ADD (..)` and `DROP (..)`.
    Combined,
}

/// Per-dialect rendering rules. Every default is the PostgreSQL behavior.
pub trait DialectRules: Sync {
    fn name(&self) -> &'static str;

    fn quote_char(&self) -> char {
        '"'
    }

    fn quote_identifier(&self, ident: &str) -> Result<String> {
        let q = self.quote_char();
        let doubled = format!("{q}{q}");
        Ok(format!("{q}{}{q}", ident.replace(q, &doubled)))
    }

    fn placeholder(&self, index: usize, _config: &DialectConfig) -> String {
        format!("${index}")
    }

    /// Text between an expression and its alias.
    fn alias_separator(&self) -> &'static str {
        " AS "
    }

    fn unsupported(&self) -> &'static [Feature] {
        &[]
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        format!("'\\x{}'", hex(bytes))
    }

    fn date_literal(&self, dt: &DateTime<Utc>, _config: &DialectConfig) -> String {
        quote_string(&date_to_string_utc(dt), '\'')
    }

    fn array_style(&self) -> ArrayStyle {
        ArrayStyle::Braced
    }

    fn array_agg_function(&self) -> Result<&'static str> {
        Ok("array_agg")
    }

    /// Render a function call. The baseline maps the date-part extractors to
    /// EXTRACT and omits parentheses on bare CURRENT_TIMESTAMP.
    fn function_call(
        &self,
        name: &str,
        args: &[String],
        _config: &DialectConfig,
    ) -> Result<String> {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "YEAR" | "MONTH" | "DAY" | "HOUR" => {
                let arg = single_argument(&upper, args)?;
                Ok(format!("EXTRACT({upper} FROM {arg})"))
            }
            "CURRENT_TIMESTAMP" if args.is_empty() => Ok(upper),
            _ => Ok(format!("{name}({})", args.join(", "))),
        }
    }

    /// Dialect-specific rewrite of the `@@` full-text operator. `None`
    /// renders it as an ordinary binary operator.
    fn match_predicate(&self, _left: &str, _right: &str) -> Option<String> {
        None
    }

    fn limit_fragments(&self, count: String) -> Vec<String> {
        vec!["LIMIT".to_string(), count]
    }

    fn offset_fragments(&self, count: String) -> Vec<String> {
        vec!["OFFSET".to_string(), count]
    }

    /// Post-assembly pass over the fragment list, e.g. Oracle moving OFFSET
    /// ahead of FETCH NEXT.
    fn finish_query(&self, _fragments: &mut Vec<String>) {}

    fn null_order_suffix(&self, _config: &DialectConfig) -> Option<&'static str> {
        None
    }

    fn truncate_keyword(&self) -> &'static str {
        "TRUNCATE TABLE"
    }

    /// Rendering of an INSERT row with no columns at all.
    fn empty_row_values(&self) -> &'static str {
        "DEFAULT VALUES"
    }

    fn cascade_keyword(&self) -> &'static str {
        "CASCADE"
    }

    fn create_prelude(&self, temporary: bool, if_not_exists: bool) -> Vec<String> {
        let mut out = vec![if temporary {
            "CREATE TEMPORARY TABLE".to_string()
        } else {
            "CREATE TABLE".to_string()
        }];
        if if_not_exists {
            out.push("IF NOT EXISTS".to_string());
        }
        out
    }

    /// Final pass over a CREATE TABLE statement.
    fn finish_create(&self, fragments: Vec<String>, _if_not_exists: bool) -> Vec<String> {
        fragments
    }

    /// Final pass over a DROP TABLE statement. The default splices IF EXISTS
    /// after the keyword.
    fn finish_drop(&self, mut fragments: Vec<String>, if_exists: bool) -> Vec<String> {
        if if_exists {
            fragments.insert(1, "IF EXISTS".to_string());
        }
        fragments
    }

    /// Table options appended after the column list of CREATE TABLE.
    fn create_table_suffix(&self, _table: &Table) -> Vec<String> {
        Vec::new()
    }

    fn alter_style(&self) -> AlterStyle {
        AlterStyle::PerColumn
    }

    /// RENAME COLUMN fragments. `resolved_type` is the new column's data
    /// type, falling back to the table definition; only MySQL requires it.
    fn rename_column_fragments(
        &self,
        _old: &ColumnNode,
        _new: &ColumnNode,
        old_text: String,
        new_text: String,
        _resolved_type: Option<&str>,
    ) -> Result<Vec<String>> {
        Ok(vec![
            "RENAME COLUMN".to_string(),
            old_text,
            "TO".to_string(),
            new_text,
        ])
    }

    /// Oracle rewrites bare boolean CASE conditions into predicates.
    fn boolean_predicate(&self, _value: bool) -> Option<&'static str> {
        None
    }

    fn drop_index_fragments(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        let schema = table.schema_name().unwrap_or("public");
        Ok(vec![
            "DROP INDEX".to_string(),
            format!(
                "{}.{}",
                self.quote_identifier(schema)?,
                self.quote_identifier(name)?
            ),
        ])
    }

    /// A statement listing the table's indexes.
    fn indexes_statement(&self, table: &Table, _table_text: &str) -> Vec<String> {
        let name = table.table_name();
        let schema = table.schema_name().unwrap_or("public");
        vec![
            "SELECT relname FROM pg_class WHERE oid IN (".to_string(),
            "SELECT indexrelid FROM pg_index, pg_class".to_string(),
            format!("WHERE pg_class.relname = '{name}'"),
            "AND pg_class.relnamespace IN (".to_string(),
            format!("SELECT pg_namespace.oid FROM pg_namespace WHERE nspname = '{schema}')"),
            "AND pg_class.oid = pg_index.indrelid)".to_string(),
        ]
    }
}

pub(crate) fn single_argument<'a>(name: &str, args: &'a [String]) -> Result<&'a String> {
    match args {
        [arg] => Ok(arg),
        _ => Err(SqlError::missing(format!(
            "{name} takes exactly one argument"
        ))),
    }
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub(crate) fn quote_string(s: &str, quote: char) -> String {
    let doubled = format!("{quote}{quote}");
    format!("{quote}{}{quote}", s.replace(quote, &doubled))
}

/// ISO-8601 with millisecond precision. Years at or before zero render with
/// a BC suffix, offset by one for the missing year zero.
pub(crate) fn date_to_string_utc(dt: &DateTime<Utc>) -> String {
    let year = dt.year();
    let bc = year < 1;
    let display_year = if bc { year.abs() + 1 } else { year };
    let mut out = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        display_year,
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.timestamp_subsec_millis()
    );
    if bc {
        out.push_str(" BC");
    }
    out
}

/// Render a value as an inline literal under the given dialect rules.
pub(crate) fn literal_text(
    rules: &dyn DialectRules,
    value: &Value,
    config: &DialectConfig,
) -> Result<String> {
    Ok(match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => rules.bool_literal(*b).to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::String(s) => quote_string(s, '\''),
        Value::DateTime(dt) => rules.date_literal(dt, config),
        Value::Bytes(b) => rules.bytes_literal(b),
        Value::Uuid(u) => quote_string(&u.to_string(), '\''),
        Value::Json(j) => quote_string(&j.to_string(), '\''),
        Value::Array(items) => array_literal(rules, items, config)?,
    })
}

fn array_literal(
    rules: &dyn DialectRules,
    items: &[Value],
    config: &DialectConfig,
) -> Result<String> {
    match rules.array_style() {
        ArrayStyle::Tuple => {
            let parts = items
                .iter()
                .map(|v| literal_text(rules, v, config))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("({})", parts.join(", ")))
        }
        ArrayStyle::JsonText => {
            let json = serde_json::Value::Array(items.iter().map(Value::to_json).collect());
            Ok(quote_string(&json.to_string(), '\''))
        }
        ArrayStyle::Braced => {
            // Arrays of JSON objects have no braced form; fall back to a
            // JSON string literal.
            if items
                .iter()
                .any(|v| matches!(v, Value::Json(serde_json::Value::Object(_))))
            {
                let json = serde_json::Value::Array(items.iter().map(Value::to_json).collect());
                return Ok(quote_string(&json.to_string(), '\''));
            }
            let parts = items
                .iter()
                .map(|v| braced_element(rules, v, config))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("'{{{}}}'", parts.join(",")))
        }
    }
}

fn braced_element(
    rules: &dyn DialectRules,
    value: &Value,
    config: &DialectConfig,
) -> Result<String> {
    Ok(match value {
        Value::String(s) => quote_string(s, '"'),
        Value::Uuid(u) => quote_string(&u.to_string(), '"'),
        Value::DateTime(dt) => quote_string(&date_to_string_utc(dt), '"'),
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|v| braced_element(rules, v, config))
                .collect::<Result<Vec<_>>>()?;
            format!("{{{}}}", parts.join(","))
        }
        other => literal_text(rules, other, config)?,
    })
}

/// Suffix applied by [`DialectRules::null_order_suffix`] implementations.
pub(crate) fn null_order_text(order: NullOrder) -> &'static str {
    match order {
        NullOrder::First => "NULLS FIRST",
        NullOrder::Last => "NULLS LAST",
    }
}
