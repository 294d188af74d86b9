//! Rendering test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT, INSERT, UPDATE, DELETE and expression rendering
//! - `params`: placeholder collection, NULL-aware IN lists, literal inlining
//! - `dialects`: per-dialect quoting, placeholders and rewrites
//! - `ddl`: CREATE / DROP / ALTER TABLE, indexes and views
//! - `features`: per-dialect feature gates and upsert clauses

mod ddl;
mod dialects;
mod params;

use crate::prelude::*;

pub(crate) fn user() -> Table {
    Table::new("user").columns(vec![
        Column::new("id").data_type("serial").primary_key(),
        Column::new("email").data_type("varchar(255)"),
        Column::new("name").data_type("varchar(255)"),
        Column::new("active").data_type("boolean"),
    ])
}

pub(crate) fn post() -> Table {
    Table::new("post").columns(vec![
        Column::new("id").data_type("serial").primary_key(),
        Column::new("userId").data_type("int"),
        Column::new("title").data_type("varchar(100)"),
    ])
}

/// A table whose builder-side properties differ from the column names, so
/// star selection expands to an aliased column list.
pub(crate) fn person() -> Table {
    Table::new("person").columns(vec![
        Column::new("id").data_type("serial").primary_key(),
        Column::new("first_name").data_type("varchar(100)").property("firstName"),
    ])
}
