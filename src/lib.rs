//! sqlforge builds SQL statements from a typed query tree and renders them
//! for PostgreSQL, MySQL, SQLite, MSSQL and Oracle, collecting bound values
//! as numbered placeholders along the way.
//!
//! ```
//! use sqlforge::prelude::*;
//!
//! let user = Table::new("user").columns(vec![
//!     Column::new("id").data_type("serial").primary_key(),
//!     Column::new("email").data_type("varchar(255)"),
//! ]);
//!
//! let compiled = user
//!     .select(user.col("id"))
//!     .where_(user.col("email").equals("alice@example.com"))
//!     .to_query()
//!     .unwrap();
//!
//! assert_eq!(
//!     compiled.text,
//!     r#"SELECT "user"."id" FROM "user" WHERE ("user"."email" = $1)"#
//! );
//! ```

pub mod ast;
pub mod error;
pub mod render;

pub use ast::{Column, Expression, Node, Query, Table, Value};
pub use error::{Result, SqlError};
pub use render::{
    compile, compile_named, render_literal, Compiled, Dialect, DialectConfig, NullOrder, ToQuery,
};

/// Common imports for building and rendering queries.
pub mod prelude {
    pub use crate::ast::{
        array, ascending, case, constant, current_timestamp, descending, function, literal, param,
        row, select, text, Column, Expression, ForeignKeyNode, ForeignRef, IntoNodeSeq, Node,
        OnConflictNode, Query, ReferentialAction, Table, Value,
    };
    pub use crate::error::{Result, SqlError};
    pub use crate::render::{
        compile, compile_named, render_literal, Compiled, Dialect, DialectConfig, NullOrder,
        ToQuery,
    };
}
