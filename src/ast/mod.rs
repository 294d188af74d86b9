//! The query tree: tables, columns, expressions and the builder API.

pub mod builders;
pub mod column;
pub mod expr;
pub mod node;
pub mod query;
pub mod table;
pub mod values;

pub use builders::{array, case, constant, current_timestamp, function, literal, param, row, select, text};
pub use column::{Column, ColumnNode, ForeignRef};
pub use expr::{Expression, IntoNodeSeq};
pub use node::{
    BinaryRhs, CaseNode, CreateIndexNode, CreateNode, Direction, InList, InsertNode, JoinKind,
    JoinNode, LiteralNode, Node, OnConflictNode, OrderByValueNode, SelectNode,
};
pub use query::{ascending, descending, Query};
pub use table::{ForeignKeyNode, IndexBuilder, ReferentialAction, Table};
pub use values::Value;
