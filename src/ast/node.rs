//! The query tree. Every clause and expression a query can contain is a
//! [`Node`] variant; the renderer walks the tree with an exhaustive match.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::column::{Column, ColumnNode};
use super::query::Query;
use super::table::{ForeignKeyNode, Table};
use super::values::Value;

/// A node in the query tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// A nested query, rendered as a parenthesized subquery except as an
    /// INSERT or REPLACE source.
    Query(Box<Query>),
    Select(SelectNode),
    From(Vec<Node>),
    Where(Vec<Node>),
    OrderBy(Vec<Node>),
    OrderByValue(OrderByValueNode),
    GroupBy(Vec<Node>),
    Having(Vec<Node>),
    Insert(InsertNode),
    Replace(InsertNode),
    Update(Vec<ColumnNode>),
    Delete(Vec<Node>),
    Returning(Vec<Node>),
    OnConflict(OnConflictNode),
    OnDuplicate(Vec<ColumnNode>),
    ForUpdate,
    ForShare,
    Distinct,
    DistinctOn(Vec<Node>),
    Limit(Box<Node>),
    Offset(Box<Node>),
    Join(JoinNode),
    Table(Table),
    Column(ColumnNode),
    /// A bound value, collected into the parameter list or inlined as a
    /// literal when placeholders are disabled. An explicit parameter is
    /// recorded in the sequence without emitting any placeholder text.
    Parameter {
        value: Value,
        explicit: bool,
    },
    Literal(LiteralNode),
    /// Raw SQL text emitted verbatim.
    Text(String),
    Default,
    Alias {
        value: Box<Node>,
        alias: String,
    },
    Binary {
        left: Box<Node>,
        operator: String,
        right: BinaryRhs,
    },
    Prefix {
        operator: String,
        operand: Box<Node>,
    },
    Postfix {
        operand: Box<Node>,
        operator: String,
    },
    Ternary {
        left: Box<Node>,
        operator: String,
        middle: Box<Node>,
        separator: String,
        right: Box<Node>,
    },
    In {
        left: Box<Node>,
        negated: bool,
        right: InList,
    },
    Case(CaseNode),
    Cast {
        value: Box<Node>,
        data_type: String,
    },
    FunctionCall {
        name: String,
        args: Vec<Node>,
    },
    ArrayCall(Vec<Node>),
    RowCall(Vec<Node>),
    At {
        value: Box<Node>,
        index: Box<Node>,
    },
    Slice {
        value: Box<Node>,
        start: Box<Node>,
        end: Box<Node>,
    },
    Create(CreateNode),
    Drop(Vec<Node>),
    Alter(Vec<Node>),
    Truncate(Vec<Node>),
    AddColumn(ColumnNode),
    DropColumn(ColumnNode),
    RenameColumn {
        old: Box<ColumnNode>,
        new: Box<ColumnNode>,
    },
    /// ALTER TABLE .. RENAME TO, carries the new table name.
    Rename(String),
    IfExists,
    IfNotExists,
    Cascade,
    Restrict,
    OrIgnore,
    CreateView(String),
    ForeignKey(ForeignKeyNode),
    Indexes,
    CreateIndex(CreateIndexNode),
    DropIndex {
        name: String,
    },
}

/// The right-hand side of a binary expression. Most operators take a single
/// node; a few (e.g. raw IN lists built by hand) take a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BinaryRhs {
    Node(Box<Node>),
    List(Vec<Node>),
}

/// The right-hand side of an IN / NOT IN expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InList {
    /// An explicit list of values or expressions. NULL values are split out
    /// and rendered as IS NULL / IS NOT NULL checks.
    List(Vec<Node>),
    /// A subquery or other expression.
    Expr(Box<Node>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectNode {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderByValueNode {
    pub value: Box<Node>,
    pub direction: Option<Direction>,
}

/// INSERT and REPLACE payload. Column order is fixed by `names`; later rows
/// that skip a column fall back to DEFAULT.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsertNode {
    pub modifiers: Vec<Node>,
    pub names: Vec<String>,
    pub columns: Vec<ColumnNode>,
    pub rows: Vec<HashMap<String, Node>>,
}

impl InsertNode {
    /// Add a row of column/value pairs. Columns seen for the first time
    /// extend the column list; a row with values (or an empty column set)
    /// becomes a VALUES tuple.
    pub fn add_row(&mut self, columns: Vec<Column>) {
        let mut has_columns = false;
        let mut has_values = false;
        let mut row = HashMap::new();
        for column in columns {
            let node = column.into_column_node();
            has_columns = true;
            if !self.names.contains(&node.name) {
                self.names.push(node.name.clone());
                self.columns.push(node.clone());
            }
            if let Some(value) = node.value {
                has_values = true;
                row.insert(node.name, *value);
            }
        }
        if has_values || !has_columns {
            self.rows.push(row);
        }
    }
}

/// ON CONFLICT payload. `update` lists the column properties to overwrite
/// from the EXCLUDED pseudo-table; empty means DO NOTHING.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnConflictNode {
    pub columns: Vec<String>,
    pub constraint: Option<String>,
    pub update: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinNode {
    pub kind: JoinKind,
    pub from: Box<Node>,
    pub to: Box<Node>,
    pub on: Option<Box<Node>>,
}

impl JoinNode {
    /// Constrain the join with an ON expression.
    pub fn on(mut self, condition: impl Into<Node>) -> Self {
        self.on = Some(Box::new(condition.into()));
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralNode {
    pub literal: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNode {
    pub whens: Vec<Node>,
    pub thens: Vec<Node>,
    pub else_value: Option<Box<Node>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNode {
    pub temporary: bool,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIndexNode {
    pub name: Option<String>,
    /// Index kind placed between CREATE and INDEX, e.g. UNIQUE or FULLTEXT.
    pub kind: Option<String>,
    pub algorithm: Option<String>,
    pub parser: Option<String>,
    pub columns: Vec<Node>,
}
