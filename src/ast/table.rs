//! Table definitions and the query starters hanging off them.

use serde::{Deserialize, Serialize};

use super::column::{Column, ColumnNode};
use super::expr::IntoNodeSeq;
use super::node::{CreateIndexNode, CreateNode, JoinKind, JoinNode, Node};
use super::query::Query;

/// Action taken on the referencing rows when the referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    pub fn keyword(self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// A table-level foreign key, for compound keys or explicitly named
/// constraints. Column-level keys live on [`super::column::ForeignRef`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignKeyNode {
    pub name: Option<String>,
    pub table: String,
    pub schema: Option<String>,
    pub columns: Vec<String>,
    pub ref_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

/// A table definition. Cheap to clone; handed-out columns carry a copy so
/// references render fully qualified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    name: String,
    schema: Option<String>,
    alias: Option<String>,
    temporary: bool,
    engine: Option<String>,
    charset: Option<String>,
    columns: Vec<ColumnNode>,
    foreign_keys: Vec<ForeignKeyNode>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            ..Table::default()
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns
            .extend(columns.into_iter().map(Column::into_column_node));
        self
    }

    pub fn foreign_key(mut self, key: ForeignKeyNode) -> Self {
        self.foreign_keys.push(key);
        self
    }

    /// A copy of this table under an alias. Column references taken from the
    /// aliased copy qualify with the alias, and a SELECT of the aliased table
    /// renders `"name" AS "alias"`.
    pub fn as_alias(&self, alias: impl Into<String>) -> Table {
        let mut table = self.clone();
        table.alias = Some(alias.into());
        table
    }

    pub fn table_name(&self) -> &str {
        &self.name
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine.as_deref()
    }

    pub fn charset_name(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn defined_columns(&self) -> &[ColumnNode] {
        &self.columns
    }

    pub fn foreign_keys(&self) -> &[ForeignKeyNode] {
        &self.foreign_keys
    }

    /// The name a column reference qualifies with: the alias when set.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Look up a defined column by property or name.
    pub fn get(&self, name: &str) -> Option<Column> {
        self.columns
            .iter()
            .find(|c| c.property == name || c.name == name)
            .map(|node| {
                let mut node = node.clone();
                node.table = Some(self.clone());
                Column::from_node(node)
            })
    }

    /// A reference to a column of this table. Falls back to a bare column
    /// when the name is not part of the definition.
    pub fn col(&self, name: &str) -> Column {
        self.get(name).unwrap_or_else(|| {
            let mut column = Column::new(name);
            column = column.table_ref(self.clone());
            column
        })
    }

    /// A `table.*` reference.
    pub fn star(&self) -> Column {
        let mut column = Column::new("*");
        column = column.table_ref(self.clone());
        column.starred()
    }

    // Query starters.

    fn query(&self) -> Query {
        Query::for_table(self.clone())
    }

    pub fn select(&self, items: impl IntoNodeSeq) -> Query {
        self.query().select(items)
    }

    pub fn insert(&self, columns: Vec<Column>) -> Query {
        self.query().insert(columns)
    }

    pub fn replace(&self, columns: Vec<Column>) -> Query {
        self.query().replace(columns)
    }

    pub fn update(&self, assignments: Vec<Column>) -> Query {
        self.query().update(assignments)
    }

    pub fn delete(&self) -> Query {
        self.query().delete()
    }

    /// DELETE naming the tables to delete from, for multi-table deletes.
    pub fn delete_tables(&self, tables: Vec<&Table>) -> Query {
        self.query().delete_tables(tables)
    }

    pub fn create(&self) -> Query {
        self.query().push(Node::Create(CreateNode {
            temporary: self.temporary,
            nodes: Vec::new(),
        }))
    }

    pub fn drop(&self) -> Query {
        self.query().push(Node::Drop(vec![Node::Table(self.clone())]))
    }

    pub fn alter(&self) -> Query {
        self.query().push(Node::Alter(Vec::new()))
    }

    pub fn truncate(&self) -> Query {
        self.query()
            .push(Node::Truncate(vec![Node::Table(self.clone())]))
    }

    /// A statement listing the table's indexes, dialect specific.
    pub fn indexes(&self) -> Query {
        self.query().push(Node::Indexes)
    }

    pub fn create_index(&self, name: impl Into<String>) -> IndexBuilder {
        IndexBuilder {
            table: self.clone(),
            node: CreateIndexNode {
                name: Some(name.into()),
                ..CreateIndexNode::default()
            },
        }
    }

    /// An index whose name is derived from the table and column names.
    pub fn index(&self) -> IndexBuilder {
        IndexBuilder {
            table: self.clone(),
            node: CreateIndexNode::default(),
        }
    }

    pub fn drop_index(&self, name: impl Into<String>) -> Query {
        self.query().push(Node::DropIndex { name: name.into() })
    }

    fn join_with(&self, kind: JoinKind, other: &Table) -> JoinNode {
        JoinNode {
            kind,
            from: Box::new(Node::Table(self.clone())),
            to: Box::new(Node::Table(other.clone())),
            on: None,
        }
    }

    pub fn join(&self, other: &Table) -> JoinNode {
        self.join_with(JoinKind::Inner, other)
    }

    pub fn left_join(&self, other: &Table) -> JoinNode {
        self.join_with(JoinKind::Left, other)
    }

    pub fn right_join(&self, other: &Table) -> JoinNode {
        self.join_with(JoinKind::Right, other)
    }

    pub fn full_join(&self, other: &Table) -> JoinNode {
        self.join_with(JoinKind::Full, other)
    }

    pub fn cross_join(&self, other: &Table) -> JoinNode {
        JoinNode {
            kind: JoinKind::Cross,
            from: Box::new(Node::Table(self.clone())),
            to: Box::new(Node::Table(other.clone())),
            on: None,
        }
    }
}

impl From<Table> for Node {
    fn from(table: Table) -> Self {
        Node::Table(table)
    }
}

impl From<&Table> for Node {
    fn from(table: &Table) -> Self {
        Node::Table(table.clone())
    }
}

impl JoinNode {
    fn chain(self, kind: JoinKind, other: &Table) -> JoinNode {
        JoinNode {
            kind,
            from: Box::new(Node::Join(self)),
            to: Box::new(Node::Table(other.clone())),
            on: None,
        }
    }

    pub fn join(self, other: &Table) -> JoinNode {
        self.chain(JoinKind::Inner, other)
    }

    pub fn left_join(self, other: &Table) -> JoinNode {
        self.chain(JoinKind::Left, other)
    }

    pub fn right_join(self, other: &Table) -> JoinNode {
        self.chain(JoinKind::Right, other)
    }
}

impl From<JoinNode> for Node {
    fn from(join: JoinNode) -> Self {
        Node::Join(join)
    }
}

/// Builder for CREATE INDEX statements.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    table: Table,
    node: CreateIndexNode,
}

impl IndexBuilder {
    pub fn unique(mut self) -> Self {
        self.node.kind = Some("UNIQUE".to_string());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.node.kind = Some(kind.into());
        self
    }

    pub fn using(mut self, algorithm: impl Into<String>) -> Self {
        self.node.algorithm = Some(algorithm.into());
        self
    }

    pub fn parser(mut self, parser: impl Into<String>) -> Self {
        self.node.parser = Some(parser.into());
        self
    }

    pub fn columns(mut self, columns: impl IntoNodeSeq) -> Self {
        self.node.columns.extend(columns.into_nodes());
        self
    }

    pub fn build(self) -> Query {
        Query::for_table(self.table).push(Node::CreateIndex(self.node))
    }
}
