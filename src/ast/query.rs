//! The query builder. A [`Query`] accumulates clause nodes in call order;
//! the renderer reorders them into action, target and filter groups.

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::expr::IntoNodeSeq;
use super::node::{
    BinaryRhs, InsertNode, Node, OnConflictNode, OrderByValueNode, SelectNode,
};
use super::table::Table;
use super::values::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    pub table: Option<Table>,
    /// Alias used when this query appears as a subquery.
    pub alias: Option<String>,
    pub nodes: Vec<Node>,
    where_idx: Option<usize>,
    select_idx: Option<usize>,
    insert_idx: Option<usize>,
    order_idx: Option<usize>,
    group_idx: Option<usize>,
    having_idx: Option<usize>,
    returning_idx: Option<usize>,
}

fn combine(left: Node, operator: &str, right: Node) -> Node {
    Node::Binary {
        left: Box::new(left),
        operator: operator.to_string(),
        right: BinaryRhs::Node(Box::new(right)),
    }
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub(crate) fn for_table(table: Table) -> Self {
        Query {
            table: Some(table),
            ..Query::default()
        }
    }

    pub(crate) fn push(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append an arbitrary node, e.g. a subquery feeding an INSERT.
    pub fn add(self, node: impl Into<Node>) -> Self {
        self.push(node.into())
    }

    /// Record a value in the bound sequence without rendering a
    /// placeholder, for statement text that fixes the position itself.
    pub fn parameter(self, value: impl Into<Value>) -> Self {
        self.push(Node::Parameter {
            value: value.into(),
            explicit: true,
        })
    }

    pub fn select(mut self, items: impl IntoNodeSeq) -> Self {
        let items = items.into_nodes();
        match self.select_idx {
            Some(i) => {
                if let Node::Select(select) = &mut self.nodes[i] {
                    select.nodes.extend(items);
                }
                self
            }
            None => {
                self.select_idx = Some(self.nodes.len());
                self.push(Node::Select(SelectNode { nodes: items }))
            }
        }
    }

    pub fn from(self, source: impl Into<Node>) -> Self {
        self.push(Node::From(vec![source.into()]))
    }

    /// Add a WHERE condition. Successive conditions are ANDed together.
    pub fn where_(mut self, condition: impl Into<Node>) -> Self {
        let node = condition.into();
        match self.where_idx {
            Some(i) => {
                if let Node::Where(children) = &mut self.nodes[i] {
                    match children.pop() {
                        Some(left) => children.push(combine(left, "AND", node)),
                        None => children.push(node),
                    }
                }
                self
            }
            None => {
                self.where_idx = Some(self.nodes.len());
                self.push(Node::Where(vec![node]))
            }
        }
    }

    pub fn and(self, condition: impl Into<Node>) -> Self {
        self.where_(condition)
    }

    pub fn or(mut self, condition: impl Into<Node>) -> Self {
        let node = condition.into();
        match self.where_idx {
            Some(i) => {
                if let Node::Where(children) = &mut self.nodes[i] {
                    match children.pop() {
                        Some(left) => children.push(combine(left, "OR", node)),
                        None => children.push(node),
                    }
                }
                self
            }
            None => self.where_(node),
        }
    }

    pub fn order(mut self, items: impl IntoNodeSeq) -> Self {
        let items = items.into_nodes();
        match self.order_idx {
            Some(i) => {
                if let Node::OrderBy(children) = &mut self.nodes[i] {
                    children.extend(items);
                }
                self
            }
            None => {
                self.order_idx = Some(self.nodes.len());
                self.push(Node::OrderBy(items))
            }
        }
    }

    pub fn group(mut self, items: impl IntoNodeSeq) -> Self {
        let items = items.into_nodes();
        match self.group_idx {
            Some(i) => {
                if let Node::GroupBy(children) = &mut self.nodes[i] {
                    children.extend(items);
                }
                self
            }
            None => {
                self.group_idx = Some(self.nodes.len());
                self.push(Node::GroupBy(items))
            }
        }
    }

    pub fn having(mut self, items: impl IntoNodeSeq) -> Self {
        let items = items.into_nodes();
        match self.having_idx {
            Some(i) => {
                if let Node::Having(children) = &mut self.nodes[i] {
                    children.extend(items);
                }
                self
            }
            None => {
                self.having_idx = Some(self.nodes.len());
                self.push(Node::Having(items))
            }
        }
    }

    pub fn limit(self, count: impl Into<Node>) -> Self {
        let node = count.into();
        self.push(Node::Limit(Box::new(node)))
    }

    pub fn offset(self, count: impl Into<Node>) -> Self {
        let node = count.into();
        self.push(Node::Offset(Box::new(node)))
    }

    pub fn distinct(self) -> Self {
        self.push(Node::Distinct)
    }

    /// PostgreSQL DISTINCT ON. Placed at the head of the select list.
    pub fn distinct_on(mut self, items: impl IntoNodeSeq) -> Self {
        let node = Node::DistinctOn(items.into_nodes());
        match self.select_idx {
            Some(i) => {
                if let Node::Select(select) = &mut self.nodes[i] {
                    select.nodes.insert(0, node);
                }
                self
            }
            None => {
                self.select_idx = Some(self.nodes.len());
                self.push(Node::Select(SelectNode { nodes: vec![node] }))
            }
        }
    }

    /// Add an INSERT row. Successive calls append rows; rows that skip a
    /// column fall back to DEFAULT where the dialect allows it.
    pub fn insert(mut self, columns: Vec<Column>) -> Self {
        match self.insert_idx {
            Some(i) => {
                if let Node::Insert(node) | Node::Replace(node) = &mut self.nodes[i] {
                    node.add_row(columns);
                }
                self
            }
            None => {
                self.insert_idx = Some(self.nodes.len());
                let mut node = InsertNode::default();
                node.add_row(columns);
                self.push(Node::Insert(node))
            }
        }
    }

    pub(crate) fn replace(mut self, columns: Vec<Column>) -> Self {
        self.insert_idx = Some(self.nodes.len());
        let mut node = InsertNode::default();
        node.add_row(columns);
        self.push(Node::Replace(node))
    }

    pub fn update(self, assignments: Vec<Column>) -> Self {
        self.push(Node::Update(
            assignments.into_iter().map(Column::into_column_node).collect(),
        ))
    }

    pub fn delete(self) -> Self {
        self.push(Node::Delete(Vec::new()))
    }

    /// DELETE naming the tables to delete from, for multi-table deletes.
    pub fn delete_tables(self, tables: Vec<&Table>) -> Self {
        self.push(Node::Delete(
            tables.into_iter().map(|t| Node::Table(t.clone())).collect(),
        ))
    }

    pub fn returning(mut self, items: impl IntoNodeSeq) -> Self {
        let items = items.into_nodes();
        match self.returning_idx {
            Some(i) => {
                if let Node::Returning(children) = &mut self.nodes[i] {
                    children.extend(items);
                }
                self
            }
            None => {
                self.returning_idx = Some(self.nodes.len());
                self.push(Node::Returning(items))
            }
        }
    }

    pub fn on_conflict(self, conflict: OnConflictNode) -> Self {
        self.push(Node::OnConflict(conflict))
    }

    /// MySQL ON DUPLICATE KEY UPDATE with the given assignments.
    pub fn on_duplicate(self, assignments: Vec<Column>) -> Self {
        self.push(Node::OnDuplicate(
            assignments.into_iter().map(Column::into_column_node).collect(),
        ))
    }

    pub fn for_update(self) -> Self {
        self.push(Node::ForUpdate)
    }

    pub fn for_share(self) -> Self {
        self.push(Node::ForShare)
    }

    pub fn create_view(self, name: impl Into<String>) -> Self {
        self.push(Node::CreateView(name.into()))
    }

    /// Alias this query when used as a subquery.
    pub fn as_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Wrap this query in an EXISTS predicate.
    pub fn exists(self) -> Node {
        Node::Prefix {
            operator: "EXISTS".to_string(),
            operand: Box::new(Node::Query(Box::new(self))),
        }
    }

    pub fn not_exists(self) -> Node {
        Node::Prefix {
            operator: "NOT EXISTS".to_string(),
            operand: Box::new(Node::Query(Box::new(self))),
        }
    }

    fn with_first(mut self, f: impl FnOnce(&mut Node)) -> Self {
        if let Some(first) = self.nodes.first_mut() {
            f(first);
        }
        self
    }

    pub fn if_exists(self) -> Self {
        self.with_first(|node| {
            if let Node::Drop(children) = node {
                children.insert(0, Node::IfExists);
            }
        })
    }

    pub fn if_not_exists(self) -> Self {
        self.with_first(|node| {
            if let Node::Create(create) = node {
                create.nodes.insert(0, Node::IfNotExists);
            }
        })
    }

    pub fn or_ignore(self) -> Self {
        self.with_first(|node| {
            if let Node::Insert(insert) | Node::Replace(insert) = node {
                insert.modifiers.push(Node::OrIgnore);
            }
        })
    }

    pub fn cascade(self) -> Self {
        self.with_first(|node| {
            if let Node::Drop(children) = node {
                children.push(Node::Cascade);
            }
        })
    }

    pub fn restrict(self) -> Self {
        self.with_first(|node| {
            if let Node::Drop(children) = node {
                children.push(Node::Restrict);
            }
        })
    }

    pub fn add_column(self, column: Column) -> Self {
        self.with_first(|node| {
            if let Node::Alter(children) = node {
                children.push(Node::AddColumn(column.into_column_node()));
            }
        })
    }

    pub fn drop_column(self, column: Column) -> Self {
        self.with_first(|node| {
            if let Node::Alter(children) = node {
                children.push(Node::DropColumn(column.into_column_node()));
            }
        })
    }

    pub fn rename_column(self, old: Column, new: Column) -> Self {
        self.with_first(|node| {
            if let Node::Alter(children) = node {
                children.push(Node::RenameColumn {
                    old: Box::new(old.into_column_node()),
                    new: Box::new(new.into_column_node()),
                });
            }
        })
    }

    /// ALTER TABLE .. RENAME TO the given name.
    pub fn rename(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.with_first(|node| {
            if let Node::Alter(children) = node {
                children.push(Node::Rename(name));
            }
        })
    }
}

impl From<Query> for Node {
    fn from(query: Query) -> Self {
        Node::Query(Box::new(query))
    }
}

/// Order a bare node explicitly, e.g. `descending(expr)`.
pub fn descending(value: impl Into<Node>) -> Node {
    Node::OrderByValue(OrderByValueNode {
        value: Box::new(value.into()),
        direction: Some(super::node::Direction::Desc),
    })
}

pub fn ascending(value: impl Into<Node>) -> Node {
    Node::OrderByValue(OrderByValueNode {
        value: Box::new(value.into()),
        direction: Some(super::node::Direction::Asc),
    })
}
