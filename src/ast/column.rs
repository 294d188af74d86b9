//! Column definitions and column references.
//!
//! A [`Column`] doubles as a schema definition (data type, constraints) and
//! as an expression handle inside queries. [`ColumnNode`] is the plain data
//! the renderer consumes.

use serde::{Deserialize, Serialize};

use super::node::Node;
use super::table::{ReferentialAction, Table};
use super::values::Value;

/// A column reference with optional schema-definition attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnNode {
    pub name: String,
    /// The name used to refer to the column from the builder API. Defaults
    /// to `name`; when they differ, SELECT output is aliased to `property`.
    pub property: String,
    pub alias: Option<String>,
    pub data_type: Option<String>,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    pub default_value: Option<Value>,
    pub references: Option<ForeignRef>,
    pub star: bool,
    pub aggregator: Option<String>,
    pub distinct: bool,
    pub as_array: bool,
    pub constant_value: Option<Value>,
    pub subfield_of: Option<Box<ColumnNode>>,
    pub table: Option<Table>,
    pub value: Option<Box<Node>>,
}

/// A column-level foreign key. Table and column are validated at render
/// time so a partially built reference fails with a clear error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignRef {
    pub table: Option<String>,
    pub column: Option<String>,
    pub constraint: Option<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignRef {
    pub fn is_empty(&self) -> bool {
        self.table.is_none()
            && self.column.is_none()
            && self.constraint.is_none()
            && self.on_delete.is_none()
            && self.on_update.is_none()
    }
}

/// Builder handle around a [`ColumnNode`].
#[derive(Debug, Clone, Default)]
pub struct Column {
    node: ColumnNode,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Column {
            node: ColumnNode {
                property: name.clone(),
                name,
                ..ColumnNode::default()
            },
        }
    }

    pub(crate) fn from_node(node: ColumnNode) -> Self {
        Column { node }
    }

    /// A constant value rendered as a parameter, aliasable in output
    /// position.
    pub fn constant(value: impl Into<Value>) -> Self {
        let mut column = Column::new("constant");
        column.node.constant_value = Some(value.into());
        column
    }

    pub fn node(&self) -> &ColumnNode {
        &self.node
    }

    pub(crate) fn into_column_node(self) -> ColumnNode {
        self.node
    }

    pub(crate) fn table_ref(mut self, table: Table) -> Self {
        self.node.table = Some(table);
        self
    }

    pub(crate) fn starred(mut self) -> Self {
        self.node.star = true;
        self
    }

    // Schema-definition attributes.

    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.node.data_type = Some(data_type.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.node.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.node.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.node.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.node.default_value = Some(value.into());
        self
    }

    pub fn references(mut self, reference: ForeignRef) -> Self {
        self.node.references = Some(reference);
        self
    }

    /// Set the builder-side name. When it differs from the SQL name the
    /// column is selected as `"name" AS "property"`.
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.node.property = property.into();
        self
    }

    // Query-side attributes.

    /// Alias the column in SELECT or RETURNING output.
    pub fn as_alias(mut self, alias: impl Into<String>) -> Self {
        self.node.alias = Some(alias.into());
        self
    }

    /// Assign a value, for INSERT rows and UPDATE assignments.
    pub fn value(mut self, value: impl Into<Node>) -> Self {
        self.node.value = Some(Box::new(value.into()));
        self
    }

    fn aggregate(mut self, name: &str) -> Self {
        self.node.aggregator = Some(name.to_string());
        self
    }

    pub fn count(self) -> Self {
        self.aggregate("COUNT")
    }

    pub fn sum(self) -> Self {
        self.aggregate("SUM")
    }

    pub fn avg(self) -> Self {
        self.aggregate("AVG")
    }

    pub fn min(self) -> Self {
        self.aggregate("MIN")
    }

    pub fn max(self) -> Self {
        self.aggregate("MAX")
    }

    /// DISTINCT inside an aggregate, e.g. `COUNT(DISTINCT "col")`.
    pub fn distinct(mut self) -> Self {
        self.node.distinct = true;
        self
    }

    /// Aggregate into an array with the dialect's array_agg equivalent.
    pub fn as_array(mut self) -> Self {
        self.node.as_array = true;
        self
    }

    /// Navigate into a composite-typed column, rendered as
    /// `("outer")."inner"`.
    pub fn subfield(self, name: impl Into<String>) -> Self {
        let name = name.into();
        Column {
            node: ColumnNode {
                property: name.clone(),
                name,
                subfield_of: Some(Box::new(self.node)),
                ..ColumnNode::default()
            },
        }
    }
}

impl From<Column> for Node {
    fn from(column: Column) -> Self {
        Node::Column(column.node)
    }
}

impl From<&Column> for Node {
    fn from(column: &Column) -> Self {
        Node::Column(column.node.clone())
    }
}
