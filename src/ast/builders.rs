//! Free-standing constructors for queries and expression nodes.

use super::column::Column;
use super::expr::IntoNodeSeq;
use super::node::{CaseNode, LiteralNode, Node};
use super::query::Query;
use super::values::Value;

/// Start a query without a base table, e.g. selecting from a subquery.
pub fn select(items: impl IntoNodeSeq) -> Query {
    Query::new().select(items)
}

/// Raw SQL text, emitted verbatim.
pub fn text(sql: impl Into<String>) -> Node {
    Node::Text(sql.into())
}

/// A literal fragment, emitted verbatim but aliasable in output position.
pub fn literal(sql: impl Into<String>) -> Node {
    Node::Literal(LiteralNode {
        literal: sql.into(),
        alias: None,
    })
}

/// A parameter node, rendered as a placeholder.
pub fn param(value: impl Into<Value>) -> Node {
    Node::Parameter {
        value: value.into(),
        explicit: false,
    }
}

/// A constant value column, e.g. `constant(7).as_alias("version")`.
pub fn constant(value: impl Into<Value>) -> Column {
    Column::constant(value)
}

/// An ARRAY[..] expression.
pub fn array(items: impl IntoNodeSeq) -> Node {
    Node::ArrayCall(items.into_nodes())
}

/// A ROW(..) expression.
pub fn row(items: impl IntoNodeSeq) -> Node {
    Node::RowCall(items.into_nodes())
}

/// A function call by name. Names are rewritten per dialect where needed,
/// e.g. `array_agg` and the date-part extractors.
pub fn function(name: impl Into<String>, args: impl IntoNodeSeq) -> Node {
    Node::FunctionCall {
        name: name.into(),
        args: args.into_nodes(),
    }
}

pub fn current_timestamp() -> Node {
    function("CURRENT_TIMESTAMP", ())
}

/// A CASE expression from parallel WHEN and THEN lists.
pub fn case(whens: impl IntoNodeSeq, thens: impl IntoNodeSeq, else_value: Option<Node>) -> Node {
    Node::Case(CaseNode {
        whens: whens.into_nodes(),
        thens: thens.into_nodes(),
        else_value: else_value.map(Box::new),
    })
}
