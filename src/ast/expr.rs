//! Expression operators and node conversions.
//!
//! Plain Rust values convert into parameter nodes, so `col.equals(42)`
//! renders a placeholder and collects `42` into the bound values.

use super::column::Column;
use super::node::{BinaryRhs, Direction, InList, JoinNode, Node, OrderByValueNode};
use super::query::Query;
use super::table::Table;
use super::values::Value;

macro_rules! impl_param_from {
    ($($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for Node {
                fn from(v: $t) -> Node {
                    Node::Parameter {
                        value: v.into(),
                        explicit: false,
                    }
                }
            }
        )+
    };
}

impl_param_from!(bool, i32, i64, f64, &str, String, Value);

/// One or more nodes, for clause methods that accept a single expression,
/// a tuple, or a vector.
pub trait IntoNodeSeq {
    fn into_nodes(self) -> Vec<Node>;
}

impl IntoNodeSeq for Node {
    fn into_nodes(self) -> Vec<Node> {
        vec![self]
    }
}

impl IntoNodeSeq for Column {
    fn into_nodes(self) -> Vec<Node> {
        vec![self.into()]
    }
}

impl IntoNodeSeq for &Column {
    fn into_nodes(self) -> Vec<Node> {
        vec![self.into()]
    }
}

impl IntoNodeSeq for Query {
    fn into_nodes(self) -> Vec<Node> {
        vec![self.into()]
    }
}

impl IntoNodeSeq for Table {
    fn into_nodes(self) -> Vec<Node> {
        vec![self.into()]
    }
}

impl IntoNodeSeq for &Table {
    fn into_nodes(self) -> Vec<Node> {
        vec![self.into()]
    }
}

impl IntoNodeSeq for JoinNode {
    fn into_nodes(self) -> Vec<Node> {
        vec![self.into()]
    }
}

impl IntoNodeSeq for () {
    fn into_nodes(self) -> Vec<Node> {
        Vec::new()
    }
}

impl<T: Into<Node>> IntoNodeSeq for Vec<T> {
    fn into_nodes(self) -> Vec<Node> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! impl_node_seq_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<Node>),+> IntoNodeSeq for ($($name,)+) {
            fn into_nodes(self) -> Vec<Node> {
                #[allow(non_snake_case)]
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

impl_node_seq_tuple!(A, B);
impl_node_seq_tuple!(A, B, C);
impl_node_seq_tuple!(A, B, C, D);
impl_node_seq_tuple!(A, B, C, D, E);
impl_node_seq_tuple!(A, B, C, D, E, F);
impl_node_seq_tuple!(A, B, C, D, E, F, G);
impl_node_seq_tuple!(A, B, C, D, E, F, G, H);

/// Operator methods shared by columns, subqueries and composed nodes.
pub trait Expression: Into<Node> + Sized {
    fn binary(self, operator: &str, right: impl Into<Node>) -> Node {
        Node::Binary {
            left: Box::new(self.into()),
            operator: operator.to_string(),
            right: BinaryRhs::Node(Box::new(right.into())),
        }
    }

    fn equals(self, other: impl Into<Node>) -> Node {
        self.binary("=", other)
    }

    fn not_equals(self, other: impl Into<Node>) -> Node {
        self.binary("<>", other)
    }

    fn gt(self, other: impl Into<Node>) -> Node {
        self.binary(">", other)
    }

    fn gte(self, other: impl Into<Node>) -> Node {
        self.binary(">=", other)
    }

    fn lt(self, other: impl Into<Node>) -> Node {
        self.binary("<", other)
    }

    fn lte(self, other: impl Into<Node>) -> Node {
        self.binary("<=", other)
    }

    fn like(self, pattern: impl Into<Node>) -> Node {
        self.binary("LIKE", pattern)
    }

    fn not_like(self, pattern: impl Into<Node>) -> Node {
        self.binary("NOT LIKE", pattern)
    }

    fn ilike(self, pattern: impl Into<Node>) -> Node {
        self.binary("ILIKE", pattern)
    }

    fn plus(self, other: impl Into<Node>) -> Node {
        self.binary("+", other)
    }

    fn minus(self, other: impl Into<Node>) -> Node {
        self.binary("-", other)
    }

    fn multiply(self, other: impl Into<Node>) -> Node {
        self.binary("*", other)
    }

    fn divide(self, other: impl Into<Node>) -> Node {
        self.binary("/", other)
    }

    fn modulo(self, other: impl Into<Node>) -> Node {
        self.binary("%", other)
    }

    fn concat(self, other: impl Into<Node>) -> Node {
        self.binary("||", other)
    }

    /// Full-text match, rewritten per dialect from the `@@` form.
    fn matches(self, other: impl Into<Node>) -> Node {
        self.binary("@@", other)
    }

    fn and(self, other: impl Into<Node>) -> Node {
        self.binary("AND", other)
    }

    fn or(self, other: impl Into<Node>) -> Node {
        self.binary("OR", other)
    }

    fn is_null(self) -> Node {
        Node::Postfix {
            operand: Box::new(self.into()),
            operator: "IS NULL".to_string(),
        }
    }

    fn is_not_null(self) -> Node {
        Node::Postfix {
            operand: Box::new(self.into()),
            operator: "IS NOT NULL".to_string(),
        }
    }

    /// IN over an explicit list. NULL entries become IS NULL checks and an
    /// empty list collapses to a constant-false predicate.
    fn in_list(self, items: impl IntoNodeSeq) -> Node {
        Node::In {
            left: Box::new(self.into()),
            negated: false,
            right: InList::List(items.into_nodes()),
        }
    }

    fn not_in_list(self, items: impl IntoNodeSeq) -> Node {
        Node::In {
            left: Box::new(self.into()),
            negated: true,
            right: InList::List(items.into_nodes()),
        }
    }

    /// IN over a subquery or other expression.
    fn in_expr(self, expr: impl Into<Node>) -> Node {
        Node::In {
            left: Box::new(self.into()),
            negated: false,
            right: InList::Expr(Box::new(expr.into())),
        }
    }

    fn not_in_expr(self, expr: impl Into<Node>) -> Node {
        Node::In {
            left: Box::new(self.into()),
            negated: true,
            right: InList::Expr(Box::new(expr.into())),
        }
    }

    fn between(self, low: impl Into<Node>, high: impl Into<Node>) -> Node {
        Node::Ternary {
            left: Box::new(self.into()),
            operator: "BETWEEN".to_string(),
            middle: Box::new(low.into()),
            separator: "AND".to_string(),
            right: Box::new(high.into()),
        }
    }

    fn not_between(self, low: impl Into<Node>, high: impl Into<Node>) -> Node {
        Node::Ternary {
            left: Box::new(self.into()),
            operator: "NOT BETWEEN".to_string(),
            middle: Box::new(low.into()),
            separator: "AND".to_string(),
            right: Box::new(high.into()),
        }
    }

    fn cast(self, data_type: impl Into<String>) -> Node {
        Node::Cast {
            value: Box::new(self.into()),
            data_type: data_type.into(),
        }
    }

    /// Array element access, `"col"[index]`.
    fn at(self, index: impl Into<Node>) -> Node {
        Node::At {
            value: Box::new(self.into()),
            index: Box::new(index.into()),
        }
    }

    /// Array slice access, `"col"[start:end]`.
    fn slice(self, start: impl Into<Node>, end: impl Into<Node>) -> Node {
        Node::Slice {
            value: Box::new(self.into()),
            start: Box::new(start.into()),
            end: Box::new(end.into()),
        }
    }

    /// Alias an arbitrary expression in output position.
    fn alias(self, alias: impl Into<String>) -> Node {
        Node::Alias {
            value: Box::new(self.into()),
            alias: alias.into(),
        }
    }

    fn descending(self) -> Node {
        Node::OrderByValue(OrderByValueNode {
            value: Box::new(self.into()),
            direction: Some(Direction::Desc),
        })
    }

    fn ascending(self) -> Node {
        Node::OrderByValue(OrderByValueNode {
            value: Box::new(self.into()),
            direction: Some(Direction::Asc),
        })
    }
}

impl Expression for Node {}
impl Expression for Column {}
impl Expression for Query {}
