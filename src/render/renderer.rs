//! The rendering walk.
//!
//! A query renders to a flat list of SQL fragments joined by single spaces.
//! Parameters are collected into one buffer shared with any subqueries, so
//! placeholder numbering follows textual order.

use crate::ast::{
    BinaryRhs, CaseNode, ColumnNode, CreateIndexNode, CreateNode, Direction, ForeignKeyNode,
    ForeignRef, InList, InsertNode, Node, OnConflictNode, Query, SelectNode, Table, Value,
};
use crate::error::{Result, SqlError};

use super::dialect::DialectConfig;
use super::traits::{literal_text, AlterStyle, DialectRules, Feature};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Clause {
    #[default]
    None,
    Select,
    Returning,
    InsertColumns,
    UpdateTarget,
}

/// Context handed down the walk. Copied, never mutated in place, so a
/// child's context cannot leak into its siblings.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    clause: Clause,
    in_cast: bool,
    in_function: bool,
    in_case: bool,
    in_expression: bool,
    no_paren_subquery: bool,
}

impl Scope {
    fn clause(self, clause: Clause) -> Self {
        Scope { clause, ..self }
    }

    fn expression(self) -> Self {
        Scope {
            in_expression: true,
            ..self
        }
    }

    /// Whether column aliases apply in this position.
    fn aliasing(self) -> bool {
        matches!(self.clause, Clause::Select | Clause::Returning)
            && !self.in_cast
            && !self.in_function
            && !self.in_case
    }
}

pub(crate) struct Renderer<'a> {
    rules: &'static dyn DialectRules,
    config: &'a DialectConfig,
    params: Vec<Value>,
    inline: bool,
    tables: Vec<Option<Table>>,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(
        rules: &'static dyn DialectRules,
        config: &'a DialectConfig,
        inline: bool,
    ) -> Self {
        Renderer {
            rules,
            config,
            params: Vec::new(),
            inline,
            tables: Vec::new(),
        }
    }

    pub(crate) fn run(mut self, query: &Query) -> Result<(String, Vec<Value>)> {
        let fragments = self.visit_query(query)?;
        Ok((fragments.join(" "), self.params))
    }

    fn check(&self, feature: Feature) -> Result<()> {
        if self.rules.unsupported().contains(&feature) {
            Err(SqlError::unsupported(self.rules.name(), feature.describe()))
        } else {
            Ok(())
        }
    }

    fn quote(&self, ident: &str) -> Result<String> {
        self.rules.quote_identifier(ident)
    }

    fn current_table(&self) -> Option<&Table> {
        self.tables.last().and_then(Option::as_ref)
    }

    fn require_table(&self, what: &str) -> Result<Table> {
        self.current_table()
            .cloned()
            .ok_or_else(|| SqlError::missing(format!("{what} requires a table")))
    }

    fn parameter_text(&mut self, value: &Value) -> Result<String> {
        if self.inline {
            literal_text(self.rules, value, self.config)
        } else {
            self.params.push(value.clone());
            Ok(self.rules.placeholder(self.params.len(), self.config))
        }
    }

    fn visit_joined(&mut self, node: &Node, scope: Scope) -> Result<String> {
        Ok(self.visit(node, scope)?.join(" "))
    }

    fn table_text(&mut self, table: &Table) -> Result<String> {
        self.visit_joined(&Node::Table(table.clone()), Scope::default())
    }

    // Query assembly

    fn visit_query(&mut self, query: &Query) -> Result<Vec<String>> {
        self.tables.push(query.table.clone());
        let result = self.visit_query_inner(query);
        self.tables.pop();
        result
    }

    fn visit_query_inner(&mut self, query: &Query) -> Result<Vec<String>> {
        // Subqueries feeding an INSERT or REPLACE render unparenthesized.
        let no_paren = matches!(
            query.nodes.first(),
            Some(Node::Insert(_) | Node::Replace(_))
        );
        let scope = Scope {
            no_paren_subquery: no_paren,
            ..Scope::default()
        };

        let mut actions: Vec<&Node> = Vec::new();
        let mut targets: Vec<&Node> = Vec::new();
        let mut filters: Vec<&Node> = Vec::new();
        let mut create_view: Option<&str> = None;
        let mut distinct = false;
        for node in &query.nodes {
            match node {
                Node::Select(_)
                | Node::Insert(_)
                | Node::Replace(_)
                | Node::Update(_)
                | Node::Delete(_)
                | Node::Create(_)
                | Node::Drop(_)
                | Node::Alter(_)
                | Node::Truncate(_)
                | Node::Indexes
                | Node::CreateIndex(_)
                | Node::DropIndex { .. } => actions.push(node),
                Node::From(_) => targets.push(node),
                Node::CreateView(name) => create_view = Some(name),
                Node::Distinct => distinct = true,
                _ => filters.push(node),
            }
        }

        // A query with no action is an implicit SELECT *.
        let synthesized_select;
        if actions.is_empty() {
            synthesized_select = Node::Select(SelectNode::default());
            actions.push(&synthesized_select);
        }

        let has_select = actions.iter().any(|n| matches!(n, Node::Select(_)));
        let has_delete = actions.iter().any(|n| matches!(n, Node::Delete(_)));
        let synthesized_from = if (has_select || has_delete) && targets.is_empty() {
            query
                .table
                .clone()
                .map(|t| Node::From(vec![Node::Table(t)]))
        } else {
            None
        };
        if let Some(from) = &synthesized_from {
            targets.push(from);
        }

        let mut out: Vec<String> = Vec::new();
        if let Some(name) = create_view {
            if !has_select {
                return Err(SqlError::missing("CREATE VIEW requires a SELECT"));
            }
            // Views cannot carry bind parameters; inline everything.
            self.inline = true;
            out.push("CREATE VIEW".to_string());
            out.push(self.quote(name)?);
            out.push("AS".to_string());
        }

        for node in actions {
            match node {
                Node::Select(select) => out.extend(self.visit_select(select, distinct, scope)?),
                other => out.extend(self.visit(other, scope)?),
            }
        }
        for (i, target) in targets.iter().enumerate() {
            if let Node::From(children) = target {
                out.extend(self.visit_from(children, i > 0, scope)?);
            }
        }
        for node in filters {
            out.extend(self.visit(node, scope)?);
        }

        self.rules.finish_query(&mut out);
        Ok(out)
    }

    // Node dispatch

    fn visit(&mut self, node: &Node, scope: Scope) -> Result<Vec<String>> {
        match node {
            Node::Query(sub) => self.visit_subquery(sub, scope),
            Node::Select(select) => self.visit_select(select, false, scope),
            Node::From(children) => self.visit_from(children, false, scope),
            Node::Where(children) => {
                let scope = scope.clause(Clause::None);
                let parts = children
                    .iter()
                    .map(|n| self.visit_joined(n, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(vec!["WHERE".to_string(), parts.join(", ")])
            }
            Node::OrderBy(children) => {
                let scope = scope.clause(Clause::None);
                let parts = children
                    .iter()
                    .map(|n| self.visit_joined(n, scope))
                    .collect::<Result<Vec<_>>>()?;
                let mut out = vec!["ORDER BY".to_string(), parts.join(", ")];
                if let Some(suffix) = self.rules.null_order_suffix(self.config) {
                    out.push(suffix.to_string());
                }
                Ok(out)
            }
            Node::OrderByValue(order) => {
                let text = self.visit_joined(&order.value, scope)?;
                Ok(vec![match order.direction {
                    Some(Direction::Asc) => format!("{text} ASC"),
                    Some(Direction::Desc) => format!("{text} DESC"),
                    None => text,
                }])
            }
            Node::GroupBy(children) => {
                let parts = children
                    .iter()
                    .map(|n| self.visit_joined(n, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(vec!["GROUP BY".to_string(), parts.join(", ")])
            }
            Node::Having(children) => {
                let parts = children
                    .iter()
                    .map(|n| self.visit_joined(n, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(vec!["HAVING".to_string(), parts.join(" AND ")])
            }
            Node::Limit(count) => {
                let text = self.visit_joined(count, scope)?;
                Ok(self.rules.limit_fragments(text))
            }
            Node::Offset(count) => {
                let text = self.visit_joined(count, scope)?;
                Ok(self.rules.offset_fragments(text))
            }
            Node::ForUpdate => {
                self.check(Feature::ForUpdate)?;
                Ok(vec!["FOR UPDATE".to_string()])
            }
            Node::ForShare => {
                self.check(Feature::ForShare)?;
                Ok(vec!["FOR SHARE".to_string()])
            }
            Node::Distinct => Ok(Vec::new()),
            Node::DistinctOn(children) => {
                let parts = children
                    .iter()
                    .map(|n| self.visit_joined(n, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(vec![format!("DISTINCT ON({})", parts.join(", "))])
            }
            Node::Join(join) => {
                let mut out = self.visit(&join.from, scope)?;
                out.push(join.kind.keyword().to_string());
                out.extend(self.visit(&join.to, scope)?);
                if let Some(on) = &join.on {
                    out.push("ON".to_string());
                    out.push(self.visit_joined(on, scope.clause(Clause::None))?);
                }
                Ok(out)
            }
            Node::Table(table) => self.visit_table(table),
            Node::Column(column) => self.visit_column(column, scope),
            Node::Parameter { value, explicit } => {
                if *explicit {
                    self.params.push(value.clone());
                    Ok(Vec::new())
                } else {
                    Ok(vec![self.parameter_text(value)?])
                }
            }
            Node::Literal(literal) => {
                let mut text = literal.literal.clone();
                if scope.aliasing() {
                    if let Some(alias) = &literal.alias {
                        text.push_str(self.rules.alias_separator());
                        text.push_str(&self.quote(alias)?);
                    }
                }
                Ok(vec![text])
            }
            Node::Text(sql) => Ok(vec![sql.clone()]),
            Node::Default => {
                self.check(Feature::InsertDefault)?;
                Ok(vec!["DEFAULT".to_string()])
            }
            Node::Alias { value, alias } => {
                let text = self.visit_joined(value, scope)?;
                Ok(vec![format!(
                    "{text}{}{}",
                    self.rules.alias_separator(),
                    self.quote(alias)?
                )])
            }
            Node::Binary {
                left,
                operator,
                right,
            } => self.visit_binary(left, operator, right, scope),
            Node::Prefix { operator, operand } => {
                let text = self.visit_joined(operand, scope.expression())?;
                Ok(vec![format!("({operator} {text})")])
            }
            Node::Postfix { operand, operator } => {
                let text = self.visit_joined(operand, scope.expression())?;
                Ok(vec![format!("({text} {operator})")])
            }
            Node::Ternary {
                left,
                operator,
                middle,
                separator,
                right,
            } => {
                let scope = scope.expression();
                let left = self.visit_joined(left, scope)?;
                let middle = self.visit_joined(middle, scope)?;
                let right = self.visit_joined(right, scope)?;
                Ok(vec![format!(
                    "({left} {operator} {middle} {separator} {right})"
                )])
            }
            Node::In {
                left,
                negated,
                right,
            } => self.visit_in(left, *negated, right, scope),
            Node::Case(case) => self.visit_case(case, scope),
            Node::Cast { value, data_type } => {
                let inner = Scope {
                    in_cast: true,
                    ..scope
                };
                let text = self.visit_joined(value, inner)?;
                Ok(vec![format!("CAST({text} AS {data_type})")])
            }
            Node::FunctionCall { name, args } => self.visit_function_call(name, args, scope),
            Node::ArrayCall(items) => {
                self.check(Feature::ArrayExpression)?;
                let parts = items
                    .iter()
                    .map(|n| self.visit_joined(n, scope.expression()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(vec![format!("ARRAY[{}]", parts.join(", "))])
            }
            Node::RowCall(items) => {
                let parts = items
                    .iter()
                    .map(|n| self.visit_joined(n, scope.expression()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(vec![format!("ROW({})", parts.join(", "))])
            }
            Node::At { value, index } => {
                let scope = scope.expression();
                let value = self.visit_joined(value, scope)?;
                let index = self.visit_joined(index, scope)?;
                Ok(vec![format!("({value}[{index}])")])
            }
            Node::Slice { value, start, end } => {
                let scope = scope.expression();
                let value = self.visit_joined(value, scope)?;
                let start = self.visit_joined(start, scope)?;
                let end = self.visit_joined(end, scope)?;
                Ok(vec![format!("({value}[{start}:{end}])")])
            }
            Node::Insert(insert) => self.visit_insert(insert, false, scope),
            Node::Replace(insert) => self.visit_insert(insert, true, scope),
            Node::Update(assignments) => self.visit_update(assignments, scope),
            Node::Delete(tables) => {
                let mut out = vec!["DELETE".to_string()];
                if !tables.is_empty() {
                    let parts = tables
                        .iter()
                        .map(|n| self.visit_joined(n, scope))
                        .collect::<Result<Vec<_>>>()?;
                    out.push(parts.join(", "));
                }
                Ok(out)
            }
            Node::Returning(children) => {
                self.check(Feature::Returning)?;
                let scope = scope.clause(Clause::Returning);
                let parts = children
                    .iter()
                    .map(|n| self.visit_joined(n, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(vec!["RETURNING".to_string(), parts.join(", ")])
            }
            Node::OnConflict(conflict) => self.visit_on_conflict(conflict),
            Node::OnDuplicate(assignments) => self.visit_on_duplicate(assignments, scope),
            Node::Create(create) => self.visit_create(create),
            Node::Drop(children) => self.visit_drop(children, scope),
            Node::Alter(children) => self.visit_alter(children),
            Node::Truncate(children) => {
                let mut out = vec![self.rules.truncate_keyword().to_string()];
                for node in children {
                    out.extend(self.visit(node, scope)?);
                }
                Ok(out)
            }
            Node::IfExists => Ok(vec!["IF EXISTS".to_string()]),
            Node::IfNotExists => Ok(vec!["IF NOT EXISTS".to_string()]),
            Node::Cascade => {
                self.check(Feature::Cascade)?;
                Ok(vec![self.rules.cascade_keyword().to_string()])
            }
            Node::Restrict => {
                self.check(Feature::Restrict)?;
                Ok(vec!["RESTRICT".to_string()])
            }
            Node::OrIgnore => {
                self.check(Feature::OrIgnore)?;
                Ok(vec!["OR IGNORE".to_string()])
            }
            Node::CreateView(name) => {
                Ok(vec!["CREATE VIEW".to_string(), self.quote(name)?, "AS".to_string()])
            }
            Node::Indexes => {
                let table = self.require_table("an index listing")?;
                let text = self.table_text(&table)?;
                Ok(self.rules.indexes_statement(&table, &text))
            }
            Node::CreateIndex(index) => self.visit_create_index(index),
            Node::DropIndex { name } => {
                let table = self.require_table("DROP INDEX")?;
                self.rules.drop_index_fragments(&table, name)
            }
            Node::AddColumn(_)
            | Node::DropColumn(_)
            | Node::RenameColumn { .. }
            | Node::Rename(_) => Err(SqlError::UnrecognizedNode(
                "ALTER clause outside ALTER TABLE",
            )),
            Node::ForeignKey(_) => Err(SqlError::UnrecognizedNode(
                "FOREIGN KEY outside CREATE TABLE",
            )),
        }
    }

    fn visit_subquery(&mut self, sub: &Query, scope: Scope) -> Result<Vec<String>> {
        let fragments = self.visit_query(sub)?;
        let text = fragments.join(" ");
        let alias = match &sub.alias {
            Some(a) => format!(" {}", self.quote(a)?),
            None => String::new(),
        };
        Ok(vec![if scope.no_paren_subquery {
            format!("{text}{alias}")
        } else {
            format!("({text}){alias}")
        }])
    }

    fn visit_select(
        &mut self,
        select: &SelectNode,
        distinct: bool,
        scope: Scope,
    ) -> Result<Vec<String>> {
        let scope = scope.clause(Clause::Select);
        let mut out = vec!["SELECT".to_string()];
        if distinct {
            out.push("DISTINCT".to_string());
        }
        let mut parts: Vec<String> = Vec::new();
        let mut distinct_on: Option<String> = None;
        for node in &select.nodes {
            match node {
                Node::DistinctOn(children) => {
                    let cols = children
                        .iter()
                        .map(|n| self.visit_joined(n, scope.clause(Clause::None)))
                        .collect::<Result<Vec<_>>>()?;
                    distinct_on = Some(format!("DISTINCT ON({})", cols.join(", ")));
                }
                other => parts.push(self.visit_joined(other, scope)?),
            }
        }
        if let Some(on) = distinct_on {
            out.push(on);
        }
        out.push(if parts.is_empty() {
            "*".to_string()
        } else {
            parts.join(", ")
        });
        Ok(out)
    }

    fn visit_from(
        &mut self,
        children: &[Node],
        continuation: bool,
        scope: Scope,
    ) -> Result<Vec<String>> {
        let mut out = vec![if continuation {
            ",".to_string()
        } else {
            "FROM".to_string()
        }];
        for node in children {
            out.extend(self.visit(node, scope.clause(Clause::None))?);
        }
        Ok(out)
    }

    fn visit_table(&mut self, table: &Table) -> Result<Vec<String>> {
        let mut text = match table.schema_name() {
            Some(schema) => format!(
                "{}.{}",
                self.quote(schema)?,
                self.quote(table.table_name())?
            ),
            None => self.quote(table.table_name())?,
        };
        if let Some(alias) = table.alias_name() {
            text.push_str(self.rules.alias_separator());
            text.push_str(&self.quote(alias)?);
        }
        Ok(vec![text])
    }

    fn visit_column(&mut self, column: &ColumnNode, scope: Scope) -> Result<Vec<String>> {
        // Constants render as parameters, aliasable like any projection.
        if let Some(value) = &column.constant_value {
            let mut text = self.parameter_text(value)?;
            if scope.aliasing() {
                if let Some(alias) = &column.alias {
                    text.push_str(self.rules.alias_separator());
                    text.push_str(&self.quote(alias)?);
                }
            }
            return Ok(vec![text]);
        }

        let unqualified = matches!(
            scope.clause,
            Clause::InsertColumns | Clause::UpdateTarget
        );
        let prefix = if unqualified {
            None
        } else {
            column
                .table
                .as_ref()
                .map(|t| self.quote(t.reference_name()))
                .transpose()?
        };

        // COUNT over a star collapses to COUNT(*).
        if column.star {
            if let Some(aggregator) = &column.aggregator {
                return self.finish_column(format!("{aggregator}(*)"), column, scope);
            }
            let text = self.star_text(column, prefix.as_deref(), scope)?;
            return Ok(vec![text]);
        }

        let base = match &column.subfield_of {
            Some(container) => {
                let outer = self.visit_joined(&Node::Column((**container).clone()), scope.expression())?;
                format!("({outer}).{}", self.quote(&column.name)?)
            }
            None => match &prefix {
                Some(p) => format!("{p}.{}", self.quote(&column.name)?),
                None => self.quote(&column.name)?,
            },
        };

        let text = if let Some(aggregator) = &column.aggregator {
            let inner = if column.distinct {
                format!("DISTINCT {base}")
            } else {
                base
            };
            format!("{aggregator}({inner})")
        } else if column.as_array {
            let function = self.rules.array_agg_function()?;
            let inner = if column.distinct {
                format!("DISTINCT {base}")
            } else {
                base
            };
            format!("{function}({inner})")
        } else {
            base
        };

        self.finish_column(text, column, scope)
    }

    /// Apply output aliasing: an explicit alias always, the property name
    /// only when it differs from the SQL name and the column stands alone.
    fn finish_column(
        &mut self,
        mut text: String,
        column: &ColumnNode,
        scope: Scope,
    ) -> Result<Vec<String>> {
        if scope.aliasing() {
            if let Some(alias) = &column.alias {
                text.push_str(self.rules.alias_separator());
                text.push_str(&self.quote(alias)?);
            } else if !scope.in_expression && !column.star && column.property != column.name {
                text.push_str(self.rules.alias_separator());
                text.push_str(&self.quote(&column.property)?);
            }
        }
        Ok(vec![text])
    }

    /// A star reference. In select position a table whose definition maps
    /// properties to different column names expands to an aliased list.
    fn star_text(
        &mut self,
        column: &ColumnNode,
        prefix: Option<&str>,
        scope: Scope,
    ) -> Result<String> {
        if scope.aliasing() {
            if let Some(table) = &column.table {
                if table.defined_columns().iter().any(|d| d.property != d.name) {
                    let reference = self.quote(table.reference_name())?;
                    let mut parts = Vec::new();
                    for def in table.defined_columns() {
                        let mut part = format!("{reference}.{}", self.quote(&def.name)?);
                        if def.property != def.name {
                            part.push_str(self.rules.alias_separator());
                            part.push_str(&self.quote(&def.property)?);
                        }
                        parts.push(part);
                    }
                    return Ok(parts.join(", "));
                }
            }
        }
        Ok(match prefix {
            Some(p) => format!("{p}.*"),
            None => "*".to_string(),
        })
    }

    fn visit_binary(
        &mut self,
        left: &Node,
        operator: &str,
        right: &BinaryRhs,
        scope: Scope,
    ) -> Result<Vec<String>> {
        let scope = scope.expression();
        let left_text = self.visit_joined(left, scope)?;
        let right_text = match right {
            BinaryRhs::Node(node) => self.visit_joined(node, scope)?,
            BinaryRhs::List(items) => {
                let parts = items
                    .iter()
                    .map(|n| self.visit_joined(n, scope))
                    .collect::<Result<Vec<_>>>()?;
                format!("({})", parts.join(", "))
            }
        };
        if operator == "@@" {
            if let Some(text) = self.rules.match_predicate(&left_text, &right_text) {
                return Ok(vec![text]);
            }
        }
        Ok(vec![format!("({left_text} {operator} {right_text})")])
    }

    /// IN / NOT IN with NULL-aware splitting: NULL entries become IS NULL
    /// checks, empty lists collapse to constant predicates, and a negated
    /// list containing NULL is the NOT of the positive disjunction.
    fn visit_in(
        &mut self,
        left: &Node,
        negated: bool,
        right: &InList,
        scope: Scope,
    ) -> Result<Vec<String>> {
        let scope = scope.expression();
        let left_text = self.visit_joined(left, scope)?;
        match right {
            InList::Expr(expr) => {
                let keyword = if negated { "NOT IN" } else { "IN" };
                let right_text = self.visit_joined(expr, scope)?;
                Ok(vec![format!("({left_text} {keyword} {right_text})")])
            }
            InList::List(items) => {
                if items.is_empty() {
                    return Ok(vec![if negated {
                        "(1=1)".to_string()
                    } else {
                        "(1=0)".to_string()
                    }]);
                }
                let mut has_null = false;
                let mut texts = Vec::new();
                for item in items {
                    if matches!(
                        item,
                        Node::Parameter {
                            value: Value::Null,
                            ..
                        }
                    ) {
                        has_null = true;
                    } else {
                        texts.push(self.visit_joined(item, scope)?);
                    }
                }
                if negated && !has_null {
                    return Ok(vec![format!(
                        "({left_text} NOT IN ({}))",
                        texts.join(", ")
                    )]);
                }
                let mut parts = Vec::new();
                if !texts.is_empty() {
                    parts.push(format!("{left_text} IN ({})", texts.join(", ")));
                }
                if has_null {
                    parts.push(format!("{left_text} IS NULL"));
                }
                let inner = parts.join(" OR ");
                Ok(vec![if negated {
                    format!("(NOT ({inner}))")
                } else {
                    format!("({inner})")
                }])
            }
        }
    }

    fn visit_case(&mut self, case: &CaseNode, scope: Scope) -> Result<Vec<String>> {
        if case.whens.len() != case.thens.len() {
            return Err(SqlError::missing(
                "CASE requires as many THEN as WHEN clauses",
            ));
        }
        let scope = Scope {
            in_case: true,
            ..scope
        };
        let mut parts = vec!["CASE".to_string()];
        for (when, then) in case.whens.iter().zip(&case.thens) {
            let when_text = match when {
                Node::Parameter {
                    value: Value::Bool(b),
                    ..
                } => match self.rules.boolean_predicate(*b) {
                    Some(predicate) => predicate.to_string(),
                    None => self.visit_joined(when, scope)?,
                },
                other => self.visit_joined(other, scope)?,
            };
            let then_text = self.visit_joined(then, scope)?;
            parts.push(format!("WHEN {when_text} THEN {then_text}"));
        }
        if let Some(else_value) = &case.else_value {
            let else_text = self.visit_joined(else_value, scope)?;
            parts.push(format!("ELSE {else_text}"));
        }
        parts.push("END".to_string());
        Ok(vec![format!("({})", parts.join(" "))])
    }

    fn visit_function_call(
        &mut self,
        name: &str,
        args: &[Node],
        scope: Scope,
    ) -> Result<Vec<String>> {
        let inner = Scope {
            in_function: true,
            ..scope
        };
        let texts = args
            .iter()
            .map(|n| self.visit_joined(n, inner))
            .collect::<Result<Vec<_>>>()?;
        if name.eq_ignore_ascii_case("array_agg") {
            let function = self.rules.array_agg_function()?;
            return Ok(vec![format!("{function}({})", texts.join(", "))]);
        }
        Ok(vec![self.rules.function_call(name, &texts, self.config)?])
    }

    fn visit_insert(
        &mut self,
        insert: &InsertNode,
        replace: bool,
        scope: Scope,
    ) -> Result<Vec<String>> {
        if replace {
            self.check(Feature::Replace)?;
        }
        let mut out = vec![if replace {
            "REPLACE".to_string()
        } else {
            "INSERT".to_string()
        }];
        for modifier in &insert.modifiers {
            out.extend(self.visit(modifier, scope)?);
        }
        let table = self.require_table(if replace { "REPLACE" } else { "INSERT" })?;
        out.push(format!("INTO {}", self.table_text(&table)?));

        if insert.names.is_empty() {
            if !insert.rows.is_empty() {
                out.push(self.rules.empty_row_values().to_string());
            }
            return Ok(out);
        }

        let header_scope = scope.clause(Clause::InsertColumns);
        let headers = insert
            .columns
            .iter()
            .map(|c| self.visit_joined(&Node::Column(c.clone()), header_scope))
            .collect::<Result<Vec<_>>>()?;
        out.push(format!("({})", headers.join(", ")));

        if !insert.rows.is_empty() {
            out.push("VALUES".to_string());
            let mut rows = Vec::new();
            for row in &insert.rows {
                let mut cells = Vec::new();
                for name in &insert.names {
                    match row.get(name) {
                        Some(node) => cells.push(self.visit_joined(node, scope)?),
                        None => {
                            self.check(Feature::InsertDefault)?;
                            cells.push("DEFAULT".to_string());
                        }
                    }
                }
                rows.push(format!("({})", cells.join(", ")));
            }
            out.push(rows.join(", "));
        }
        Ok(out)
    }

    fn visit_update(&mut self, assignments: &[ColumnNode], scope: Scope) -> Result<Vec<String>> {
        let table = self.require_table("UPDATE")?;
        let mut out = vec![
            "UPDATE".to_string(),
            self.table_text(&table)?,
            "SET".to_string(),
        ];
        let target_scope = scope.clause(Clause::UpdateTarget);
        let mut parts = Vec::new();
        for column in assignments {
            let value = column.value.as_ref().ok_or_else(|| {
                SqlError::missing(format!("no value provided for column {}", column.name))
            })?;
            let mut target = column.clone();
            target.value = None;
            let target_text = self.visit_joined(&Node::Column(target), target_scope)?;
            let value_text = self.visit_joined(value, scope)?;
            parts.push(format!("{target_text} = {value_text}"));
        }
        out.push(parts.join(", "));
        Ok(out)
    }

    fn visit_on_conflict(&mut self, conflict: &OnConflictNode) -> Result<Vec<String>> {
        self.check(Feature::OnConflict)?;
        let resolve = |table: Option<&Table>, property: &str| -> String {
            table
                .and_then(|t| {
                    t.defined_columns()
                        .iter()
                        .find(|d| d.property == property || d.name == property)
                        .map(|d| d.name.clone())
                })
                .unwrap_or_else(|| property.to_string())
        };
        let table = self.current_table().cloned();
        let mut out = vec!["ON CONFLICT".to_string()];
        match &conflict.constraint {
            Some(constraint) => {
                out.push(format!("ON CONSTRAINT {}", self.quote(constraint)?));
            }
            None if !conflict.columns.is_empty() => {
                let cols = conflict
                    .columns
                    .iter()
                    .map(|p| self.quote(&resolve(table.as_ref(), p)))
                    .collect::<Result<Vec<_>>>()?;
                out.push(format!("({})", cols.join(", ")));
            }
            None => {}
        }
        if conflict.update.is_empty() {
            out.push("DO NOTHING".to_string());
        } else {
            let mut parts = Vec::new();
            for property in &conflict.update {
                let name = self.quote(&resolve(table.as_ref(), property))?;
                parts.push(format!("{name} = EXCLUDED.{name}"));
            }
            out.push(format!("DO UPDATE SET {}", parts.join(", ")));
        }
        Ok(out)
    }

    fn visit_on_duplicate(
        &mut self,
        assignments: &[ColumnNode],
        scope: Scope,
    ) -> Result<Vec<String>> {
        self.check(Feature::OnDuplicate)?;
        let mut out = vec!["ON DUPLICATE KEY UPDATE".to_string()];
        let target_scope = scope.clause(Clause::UpdateTarget);
        let mut parts = Vec::new();
        for column in assignments {
            let value = column.value.as_ref().ok_or_else(|| {
                SqlError::missing(format!("no value provided for column {}", column.name))
            })?;
            let mut target = column.clone();
            target.value = None;
            let target_text = self.visit_joined(&Node::Column(target), target_scope)?;
            let value_text = self.visit_joined(value, scope)?;
            parts.push(format!("{target_text} = {value_text}"));
        }
        out.push(parts.join(", "));
        Ok(out)
    }

    fn visit_create(&mut self, create: &CreateNode) -> Result<Vec<String>> {
        let if_not_exists = create
            .nodes
            .iter()
            .any(|n| matches!(n, Node::IfNotExists));
        let table = self.require_table("CREATE TABLE")?;
        let mut out = self.rules.create_prelude(create.temporary, if_not_exists);
        out.push(self.table_text(&table)?);

        let defs = table.defined_columns();
        let primary: Vec<&str> = defs
            .iter()
            .filter(|d| d.primary_key)
            .map(|d| d.name.as_str())
            .collect();
        let compound = primary.len() > 1;

        let mut parts = Vec::new();
        for def in defs {
            parts.push(self.column_definition(def, compound)?);
        }
        if compound {
            let cols = primary
                .iter()
                .map(|n| self.quote(n))
                .collect::<Result<Vec<_>>>()?;
            parts.push(format!("PRIMARY KEY ({})", cols.join(", ")));
        }
        for key in table.foreign_keys() {
            parts.push(self.foreign_key_clause(key)?);
        }
        out.push(format!("({})", parts.join(", ")));
        out.extend(self.rules.create_table_suffix(&table));
        Ok(self.rules.finish_create(out, if_not_exists))
    }

    fn column_definition(&mut self, column: &ColumnNode, suppress_pk: bool) -> Result<String> {
        let data_type = column.data_type.as_ref().ok_or_else(|| {
            SqlError::missing(format!("dataType missing for column {}", column.name))
        })?;
        let mut text = format!("{} {data_type}", self.quote(&column.name)?);
        if column.primary_key && !suppress_pk {
            text.push_str(" PRIMARY KEY");
        }
        if column.not_null {
            text.push_str(" NOT NULL");
        }
        if column.unique {
            text.push_str(" UNIQUE");
        }
        if let Some(value) = &column.default_value {
            text.push_str(&format!(
                " DEFAULT {}",
                literal_text(self.rules, value, self.config)?
            ));
        }
        if let Some(reference) = &column.references {
            if !reference.is_empty() {
                text.push_str(&self.reference_clause(column, reference)?);
            }
        }
        Ok(text)
    }

    fn reference_clause(&mut self, column: &ColumnNode, reference: &ForeignRef) -> Result<String> {
        let table = reference.table.as_ref().ok_or_else(|| {
            SqlError::missing(format!(
                "reference table missing for column {}",
                column.name
            ))
        })?;
        let target = reference.column.as_ref().ok_or_else(|| {
            SqlError::missing(format!(
                "reference column missing for column {}",
                column.name
            ))
        })?;
        let mut text = String::new();
        if let Some(constraint) = &reference.constraint {
            text.push_str(&format!(" CONSTRAINT {}", self.quote(constraint)?));
        }
        text.push_str(&format!(
            " REFERENCES {}({})",
            self.quote(table)?,
            self.quote(target)?
        ));
        if let Some(action) = reference.on_delete {
            text.push_str(&format!(" ON DELETE {}", action.keyword()));
        }
        if let Some(action) = reference.on_update {
            text.push_str(&format!(" ON UPDATE {}", action.keyword()));
        }
        Ok(text)
    }

    fn foreign_key_clause(&mut self, key: &ForeignKeyNode) -> Result<String> {
        if key.columns.is_empty() {
            return Err(SqlError::missing("foreign key requires columns"));
        }
        let mut text = String::new();
        if let Some(name) = &key.name {
            text.push_str(&format!("CONSTRAINT {} ", self.quote(name)?));
        }
        let cols = key
            .columns
            .iter()
            .map(|c| self.quote(c))
            .collect::<Result<Vec<_>>>()?;
        let target_cols = if key.ref_columns.is_empty() {
            cols.clone()
        } else {
            key.ref_columns
                .iter()
                .map(|c| self.quote(c))
                .collect::<Result<Vec<_>>>()?
        };
        let target_table = match &key.schema {
            Some(schema) => format!("{}.{}", self.quote(schema)?, self.quote(&key.table)?),
            None => self.quote(&key.table)?,
        };
        text.push_str(&format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            cols.join(", "),
            target_table,
            target_cols.join(", ")
        ));
        if let Some(action) = key.on_delete {
            text.push_str(&format!(" ON DELETE {}", action.keyword()));
        }
        if let Some(action) = key.on_update {
            text.push_str(&format!(" ON UPDATE {}", action.keyword()));
        }
        Ok(text)
    }

    fn visit_drop(&mut self, children: &[Node], scope: Scope) -> Result<Vec<String>> {
        let mut if_exists = false;
        let mut out = vec!["DROP TABLE".to_string()];
        for node in children {
            match node {
                Node::IfExists => if_exists = true,
                other => out.extend(self.visit(other, scope)?),
            }
        }
        Ok(self.rules.finish_drop(out, if_exists))
    }

    fn visit_alter(&mut self, children: &[Node]) -> Result<Vec<String>> {
        let table = self.require_table("ALTER TABLE")?;
        let mut out = vec!["ALTER TABLE".to_string(), self.table_text(&table)?];

        let added = children
            .iter()
            .filter(|n| matches!(n, Node::AddColumn(_)))
            .count();
        if added > 1 {
            self.check(Feature::MultipleAddColumns)?;
        }

        match self.rules.alter_style() {
            AlterStyle::PerColumn => {
                let mut parts = Vec::new();
                for node in children {
                    match node {
                        Node::AddColumn(column) => {
                            parts.push(format!(
                                "ADD COLUMN {}",
                                self.column_definition(column, false)?
                            ));
                        }
                        Node::DropColumn(column) => {
                            self.check(Feature::DropColumn)?;
                            parts.push(format!("DROP COLUMN {}", self.quote(&column.name)?));
                        }
                        Node::RenameColumn { old, new } => {
                            parts.push(self.rename_column_text(&table, old, new)?);
                        }
                        Node::Rename(name) => {
                            parts.push(format!("RENAME TO {}", self.quote(name)?));
                        }
                        _ => {
                            return Err(SqlError::UnrecognizedNode("in ALTER TABLE"));
                        }
                    }
                }
                out.push(parts.join(", "));
            }
            AlterStyle::Combined => {
                let mut adds = Vec::new();
                let mut drops = Vec::new();
                let mut rest = Vec::new();
                for node in children {
                    match node {
                        Node::AddColumn(column) => {
                            adds.push(self.column_definition(column, false)?);
                        }
                        Node::DropColumn(column) => {
                            self.check(Feature::DropColumn)?;
                            drops.push(self.quote(&column.name)?);
                        }
                        Node::RenameColumn { old, new } => {
                            rest.push(self.rename_column_text(&table, old, new)?);
                        }
                        Node::Rename(name) => {
                            rest.push(format!("RENAME TO {}", self.quote(name)?));
                        }
                        _ => {
                            return Err(SqlError::UnrecognizedNode("in ALTER TABLE"));
                        }
                    }
                }
                if !adds.is_empty() {
                    out.push(format!("ADD ({})", adds.join(", ")));
                }
                if !drops.is_empty() {
                    out.push(format!("DROP ({})", drops.join(", ")));
                }
                out.extend(rest);
            }
        }
        Ok(out)
    }

    fn rename_column_text(
        &mut self,
        table: &Table,
        old: &ColumnNode,
        new: &ColumnNode,
    ) -> Result<String> {
        self.check(Feature::RenameColumn)?;
        let resolved = new.data_type.clone().or_else(|| {
            table
                .defined_columns()
                .iter()
                .find(|d| d.name == old.name || d.property == old.property)
                .and_then(|d| d.data_type.clone())
        });
        let old_text = self.quote(&old.name)?;
        let new_text = self.quote(&new.name)?;
        let fragments = self.rules.rename_column_fragments(
            old,
            new,
            old_text,
            new_text,
            resolved.as_deref(),
        )?;
        Ok(fragments.join(" "))
    }

    fn visit_create_index(&mut self, index: &CreateIndexNode) -> Result<Vec<String>> {
        let table = self.require_table("CREATE INDEX")?;
        if index.columns.is_empty() {
            return Err(SqlError::missing("no columns defined for index"));
        }
        let mut names = Vec::new();
        let mut parts = Vec::new();
        for node in &index.columns {
            match node {
                Node::Column(column) => {
                    names.push(column.name.clone());
                    parts.push(self.quote(&column.name)?);
                }
                Node::OrderByValue(order) => {
                    if let Node::Column(column) = order.value.as_ref() {
                        names.push(column.name.clone());
                        let direction = match order.direction {
                            Some(Direction::Desc) => " DESC",
                            _ => " ASC",
                        };
                        parts.push(format!("{}{direction}", self.quote(&column.name)?));
                    } else {
                        return Err(SqlError::UnrecognizedNode("in index column list"));
                    }
                }
                _ => {
                    return Err(SqlError::UnrecognizedNode("in index column list"));
                }
            }
        }
        let name = match &index.name {
            Some(name) => name.clone(),
            None => {
                let mut segments = vec![table.table_name().to_string()];
                segments.extend(names);
                segments.join("_")
            }
        };
        let mut out = vec!["CREATE".to_string()];
        if let Some(kind) = &index.kind {
            out.push(kind.to_ascii_uppercase());
        }
        out.push("INDEX".to_string());
        out.push(self.quote(&name)?);
        if let Some(algorithm) = &index.algorithm {
            out.push(format!("USING {}", algorithm.to_ascii_uppercase()));
        }
        out.push("ON".to_string());
        out.push(self.table_text(&table)?);
        out.push(format!("({})", parts.join(", ")));
        if let Some(parser) = &index.parser {
            out.push(format!("WITH PARSER {parser}"));
        }
        Ok(out)
    }
}
