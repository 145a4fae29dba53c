//! The rule-driven tree walk.
//!
//! Every `visit_*` method takes a node by reference and returns its
//! replacement. Methods returning `Option` signal deletion with `None`; the
//! caller then drops the node from its list, or deletes itself when the node
//! cannot be removed in isolation (a call's receiver, a binary operand).
//! Decisions on calls and imports are taken before descending.

use std::fmt;

use im::Vector;
use tracing::{debug, trace};

use crate::rewrite::context::TraversalContext;
use crate::rules::RuleSet;
use crate::syntax::{Print, Token};
use crate::tree::edit::{remove_argument, remove_statement};
use crate::tree::{
    Annotated, Argument, Arguments, Binary, Bracketed, Call, CallStyle, Expr,
    ExpressionStatement, FieldAccess, Index, Lambda, Parenthesized, Postfix, Prefix, Script,
    Select, Sequence, Statement,
};

/// Calls whose first argument is a dependency coordinate.
const CLASSPATH_CALLS: &[&str] = &["implementation", "classpath"];
/// Calls whose first argument is a plugin id.
const PLUGIN_CALLS: &[&str] = &["id", "alias"];
const VERSION_CALL: &str = "version";

/// Why a call was removed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemovalReason {
    Method,
    TypeParameter,
    MethodWithArg,
    Classpath,
    Plugin,
    PluginVersion,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RemovalReason::Method => "method name",
            RemovalReason::TypeParameter => "type parameter",
            RemovalReason::MethodWithArg => "method with argument",
            RemovalReason::Classpath => "classpath entry",
            RemovalReason::Plugin => "plugin id",
            RemovalReason::PluginVersion => "version of removed plugin",
        };
        f.write_str(text)
    }
}

/// Keeps every statement.
fn keep_all(_: &Statement) -> bool {
    true
}

pub struct Visitor<'r> {
    rules: &'r RuleSet,
    plugin_block_filter: fn(&Statement) -> bool,
    removed: usize,
}

impl<'r> Visitor<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            plugin_block_filter: keep_all,
            removed: 0,
        }
    }

    /// Replaces the predicate applied to lambda bodies inside a `plugins`
    /// block. Statements for which it returns false are dropped.
    pub fn with_plugin_block_filter(mut self, filter: fn(&Statement) -> bool) -> Self {
        self.plugin_block_filter = filter;
        self
    }

    /// Nodes removed so far, across every script this visitor has seen.
    pub fn removed(&self) -> usize {
        self.removed
    }

    pub fn visit_script(&mut self, script: &Script) -> Script {
        let ctx = TraversalContext::default();
        let (statements, eof) = self.visit_statements(&script.statements, &script.eof, ctx);
        Script {
            dialect: script.dialect,
            statements,
            eof,
        }
    }

    /// Visits a statement list; `trailer` is the trivia after its last
    /// statement and is returned repaired.
    fn visit_statements(
        &mut self,
        statements: &Vector<Statement>,
        trailer: &str,
        ctx: TraversalContext,
    ) -> (Vector<Statement>, String) {
        let mut out = statements.clone();
        let mut trailer = trailer.to_string();
        let mut index = 0;
        while index < out.len() {
            match self.visit_statement(&out[index], ctx) {
                Some(statement) => {
                    out.set(index, statement);
                    index += 1;
                }
                None => {
                    let (rest, repaired) = remove_statement(&out, index, &trailer);
                    out = rest;
                    trailer = repaired;
                    self.removed += 1;
                }
            }
        }
        (out, trailer)
    }

    pub fn visit_statement(
        &mut self,
        statement: &Statement,
        ctx: TraversalContext,
    ) -> Option<Statement> {
        match statement {
            Statement::Import(import) => {
                let name = import.qualified_name();
                if self.rules.removes_import(&name) {
                    debug!(import = %name, "removing import");
                    return None;
                }
                Some(statement.clone())
            }
            Statement::Expression(statement) => {
                let expr = self.visit_expr(&statement.expr, ctx)?;
                Some(Statement::Expression(ExpressionStatement {
                    expr,
                    semicolon: statement.semicolon.clone(),
                }))
            }
            Statement::Empty(_) => Some(statement.clone()),
        }
    }

    pub fn visit_expr(&mut self, expr: &Expr, ctx: TraversalContext) -> Option<Expr> {
        let visited = match expr {
            Expr::Atom(_) => expr.clone(),
            Expr::Call(call) => Expr::Call(Box::new(self.visit_call(call, ctx)?)),
            Expr::Lambda(lambda) => Expr::Lambda(Box::new(self.visit_lambda(lambda, ctx))),
            Expr::Annotated(annotated) => {
                Expr::Annotated(Box::new(self.visit_annotated(annotated, ctx)?))
            }
            Expr::FieldAccess(access) => Expr::FieldAccess(Box::new(FieldAccess {
                target: self.visit_expr(&access.target, ctx)?,
                dot: access.dot.clone(),
                name: access.name.clone(),
            })),
            Expr::Parenthesized(group) => Expr::Parenthesized(Box::new(Parenthesized {
                open: group.open.clone(),
                inner: self.visit_expr(&group.inner, ctx)?,
                close: group.close.clone(),
            })),
            Expr::Index(index) => Expr::Index(Box::new(Index {
                target: self.visit_expr(&index.target, ctx)?,
                brackets: self.visit_bracketed(&index.brackets, ctx),
            })),
            Expr::Binary(binary) => Expr::Binary(Box::new(Binary {
                left: self.visit_expr(&binary.left, ctx)?,
                op: binary.op.clone(),
                right: self.visit_expr(&binary.right, ctx)?,
            })),
            Expr::Prefix(prefix) => Expr::Prefix(Box::new(Prefix {
                op: prefix.op.clone(),
                operand: self.visit_expr(&prefix.operand, ctx)?,
            })),
            Expr::Postfix(postfix) => Expr::Postfix(Box::new(Postfix {
                operand: self.visit_expr(&postfix.operand, ctx)?,
                op: postfix.op.clone(),
            })),
            Expr::List(list) => Expr::List(Box::new(self.visit_bracketed(list, ctx))),
            Expr::Sequence(sequence) => {
                Expr::Sequence(Box::new(self.visit_sequence(sequence, ctx)?))
            }
        };
        Some(visited)
    }

    /// A removed element takes the whole sequence with it, unless it is a
    /// control body. A body followed by an `else` branch becomes `{}`; a
    /// final `else` body goes together with its `else`.
    fn visit_sequence(&mut self, sequence: &Sequence, ctx: TraversalContext) -> Option<Sequence> {
        let head = self.visit_expr(&sequence.head, ctx)?;
        let mut tail = Vec::with_capacity(sequence.tail.len());
        for (index, expr) in sequence.tail.iter().enumerate() {
            if let Some(visited) = self.visit_expr(expr, ctx) {
                tail.push(visited);
                continue;
            }
            if !sequence.is_control_body(index) {
                return None;
            }
            self.removed += 1;
            if index + 1 < sequence.tail.len() {
                trace!("control body emptied");
                let leading = expr.first_token().leading.clone();
                tail.push(Expr::Lambda(Box::new(Lambda::empty(leading))));
                continue;
            }
            let branch = sequence.tail[..index]
                .iter()
                .rposition(|expr| matches!(expr, Expr::Atom(token) if token.is("else")))?;
            trace!("else branch removed");
            tail.truncate(branch);
            break;
        }
        Some(Sequence { head, tail })
    }

    pub fn visit_call(&mut self, call: &Call, ctx: TraversalContext) -> Option<Call> {
        if let Some(reason) = self.removal_reason(call) {
            debug!(call = call.simple_name(), %reason, "removing call");
            return None;
        }

        let inner = ctx.entering(call);
        let select = match &call.select {
            Some(select) => Some(Select {
                target: self.visit_expr(&select.target, inner)?,
                dot: select.dot.clone(),
            }),
            None => None,
        };
        let args = match &call.args {
            Some(args) => {
                let visited = self.visit_arguments(args, inner);
                // A parenthesis-free call cannot lose all of its arguments.
                if call.style != CallStyle::Regular && visited.items.is_empty() {
                    trace!(call = call.simple_name(), "every argument removed");
                    return None;
                }
                Some(visited)
            }
            None => None,
        };
        let lambda = call
            .lambda
            .as_ref()
            .map(|lambda| self.visit_lambda(lambda, inner));

        let rebuilt = Call {
            select,
            name: call.name.clone(),
            type_args: call.type_args.clone(),
            args,
            lambda,
            style: call.style,
        };
        // Losing an argument can make the call match on a second pass.
        if rebuilt != *call {
            if let Some(reason) = self.removal_reason(&rebuilt) {
                debug!(call = call.simple_name(), %reason, "removing rebuilt call");
                return None;
            }
        }
        Some(rebuilt)
    }

    fn visit_arguments(&mut self, args: &Arguments, ctx: TraversalContext) -> Arguments {
        Arguments {
            open: args.open.clone(),
            items: self.visit_items(&args.items, ctx),
            close: args.close.clone(),
        }
    }

    fn visit_bracketed(&mut self, list: &Bracketed, ctx: TraversalContext) -> Bracketed {
        Bracketed {
            open: list.open.clone(),
            items: self.visit_items(&list.items, ctx),
            close: list.close.clone(),
        }
    }

    fn visit_items(&mut self, items: &[Argument], ctx: TraversalContext) -> Vec<Argument> {
        let mut out = items.to_vec();
        let mut index = 0;
        while index < out.len() {
            match self.visit_expr(&out[index].expr, ctx) {
                Some(expr) => {
                    out[index].expr = expr;
                    index += 1;
                }
                None => {
                    out = remove_argument(&out, index);
                    self.removed += 1;
                }
            }
        }
        out
    }

    pub fn visit_lambda(&mut self, lambda: &Lambda, ctx: TraversalContext) -> Lambda {
        let mut body = lambda.body.clone();
        let mut close_leading = lambda.close.leading.clone();

        if ctx.in_plugin_block {
            let mut index = 0;
            while index < body.len() {
                if (self.plugin_block_filter)(&body[index]) {
                    index += 1;
                    continue;
                }
                let (rest, repaired) = remove_statement(&body, index, &close_leading);
                body = rest;
                close_leading = repaired;
                self.removed += 1;
            }
        }

        let (body, close_leading) = self.visit_statements(&body, &close_leading, ctx);
        Lambda {
            open: lambda.open.clone(),
            params: lambda.params.clone(),
            body,
            close: Token {
                leading: close_leading,
                ..lambda.close.clone()
            },
        }
    }

    /// An annotation goes together with the expression it annotates.
    fn visit_annotated(&mut self, annotated: &Annotated, ctx: TraversalContext) -> Option<Annotated> {
        let expr = match &annotated.expr {
            Some(expr) => Some(self.visit_expr(expr, ctx)?),
            None => None,
        };
        Some(Annotated {
            at: annotated.at.clone(),
            name: annotated.name.clone(),
            args: annotated.args.clone(),
            expr,
        })
    }

    /// First matching row of the decision table, if any.
    pub fn removal_reason(&self, call: &Call) -> Option<RemovalReason> {
        let rules = self.rules;
        let name = call.simple_name();

        if rules.removes_method(name) {
            return Some(RemovalReason::Method);
        }
        if call
            .type_parameters()
            .iter()
            .any(|param| rules.removes_type_parameter(param))
        {
            return Some(RemovalReason::TypeParameter);
        }
        if rules.has_methods_with_arg() && rules.removes_method_with_arg(&call.printed()) {
            return Some(RemovalReason::MethodWithArg);
        }
        if CLASSPATH_CALLS.contains(&name)
            && first_argument_matches(call, |key| rules.removes_classpath(key))
        {
            return Some(RemovalReason::Classpath);
        }
        if PLUGIN_CALLS.contains(&name)
            && first_argument_matches(call, |key| rules.removes_plugin(key))
        {
            return Some(RemovalReason::Plugin);
        }
        if name == VERSION_CALL {
            let plugin = call.receiver().and_then(Expr::as_call);
            if plugin.is_some_and(|p| first_argument_matches(p, |key| rules.removes_plugin(key))) {
                return Some(RemovalReason::PluginVersion);
            }
        }
        None
    }
}

fn first_argument_matches(call: &Call, matches: impl Fn(&str) -> bool) -> bool {
    call.first_argument()
        .is_some_and(|arg| arg.argument_keys().iter().any(|key| matches(key)))
}
