//! Tree model for parsed build scripts.
//!
//! Nodes are plain immutable values. Rewrites never mutate a node in place;
//! they build a new node from the pieces of the old one (see [`edit`]).
//! Statement lists are `im::Vector`s so that rebuilding a block shares the
//! untouched statements with the original tree.

use im::Vector;

use crate::syntax::{Dialect, Print, Token, TokenKind};

pub mod edit;

/// A parsed build script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub dialect: Dialect,
    pub statements: Vector<Statement>,
    /// Trivia after the last token.
    pub eof: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Import(Import),
    Expression(ExpressionStatement),
    /// A lone `;`.
    Empty(Token),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionStatement {
    pub expr: Expr,
    pub semicolon: Option<Token>,
}

/// `import a.b.C`, `import a.b.*`, `import static a.B.c`, `import a.B as C`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub keyword: Token,
    pub modifier: Option<Token>,
    /// Name segments and the dots between them.
    pub path: Vec<Token>,
    pub alias: Option<ImportAlias>,
    pub semicolon: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAlias {
    pub keyword: Token,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Literal, identifier, keyword or stray operator.
    Atom(Token),
    Call(Box<Call>),
    Lambda(Box<Lambda>),
    Annotated(Box<Annotated>),
    FieldAccess(Box<FieldAccess>),
    Parenthesized(Box<Parenthesized>),
    Index(Box<Index>),
    Binary(Box<Binary>),
    Prefix(Box<Prefix>),
    Postfix(Box<Postfix>),
    /// `[a, b]` list or map literal.
    List(Box<Bracketed>),
    /// Juxtaposed expressions forming one statement (`val x by lazy { }`).
    Sequence(Box<Sequence>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CallStyle {
    /// `name(args)`, `name { }`, `target.name(args)`.
    Regular,
    /// Groovy command expression: `name arg, arg` and chained `a 'x' b 'y'`.
    Command,
    /// Kotlin infix call: `target name arg`.
    Infix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub select: Option<Select>,
    pub name: Token,
    pub type_args: Option<TypeArgs>,
    pub args: Option<Arguments>,
    pub lambda: Option<Lambda>,
    pub style: CallStyle,
}

/// The receiver of a call. `dot` is absent for command chains and infix calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub target: Expr,
    pub dot: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeArgs {
    pub open: Token,
    pub params: Vec<TypeParam>,
    pub close: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub tokens: Vec<Token>,
    pub comma: Option<Token>,
}

/// Call arguments; parentheses are absent for command expressions and infix calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    pub open: Option<Token>,
    pub items: Vec<Argument>,
    pub close: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub expr: Expr,
    pub comma: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracketed {
    pub open: Token,
    pub items: Vec<Argument>,
    pub close: Token,
}

/// A lambda/closure with a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lambda {
    pub open: Token,
    pub params: Option<LambdaParams>,
    pub body: Vector<Statement>,
    pub close: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaParams {
    pub tokens: Vec<Token>,
    pub arrow: Token,
}

/// `@Name(args) expr`. The expression is absent for free-standing
/// annotations such as `@file:Suppress(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    pub at: Token,
    pub name: Vec<Token>,
    pub args: Option<Arguments>,
    pub expr: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccess {
    pub target: Expr,
    pub dot: Token,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parenthesized {
    pub open: Token,
    pub inner: Expr,
    pub close: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub target: Expr,
    pub brackets: Bracketed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub left: Expr,
    pub op: Token,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub op: Token,
    pub operand: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Postfix {
    pub operand: Expr,
    pub op: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub head: Expr,
    pub tail: Vec<Expr>,
}

// ============================================================================
// ACCESSORS
// ============================================================================

impl Script {
    /// Every call in the script, outermost first.
    pub fn calls(&self) -> Vec<&Call> {
        let mut out = Vec::new();
        for statement in &self.statements {
            statement.collect_calls(&mut out);
        }
        out
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Import(import) => Some(import),
            _ => None,
        })
    }
}

impl Statement {
    pub fn first_token(&self) -> &Token {
        match self {
            Statement::Import(import) => &import.keyword,
            Statement::Expression(statement) => statement.expr.first_token(),
            Statement::Empty(token) => token,
        }
    }

    pub fn first_token_mut(&mut self) -> &mut Token {
        match self {
            Statement::Import(import) => &mut import.keyword,
            Statement::Expression(statement) => statement.expr.first_token_mut(),
            Statement::Empty(token) => token,
        }
    }

    pub fn leading(&self) -> &str {
        &self.first_token().leading
    }

    /// The same statement with different leading trivia.
    pub fn with_leading(&self, leading: String) -> Statement {
        let mut statement = self.clone();
        statement.first_token_mut().leading = leading;
        statement
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Statement::Expression(statement) => Some(&statement.expr),
            _ => None,
        }
    }

    fn collect_calls<'a>(&'a self, out: &mut Vec<&'a Call>) {
        if let Statement::Expression(statement) = self {
            statement.expr.collect_calls(out);
        }
    }
}

impl Import {
    /// The imported name without trivia: `org.gradle.api.Plugin`, `a.b.*`.
    pub fn qualified_name(&self) -> String {
        self.path.iter().map(|t| t.text.as_str()).collect()
    }
}

impl Expr {
    pub fn first_token(&self) -> &Token {
        match self {
            Expr::Atom(token) => token,
            Expr::Call(call) => match &call.select {
                Some(select) => select.target.first_token(),
                None => &call.name,
            },
            Expr::Lambda(lambda) => &lambda.open,
            Expr::Annotated(annotated) => &annotated.at,
            Expr::FieldAccess(access) => access.target.first_token(),
            Expr::Parenthesized(group) => &group.open,
            Expr::Index(index) => index.target.first_token(),
            Expr::Binary(binary) => binary.left.first_token(),
            Expr::Prefix(prefix) => &prefix.op,
            Expr::Postfix(postfix) => postfix.operand.first_token(),
            Expr::List(list) => &list.open,
            Expr::Sequence(sequence) => sequence.head.first_token(),
        }
    }

    pub fn first_token_mut(&mut self) -> &mut Token {
        match self {
            Expr::Atom(token) => token,
            Expr::Call(call) => match &mut call.select {
                Some(select) => select.target.first_token_mut(),
                None => &mut call.name,
            },
            Expr::Lambda(lambda) => &mut lambda.open,
            Expr::Annotated(annotated) => &mut annotated.at,
            Expr::FieldAccess(access) => access.target.first_token_mut(),
            Expr::Parenthesized(group) => &mut group.open,
            Expr::Index(index) => index.target.first_token_mut(),
            Expr::Binary(binary) => binary.left.first_token_mut(),
            Expr::Prefix(prefix) => &mut prefix.op,
            Expr::Postfix(postfix) => postfix.operand.first_token_mut(),
            Expr::List(list) => &mut list.open,
            Expr::Sequence(sequence) => sequence.head.first_token_mut(),
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Strings a rule may match this expression against when it is used as
    /// an argument: the printed form and, for a plain string literal, the
    /// text between its quotes.
    pub fn argument_keys(&self) -> Vec<String> {
        let printed = self.printed();
        match self {
            Expr::Atom(token) if token.kind == TokenKind::Str => match unquote(&token.text) {
                Some(content) if content != printed => vec![printed, content.to_string()],
                _ => vec![printed],
            },
            _ => vec![printed],
        }
    }

    fn collect_calls<'a>(&'a self, out: &mut Vec<&'a Call>) {
        match self {
            Expr::Atom(_) => {}
            Expr::Call(call) => {
                out.push(call);
                if let Some(select) = &call.select {
                    select.target.collect_calls(out);
                }
                if let Some(args) = &call.args {
                    for arg in &args.items {
                        arg.expr.collect_calls(out);
                    }
                }
                if let Some(lambda) = &call.lambda {
                    lambda.collect_calls(out);
                }
            }
            Expr::Lambda(lambda) => lambda.collect_calls(out),
            Expr::Annotated(annotated) => {
                if let Some(expr) = &annotated.expr {
                    expr.collect_calls(out);
                }
            }
            Expr::FieldAccess(access) => access.target.collect_calls(out),
            Expr::Parenthesized(group) => group.inner.collect_calls(out),
            Expr::Index(index) => {
                index.target.collect_calls(out);
                for arg in &index.brackets.items {
                    arg.expr.collect_calls(out);
                }
            }
            Expr::Binary(binary) => {
                binary.left.collect_calls(out);
                binary.right.collect_calls(out);
            }
            Expr::Prefix(prefix) => prefix.operand.collect_calls(out),
            Expr::Postfix(postfix) => postfix.operand.collect_calls(out),
            Expr::List(list) => {
                for arg in &list.items {
                    arg.expr.collect_calls(out);
                }
            }
            Expr::Sequence(sequence) => {
                sequence.head.collect_calls(out);
                for expr in &sequence.tail {
                    expr.collect_calls(out);
                }
            }
        }
    }
}

impl Call {
    pub fn simple_name(&self) -> &str {
        &self.name.text
    }

    /// The receiver expression (`a` in `a.b()`, `id("x")` in `id("x") version "1"`).
    pub fn receiver(&self) -> Option<&Expr> {
        self.select.as_ref().map(|s| &s.target)
    }

    /// Explicit arguments, excluding a trailing lambda.
    pub fn arguments(&self) -> &[Argument] {
        self.args.as_ref().map_or(&[], |a| a.items.as_slice())
    }

    pub fn first_argument(&self) -> Option<&Expr> {
        self.arguments().first().map(|a| &a.expr)
    }

    /// Type parameters as printed: `KotlinCompile` for `withType<KotlinCompile>`.
    pub fn type_parameters(&self) -> Vec<String> {
        let Some(type_args) = &self.type_args else {
            return Vec::new();
        };
        type_args
            .params
            .iter()
            .map(|param| param.tokens.printed())
            .collect()
    }
}

impl Lambda {
    /// `{}`, standing in for a removed control body.
    pub fn empty(leading: String) -> Self {
        Lambda {
            open: Token {
                leading,
                ..Token::new(TokenKind::Punct, "{")
            },
            params: None,
            body: Vector::new(),
            close: Token::new(TokenKind::Punct, "}"),
        }
    }

    fn collect_calls<'a>(&'a self, out: &mut Vec<&'a Call>) {
        for statement in &self.body {
            statement.collect_calls(out);
        }
    }
}

impl Sequence {
    /// Whether `tail[index]` is the body of a control header before it, as
    /// `b()` in `if (a) b() else c()`. Only statements opening with the
    /// keyword count; an `if` used as a value keeps every branch.
    pub fn is_control_body(&self, index: usize) -> bool {
        let opens_control = matches!(
            &self.head,
            Expr::Atom(token) if ["if", "for", "while"].iter().any(|k| token.is(k))
        );
        opens_control && ends_control_header(&self.head, &self.tail[..index])
    }
}

/// Whether the juxtaposed expressions end in a control header that still
/// needs a body: `if (c)`, `while (c)`, `for (x in xs)` or `else`.
pub fn ends_control_header(head: &Expr, tail: &[Expr]) -> bool {
    let Some((last, before)) = tail.split_last() else {
        return ends_with_keyword(head, &["else"]);
    };
    if ends_with_keyword(last, &["else"]) {
        return true;
    }
    if !matches!(last, Expr::Parenthesized(_)) {
        return false;
    }
    let keyword = before.last().unwrap_or(head);
    // `do { } while (c)` is already complete.
    let do_while = ends_with_keyword(head, &["do"]);
    ends_with_keyword(keyword, &["if", "for"])
        || (!do_while && ends_with_keyword(keyword, &["while"]))
}

/// One of `keywords`, alone or as a right operand as in `x = if`.
fn ends_with_keyword(expr: &Expr, keywords: &[&str]) -> bool {
    match expr {
        Expr::Atom(token) => token.is_ident() && keywords.contains(&token.text.as_str()),
        Expr::Binary(binary) => ends_with_keyword(&binary.right, keywords),
        _ => false,
    }
}

/// Strips the delimiters of a string literal that has no templates.
fn unquote(text: &str) -> Option<&str> {
    let (quote, interpolates) = if text.starts_with("\"\"\"") {
        ("\"\"\"", true)
    } else if text.starts_with("'''") {
        ("'''", false)
    } else if text.starts_with('"') {
        ("\"", true)
    } else if text.starts_with('\'') {
        ("'", false)
    } else {
        return None;
    };
    if interpolates && text.contains('$') {
        return None;
    }
    text.strip_prefix(quote)?.strip_suffix(quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_plain_literals() {
        assert_eq!(unquote("'com.x:y:1.0'"), Some("com.x:y:1.0"));
        assert_eq!(unquote("\"org.jetbrains.kotlin.jvm\""), Some("org.jetbrains.kotlin.jvm"));
        assert_eq!(unquote("'''multi'''"), Some("multi"));
        assert_eq!(unquote("'$notATemplate'"), Some("$notATemplate"));
    }

    #[test]
    fn unquote_rejects_templates_and_non_strings() {
        assert_eq!(unquote("\"lib:$version\""), None);
        assert_eq!(unquote("libs.plugins.x"), None);
    }

    #[test]
    fn argument_keys_include_literal_content() {
        let expr = Expr::Atom(Token::new(TokenKind::Str, "'unwanted'"));
        assert_eq!(expr.argument_keys(), vec!["'unwanted'".to_string(), "unwanted".to_string()]);

        let expr = Expr::Atom(Token::new(TokenKind::Ident, "libs"));
        assert_eq!(expr.argument_keys(), vec!["libs".to_string()]);
    }
}
