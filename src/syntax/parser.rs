//! Build Script Parser
//!
//! Recovers the statement and call structure of a token stream produced by
//! [`lex`](super::lexer::lex). The parser is purely syntactic and deliberately
//! shallow: it recognises calls in their three shapes (regular, Groovy
//! command, Kotlin infix), lambdas, imports and annotations, and keeps
//! everything else as printable expressions. Nothing is ever dropped, so
//! printing the result reproduces the input.

use im::Vector;

use crate::syntax::lexer::{lex, Lexed};
use crate::syntax::{Dialect, DialectCaps, Span, Token, TokenKind};
use crate::tree::{
    ends_control_header, Annotated, Argument, Arguments, Binary, Bracketed, Call, CallStyle, Expr,
    ExpressionStatement, FieldAccess, Import, ImportAlias, Index, Lambda, LambdaParams,
    Parenthesized, Postfix, Prefix, Script, Select, Sequence, Statement, TypeArgs, TypeParam,
};
use crate::ScrubError;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses a build script written in `dialect`.
pub fn parse(source: &str, dialect: Dialect) -> Result<Script, ScrubError> {
    let Lexed { tokens, eof } = lex(source)?;
    let mut parser = ScriptParser::new(source, tokens, dialect.capabilities());
    let statements = parser.statements(None)?;
    Ok(Script {
        dialect,
        statements,
        eof,
    })
}

// ============================================================================
// TOKEN CLASSES
// ============================================================================

const KEYWORDS: &[&str] = &[
    "if", "else", "when", "for", "while", "do", "try", "catch", "finally", "return", "throw",
    "val", "var", "fun", "class", "object", "interface", "typealias", "package", "import",
    "def", "new", "instanceof", "as", "is", "in", "by", "null", "true", "false", "this", "super",
    "private", "public", "protected", "internal", "override", "abstract", "const", "lateinit",
    "static", "final", "void", "break", "continue", "assert",
];

/// Keywords that denote a value and may start an argument.
const LITERALS: &[&str] = &["true", "false", "null", "this", "super", "new"];

const BINARY_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "==", "!=", "===", "!==", "<", ">", "<=", ">=", "&&",
    "||", "+", "-", "*", "/", "%", "?", ":", "?:", "->", "::", "..", "..<", "...", "=~", "&",
    "|", "^", "as", "is", "in", "instanceof",
];

const PREFIX_OPERATORS: &[&str] = &["!", "-", "+", "++", "--", "~", "*"];

/// Tokens that keep a statement going when they start a new line.
const CONTINUATIONS: &[&str] = &[".", "?.", "*.", "?:", "&&", "||", "else", "catch", "finally"];

const CLOSERS: &[&str] = &[")", "]", "}"];

fn is_keyword(token: &Token) -> bool {
    token.is_ident() && KEYWORDS.contains(&token.text.as_str())
}

fn is_name(token: &Token) -> bool {
    token.is_ident() && !is_keyword(token)
}

/// A token that can begin a parenthesis-free argument.
fn starts_operand(token: &Token) -> bool {
    match token.kind {
        TokenKind::Str | TokenKind::Number => true,
        TokenKind::Ident => !is_keyword(token) || LITERALS.contains(&token.text.as_str()),
        _ => false,
    }
}

fn is_one_of(token: &Token, set: &[&str]) -> bool {
    set.iter().any(|text| token.is(text))
}

fn is_keyword_atom(expr: &Expr, keyword: &str) -> bool {
    matches!(expr, Expr::Atom(token) if token.is(keyword))
}

// ============================================================================
// PARSER
// ============================================================================

struct ScriptParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    caps: DialectCaps,
    /// Whether a line break ends a statement; false inside parentheses and
    /// brackets, true again inside a lambda.
    line_sensitive: Vec<bool>,
}

impl<'a> ScriptParser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>, caps: DialectCaps) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            caps,
            line_sensitive: vec![true],
        }
    }

    // ------------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn at(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(text))
    }

    /// `text` is next and shares a line with the previous token.
    fn at_on_line(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(text) && !t.starts_line())
    }

    /// `text` is next and directly touches the previous token.
    fn at_attached(&self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.is(text) && t.leading.is_empty())
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn expect(&mut self, text: &str) -> Result<Token, ScrubError> {
        if self.at(text) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected `{text}`")))
        }
    }

    fn error(&self, message: String) -> ScrubError {
        let span = match self.peek() {
            Some(token) => token.span,
            None => Span {
                start: self.source.len(),
                end: self.source.len(),
            },
        };
        let found = match self.peek() {
            Some(token) if token.kind == TokenKind::Unknown => {
                "unterminated literal or unrecognised character".to_string()
            }
            Some(token) => format!("found `{}`", token.text),
            None => "found end of input".to_string(),
        };
        err_ctx!(Parse, format!("{message}, {found}"), self.source, span)
    }

    fn with_line_sensitivity<T>(
        &mut self,
        sensitive: bool,
        f: impl FnOnce(&mut Self) -> Result<T, ScrubError>,
    ) -> Result<T, ScrubError> {
        self.line_sensitive.push(sensitive);
        let result = f(self);
        self.line_sensitive.pop();
        result
    }

    /// A line break in front of the next token ends the current statement.
    fn at_line_break(&self) -> bool {
        let sensitive = self.line_sensitive.last().copied().unwrap_or(true);
        self.peek().is_some_and(|t| {
            sensitive && t.starts_line() && !is_one_of(t, CONTINUATIONS)
        })
    }

    fn at_statement_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some(t) => t.is(";") || is_one_of(t, CLOSERS) || self.at_line_break(),
        }
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn statements(&mut self, closer: Option<&str>) -> Result<Vector<Statement>, ScrubError> {
        let mut out = Vector::new();
        loop {
            match (self.peek(), closer) {
                (None, None) => break,
                (None, Some(closer)) => {
                    return Err(self.error(format!("unclosed block, expected `{closer}`")))
                }
                (Some(t), Some(closer)) if t.is(closer) => break,
                _ => out.push_back(self.statement()?),
            }
        }
        Ok(out)
    }

    fn statement(&mut self) -> Result<Statement, ScrubError> {
        if self.at(";") {
            return Ok(Statement::Empty(self.bump()));
        }
        if self.at("import") && self.peek_at(1).is_some_and(|t| t.is_ident() && !t.starts_line())
        {
            return self.import().map(Statement::Import);
        }

        let expr = self.statement_expr(false)?;
        let semicolon = self.at(";").then(|| self.bump());
        Ok(Statement::Expression(ExpressionStatement { expr, semicolon }))
    }

    /// The juxtaposed expressions of one statement. A control header left
    /// without a body at the end of its line takes the next statement as
    /// its body, so `if (c)\n    a()` stays one node. A body stops in
    /// front of an `else` that belongs to the header.
    fn statement_expr(&mut self, is_body: bool) -> Result<Expr, ScrubError> {
        let head = self.command_or_expression()?;
        let mut tail = Vec::new();
        loop {
            if is_body && self.at("else") && !is_keyword_atom(&head, "if") {
                break;
            }
            if !self.at_statement_end() {
                tail.push(self.command_or_expression()?);
            } else if ends_control_header(&head, &tail) && self.at_detached_body() {
                tail.push(self.statement_expr(true)?);
            } else {
                break;
            }
        }
        Ok(if tail.is_empty() {
            head
        } else {
            Expr::Sequence(Box::new(Sequence { head, tail }))
        })
    }

    /// The statement ended at a line break and more follows in the block.
    fn at_detached_body(&self) -> bool {
        self.peek()
            .is_some_and(|t| t.starts_line() && !t.is(";") && !is_one_of(t, CLOSERS))
    }

    fn import(&mut self) -> Result<Import, ScrubError> {
        let keyword = self.bump();
        let modifier = (self.at("static") && !self.peek_at(1).is_some_and(|t| t.is(".")))
            .then(|| self.bump());

        let mut path = vec![self.name()?];
        while self.at_on_line(".") {
            let next_is_segment = self
                .peek_at(1)
                .is_some_and(|t| t.is_ident() || t.is("*"));
            if !next_is_segment {
                break;
            }
            path.push(self.bump());
            path.push(self.bump());
        }

        let alias = if self.at_on_line("as") {
            let keyword = self.bump();
            let name = self.name()?;
            Some(ImportAlias { keyword, name })
        } else {
            None
        };
        let semicolon = self.at(";").then(|| self.bump());
        Ok(Import {
            keyword,
            modifier,
            path,
            alias,
            semicolon,
        })
    }

    fn name(&mut self) -> Result<Token, ScrubError> {
        match self.peek() {
            Some(t) if t.is_ident() => Ok(self.bump()),
            _ => Err(self.error("expected a name".to_string())),
        }
    }

    // ------------------------------------------------------------------------
    // Groovy command expressions
    // ------------------------------------------------------------------------

    /// The token at `offset` can start a parenthesis-free argument on the
    /// current line.
    fn at_command_argument(&self, offset: usize) -> bool {
        self.peek_at(offset)
            .is_some_and(|t| !t.starts_line() && starts_operand(t))
    }

    fn at_command(&self) -> bool {
        self.peek().is_some_and(is_name) && self.at_command_argument(1)
    }

    fn at_chain_link(&self) -> bool {
        let Some(name) = self.peek() else {
            return false;
        };
        if !is_name(name) || name.starts_line() {
            return false;
        }
        self.at_command_argument(1)
            || self
                .peek_at(1)
                .is_some_and(|t| t.is("(") && t.leading.is_empty())
    }

    fn command_or_expression(&mut self) -> Result<Expr, ScrubError> {
        if !self.caps.command_expressions {
            return self.expression();
        }

        let mut expr = if self.at_command() {
            let name = self.bump();
            self.command_call(None, name)?
        } else {
            match self.expression()? {
                // `android.compileSdkVersion 34`
                Expr::FieldAccess(access) if self.at_command_argument(0) => {
                    let FieldAccess { target, dot, name } = *access;
                    let select = Select {
                        target,
                        dot: Some(dot),
                    };
                    self.command_call(Some(select), name)?
                }
                other => other,
            }
        };

        // `id 'x' version '1.2' apply false`
        while matches!(expr, Expr::Call(_)) && self.at_chain_link() {
            let name = self.bump();
            let select = Select {
                target: expr,
                dot: None,
            };
            expr = if self.at("(") {
                let (type_args, args, lambda) = self.call_parts()?;
                Expr::Call(Box::new(Call {
                    select: Some(select),
                    name,
                    type_args,
                    args,
                    lambda,
                    style: CallStyle::Command,
                }))
            } else {
                self.command_call(Some(select), name)?
            };
        }
        Ok(expr)
    }

    fn command_call(&mut self, select: Option<Select>, name: Token) -> Result<Expr, ScrubError> {
        let mut items = Vec::new();
        loop {
            let expr = self.expression()?;
            let comma = self.at(",").then(|| self.bump());
            let more = comma.is_some();
            items.push(Argument { expr, comma });
            if !more {
                break;
            }
        }
        Ok(Expr::Call(Box::new(Call {
            select,
            name,
            type_args: None,
            args: Some(Arguments {
                open: None,
                items,
                close: None,
            }),
            lambda: None,
            style: CallStyle::Command,
        })))
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn expression(&mut self) -> Result<Expr, ScrubError> {
        let mut left = self.unary()?;
        loop {
            if self.at_statement_end() {
                break;
            }
            let Some(token) = self.peek() else {
                break;
            };
            if is_one_of(token, BINARY_OPERATORS) {
                let op = self.bump();
                let right = self.unary()?;
                left = Expr::Binary(Box::new(Binary { left, op, right }));
            } else if self.at_infix_call(&left) {
                let name = self.bump();
                let right = self.unary()?;
                left = Expr::Call(Box::new(Call {
                    select: Some(Select {
                        target: left,
                        dot: None,
                    }),
                    name,
                    type_args: None,
                    args: Some(Arguments {
                        open: None,
                        items: vec![Argument {
                            expr: right,
                            comma: None,
                        }],
                        close: None,
                    }),
                    lambda: None,
                    style: CallStyle::Infix,
                }));
            } else {
                break;
            }
        }
        Ok(left)
    }

    /// `a name b` where `name` is a plain identifier, as in `id("x") version "1.0"`.
    fn at_infix_call(&self, left: &Expr) -> bool {
        if !self.caps.infix_calls {
            return false;
        }
        if let Expr::Atom(token) = left {
            if is_keyword(token) && !LITERALS.contains(&token.text.as_str()) {
                return false;
            }
        }
        let Some(name) = self.peek() else {
            return false;
        };
        is_name(name) && !name.starts_line() && self.at_command_argument(1)
    }

    fn unary(&mut self) -> Result<Expr, ScrubError> {
        if self.peek().is_some_and(|t| is_one_of(t, PREFIX_OPERATORS)) {
            let op = self.bump();
            let operand = self.unary()?;
            return Ok(Expr::Prefix(Box::new(Prefix { op, operand })));
        }
        let primary = self.primary()?;
        self.postfix(primary)
    }

    fn postfix(&mut self, mut expr: Expr) -> Result<Expr, ScrubError> {
        loop {
            let Some(token) = self.peek() else {
                break;
            };
            if is_one_of(token, &[".", "?.", "*."]) {
                let dot = self.bump();
                let name = match self.peek() {
                    Some(t) if matches!(t.kind, TokenKind::Ident | TokenKind::Str) => self.bump(),
                    _ => return Err(self.error(format!("expected a member name after `{}`", dot.text))),
                };
                let (type_args, args, lambda) = self.call_parts()?;
                expr = if type_args.is_none() && args.is_none() && lambda.is_none() {
                    Expr::FieldAccess(Box::new(FieldAccess {
                        target: expr,
                        dot,
                        name,
                    }))
                } else {
                    Expr::Call(Box::new(Call {
                        select: Some(Select {
                            target: expr,
                            dot: Some(dot),
                        }),
                        name,
                        type_args,
                        args,
                        lambda,
                        style: CallStyle::Regular,
                    }))
                };
            } else if token.is("[") && token.leading.is_empty() {
                let brackets = self.bracketed("[", "]")?;
                expr = Expr::Index(Box::new(Index {
                    target: expr,
                    brackets,
                }));
            } else if is_one_of(token, &["!!", "++", "--"]) && token.leading.is_empty() {
                let op = self.bump();
                expr = Expr::Postfix(Box::new(Postfix { operand: expr, op }));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ScrubError> {
        let Some(token) = self.peek() else {
            return Err(self.error("expected an expression".to_string()));
        };

        match token.kind {
            TokenKind::Unknown => Err(self.error("unexpected input".to_string())),
            TokenKind::Str | TokenKind::Number => Ok(Expr::Atom(self.bump())),
            TokenKind::Ident if is_keyword(token) => Ok(Expr::Atom(self.bump())),
            TokenKind::Ident => {
                let name = self.bump();
                let (type_args, args, lambda) = self.call_parts()?;
                if type_args.is_none() && args.is_none() && lambda.is_none() {
                    return Ok(Expr::Atom(name));
                }
                Ok(Expr::Call(Box::new(Call {
                    select: None,
                    name,
                    type_args,
                    args,
                    lambda,
                    style: CallStyle::Regular,
                })))
            }
            TokenKind::Punct if is_one_of(token, CLOSERS) => {
                Err(self.error("unexpected closing delimiter".to_string()))
            }
            TokenKind::Punct if token.is("{") => Ok(Expr::Lambda(Box::new(self.lambda()?))),
            TokenKind::Punct if token.is("(") => self.parenthesized(),
            TokenKind::Punct if token.is("[") => Ok(Expr::List(Box::new(self.bracketed("[", "]")?))),
            TokenKind::Punct if token.is("@") && self.caps.annotated_expressions && !self.at_label() => {
                Ok(Expr::Annotated(Box::new(self.annotated()?)))
            }
            // Stray operators and separators stay in the tree as atoms.
            TokenKind::Punct => Ok(Expr::Atom(self.bump())),
        }
    }

    fn parenthesized(&mut self) -> Result<Expr, ScrubError> {
        if self.peek_at(1).is_some_and(|t| t.is(")")) {
            // `()` as in the function type `() -> Unit`
            let open = self.bump();
            let close = self.bump();
            return Ok(Expr::List(Box::new(Bracketed {
                open,
                items: Vec::new(),
                close,
            })));
        }
        self.with_line_sensitivity(false, |p| {
            let open = p.bump();
            let inner = p.sequence(&[])?;
            let close = p.expect(")")?;
            Ok(Expr::Parenthesized(Box::new(Parenthesized { open, inner, close })))
        })
    }

    /// Juxtaposed expressions up to a closing delimiter or one of `stops`.
    fn sequence(&mut self, stops: &[&str]) -> Result<Expr, ScrubError> {
        let at_end = |p: &Self| {
            p.peek()
                .map_or(true, |t| is_one_of(t, CLOSERS) || is_one_of(t, stops))
        };
        let head = self.expression()?;
        let mut tail = Vec::new();
        while !at_end(self) {
            tail.push(self.expression()?);
        }
        Ok(if tail.is_empty() {
            head
        } else {
            Expr::Sequence(Box::new(Sequence { head, tail }))
        })
    }

    // ------------------------------------------------------------------------
    // Calls
    // ------------------------------------------------------------------------

    /// Type arguments, a parenthesised argument list and a trailing lambda,
    /// each optional.
    fn call_parts(
        &mut self,
    ) -> Result<(Option<TypeArgs>, Option<Arguments>, Option<Lambda>), ScrubError> {
        let type_args = match self.type_args_close() {
            Some(close) => Some(self.type_args(close)),
            None => None,
        };
        let args = if self.at_on_line("(") {
            Some(self.arguments()?)
        } else {
            None
        };
        let lambda = if self.at_on_line("{") {
            Some(self.lambda()?)
        } else {
            None
        };
        Ok((type_args, args, lambda))
    }

    /// Index of the `>` closing a type argument list that starts at the
    /// cursor, when the list is followed by a call's `(` or `{`.
    fn type_args_close(&self) -> Option<usize> {
        let open = self.peek()?;
        if !open.is("<") || !open.leading.is_empty() {
            return None;
        }
        let mut depth = 0usize;
        let mut index = self.pos;
        loop {
            let token = self.tokens.get(index)?;
            if index > self.pos && token.starts_line() {
                return None;
            }
            if token.is("<") {
                depth += 1;
            } else if token.is(">") {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            } else if !(token.is_ident() || is_one_of(token, &[".", ",", "?", "*", ":"])) {
                return None;
            }
            index += 1;
        }
        let after = self.tokens.get(index + 1)?;
        ((after.is("(") || after.is("{")) && !after.starts_line()).then_some(index)
    }

    fn type_args(&mut self, close: usize) -> TypeArgs {
        let open = self.bump();
        let mut params = Vec::new();
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        while self.pos < close {
            let token = self.bump();
            if token.is("<") {
                depth += 1;
            } else if token.is(">") {
                depth = depth.saturating_sub(1);
            } else if token.is(",") && depth == 0 {
                params.push(TypeParam {
                    tokens: std::mem::take(&mut tokens),
                    comma: Some(token),
                });
                continue;
            }
            tokens.push(token);
        }
        if !tokens.is_empty() {
            params.push(TypeParam {
                tokens,
                comma: None,
            });
        }
        let close = self.bump();
        TypeArgs {
            open,
            params,
            close,
        }
    }

    fn arguments(&mut self) -> Result<Arguments, ScrubError> {
        self.with_line_sensitivity(false, |p| {
            let open = p.bump();
            let items = p.argument_items(")")?;
            let close = p.expect(")")?;
            Ok(Arguments {
                open: Some(open),
                items,
                close: Some(close),
            })
        })
    }

    fn bracketed(&mut self, open: &str, close: &str) -> Result<Bracketed, ScrubError> {
        self.with_line_sensitivity(false, |p| {
            let open = p.expect(open)?;
            let items = p.argument_items(close)?;
            let close = p.expect(close)?;
            Ok(Bracketed { open, items, close })
        })
    }

    fn argument_items(&mut self, close: &str) -> Result<Vec<Argument>, ScrubError> {
        let mut items = Vec::new();
        while !self.at(close) {
            let expr = self.sequence(&[","])?;
            let comma = self.at(",").then(|| self.bump());
            let more = comma.is_some();
            items.push(Argument { expr, comma });
            if !more {
                break;
            }
        }
        Ok(items)
    }

    fn lambda(&mut self) -> Result<Lambda, ScrubError> {
        self.with_line_sensitivity(true, |p| {
            let open = p.expect("{")?;
            let params = match p.lambda_arrow() {
                Some(arrow) => {
                    let mut tokens = Vec::new();
                    while p.pos < arrow {
                        tokens.push(p.bump());
                    }
                    let arrow = p.bump();
                    Some(LambdaParams { tokens, arrow })
                }
                None => None,
            };
            let body = p.statements(Some("}"))?;
            let close = p.expect("}")?;
            Ok(Lambda {
                open,
                params,
                body,
                close,
            })
        })
    }

    /// Index of the `->` ending a lambda parameter list at the cursor.
    fn lambda_arrow(&self) -> Option<usize> {
        let mut index = self.pos;
        loop {
            let token = self.tokens.get(index)?;
            if token.is("->") {
                return Some(index);
            }
            if index > self.pos && token.starts_line() {
                return None;
            }
            let allowed = token.is_ident() || is_one_of(token, &[",", ":", ".", "?", "(", ")"]);
            if !allowed {
                return None;
            }
            index += 1;
        }
    }

    // ------------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------------

    /// `@` glued to a preceding name is a label reference (`return@forEach`).
    fn at_label(&self) -> bool {
        let glued = self.peek().is_some_and(|t| t.leading.is_empty());
        glued && self.pos > 0 && self.tokens[self.pos - 1].is_ident()
    }

    fn annotated(&mut self) -> Result<Annotated, ScrubError> {
        let at = self.bump();
        let mut name = vec![self.name()?];
        while (self.at_attached(".") || self.at_attached(":"))
            && self
                .peek_at(1)
                .is_some_and(|t| t.is_ident() && t.leading.is_empty())
        {
            name.push(self.bump());
            name.push(self.bump());
        }
        let args = if self.at_attached("(") {
            Some(self.arguments()?)
        } else {
            None
        };

        let file_level = name.len() > 1 && name[0].text == "file" && name[1].is(":");
        let annotates = !file_level
            && self.peek().is_some_and(|t| {
                !is_one_of(t, CLOSERS) && !is_one_of(t, &[",", ";", "import", "package"])
            });
        let expr = if annotates {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Annotated {
            at,
            name,
            args,
            expr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Print;

    fn groovy(source: &str) -> Script {
        parse(source, Dialect::Groovy).unwrap()
    }

    fn kotlin(source: &str) -> Script {
        parse(source, Dialect::Kotlin).unwrap()
    }

    fn first_expr(script: &Script) -> Expr {
        script.statements[0].as_expr().cloned().unwrap()
    }

    #[test]
    fn groovy_command_chain_nests_calls() {
        let script = groovy("id 'x' version '1.2' apply false\n");
        let Expr::Call(apply) = first_expr(&script) else {
            panic!("expected a call");
        };
        assert_eq!(apply.simple_name(), "apply");
        assert_eq!(apply.style, CallStyle::Command);
        let version = apply.receiver().and_then(Expr::as_call).unwrap();
        assert_eq!(version.simple_name(), "version");
        let id = version.receiver().and_then(Expr::as_call).unwrap();
        assert_eq!(id.simple_name(), "id");
        assert_eq!(id.first_argument().unwrap().printed(), "'x'");
    }

    #[test]
    fn kotlin_infix_call_takes_receiver() {
        let script = kotlin("id(\"x\") version \"1.2\"\n");
        let Expr::Call(version) = first_expr(&script) else {
            panic!("expected a call");
        };
        assert_eq!(version.style, CallStyle::Infix);
        assert_eq!(version.simple_name(), "version");
        let id = version.receiver().and_then(Expr::as_call).unwrap();
        assert_eq!(id.first_argument().unwrap().printed(), "\"x\"");
    }

    #[test]
    fn newline_separates_statements() {
        let script = groovy("a 'x'\nb 'y'\n");
        assert_eq!(script.statements.len(), 2);
    }

    #[test]
    fn leading_dot_continues_statement() {
        let script = kotlin("tasks\n    .named(\"a\")\n    .configure { }\n");
        assert_eq!(script.statements.len(), 1);
    }

    #[test]
    fn type_arguments_need_a_call() {
        let script = kotlin("tasks.withType<KotlinCompile> { }\n");
        let call = script.calls()[0].clone();
        assert_eq!(call.type_parameters(), vec!["KotlinCompile".to_string()]);

        let script = kotlin("val ok = a < b\n");
        assert!(script.calls().is_empty());
    }

    #[test]
    fn imports_expose_qualified_name() {
        let script = kotlin("import org.gradle.api.Plugin\nimport foo.bar.* as baz\n");
        let names: Vec<_> = script.imports().map(|i| i.qualified_name()).collect();
        assert_eq!(names, vec!["org.gradle.api.Plugin", "foo.bar.*"]);
    }

    #[test]
    fn kotlin_annotation_wraps_next_expression() {
        let script = kotlin("@Suppress(\"DSL_SCOPE_VIOLATION\")\nalias(libs.plugins.x)\n");
        let Expr::Annotated(annotated) = first_expr(&script) else {
            panic!("expected an annotation");
        };
        let inner = annotated.expr.as_ref().and_then(Expr::as_call).unwrap();
        assert_eq!(inner.simple_name(), "alias");
    }

    #[test]
    fn file_annotation_stands_alone() {
        let script = kotlin("@file:Suppress(\"x\")\nplugins { }\n");
        assert_eq!(script.statements.len(), 2);
    }

    #[test]
    fn lambda_parameters_are_kept() {
        let source = "configurations.all { c -> c.exclude group: 'x' }\n";
        let script = groovy(source);
        assert_eq!(script.print(), source);
        let lambda = script.calls()[0].lambda.clone().unwrap();
        assert!(lambda.params.is_some());
    }

    #[test]
    fn unterminated_string_is_a_parse_error() {
        let err = parse("id \"broken\n", Dialect::Kotlin).unwrap_err();
        assert!(matches!(err, ScrubError::Parse { .. }));
    }

    #[test]
    fn unbalanced_braces_are_a_parse_error() {
        assert!(parse("plugins {\n", Dialect::Groovy).is_err());
        assert!(parse("}\n", Dialect::Groovy).is_err());
    }
}
