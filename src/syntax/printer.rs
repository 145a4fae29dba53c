//! Prints syntax trees back to text.
//!
//! Printing walks the tree in source order and emits each token's leading
//! trivia followed by its text. [`Print::printed`] drops the leading trivia of
//! the first token, which is the form rules match against.

use crate::syntax::Token;
use crate::tree::{
    Annotated, Argument, Arguments, Binary, Bracketed, Call, Expr, ExpressionStatement,
    FieldAccess, Import, Index, Lambda, Parenthesized, Postfix, Prefix, Script, Sequence,
    Statement, TypeArgs,
};

/// Accumulates printed text.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    skip_leading: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A printer that omits the trivia in front of the first token.
    pub fn trimmed() -> Self {
        Self {
            out: String::new(),
            skip_leading: true,
        }
    }

    pub fn token(&mut self, token: &Token) {
        if self.skip_leading {
            self.skip_leading = false;
        } else {
            self.out.push_str(&token.leading);
        }
        self.out.push_str(&token.text);
    }

    pub fn raw(&mut self, text: &str) {
        self.skip_leading = false;
        self.out.push_str(text);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

pub trait Print {
    fn print_to(&self, p: &mut Printer);

    /// Full text including leading trivia.
    fn print(&self) -> String {
        let mut p = Printer::new();
        self.print_to(&mut p);
        p.finish()
    }

    /// Text without the trivia in front of the first token.
    fn printed(&self) -> String {
        let mut p = Printer::trimmed();
        self.print_to(&mut p);
        p.finish()
    }
}

impl Print for Token {
    fn print_to(&self, p: &mut Printer) {
        p.token(self);
    }
}

impl<T: Print> Print for Option<T> {
    fn print_to(&self, p: &mut Printer) {
        if let Some(inner) = self {
            inner.print_to(p);
        }
    }
}

impl<T: Print> Print for [T] {
    fn print_to(&self, p: &mut Printer) {
        for item in self {
            item.print_to(p);
        }
    }
}

impl<T: Print> Print for Vec<T> {
    fn print_to(&self, p: &mut Printer) {
        self.as_slice().print_to(p);
    }
}

impl Print for Script {
    fn print_to(&self, p: &mut Printer) {
        for statement in &self.statements {
            statement.print_to(p);
        }
        p.raw(&self.eof);
    }
}

impl Print for Statement {
    fn print_to(&self, p: &mut Printer) {
        match self {
            Statement::Import(import) => import.print_to(p),
            Statement::Expression(statement) => statement.print_to(p),
            Statement::Empty(semicolon) => semicolon.print_to(p),
        }
    }
}

impl Print for Import {
    fn print_to(&self, p: &mut Printer) {
        self.keyword.print_to(p);
        self.modifier.print_to(p);
        self.path.print_to(p);
        if let Some(alias) = &self.alias {
            alias.keyword.print_to(p);
            alias.name.print_to(p);
        }
        self.semicolon.print_to(p);
    }
}

impl Print for ExpressionStatement {
    fn print_to(&self, p: &mut Printer) {
        self.expr.print_to(p);
        self.semicolon.print_to(p);
    }
}

impl Print for Expr {
    fn print_to(&self, p: &mut Printer) {
        match self {
            Expr::Atom(token) => token.print_to(p),
            Expr::Call(call) => call.print_to(p),
            Expr::Lambda(lambda) => lambda.print_to(p),
            Expr::Annotated(annotated) => annotated.print_to(p),
            Expr::FieldAccess(access) => access.print_to(p),
            Expr::Parenthesized(group) => group.print_to(p),
            Expr::Index(index) => index.print_to(p),
            Expr::Binary(binary) => binary.print_to(p),
            Expr::Prefix(prefix) => prefix.print_to(p),
            Expr::Postfix(postfix) => postfix.print_to(p),
            Expr::List(list) => list.print_to(p),
            Expr::Sequence(sequence) => sequence.print_to(p),
        }
    }
}

impl Print for Call {
    fn print_to(&self, p: &mut Printer) {
        if let Some(select) = &self.select {
            select.target.print_to(p);
            select.dot.print_to(p);
        }
        self.name.print_to(p);
        self.type_args.print_to(p);
        self.args.print_to(p);
        self.lambda.print_to(p);
    }
}

impl Print for TypeArgs {
    fn print_to(&self, p: &mut Printer) {
        self.open.print_to(p);
        for param in &self.params {
            param.tokens.print_to(p);
            param.comma.print_to(p);
        }
        self.close.print_to(p);
    }
}

impl Print for Arguments {
    fn print_to(&self, p: &mut Printer) {
        self.open.print_to(p);
        self.items.print_to(p);
        self.close.print_to(p);
    }
}

impl Print for Argument {
    fn print_to(&self, p: &mut Printer) {
        self.expr.print_to(p);
        self.comma.print_to(p);
    }
}

impl Print for Bracketed {
    fn print_to(&self, p: &mut Printer) {
        self.open.print_to(p);
        self.items.print_to(p);
        self.close.print_to(p);
    }
}

impl Print for Lambda {
    fn print_to(&self, p: &mut Printer) {
        self.open.print_to(p);
        if let Some(params) = &self.params {
            params.tokens.print_to(p);
            params.arrow.print_to(p);
        }
        for statement in &self.body {
            statement.print_to(p);
        }
        self.close.print_to(p);
    }
}

impl Print for Annotated {
    fn print_to(&self, p: &mut Printer) {
        self.at.print_to(p);
        self.name.print_to(p);
        self.args.print_to(p);
        self.expr.print_to(p);
    }
}

impl Print for FieldAccess {
    fn print_to(&self, p: &mut Printer) {
        self.target.print_to(p);
        self.dot.print_to(p);
        self.name.print_to(p);
    }
}

impl Print for Parenthesized {
    fn print_to(&self, p: &mut Printer) {
        self.open.print_to(p);
        self.inner.print_to(p);
        self.close.print_to(p);
    }
}

impl Print for Index {
    fn print_to(&self, p: &mut Printer) {
        self.target.print_to(p);
        self.brackets.print_to(p);
    }
}

impl Print for Binary {
    fn print_to(&self, p: &mut Printer) {
        self.left.print_to(p);
        self.op.print_to(p);
        self.right.print_to(p);
    }
}

impl Print for Prefix {
    fn print_to(&self, p: &mut Printer) {
        self.op.print_to(p);
        self.operand.print_to(p);
    }
}

impl Print for Postfix {
    fn print_to(&self, p: &mut Printer) {
        self.operand.print_to(p);
        self.op.print_to(p);
    }
}

impl Print for Sequence {
    fn print_to(&self, p: &mut Printer) {
        self.head.print_to(p);
        self.tail.print_to(p);
    }
}

impl<T: Print + ?Sized> Print for Box<T> {
    fn print_to(&self, p: &mut Printer) {
        (**self).print_to(p);
    }
}
