//! Syntax module for Gradle build scripts.
//!
//! Lexing, parsing and printing of the two script dialects. The parser is
//! lossless: every byte of the input ends up in a token or in the leading
//! trivia of a token, so printing an untouched tree reproduces the input
//! exactly.

use serde::{Deserialize, Serialize};

pub mod lexer;
pub mod parser;
pub mod printer;

pub use parser::parse;
pub use printer::{Print, Printer};

/// Represents a byte span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::from(span.start..span.end)
    }
}

/// The two surface syntaxes of the Gradle build DSL.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Dialect {
    /// Groovy DSL: `build.gradle`, `settings.gradle`, `*.gradle`.
    #[default]
    Groovy,
    /// Kotlin DSL: `build.gradle.kts`, `*.gradle.kts`.
    Kotlin,
}

/// Syntactic capabilities that distinguish the dialects.
///
/// The parser and the rewrite visitor consult these flags instead of
/// branching on the dialect directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DialectCaps {
    /// `@Suppress("x") call()` wraps an expression in an annotation node.
    pub annotated_expressions: bool,
    /// Parenthesis-free calls: `implementation 'a:b:1.0'`, `id 'x' version '1'`.
    pub command_expressions: bool,
    /// Identifier-named binary calls: `id("x") version "1"`.
    pub infix_calls: bool,
}

impl Dialect {
    pub fn capabilities(self) -> DialectCaps {
        match self {
            Dialect::Groovy => DialectCaps {
                annotated_expressions: false,
                command_expressions: true,
                infix_calls: false,
            },
            Dialect::Kotlin => DialectCaps {
                annotated_expressions: true,
                command_expressions: false,
                infix_calls: true,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Groovy => "groovy",
            Dialect::Kotlin => "kotlin",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexical class of a token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Str,
    Number,
    Punct,
    Unknown,
}

/// A token together with the whitespace and comments that precede it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub leading: String,
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            leading: String::new(),
            kind,
            text: text.into(),
            span: Span::default(),
        }
    }

    /// True for a punctuation or identifier token spelled `text`.
    pub fn is(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Punct | TokenKind::Ident) && self.text == text
    }

    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }

    /// True when a line break separates this token from the previous one.
    pub fn starts_line(&self) -> bool {
        self.leading.contains(['\n', '\r'])
    }
}
