//! Lossless lexer built on the pest grammar in `grammar.pest`.
//!
//! Whitespace, newlines and comments are folded into the `leading` trivia of
//! the token that follows them; whatever trails the last token is returned
//! separately as end-of-file trivia.

use pest::Parser;
use pest_derive::Parser;

use crate::syntax::{Span, Token, TokenKind};
use crate::ScrubError;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct ScriptLexer;

/// Output of [`lex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub eof: String,
}

pub fn lex(source: &str) -> Result<Lexed, ScrubError> {
    let mut pairs = ScriptLexer::parse(Rule::tokens, source).map_err(|e| {
        let (start, end) = match e.location {
            pest::error::InputLocation::Pos(pos) => (pos, pos),
            pest::error::InputLocation::Span((start, end)) => (start, end),
        };
        err_ctx!(Parse, "unrecognised input", source, Span { start, end })
    })?;

    let Some(root) = pairs.next() else {
        return Ok(Lexed {
            tokens: Vec::new(),
            eof: String::new(),
        });
    };

    let mut tokens = Vec::new();
    let mut pending = String::new();
    for pair in root.into_inner() {
        let kind = match pair.as_rule() {
            Rule::shebang
            | Rule::newline
            | Rule::whitespace
            | Rule::line_comment
            | Rule::block_comment => {
                pending.push_str(pair.as_str());
                continue;
            }
            Rule::EOI => break,
            Rule::string => TokenKind::Str,
            Rule::number => TokenKind::Number,
            Rule::identifier => TokenKind::Ident,
            Rule::punct => TokenKind::Punct,
            _ => TokenKind::Unknown,
        };
        let span = pair.as_span();
        tokens.push(Token {
            leading: std::mem::take(&mut pending),
            kind,
            text: pair.as_str().to_string(),
            span: Span {
                start: span.start(),
                end: span.end(),
            },
        });
    }

    Ok(Lexed {
        tokens,
        eof: pending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        lex(source)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn trivia_attaches_to_following_token() {
        let lexed = lex("  // note\nfoo /* x */ bar\n").unwrap();
        assert_eq!(lexed.tokens[0].leading, "  // note\n");
        assert_eq!(lexed.tokens[1].leading, " /* x */ ");
        assert_eq!(lexed.eof, "\n");
    }

    #[test]
    fn strings_with_templates_are_single_tokens() {
        let tokens = kinds(r#"x("a ${b("}")} c") 'single' """raw "quoted" text""""#);
        let strings: Vec<_> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::Str)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(
            strings,
            vec![r#""a ${b("}")} c""#, "'single'", r#""""raw "quoted" text""""#]
        );
    }

    #[test]
    fn multi_character_punctuation() {
        let tokens = kinds("a?.b ?: c -> d::e !! f..g");
        let puncts: Vec<_> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::Punct)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(puncts, vec!["?.", "?:", "->", "::", "!!", ".."]);
    }

    #[test]
    fn backtick_identifiers_and_numbers() {
        let tokens = kinds("`java-library` 1.8 0x1F 10L");
        assert_eq!(tokens[0], (TokenKind::Ident, "`java-library`".to_string()));
        assert_eq!(tokens[1], (TokenKind::Number, "1.8".to_string()));
        assert_eq!(tokens[2], (TokenKind::Number, "0x1F".to_string()));
        assert_eq!(tokens[3], (TokenKind::Number, "10L".to_string()));
    }

    #[test]
    fn unterminated_string_falls_back_to_unknown() {
        let tokens = kinds("id \"abc\n");
        assert_eq!(tokens[1].0, TokenKind::Unknown);
    }

    #[test]
    fn reassembles_source() {
        let source = "#!/usr/bin/env gradle\nplugins {\n  id 'java' // c\n}\n";
        let lexed = lex(source).unwrap();
        let mut rebuilt = String::new();
        for t in &lexed.tokens {
            rebuilt.push_str(&t.leading);
            rebuilt.push_str(&t.text);
        }
        rebuilt.push_str(&lexed.eof);
        assert_eq!(rebuilt, source);
    }
}
