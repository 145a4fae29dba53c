//! Pure rebuild operations on statement and argument lists.
//!
//! Removing an entry also repairs the trivia around it: the removed entry's
//! comment block goes with it, a blank line that separated it from the
//! previous entry survives, and no separator is left dangling.

use im::Vector;

use crate::tree::{Argument, Statement};

/// Removes `list[index]`.
///
/// `trailer` is the trivia that follows the last statement of the list (the
/// leading trivia of a closing `}` or the end-of-file trivia). The repaired
/// trailer is returned alongside the new list; it only differs from the input
/// when the last statement was removed.
pub fn remove_statement(
    list: &Vector<Statement>,
    index: usize,
    trailer: &str,
) -> (Vector<Statement>, String) {
    let mut out = list.clone();
    if index >= out.len() {
        return (out, trailer.to_string());
    }
    let removed = out.remove(index);
    let leading = removed.leading();
    let at_start = index == 0 && leading.is_empty();

    match out.get(index).cloned() {
        Some(next) => {
            let repaired = repair(leading, next.leading(), at_start, false);
            out.set(index, next.with_leading(repaired));
            (out, trailer.to_string())
        }
        None => {
            let repaired = repair(leading, trailer, at_start, true);
            (out, repaired)
        }
    }
}

/// Removes `items[index]` from a comma-separated argument list.
pub fn remove_argument(items: &[Argument], index: usize) -> Vec<Argument> {
    let mut out = items.to_vec();
    if index >= out.len() {
        return out;
    }
    let removed = out.remove(index);
    let leading = removed.expr.first_token().leading.clone();

    if let Some(next) = out.get_mut(index) {
        let token = next.expr.first_token_mut();
        if !token.starts_line() {
            token.leading = format!("{}{}", leading, trim_blanks(&token.leading));
        }
    } else if index > 0 {
        // The removed entry was last; its comma (a trailing comma, if any)
        // replaces the one in front of it.
        out[index - 1].comma = removed.comma;
    }
    out
}

/// Computes the trivia in front of whatever follows a removed statement.
///
/// `removed` is the removed statement's leading trivia and `following` the
/// trivia in front of the next token, or the list's trailer when `at_end`.
fn repair(removed: &str, following: &str, at_start: bool, at_end: bool) -> String {
    let removed_on_own_line = has_newline(removed);
    let following_on_own_line = has_newline(following);

    match (removed_on_own_line, following_on_own_line) {
        (_, true) => {
            // Anything before the line break in `following` trails the
            // removed statement.
            let rest = from_first_newline(following);
            if !removed_on_own_line {
                if at_start {
                    return rest.trim_start().to_string();
                }
                return rest.to_string();
            }
            match last_blank_line(removed) {
                // The gap keeps as many blank lines as the wider side had,
                // but never opens one in front of a closing brace.
                Some(end) => {
                    let head = removed[..end].trim_end();
                    let mut gap = newline_run(rest);
                    if !at_end {
                        gap = gap.max(newline_run(&removed[head.len()..]));
                    }
                    let newline = if following.contains("\r\n") { "\r\n" } else { "\n" };
                    format!("{}{}{}", head, newline.repeat(gap), after_newline_run(rest))
                }
                None => format!("{}{}", before_first_newline(removed), rest),
            }
        }
        (_, false) => format!("{}{}", removed, trim_blanks(following)),
    }
}

/// Offset of the first line break of the last blank line in `leading`.
///
/// Everything before it belongs to what precedes the statement: the rest of
/// the previous line and any comment block separated from the statement by
/// a blank line.
fn last_blank_line(leading: &str) -> Option<usize> {
    let newlines: Vec<usize> = leading
        .char_indices()
        .filter(|&(_, c)| c == '\n')
        .map(|(i, _)| i)
        .collect();

    newlines
        .windows(2)
        .rev()
        .find(|pair| leading[pair[0] + 1..pair[1]].chars().all(|c| c.is_whitespace()))
        .map(|pair| pair[0])
}

/// Line breaks in the whitespace that opens `text`.
fn newline_run(text: &str) -> usize {
    let blank = text.len() - text.trim_start().len();
    text[..blank].matches('\n').count()
}

/// `text` without its opening blank lines; indentation of the first
/// non-blank line stays.
fn after_newline_run(text: &str) -> &str {
    let blank = text.len() - text.trim_start().len();
    match text[..blank].rfind('\n') {
        Some(i) => &text[i + 1..],
        None => text,
    }
}

fn before_first_newline(text: &str) -> &str {
    match text.find(['\n', '\r']) {
        Some(first) => &text[..first],
        None => text,
    }
}

fn has_newline(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

fn from_first_newline(text: &str) -> &str {
    match text.find(['\n', '\r']) {
        Some(i) => &text[i..],
        None => "",
    }
}

fn trim_blanks(text: &str) -> &str {
    text.trim_start_matches([' ', '\t'])
}
