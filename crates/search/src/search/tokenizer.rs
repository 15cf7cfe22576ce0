//! Query string tokenizer.
//!
//! A query is a sequence of whitespace-terminated terms:
//!
//! ```text
//! term  := ["OR "] ["-"] (field op value | text)
//! op    := "=" | "!=" | "<" | "<=" | ">" | ">=" | ":"
//! value := quoted | bare | value "," value | value ".." value
//! ```
//!
//! Fragments that fit neither form are skipped up to the next whitespace, as
//! is an `OR` with no term after it.
//! The tokenizer never fails and does no I/O; callers append a trailing
//! space so that the last term is terminated.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Operator, Term, TermKind};

static TERM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(?P<or>OR\s+)?(?P<neg>-)?"#,
        r#"(?:"#,
        r#"(?P<field>[A-Za-z][A-Za-z0-9_.\-]*)"#,
        r#"(?P<op>!=|<=|>=|=|<|>|:)"#,
        r#"(?P<value>(?:"[^"]*"|[^\s"])+)"#,
        r#"|"#,
        r#"(?P<text>"[^"]+"|[^\s"=<>!:\-][^\s"=<>!:]*)"#,
        r#")\s+"#,
    ))
    .expect("term pattern is valid")
});

/// Returns the terms of `query` in textual order.
///
/// # Examples
///
/// ```
/// use radar_search::search::tokenizer::tokenize;
///
/// let terms: Vec<_> = tokenize("category=Security OR -grid ").collect();
/// assert_eq!(terms.len(), 2);
/// assert!(terms[1].starts_or_group && terms[1].negated);
/// ```
pub fn tokenize(query: &str) -> Terms<'_> {
    Terms { input: query, pos: 0 }
}

/// Lazy iterator over the terms of a query string.
///
/// Cloning restarts nothing; it forks the iterator at its current position.
#[derive(Debug, Clone)]
pub struct Terms<'a> {
    input: &'a str,
    pos: usize,
}

impl Iterator for Terms<'_> {
    type Item = Term;

    fn next(&mut self) -> Option<Term> {
        loop {
            let rest = &self.input[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.is_empty() {
                return None;
            }

            if let Some(caps) = TERM_PATTERN.captures(trimmed)
                && !is_dangling_or(&caps)
            {
                self.pos += caps.get(0).map_or(0, |m| m.end());
                let negated = caps.name("neg").is_some();
                let starts_or_group = caps.name("or").is_some();

                let kind = match (caps.name("field"), caps.name("op"), caps.name("value")) {
                    (Some(field), Some(op), Some(value)) => TermKind::Field {
                        field: field.as_str().to_string(),
                        operator: op.as_str().parse().unwrap_or_default(),
                        raw_value: value.as_str().to_string(),
                    },
                    _ => {
                        let text = caps.name("text").map_or("", |m| m.as_str());
                        TermKind::Text(text.trim_matches('"').to_string())
                    }
                };

                return Some(Term {
                    negated,
                    starts_or_group,
                    kind,
                });
            }

            // Noise: drop everything up to the next separator.
            let skip = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            self.pos += skip;
        }
    }
}

/// An unquoted `OR` lexed as text: a connective with nothing to connect.
fn is_dangling_or(caps: &regex::Captures<'_>) -> bool {
    caps.name("neg").is_none() && caps.name("text").is_some_and(|m| m.as_str() == "OR")
}
