//! Parsed query structure.
//!
//! The tokenizer yields a flat stream of [`Term`]s. [`Query::from_terms`]
//! groups that stream into a disjunction of conjunctive [`Clause`]s: every
//! term that carries an `OR ` prefix starts a new clause, every other term
//! joins the clause before it. There are no parentheses.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::property::Operator;

/// What a term tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermKind {
    /// `field<op>value`.
    Field {
        /// Field name as typed (case preserved).
        field: String,
        /// Comparison operator.
        operator: Operator,
        /// Value text, quotes included.
        raw_value: String,
    },
    /// Free text matched against the text index.
    Text(String),
}

/// One lexical unit of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Leading `-`.
    pub negated: bool,
    /// Leading `OR `.
    pub starts_or_group: bool,
    /// Field test or free text.
    pub kind: TermKind,
}

impl Term {
    /// Creates a plain field term.
    pub fn field(field: impl Into<String>, operator: Operator, raw_value: impl Into<String>) -> Self {
        Self {
            negated: false,
            starts_or_group: false,
            kind: TermKind::Field {
                field: field.into(),
                operator,
                raw_value: raw_value.into(),
            },
        }
    }

    /// Creates a plain free-text term.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            negated: false,
            starts_or_group: false,
            kind: TermKind::Text(text.into()),
        }
    }

    /// Marks the term as negated.
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    /// Marks the term as the first of a new OR group.
    pub fn or(mut self) -> Self {
        self.starts_or_group = true;
        self
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.starts_or_group {
            write!(f, "OR ")?;
        }
        if self.negated {
            write!(f, "-")?;
        }
        match &self.kind {
            TermKind::Field {
                field,
                operator,
                raw_value,
            } => write!(f, "{}{}{}", field, operator, raw_value),
            TermKind::Text(text) => write!(f, "{}", text),
        }
    }
}

/// A conjunction of terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    /// Terms that must all hold.
    pub terms: Vec<Term>,
}

impl Clause {
    /// Returns `true` if every term of the clause is negated.
    pub fn all_negated(&self) -> bool {
        self.terms.iter().all(|t| t.negated)
    }
}

/// A disjunction of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Clauses of which at least one must hold.
    pub clauses: Vec<Clause>,
}

impl Query {
    /// Groups a term stream into clauses.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut clauses: Vec<Clause> = Vec::new();
        for term in terms {
            match clauses.last_mut() {
                Some(clause) if !term.starts_or_group => clause.terms.push(term),
                _ => clauses.push(Clause { terms: vec![term] }),
            }
        }
        Self { clauses }
    }

    /// Returns `true` if the query has no terms at all.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterates every term of every clause in textual order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.clauses.iter().flat_map(|c| c.terms.iter())
    }
}

/// A sort request: `[-]key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Sort key (a query field name or a gate timestamp function).
    pub key: String,
    /// Largest first.
    pub descending: bool,
}

impl SortSpec {
    /// Parses a sort spec such as `-created.when` (descending) or `name`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some(stripped) = s.strip_prefix('-') {
            Self {
                key: stripped.to_string(),
                descending: true,
            }
        } else {
            Self {
                key: s.to_string(),
                descending: false,
            }
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}
