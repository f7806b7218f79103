use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::super::facts::CandidateFactBase;
use super::super::normalize::normalize_name;

/// Declared way of matching a certification name.
///
/// In JSON a bare string is shorthand for `{"exact": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "PatternRepr")]
pub enum MatchPattern {
    Exact(String),
    OneOf(Vec<String>),
    Regex(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternRepr {
    Bare(String),
    Tagged(TaggedPattern),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum TaggedPattern {
    Exact(String),
    OneOf(Vec<String>),
    Regex(String),
}

impl From<PatternRepr> for MatchPattern {
    fn from(repr: PatternRepr) -> Self {
        match repr {
            PatternRepr::Bare(name) | PatternRepr::Tagged(TaggedPattern::Exact(name)) => {
                MatchPattern::Exact(name)
            }
            PatternRepr::Tagged(TaggedPattern::OneOf(names)) => MatchPattern::OneOf(names),
            PatternRepr::Tagged(TaggedPattern::Regex(pattern)) => MatchPattern::Regex(pattern),
        }
    }
}

impl MatchPattern {
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex(pattern.into())
    }
}

/// Qualification rule over a candidate's active certifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    HasCertificationMatching(MatchPattern),
    HasAnyOf(Vec<MatchPattern>),
    HasAllOf(Vec<MatchPattern>),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn any_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::HasAnyOf(names.into_iter().map(MatchPattern::exact).collect())
    }

    pub fn all_of(patterns: Vec<MatchPattern>) -> Self {
        Self::HasAllOf(patterns)
    }

    pub fn negate(predicate: Predicate) -> Self {
        Self::Not(Box::new(predicate))
    }

    pub(crate) fn compile(&self) -> Result<CompiledPredicate, PredicateError> {
        match self {
            Predicate::HasCertificationMatching(pattern) => {
                compile_pattern(pattern).map(CompiledPredicate::Matching)
            }
            Predicate::HasAnyOf(patterns) => compile_patterns("has_any_of", patterns)
                .map(CompiledPredicate::AnyOf),
            Predicate::HasAllOf(patterns) => compile_patterns("has_all_of", patterns)
                .map(CompiledPredicate::AllOf),
            Predicate::And(predicates) => {
                compile_children("and", predicates).map(CompiledPredicate::And)
            }
            Predicate::Or(predicates) => {
                compile_children("or", predicates).map(CompiledPredicate::Or)
            }
            Predicate::Not(inner) => inner
                .compile()
                .map(|compiled| CompiledPredicate::Not(Box::new(compiled))),
        }
    }
}

/// Reasons a badge rule cannot be evaluated.
#[derive(Debug, thiserror::Error)]
pub enum PredicateError {
    #[error("empty certification pattern")]
    EmptyPattern,
    #[error("'{0}' needs at least one entry")]
    EmptyList(&'static str),
    #[error("invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("malformed badge definition: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledPattern {
    Exact(String),
    OneOf(BTreeSet<String>),
    Regex(Regex),
}

impl CompiledPattern {
    fn matches(&self, normalized_name: &str) -> bool {
        match self {
            CompiledPattern::Exact(name) => name == normalized_name,
            CompiledPattern::OneOf(names) => names.contains(normalized_name),
            CompiledPattern::Regex(regex) => regex.is_match(normalized_name),
        }
    }

    fn matches_any(&self, facts: &CandidateFactBase) -> bool {
        facts
            .active_certifications()
            .any(|fact| self.matches(&fact.normalized_name))
    }
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledPredicate {
    Matching(CompiledPattern),
    AnyOf(Vec<CompiledPattern>),
    AllOf(Vec<CompiledPattern>),
    And(Vec<CompiledPredicate>),
    Or(Vec<CompiledPredicate>),
    Not(Box<CompiledPredicate>),
}

impl CompiledPredicate {
    pub(crate) fn evaluate(&self, facts: &CandidateFactBase) -> bool {
        match self {
            CompiledPredicate::Matching(pattern) => pattern.matches_any(facts),
            CompiledPredicate::AnyOf(patterns) => {
                patterns.iter().any(|pattern| pattern.matches_any(facts))
            }
            CompiledPredicate::AllOf(patterns) => {
                patterns.iter().all(|pattern| pattern.matches_any(facts))
            }
            CompiledPredicate::And(children) => children.iter().all(|child| child.evaluate(facts)),
            CompiledPredicate::Or(children) => children.iter().any(|child| child.evaluate(facts)),
            CompiledPredicate::Not(inner) => !inner.evaluate(facts),
        }
    }
}

fn compile_pattern(pattern: &MatchPattern) -> Result<CompiledPattern, PredicateError> {
    match pattern {
        MatchPattern::Exact(name) => {
            let normalized = normalize_name(name);
            if normalized.is_empty() {
                return Err(PredicateError::EmptyPattern);
            }
            Ok(CompiledPattern::Exact(normalized))
        }
        MatchPattern::OneOf(names) => {
            let normalized: BTreeSet<String> = names
                .iter()
                .map(|name| normalize_name(name))
                .filter(|name| !name.is_empty())
                .collect();
            if normalized.is_empty() {
                return Err(PredicateError::EmptyList("one_of"));
            }
            Ok(CompiledPattern::OneOf(normalized))
        }
        MatchPattern::Regex(raw) => {
            if raw.trim().is_empty() {
                return Err(PredicateError::EmptyPattern);
            }
            RegexBuilder::new(raw)
                .case_insensitive(true)
                .build()
                .map(CompiledPattern::Regex)
                .map_err(|source| PredicateError::InvalidRegex {
                    pattern: raw.clone(),
                    source,
                })
        }
    }
}

fn compile_patterns(
    label: &'static str,
    patterns: &[MatchPattern],
) -> Result<Vec<CompiledPattern>, PredicateError> {
    if patterns.is_empty() {
        return Err(PredicateError::EmptyList(label));
    }
    patterns.iter().map(compile_pattern).collect()
}

fn compile_children(
    label: &'static str,
    predicates: &[Predicate],
) -> Result<Vec<CompiledPredicate>, PredicateError> {
    if predicates.is_empty() {
        return Err(PredicateError::EmptyList(label));
    }
    predicates.iter().map(Predicate::compile).collect()
}
