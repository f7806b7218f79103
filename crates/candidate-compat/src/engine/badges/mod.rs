//! Badge qualification: declarative rules evaluated against a candidate fact base.

mod predicate;

pub use predicate::{MatchPattern, Predicate, PredicateError};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::diagnostics::Diagnostic;
use super::domain::BadgeId;
use super::facts::CandidateFactBase;
use predicate::CompiledPredicate;

/// Badge as authored in the content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub id: BadgeId,
    pub name: String,
    pub qualification_rule: Predicate,
}

#[derive(Debug)]
struct CatalogBadge {
    id: BadgeId,
    name: String,
    rule: Result<CompiledPredicate, PredicateError>,
}

/// Immutable set of badge rules, compiled once and shared across evaluations.
#[derive(Debug, Default)]
pub struct BadgeCatalog {
    badges: Vec<CatalogBadge>,
}

impl BadgeCatalog {
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = BadgeDefinition>,
    {
        let badges = definitions
            .into_iter()
            .map(|definition| CatalogBadge {
                rule: definition.qualification_rule.compile(),
                id: definition.id,
                name: definition.name,
            })
            .collect();

        Self { badges }
    }

    /// Parse each JSON entry on its own so one malformed badge cannot take the
    /// rest of the catalog down with it.
    pub fn from_json_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let badges = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let fallback_id = value
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{index}"));

                match serde_json::from_value::<BadgeDefinition>(value) {
                    Ok(definition) => CatalogBadge {
                        rule: definition.qualification_rule.compile(),
                        id: definition.id,
                        name: definition.name,
                    },
                    Err(err) => CatalogBadge {
                        id: BadgeId(fallback_id.clone()),
                        name: fallback_id,
                        rule: Err(PredicateError::Malformed(err.to_string())),
                    },
                }
            })
            .collect();

        Self { badges }
    }

    /// Platform badges shipped with the engine.
    pub fn standard() -> Self {
        Self::from_definitions(standard_definitions())
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    pub fn badge_name(&self, id: &BadgeId) -> Option<&str> {
        self.badges
            .iter()
            .find(|badge| &badge.id == id)
            .map(|badge| badge.name.as_str())
    }

    /// Catalog problems that exist regardless of the candidate.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.badges
            .iter()
            .filter_map(|badge| badge.rule.as_ref().err().map(|err| badge_diagnostic(badge, err)))
            .collect()
    }

    pub fn evaluate(&self, facts: &CandidateFactBase) -> BadgeEvaluation {
        let mut qualified = BTreeSet::new();
        let mut diagnostics = Vec::new();

        for badge in &self.badges {
            match &badge.rule {
                Ok(rule) => {
                    if rule.evaluate(facts) {
                        qualified.insert(badge.id.clone());
                    }
                }
                Err(err) => {
                    let diagnostic = badge_diagnostic(badge, err);
                    warn!(candidate = %facts.candidate_id(), "{}", diagnostic.summary());
                    diagnostics.push(diagnostic);
                }
            }
        }

        let newly_qualified = qualified
            .difference(facts.badge_grants())
            .cloned()
            .collect();

        debug!(
            candidate = %facts.candidate_id(),
            qualified = qualified.len(),
            "badge evaluation complete"
        );

        BadgeEvaluation {
            qualified,
            newly_qualified,
            diagnostics,
        }
    }
}

fn badge_diagnostic(badge: &CatalogBadge, err: &PredicateError) -> Diagnostic {
    Diagnostic::configuration(format!("badge {}", badge.id), err)
}

/// Badges a candidate currently qualifies for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BadgeEvaluation {
    pub qualified: BTreeSet<BadgeId>,
    /// Qualified badges the candidate has not been granted yet.
    pub newly_qualified: BTreeSet<BadgeId>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Evaluate ad-hoc definitions against a fact base.
pub fn evaluate_badges(facts: &CandidateFactBase, definitions: &[BadgeDefinition]) -> BadgeEvaluation {
    BadgeCatalog::from_definitions(definitions.iter().cloned()).evaluate(facts)
}

pub fn standard_definitions() -> Vec<BadgeDefinition> {
    vec![
        BadgeDefinition {
            id: BadgeId::from("madrelingua-inglese"),
            name: "Madrelingua Inglese".to_string(),
            qualification_rule: Predicate::any_of(["c1 inglese", "c2 inglese"]),
        },
        BadgeDefinition {
            id: BadgeId::from("full-stack-senior"),
            name: "Sviluppatore Full-Stack Senior".to_string(),
            qualification_rule: Predicate::all_of(vec![
                MatchPattern::regex(r"\breact\b"),
                MatchPattern::regex(r"\bnode(\.js)?\b"),
            ]),
        },
        BadgeDefinition {
            id: BadgeId::from("sostenibilita"),
            name: "Esperto di Sostenibilità".to_string(),
            qualification_rule: Predicate::HasCertificationMatching(MatchPattern::regex(
                r"sostenibilit|sustainab",
            )),
        },
        BadgeDefinition {
            id: BadgeId::from("innovatore-creativo"),
            name: "Innovatore Creativo".to_string(),
            qualification_rule: Predicate::HasCertificationMatching(MatchPattern::regex(
                r"design\s+thinking",
            )),
        },
    ]
}
