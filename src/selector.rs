//! Selector matching.
//!
//! A listing section names the pages it wants with a selector. Selectors are
//! written in `config.toml` in one of two shapes:
//!
//! ```toml
//! # Full selector: provenance constraints plus attribute predicates
//! [listing.handbook.guides.selector]
//! component = "<current>"
//! module = "ROOT"
//! attributes = [
//!     { name = "page-category", contains = "guide" },
//!     { name = "page-level", equals = "beginner" },
//! ]
//!
//! # Tag shorthand, scoped to the context page's component and version
//! [listing.handbook.tools]
//! tag = "tool"
//! within_parent_module = true
//! ```
//!
//! Both shapes compile into one [`Selector`], evaluated against a pair of
//! pages: the context page the listing is rendered on, and a candidate from
//! the corpus. Compilation validates operator names, so a typo in the site
//! configuration fails the build before any page is looked at. Evaluation
//! never fails: a candidate without the attribute a predicate names simply
//! does not match.

use crate::types::Page;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Provenance value meaning "the context page's own value".
pub const CURRENT: &str = "<current>";

/// Operator names accepted in attribute predicates, for error messages.
const ALLOWED_OPERATORS: &str = "contains, equals, startsWith, endsWith";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error(
        "unsupported operator `{operator}` on attribute `{attribute}`, must be one of: {allowed}",
        allowed = ALLOWED_OPERATORS
    )]
    UnsupportedOperator { attribute: String, operator: String },
    #[error(
        "attribute predicate on `{0}` has no operator, must be one of: {allowed}",
        allowed = ALLOWED_OPERATORS
    )]
    MissingOperator(String),
    #[error("attribute predicate on `{attribute}` declares several operators: {operators}")]
    ConflictingOperators {
        attribute: String,
        operators: String,
    },
}

// =============================================================================
// Configuration shapes
// =============================================================================

/// One provenance constraint: a literal value or [`CURRENT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldMatch {
    Current,
    Literal(String),
}

impl From<String> for FieldMatch {
    fn from(value: String) -> Self {
        if value == CURRENT {
            Self::Current
        } else {
            Self::Literal(value)
        }
    }
}

impl From<FieldMatch> for String {
    fn from(value: FieldMatch) -> Self {
        match value {
            FieldMatch::Current => CURRENT.to_string(),
            FieldMatch::Literal(s) => s,
        }
    }
}

impl FieldMatch {
    fn matches(&self, context: &str, candidate: &str) -> bool {
        match self {
            Self::Current => candidate == context,
            Self::Literal(value) => candidate == value,
        }
    }
}

/// A full selector as written in the site configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<FieldMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<FieldMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<FieldMatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<PredicateConfig>,
}

/// An attribute predicate as written: `{ name = "...", <operator> = "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateConfig {
    pub name: String,
    #[serde(flatten)]
    pub operators: BTreeMap<String, String>,
}

// =============================================================================
// Compiled selectors
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Value is one of the comma-separated, trimmed tokens.
    Contains,
    Equals,
    StartsWith,
    EndsWith,
}

impl Operator {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "contains" => Some(Self::Contains),
            "equals" => Some(Self::Equals),
            "startsWith" => Some(Self::StartsWith),
            "endsWith" => Some(Self::EndsWith),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
        }
    }

    fn test(self, attribute: &str, value: &str) -> bool {
        match self {
            Self::Contains => attribute.split(',').any(|token| token.trim() == value),
            Self::Equals => attribute == value,
            Self::StartsWith => attribute.starts_with(value),
            Self::EndsWith => attribute.ends_with(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePredicate {
    pub name: String,
    pub operator: Operator,
    pub value: String,
}

impl AttributePredicate {
    pub fn compile(config: &PredicateConfig) -> Result<Self, SelectorError> {
        let mut compiled = Vec::with_capacity(1);
        for (key, value) in &config.operators {
            let operator =
                Operator::parse(key).ok_or_else(|| SelectorError::UnsupportedOperator {
                    attribute: config.name.clone(),
                    operator: key.clone(),
                })?;
            compiled.push((operator, value));
        }
        match compiled.as_slice() {
            [] => Err(SelectorError::MissingOperator(config.name.clone())),
            [(operator, value)] => Ok(Self {
                name: config.name.clone(),
                operator: *operator,
                value: (*value).clone(),
            }),
            several => Err(SelectorError::ConflictingOperators {
                attribute: config.name.clone(),
                operators: several
                    .iter()
                    .map(|(op, _)| op.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn matches(&self, page: &Page) -> bool {
        page.attribute(&self.name)
            .is_some_and(|attribute| self.operator.test(attribute, &self.value))
    }
}

/// Provenance constraints; absent fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSelector {
    pub component: Option<FieldMatch>,
    pub version: Option<FieldMatch>,
    pub module: Option<FieldMatch>,
}

impl ScopeSelector {
    pub fn matches(&self, context: &Page, candidate: &Page) -> bool {
        let (ctx, cand) = (&context.provenance, &candidate.provenance);
        let field = |constraint: &Option<FieldMatch>, c: &str, v: &str| {
            constraint.as_ref().is_none_or(|m| m.matches(c, v))
        };
        field(&self.component, &ctx.component, &cand.component)
            && field(&self.version, &ctx.version, &cand.version)
            && field(&self.module, &ctx.module, &cand.module)
    }
}

/// Tag membership, always within the context page's component and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSelector {
    pub tag: String,
    pub within_parent_module: bool,
    /// Name of the comma-separated tag list attribute.
    pub attribute: String,
}

impl TagSelector {
    pub fn matches(&self, context: &Page, candidate: &Page) -> bool {
        let (ctx, cand) = (&context.provenance, &candidate.provenance);
        cand.component == ctx.component
            && cand.version == ctx.version
            && (!self.within_parent_module || cand.module == ctx.module)
            && candidate
                .attributes
                .as_ref()
                .is_some_and(|attrs| attrs.has_token(&self.attribute, &self.tag))
    }
}

/// A compiled selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Scoped(ScopeSelector),
    Attributes(Vec<AttributePredicate>),
    Tag(TagSelector),
    /// Every part must match. An empty list matches every page.
    All(Vec<Selector>),
}

impl Selector {
    /// Compile a full selector, validating every attribute predicate.
    pub fn compile(config: &SelectorConfig) -> Result<Self, SelectorError> {
        let mut parts = Vec::new();
        if config.component.is_some() || config.version.is_some() || config.module.is_some() {
            parts.push(Self::Scoped(ScopeSelector {
                component: config.component.clone(),
                version: config.version.clone(),
                module: config.module.clone(),
            }));
        }
        if !config.attributes.is_empty() {
            let predicates = config
                .attributes
                .iter()
                .map(AttributePredicate::compile)
                .collect::<Result<Vec<_>, _>>()?;
            parts.push(Self::Attributes(predicates));
        }
        Ok(match parts.len() {
            1 => parts.remove(0),
            _ => Self::All(parts),
        })
    }

    /// Tag shorthand selector.
    pub fn tag(
        tag: impl Into<String>,
        within_parent_module: bool,
        attribute: impl Into<String>,
    ) -> Self {
        Self::Tag(TagSelector {
            tag: tag.into(),
            within_parent_module,
            attribute: attribute.into(),
        })
    }

    pub fn matches(&self, context: &Page, candidate: &Page) -> bool {
        match self {
            Self::Scoped(scope) => scope.matches(context, candidate),
            Self::Attributes(predicates) => predicates.iter().all(|p| p.matches(candidate)),
            Self::Tag(tag) => tag.matches(context, candidate),
            Self::All(parts) => parts.iter().all(|part| part.matches(context, candidate)),
        }
    }
}
