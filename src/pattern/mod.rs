//! Pattern matcher for string fields
//!
//! A pattern class is a closed character-membership rule:
//! - `all`: any character
//! - `alphanumericPattern`: ASCII letters and digits only
//! - `jisX0213withAlphaNumericSymbol`: ASCII letters, digits, the fixed
//!   symbol set, and every character of the configured script repertoire
//!
//! Matching is a pure function of the pattern, the value, and the
//! repertoire injected at construction. The empty string matches every
//! pattern; length rules are checked separately.

mod repertoire;

pub use repertoire::{Repertoire, RepertoireError};

use std::fmt;
use std::sync::Arc;

/// Closed set of character-class patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// No character restriction
    Unrestricted,
    /// ASCII letters and digits
    AlphanumericOnly,
    /// Script repertoire plus ASCII alphanumerics and symbols
    ExtendedScriptWithAlphanumericAndSymbols,
}

impl Pattern {
    /// Every pattern, in declaration order.
    pub const ALL: [Pattern; 3] = [
        Pattern::Unrestricted,
        Pattern::AlphanumericOnly,
        Pattern::ExtendedScriptWithAlphanumericAndSymbols,
    ];

    /// Returns the declaration name used in schema files.
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Unrestricted => "all",
            Pattern::AlphanumericOnly => "alphanumericPattern",
            Pattern::ExtendedScriptWithAlphanumericAndSymbols => "jisX0213withAlphaNumericSymbol",
        }
    }

    /// Resolves a declaration name. Only the names returned by [`name`](Self::name) are known.
    pub fn from_name(name: &str) -> Option<Self> {
        Pattern::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Fixed symbol set accepted by the extended-script pattern.
fn is_symbol(c: char) -> bool {
    c == ' ' || c.is_ascii_punctuation()
}

/// Classifies strings against pattern classes.
///
/// Cloning is cheap; the repertoire is shared.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    repertoire: Arc<Repertoire>,
}

impl PatternMatcher {
    /// Creates a matcher backed by the given repertoire.
    pub fn new(repertoire: Arc<Repertoire>) -> Self {
        Self { repertoire }
    }

    /// Returns the repertoire backing the extended-script pattern.
    pub fn repertoire(&self) -> &Repertoire {
        &self.repertoire
    }

    /// Returns true if every character of `value` is allowed by `pattern`.
    pub fn matches(&self, pattern: Pattern, value: &str) -> bool {
        match pattern {
            Pattern::Unrestricted => true,
            Pattern::AlphanumericOnly => value.chars().all(|c| c.is_ascii_alphanumeric()),
            Pattern::ExtendedScriptWithAlphanumericAndSymbols => value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || is_symbol(c) || self.repertoire.contains(c)),
        }
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(Arc::new(Repertoire::jis_x0213()))
    }
}
