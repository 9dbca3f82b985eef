//! Signal classification policy
//!
//! Signal names produced by the simulator carry their role by convention
//! (`clk`, `rst`, `en`, `count`, ...). Both the encoder and the renderer ask a
//! single [`SignalClassifier`] for a signal's [`SignalKind`] instead of
//! matching names themselves, so new naming conventions only need new
//! [`ClassifierRule`]s.

use serde::{Deserialize, Serialize};

/// Role of a signal, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Free-running clock
    Clock,
    /// Reset line
    Reset,
    /// Enable line
    Enable,
    /// Multi-bit bus or counter value
    Bus,
    /// Any other single-bit signal
    Digital,
}

impl SignalKind {
    /// Whether the encoder writes values as bus literals
    pub fn is_bus(&self) -> bool {
        matches!(self, SignalKind::Bus)
    }

    /// Whether the signal is drawn between two logic levels
    ///
    /// Only clock, reset and enable lines are known to be single-bit.
    /// Unrecognised signals may carry any value and are drawn like buses.
    pub fn is_two_level(&self) -> bool {
        matches!(self, SignalKind::Clock | SignalKind::Reset | SignalKind::Enable)
    }

    /// Whether the viewer shows the value scaled, annotated and in hex
    pub fn is_multi_level(&self) -> bool {
        !self.is_two_level()
    }

    /// Get display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            SignalKind::Clock => "Clock",
            SignalKind::Reset => "Reset",
            SignalKind::Enable => "Enable",
            SignalKind::Bus => "Bus",
            SignalKind::Digital => "Digital",
        }
    }
}

/// How a rule's pattern is compared against a signal name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Pattern appears anywhere in the name
    #[default]
    Contains,
    /// Pattern appears as a whole word (`[A-Za-z0-9_]` runs)
    Word,
    /// Name starts with the pattern
    Prefix,
    /// Name equals the pattern
    Exact,
}

/// A single name → kind rule; patterns compare case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub pattern: String,
    #[serde(rename = "match", default)]
    pub mode: MatchMode,
    pub kind: SignalKind,
}

impl ClassifierRule {
    /// Create a rule
    pub fn new(pattern: impl Into<String>, mode: MatchMode, kind: SignalKind) -> Self {
        Self {
            pattern: pattern.into().to_lowercase(),
            mode,
            kind,
        }
    }

    /// Check whether `name` satisfies this rule
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        let pattern = self.pattern.to_lowercase();
        match self.mode {
            MatchMode::Contains => name.contains(&pattern),
            MatchMode::Prefix => name.starts_with(&pattern),
            MatchMode::Exact => name == pattern,
            MatchMode::Word => contains_word(&name, &pattern),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    haystack.match_indices(word).any(|(start, _)| {
        let end = start + word.len();
        let before_ok = haystack[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}

/// Ordered rule list; the first matching rule decides the kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalClassifier {
    rules: Vec<ClassifierRule>,
    fallback: SignalKind,
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self {
            rules: Self::builtin_rules(),
            fallback: SignalKind::Digital,
        }
    }
}

impl SignalClassifier {
    /// Create a classifier from explicit rules, falling back to `Digital`
    pub fn new(rules: Vec<ClassifierRule>) -> Self {
        Self {
            rules,
            fallback: SignalKind::Digital,
        }
    }

    /// Use the built-in rules unless `rules` is non-empty
    pub fn from_rules_or_default(rules: &[ClassifierRule]) -> Self {
        if rules.is_empty() {
            Self::default()
        } else {
            Self::new(rules.to_vec())
        }
    }

    /// Simulator naming conventions for clocks, resets, counters and enables
    pub fn builtin_rules() -> Vec<ClassifierRule> {
        vec![
            ClassifierRule::new("clk", MatchMode::Contains, SignalKind::Clock),
            ClassifierRule::new("rst", MatchMode::Contains, SignalKind::Reset),
            ClassifierRule::new("count", MatchMode::Contains, SignalKind::Bus),
            ClassifierRule::new("en", MatchMode::Word, SignalKind::Enable),
        ]
    }

    /// The active rules, in priority order
    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Classify a signal by name
    pub fn classify(&self, name: &str) -> SignalKind {
        self.rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(|rule| rule.kind)
            .unwrap_or(self.fallback)
    }
}
