//! Heuristic importance scoring for imported messages.
//!
//! The score is a small additive rule: length, salience phrases, and
//! structural punctuation each contribute a fixed weight. Every signal is
//! evaluated independently, so the result does not depend on rule order.

use regex::Regex;

/// Highest score the heuristic can produce.
pub const MAX_SCORE: u8 = 5;

/// Characters needed for the first length point.
pub const SHORT_LENGTH_CHARS: usize = 40;

/// Characters needed for the second length point.
pub const LONG_LENGTH_CHARS: usize = 140;

const LENGTH_WEIGHT: u8 = 1;
const SALIENCE_WEIGHT: u8 = 2;
const STRUCTURE_WEIGHT: u8 = 1;

/// Strategy for rating how worth remembering a message is.
pub trait ImportanceScorer {
    /// Score `text`; higher is more important.
    fn score(&self, text: &str) -> u8;
}

impl<F> ImportanceScorer for F
where
    F: Fn(&str) -> u8,
{
    fn score(&self, text: &str) -> u8 {
        self(text)
    }
}

/// A named salience pattern.
struct SalienceRule {
    name: &'static str,
    pattern: Regex,
}

/// Length + salience + structure scorer.
pub struct HeuristicScorer {
    rules: Vec<SalienceRule>,
}

impl HeuristicScorer {
    /// Create the scorer with its built-in salience patterns.
    ///
    /// # Errors
    /// Returns an error if any regex pattern is invalid.
    pub fn new() -> Result<Self, regex::Error> {
        let rules = [
            // Explicit memory requests
            ("memory_request", r"(?i)\bremember\b"),
            ("preference", r"(?i)\bprefer(?:s|ence)?\b"),
            ("identity", r"(?i)\bmy name is\b"),
            // First-person statements about work, living, tools, wants
            (
                "first_person",
                r"(?i)\bI (?:work|live|use|have|want|need|hate|love)\b",
            ),
            ("decision", r"(?i)\bdecision\b|\bdecided\b|\bagreed\b"),
            ("action_item", r"(?i)\btodo\b|\bremind\b|\bdeadline\b|\bdue\b"),
            (
                "problem",
                r"(?i)\bbug\b|\bissue\b|\bbroken\b|\bfailed\b|\bfix\b",
            ),
            ("planning", r"(?i)\bproject\b|\bstartup\b|\broadmap\b"),
        ]
        .into_iter()
        .map(|(name, source)| Regex::new(source).map(|pattern| SalienceRule { name, pattern }))
        .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { rules })
    }

    /// Name of the first salience rule matching `text`, if any.
    #[must_use]
    pub fn salience_match(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(|rule| rule.name)
    }
}

impl ImportanceScorer for HeuristicScorer {
    fn score(&self, text: &str) -> u8 {
        let chars = text.chars().count();
        let mut score = 0;

        if chars >= SHORT_LENGTH_CHARS {
            score += LENGTH_WEIGHT;
        }
        if chars >= LONG_LENGTH_CHARS {
            score += LENGTH_WEIGHT;
        }
        if self.salience_match(text).is_some() {
            score += SALIENCE_WEIGHT;
        }
        if has_structure(text) {
            score += STRUCTURE_WEIGHT;
        }

        score
    }
}

/// Colons, dash bullets and line breaks mark structured content.
fn has_structure(text: &str) -> bool {
    text.contains(':') || text.contains("- ") || text.contains('\n')
}
