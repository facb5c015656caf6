//! Camelot wheel key compatibility
//!
//! Harmonic mixing rule set used to warn about key clashes between two
//! tracks. The check is informational only: a clash never blocks a mix.

use crate::analysis::UNKNOWN_KEY;

/// Parsed Camelot code: wheel position 1..=12 plus mode letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CamelotKey {
    pub number: u8,
    /// `'A'` (minor) or `'B'` (major)
    pub letter: char,
}

impl CamelotKey {
    /// Parse codes like `"8A"` or `"12b"`. Returns `None` for anything else,
    /// including `"Unknown"`.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        let letter = code.chars().last()?.to_ascii_uppercase();
        if letter != 'A' && letter != 'B' {
            return None;
        }
        let number: u8 = code[..code.len() - 1].parse().ok()?;
        if !(1..=12).contains(&number) {
            return None;
        }
        Some(Self { number, letter })
    }

    /// True when `other` sits one step clockwise or counter-clockwise on the
    /// wheel (positions compared modulo 12).
    fn is_adjacent(&self, other: &CamelotKey) -> bool {
        let a = self.number % 12;
        let b = other.number % 12;
        (a + 1) % 12 == b || (a + 11) % 12 == b
    }
}

impl std::fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

/// Decide whether two Camelot codes mix harmonically.
///
/// Returns the verdict and a short human-readable reason:
/// - identical codes: perfect match
/// - same number, different letter: relative major/minor
/// - same letter, numbers one apart on the wheel: adjacent key
/// - anything else, or either side `"Unknown"`: incompatible
pub fn are_keys_compatible(a: &str, b: &str) -> (bool, &'static str) {
    if a == UNKNOWN_KEY || b == UNKNOWN_KEY {
        return (false, "Unknown key");
    }

    let (Some(ka), Some(kb)) = (CamelotKey::parse(a), CamelotKey::parse(b)) else {
        return (false, "Unrecognized key code");
    };

    if ka == kb {
        return (true, "Perfect match (same key)");
    }

    if ka.number == kb.number {
        return (true, "Relative major/minor");
    }

    if ka.letter == kb.letter && ka.is_adjacent(&kb) {
        return (true, "Adjacent key (+/-1 on the wheel)");
    }

    (false, "Incompatible keys")
}
