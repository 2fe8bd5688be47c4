//! Local password strength analysis.
//!
//! Nothing here touches the network. The password is never stored or
//! logged; the history only ever sees `fingerprint()`, a truncated SHA-256
//! digest that lets two checks of the same password be matched up.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex digits of the digest kept in a fingerprint.
const FINGERPRINT_HEX_CHARS: usize = 12;

/// Entropy at which the score saturates at 100.
const FULL_SCORE_BITS: f64 = 128.0;

/// Below this length a "use more characters" suggestion is always given.
pub const RECOMMENDED_LENGTH: usize = 12;

/// Score ceiling for passwords found in the common list or made of one
/// repeated character.
const TRIVIAL_SCORE_CAP: u8 = 5;

const LOWER_POOL: u32 = 26;
const UPPER_POOL: u32 = 26;
const DIGIT_POOL: u32 = 10;
const SYMBOL_POOL: u32 = 33;

/// Passwords that top every leaked-credential list.
const COMMON_PASSWORDS: &[&str] = &[
    "123456", "12345678", "123456789", "111111", "abc123", "admin", "dragon", "iloveyou",
    "letmein", "monkey", "password", "password1", "qwerty", "qwerty123", "welcome",
];

/// Coarse strength bands, by estimated entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Strength {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl Strength {
    fn from_bits(bits: f64) -> Self {
        match bits {
            b if b < 28.0 => Strength::VeryWeak,
            b if b < 36.0 => Strength::Weak,
            b if b < 60.0 => Strength::Fair,
            b if b < 128.0 => Strength::Strong,
            _ => Strength::VeryStrong,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strength::VeryWeak => "Very weak",
            Strength::Weak => "Weak",
            Strength::Fair => "Fair",
            Strength::Strong => "Strong",
            Strength::VeryStrong => "Very strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which character classes a password draws from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CharClasses {
    pub lower: bool,
    pub upper: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl CharClasses {
    fn of(password: &str) -> Self {
        let mut classes = Self::default();
        for c in password.chars() {
            match c {
                'a'..='z' => classes.lower = true,
                'A'..='Z' => classes.upper = true,
                '0'..='9' => classes.digit = true,
                _ => classes.symbol = true,
            }
        }
        classes
    }

    /// Size of the alphabet an attacker would have to search.
    pub fn pool_size(&self) -> u32 {
        [
            (self.lower, LOWER_POOL),
            (self.upper, UPPER_POOL),
            (self.digit, DIGIT_POOL),
            (self.symbol, SYMBOL_POOL),
        ]
        .iter()
        .filter(|(used, _)| *used)
        .map(|(_, size)| size)
        .sum()
    }
}

/// The outcome of a strength check. Holds no trace of the password itself
/// beyond its length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReport {
    pub length: usize,
    pub classes: CharClasses,
    pub entropy_bits: f64,
    /// 0–100.
    pub score: u8,
    pub strength: Strength,
    pub suggestions: Vec<String>,
}

impl PasswordReport {
    /// One-line outcome, as recorded in the history.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}/100, ~{:.0} bits of entropy)",
            self.strength, self.score, self.entropy_bits
        )
    }
}

/// Estimate the strength of `password`.
pub fn analyze(password: &str) -> PasswordReport {
    let length = password.chars().count();
    let classes = CharClasses::of(password);

    let pool = classes.pool_size();
    let entropy_bits = if pool == 0 {
        0.0
    } else {
        length as f64 * f64::from(pool).log2()
    };

    let common = is_common(password);
    let repeated = is_single_repeated_char(password);

    let mut score = ((entropy_bits / FULL_SCORE_BITS) * 100.0).round().min(100.0) as u8;
    let mut strength = Strength::from_bits(entropy_bits);
    if common || repeated {
        score = score.min(TRIVIAL_SCORE_CAP);
        strength = Strength::VeryWeak;
    }

    let mut suggestions = Vec::new();
    if common {
        suggestions.push("This is one of the most common passwords; never use it".to_string());
    }
    if repeated {
        suggestions.push("Avoid repeating a single character".to_string());
    }
    if length < RECOMMENDED_LENGTH {
        suggestions.push(format!("Use at least {RECOMMENDED_LENGTH} characters"));
    }
    if !classes.lower {
        suggestions.push("Add lower-case letters".to_string());
    }
    if !classes.upper {
        suggestions.push("Add upper-case letters".to_string());
    }
    if !classes.digit {
        suggestions.push("Add digits".to_string());
    }
    if !classes.symbol {
        suggestions.push("Add symbols or spaces".to_string());
    }

    PasswordReport {
        length,
        classes,
        entropy_bits,
        score,
        strength,
        suggestions,
    }
}

/// `sha256:` followed by the first hex digits of the password's digest.
pub fn fingerprint(password: &str) -> String {
    let digest = hex::encode(Sha256::digest(password.as_bytes()));
    format!("sha256:{}", &digest[..FINGERPRINT_HEX_CHARS])
}

fn is_common(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.contains(&lowered.as_str())
}

fn is_single_repeated_char(password: &str) -> bool {
    let mut chars = password.chars();
    match chars.next() {
        Some(first) => password.chars().count() > 1 && chars.all(|c| c == first),
        None => false,
    }
}
