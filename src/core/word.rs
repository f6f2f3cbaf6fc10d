//! Lifecycle Words
//!
//! A lifecycle word is the ordered list of processing steps observed for one
//! transaction. Each step is a small positive integer (a generator).
//!
//! Validation happens here, at the boundary, before any rewriting:
//! - generators must be positive
//! - generators must fit the configured alphabet
//! - the word must fit the configured length bound

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// One lifecycle step (1-based).
pub type Generator = u8;

/// Default maximum word length.
pub const DEFAULT_MAX_WORD_LEN: usize = 10;

/// Default largest generator in the alphabet.
pub const DEFAULT_MAX_GENERATOR: Generator = 7;

// =============================================================================
// LIMITS
// =============================================================================

/// Bounds a lifecycle word must satisfy before it is reduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordLimits {
    /// Maximum number of generators in a word.
    pub max_len: usize,
    /// Largest generator value accepted (alphabet is `1..=max_generator`).
    pub max_generator: Generator,
}

impl Default for WordLimits {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_WORD_LEN,
            max_generator: DEFAULT_MAX_GENERATOR,
        }
    }
}

impl WordLimits {
    /// Check an already-constructed word against these limits.
    pub fn check(&self, word: &LifecycleWord) -> Result<(), WordError> {
        self.check_len(word.len())?;

        for (position, &value) in word.iter().enumerate() {
            self.check_value(position, value as i64)?;
        }

        Ok(())
    }

    fn check_len(&self, len: usize) -> Result<(), WordError> {
        if len > self.max_len {
            return Err(WordError::TooLong {
                len,
                max: self.max_len,
            });
        }
        Ok(())
    }

    fn check_value(&self, position: usize, value: i64) -> Result<Generator, WordError> {
        if value <= 0 {
            return Err(WordError::NonPositive { position, value });
        }
        if value > self.max_generator as i64 {
            return Err(WordError::OutsideAlphabet {
                position,
                value,
                max: self.max_generator,
            });
        }
        Ok(value as Generator)
    }
}

/// Reasons a word is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// Generator is zero or negative.
    #[error("generator {value} at position {position} is not positive")]
    NonPositive {
        /// Index in the word.
        position: usize,
        /// Offending value.
        value: i64,
    },

    /// Generator is above the alphabet maximum.
    #[error("generator {value} at position {position} is outside alphabet 1..={max}")]
    OutsideAlphabet {
        /// Index in the word.
        position: usize,
        /// Offending value.
        value: i64,
        /// Alphabet maximum.
        max: Generator,
    },

    /// Value is not an integer in `i64` range (a fraction, or too large).
    #[error("value {value} at position {position} is not an integer generator")]
    NotAnInteger {
        /// Index in the word.
        position: usize,
        /// Offending value as written.
        value: String,
    },

    /// Word exceeds the length bound.
    #[error("word has {len} generators, limit is {max}")]
    TooLong {
        /// Actual length.
        len: usize,
        /// Length bound.
        max: usize,
    },
}

// =============================================================================
// LIFECYCLE WORD
// =============================================================================

/// Ordered sequence of positive generators.
///
/// Construction guarantees every generator is non-zero. Alphabet and length
/// bounds are policy and are checked separately with [`WordLimits`].
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Generator>", into = "Vec<Generator>")]
pub struct LifecycleWord(Vec<Generator>);

impl LifecycleWord {
    /// The empty word.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build from generators, rejecting zeros.
    pub fn new(generators: Vec<Generator>) -> Result<Self, WordError> {
        if let Some(position) = generators.iter().position(|&g| g == 0) {
            return Err(WordError::NonPositive { position, value: 0 });
        }
        Ok(Self(generators))
    }

    /// Parse raw integers under the given limits.
    ///
    /// Length is checked first so oversize input is rejected without scanning.
    pub fn parse(raw: &[i64], limits: &WordLimits) -> Result<Self, WordError> {
        limits.check_len(raw.len())?;

        let generators = raw
            .iter()
            .enumerate()
            .map(|(position, &value)| limits.check_value(position, value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(generators))
    }

    /// Parse JSON numbers as received on the wire. Same rules as
    /// [`LifecycleWord::parse`]; fractions and out-of-range integers are
    /// reported as [`WordError::NotAnInteger`] at their position.
    pub fn parse_numbers(raw: &[serde_json::Number], limits: &WordLimits) -> Result<Self, WordError> {
        limits.check_len(raw.len())?;

        let generators = raw
            .iter()
            .enumerate()
            .map(|(position, number)| {
                let value = number.as_i64().ok_or_else(|| WordError::NotAnInteger {
                    position,
                    value: number.to_string(),
                })?;
                limits.check_value(position, value)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(generators))
    }

    /// Rewriting output is built from generators already known to be valid.
    pub(crate) fn from_reduced(generators: Vec<Generator>) -> Self {
        debug_assert!(generators.iter().all(|&g| g != 0));
        Self(generators)
    }

    /// Number of generators.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the word has no generators.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the generators.
    #[inline]
    pub fn as_slice(&self) -> &[Generator] {
        &self.0
    }

    /// Iterate over generators.
    pub fn iter(&self) -> std::slice::Iter<'_, Generator> {
        self.0.iter()
    }

    /// Strictly ascending with no repeats (the shape of a baseline word).
    pub fn is_strictly_ascending(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0] < pair[1])
    }
}

impl TryFrom<Vec<Generator>> for LifecycleWord {
    type Error = WordError;

    fn try_from(generators: Vec<Generator>) -> Result<Self, Self::Error> {
        Self::new(generators)
    }
}

impl From<LifecycleWord> for Vec<Generator> {
    fn from(word: LifecycleWord) -> Self {
        word.0
    }
}

impl AsRef<[Generator]> for LifecycleWord {
    fn as_ref(&self) -> &[Generator] {
        &self.0
    }
}

/// Dash-joined rendering, e.g. `1-2-3`.
impl fmt::Display for LifecycleWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, g) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}", g)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_word() {
        let word = LifecycleWord::parse(&[1, 2, 3, 4, 5], &WordLimits::default()).unwrap();
        assert_eq!(word.as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(word.to_string(), "1-2-3-4-5");
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        let limits = WordLimits::default();

        let err = LifecycleWord::parse(&[1, 0, 3], &limits).unwrap_err();
        assert_eq!(err, WordError::NonPositive { position: 1, value: 0 });

        let err = LifecycleWord::parse(&[-4], &limits).unwrap_err();
        assert_eq!(err, WordError::NonPositive { position: 0, value: -4 });
    }

    #[test]
    fn test_parse_rejects_outside_alphabet() {
        let err = LifecycleWord::parse(&[1, 2, 8], &WordLimits::default()).unwrap_err();
        assert_eq!(err, WordError::OutsideAlphabet { position: 2, value: 8, max: 7 });

        // Values past u8 range must not wrap into the alphabet
        let err = LifecycleWord::parse(&[257], &WordLimits::default()).unwrap_err();
        assert!(matches!(err, WordError::OutsideAlphabet { value: 257, .. }));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let raw = vec![1i64; 11];
        let err = LifecycleWord::parse(&raw, &WordLimits::default()).unwrap_err();
        assert_eq!(err, WordError::TooLong { len: 11, max: 10 });
    }

    #[test]
    fn test_parse_numbers() {
        let numbers = |json: &str| serde_json::from_str::<Vec<serde_json::Number>>(json).unwrap();
        let limits = WordLimits::default();

        let word = LifecycleWord::parse_numbers(&numbers("[1,1,2,3]"), &limits).unwrap();
        assert_eq!(word.as_slice(), &[1, 1, 2, 3]);

        let err = LifecycleWord::parse_numbers(&numbers("[1,2.5,0]"), &limits).unwrap_err();
        assert_eq!(err, WordError::NotAnInteger { position: 1, value: "2.5".to_string() });

        // Left to right: the zero comes before the fraction
        let err = LifecycleWord::parse_numbers(&numbers("[0,2.5]"), &limits).unwrap_err();
        assert_eq!(err, WordError::NonPositive { position: 0, value: 0 });

        // Beyond i64
        let err = LifecycleWord::parse_numbers(&numbers("[9223372036854775808]"), &limits).unwrap_err();
        assert!(matches!(err, WordError::NotAnInteger { position: 0, .. }));
        let err = LifecycleWord::parse_numbers(&numbers("[1,1e30]"), &limits).unwrap_err();
        assert!(matches!(err, WordError::NotAnInteger { position: 1, .. }));

        let err = LifecycleWord::parse_numbers(&numbers("[1,1,1,1,1,1,1,1,1,1,0.5]"), &limits).unwrap_err();
        assert_eq!(err, WordError::TooLong { len: 11, max: 10 });
    }

    #[test]
    fn test_custom_limits() {
        let limits = WordLimits { max_len: 3, max_generator: 9 };
        assert!(LifecycleWord::parse(&[9, 8, 7], &limits).is_ok());
        assert!(LifecycleWord::parse(&[1, 2, 3, 4], &limits).is_err());
    }

    #[test]
    fn test_limits_check() {
        let word = LifecycleWord::new(vec![1, 2, 9]).unwrap();
        let err = WordLimits::default().check(&word).unwrap_err();
        assert!(matches!(err, WordError::OutsideAlphabet { position: 2, .. }));

        let word = LifecycleWord::new(vec![1; 12]).unwrap();
        assert!(matches!(WordLimits::default().check(&word), Err(WordError::TooLong { .. })));
    }

    #[test]
    fn test_new_rejects_zero() {
        assert!(LifecycleWord::new(vec![1, 0]).is_err());
        assert!(LifecycleWord::new(vec![]).is_ok());
    }

    #[test]
    fn test_strictly_ascending() {
        assert!(LifecycleWord::new(vec![1, 2, 3]).unwrap().is_strictly_ascending());
        assert!(!LifecycleWord::new(vec![1, 1, 2]).unwrap().is_strictly_ascending());
        assert!(!LifecycleWord::new(vec![2, 1]).unwrap().is_strictly_ascending());
        assert!(LifecycleWord::empty().is_strictly_ascending());
    }

    #[test]
    fn test_serde_rejects_zero() {
        let word: LifecycleWord = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(word.len(), 3);
        assert!(serde_json::from_str::<LifecycleWord>("[1,0]").is_err());
        assert_eq!(serde_json::to_string(&word).unwrap(), "[1,2,3]");
    }
}
