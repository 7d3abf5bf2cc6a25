//! Generation configuration

use serde::{Deserialize, Serialize};

/// Requested difficulty of the generated problem
///
/// Difficulty controls both how many shapes get attached and the target
/// derivation depth the measurement selector aims for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Derivation depth the selector should not exceed; None means use the
    /// natural minimum-source depth unchanged
    pub fn target_depth(&self) -> Option<u32> {
        match self {
            Difficulty::Easy => Some(2),
            Difficulty::Medium => Some(4),
            Difficulty::Hard => None,
        }
    }

    /// How many attachment iterations to attempt beyond the base shape
    pub fn attachments(&self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// One generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenConfig {
    pub difficulty: Difficulty,

    /// Seed for the pseudo-random sequence; identical seed and difficulty
    /// reproduce the figure byte-for-byte
    pub seed: u64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_hard_uses_natural_depth() {
        assert_eq!(Difficulty::Hard.target_depth(), None);
        assert!(Difficulty::Easy.target_depth().unwrap() < Difficulty::Medium.target_depth().unwrap());
    }
}
