use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    /// Roughly half of the content characters start hidden; pick from options.
    #[default]
    Random,
    /// Every content character starts hidden; pick from options.
    All,
    /// Every content character starts hidden; type each segment in full.
    Free,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown practice mode `{0}` (expected random, all or free)")]
pub struct ModeParseError(pub String);

impl PracticeMode {
    pub const ALL: [PracticeMode; 3] = [PracticeMode::Random, PracticeMode::All, PracticeMode::Free];

    pub fn as_str(self) -> &'static str {
        match self {
            PracticeMode::Random => "random",
            PracticeMode::All => "all",
            PracticeMode::Free => "free",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PracticeMode::Random => "随机挖空",
            PracticeMode::All => "全部挖空",
            PracticeMode::Free => "自由练习",
        }
    }

    /// Choice modes answer one character at a time from a candidate set.
    pub fn is_choice(self) -> bool {
        matches!(self, PracticeMode::Random | PracticeMode::All)
    }

    pub fn next(self) -> Self {
        match self {
            PracticeMode::Random => PracticeMode::All,
            PracticeMode::All => PracticeMode::Free,
            PracticeMode::Free => PracticeMode::Random,
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PracticeMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(PracticeMode::Random),
            "all" => Ok(PracticeMode::All),
            "free" => Ok(PracticeMode::Free),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}
