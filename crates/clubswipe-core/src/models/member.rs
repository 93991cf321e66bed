use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClubError;

/// Voice part a member sings in.
///
/// Variant order is report order: T1, T2, Bari, Bass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    T1,
    T2,
    Bari,
    Bass,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::T1, Section::T2, Section::Bari, Section::Bass];

    /// Short label used in the spreadsheet and on screen.
    pub fn label(&self) -> &'static str {
        match self {
            Section::T1 => "T1",
            Section::T2 => "T2",
            Section::Bari => "Bari",
            Section::Bass => "Bass",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            Section::T1 => "tenor-1",
            Section::T2 => "tenor-2",
            Section::Bari => "baritone",
            Section::Bass => "bass",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Section {
    type Err = ClubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Section::ALL
            .into_iter()
            .find(|section| {
                needle.eq_ignore_ascii_case(section.label())
                    || needle.eq_ignore_ascii_case(section.long_name())
            })
            .ok_or_else(|| ClubError::InvalidSection(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub card_id: String,
    pub name: String,
    pub section: Section,
}

impl Member {
    pub fn new(card_id: impl Into<String>, name: impl Into<String>, section: Section) -> Self {
        Self {
            card_id: card_id.into(),
            name: name.into(),
            section,
        }
    }
}
