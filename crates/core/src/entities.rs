//! Entity kind enums shared by validation, persistence, and the API.
//!
//! Stored in the database as lowercase text; `as_str`/`parse` round-trip
//! through the same spelling serde uses.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Character kind
// ---------------------------------------------------------------------------

/// Role a character plays in the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    Pc,
    Npc,
    Villain,
    Ally,
}

impl CharacterKind {
    pub const ALL: &'static [&'static str] = &["pc", "npc", "villain", "ally"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterKind::Pc => "pc",
            CharacterKind::Npc => "npc",
            CharacterKind::Villain => "villain",
            CharacterKind::Ally => "ally",
        }
    }

    /// Parse the lowercase database/wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pc" => Some(CharacterKind::Pc),
            "npc" => Some(CharacterKind::Npc),
            "villain" => Some(CharacterKind::Villain),
            "ally" => Some(CharacterKind::Ally),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Quest status
// ---------------------------------------------------------------------------

/// Lifecycle state of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Open,
    Active,
    Completed,
    Failed,
}

impl QuestStatus {
    pub const ALL: &'static [&'static str] = &["open", "active", "completed", "failed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Open => "open",
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
            QuestStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(QuestStatus::Open),
            "active" => Some(QuestStatus::Active),
            "completed" => Some(QuestStatus::Completed),
            "failed" => Some(QuestStatus::Failed),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_kind_round_trips() {
        for &s in CharacterKind::ALL {
            let kind = CharacterKind::parse(s).expect("every listed kind must parse");
            assert_eq!(kind.as_str(), s);
        }
    }

    #[test]
    fn character_kind_rejects_unknown() {
        assert!(CharacterKind::parse("monster").is_none());
        assert!(CharacterKind::parse("PC").is_none());
        assert!(CharacterKind::parse("").is_none());
    }

    #[test]
    fn quest_status_round_trips() {
        for &s in QuestStatus::ALL {
            let status = QuestStatus::parse(s).expect("every listed status must parse");
            assert_eq!(status.as_str(), s);
        }
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&CharacterKind::Villain).unwrap();
        assert_eq!(json, "\"villain\"");
        let back: CharacterKind = serde_json::from_str("\"ally\"").unwrap();
        assert_eq!(back, CharacterKind::Ally);
    }
}
