//! Wire DTOs for the REST API.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Timestamps arrive as
//! ISO 8601 strings and become `chrono::DateTime<Utc>` at this boundary so
//! nothing above the net layer handles raw date strings.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// AUTH
// =============================================================================

/// An authenticated user, as returned by `auth/login` and cached in storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend user identifier. Numeric ids are normalized to strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    pub username: String,
    /// Display name, if the account has one.
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar image URL, if available.
    #[serde(default, alias = "picture", alias = "photoURL", skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

impl User {
    /// Name to show in page chrome.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// Body of `POST auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

/// Body of `POST auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response of `POST auth/login`. Every field is optional because a
/// malformed success payload must still parse and be rejected by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default, alias = "token")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// MOOD ENTRIES
// =============================================================================

/// Social context of a mood entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoodEnvironment {
    #[default]
    Alone,
    InGroup,
}

/// A logged mood entry with its suggested activities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub emotion_keys: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub environment: MoodEnvironment,
    #[serde(default)]
    pub description: Option<String>,
    /// Self-reported energy on a 1-5 scale.
    pub energy_level: u8,
    pub entry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_voice_input: bool,
    #[serde(default)]
    pub passion: Option<String>,
    #[serde(default)]
    pub suggested_activities: Vec<SuggestedActivity>,
    #[serde(default)]
    pub suggested_activities_count: Option<u32>,
}

/// Body of `POST mood-entries` and `PUT mood-entries/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntryCreateRequest {
    pub emotion_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub environment: MoodEnvironment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub energy_level: u8,
    #[serde(default)]
    pub is_voice_input: bool,
}

/// Aggregates shown on the dashboard header.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStatistics {
    pub today_entries: u32,
    pub average_energy_level_week: f64,
    pub average_energy_level_month: f64,
}

// =============================================================================
// SUGGESTED ACTIVITIES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityCategory {
    Breathing,
    Physical,
    Social,
    Creative,
    Mindfulness,
    SelfCare,
    Productivity,
    Nature,
    Learning,
    Gratitude,
}

impl ActivityCategory {
    /// Path segment used by `activities/category/{category}`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breathing => "BREATHING",
            Self::Physical => "PHYSICAL",
            Self::Social => "SOCIAL",
            Self::Creative => "CREATIVE",
            Self::Mindfulness => "MINDFULNESS",
            Self::SelfCare => "SELF_CARE",
            Self::Productivity => "PRODUCTIVITY",
            Self::Nature => "NATURE",
            Self::Learning => "LEARNING",
            Self::Gratitude => "GRATITUDE",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Breathing => "Breathing & Relaxation",
            Self::Physical => "Physical Activity",
            Self::Social => "Social Connection",
            Self::Creative => "Creative Expression",
            Self::Mindfulness => "Mindfulness & Meditation",
            Self::SelfCare => "Self Care",
            Self::Productivity => "Productive Tasks",
            Self::Nature => "Nature & Outdoors",
            Self::Learning => "Learning & Growth",
            Self::Gratitude => "Gratitude & Reflection",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyLevel {
    VeryEasy,
    Easy,
    Moderate,
    Challenging,
    Intensive,
}

impl DifficultyLevel {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::VeryEasy => "Very Easy (1-2 min)",
            Self::Easy => "Easy (3-5 min)",
            Self::Moderate => "Moderate (6-15 min)",
            Self::Challenging => "Challenging (16-30 min)",
            Self::Intensive => "Intensive (30+ min)",
        }
    }
}

/// A coping activity suggested for a mood entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedActivity {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub mood_entry_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ActivityCategory,
    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,
    #[serde(default)]
    pub difficulty_level: Option<DifficultyLevel>,
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub suggested_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Completion counters for today's activities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatistics {
    pub today_total: u32,
    pub today_completed: u32,
    pub today_pending: u32,
    pub completion_rate: f64,
}

// =============================================================================
// EMOTIONS
// =============================================================================

/// A node in the emotion taxonomy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emotion {
    #[serde(default)]
    pub id: Option<i64>,
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub parent: Option<Box<Emotion>>,
    #[serde(default)]
    pub children: Vec<Emotion>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// HELPERS
// =============================================================================

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Ok(s),
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected non-empty string or integer id")),
    }
}
