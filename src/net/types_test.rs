use super::*;
use serde_json::json;

// =============================================================
// User
// =============================================================

#[test]
fn user_accepts_numeric_id() {
    let user: User = serde_json::from_value(json!({"id": 1, "email": "a@b.com", "username": "a"})).unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(user.display_name, None);
    assert_eq!(user.label(), "a");
}

#[test]
fn user_accepts_backend_name_and_picture_fields() {
    let user: User = serde_json::from_value(json!({
        "id": "u-9",
        "email": "c@d.com",
        "username": "c",
        "name": "Casey",
        "picture": "https://img/c.png"
    }))
    .unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Casey"));
    assert_eq!(user.picture_url.as_deref(), Some("https://img/c.png"));
    assert_eq!(user.label(), "Casey");
}

#[test]
fn user_rejects_missing_or_empty_id() {
    assert!(serde_json::from_value::<User>(json!({"email": "a@b.com", "username": "a"})).is_err());
    assert!(serde_json::from_value::<User>(json!({"id": "", "email": "a@b.com", "username": "a"})).is_err());
    assert!(serde_json::from_value::<User>(json!({"id": 1.5, "email": "a@b.com", "username": "a"})).is_err());
}

#[test]
fn user_survives_storage_round_trip() {
    let user = User {
        id: "1".to_owned(),
        email: "a@b.com".to_owned(),
        username: "a".to_owned(),
        display_name: Some("Ada".to_owned()),
        picture_url: None,
    };
    let raw = serde_json::to_string(&user).unwrap();
    assert!(raw.contains("\"displayName\":\"Ada\""));
    assert!(!raw.contains("pictureUrl"));
    let back: User = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, user);
}

// =============================================================
// Auth payloads
// =============================================================

#[test]
fn login_request_uses_camel_case() {
    let req = LoginRequest { username_or_email: "a@b.com".to_owned(), password: "secret1".to_owned() };
    assert_eq!(serde_json::to_value(&req).unwrap(), json!({"usernameOrEmail": "a@b.com", "password": "secret1"}));
}

#[test]
fn auth_response_parses_full_payload() {
    let resp: AuthResponse = serde_json::from_value(json!({
        "accessToken": "tok1",
        "tokenType": "Bearer",
        "user": {"id": 1, "email": "a@b.com", "username": "a"},
        "success": true
    }))
    .unwrap();
    assert_eq!(resp.access_token.as_deref(), Some("tok1"));
    assert_eq!(resp.token_type.as_deref(), Some("Bearer"));
    assert_eq!(resp.user.map(|u| u.id).as_deref(), Some("1"));
    assert_eq!(resp.success, Some(true));
}

#[test]
fn auth_response_accepts_legacy_token_field() {
    let resp: AuthResponse = serde_json::from_value(json!({"token": "tok2"})).unwrap();
    assert_eq!(resp.access_token.as_deref(), Some("tok2"));
}

#[test]
fn auth_response_tolerates_missing_fields() {
    let resp: AuthResponse = serde_json::from_value(json!({"success": true})).unwrap();
    assert!(resp.access_token.is_none());
    assert!(resp.user.is_none());
}

// =============================================================
// Mood entries and activities
// =============================================================

#[test]
fn mood_entry_parses_iso_timestamps_and_nested_activities() {
    let entry: MoodEntry = serde_json::from_value(json!({
        "id": 3,
        "userId": 1,
        "emotionKeys": ["joy"],
        "environment": "IN_GROUP",
        "energyLevel": 4,
        "entryDate": "2024-05-01T09:30:00Z",
        "createdAt": "2024-05-01T09:30:00Z",
        "updatedAt": "2024-05-01T10:00:00+00:00",
        "isVoiceInput": false,
        "suggestedActivities": [{
            "id": 10,
            "moodEntryId": 3,
            "title": "Box breathing",
            "category": "BREATHING",
            "difficultyLevel": "VERY_EASY",
            "isCompleted": false,
            "suggestedDate": "2024-05-01T00:00:00Z",
            "createdAt": "2024-05-01T09:30:00Z",
            "updatedAt": "2024-05-01T09:30:00Z"
        }]
    }))
    .unwrap();
    assert_eq!(entry.environment, MoodEnvironment::InGroup);
    assert_eq!(entry.entry_date.to_rfc3339(), "2024-05-01T09:30:00+00:00");
    assert_eq!(entry.suggested_activities.len(), 1);
    let activity = &entry.suggested_activities[0];
    assert_eq!(activity.category, ActivityCategory::Breathing);
    assert_eq!(activity.difficulty_level, Some(DifficultyLevel::VeryEasy));
    assert_eq!(activity.user_id, None);
}

#[test]
fn create_request_omits_empty_optionals() {
    let req = MoodEntryCreateRequest {
        emotion_keys: vec!["calm".to_owned()],
        environment: MoodEnvironment::Alone,
        energy_level: 3,
        ..MoodEntryCreateRequest::default()
    };
    assert_eq!(
        serde_json::to_value(&req).unwrap(),
        json!({"emotionKeys": ["calm"], "environment": "ALONE", "energyLevel": 3, "isVoiceInput": false})
    );
}

#[test]
fn activity_category_names() {
    assert_eq!(ActivityCategory::SelfCare.as_str(), "SELF_CARE");
    assert_eq!(ActivityCategory::SelfCare.display_name(), "Self Care");
    assert_eq!(serde_json::to_value(ActivityCategory::SelfCare).unwrap(), json!("SELF_CARE"));
    assert_eq!(DifficultyLevel::Intensive.display_name(), "Intensive (30+ min)");
}

#[test]
fn emotion_tree_parses_children() {
    let emotion: Emotion = serde_json::from_value(json!({
        "key": "joy",
        "label": "Joy",
        "children": [{"key": "content", "label": "Content"}]
    }))
    .unwrap();
    assert_eq!(emotion.children.len(), 1);
    assert!(emotion.parent.is_none());
}
