//! Typed REST clients over the HTTP gateway.
//!
//! Each client is a thin handle around a cloned `HttpGateway`; endpoints are
//! relative to the configured API base. Header injection, timeouts, retries
//! and error classification all happen in the gateway.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use chrono::NaiveDate;
use serde_json::json;

use super::error::ApiError;
use super::gateway::{HttpGateway, RequestOptions};
use super::types::{
    ActivityCategory, ActivityStatistics, AuthResponse, Emotion, LoginRequest, MoodEntry, MoodEntryCreateRequest,
    MoodStatistics, RegisterRequest, SuggestedActivity,
};

fn date_segment(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug)]
pub struct AuthApi {
    gateway: HttpGateway,
}

impl AuthApi {
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    /// `POST auth/login`.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.gateway.post("auth/login", request, RequestOptions::new()).await
    }

    /// `POST auth/register`. The payload is passed through untyped.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, ApiError> {
        self.gateway.post("auth/register", request, RequestOptions::new()).await
    }

    /// `POST auth/logout`, best effort, never retried and quiet: a failure
    /// here raises no notice and no forced logout.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let options = RequestOptions::new().with_retries(0).quiet();
        let _: serde_json::Value = self.gateway.post("auth/logout", &json!({}), options).await?;
        Ok(())
    }
}

// =============================================================================
// MOOD ENTRIES
// =============================================================================

#[derive(Clone, Debug)]
pub struct MoodApi {
    gateway: HttpGateway,
}

#[allow(clippy::missing_errors_doc)]
impl MoodApi {
    const BASE: &'static str = "mood-entries";

    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, entry: &MoodEntryCreateRequest) -> Result<MoodEntry, ApiError> {
        self.gateway.post(Self::BASE, entry, RequestOptions::new()).await
    }

    pub async fn update(&self, id: i64, entry: &MoodEntryCreateRequest) -> Result<MoodEntry, ApiError> {
        self.gateway.put(&format!("{}/{id}", Self::BASE), entry, RequestOptions::new()).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.gateway.delete(&format!("{}/{id}", Self::BASE), RequestOptions::new()).await
    }

    pub async fn all(&self) -> Result<Vec<MoodEntry>, ApiError> {
        self.gateway.get(Self::BASE, RequestOptions::new()).await
    }

    pub async fn today(&self) -> Result<Vec<MoodEntry>, ApiError> {
        self.gateway.get(&format!("{}/today", Self::BASE), RequestOptions::new()).await
    }

    /// Entries still inside the edit window.
    pub async fn editable(&self) -> Result<Vec<MoodEntry>, ApiError> {
        self.gateway.get(&format!("{}/editable", Self::BASE), RequestOptions::new()).await
    }

    pub async fn by_date(&self, date: NaiveDate) -> Result<Vec<MoodEntry>, ApiError> {
        self.gateway.get(&format!("{}/date/{}", Self::BASE, date_segment(date)), RequestOptions::new()).await
    }

    pub async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<MoodEntry>, ApiError> {
        let options = RequestOptions::new()
            .with_query("startDate", &date_segment(start))
            .with_query("endDate", &date_segment(end));
        self.gateway.get(&format!("{}/range", Self::BASE), options).await
    }

    pub async fn by_id(&self, id: i64) -> Result<MoodEntry, ApiError> {
        self.gateway.get(&format!("{}/{id}", Self::BASE), RequestOptions::new()).await
    }

    pub async fn statistics(&self) -> Result<MoodStatistics, ApiError> {
        self.gateway.get(&format!("{}/statistics", Self::BASE), RequestOptions::new()).await
    }
}

// =============================================================================
// EMOTIONS
// =============================================================================

/// Shape requested from `emotions/dropdown/{kind}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropdownKind {
    Main,
    Sub,
    All,
    Hierarchy,
}

impl DropdownKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Sub => "sub",
            Self::All => "all",
            Self::Hierarchy => "hierarchy",
        }
    }
}

#[derive(Clone, Debug)]
pub struct EmotionApi {
    gateway: HttpGateway,
}

#[allow(clippy::missing_errors_doc)]
impl EmotionApi {
    const BASE: &'static str = "emotions";

    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    pub async fn all(&self) -> Result<Vec<Emotion>, ApiError> {
        self.gateway.get(Self::BASE, RequestOptions::new()).await
    }

    pub async fn by_key(&self, key: &str) -> Result<Emotion, ApiError> {
        self.gateway.get(&format!("{}/{}", Self::BASE, urlencoding::encode(key)), RequestOptions::new()).await
    }

    pub async fn root(&self) -> Result<Vec<Emotion>, ApiError> {
        self.gateway.get(&format!("{}/root", Self::BASE), RequestOptions::new()).await
    }

    pub async fn by_parent(&self, parent_key: &str) -> Result<Vec<Emotion>, ApiError> {
        let endpoint = format!("{}/parent/{}", Self::BASE, urlencoding::encode(parent_key));
        self.gateway.get(&endpoint, RequestOptions::new()).await
    }

    /// Full emotion wheel.
    pub async fn taxonomy(&self) -> Result<Vec<Emotion>, ApiError> {
        self.gateway.get(&format!("{}/taxonomy", Self::BASE), RequestOptions::new()).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Emotion>, ApiError> {
        let options = RequestOptions::new().with_query("q", query);
        self.gateway.get(&format!("{}/search", Self::BASE), options).await
    }

    pub async fn dropdown(&self, kind: Option<DropdownKind>) -> Result<Vec<Emotion>, ApiError> {
        let endpoint = match kind {
            Some(kind) => format!("{}/dropdown/{}", Self::BASE, kind.as_str()),
            None => format!("{}/dropdown", Self::BASE),
        };
        self.gateway.get(&endpoint, RequestOptions::new()).await
    }

    pub async fn by_category(&self, category_key: &str) -> Result<Vec<Emotion>, ApiError> {
        let endpoint = format!("{}/category/{}", Self::BASE, urlencoding::encode(category_key));
        self.gateway.get(&endpoint, RequestOptions::new()).await
    }

    pub async fn sub(&self) -> Result<Vec<Emotion>, ApiError> {
        self.gateway.get(&format!("{}/sub", Self::BASE), RequestOptions::new()).await
    }

    pub async fn sub_grouped(&self) -> Result<Vec<Emotion>, ApiError> {
        self.gateway.get(&format!("{}/sub/grouped", Self::BASE), RequestOptions::new()).await
    }

    pub async fn exists(&self, key: &str) -> Result<bool, ApiError> {
        let endpoint = format!("{}/exists/{}", Self::BASE, urlencoding::encode(key));
        self.gateway.get(&endpoint, RequestOptions::new()).await
    }
}

// =============================================================================
// SUGGESTED ACTIVITIES
// =============================================================================

#[derive(Clone, Debug)]
pub struct ActivityApi {
    gateway: HttpGateway,
}

#[allow(clippy::missing_errors_doc)]
impl ActivityApi {
    const BASE: &'static str = "activities";

    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    pub async fn complete(&self, id: i64) -> Result<SuggestedActivity, ApiError> {
        self.gateway.post(&format!("{}/{id}/complete", Self::BASE), &json!({}), RequestOptions::new()).await
    }

    pub async fn uncomplete(&self, id: i64) -> Result<SuggestedActivity, ApiError> {
        self.gateway.post(&format!("{}/{id}/uncomplete", Self::BASE), &json!({}), RequestOptions::new()).await
    }

    pub async fn today(&self) -> Result<Vec<SuggestedActivity>, ApiError> {
        self.gateway.get(&format!("{}/today", Self::BASE), RequestOptions::new()).await
    }

    pub async fn pending_today(&self) -> Result<Vec<SuggestedActivity>, ApiError> {
        self.gateway.get(&format!("{}/today/pending", Self::BASE), RequestOptions::new()).await
    }

    pub async fn by_date(&self, date: NaiveDate) -> Result<Vec<SuggestedActivity>, ApiError> {
        self.gateway.get(&format!("{}/date/{}", Self::BASE, date_segment(date)), RequestOptions::new()).await
    }

    pub async fn history(&self) -> Result<Vec<SuggestedActivity>, ApiError> {
        self.gateway.get(&format!("{}/history", Self::BASE), RequestOptions::new()).await
    }

    pub async fn completed(&self) -> Result<Vec<SuggestedActivity>, ApiError> {
        self.gateway.get(&format!("{}/completed", Self::BASE), RequestOptions::new()).await
    }

    pub async fn by_category(&self, category: ActivityCategory) -> Result<Vec<SuggestedActivity>, ApiError> {
        self.gateway.get(&format!("{}/category/{}", Self::BASE, category.as_str()), RequestOptions::new()).await
    }

    pub async fn by_id(&self, id: i64) -> Result<SuggestedActivity, ApiError> {
        self.gateway.get(&format!("{}/{id}", Self::BASE), RequestOptions::new()).await
    }

    pub async fn statistics(&self) -> Result<ActivityStatistics, ApiError> {
        self.gateway.get(&format!("{}/statistics", Self::BASE), RequestOptions::new()).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.gateway.delete(&format!("{}/{id}", Self::BASE), RequestOptions::new()).await
    }
}
