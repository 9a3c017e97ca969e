//! Typed operations against the Habitify API.

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::{Area, Habit, HabitLog, HabitNote, HabitStatus};
use crate::transport::{CallOptions, HttpTransport, Transport, TransportClient};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;

/// Unit sent when the caller leaves it empty.
pub const DEFAULT_UNIT_TYPE: &str = "rep";

/// Holds the API key and a pooled transport; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct HabitifyClient {
    transport: TransportClient,
}

impl HabitifyClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: TransportClient::new(config, transport),
        }
    }

    /// Habits scheduled for `target_date`. The date keeps its UTC offset on the wire.
    pub async fn get_journal(
        &self,
        target_date: &DateTime<FixedOffset>,
        opts: &CallOptions,
    ) -> Result<Vec<Habit>, ClientError> {
        let query = [("target_date", rfc3339(target_date))];
        self.transport
            .request(Method::GET, "/journal", &query, None, opts)
            .await
    }

    pub async fn get_habits(&self, opts: &CallOptions) -> Result<Vec<Habit>, ClientError> {
        self.transport
            .request(Method::GET, "/habits", &[], None, opts)
            .await
    }

    pub async fn get_habit(&self, habit_id: &str, opts: &CallOptions) -> Result<Habit, ClientError> {
        self.transport
            .request(Method::GET, &habit_path(habit_id, "")?, &[], None, opts)
            .await
    }

    /// Progress of a habit, optionally as of `target_date` (offset kept).
    pub async fn get_habit_status(
        &self,
        habit_id: &str,
        target_date: Option<&DateTime<FixedOffset>>,
        opts: &CallOptions,
    ) -> Result<HabitStatus, ClientError> {
        let query: Vec<(&str, String)> = target_date
            .map(|date| ("target_date", rfc3339(date)))
            .into_iter()
            .collect();
        self.transport
            .request(
                Method::GET,
                &habit_path(habit_id, "/status")?,
                &query,
                None,
                opts,
            )
            .await
    }

    /// Logs of one habit whose target date falls in `[from, to]`.
    pub async fn get_habit_logs(
        &self,
        habit_id: &str,
        from: impl Into<DateTime<Utc>>,
        to: impl Into<DateTime<Utc>>,
        opts: &CallOptions,
    ) -> Result<Vec<HabitLog>, ClientError> {
        let query = [("from", rfc3339(&from.into())), ("to", rfc3339(&to.into()))];
        self.transport
            .request(
                Method::GET,
                &habit_path(habit_id, "/logs")?,
                &query,
                None,
                opts,
            )
            .await
    }

    /// Records `value` toward `target_date`. An empty `unit_type` is sent as
    /// [`DEFAULT_UNIT_TYPE`].
    pub async fn add_habit_log(
        &self,
        habit_id: &str,
        target_date: impl Into<DateTime<Utc>>,
        unit_type: &str,
        value: &str,
        opts: &CallOptions,
    ) -> Result<HabitLog, ClientError> {
        let unit_type = if unit_type.is_empty() {
            DEFAULT_UNIT_TYPE
        } else {
            unit_type
        };
        let body = json!({
            "value": value,
            "unit_type": unit_type,
            "target_date": rfc3339(&target_date.into()),
        });
        self.transport
            .request(
                Method::POST,
                &habit_path(habit_id, "/logs")?,
                &[],
                Some(body),
                opts,
            )
            .await
    }

    pub async fn get_habit_notes(
        &self,
        habit_id: &str,
        from: impl Into<DateTime<Utc>>,
        to: impl Into<DateTime<Utc>>,
        opts: &CallOptions,
    ) -> Result<Vec<HabitNote>, ClientError> {
        let query = [("from", rfc3339(&from.into())), ("to", rfc3339(&to.into()))];
        self.transport
            .request(
                Method::GET,
                &habit_path(habit_id, "/notes")?,
                &query,
                None,
                opts,
            )
            .await
    }

    pub async fn add_habit_note(
        &self,
        habit_id: &str,
        content: &str,
        created: impl Into<DateTime<Utc>>,
        opts: &CallOptions,
    ) -> Result<HabitNote, ClientError> {
        let body = json!({
            "content": content,
            "created": rfc3339(&created.into()),
        });
        self.transport
            .request(
                Method::POST,
                &habit_path(habit_id, "/notes")?,
                &[],
                Some(body),
                opts,
            )
            .await
    }

    pub async fn get_areas(&self, opts: &CallOptions) -> Result<Vec<Area>, ClientError> {
        self.transport
            .request(Method::GET, "/areas", &[], None, opts)
            .await
    }
}

/// `/habits/{id}{suffix}` with the id percent-encoded as a single segment.
fn habit_path(habit_id: &str, suffix: &str) -> Result<String, ClientError> {
    if habit_id == "." || habit_id == ".." {
        return Err(ClientError::InvalidId(habit_id.to_string()));
    }
    Ok(format!("/habits/{}{suffix}", urlencoding::encode(habit_id)))
}

/// Second precision, `Z` for a zero offset and `+hh:mm` otherwise.
fn rfc3339<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
