use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub unit_type: String,
    pub value: f64,
    pub periodicity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub time_of_day: Vec<String>,
    #[serde(default)]
    pub area_id: Option<String>,
    #[serde(default)]
    pub recurrence: String,
    #[serde(default)]
    pub created_date: Option<DateTime<FixedOffset>>,
    pub goal: Option<Goal>,
    #[serde(default)]
    pub log_method: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current_value: f64,
    pub target_value: f64,
    pub unit_type: String,
    pub periodicity: String,
    pub reference_date: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStatus {
    pub status: String,
    pub progress: Progress,
}

/// A value logged toward a habit. `target_date` is the day the value counts for,
/// not when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: String,
    pub value: f64,
    #[serde(default)]
    pub created_date: Option<DateTime<FixedOffset>>,
    #[serde(alias = "targe_date")]
    pub target_date: DateTime<FixedOffset>,
    pub unit_type: String,
    pub habit_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitNote {
    pub id: String,
    pub content: String,
    pub created_date: DateTime<FixedOffset>,
    pub habit_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    pub created_date: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMismatch {
    #[serde(default)]
    pub actual_unit_category: String,
    #[serde(default)]
    pub expected_unit_category: String,
}

/// Error body returned by the service on failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub reason: String,
    #[serde(default)]
    pub additional_info: Option<UnitMismatch>,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub habit_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogUpQuery {
    pub habit_id: Option<String>,
    pub target_date: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JournalQuery {
    pub target_date: Option<String>,
}
