use crate::aggregate::{aggregate_daily, DailyTotals};
use crate::errors::AppError;
use crate::models::{Habit, JournalQuery, LogUpQuery, LogsQuery};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let habits = state.client.get_habits(&state.call_options()).await?;
    let page = render_index(&habits).map_err(AppError::internal)?;
    Ok(Html(page))
}

pub async fn get_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<DailyTotals>, AppError> {
    let habit_id = required(query.habit_id, "habit_id")?;
    let (from, to) = year_to_date_window(Local::now().date_naive());

    let logs = state
        .client
        .get_habit_logs(&habit_id, to_local(from), to_local(to), &state.call_options())
        .await?;

    Ok(Json(aggregate_daily(&logs)))
}

pub async fn log_up(
    State(state): State<AppState>,
    Query(query): Query<LogUpQuery>,
) -> Result<StatusCode, AppError> {
    let habit_id = required(query.habit_id, "habit_id")?;
    let target_date = parse_date(&required(query.target_date, "target_date")?)?;
    let unit = query.unit.unwrap_or_default();

    let log = state
        .client
        .add_habit_log(&habit_id, target_date, &unit, "1", &state.call_options())
        .await?;
    info!(habit_id = %habit_id, log_id = %log.id, "logged +1");

    Ok(StatusCode::OK)
}

pub async fn get_journal(
    State(state): State<AppState>,
    Query(query): Query<JournalQuery>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let target_date = match query.target_date.filter(|value| !value.is_empty()) {
        Some(value) => parse_date(&value)?,
        None => Local::now().fixed_offset(),
    };

    let habits = state
        .client
        .get_journal(&target_date, &state.call_options())
        .await?;
    Ok(Json(habits))
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request(format!("{name} is required")))
}

fn parse_date(value: &str) -> Result<DateTime<FixedOffset>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|err| AppError::bad_request(format!("invalid target_date {value:?}: {err}")))
}

/// From the first second of the year to the last second of the current month.
pub fn year_to_date_window(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    let next_month = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .unwrap_or(today);

    (
        start.and_time(chrono::NaiveTime::MIN),
        next_month.and_time(chrono::NaiveTime::MIN) - Duration::seconds(1),
    )
}

fn to_local(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| naive.and_utc().with_timezone(&Local))
}
