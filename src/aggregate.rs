use crate::models::HabitLog;
use std::collections::BTreeMap;

/// Summed log values keyed by target date in epoch seconds.
pub type DailyTotals = BTreeMap<i64, f64>;

/// Buckets logs by their exact target date and adds up the values.
pub fn aggregate_daily(logs: &[HabitLog]) -> DailyTotals {
    logs.iter().fold(DailyTotals::new(), |mut totals, log| {
        *totals.entry(log.target_date.timestamp()).or_default() += log.value;
        totals
    })
}
