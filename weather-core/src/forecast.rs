//! Reduces the 3-hour forecast list to one reading per calendar day.

use chrono::{Datelike, NaiveDateTime};

use crate::model::{DailyForecast, ForecastInterval};

/// Maximum number of days kept after grouping.
pub const MAX_DAYS: usize = 7;

/// Group `intervals` by calendar date and pick one representative per day.
///
/// Days keep the order in which their first sample appears. The representative
/// is the sample at `n / 2` within the day's group, in arrival order.
pub fn aggregate_daily(intervals: &[ForecastInterval]) -> Vec<DailyForecast> {
    let mut groups: Vec<Vec<&ForecastInterval>> = Vec::new();

    for interval in intervals {
        let date = interval.date();
        match groups.iter_mut().find(|g| g[0].date() == date) {
            Some(group) => group.push(interval),
            None => groups.push(vec![interval]),
        }
    }

    groups
        .into_iter()
        .take(MAX_DAYS)
        .map(|group| group[group.len() / 2].clone())
        .collect()
}

/// Card label for a day: long weekday name and `month/day`.
pub fn day_label(local_time: NaiveDateTime) -> (String, String) {
    let day = local_time.format("%A").to_string();
    let numeric = format!("{}/{}", local_time.month(), local_time.day());
    (day, numeric)
}
