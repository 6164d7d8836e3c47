use super::ReportError;
use crate::entities::EVENT_SERIES_COLUMNS;
use crate::store::Frame;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Running totals of positive and negative events up to and including `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub positive: i64,
    pub negative: i64,
}

pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|moment| moment.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|moment| moment.date())
        })
}

/// Prefix sums of an event series frame, ordered by date. Missing counts are
/// treated as zero so both totals never decrease.
pub fn cumulative_series(frame: &Frame) -> Result<Vec<CumulativePoint>, ReportError> {
    let [date_column, positive_column, negative_column] = EVENT_SERIES_COLUMNS;
    let dates = frame.text_column(date_column)?;
    let positive = frame.i64_column(positive_column)?;
    let negative = frame.i64_column(negative_column)?;

    let mut daily = dates
        .into_iter()
        .zip(positive.into_iter().zip(negative))
        .map(|(raw, (positive, negative))| {
            let date = parse_event_date(&raw).ok_or(ReportError::InvalidDate { value: raw })?;
            Ok((
                date,
                positive.unwrap_or(0).max(0),
                negative.unwrap_or(0).max(0),
            ))
        })
        .collect::<Result<Vec<_>, ReportError>>()?;
    daily.sort_by_key(|(date, _, _)| *date);

    let mut running_positive = 0_i64;
    let mut running_negative = 0_i64;
    Ok(daily
        .into_iter()
        .map(|(date, positive, negative)| {
            running_positive += positive;
            running_negative += negative;
            CumulativePoint {
                date,
                positive: running_positive,
                negative: running_negative,
            }
        })
        .collect())
}
