//! Sampling-frequency inference and future timestamp generation.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

/// Minimum number of distinct timestamps needed to infer a cadence.
pub const MIN_INFERENCE_POINTS: usize = 3;

/// Which day of the month a calendar cadence lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthAnchor {
    Start,
    End,
}

/// Regular interval between observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Constant step, e.g. daily, hourly, or weekly.
    Fixed(Duration),
    /// Every `months` calendar months, anchored at month start or end.
    Monthly { months: u32, anchor: MonthAnchor },
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::Fixed(Duration::days(1))
    }
}

impl Cadence {
    /// The timestamp `steps` intervals after `from`.
    pub fn advance(self, from: NaiveDateTime, steps: u32) -> Option<NaiveDateTime> {
        match self {
            Cadence::Fixed(step) => {
                from.checked_add_signed(step.checked_mul(i32::try_from(steps).ok()?)?)
            }
            Cadence::Monthly { months, anchor } => {
                let first = from.date().with_day(1)?;
                let target = first.checked_add_months(Months::new(months.checked_mul(steps)?))?;
                let date = match anchor {
                    MonthAnchor::Start => target,
                    MonthAnchor::End => last_day_of_month(target)?,
                };
                Some(date.and_time(from.time()))
            }
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().is_some_and(|next| next.day() == 1)
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Infer the cadence of `timestamps`, which need not be sorted or distinct.
///
/// Returns None with fewer than three distinct timestamps or when no regular
/// cadence fits.
pub fn infer_cadence(timestamps: &[NaiveDateTime]) -> Option<Cadence> {
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() < MIN_INFERENCE_POINTS {
        return None;
    }

    let step = sorted[1] - sorted[0];
    if sorted.windows(2).all(|w| w[1] - w[0] == step) {
        return Some(Cadence::Fixed(step));
    }

    let time = sorted[0].time();
    if sorted.iter().any(|ts| ts.time() != time) {
        return None;
    }
    let dates: Vec<NaiveDate> = sorted.iter().map(NaiveDateTime::date).collect();
    let anchor = if dates.iter().all(|d| d.day() == 1) {
        MonthAnchor::Start
    } else if dates.iter().all(|d| is_month_end(*d)) {
        MonthAnchor::End
    } else {
        return None;
    };
    let months = months_between(dates[0], dates[1]);
    if months <= 0 || dates.windows(2).any(|w| months_between(w[0], w[1]) != months) {
        return None;
    }
    Some(Cadence::Monthly {
        months: u32::try_from(months).ok()?,
        anchor,
    })
}

/// `horizon` timestamps strictly after the latest observation, continuing the
/// inferred cadence (daily when none can be inferred). Empty when there is
/// no observation.
pub fn future_timestamps(observed: &[NaiveDateTime], horizon: usize) -> Vec<NaiveDateTime> {
    let Some(last) = observed.iter().max().copied() else {
        return Vec::new();
    };
    let cadence = infer_cadence(observed).unwrap_or_default();
    (1..=horizon)
        .map_while(|step| cadence.advance(last, u32::try_from(step).ok()?))
        .collect()
}
