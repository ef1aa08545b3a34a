//! Lead volume caps over calendar windows.
//!
//! All submissions agree on a single reference clock: UTC. Cap weeks begin
//! on the most recent Monday at 00:00:00 UTC, cap months on the 1st at
//! 00:00:00 UTC. Windows are recomputed from the stored lead history at each
//! submission; no counters are kept and no background reset job exists.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::LeadCaps;

/// Which configured limit refused the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapScope {
    Weekly,
    Monthly,
}

impl CapScope {
    pub const fn label(self) -> &'static str {
        match self {
            CapScope::Weekly => "weekly",
            CapScope::Monthly => "monthly",
        }
    }
}

/// A submission refused by a volume limit. Expected and recoverable; the
/// Display form is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} lead cap of {limit} reached; submissions are paused until the window resets", .scope.label())]
pub struct CapReached {
    pub scope: CapScope,
    pub limit: u32,
}

/// Most recent Monday 00:00:00 UTC at or before `now`.
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    monday.and_time(NaiveTime::MIN).and_utc()
}

/// First of the current month, 00:00:00 UTC.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = now
        .date_naive()
        .with_day(1)
        .expect("the first of a month always exists");
    first.and_time(NaiveTime::MIN).and_utc()
}

/// Evaluate the caps against prior submission times. With
/// `pause_when_reached` unset (or no limits configured) the caps are
/// advisory and every submission proceeds.
pub fn check_caps(
    caps: &LeadCaps,
    submissions: &[DateTime<Utc>],
    now: DateTime<Utc>,
) -> Result<(), CapReached> {
    if !caps.pause_when_reached {
        return Ok(());
    }

    if let Some(limit) = caps.weekly_limit {
        let since = week_start(now);
        if count_since(submissions, since) >= limit as usize {
            return Err(CapReached {
                scope: CapScope::Weekly,
                limit,
            });
        }
    }

    if let Some(limit) = caps.monthly_limit {
        let since = month_start(now);
        if count_since(submissions, since) >= limit as usize {
            return Err(CapReached {
                scope: CapScope::Monthly,
                limit,
            });
        }
    }

    Ok(())
}

fn count_since(submissions: &[DateTime<Utc>], since: DateTime<Utc>) -> usize {
    submissions.iter().filter(|at| **at >= since).count()
}
