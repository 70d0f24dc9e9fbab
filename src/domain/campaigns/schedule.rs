//! Campaign scheduling.
//!
//! Pure time-window checks. Nothing here ticks: consumers re-poll
//! [`time_remaining`] on [`COUNTDOWN_TICK`] for a live countdown and refresh
//! campaign data on [`CATALOG_REFRESH_INTERVAL`]. The two cadences are
//! independent and must stay uncoupled; both timers belong to the consumer
//! and must be cleared on teardown.

use std::time::Duration;

use jiff::Timestamp;

use crate::domain::campaigns::models::Campaign;

/// How often consumers should re-fetch campaign and price data.
pub const CATALOG_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// How often consumers should recompute the countdown display.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

/// Whether the campaign applies at `now`: its active flag is set and `now`
/// lies inside the inclusive `[starts_at, ends_at]` window.
#[must_use]
pub fn is_active(campaign: &Campaign, now: Timestamp) -> bool {
    campaign.active && campaign.starts_at <= now && now <= campaign.ends_at
}

/// Countdown breakdown until a campaign ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRemaining {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// The full remaining time in milliseconds, before breakdown.
    pub total_ms: i64,
}

/// Time left until the campaign's end, or `None` once it is over
/// (`ends_at <= now`). Hours are not capped at 24; a three-day campaign
/// counts down from 72 hours.
#[must_use]
pub fn time_remaining(campaign: &Campaign, now: Timestamp) -> Option<TimeRemaining> {
    let total_ms = campaign.ends_at.as_millisecond() - now.as_millisecond();

    if total_ms <= 0 {
        return None;
    }

    let hours = total_ms / MS_PER_HOUR;
    let after_hours = total_ms % MS_PER_HOUR;

    Some(TimeRemaining {
        hours,
        minutes: after_hours / MS_PER_MINUTE,
        seconds: (after_hours % MS_PER_MINUTE) / MS_PER_SECOND,
        total_ms,
    })
}
