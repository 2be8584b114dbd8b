//! Deterministic clock: the single source of "now" and local timezone.

use crate::config::ClockConfig;
use crate::errors::Result;
use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc, Weekday};

/// A captured instant plus the local offset used for hour/weekday checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl Clock {
    /// Clock pinned at `now`, interpreted in `offset`.
    pub fn fixed(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Clock pinned at `now` in UTC.
    pub fn fixed_utc(now: DateTime<Utc>) -> Self {
        Self::fixed(now, utc_offset())
    }

    /// Wall clock reading taken once, in `offset`.
    pub fn system(offset: FixedOffset) -> Self {
        Self::fixed(Utc::now(), offset)
    }

    /// Build from config: pinned instant if configured, otherwise the wall clock.
    pub fn from_config(cfg: &ClockConfig) -> Result<Self> {
        let offset = cfg.offset()?;
        Ok(match cfg.fixed_now()? {
            Some(now) => Self::fixed(now, offset),
            None => Self::system(offset),
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// `now` expressed in the local offset.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.now.with_timezone(&self.offset)
    }

    /// Weekday of `now` in the local offset.
    pub fn local_weekday(&self) -> Weekday {
        self.local_now().weekday()
    }

    /// Local hour (0-23) of an arbitrary instant.
    pub fn local_hour_of(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&self.offset).hour()
    }

    /// Local weekday of an arbitrary instant.
    pub fn local_weekday_of(&self, at: DateTime<Utc>) -> Weekday {
        at.with_timezone(&self.offset).weekday()
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}
