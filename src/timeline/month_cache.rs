//! Timestamp → month index lookup over a month-marker sequence.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::calendar;

/// The time zone the board's month grid lives in.
///
/// Month starts are the local midnights of each marker in this zone, so the
/// millisecond spans of individual months vary with DST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardZone {
    /// The host's local zone.
    #[default]
    Local,
    /// A named IANA zone.
    Named(Tz),
}

impl BoardZone {
    /// Resolve an IANA name such as `"Europe/Berlin"`.
    pub fn named(name: &str) -> Option<Self> {
        name.parse::<Tz>().ok().map(BoardZone::Named)
    }

    /// Epoch milliseconds of the first local instant of `date`.
    pub fn midnight_millis(&self, date: NaiveDate) -> i64 {
        match self {
            BoardZone::Local => midnight_millis_in(&chrono::Local, date),
            BoardZone::Named(tz) => midnight_millis_in(tz, date),
        }
    }
}

/// Local midnight, or the first valid instant after it when midnight falls
/// inside a DST gap. Ambiguous midnights resolve to the earlier instant.
fn midnight_millis_in<Z: TimeZone>(tz: &Z, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut local = midnight;
    // Gaps are at most a few hours; quarter-hour steps cover every real zone.
    for _ in 0..(24 * 4) {
        if let Some(instant) = tz.from_local_datetime(&local).earliest() {
            return instant.timestamp_millis();
        }
        local += Duration::minutes(15);
    }
    midnight.and_utc().timestamp_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    len: usize,
    first_ms: i64,
    last_ms: i64,
    zone: BoardZone,
}

/// Per-month start timestamps and day counts for one marker sequence.
///
/// The cache is rebuilt wholesale when the marker sequence's identity
/// (length, first and last start) changes and is otherwise left untouched,
/// so calling [`MonthIndexCache::ensure`] on every pointer move is cheap.
#[derive(Debug, Clone, Default)]
pub struct MonthIndexCache {
    key: Option<CacheKey>,
    markers: Vec<NaiveDate>,
    starts: Vec<i64>,
    days: Vec<u32>,
}

impl MonthIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the cache reflect `months` in `zone`. Returns `true` if it had to
    /// be rebuilt.
    pub fn ensure(&mut self, months: &[NaiveDate], zone: BoardZone) -> bool {
        let key = match (months.first(), months.last()) {
            (Some(first), Some(last)) => Some(CacheKey {
                len: months.len(),
                first_ms: zone.midnight_millis(*first),
                last_ms: zone.midnight_millis(*last),
                zone,
            }),
            _ => None,
        };
        if key == self.key && self.markers.len() == months.len() {
            return false;
        }

        self.markers = months.iter().map(|m| calendar::first_of_month(*m)).collect();
        self.starts = self.markers.iter().map(|m| zone.midnight_millis(*m)).collect();
        self.days = self.markers.iter().map(|m| calendar::days_in_month_of(*m)).collect();
        self.key = key;
        tracing::debug!(months = self.markers.len(), "rebuilt month index cache");
        true
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// First day of the month at `index`.
    pub fn month_start(&self, index: usize) -> Option<NaiveDate> {
        self.markers.get(index).copied()
    }

    /// Calendar day count of the month at `index`.
    pub fn days_in(&self, index: usize) -> u32 {
        self.days.get(index).copied().unwrap_or(30)
    }

    /// Index of the month containing `millis`.
    ///
    /// Before the first month clamps to 0; at or after the last month's start
    /// clamps to the last index, which is treated as open-ended. `None` only
    /// for an empty cache.
    pub fn index_of_timestamp(&self, millis: i64) -> Option<usize> {
        if self.starts.is_empty() {
            return None;
        }
        // Month i spans [starts[i], starts[i + 1]); the next month's start is
        // a calendar boundary, not start + days * 24h.
        let after = self.starts.partition_point(|start| *start <= millis);
        Some(after.saturating_sub(1))
    }

    /// Index of the month containing `date`'s local midnight.
    pub fn index_of_date(&self, date: NaiveDate) -> Option<usize> {
        let zone = self.key.map(|k| k.zone)?;
        self.index_of_timestamp(zone.midnight_millis(date))
    }
}
