//! Pixel geometry for feature cards on the month grid, and the inverse
//! mapping from a pixel offset back to a calendar date.

use chrono::NaiveDate;

use super::calendar;
use super::month_cache::{BoardZone, MonthIndexCache};
use crate::model::{Feature, Schedule};

pub const DEFAULT_MIN_BAR_WIDTH: f32 = 40.0;

/// Largest fraction strictly below 1, used when a pixel lies past the grid.
const ALMOST_ONE: f64 = 1.0 - 1e-9;

/// Horizontal placement of a card, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f32,
    pub width: f32,
}

impl BarGeometry {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Maps dates to pixels and back against a month grid.
///
/// Owns the [`MonthIndexCache`]; every call refreshes it against the month
/// sequence passed in, which is a no-op while that sequence is unchanged.
#[derive(Debug, Clone)]
pub struct PositionMapper {
    cache: MonthIndexCache,
    zone: BoardZone,
    month_width: f32,
    board_offset: f32,
    min_bar_width: f32,
    /// Span drawn for items without dates.
    fallback: (NaiveDate, NaiveDate),
}

impl PositionMapper {
    pub fn new(zone: BoardZone, month_width: f32, fallback_start: NaiveDate) -> Self {
        Self {
            cache: MonthIndexCache::new(),
            zone,
            month_width: sanitize_width(month_width),
            board_offset: 0.0,
            min_bar_width: DEFAULT_MIN_BAR_WIDTH,
            fallback: (fallback_start, fallback_start),
        }
    }

    pub fn with_min_bar_width(mut self, min_bar_width: f32) -> Self {
        self.min_bar_width = min_bar_width.max(0.0);
        self
    }

    pub fn with_fallback_span(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.fallback = (start, end.max(start));
        self
    }

    pub fn month_width(&self) -> f32 {
        self.month_width
    }

    pub fn set_month_width(&mut self, month_width: f32) {
        self.month_width = sanitize_width(month_width);
    }

    pub fn board_offset(&self) -> f32 {
        self.board_offset
    }

    /// Screen x of the board's first month column.
    pub fn set_board_offset(&mut self, board_offset: f32) {
        if board_offset.is_finite() {
            self.board_offset = board_offset;
        }
    }

    /// Span drawn for unplanned items. Gestures on those items should be
    /// anchored at its start so a card does not jump when picked up.
    pub fn fallback_span(&self) -> (NaiveDate, NaiveDate) {
        self.fallback
    }

    pub fn set_fallback_span(&mut self, start: NaiveDate, end: NaiveDate) {
        self.fallback = (start, end.max(start));
    }

    /// Card geometry for a feature. Unplanned items use the fallback span.
    pub fn compute_position(&mut self, feature: &Feature, months: &[NaiveDate]) -> BarGeometry {
        self.schedule_geometry(&feature.schedule, months)
    }

    pub fn schedule_geometry(&mut self, schedule: &Schedule, months: &[NaiveDate]) -> BarGeometry {
        let (start, end) = match *schedule {
            Schedule::Planned { start, end } => (start, end),
            Schedule::Unplanned => self.fallback,
        };
        self.span_geometry(start, end, months)
    }

    /// Geometry of an inclusive `[start, end]` date span.
    ///
    /// `left` sits at the start of `start`'s day and the right edge at the end
    /// of `end`'s day, so a feature ending on the last day of a month reaches
    /// the month boundary exactly. Width never drops below the minimum bar
    /// width.
    pub fn span_geometry(&mut self, start: NaiveDate, end: NaiveDate, months: &[NaiveDate]) -> BarGeometry {
        self.cache.ensure(months, self.zone);
        if self.cache.is_empty() {
            return BarGeometry {
                left: self.board_offset,
                width: self.min_bar_width,
            };
        }

        let start_pos = self.month_position(start, false);
        let end_pos = self.month_position(end, true);
        let mw = self.month_width as f64;

        let left = self.board_offset as f64 + start_pos * mw;
        let width = ((end_pos - start_pos) * mw).max(self.min_bar_width as f64);
        BarGeometry {
            left: left as f32,
            width: width as f32,
        }
    }

    /// Calendar date under the pixel `px`.
    ///
    /// Pixels left of the grid resolve to the first day of the first month;
    /// pixels right of it to the last day of the last month. `None` only for
    /// an empty month sequence.
    pub fn date_from_pixel(&mut self, px: f32, months: &[NaiveDate]) -> Option<NaiveDate> {
        self.cache.ensure(months, self.zone);
        let count = self.cache.len();
        if count == 0 {
            return None;
        }

        let mut relative = (px as f64 - self.board_offset as f64) / self.month_width as f64;
        if !relative.is_finite() {
            relative = 0.0;
        }
        // Card edges are stored as f32; a pixel within rounding distance of a
        // column edge belongs to the month starting there.
        let nearest = relative.round();
        let edge = self.board_offset as f64 + nearest * self.month_width as f64;
        let tolerance = (px.abs() as f64).max(edge.abs()).max(1.0) * f32::EPSILON as f64 * 4.0;
        if (px as f64 - edge).abs() <= tolerance {
            relative = nearest;
        }
        let floor = relative.floor();
        let (index, fraction) = if floor < 0.0 {
            (0, 0.0)
        } else if floor > (count - 1) as f64 {
            (count - 1, ALMOST_ONE)
        } else {
            (floor as usize, relative - floor)
        };

        let days = self.cache.days_in(index).max(1) as f64;
        let offset = (fraction * (days - 1.0)).round().clamp(0.0, days - 1.0) as i64;
        let first = self.cache.month_start(index)?;
        Some(calendar::add_days(first, offset))
    }

    /// Calendar days between the dates under two pixels. Zero when the month
    /// sequence is empty.
    pub fn day_delta(&mut self, from_px: f32, to_px: f32, months: &[NaiveDate]) -> i64 {
        match (self.date_from_pixel(from_px, months), self.date_from_pixel(to_px, months)) {
            (Some(from), Some(to)) => calendar::days_between(from, to),
            _ => 0,
        }
    }

    /// Grid position of `date` as `month index + fraction`.
    ///
    /// Start edges use `(day - 1) / days`, end edges `day / days`. A date
    /// before the month its timestamp resolved to (only possible before the
    /// grid) pins to fraction 0; a date past it (only after the grid) pins
    /// to 1.
    fn month_position(&self, date: NaiveDate, end_edge: bool) -> f64 {
        let index = self.cache.index_of_date(date).unwrap_or(0);
        let Some(first) = self.cache.month_start(index) else {
            return 0.0;
        };
        let days = self.cache.days_in(index).max(1) as i64;
        let day = calendar::days_between(first, date) + if end_edge { 1 } else { 0 };
        let fraction = (day as f64 / days as f64).clamp(0.0, 1.0);
        index as f64 + fraction
    }
}

fn sanitize_width(width: f32) -> f32 {
    if width.is_finite() && width >= 1.0 {
        width
    } else {
        super::DEFAULT_MONTH_WIDTH
    }
}
