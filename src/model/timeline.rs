use chrono::NaiveDate;

use super::Board;

pub const DEFAULT_MONTH_WIDTH: f32 = 120.0;
const MIN_MONTH_WIDTH: f32 = 40.0;
const MAX_MONTH_WIDTH: f32 = 600.0;

/// The visible month grid.
#[derive(Debug, Clone)]
pub struct TimelineViewport {
    /// Month markers (day 1), ascending without gaps.
    pub months: Vec<NaiveDate>,
    /// Pixels per month column.
    pub month_width: f32,
    /// Months of slack added around the board's planned range.
    pub padding_months: u32,
}

impl TimelineViewport {
    pub fn new(months: Vec<NaiveDate>, month_width: f32) -> Self {
        Self {
            months,
            month_width: month_width.clamp(MIN_MONTH_WIDTH, MAX_MONTH_WIDTH),
            padding_months: 1,
        }
    }

    /// Rebuild the month markers around the board's current dates.
    pub fn fit_to(&mut self, board: &Board, today: NaiveDate) {
        self.months = board.month_markers(self.padding_months, today);
    }

    /// Left edge of the month column at `index`, relative to the board.
    pub fn month_x(&self, index: usize) -> f32 {
        index as f32 * self.month_width
    }

    /// Total width in pixels for the visible range.
    pub fn total_width(&self) -> f32 {
        self.months.len() as f32 * self.month_width
    }

    /// Zoom in (wider month columns).
    pub fn zoom_in(&mut self) {
        self.month_width = (self.month_width * 1.2).min(MAX_MONTH_WIDTH);
    }

    /// Zoom out (narrower month columns).
    pub fn zoom_out(&mut self) {
        self.month_width = (self.month_width / 1.2).max(MIN_MONTH_WIDTH);
    }

    pub fn reset_zoom(&mut self) {
        self.month_width = DEFAULT_MONTH_WIDTH;
    }
}
