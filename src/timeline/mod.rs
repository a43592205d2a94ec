//! Month-grid timeline engine: calendar arithmetic, the month index cache,
//! date/pixel mapping, update computation and drag sessions.

pub mod calendar;
pub mod month_cache;
pub mod position;
pub mod session;
pub mod updates;

pub use crate::model::timeline::DEFAULT_MONTH_WIDTH;
pub use month_cache::{BoardZone, MonthIndexCache};
pub use position::{BarGeometry, PositionMapper};
pub use session::{DragController, DragMode, SessionEvent, SessionState};
pub use updates::{apply_updates, compute_move_updates, compute_resize_updates, UpdateSink};
