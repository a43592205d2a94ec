//! Planning board core: month-grid timeline arithmetic, pixel/date mapping,
//! and the drag/resize scheduling engine for epics and features.

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod timeline;

pub use error::{BoardError, Result};
