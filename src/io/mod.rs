pub mod csv_export;
pub mod csv_import;
pub mod file;

pub use file::{load_board, save_board};
