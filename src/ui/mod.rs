pub mod board_view;
pub mod dialogs;
pub mod feature_list;
pub mod theme;
pub mod toolbar;
