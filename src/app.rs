use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::ui;
use crate::ui::board_view::{BoardInteraction, BoardViewState};
use crate::ui::dialogs::{PathAction, PathDialog};
use planning_board::config::BoardConfig;
use planning_board::io;
use planning_board::model::{Board, Feature, FeatureId, Schedule, TimelineViewport};
use planning_board::timeline::{calendar, BoardZone, PositionMapper, SessionEvent};

/// Main application state.
pub struct PlanningBoardApp {
    pub board: Board,
    pub viewport: TimelineViewport,
    pub view: BoardViewState,
    pub config: BoardConfig,
    pub file_path: Option<PathBuf>,
    pub selected: Option<FeatureId>,

    // Dialog state
    pub show_about: bool,
    pub show_csv_help: bool,
    pub path_dialog: Option<PathDialog>,

    pub status_message: String,
}

impl PlanningBoardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: BoardConfig, path: Option<PathBuf>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let today = Self::today();
        let mut status_message = "Ready".to_string();
        let zone = config.zone().unwrap_or_else(|e| {
            tracing::warn!("{}; using the local time zone", e);
            status_message = e.to_string();
            BoardZone::Local
        });
        let anchor = config.unplanned_anchor_or(today);
        let mapper = PositionMapper::new(zone, config.month_width, anchor).with_min_bar_width(config.min_bar_width);

        let mut viewport = TimelineViewport::new(Vec::new(), config.month_width);
        viewport.padding_months = config.padding_months;

        let mut app = Self {
            board: Self::sample_board(today),
            viewport,
            view: BoardViewState::new(mapper),
            config,
            file_path: None,
            selected: None,
            show_about: false,
            show_csv_help: false,
            path_dialog: None,
            status_message,
        };
        if let Some(path) = path {
            app.open_path(&path);
        }
        app.refit();
        app
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Generate a sample board for demonstration.
    fn sample_board(today: NaiveDate) -> Board {
        let first = calendar::first_of_month(today);
        let span = |from: i64, to: i64| Schedule::planned(calendar::add_days(first, from), calendar::add_days(first, to));
        let mut board = Board::new("Sample Board");

        board.features = vec![
            Feature::epic("checkout", span(0, 74)).with_title("Checkout revamp").with_rank(1.0),
            Feature::feature("wallets", Some("checkout".into()), span(3, 30))
                .with_title("Wallet payments")
                .with_rank(2.0),
            Feature::feature("receipts", Some("checkout".into()), span(28, 60))
                .with_title("Email receipts")
                .with_rank(3.0),
            Feature::feature("fraud", Some("checkout".into()), Schedule::Unplanned)
                .with_title("Fraud scoring")
                .with_rank(4.0),
            Feature::epic("search", span(45, 120)).with_title("Search").with_rank(5.0),
            Feature::feature("facets", Some("search".into()), span(50, 90))
                .with_title("Faceted filters")
                .with_rank(6.0),
            Feature::feature("typeahead", Some("search".into()), span(85, 118))
                .with_title("Typeahead")
                .with_rank(7.0),
            Feature::epic("mobile", Schedule::Unplanned).with_title("Mobile app").with_rank(8.0),
            Feature::feature("push", Some("mobile".into()), Schedule::Unplanned)
                .with_title("Push notifications")
                .with_rank(9.0),
            Feature::feature("docs", None, span(10, 24)).with_title("API docs refresh").with_rank(10.0),
        ];
        board
    }

    /// Rebuild month markers around the board. Skipped while a gesture is
    /// open so the grid stays still under the pointer.
    fn refit(&mut self) {
        if self.view.drag.is_active() {
            return;
        }
        self.viewport.fit_to(&self.board, Self::today());
    }

    fn replace_board(&mut self, board: Board, path: Option<PathBuf>) {
        self.view.drag.cancel();
        self.view.live = None;
        self.board = board;
        self.file_path = path;
        self.selected = None;
        self.refit();
    }

    // --- File operations ---

    pub fn new_board(&mut self) {
        self.replace_board(Board::default(), None);
        self.status_message = "New board created".to_string();
    }

    /// Open a board file, or import it when it is a CSV file.
    pub fn open_path(&mut self, path: &Path) {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("txt"));
        if is_csv {
            self.import_csv(path);
            return;
        }
        match io::load_board(path) {
            Ok(board) => {
                self.replace_board(board, Some(path.to_path_buf()));
                self.status_message = "Board loaded".to_string();
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "failed to load board: {}", e);
                self.status_message = format!("Error loading: {}", e);
            }
        }
    }

    pub fn save_board(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.save_board_to(&path),
            None => self.ask_path(PathAction::SaveAs),
        }
    }

    pub fn save_board_to(&mut self, path: &Path) {
        self.board.touch();
        match io::save_board(&self.board, path) {
            Ok(()) => {
                self.file_path = Some(path.to_path_buf());
                self.status_message = "Board saved".to_string();
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "failed to save board: {}", e);
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    pub fn import_csv(&mut self, path: &Path) {
        match io::csv_import::import_csv(path) {
            Ok((features, skipped)) => {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Imported Board")
                    .to_string();
                let count = features.len();
                let mut board = Board::new(name);
                board.features = features;
                self.replace_board(board, None);

                tracing::info!(path = %path.display(), count, skipped, "imported CSV");
                self.status_message = if skipped > 0 {
                    format!("Imported {} features ({} rows skipped)", count, skipped)
                } else {
                    format!("Imported {} features", count)
                };
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "CSV import failed: {}", e);
                self.status_message = format!("CSV import failed: {}", e);
            }
        }
    }

    pub fn export_csv(&mut self, path: &Path) {
        if self.board.features.is_empty() {
            self.status_message = "Nothing to export: the board has no features".to_string();
            return;
        }
        match io::csv_export::export_csv(&self.board.features, path) {
            Ok(count) => self.status_message = format!("Exported {} features to CSV", count),
            Err(e) => {
                tracing::error!(path = %path.display(), "CSV export failed: {}", e);
                self.status_message = format!("CSV export failed: {}", e);
            }
        }
    }

    pub fn ask_path(&mut self, action: PathAction) {
        let suggestion = match action {
            PathAction::SaveAs => self
                .file_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{}.board.json", self.board.name))),
            PathAction::ExportCsv => PathBuf::from(format!("{}.csv", self.board.name)),
            PathAction::Open | PathAction::ImportCsv => PathBuf::new(),
        };
        self.path_dialog = Some(PathDialog::new(action, suggestion));
    }

    pub fn run_path_action(&mut self, action: PathAction, path: PathBuf) {
        match action {
            PathAction::Open => self.open_path(&path),
            PathAction::SaveAs => self.save_board_to(&path),
            PathAction::ImportCsv => self.import_csv(&path),
            PathAction::ExportCsv => self.export_csv(&path),
        }
    }

    pub fn open_config_folder(&mut self) {
        let result = BoardConfig::config_dir().and_then(|dir| {
            std::fs::create_dir_all(&dir)?;
            open::that(&dir)?;
            Ok(dir)
        });
        match result {
            Ok(dir) => self.status_message = format!("Config folder: {}", dir.display()),
            Err(e) => self.status_message = format!("Cannot open config folder: {}", e),
        }
    }

    /// Persist the current zoom as the default month width.
    pub fn save_zoom(&mut self) {
        self.config.month_width = self.viewport.month_width;
        match self.config.save() {
            Ok(()) => self.status_message = "Settings saved".to_string(),
            Err(e) => self.status_message = format!("Error saving settings: {}", e),
        }
    }

    fn handle_board_interaction(&mut self, interaction: BoardInteraction) {
        if let Some(id) = interaction.clicked {
            self.selected = Some(id);
        } else if interaction.clicked_background {
            self.selected = None;
        }

        for event in interaction.events {
            if let SessionEvent::Ended { id, start, end } = event {
                let title = self.board.get(&id).map(|f| f.title.clone()).unwrap_or_default();
                self.status_message = format!(
                    "Updated '{}' ({} → {})",
                    title,
                    calendar::format_date(start),
                    calendar::format_date(end)
                );
                self.refit();
            }
        }
    }

    fn live_status(&self) -> Option<String> {
        match &self.view.live {
            Some(SessionEvent::Moved { id, start, end, .. }) => Some(format!(
                "{}: {} → {}",
                self.board.get(id).map(|f| f.title.as_str()).unwrap_or(id.as_str()),
                calendar::format_date(*start),
                calendar::format_date(*end)
            )),
            _ => None,
        }
    }
}

impl eframe::App for PlanningBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        if should_save {
            self.save_board();
        }
        if self.viewport.months.is_empty() {
            self.refit();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        let live_status = self.live_status();
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(live_status.as_deref().unwrap_or(&self.status_message))
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Features: {}", self.board.features.len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!(
                                "Zoom: {:.0}%",
                                self.viewport.month_width / planning_board::timeline::DEFAULT_MONTH_WIDTH * 100.0
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: feature list
        let mut clicked_row = None;
        egui::SidePanel::left("feature_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(180.0)
            .max_width(ui::theme::SIDE_PANEL_WIDTH * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                let rows = self.board.rows();
                clicked_row = ui::feature_list::show_feature_list(&rows, self.selected.as_ref(), ui);
            });
        if let Some(id) = clicked_row {
            self.selected = Some(id);
        }

        // Central panel: planning board
        let today = Self::today();
        let anchor = self.config.unplanned_anchor_or(today);
        self.view.mapper.set_fallback_span(anchor, anchor);
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let interaction = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| {
                ui::board_view::show_board(
                    &mut self.board,
                    &mut self.viewport,
                    &mut self.view,
                    self.selected.as_ref(),
                    today,
                    ui,
                )
            })
            .inner;
        self.handle_board_interaction(interaction);

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
        if self.path_dialog.is_some() {
            ui::dialogs::show_path_dialog(self, ctx);
        }
    }
}
