use std::path::PathBuf;

use crate::app::PlanningBoardApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// File operations that need a path from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAction {
    Open,
    SaveAs,
    ImportCsv,
    ExportCsv,
}

impl PathAction {
    fn title(self) -> &'static str {
        match self {
            PathAction::Open => "Open Board",
            PathAction::SaveAs => "Save Board As",
            PathAction::ImportCsv => "Import CSV",
            PathAction::ExportCsv => "Export CSV",
        }
    }

    fn confirm_label(self) -> &'static str {
        match self {
            PathAction::Open => "Open",
            PathAction::SaveAs => "Save",
            PathAction::ImportCsv => "Import",
            PathAction::ExportCsv => "Export",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            PathAction::Open | PathAction::SaveAs => "path/to/roadmap.board.json",
            PathAction::ImportCsv | PathAction::ExportCsv => "path/to/features.csv",
        }
    }
}

/// State of the open path prompt.
#[derive(Debug, Clone)]
pub struct PathDialog {
    pub action: PathAction,
    pub text: String,
}

impl PathDialog {
    pub fn new(action: PathAction, suggestion: PathBuf) -> Self {
        Self {
            action,
            text: suggestion.display().to_string(),
        }
    }
}

/// Render the path prompt used by Open / Save As / Import / Export.
pub fn show_path_dialog(app: &mut PlanningBoardApp, ctx: &Context) {
    let Some(dialog) = app.path_dialog.as_mut() else {
        return;
    };
    let action = dialog.action;
    let mut confirmed = false;
    let mut should_close = false;

    Window::new(RichText::new(action.title()).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([420.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(RichText::new("Path").color(theme::TEXT_SECONDARY));
            let edit = ui.add_sized(
                [400.0, 24.0],
                egui::TextEdit::singleline(&mut dialog.text)
                    .hint_text(action.hint())
                    .text_color(theme::TEXT_PRIMARY),
            );
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                confirmed = true;
            }
            if matches!(action, PathAction::ImportCsv) {
                ui.label(
                    RichText::new("Importing replaces the current board.")
                        .size(10.5)
                        .color(theme::TEXT_DIM),
                );
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let confirm_btn = egui::Button::new(RichText::new(action.confirm_label()).color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], confirm_btn).clicked() {
                    confirmed = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    let path = dialog.text.trim().to_string();
    if confirmed && !path.is_empty() {
        app.path_dialog = None;
        app.run_path_action(action, PathBuf::from(path));
        return;
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.path_dialog = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut PlanningBoardApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Planning Board").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Drag cards to move them, drag the right");
                ui.label("edge to change the end date.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

/// Render the "CSV Import Format" help dialog.
pub fn show_csv_help_dialog(app: &mut PlanningBoardApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([560.0, 460.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);

                ui.label(RichText::new("Delimiters").strong());
                ui.label("The delimiter is auto-detected: comma (,), semicolon (;), or tab.");
                ui.add_space(8.0);

                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(3)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Column").underline());
                        ui.label(RichText::new("Accepted headers (case-insensitive)").underline());
                        ui.label(RichText::new("Notes").underline());
                        ui.end_row();

                        let rows = [
                            ("Title", "Title, Name, Feature, Label, Summary", "Required"),
                            ("Start", "Start, Start Date, From, Begin", "Empty = unplanned"),
                            ("End", "End, End Date, To, Finish, Due, Target", "Empty = unplanned"),
                            ("Type", "Type, Kind, Item Type", "epic / feature"),
                            ("Parent", "Parent, Parent Epic, Epic, Epic ID", "Epic id or title"),
                            ("ID", "ID, Key, Feature ID", "Generated when missing"),
                            ("Rank", "Rank, Original Rank, Order, Priority", "Row order when missing"),
                        ];
                        for (column, headers, notes) in rows {
                            ui.label(RichText::new(column).strong());
                            ui.label(headers);
                            ui.label(notes);
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                ui.label(RichText::new("Supported Date Formats").strong());
                ui.add_space(2.0);
                for fmt in &[
                    "YYYY-MM-DD   (e.g. 2025-06-15)",
                    "DD/MM/YYYY   (e.g. 15/06/2025)",
                    "MM/DD/YYYY   (e.g. 06/15/2025)",
                    "DD-MM-YYYY   (e.g. 15-06-2025)",
                    "DD.MM.YYYY   (e.g. 15.06.2025)",
                    "YYYY/MM/DD   (e.g. 2025/06/15)",
                ] {
                    ui.label(RichText::new(*fmt).monospace().size(11.0));
                }
                ui.add_space(8.0);

                ui.label(RichText::new("Example (semicolon-delimited)").strong());
                ui.add_space(2.0);
                let example = "ID;Title;Type;Start Date;End Date;Parent Epic;Rank\n\
                               E1;Checkout revamp;Epic;2025-01-01;2025-03-31;;1\n\
                               F1;Wallet payments;Feature;15/01/2025;28/02/2025;Checkout revamp;2\n\
                               F2;Receipts;Feature;;;E1;3";
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
                ui.add_space(8.0);
            });

            ui.separator();
            ui.add_space(4.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_csv_help = false;
    }
}
