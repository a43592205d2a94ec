use crate::app::PlanningBoardApp;
use crate::ui::dialogs::PathAction;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut PlanningBoardApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::TextRole::Menu.font()), |ui| {
            if ui.button(format!("{}  New Board", icons::FILE)).clicked() {
                app.new_board();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open...", icons::FOLDER_OPEN)).clicked() {
                app.ask_path(PathAction::Open);
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save          Ctrl+S", icons::FLOPPY_DISK)).clicked() {
                app.save_board();
                ui.close_menu();
            }
            if ui.button("      Save As...").clicked() {
                app.ask_path(PathAction::SaveAs);
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icons::DOWNLOAD_SIMPLE)).clicked() {
                app.ask_path(PathAction::ImportCsv);
                ui.close_menu();
            }
            if ui.button(format!("{}  Export CSV...", icons::UPLOAD_SIMPLE)).clicked() {
                app.ask_path(PathAction::ExportCsv);
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::TextRole::Menu.font()), |ui| {
            if ui
                .button(format!("{}  Zoom In        Ctrl+Scroll ↑", icons::MAGNIFYING_GLASS_PLUS))
                .clicked()
            {
                app.viewport.zoom_in();
                ui.close_menu();
            }
            if ui
                .button(format!("{}  Zoom Out      Ctrl+Scroll ↓", icons::MAGNIFYING_GLASS_MINUS))
                .clicked()
            {
                app.viewport.zoom_out();
                ui.close_menu();
            }
            if ui.button("      Reset Zoom").clicked() {
                app.viewport.reset_zoom();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("      Save Zoom as Default").clicked() {
                app.save_zoom();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open Config Folder", icons::GEAR)).clicked() {
                app.open_config_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::TextRole::Menu.font()), |ui| {
            if ui.button("CSV Import Format").clicked() {
                app.show_csv_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned board name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let unsaved = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.board.name, unsaved))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
