use egui::{Color32, RichText, Ui};

use crate::ui::theme;
use planning_board::model::{Feature, FeatureId, Schedule};

/// Render the left-side feature list. Rows are listed in board order so they
/// line up with the cards on the right. Returns the id of a clicked row.
pub fn show_feature_list(rows: &[&Feature], selected: Option<&FeatureId>, ui: &mut Ui) -> Option<FeatureId> {
    let mut clicked = None;
    let unplanned = rows.iter().filter(|f| !f.schedule.is_planned()).count();

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Features").strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(RichText::new(format!("({})", rows.len())).size(11.0).color(theme::TEXT_DIM));
        if unplanned > 0 {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{unplanned} unplanned"))
                        .size(10.0)
                        .color(theme::TEXT_SECONDARY),
                );
            });
        }
    });
    ui.add_space(4.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, feature) in rows.iter().enumerate() {
                let is_selected = selected == Some(&feature.id);
                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let frame = egui::Frame {
                    fill: row_bg,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 4.0),
                    outer_margin: egui::Margin::ZERO,
                    stroke: egui::Stroke::NONE,
                    shadow: egui::epaint::Shadow::NONE,
                };

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;

                        // Children are indented under their epic.
                        if feature.parent_epic().is_some() {
                            ui.add_space(10.0);
                        }

                        let dot = theme::feature_color(feature, i);
                        let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot_rect.center(), 3.0, dot);

                        let title = RichText::new(&feature.title).size(12.0).color(if is_selected {
                            Color32::WHITE
                        } else {
                            theme::TEXT_PRIMARY
                        });
                        let title = if feature.is_epic() { title.strong() } else { title };
                        ui.add(egui::Label::new(title).truncate());

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.spacing_mut().item_spacing.x = 4.0;
                            match feature.schedule {
                                Schedule::Planned { start, end } => {
                                    ui.label(
                                        RichText::new(end.format("%m/%d").to_string())
                                            .size(10.0)
                                            .color(theme::TEXT_SECONDARY),
                                    );
                                    ui.label(
                                        RichText::new(egui_phosphor::regular::ARROW_RIGHT)
                                            .size(9.0)
                                            .color(theme::TEXT_DIM),
                                    );
                                    ui.label(
                                        RichText::new(start.format("%m/%d").to_string())
                                            .size(10.0)
                                            .color(theme::TEXT_SECONDARY),
                                    );
                                }
                                Schedule::Unplanned => {
                                    ui.label(RichText::new("Unplanned").size(10.0).italics().color(theme::TEXT_DIM));
                                }
                            }
                        });
                    });
                });

                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("feature-row", &feature.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    clicked = Some(feature.id.clone());
                }

                ui.add_space(1.0);
            }
        });

    clicked
}
