//! Colours, metrics and text sizes for the planning board, plus the egui
//! style applied once at startup.

use egui::style::WidgetVisuals;
use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use planning_board::model::Feature;

// Surfaces, darkest first.
pub const BG_STATUS: Color32 = Color32::from_rgb(17, 19, 24);
pub const BG_DARK: Color32 = Color32::from_rgb(21, 23, 30);
pub const BG_PANEL: Color32 = Color32::from_rgb(27, 30, 38);
pub const BG_HEADER: Color32 = Color32::from_rgb(33, 37, 47);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(38, 120, 130, 50);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(47, 52, 63);
pub const GRID_LINE: Color32 = Color32::from_rgb(40, 44, 54);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 230, 236);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 158, 172);
pub const TEXT_DIM: Color32 = Color32::from_rgb(98, 105, 118);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

/// Selection outline, hovered widgets and the resize grip.
pub const ACCENT: Color32 = Color32::from_rgb(56, 178, 172);
pub const TODAY_LINE: Color32 = Color32::from_rgb(232, 93, 76);

pub const EPIC_COLOR: Color32 = Color32::from_rgb(137, 96, 204);
pub const UNPLANNED_FILL: Color32 = Color32::from_rgba_premultiplied(58, 62, 74, 150);

/// Feature cards cycle through these by row.
const LANE_COLORS: [Color32; 6] = [
    Color32::from_rgb(59, 130, 246),
    Color32::from_rgb(34, 160, 110),
    Color32::from_rgb(217, 131, 36),
    Color32::from_rgb(14, 150, 190),
    Color32::from_rgb(200, 72, 110),
    Color32::from_rgb(160, 150, 40),
];

pub const ROW_HEIGHT: f32 = 30.0;
pub const ROW_GAP: f32 = 2.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const HANDLE_WIDTH: f32 = 8.0;
pub const BAR_ROUNDING: f32 = 4.0;
/// Vertical gap between a card and its row edges.
pub const BAR_INSET: f32 = 3.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const SIDE_PANEL_WIDTH: f32 = 280.0;

const WIDGET_ROUNDING: f32 = 3.0;

/// Where a piece of text sits on screen; each place has one size.
#[derive(Debug, Clone, Copy)]
pub enum TextRole {
    Menu,
    MonthLabel,
    DayTick,
    CardTitle,
    Badge,
}

impl TextRole {
    pub fn font(self) -> FontId {
        let size = match self {
            TextRole::Menu => 13.0,
            TextRole::MonthLabel => 12.0,
            TextRole::CardTitle => 11.5,
            TextRole::DayTick => 10.5,
            TextRole::Badge => 9.5,
        };
        FontId::proportional(size)
    }
}

/// Marker colour for a feature in both the list and the board.
pub fn feature_color(feature: &Feature, row: usize) -> Color32 {
    if feature.is_epic() {
        EPIC_COLOR
    } else {
        LANE_COLORS[row % LANE_COLORS.len()]
    }
}

/// Card fill. Unplanned items are greyed out whatever their kind.
pub fn card_fill(feature: &Feature, row: usize) -> Color32 {
    if feature.schedule.is_planned() {
        feature_color(feature, row)
    } else {
        UNPLANNED_FILL
    }
}

fn widget_visuals(base: WidgetVisuals, bg: Color32, border: Color32, fg: Stroke) -> WidgetVisuals {
    WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: Stroke::new(1.0, border),
        fg_stroke: fg,
        rounding: Rounding::same(WIDGET_ROUNDING),
        ..base
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_STATUS;
    visuals.striped = false;

    let w = &mut visuals.widgets;
    w.noninteractive = widget_visuals(w.noninteractive, BG_PANEL, BORDER_SUBTLE, Stroke::new(1.0, TEXT_SECONDARY));
    w.inactive = widget_visuals(w.inactive, BG_HEADER, BORDER_SUBTLE, Stroke::new(1.0, TEXT_PRIMARY));
    w.hovered = widget_visuals(w.hovered, Color32::from_rgb(42, 48, 60), ACCENT, Stroke::new(1.0, TEXT_PRIMARY));
    w.active = widget_visuals(w.active, Color32::from_rgb(50, 57, 71), ACCENT, Stroke::new(2.0, TEXT_ON_BAR));
    w.open = w.active;

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    ctx.set_visuals(visuals);
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use planning_board::model::Schedule;

    fn planned() -> Schedule {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        Schedule::planned(day, day)
    }

    #[test]
    fn cards_are_coloured_by_kind_and_plan_state() {
        let epic = Feature::epic("E", planned());
        let leaf = Feature::feature("F", Some("E".into()), planned());
        let loose = Feature::feature("U", None, Schedule::Unplanned);

        assert_eq!(card_fill(&epic, 3), EPIC_COLOR);
        assert_eq!(card_fill(&leaf, 1), LANE_COLORS[1]);
        assert_eq!(card_fill(&leaf, 1 + LANE_COLORS.len()), LANE_COLORS[1]);
        assert_eq!(card_fill(&loose, 0), UNPLANNED_FILL);
        // The list dot keeps the kind colour even before an item is planned.
        assert_eq!(feature_color(&loose, 0), LANE_COLORS[0]);
    }
}
