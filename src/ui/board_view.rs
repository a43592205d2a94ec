use chrono::{Datelike, NaiveDate};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::ui::theme;
use planning_board::model::{Board, Feature, FeatureId, TimelineViewport};
use planning_board::timeline::calendar;
use planning_board::timeline::{BarGeometry, DragController, DragMode, PositionMapper, SessionEvent};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Timeline state that lives for the whole UI session.
pub struct BoardViewState {
    pub mapper: PositionMapper,
    pub drag: DragController,
    /// Latest live notification of the open gesture, drawn instead of the
    /// stored dates.
    pub live: Option<SessionEvent>,
}

impl BoardViewState {
    pub fn new(mapper: PositionMapper) -> Self {
        Self {
            mapper,
            drag: DragController::new(),
            live: None,
        }
    }
}

/// What happened on the board this frame.
#[derive(Debug, Default)]
pub struct BoardInteraction {
    pub clicked: Option<FeatureId>,
    pub clicked_background: bool,
    /// `Moved` and `Ended` notifications, in the order they were produced.
    pub events: Vec<SessionEvent>,
}

/// Render the planning board (right panel) and route pointer gestures into
/// the drag controller.
pub fn show_board(
    board: &mut Board,
    viewport: &mut TimelineViewport,
    state: &mut BoardViewState,
    selected: Option<&FeatureId>,
    today: NaiveDate,
    ui: &mut Ui,
) -> BoardInteraction {
    let mut interaction = BoardInteraction::default();
    let rows: Vec<Feature> = board.rows().into_iter().cloned().collect();
    let available = ui.available_size();

    // Ctrl+scroll zooms the month columns.
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            viewport.zoom_in();
        } else if scroll_delta.y < 0.0 {
            viewport.zoom_out();
        }
    }
    state.mapper.set_month_width(viewport.month_width);

    if state.drag.is_active() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.drag.cancel();
        state.live = None;
    }

    let chart_width = viewport.total_width().max(available.x);
    let chart_height = HEADER_HEIGHT + rows.len() as f32 * (ROW_HEIGHT + ROW_PADDING) + 40.0;
    let months = viewport.months.clone();

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            state.mapper.set_board_offset(origin.x);
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_month_header(&painter, origin, viewport, chart_width, response.rect.height());
            draw_today_line(&painter, origin, &months, &mut state.mapper, today, response.rect.height());

            for (i, feature) in rows.iter().enumerate() {
                let y = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING);
                let row_bg = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
                painter.rect_filled(
                    Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(chart_width, ROW_HEIGHT + ROW_PADDING)),
                    0.0,
                    row_bg,
                );

                let geometry = live_geometry(state.live.as_ref(), &feature.id)
                    .unwrap_or_else(|| state.mapper.compute_position(feature, &months));
                let is_selected = selected == Some(&feature.id);
                let bar_rect = draw_card(&painter, feature, geometry, y + ROW_PADDING, i, is_selected);

                let body = ui.interact(
                    bar_rect,
                    ui.make_persistent_id(("card", &feature.id)),
                    Sense::click_and_drag(),
                );
                let handle_rect = Rect::from_min_max(
                    Pos2::new(bar_rect.right() - HANDLE_WIDTH, bar_rect.top()),
                    Pos2::new(bar_rect.right() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
                );
                let handle = ui.interact(
                    handle_rect,
                    ui.make_persistent_id(("card-resize", &feature.id)),
                    Sense::drag(),
                );

                if body.clicked() {
                    interaction.clicked = Some(feature.id.clone());
                    consumed_click = true;
                }

                // Pointer-down: the end handle resizes, the body moves.
                let started = if handle.drag_started() {
                    Some((DragMode::Resize, &handle))
                } else if body.drag_started() {
                    Some((DragMode::Move, &body))
                } else {
                    None
                };
                if let Some((mode, response)) = started {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let anchor = state.mapper.fallback_span().0;
                        match state.drag.begin(feature, mode, pos.x - origin.x, anchor) {
                            Ok(()) => {
                                interaction.clicked = Some(feature.id.clone());
                                consumed_click = true;
                            }
                            Err(e) => tracing::warn!("{}", e),
                        }
                    }
                }

                if body.hovered() || handle.hovered() {
                    show_card_tooltip(ui, feature, state.live.as_ref());
                }

                let ours = state.drag.active_feature() == Some(&feature.id);
                if !ours {
                    if handle.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                    }
                    continue;
                }

                let active = if handle.dragged() || handle.drag_stopped() { &handle } else { &body };
                ui.ctx().set_cursor_icon(match state.drag.mode() {
                    Some(DragMode::Resize) => egui::CursorIcon::ResizeHorizontal,
                    _ => egui::CursorIcon::Grabbing,
                });

                if active.dragged() {
                    if let Some(pos) = active.interact_pointer_pos() {
                        if let Some(event) = state.drag.pointer_move(pos.x - origin.x, &mut state.mapper, &months, &board.features) {
                            state.live = Some(event.clone());
                            interaction.events.push(event);
                        }
                    }
                }

                if active.drag_stopped() {
                    let pointer_x = active
                        .interact_pointer_pos()
                        .or_else(|| ui.input(|i| i.pointer.latest_pos()))
                        .map(|p| p.x - origin.x);
                    let features = board.features.clone();
                    let ended = match pointer_x {
                        Some(x) => state.drag.pointer_up(x, &mut state.mapper, &months, &features, &mut *board),
                        None => {
                            // Nothing to commit against.
                            state.drag.cancel();
                            None
                        }
                    };
                    state.live = None;
                    if let Some(event) = ended {
                        interaction.events.push(event);
                    }
                }
            }

            if response.clicked() && !consumed_click {
                interaction.clicked_background = true;
            }
        });

    interaction
}

fn live_geometry(live: Option<&SessionEvent>, id: &FeatureId) -> Option<BarGeometry> {
    match live {
        Some(SessionEvent::Moved { id: live_id, geometry, .. }) if live_id == id => Some(*geometry),
        _ => None,
    }
}

fn draw_month_header(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &TimelineViewport,
    width: f32,
    height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for (i, month) in viewport.months.iter().enumerate() {
        let x = origin.x + viewport.month_x(i);

        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        let label = if month.month() == 1 || i == 0 {
            month.format("%b %Y").to_string()
        } else {
            month.format("%b").to_string()
        };
        painter.text(
            Pos2::new(x + 5.0, origin.y + 14.0),
            egui::Align2::LEFT_CENTER,
            label,
            theme::TextRole::MonthLabel.font(),
            theme::TEXT_PRIMARY,
        );

        // Mid-month tick once columns are wide enough to read it.
        if viewport.month_width >= 90.0 {
            let days = calendar::days_in_month_of(*month) as f32;
            let mid_x = x + viewport.month_width * 14.0 / days;
            painter.text(
                Pos2::new(mid_x + 3.0, origin.y + 32.0),
                egui::Align2::LEFT_CENTER,
                "15",
                theme::TextRole::DayTick.font(),
                theme::TEXT_DIM,
            );
        }
    }
}

fn draw_today_line(
    painter: &egui::Painter,
    origin: Pos2,
    months: &[NaiveDate],
    mapper: &mut PositionMapper,
    today: NaiveDate,
    height: f32,
) {
    let (Some(first), Some(last)) = (months.first(), months.last()) else {
        return;
    };
    if today < *first || today >= calendar::add_months(*last, 1) {
        return;
    }
    let x = mapper.span_geometry(today, today, months).left;

    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::TextRole::Badge.font(),
        Color32::WHITE,
    );
}

fn draw_card(
    painter: &egui::Painter,
    feature: &Feature,
    geometry: BarGeometry,
    y: f32,
    row: usize,
    is_selected: bool,
) -> Rect {
    let inset = theme::BAR_INSET;
    let bar_rect = Rect::from_min_size(
        Pos2::new(geometry.left, y + inset),
        Vec2::new(geometry.width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    let fill = theme::card_fill(feature, row);

    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, fill);
    if !feature.schedule.is_planned() {
        painter.rect_stroke(bar_rect, rounding, Stroke::new(1.0, theme::TEXT_DIM));
    }

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::ACCENT),
        );
        // End handle
        let handle_h = bar_rect.height() * 0.55;
        let handle = Rect::from_min_size(
            Pos2::new(bar_rect.right() - 5.0, bar_rect.center().y - handle_h / 2.0),
            Vec2::new(4.0, handle_h),
        );
        painter.rect_filled(handle, Rounding::same(2.0), theme::TEXT_ON_BAR);
    }

    if geometry.width > 30.0 {
        let title = if feature.is_epic() {
            format!("▣ {}", feature.title)
        } else {
            feature.title.clone()
        };
        let galley = painter.layout_no_wrap(title, theme::TextRole::CardTitle.font(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }

    bar_rect
}

fn show_card_tooltip(ui: &Ui, feature: &Feature, live: Option<&SessionEvent>) {
    let span = match live {
        Some(SessionEvent::Moved { id, start, end, .. }) if id == &feature.id => Some((*start, *end)),
        _ => feature.schedule.start().zip(feature.schedule.end()),
    };
    egui::show_tooltip_at_pointer(
        ui.ctx(),
        ui.layer_id(),
        egui::Id::new(("card-tip", &feature.id)),
        |ui| {
            ui.strong(&feature.title);
            match span {
                Some((start, end)) => {
                    ui.label(format!("{} → {}", calendar::format_date(start), calendar::format_date(end)));
                }
                None => {
                    ui.label("Unplanned: drag to schedule");
                }
            }
        },
    );
}
