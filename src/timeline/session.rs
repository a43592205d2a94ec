//! Interactive move/resize gestures.
//!
//! A [`DragController`] holds at most one open session. The host forwards
//! pointer-down, pointer-move and pointer-up; the controller answers with
//! [`SessionEvent`] values the host can broadcast however it likes, and on
//! commit hands the update batch to an [`UpdateSink`].
//!
//! Pointer positions are board-relative: pixels from the left edge of the
//! first month column. Scrolling the board mid-gesture therefore does not
//! move the card. Geometry in `Moved` is in the mapper's screen space.

use chrono::NaiveDate;

use super::calendar;
use super::position::{BarGeometry, PositionMapper};
use super::updates::{self, UpdateSink};
use crate::error::{BoardError, Result};
use crate::model::{Feature, FeatureId, Schedule};

/// Which gesture a pointer-down started: dragging the card body moves it,
/// dragging its end handle resizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize,
}

/// Notifications produced while a gesture is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Live feedback; nothing has been committed.
    Moved {
        id: FeatureId,
        start: NaiveDate,
        end: NaiveDate,
        geometry: BarGeometry,
    },
    /// The gesture was committed with these dates.
    Ended {
        id: FeatureId,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// State captured at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    feature: FeatureId,
    origin_x: f32,
    original: Schedule,
    /// Span the gesture is measured from; the unplanned anchor for items
    /// without dates.
    anchor: (NaiveDate, NaiveDate),
    tentative: (NaiveDate, NaiveDate),
}

impl DragSession {
    pub fn feature(&self) -> &FeatureId {
        &self.feature
    }

    /// The span the card would get if the pointer were released now.
    pub fn tentative(&self) -> (NaiveDate, NaiveDate) {
        self.tentative
    }

    /// Calendar days between the original start and end.
    pub fn duration_days(&self) -> i64 {
        calendar::days_between(self.anchor.0, self.anchor.1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(DragSession),
}

/// Drives move/resize gestures: `Idle → Dragging → Idle` or
/// `Idle → Resizing → Idle`.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: SessionState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, SessionState::Idle)
    }

    pub fn mode(&self) -> Option<DragMode> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Dragging(_) => Some(DragMode::Move),
            SessionState::Resizing(_) => Some(DragMode::Resize),
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Dragging(session) | SessionState::Resizing(session) => Some(session),
        }
    }

    pub fn active_feature(&self) -> Option<&FeatureId> {
        self.session().map(DragSession::feature)
    }

    /// Open a session on pointer-down.
    ///
    /// Items without dates are measured from `unplanned_anchor`, which should
    /// be where the host draws them (see [`PositionMapper::fallback_span`]).
    /// Fails if a session is already open; the open session is left
    /// untouched.
    pub fn begin(
        &mut self,
        feature: &Feature,
        mode: DragMode,
        pointer_x: f32,
        unplanned_anchor: NaiveDate,
    ) -> Result<()> {
        if let Some(active) = self.active_feature() {
            return Err(BoardError::SessionActive(active.clone()));
        }
        let anchor = match feature.schedule {
            Schedule::Planned { start, end } => (start, end),
            Schedule::Unplanned => (unplanned_anchor, unplanned_anchor),
        };
        let session = DragSession {
            feature: feature.id.clone(),
            origin_x: pointer_x,
            original: feature.schedule,
            anchor,
            tentative: anchor,
        };
        tracing::debug!(feature = %feature.id, ?mode, x = pointer_x, "drag session started");
        self.state = match mode {
            DragMode::Move => SessionState::Dragging(session),
            DragMode::Resize => SessionState::Resizing(session),
        };
        Ok(())
    }

    /// Track the pointer. Returns a `Moved` notification carrying the
    /// tentative span and its geometry, or `None` when idle.
    pub fn pointer_move(
        &mut self,
        pointer_x: f32,
        mapper: &mut PositionMapper,
        months: &[NaiveDate],
        features: &[Feature],
    ) -> Option<SessionEvent> {
        let mode = self.mode()?;
        let session = match &mut self.state {
            SessionState::Dragging(session) | SessionState::Resizing(session) => session,
            SessionState::Idle => return None,
        };
        let feature = features.iter().find(|f| f.id == session.feature);
        let (start, end) = tentative_span(session, mode, feature, pointer_x, mapper, months, features);
        session.tentative = (start, end);
        tracing::trace!(feature = %session.feature, %start, %end, "drag moved");

        Some(SessionEvent::Moved {
            id: session.feature.clone(),
            start,
            end,
            geometry: mapper.span_geometry(start, end, months),
        })
    }

    /// Finish the gesture on pointer-up.
    ///
    /// An unchanged span is discarded and returns `None`. Otherwise the
    /// update batch is handed to `sink` in one call and an `Ended`
    /// notification is returned. The controller is idle afterwards either
    /// way.
    pub fn pointer_up<S: UpdateSink + ?Sized>(
        &mut self,
        pointer_x: f32,
        mapper: &mut PositionMapper,
        months: &[NaiveDate],
        features: &[Feature],
        sink: &mut S,
    ) -> Option<SessionEvent> {
        let mode = self.mode()?;
        let session = match std::mem::take(&mut self.state) {
            SessionState::Dragging(session) | SessionState::Resizing(session) => session,
            SessionState::Idle => return None,
        };
        let Some(feature) = features.iter().find(|f| f.id == session.feature) else {
            tracing::warn!(feature = %session.feature, "dragged feature disappeared; gesture dropped");
            return None;
        };
        let (start, end) = tentative_span(&session, mode, Some(feature), pointer_x, mapper, months, features);

        let batch = match session.original {
            Schedule::Planned { start: old_start, end: old_end } => {
                if (start, end) == (old_start, old_end) {
                    tracing::debug!(feature = %feature.id, "drag ended without a change");
                    return None;
                }
                match mode {
                    DragMode::Move => updates::compute_move_updates(feature, start, end, features),
                    DragMode::Resize => updates::compute_resize_updates(feature, end, features),
                }
            }
            Schedule::Unplanned => updates::plant_updates(feature, start, end, features),
        };
        let own = batch.first().cloned()?;

        tracing::debug!(
            feature = %feature.id,
            start = %own.start,
            end = %own.end,
            records = batch.len(),
            "drag committed"
        );
        updates::apply_updates(batch, sink);
        Some(SessionEvent::Ended {
            id: own.id,
            start: own.start,
            end: own.end,
        })
    }

    /// Abandon the open session without committing anything.
    pub fn cancel(&mut self) -> Option<FeatureId> {
        let session = match std::mem::take(&mut self.state) {
            SessionState::Dragging(session) | SessionState::Resizing(session) => session,
            SessionState::Idle => return None,
        };
        tracing::debug!(feature = %session.feature, "drag cancelled");
        Some(session.feature)
    }
}

/// Span under the pointer, measured in calendar days from pointer-down so a
/// gesture that returns to its origin is an exact no-op.
fn tentative_span(
    session: &DragSession,
    mode: DragMode,
    feature: Option<&Feature>,
    pointer_x: f32,
    mapper: &mut PositionMapper,
    months: &[NaiveDate],
    features: &[Feature],
) -> (NaiveDate, NaiveDate) {
    let offset = mapper.board_offset();
    let delta = mapper.day_delta(offset + session.origin_x, offset + pointer_x, months);
    let (start, end) = session.anchor;
    match mode {
        DragMode::Move => (calendar::add_days(start, delta), calendar::add_days(end, delta)),
        DragMode::Resize => {
            let proposed = calendar::add_days(end, delta);
            let end = match feature {
                Some(feature) => updates::clamp_resize_end(feature, start, proposed, features),
                None => proposed.max(start),
            };
            (start, end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TimelineViewport, UpdateRecord};
    use crate::timeline::calendar::{date_range_inclusive_months, parse_date};
    use crate::timeline::month_cache::BoardZone;
    use crate::timeline::DEFAULT_MONTH_WIDTH;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn months() -> Vec<NaiveDate> {
        date_range_inclusive_months(d("2025-01-01"), d("2025-12-01"))
    }

    // 310px per month: January's 31 days are 10px apart.
    fn mapper() -> PositionMapper {
        PositionMapper::new(BoardZone::Named(chrono_tz::Tz::UTC), 310.0, d("2025-01-01"))
    }

    #[test]
    fn move_then_release_commits_through_the_sink() {
        let leaf = Feature::feature("F", None, Schedule::planned(d("2025-01-05"), d("2025-01-08")));
        let features = vec![leaf.clone()];
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut batches: Vec<Vec<UpdateRecord>> = Vec::new();
        let mut sink = |batch: Vec<UpdateRecord>| batches.push(batch);

        controller.begin(&leaf, DragMode::Move, 100.0, d("2025-06-01")).unwrap();
        assert_eq!(controller.mode(), Some(DragMode::Move));

        let moved = controller.pointer_move(130.0, &mut mapper, &months(), &features);
        match moved {
            Some(SessionEvent::Moved { start, end, .. }) => {
                assert_eq!((start, end), (d("2025-01-08"), d("2025-01-11")));
            }
            other => panic!("unexpected {other:?}"),
        }

        let ended = controller.pointer_up(130.0, &mut mapper, &months(), &features, &mut sink);
        assert_eq!(
            ended,
            Some(SessionEvent::Ended {
                id: "F".into(),
                start: d("2025-01-08"),
                end: d("2025-01-11"),
            })
        );
        assert!(!controller.is_active());
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec![UpdateRecord::new("F".into(), d("2025-01-08"), d("2025-01-11"))]);
    }

    #[test]
    fn returning_to_origin_discards_the_gesture() {
        let leaf = Feature::feature("F", None, Schedule::planned(d("2025-01-05"), d("2025-01-08")));
        let features = vec![leaf.clone()];
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut calls = 0;
        let mut sink = |_: Vec<UpdateRecord>| calls += 1;

        controller.begin(&leaf, DragMode::Move, 100.0, d("2025-06-01")).unwrap();
        controller.pointer_move(400.0, &mut mapper, &months(), &features);
        let ended = controller.pointer_up(100.0, &mut mapper, &months(), &features, &mut sink);

        assert_eq!(ended, None);
        assert_eq!(calls, 0);
        assert!(!controller.is_active());
    }

    #[test]
    fn epic_resize_clamps_live_and_on_commit() {
        let epic = Feature::epic("E", Schedule::planned(d("2025-01-01"), d("2025-01-20")));
        let child = Feature::feature("C", Some("E".into()), Schedule::planned(d("2025-01-02"), d("2025-01-15")));
        let features = vec![epic.clone(), child];
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut batches = Vec::new();
        let mut sink = |batch: Vec<UpdateRecord>| batches.push(batch);

        controller.begin(&epic, DragMode::Resize, 200.0, d("2025-06-01")).unwrap();
        // Shrinking past the child's end clamps to it.
        let moved = controller.pointer_move(100.0, &mut mapper, &months(), &features);
        assert!(matches!(moved, Some(SessionEvent::Moved { end, .. }) if end == d("2025-01-15")));

        let ended = controller.pointer_up(100.0, &mut mapper, &months(), &features, &mut sink);
        assert_eq!(
            ended,
            Some(SessionEvent::Ended {
                id: "E".into(),
                start: d("2025-01-01"),
                end: d("2025-01-15"),
            })
        );
        assert_eq!(batches, vec![vec![UpdateRecord::new("E".into(), d("2025-01-01"), d("2025-01-15"))]]);
    }

    #[test]
    fn epic_move_emits_cascade_batch() {
        let epic = Feature::epic("E", Schedule::planned(d("2025-01-01"), d("2025-01-10")));
        let child = Feature::feature("C", Some("E".into()), Schedule::planned(d("2025-01-02"), d("2025-01-05")));
        let features = vec![epic.clone(), child];
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut batches = Vec::new();
        let mut sink = |batch: Vec<UpdateRecord>| batches.push(batch);

        controller.begin(&epic, DragMode::Move, 0.0, d("2025-06-01")).unwrap();
        controller.pointer_up(20.0, &mut mapper, &months(), &features, &mut sink);

        assert_eq!(batches.len(), 1);
        let ids: Vec<&str> = batches[0].iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["E", "C", "E"]);
        assert!(batches[0][1].from_epic_move);
        assert_eq!(batches[0][1].start, d("2025-01-04"));
    }

    #[test]
    fn unplanned_child_plants_unplanned_parent() {
        let epic = Feature::epic("E", Schedule::Unplanned);
        let child = Feature::feature("C", Some("E".into()), Schedule::Unplanned);
        let features = vec![epic, child.clone()];
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut batches = Vec::new();
        let mut sink = |batch: Vec<UpdateRecord>| batches.push(batch);

        controller.begin(&child, DragMode::Resize, 0.0, d("2025-01-03")).unwrap();
        let ended = controller.pointer_up(50.0, &mut mapper, &months(), &features, &mut sink);

        assert_eq!(
            ended,
            Some(SessionEvent::Ended {
                id: "C".into(),
                start: d("2025-01-03"),
                end: d("2025-01-08"),
            })
        );
        assert_eq!(
            batches,
            vec![vec![
                UpdateRecord::new("C".into(), d("2025-01-03"), d("2025-01-08")),
                UpdateRecord::new("E".into(), d("2025-01-03"), d("2025-01-08")),
            ]]
        );
    }

    #[test]
    fn releasing_an_unplanned_item_in_place_plants_it_at_the_anchor() {
        let leaf = Feature::feature("U", None, Schedule::Unplanned);
        let features = vec![leaf.clone()];
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut batches = Vec::new();
        let mut sink = |batch: Vec<UpdateRecord>| batches.push(batch);

        controller.begin(&leaf, DragMode::Move, 42.0, d("2025-03-03")).unwrap();
        controller.pointer_up(42.0, &mut mapper, &months(), &features, &mut sink);
        assert_eq!(batches, vec![vec![UpdateRecord::new("U".into(), d("2025-03-03"), d("2025-03-03"))]]);
    }

    #[test]
    fn second_begin_is_rejected() {
        let a = Feature::feature("A", None, Schedule::planned(d("2025-01-01"), d("2025-01-02")));
        let b = Feature::feature("B", None, Schedule::planned(d("2025-01-01"), d("2025-01-02")));
        let mut controller = DragController::new();
        controller.begin(&a, DragMode::Move, 0.0, d("2025-01-01")).unwrap();
        let err = controller.begin(&b, DragMode::Resize, 0.0, d("2025-01-01")).unwrap_err();
        assert!(matches!(err, BoardError::SessionActive(id) if id.as_str() == "A"));
        assert_eq!(controller.active_feature(), Some(&FeatureId::from("A")));
        assert_eq!(controller.mode(), Some(DragMode::Move));
    }

    #[test]
    fn idle_controller_ignores_pointer_events() {
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut calls = 0;
        let mut sink = |_: Vec<UpdateRecord>| calls += 1;
        assert_eq!(controller.pointer_move(10.0, &mut mapper, &months(), &[]), None);
        assert_eq!(controller.pointer_up(10.0, &mut mapper, &months(), &[], &mut sink), None);
        assert_eq!(calls, 0);
    }

    #[test]
    fn vanished_feature_drops_the_gesture() {
        let leaf = Feature::feature("F", None, Schedule::planned(d("2025-01-05"), d("2025-01-08")));
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut calls = 0;
        let mut sink = |_: Vec<UpdateRecord>| calls += 1;
        controller.begin(&leaf, DragMode::Move, 0.0, d("2025-01-01")).unwrap();
        assert_eq!(controller.pointer_up(90.0, &mut mapper, &months(), &[], &mut sink), None);
        assert_eq!(calls, 0);
        assert!(!controller.is_active());
    }

    #[test]
    fn cancel_discards_without_committing() {
        let leaf = Feature::feature("F", None, Schedule::planned(d("2025-01-05"), d("2025-01-08")));
        let features = vec![leaf.clone()];
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut calls = 0;
        let mut sink = |_: Vec<UpdateRecord>| calls += 1;

        controller.begin(&leaf, DragMode::Move, 0.0, d("2025-01-01")).unwrap();
        controller.pointer_move(90.0, &mut mapper, &months(), &features);
        assert_eq!(controller.cancel(), Some(FeatureId::from("F")));
        assert!(!controller.is_active());
        assert_eq!(controller.pointer_up(90.0, &mut mapper, &months(), &features, &mut sink), None);
        assert_eq!(calls, 0);
        assert_eq!(controller.cancel(), None);
    }

    #[test]
    fn session_reports_duration() {
        let leaf = Feature::feature("F", None, Schedule::planned(d("2025-01-05"), d("2025-01-08")));
        let mut controller = DragController::new();
        controller.begin(&leaf, DragMode::Move, 0.0, d("2025-01-01")).unwrap();
        let session = controller.session().unwrap();
        assert_eq!(session.duration_days(), 3);
        assert_eq!(session.tentative(), (d("2025-01-05"), d("2025-01-08")));
    }

    #[test]
    fn unplanned_item_does_not_jump_when_picked_up() {
        let leaf = Feature::feature("U", None, Schedule::Unplanned);
        let features = vec![leaf.clone()];
        let mut mapper = mapper();
        mapper.set_fallback_span(d("2025-02-01"), d("2025-02-01"));
        let drawn = mapper.compute_position(&leaf, &months());
        let mut controller = DragController::new();
        let mut batches = Vec::new();
        let mut sink = |batch: Vec<UpdateRecord>| batches.push(batch);

        let anchor = mapper.fallback_span().0;
        controller.begin(&leaf, DragMode::Move, 75.0, anchor).unwrap();
        match controller.pointer_move(75.0, &mut mapper, &months(), &features) {
            Some(SessionEvent::Moved { start, end, geometry, .. }) => {
                assert_eq!((start, end), (d("2025-02-01"), d("2025-02-01")));
                assert_eq!(geometry, drawn);
            }
            other => panic!("unexpected {other:?}"),
        }
        controller.pointer_up(75.0, &mut mapper, &months(), &features, &mut sink);
        assert_eq!(batches, vec![vec![UpdateRecord::new("U".into(), d("2025-02-01"), d("2025-02-01"))]]);
    }

    #[test]
    fn scrolling_mid_gesture_does_not_move_the_card() {
        let leaf = Feature::feature("F", None, Schedule::planned(d("2025-01-05"), d("2025-01-08")));
        let features = vec![leaf.clone()];
        let mut mapper = mapper();
        let mut controller = DragController::new();
        let mut calls = 0;
        let mut sink = |_: Vec<UpdateRecord>| calls += 1;

        controller.begin(&leaf, DragMode::Move, 100.0, d("2025-06-01")).unwrap();
        mapper.set_board_offset(-250.0);
        let moved = controller.pointer_move(130.0, &mut mapper, &months(), &features);
        assert!(matches!(moved, Some(SessionEvent::Moved { start, end, .. })
            if (start, end) == (d("2025-01-08"), d("2025-01-11"))));

        assert_eq!(controller.pointer_up(100.0, &mut mapper, &months(), &features, &mut sink), None);
        assert_eq!(calls, 0);
    }

    // Board-relative x of the column edge where `month` starts.
    fn month_edge(mapper: &mut PositionMapper, month: NaiveDate) -> f32 {
        mapper.span_geometry(month, month, &months()).left - mapper.board_offset()
    }

    fn zoomed_mapper() -> PositionMapper {
        let mut viewport = TimelineViewport::new(months(), DEFAULT_MONTH_WIDTH);
        for _ in 0..3 {
            viewport.zoom_in();
        }
        let mut mapper =
            PositionMapper::new(BoardZone::Named(chrono_tz::Tz::America__New_York), viewport.month_width, d("2025-01-01"));
        mapper.set_board_offset(213.7);
        mapper
    }

    #[test]
    fn month_edge_gestures_at_zoomed_width_and_fractional_offset() {
        let leaf = Feature::feature("F", None, Schedule::planned(d("2025-03-01"), d("2025-03-10")));
        let features = vec![leaf.clone()];
        let mut mapper = zoomed_mapper();
        let march = month_edge(&mut mapper, d("2025-03-01"));
        let april = month_edge(&mut mapper, d("2025-04-01"));
        let june = month_edge(&mut mapper, d("2025-06-01"));

        let mut controller = DragController::new();
        let mut calls = 0;
        let mut sink = |_: Vec<UpdateRecord>| calls += 1;
        controller.begin(&leaf, DragMode::Move, march, d("2025-06-01")).unwrap();
        controller.pointer_move(june, &mut mapper, &months(), &features);
        assert_eq!(controller.pointer_up(march, &mut mapper, &months(), &features, &mut sink), None);
        assert_eq!(calls, 0);

        let mut batches = Vec::new();
        let mut sink = |batch: Vec<UpdateRecord>| batches.push(batch);
        controller.begin(&leaf, DragMode::Move, march, d("2025-06-01")).unwrap();
        let ended = controller.pointer_up(april, &mut mapper, &months(), &features, &mut sink);
        assert_eq!(
            ended,
            Some(SessionEvent::Ended {
                id: "F".into(),
                start: d("2025-04-01"),
                end: d("2025-04-10"),
            })
        );
        assert_eq!(batches.len(), 1);
    }
}
