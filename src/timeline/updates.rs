//! Turning a finished move or resize into an ordered list of date updates.

use chrono::NaiveDate;

use super::calendar;
use crate::model::{Feature, FeatureKind, Schedule, UpdateRecord};

/// Receives committed update batches; the board's state owner.
pub trait UpdateSink {
    /// Apply `updates` in order as one batch.
    fn update_feature_dates(&mut self, updates: Vec<UpdateRecord>);
}

impl<F> UpdateSink for F
where
    F: FnMut(Vec<UpdateRecord>),
{
    fn update_feature_dates(&mut self, updates: Vec<UpdateRecord>) {
        self(updates)
    }
}

/// Hand the whole batch to `sink` in a single call.
pub fn apply_updates<S: UpdateSink + ?Sized>(updates: Vec<UpdateRecord>, sink: &mut S) {
    sink.update_feature_dates(updates);
}

/// Updates for moving `feature` to `[new_start, new_end]`.
///
/// A leaf yields one record. An epic yields its own record, then every
/// planned child shifted by the same number of calendar days (only when the
/// start actually moved), then its own record again so consumers applying
/// the list in order finish on the epic's state. Moves never clamp.
pub fn compute_move_updates(
    feature: &Feature,
    new_start: NaiveDate,
    new_end: NaiveDate,
    all: &[Feature],
) -> Vec<UpdateRecord> {
    let own = UpdateRecord::new(feature.id.clone(), new_start, new_end);
    if !feature.is_epic() {
        return vec![own];
    }

    let delta = feature
        .schedule
        .start()
        .map(|start| calendar::days_between(start, new_start))
        .unwrap_or(0);

    let mut updates = vec![own.clone()];
    if delta != 0 {
        updates.extend(
            all.iter()
                .filter(|f| f.is_child_of(&feature.id))
                .filter_map(|child| match child.schedule {
                    Schedule::Planned { start, end } => Some(UpdateRecord {
                        id: child.id.clone(),
                        start: calendar::add_days(start, delta),
                        end: calendar::add_days(end, delta),
                        from_epic_move: true,
                    }),
                    Schedule::Unplanned => None,
                }),
        );
    }
    updates.push(own);
    updates
}

/// Latest end date among `epic`'s planned children.
pub fn children_max_end(epic: &Feature, all: &[Feature]) -> Option<NaiveDate> {
    all.iter()
        .filter(|f| f.is_child_of(&epic.id))
        .filter_map(|f| f.schedule.end())
        .max()
}

/// Clamp a proposed end for `feature`: never before its start, and for an
/// epic never before its children's latest end.
pub fn clamp_resize_end(feature: &Feature, start: NaiveDate, proposed: NaiveDate, all: &[Feature]) -> NaiveDate {
    let mut end = proposed.max(start);
    if let FeatureKind::Epic = feature.kind {
        if let Some(max_child_end) = children_max_end(feature, all) {
            end = end.max(max_child_end);
        }
    }
    end
}

/// Updates for dragging `feature`'s end to `new_end`. The start never moves.
///
/// Returns an empty list when the clamped end equals the current end, or
/// when the feature has no dates yet (unplanned items are planted through
/// [`plant_updates`]).
pub fn compute_resize_updates(feature: &Feature, new_end: NaiveDate, all: &[Feature]) -> Vec<UpdateRecord> {
    let Schedule::Planned { start, end } = feature.schedule else {
        tracing::debug!(feature = %feature.id, "resize of unplanned feature ignored");
        return Vec::new();
    };
    let new_end = clamp_resize_end(feature, start, new_end, all);
    if new_end == end {
        return Vec::new();
    }
    vec![UpdateRecord::new(feature.id.clone(), start, new_end)]
}

/// Updates that give an unplanned `feature` its first dates. If its parent
/// epic is unplanned too, the epic is planted at the same span.
pub fn plant_updates(feature: &Feature, start: NaiveDate, end: NaiveDate, all: &[Feature]) -> Vec<UpdateRecord> {
    let mut updates = vec![UpdateRecord::new(feature.id.clone(), start, end)];
    if let Some(parent_id) = feature.parent_epic() {
        let parent = all.iter().find(|f| &f.id == parent_id && f.is_epic());
        if let Some(parent) = parent {
            if !parent.schedule.is_planned() {
                updates.push(UpdateRecord::new(parent.id.clone(), start, end));
            }
        }
    }
    updates
}
