use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timeline::calendar;

/// Identifier of an epic or feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id, for rows imported without one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Whether an item is an epic or a leaf feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureKind {
    Epic,
    /// A leaf item, optionally parented to an epic.
    Feature { parent_epic: Option<FeatureId> },
}

/// A work item's dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Planned { start: NaiveDate, end: NaiveDate },
    Unplanned,
}

impl Schedule {
    pub fn planned(start: NaiveDate, end: NaiveDate) -> Self {
        Schedule::Planned { start, end }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        match self {
            Schedule::Planned { start, .. } => Some(*start),
            Schedule::Unplanned => None,
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match self {
            Schedule::Planned { end, .. } => Some(*end),
            Schedule::Unplanned => None,
        }
    }

    pub fn is_planned(&self) -> bool {
        matches!(self, Schedule::Planned { .. })
    }
}

/// An epic or feature card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FeatureRecord", into = "FeatureRecord")]
pub struct Feature {
    pub id: FeatureId,
    pub title: String,
    pub kind: FeatureKind,
    pub schedule: Schedule,
    /// Position in the backlog the item was loaded with; drives row order.
    pub original_rank: f64,
}

impl Feature {
    pub fn epic(id: impl Into<FeatureId>, schedule: Schedule) -> Self {
        let id = id.into();
        Self {
            title: id.to_string(),
            id,
            kind: FeatureKind::Epic,
            schedule,
            original_rank: 0.0,
        }
    }

    pub fn feature(id: impl Into<FeatureId>, parent_epic: Option<FeatureId>, schedule: Schedule) -> Self {
        let id = id.into();
        Self {
            title: id.to_string(),
            id,
            kind: FeatureKind::Feature { parent_epic },
            schedule,
            original_rank: 0.0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_rank(mut self, rank: f64) -> Self {
        self.original_rank = rank;
        self
    }

    pub fn is_epic(&self) -> bool {
        matches!(self.kind, FeatureKind::Epic)
    }

    pub fn parent_epic(&self) -> Option<&FeatureId> {
        match &self.kind {
            FeatureKind::Feature { parent_epic } => parent_epic.as_ref(),
            FeatureKind::Epic => None,
        }
    }

    /// True if this is a leaf feature parented to `epic`.
    pub fn is_child_of(&self, epic: &FeatureId) -> bool {
        self.parent_epic() == Some(epic)
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The flat wire shape of a feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureRecord {
    id: FeatureId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    parent_epic: Option<FeatureId>,
    #[serde(default)]
    original_rank: f64,
}

impl From<FeatureRecord> for Feature {
    fn from(record: FeatureRecord) -> Self {
        let kind = if record.kind.eq_ignore_ascii_case("epic") {
            FeatureKind::Epic
        } else {
            FeatureKind::Feature {
                parent_epic: record.parent_epic,
            }
        };
        let schedule = schedule_from_wire(&record.id, record.start.as_deref(), record.end.as_deref());
        Feature {
            title: record.title.unwrap_or_else(|| record.id.to_string()),
            id: record.id,
            kind,
            schedule,
            original_rank: record.original_rank,
        }
    }
}

impl From<Feature> for FeatureRecord {
    fn from(feature: Feature) -> Self {
        let (kind, parent_epic) = match feature.kind {
            FeatureKind::Epic => ("epic".to_string(), None),
            FeatureKind::Feature { parent_epic } => ("feature".to_string(), parent_epic),
        };
        FeatureRecord {
            id: feature.id,
            kind,
            title: Some(feature.title),
            start: feature.schedule.start().map(calendar::format_date),
            end: feature.schedule.end().map(calendar::format_date),
            parent_epic,
            original_rank: feature.original_rank,
        }
    }
}

/// Both dates must parse for an item to count as planned. A half-planned or
/// malformed record is kept as unplanned and reported rather than rejected.
pub(crate) fn schedule_from_wire(id: &FeatureId, start: Option<&str>, end: Option<&str>) -> Schedule {
    let blank = |s: Option<&str>| s.map_or(true, |s| s.trim().is_empty());
    if blank(start) && blank(end) {
        return Schedule::Unplanned;
    }
    match (start.and_then(calendar::parse_date), end.and_then(calendar::parse_date)) {
        (Some(start), Some(end)) => Schedule::Planned { start, end },
        _ => {
            tracing::warn!(
                feature = %id,
                start = start.unwrap_or(""),
                end = end.unwrap_or(""),
                "feature has missing or unparseable dates; treating it as unplanned"
            );
            Schedule::Unplanned
        }
    }
}

/// One date mutation produced by a move or resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    pub id: FeatureId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Set on child records produced by shifting their epic.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub from_epic_move: bool,
}

impl UpdateRecord {
    pub fn new(id: FeatureId, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            start,
            end,
            from_epic_move: false,
        }
    }
}
