use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::feature::{Feature, FeatureId, Schedule, UpdateRecord};
use crate::timeline::calendar;
use crate::timeline::updates::UpdateSink;

/// A planning board: the feature store the timeline reads from and writes
/// update batches into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    pub features: Vec<Feature>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            name: "Untitled Board".to_string(),
            features: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn get(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| &f.id == id)
    }

    pub fn children_of<'a>(&'a self, epic: &'a FeatureId) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features.iter().filter(move |f| f.is_child_of(epic))
    }

    /// Earliest start and latest end over all planned items.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let planned = self.features.iter().filter_map(|f| match f.schedule {
            Schedule::Planned { start, end } => Some((start.min(end), start.max(end))),
            Schedule::Unplanned => None,
        });
        planned.fold(None, |acc, (start, end)| match acc {
            None => Some((start, end)),
            Some((lo, hi)) => Some((lo.min(start), hi.max(end))),
        })
    }

    /// Month markers covering every planned item plus `padding` months on
    /// each side. An empty board centres on `today`.
    pub fn month_markers(&self, padding: u32, today: NaiveDate) -> Vec<NaiveDate> {
        let (lo, hi) = self.date_bounds().unwrap_or((today, today));
        let pad = padding.min(i32::MAX as u32) as i32;
        calendar::date_range_inclusive_months(
            calendar::add_months(lo, -pad),
            calendar::add_months(hi, pad),
        )
    }

    /// Display order: each epic followed by its children, then features
    /// without a known epic. Ties keep load order.
    pub fn rows(&self) -> Vec<&Feature> {
        let by_rank = |a: &&Feature, b: &&Feature| a.original_rank.total_cmp(&b.original_rank);

        let mut epics: Vec<&Feature> = self.features.iter().filter(|f| f.is_epic()).collect();
        epics.sort_by(by_rank);

        let mut rows = Vec::with_capacity(self.features.len());
        for epic in epics {
            rows.push(epic);
            let mut children: Vec<&Feature> = self.children_of(&epic.id).collect();
            children.sort_by(by_rank);
            rows.extend(children);
        }

        let mut orphans: Vec<&Feature> = self
            .features
            .iter()
            .filter(|f| !f.is_epic())
            .filter(|f| match f.parent_epic() {
                Some(parent) => !self.features.iter().any(|e| e.is_epic() && &e.id == parent),
                None => true,
            })
            .collect();
        orphans.sort_by(by_rank);
        rows.extend(orphans);
        rows
    }

    /// Apply records in order. Later records for the same id win. Returns
    /// the number of records that matched a feature.
    pub fn apply(&mut self, updates: &[UpdateRecord]) -> usize {
        let mut applied = 0;
        for update in updates {
            match self.features.iter_mut().find(|f| f.id == update.id) {
                Some(feature) => {
                    feature.schedule = Schedule::planned(update.start, update.end);
                    applied += 1;
                }
                None => {
                    tracing::warn!(feature = %update.id, "update for unknown feature ignored");
                }
            }
        }
        if applied > 0 {
            self.touch();
        }
        applied
    }
}

impl UpdateSink for Board {
    fn update_feature_dates(&mut self, updates: Vec<UpdateRecord>) {
        let applied = self.apply(&updates);
        tracing::debug!(records = updates.len(), applied, "applied update batch");
    }
}
