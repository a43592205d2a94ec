use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{BoardError, Result};
use crate::model::feature::schedule_from_wire;
use crate::model::{Feature, FeatureId, FeatureKind};
use crate::timeline::calendar;

/// Column roles recognised in an import file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Title,
    Start,
    End,
    Kind,
    ParentEpic,
    Id,
    Rank,
}

/// Try parsing a date string with several common formats, normalising it to
/// ISO so it can go through the regular wire conversion.
fn normalize_date(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = calendar::parse_date(s) {
        return Some(calendar::format_date(d));
    }
    for fmt in &["%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d", "%m-%d-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(calendar::format_date(d));
        }
    }
    // Keep the raw text so the wire conversion reports it.
    Some(s.to_string())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "title" | "name" | "feature" | "featurename" | "label" | "summary" => Some(Column::Title),

        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),

        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" | "target" => {
            Some(Column::End)
        }

        "type" | "kind" | "itemtype" | "workitemtype" => Some(Column::Kind),

        "parent" | "parentepic" | "epic" | "epicid" => Some(Column::ParentEpic),

        "id" | "key" | "featureid" => Some(Column::Id),

        "rank" | "originalrank" | "order" | "priority" => Some(Column::Rank),

        _ => None,
    }
}

/// Import features from a CSV file.
///
/// Auto-detects the delimiter and matches headers loosely ("Start Date",
/// "Parent Epic", ...). Rows without a title are skipped; rows with missing
/// or malformed dates are kept as unplanned. Parent references may name an
/// epic by id or by title. Returns `(features, skipped_count)`.
pub fn import_csv(path: &Path) -> Result<(Vec<Feature>, usize)> {
    let content = std::fs::read_to_string(path)?;
    import_csv_str(&content)
}

pub fn import_csv_str(content: &str) -> Result<(Vec<Feature>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    if !col_map.contains(&Some(Column::Title)) {
        return Err(BoardError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    // Parent references are resolved once every row is known.
    let mut features: Vec<Feature> = Vec::new();
    let mut parent_refs: Vec<Option<String>> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping CSV row {}: {}", i + 2, e);
                skipped += 1;
                continue;
            }
        };

        let mut fields: HashMap<Column, String> = HashMap::new();
        for (col_idx, field) in record.iter().enumerate() {
            if let Some(Some(col)) = col_map.get(col_idx) {
                fields.insert(*col, field.trim().to_string());
            }
        }

        let title = match fields.remove(&Column::Title) {
            Some(t) if !t.is_empty() => t,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let id = fields
            .remove(&Column::Id)
            .filter(|s| !s.is_empty())
            .map(FeatureId::new)
            .unwrap_or_else(FeatureId::generate);

        let is_epic = fields
            .get(&Column::Kind)
            .is_some_and(|k| k.eq_ignore_ascii_case("epic"));

        let start = fields.get(&Column::Start).and_then(|s| normalize_date(s));
        let end = fields.get(&Column::End).and_then(|s| normalize_date(s));
        let schedule = schedule_from_wire(&id, start.as_deref(), end.as_deref());

        let rank = fields
            .get(&Column::Rank)
            .and_then(|r| r.parse::<f64>().ok())
            .unwrap_or(features.len() as f64);

        let kind = if is_epic {
            FeatureKind::Epic
        } else {
            FeatureKind::Feature { parent_epic: None }
        };
        parent_refs.push(fields.remove(&Column::ParentEpic).filter(|s| !s.is_empty()));
        features.push(Feature {
            id,
            title,
            kind,
            schedule,
            original_rank: rank,
        });
    }

    if features.is_empty() {
        return Err(BoardError::EmptyImport { skipped });
    }

    resolve_parents(&mut features, &parent_refs);
    Ok((features, skipped))
}

fn resolve_parents(features: &mut [Feature], parent_refs: &[Option<String>]) {
    let epics: Vec<(FeatureId, String)> = features
        .iter()
        .filter(|f| f.is_epic())
        .map(|f| (f.id.clone(), f.title.to_lowercase()))
        .collect();

    for (feature, parent_ref) in features.iter_mut().zip(parent_refs) {
        let Some(parent_ref) = parent_ref else {
            continue;
        };
        let FeatureKind::Feature { parent_epic } = &mut feature.kind else {
            tracing::warn!("Ignoring parent '{}' on epic '{}'", parent_ref, feature.title);
            continue;
        };
        let lowered = parent_ref.to_lowercase();
        let found = epics
            .iter()
            .find(|(id, _)| id.as_str() == parent_ref)
            .or_else(|| epics.iter().find(|(_, title)| *title == lowered));
        match found {
            Some((id, _)) => *parent_epic = Some(id.clone()),
            None => {
                tracing::warn!("Parent epic '{}' not found for '{}'", parent_ref, feature.title);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Schedule;

    fn d(s: &str) -> NaiveDate {
        calendar::parse_date(s).unwrap()
    }

    #[test]
    fn imports_semicolon_file_with_loose_headers() {
        let csv = "ID;Title;Type;Start Date;End Date;Parent Epic;Rank\n\
                   E1;Checkout revamp;Epic;2025-01-01;2025-03-31;;1\n\
                   F1;Wallet support;Feature;15/01/2025;28/02/2025;Checkout revamp;2\n\
                   F2;Receipts;Feature;;;E1;3\n";
        let (features, skipped) = import_csv_str(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(features.len(), 3);

        assert!(features[0].is_epic());
        assert_eq!(features[1].schedule, Schedule::planned(d("2025-01-15"), d("2025-02-28")));
        assert!(features[1].is_child_of(&"E1".into()));
        assert!(features[2].is_child_of(&"E1".into()));
        assert_eq!(features[2].schedule, Schedule::Unplanned);
    }

    #[test]
    fn comma_file_without_ids_generates_them() {
        let csv = "name,start,end\nAlpha,2025-05-01,2025-05-10\n,2025-05-01,2025-05-10\nBeta,bad,2025-05-10\n";
        let (features, skipped) = import_csv_str(csv).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(features.len(), 2);
        assert_ne!(features[0].id, features[1].id);
        assert_eq!(features[1].schedule, Schedule::Unplanned);
        assert_eq!(features[1].original_rank, 1.0);
    }

    #[test]
    fn missing_title_column_is_rejected() {
        let err = import_csv_str("start;end\n2025-01-01;2025-01-02\n").unwrap_err();
        assert!(matches!(err, BoardError::MissingColumns { .. }));
    }

    #[test]
    fn header_only_file_is_empty() {
        let err = import_csv_str("title;start;end\n").unwrap_err();
        assert!(matches!(err, BoardError::EmptyImport { skipped: 0 }));
    }

    #[test]
    fn unknown_parent_is_dropped() {
        let csv = "title;type;parent\nLonely;feature;Nowhere\n";
        let (features, _) = import_csv_str(csv).unwrap();
        assert_eq!(features[0].parent_epic(), None);
    }
}
