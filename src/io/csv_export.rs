use std::path::Path;

use crate::error::Result;
use crate::model::{Feature, FeatureKind};
use crate::timeline::calendar;

const HEADER: [&str; 7] = ["ID", "Title", "Type", "Start Date", "End Date", "Parent Epic", "Rank"];

/// Export features to a semicolon-delimited CSV file matching the import
/// format. Unplanned items get empty date cells. Returns the number of
/// features written.
pub fn export_csv(features: &[Feature], path: &Path) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)?;
    write_features(&mut wtr, features)?;
    Ok(features.len())
}

fn write_features<W: std::io::Write>(wtr: &mut csv::Writer<W>, features: &[Feature]) -> Result<()> {
    wtr.write_record(HEADER)?;
    for feature in features {
        let (kind, parent) = match &feature.kind {
            FeatureKind::Epic => ("Epic", String::new()),
            FeatureKind::Feature { parent_epic } => (
                "Feature",
                parent_epic.as_ref().map(|p| p.to_string()).unwrap_or_default(),
            ),
        };
        let start = feature.schedule.start().map(calendar::format_date).unwrap_or_default();
        let end = feature.schedule.end().map(calendar::format_date).unwrap_or_default();
        wtr.write_record([
            feature.id.as_str(),
            feature.title.as_str(),
            kind,
            start.as_str(),
            end.as_str(),
            parent.as_str(),
            feature.original_rank.to_string().as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_import::import_csv;
    use crate::model::Schedule;

    #[test]
    fn export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.csv");
        let features = vec![
            Feature::epic(
                "E",
                Schedule::planned(
                    calendar::parse_date("2025-01-01").unwrap(),
                    calendar::parse_date("2025-01-31").unwrap(),
                ),
            )
            .with_title("Payments")
            .with_rank(1.0),
            Feature::feature("C", Some("E".into()), Schedule::Unplanned).with_rank(2.0),
        ];

        assert_eq!(export_csv(&features, &path).unwrap(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID;Title;Type;Start Date;End Date;Parent Epic;Rank");
        assert_eq!(lines[1], "E;Payments;Epic;2025-01-01;2025-01-31;;1");
        assert_eq!(lines[2], "C;C;Feature;;;E;2");

        let (imported, skipped) = import_csv(&path).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(imported, features);
    }
}
