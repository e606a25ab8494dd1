//! CSV export. One row per [PlayerRecord] in input order, header first, eligibility as its
//! integer bitmask.

use crate::config::RunContext;
use crate::model::PlayerRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors from writing the projections CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write output: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// `{dir}/projections-espn-{season}.csv`
pub fn output_path(dir: &Path, season: i32) -> PathBuf {
    dir.join(format!("projections-espn-{}.csv", season))
}

/// Write the header and one row per record. The header is written even with no records.
pub fn write_csv<W: Write>(writer: W, records: &[PlayerRecord]) -> Result<(), ExportError> {
    let mut w = csv::Writer::from_writer(writer);
    if records.is_empty() {
        w.write_record(PlayerRecord::columns())?;
    }
    for record in records {
        w.serialize(record)?;
    }
    w.flush()?;
    Ok(())
}

/// Write `records` to the season's CSV under the context's output directory, replacing any
/// existing file. Creates the directory if needed.
pub fn export(
    ctx: &RunContext,
    records: &[PlayerRecord],
    season: i32,
) -> Result<ExportSummary, ExportError> {
    let _entered = ctx.span.enter();
    std::fs::create_dir_all(&ctx.output_dir).map_err(|e| ExportError::Io {
        path: ctx.output_dir.clone(),
        source: e,
    })?;

    let path = output_path(&ctx.output_dir, season);
    let f = File::create(&path).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;
    write_csv(BufWriter::new(f), records)?;

    let summary = ExportSummary {
        path,
        rows: records.len(),
        columns: PlayerRecord::columns().len(),
    };
    info!(
        "Wrote {} rows x {} columns to {}",
        summary.rows,
        summary.columns,
        summary.path.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, PositionEligibility};
    use std::error::Error;

    fn sample_records() -> Vec<PlayerRecord> {
        let mut batter = PlayerRecord::new("12345", "Jane Doe");
        batter.position_eligibility =
            PositionEligibility::from(Position::FirstBase) | Position::Outfield;
        batter.at_bats = 400.0;
        batter.home_runs = 20.0;
        batter.on_base_plus_slugging = 0.84;

        let mut pitcher = PlayerRecord::new("777", "Ace Arm");
        pitcher.position_eligibility = PositionEligibility::from(Position::Pitcher)
            | Position::StartingPitcher
            | Position::ReliefPitcher;
        pitcher.innings_pitched = 201.1;
        pitcher.strikeouts_per_9 = 10.3;

        // Same player on a later page stays a separate row.
        let dup = PlayerRecord::new("12345", "Jane Doe");
        vec![batter, pitcher, dup]
    }

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn output_path_is_named_for_source_and_season() {
        assert_eq!(
            output_path(Path::new("data/raw"), 2018),
            PathBuf::from("data/raw/projections-espn-2018.csv")
        );
    }

    #[test]
    fn export_round_trip_preserves_rows_order_and_columns() -> Result<(), Box<dyn Error>> {
        let dir = test_dir("projscrape_export_round_trip");
        let ctx = RunContext::new(2018, dir.clone());
        let records = sample_records();
        let summary = export(&ctx, &records, 2018)?;
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns, 25);
        assert_eq!(summary.path, dir.join("projections-espn-2018.csv"));

        let text = std::fs::read_to_string(&summary.path)?;
        assert_eq!(text.lines().count(), 4);

        let mut reader = csv::Reader::from_path(&summary.path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        assert_eq!(headers, PlayerRecord::columns());

        let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][2], "34");
        assert_eq!(&rows[1][2], ((1 << 10) | (1 << 11) | (1 << 12)).to_string());
        assert_eq!(&rows[2][2], "0");
        assert_eq!(&rows[0][0], "12345");
        assert_eq!(&rows[2][0], "12345");

        let mut reader = csv::Reader::from_path(&summary.path)?;
        let parsed: Vec<PlayerRecord> = reader.deserialize().collect::<Result<_, _>>()?;
        assert_eq!(parsed, records);

        std::fs::remove_dir_all(&dir).ok();
        Ok(())
    }

    #[test]
    fn export_overwrites_existing_file() -> Result<(), Box<dyn Error>> {
        let dir = test_dir("projscrape_export_overwrite");
        let ctx = RunContext::new(2019, dir.clone());
        export(&ctx, &sample_records(), 2019)?;
        let summary = export(&ctx, &sample_records()[..1], 2019)?;
        let text = std::fs::read_to_string(&summary.path)?;
        assert_eq!(text.lines().count(), 2);
        std::fs::remove_dir_all(&dir).ok();
        Ok(())
    }

    #[test]
    fn write_csv_empty_still_has_header() -> Result<(), Box<dyn Error>> {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[])?;
        let text = String::from_utf8(buf)?;
        assert_eq!(text.trim_end(), PlayerRecord::columns().join(","));
        Ok(())
    }

    #[test]
    fn serialized_header_matches_declared_columns() -> Result<(), Box<dyn Error>> {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample_records()[..1])?;
        let text = String::from_utf8(buf)?;
        let header = text.lines().next().ok_or("no header line")?;
        assert_eq!(header, PlayerRecord::columns().join(","));
        Ok(())
    }
}
