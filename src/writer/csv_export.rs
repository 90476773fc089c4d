use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

use crate::dataset::Dataset;
use crate::filter::ListQuery;
use crate::parser::Mission;
use crate::view::filtered_missions;

/// Default file name for the missions export
pub const DEFAULT_EXPORT_FILE: &str = "missions_filtered.csv";

/// Write `rows` as CSV with `columns` as the header. Missing values become empty cells.
pub fn write_missions<W: Write>(columns: &[String], rows: &[&Mission], out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(out);
    wtr.write_record(columns).context("Failed to write CSV header")?;

    for row in rows {
        wtr.write_record(row.values().iter().map(|v| v.as_deref().unwrap_or("")))
            .context("Failed to write CSV row")?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Serialize the missions matching `query` to a string
pub fn export_missions(dataset: &Dataset, query: &ListQuery) -> Result<String> {
    let filtered = filtered_missions(dataset, query);
    let mut buf = Vec::new();
    write_missions(&dataset.missions.columns, &filtered.rows, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// Write the missions matching `query` to `dest`, or stdout when `dest` is `-`.
/// Returns the number of rows written.
pub fn export_missions_to(dataset: &Dataset, query: &ListQuery, dest: &Path) -> Result<usize> {
    let filtered = filtered_missions(dataset, query);
    let columns = &dataset.missions.columns;

    if dest == Path::new("-") {
        write_missions(columns, &filtered.rows, io::stdout().lock())?;
    } else {
        let file = File::create(dest)
            .with_context(|| format!("Failed to create export file: {:?}", dest))?;
        write_missions(columns, &filtered.rows, file)?;
        info!(rows = filtered.rows.len(), "exported missions to {:?}", dest);
    }

    Ok(filtered.rows.len())
}
