use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::LoadedFile;

/// Write one CSV record per date column of every file, in corpus order.
pub fn write_counts<W: Write>(writer: W, files: &[LoadedFile]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["file", "company", "station", "date", "column", "count"])
        .context("writing CSV header")?;
    for file in files {
        for c in &file.counts {
            let column = c.column.to_string();
            let count = c.count.to_string();
            out.write_record([
                file.name.as_str(),
                file.company.as_str(),
                file.station.as_str(),
                c.label.as_str(),
                column.as_str(),
                count.as_str(),
            ])
            .with_context(|| format!("writing counts for {}", file.name))?;
        }
    }
    out.flush().context("flushing CSV")?;
    Ok(())
}

/// Export counts to a CSV file at `path`.
pub fn export_csv(path: &Path, files: &[LoadedFile]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_counts(file, files)
}
