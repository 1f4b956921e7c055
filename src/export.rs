// src/export.rs

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::config::CSV_DELIMITER;
use crate::table::PricingTable;

/// Write the aligned text dump of `table` to `out`.
pub fn print_table<W: Write>(table: &PricingTable, out: &mut W) -> Result<()> {
    write!(out, "{}", table).context("writing table dump")?;
    out.flush()?;
    Ok(())
}

/// `;`-delimited CSV with a header row and no index column.
pub fn write_csv<W: Write>(table: &PricingTable, out: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(out);
    wtr.write_record(table.columns())
        .context("writing CSV header")?;
    for rec in table.records() {
        wtr.write_record(rec.iter().map(|c| c.to_string()))
            .context("writing CSV record")?;
    }
    wtr.flush()?;
    Ok(())
}

/// Array of `{column: value}` objects, keys in column order.
pub fn write_json<W: Write>(table: &PricingTable, mut out: W) -> Result<()> {
    serde_json::to_writer(&mut out, &table.as_records())
        .context("serializing JSON")?;
    out.flush()?;
    Ok(())
}

pub fn save_csv(table: &PricingTable, path: impl AsRef<Path>) -> Result<()> {
    write_atomically(path.as_ref(), |w| write_csv(table, w))
}

pub fn save_json(table: &PricingTable, path: impl AsRef<Path>) -> Result<()> {
    write_atomically(path.as_ref(), |w| write_json(table, w))
}

/// Write to a dotted temp file beside `path`, then rename over it.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> Result<()>,
{
    let file_name = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?
        .to_string_lossy();
    let tmp_path: PathBuf = path.with_file_name(format!(".{}.tmp", file_name));

    let file = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    let mut w = BufWriter::new(file);
    write(&mut w)?;
    w.flush()
        .with_context(|| format!("flushing {}", tmp_path.display()))?;
    drop(w);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(())
}
