use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::{cash_benefit_filters, in_kind_filters};
use crate::error::Result;
use crate::loader;
use crate::transform;

fn default_path(name: &str, json: bool) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d");
    let ext = if json { "json" } else { "csv" };
    PathBuf::from(format!("decile-{name}-{date}.{ext}"))
}

fn write_rows<T: Serialize>(
    rows: &[T],
    name: &str,
    output: Option<String>,
    json: bool,
) -> Result<()> {
    if rows.is_empty() {
        println!("No rows matched; nothing written.");
        return Ok(());
    }
    let path = output.map(PathBuf::from).unwrap_or_else(|| default_path(name, json));
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if json {
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), rows)
            .map_err(|e| crate::error::EtbError::Other(format!("JSON write failed: {e}")))?;
    } else {
        let mut wtr = csv::Writer::from_path(&path)?;
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
    }
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn stages(file: &str, year: Option<i32>, output: Option<String>, json: bool) -> Result<()> {
    let obs = loader::load(Path::new(file))?;
    let Some(year) = year.or_else(|| transform::latest_year(&obs)) else {
        println!("No rows matched; nothing written.");
        return Ok(());
    };
    let rows = transform::stage_table(&obs, year);
    write_rows(&rows, "stages", output, json)
}

pub fn cash_benefits(file: &str, output: Option<String>, json: bool) -> Result<()> {
    let obs = loader::load(Path::new(file))?;
    let (num, den) = cash_benefit_filters();
    let rows = transform::ratio_table(&obs, &num, &den);
    write_rows(&rows, "cash-benefits", output, json)
}

pub fn in_kind(file: &str, output: Option<String>, json: bool) -> Result<()> {
    let obs = loader::load(Path::new(file))?;
    let (num, den) = in_kind_filters();
    let rows = transform::ratio_table(&obs, &num, &den);
    write_rows(&rows, "in-kind", output, json)
}

pub fn composition(
    file: &str,
    component: &str,
    year_range: Option<(i32, i32)>,
    output: Option<String>,
    json: bool,
) -> Result<()> {
    let obs = loader::load(Path::new(file))?;
    let rows = transform::composition_table(&obs, component, year_range);
    write_rows(&rows, "composition", output, json)
}
