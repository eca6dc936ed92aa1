use std::path::Path;

use crate::error::{EtbError, Result};
use crate::models::{Observation, RawRecord};
use crate::transform;

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Canonical ONS header, followed by the spellings it may arrive under once
/// punctuation, spacing and case are stripped. "£ per year" canonicalizes
/// to "peryear" because '£' is not alphanumeric.
const HEADER_VARIANTS: &[(&str, &[&str])] = &[
    ("Financial year ending", &["financialyearending", "financialyearend", "yearending", "year"]),
    ("Household group", &["householdgroup", "group"]),
    ("Decile group", &["decilegroup", "incomedecile", "decile"]),
    ("Component", &["component"]),
    ("Sub-component", &["subcomponent"]),
    ("£ per year", &["peryear", "gbpperyear", "poundsperyear", "amount", "value"]),
];

fn canon(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    year: usize,
    group: usize,
    decile: usize,
    component: usize,
    sub_component: usize,
    amount: usize,
}

fn resolve_row(cells: &[String]) -> (Vec<Option<usize>>, usize) {
    let canons: Vec<String> = cells.iter().map(|c| canon(c)).collect();
    let mut resolved = Vec::with_capacity(HEADER_VARIANTS.len());
    let mut hits = 0usize;
    for (_, variants) in HEADER_VARIANTS {
        let idx = canons
            .iter()
            .position(|c| variants.iter().any(|v| c == v));
        if idx.is_some() {
            hits += 1;
        }
        resolved.push(idx);
    }
    (resolved, hits)
}

enum HeaderScan {
    Found(usize, Columns),
    /// A plausible header row existed but lacked this canonical column.
    Partial(String),
    None,
}

/// Locate the header row. ONS sheets carry title and note rows above the
/// table, so every row is tried until one resolves all six columns. A row
/// matching at least two columns is remembered as the best candidate for
/// the missing-column diagnostic.
fn find_header(rows: &[Vec<String>]) -> HeaderScan {
    let mut best_partial: Option<(usize, String)> = None;
    for (i, row) in rows.iter().enumerate() {
        let (resolved, hits) = resolve_row(row);
        if hits == HEADER_VARIANTS.len() {
            return HeaderScan::Found(
                i,
                Columns {
                    year: resolved[0].unwrap(),
                    group: resolved[1].unwrap(),
                    decile: resolved[2].unwrap(),
                    component: resolved[3].unwrap(),
                    sub_component: resolved[4].unwrap(),
                    amount: resolved[5].unwrap(),
                },
            );
        }
        if hits >= 2 && best_partial.as_ref().map_or(true, |(h, _)| hits > *h) {
            let missing = HEADER_VARIANTS
                .iter()
                .zip(&resolved)
                .find(|(_, r)| r.is_none())
                .map(|((name, _), _)| name.to_string())
                .unwrap_or_default();
            best_partial = Some((hits, missing));
        }
    }
    match best_partial {
        Some((_, missing)) => HeaderScan::Partial(missing),
        None => HeaderScan::None,
    }
}

fn extract_records(rows: &[Vec<String>], file: &str) -> Result<Vec<RawRecord>> {
    let (header_idx, cols) = match find_header(rows) {
        HeaderScan::Found(i, c) => (i, c),
        HeaderScan::Partial(missing) => {
            return Err(EtbError::MissingColumn {
                column: missing,
                file: file.to_string(),
            })
        }
        HeaderScan::None => {
            return Err(EtbError::MissingColumn {
                column: HEADER_VARIANTS[0].0.to_string(),
                file: file.to_string(),
            })
        }
    };

    let cell = |row: &[String], i: usize| row.get(i).cloned().unwrap_or_default();
    let mut records = Vec::new();
    for row in &rows[header_idx + 1..] {
        let decile = cell(row, cols.decile);
        // Blank decile marks separator and footnote rows, not data
        if decile.trim().is_empty() {
            continue;
        }
        records.push(RawRecord {
            year: cell(row, cols.year),
            group: cell(row, cols.group),
            decile,
            component: cell(row, cols.component),
            sub_component: cell(row, cols.sub_component),
            amount: cell(row, cols.amount),
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// CSV and XLSX readers
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }
    extract_records(&rows, &path.display().to_string())
}

#[cfg(feature = "xlsx")]
fn cell_to_string(cell: &calamine::Data) -> String {
    use calamine::Data;
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // Error cells (e.g. #N/A for suppressed values) read as absent
        Data::Error(_) | Data::Empty => String::new(),
    }
}

#[cfg(feature = "xlsx")]
fn read_xlsx(path: &Path) -> Result<Vec<RawRecord>> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| EtbError::Xlsx(format!("Failed to open {}: {e}", path.display())))?;
    let file = path.display().to_string();
    let sheet_names = workbook.sheet_names().to_owned();

    let mut first_err: Option<EtbError> = None;
    for name in &sheet_names {
        let Ok(range) = workbook.worksheet_range(name) else {
            continue;
        };
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|r| r.iter().map(cell_to_string).collect())
            .collect();
        match extract_records(&rows, &file) {
            Ok(records) if !records.is_empty() => return Ok(records),
            Ok(_) => {}
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    Err(first_err.unwrap_or(EtbError::MissingColumn {
        column: HEADER_VARIANTS[0].0.to_string(),
        file,
    }))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn is_spreadsheet(path: &Path) -> bool {
    path.extension().map_or(false, |e| {
        e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xls") || e.eq_ignore_ascii_case("xlsm")
    })
}

/// Read raw records from an ETB publication file, CSV or XLSX by extension.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    if is_spreadsheet(path) {
        #[cfg(feature = "xlsx")]
        {
            return read_xlsx(path);
        }
        #[cfg(not(feature = "xlsx"))]
        {
            return Err(EtbError::Other(format!(
                "{} is a spreadsheet but decile was built without the xlsx feature",
                path.display()
            )));
        }
    }
    read_csv(path)
}

/// Load and normalize: the one call the CLI makes per input file.
pub fn load(path: &Path) -> Result<Vec<Observation>> {
    let records = read_records(path)?;
    transform::normalize(&records, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Decile;

    fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_canon_strips_punctuation_and_case() {
        assert_eq!(canon("Financial year ending"), "financialyearending");
        assert_eq!(canon("Sub-component"), "subcomponent");
        assert_eq!(canon("Sub component."), "subcomponent");
        assert_eq!(canon("\u{a3} per year"), "peryear");
        assert_eq!(canon("Decile  group "), "decilegroup");
    }

    #[test]
    fn test_load_csv_with_preamble_and_variant_headers() {
        let dir = tempfile::tempdir().unwrap();
        let content = "\
Effects of taxes and benefits on household income
Table 14: all households

Financial year ending,Household group,Decile group,Component,Sub component.,\u{a3} per year
2019,All,bottom,Gross income,Equivalised gross income,\"10,000\"
2019,All,bottom,Direct benefits in cash,Total cash benefits,4700
2019,All,top,Benefits in kind,National Health Service,..

Source: Office for National Statistics
";
        let path = write_csv(dir.path(), "etb.csv", content);
        let obs = load(&path).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].year, 2019);
        assert_eq!(obs[0].decile, Decile::Bottom);
        assert_eq!(obs[0].amount, Some(10000.0));
        assert_eq!(obs[1].amount, Some(4700.0));
        // ".." is a suppression marker, not a zero
        assert_eq!(obs[2].amount, None);
    }

    #[test]
    fn test_load_csv_missing_column_names_offender() {
        let dir = tempfile::tempdir().unwrap();
        let content = "\
Financial year ending,Household group,Decile group,Component,\u{a3} per year
2019,All,bottom,Gross income,10000
";
        let path = write_csv(dir.path(), "etb.csv", content);
        let err = load(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Sub-component"), "got: {msg}");
        assert!(msg.contains("etb.csv"), "got: {msg}");
    }

    #[test]
    fn test_load_csv_no_header_at_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "junk.csv", "a,b,c\n1,2,3\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, EtbError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_csv_bad_decile_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let content = "\
Financial year ending,Household group,Decile group,Component,Sub-component,\u{a3} per year
2019,All,twelfth,Gross income,Equivalised gross income,10000
";
        let path = write_csv(dir.path(), "etb.csv", content);
        let err = load(&path).unwrap_err();
        assert!(matches!(err, EtbError::UnknownDecile { .. }), "got: {err}");
    }

    #[test]
    fn test_load_csv_fiscal_year_form() {
        let dir = tempfile::tempdir().unwrap();
        let content = "\
Financial year ending,Household group,Decile group,Component,Sub-component,\u{a3} per year
2018/19,All,second,Gross income,Equivalised gross income,12000
";
        let path = write_csv(dir.path(), "etb.csv", content);
        let obs = load(&path).unwrap();
        assert_eq!(obs[0].year, 2019);
        assert_eq!(obs[0].decile, Decile::Second);
    }

    #[test]
    fn test_read_records_preserves_raw_strings() {
        let dir = tempfile::tempdir().unwrap();
        let content = "\
Financial year ending,Household group,Decile group,Component,Sub-component,\u{a3} per year
2019,All,bottom,Cash benefits,Total cash benefits,4700
";
        let path = write_csv(dir.path(), "etb.csv", content);
        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        // Alias mapping happens in normalize, not here
        assert_eq!(records[0].component, "Cash benefits");
    }
}
