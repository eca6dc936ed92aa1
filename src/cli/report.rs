use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::{pct, pounds};
use crate::loader;
use crate::models::{Decile, RatioRow, StageRow, BY_DECILE, STAGES};
use crate::transform::{self, LabelFilter};

fn decile_header(present: &[Decile]) -> Vec<Cell> {
    let mut cells = vec![Cell::new("")];
    for d in present {
        cells.push(Cell::new(d.as_str()));
    }
    cells
}

fn present_deciles<T>(rows: &[T], decile_of: impl Fn(&T) -> Decile) -> Vec<Decile> {
    BY_DECILE
        .iter()
        .copied()
        .filter(|d| rows.iter().any(|r| decile_of(r) == *d))
        .collect()
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

pub fn stages(file: &str, year: Option<i32>) -> Result<()> {
    let obs = loader::load(Path::new(file))?;
    let Some(year) = year.or_else(|| transform::latest_year(&obs)) else {
        println!("No data in {file}.");
        return Ok(());
    };
    let rows = transform::stage_table(&obs, year);
    if rows.is_empty() {
        println!("No data for financial year ending {year}.");
        return Ok(());
    }

    let deciles = present_deciles(&rows, |r: &StageRow| r.decile);
    let mut table = Table::new();
    table.set_header(decile_header(&deciles));
    for stage in STAGES {
        if !rows.iter().any(|r| r.stage == stage) {
            continue;
        }
        let mut cells = vec![Cell::new(stage.label().bold())];
        for d in &deciles {
            let amount = rows
                .iter()
                .find(|r| r.stage == stage && r.decile == *d)
                .map(|r| pounds(r.amount))
                .unwrap_or_default();
            cells.push(Cell::new(amount));
        }
        table.add_row(cells);
    }
    println!("Equivalised income by stage, FYE {year}\n{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

fn render_ratio(title: &str, rows: &[RatioRow]) {
    if rows.is_empty() {
        println!("No rows matched.");
        return;
    }
    let deciles = present_deciles(rows, |r: &RatioRow| r.decile);
    let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    years.dedup();

    let mut table = Table::new();
    let mut header = decile_header(&deciles);
    header[0] = Cell::new("FYE");
    table.set_header(header);
    for year in years {
        let mut cells = vec![Cell::new(year)];
        for d in &deciles {
            let value = rows
                .iter()
                .find(|r| r.year == year && r.decile == *d)
                .map(|r| pct(r.pct))
                .unwrap_or_default();
            cells.push(Cell::new(value));
        }
        table.add_row(cells);
    }
    println!("{title}\n{table}");
}

pub fn ratio(file: &str, numerator: &LabelFilter, denominator: &LabelFilter) -> Result<()> {
    let obs = loader::load(Path::new(file))?;
    let rows = transform::ratio_table(&obs, numerator, denominator);
    render_ratio(
        &format!(
            "{} as a share of {}",
            numerator.label(),
            denominator.label()
        ),
        &rows,
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

pub fn composition(
    file: &str,
    component: &str,
    year_range: Option<(i32, i32)>,
) -> Result<()> {
    let obs = loader::load(Path::new(file))?;
    let rows = transform::composition_table(&obs, component, year_range);
    if rows.is_empty() {
        println!("No rows matched component '{component}'.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["FYE", "Decile", "Sub-component", "Amount"]);
    for r in &rows {
        table.add_row(vec![
            Cell::new(r.year),
            Cell::new(r.decile.as_str()),
            Cell::new(&r.sub_component),
            Cell::new(pounds(r.amount)),
        ]);
    }
    println!("{component} by decile and sub-component\n{table}");
    Ok(())
}
