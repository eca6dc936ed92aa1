use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::loader;
use crate::transform;

pub fn run(file: &str) -> Result<()> {
    let obs = loader::load(Path::new(file))?;
    let summary = transform::summarize(&obs);

    if summary.rows == 0 {
        println!("No data in {file}.");
        return Ok(());
    }

    let years = match (summary.years.first(), summary.years.last()) {
        (Some(first), Some(last)) if first != last => format!("FYE {first}\u{2013}{last}"),
        (Some(only), _) => format!("FYE {only}"),
        _ => String::new(),
    };
    println!(
        "{} \u{2014} {} rows, {}, groups: {}",
        file.bold(),
        summary.rows,
        years,
        summary.groups.join(", ")
    );
    if summary.missing_amounts > 0 {
        println!(
            "{}",
            format!("{} rows carry no measured amount", summary.missing_amounts).yellow()
        );
    }

    let mut table = Table::new();
    table.set_header(vec!["Component", "Sub-components", "Rows"]);
    for c in &summary.components {
        table.add_row(vec![
            Cell::new(&c.component),
            Cell::new(c.sub_components.join(", ")),
            Cell::new(c.rows),
        ]);
    }
    println!("{table}");
    Ok(())
}
