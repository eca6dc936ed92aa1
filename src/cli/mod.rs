pub mod export;
pub mod report;
pub mod summary;

use clap::{Parser, Subcommand, ValueEnum};

use crate::transform::LabelFilter;

#[derive(Parser)]
#[command(
    name = "decile",
    about = "Chart-ready income-distribution tables from the ONS Effects of Taxes and Benefits dataset."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show what the input file contains: years, groups, components.
    Summary {
        /// Path to the ETB table (XLSX or CSV)
        file: String,
    },
    /// Render a derived table in the terminal.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Write a derived table to a CSV or JSON file.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
}

/// Hierarchy level a ratio side filters on.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Level {
    Component,
    SubComponent,
}

impl Level {
    pub fn filter(&self, label: &str) -> LabelFilter {
        match self {
            Level::Component => LabelFilter::Component(label.to_string()),
            Level::SubComponent => LabelFilter::SubComponent(label.to_string()),
        }
    }
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income at each of the five stages, by decile.
    Stages {
        /// Path to the ETB table (XLSX or CSV)
        file: String,
        /// Financial year ending (default: latest in the data)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Cash benefits as a share of gross income, by year and decile.
    CashBenefits {
        file: String,
    },
    /// Benefits in kind as a share of final income, by year and decile.
    InKind {
        file: String,
    },
    /// Arbitrary ratio of two labels, by year and decile.
    Ratio {
        file: String,
        /// Numerator label
        #[arg(long)]
        numerator: String,
        /// Denominator label
        #[arg(long)]
        denominator: String,
        /// Level the numerator filters on
        #[arg(long = "numerator-level", value_enum, default_value = "component")]
        numerator_level: Level,
        /// Level the denominator filters on
        #[arg(long = "denominator-level", value_enum, default_value = "sub-component")]
        denominator_level: Level,
    },
    /// Sub-component breakdown of one component, by year and decile.
    Composition {
        file: String,
        /// Component to break down
        #[arg(long, default_value = "Benefits in kind")]
        component: String,
        /// Single financial year ending
        #[arg(long)]
        year: Option<i32>,
        /// First financial year ending (inclusive)
        #[arg(long = "from-year")]
        from_year: Option<i32>,
        /// Last financial year ending (inclusive)
        #[arg(long = "to-year")]
        to_year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the stage-by-decile table.
    Stages {
        file: String,
        #[arg(long)]
        year: Option<i32>,
        /// Output path (default: ./decile-stages-YYYY-MM-DD.csv)
        #[arg(long)]
        output: Option<String>,
        /// Write JSON instead of CSV
        #[arg(long)]
        json: bool,
    },
    /// Export the cash-benefit share of gross income.
    CashBenefits {
        file: String,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Export the benefits-in-kind share of final income.
    InKind {
        file: String,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Export the composition breakdown of one component.
    Composition {
        file: String,
        #[arg(long, default_value = "Benefits in kind")]
        component: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long = "from-year")]
        from_year: Option<i32>,
        #[arg(long = "to-year")]
        to_year: Option<i32>,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

/// Collapse `--year` / `--from-year` / `--to-year` into one inclusive range.
pub(crate) fn year_range(
    year: Option<i32>,
    from_year: Option<i32>,
    to_year: Option<i32>,
) -> Option<(i32, i32)> {
    if let Some(y) = year {
        return Some((y, y));
    }
    match (from_year, to_year) {
        (Some(from), Some(to)) => Some((from, to)),
        (Some(from), None) => Some((from, i32::MAX)),
        (None, Some(to)) => Some((i32::MIN, to)),
        (None, None) => None,
    }
}

// The two charts the report is built around, as fixed label pairs.
pub(crate) fn cash_benefit_filters() -> (LabelFilter, LabelFilter) {
    (
        LabelFilter::Component("Direct benefits in cash".to_string()),
        LabelFilter::SubComponent("Gross income".to_string()),
    )
}

pub(crate) fn in_kind_filters() -> (LabelFilter, LabelFilter) {
    (
        LabelFilter::Component("Benefits in kind".to_string()),
        LabelFilter::SubComponent("Final income".to_string()),
    )
}
