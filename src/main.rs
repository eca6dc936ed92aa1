mod cli;
mod error;
mod fmt;
mod loader;
mod models;
mod transform;

use clap::Parser;

use cli::{Cli, Commands, ExportCommands, ReportCommands};

fn main() {
    let args = Cli::parse();

    let result = match args.command {
        Commands::Summary { file } => cli::summary::run(&file),
        Commands::Report { command } => match command {
            ReportCommands::Stages { file, year } => cli::report::stages(&file, year),
            ReportCommands::CashBenefits { file } => {
                let (num, den) = cli::cash_benefit_filters();
                cli::report::ratio(&file, &num, &den)
            }
            ReportCommands::InKind { file } => {
                let (num, den) = cli::in_kind_filters();
                cli::report::ratio(&file, &num, &den)
            }
            ReportCommands::Ratio {
                file,
                numerator,
                denominator,
                numerator_level,
                denominator_level,
            } => cli::report::ratio(
                &file,
                &numerator_level.filter(&numerator),
                &denominator_level.filter(&denominator),
            ),
            ReportCommands::Composition {
                file,
                component,
                year,
                from_year,
                to_year,
            } => cli::report::composition(&file, &component, cli::year_range(year, from_year, to_year)),
        },
        Commands::Export { command } => match command {
            ExportCommands::Stages {
                file,
                year,
                output,
                json,
            } => cli::export::stages(&file, year, output, json),
            ExportCommands::CashBenefits { file, output, json } => {
                cli::export::cash_benefits(&file, output, json)
            }
            ExportCommands::InKind { file, output, json } => {
                cli::export::in_kind(&file, output, json)
            }
            ExportCommands::Composition {
                file,
                component,
                year,
                from_year,
                to_year,
                output,
                json,
            } => cli::export::composition(
                &file,
                &component,
                cli::year_range(year, from_year, to_year),
                output,
                json,
            ),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
