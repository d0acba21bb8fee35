#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the incident survey.
//!
//! Loads an incident export for a department and prints query results as
//! JSON. Run without a subcommand for an interactive session.

mod interactive;
mod session;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use incident_survey_analytics::colors;
use incident_survey_analytics_models::QueryParams;

use crate::session::{Session, print_json, resolve_csv_path, resolve_department};

#[derive(Parser)]
#[command(name = "incident_survey", about = "Incident query and aggregation tool")]
struct Cli {
    /// Incident CSV export (overrides `INCIDENT_SURVEY_CSV`)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,
    /// Department id (overrides `INCIDENT_SURVEY_DEPARTMENT`, default "danbury")
    #[arg(long, global = true)]
    department: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Filter flags shared by every query subcommand.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Start of the time-of-day window, inclusive (e.g., "22:00")
    #[arg(long)]
    start: Option<String>,
    /// End of the time-of-day window, exclusive (e.g., "06:00" or "24:00")
    #[arg(long)]
    end: Option<String>,
    /// Month name or number (e.g., "december" or "12")
    #[arg(long)]
    month: Option<String>,
    /// Responding unit (e.g., "E23"), or "ALL"
    #[arg(long)]
    unit: Option<String>,
}

impl FilterArgs {
    fn to_params(&self) -> QueryParams {
        QueryParams {
            start_time: self.start.clone(),
            end_time: self.end.clone(),
            month: self.month.clone(),
            unit: self.unit.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Incident counts per call type
    ByType {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Incident counts per address
    ByLocation {
        #[command(flatten)]
        filter: FilterArgs,
        /// Minimum incidents per address (defaults to the department threshold)
        #[arg(long)]
        min_count: Option<u64>,
    },
    /// Incident volume per hour of day
    Hourly {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Call type by unit cross tabulation over all records
    UnitSummary,
    /// Density map points for records with coordinates
    HeatMap {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Assign gradient colors to labels
    Colors {
        /// Palette name (e.g., "red", "dark_blue")
        #[arg(long, default_value = "red")]
        palette: String,
        /// Labels in chart order
        #[arg(required = true)]
        labels: Vec<String>,
    },
    /// List the department's units and stations
    Units,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let department = resolve_department(cli.department.as_deref())?;

    let Some(command) = cli.command else {
        let csv = resolve_csv_path(cli.csv)?;
        let session = Session::load(&csv, department)?;
        return interactive::run(&session);
    };

    match command {
        Commands::Colors { palette, labels } => {
            let palette = colors::parse_palette(&palette)?;
            print_json(&colors::assign_colors(&labels, palette))?;
        }
        Commands::Units => {
            let directory = department.station_directory();
            println!("{} ({})", department.name, department.id);
            println!("{:<8} STATION", "UNIT");
            println!("{}", "-".repeat(40));
            for unit in &department.units {
                let station = directory
                    .stations
                    .iter()
                    .find(|s| &s.unit == unit)
                    .map_or_else(
                        || "headquarters".to_string(),
                        |s| format!("{:.6}, {:.6}", s.latitude, s.longitude),
                    );
                println!("{unit:<8} {station}");
            }
        }
        command => {
            let csv = resolve_csv_path(cli.csv)?;
            let session = Session::load(&csv, department)?;
            run_query(&session, command)?;
        }
    }

    Ok(())
}

fn run_query(session: &Session, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::ByType { filter } => {
            let filter = session.filter(&filter.to_params())?;
            print_json(&session.by_type(&filter))?;
        }
        Commands::ByLocation { filter, min_count } => {
            let filter = session.filter(&filter.to_params())?;
            print_json(&session.by_location(&filter, min_count))?;
        }
        Commands::Hourly { filter } => {
            let filter = session.filter(&filter.to_params())?;
            print_json(&session.hourly(&filter))?;
        }
        Commands::HeatMap { filter } => {
            let filter = session.filter(&filter.to_params())?;
            print_json(&session.heat_map(&filter))?;
        }
        Commands::UnitSummary => print_json(session.engine.unit_summary())?,
        Commands::Colors { .. } | Commands::Units => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_filter_flags() {
        let cli = Cli::parse_from([
            "incident_survey",
            "by-type",
            "--start",
            "22:00",
            "--end",
            "06:00",
            "--unit",
            "E23",
        ]);
        let Some(Commands::ByType { filter }) = cli.command else {
            panic!("expected by-type");
        };
        let params = filter.to_params();
        assert_eq!(params.start_time.as_deref(), Some("22:00"));
        assert_eq!(params.end_time.as_deref(), Some("06:00"));
        assert_eq!(params.month, None);
        assert_eq!(params.unit.as_deref(), Some("E23"));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from([
            "incident_survey",
            "by-location",
            "--min-count",
            "3",
            "--csv",
            "calls.csv",
        ]);
        assert_eq!(cli.csv, Some(PathBuf::from("calls.csv")));
        assert!(matches!(
            cli.command,
            Some(Commands::ByLocation {
                min_count: Some(3),
                ..
            })
        ));
    }

    #[test]
    fn colors_requires_labels() {
        assert!(Cli::try_parse_from(["incident_survey", "colors"]).is_err());
    }
}
