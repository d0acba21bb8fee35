#![allow(clippy::module_name_repetitions)]

//! Interactive TUI for the incident survey.
//!
//! Prompts for a view and its filters with `dialoguer`, prints the result,
//! and repeats until the user quits.

use dialoguer::{Input, Select};
use incident_survey_analytics_models::{ALL, QueryParams};
use incident_survey_incident_models::Month;

use crate::session::{Session, print_json};

/// Views available in the interactive menu.
enum View {
    ByType,
    ByLocation,
    Hourly,
    HeatMap,
    UnitSummary,
    LoadReport,
    Quit,
}

impl View {
    const ALL: &[Self] = &[
        Self::ByType,
        Self::ByLocation,
        Self::Hourly,
        Self::HeatMap,
        Self::UnitSummary,
        Self::LoadReport,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ByType => "Incidents by call type",
            Self::ByLocation => "Incidents by location",
            Self::Hourly => "Hourly volume",
            Self::HeatMap => "Heat map points",
            Self::UnitSummary => "Call type by unit",
            Self::LoadReport => "Load report",
            Self::Quit => "Quit",
        }
    }

    const fn takes_filter(&self) -> bool {
        matches!(
            self,
            Self::ByType | Self::ByLocation | Self::Hourly | Self::HeatMap
        )
    }
}

/// Runs the interactive loop over a loaded session.
///
/// # Errors
///
/// Returns an error if a prompt fails or a result cannot be printed.
/// Invalid filter input is reported and the loop continues.
pub fn run(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", session.department.name);
    println!();

    let labels: Vec<&str> = View::ALL.iter().map(View::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to see?")
            .items(&labels)
            .default(0)
            .interact()?;
        let view = &View::ALL[idx];

        if matches!(view, View::Quit) {
            return Ok(());
        }

        let params = if view.takes_filter() {
            prompt_params(session)?
        } else {
            QueryParams::default()
        };

        let filter = match session.filter(&params) {
            Ok(filter) => filter,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match view {
            View::ByType => print_json(&session.by_type(&filter))?,
            View::ByLocation => print_json(&session.by_location(&filter, None))?,
            View::Hourly => print_json(&session.hourly(&filter))?,
            View::HeatMap => print_json(&session.heat_map(&filter))?,
            View::UnitSummary => print_json(session.engine.unit_summary())?,
            View::LoadReport => print_json(&session.report)?,
            View::Quit => {}
        }
        println!();
    }
}

/// Prompts for unit, time window and month.
fn prompt_params(session: &Session) -> Result<QueryParams, Box<dyn std::error::Error>> {
    let mut units = vec![ALL.to_string()];
    units.extend(session.department.units.iter().map(ToString::to_string));
    let unit_idx = Select::new()
        .with_prompt("Unit")
        .items(&units)
        .default(0)
        .interact()?;

    let start_time = prompt_optional_string("Start time HH:MM (empty for all hours)")?;
    let end_time = prompt_optional_string("End time HH:MM (empty for all hours)")?;

    let mut months = vec![ALL.to_string()];
    months.extend(Month::all().iter().map(ToString::to_string));
    let month_idx = Select::new()
        .with_prompt("Month")
        .items(&months)
        .default(0)
        .interact()?;

    Ok(QueryParams {
        start_time,
        end_time,
        month: Some(months[month_idx].clone()),
        unit: Some(units[unit_idx].clone()),
    })
}

fn prompt_optional_string(prompt: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim();
    Ok((!input.is_empty()).then(|| input.to_string()))
}
