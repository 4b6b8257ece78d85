// Command flows - list, search and query, mapped to exit codes
use crate::application::catalog_service::DashboardCatalog;
use crate::application::dashboard_api::DashboardApi;
use crate::application::dashboard_service::DashboardQueryService;
use crate::domain::dashboard::DashboardSummary;
use crate::domain::extraction::ExtractorTable;
use crate::infrastructure::config::{SettingsError, load_datadog_settings};
use crate::infrastructure::datadog_client::DatadogClient;
use crate::infrastructure::output::write_document;
use crate::presentation::cli::{Cli, InputError};
use anyhow::Context;
use chrono::{DateTime, Local};
use std::process::ExitCode;
use std::sync::Arc;

/// What a `--search` lookup resolved to.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchResolution {
    NoMatch,
    Use(String),
    Ambiguous,
}

/// A single match is used directly; several need an explicit `--dashboard-id`.
pub fn resolve_search(matches: &[DashboardSummary], explicit_id: Option<&str>) -> SearchResolution {
    match (matches, explicit_id) {
        ([], _) => SearchResolution::NoMatch,
        ([only], _) => SearchResolution::Use(only.id.clone()),
        (_, Some(id)) => SearchResolution::Use(id.to_string()),
        (_, None) => SearchResolution::Ambiguous,
    }
}

/// How a command ended; mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let exit = match load_datadog_settings(&cli.overrides()) {
        Ok(settings) => {
            let client = DatadogClient::new(&settings)?;
            tracing::debug!("Using Datadog API at {}", client.base_url());
            execute(&cli, Arc::new(client), Local::now()).await?
        }
        Err(e) => settings_failure(e)?,
    };
    Ok(exit.into())
}

/// Missing credentials end the run with a hint; anything else is an error.
fn settings_failure(error: SettingsError) -> anyhow::Result<Exit> {
    match error {
        SettingsError::MissingCredentials => {
            eprintln!("Error: Datadog API credentials required");
            eprintln!("Set DD_API_KEY and DD_APP_KEY environment variables");
            eprintln!("Or use --api-key and --app-key arguments");
            Ok(Exit::Failure)
        }
        other => Err(other.into()),
    }
}

/// Run the command selected by `cli` against `api`, resolving relative
/// times against `now`.
pub async fn execute(cli: &Cli, api: Arc<dyn DashboardApi>, now: DateTime<Local>) -> anyhow::Result<Exit> {
    let catalog = DashboardCatalog::new(api.clone());

    if cli.list {
        tracing::info!("Fetching dashboards...");
        let dashboards = catalog.list().await.context("Failed to list dashboards")?;
        println!("Found {} dashboards:\n", dashboards.len());
        print_dashboards(&dashboards);
        return Ok(Exit::Success);
    }

    let window = match cli.time_window(now) {
        Ok(window) => window,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(Exit::Failure);
        }
    };

    let dashboard_id = match &cli.search {
        Some(text) => {
            tracing::info!("Searching for dashboards matching: {}", text);
            let matches = catalog
                .search(text)
                .await
                .context("Failed to search dashboards")?;

            if !matches.is_empty() {
                println!("Found {} matching dashboard(s):\n", matches.len());
                print_dashboards(&matches);
            }

            match resolve_search(&matches, cli.dashboard_id.as_deref()) {
                SearchResolution::NoMatch => {
                    println!("No dashboards found matching the query");
                    return Ok(Exit::Failure);
                }
                SearchResolution::Ambiguous => {
                    println!("Multiple dashboards found. Please specify --dashboard-id");
                    return Ok(Exit::Success);
                }
                SearchResolution::Use(id) => {
                    tracing::info!("Using dashboard: {}", id);
                    Some(id)
                }
            }
        }
        None => cli.dashboard_id.clone(),
    };

    let Some(dashboard_id) = dashboard_id else {
        eprintln!("Error: {}", InputError::MissingDashboard);
        eprintln!("Use --list to see available dashboards");
        return Ok(Exit::Failure);
    };

    let service = DashboardQueryService::new(api, ExtractorTable::default());
    let document = match service
        .run_dashboard_query(&dashboard_id, &window, cli.output_mode())
        .await
    {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.status() == Some(404) {
                eprintln!("Use --list to see available dashboards");
            }
            return Ok(Exit::Failure);
        }
    };

    write_document(&document, &cli.output_sink())?;
    Ok(Exit::Success)
}

fn print_dashboards(dashboards: &[DashboardSummary]) {
    for dashboard in dashboards {
        println!("  {}: {}", dashboard.id, dashboard.display_title());
        if let Some(description) = dashboard.description.as_deref().filter(|d| !d.is_empty()) {
            println!("    Description: {}", description);
        }
        println!();
    }
}
