use crate::application::dashboard_service::OutputMode;
use crate::domain::report::TimeRange;
use crate::infrastructure::config::SettingsOverrides;
use crate::infrastructure::output::OutputSink;
use crate::infrastructure::time_expr::{TimeExprError, parse_time_expr};
use chrono::{DateTime, Local};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Query a Datadog dashboard and execute all widget queries
#[derive(Parser, Debug, Clone)]
#[command(name = "dashboard-query", version, about, long_about = None)]
pub struct Cli {
    /// Dashboard ID to query
    #[arg(long)]
    pub dashboard_id: Option<String>,

    /// Search for a dashboard by title
    #[arg(long)]
    pub search: Option<String>,

    /// List all dashboards
    #[arg(long)]
    pub list: bool,

    /// Start time (YYYY-MM-DD HH:MM:SS, "1h ago", "now")
    #[arg(long, default_value = "1h ago")]
    pub from_time: String,

    /// End time (YYYY-MM-DD HH:MM:SS, "1h ago", "now")
    #[arg(long, default_value = "now")]
    pub to_time: String,

    /// Output file path (default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Summarize series instead of returning raw data (always on unless --raw)
    #[arg(long)]
    pub analyze: bool,

    /// Return raw timeseries instead of the analyzed summary
    #[arg(long)]
    pub raw: bool,

    /// Datadog API key (default: DD_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Datadog application key (default: DD_APP_KEY)
    #[arg(long)]
    pub app_key: Option<String>,

    /// Datadog site, e.g. datadoghq.com (default: DD_SITE or datadoghq.eu)
    #[arg(long)]
    pub site: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("--dashboard-id or --search required")]
    MissingDashboard,
    #[error(transparent)]
    Time(#[from] TimeExprError),
}

impl Cli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            api_key: self.api_key.clone(),
            app_key: self.app_key.clone(),
            site: self.site.clone(),
        }
    }

    /// `--analyze` never switches the mode; only `--raw` does.
    pub fn output_mode(&self) -> OutputMode {
        if self.raw {
            OutputMode::Raw
        } else {
            OutputMode::Analyze
        }
    }

    pub fn output_sink(&self) -> OutputSink {
        OutputSink::from(self.output.clone())
    }

    pub fn time_window(&self, now: DateTime<Local>) -> Result<TimeRange, InputError> {
        let from = parse_time_expr(&self.from_time, now)?;
        let to = parse_time_expr(&self.to_time, now)?;
        if from > to {
            tracing::warn!("--from-time {} is after --to-time {}", from, to);
        }
        Ok(TimeRange::new(&from, &to))
    }
}
