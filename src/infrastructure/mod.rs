// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod datadog_client;
pub mod output;
pub mod time_expr;
