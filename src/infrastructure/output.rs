// JSON output - Writes the result document to a file or stdout
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for OutputSink {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(OutputSink::Stdout, OutputSink::File)
    }
}

pub fn render_json<T: Serialize>(document: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

pub fn write_document<T: Serialize>(document: &T, sink: &OutputSink) -> anyhow::Result<()> {
    let json = render_json(document).context("Failed to serialize results")?;

    match sink {
        OutputSink::Stdout => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write results to stdout")?;
        }
        OutputSink::File(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            tracing::info!("Results saved to: {}", path.display());
        }
    }
    Ok(())
}
