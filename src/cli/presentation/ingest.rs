//! Ingest presentation: the status line shown after every pipeline run.

use crate::pipeline::IngestOutcome;
use owo_colors::OwoColorize;

pub fn format_ingest_summary(outcome: &IngestOutcome, color: bool) -> String {
    let mut lines = Vec::new();

    let headline = if outcome.new_data {
        let n = outcome.processed().count();
        format!("New CSV data loaded ({} file{}).", n, if n == 1 { "" } else { "s" })
    } else {
        "No CSV changes; using previously merged data.".to_string()
    };
    lines.push(match (color, outcome.new_data) {
        (true, true) => headline.green().to_string(),
        (true, false) => headline.blue().to_string(),
        (false, _) => headline,
    });

    for failure in &outcome.failures {
        let line = format!("Failed to read {}", failure);
        lines.push(if color { line.red().to_string() } else { line });
    }

    match (outcome.dataset.first(), outcome.dataset.latest()) {
        (Some(first), Some(last)) => lines.push(format!(
            "Dataset: {} day{} from {} to {}",
            outcome.dataset.len(),
            if outcome.dataset.len() == 1 { "" } else { "s" },
            first.day(),
            last.day()
        )),
        _ => lines.push("Dataset: empty".to_string()),
    }

    lines.join("\n")
}
