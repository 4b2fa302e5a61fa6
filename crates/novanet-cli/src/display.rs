//! Human-readable output for selections and launch plans.

use std::path::Path;

use novanet_core::Selection;
use novanet_host::{LaunchRecord, ValidatorLaunch};

/// Render a selection as a short vertical card.
pub fn selection_card(selection: &Selection, model: &Path) -> String {
    let rows = [
        ("validator", selection.validator.to_string()),
        ("raw output", selection.raw.to_string()),
        ("output elements", selection.outputs.to_string()),
        ("model", model.display().to_string()),
    ];

    let mut out = String::from("=== Validator selection ===\n");
    for (label, value) in rows {
        out.push_str(&format!("  {label:<16} {value}\n"));
    }
    out
}

/// Render a launch plan as the equivalent shell command line.
pub fn launch_line(plan: &ValidatorLaunch) -> String {
    plan.envs()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .chain(plan.argv())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line summary of a finished validator run.
pub fn launch_summary(record: &LaunchRecord) -> String {
    format!(
        "validator {} ran `{}` for {} ms",
        record.validator,
        record.argv.join(" "),
        record.elapsed().num_milliseconds()
    )
}
