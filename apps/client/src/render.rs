//! Terminal rendering of controller state. Pure functions returning strings;
//! `main` decides where they are printed.

use colored::{ColoredString, Colorize};

use crate::analysis::{Wizard, WizardStep};
use crate::models::{AnalysisResult, RingColor};

fn ring(text: String, color: RingColor) -> ColoredString {
    match color {
        RingColor::Green => text.green().bold(),
        RingColor::Blue => text.blue().bold(),
        RingColor::Red => text.red().bold(),
    }
}

/// One-line stepper, e.g. `[x] 1. Upload CV  [>] 2. Paste JD  [ ] 3. Analyze`.
pub fn render_wizard(wizard: &Wizard) -> String {
    wizard
        .steps()
        .iter()
        .map(|status| {
            let marker = if status.done {
                "[x]"
            } else if status.active {
                "[>]"
            } else {
                "[ ]"
            };
            format!("{marker} {}", status.step.label())
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// What to supply next, or `None` once the form can be analyzed.
pub fn render_wizard_hint(wizard: &Wizard) -> Option<&'static str> {
    if wizard.ready_to_analyze() {
        return None;
    }
    match wizard.current_step() {
        WizardStep::UploadCv => Some("Next: choose a CV with --cv"),
        _ => Some("Next: give the job description with --jd or --jd-file"),
    }
}

pub fn render_result(result: &AnalysisResult, api_base_url: &str) -> String {
    let advice = result.advice();
    let mut lines = vec![
        format!(
            "{} {}",
            "Overall Match:".bold(),
            ring(format!("{}%", result.match_score), result.ring_color())
        ),
        format!("{}: {}", advice.label(), advice.recommendation()),
    ];

    if let Some(url) = result.report_url(api_base_url) {
        lines.push(format!("{} {}", "PDF report:".bold(), url.underline()));
    }

    lines.push(String::new());
    lines.push("Breakdown".bold().to_string());
    for (category, value) in result.breakdown.categories() {
        lines.push(format!("  {category:<12}{value:>3}%"));
    }

    lines.push(String::new());
    lines.push("Top Suggestions".bold().to_string());
    if result.suggestions.is_empty() {
        lines.push("  - None".dimmed().to_string());
    }
    for suggestion in &result.suggestions {
        lines.push(format!("  - {suggestion}"));
    }

    if let Some(warning) = &result.email_warning {
        lines.push(String::new());
        lines.push(format!("{} {warning}", "Email not sent:".yellow().bold()));
    }

    lines.join("\n")
}
