//! Human-readable renderings of command payloads.
//!
//! JSON output is the serde form of the payload; these functions build the
//! Markdown and one-line summary forms. Everything returns a `String` so the
//! CLI decides where it goes.

use hs_common::{Error, ObservationRecord, Setting};
use hs_config::SpecTable;

use crate::inference::PosteriorEstimate;
use crate::layout::Island;
use crate::pipeline::AnalysisOutcome;
use crate::source::SourceFailure;

fn fmt_prob(value: f64) -> String {
    format!("{value:.3}")
}

fn fmt_cell(value: Option<f64>) -> String {
    value.map(fmt_prob).unwrap_or_else(|| "-".to_string())
}

fn table_row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cells: Vec<String> = cells.into_iter().map(|c| c.as_ref().to_string()).collect();
    format!("| {} |", cells.join(" | "))
}

fn table_rule(columns: usize) -> String {
    table_row(std::iter::repeat("---").take(columns))
}

/// Failed sources with their error code and a single remediation hint.
fn failed_sources_section(failures: &[SourceFailure]) -> Vec<String> {
    let errors: Vec<Error> = failures.iter().cloned().map(Error::from).collect();
    let Some(first) = errors.first() else {
        return Vec::new();
    };
    let mut lines = vec!["## Failed sources".to_string(), String::new()];
    for err in &errors {
        lines.push(format!("- [{}] {}", err.code(), err));
    }
    lines.push(String::new());
    lines.push(format!("> {}", first.remediation()));
    lines.push(String::new());
    lines
}

/// One line: counts, ratio and failures.
pub fn analysis_summary(outcome: &AnalysisOutcome) -> String {
    let kpis = &outcome.report.kpis;
    let mut line = format!(
        "{} machines from {}/{} sources, mean setting {:.1}, high-setting ratio {:.0}% ({})",
        kpis.machine_count,
        outcome.succeeded_sources,
        outcome.source_count,
        kpis.mean_most_likely_setting,
        kpis.high_setting_ratio,
        kpis.ratio_band,
    );
    if outcome.is_partial() {
        line.push_str(&format!(", {} source(s) failed", outcome.failures.len()));
    }
    line
}

/// Full Markdown report.
pub fn analysis_markdown(outcome: &AnalysisOutcome) -> String {
    let report = &outcome.report;
    let kpis = &report.kpis;
    let mut lines = vec![
        "# hall-scout analysis".to_string(),
        String::new(),
        table_row(["Machines", "Sources", "Mean setting", "High-setting ratio"]),
        table_rule(4),
        table_row([
            kpis.machine_count.to_string(),
            kpis.source_count.to_string(),
            format!("{:.1}", kpis.mean_most_likely_setting),
            format!("{:.0}% ({})", kpis.high_setting_ratio, kpis.ratio_band),
        ]),
        String::new(),
    ];

    lines.extend(failed_sources_section(&outcome.failures));

    lines.push("## End digits".to_string());
    lines.push(String::new());
    lines.push(table_row(["Digit", "Mean", "Median", "Std", "Count", ""]));
    lines.push(table_rule(6));
    for row in &report.end_digits {
        let marker = if row.summary.mean > report.end_digit_reference {
            "▲"
        } else {
            ""
        };
        lines.push(table_row([
            row.key.to_string(),
            fmt_prob(row.summary.mean),
            fmt_prob(row.summary.median),
            fmt_cell(row.summary.std_dev),
            row.summary.count.to_string(),
            marker.to_string(),
        ]));
    }
    if !report.top_end_digits.is_empty() {
        let top: Vec<String> = report
            .top_end_digits
            .iter()
            .map(|d| format!("{} ({})", d.end_digit, fmt_prob(d.mean_high_setting_probability)))
            .collect();
        lines.push(String::new());
        lines.push(format!("Top digits: {}", top.join(", ")));
    }
    lines.push(String::new());

    lines.push("## Hot machines".to_string());
    lines.push(String::new());
    if report.hot_machines.is_empty() {
        lines.push("None.".to_string());
    } else {
        lines.push(table_row(["Machine", "High-setting probability"]));
        lines.push(table_rule(2));
        for machine in &report.hot_machines {
            lines.push(table_row([
                machine.mid.to_string(),
                fmt_prob(machine.mean_high_setting_probability),
            ]));
        }
    }
    lines.push(String::new());

    lines.push(format!("## Islands ({})", report.islands.len()));
    lines.push(String::new());
    if !report.positions.is_empty() {
        lines.push(table_row(["Position", "Mean", "Median", "Std", "Count"]));
        lines.push(table_rule(5));
        for p in &report.positions {
            lines.push(table_row([
                p.position.to_string(),
                fmt_prob(p.summary.mean),
                fmt_prob(p.summary.median),
                fmt_cell(p.summary.std_dev),
                p.summary.count.to_string(),
            ]));
        }
        lines.push(String::new());
    }
    for (island, row) in report.islands.iter().zip(&report.heatmap) {
        let cells: Vec<String> = island
            .members()
            .iter()
            .zip(row)
            .map(|(mid, value)| format!("{mid}:{}", fmt_cell(*value)))
            .collect();
        lines.push(format!("- {}", cells.join(" ")));
    }
    lines.push(String::new());

    lines.push("## Daily".to_string());
    lines.push(String::new());
    lines.push(table_row(["Date", "Mean setting"]));
    lines.push(table_rule(2));
    for day in &report.daily {
        lines.push(table_row([
            day.date.clone(),
            format!("{:.2}", day.mean_most_likely_setting),
        ]));
    }
    lines.push(String::new());

    lines.push("## Setting distribution".to_string());
    lines.push(String::new());
    lines.push(table_row(Setting::ALL.iter().map(|s| s.to_string())));
    lines.push(table_rule(Setting::ALL.len()));
    lines.push(table_row(
        report.distribution.iter().map(|c| c.count.to_string()),
    ));

    lines.join("\n")
}

/// Posterior of a one-off estimate as a Markdown table.
pub fn estimate_markdown(
    model_name: &str,
    observation: &ObservationRecord,
    posterior: &PosteriorEstimate,
) -> String {
    let mut lines = vec![
        format!(
            "# {} ({} spins, {} small, {} big)",
            model_name, observation.spins, observation.small_wins, observation.big_wins
        ),
        String::new(),
        table_row(["Setting", "Posterior"]),
        table_rule(2),
    ];
    for setting in Setting::ALL {
        lines.push(table_row([
            setting.to_string(),
            fmt_prob(posterior.probability(setting)),
        ]));
    }
    lines.push(String::new());
    lines.push(format!(
        "Most likely: {}, high-setting probability: {}",
        posterior.most_likely_setting,
        fmt_prob(posterior.high_setting_probability)
    ));
    lines.join("\n")
}

pub fn estimate_summary(model_name: &str, posterior: &PosteriorEstimate) -> String {
    format!(
        "{}: most likely setting {}, P(5|6) = {}",
        model_name,
        posterior.most_likely_setting,
        fmt_prob(posterior.high_setting_probability)
    )
}

/// Islands with corner (`*`) markers.
pub fn islands_markdown(islands: &[Island]) -> String {
    let mut lines = vec![format!("# {} island(s)", islands.len()), String::new()];
    for (index, island) in islands.iter().enumerate() {
        let members: Vec<String> = island
            .positions()
            .map(|(id, position)| match position {
                crate::layout::Position::Corner => format!("*{id}"),
                crate::layout::Position::Center => id.to_string(),
            })
            .collect();
        lines.push(format!("{}. {}", index + 1, members.join(" ")));
    }
    lines.join("\n")
}

/// Spec table as one Markdown section per model.
pub fn specs_markdown(table: &SpecTable) -> String {
    let mut lines = vec![
        "# Spec table".to_string(),
        String::new(),
        format!("Default model: {}", table.default_model),
    ];
    for model in &table.models {
        lines.push(String::new());
        lines.push(format!("## {}", model.name));
        lines.push(String::new());
        lines.push(table_row(["Setting", "BB 1/x", "RB 1/x"]));
        lines.push(table_rule(3));
        for (setting, spec) in &model.settings {
            lines.push(table_row([
                setting.to_string(),
                format!("{:.1}", spec.big_interval),
                format!("{:.1}", spec.small_interval),
            ]));
        }
    }
    lines.join("\n")
}
