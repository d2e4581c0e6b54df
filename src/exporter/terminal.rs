// file: src/exporter/terminal.rs
// description: console rendering of support items and labelled report sections

use crate::models::{AnalysisReport, SupportItem};
use crate::utils::logging::{format_heading, format_warning};
use colored::*;
use std::fmt::Write;

pub fn render_item(item: &SupportItem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format_heading("Support Item Details"));
    let _ = writeln!(out, "{} {}", "Name:".bold(), item.display_name);
    let _ = writeln!(out, "{} {}", "Ref No.:".bold(), item.reference_code);
    let _ = writeln!(out, "{} {}", "Description:".bold(), item.description);

    for (field, value) in &item.extra {
        if !value.is_empty() {
            let _ = writeln!(out, "{} {}", format!("{}:", field).dimmed(), value);
        }
    }

    out
}

/// Item details followed by one block per section, in order. The style's
/// sources note is appended under the last section.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = render_item(&report.item);

    if let Some(context) = &report.context {
        let _ = writeln!(out, "{} {}", "Context:".bold(), context);
    }

    let last = report.sections.last().map(|s| s.index);
    for section in &report.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", format_heading(&section.label));
        if section.found {
            let _ = writeln!(out, "{}", section.body);
        } else {
            let _ = writeln!(out, "{}", format_warning(&section.body));
        }

        if Some(section.index) == last {
            if let Some(note) = report.prompt_style.sources_note() {
                let _ = writeln!(out, "\n{}", note.italic());
            }
        }
    }

    let _ = writeln!(
        out,
        "\n{}",
        format!("{} · {} · {}", report.model, report.id, report.generated_at.to_rfc3339()).dimmed()
    );
    out
}
