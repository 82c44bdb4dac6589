//! Rendering of check results

use clap::ValueEnum;
use colored::Colorize;
use query_directives::{ListDirectives, ParseError};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable, colored
    Text,
    /// Machine-readable JSON
    Json,
}

pub fn accepted(directives: &ListDirectives, format: Format) -> String {
    match format {
        Format::Json => json!({ "accepted": true, "directives": directives }).to_string(),
        Format::Text => {
            let mut lines = vec![format!("{} query accepted", "✓".green().bold())];

            if directives.filters.is_empty() {
                lines.push(format!("  {} {}", "filters:".bold(), "none".dimmed()));
            } else {
                lines.push(format!("  {}", "filters:".bold()));
                for criterion in &directives.filters {
                    lines.push(format!(
                        "    {} {} {}",
                        criterion.property.cyan(),
                        criterion.rule.name(),
                        criterion.value.as_deref().unwrap_or_default()
                    ));
                }
            }

            let sort = directives
                .sort
                .as_ref()
                .map_or_else(|| "none".dimmed().to_string(), ToString::to_string);
            lines.push(format!("  {} {}", "sort:".bold(), sort));

            let page = directives.pagination;
            lines.push(format!(
                "  {} page {} limit {} offset {}",
                "pagination:".bold(),
                page.page,
                page.limit,
                page.offset
            ));

            lines.join("\n")
        }
    }
}

pub fn rejected(error: &ParseError, format: Format) -> String {
    match format {
        Format::Json => json!({
            "accepted": false,
            "code": error.code(),
            "error": error.to_string(),
        })
        .to_string(),
        Format::Text => format!(
            "{} query rejected [{}]: {}",
            "✗".red().bold(),
            error.code().yellow(),
            error
        ),
    }
}
