//! Output formatters: colored console rendering and JSON

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{MatchReport, MatchSet};
use colored::{ColoredString, Colorize};

/// Formats a match report into a printable string.
pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
}

/// Console formatter with colored score badges.
pub struct ConsoleFormatter {
    use_colors: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn score_badge(&self, score: f64) -> ColoredString {
        let text = format!("{:>6.2}%", score);
        if !self.use_colors {
            return ColoredString::from(text.as_str());
        }
        match score {
            s if s >= 75.0 => text.green().bold(),
            s if s >= 50.0 => text.cyan(),
            s if s >= 25.0 => text.yellow(),
            _ => text.red(),
        }
    }

    fn header(&self, report: &MatchReport) -> String {
        format!(
            "{} match{} | model: {} | {} ms | {}\n",
            report.matches.len(),
            if report.matches.len() == 1 { "" } else { "es" },
            report.embedding_model,
            report.processing_time_ms,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&self.header(report));

        match &report.matches {
            MatchSet::Candidates(matches) => {
                for (rank, m) in matches.iter().enumerate() {
                    out.push_str(&format!(
                        "{:>3}. {} {} ({})\n     skills {:.2}% | experience {:.2}% | rate {:.2}% | {}\n",
                        rank + 1,
                        self.score_badge(m.match_score),
                        m.name,
                        m.freelancer_id,
                        m.skill_match,
                        m.experience_match,
                        m.rate_match,
                        m.skills.join(", "),
                    ));
                }
            }
            MatchSet::Jobs(matches) => {
                for (rank, m) in matches.iter().enumerate() {
                    out.push_str(&format!(
                        "{:>3}. {} {} ({})\n     skills {:.2}% | budget {:.2}% | {}\n",
                        rank + 1,
                        self.score_badge(m.match_score),
                        m.title,
                        m.job_id,
                        m.skill_match,
                        m.budget_match,
                        m.skills.join(", "),
                    ));
                }
            }
        }

        if report.matches.is_empty() {
            out.push_str("No matches.\n");
        }

        Ok(out)
    }
}

/// JSON formatter emitting the serialized report.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

/// Render a report in the requested output format.
pub fn render(report: &MatchReport, format: OutputFormat, use_colors: bool) -> Result<String> {
    match format {
        OutputFormat::Console => ConsoleFormatter::new(use_colors).format_report(report),
        OutputFormat::Json => JsonFormatter::new(true).format_report(report),
    }
}
