//! Output formatting.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: `colored` drops escape codes on its own; `--no-color`
//!   and NO_COLOR disable them explicitly
//! - Empty reports: produce valid output with zero checks
//!
//! All formatters produce valid output for any ValidationReport input.

use crate::cli::args::OutputFormat;
use crate::engine::result::{ResultSummary, ValidationReport};
use crate::CheckResult;
use colored::{Color, Colorize};
use serde::Serialize;

const RULE: &str =
    "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a validation report into a string
    fn format(&self, report: &ValidationReport) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_check(&self, id: &str, name: &str, result: Option<&CheckResult>) -> String {
        let (status, message, details, duration_ms) = match result {
            Some(CheckResult::Pass {
                message,
                duration_ms,
            }) => (self.paint("[PASS]", Color::Green), message.as_str(), None, *duration_ms),
            Some(CheckResult::Warn {
                message,
                details,
                duration_ms,
            }) => (
                self.paint("[WARN]", Color::Yellow),
                message.as_str(),
                Some(details.as_str()),
                *duration_ms,
            ),
            Some(CheckResult::Fail {
                message,
                details,
                duration_ms,
                ..
            }) => (
                self.paint("[FAIL]", Color::Red),
                message.as_str(),
                Some(details.as_str()),
                *duration_ms,
            ),
            Some(CheckResult::Skip { reason }) => (self.dim("[SKIP]"), reason.as_str(), None, 0),
            None => (self.dim("[----]"), "Not executed", None, 0),
        };

        let mut line = format!("  {} {}: {} ({})", status, id, name, message);
        if self.verbose {
            line.push_str(&format!(" [{}ms]", duration_ms));
        }
        line.push('\n');
        if let Some(details) = details.filter(|d| !d.is_empty()) {
            line.push_str(&format!("         -> {}\n", details));
        }
        line
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        // Header
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!("{}\n", report.title));
        output.push_str(&format!("Host: {}\n", report.hostname));
        output.push_str(&format!(
            "Timestamp: {}\n",
            report.timestamp.format("%Y-%m-%dT%H:%M:%SZ")
        ));
        output.push_str(RULE);
        output.push_str("\n\n");

        for check in &report.checks {
            let shown = match &check.result {
                Some(CheckResult::Pass { .. }) | Some(CheckResult::Skip { .. }) | None => !self.quiet,
                _ => true,
            };
            if shown {
                output.push_str(&self.format_check(&check.id, &check.name, check.result.as_ref()));
                if self.verbose {
                    output.push_str(&self.dim(&format!(
                        "         {} ({})\n",
                        check.description, check.severity
                    )));
                }
            }
        }
        output.push('\n');

        // Summary
        let summary = report.summary();
        let failed = report.failed_checks();
        let warned = report.warned_checks();
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} passed, {} warnings, {} failed, {} skipped\n",
            summary.passed, summary.warned, summary.failed, summary.skipped
        ));
        if !failed.is_empty() {
            output.push_str(&format!("Failed checks: {}\n", failed.join(", ")));
        }
        if !warned.is_empty() {
            output.push_str(&format!("Warnings: {}\n", warned.join(", ")));
        }
        output.push_str(&format!(
            "Total time: {:.1}s\n",
            report.total_duration_ms as f64 / 1000.0
        ));

        let exit_code = report.exit_code();
        let verdict = if exit_code == 0 {
            self.paint("all checks passed", Color::Green)
        } else {
            self.paint("failures detected", Color::Red)
        };
        output.push_str(&format!("Exit code: {} ({})\n", exit_code, verdict));
        output.push_str(RULE);

        output
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a ValidationReport,
    summary: ResultSummary,
    failed_checks: Vec<&'a str>,
    warned_checks: Vec<&'a str>,
    exit_code: i32,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let doc = JsonReport {
            report,
            summary: report.summary(),
            failed_checks: report.failed_checks(),
            warned_checks: report.warned_checks(),
            exit_code: report.exit_code(),
        };
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        };
        // Serializing plain strings and numbers cannot fail
        rendered.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

/// JUnit XML formatter
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }
}

impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        let failures = report.failed_checks().len();
        let time = report.total_duration_ms as f64 / 1000.0;
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total, failures, summary.skipped, time
        ));
        output.push_str(&format!(
            "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            Self::escape_xml(&report.title),
            summary.total,
            failures,
            summary.skipped,
            time
        ));

        for check in &report.checks {
            let time = check.result.as_ref().map_or(0, CheckResult::duration_ms);
            output.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"deploy-preflight.{}\" time=\"{:.3}\"",
                Self::escape_xml(&check.name),
                Self::escape_xml(&check.id),
                time as f64 / 1000.0
            ));

            match &check.result {
                Some(CheckResult::Pass { message, .. }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <system-out>{}</system-out>\n",
                        Self::escape_xml(message)
                    ));
                    output.push_str("    </testcase>\n");
                }
                Some(CheckResult::Warn { message, details, .. }) if report.strict => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <failure message=\"{}\">{}</failure>\n",
                        Self::escape_xml(message),
                        Self::escape_xml(details)
                    ));
                    output.push_str("    </testcase>\n");
                }
                Some(CheckResult::Warn { message, details, .. }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <system-out>WARNING: {} - {}</system-out>\n",
                        Self::escape_xml(message),
                        Self::escape_xml(details)
                    ));
                    output.push_str("    </testcase>\n");
                }
                Some(CheckResult::Fail { message, details, .. }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <failure message=\"{}\">{}</failure>\n",
                        Self::escape_xml(message),
                        Self::escape_xml(details)
                    ));
                    output.push_str("    </testcase>\n");
                }
                Some(CheckResult::Skip { reason }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <skipped message=\"{}\" />\n",
                        Self::escape_xml(reason)
                    ));
                    output.push_str("    </testcase>\n");
                }
                None => {
                    output.push_str(" />\n");
                }
            }
        }

        output.push_str("  </testsuite>\n");
        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    color: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}
