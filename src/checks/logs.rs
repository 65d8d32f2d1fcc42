//! Log scan check.
//!
//! Looks at the last `log_tail_lines` lines of each configured log file
//! for error keywords. Files that do not exist are skipped.

use crate::{CheckResult, Severity, VerifierContext};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

pub const SEVERITY: Severity = Severity::Warning;

/// Matched lines kept per file for the report
const SAMPLE_LINES: usize = 5;

/// Bytes read per backwards step
const TAIL_CHUNK: u64 = 64 * 1024;

/// Scan result for one file
#[derive(Debug, Clone, PartialEq)]
pub struct LogScan {
    pub path: String,
    pub matches: usize,
    pub samples: Vec<String>,
}

/// Execute the log scan check
pub fn run(ctx: &VerifierContext) -> CheckResult {
    let config = &ctx.config;
    let mut scanned = 0;
    let mut findings = Vec::new();
    let mut unreadable = Vec::new();

    for path in config.log_file_paths() {
        if !path.exists() {
            continue;
        }
        match scan_file(&path, config.log_tail_lines, &config.error_patterns) {
            Ok(scan) => {
                scanned += 1;
                if scan.matches > 0 {
                    findings.push(scan);
                }
            }
            Err(e) => unreadable.push(format!("{}: {}", path.display(), e)),
        }
    }

    if findings.is_empty() && unreadable.is_empty() {
        return if scanned == 0 {
            CheckResult::skip("No log files found")
        } else {
            CheckResult::pass(format!(
                "No errors in the last {} lines of {} log files",
                config.log_tail_lines, scanned
            ))
        };
    }

    let mut details: Vec<String> = findings
        .iter()
        .map(|f| format!("{} ({} matches): {}", f.path, f.matches, f.samples.join(" | ")))
        .collect();
    details.extend(unreadable.iter().map(|u| format!("unreadable {}", u)));

    let total: usize = findings.iter().map(|f| f.matches).sum();
    let message = if findings.is_empty() {
        format!("{} log files could not be read", unreadable.len())
    } else {
        format!("{} error lines in {} log files", total, findings.len())
    };
    CheckResult::unmet(SEVERITY, message, details.join("; "))
}

/// Scan the tail of one file.
pub fn scan_file(path: &Path, tail_lines: usize, patterns: &[String]) -> Result<LogScan, String> {
    let content = read_tail(path, tail_lines).map_err(|e| e.to_string())?;
    let lines: Vec<&str> = content.lines().collect();
    let matched = matching_lines(&lines, patterns);

    Ok(LogScan {
        path: path.display().to_string(),
        matches: matched.len(),
        samples: matched
            .into_iter()
            .take(SAMPLE_LINES)
            .map(|l| l.trim().to_string())
            .collect(),
    })
}

/// Read backwards from the end of `path` until the last `n` lines are
/// complete. Only that trailing window is held in memory.
pub fn read_tail(path: &Path, n: usize) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut pos = file.metadata()?.len();
    let mut window: Vec<u8> = Vec::new();
    let mut newlines = 0;

    // n + 1 newlines guarantee the earliest wanted line starts inside the window
    while pos > 0 && newlines <= n {
        let chunk = TAIL_CHUNK.min(pos);
        pos -= chunk;
        file.seek(SeekFrom::Start(pos))?;
        let mut buf = vec![0; chunk as usize];
        file.read_exact(&mut buf)?;
        newlines += buf.iter().filter(|&&b| b == b'\n').count();
        buf.extend_from_slice(&window);
        window = buf;
    }

    let content = String::from_utf8_lossy(&window);
    Ok(tail(&content, n).join("\n"))
}

/// Last `n` lines of `content`, in file order.
pub fn tail(content: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}

/// Lines containing any pattern, case-insensitively.
pub fn matching_lines<'a>(lines: &[&'a str], patterns: &[String]) -> Vec<&'a str> {
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
    lines
        .iter()
        .filter(|line| {
            let lower = line.to_lowercase();
            patterns.iter().any(|p| lower.contains(p.as_str()))
        })
        .copied()
        .collect()
}
