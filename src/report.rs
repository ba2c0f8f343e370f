// src/report.rs
// =============================================================================
// The per-page result and how it is printed.
//
// Plain output is "<url> <count>", exactly one line per page. With --json
// the same data is printed as one compact JSON object per line, so the
// output can be piped into tools that read JSON lines.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

// The result of inspecting one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlReport {
    /// The URL exactly as given on the command line
    pub url: String,
    /// Number of distinct external references found on the page
    pub external_links: usize,
}

impl UrlReport {
    pub fn new(url: impl Into<String>, external_links: usize) -> Self {
        Self {
            url: url.into(),
            external_links,
        }
    }

    /// "<url> <count>"
    pub fn line(&self) -> String {
        format!("{} {}", self.url, self.external_links)
    }
}

/// Writes one report as a single line and flushes, so each line appears as
/// soon as its page is done.
pub fn write_report<W: Write>(out: &mut W, report: &UrlReport, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", report.line())?;
    }
    out.flush()?;
    Ok(())
}
