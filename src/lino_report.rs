//! Links Notation (Lino) Report Generator
//!
//! Benchmark results are recorded in Links Notation, a simple indentation
//! based format for structured data, and can be rendered as a markdown
//! table (see the `lino2md` binary).
//!
//! Format example:
//! ```text
//! results:
//!   size_1000000:
//!     radix_parallel:
//!       mode parallel
//!       workers 4
//!       time_ms 93.120
//!       verified true
//! ```

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// One benchmark measurement: one algorithm at one array size.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    /// Algorithm name ("radix_sequential", "radix_parallel",
    /// "radix_distributed", "std_sort").
    pub algorithm: String,
    /// Execution mode ("sequential", "parallel", "distributed").
    pub mode: String,
    /// Array size in elements.
    pub array_size: usize,
    /// Degree of parallelism, when the mode has one.
    pub workers: Option<usize>,
    /// Wall-clock time in milliseconds.
    pub time_ms: f64,
    /// Whether the output passed verification.
    pub verified: bool,
}

/// A complete benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// ISO 8601 timestamp of the run.
    pub timestamp: String,
    /// Free-form description.
    pub description: String,
    /// All measurements, in insertion order.
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    pub fn new(description: &str) -> Self {
        BenchmarkReport {
            timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            description: description.to_string(),
            results: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    fn sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.results.iter().map(|r| r.array_size).collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    fn find(&self, size: usize, algorithm: &str) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .find(|r| r.array_size == size && r.algorithm == algorithm)
    }

    /// Render the report in Links Notation.
    pub fn to_lino(&self) -> String {
        let mut output = String::new();

        writeln!(output, "benchmark_report:").unwrap();
        writeln!(output, "  timestamp '{}'", self.timestamp).unwrap();
        writeln!(
            output,
            "  description '{}'",
            escape_lino_string(&self.description)
        )
        .unwrap();

        writeln!(output).unwrap();
        writeln!(output, "results:").unwrap();
        for size in self.sizes() {
            writeln!(output, "  size_{}:", size).unwrap();
            for result in self.results.iter().filter(|r| r.array_size == size) {
                writeln!(output, "    {}:", result.algorithm).unwrap();
                writeln!(output, "      mode {}", result.mode).unwrap();
                if let Some(workers) = result.workers {
                    writeln!(output, "      workers {}", workers).unwrap();
                }
                writeln!(output, "      time_ms {:.3}", result.time_ms).unwrap();
                writeln!(output, "      verified {}", result.verified).unwrap();
            }
        }

        writeln!(output).unwrap();
        writeln!(output, "comparisons:").unwrap();
        for size in self.sizes() {
            let sequential = self.find(size, "radix_sequential");
            let parallel = self.find(size, "radix_parallel");
            let distributed = self.find(size, "radix_distributed");
            let std_sort = self.find(size, "std_sort");

            let mut lines = String::new();
            if let (Some(seq), Some(par)) = (sequential, parallel) {
                writeln!(lines, "    parallel_vs_sequential:").unwrap();
                writeln!(lines, "      speedup {:.2}", seq.time_ms / par.time_ms).unwrap();
            }
            if let (Some(seq), Some(dist)) = (sequential, distributed) {
                writeln!(lines, "    distributed_vs_sequential:").unwrap();
                writeln!(lines, "      speedup {:.2}", seq.time_ms / dist.time_ms).unwrap();
            }
            if let (Some(seq), Some(std_ref)) = (sequential, std_sort) {
                writeln!(lines, "    radix_vs_std_sort:").unwrap();
                writeln!(lines, "      speedup {:.2}", std_ref.time_ms / seq.time_ms).unwrap();
            }

            if !lines.is_empty() {
                writeln!(output, "  size_{}:", size).unwrap();
                output.push_str(&lines);
            }
        }

        output
    }

    /// Save the report to a file in Links Notation.
    pub fn save_lino(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_lino())
    }

    /// Render the report as a markdown document.
    pub fn to_markdown_table(&self) -> String {
        let mut output = String::new();

        writeln!(output, "# Radix Sort Benchmark Report").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Timestamp:** {}", self.timestamp).unwrap();
        writeln!(output, "**Description:** {}", self.description).unwrap();
        writeln!(output).unwrap();

        writeln!(output, "## Results").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Size | std sort (ms) | Sequential (ms) | Parallel (ms) | Distributed (ms) |"
        )
        .unwrap();
        writeln!(
            output,
            "|------|---------------|-----------------|---------------|------------------|"
        )
        .unwrap();

        for size in self.sizes() {
            let cell = |algorithm: &str| {
                self.find(size, algorithm)
                    .map(|r| format!("{:.3}", r.time_ms))
                    .unwrap_or_else(|| "N/A".to_string())
            };
            writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                format_size(size),
                cell("std_sort"),
                cell("radix_sequential"),
                cell("radix_parallel"),
                cell("radix_distributed"),
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        writeln!(output, "## Speedups vs Sequential Radix").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Size | Parallel | Distributed |").unwrap();
        writeln!(output, "|------|----------|-------------|").unwrap();

        for size in self.sizes() {
            let speedup = |algorithm: &str| {
                match (self.find(size, "radix_sequential"), self.find(size, algorithm)) {
                    (Some(seq), Some(other)) => format!("{:.2}x", seq.time_ms / other.time_ms),
                    _ => "N/A".to_string(),
                }
            };
            writeln!(
                output,
                "| {} | {} | {} |",
                format_size(size),
                speedup("radix_parallel"),
                speedup("radix_distributed"),
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        writeln!(output, "---").unwrap();
        writeln!(output, "*Report generated by radix-sorting benchmark tool*").unwrap();

        output
    }

    /// Save the report as a markdown file.
    pub fn save_markdown(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_markdown_table())
    }
}

/// Escape a string for use in Links Notation (handle single quotes).
fn escape_lino_string(s: &str) -> String {
    s.replace('\'', "\\'")
}

/// Format a size as a human-readable string (e.g. "10K", "1M").
fn format_size(size: usize) -> String {
    if size >= 1_000_000 && size % 1_000_000 == 0 {
        format!("{}M", size / 1_000_000)
    } else if size >= 1_000 && size % 1_000 == 0 {
        format!("{}K", size / 1_000)
    } else {
        size.to_string()
    }
}

/// Parse a Links Notation report produced by [`BenchmarkReport::to_lino`].
///
/// Returns `None` when the input holds no results. Only the fields this
/// crate writes are understood; the comparisons section is recomputed from
/// the parsed results rather than read back.
pub fn parse_lino_report(content: &str) -> Option<BenchmarkReport> {
    let mut report = BenchmarkReport::new("Parsed report");
    let mut current_size: Option<usize> = None;
    let mut current_result: Option<BenchmarkResult> = None;
    let mut in_results_section = false;

    fn flush(slot: &mut Option<BenchmarkResult>, results: &mut Vec<BenchmarkResult>) {
        if let Some(result) = slot.take() {
            results.push(result);
        }
    }

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed == "results:" {
            in_results_section = true;
            continue;
        }
        if trimmed == "comparisons:" {
            flush(&mut current_result, &mut report.results);
            in_results_section = false;
            current_size = None;
            continue;
        }

        if trimmed.starts_with("timestamp '") {
            if let Some(ts) = extract_quoted_value(trimmed, "timestamp") {
                report.timestamp = ts;
            }
        }
        if trimmed.starts_with("description '") {
            if let Some(desc) = extract_quoted_value(trimmed, "description") {
                report.description = desc;
            }
        }

        if !in_results_section {
            continue;
        }

        if trimmed.starts_with("size_") && trimmed.ends_with(':') {
            flush(&mut current_result, &mut report.results);
            current_size = trimmed
                .trim_start_matches("size_")
                .trim_end_matches(':')
                .parse()
                .ok();
            continue;
        }

        if let Some(size) = current_size {
            if trimmed.ends_with(':') && !trimmed.contains(' ') {
                flush(&mut current_result, &mut report.results);
                current_result = Some(BenchmarkResult {
                    algorithm: trimmed.trim_end_matches(':').to_string(),
                    mode: String::new(),
                    array_size: size,
                    workers: None,
                    time_ms: 0.0,
                    verified: false,
                });
                continue;
            }
        }

        if let Some(ref mut result) = current_result {
            if let Some(mode) = trimmed.strip_prefix("mode ") {
                result.mode = mode.to_string();
            } else if let Some(workers) = trimmed.strip_prefix("workers ") {
                result.workers = workers.parse().ok();
            } else if let Some(time) = trimmed.strip_prefix("time_ms ") {
                result.time_ms = time.parse().unwrap_or(0.0);
            } else if let Some(verified) = trimmed.strip_prefix("verified ") {
                result.verified = verified == "true";
            }
        }
    }

    flush(&mut current_result, &mut report.results);

    if report.results.is_empty() {
        None
    } else {
        Some(report)
    }
}

fn extract_quoted_value(line: &str, prefix: &str) -> Option<String> {
    let after_prefix = line.trim_start_matches(prefix).trim();
    if after_prefix.starts_with('\'') && after_prefix.ends_with('\'') && after_prefix.len() >= 2 {
        Some(after_prefix[1..after_prefix.len() - 1].replace("\\'", "'"))
    } else {
        None
    }
}
