use crate::benchmark::BenchmarkResult;
use crate::build_info::{BuildInfo, BUILD_INFO};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Serialize)]
pub struct MachineInfo {
    pub system: &'static str,
    pub machine: &'static str,
    pub cpu_count: usize,
}

impl MachineInfo {
    pub fn current() -> Self {
        MachineInfo {
            system: std::env::consts::OS,
            machine: std::env::consts::ARCH,
            cpu_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct JsonReport<'a> {
    pub machine_info: MachineInfo,
    pub commit_info: BuildInfo,
    pub benchmarks: &'a [BenchmarkResult],
    pub version: &'static str,
}

impl<'a> JsonReport<'a> {
    pub fn new(benchmarks: &'a [BenchmarkResult]) -> Self {
        JsonReport {
            machine_info: MachineInfo::current(),
            commit_info: BUILD_INFO,
            benchmarks,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

pub fn write_json<P: AsRef<Path>>(
    path: &P,
    results: &[BenchmarkResult],
) -> Result<(), ReportError> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    tracing::info!(path = %path.display(), "writing benchmark report");
    let json = serde_json::to_string_pretty(&JsonReport::new(results))?;
    let mut output =
        std::io::BufWriter::new(std::fs::File::create(path).map_err(io_err)?);
    writeln!(output, "{json}").map_err(io_err)?;
    output.flush().map_err(io_err)?;
    Ok(())
}

/// Pick a unit so the smallest minimum reads as at least 1.
fn time_unit(results: &[&BenchmarkResult]) -> (&'static str, f64) {
    let smallest = results
        .iter()
        .map(|r| r.stats.min)
        .fold(f64::INFINITY, f64::min);
    if smallest >= 1.0 || !smallest.is_finite() {
        ("s", 1.0)
    } else if smallest >= 1.0e-3 {
        ("ms", 1.0e3)
    } else if smallest >= 1.0e-6 {
        ("us", 1.0e6)
    } else {
        ("ns", 1.0e9)
    }
}

/// Text table of results, one section per group.
pub fn format_table(results: &[BenchmarkResult]) -> String {
    let mut groups: BTreeMap<Option<&str>, Vec<&BenchmarkResult>> =
        BTreeMap::new();
    for r in results {
        groups.entry(r.group.as_deref()).or_default().push(r);
    }

    let mut out = String::new();
    for (group, members) in groups {
        let (unit, scale) = time_unit(&members);
        let header = [
            format!("Name (time in {unit})"),
            "Min".to_string(),
            "Max".to_string(),
            "Mean".to_string(),
            "StdDev".to_string(),
            "Median".to_string(),
            "IQR".to_string(),
            "Outliers".to_string(),
            "OPS".to_string(),
            "Rounds".to_string(),
            "Iterations".to_string(),
        ];
        let rows: Vec<[String; 11]> = members
            .iter()
            .map(|r| {
                let s = &r.stats;
                [
                    r.name.clone(),
                    format!("{:.4}", s.min * scale),
                    format!("{:.4}", s.max * scale),
                    format!("{:.4}", s.mean * scale),
                    format!("{:.4}", s.stddev * scale),
                    format!("{:.4}", s.median * scale),
                    format!("{:.4}", s.iqr * scale),
                    s.outliers.clone(),
                    format!("{:.4}", s.ops),
                    s.rounds.to_string(),
                    s.iterations.to_string(),
                ]
            })
            .collect();

        let mut widths = header.clone().map(|h| h.len());
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.len());
            }
        }
        let line_width =
            widths.iter().sum::<usize>() + 2 * (widths.len() - 1);

        let title = match group {
            Some(g) => format!(" benchmark '{g}': {} tests ", members.len()),
            None => format!(" benchmark: {} tests ", members.len()),
        };
        out.push_str(&format!("{title:-^line_width$}\n"));
        push_row(&mut out, &header, &widths);
        out.push_str(&"-".repeat(line_width));
        out.push('\n');
        for row in &rows {
            push_row(&mut out, row, &widths);
        }
        out.push_str(&"-".repeat(line_width));
        out.push('\n');
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 11], widths: &[usize; 11]) {
    let mut line = String::new();
    for (i, (cell, &w)) in cells.iter().zip(widths.iter()).enumerate() {
        if i == 0 {
            line.push_str(&format!("{cell:<w$}"));
        } else {
            line.push_str(&format!("  {cell:>w$}"));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn print_table(results: &[BenchmarkResult]) {
    print!("{}", format_table(results));
}
