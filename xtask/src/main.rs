use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "pagetree workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tree benchmarks and write a markdown report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,

        /// Only run benchmarks whose id contains this string
        #[arg(long)]
        filter: Option<String>,
    },
}

/// The part of criterion's `estimates.json` the report reads.
#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

const BENCH_TARGET: &str = "btree_benchmark";
const REPORT_PATH: &str = "benchmark_results/report.md";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            quick,
            report_only,
            filter,
        } => {
            if !report_only {
                run_benchmarks(quick, filter.as_deref())?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool, filter: Option<&str>) -> Result<()> {
    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", BENCH_TARGET, "--release"])
        .status()?;
    if !status.success() {
        anyhow::bail!("Failed to compile benchmarks");
    }

    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.arg("bench").arg("--bench").arg(BENCH_TARGET);

    // Args for the test runner (Criterion) go after --
    cmd.arg("--");
    if let Some(filter) = filter {
        cmd.arg(filter);
    }
    if quick {
        cmd.arg("--measurement-time").arg("0.1");
        cmd.arg("--noplot");
        cmd.arg("--sample-size").arg("10");
    }

    let status = cmd
        .status()
        .with_context(|| format!("Failed to run bench target {BENCH_TARGET}"))?;
    if !status.success() {
        anyhow::bail!("Benchmark run failed");
    }
    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    // group -> (benchmark id -> mean time in ns)
    let mut results: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    collect_results(criterion_dir, criterion_dir, &mut results)?;

    let report_path = Path::new(REPORT_PATH);
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# pagetree Benchmark Report")?;
    for (group, benches) in &results {
        writeln!(file, "\n## {group}\n")?;
        writeln!(file, "| Benchmark | Mean | vs std |")?;
        writeln!(file, "|---|---|---|")?;

        let baseline = benches
            .iter()
            .find(|(id, _)| id.starts_with("std_"))
            .map(|(_, ns)| *ns);

        for (id, ns) in benches {
            let rel = match baseline {
                Some(base) if *ns > 0.0 => format!("**{:.2}x**", base / ns),
                _ => "-".to_string(),
            };
            writeln!(file, "| {id} | {} | {rel} |", format_duration(*ns))?;
        }
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_duration(ns: f64) -> String {
    if ns > 1_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else if ns > 1_000.0 {
        format!("{:.2} µs", ns / 1_000.0)
    } else {
        format!("{ns:.0} ns")
    }
}

/// Finds `<group>/<bench...>/new/estimates.json` files below `dir`.
fn collect_results(
    root: &Path,
    dir: &Path,
    results: &mut BTreeMap<String, BTreeMap<String, f64>>,
) -> Result<()> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(());
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().and_then(|s| s.to_str()) == Some("report") {
                continue;
            }
            collect_results(root, &path, results)?;
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }
        let Some(run_dir) = path.parent() else { continue };
        if run_dir.file_name().and_then(|s| s.to_str()) != Some("new") {
            continue;
        }
        let Some(bench_dir) = run_dir.parent() else { continue };
        let rel = bench_dir.strip_prefix(root)?;
        let mut parts = rel.iter().filter_map(|p| p.to_str());
        let Some(group) = parts.next() else { continue };
        let id = parts.collect::<Vec<_>>().join("/");

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let estimates: Estimates = serde_json::from_str(&content)
            .with_context(|| format!("Malformed estimates in {}", path.display()))?;
        results
            .entry(group.to_string())
            .or_default()
            .insert(id, estimates.mean.point_estimate);
    }
    Ok(())
}
