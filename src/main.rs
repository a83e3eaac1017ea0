use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use php_code_scanner::{DirectoryScanner, FileReport, ScanConfig, UnbalancedPolicy};
use tracing_subscriber::EnvFilter;

/// Scan PHP files and directories and print what they declare.
#[derive(Parser)]
#[command(name = "php-code-scanner", version)]
struct Cli {
    /// Files or directories to scan. Directories are walked for `.php` files.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Fail on unbalanced braces instead of truncating the record.
    #[arg(long)]
    strict: bool,

    /// JSON scanner config.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    if cli.strict {
        config = ScanConfig {
            unbalanced: UnbalancedPolicy::Reject,
            ..config
        };
    }

    let mut scanner = DirectoryScanner::new(config);
    for path in &cli.paths {
        if path.is_dir() {
            scanner.add_directory(path);
        } else {
            scanner.add_file(path);
        }
    }
    let index = scanner.scan()?;

    let mut reports = Vec::with_capacity(index.files().len());
    for file in index.files() {
        let report = FileReport::build(file.scanner(), Some(file.path()))
            .with_context(|| format!("failed to scan {}", file.path().display()))?;
        reports.push(report);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{report}");
        }
    }
    Ok(())
}
