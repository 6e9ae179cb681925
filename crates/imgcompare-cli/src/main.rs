use anyhow::Context;
use clap::{Parser, Subcommand};
use imgcompare_core::config::LogLevel;
use imgcompare_core::query::{filter_comparisons, find_meta_files, FilterCriteria};
use imgcompare_core::{logging, ComparisonKind, Config, ImageComparer};
use log::{info, LevelFilter};
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imgcompare")]
#[command(about = "Compare images and image trees with pixel-level metrics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two images, or every image shared by two directory trees
    Compare {
        /// File or directory A
        #[arg(short = 'a', long)]
        source_a: PathBuf,

        /// File or directory B
        #[arg(short = 'b', long)]
        source_b: PathBuf,

        /// Comparisons to run: comma separated pixel,contrast,quad,ssim,mse or "all"
        #[arg(short = 'c', long)]
        comparisons: Option<String>,

        /// Directory for diff images, source copies and meta.json
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of comparisons to run in parallel (0 = one per CPU)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Do not draw a progress bar
        #[arg(long)]
        no_progress: bool,

        /// Write logs to a rotating file in this directory instead of stderr
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Verbosity level
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List exported comparisons that fall under the given thresholds
    Filter {
        /// Directories to scan for meta.json (read from stdin when omitted)
        #[arg(short = 'd', long = "directory")]
        directories: Vec<PathBuf>,

        /// Comparisons to consider
        #[arg(short = 'c', long, default_value = "all")]
        comparisons: String,

        /// Report results with an index at or below this value
        #[arg(short = 'i', long, default_value_t = 1.0)]
        index: f64,

        /// Report results with at most this many failed points (0 = no limit)
        #[arg(short = 'n', long, default_value_t = 0)]
        num_failed: i64,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "imgcompare.json")]
        path: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            source_a,
            source_b,
            comparisons,
            output,
            threads,
            no_progress,
            log_dir,
            verbose,
            config,
        } => {
            // Set up configuration
            let mut config = if let Some(config_path) = config {
                Config::from_file(&config_path)?
            } else {
                Config::default()
            };

            // Override config with command line arguments
            if let Some(selection) = comparisons {
                config.comparisons = ComparisonKind::parse_list(&selection)?;
            }
            if output.is_some() {
                config.export_dir = output;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            if no_progress {
                config.show_progress = false;
            }

            // Set log level based on verbosity
            config.log_level = match verbose {
                0 => config.log_level,
                1 => LogLevel::Debug,
                _ => LogLevel::Trace,
            };
            init_logging(log_dir, config.log_level.into())?;

            let comparer = ImageComparer::new(config)?;

            info!(
                "Comparing {} with {}",
                source_a.display(),
                source_b.display()
            );
            let results = comparer.run(&source_a, &source_b)?;

            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }

        Commands::Filter {
            directories,
            comparisons,
            index,
            num_failed,
        } => {
            env_logger::init();

            let directories = if directories.is_empty() {
                read_directories_from_stdin()?
            } else {
                directories
            };

            let criteria = FilterCriteria {
                comparisons: ComparisonKind::parse_list(&comparisons)?,
                max_index: index,
                max_failed: num_failed,
            };

            let found = find_meta_files(&directories)?;
            for comparison in filter_comparisons(&found, &criteria) {
                println!("{}", comparison.location);
            }
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

fn init_logging(log_dir: Option<PathBuf>, level: LevelFilter) -> anyhow::Result<()> {
    match log_dir {
        Some(dir) => logging::init_logger(&dir, level)
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e)),
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
            Ok(())
        }
    }
}

fn read_directories_from_stdin() -> anyhow::Result<Vec<PathBuf>> {
    let stdin = std::io::stdin();
    let mut directories = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("error reading input")?;
        let line = line.trim();
        if !line.is_empty() {
            directories.push(PathBuf::from(line));
        }
    }
    Ok(directories)
}
