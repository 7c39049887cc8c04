//! ssg CLI - static site generator

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use sausage::init::init_site;
use sausage::{build, FixSuggestion};

#[derive(Parser)]
#[command(name = "ssg")]
#[command(about = "A flexible template-based static site generator")]
#[command(version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create site.yaml, src/, templates/ and public/
    Init {
        /// Site directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Generate the site into public/
    Build {
        /// Site directory (containing site.yaml)
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = match cli.command {
        Commands::Init { dir } => run_init(dir),
        Commands::Build { dir } => run_build(dir),
    };
    std::process::exit(code);
}

fn run_init(dir: PathBuf) -> i32 {
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        return 1;
    }
    match init_site(&dir) {
        Ok(result) => {
            println!("{} Initialized site in {}", "✓".green(), result.site_dir.cyan());
            for file in &result.files_created {
                println!("  {} {}", "+".green(), file);
            }
            0
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            1
        }
    }
}

fn run_build(dir: PathBuf) -> i32 {
    match build(&dir) {
        Ok(report) => {
            println!(
                "{} Built {} ({} copied, {} generated, {} pruned)",
                "✓".green(),
                dir.display().to_string().cyan(),
                report.copied,
                report.generated.len(),
                report.pruned.len()
            );
            for name in &report.generated {
                println!("  {} {}", "→".cyan(), name);
            }
            0
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(suggestion) = e.fix_suggestion() {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            1
        }
    }
}
