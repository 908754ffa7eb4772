use anyhow::{Context, Result};
use clap::Parser;
use lazybeads::{beads, config, tui};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Parser, Debug)]
#[command(name = "lazybeads")]
#[command(about = "Terminal UI for browsing and editing beads issues")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Fetch issues once, print a summary and exit
    #[arg(long)]
    check: bool,

    /// Print the resolved config path and effective config, then exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging()?;

    let config_path = config::resolve_path(args.config.as_deref())?;
    let config = config::load_from(&config_path)?;

    if args.print_config {
        println!("# {}", config_path.display());
        print!(
            "{}",
            toml::to_string_pretty(&config).context("Failed to serialize config")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let client = beads::Client::new(config.bd.program.clone());

    if args.check {
        return Ok(check(&client, &cwd).await);
    }

    if !beads::Client::is_initialized(&cwd) {
        anyhow::bail!(
            "No {} directory in {}. Run `bd init` first.",
            beads::BEADS_DIR,
            cwd.display()
        );
    }

    tracing::info!("Starting lazybeads in {}", cwd.display());
    tui::run(config).await?;
    Ok(ExitCode::SUCCESS)
}

/// Headless smoke test of the `bd` integration.
async fn check(client: &beads::Client, cwd: &std::path::Path) -> ExitCode {
    if !beads::Client::is_initialized(cwd) {
        println!("FAIL: no {} directory in {}", beads::BEADS_DIR, cwd.display());
        return ExitCode::FAILURE;
    }

    let issues = match client.list_all().await {
        Ok(issues) => issues,
        Err(e) => {
            println!("FAIL: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    match client.ready_ids().await {
        Ok(ready) => {
            println!("OK: {} issues, {} ready", issues.len(), ready.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("FAIL: {} issues, ready query failed: {:#}", issues.len(), e);
            ExitCode::FAILURE
        }
    }
}

/// Log to a file; stderr belongs to the terminal UI.
fn init_logging() -> Result<()> {
    let writer = match log_file() {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lazybeads=info".parse()?),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(())
}

fn log_file() -> Option<std::fs::File> {
    let dirs = directories::ProjectDirs::from("", "", "lazybeads")?;
    let dir = dirs.data_local_dir();
    std::fs::create_dir_all(dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("lazybeads.log"))
        .ok()
}
