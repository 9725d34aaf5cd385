//! CLI entry point.
//!
//! Thin dispatch over the provisioner: `provision`, `status`, `path`.

use clap::{Parser, Subcommand};
use serde::Serialize;

use open_webdriver::chromium::{ChromiumProvisioner, CliProgress, Platform};

/// Manage the locally cached Chromium browser binary.
#[derive(Parser)]
#[command(name = "open-webdriver")]
#[command(about = "Provision and inspect the cached Chromium binary")]
#[command(version)]
struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and unpack Chromium for this platform (no-op if done)
    Provision {
        /// Re-download the archive even if a previous download exists
        #[arg(long)]
        force: bool,
    },
    /// Report cache paths and provisioning state
    Status {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the executable path (fails if not provisioned)
    Path,
}

#[derive(Serialize)]
struct StatusReport {
    platform: String,
    install_dir: String,
    executable: String,
    provisioned: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "open_webdriver=debug"
    } else {
        "open_webdriver=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Provision { force } => handle_provision(force).await,
        Commands::Status { json } => handle_status(json),
        Commands::Path => handle_path(),
    }
}

async fn handle_provision(force: bool) -> anyhow::Result<()> {
    // Resolve the platform first so unsupported platforms fail before
    // any filesystem or network I/O.
    let platform = Platform::current()?;

    let provisioner = ChromiumProvisioner::new()?
        .overwrite(force)
        .progress(Box::new(CliProgress::new()));

    let exe = provisioner.acquire_for(platform).await?;
    println!("Chromium ready: {}", exe.display());
    Ok(())
}

fn handle_status(json: bool) -> anyhow::Result<()> {
    let platform = Platform::current()?;
    let provisioner = ChromiumProvisioner::new()?;

    let report = StatusReport {
        platform: platform.identifier().to_string(),
        install_dir: provisioner.platform_dir(platform).display().to_string(),
        executable: provisioner.executable_path(platform).display().to_string(),
        provisioned: provisioner.is_provisioned(platform)
            && provisioner.executable_path(platform).exists(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Platform: {}", report.platform);
    println!("Install dir: {}", report.install_dir);
    if report.provisioned {
        println!("Status: Provisioned");
        println!("Binary: {}", report.executable);
    } else {
        println!("Status: Not provisioned");
        println!();
        println!("Run 'open-webdriver provision' to download Chromium");
    }
    Ok(())
}

fn handle_path() -> anyhow::Result<()> {
    let platform = Platform::current()?;
    let provisioner = ChromiumProvisioner::new()?;

    let exe = provisioner.executable_path(platform);
    if !provisioner.is_provisioned(platform) || !exe.exists() {
        anyhow::bail!("Chromium is not provisioned. Run 'open-webdriver provision' first.");
    }

    println!("{}", exe.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn provision_accepts_force_flag() {
        let cli = Cli::parse_from(["open-webdriver", "--verbose", "provision", "--force"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Provision { force: true }));
    }

    #[test]
    fn status_accepts_json_flag() {
        let cli = Cli::parse_from(["open-webdriver", "status", "--json"]);
        assert!(matches!(cli.command, Commands::Status { json: true }));
    }
}
