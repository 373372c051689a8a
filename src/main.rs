use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use setup_task::config::Settings;
use setup_task::install::path::host_exporter;
use setup_task::install::platform::HostTarget;
use setup_task::setup::TaskSetup;
use setup_task::version::registries::ReleaseListing;

/// Inputs follow GitHub Actions naming so the binary can run as an action step.
#[derive(Parser)]
#[command(name = "setup-task")]
#[command(version, about = "Install a Task release and add it to PATH")]
struct Cli {
    /// Version to install: exact ("3.37.1"), prefix ("3.37") or wildcard ("3.x")
    #[arg(long = "task-version", env = "INPUT_VERSION")]
    task_version: String,

    /// Token used to authenticate GitHub API requests
    #[arg(long, env = "INPUT_REPO-TOKEN", default_value = "", hide_env_values = true)]
    repo_token: String,

    /// Root directory of the tool cache
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Base URL of the GitHub API
    #[arg(long)]
    registry_url: Option<String>,

    /// Base URL release archives are downloaded from
    #[arg(long)]
    download_url: Option<String>,

    /// List versions from git tag refs instead of releases
    #[arg(long)]
    tag_refs: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(cache_dir) = &self.cache_dir {
            settings.cache_dir = cache_dir.clone();
        }
        if let Some(registry_url) = &self.registry_url {
            settings.registry_url = registry_url.clone();
        }
        if let Some(download_url) = &self.download_url {
            settings.download_url = download_url.clone();
        }
        if self.tag_refs {
            settings.listing = ReleaseListing::TagRefs;
        }
        settings
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    // Dropped on return, flushing the log file
    let _guard = setup_task::logging::init(&cli.log_level, cli.log_file.as_deref())?;

    let setup = TaskSetup::from_settings(&cli.settings(), HostTarget::detect(), host_exporter());

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(setup.run(&cli.task_version, &cli.repo_token));

    if let Err(e) = result {
        if std::env::var_os("GITHUB_ACTIONS").is_some() {
            println!("::error::{e}");
        }
        tracing::error!("{}", e);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
