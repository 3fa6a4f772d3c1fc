use anyhow::Result;
use clap::Parser;
use ghru::checker::UpdateChecker;
use ghru::download::download_update;
use ghru::error::UpdateError;
use ghru::http::HttpClient;
use ghru::registry::GitHubRepo;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// ghru - GitHub Release Updater
///
/// Check GitHub releases for application updates and download the
/// installer for the current platform.
///
/// Examples:
///   ghru check owner/repo --current 1.2.0
///   ghru download owner/repo --current 1.2.0 --dest /tmp
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Check whether a newer release is available
    Check(CheckArgs),

    /// Download the installer for the latest release, if newer
    Download(DownloadArgs),
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// The GitHub repository in the format "owner/repo"
    #[arg(value_name = "OWNER/REPO")]
    pub repo: String,

    /// The currently installed version
    #[arg(long, value_name = "VERSION")]
    pub current: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// The GitHub repository in the format "owner/repo"
    #[arg(value_name = "OWNER/REPO")]
    pub repo: String,

    /// The currently installed version
    #[arg(long, value_name = "VERSION")]
    pub current: String,

    /// Destination directory (defaults to the Downloads directory)
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let result = match cli.command {
        Commands::Check(args) => check(args, cli.api_url, &cancel).await,
        Commands::Download(args) => download(args, cli.api_url, &cancel).await,
    };

    match result {
        Err(e) if matches!(e.downcast_ref::<UpdateError>(), Some(UpdateError::Cancelled)) => {
            eprintln!("Cancelled.");
            std::process::exit(130)
        }
        other => other,
    }
}

async fn check(args: CheckArgs, api_url: Option<String>, cancel: &CancellationToken) -> Result<()> {
    let repo: GitHubRepo = args.repo.parse()?;
    let checker = UpdateChecker::new(HttpClient::with_defaults()?, repo, api_url);

    let update = checker.check_for_updates(&args.current, cancel).await?;

    if args.json {
        match &update {
            Some(update) => println!("{}", serde_json::to_string_pretty(update)?),
            None => println!("null"),
        }
        return Ok(());
    }

    match update {
        Some(update) => {
            println!("Update available: {} -> {}", args.current, update.version);
            println!("  asset:     {}", update.file_name);
            println!("  published: {}", update.published_at.to_rfc3339());
            if let Some(min) = &update.min_platform_version {
                println!("  requires:  macOS {} or later", min);
            }
            println!("\n{}", update.notes);
        }
        None => println!("Already up to date."),
    }
    Ok(())
}

async fn download(
    args: DownloadArgs,
    api_url: Option<String>,
    cancel: &CancellationToken,
) -> Result<()> {
    let repo: GitHubRepo = args.repo.parse()?;
    let http = HttpClient::with_defaults()?;
    let checker = UpdateChecker::new(http.clone(), repo, api_url);

    let Some(update) = checker.check_for_updates(&args.current, cancel).await? else {
        println!("Already up to date.");
        return Ok(());
    };

    println!(
        "Update available: {} -> {}",
        args.current, update.version
    );
    println!("  downloading {}...", update.file_name);

    let runtime = ghru::runtime::RealRuntime;
    let path = download_update(
        &runtime,
        &http,
        &update,
        args.dest.as_deref(),
        |fraction| {
            use std::io::Write as _;
            print!("\r  {:>3.0}%", fraction * 100.0);
            let _ = std::io::stdout().flush();
        },
        cancel,
    )
    .await?;

    println!("\n  saved to {}", path.display());
    Ok(())
}
