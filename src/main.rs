//! hghist - print the Mercurial history of one file
//!
//! Binary entry point.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use hghist::hg::{CacheWriteOutcome, DaemonAddress, HgRepository};
use hghist::history::History;

/// Print the Mercurial history of a file, caching it next to the file
#[derive(Parser, Debug)]
#[command(name = "hghist", version)]
struct Cli {
    /// File whose history to print
    file: PathBuf,

    /// Repository root (defaults to the current directory)
    #[arg(short = 'R', long)]
    repo: Option<PathBuf>,

    /// hg binary to run
    #[arg(long = "hg", env = "HGHIST_HG", default_value = "hg")]
    command: PathBuf,

    /// Daemon address (`host:port` or `unix:/path`) to query instead of running hg
    #[arg(long, env = "HGHIST_DAEMON")]
    daemon: Option<String>,

    /// Run `hg log -v` (full multi-line descriptions)
    #[arg(short, long)]
    verbose: bool,

    /// Output presentation
    #[arg(short, long, value_enum, default_value_t = Format::Structured)]
    format: Format,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// One block per entry
    Structured,
    /// One line per entry, walked with the cursor
    Line,
    /// The flattened text view
    Flat,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let root = match cli.repo {
        Some(root) => root,
        None => std::env::current_dir().wrap_err("cannot determine current directory")?,
    };
    let daemon = cli
        .daemon
        .as_deref()
        .map(str::parse::<DaemonAddress>)
        .transpose()?;

    let repo = HgRepository::new(root)
        .with_command(cli.command)
        .with_verbose(cli.verbose)
        .with_daemon(daemon);

    let fetch = repo
        .history(&cli.file)
        .wrap_err_with(|| format!("history unavailable for {}", cli.file.display()))?;

    if let CacheWriteOutcome::Failed { path, error } = &fetch.cache {
        tracing::warn!(path = %path.display(), "could not cache history: {error}");
    }

    print!("{}", render(fetch.history, cli.format)?);
    Ok(())
}

/// Install the stderr subscriber
fn init_tracing(debug: bool) {
    let default = if debug { "hghist=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render(mut history: History, format: Format) -> color_eyre::Result<String> {
    let mut out = String::new();
    match format {
        Format::Structured => {
            while history.advance() {
                out.push_str(&format!("revision: {}\n", history.revision()?));
                out.push_str(&format!("date:     {}\n", history.date()?.to_rfc2822()));
                out.push_str(&format!("author:   {}\n", history.author()?));
                for line in history.message()?.lines() {
                    out.push_str(&format!("    {line}\n"));
                }
                out.push('\n');
            }
        }
        Format::Line => {
            while history.advance() {
                out.push_str(&history.line()?);
            }
        }
        Format::Flat => out.push_str(history.flat_text()),
    }
    Ok(out)
}
