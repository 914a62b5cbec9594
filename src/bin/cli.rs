//! CLI for minidfs
//!
//! The file index lives in memory, so every command works against one
//! coordinator for the lifetime of the process.

use clap::{Parser, Subcommand};
use minidfs::common::{format_bytes, Config};
use minidfs::{Coordinator, Node};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minidfs")]
#[command(about = "minidfs distributed file store client")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./minidfs.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage nodes (comma-separated host:port, overrides config)
    #[arg(long, value_delimiter = ',')]
    nodes: Vec<Node>,

    /// Directory for staged downloads
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// Accept downloads whose size differs from the uploaded size
    #[arg(long)]
    no_verify_size: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload files in order
    Put {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Upload files, then download each back
    Roundtrip {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory
        #[arg(long)]
        output: PathBuf,
    },

    /// Interactive session reading commands from stdin
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if !cli.nodes.is_empty() {
        config.coordinator.nodes = cli.nodes;
    }
    if cli.staging_dir.is_some() {
        config.coordinator.staging_dir = cli.staging_dir;
    }
    if cli.no_verify_size {
        config.coordinator.verify_download_size = false;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let coordinator = Coordinator::from_config(&config.coordinator)?;

    match cli.command {
        Commands::Put { files } => {
            for path in files {
                put_and_report(&coordinator, &path).await?;
            }
        }

        Commands::Roundtrip { files, output } => {
            tokio::fs::create_dir_all(&output).await?;

            let mut names = Vec::with_capacity(files.len());
            for path in &files {
                names.push(put_and_report(&coordinator, path).await?);
            }

            for name in names {
                let staged = coordinator.get(&name).await?;
                let size = staged.size();
                staged.persist(output.join(&name))?;
                println!("{} → {} ({})", name, output.display(), format_bytes(size));
            }
        }

        Commands::Shell => run_shell(&coordinator).await?,
    }

    Ok(())
}

/// Upload one file and print where it landed. Returns the stored name.
async fn put_and_report(coordinator: &Coordinator, path: &Path) -> anyhow::Result<String> {
    let name = coordinator.put_file(path).await?;
    if let Some(record) = coordinator.record(&name) {
        println!(
            "{} → {} ({})",
            record.name,
            record.node,
            format_bytes(record.size)
        );
    }
    Ok(name)
}

const SHELL_HELP: &str = "\
commands:
  put <path>            upload a local file
  get <name> [dest]     download a file (default dest: ./<name>)
  ls [--json]           list stored files
  nodes                 list storage nodes
  help                  show this help
  quit                  exit";

async fn run_shell(coordinator: &Coordinator) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", minidfs::BUILD_INFO);
    println!("{}", SHELL_HELP);

    loop {
        stdout.write_all(b"minidfs> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let args: Vec<&str> = line.split_whitespace().collect();

        // Errors are reported and the session goes on
        let result = match args.as_slice() {
            [] => Ok(()),
            ["quit"] | ["exit"] => break,
            ["help"] => {
                println!("{}", SHELL_HELP);
                Ok(())
            }
            ["put", path] => put_and_report(coordinator, Path::new(path))
                .await
                .map(|_| ()),
            ["get", name] => fetch(coordinator, name, Path::new(name)).await,
            ["get", name, dest] => fetch(coordinator, name, Path::new(dest)).await,
            ["ls"] => {
                for record in coordinator.records() {
                    println!(
                        "{:<32} {:>12} {}",
                        record.name,
                        format_bytes(record.size),
                        record.node
                    );
                }
                Ok(())
            }
            ["ls", "--json"] => serde_json::to_string_pretty(&coordinator.records())
                .map(|json| println!("{}", json))
                .map_err(Into::into),
            ["nodes"] => {
                for (i, node) in coordinator.nodes().iter().enumerate() {
                    println!("{:>3} {}", i, node);
                }
                Ok(())
            }
            _ => {
                println!("unknown command, try `help`");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("error: {}", e);
        }
    }

    Ok(())
}

async fn fetch(coordinator: &Coordinator, name: &str, dest: &Path) -> anyhow::Result<()> {
    let staged = coordinator.get(name).await?;
    let size = staged.size();
    staged.persist(dest)?;
    println!("{} → {} ({})", name, dest.display(), format_bytes(size));
    Ok(())
}
