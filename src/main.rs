// Content repair service and CLI
//
// Serves the repair and linking endpoints over HTTP, or runs the validator,
// batch job and link inserter directly against a local article database.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use content_repair::article_store::ArticleStore;
use content_repair::config::{ServiceConfig, load_builder};
use content_repair::html_validator::HtmlValidator;
use content_repair::link_inserter::{InternalLinker, LinkRequest};
use content_repair::repair_job::{RepairJob, RepairRequest};
use content_repair::server;

#[derive(Parser, Debug)]
#[command(name = "content-repair")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite article database
    #[arg(long, global = true, env = "CONTENT_REPAIR_DB")]
    database: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate and repair an HTML file ("-" reads stdin)
    Validate {
        input: PathBuf,

        /// Only run the quick gate and print true/false
        #[arg(long)]
        quick: bool,
    },

    /// Run the batch repair job (dry run unless --apply)
    Repair {
        /// Write repaired content back to the database
        #[arg(long)]
        apply: bool,

        #[arg(long)]
        batch_size: Option<usize>,

        /// Restrict the batch to these article ids
        #[arg(long = "id")]
        ids: Vec<String>,
    },

    /// Insert internal links into an HTML file and print the result
    Link {
        /// Title of the article being linked
        #[arg(long)]
        title: String,

        input: PathBuf,

        /// Id of the article itself, excluded from candidates
        #[arg(long)]
        current_id: Option<String>,
    },

    /// Load a JSON array of articles into the database
    Import { input: PathBuf },
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let builder = load_builder(cli.config.as_deref(), cli.database)?;

    match cli.command {
        Command::Serve { bind, port } => {
            let mut builder = builder;
            if let Some(bind) = bind {
                builder = builder.bind_addr(bind);
            }
            if let Some(port) = port {
                builder = builder.port(port);
            }
            server::serve(builder.build()?).await
        }
        Command::Validate { input, quick } => {
            let config = builder.build()?;
            let html = read_input(&input)?;
            let validator = HtmlValidator::new(*config.validator_limits());
            if quick {
                println!("{}", validator.quick_validate(&html));
                Ok(())
            } else {
                print_json(&validator.validate(&html))
            }
        }
        Command::Repair {
            apply,
            batch_size,
            ids,
        } => {
            let config = builder.build()?;
            let store = open_store(&config).await?;
            let job = RepairJob::new(config.default_batch_size(), config.max_batch_size());
            let request = RepairRequest {
                article_ids: (!ids.is_empty()).then_some(ids),
                dry_run: !apply,
                batch_size,
            };
            let response = job.run(&store, &request).await;
            store.close().await;
            print_json(&response?)
        }
        Command::Link {
            title,
            input,
            current_id,
        } => {
            let config = builder.build()?;
            let store = open_store(&config).await?;
            let request = LinkRequest {
                content: read_input(&input)?,
                title,
                current_article_id: current_id,
            };
            let insertion = InternalLinker::new(*config.linker_limits())
                .run(&store, &request)
                .await;
            store.close().await;
            print_json(&insertion?)
        }
        Command::Import { input } => {
            let config = builder.build()?;
            let store = open_store(&config).await?;
            let written = store.import_json(&read_input(&input)?).await;
            store.close().await;
            println!("Imported {} articles", written?);
            Ok(())
        }
    }
}

async fn open_store(config: &ServiceConfig) -> Result<ArticleStore> {
    ArticleStore::open(config.database_path()).await
}
