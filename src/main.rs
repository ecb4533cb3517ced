//! CLI entry point for fieldnotes

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fieldnotes")]
#[command(version)]
#[command(about = "A static personal blog/journal engine", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new journal site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post and register it in the manifest
    New {
        /// Title of the new post
        title: String,

        /// Override the generated slug
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Regenerate everything, ignoring the cache
        #[arg(short, long)]
        force: bool,
    },

    /// Start a local preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder and cache
    Clean,

    /// List the posts registered in the manifest
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "fieldnotes=debug,info"
    } else {
        "fieldnotes=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing journal in {:?}", target_dir);
            fieldnotes::commands::init::init_site(&target_dir)?;
            println!("Initialized empty journal in {:?}", target_dir);
        }

        Commands::New { title, slug } => {
            let site = fieldnotes::Site::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            fieldnotes::commands::new::create_post(&site, &title, slug.as_deref())?;
        }

        Commands::Generate { watch, force } => {
            let site = fieldnotes::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            fieldnotes::commands::generate::run_with_options(&site, force)?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                fieldnotes::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = fieldnotes::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            fieldnotes::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let site = fieldnotes::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let site = fieldnotes::Site::new(&base_dir)?;
            fieldnotes::commands::list::run(&site)?;
        }

        Commands::Version => {
            println!("fieldnotes version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
