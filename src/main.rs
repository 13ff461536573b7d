//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "A personal blog and portfolio server", long_about = None)]
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
    /// Start the server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,

        /// Reload open pages when posts change
        #[arg(short, long)]
        watch: bool,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Write a static rendition of the site
    #[command(alias = "g")]
    Generate,

    /// List posts, newest first
    List,

    /// Print one post as JSON
    Show {
        /// Post slug
        slug: String,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Directory and file name (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Print recent GitHub activity
    Activity,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve {
            port,
            ip,
            watch,
            open,
        } => {
            let site = folio_rs::Site::new(&base_dir)?;
            let port = port.unwrap_or(site.config.server.port);
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&site, &ip, port, watch, open).await?;
        }

        Commands::Generate => {
            let site = folio_rs::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate().await?;
            println!("Generated into {}", site.output_dir.display());
        }

        Commands::List => {
            let site = folio_rs::Site::new(&base_dir)?;
            folio_rs::commands::list::run(&site).await?;
        }

        Commands::Show { slug } => {
            let site = folio_rs::Site::new(&base_dir)?;
            folio_rs::commands::show::run(&site, &slug).await?;
        }

        Commands::New { title, slug } => {
            let site = folio_rs::Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = site.new_post(&title, slug.as_deref())?;
            println!("Created: {}", path.display());
        }

        Commands::Activity => {
            let site = folio_rs::Site::new(&base_dir)?;
            folio_rs::commands::activity::run(&site).await?;
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
