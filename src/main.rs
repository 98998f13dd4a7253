//! CLI entry point for travelog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use travelog::helpers::format_date;

#[derive(Parser)]
#[command(name = "travelog")]
#[command(version = "0.1.0")]
#[command(about = "A blog front-end for headless CMS content", long_about = None)]
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
    /// Start the blog front-end server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Print the first listing page
    List,

    /// Resolve and print a single post
    Show {
        /// Post slug
        slug: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "travelog=debug,info"
    } else {
        "travelog=info"
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
        Commands::Serve { port, ip } => {
            let app = travelog::Travelog::new(&base_dir)?;
            let provider = app.document_store()?;

            tracing::info!("fetching initial listing page...");
            let listing = app.listing(provider.clone()).await?;
            let resolver = app.resolver(provider);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            let state = std::sync::Arc::new(travelog::server::AppState {
                config: app.config.clone(),
                listing,
                resolver,
            });
            travelog::server::start(state, &ip, port).await?;
        }

        Commands::List => {
            let app = travelog::Travelog::new(&base_dir)?;
            let provider = app.document_store()?;
            let listing = app.listing(provider).await?;

            for post in listing.posts() {
                let date = post
                    .first_publication_date
                    .map(|d| format_date(&d, &app.config.date_format))
                    .unwrap_or_else(|| "unpublished".to_string());
                println!("{}  {}  ({})", date, post.title, post.uid);
            }
            if listing.has_more() {
                println!("... more posts available");
            }
        }

        Commands::Show { slug } => {
            let app = travelog::Travelog::new(&base_dir)?;
            let provider = app.document_store()?;
            let resolver = app.resolver(provider);

            let resolved = resolver.resolve(&slug).await?;
            println!("{}", resolved.post.title);
            println!("by {}", resolved.post.author);
            if resolved.post.is_edited() {
                println!("(edited)");
            }
            for block in &resolved.post.content {
                println!("\n## {}", block.heading);
                for node in &block.body {
                    println!("{}", node.text);
                }
            }
            if let Some(prev) = &resolved.previous {
                println!("\nprevious: {}", prev.uid);
            }
            if let Some(next) = &resolved.next {
                println!("next: {}", next.uid);
            }
        }

        Commands::Version => {
            println!("travelog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
