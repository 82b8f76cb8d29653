//! CLI entry point for blog-pipeline

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-pipeline")]
#[command(version)]
#[command(about = "Discover and resolve markdown blog posts", long_about = None)]
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
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Folder name for the post (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Discover posts and write the slug manifest
    Scan {
        /// Manifest output path (defaults to the configured one)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List site information
    List {
        /// Type of content to list (post, tag, slug)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only list posts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show a resolved post
    Show {
        /// Post slug
        slug: String,
    },

    /// Start a local content server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured one)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured one)
        #[arg(short, long)]
        ip: Option<String>,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Delete the slug manifest
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_pipeline=debug,info"
    } else {
        "blog_pipeline=info"
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
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog site in {:?}", target_dir);
            blog_pipeline::Blog::new(&target_dir)?.init()?;
            println!("Initialized blog site in {:?}", target_dir);
        }

        Commands::New { title, slug } => {
            let blog = blog_pipeline::Blog::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            blog.new_post(&title, slug.as_deref())?;
        }

        Commands::Scan { out } => {
            let blog = blog_pipeline::Blog::new(&base_dir)?;
            tracing::info!("Scanning {:?}...", blog.content_dir);
            let slugs = blog.scan(out.as_deref())?;
            for slug in &slugs {
                println!("{}", slug);
            }
        }

        Commands::List { r#type, tag } => {
            let blog = blog_pipeline::Blog::new(&base_dir)?;
            blog_pipeline::commands::list::run(&blog, &r#type, tag.as_deref()).await?;
        }

        Commands::Show { slug } => {
            let blog = blog_pipeline::Blog::new(&base_dir)?;
            blog_pipeline::commands::show::run(&blog, &slug).await?;
        }

        Commands::Serve {
            port,
            ip,
            r#static,
        } => {
            let blog = blog_pipeline::Blog::new(&base_dir)?;
            let port = port.unwrap_or(blog.config.server.port);
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());

            tracing::info!("Starting server at http://{}:{}", ip, port);
            blog_pipeline::server::start(&blog, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            let blog = blog_pipeline::Blog::new(&base_dir)?;
            tracing::info!("Cleaning generated files...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("blog-pipeline version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
