//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::projects::ProjectFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A small static generator for a personal portfolio", long_about = None)]
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
    /// Generate the static site
    #[command(alias = "b")]
    Build {
        /// Rebuild when content or configuration changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Create a new blog post
    New {
        /// Title of the new post
        title: String,

        /// File name to use instead of one derived from the title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List site content
    List {
        /// Type of content to list (post, project, tab, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only projects in this category (tab)
        #[arg(long)]
        category: Option<String>,

        /// Only projects using this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only projects matching this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Remove the generated site
    Clean,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
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
        Commands::Build { watch } => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Generating site in {:?}", site.public_dir);
            site.generate()?;
            println!("Generated successfully!");

            if watch {
                folio::commands::build::watch(&site)?;
            }
        }

        Commands::New { title, slug } => {
            let site = folio::Folio::new(&base_dir)?;
            let path = folio::commands::new::create_post(&site, &title, slug.as_deref())?;
            println!("Created {}", path.display());
        }

        Commands::List {
            r#type,
            category,
            tag,
            search,
        } => {
            let site = folio::Folio::new(&base_dir)?;
            let mut filter = ProjectFilter::new();
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(tag) = tag {
                filter = filter.tag(tag);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }
            folio::commands::list::run(&site, &r#type, &filter)?;
        }

        Commands::Clean => {
            let site = folio::Folio::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
