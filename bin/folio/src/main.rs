//! Folio CLI
//!
//! Builds and serves a grid-based portfolio and blog from Markdown/MDX.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use folio::cmd::{build::BuildOverrides, new::ContentTemplate};

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "A portfolio and blog static site generator"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site for production
    Build {
        /// Output directory (overrides build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include draft documents
        #[arg(long)]
        drafts: bool,
        /// Override site base URL (e.g., https://bridger.to)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Start development server with live reload
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Create new content from template
    New {
        /// Path for the new content, relative to the content directory (e.g., posts/my-article)
        path: PathBuf,
        /// Template type
        #[arg(short, long, value_enum, default_value_t = ContentTemplate::Post)]
        template: ContentTemplate,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            drafts,
            base_url,
        } => {
            let overrides = BuildOverrides {
                output,
                drafts,
                base_url,
            };
            folio::cmd::build::run(&cli.config, &overrides)?;
        }
        Commands::Serve { port, open } => {
            folio::cmd::serve::run(&cli.config, port, open).await?;
        }
        Commands::New { path, template } => {
            folio::cmd::new::run(&cli.config, &path, template)?;
        }
        Commands::Check { strict } => {
            folio::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
