//! Volume page CLI
//!
//! Walks a folder tree and writes one HTML page per leaf folder from the
//! `*_data.json` metadata files found there.

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use volume_html::{run, PublishOptions, RenderOptions, OCR_VIEWER_BASE_URL, OUTPUT_FILE_NAME};

#[derive(Parser)]
#[command(name = "volume-html")]
#[command(about = "Render merged volume metadata as one HTML page per leaf folder")]
#[command(version)]
struct Cli {
    /// Root folder to walk
    root: PathBuf,

    /// File name of the page written into each leaf folder
    #[arg(long, default_value = OUTPUT_FILE_NAME)]
    output_name: String,

    /// OCR viewer URL prefix; the METS identifier is appended
    #[arg(long, default_value = OCR_VIEWER_BASE_URL)]
    viewer_url: String,

    /// Render pages without writing them
    #[arg(long)]
    dry_run: bool,

    /// Log debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    fn options(&self) -> PublishOptions {
        PublishOptions {
            output_file_name: self.output_name.clone(),
            render: RenderOptions {
                viewer_base_url: self.viewer_url.clone(),
                ..RenderOptions::default()
            },
            dry_run: self.dry_run,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let summary = run(&cli.root, &cli.options());
    if summary.failed > 0 {
        warn!(
            "{} of {} leaf folders failed",
            summary.failed, summary.leaf_folders
        );
    }
}
