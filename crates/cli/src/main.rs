use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use synchro_pm_docs::{bookmarks, build_report, metadata, ReportConfig};

/// Generates the Synchro PM architecture documentation PDF.
///
/// Without arguments the report is typeset in the system Times New Roman font
/// and written to `download/SynchroPM_Architecture_Documentation.pdf`.
#[derive(Parser)]
#[command(author, version, about = "Generate the Synchro PM architecture documentation PDF")]
struct Cli {
    /// Write the PDF to this path instead of the default location.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// TrueType font file used for every face.
    #[arg(short, long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Re-read the written file and log its metadata and outline.
    #[arg(long)]
    verify: bool,
}

impl Cli {
    fn config(&self) -> ReportConfig {
        let mut config = ReportConfig::default();
        if let Some(output) = &self.output {
            config = config.with_output_path(output);
        }
        if let Some(font) = &self.font {
            config = config.with_font_path(font);
        }
        config
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.config();

    let result = build_report(&config)
        .map_err(|err| Box::new(err) as Box<dyn Error>)
        .and_then(|summary| {
            info!(
                "{} pages, {} tables, {} outline entries",
                summary.page_count, summary.table_count, summary.outline_entries
            );
            if cli.verify {
                verify(&summary.output_path)?;
            }
            println!("PDF generated: {}", summary.output_path.display());
            Ok(())
        });

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn verify(path: &Path) -> Result<(), Box<dyn Error>> {
    let document = lopdf::Document::load(path)?;
    let info = metadata::document_info(&document)?;
    info!("Title: {}", info.title);
    info!("Author: {}", info.author);
    info!("Creator: {}", info.creator);
    info!("Subject: {}", info.subject);
    info!("Pages: {}", document.get_pages().len());
    for (depth, title) in bookmarks::read_outline(&document)? {
        info!("{}{}", "  ".repeat(depth), title);
    }
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
