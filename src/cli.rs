use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::formatter::{FormatOutcome, Formatter};
use crate::process_formatter::ProcessFormatter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the formatter executable.
    #[arg(long)]
    formatter: PathBuf,

    /// Kill the formatter if it has not finished within this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log at debug level.
    #[arg(long)]
    verbose: bool,

    /// File to format; reads stdin when omitted.
    file: Option<PathBuf>,
}

pub fn cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    simple_logging::log_to_stderr(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let (content, file_identifier) = match &cli.file {
        Some(path) => (
            std::fs::read_to_string(path)?,
            path.display().to_string(),
        ),
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            (content, "<stdin>".to_string())
        }
    };

    let formatter = {
        let formatter = ProcessFormatter::new(&cli.formatter);
        match cli.timeout_secs {
            Some(secs) => formatter.with_timeout(Duration::from_secs(secs)),
            None => formatter,
        }
    };

    match formatter.format(&content, &file_identifier) {
        FormatOutcome::Formatted(text) => {
            print!("{text}");
            Ok(())
        }
        FormatOutcome::Failed => {
            // The failure detail is already on the error log; the caller
            // keeps its original text.
            std::process::exit(1);
        }
    }
}
