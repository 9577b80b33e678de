use anyhow::{Context, Result};
use cli::Cli;
use config::Conversion;
use highlight::SyntectHighlighter;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::process::ExitCode;
use syntect::highlighting::ThemeSet;

mod cli;
mod config;
mod convert;
mod document;
mod error;
mod highlight;
mod markdown;
mod sinks;
mod source;

fn main() -> ExitCode {
    use clap::Parser;
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(cli::parse_exit_code(&e));
        }
    };

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error::user_message(&e));
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Ctrl-C exits the way a cancelled read does.
fn cancel_on_interrupt() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        let err = anyhow::Error::from(error::Error::Cancelled);
        eprintln!("{}", error::user_message(&err));
        std::process::exit(error::exit_code(&err).into());
    })
}

fn try_main(cli: Cli) -> Result<()> {
    cancel_on_interrupt().with_context(|| "Failed to install interrupt handler")?;
    let themes = ThemeSet::load_defaults();

    if cli.styles {
        return print_styles(&themes);
    }

    let conversion = Conversion::from_cli(cli, |name| highlight::resolve_theme_name(&themes, name))?;
    init_logging(conversion.debug);
    log::debug!("{conversion:#?}");

    let highlighter =
        SyntectHighlighter::new(themes, &conversion.style, conversion.line_numbers)?;
    log::debug!("Using theme: {}", highlighter.theme_name());
    let sink = sinks::Sink::for_conversion(&conversion);

    // debug output and the progress bar would draw over each other
    let progress = if conversion.debug {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(conversion.inputs.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );

    convert::convert_files(&conversion, &highlighter, &sink, &progress)?;

    writeln!(std::io::stdout(), "{}", conversion.outfile.display())
        .map_err(error::classify_io)
        .with_context(|| "Failed to print output path")?;
    Ok(())
}

fn print_styles(themes: &ThemeSet) -> Result<()> {
    write_styles(std::io::stdout().lock(), &highlight::theme_names(themes))
        .map_err(error::classify_io)
        .with_context(|| "Failed to print style names")
}

fn write_styles<W: Write>(mut out: W, names: &[String]) -> std::io::Result<()> {
    writeln!(out, "\nStyle names:\n    {}", names.join("\n    "))
}
