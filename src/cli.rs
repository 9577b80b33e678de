use crate::error::EXIT_FAILURE;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Convert code and text files into a single highlighted PDF (or HTML) document
#[derive(Parser, Debug)]
#[clap(author, version, about, disable_version_flag = true)]
pub struct Cli {
    /// File names to convert, or `-` for stdin. If no names are given, stdin is used
    #[clap(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Print some debug info while running
    #[clap(short = 'D', long)]
    pub debug: bool,

    /// Highlight markdown syntax, instead of converting to HTML
    #[clap(short = 'f', long)]
    pub forcemd: bool,

    /// Output in HTML instead of PDF. Using .htm or .html as the output file
    /// extension will automatically set this flag
    #[clap(short = 'H', long)]
    pub html: bool,

    /// Use line numbers
    #[clap(short = 'l', long)]
    pub linenumbers: bool,

    /// Output file name [default: <input_basename>.pdf]
    #[clap(short = 'o', long, value_name = "file")]
    pub out: Option<PathBuf>,

    /// Highlighting theme to use for code files
    #[clap(
        short = 's',
        long,
        value_name = "name",
        env = "CODEPDF_STYLE",
        default_value = crate::highlight::DEFAULT_THEME
    )]
    pub style: String,

    /// Print all known highlighting themes
    #[clap(short = 'S', long)]
    pub styles: bool,

    /// Title for the document [default: <input_filename>]
    #[clap(short = 't', long, value_name = "title")]
    pub title: Option<String>,

    /// Program used to render HTML into PDF
    #[clap(long, value_name = "program", env = "CODEPDF_WKHTMLTOPDF", default_value = "wkhtmltopdf", hide = true)]
    pub wkhtmltopdf: PathBuf,

    /// Show version
    #[clap(short = 'v', long, action = ArgAction::Version)]
    version: (),
}

/// Exit code for a command line clap didn't accept. Help and version output
/// is a success; every usage error is a plain failure.
pub fn parse_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_FAILURE,
    }
}
