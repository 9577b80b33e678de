//! The resolved conversion request.
//!
//! Command line arguments are turned into a [`Conversion`] once, up front: the
//! style name is checked, the output path is worked out and HTML mode is
//! settled. Nothing here reads input files, so a bad style name is reported
//! before any work is done.

use crate::cli::Cli;
use crate::error::Error;
use crate::source::{SourceFile, STDIN_DISPLAY_NAME};
use std::path::{Path, PathBuf};

/// Everything one run of the pipeline needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Inputs in the order they'll appear in the document
    pub inputs: Vec<SourceFile>,
    /// Where the document is written
    pub outfile: PathBuf,
    /// Canonical name of the highlighting theme
    pub style: String,
    /// Prefix highlighted lines with line numbers
    pub line_numbers: bool,
    /// Explicit document title
    pub title: Option<String>,
    /// Highlight Markdown files as source instead of rendering them
    pub force_highlight: bool,
    /// Write HTML instead of PDF
    pub html: bool,
    /// Emit debug diagnostics
    pub debug: bool,
    /// Program that renders HTML into PDF
    pub pdf_renderer: PathBuf,
}

impl Conversion {
    /// Resolve the command line into a conversion request.
    ///
    /// `resolve_style` maps the user's style name to its canonical form, or
    /// fails with an invalid-argument error.
    pub fn from_cli<F>(cli: Cli, resolve_style: F) -> Result<Conversion, Error>
    where
        F: FnOnce(&str) -> Result<String, Error>,
    {
        let style = resolve_style(&cli.style)?;

        let inputs: Vec<SourceFile> = if cli.files.is_empty() {
            vec![SourceFile::Stdin]
        } else {
            cli.files.into_iter().map(SourceFile::from).collect()
        };

        let outfile = output_name(&inputs, cli.out, cli.html);
        let html = cli.html || is_html_name(&outfile);

        Ok(Conversion {
            inputs,
            outfile,
            style,
            line_numbers: cli.linenumbers,
            title: cli.title,
            force_highlight: cli.forcemd,
            html,
            debug: cli.debug,
            pdf_renderer: cli.wkhtmltopdf,
        })
    }

    /// Whether `input` is rendered as Markdown rather than highlighted.
    pub fn renders_markdown(&self, input: &SourceFile) -> bool {
        !self.force_highlight && input.is_markdown()
    }
}

/// Pick the output file name when the user hasn't given one:
/// `<first input's directory>/<first input's stem>.(pdf|html)`.
pub fn output_name(inputs: &[SourceFile], explicit: Option<PathBuf>, html: bool) -> PathBuf {
    if let Some(explicit) = explicit {
        return explicit;
    }

    let (parent, stem) = match inputs.first() {
        Some(SourceFile::Path(path)) => (
            path.parent().filter(|p| !p.as_os_str().is_empty()),
            path.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| STDIN_DISPLAY_NAME.to_string()),
        ),
        Some(SourceFile::Stdin) | None => (None, STDIN_DISPLAY_NAME.to_string()),
    };

    let parent = match parent {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    let ext = if html { "html" } else { "pdf" };
    parent.join(format!("{stem}.{ext}"))
}

/// `.htm` or `.html`, in any case.
pub fn is_html_name(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("htm") || e.eq_ignore_ascii_case("html"))
        .unwrap_or(false)
}
