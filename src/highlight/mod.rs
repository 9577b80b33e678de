//! Syntax highlighting for source files and Markdown code blocks.
//!
//! The pipeline only talks to the [`Highlighter`] trait so the underlying library
//! can be swapped without touching document assembly. [`SyntectHighlighter`] is
//! the implementation backed by syntect's bundled syntaxes and themes.
//!
//! Source files are rendered with CSS classes (`syn-…`) and share a single
//! stylesheet for the whole document. Markdown code blocks are rendered with
//! inline colours instead, so a Markdown fragment looks right on its own.

mod styles;

use crate::error::Error;
use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{
    start_highlighted_html_snippet, styled_line_to_highlighted_html, ClassStyle,
    ClassedHTMLGenerator, IncludeBackground,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Theme used when none is given on the command line.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// CSS class of the div wrapping each highlighted file.
pub const DIV_CLASS: &str = "hilight";

/// Prefix for the classes syntect puts on token spans.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: styles::SCOPE_PREFIX,
};

/// Turns text into highlighted HTML.
pub trait Highlighter {
    /// Highlight a whole file. `path` is used to pick the language; `None`
    /// means the language must be guessed from the text.
    fn highlight(&self, path: Option<&Path>, text: &str) -> Result<String>;

    /// Highlight a code block with inline colours. `token` is a language name
    /// or extension such as `rust` or `py`.
    fn highlight_block(&self, token: Option<&str>, text: &str) -> Result<String>;

    /// The CSS needed by the output of [`Highlighter::highlight`].
    fn stylesheet(&self) -> Result<String>;
}

/// All theme names syntect knows, sorted alphabetically (ignoring case).
pub fn theme_names(themes: &ThemeSet) -> Vec<String> {
    let mut names: Vec<String> = themes.themes.keys().cloned().collect();
    names.sort_by_key(|n| n.to_lowercase());
    names
}

/// Find the canonical name of a theme, ignoring case.
pub fn resolve_theme_name(themes: &ThemeSet, name: &str) -> Result<String, Error> {
    themes
        .themes
        .keys()
        .find(|known| known.eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| Error::unknown_style(name, &theme_names(themes)))
}

/// How the syntax for a file was chosen, for debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    ForcedByExtension,
    FileName,
    Content,
    Default,
}

pub struct SyntectHighlighter {
    ss: SyntaxSet,
    theme: Theme,
    theme_name: String,
    line_numbers: bool,
}

impl SyntectHighlighter {
    /// Build a highlighter for the named theme, taking it out of `themes`.
    pub fn new(mut themes: ThemeSet, theme_name: &str, line_numbers: bool) -> Result<Self, Error> {
        let theme_name = resolve_theme_name(&themes, theme_name)?;
        let theme = themes
            .themes
            .remove(&theme_name)
            .ok_or_else(|| Error::unknown_style(&theme_name, &theme_names(&themes)))?;

        Ok(SyntectHighlighter {
            ss: SyntaxSet::load_defaults_newlines(),
            theme,
            theme_name,
            line_numbers,
        })
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Pick a syntax: forced plain text for `.txt`, then by file name or
    /// extension, then by the first line of the contents, then plain text.
    pub fn find_syntax(&self, path: Option<&Path>, text: &str) -> (&SyntaxReference, Detection) {
        let file_name = path
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if file_name.to_lowercase().ends_with(".txt") {
            return (self.ss.find_syntax_plain_text(), Detection::ForcedByExtension);
        }

        let by_name = path.and_then(|p| {
            self.ss.find_syntax_by_extension(file_name).or_else(|| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .and_then(|e| self.ss.find_syntax_by_extension(e))
            })
        });
        if let Some(syntax) = by_name {
            return (syntax, Detection::FileName);
        }

        if let Some(syntax) = self.ss.find_syntax_by_first_line(text) {
            return (syntax, Detection::Content);
        }

        (self.ss.find_syntax_plain_text(), Detection::Default)
    }

    fn block_syntax(&self, token: Option<&str>, text: &str) -> &SyntaxReference {
        token
            .filter(|t| !t.is_empty())
            .and_then(|t| self.ss.find_syntax_by_token(t))
            .or_else(|| self.ss.find_syntax_by_first_line(text))
            .unwrap_or_else(|| self.ss.find_syntax_plain_text())
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, path: Option<&Path>, text: &str) -> Result<String> {
        let (syntax, detection) = self.find_syntax(path, text);
        debug!(
            "Lexer {:<20} {:>20} -> {}",
            format!("{detection:?}:"),
            syntax.name,
            path.map(|p| p.display().to_string())
                .unwrap_or_else(|| crate::source::STDIN_DISPLAY_NAME.to_string())
        );

        let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &self.ss, CLASS_STYLE);
        let mut line_count = 0;
        for (i, line) in LinesWithEndings::from(text).enumerate() {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .with_context(|| format!("Failed to highlight line {}", i + 1))?;
            line_count += 1;
        }
        let mut html = generator.finalize();
        if self.line_numbers {
            html = number_lines(&html, line_count, r#"<span class="lineno">"#);
        }

        Ok(format!(
            "<pre class=\"{}code\">{html}</pre>",
            styles::scope_prefix()
        ))
    }

    fn highlight_block(&self, token: Option<&str>, text: &str) -> Result<String> {
        let syntax = self.block_syntax(token, text);
        let mut h = HighlightLines::new(syntax, &self.theme);
        let (mut html, _background) = start_highlighted_html_snippet(&self.theme);

        for (i, line) in LinesWithEndings::from(text).enumerate() {
            if self.line_numbers {
                html.push_str(&format!(
                    r#"<span style="color: #999999; font-style: normal;">{:>4} </span>"#,
                    i + 1
                ));
            }
            let ranges = h
                .highlight_line(line, &self.ss)
                .with_context(|| format!("Failed to highlight line {}", i + 1))?;
            let line_html = styled_line_to_highlighted_html(&ranges, IncludeBackground::No)
                .with_context(|| format!("Failed to render line {}", i + 1))?;
            html.push_str(&line_html);
        }
        html.push_str("</pre>\n");
        Ok(html)
    }

    fn stylesheet(&self) -> Result<String> {
        styles::generate_stylesheet(&self.theme, CLASS_STYLE)
    }
}

/// Prefix each of the first `line_count` lines of `html` with a line number.
///
/// Anything after the last counted newline is closing markup and stays
/// unnumbered.
fn number_lines(html: &str, line_count: usize, open_tag: &str) -> String {
    let mut out = String::with_capacity(html.len() + line_count * 32);
    for (i, segment) in html.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i < line_count {
            out.push_str(&format!("{open_tag}{:>4} </span>", i + 1));
        }
        out.push_str(segment);
    }
    out
}
