//! Conversion orchestration.
//!
//! Runs a [`Conversion`] from start to finish: every input is read and turned
//! into a fragment in order, the fragments are assembled into one document
//! with a single shared stylesheet, and the document is handed to a sink.

use crate::config::Conversion;
use crate::document::{Document, Fragment};
use crate::highlight::Highlighter;
use crate::markdown;
use crate::sinks::Render;
use crate::source::{Contents, SourceFile};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::debug;

/// Convert every input of `conversion` into one document and render it.
pub fn convert_files(
    conversion: &Conversion,
    highlighter: &dyn Highlighter,
    sink: &dyn Render,
    progress: &ProgressBar,
) -> Result<()> {
    debug!(
        "Converting files:\n    {}",
        conversion
            .inputs
            .iter()
            .map(SourceFile::display_name)
            .collect::<Vec<_>>()
            .join("\n    ")
    );
    debug!("Output file: {}", conversion.outfile.display());
    debug!("     Forced: {}", conversion.force_highlight);
    debug!("    LineNos: {}", conversion.line_numbers);
    debug!("      Style: {}", conversion.style);
    debug!("      Title: {:?}", conversion.title);

    let result = build_document(conversion, highlighter, progress).and_then(|document| {
        progress.set_message(if conversion.html {
            "Writing HTML..."
        } else {
            "Converting to PDF..."
        });
        sink.render(&document, &conversion.outfile)
            .with_context(|| format!("Failed to write {}", conversion.outfile.display()))
    });
    // the bar mustn't linger above an error message
    progress.finish_and_clear();

    result
}

/// Read, render and assemble every input.
pub fn build_document(
    conversion: &Conversion,
    highlighter: &dyn Highlighter,
    progress: &ProgressBar,
) -> Result<Document> {
    let mut fragments = Vec::with_capacity(conversion.inputs.len());
    // the stylesheet is shared by every fragment, so it's only built once
    let mut stylesheet: Option<String> = None;

    for input in &conversion.inputs {
        progress.set_message(input.display_name());
        if stylesheet.is_none() {
            stylesheet = Some(
                highlighter
                    .stylesheet()
                    .with_context(|| "Failed to generate stylesheet")?,
            );
        }
        fragments.push(convert_file(conversion, highlighter, input, progress)?);
        progress.inc(1);
    }

    let title = conversion
        .title
        .clone()
        .or_else(|| fragments.last().map(|f| f.name.clone()))
        .unwrap_or_default();

    Ok(Document::assemble(&fragments, stylesheet.as_deref(), &title))
}

/// Turn one input into a fragment, as Markdown or as highlighted source.
pub fn convert_file(
    conversion: &Conversion,
    highlighter: &dyn Highlighter,
    input: &SourceFile,
    progress: &ProgressBar,
) -> Result<Fragment> {
    let name = input.display_name();
    let contents = match input {
        // don't let the progress bar draw over the stdin prompt
        SourceFile::Stdin => progress.suspend(|| input.read())?,
        SourceFile::Path(_) => input.read()?,
    };

    let text = match contents {
        Contents::Text(text) => text,
        Contents::Binary => {
            debug!("Binary data, skipping: {name}");
            return Ok(Fragment::binary(name));
        }
    };

    if conversion.renders_markdown(input) {
        debug!("Converting MD: {name}");
        let html = markdown::render(&text, highlighter)
            .with_context(|| format!("Failed to render Markdown in {name}"))?;
        Ok(Fragment::markdown(name, html))
    } else {
        debug!("Highlighting: {name}");
        let html = highlighter
            .highlight(input.path(), &text)
            .with_context(|| format!("Failed to highlight {name}"))?;
        Ok(Fragment::highlighted(name, &html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SEPARATOR;
    use crate::highlight::{SyntectHighlighter, DEFAULT_THEME};
    use std::cell::{Cell, RefCell};
    use std::path::{Path, PathBuf};
    use syntect::highlighting::ThemeSet;

    /// Tags its output so tests can see which path an input took.
    #[derive(Default)]
    struct Tagging {
        stylesheets: Cell<usize>,
    }

    impl Highlighter for Tagging {
        fn highlight(&self, _path: Option<&Path>, text: &str) -> Result<String> {
            Ok(format!("<pre>HL:{}</pre>", text.trim()))
        }

        fn highlight_block(&self, _token: Option<&str>, text: &str) -> Result<String> {
            Ok(format!("<pre>BLOCK:{}</pre>", text.trim()))
        }

        fn stylesheet(&self) -> Result<String> {
            self.stylesheets.set(self.stylesheets.get() + 1);
            Ok(".tagging {}".to_string())
        }
    }

    /// Keeps the rendered document instead of writing it.
    #[derive(Default)]
    struct Capture {
        rendered: RefCell<Option<(Document, PathBuf)>>,
    }

    impl Render for Capture {
        fn render(&self, document: &Document, outfile: &Path) -> Result<()> {
            *self.rendered.borrow_mut() = Some((document.clone(), outfile.to_path_buf()));
            Ok(())
        }
    }

    fn conversion(inputs: Vec<SourceFile>, dir: &Path) -> Conversion {
        Conversion {
            inputs,
            outfile: dir.join("out.html"),
            style: DEFAULT_THEME.to_string(),
            line_numbers: false,
            title: None,
            force_highlight: false,
            html: true,
            debug: false,
            pdf_renderer: PathBuf::from("wkhtmltopdf"),
        }
    }

    fn fixture(dir: &Path, name: &str, contents: &str) -> SourceFile {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("can write fixture");
        SourceFile::from(path)
    }

    #[test]
    fn fragments_keep_input_order() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let inputs = vec![
            fixture(dir.path(), "b.rs", "second"),
            fixture(dir.path(), "a.rs", "first"),
            fixture(dir.path(), "c.py", "third"),
        ];
        let highlighter = Tagging::default();
        let doc = build_document(
            &conversion(inputs, dir.path()),
            &highlighter,
            &ProgressBar::hidden(),
        )
        .expect("can build document");

        let second = doc.html.find("HL:second").expect("has b.rs");
        let first = doc.html.find("HL:first").expect("has a.rs");
        let third = doc.html.find("HL:third").expect("has c.py");
        assert!(second < first && first < third);
        assert_eq!(doc.html.matches(SEPARATOR).count(), 2);
        assert_eq!(highlighter.stylesheets.get(), 1);
        assert!(doc.html.contains(".tagging {}"));
    }

    #[test]
    fn markdown_is_rendered_unless_forced() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let readme = fixture(dir.path(), "README.md", "# Hello\n\n```\ncode\n```\n");

        let mut c = conversion(vec![readme], dir.path());
        let doc = build_document(&c, &Tagging::default(), &ProgressBar::hidden())
            .expect("can build document");
        assert!(doc.html.contains("<h1>Hello</h1>"));
        assert!(doc.html.contains("BLOCK:code"));
        assert!(doc.html.contains(r#"<div class="markdown hilight">"#));

        c.force_highlight = true;
        let doc = build_document(&c, &Tagging::default(), &ProgressBar::hidden())
            .expect("can build document");
        assert!(doc.html.contains("HL:# Hello"));
        assert!(doc.html.contains(r#"<h2 id="readmemd""#));
    }

    #[test]
    fn title_defaults_to_last_input() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let inputs = vec![
            fixture(dir.path(), "one.rs", "1"),
            fixture(dir.path(), "two.rs", "2"),
        ];
        let mut c = conversion(inputs, dir.path());

        let doc = build_document(&c, &Tagging::default(), &ProgressBar::hidden())
            .expect("can build document");
        assert_eq!(doc.title, "two.rs");

        c.title = Some("My Code".to_string());
        let doc = build_document(&c, &Tagging::default(), &ProgressBar::hidden())
            .expect("can build document");
        assert_eq!(doc.title, "My Code");
        assert!(doc.html.contains("<title>My Code</title>"));
    }

    #[test]
    fn binary_inputs_get_a_placeholder() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("image.png");
        std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]).expect("can write fixture");

        let doc = build_document(
            &conversion(vec![SourceFile::from(path)], dir.path()),
            &Tagging::default(),
            &ProgressBar::hidden(),
        )
        .expect("can build document");
        assert!(doc.html.contains("&lt;binary data&gt;"));
    }

    #[test]
    fn missing_input_fails_with_its_name() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let c = conversion(vec![SourceFile::from(dir.path().join("gone.rs"))], dir.path());
        let progress = ProgressBar::hidden();
        let err = convert_files(&c, &Tagging::default(), &Capture::default(), &progress)
            .expect_err("input is missing");
        assert!(format!("{err:#}").contains("gone.rs"));
        assert!(progress.is_finished());
    }

    #[test]
    fn document_goes_to_the_sink() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let c = conversion(vec![fixture(dir.path(), "main.rs", "fn main() {}\n")], dir.path());
        let highlighter = SyntectHighlighter::new(ThemeSet::load_defaults(), DEFAULT_THEME, true)
            .expect("default theme exists");
        let sink = Capture::default();

        convert_files(&c, &highlighter, &sink, &ProgressBar::hidden()).expect("can convert");

        let rendered = sink.rendered.borrow();
        let (doc, outfile) = rendered.as_ref().expect("sink was called");
        assert_eq!(outfile, &c.outfile);
        assert_eq!(doc.title, "main.rs");
        assert!(doc.html.contains(".syn-code"));
        assert!(doc.html.contains(r#"<span class="lineno">   1 </span>"#));
    }

    #[test]
    fn writes_html_end_to_end() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let c = conversion(
            vec![
                fixture(dir.path(), "notes.txt", "plain <text>\n"),
                fixture(dir.path(), "guide.md", "* item\n"),
            ],
            dir.path(),
        );
        let highlighter = SyntectHighlighter::new(ThemeSet::load_defaults(), DEFAULT_THEME, false)
            .expect("default theme exists");

        convert_files(
            &c,
            &highlighter,
            &crate::sinks::Sink::for_conversion(&c),
            &ProgressBar::hidden(),
        )
        .expect("can convert");

        let html = std::fs::read_to_string(&c.outfile).expect("output was written");
        assert!(html.starts_with("<html>"));
        assert!(html.contains("plain &lt;text&gt;"));
        assert!(html.contains("<li>item</li>"));
        assert_eq!(html.matches(SEPARATOR).count(), 1);
    }
}
