//! Markdown rendering.
//!
//! pulldown-cmark does the parsing; fenced and indented code blocks are pulled
//! out of the event stream and handed to the [`Highlighter`] so they come back
//! with inline colours from the selected theme.

use crate::highlight::{Highlighter, DIV_CLASS};
use anyhow::{Context, Result};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Language token from a fenced code block's info string (`rust,ignore` -> `rust`).
fn info_token(info: &str) -> Option<String> {
    info.split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Render Markdown to an HTML5 `div`.
pub fn render(text: &str, highlighter: &dyn Highlighter) -> Result<String> {
    let mut events = Vec::new();
    // language token and collected text of the code block we're inside, if any
    let mut code: Option<(Option<String>, String)> = None;

    for event in Parser::new_ext(text, options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let token = match kind {
                    CodeBlockKind::Fenced(info) => info_token(&info),
                    CodeBlockKind::Indented => None,
                };
                code = Some((token, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((token, block)) = code.take() {
                    let html = highlighter
                        .highlight_block(token.as_deref(), &block)
                        .with_context(|| {
                            format!(
                                "Failed to highlight {} code block",
                                token.as_deref().unwrap_or("plain")
                            )
                        })?;
                    events.push(Event::Html(html.into()));
                }
            }
            Event::Text(t) => match code.as_mut() {
                Some((_, block)) => block.push_str(&t),
                None => events.push(Event::Text(t)),
            },
            e => events.push(e),
        }
    }

    let mut html = String::with_capacity(text.len() * 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    Ok(format!("<div class=\"markdown {DIV_CLASS}\">\n{html}</div>"))
}
