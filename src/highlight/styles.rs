//! CSS generation for highlighted source files.
//!
//! syntect turns a theme into class rules for the scopes it emits; on top of
//! that we add the layout for the wrapping `<pre>` and the line-number gutter.
//! The gutter takes its colour from the theme so dark themes stay readable.

use anyhow::{Context, Result};
use syntect::highlighting::{Color, Theme};
use syntect::html::{css_for_theme_with_class_style, ClassStyle};

/// CSS class prefix for syntax highlighting spans.
pub(super) const SCOPE_PREFIX: &str = "syn-";

const DEFAULT_GUTTER: Color = Color {
    r: 0x99,
    g: 0x99,
    b: 0x99,
    a: 0xff,
};

/// Generate the stylesheet for every highlighted file in the document.
pub fn generate_stylesheet(theme: &Theme, class_style: ClassStyle) -> Result<String> {
    let mut css = String::with_capacity(8192);

    css.push_str(&generate_base_styles(theme));
    css.push_str("\n/* Syntax highlighting */\n");
    css.push_str(
        &css_for_theme_with_class_style(theme, class_style)
            .with_context(|| "Failed to generate CSS for theme")?,
    );

    Ok(css)
}

fn generate_base_styles(theme: &Theme) -> String {
    let gutter = theme.settings.gutter_foreground.unwrap_or(DEFAULT_GUTTER);

    format!(
        r#"/* Code blocks */
.{div} pre {{
    padding: 0.5em;
    border-radius: 3px;
    line-height: 1.4;
    white-space: pre-wrap;
}}

/* Line numbers */
.lineno {{
    color: {gutter};
    font-style: normal;
    font-weight: normal;
    user-select: none;
}}
"#,
        div = super::DIV_CLASS,
        gutter = css_color(gutter),
    )
}

fn css_color(c: Color) -> String {
    format!("rgb({}, {}, {})", c.r, c.g, c.b)
}

/// Returns the CSS class prefix used for syntax highlighting.
pub fn scope_prefix() -> &'static str {
    SCOPE_PREFIX
}
