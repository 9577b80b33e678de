//! Per-file fragments and the final HTML document.
//!
//! Each input becomes one [`Fragment`]; fragments are joined with a horizontal
//! rule and wrapped in a page with a single inlined stylesheet.

use crate::highlight::DIV_CLASS;

/// Separator between consecutive fragments.
pub const SEPARATOR: &str = r#"<hr class="nv">"#;

const BASE_STYLE: &str = "body {font-family: sans-serif;}";

const RULE_STYLE: &str = "hr {
border-style: hidden;
height: 2px;
background: #f1f1f1;
margin-top: 25px;
}";

const LINK_ICON: &str = r#"<svg style="vertical-align: middle; display: inline;" height="16" version="1.1" viewBox="0 0 16 16" width="16">
<path d="M4 9h1v1H4c-1.5 0-3-1.69-3-3.5S2.55 3 4 3h4c1.45 0 3 1.69 3 3.5 0 1.41-.91 2.72-2 3.25V8.59c.58-.45 1-1.27 1-2.09C10 5.22 8.98 4 8 4H4c-.98 0-2 1.22-2 2.5S3 9 4 9zm9-3h-1v1h1c1 0 2 1.22 2 2.5S13.98 12 13 12H9c-.98 0-2-1.22-2-2.5 0-.83.42-1.64 1-2.09V6.25c-1.09.53-2 1.84-2 3.25C6 11.31 7.55 13 9 13h4c1.45 0 3-1.69 3-3.5S14.5 6 13 6z"></path>
</svg>"#;

/// The rendered HTML of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub html: String,
}

impl Fragment {
    /// Wrap already-rendered Markdown.
    pub fn markdown<S: ToString>(name: S, html: String) -> Fragment {
        Fragment {
            name: name.to_string(),
            html,
        }
    }

    /// Wrap highlighted source in a file div with a permalinked heading.
    pub fn highlighted<S: ToString>(name: S, highlighted: &str) -> Fragment {
        let name = name.to_string();
        let id = slug(&name);
        let html = format!(
            r#"<div class="file">
{permalink}
<h2 id="{id}" style="display: inline-block">{title}</h2>
<div class="{DIV_CLASS}">
{highlighted}
</div>
</div>"#,
            permalink = permalink(&id),
            id = html_escape::encode_double_quoted_attribute(&id),
            title = html_escape::encode_text(&name),
        );
        Fragment { name, html }
    }

    /// Placeholder for an input that isn't text.
    pub fn binary<S: ToString>(name: S) -> Fragment {
        Fragment::highlighted(name, r#"<p class="binary-placeholder">&lt;binary data&gt;</p>"#)
    }
}

/// The assembled document, ready to be written or rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub html: String,
}

impl Document {
    /// Join `fragments` in order and wrap them in a full page.
    pub fn assemble(fragments: &[Fragment], stylesheet: Option<&str>, title: &str) -> Document {
        let body = fragments
            .iter()
            .map(|f| f.html.as_str())
            .collect::<Vec<_>>()
            .join(SEPARATOR);

        let mut styles = vec![BASE_STYLE];
        styles.extend(stylesheet);
        styles.push(RULE_STYLE);

        let mut html = String::with_capacity(body.len() + 4096);
        html.push_str("<html>\n<head>\n");
        html.push_str(&format!("<title>{}</title>\n", html_escape::encode_text(title)));
        html.push_str("<style type=\"text/css\">\n");
        html.push_str(&styles.join("\n"));
        html.push_str("\n</style>\n</head>\n<body>\n");
        html.push_str(&body);
        html.push_str("\n</body>\n</html>");

        Document {
            title: title.to_string(),
            html,
        }
    }
}

/// Turn a file name or other text into an element id: non-alphanumeric
/// characters are dropped from each word, words are joined with `-`.
pub fn slug(s: &str) -> String {
    s.split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// The permalink icon for a heading with the given id.
pub fn permalink(id: &str) -> String {
    format!(
        "<a href=\"#{}\" style=\"text-decoration: none;\">\n{LINK_ICON}\n</a>",
        html_escape::encode_double_quoted_attribute(id)
    )
}
