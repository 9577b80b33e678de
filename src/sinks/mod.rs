use crate::config::Conversion;
use crate::document::Document;
use anyhow::Result;
use std::path::Path;

mod html;
pub use html::*;

mod pdf;
pub use pdf::*;

/// Where an assembled document ends up.
#[derive(Debug)]
pub enum Sink {
    Html(Html),
    Pdf(Pdf),
}

pub trait Render {
    fn render(&self, document: &Document, outfile: &Path) -> Result<()>;
}

impl Render for Sink {
    fn render(&self, document: &Document, outfile: &Path) -> Result<()> {
        match self {
            Sink::Html(h) => h.render(document, outfile),
            Sink::Pdf(p) => p.render(document, outfile),
        }
    }
}

impl Sink {
    pub fn for_conversion(conversion: &Conversion) -> Sink {
        if conversion.html {
            Sink::Html(Html)
        } else {
            Sink::Pdf(Pdf::new(&conversion.pdf_renderer))
        }
    }
}
