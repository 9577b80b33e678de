use super::Render;
use crate::document::Document;
use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

/// Writes the document as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html;

impl Render for Html {
    fn render(&self, document: &Document, outfile: &Path) -> Result<()> {
        debug!("Writing HTML to {}", outfile.display());
        std::fs::write(outfile, &document.html)
            .with_context(|| format!("Failed to write HTML to {}", outfile.display()))
    }
}
