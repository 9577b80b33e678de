//! PDF output through an external HTML-to-PDF renderer.
//!
//! The document is piped to `wkhtmltopdf` on stdin (`-` as the input file) with
//! the title set and progress output silenced. Anything the renderer prints to
//! stderr is kept so a failure can say why.

use super::Render;
use crate::document::Document;
use crate::error::Error;
use anyhow::{Context, Result};
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone)]
pub struct Pdf {
    program: PathBuf,
}

impl Pdf {
    pub fn new<P: AsRef<Path>>(program: P) -> Pdf {
        Pdf {
            program: program.as_ref().to_path_buf(),
        }
    }

    fn command(&self, document: &Document, outfile: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--title")
            .arg(&document.title)
            .arg("--quiet")
            .arg("-")
            .arg(outfile)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl Render for Pdf {
    fn render(&self, document: &Document, outfile: &Path) -> Result<()> {
        debug!(
            "Converting to PDF with {} -> {}",
            self.program.display(),
            outfile.display()
        );

        let mut child = self.command(document, outfile).spawn().with_context(|| {
            format!(
                "Failed to run `{}`, is it installed and on your PATH?",
                self.program.display()
            )
        })?;

        // a renderer that dies early closes its stdin; its exit status says more
        // than the broken pipe does, so check that first
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(document.html.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output().with_context(|| {
            format!("Failed to wait for `{}`", self.program.display())
        })?;
        if !output.status.success() {
            return Err(Error::Renderer {
                program: self.program.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        written.with_context(|| {
            format!("Failed to send document to `{}`", self.program.display())
        })
    }
}
