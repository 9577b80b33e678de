use anyhow::{Context, Result};
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

/// File name that triggers reading from stdin.
pub const STDIN_NAME: &str = "-";

/// Display name used for stdin.
pub const STDIN_DISPLAY_NAME: &str = "stdin";

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum SourceFile {
    /// Read the contents from standard input
    Stdin,

    /// The source file is a file on the local hard drive
    Path(PathBuf),
}

impl<T: Into<PathBuf>> From<T> for SourceFile {
    fn from(path: T) -> Self {
        let path = path.into();
        if path.as_os_str() == STDIN_NAME {
            SourceFile::Stdin
        } else {
            SourceFile::Path(path)
        }
    }
}

/// What we got when reading a source file.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Contents {
    Text(String),
    /// The file isn't valid UTF-8
    Binary,
}

impl SourceFile {
    /// The path used to pick a syntax and name outputs; stdin has none.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceFile::Stdin => None,
            SourceFile::Path(p) => Some(p.as_path()),
        }
    }

    /// The name shown in headings and titles: the last path component.
    pub fn display_name(&self) -> String {
        match self {
            SourceFile::Stdin => STDIN_DISPLAY_NAME.to_string(),
            SourceFile::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string()),
        }
    }

    /// The file name ends in `.md` or `.markdown`.
    pub fn is_markdown(&self) -> bool {
        self.path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(".md") || n.ends_with(".markdown"))
            .unwrap_or(false)
    }

    /// Read the whole source. Binary data isn't an error, it's reported as
    /// `Contents::Binary` so a placeholder can be rendered instead.
    pub fn read(&self) -> Result<Contents> {
        match self {
            SourceFile::Path(path) => match std::fs::read_to_string(path) {
                Ok(contents) => Ok(Contents::Text(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Ok(Contents::Binary),
                Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
            },
            SourceFile::Stdin => {
                let interactive = std::io::stdin().is_terminal() && console::user_attended();
                read_stdin(std::io::stdin().lock(), std::io::stdout().lock(), interactive)
            }
        }
    }
}

/// Read everything from `input`, printing a hint to `prompt` first when a
/// person is sitting at the terminal.
pub fn read_stdin<R: Read, W: Write>(mut input: R, mut prompt: W, interactive: bool) -> Result<Contents> {
    if interactive {
        writeln!(prompt, "\nReading from stdin until end of file (Ctrl + D)...\n")
            .with_context(|| "Failed to print stdin prompt")?;
        prompt.flush().with_context(|| "Failed to print stdin prompt")?;
    }

    let mut contents = String::new();
    match input.read_to_string(&mut contents) {
        Ok(_) => Ok(Contents::Text(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Ok(Contents::Binary),
        Err(e) => Err(e).with_context(|| "Failed to read stdin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn dash_means_stdin() {
        assert_eq!(SourceFile::from("-"), SourceFile::Stdin);
        assert_eq!(SourceFile::Stdin.display_name(), "stdin");
        assert_eq!(SourceFile::Stdin.path(), None);
        assert!(!SourceFile::Stdin.is_markdown());
    }

    #[test]
    fn display_name_is_the_file_name() {
        let file = SourceFile::from("some/dir/main.rs");
        assert_eq!(file.display_name(), "main.rs");
        assert_eq!(file.path(), Some(Path::new("some/dir/main.rs")));
    }

    #[test]
    fn can_detect_markdown_names() {
        assert!(SourceFile::from("README.md").is_markdown());
        assert!(SourceFile::from("docs/guide.markdown").is_markdown());
        assert!(!SourceFile::from("notes.txt").is_markdown());
        assert!(!SourceFile::from("md").is_markdown());
    }

    #[test]
    fn no_prompt_without_a_terminal() {
        let mut prompt = Vec::new();
        let contents = read_stdin(Cursor::new("hello\n"), &mut prompt, false).expect("can read");
        assert_eq!(contents, Contents::Text("hello\n".to_string()));
        assert!(prompt.is_empty());
    }

    #[test]
    fn prompts_when_interactive() {
        let mut prompt = Vec::new();
        read_stdin(Cursor::new(""), &mut prompt, true).expect("can read");
        let prompt = String::from_utf8(prompt).expect("prompt is utf-8");
        assert!(prompt.contains("Ctrl + D"));
    }

    #[test]
    fn invalid_utf8_is_binary() {
        let mut prompt = Vec::new();
        let contents =
            read_stdin(Cursor::new(vec![0xff, 0xfe, 0x00]), &mut prompt, false).expect("can read");
        assert_eq!(contents, Contents::Binary);

        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [0xc3, 0x28]).expect("can write fixture");
        assert_eq!(
            SourceFile::from(&path).read().expect("can read"),
            Contents::Binary
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = SourceFile::from("no/such/file.rs")
            .read()
            .expect_err("file is missing");
        assert!(format!("{err:#}").contains("no/such/file.rs"));
    }
}
