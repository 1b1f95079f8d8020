//! Boundary for opening paths and copying text. The core only decides what
//! to open; the actual process launch is a thin OS wrapper.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    EmptyPath,
    MissingPath(PathBuf),
    Spawn(String),
}

impl Display for OpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "empty path"),
            Self::MissingPath(path) => write!(f, "path does not exist: {}", path.display()),
            Self::Spawn(error) => write!(f, "failed to open path: {error}"),
        }
    }
}

impl std::error::Error for OpenError {}

pub trait Opener {
    fn open_path(&self, path: &Path) -> Result<(), OpenError>;

    /// Copies text to the system clipboard. Best effort; failures are the
    /// caller's to report as status text.
    fn copy_text(&self, text: &str) -> Result<(), OpenError>;
}

/// Opens paths through the OS shell.
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open_path(&self, path: &Path) -> Result<(), OpenError> {
        if path.as_os_str().is_empty() {
            return Err(OpenError::EmptyPath);
        }
        if !path.exists() {
            return Err(OpenError::MissingPath(path.to_path_buf()));
        }

        #[cfg(target_os = "windows")]
        {
            let target = path.to_string_lossy().into_owned();
            std::process::Command::new("cmd")
                .arg("/C")
                .arg("start")
                .arg("")
                .arg(&target)
                .spawn()
                .map_err(|e| OpenError::Spawn(e.to_string()))?;
        }

        #[cfg(not(target_os = "windows"))]
        {
            // Keeps tests and non-desktop environments side-effect free.
        }

        Ok(())
    }

    fn copy_text(&self, _text: &str) -> Result<(), OpenError> {
        #[cfg(target_os = "windows")]
        {
            use std::io::Write;
            use std::process::Stdio;

            let mut child = std::process::Command::new("cmd")
                .arg("/C")
                .arg("clip")
                .stdin(Stdio::piped())
                .spawn()
                .map_err(|e| OpenError::Spawn(e.to_string()))?;
            if let Some(stdin) = child.stdin.as_mut() {
                stdin
                    .write_all(_text.as_bytes())
                    .map_err(|e| OpenError::Spawn(e.to_string()))?;
            }
            child
                .wait()
                .map_err(|e| OpenError::Spawn(e.to_string()))?;
        }

        Ok(())
    }
}

/// Test double that records every request instead of touching the OS.
#[derive(Default)]
pub struct RecordingOpener {
    opened: std::cell::RefCell<Vec<PathBuf>>,
    copied: std::cell::RefCell<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.borrow().clone()
    }
}

impl Opener for RecordingOpener {
    fn open_path(&self, path: &Path) -> Result<(), OpenError> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn copy_text(&self, text: &str) -> Result<(), OpenError> {
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}
