//! Clipboard seam for session export.
//!
//! The system clipboard is reached through whichever platform helper is on
//! `PATH`. A failed write is never an error to the caller: [`deliver`] turns it
//! into [`ExportOutcome::ManualCopy`] so the UI can show the text for copying
//! by hand.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can receive exported text
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Human-readable backend name for logs
    fn name(&self) -> String;

    async fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Helpers probed in order when no command is configured
const HELPERS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// A resolved helper program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ClipboardCommand {
    /// Parse a whitespace-separated command line such as `xclip -selection clipboard`
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next()?;
        Some(Self {
            program: PathBuf::from(program),
            args: parts.map(str::to_string).collect(),
        })
    }
}

/// How long a helper may take to accept the text and exit
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Writes to the OS clipboard by piping into a helper process
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    command: Option<ClipboardCommand>,
    timeout: Duration,
}

impl SystemClipboard {
    /// Use the configured command if given, otherwise the first helper found on `PATH`
    pub fn new(configured: Option<&str>) -> Self {
        if let Some(command) = configured.and_then(ClipboardCommand::parse) {
            tracing::debug!(program = %command.program.display(), "Using configured clipboard command");
            return Self {
                command: Some(command),
                timeout: DEFAULT_WRITE_TIMEOUT,
            };
        }
        Self::detect()
    }

    pub fn detect() -> Self {
        let command = HELPERS.iter().find_map(|(program, args)| {
            which::which(program).ok().map(|path| ClipboardCommand {
                program: path,
                args: args.iter().map(|a| (*a).to_string()).collect(),
            })
        });

        match &command {
            Some(c) => tracing::debug!(program = %c.program.display(), "Detected clipboard helper"),
            None => tracing::info!("No clipboard helper found; exports will use manual copy"),
        }

        Self {
            command,
            timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    /// Give up on a helper that hasn't exited after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> Option<&ClipboardCommand> {
        self.command.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Feed `text` to the helper's stdin and wait for it to exit
async fn pipe_text(child: &mut Child, text: &str) -> std::io::Result<ExitStatus> {
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).await?;
        stdin.shutdown().await?;
    }
    child.wait().await
}

#[async_trait]
impl Clipboard for SystemClipboard {
    fn name(&self) -> String {
        self.command
            .as_ref()
            .map(|c| c.program.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    }

    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let Some(command) = &self.command else {
            return Err(ClipboardError::Unavailable(
                "no clipboard helper found".to_string(),
            ));
        };

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let result = tokio::time::timeout(self.timeout, pipe_text(&mut child, text)).await;
        let Ok(status) = result else {
            let _ = child.kill().await;
            return Err(ClipboardError::Unavailable(format!(
                "{} did not exit within {}ms",
                command.program.display(),
                self.timeout.as_millis()
            )));
        };

        let status = status?;
        if !status.success() {
            return Err(ClipboardError::Unavailable(format!(
                "{} exited with {}",
                command.program.display(),
                status
            )));
        }

        Ok(())
    }
}

/// What happened to an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Text is on the clipboard
    Copied,
    /// Clipboard refused; the text must be shown for manual copying
    ManualCopy(String),
}

/// Write `text` to `clipboard`, falling back to manual copy on any failure
pub async fn deliver(clipboard: &dyn Clipboard, text: String) -> ExportOutcome {
    match clipboard.write(&text).await {
        Ok(()) => {
            tracing::info!(backend = %clipboard.name(), bytes = text.len(), "Copied call info to clipboard");
            ExportOutcome::Copied
        }
        Err(e) => {
            tracing::warn!(backend = %clipboard.name(), error = %e, "Clipboard write failed, showing manual copy");
            ExportOutcome::ManualCopy(text)
        }
    }
}
