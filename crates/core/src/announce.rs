//! Spoken announcements.
//!
//! The front-end reads the outcome aloud after scoring. Speaking is slow and must never hold up
//! the triage flow, so text is handed to a background worker over a channel and `announce`
//! returns straight away. Announcements carry only text; the worker never touches the patient
//! record, and no ordering is promised relative to later record changes.

use crate::constants::ANNOUNCEMENT_QUEUE_CAPACITY;
use crate::{TriageError, TriageResult};
use std::process::{Command, Output, Stdio};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// Something that can say a line of text out loud.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> TriageResult<()>;
}

/// Speaker that only logs; used when no speech program is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&self, text: &str) -> TriageResult<()> {
        tracing::info!(text, "announcement");
        Ok(())
    }
}

/// Runs an external program with the announcement as its final argument.
///
/// The text is passed as a single argument and never goes through a shell.
#[derive(Clone, Debug)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parses a whitespace-separated command line such as `espeak -v pt-br`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidConfiguration` if the command line is empty.
    pub fn from_command_line(command_line: &str) -> TriageResult<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            TriageError::InvalidConfiguration("speech command cannot be empty".into())
        })?;

        Ok(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the program once for `text` and returns what it printed.
    ///
    /// The child gets a closed stdin and its stdout/stderr are captured, so it can neither
    /// consume front-end commands nor write into the bridge's reply stream.
    pub(crate) fn run(&self, text: &str) -> TriageResult<Output> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| TriageError::Speech(format!("failed to run {}: {e}", self.program)))?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(TriageError::Speech(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> TriageResult<()> {
        let output = self.run(text)?;
        if !output.stdout.is_empty() {
            tracing::debug!(
                program = %self.program,
                output = %String::from_utf8_lossy(&output.stdout).trim(),
                "speech program output"
            );
        }
        Ok(())
    }
}

/// Sending half of the announcement worker. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AnnouncementQueue {
    tx: mpsc::Sender<String>,
}

impl AnnouncementQueue {
    /// Starts the background worker on the current Tokio runtime with the default capacity.
    ///
    /// The worker drains the queue until every `AnnouncementQueue` clone has been dropped, then
    /// the returned handle completes. Speaker failures are logged and do not stop the worker.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::RuntimeUnavailable` if called outside a Tokio runtime.
    pub fn spawn(speaker: Arc<dyn Speaker>) -> TriageResult<(Self, JoinHandle<()>)> {
        Self::spawn_with_capacity(speaker, ANNOUNCEMENT_QUEUE_CAPACITY)
    }

    /// Like [`AnnouncementQueue::spawn`], holding at most `capacity` pending announcements.
    pub fn spawn_with_capacity(
        speaker: Arc<dyn Speaker>,
        capacity: usize,
    ) -> TriageResult<(Self, JoinHandle<()>)> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| TriageError::RuntimeUnavailable(e.to_string()))?;
        let (tx, mut rx) = mpsc::channel::<String>(capacity.max(1));

        let worker = runtime.spawn_blocking(move || {
            while let Some(text) = rx.blocking_recv() {
                if let Err(e) = speaker.speak(&text) {
                    tracing::warn!("announcement failed: {}", e);
                }
            }
            tracing::debug!("announcement worker stopped");
        });

        Ok((Self { tx }, worker))
    }

    /// Queues `text` to be spoken and returns immediately.
    ///
    /// # Returns
    ///
    /// `false` if the queue was full and the announcement was dropped.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::AnnouncementQueueClosed` if the worker has stopped.
    pub fn announce(&self, text: impl Into<String>) -> TriageResult<bool> {
        match self.tx.try_send(text.into()) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(text)) => {
                tracing::warn!(text = %text, "announcement queue full, dropping announcement");
                Ok(false)
            }
            Err(TrySendError::Closed(_)) => Err(TriageError::AnnouncementQueueClosed),
        }
    }
}
