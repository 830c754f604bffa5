//! Copy-to-clipboard state machine behind the code block button.
//!
//! The browser script generated by [`crate::providers::copy_script`] runs the
//! same machine with the same constants.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

/// Time after the latest successful copy before the button resets.
pub const COPY_RESET: Duration = Duration::from_millis(2000);

/// Toast shown after a successful copy.
pub const COPY_SUCCESS_MESSAGE: &str = "Copied to clipboard";

/// Toast shown when the clipboard rejects the write.
pub const COPY_FAILURE_MESSAGE: &str = "Failed to copy to clipboard";

/// Clipboard write failure.
#[derive(Debug, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// Something that accepts text.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Toast sink.
pub trait Notifier {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Visible button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    /// Shows the copy icon.
    Idle,
    /// Shows the check icon.
    Copied,
}

/// Copy button for one code block.
#[derive(Debug, Clone)]
pub struct CopyButton {
    code: String,
    copied_at: Option<Instant>,
}

impl CopyButton {
    /// Button that copies `code` verbatim.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            copied_at: None,
        }
    }

    /// Text written on every trigger.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// State at `now`. `Copied` lasts [`COPY_RESET`] from the latest success.
    #[must_use]
    pub fn state(&self, now: Instant) -> CopyState {
        match self.copied_at {
            Some(at) if now.saturating_duration_since(at) < COPY_RESET => CopyState::Copied,
            _ => CopyState::Idle,
        }
    }

    /// Copy the code. A success restarts the reset timer; a failure leaves
    /// the button idle and reports through the notifier.
    pub fn trigger(
        &mut self,
        clipboard: &mut impl Clipboard,
        notifier: &mut impl Notifier,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        match clipboard.write_text(&self.code) {
            Ok(()) => {
                self.copied_at = Some(now);
                notifier.success(COPY_SUCCESS_MESSAGE);
                debug!(bytes = self.code.len(), "code copied");
                Ok(())
            }
            Err(e) => {
                self.copied_at = None;
                notifier.error(COPY_FAILURE_MESSAGE);
                debug!(error = %e, "copy failed");
                Err(e)
            }
        }
    }
}
