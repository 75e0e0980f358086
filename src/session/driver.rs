//! Event loop that runs a [`ChatSession`] until cancelled.
//!
//! Front-ends hold a [`SessionHandle`] and send commands; the driver owns the
//! session and is the only task that touches its state, multiplexing UI
//! commands with the session's internal completions.

use crate::session::{ChatSession, SessionEvent, SubmitOrigin};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// User actions forwarded from a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Typed submit.
    Submit(String),
    /// Mic tap (start or stop capture depending on state).
    PressMic,
    /// Toggle between text and voice mode.
    ToggleMode,
    /// Close the widget.
    Close,
}

/// Cloneable handle for sending commands to a running driver.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands_tx: mpsc::UnboundedSender<SessionCommand>,
    cancel: CancellationToken,
}

impl SessionHandle {
    /// Submit typed text.
    pub fn submit(&self, text: impl Into<String>) {
        let _ = self.commands_tx.send(SessionCommand::Submit(text.into()));
    }

    /// Tap the mic.
    pub fn press_mic(&self) {
        let _ = self.commands_tx.send(SessionCommand::PressMic);
    }

    /// Toggle the session mode.
    pub fn toggle_mode(&self) {
        let _ = self.commands_tx.send(SessionCommand::ToggleMode);
    }

    /// Close the session and stop the driver.
    pub fn close(&self) {
        let _ = self.commands_tx.send(SessionCommand::Close);
        self.cancel.cancel();
    }
}

/// Owns a session and pumps its channels.
pub struct SessionDriver {
    session: ChatSession,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    commands_rx: mpsc::UnboundedReceiver<SessionCommand>,
    cancel: CancellationToken,
}

impl SessionDriver {
    /// Wrap a session (and its event receiver, as returned by
    /// [`ChatSession::new`]) in a driver. Returns the driver and a handle
    /// for front-ends.
    pub fn new(
        session: ChatSession,
        events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> (Self, SessionHandle) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = SessionHandle {
            commands_tx,
            cancel: cancel.clone(),
        };
        let driver = Self {
            session,
            events_rx,
            commands_rx,
            cancel,
        };
        (driver, handle)
    }

    /// Run until the handle is closed or all command senders are dropped.
    ///
    /// The session is closed on the way out, which cancels any in-progress
    /// synthesis or capture and invalidates in-flight chat requests.
    pub async fn run(mut self) {
        info!("session driver started");
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!("session driver cancelled");
                    break;
                }
                command = self.commands_rx.recv() => {
                    match command {
                        Some(SessionCommand::Submit(text)) => {
                            self.session.submit(&text, SubmitOrigin::Typed);
                        }
                        Some(SessionCommand::PressMic) => self.session.press_mic(),
                        Some(SessionCommand::ToggleMode) => self.session.toggle_mode(),
                        Some(SessionCommand::Close) | None => break,
                    }
                }
                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => self.session.handle_event(event),
                        // The session holds a sender, so this only happens
                        // once the session itself is gone.
                        None => break,
                    }
                }
            }
        }
        self.session.close();
        info!("session driver stopped");
    }
}
