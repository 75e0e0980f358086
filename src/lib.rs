//! Authenex assistant session core.
//!
//! The conversational widget on the Authenex forensics platform mixes typed
//! chat with voice: speech-recognition capture, a request/response cycle to
//! the chat backend, and speech-synthesis playback of replies. This crate is
//! the interaction controller behind that widget — the state machine that
//! keeps overlapping user actions coherent (typing while speaking,
//! interrupting synthesis, switching modes mid-conversation).
//!
//! # Architecture
//!
//! The controller is built from injected collaborators connected by async
//! channels:
//! - **Speech input**: platform recognition behind the [`speech::SpeechInput`] seam
//! - **Speech output**: platform synthesis behind the [`speech::SpeechOutput`] seam
//! - **Chat transport**: the `/api/chat` endpoint behind [`chat::ChatTransport`]
//! - **Session**: [`session::ChatSession`], the single owner of transcript
//!   and interaction state, driven by [`session::SessionDriver`]
//!
//! All failures are terminal at the session boundary: the user sees either a
//! normal reply or a fallback turn, never a crash or a stuck spinner.

pub mod chat;
pub mod config;
pub mod error;
pub mod scan;
pub mod session;
pub mod speech;
pub mod transcript;

pub use chat::{ChatTransport, HttpChatClient};
pub use config::AssistConfig;
pub use error::{AssistError, Result};
pub use session::{
    ChatSession, InteractionState, SessionDriver, SessionHandle, SessionMode, SessionUpdate,
    SubmitOrigin,
};
pub use transcript::{Actor, Transcript, Turn};
