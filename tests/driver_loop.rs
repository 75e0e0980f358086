//! End-to-end test of the driver loop: commands in, updates out.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use authenex_assist::chat::ChatTransport;
use authenex_assist::session::{SessionDriver, SessionMode, SessionUpdate};
use authenex_assist::speech::{UnsupportedSpeechInput, UnsupportedSpeechOutput};
use authenex_assist::transcript::{Actor, Turn};
use authenex_assist::{AssistConfig, ChatSession, Result};
use std::sync::Arc;
use std::time::Duration;

struct EchoChat;

#[async_trait]
impl ChatTransport for EchoChat {
    async fn send(&self, message: &str, _history: &[Turn], _mode: SessionMode) -> Result<String> {
        Ok(format!("echo: {message}"))
    }
}

#[tokio::test]
async fn driver_round_trips_commands_to_updates() {
    let (session, events_rx) = ChatSession::new(
        AssistConfig::default(),
        Arc::new(UnsupportedSpeechInput),
        Arc::new(UnsupportedSpeechOutput),
        Arc::new(EchoChat),
    );
    let mut updates = session.subscribe_updates();
    let (driver, handle) = SessionDriver::new(session, events_rx);
    let driver_task = tokio::spawn(driver.run());

    handle.submit("hello there");

    // User turn, state change, assistant turn, state change — in order.
    let mut turns = Vec::new();
    while turns.len() < 2 {
        match tokio::time::timeout(Duration::from_secs(5), updates.recv())
            .await
            .expect("timed out waiting for updates")
            .expect("update channel closed")
        {
            SessionUpdate::TurnAppended(turn) => turns.push(turn),
            _ => {}
        }
    }

    assert_eq!(turns[0].actor, Actor::User);
    assert_eq!(turns[0].text, "hello there");
    assert_eq!(turns[1].actor, Actor::Assistant);
    assert_eq!(turns[1].text, "echo: hello there");

    handle.close();
    tokio::time::timeout(Duration::from_secs(5), driver_task)
        .await
        .expect("driver did not stop")
        .unwrap();
}

#[tokio::test]
async fn driver_stops_when_all_handles_drop() {
    let (session, events_rx) = ChatSession::new(
        AssistConfig::default(),
        Arc::new(UnsupportedSpeechInput),
        Arc::new(UnsupportedSpeechOutput),
        Arc::new(EchoChat),
    );
    let (driver, handle) = SessionDriver::new(session, events_rx);
    let driver_task = tokio::spawn(driver.run());

    drop(handle);

    tokio::time::timeout(Duration::from_secs(5), driver_task)
        .await
        .expect("driver did not stop")
        .unwrap();
}
