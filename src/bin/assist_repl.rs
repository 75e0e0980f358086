//! Console front-end for the assistant session.
//!
//! Drives a text-mode session against a real chat backend: each stdin line
//! is submitted as a typed message, and assistant turns are printed as they
//! arrive. Useful for poking at a backend without the web widget.

use anyhow::Context;
use authenex_assist::session::SessionUpdate;
use authenex_assist::speech::{UnsupportedSpeechInput, UnsupportedSpeechOutput};
use authenex_assist::{AssistConfig, ChatSession, HttpChatClient, SessionDriver};
use std::io::{BufRead, Write};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    runtime.block_on(run())
}

async fn run() -> anyhow::Result<()> {
    let config_path = AssistConfig::default_config_path();
    let config = if config_path.exists() {
        AssistConfig::from_file(&config_path).context("failed to load config")?
    } else {
        AssistConfig::default()
    };

    let chat = HttpChatClient::new(&config.chat).context("failed to build chat client")?;
    let endpoint = config.chat.base_url.clone();

    let (session, events_rx) = ChatSession::new(
        config,
        Arc::new(UnsupportedSpeechInput),
        Arc::new(UnsupportedSpeechOutput),
        Arc::new(chat),
    );
    let mut updates = session.subscribe_updates();
    let (driver, handle) = SessionDriver::new(session, events_rx);

    let driver_task = tokio::spawn(driver.run());

    // Print assistant turns as they arrive.
    let printer = tokio::spawn(async move {
        while let Ok(update) = updates.recv().await {
            if let SessionUpdate::TurnAppended(turn) = update
                && turn.actor == authenex_assist::Actor::Assistant
            {
                println!("assistant> {}", turn.text);
                print!("you> ");
                let _ = std::io::stdout().flush();
            }
        }
    });

    println!("connected to {endpoint} — type a message, or an empty line to quit");
    print!("you> ");
    std::io::stdout().flush().ok();

    // Blocking stdin reads are fine here; the session runs on its own task.
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("stdin read failed")?;
        if line.trim().is_empty() {
            break;
        }
        handle.submit(line);
    }

    handle.close();
    driver_task.await.ok();
    printer.abort();
    Ok(())
}
