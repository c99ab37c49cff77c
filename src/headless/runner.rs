//! Headless mode runner - main event loop without a UI
//!
//! Reads commands from stdin, feeds them to the engine and prints every
//! engine event as one JSON line.

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use vizlearn_app::{config::Settings, Engine, HttpLessonService, Message};
use vizlearn_core::{prelude::*, suggested_topics, DEFAULT_AGE};

use super::command::{parse_command, Command};
use super::HeadlessEvent;

/// Run in headless mode against the lesson server in `settings.client`
pub async fn run_headless(settings: Settings) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("vizlearn starting in HEADLESS mode");
    info!("Server: {}", settings.client.server_url);
    info!("═══════════════════════════════════════════════════════");

    let server_url = settings.client.server_url.clone();
    let service = match HttpLessonService::new(&server_url) {
        Ok(service) => service,
        Err(e) => {
            HeadlessEvent::error(e.to_string(), e.is_fatal()).emit();
            return Err(e);
        }
    };

    let mut engine = Engine::new(settings, service);
    let mut events = engine.subscribe();

    // Spawn headless-specific stdin reader
    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(stdin_tx);
    });

    let signal_tx = engine.msg_sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received");
            let _ = signal_tx.send(Message::Quit).await;
        }
    });

    HeadlessEvent::ready(&server_url).emit();

    engine.start();
    emit_engine_events(&mut events);

    headless_event_loop(&mut engine, &mut events).await;

    engine.shutdown();
    emit_engine_events(&mut events);

    info!("vizlearn headless mode exiting");
    Ok(())
}

/// Main headless event loop
async fn headless_event_loop(
    engine: &mut Engine<HttpLessonService>,
    events: &mut broadcast::Receiver<vizlearn_app::EngineEvent>,
) {
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.next_message().await {
            Some(msg) => {
                engine.process_message(msg);
                emit_engine_events(events);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }
}

/// Print every event queued since the last call
fn emit_engine_events(events: &mut broadcast::Receiver<vizlearn_app::EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from(event).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} event(s) dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Spawn stdin reader task that sends commands to message channel (blocking version)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => match parse_command(&line, DEFAULT_AGE) {
                Ok(Some(Command::Send(msg))) => {
                    let quit = matches!(msg, Message::Quit);
                    if msg_tx.blocking_send(msg).is_err() || quit {
                        break;
                    }
                }
                Ok(Some(Command::Topics(age))) => {
                    HeadlessEvent::topics(age, suggested_topics(age)).emit();
                }
                Ok(None) => {}
                Err(message) => {
                    warn!("Bad stdin command '{}': {}", line.trim(), message);
                    HeadlessEvent::error(message, false).emit();
                }
            },
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}
