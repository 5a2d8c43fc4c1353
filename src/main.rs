//! Terminal shell for the natter chat client
//!
//! Plain lines are sent to the backend as chat messages; slash commands
//! drive recording, language and model selection, and the conversation
//! itself. Session events are drained and printed after every command.

use std::io::Write;

use anyhow::Result;
use crossbeam_channel::Receiver;
use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use natter::audio::Microphone;
use natter::conversation::Role;
use natter::gateway::HttpGateway;
use natter::{ChatSession, Language, SessionConfig, SessionEvent};

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "natter=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("NATTER_BACKEND_URL").ok())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    info!("Starting natter against {}", base_url);

    let gateway = HttpGateway::new(&base_url)?;
    let (session, events) = ChatSession::new(
        Box::new(gateway),
        default_microphone(),
        SessionConfig::default(),
    );

    session.initialize().await;
    drain_events(&events);
    println!("Connected to {} ({} models). Type /help for commands.", base_url, session.models().len());

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        if !dispatch(&session, line.trim()).await {
            break;
        }
        drain_events(&events);
        prompt()?;
    }

    Ok(())
}

/// Handle one input line. Returns false when the shell should exit.
async fn dispatch(session: &ChatSession, line: &str) -> bool {
    match line {
        "" => {}
        "/quit" | "/exit" => return false,
        "/talk" => session.toggle_talk().await,
        "/new" => session.new_conversation(),
        "/models" => print_models(session),
        "/settings" => {
            session.open_settings();
            print_settings(session);
        }
        "/close" => session.close_settings(),
        "/save" => session.save_settings(false).await,
        "/save!" => session.save_settings(true).await,
        "/status" => println!("{} [{}]", session.status(), session.state()),
        "/help" => print_help(),
        _ => {
            if let Some(rest) = line.strip_prefix("/lang") {
                set_language(session, rest.trim());
            } else if let Some(rest) = line.strip_prefix("/set ") {
                select_model(session, rest.trim());
            } else if line.starts_with('/') {
                println!("Unknown command: {} (try /help)", line);
            } else {
                session.submit_text(line).await;
            }
        }
    }
    true
}

fn set_language(session: &ChatSession, code: &str) {
    let selected = match code {
        "" => {
            println!("Language: {}", session.language());
            let codes: Vec<&str> = Language::ALL
                .iter()
                .map(|l| l.code())
                .filter(|c| !c.is_empty())
                .collect();
            println!("Codes: auto {}", codes.join(" "));
            return;
        }
        "auto" => Some(Language::Auto),
        other => Language::from_code(other),
    };

    match selected {
        Some(Language::Auto) => {
            session.set_language(Language::Auto);
            println!("Language: {}", Language::Auto);
        }
        Some(language) => {
            session.set_language(language);
            println!("Language: {} ({})", language, language.code());
        }
        None => println!("Unknown language code: {}", code),
    }
}

fn select_model(session: &ChatSession, args: &str) {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("transcription"), Some(id)) => {
            session.select_transcription_model(id);
            println!("Pending transcription model: {} (apply with /save)", id);
        }
        (Some("response"), Some(id)) => {
            session.select_response_model(id);
            println!("Pending response model: {} (apply with /save)", id);
        }
        _ => println!("Usage: /set transcription <model> | /set response <model>"),
    }
}

fn print_models(session: &ChatSession) {
    let models = session.models();
    if models.is_empty() {
        println!("No models loaded (is the backend running?)");
        return;
    }
    println!("Available models (* can transcribe):");
    for model in models {
        let mark = if model.can_transcribe { "*" } else { " " };
        println!("  {} {}", mark, model.display_label());
    }
}

fn print_settings(session: &ChatSession) {
    let pending = session.pending_settings();
    let saved = session.settings();
    println!("Settings:");
    println!(
        "  transcription: {} (saved: {})",
        pending.transcription_model, saved.transcription_model
    );
    println!(
        "  response:      {} (saved: {})",
        pending.response_model, saved.response_model
    );
    let eligible = session.transcription_models();
    if !eligible.is_empty() {
        let names: Vec<&str> = eligible.iter().map(|m| m.model.as_str()).collect();
        println!("  can transcribe: {}", names.join(", "));
    }
    println!("Change with /set, apply with /save, dismiss with /close");
}

fn print_help() {
    println!("Commands:");
    println!("  /talk                       start or stop recording");
    println!("  /new                        start a new conversation");
    println!("  /lang [code]                show or set the transcription language");
    println!("  /models                     list available models");
    println!("  /settings                   open the settings panel");
    println!("  /set transcription <model>  choose the transcription model");
    println!("  /set response <model>       choose the response model");
    println!("  /save, /save!               save settings (! confirms warnings)");
    println!("  /close                      close the settings panel");
    println!("  /status                     show the current status line");
    println!("  /quit                       exit");
    println!("Anything else is sent as a chat message.");
}

fn drain_events(events: &Receiver<SessionEvent>) {
    for event in events.try_iter() {
        match event {
            SessionEvent::EntryAppended(entry) => {
                let speaker = match entry.role {
                    Role::User => "you",
                    Role::Assistant => "assistant",
                    Role::ToolOutput => "tool",
                };
                println!("[{}] {}", speaker, entry.text);
            }
            SessionEvent::StatusChanged(status) => println!("-- {}", status),
            SessionEvent::StateChanged(_) => {}
        }
    }
}

fn prompt() -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(feature = "audio-io")]
fn default_microphone() -> Box<dyn Microphone> {
    Box::new(natter::audio::CpalMicrophone::new())
}

#[cfg(not(feature = "audio-io"))]
fn default_microphone() -> Box<dyn Microphone> {
    Box::new(natter::audio::UnavailableMicrophone::new())
}
