// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `docmind shell` command implementation.
//!
//! Launches an interactive REPL with a colored prompt and readline
//! history. Plain input sends a chat turn through the orchestrator; slash
//! commands drive the session store, model registry, and upload
//! coordinator.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use docmind_backend::BackendClient;
use docmind_chat::{
    Deletion, MessageOrchestrator, ModelRegistry, Selection, SendOutcome, SendRequest,
    SessionStore, TranscriptEntry, UploadCoordinator,
};
use docmind_config::DocmindConfig;
use docmind_core::{
    DocmindError, MessageRole, Notice, NoticeKind, NotificationSink, PersistenceGateway,
    UploadJob,
};
use docmind_supabase::SupabaseGateway;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

/// Renders notices to the terminal.
struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => {
                eprintln!("{}: {}", notice.title.red().bold(), notice.detail)
            }
            NoticeKind::Success => {
                println!("{}: {}", notice.title.green().bold(), notice.detail)
            }
            NoticeKind::Info => println!("{} {}", notice.title.dimmed(), notice.detail.dimmed()),
        }
    }
}

/// Runs the `docmind shell` interactive REPL.
pub async fn run_shell(config: DocmindConfig) -> Result<(), DocmindError> {
    let gateway: Arc<dyn PersistenceGateway> =
        Arc::new(SupabaseGateway::new(&config.supabase).inspect_err(|_| {
            eprintln!(
                "error: Supabase service key required. Set via config or DOCMIND_SUPABASE_SERVICE_KEY"
            );
        })?);
    let backend = Arc::new(BackendClient::new(&config.backend)?);
    let notifier = Arc::new(ConsoleNotifier);

    let orchestrator = MessageOrchestrator::new(gateway.clone(), backend.clone(), notifier.clone());
    let uploader = UploadCoordinator::new(backend, notifier);

    // The acting user is explicit context from config; there is no
    // ambient identity.
    let mut store = SessionStore::new(config.app.user_id.clone());
    let mut registry = ModelRegistry::new();
    let mut use_web = false;

    // Initial loads. A connectivity failure leaves an empty last-known
    // state and the shell still comes up.
    if let Err(e) = store.refresh(gateway.as_ref()).await {
        warn!(error = %e, "initial session list unavailable");
    }
    if let Err(e) = registry.load_active(gateway.as_ref()).await {
        warn!(error = %e, "model list unavailable");
    }
    if let Some(session) = store.current().cloned() {
        let _ = orchestrator.activate(&session).await;
        render_transcript(&orchestrator);
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| DocmindError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "docmind shell".bold().green());
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());
    if registry.selected().is_none() {
        println!("{}", "no active models available; sends will be ignored".yellow());
    }

    let prompt = format!("{}> ", "docmind".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Some(command) = trimmed.strip_prefix('/') {
                    handle_command(
                        command,
                        gateway.as_ref(),
                        &orchestrator,
                        &uploader,
                        &mut store,
                        &mut registry,
                        &mut use_web,
                    )
                    .await;
                } else {
                    send_message(trimmed, &orchestrator, &store, &registry, use_web).await;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Sends one chat turn and prints the assistant's reply.
async fn send_message(
    text: &str,
    orchestrator: &MessageOrchestrator,
    store: &SessionStore,
    registry: &ModelRegistry,
    use_web: bool,
) {
    let outcome = orchestrator
        .send(SendRequest {
            text,
            session: store.current(),
            model: registry.selected(),
            use_web,
        })
        .await;

    match outcome {
        Ok(SendOutcome::Sent) => {
            // Print the settled assistant turn.
            if let Some((_, entries)) = orchestrator.snapshot()
                && let Some(TranscriptEntry::Persisted(message)) = entries.last()
                && message.role == MessageRole::Assistant
            {
                println!("{} {}", "docmind:".cyan().bold(), message.content);
            }
        }
        Ok(SendOutcome::Ignored(reason)) => {
            // Preconditions are silent no-ops; hint only where the fix is
            // not obvious from the prompt itself.
            use docmind_chat::IgnoreReason;
            match reason {
                IgnoreReason::NoSession => {
                    println!("{}", "no session selected; try /new".yellow())
                }
                IgnoreReason::NoModel => {
                    println!("{}", "no model selected; try /models".yellow())
                }
                IgnoreReason::EmptyInput | IgnoreReason::AlreadySending => {}
            }
        }
        Err(_) => {
            // Already surfaced through the notifier.
        }
    }
}

/// Dispatches one slash command.
async fn handle_command(
    command: &str,
    gateway: &dyn PersistenceGateway,
    orchestrator: &MessageOrchestrator,
    uploader: &UploadCoordinator,
    store: &mut SessionStore,
    registry: &mut ModelRegistry,
    use_web: &mut bool,
) {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match name {
        "help" => print_help(),
        "sessions" => {
            if let Err(e) = store.refresh(gateway).await {
                eprintln!("{}: {e}", "error".red());
            }
            let current = store.current().map(|s| s.id.clone());
            for (i, session) in store.sessions().iter().enumerate() {
                let marker = if Some(&session.id) == current.as_ref() { "*" } else { " " };
                println!("{marker} {i}: {} ({})", session.title, session.created_at.dimmed());
            }
            if store.sessions().is_empty() {
                println!("{}", "no sessions; try /new".dimmed());
            }
        }
        "new" => match store.create(gateway).await {
            Ok(session) => {
                let _ = orchestrator.activate(&session).await;
                println!("opened {}", session.title.bold());
            }
            Err(e) => eprintln!("{}: {e}", "error".red()),
        },
        "open" => {
            let Some(session) = arg
                .and_then(|raw| raw.parse::<usize>().ok())
                .and_then(|i| store.sessions().get(i).cloned())
            else {
                println!("usage: /open <index> (see /sessions)");
                return;
            };
            match store.select(&session.id) {
                Selection::Switched(session) => {
                    if orchestrator.activate(&session).await.is_ok() {
                        render_transcript(orchestrator);
                    }
                }
                Selection::Unchanged => {}
                Selection::NotFound => println!("no such session"),
            }
        }
        "delete" => {
            let Some(session) = arg
                .and_then(|raw| raw.parse::<usize>().ok())
                .and_then(|i| store.sessions().get(i).cloned())
            else {
                println!("usage: /delete <index> (see /sessions)");
                return;
            };
            match store.delete(gateway, &session.id).await {
                Ok(Deletion::RemovedCurrent { replacement }) => {
                    match replacement {
                        Some(next) => {
                            let _ = orchestrator.activate(&next).await;
                        }
                        None => orchestrator.clear(),
                    }
                    println!("{}", "Chat history removed successfully.".dimmed());
                }
                Ok(Deletion::Removed) => {
                    println!("{}", "Chat history removed successfully.".dimmed());
                }
                Err(e) => eprintln!("{}: {e}", "error".red()),
            }
        }
        "models" => {
            if let Err(e) = registry.load_active(gateway).await {
                eprintln!("{}: {e}", "error".red());
            }
            let selected = registry.selected().map(|m| m.id.clone());
            for (i, model) in registry.models().iter().enumerate() {
                let marker = if Some(&model.id) == selected.as_ref() { "*" } else { " " };
                println!("{marker} {i}: {}", model.display_name);
            }
            if registry.models().is_empty() {
                println!("{}", "no active models".dimmed());
            }
        }
        "model" => {
            let model = arg
                .and_then(|raw| raw.parse::<usize>().ok())
                .and_then(|i| registry.models().get(i).cloned());
            match model {
                Some(model) => {
                    registry.select(&model);
                    println!("using {}", model.display_name.bold());
                }
                None => println!("usage: /model <index> (see /models)"),
            }
        }
        "web" => {
            *use_web = !*use_web;
            println!(
                "web search {}",
                if *use_web { "enabled".green() } else { "disabled".dimmed() }
            );
        }
        "upload" => {
            let Some(path) = arg else {
                println!("usage: /upload <path-to-pdf>");
                return;
            };
            let path = Path::new(path);
            let data = match std::fs::read(path) {
                Ok(data) => data,
                Err(e) => {
                    eprintln!("{}: cannot read {}: {e}", "error".red(), path.display());
                    return;
                }
            };
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.pdf".to_string());
            let job = UploadJob {
                file_name,
                data,
                user_id: store.user_id().to_string(),
                session_id: store.current().map(|s| s.id.clone()),
            };
            // Outcome (success or failure) is surfaced by the coordinator.
            let _ = uploader.upload(job).await;
        }
        other => println!("unknown command /{other}; try /help"),
    }
}

/// Prints the current transcript, oldest first.
fn render_transcript(orchestrator: &MessageOrchestrator) {
    let Some((_, entries)) = orchestrator.snapshot() else {
        return;
    };
    for entry in &entries {
        let (role, content) = match entry {
            TranscriptEntry::Pending { role, content, .. } => (*role, content.as_str()),
            TranscriptEntry::Persisted(message) => (message.role, message.content.as_str()),
        };
        match role {
            MessageRole::User => println!("{} {content}", "you:".bold()),
            MessageRole::Assistant => println!("{} {content}", "docmind:".cyan().bold()),
        }
    }
}

fn print_help() {
    println!("/sessions          list your chats (newest first)");
    println!("/new               start a new chat");
    println!("/open <n>          switch to a chat");
    println!("/delete <n>        delete a chat");
    println!("/models            list selectable models");
    println!("/model <n>         select a model");
    println!("/web               toggle web search for subsequent turns");
    println!("/upload <path>     ingest a PDF into your knowledge context");
    println!("/quit              exit");
}
