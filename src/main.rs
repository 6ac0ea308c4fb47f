use jarvis::config::AssistantConfig;
use jarvis::intent::{parse_direct, DirectCommand};
use jarvis::services::executor::MailDraft;
use jarvis::{Assistant, TurnOutcome};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "salir"];

type Input = Lines<BufReader<Stdin>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    /// Every line is a transcript; a wake phrase arms the next one.
    Voice,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jarvis=info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mode = if std::env::args().any(|a| a == "--voice")
        || std::env::var("JARVIS_MODE").map(|m| m.eq_ignore_ascii_case("voice")).unwrap_or(false)
    {
        Mode::Voice
    } else {
        Mode::Text
    };

    let config = AssistantConfig::from_env();
    let mut assistant = Assistant::from_config(&config)?;
    let state = assistant.cascade().ensure_probed().await;
    tracing::info!(mode = ?mode, cascade = ?state.mode(), "JARVIS ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match mode {
        Mode::Text => {
            println!("Escribe un mensaje (!exec, !open, !vol, !sendmail). 'salir' para terminar.")
        }
        Mode::Voice => println!("Di 'Jarvis' para activarme. 'salir' para terminar."),
    }

    let mut armed = false;
    loop {
        prompt_marker(if armed { "🎙 " } else { "> " });

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        };
        let Some(line) = line else { break };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&text.to_lowercase().as_str()) {
            break;
        }

        if mode == Mode::Voice && !armed {
            if assistant.accept_transcript(text).matched {
                println!("JARVIS: ¿Sí?");
                assistant.speech().dispatch("¿Sí?");
                armed = true;
            }
            continue;
        }
        armed = false;

        let outcome = match parse_direct(text) {
            Some(DirectCommand::Usage(usage)) => {
                println!("{}", usage);
                continue;
            }
            Some(DirectCommand::Action(action)) => assistant.handle_action(text, action).await,
            None => assistant.handle_turn(text).await,
        };

        if !follow_up(&mut assistant, &mut lines, outcome).await? {
            break;
        }
    }

    assistant.speech().shutdown();
    tracing::info!("JARVIS stopped");
    Ok(())
}

/// Prints the outcome and collects whatever it still needs from the user.
/// Returns `false` once stdin is closed.
async fn follow_up(
    assistant: &mut Assistant,
    lines: &mut Input,
    outcome: TurnOutcome,
) -> anyhow::Result<bool> {
    println!("JARVIS: {}", outcome.message());

    match outcome {
        TurnOutcome::Reply(reply) => {
            tracing::debug!(source = ?reply.source, "reply printed");
        }
        TurnOutcome::Executed { outcome, .. } => {
            println!("{}", outcome.status);
        }
        TurnOutcome::PendingConfirmation { action, .. } => {
            let Some(answer) = ask(lines, "¿Confirmas? (s/n): ").await? else {
                return Ok(false);
            };
            if matches!(answer.to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes") {
                if let TurnOutcome::Executed { outcome, .. } = assistant.confirm(action).await {
                    println!("{}", outcome.status);
                }
            } else {
                println!("JARVIS: Cancelado.");
            }
        }
        TurnOutcome::NeedsMailDraft { .. } => {
            let Some(to) = ask(lines, "Para: ").await? else { return Ok(false) };
            let Some(subject) = ask(lines, "Asunto: ").await? else { return Ok(false) };
            let Some(body) = ask(lines, "Mensaje: ").await? else { return Ok(false) };
            let outcome = assistant.send_mail(&MailDraft { to, subject, body }).await;
            println!("JARVIS: {}", outcome.status);
        }
    }
    Ok(true)
}

async fn ask(lines: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    prompt_marker(label);
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

fn prompt_marker(label: &str) {
    print!("{}", label);
    let _ = std::io::stdout().flush();
}
