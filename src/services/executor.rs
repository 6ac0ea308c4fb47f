use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{info, warn};

use crate::intent::types::{Action, VolumeMode};

/// Relative step applied by `Up`/`Down`.
pub const VOLUME_STEP: u8 = 10;

/// Output longer than this is cut before it is reported back.
const MAX_STATUS_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub status: String,
}

impl ActionOutcome {
    pub fn ok(status: impl Into<String>) -> Self {
        Self {
            success: true,
            status: status.into(),
        }
    }

    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            success: false,
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    /// RFC 5322 message as fed to `sendmail -t`.
    pub fn to_message(&self) -> String {
        format!(
            "To: {}\nSubject: {}\nContent-Type: text/plain; charset=utf-8\n\n{}\n",
            self.to.trim(),
            self.subject.trim().replace('\n', " "),
            self.body
        )
    }
}

/// Carries out system actions. Failures come back as status strings.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, action: &Action) -> ActionOutcome;

    async fn send_mail(&self, draft: &MailDraft) -> ActionOutcome;
}

/// Runs actions on the host through the platform's own tools.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    sendmail_program: String,
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self {
            sendmail_program: "sendmail".to_string(),
        }
    }
}

impl SystemExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    async fn run_shell(&self, command: &str) -> anyhow::Result<ActionOutcome> {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        let output = cmd
            .output()
            .await
            .with_context(|| format!("failed to spawn shell for `{}`", command))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let text = if !stdout.trim().is_empty() { stdout } else { stderr };
        let mut status = truncate(text.trim(), MAX_STATUS_CHARS);
        if status.is_empty() {
            status = format!("código de salida {}", output.status.code().unwrap_or(-1));
        }

        Ok(ActionOutcome {
            success: output.status.success(),
            status,
        })
    }

    /// Files and URLs go through the desktop opener; anything else is
    /// launched as a program (alias values on unix are commands).
    async fn open_path(&self, path: &str) -> anyhow::Result<ActionOutcome> {
        let is_document = Path::new(path).exists() || path.contains("://");

        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]).arg(path);
            c
        } else if is_document {
            let mut c = Command::new(if cfg!(target_os = "macos") { "open" } else { "xdg-open" });
            c.arg(path);
            c
        } else if cfg!(target_os = "macos") {
            let mut c = Command::new("open");
            c.arg("-a").arg(path);
            c
        } else {
            let mut parts = path.split_whitespace();
            let program = parts.next().context("empty program name")?;
            let mut c = Command::new(program);
            c.args(parts);
            c
        };

        cmd.stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to open {}", path))?;
        Ok(ActionOutcome::ok(format!("Abierto: {}", path)))
    }

    async fn set_volume(&self, mode: VolumeMode, value: u8) -> anyhow::Result<ActionOutcome> {
        let run = if cfg!(target_os = "macos") {
            let script = match mode {
                VolumeMode::Set => format!("set volume output volume {}", value),
                VolumeMode::Up => format!(
                    "set volume output volume ((output volume of (get volume settings)) + {})",
                    VOLUME_STEP
                ),
                VolumeMode::Down => format!(
                    "set volume output volume ((output volume of (get volume settings)) - {})",
                    VOLUME_STEP
                ),
            };
            Command::new("osascript").arg("-e").arg(script).status().await
        } else if cfg!(target_os = "linux") {
            let level = match mode {
                VolumeMode::Set => format!("{}%", value),
                VolumeMode::Up => format!("{}%+", VOLUME_STEP),
                VolumeMode::Down => format!("{}%-", VOLUME_STEP),
            };
            Command::new("amixer")
                .args(["-q", "sset", "Master", &level])
                .status()
                .await
        } else {
            bail!("volume control is not supported on this platform");
        };
        let status = run.context("failed to run volume control")?;

        if !status.success() {
            return Err(anyhow!("volume control exited with {}", status));
        }

        Ok(ActionOutcome::ok(match mode {
            VolumeMode::Set => format!("Volumen fijado a {}", value),
            VolumeMode::Up => "Volumen subido".to_string(),
            VolumeMode::Down => "Volumen bajado".to_string(),
        }))
    }

    async fn pipe_mail(&self, draft: &MailDraft) -> anyhow::Result<ActionOutcome> {
        let mut child = Command::new(&self.sendmail_program)
            .arg("-t")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.sendmail_program))?;

        let mut stdin = child.stdin.take().context("sendmail stdin unavailable")?;
        stdin.write_all(draft.to_message().as_bytes()).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(anyhow!(
                "sendmail failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(ActionOutcome::ok(format!("Correo enviado a {}", draft.to.trim())))
    }
}

#[async_trait]
impl ActionExecutor for SystemExecutor {
    async fn execute(&self, action: &Action) -> ActionOutcome {
        let result = match action {
            Action::Exec { command } => self.run_shell(command).await,
            Action::Open { path } => self.open_path(path).await,
            Action::Volume { mode, value } => self.set_volume(*mode, *value).await,
            Action::SendMail => Ok(ActionOutcome::failed(
                "Faltan destinatario, asunto y cuerpo del correo",
            )),
            Action::Conversation { .. } => Ok(ActionOutcome::failed(
                "La conversación no es una acción del sistema",
            )),
        };

        let outcome = result.unwrap_or_else(|e| ActionOutcome::failed(format!("Error: {:#}", e)));
        if outcome.success {
            info!(kind = ?action.kind(), "action executed");
        } else {
            warn!(kind = ?action.kind(), status = %outcome.status, "action failed");
        }
        outcome
    }

    async fn send_mail(&self, draft: &MailDraft) -> ActionOutcome {
        if draft.to.trim().is_empty() {
            return ActionOutcome::failed("Falta el destinatario");
        }
        self.pipe_mail(draft)
            .await
            .unwrap_or_else(|e| ActionOutcome::failed(format!("Fallo al enviar: {:#}", e)))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("añadir", 3), "aña…");
        assert_eq!(truncate("ok", 10), "ok");
    }

    #[test]
    fn test_mail_message_layout() {
        let draft = MailDraft {
            to: " ana@example.com ".to_string(),
            subject: "Hola\nmundo".to_string(),
            body: "Cuerpo".to_string(),
        };
        let msg = draft.to_message();
        assert!(msg.starts_with("To: ana@example.com\nSubject: Hola mundo\n"));
        assert!(msg.ends_with("\n\nCuerpo\n"));
    }

    #[tokio::test]
    async fn test_conversation_is_rejected() {
        let outcome = SystemExecutor::new()
            .execute(&Action::Conversation { text: "hola".to_string() })
            .await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_mail_without_recipient() {
        let outcome = SystemExecutor::new()
            .send_mail(&MailDraft {
                to: "  ".to_string(),
                subject: "s".to_string(),
                body: "b".to_string(),
            })
            .await;
        assert!(!outcome.success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exec_reports_stdout() {
        let outcome = SystemExecutor::new()
            .execute(&Action::Exec { command: "echo Hola".to_string() })
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.status, "Hola");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exec_failure_status() {
        let outcome = SystemExecutor::new()
            .execute(&Action::Exec { command: "exit 3".to_string() })
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.status, "código de salida 3");
    }
}
