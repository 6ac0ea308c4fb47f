use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::aliases::ProgramAliases;
use super::types::{Action, VolumeMode, DEFAULT_VOLUME, VOLUME_MAX, VOLUME_MIN};
use crate::error::{Result, RouterError};

// Rule tables. Order inside each table and order of the tables themselves
// (exec, open, volume, mail) is the tie-break: first match wins.

static EXEC_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^(?:ejecuta?|ejecutar|corre?|correr|run|execute)\s+(?P<arg>.+)$",
        r"^(?:lanza?|inicia?|launch|start)\s+(?:(?:comando|cmd|command)\s+)?(?P<arg>.+)$",
        r"^haz\s+(?:ejecutar|correr|run)\s+(?P<arg>.+)$",
    ])
});

static OPEN_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^(?:abre?|abrir|abra|open)\s+(?:(?:el|la|the)\s+)?(?:(?:programa|aplicaci[oó]n|app|archivo|file)\s+)?(?P<arg>.+)$",
        r"^haz\s+(?:que\s+)?(?:abra|abre|open)\s+(?P<arg>.+)$",
        // Shadowed by the exec launch rule, kept so "lanza X" stays an exec.
        r"^(?:lanza?|inicia?|launch)\s+(?P<arg>.+)$",
    ])
});

const RAISE: &str = r"(?:sube?|subir|aumenta?|aumentar|incrementa?|raise|turn\s+up)";
const LOWER: &str = r"(?:baja?|bajar|disminuye?|reduce?|lower|turn\s+down)";
const SET: &str = r"(?:pon|poner|fija?|fijar|set)";
const VOLUME: &str = r"(?:volumen|volume)";
const TARGET: &str = r"\s+(?:(?:a|al|en|hasta|to)\s+)?(?P<value>-?\d+)";
// Any number after the directional phrase still turns it into `Set`.
const TRAILING_VALUE: &str = r"(?:\D*?(?P<value>-?\d+))?";

struct VolumeRule {
    pattern: Regex,
    /// `None` means the rule carries an explicit value and yields `Set`.
    direction: Option<VolumeMode>,
}

static VOLUME_RULES: LazyLock<Vec<VolumeRule>> = LazyLock::new(|| {
    let explicit = |verb: &str| format!(r"\b{verb}\s+(?:el\s+|the\s+)?{VOLUME}{TARGET}");
    let rules = [
        (explicit(RAISE), None),
        (explicit(LOWER), None),
        (explicit(SET), None),
        (format!(r"\b{VOLUME}{TARGET}"), None),
        (format!(r"\b{RAISE}\b.*\b{VOLUME}{TRAILING_VALUE}"), Some(VolumeMode::Up)),
        (format!(r"\b{LOWER}\b.*\b{VOLUME}{TRAILING_VALUE}"), Some(VolumeMode::Down)),
    ];
    rules
        .into_iter()
        .map(|(p, direction)| VolumeRule {
            pattern: Regex::new(&p).expect("valid volume pattern"),
            direction,
        })
        .collect()
});

static MAIL_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:env[ií]a?|enviar|manda?|mandar)\s+(?:(?:un|una)\s+)?(?:correo|e-?mail|mail)\b",
        r"\b(?:quiero\s+)?enviar\s+correo",
        r"\bredactar?\s+(?:un\s+)?correo",
        r"\b(?:send|compose|write)\s+(?:an?\s+)?(?:new\s+)?(?:e-?mail|mail)\b",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid intent pattern"))
        .collect()
}

/// Lower-cased, trimmed copy of the input that remembers where each byte
/// came from, so captured parameters can be cut from the original text with
/// its casing intact.
struct Normalized<'a> {
    original: &'a str,
    lowered: String,
    origin: Vec<usize>,
}

impl<'a> Normalized<'a> {
    fn new(text: &'a str) -> Self {
        let original = text.trim();
        let mut lowered = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());

        for (offset, ch) in original.char_indices() {
            for lower in ch.to_lowercase() {
                lowered.push(lower);
                origin.extend(std::iter::repeat(offset).take(lower.len_utf8()));
            }
        }

        Self {
            original,
            lowered,
            origin,
        }
    }

    fn original_span(&self, start: usize, end: usize) -> &'a str {
        let at = |i: usize| self.origin.get(i).copied().unwrap_or(self.original.len());
        let (s, e) = (at(start), at(end));
        if s <= e {
            &self.original[s..e]
        } else {
            ""
        }
    }
}

/// Punctuation a transcriber tends to tack on. Only stripped for alias
/// lookup, never from the captured text itself.
fn alias_key(s: &str) -> &str {
    s.trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';'))
        .trim_end()
}

fn parse_volume(digits: &str) -> i64 {
    digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        VOLUME_MIN
    } else {
        VOLUME_MAX
    })
}

/// Pattern rule engine mapping free text to an `Action`.
///
/// Stateless after construction; `classify` is a pure function of its input.
#[derive(Debug, Clone, Default)]
pub struct IntentClassifier {
    aliases: ProgramAliases,
}

impl IntentClassifier {
    pub fn new(aliases: ProgramAliases) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &ProgramAliases {
        &self.aliases
    }

    pub fn classify(&self, text: &str) -> Action {
        let norm = Normalized::new(text);
        let action = self
            .match_exec(&norm)
            .or_else(|| self.match_open(&norm))
            .or_else(|| self.match_volume(&norm))
            .or_else(|| self.match_mail(&norm))
            .unwrap_or_else(|| Action::Conversation {
                text: text.to_string(),
            });

        debug!(kind = ?action.kind(), "classified");
        action
    }

    pub fn classify_bytes(&self, text: &[u8]) -> Result<Action> {
        let text = std::str::from_utf8(text)
            .map_err(|e| RouterError::InvalidInput(format!("utterance is not UTF-8: {e}")))?;
        Ok(self.classify(text))
    }

    fn capture_arg<'a>(rules: &[Regex], norm: &Normalized<'a>) -> Option<&'a str> {
        rules.iter().find_map(|rule| {
            let arg = rule.captures(&norm.lowered)?.name("arg")?;
            let raw = norm.original_span(arg.start(), arg.end()).trim();
            (!raw.is_empty()).then_some(raw)
        })
    }

    fn match_exec(&self, norm: &Normalized) -> Option<Action> {
        let command = Self::capture_arg(&EXEC_RULES, norm)?;
        Some(Action::Exec {
            command: command.to_string(),
        })
    }

    fn match_open(&self, norm: &Normalized) -> Option<Action> {
        let target = Self::capture_arg(&OPEN_RULES, norm)?;
        // Unresolved names go through untouched; the executor decides.
        let path = self.aliases.resolve(alias_key(target)).unwrap_or(target);
        Some(Action::Open {
            path: path.to_string(),
        })
    }

    fn match_volume(&self, norm: &Normalized) -> Option<Action> {
        VOLUME_RULES.iter().find_map(|rule| {
            let caps = rule.pattern.captures(&norm.lowered)?;
            let action = match (caps.name("value"), rule.direction) {
                (Some(value), _) => Action::volume(VolumeMode::Set, parse_volume(value.as_str())),
                (None, Some(mode)) => Action::volume(mode, i64::from(DEFAULT_VOLUME)),
                (None, None) => return None,
            };
            Some(action)
        })
    }

    fn match_mail(&self, norm: &Normalized) -> Option<Action> {
        MAIL_RULES
            .iter()
            .any(|rule| rule.is_match(&norm.lowered))
            .then_some(Action::SendMail)
    }
}
