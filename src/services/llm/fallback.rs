use chrono::{Datelike, Local, NaiveDateTime, Timelike};

const WEEKDAYS: [&str; 7] =
    ["lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo"];
const MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];

const HELP_TEXT: &str = "Puedo ejecutar comandos (\"ejecuta dir\"), abrir programas (\"abre notepad\"), \
controlar el volumen (\"sube el volumen a 70\"), preparar correos (\"envía un correo\") y conversar contigo.";

const ECHO_TEMPLATE: &str = "He recibido tu mensaje: \"{{input}}\". No hay un modelo de lenguaje disponible \
ahora mismo; configura MODEL_PATH o un proveedor remoto para respuestas completas.";

enum Trigger {
    /// Any one of the phrases.
    Any(&'static [&'static str]),
    /// Every one of the words.
    All(&'static [&'static str]),
}

enum Reply {
    Text(&'static str),
    Time,
    Date,
}

struct CannedRule {
    trigger: Trigger,
    reply: Reply,
}

const RULES: &[CannedRule] = &[
    CannedRule {
        trigger: Trigger::Any(&[
            "hola", "buenos días", "buenos dias", "buen día", "buen dia", "buenas tardes",
            "buenas noches", "buenas", "hello", "hi", "hey",
        ]),
        reply: Reply::Text("Hola, soy JARVIS, tu asistente local. Dime cómo te puedo ayudar."),
    },
    CannedRule {
        trigger: Trigger::Any(&[
            "quién eres", "quien eres", "qué eres", "que eres",
            "cómo te llamas", "como te llamas",
            "who are you", "your name",
        ]),
        reply: Reply::Text(
            "Soy JARVIS, tu asistente de voz personal. Puedo ejecutar comandos, abrir programas y responder preguntas.",
        ),
    },
    CannedRule {
        trigger: Trigger::Any(&["qué hora", "que hora", "la hora", "what time"]),
        reply: Reply::Time,
    },
    CannedRule {
        trigger: Trigger::Any(&[
            "qué día", "que dia", "qué dia", "que día", "la fecha", "fecha", "what day", "date",
        ]),
        reply: Reply::Date,
    },
    CannedRule {
        trigger: Trigger::Any(&[
            "ayuda", "ayúdame", "ayudame", "qué puedes hacer", "que puedes hacer", "help",
        ]),
        reply: Reply::Text(HELP_TEXT),
    },
    CannedRule {
        trigger: Trigger::All(&["abrir", "programa"]),
        reply: Reply::Text("Puedo abrir programas con `!open <ruta>` o ejecutar comandos con `!exec <comando>`."),
    },
    CannedRule {
        trigger: Trigger::Any(&["gracias", "thanks", "thank you"]),
        reply: Reply::Text("De nada. Aquí estoy para lo que necesites."),
    },
    CannedRule {
        trigger: Trigger::Any(&["adiós", "adios", "hasta luego", "goodbye", "bye"]),
        reply: Reply::Text("¡Hasta luego! Estaré aquí cuando me necesites."),
    },
];

/// Lower-cased words separated by single spaces and padded at both ends,
/// so `" phrase "` lookups only hit whole words.
fn word_line(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}

impl Trigger {
    fn matches(&self, line: &str) -> bool {
        let has = |phrase: &&str| line.contains(&format!(" {} ", phrase));
        match self {
            Trigger::Any(phrases) => phrases.iter().any(has),
            Trigger::All(words) => words.iter().all(has),
        }
    }
}

/// Last tier of the cascade: ordered keyword rules with an echoing
/// catch-all. Makes no external calls and cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(&self, text: &str) -> String {
        self.respond_at(text, Local::now().naive_local())
    }

    pub fn respond_at(&self, text: &str, now: NaiveDateTime) -> String {
        let line = word_line(text);

        match RULES.iter().find(|rule| rule.trigger.matches(&line)) {
            Some(CannedRule { reply: Reply::Text(reply), .. }) => reply.to_string(),
            Some(CannedRule { reply: Reply::Time, .. }) => {
                format!("Son las {:02}:{:02}.", now.hour(), now.minute())
            }
            Some(CannedRule { reply: Reply::Date, .. }) => format!(
                "Hoy es {} {} de {} de {}.",
                WEEKDAYS[now.weekday().num_days_from_monday() as usize],
                now.day(),
                MONTHS[now.month0() as usize],
                now.year()
            ),
            None => ECHO_TEMPLATE.replace("{{input}}", text.trim()),
        }
    }
}
