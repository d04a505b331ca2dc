//! Translation orchestration: builds the system prompt (target language,
//! glossary directives), calls the engine adapter, and drives the optional
//! interactive review loop. Engine failures are swallowed here so a single
//! bad entry cannot abort a catalog-wide pass; only an unreadable
//! interaction channel may abort the run.

use std::io::{self, BufRead, Write as _};
use std::process::Command;

use owo_colors::OwoColorize;
use polint_core::Result;
use polint_engine::TranslationEngine;
use polint_glossary::{Glossary, GlossaryTerm};

const SYSTEM_PROMPT: &str = "Translate the following English text to {{TARGET_LANGUAGE}}, maintaining the original tone and formatting.\n\
Focus on accuracy and cultural context. Don't add or remove any information.\n\
CRITICAL: ANSWER WITH THE TRANSLATION ONLY. NO EXPLANATIONS, NO FORMATTING, NO ADDITIONAL TEXT.\n\
Just return the translated text without any prefix, suffix, quotes, or commentary.";

const SYSTEM_PROMPT_INTRODUCE_GLOSSARY: &str =
    "Use these exact translations for the specified terms :";

/// Flags a review decision can attach to the translated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Accepted but needs human review later.
    Fuzzy,
    /// Halt further automatic translation for the rest of the run.
    Stop,
}

impl Flag {
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Fuzzy => "fuzzy",
            Flag::Stop => "stop",
        }
    }
}

/// Outcome of one translation attempt after optional review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub text: Option<String>,
    pub flag: Option<Flag>,
}

impl Outcome {
    /// No suggestion: rejected review or a swallowed engine failure.
    pub fn empty() -> Outcome {
        Outcome::default()
    }
}

/// Engine call result, kept explicit so callers match on the three cases
/// instead of telling "not configured" and "failed" apart by null checks.
#[derive(Debug)]
pub enum Request {
    NotConfigured,
    Failed(String),
    Suggested(String),
}

/// Human interaction channel used by the review loop.
pub trait Console {
    fn read_line(&mut self) -> io::Result<String>;
    fn write(&mut self, text: &str) -> io::Result<()>;
    /// Open `initial` in an external editing surface and return the edited
    /// content, or `None` when editing was aborted.
    fn open_editor(&mut self, initial: &str) -> io::Result<Option<String>>;
}

/// Console over stdin/stdout and `$EDITOR` (fallback `nano`).
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "failed to read from stdin",
            ));
        }
        Ok(line)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }

    fn open_editor(&mut self, initial: &str) -> io::Result<Option<String>> {
        let mut file = tempfile::Builder::new()
            .prefix("translation_")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());
        let mut parts = editor.split_whitespace();
        let Some(program) = parts.next() else {
            return Ok(None);
        };
        let status = Command::new(program).args(parts).arg(file.path()).status()?;
        if !status.success() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(file.path())?))
    }
}

/// Resolve a language code to its human-readable name.
pub fn language_name(code: &str) -> &'static str {
    match code {
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "it" => "Italian",
        "pt" => "Portuguese",
        "nl" => "Dutch",
        "ar" => "Arabic",
        _ => "Unknown",
    }
}

fn build_system_prompt(target_lang: &str, relevant: &[&GlossaryTerm]) -> String {
    let mut prompt = SYSTEM_PROMPT.replace("{{TARGET_LANGUAGE}}", language_name(target_lang));
    if !relevant.is_empty() {
        prompt.push('\n');
        prompt.push_str(SYSTEM_PROMPT_INTRODUCE_GLOSSARY);
        prompt.push('\n');
        for term in relevant {
            prompt.push_str(&format!(
                "- {} -> {}\n",
                term.term(),
                term.renderings().join(" or ")
            ));
        }
    }
    prompt
}

pub struct Translator {
    engine: Option<Box<dyn TranslationEngine>>,
    interactive: bool,
    console: Box<dyn Console>,
}

impl Translator {
    pub fn new(engine: Option<Box<dyn TranslationEngine>>, interactive: bool) -> Translator {
        Translator {
            engine,
            interactive,
            console: Box::new(StdConsole),
        }
    }

    pub fn with_console(mut self, console: Box<dyn Console>) -> Translator {
        self.console = console;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.engine.is_some()
    }

    fn request(&self, original: &str, system_prompt: &str) -> Request {
        match &self.engine {
            None => Request::NotConfigured,
            Some(engine) => match engine.translate(original, system_prompt) {
                Ok(text) => Request::Suggested(text.trim().to_string()),
                Err(e) => {
                    tracing::warn!(error = %e, "translation engine failed");
                    Request::Failed(e.to_string())
                }
            },
        }
    }

    /// Request a machine translation of `original` into `target_lang`.
    ///
    /// Returns `None` when no engine is configured. Glossary directives are
    /// injected only when the target language matches the language the
    /// glossary was loaded for.
    pub fn translate(
        &mut self,
        original: &str,
        target_lang: &str,
        glossary: &Glossary,
    ) -> Result<Option<Outcome>> {
        if self.engine.is_none() {
            return Ok(None);
        }

        let relevant = if target_lang == glossary.lang() {
            glossary.relevant_terms(original)
        } else {
            Vec::new()
        };
        let system_prompt = build_system_prompt(target_lang, &relevant);

        match self.request(original, &system_prompt) {
            Request::NotConfigured => Ok(None),
            Request::Failed(_) => Ok(Some(Outcome::empty())),
            Request::Suggested(suggested) => {
                if !suggested.is_empty() && self.interactive {
                    let outcome = self.review(original, &suggested, &relevant)?;
                    Ok(Some(outcome))
                } else {
                    Ok(Some(Outcome {
                        text: Some(suggested),
                        flag: None,
                    }))
                }
            }
        }
    }

    /// Single-shot review: one line of input decides the fate of the
    /// suggestion. All terminal states return; the machine never loops.
    fn review(
        &mut self,
        original: &str,
        suggested: &str,
        relevant: &[&GlossaryTerm],
    ) -> Result<Outcome> {
        self.console
            .write(&render_review_screen(original, suggested, relevant))?;
        let response = self.console.read_line()?.trim().to_lowercase();

        let outcome = match response.as_str() {
            "" | "y" => Outcome {
                text: Some(suggested.to_string()),
                flag: None,
            },
            "w" => Outcome {
                text: Some(suggested.to_string()),
                flag: Some(Flag::Fuzzy),
            },
            "s" => Outcome {
                text: None,
                flag: Some(Flag::Stop),
            },
            "e" => match self.console.open_editor(suggested)? {
                Some(edited) if !edited.trim().is_empty() => Outcome {
                    text: Some(edited.trim().to_string()),
                    flag: None,
                },
                _ => Outcome::empty(),
            },
            _ => Outcome::empty(),
        };
        Ok(outcome)
    }
}

fn render_review_screen(original: &str, suggested: &str, relevant: &[&GlossaryTerm]) -> String {
    let mut screen = String::new();
    screen.push_str(&format!(
        "\n{}\n{}\n{}\n\n",
        "Original :".yellow().bold(),
        "==========".yellow().bold(),
        original
    ));
    if !relevant.is_empty() {
        screen.push_str(&format!(
            "{}\n{}\n",
            "Glossary :".yellow().bold(),
            "==========".yellow().bold()
        ));
        for term in relevant {
            screen.push_str(&format!(
                "- {} -> {}\n",
                term.term(),
                term.renderings().join(" or ")
            ));
        }
        screen.push('\n');
    }
    screen.push_str(&format!(
        "{}\n{}\n{}\n\n",
        "Suggested translation :".green().bold(),
        "=======================".green().bold(),
        suggested
    ));
    screen.push_str(&format!(
        "{}\n{}\n",
        "Choose an action:".cyan().bold(),
        "==================".cyan().bold()
    ));
    screen.push_str("[Y] Accept translation\n");
    screen.push_str("[W] Accept but needs review later\n");
    screen.push_str("[N] Reject translation\n");
    screen.push_str("[E] Edit in default editor\n");
    screen.push_str("[S] Stop translation and continue later (changes made so far are kept)\n");
    screen.push_str("\nYour choice (Y/W/N/E/S) [Y]: ");
    screen
}
