use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::{bail, Result};
use owo_colors::OwoColorize;
use polint_config::PolintConfig;
use polint_engine::TranslationEngine;
use polint_glossary::Glossary;
use polint_services::{check, detect_language_from_filename, CheckOptions};
use polint_translate::{language_name, Translator};
use tracing::debug;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(
    name = "polint",
    version,
    about = "Check PO catalogs: French typography, terminology glossary, AI-assisted translation"
)]
struct Cli {
    /// PO catalog files to check
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Fix typography errors in place (a .bak backup is written first)
    #[arg(long)]
    fix: bool,

    /// Translate empty entries with the configured AI engine
    #[arg(long)]
    translate: bool,

    /// Review each suggested translation interactively
    #[arg(long)]
    interactive: bool,

    /// Retranslate only entries with glossary-review comments (implies --translate)
    #[arg(long)]
    retranslate_glossary: bool,

    /// Translation engine: openai or claude
    #[arg(long)]
    engine: Option<String>,

    /// Model name passed to the engine
    #[arg(long)]
    model: Option<String>,

    /// Base URL for OpenAI-compatible endpoints
    #[arg(long)]
    api_url: Option<String>,

    /// Target language code (overrides filename detection)
    #[arg(long)]
    lang: Option<String>,

    /// Only print errors and warnings
    #[arg(long)]
    quiet: bool,

    /// Suppress glossary warnings
    #[arg(long)]
    no_warnings: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let registry = tracing_subscriber::registry().with(console_layer);

    // Verbose file logging is opt-in; the console stays quiet by default.
    if let Ok(dir) = std::env::var("POLINT_LOG_DIR") {
        let file_appender = rolling::daily(dir, "polint.log");
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(file_writer)
            .with_filter(EnvFilter::new("debug"));
        registry.with(file_layer).init();
        Some(guard)
    } else {
        registry.init();
        None
    }
}

fn build_engine(cli: &Cli, config: &PolintConfig) -> Result<Option<Box<dyn TranslationEngine>>> {
    if !(cli.translate || cli.retranslate_glossary) {
        return Ok(None);
    }

    let kind = cli
        .engine
        .clone()
        .or_else(|| config.engine.clone())
        .unwrap_or_else(|| "openai".to_string());

    let engine = match kind.as_str() {
        "openai" => {
            let api_key = match std::env::var("OPENAI_API_KEY") {
                Ok(key) if !key.is_empty() => key,
                _ => bail!("OPENAI_API_KEY environment variable is not set"),
            };
            let model = cli
                .model
                .clone()
                .or_else(|| config.model.clone())
                .unwrap_or_else(|| "gpt-4o-mini".to_string());
            let api_url = cli.api_url.clone().or_else(|| config.api_url.clone());
            polint_engine::openai(&api_key, &model, api_url.as_deref())?
        }
        "claude" => polint_engine::claude(cli.model.as_deref().or(config.model.as_deref()))?,
        other => bail!("Unknown engine '{other}'"),
    };

    Ok(Some(engine))
}

struct Ui {
    use_color: bool,
}

impl Ui {
    fn error(&self, message: &str) {
        if self.use_color {
            println!("{} {message}", "ERROR:".red().bold());
        } else {
            println!("ERROR: {message}");
        }
    }

    fn warning(&self, message: &str) {
        if self.use_color {
            println!("{} {message}", "WARNING:".yellow().bold());
        } else {
            println!("WARNING: {message}");
        }
    }
}

fn run(cli: Cli, ui: &Ui) -> Result<ExitCode> {
    let config = polint_config::load_config()?;
    let engine = build_engine(&cli, &config)?;
    let translating = cli.translate || cli.retranslate_glossary;
    let mut translator = Translator::new(engine, cli.interactive);

    let glossary = match config.glossary.as_deref() {
        Some(path) => Glossary::from_path("fr", Path::new(path))?,
        None => Glossary::builtin_fr(),
    };
    let no_warnings = cli.no_warnings || config.no_warnings.unwrap_or(false);

    let mut failed = false;
    for file in &cli.files {
        if !file.exists() {
            ui.error(&format!("File not found: {}", file.display()));
            failed = true;
            continue;
        }
        let content = fs::read_to_string(file)?;

        let target_lang = cli
            .lang
            .clone()
            .or_else(|| {
                file.file_name()
                    .and_then(|n| n.to_str())
                    .and_then(detect_language_from_filename)
            })
            .or_else(|| config.target_lang.clone())
            .unwrap_or_else(|| "fr".to_string());

        if !cli.quiet {
            println!("Checking {}", file.display());
            println!("Language: {}", language_name(&target_lang));
        }
        debug!(file = %file.display(), lang = %target_lang, "checking catalog");

        let options = CheckOptions {
            fix: cli.fix,
            translate: translating,
            target_lang,
            retranslate_glossary_only: cli.retranslate_glossary,
        };
        let report = check(&content, &options, &mut translator, &glossary)?;

        for error in &report.errors {
            ui.error(error);
        }
        if !no_warnings {
            for warning in &report.warnings {
                ui.warning(warning);
            }
        }
        if !report.errors.is_empty() {
            failed = true;
        }

        if let Some(fixed) = report.fixed_content {
            if fixed != content {
                println!("Fixing {}", file.display());
                let backup = PathBuf::from(format!("{}.bak", file.display()));
                fs::copy(file, &backup)?;
                if let Err(e) = fs::write(file, fixed) {
                    ui.error(&format!("Cannot write to file {}: {e}", file.display()));
                    failed = true;
                }
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    run(cli, &Ui { use_color })
}
