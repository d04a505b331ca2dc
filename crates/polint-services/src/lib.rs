//! High-level checking pipeline over lower-level crates.
//! Intentionally thin: one stable entrypoint used by the CLI.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use polint_core::{CheckReport, Result};
use polint_glossary::{Glossary, ReviewComment};
use polint_po::Catalog;
use polint_rules::rule_set_for;
use polint_translate::{Flag, Translator};

/// Per-pass settings for [`check`].
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Apply typography fixes and glossary annotations to the catalog.
    pub fix: bool,
    /// Request machine translations for untranslated entries.
    pub translate: bool,
    /// Target language code of the catalog being checked.
    pub target_lang: String,
    /// Only (re)translate entries carrying a `glossary-review` comment.
    pub retranslate_glossary_only: bool,
}

impl Default for CheckOptions {
    fn default() -> CheckOptions {
        CheckOptions {
            fix: false,
            translate: false,
            target_lang: "fr".to_string(),
            retranslate_glossary_only: false,
        }
    }
}

/// Check one catalog: translate empty entries when requested, then run the
/// typography rules and the glossary checker over every translated entry.
///
/// Entries are processed in catalog order, each one fully before the next.
/// A `stop` review decision halts further automatic translation for the
/// remainder of the pass; entries already translated keep their text.
pub fn check(
    content: &str,
    options: &CheckOptions,
    translator: &mut Translator,
    glossary: &Glossary,
) -> Result<CheckReport> {
    let mut catalog = Catalog::parse(content)?;
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut halted = false;
    let rules = rule_set_for(&options.target_lang);

    for message in &mut catalog.messages {
        // Header entry.
        if message.msgid.is_empty() {
            continue;
        }

        let eligible = if options.retranslate_glossary_only {
            message
                .comments
                .iter()
                .any(|c| ReviewComment::parse(c).is_some())
        } else {
            !message.is_translated()
        };

        if options.translate && eligible && !halted {
            if let Some(outcome) =
                translator.translate(&message.msgid, &options.target_lang, glossary)?
            {
                if outcome.flag == Some(Flag::Stop) {
                    tracing::info!("translation stopped, remaining entries are left untouched");
                    halted = true;
                } else if let Some(text) = outcome.text.filter(|t| !t.is_empty()) {
                    message.set_translation(text);
                    if outcome.flag == Some(Flag::Fuzzy) {
                        message.add_flag(Flag::Fuzzy.as_str());
                    }
                    // A fresh translation resolves the pending review cycle.
                    if options.retranslate_glossary_only {
                        message.remove_comments_matching(|c| ReviewComment::parse(c).is_some());
                    }
                }
            }
        }

        if !message.is_translated() {
            continue;
        }
        let Some(rules) = rules else {
            // Typography and glossary checks only apply to the language the
            // rule set was written for.
            continue;
        };

        let result = rules.process(&message.msgstr, &message.msgid);
        if !result.errors.is_empty() {
            errors.extend(result.errors);
            if options.fix {
                message.set_translation(result.fixed);
            }
        }

        let glossary_result = glossary.check(&message.msgid, &message.msgstr);
        warnings.extend(glossary_result.warnings);
        if options.fix {
            for comment in glossary_result.comments {
                message.add_comment(&comment.to_string());
            }
        }
    }

    Ok(CheckReport {
        errors: dedup_first(errors),
        warnings: dedup_first(warnings),
        fixed_content: options.fix.then(|| catalog.to_string()),
    })
}

/// Deduplicate, keeping the first occurrence order.
fn dedup_first(items: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

/// Detect a target language code from a catalog filename, e.g.
/// `plugin-fr.po` or `plugin-fr_FR.po` → `fr`.
pub fn detect_language_from_filename(filename: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"-([a-z]{2})(?:_[A-Z]{2})?\.po$").unwrap());
    re.captures(filename).map(|caps| caps[1].to_string())
}
