//! Terminology glossary: curated term → preferred renderings, loaded from
//! two-column CSV data and checked against source/translation pairs.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlossaryError {
    #[error("failed to read glossary: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed glossary data: {0}")]
    Csv(#[from] csv::Error),
    #[error("glossary term {term:?} is not a usable pattern: {source}")]
    Pattern {
        term: String,
        source: regex::Error,
    },
}

/// One glossary term with its ordered, non-empty list of acceptable
/// renderings and a precompiled case-insensitive whole-word matcher.
#[derive(Debug, Clone)]
pub struct GlossaryTerm {
    term: String,
    renderings: Vec<String>,
    word_re: Regex,
}

impl GlossaryTerm {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn renderings(&self) -> &[String] {
        &self.renderings
    }

    /// Whole-word, case-insensitive presence test against a source string.
    pub fn occurs_in(&self, original: &str) -> bool {
        self.word_re.is_match(original)
    }

    /// Case-insensitive substring test: is any acceptable rendering present
    /// in the translation?
    pub fn satisfied_by(&self, translated: &str) -> bool {
        let lower = translated.to_lowercase();
        self.renderings
            .iter()
            .any(|r| lower.contains(&r.to_lowercase()))
    }
}

/// Diagnostics for one source/translation pair.
#[derive(Debug, Clone, Default)]
pub struct GlossaryResult {
    pub warnings: Vec<String>,
    pub comments: Vec<ReviewComment>,
}

/// Read-only term mapping for one target language, loaded once per run.
#[derive(Debug, Clone)]
pub struct Glossary {
    lang: String,
    terms: Vec<GlossaryTerm>,
}

impl Glossary {
    /// Load from CSV rows of `term,rendering`, one row per alias. The first
    /// row is a header and is discarded; repeated terms accumulate their
    /// renderings in file order.
    pub fn from_csv<R: Read>(lang: &str, reader: R) -> Result<Glossary, GlossaryError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut terms: Vec<(String, Vec<String>)> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.len() < 2 {
                continue;
            }
            let term = record[0].trim();
            let rendering = record[1].trim();
            if term.is_empty() || rendering.is_empty() {
                continue;
            }
            match terms.iter_mut().find(|(t, _)| t == term) {
                Some((_, renderings)) => renderings.push(rendering.to_string()),
                None => terms.push((term.to_string(), vec![rendering.to_string()])),
            }
        }

        let terms = terms
            .into_iter()
            .map(|(term, renderings)| {
                let word_re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&term))).map_err(
                    |source| GlossaryError::Pattern {
                        term: term.clone(),
                        source,
                    },
                )?;
                Ok(GlossaryTerm {
                    term,
                    renderings,
                    word_re,
                })
            })
            .collect::<Result<Vec<_>, GlossaryError>>()?;

        Ok(Glossary {
            lang: lang.to_string(),
            terms,
        })
    }

    pub fn from_path(lang: &str, path: &Path) -> Result<Glossary, GlossaryError> {
        Glossary::from_csv(lang, File::open(path)?)
    }

    /// The reference French glossary shipped with the crate.
    pub fn builtin_fr() -> Glossary {
        static DATA: &str = include_str!("../data/fr.csv");
        Glossary::from_csv("fr", DATA.as_bytes()).expect("embedded glossary is well-formed")
    }

    /// An empty glossary for a language with no curated terminology.
    pub fn empty(lang: &str) -> Glossary {
        Glossary {
            lang: lang.to_string(),
            terms: Vec::new(),
        }
    }

    /// The language code the mapping was loaded for.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms whose key occurs (case-insensitive, whole-word) in `original`.
    pub fn relevant_terms(&self, original: &str) -> Vec<&GlossaryTerm> {
        self.terms.iter().filter(|t| t.occurs_in(original)).collect()
    }

    /// Cross-reference a source string against the glossary and flag
    /// translations missing every preferred rendering of a term.
    pub fn check(&self, original: &str, translated: &str) -> GlossaryResult {
        let mut result = GlossaryResult::default();
        for term in &self.terms {
            if !term.occurs_in(original) {
                continue;
            }
            if term.satisfied_by(translated) {
                continue;
            }
            result.warnings.push(format!(
                "Le terme '{}' devrait être traduit par '{}' : {}",
                term.term(),
                term.renderings().join(" ou "),
                translated
            ));
            result.comments.push(ReviewComment {
                term: term.term().to_string(),
                renderings: term.renderings().to_vec(),
            });
        }
        result
    }
}

/// Structured `glossary-review` annotation persisted in catalog comments.
///
/// Rendered as `glossary-review: '<term>' → '<renderings joined by " ou ">'`
/// and parsed back structurally, so call sites never scan comment strings
/// by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    pub term: String,
    pub renderings: Vec<String>,
}

impl ReviewComment {
    pub fn parse(comment: &str) -> Option<ReviewComment> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^glossary-review:\s*'(.+?)'\s*→\s*'(.+)'\s*$").unwrap()
        });
        let caps = re.captures(comment.trim())?;
        Some(ReviewComment {
            term: caps[1].to_string(),
            renderings: caps[2].split(" ou ").map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for ReviewComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "glossary-review: '{}' → '{}'",
            self.term,
            self.renderings.join(" ou ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glossary(rows: &str) -> Glossary {
        let csv = format!("term,translation\n{rows}");
        Glossary::from_csv("fr", csv.as_bytes()).unwrap()
    }

    #[test]
    fn accumulates_renderings_per_term() {
        let g = glossary("archive,archive\narchive,archiver\nupload,téléverser\n");
        let terms = g.relevant_terms("Please archive the upload");
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].term(), "archive");
        assert_eq!(terms[0].renderings(), ["archive", "archiver"]);
    }

    #[test]
    fn missing_rendering_yields_one_warning_and_comment() {
        let g = glossary("archive,archive\narchive,archiver\n");
        let result = g.check("Please archive your documents", "Veuillez compresser vos documents");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains(
            "Le terme 'archive' devrait être traduit par 'archive ou archiver'"
        ));
        assert_eq!(
            result.comments[0].to_string(),
            "glossary-review: 'archive' → 'archive ou archiver'"
        );
    }

    #[test]
    fn any_rendering_satisfies_the_term() {
        let g = glossary("archive,archive\narchive,archiver\n");
        let result = g.check("Please archive your documents", "Veuillez archiver vos documents");
        assert!(result.warnings.is_empty());
        assert!(result.comments.is_empty());
    }

    #[test]
    fn rendering_match_is_case_insensitive() {
        let g = glossary("archive,archiver\n");
        let result = g.check("Archive everything", "ARCHIVER le tout");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn term_match_respects_word_boundaries() {
        let g = glossary("set up,configurer\nsettings,réglages\n");
        // "set" alone must not match the "set up" key.
        assert!(g.check("set", "définir").warnings.is_empty());
        // "preset" must not match "settings" or "set up".
        assert!(g.check("preset", "réglage").warnings.is_empty());
        // The full phrase does match.
        assert_eq!(g.check("Please set up the plugin", "Veuillez installer").warnings.len(), 1);
    }

    #[test]
    fn header_row_is_discarded() {
        let g = glossary("");
        assert!(g.is_empty());
        // "term" from the header must not have become a glossary entry.
        assert!(g.check("term", "anything").warnings.is_empty());
    }

    #[test]
    fn builtin_french_glossary_loads() {
        let g = Glossary::builtin_fr();
        assert_eq!(g.lang(), "fr");
        assert!(!g.is_empty());
        assert_eq!(
            g.check("Please archive your documents", "Compress").warnings.len(),
            1
        );
    }

    #[test]
    fn review_comment_round_trips() {
        let c = ReviewComment {
            term: "archive".into(),
            renderings: vec!["archive".into(), "archiver".into()],
        };
        let rendered = c.to_string();
        assert_eq!(rendered, "glossary-review: 'archive' → 'archive ou archiver'");
        assert_eq!(ReviewComment::parse(&rendered), Some(c));
        assert_eq!(ReviewComment::parse("just a comment"), None);
    }
}
