//! Typography rule engine: a fixed ordered set of detectors/fixers over a
//! single translated string. Stateless and pure; rule sets are looked up
//! per target language so new languages are data, not new control flow.

use std::sync::OnceLock;

use regex::Regex;

pub const NBSP: char = '\u{00A0}';
pub const ELLIPSIS: char = '…';

/// Result of one rule-engine pass. `errors` is empty iff no rule fired, in
/// which case `fixed` equals the input unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub errors: Vec<String>,
    pub fixed: String,
}

/// An ordered rule set for one target language.
pub struct RuleSet {
    lang: &'static str,
    process: fn(&str, &str) -> RuleResult,
}

impl RuleSet {
    pub fn lang(&self) -> &'static str {
        self.lang
    }

    /// Run every rule over `text`, composing rewrites left to right.
    /// `original` is only context for diagnostics, never an input to rule
    /// evaluation.
    pub fn process(&self, text: &str, original: &str) -> RuleResult {
        (self.process)(text, original)
    }
}

static RULE_SETS: &[RuleSet] = &[RuleSet {
    lang: "fr",
    process: french::process,
}];

/// Rule set for a target language, if one is configured.
pub fn rule_set_for(lang: &str) -> Option<&'static RuleSet> {
    RULE_SETS.iter().find(|r| r.lang == lang)
}

pub mod french {
    use super::*;

    const DOUBLE_PUNCTUATION: [char; 5] = ['!', '?', ':', ';', '»'];

    fn space_before_punct_res() -> &'static Vec<(char, Regex)> {
        static RES: OnceLock<Vec<(char, Regex)>> = OnceLock::new();
        RES.get_or_init(|| {
            DOUBLE_PUNCTUATION
                .iter()
                .map(|&p| {
                    let re =
                        Regex::new(&format!(r"\s*{}", regex::escape(&p.to_string()))).unwrap();
                    (p, re)
                })
                .collect()
        })
    }

    pub fn process(text: &str, original: &str) -> RuleResult {
        let mut errors = Vec::new();
        let mut fixed = text.to_string();

        // Espace insécable avant la ponctuation double.
        for (punct, re) in space_before_punct_res() {
            let with_nbsp = format!("{NBSP}{punct}");
            if text.contains(*punct) && !text.contains(&with_nbsp) {
                errors.push(format!(
                    "Espace insécable manquant avant '{punct}' :{text}"
                ));
                fixed = re.replace_all(&fixed, with_nbsp.as_str()).into_owned();
            }
        }

        // Guillemets français à la place des guillemets droits.
        static QUOTED: OnceLock<Regex> = OnceLock::new();
        static QUOTED_FIX: OnceLock<Regex> = OnceLock::new();
        if QUOTED
            .get_or_init(|| Regex::new(r#""[^"]*""#).unwrap())
            .is_match(text)
        {
            errors.push(format!(
                "Utiliser les guillemets français « » au lieu des guillemets droits :{text}"
            ));
            let re = QUOTED_FIX.get_or_init(|| Regex::new(r#""([^"]+)""#).unwrap());
            fixed = re
                .replace_all(&fixed, format!("«{NBSP}${{1}}{NBSP}»").as_str())
                .into_owned();
        }

        // Apostrophe typographique.
        if text.contains('\'') {
            errors.push(format!(
                "Utiliser l'apostrophe typographique (’) au lieu de l'apostrophe droite (') :{text}"
            ));
            fixed = fixed.replace('\'', "’");
        }

        // Points de suspension en un seul caractère.
        if text.contains("...") {
            errors.push(format!(
                "Utiliser le caractère unique pour les points de suspension ({ELLIPSIS}) :{text}"
            ));
            fixed = fixed.replace("...", &ELLIPSIS.to_string());
        }

        // Espace insécable après le guillemet ouvrant.
        if text.contains('«') && !text.contains(&format!("«{NBSP}")) {
            errors.push(format!("Espace insécable manquant après « : {text}"));
            fixed = fixed.replace('«', &format!("«{NBSP}"));
        }

        // Pas de points de suspension après "etc.". Évalué après la règle
        // des points de suspension, qu'il supplante pour ce mot.
        static ETC: OnceLock<Regex> = OnceLock::new();
        static ETC_FIX: OnceLock<Regex> = OnceLock::new();
        if ETC
            .get_or_init(|| Regex::new(r"\setc(\.{2,3}|…)").unwrap())
            .is_match(text)
        {
            errors.push(format!(
                "Pas de points de suspension après \"etc.\" :{text}"
            ));
            let re = ETC_FIX.get_or_init(|| Regex::new(r"etc(\.{2,3}|…)").unwrap());
            fixed = re.replace_all(&fixed, "etc.").into_owned();
        }

        // Espace insécable avant le signe pourcent.
        static PERCENT: OnceLock<Regex> = OnceLock::new();
        if text.contains('%') && !text.contains(&format!("{NBSP}%")) {
            errors.push(format!("Espace insécable manquant avant '%' :{text}"));
            let re = PERCENT.get_or_init(|| Regex::new(r"\s*%").unwrap());
            fixed = re
                .replace_all(&fixed, format!("{NBSP}%").as_str())
                .into_owned();
        }

        if !errors.is_empty() {
            tracing::debug!(source = original, fired = errors.len(), "typography rules fired");
        }

        RuleResult { errors, fixed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(text: &str) -> RuleResult {
        rule_set_for("fr").unwrap().process(text, "source")
    }

    #[test]
    fn unknown_language_has_no_rule_set() {
        assert!(rule_set_for("de").is_none());
        assert!(rule_set_for("fr").is_some());
    }

    #[test]
    fn clean_text_is_returned_unchanged() {
        let result = process("En quelques étapes, vous avez terminé.");
        assert!(result.errors.is_empty());
        assert_eq!(result.fixed, "En quelques étapes, vous avez terminé.");
    }

    #[test]
    fn inserts_nbsp_before_double_punctuation() {
        let result = process("Bonjour!");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Espace insécable manquant avant '!'"));
        assert_eq!(result.fixed, "Bonjour\u{00A0}!");
    }

    #[test]
    fn strips_existing_space_before_punctuation() {
        let result = process("Questions et réponses !");
        assert_eq!(result.fixed, "Questions et réponses\u{00A0}!");
    }

    #[test]
    fn rewrites_straight_quotes_to_french_quotes() {
        let result = process("Il a dit \"bonjour\" à tout le monde");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("guillemets français"));
        assert_eq!(
            result.fixed,
            "Il a dit «\u{00A0}bonjour\u{00A0}» à tout le monde"
        );
    }

    #[test]
    fn replaces_straight_apostrophes() {
        let result = process("Le guide de l'utilisateur");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("apostrophe typographique"));
        assert_eq!(result.fixed, "Le guide de l’utilisateur");
    }

    #[test]
    fn collapses_three_dots_into_ellipsis() {
        let result = process("Ceci est un test...");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.fixed, "Ceci est un test…");
        assert!(!result.fixed.contains("..."));
    }

    #[test]
    fn inserts_nbsp_after_opening_quote() {
        let result = process("«Bonjour\u{00A0}»");
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("Espace insécable manquant après «")));
        assert_eq!(result.fixed, "«\u{00A0}Bonjour\u{00A0}»");
    }

    #[test]
    fn etc_overrides_ellipsis_normalization() {
        let result = process("Par exemple, pommes, etc...");
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("points de suspension"));
        assert!(result.errors[1].contains("Pas de points de suspension après \"etc.\""));
        assert_eq!(result.fixed, "Par exemple, pommes, etc.");
        assert!(!result.fixed.contains('…'));
    }

    #[test]
    fn etc_with_existing_ellipsis_glyph_is_rewritten() {
        let result = process("Des pommes, etc…");
        assert_eq!(result.fixed, "Des pommes, etc.");
    }

    #[test]
    fn inserts_nbsp_before_percent() {
        let result = process("Une remise de 50%");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Espace insécable manquant avant '%'"));
        assert_eq!(result.fixed, "Une remise de 50\u{00A0}%");

        let spaced = process("Une remise de 50 %");
        assert_eq!(spaced.fixed, "Une remise de 50\u{00A0}%");
    }

    #[test]
    fn multiple_rules_compose_left_to_right() {
        let result = process("L'invité a dit \"oui\"!");
        assert_eq!(result.errors.len(), 3);
        assert_eq!(
            result.fixed,
            "L’invité a dit «\u{00A0}oui\u{00A0}»\u{00A0}!"
        );
    }

    #[test]
    fn processing_is_idempotent() {
        let inputs = [
            "Bonjour!",
            "Il a dit \"bonjour\" à tout le monde",
            "Le guide de l'utilisateur...",
            "Par exemple, pommes, etc...",
            "Une remise de 50% !",
        ];
        for input in inputs {
            let first = process(input);
            let second = process(&first.fixed);
            assert!(
                second.errors.is_empty(),
                "second pass on {:?} reported {:?}",
                first.fixed,
                second.errors
            );
            assert_eq!(second.fixed, first.fixed);
        }
    }
}
