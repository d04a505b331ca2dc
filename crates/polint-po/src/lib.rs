//! Line-oriented PO catalog reader/writer.
//!
//! Keeps what the checker needs to round-trip a catalog: translator
//! comments, extracted comments, references, flags, msgctxt and multiline
//! msgid/msgstr. Plural forms are tolerated on input and skipped.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoError {
    #[error("invalid po string: {0}")]
    InvalidString(String),
}

/// One source/translation pair plus its metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Translator comments (`# ...`), without the leading marker.
    pub comments: Vec<String>,
    /// Extracted comments (`#. ...`).
    pub extracted: Vec<String>,
    /// Source references (`#: path:line`).
    pub references: Vec<String>,
    /// Flags (`#, fuzzy`), order preserved.
    pub flags: Vec<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgstr: String,
}

impl Message {
    pub fn is_translated(&self) -> bool {
        !self.msgstr.trim().is_empty()
    }

    pub fn set_translation(&mut self, text: impl Into<String>) {
        self.msgstr = text.into();
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Add a flag unless already present.
    pub fn add_flag(&mut self, flag: &str) {
        if !self.has_flag(flag) {
            self.flags.push(flag.to_string());
        }
    }

    /// Add a translator comment unless an identical one is already present.
    pub fn add_comment(&mut self, comment: &str) {
        if !self.comments.iter().any(|c| c == comment) {
            self.comments.push(comment.to_string());
        }
    }

    pub fn remove_comments_matching<F: Fn(&str) -> bool>(&mut self, pred: F) {
        self.comments.retain(|c| !pred(c));
    }
}

/// An ordered PO catalog. The header, when present, is the leading entry
/// with an empty `msgid` and survives a parse/serialize round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub messages: Vec<Message>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Msgctxt,
    Msgid,
    Msgstr,
}

impl Catalog {
    pub fn parse(content: &str) -> Result<Catalog, PoError> {
        let mut messages = Vec::new();
        let mut cur = Message::default();
        let mut section = Section::None;
        let mut pending = false;

        let flush =
            |cur: &mut Message, pending: &mut bool, section: &mut Section, out: &mut Vec<Message>| {
                if *pending {
                    out.push(std::mem::take(cur));
                }
                *pending = false;
                *section = Section::None;
            };

        for line in content.lines() {
            let lt = line.trim();

            if lt.is_empty() {
                flush(&mut cur, &mut pending, &mut section, &mut messages);
                continue;
            }

            if let Some(rest) = lt.strip_prefix("#:") {
                cur.references.push(rest.trim().to_string());
                pending = true;
                continue;
            }
            if let Some(rest) = lt.strip_prefix("#,") {
                cur.flags.extend(
                    rest.split(',')
                        .map(|fl| fl.trim().to_string())
                        .filter(|fl| !fl.is_empty()),
                );
                pending = true;
                continue;
            }
            if let Some(rest) = lt.strip_prefix("#.") {
                cur.extracted.push(rest.trim().to_string());
                pending = true;
                continue;
            }
            if let Some(rest) = lt.strip_prefix('#') {
                cur.comments.push(rest.trim_start().to_string());
                pending = true;
                continue;
            }

            // Plural forms are out of scope; skip their keyword lines and
            // let the continuation handling below ignore their strings.
            if lt.starts_with("msgid_plural") || lt.starts_with("msgstr[") {
                section = Section::None;
                continue;
            }

            if let Some(rest) = lt.strip_prefix("msgctxt") {
                cur.msgctxt = Some(parse_po_string(rest)?);
                section = Section::Msgctxt;
                pending = true;
                continue;
            }
            if let Some(rest) = lt.strip_prefix("msgid") {
                cur.msgid = parse_po_string(rest)?;
                section = Section::Msgid;
                pending = true;
                continue;
            }
            if let Some(rest) = lt.strip_prefix("msgstr") {
                cur.msgstr = parse_po_string(rest)?;
                section = Section::Msgstr;
                pending = true;
                continue;
            }

            if lt.starts_with('"') {
                let chunk = parse_po_string(lt)?;
                match section {
                    Section::Msgctxt => {
                        if let Some(ctx) = &mut cur.msgctxt {
                            ctx.push_str(&chunk);
                        }
                    }
                    Section::Msgid => cur.msgid.push_str(&chunk),
                    Section::Msgstr => cur.msgstr.push_str(&chunk),
                    Section::None => {}
                }
            }
        }

        flush(&mut cur, &mut pending, &mut section, &mut messages);

        Ok(Catalog { messages })
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for c in &m.comments {
                if c.is_empty() {
                    writeln!(f, "#")?;
                } else {
                    writeln!(f, "# {c}")?;
                }
            }
            for c in &m.extracted {
                writeln!(f, "#. {c}")?;
            }
            for r in &m.references {
                writeln!(f, "#: {r}")?;
            }
            if !m.flags.is_empty() {
                writeln!(f, "#, {}", m.flags.join(", "))?;
            }
            if let Some(ctx) = &m.msgctxt {
                writeln!(f, "msgctxt \"{}\"", escape_po(ctx))?;
            }
            writeln!(f, "msgid \"{}\"", escape_po(&m.msgid))?;
            writeln!(f, "msgstr \"{}\"", escape_po(&m.msgstr))?;
        }
        Ok(())
    }
}

fn parse_po_string(s: &str) -> Result<String, PoError> {
    let s = s.trim();
    if !s.starts_with('"') || !s.ends_with('"') || s.len() < 2 {
        return Err(PoError::InvalidString(s.to_string()));
    }
    let inner = &s[1..s.len() - 1];
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    other => out.push(other),
                }
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

fn escape_po(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}
