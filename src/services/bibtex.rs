//! Minimal BibTeX reader/writer for ORCID citations.
//!
//! ORCID hands back one entry per citation; the reader accepts a whole file
//! anyway so a mirror can carry several. Output is stable: lower-cased
//! field names in alphabetical order, two-space indent, a trailing comma
//! after every field.

use crate::error::SiteError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub entry_type: String,
    pub key: String,
    pub fields: BTreeMap<String, String>,
}

impl BibEntry {
    pub fn new(entry_type: &str, key: &str) -> Self {
        Self {
            entry_type: entry_type.to_ascii_lowercase(),
            key: key.to_string(),
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
    }
}

pub fn write_entry(entry: &BibEntry) -> String {
    let mut out = format!("@{}{{{},\n", entry.entry_type, entry.key);
    for (name, value) in &entry.fields {
        out.push_str(&format!("  {} = {{{}}},\n", name, value));
    }
    out.push('}');
    out
}

pub fn parse_entries(text: &str) -> Result<Vec<BibEntry>, SiteError> {
    let mut p = Parser { src: text, pos: 0 };
    let mut out = Vec::new();
    while p.seek_entry() {
        if let Some(entry) = p.entry()? {
            out.push(entry);
        }
    }
    Ok(out)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn err(&self, message: &str) -> SiteError {
        SiteError::Bibtex {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn seek_entry(&mut self) -> bool {
        match self.src[self.pos..].find('@') {
            Some(i) => {
                self.pos += i + 1;
                true
            }
            None => {
                self.pos = self.src.len();
                false
            }
        }
    }

    fn take_while(&mut self, f: impl Fn(u8) -> bool) -> &'a str {
        let src: &'a str = self.src;
        let start = self.pos;
        while self.peek().is_some_and(&f) {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    // An `@` not followed by `type{` or `type(` is stray text, such as an
    // email address in a comment, and yields no entry.
    fn entry(&mut self) -> Result<Option<BibEntry>, SiteError> {
        let ty = self
            .take_while(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
            .to_ascii_lowercase();
        if ty.is_empty() {
            return Ok(None);
        }
        self.skip_ws();
        let close = match self.peek() {
            Some(b'{') => b'}',
            Some(b'(') => b')',
            _ => return Ok(None),
        };
        if matches!(ty.as_str(), "comment" | "preamble" | "string") {
            self.skip_group(close)?;
            return Ok(None);
        }
        self.pos += 1;

        let key = self.take_while(|b| b != b',' && b != close).trim();
        if key.is_empty() {
            return Err(self.err("missing citation key"));
        }
        let mut entry = BibEntry::new(&ty, key);
        match self.peek() {
            Some(b',') => self.pos += 1,
            Some(_) => {
                self.pos += 1;
                return Ok(Some(entry));
            }
            None => return Err(self.err("unterminated entry")),
        }

        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(self.err("unterminated entry")),
                Some(b) if b == close => {
                    self.pos += 1;
                    return Ok(Some(entry));
                }
                Some(b',') => {
                    self.pos += 1;
                    continue;
                }
                Some(_) => {}
            }
            let name = self
                .take_while(|b| b != b'=' && b != b',' && b != close)
                .trim()
                .to_ascii_lowercase();
            if self.peek() != Some(b'=') || name.is_empty() {
                return Err(self.err("expected 'name = value'"));
            }
            self.pos += 1;
            let value = self.value(close)?;
            entry.set(&name, value);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b) if b == close => {}
                _ => return Err(self.err("expected ',' or end of entry")),
            }
        }
    }

    fn value(&mut self, close: u8) -> Result<String, SiteError> {
        let mut parts = Vec::new();
        loop {
            self.skip_ws();
            let part = match self.peek() {
                Some(b'{') => self.braced()?,
                Some(b'"') => self.quoted()?,
                Some(_) => {
                    let bare = self.take_while(|b| {
                        b != b',' && b != b'#' && b != close && !b.is_ascii_whitespace()
                    });
                    if bare.is_empty() {
                        return Err(self.err("empty field value"));
                    }
                    bare.to_string()
                }
                None => return Err(self.err("unterminated field value")),
            };
            parts.push(part);
            self.skip_ws();
            if self.peek() == Some(b'#') {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(collapse_ws(&parts.concat()))
    }

    // Returns the text between the outer braces, inner braces kept.
    fn braced(&mut self) -> Result<String, SiteError> {
        let start = self.pos + 1;
        self.skip_group(b'}')?;
        Ok(self.src[start..self.pos - 1].to_string())
    }

    fn quoted(&mut self) -> Result<String, SiteError> {
        self.pos += 1;
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            match b {
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                b'"' if depth == 0 => {
                    let s = self.src[start..self.pos].to_string();
                    self.pos += 1;
                    return Ok(s);
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.err("unterminated quoted value"))
    }

    // Positioned on the opening delimiter; leaves pos just past its match.
    fn skip_group(&mut self, close: u8) -> Result<(), SiteError> {
        let open = self.peek().ok_or_else(|| self.err("unexpected end of input"))?;
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(self.err("unbalanced braces"))
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(1\d{3}|20\d{2})").expect("valid year regex"));
static BIBTEX_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)year\s*=\s*[{"]?\s*(1\d{3}|20\d{2})"#).expect("valid bibtex year regex")
});
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid citekey regex"));

/// First plausible four-digit year in `value` (`"2024"`, `"{2024}"`, `"2024-05"`).
pub fn extract_year(value: &str) -> Option<i32> {
    YEAR_RE
        .captures(value)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn extract_year_from_bibtex(text: &str) -> Option<i32> {
    BIBTEX_YEAR_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn citekey_from_title(title: &str, put_code: i64) -> String {
    let key = NON_WORD_RE.replace_all(title, "_");
    let key = key.trim_matches('_');
    if key.is_empty() {
        format!("work_{}", put_code)
    } else {
        key.to_string()
    }
}

/// `https://doi.org/10.1/x` -> `10.1/x`; bare DOIs pass through.
pub fn normalize_doi(doi: &str) -> String {
    let lower = doi.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return doi.to_string();
    }
    match lower.find("doi.org/") {
        Some(i) => doi[i + "doi.org/".len()..].to_string(),
        None => doi
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(doi)
            .to_string(),
    }
}
