//! Abbreviation definitions
//!
//! `*[label]: definition` lines are collected before tokenizing and removed
//! from the text comrak sees. Occurrences of each label in text are later
//! wrapped in `abbr` tokens by the inline rules.
//!
//! Definitions must start at column 0, so indented code never holds one.
//! Lines inside fenced code are left alone.

use crate::model::Abbreviations;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static DEFINITION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\*\[([^\]]+)\]:[ \t]*(.+)$").expect("abbreviation pattern is valid")
});

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").expect("fence pattern is valid"));

/// Byte ranges of fenced code blocks, fences included. An unclosed fence
/// runs to the end of the source.
fn fenced_code_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    // (start, fence char, fence length)
    let mut open: Option<(usize, char, usize)> = None;
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        let end = offset + line.len();
        let content = line.trim_end_matches(['\n', '\r']);
        match open {
            None => {
                let fence = OPENING_FENCE
                    .captures(content)
                    .and_then(|caps| Some((caps.get(0)?, caps.get(1)?)));
                if let Some((whole, fence)) = fence {
                    let ch = if fence.as_str().starts_with('`') { '`' } else { '~' };
                    // Backtick fences take no backticks in their info string.
                    if ch == '~' || !content[whole.end()..].contains('`') {
                        open = Some((offset, ch, fence.as_str().len()));
                    }
                }
            }
            Some((start, ch, len)) => {
                let trimmed = content.trim_start_matches(' ');
                let indent = content.len() - trimmed.len();
                let run = trimmed.chars().take_while(|&c| c == ch).count();
                if indent <= 3 && run >= len && trimmed[run..].trim().is_empty() {
                    ranges.push(start..end);
                    open = None;
                }
            }
        }
        offset = end;
    }
    if let Some((start, _, _)) = open {
        ranges.push(start..source.len());
    }
    ranges
}

/// Collects definitions and returns the source with their lines removed.
pub fn extract(source: &str) -> (String, Abbreviations) {
    let mut abbreviations = Abbreviations::new();
    let mut stripped = String::with_capacity(source.len());
    let mut last = 0;
    let code = fenced_code_ranges(source);

    for caps in DEFINITION_LINE.captures_iter(source) {
        let (Some(whole), Some(label), Some(definition)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if code.iter().any(|range| range.contains(&whole.start())) {
            continue;
        }
        let definition = definition.as_str().trim_end_matches('\r').trim_end();
        if definition.is_empty() {
            continue;
        }
        abbreviations.insert(label.as_str(), definition);

        stripped.push_str(&source[last..whole.start()]);
        last = whole.end();
        // Drop the line terminator along with the definition.
        if source[last..].starts_with("\r\n") {
            last += 2;
        } else if source[last..].starts_with('\n') {
            last += 1;
        }
    }
    stripped.push_str(&source[last..]);

    (stripped, abbreviations)
}

/// Finds whole-word occurrences of defined labels, longest label first.
#[derive(Debug)]
pub struct AbbreviationMatcher {
    pattern: Regex,
    abbreviations: Abbreviations,
}

/// One label occurrence as a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationMatch {
    pub start: usize,
    pub end: usize,
    pub title: String,
}

impl AbbreviationMatcher {
    pub fn new(abbreviations: &Abbreviations) -> Option<Self> {
        if abbreviations.is_empty() {
            return None;
        }
        let mut labels: Vec<&str> = abbreviations.iter().map(|(label, _)| label).collect();
        labels.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        let alternation: Vec<String> = labels.iter().map(|label| regex::escape(label)).collect();
        let pattern = match Regex::new(&format!("(?:{})", alternation.join("|"))) {
            Ok(pattern) => pattern,
            Err(err) => {
                log::warn!("Skipping abbreviations, pattern failed to compile: {err}");
                return None;
            }
        };
        Some(AbbreviationMatcher {
            pattern,
            abbreviations: abbreviations.clone(),
        })
    }

    pub fn find_all(&self, text: &str) -> Vec<AbbreviationMatch> {
        let mut found = Vec::new();
        let mut pos = 0;
        while pos <= text.len() {
            let Some(m) = self.pattern.find_at(text, pos) else {
                break;
            };
            let before = text[..m.start()].chars().last();
            let after = text[m.end()..].chars().next();
            let bounded = !before.is_some_and(char::is_alphanumeric)
                && !after.is_some_and(char::is_alphanumeric);
            if bounded && !m.as_str().is_empty() {
                let title = self.abbreviations.get(m.as_str()).unwrap_or_default();
                found.push(AbbreviationMatch {
                    start: m.start(),
                    end: m.end(),
                    title: title.to_string(),
                });
                pos = m.end();
            } else {
                pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            }
        }
        found
    }
}

/// Appends definition lines after the serialized document body.
pub fn append_definitions(body: &str, abbreviations: &Abbreviations) -> String {
    if abbreviations.is_empty() {
        return body.to_string();
    }
    let lines: Vec<String> = abbreviations
        .iter()
        .map(|(label, definition)| format!("*[{label}]: {definition}"))
        .collect();
    let body = body.trim_end();
    if body.is_empty() {
        format!("{}\n", lines.join("\n"))
    } else {
        format!("{body}\n\n{}\n", lines.join("\n"))
    }
}
