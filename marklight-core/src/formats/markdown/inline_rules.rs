//! Inline extension rules
//!
//! comrak has no notion of highlight or subscript, and its strikethrough
//! extension would claim single tildes. These rules run over the flat
//! children of each `inline` token instead:
//!
//! - `~~text~~` becomes `s_open`/`s_close`
//! - `==text==` becomes `mark_open`/`mark_close`
//! - `~text~` becomes `sub_open`/`sub_close` when `text` has no whitespace and
//!   sits in a single text run
//! - known abbreviation labels become `abbr_open`/`abbr_close` pairs
//!
//! An opener must be followed by a non-whitespace character and a closer must
//! be preceded by one. Delimiters only pair inside the same enclosing markup.

use super::abbreviations::AbbreviationMatcher;
use super::token::{Nesting, Token};
use super::tokenizer::{restore_literal, ParseOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DelimKind {
    Strikethrough,
    Highlight,
    Subscript,
}

impl DelimKind {
    fn classify(ch: char, len: usize, options: &ParseOptions) -> Option<DelimKind> {
        match (ch, len) {
            ('~', 1) if options.subscript => Some(DelimKind::Subscript),
            ('~', 2) if options.strikethrough => Some(DelimKind::Strikethrough),
            ('=', 2) if options.highlight => Some(DelimKind::Highlight),
            _ => None,
        }
    }

    fn tokens(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            DelimKind::Strikethrough => ("s_open", "s_close", "s"),
            DelimKind::Highlight => ("mark_open", "mark_close", "mark"),
            DelimKind::Subscript => ("sub_open", "sub_close", "sub"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Literal,
    Open,
    Close,
}

#[derive(Debug)]
struct Delim {
    run: String,
    kind: DelimKind,
    can_open: bool,
    can_close: bool,
    container: usize,
    source: usize,
    role: Role,
}

#[derive(Debug)]
enum Piece {
    Token(Token),
    Text { text: String, source: usize },
    Delim(Delim),
}

/// What lies just outside a text token.
#[derive(Debug, Clone, Copy)]
enum Edge {
    Whitespace,
    Char(char),
    Markup,
}

impl Edge {
    fn is_solid(&self) -> bool {
        match self {
            Edge::Whitespace => false,
            Edge::Char(c) => !c.is_whitespace(),
            Edge::Markup => true,
        }
    }
}

/// Runs every enabled rule over the children of one `inline` token.
pub fn apply(
    children: Vec<Token>,
    options: &ParseOptions,
    abbreviations: Option<&AbbreviationMatcher>,
) -> Vec<Token> {
    let mut tokens = merge_text(children);
    if options.strikethrough || options.highlight || options.subscript {
        tokens = pair_delimiters(tokens, options);
    }
    for token in tokens.iter_mut().filter(|t| t.kind == "text") {
        token.content = restore_literal(&token.content);
    }
    let tokens = merge_text(tokens);
    match abbreviations {
        Some(matcher) => wrap_abbreviations(tokens, matcher),
        None => tokens,
    }
}

/// Joins consecutive `text` tokens.
pub fn merge_text(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind == "text" {
            if let Some(prev) = out.last_mut().filter(|t| t.kind == "text") {
                prev.content.push_str(&token.content);
                continue;
            }
        }
        out.push(token);
    }
    out
}

fn edge_of(token: Option<&Token>, from_end: bool) -> Edge {
    match token {
        None => Edge::Whitespace,
        Some(t) if t.kind == "text" => {
            let ch = if from_end {
                t.content.chars().last()
            } else {
                t.content.chars().next()
            };
            ch.map(Edge::Char).unwrap_or(Edge::Whitespace)
        }
        Some(t) if t.kind == "softbreak" || t.kind == "hardbreak" => Edge::Whitespace,
        Some(_) => Edge::Markup,
    }
}

fn pair_delimiters(tokens: Vec<Token>, options: &ParseOptions) -> Vec<Token> {
    let mut pieces = Vec::with_capacity(tokens.len());
    let mut containers: Vec<usize> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.kind != "text" {
            match token.nesting {
                Nesting::Open => containers.push(index),
                Nesting::Close => {
                    containers.pop();
                }
                Nesting::SelfClosing => {}
            }
            pieces.push(Piece::Token(token.clone()));
            continue;
        }

        let before = edge_of(index.checked_sub(1).and_then(|i| tokens.get(i)), true);
        let after = edge_of(tokens.get(index + 1), false);
        let container = containers.last().copied().unwrap_or(usize::MAX);
        split_text(
            &token.content,
            index,
            container,
            before,
            after,
            options,
            &mut pieces,
        );
    }

    resolve_pairs(&mut pieces);

    let tokens = pieces
        .into_iter()
        .map(|piece| match piece {
            Piece::Token(token) => token,
            Piece::Text { text, .. } => Token::text(text),
            Piece::Delim(delim) => {
                let (open, close, tag) = delim.kind.tokens();
                match delim.role {
                    Role::Literal => Token::text(delim.run),
                    Role::Open => Token::open(open, tag).with_markup(delim.run),
                    Role::Close => Token::close(close, tag).with_markup(delim.run),
                }
            }
        })
        .collect();
    merge_text(tokens)
}

fn split_text(
    content: &str,
    source: usize,
    container: usize,
    before: Edge,
    after: Edge,
    options: &ParseOptions,
    pieces: &mut Vec<Piece>,
) {
    let chars: Vec<char> = content.chars().collect();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch != '~' && ch != '=' {
            text.push(ch);
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i] == ch {
            i += 1;
        }
        let len = i - start;
        let run: String = chars[start..i].iter().collect();
        let Some(kind) = DelimKind::classify(ch, len, options) else {
            text.push_str(&run);
            continue;
        };

        let prev = if start > 0 {
            Edge::Char(chars[start - 1])
        } else {
            before
        };
        let next = chars.get(i).copied().map(Edge::Char).unwrap_or(after);
        let can_open = next.is_solid();
        let can_close = prev.is_solid();
        if !can_open && !can_close {
            text.push_str(&run);
            continue;
        }

        if !text.is_empty() {
            pieces.push(Piece::Text {
                text: std::mem::take(&mut text),
                source,
            });
        }
        pieces.push(Piece::Delim(Delim {
            run,
            kind,
            can_open,
            can_close,
            container,
            source,
            role: Role::Literal,
        }));
    }

    if !text.is_empty() {
        pieces.push(Piece::Text { text, source });
    }
}

fn resolve_pairs(pieces: &mut [Piece]) {
    let mut openers: Vec<usize> = Vec::new();

    for index in 0..pieces.len() {
        let (kind, can_open, can_close, container) = match &pieces[index] {
            Piece::Delim(d) => (d.kind, d.can_open, d.can_close, d.container),
            _ => continue,
        };

        if can_close {
            let found = openers.iter().rposition(|&opener| match &pieces[opener] {
                Piece::Delim(d) => d.kind == kind && d.container == container,
                _ => false,
            });
            if let Some(position) = found {
                let opener = openers[position];
                if kind != DelimKind::Subscript || subscript_content_ok(pieces, opener, index) {
                    set_role(&mut pieces[opener], Role::Open);
                    set_role(&mut pieces[index], Role::Close);
                    openers.truncate(position);
                    continue;
                }
            }
        }

        if can_open {
            openers.push(index);
        }
    }
}

/// Subscript content must be whitespace-free text from the opener's own run.
fn subscript_content_ok(pieces: &[Piece], opener: usize, closer: usize) -> bool {
    let source = match &pieces[opener] {
        Piece::Delim(d) => d.source,
        _ => return false,
    };
    let same_run = matches!(&pieces[closer], Piece::Delim(d) if d.source == source);
    let between = &pieces[opener + 1..closer];
    same_run
        && !between.is_empty()
        && between.iter().all(|piece| match piece {
            Piece::Text { text, source: s } => *s == source && !text.chars().any(char::is_whitespace),
            _ => false,
        })
}

fn set_role(piece: &mut Piece, role: Role) {
    if let Piece::Delim(d) = piece {
        d.role = role;
    }
}

fn wrap_abbreviations(tokens: Vec<Token>, matcher: &AbbreviationMatcher) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind != "text" {
            out.push(token);
            continue;
        }
        let mut last = 0;
        for found in matcher.find_all(&token.content) {
            if found.start > last {
                out.push(Token::text(&token.content[last..found.start]));
            }
            out.push(Token::open("abbr_open", "abbr").with_attr("title", found.title));
            out.push(Token::text(&token.content[found.start..found.end]));
            out.push(Token::close("abbr_close", "abbr"));
            last = found.end;
        }
        if last == 0 {
            out.push(token);
        } else if last < token.content.len() {
            out.push(Token::text(&token.content[last..]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Abbreviations;

    fn kinds(tokens: &[Token]) -> Vec<&'static str> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn run(text: &str) -> Vec<Token> {
        apply(vec![Token::text(text)], &ParseOptions::default(), None)
    }

    #[test]
    fn strikethrough_pairs_double_tildes() {
        let tokens = run("a ~~gone~~ b");
        assert_eq!(kinds(&tokens), vec!["text", "s_open", "text", "s_close", "text"]);
        assert_eq!(tokens[2].content, "gone");
    }

    #[test]
    fn highlight_pairs_double_equals() {
        let tokens = run("==hot==");
        assert_eq!(kinds(&tokens), vec!["mark_open", "text", "mark_close"]);
    }

    #[test]
    fn subscript_requires_whitespace_free_content() {
        let tokens = run("H~2~O");
        assert_eq!(kinds(&tokens), vec!["text", "sub_open", "text", "sub_close", "text"]);

        let tokens = run("a~b c~d");
        assert_eq!(kinds(&tokens), vec!["text"]);
        assert_eq!(tokens[0].content, "a~b c~d");
    }

    #[test]
    fn opener_followed_by_space_stays_literal() {
        let tokens = run("a ~~ b~~");
        assert_eq!(kinds(&tokens), vec!["text"]);
    }

    #[test]
    fn triple_runs_stay_literal() {
        let tokens = run("~~~x~~~ ===");
        assert_eq!(kinds(&tokens), vec!["text"]);
    }

    #[test]
    fn delimiters_do_not_pair_across_containers() {
        let children = vec![
            Token::text("~~a "),
            Token::open("em_open", "em"),
            Token::text("b~~"),
            Token::close("em_close", "em"),
        ];
        let tokens = apply(children, &ParseOptions::default(), None);
        assert_eq!(kinds(&tokens), vec!["text", "em_open", "text", "em_close"]);
    }

    #[test]
    fn delimiters_pair_around_markup() {
        let children = vec![
            Token::text("~~"),
            Token::open("em_open", "em"),
            Token::text("b"),
            Token::close("em_close", "em"),
            Token::text("~~"),
        ];
        let tokens = apply(children, &ParseOptions::default(), None);
        assert_eq!(
            kinds(&tokens),
            vec!["s_open", "em_open", "text", "em_close", "s_close"]
        );
    }

    #[test]
    fn escaped_placeholders_become_literal_after_pairing() {
        let tokens = run("\u{E000}\u{E000}x\u{E000}\u{E000}");
        assert_eq!(kinds(&tokens), vec!["text"]);
        assert_eq!(tokens[0].content, "==x==");
    }

    #[test]
    fn abbreviations_wrap_whole_words() {
        let mut abbr = Abbreviations::new();
        abbr.insert("HTML", "HyperText Markup Language");
        let matcher = AbbreviationMatcher::new(&abbr);
        let tokens = apply(
            vec![Token::text("HTML and XHTML")],
            &ParseOptions::default(),
            matcher.as_ref(),
        );
        assert_eq!(kinds(&tokens), vec!["abbr_open", "text", "abbr_close", "text"]);
        assert_eq!(tokens[0].attr("title"), Some("HyperText Markup Language"));
        assert_eq!(tokens[3].content, " and XHTML");
    }
}
