//! User-written templates such as `{name}{sep}{year}{symbol}`.
//!
//! Token placeholders (`{name}`, `{nickname}`, `{year}`, `{date}`,
//! `{phone}`, `{custom}`, `{text}`) each open a new slot; a pattern needs one
//! or two of them. Alphabet placeholders (`{symbol}`, `{digit}`, `{sep}`)
//! expand over the fixed tables in [`crate::template`]. `{{` and `}}` are
//! literal braces.

use crate::error::{Result, WordgenError};
use crate::template::{DIGITS, SEPARATORS, SYMBOLS};
use crate::token::{Token, TokenKind};
use std::str::FromStr;

pub const MAX_SLOTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(usize),
    Symbol,
    Digit,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
    slots: Vec<Vec<TokenKind>>,
}

impl Pattern {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn slots(&self) -> &[Vec<TokenKind>] {
        &self.slots
    }

    /// Lazy Cartesian product of every segment's values, leftmost varying
    /// slowest. Nothing is built until the caller pulls.
    pub fn expansion<'a>(&'a self, tokens: &[&'a Token]) -> Expansion<'a> {
        if tokens.len() != self.slots.len() {
            return Expansion::exhausted();
        }

        let choices: Vec<Vec<&'a str>> = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => vec![text.as_str()],
                Segment::Slot(slot) => tokens[*slot].variants().iter().map(String::as_str).collect(),
                Segment::Symbol => SYMBOLS.to_vec(),
                Segment::Digit => DIGITS.to_vec(),
                Segment::Separator => SEPARATORS.to_vec(),
            })
            .collect();
        let done = choices.iter().any(Vec::is_empty);

        Expansion {
            odometer: vec![0; choices.len()],
            choices,
            done,
        }
    }

    pub fn expand(&self, tokens: &[&Token], out: &mut Vec<String>) {
        out.extend(self.expansion(tokens));
    }

    fn malformed(source: &str, reason: impl Into<String>) -> WordgenError {
        WordgenError::MalformedPattern {
            pattern: source.to_string(),
            reason: reason.into(),
        }
    }
}

/// Odometer over the choices of each segment; the last segment turns fastest.
pub struct Expansion<'a> {
    choices: Vec<Vec<&'a str>>,
    odometer: Vec<usize>,
    done: bool,
}

impl Expansion<'_> {
    fn exhausted() -> Self {
        Expansion {
            choices: Vec::new(),
            odometer: Vec::new(),
            done: true,
        }
    }

    fn advance(&mut self) {
        for (position, choices) in self.odometer.iter_mut().zip(&self.choices).rev() {
            *position += 1;
            if *position < choices.len() {
                return;
            }
            *position = 0;
        }
        self.done = true;
    }
}

impl Iterator for Expansion<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while !self.done {
            let candidate: String = self
                .odometer
                .iter()
                .zip(&self.choices)
                .map(|(&i, choices)| choices[i])
                .collect();
            self.advance();
            if !candidate.is_empty() {
                return Some(candidate);
            }
        }
        None
    }
}

fn slot_kinds(placeholder: &str) -> Option<Vec<TokenKind>> {
    if placeholder == "text" {
        return Some(TokenKind::TEXT.to_vec());
    }
    placeholder.parse::<TokenKind>().ok().map(|kind| vec![kind])
}

impl FromStr for Pattern {
    type Err = WordgenError;

    fn from_str(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut slots: Vec<Vec<TokenKind>> = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(Pattern::malformed(source, "unbalanced '}'")),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => {
                                return Err(Pattern::malformed(source, "unclosed '{'"));
                            }
                            Some(ch) => name.push(ch),
                        }
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }

                    let segment = match name.trim() {
                        "symbol" => Segment::Symbol,
                        "digit" => Segment::Digit,
                        "sep" => Segment::Separator,
                        other => {
                            let kinds = slot_kinds(other).ok_or_else(|| {
                                Pattern::malformed(
                                    source,
                                    format!("unknown placeholder {{{other}}}"),
                                )
                            })?;
                            slots.push(kinds);
                            Segment::Slot(slots.len() - 1)
                        }
                    };
                    segments.push(segment);
                }
                c if c.is_whitespace() || c.is_control() => {
                    return Err(Pattern::malformed(
                        source,
                        "whitespace and control characters are not allowed",
                    ));
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if slots.is_empty() {
            return Err(Pattern::malformed(source, "needs at least one token placeholder"));
        }
        if slots.len() > MAX_SLOTS {
            return Err(Pattern::malformed(
                source,
                format!("at most {MAX_SLOTS} token placeholders are allowed, found {}", slots.len()),
            ));
        }

        Ok(Pattern {
            source: source.to_string(),
            segments,
            slots,
        })
    }
}
