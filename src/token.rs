use crate::error::{Result, WordgenError};
use crate::profile::{Field, Profile};
use regex::Regex;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

static YEAR_RE: OnceLock<Regex> = OnceLock::new();
static WORD_SPLIT_RE: OnceLock<Regex> = OnceLock::new();

fn year_regex() -> &'static Regex {
    YEAR_RE.get_or_init(|| {
        Regex::new(r"(?:^|[^0-9])((?:19|20)[0-9]{2})(?:[^0-9]|$)").expect("year regex is valid")
    })
}

fn word_split_regex() -> &'static Regex {
    WORD_SPLIT_RE.get_or_init(|| Regex::new(r"[,\s/\\]+").expect("split regex is valid"))
}

pub const MAX_AGE: u32 = 120;
pub const YEAR_RANGE: RangeInclusive<u32> = 1900..=2099;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Name,
    Nickname,
    Year,
    Date,
    PhoneFragment,
    Custom,
}

impl TokenKind {
    pub const ALL: [TokenKind; 6] = [
        TokenKind::Name,
        TokenKind::Nickname,
        TokenKind::Year,
        TokenKind::Date,
        TokenKind::PhoneFragment,
        TokenKind::Custom,
    ];

    pub const TEXT: &'static [TokenKind] =
        &[TokenKind::Name, TokenKind::Nickname, TokenKind::Custom];

    pub const NUMERIC: &'static [TokenKind] =
        &[TokenKind::Year, TokenKind::Date, TokenKind::PhoneFragment];

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Name => "name",
            TokenKind::Nickname => "nickname",
            TokenKind::Year => "year",
            TokenKind::Date => "date",
            TokenKind::PhoneFragment => "phone",
            TokenKind::Custom => "custom",
        }
    }

    pub fn is_text(self) -> bool {
        Self::TEXT.contains(&self)
    }

    pub fn for_field(field: Field) -> TokenKind {
        match field {
            Field::First | Field::Last | Field::Middle | Field::Friends => TokenKind::Name,
            Field::Nickname | Field::Pet => TokenKind::Nickname,
            Field::BirthYear | Field::Age => TokenKind::Year,
            Field::BirthDate => TokenKind::Date,
            Field::Phone => TokenKind::PhoneFragment,
            Field::Address
            | Field::Company
            | Field::Hobby
            | Field::Email
            | Field::Domain
            | Field::Custom => TokenKind::Custom,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = WordgenError;

    fn from_str(s: &str) -> Result<Self> {
        TokenKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| WordgenError::UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Lower,
    Capitalized,
    Upper,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Lower, Case::Capitalized, Case::Upper];

    pub fn apply(self, s: &str) -> String {
        match self {
            Case::Lower => s.to_lowercase(),
            Case::Upper => s.to_uppercase(),
            Case::Capitalized => capitalize(s),
        }
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// A canonical atom derived from one OSINT value.
///
/// `variants` is never empty and always contains the lower-cased raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    raw: String,
    variants: Vec<String>,
}

impl Token {
    pub fn text(kind: TokenKind, raw: &str) -> Option<Token> {
        let raw = clean(raw);
        if raw.is_empty() {
            return None;
        }

        let mut variants = vec![raw.clone()];
        for case in Case::ALL {
            push_unique(&mut variants, case.apply(&raw));
        }

        Some(Token { kind, raw, variants })
    }

    /// The 4-digit and 2-digit forms of a year in [`YEAR_RANGE`].
    pub fn year(year: u32) -> Option<Token> {
        if !YEAR_RANGE.contains(&year) {
            return None;
        }
        let full = year.to_string();
        let short = full[2..].to_string();
        Some(Token {
            kind: TokenKind::Year,
            raw: full.clone(),
            variants: vec![full, short],
        })
    }

    fn numeric(kind: TokenKind, raw: String, extra: impl IntoIterator<Item = String>) -> Token {
        let mut variants = vec![raw.clone()];
        for v in extra {
            if !v.is_empty() {
                push_unique(&mut variants, v);
            }
        }
        Token { kind, raw, variants }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn cased(&self, case: Case) -> String {
        case.apply(&self.raw)
    }
}

fn push_unique(variants: &mut Vec<String>, v: String) {
    if !variants.contains(&v) {
        variants.push(v);
    }
}

fn clean(s: &str) -> String {
    s.trim()
        .nfc()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect()
}

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn detect_year(s: &str) -> Option<u32> {
    year_regex()
        .captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Expands a profile into tokens, in canonical field order.
///
/// `reference_year` turns an age into birth years; without it ages are
/// skipped. Blank or malformed values never fail, they yield nothing.
pub fn normalize(profile: &Profile, reference_year: Option<i32>) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (field, value) in profile.iter() {
        let before = tokens.len();
        normalize_field(field, value, reference_year, &mut tokens);
        if tokens.len() == before && !value.trim().is_empty() {
            debug!(field = %field, value, "value produced no token");
        }
    }

    let mut unique: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !unique.contains(&token) {
            unique.push(token);
        }
    }

    debug!(count = unique.len(), "normalized profile");
    unique
}

fn normalize_field(field: Field, value: &str, reference_year: Option<i32>, out: &mut Vec<Token>) {
    let kind = TokenKind::for_field(field);
    match field {
        Field::First
        | Field::Last
        | Field::Middle
        | Field::Nickname
        | Field::Pet
        | Field::Company
        | Field::Hobby => out.extend(Token::text(kind, value)),
        Field::Friends | Field::Custom => {
            out.extend(value.split(',').filter_map(|part| Token::text(kind, part)));
        }
        Field::Address => {
            out.extend(
                word_split_regex()
                    .split(value)
                    .filter_map(|part| Token::text(kind, part)),
            );
        }
        Field::Email => {
            let local = value.trim().split('@').next().unwrap_or_default();
            out.extend(Token::text(kind, local));
        }
        Field::Domain => {
            let domain = value.trim().to_lowercase();
            let domain = domain.strip_prefix("www.").unwrap_or(&domain);
            out.extend(Token::text(kind, domain));
            if let Some((label, _)) = domain.split_once('.') {
                out.extend(Token::text(kind, label));
            }
        }
        Field::BirthYear => {
            out.extend(detect_year(value).and_then(Token::year));
        }
        Field::Age => out.extend(years_from_age(value, reference_year)),
        Field::BirthDate => normalize_date(value, out),
        Field::Phone => {
            let digits = digits(value);
            if digits.is_empty() {
                return;
            }
            let (first3, last4) = if digits.len() > 4 {
                (digits[..3].to_string(), digits[digits.len() - 4..].to_string())
            } else {
                (String::new(), String::new())
            };
            out.push(Token::numeric(kind, digits, [last4, first3]));
        }
    }
}

fn years_from_age(value: &str, reference_year: Option<i32>) -> Vec<Token> {
    let Some(reference) = reference_year else {
        debug!(value, "no reference year, age skipped");
        return Vec::new();
    };
    let Ok(age) = value.trim().parse::<u32>() else {
        return Vec::new();
    };
    if age == 0 || age > MAX_AGE {
        return Vec::new();
    }

    let birth = reference - age as i32;
    [birth, birth - 1, birth + 1]
        .into_iter()
        .filter_map(|y| u32::try_from(y).ok())
        .filter_map(Token::year)
        .collect()
}

/// Year at either end of an 8-digit date typed without separators.
fn compact_year(compact: &str) -> Option<u32> {
    if compact.len() != 8 {
        return None;
    }
    [&compact[4..], &compact[..4]]
        .into_iter()
        .filter_map(|part| part.parse().ok())
        .find(|year| YEAR_RANGE.contains(year))
}

fn normalize_date(value: &str, out: &mut Vec<Token>) {
    let compact = digits(value);
    let year = detect_year(value).or_else(|| compact_year(&compact));
    out.extend(year.and_then(Token::year));

    if compact.len() < 4 {
        return;
    }

    let mut extra = Vec::new();
    if let Some(year) = year {
        let full = year.to_string();
        if compact == full {
            return;
        }
        let short = &full[2..];
        if let Some(head) = compact.strip_suffix(full.as_str()) {
            extra.push(format!("{head}{short}"));
            extra.push(head.to_string());
        } else if let Some(tail) = compact.strip_prefix(full.as_str()) {
            extra.push(format!("{short}{tail}"));
            extra.push(tail.to_string());
        }
    }

    out.push(Token::numeric(TokenKind::Date, compact, extra));
}
