use crate::error::{Result, WordgenError};
use crate::pattern::Pattern;
use crate::token::{Case, Token, TokenKind, capitalize};
use std::fmt;
use std::str::FromStr;

pub const SYMBOLS: &[&str] = &["!", "@", "#", "$", "_", "*", "."];
pub const DIGITS: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
pub const COMMON_SUFFIXES: &[&str] = &[
    "123", "1234", "12345", "2020", "2021", "2022", "2023", "2024", "007",
];
pub const COMMON_PREFIXES: &[&str] = &["!", "#", "@", "*"];
pub const KEYBOARD_WALKS: &[&str] = &["qwerty", "asdf", "zxcv", "123qwe", "qaz"];
pub const SEPARATORS: &[&str] = &["", ".", "_", "-"];
pub const PAIR_SUFFIXES: &[&str] = &["", "123", "!"];

pub const LEET_MAP: &[(char, &[char])] = &[
    ('a', &['4', '@']),
    ('b', &['8']),
    ('e', &['3']),
    ('g', &['9']),
    ('i', &['1', '!']),
    ('l', &['1', '|']),
    ('o', &['0']),
    ('s', &['5', '$']),
    ('t', &['7']),
    ('z', &['2']),
];

pub const MAX_LEET_PER_TOKEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateId {
    CaseVariants,
    Leet,
    SymbolSuffix,
    NumberSuffix,
    SymbolPrefix,
    KeyboardSuffix,
    NameYear,
    NameYearSymbol,
    YearName,
    NameDate,
    NamePhone,
    NamePair,
    PairSuffix,
    YearOnly,
    Mirror,
}

impl TemplateId {
    pub const ALL: [TemplateId; 15] = [
        TemplateId::CaseVariants,
        TemplateId::Leet,
        TemplateId::SymbolSuffix,
        TemplateId::NumberSuffix,
        TemplateId::SymbolPrefix,
        TemplateId::KeyboardSuffix,
        TemplateId::NameYear,
        TemplateId::NameYearSymbol,
        TemplateId::YearName,
        TemplateId::NameDate,
        TemplateId::NamePhone,
        TemplateId::NamePair,
        TemplateId::PairSuffix,
        TemplateId::YearOnly,
        TemplateId::Mirror,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::CaseVariants => "case-variants",
            TemplateId::Leet => "leet",
            TemplateId::SymbolSuffix => "symbol-suffix",
            TemplateId::NumberSuffix => "number-suffix",
            TemplateId::SymbolPrefix => "symbol-prefix",
            TemplateId::KeyboardSuffix => "keyboard-suffix",
            TemplateId::NameYear => "name-year",
            TemplateId::NameYearSymbol => "name-year-symbol",
            TemplateId::YearName => "year-name",
            TemplateId::NameDate => "name-date",
            TemplateId::NamePhone => "name-phone",
            TemplateId::NamePair => "name-pair",
            TemplateId::PairSuffix => "pair-suffix",
            TemplateId::YearOnly => "year-only",
            TemplateId::Mirror => "mirror",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateId::CaseVariants => "word as typed, lower, Capitalized, UPPER, UPper",
            TemplateId::Leet => "leetspeak substitutions (a→4, e→3, s→$, ...)",
            TemplateId::SymbolSuffix => "word followed by one symbol",
            TemplateId::NumberSuffix => "word followed by a digit or a common number",
            TemplateId::SymbolPrefix => "one symbol followed by the word",
            TemplateId::KeyboardSuffix => "word followed by a keyboard walk",
            TemplateId::NameYear => "word followed by a year",
            TemplateId::NameYearSymbol => "word, year, then one symbol",
            TemplateId::YearName => "year followed by a word",
            TemplateId::NameDate => "word followed by a date",
            TemplateId::NamePhone => "word followed by phone digits",
            TemplateId::NamePair => "two words joined by a separator",
            TemplateId::PairSuffix => "word and a name run together, then 123, ! or a digit",
            TemplateId::YearOnly => "years, dates and phone digits on their own",
            TemplateId::Mirror => "word doubled and reversed",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = WordgenError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['_', '+'], "-");
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| WordgenError::UnknownTemplate(s.to_string()))
    }
}

type UnaryFn = fn(&Token, &mut Vec<String>);
type BinaryFn = fn(&Token, &Token, &mut Vec<String>);

#[derive(Debug, Clone)]
pub enum Rule {
    Unary(UnaryFn),
    Binary(BinaryFn),
    Pattern(Pattern),
}

#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    slots: Vec<Vec<TokenKind>>,
    rule: Rule,
}

impl Template {
    pub fn builtin(id: TemplateId) -> Template {
        let text = TokenKind::TEXT.to_vec();
        let (slots, rule) = match id {
            TemplateId::CaseVariants => (vec![text], Rule::Unary(case_variants)),
            TemplateId::Leet => (vec![text], Rule::Unary(leet)),
            TemplateId::SymbolSuffix => (vec![text], Rule::Unary(symbol_suffix)),
            TemplateId::NumberSuffix => (vec![text], Rule::Unary(number_suffix)),
            TemplateId::SymbolPrefix => (vec![text], Rule::Unary(symbol_prefix)),
            TemplateId::KeyboardSuffix => (vec![text], Rule::Unary(keyboard_suffix)),
            TemplateId::NameYear => (vec![text, vec![TokenKind::Year]], Rule::Binary(concat)),
            TemplateId::NameYearSymbol => (
                vec![text, vec![TokenKind::Year]],
                Rule::Binary(concat_symbol),
            ),
            TemplateId::YearName => (vec![vec![TokenKind::Year], text], Rule::Binary(concat)),
            TemplateId::NameDate => (vec![text, vec![TokenKind::Date]], Rule::Binary(concat)),
            TemplateId::NamePhone => (
                vec![text, vec![TokenKind::PhoneFragment]],
                Rule::Binary(concat),
            ),
            TemplateId::NamePair => (vec![text.clone(), text], Rule::Binary(name_pair)),
            TemplateId::PairSuffix => (
                vec![text, vec![TokenKind::Name]],
                Rule::Binary(pair_suffix),
            ),
            TemplateId::YearOnly => (vec![TokenKind::NUMERIC.to_vec()], Rule::Unary(verbatim)),
            TemplateId::Mirror => (vec![text], Rule::Unary(mirror)),
        };

        Template {
            name: id.as_str().to_string(),
            slots,
            rule,
        }
    }

    pub fn from_pattern(pattern: Pattern) -> Template {
        Template {
            name: pattern.source().to_string(),
            slots: pattern.slots().to_vec(),
            rule: Rule::Pattern(pattern),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    pub fn accepts(&self, slot: usize, kind: TokenKind) -> bool {
        self.slots.get(slot).is_some_and(|kinds| kinds.contains(&kind))
    }

    fn fits(&self, tokens: &[&Token]) -> bool {
        tokens.len() == self.arity()
            && tokens
                .iter()
                .enumerate()
                .all(|(slot, token)| self.accepts(slot, token.kind()))
    }

    /// Tokens that the template does not accept produce nothing.
    pub fn apply(&self, tokens: &[&Token], out: &mut Vec<String>) {
        if !self.fits(tokens) {
            return;
        }

        match (&self.rule, tokens) {
            (Rule::Unary(f), [a]) => f(*a, out),
            (Rule::Binary(f), [a, b]) => f(*a, *b, out),
            (Rule::Pattern(pattern), _) => pattern.expand(tokens, out),
            _ => {}
        }
    }

    /// Candidates for one application, pulled lazily. Pattern templates
    /// expand on demand; built-ins produce a handful of strings up front.
    pub fn candidates<'a>(
        &'a self,
        tokens: &[&'a Token],
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        match &self.rule {
            Rule::Pattern(pattern) if self.fits(tokens) => Box::new(pattern.expansion(tokens)),
            _ => {
                let mut out = Vec::new();
                self.apply(tokens, &mut out);
                Box::new(out.into_iter())
            }
        }
    }
}

pub fn catalog() -> Vec<Template> {
    TemplateId::ALL.into_iter().map(Template::builtin).collect()
}

pub fn resolve<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Template>> {
    let mut wanted = ids
        .iter()
        .map(|id| id.as_ref().parse::<TemplateId>())
        .collect::<Result<Vec<_>>>()?;
    wanted.sort();
    wanted.dedup();
    Ok(wanted.into_iter().map(Template::builtin).collect())
}

fn verbatim(token: &Token, out: &mut Vec<String>) {
    out.extend(token.variants().iter().cloned());
}

fn case_variants(token: &Token, out: &mut Vec<String>) {
    verbatim(token, out);
    let raw = token.raw();
    if raw.chars().count() >= 3 {
        let split = raw.char_indices().nth(2).map_or(raw.len(), |(i, _)| i);
        let head_upper = format!("{}{}", raw[..split].to_uppercase(), raw[split..].to_lowercase());
        if !token.variants().contains(&head_upper) {
            out.push(head_upper);
        }
    }
}

fn leet(token: &Token, out: &mut Vec<String>) {
    out.extend(leet_variants(&token.cased(Case::Lower), MAX_LEET_PER_TOKEN));
}

fn leet_substitutes(c: char) -> Option<&'static [char]> {
    LEET_MAP
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, subs)| *subs)
}

/// Single-position substitutions (each followed by its capitalized form),
/// then two-position substitutions, then the first substitute applied
/// everywhere. The input itself is never returned.
pub fn leet_variants(word: &str, max_out: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let positions: Vec<(usize, &[char])> = chars
        .iter()
        .enumerate()
        .filter_map(|(i, c)| leet_substitutes(*c).map(|subs| (i, subs)))
        .collect();
    let mut variants: Vec<String> = Vec::new();

    for &(i, subs) in &positions {
        for &sub in subs {
            let mut changed = chars.clone();
            changed[i] = sub;
            let single: String = changed.into_iter().collect();
            let capitalized = capitalize(&single);
            push_variant(&mut variants, word, single);
            push_variant(&mut variants, word, capitalized);
            if variants.len() >= max_out {
                variants.truncate(max_out);
                return variants;
            }
        }
    }

    for (n, &(i, first)) in positions.iter().enumerate() {
        for &(j, second) in &positions[n + 1..] {
            for &a in first {
                for &b in second {
                    let mut changed = chars.clone();
                    changed[i] = a;
                    changed[j] = b;
                    push_variant(&mut variants, word, changed.into_iter().collect());
                    if variants.len() >= max_out {
                        return variants;
                    }
                }
            }
        }
    }

    let full: String = chars
        .iter()
        .map(|c| leet_substitutes(*c).map_or(*c, |subs| subs[0]))
        .collect();
    push_variant(&mut variants, word, full);

    variants.truncate(max_out);
    variants
}

fn push_variant(variants: &mut Vec<String>, word: &str, candidate: String) {
    if candidate != word && !variants.contains(&candidate) {
        variants.push(candidate);
    }
}

fn symbol_suffix(token: &Token, out: &mut Vec<String>) {
    for v in token.variants() {
        out.extend(SYMBOLS.iter().map(|s| format!("{v}{s}")));
    }
}

fn number_suffix(token: &Token, out: &mut Vec<String>) {
    for v in token.variants() {
        out.extend(
            DIGITS
                .iter()
                .chain(COMMON_SUFFIXES)
                .map(|n| format!("{v}{n}")),
        );
    }
}

fn symbol_prefix(token: &Token, out: &mut Vec<String>) {
    for v in token.variants() {
        out.extend(COMMON_PREFIXES.iter().map(|p| format!("{p}{v}")));
    }
}

fn keyboard_suffix(token: &Token, out: &mut Vec<String>) {
    for case in [Case::Lower, Case::Capitalized] {
        let word = token.cased(case);
        out.extend(KEYBOARD_WALKS.iter().map(|k| format!("{word}{k}")));
    }
}

fn concat(a: &Token, b: &Token, out: &mut Vec<String>) {
    for x in a.variants() {
        out.extend(b.variants().iter().map(|y| format!("{x}{y}")));
    }
}

fn concat_symbol(a: &Token, b: &Token, out: &mut Vec<String>) {
    for x in a.variants() {
        for y in b.variants() {
            out.extend(SYMBOLS.iter().map(|s| format!("{x}{y}{s}")));
        }
    }
}

fn name_pair(a: &Token, b: &Token, out: &mut Vec<String>) {
    for case in Case::ALL {
        let (x, y) = (a.cased(case), b.cased(case));
        out.extend(SEPARATORS.iter().map(|sep| format!("{x}{sep}{y}")));
    }
}

fn pair_suffix(a: &Token, b: &Token, out: &mut Vec<String>) {
    let combo = format!("{}{}", a.cased(Case::Lower), b.cased(Case::Lower));
    for suffix in PAIR_SUFFIXES.iter().chain(DIGITS) {
        out.push(format!("{combo}{suffix}"));
    }
}

fn mirror(token: &Token, out: &mut Vec<String>) {
    let lower = token.cased(Case::Lower);
    out.push(format!("{lower}{lower}"));
    let reversed: String = lower.chars().rev().collect();
    if reversed != lower {
        out.push(reversed);
    }
}
