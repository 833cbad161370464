use crate::combiner::Combiner;
use crate::error::Result;
use crate::pattern::Pattern;
use crate::profile::Profile;
use crate::stream::{CandidateSet, Dedup};
use crate::template::{self, Template};
use crate::token::{self, Token};
use tracing::{debug, info};

pub const DEFAULT_MAX_WORDS: usize = 200_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationConfig {
    pub max_count: Option<usize>,
    pub templates: Option<Vec<String>>,
    pub patterns: Vec<String>,
    pub reference_year: Option<i32>,
}

impl GenerationConfig {
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    pub fn with_templates<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.templates = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Resolves the enabled templates; unknown ids and bad patterns fail here.
    pub fn build_templates(&self) -> Result<Vec<Template>> {
        let mut templates = match &self.templates {
            Some(ids) => template::resolve(ids.as_slice())?,
            None => template::catalog(),
        };
        for source in &self.patterns {
            let pattern: Pattern = source.parse()?;
            templates.push(Template::from_pattern(pattern));
        }
        Ok(templates)
    }
}

/// Normalized tokens plus resolved templates for one run.
///
/// Every call to [`Generator::candidates`] replays the same sequence.
#[derive(Debug, Clone)]
pub struct Generator {
    tokens: Vec<Token>,
    templates: Vec<Template>,
    max_count: Option<usize>,
}

impl Generator {
    pub fn new(profile: &Profile, config: &GenerationConfig) -> Result<Self> {
        let templates = config.build_templates()?;
        let tokens = token::normalize(profile, config.reference_year);

        info!(
            tokens = tokens.len(),
            templates = templates.len(),
            max_count = ?config.max_count,
            "generator ready"
        );
        for t in &tokens {
            debug!(kind = %t.kind(), variants = ?t.variants(), "token");
        }

        Ok(Generator {
            tokens,
            templates,
            max_count: config.max_count,
        })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn max_count(&self) -> Option<usize> {
        self.max_count
    }

    pub fn candidates(&self) -> Dedup<Combiner<'_>> {
        Dedup::new(Combiner::new(&self.templates, &self.tokens), self.max_count)
    }

    pub fn collect(&self) -> CandidateSet {
        let mut set = CandidateSet::new();
        for candidate in self.candidates() {
            set.insert(candidate);
        }
        set
    }
}

pub fn generate_wordlist(profile: &Profile, config: &GenerationConfig) -> Result<CandidateSet> {
    Ok(Generator::new(profile, config)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WordgenError;
    use crate::profile::Field;
    use crate::template::{
        COMMON_PREFIXES, COMMON_SUFFIXES, DIGITS, KEYBOARD_WALKS, LEET_MAP, PAIR_SUFFIXES,
        SEPARATORS, SYMBOLS,
    };
    use std::collections::HashSet;

    fn john_profile() -> Profile {
        Profile::new()
            .with(Field::First, "John")
            .with(Field::Last, "Doe")
            .with(Field::Nickname, "jd")
            .with(Field::BirthDate, "14.05.1990")
            .with(Field::Phone, "+998 90 123 45 67")
            .with(Field::Friends, "Ali,Karim")
            .with(Field::Company, "Acme")
    }

    #[test]
    fn test_scenario_name_year() {
        let profile = Profile::new()
            .with(Field::First, "John")
            .with(Field::BirthYear, "1990");
        let config = GenerationConfig::default()
            .with_templates(["name+year", "case-variants"])
            .with_max_count(10);

        let words = generate_wordlist(&profile, &config).unwrap();
        assert!(words.contains("John1990"));
        assert!(words.contains("john1990"));
        assert!(words.len() <= 10);
        for word in &words {
            assert!(
                word.to_lowercase().starts_with("john"),
                "{} does not start with a case variant of John",
                word
            );
        }
    }

    #[test]
    fn test_scenario_blank_name() {
        let profile = Profile::new()
            .with(Field::First, "")
            .with(Field::BirthYear, "2001");
        let words = generate_wordlist(&profile, &GenerationConfig::default()).unwrap();

        assert_eq!(words.as_slice(), ["2001", "01"]);
    }

    #[test]
    fn test_empty_profile_is_empty_output() {
        let words = generate_wordlist(&Profile::new(), &GenerationConfig::default()).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_deterministic_runs() {
        let config = GenerationConfig::default()
            .with_pattern("{name}{sep}{year}")
            .with_reference_year(2024);
        let first = generate_wordlist(&john_profile(), &config).unwrap();
        let second = generate_wordlist(&john_profile(), &config).unwrap();
        assert!(first.len() > 100);
        assert_eq!(first.into_vec(), second.into_vec());
    }

    #[test]
    fn test_restartable_stream() {
        let generator = Generator::new(&john_profile(), &GenerationConfig::default()).unwrap();
        let first: Vec<String> = generator.candidates().collect();
        let second: Vec<String> = generator.candidates().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_duplicates() {
        let words: Vec<String> = Generator::new(&john_profile(), &GenerationConfig::default())
            .unwrap()
            .candidates()
            .collect();
        let unique: HashSet<&String> = words.iter().collect();
        assert_eq!(unique.len(), words.len(), "output contains duplicates");
    }

    #[test]
    fn test_bound_respected() {
        for bound in [0, 1, 7, 500] {
            let config = GenerationConfig::default().with_max_count(bound);
            let words = generate_wordlist(&john_profile(), &config).unwrap();
            assert!(words.len() <= bound);
        }

        let unbounded = generate_wordlist(&john_profile(), &GenerationConfig::default()).unwrap();
        let bounded = generate_wordlist(
            &john_profile(),
            &GenerationConfig::default().with_max_count(50),
        )
        .unwrap();
        assert_eq!(bounded.as_slice(), &unbounded.as_slice()[..50]);
    }

    #[test]
    fn test_token_soundness() {
        let generator = Generator::new(&john_profile(), &GenerationConfig::default()).unwrap();

        let mut alphabet: HashSet<char> = generator
            .tokens()
            .iter()
            .flat_map(|t| t.variants().iter().flat_map(|v| v.chars()))
            .collect();
        for table in [
            SYMBOLS,
            DIGITS,
            COMMON_SUFFIXES,
            COMMON_PREFIXES,
            KEYBOARD_WALKS,
            SEPARATORS,
            PAIR_SUFFIXES,
        ] {
            alphabet.extend(table.iter().flat_map(|s| s.chars()));
        }
        alphabet.extend(LEET_MAP.iter().flat_map(|(_, subs)| subs.iter().copied()));

        for word in generator.candidates() {
            assert!(!word.is_empty());
            assert!(
                word.chars().all(|c| alphabet.contains(&c)),
                "{} contains a character outside the token variants and fixed tables",
                word
            );
            assert!(!word.chars().any(|c| c.is_whitespace() || c.is_control()));
        }
    }

    #[test]
    fn test_unknown_template_fails_before_output() {
        let config = GenerationConfig::default().with_templates(["case-variants", "rot13"]);
        let err = Generator::new(&john_profile(), &config).unwrap_err();
        assert_eq!(err, WordgenError::UnknownTemplate("rot13".to_string()));
    }

    #[test]
    fn test_malformed_pattern_fails() {
        let config = GenerationConfig::default().with_pattern("{name}{pet_name}");
        let err = Generator::new(&john_profile(), &config).unwrap_err();
        assert!(matches!(err, WordgenError::MalformedPattern { .. }));
    }

    #[test]
    fn test_patterns_only() {
        let profile = Profile::new()
            .with(Field::First, "John")
            .with(Field::BirthYear, "1990");
        let config = GenerationConfig::default()
            .with_templates(Vec::<String>::new())
            .with_pattern("{name}@{year}");
        let words = generate_wordlist(&profile, &config).unwrap();
        assert_eq!(
            words.as_slice(),
            ["John@1990", "John@90", "john@1990", "john@90", "JOHN@1990", "JOHN@90"]
        );
    }

    #[test]
    fn test_wide_pattern_stops_at_bound() {
        let profile = Profile::new().with(Field::First, "John");
        let config = GenerationConfig::default()
            .with_templates(Vec::<String>::new())
            .with_pattern("{name}{digit}{digit}{digit}{digit}{digit}{digit}{digit}{digit}")
            .with_max_count(3);
        let words = generate_wordlist(&profile, &config).unwrap();
        assert_eq!(
            words.as_slice(),
            ["John00000000", "John00000001", "John00000002"]
        );
    }

    #[test]
    fn test_friend_combinations() {
        let config = GenerationConfig::default().with_templates(["pair-suffix"]);
        let words = generate_wordlist(&john_profile(), &config).unwrap();
        for expected in ["johnali", "johnali123", "doekarim!", "acmeali7"] {
            assert!(words.contains(expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_age_uses_reference_year() {
        let profile = Profile::new().with(Field::Age, "34");
        let config = GenerationConfig::default()
            .with_templates(["year-only"])
            .with_reference_year(2024);
        let words = generate_wordlist(&profile, &config).unwrap();
        assert_eq!(words.as_slice(), ["1990", "90", "1989", "89", "1991", "91"]);
    }
}
