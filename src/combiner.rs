use crate::template::Template;
use crate::token::Token;
use tracing::trace;

/// Lazy candidate sequence: templates in order, then tokens (or token
/// pairs) in order. Duplicates are not removed here.
pub struct Combiner<'a> {
    templates: &'a [Template],
    tokens: &'a [Token],
    template_index: usize,
    eligible: Vec<Vec<usize>>,
    cursor: usize,
    current: Option<Box<dyn Iterator<Item = String> + 'a>>,
}

impl<'a> Combiner<'a> {
    pub fn new(templates: &'a [Template], tokens: &'a [Token]) -> Self {
        let mut combiner = Combiner {
            templates,
            tokens,
            template_index: 0,
            eligible: Vec::new(),
            cursor: 0,
            current: None,
        };
        combiner.load_template();
        combiner
    }

    fn load_template(&mut self) {
        self.cursor = 0;
        self.eligible = match self.templates.get(self.template_index) {
            Some(template) => (0..template.arity())
                .map(|slot| {
                    self.tokens
                        .iter()
                        .enumerate()
                        .filter(|(_, token)| template.accepts(slot, token.kind()))
                        .map(|(i, _)| i)
                        .collect()
                })
                .collect(),
            None => Vec::new(),
        };
    }

    fn combinations(&self) -> usize {
        if self.eligible.is_empty() {
            return 0;
        }
        self.eligible.iter().map(Vec::len).product()
    }

    /// First slot varies slowest.
    fn selection(&self, mut cursor: usize) -> Vec<usize> {
        let mut picked = vec![0; self.eligible.len()];
        for (slot, indices) in self.eligible.iter().enumerate().rev() {
            picked[slot] = indices[cursor % indices.len()];
            cursor /= indices.len();
        }
        picked
    }

    fn advance(&mut self) -> bool {
        let templates = self.templates;
        let tokens = self.tokens;
        while let Some(template) = templates.get(self.template_index) {
            if self.cursor >= self.combinations() {
                trace!(template = template.name(), "template exhausted");
                self.template_index += 1;
                self.load_template();
                continue;
            }

            let picked = self.selection(self.cursor);
            self.cursor += 1;

            if picked.windows(2).any(|w| w[0] == w[1]) {
                continue;
            }

            let selected: Vec<&'a Token> = picked.iter().map(|&i| &tokens[i]).collect();
            self.current = Some(template.candidates(&selected));
            return true;
        }
        false
    }
}

impl Iterator for Combiner<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let pulled = self.current.as_mut().and_then(|candidates| candidates.next());
            if let Some(candidate) = pulled {
                return Some(candidate);
            }
            self.current = None;
            if !self.advance() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{TemplateId, resolve};
    use crate::token::TokenKind;

    fn name(raw: &str) -> Token {
        Token::text(TokenKind::Name, raw).unwrap()
    }

    #[test]
    fn test_empty_inputs() {
        let templates = resolve(&["case-variants"]).unwrap();
        assert_eq!(Combiner::new(&templates, &[]).count(), 0);
        assert_eq!(Combiner::new(&[], &[name("ali")]).count(), 0);
    }

    #[test]
    fn test_template_then_token_order() {
        let templates = resolve(&["case-variants", "mirror"]).unwrap();
        let tokens = [name("ali"), name("bob")];
        let out: Vec<String> = Combiner::new(&templates, &tokens).collect();
        assert_eq!(
            out,
            [
                "ali", "Ali", "ALI", "ALi", "bob", "Bob", "BOB", "BOb", "aliali", "ila", "bobbob"
            ]
        );
    }

    #[test]
    fn test_pairs_in_token_order() {
        let templates = vec![Template::builtin(TemplateId::NameYear)];
        let tokens = [
            name("ali"),
            Token::year(1990).unwrap(),
            name("bob"),
            Token::year(2001).unwrap(),
        ];
        let out: Vec<String> = Combiner::new(&templates, &tokens)
            .filter(|c| c.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit()))
            .collect();
        assert_eq!(
            out,
            ["ali1990", "ali90", "ali2001", "ali01", "bob1990", "bob90", "bob2001", "bob01"]
        );
    }

    #[test]
    fn test_name_pair_skips_self() {
        let templates = vec![Template::builtin(TemplateId::NamePair)];
        let tokens = [name("ali"), name("bob")];
        let out: Vec<String> = Combiner::new(&templates, &tokens).collect();
        assert!(out.contains(&"alibob".to_string()));
        assert!(out.contains(&"bobali".to_string()));
        assert!(!out.contains(&"aliali".to_string()));
        assert!(!out.contains(&"bobbob".to_string()));
    }

    #[test]
    fn test_incompatible_tokens_skipped() {
        let templates = resolve(&["name-year", "case-variants"]).unwrap();
        let tokens = [Token::year(2001).unwrap()];
        assert_eq!(Combiner::new(&templates, &tokens).count(), 0);
    }

    #[test]
    fn test_deterministic() {
        let templates = crate::template::catalog();
        let tokens = [name("John"), Token::year(1990).unwrap(), name("Doe")];
        let first: Vec<String> = Combiner::new(&templates, &tokens).collect();
        let second: Vec<String> = Combiner::new(&templates, &tokens).collect();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_pattern_pulled_on_demand() {
        let pattern = "{name}{digit}{digit}{digit}{digit}{digit}{digit}{digit}{digit}{digit}"
            .parse()
            .unwrap();
        let templates = vec![Template::from_pattern(pattern)];
        let tokens = [name("ali"), name("bob")];
        let out: Vec<String> = Combiner::new(&templates, &tokens).take(3).collect();
        assert_eq!(out, ["ali000000000", "ali000000001", "ali000000002"]);
    }

    #[test]
    fn test_pattern_skips_self_pair() {
        let templates = vec![Template::from_pattern("{name}+{name}".parse().unwrap())];
        let tokens = [name("ali"), name("bob")];
        let out: Vec<String> = Combiner::new(&templates, &tokens).collect();
        assert!(out.contains(&"ali+bob".to_string()));
        assert!(!out.iter().any(|c| c == "ali+ali" || c == "bob+bob"));
    }
}
