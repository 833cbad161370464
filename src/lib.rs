pub mod combiner;
pub mod error;
pub mod generator;
pub mod output;
pub mod pattern;
pub mod profile;
pub mod stream;
pub mod template;
pub mod token;

pub use error::{Result, WordgenError};
pub use generator::{DEFAULT_MAX_WORDS, GenerationConfig, Generator, generate_wordlist};
pub use output::write_wordlist;
pub use profile::{Field, Profile};
pub use stream::{CandidateSet, dedup_bounded};
pub use template::{Template, TemplateId};
pub use token::{Token, TokenKind};
