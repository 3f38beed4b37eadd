use std::fmt;
use std::str::FromStr;

use bp_core::Error;

pub mod enrichment;
pub mod models;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    #[default]
    Mock,
    Gemini,
}

impl FromStr for GeneratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" | "template" => Ok(Self::Mock),
            "gemini" | "live" => Ok(Self::Gemini),
            other => Err(Error::Config(format!(
                "Unknown generator '{}'. Available: mock, gemini",
                other
            ))),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => f.write_str("mock"),
            Self::Gemini => f.write_str("gemini"),
        }
    }
}

#[derive(Clone, Default)]
pub struct Config {
    pub kind: GeneratorKind,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub mod prelude {
    pub use super::enrichment::{CycleOutcome, EnrichmentAgent};
    pub use super::models::create_generator;
    pub use super::{Config, GeneratorKind};
    pub use bp_core::{ContentGenerator, Error, Result, StoredArticle};
}

pub use enrichment::{CycleOutcome, CycleState, EnrichmentAgent};
pub use models::create_generator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_kind_parsing() {
        assert_eq!("mock".parse::<GeneratorKind>().unwrap(), GeneratorKind::Mock);
        assert_eq!("Gemini".parse::<GeneratorKind>().unwrap(), GeneratorKind::Gemini);
        assert!("gpt".parse::<GeneratorKind>().is_err());
        assert_eq!(GeneratorKind::default(), GeneratorKind::Mock);
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = Config {
            kind: GeneratorKind::Gemini,
            api_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
