use std::sync::Arc;

use bp_core::Result;

use crate::{Config, GeneratorKind};

pub mod gemini;
pub mod template;

pub use bp_core::ContentGenerator;
pub use gemini::GeminiGenerator;
pub use template::TemplateGenerator;

/// Builds the generator named by `config.kind`; defaults to the template generator.
pub fn create_generator(config: Option<Config>) -> Result<Arc<dyn ContentGenerator>> {
    let config = config.unwrap_or_default();
    let generator: Arc<dyn ContentGenerator> = match config.kind {
        GeneratorKind::Mock => Arc::new(TemplateGenerator::new()),
        GeneratorKind::Gemini => Arc::new(GeminiGenerator::new(&config)?),
    };
    tracing::debug!("Content generator selected: {}", generator.name());
    Ok(generator)
}
