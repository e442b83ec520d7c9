pub mod analyzer;
pub mod comparison;
pub mod models;
pub mod narrative;
pub mod sentiment;
pub mod speech;
pub mod summary;
pub mod topics;
pub mod translate;

pub use analyzer::ArticleAnalyzer;
pub use comparison::ComparativeAnalyzer;
pub use models::create_generator;
pub use narrative::NarrativeGenerator;
pub use sentiment::VaderScorer;
pub use speech::create_synthesizer;
pub use translate::create_translator;

pub mod prelude {
    pub use super::{ArticleAnalyzer, ComparativeAnalyzer, NarrativeGenerator, VaderScorer};
    pub use super::{create_generator, create_synthesizer, create_translator};
    pub use nd_core::{Article, ComparativeReport, Error, Result};
}
