//! Text cleaning: stop words and the review normalizer

pub mod normalizer;
pub mod stopwords;

pub use normalizer::Normalizer;
pub use stopwords::StopWords;
