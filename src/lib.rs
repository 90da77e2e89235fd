pub mod backend;
pub mod features;
pub mod labeler;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod stats;
pub mod vocab;

// Re-export main types for convenient access
pub use backend::{FeatureExtractorBackend, LabelerBackend, ToolSearch};
pub use labeler::LabeledChar;
pub use model::ModelBundle;
pub use pipeline::Segmenter;
pub use render::{render, OutputFormat};
pub use stats::RunStats;
pub use vocab::VocabFilter;
