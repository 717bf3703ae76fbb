pub mod baseline;
pub mod summary;
pub mod synthesizer;
