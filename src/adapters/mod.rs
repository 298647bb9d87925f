// Adapters layer: manifest-backed extractor and build plan output.

pub mod manifest;
pub mod plan;
