//! Extraction adapters - implementation of the FallbackExtractor port.

mod llm_extractor;

pub use llm_extractor::LlmExtractor;
