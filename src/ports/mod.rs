//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - LLM completions, streaming and non-streaming
//! - `PdfExtractor` - raw PDF bytes to plain text
//! - `FallbackExtractor` - AI-backed report extraction when regex finds nothing
//! - `RateLimiter` - fixed-window request limiting
//! - `AssessmentRepository` / `ChatRepository` - persistence

mod ai_provider;
mod assessment_repository;
mod chat_repository;
mod fallback_extractor;
mod pdf_extractor;
mod rate_limiter;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, StreamChunk, TokenUsage,
};
pub use assessment_repository::{AssessmentRecord, AssessmentRepository, RepositoryError};
pub use chat_repository::{ChatRepository, StorageStats};
pub use fallback_extractor::FallbackExtractor;
pub use pdf_extractor::{PdfError, PdfExtractor};
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};
