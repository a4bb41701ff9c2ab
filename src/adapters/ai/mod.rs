//! AI adapters - implementations of the AIProvider port.

mod anthropic_provider;
mod mock_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::MockProvider;
