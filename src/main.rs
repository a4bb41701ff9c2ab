//! PeakPath server binary.
//!
//! Loads configuration, wires the adapters into the command handlers, and
//! serves the API.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use peakpath::adapters::ai::{AnthropicConfig, AnthropicProvider};
use peakpath::adapters::extraction::LlmExtractor;
use peakpath::adapters::http::{api_router, AppState};
use peakpath::adapters::pdf::PdfTextExtractor;
use peakpath::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
use peakpath::adapters::sqlite::{
    connect, init_schema, SqliteAssessmentRepository, SqliteChatRepository,
};
use peakpath::application::handlers::{
    AnalyzeProfileHandler, ParseAssessmentHandler, SendCoachingMessageHandler,
    StreamCoachingMessageHandler,
};
use peakpath::config::AppConfig;
use peakpath::ports::{AIProvider, AssessmentRepository, ChatRepository, RateLimiter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    config.validate()?;

    let pool = connect(&config.database).await?;
    init_schema(&pool).await?;

    let api_key = config
        .ai
        .anthropic_api_key
        .clone()
        .ok_or("ANTHROPIC_API_KEY is not configured")?;
    let provider: Arc<dyn AIProvider> = Arc::new(AnthropicProvider::new(
        AnthropicConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    ));

    let assessments: Arc<dyn AssessmentRepository> =
        Arc::new(SqliteAssessmentRepository::new(pool.clone()));
    let chats: Arc<dyn ChatRepository> = Arc::new(SqliteChatRepository::new(pool));
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        per_minute: config.ai.requests_per_minute,
        per_hour: config.ai.requests_per_hour,
    }));

    let state = AppState {
        parse_assessment: Arc::new(ParseAssessmentHandler::new(
            Arc::new(PdfTextExtractor::new()),
            Arc::new(LlmExtractor::new(provider.clone(), config.ai.timeout())),
            assessments.clone(),
        )),
        send_message: Arc::new(SendCoachingMessageHandler::new(
            provider.clone(),
            assessments.clone(),
            chats.clone(),
            limiter.clone(),
            config.ai.max_tokens,
            config.ai.temperature,
        )),
        stream_message: Arc::new(StreamCoachingMessageHandler::new(
            provider.clone(),
            assessments.clone(),
            chats.clone(),
            limiter.clone(),
            config.ai.max_tokens,
            config.ai.temperature,
        )),
        analyze_profile: Arc::new(AnalyzeProfileHandler::new(
            provider.clone(),
            assessments,
            limiter,
            config.ai.max_tokens,
        )),
        chats,
        provider_info: provider.provider_info(),
    };

    let addr = config.server.socket_addr()?;
    let router = api_router(state, &config);

    tracing::info!(
        %addr,
        environment = %config.server.environment,
        model = %config.ai.model,
        "starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
