use learngen::{
    logger, GatewayConfig, JsonFilePreferenceStore, LearningGateway, LearningMode,
    ProviderConfig,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init()?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let mut args = env::args().skip(1);
    let topic = args.next().unwrap_or_else(|| "Photosynthesis".to_string());
    let mode: LearningMode = args
        .next()
        .map(|m| m.parse::<LearningMode>())
        .transpose()?
        .unwrap_or(LearningMode::Explain);

    let provider_config = ProviderConfig::from_env();
    let gateway_config = match env::var("LEARNGEN_PREFS") {
        Ok(path) => {
            log::info!("🔄 Reading preferences from {}", path);
            let store = JsonFilePreferenceStore::open(&path)?;
            GatewayConfig::from_store(&store)?
        }
        Err(_) => GatewayConfig::from_env(),
    };
    logger::log_gateway_info(&gateway_config, &provider_config);

    let gateway = LearningGateway::from_config(&provider_config);

    log::info!("📚 Available providers:");
    for provider in gateway.providers() {
        log::info!(
            "  {} - {} ({})",
            provider.id,
            provider.display_name,
            provider.endpoint_base_url
        );
    }

    let models = gateway.list_models(&gateway_config).await?;
    log::info!("🤖 {} models for {}:", models.len(), gateway_config.provider_id);
    for model in models.iter().take(10) {
        log::info!(
            "  {}{}",
            model.id,
            if model.is_free { " (free)" } else { "" }
        );
    }

    match gateway
        .generate_learning_content(&gateway_config, &topic, mode)
        .await
    {
        Ok(content) => {
            println!("{}", content);
            Ok(())
        }
        Err(e) => {
            log::error!("❌ {}", e);
            Err(e.into())
        }
    }
}
