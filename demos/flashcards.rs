use learngen::{GatewayConfig, LearningGateway, LearningMode, ProviderConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    learngen::logger::init()?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found");
    }

    let api_key = env::var("GROQ_API_KEY")?;
    let config = GatewayConfig::new()
        .with_provider("groq")
        .with_model("llama-3.1-8b-instant")
        .with_api_key(api_key);

    let gateway = LearningGateway::from_config(&ProviderConfig::from_env());
    let cards = gateway
        .generate_learning_content(&config, "Photosynthesis", LearningMode::Flashcards)
        .await?;
    println!("{}", cards);

    Ok(())
}
