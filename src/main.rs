use genelab::{
    logger::{self, LoggerConfig},
    server, Config, LabClient,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    if config.huggingface.api_token.is_none() {
        log::warn!("⚠️  HF_API_TOKEN is not set, /api/generate-image will answer 500");
    }
    if config.gemini.api_key.is_none() {
        log::warn!("⚠️  GEMINI_API_KEY is not set, /api/chat will answer 500");
    }

    let lab = LabClient::new(&config);
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    server::run(lab, &config).await?;
    Ok(())
}
