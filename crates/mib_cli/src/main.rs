use clap::Parser;
use mib_core::Result;
use mib_inference::{create_model, Config, ModelKind, API_KEY_SETUP_URL};
use mib_web::{create_app, AppState, Settings};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Medical image analysis over a hosted vision model", long_about = None)]
pub struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8000)]
    port: u16,
    #[arg(long, default_value = "gemini", help = "Model to use for analysis. Available models: gemini (default), dummy")]
    model: ModelKind,
    /// Gemini model id, overrides GEMINI_MODEL
    #[arg(long)]
    model_name: Option<String>,
    /// Upper bound in seconds on a single model call
    #[arg(long, default_value_t = 120)]
    analysis_timeout: u64,
    /// Directory served under /static
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// A missing .env file is fine; the variables may come from the environment.
fn dotenv_problem(loaded: dotenvy::Result<PathBuf>) -> Option<dotenvy::Error> {
    match loaded {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

fn load_config(cli: &Cli, timeout: Duration) -> Result<Option<Config>> {
    if !cli.model.requires_api_key() {
        return Ok(None);
    }

    let mut config = Config::from_env()?.with_request_timeout(timeout);
    if let Some(model_name) = &cli.model_name {
        config = config.with_model_name(model_name.clone());
    }
    Ok(Some(config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    init_logging();
    if let Some(e) = dotenv_problem(dotenv) {
        warn!("⚠️  Ignoring unreadable .env file: {}", e);
    }
    let cli = Cli::parse();

    let timeout = Duration::from_secs(cli.analysis_timeout);
    let config = match load_config(&cli, timeout) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            error!("📋 Create a free key at {} and add it to .env as GOOGLE_API_KEY=your_key_here", API_KEY_SETUP_URL);
            return Err(e);
        }
    };
    let api_configured = config.is_some();

    let model = create_model(cli.model, config)?;
    let info = model.info();
    info!("🧠 Model initialized: {} ({})", info.name, info.provider);

    let settings = Settings {
        analysis_timeout: timeout,
        api_configured,
        static_dir: cli.static_dir.clone(),
    };
    let app = create_app(AppState::new(model).with_settings(settings));

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🏥 Medical Image Analysis Bot");
    info!("🌐 Web interface: http://{}", addr);
    info!("🔍 Health check: http://{}/health", addr);
    info!("ℹ️  Service info: http://{}/info", addr);
    info!("🚀 Starting server...");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_dotenv_is_silent() {
        let missing = dotenvy::Error::Io(io::Error::new(io::ErrorKind::NotFound, "no .env"));
        assert!(dotenv_problem(Err(missing)).is_none());
        assert!(dotenv_problem(Ok(PathBuf::from(".env"))).is_none());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let malformed = dotenvy::Error::LineParse("GOOGLE_API_KEY='unterminated".to_string(), 15);
        assert!(matches!(
            dotenv_problem(Err(malformed)),
            Some(dotenvy::Error::LineParse(..))
        ));

        let denied = dotenvy::Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(dotenv_problem(Err(denied)).is_some());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["mib"]);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.port, 8000);
        assert_eq!(cli.model, ModelKind::Gemini);
        assert_eq!(cli.analysis_timeout, 120);
    }
}
