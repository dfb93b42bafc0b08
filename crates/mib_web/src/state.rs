use mib_core::VisionModel;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct Settings {
    /// Upper bound on a single model call, analysis or health probe.
    pub analysis_timeout: Duration,
    /// Reported by `/health`.
    pub api_configured: bool,
    /// Served under `/static` when set.
    pub static_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            api_configured: false,
            static_dir: None,
        }
    }
}

pub struct AppState {
    pub model: Arc<dyn VisionModel>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self {
            model,
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}
