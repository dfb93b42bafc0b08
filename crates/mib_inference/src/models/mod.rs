use mib_core::{Error, Result, VisionModel};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Config;

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    Gemini,
    Dummy,
}

impl ModelKind {
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ModelKind::Gemini)
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ModelKind::Gemini),
            "dummy" => Ok(ModelKind::Dummy),
            other => Err(Error::Configuration(format!(
                "Unknown model: {}. Available models: gemini (default), dummy",
                other
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Gemini => write!(f, "gemini"),
            ModelKind::Dummy => write!(f, "dummy"),
        }
    }
}

pub fn create_model(kind: ModelKind, config: Option<Config>) -> Result<Arc<dyn VisionModel>> {
    match kind {
        ModelKind::Gemini => {
            let config = config.ok_or_else(|| {
                Error::Configuration("The gemini model needs an API key configuration".to_string())
            })?;
            Ok(Arc::new(GeminiModel::new(config)?))
        }
        ModelKind::Dummy => Ok(Arc::new(DummyModel::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("gemini".parse::<ModelKind>().unwrap(), ModelKind::Gemini);
        assert_eq!(" Dummy ".parse::<ModelKind>().unwrap(), ModelKind::Dummy);
        assert!("gpt".parse::<ModelKind>().is_err());
        assert_eq!(ModelKind::default().to_string(), "gemini");
    }

    #[test]
    fn test_create_model() {
        assert!(create_model(ModelKind::Gemini, None).is_err());

        let model = create_model(ModelKind::Gemini, Some(Config::new("key"))).unwrap();
        assert_eq!(model.info().provider, "Google AI Studio");

        let model = create_model(ModelKind::Dummy, None).unwrap();
        assert_eq!(model.info().provider, "Local");
    }
}
