pub mod error;
pub mod models;
pub mod prompt;
pub mod types;
pub mod upload;

pub use error::{Error, Result};
pub use models::VisionModel;
pub use prompt::{build_analysis_prompt, UrgencyLevel, MEDICAL_DISCLAIMER};
pub use types::{AnalysisOutcome, AnalysisRequest, AnalysisResult, ModelInfo};
pub use upload::{InlineImage, ValidatedImage, MAX_UPLOAD_BYTES, SUPPORTED_FORMATS};
