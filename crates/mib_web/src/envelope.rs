//! JSON bodies returned by the service.

use chrono::{DateTime, Local};
use mib_core::{AnalysisOutcome, AnalysisResult, ModelInfo, MAX_UPLOAD_BYTES, SUPPORTED_FORMATS};
use mib_inference::API_KEY_SETUP_URL;
use serde::Serialize;

pub const SERVICE_NAME: &str = "Medical Image Analysis Bot";
pub const SERVICE_VERSION: &str = "2.0";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const ERROR_SUGGESTIONS: [&str; 5] = [
    "Verify your Google API key is valid and active",
    "Check if you've exceeded the daily free limit (100 requests)",
    "Ensure the image format is supported (JPG, PNG, GIF)",
    "Verify your internet connection is stable",
    "Try again in a few moments",
];

const FEATURES: [&str; 5] = [
    "Medical image analysis",
    "Diagnostic suggestions",
    "Severity assessment",
    "Professional recommendations",
    "Medical disclaimers",
];

const TEST_RESPONSE_PREVIEW_CHARS: usize = 50;

pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Completed,
    Error,
}

#[derive(Debug, Serialize)]
pub struct AnalysisBody {
    pub content: String,
    pub timestamp: String,
    pub image_filename: String,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub suggestions: Vec<String>,
    pub timestamp: String,
}

/// Reply to `POST /upload_and_query` for every outcome that reached the model.
#[derive(Debug, Serialize)]
pub struct AnalysisEnvelope {
    pub success: bool,
    pub model_info: ModelInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub status: EnvelopeStatus,
}

impl From<AnalysisResult> for AnalysisEnvelope {
    fn from(result: AnalysisResult) -> Self {
        let timestamp = format_timestamp(&result.timestamp);
        match result.outcome {
            AnalysisOutcome::Completed { content } => Self {
                success: true,
                model_info: result.model,
                analysis: Some(AnalysisBody {
                    content,
                    timestamp,
                    image_filename: result.image_filename,
                    query: result.query,
                }),
                error: None,
                status: EnvelopeStatus::Completed,
            },
            AnalysisOutcome::Failed { message } => Self {
                success: false,
                model_info: result.model,
                analysis: None,
                error: Some(ErrorBody {
                    message,
                    suggestions: ERROR_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
                    timestamp,
                }),
                status: EnvelopeStatus::Error,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Error,
}

/// Reply to `GET /health`. Field set depends on `status`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub service: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub api_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_test: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_url: Option<&'static str>,
    pub timestamp: String,
}

impl HealthReport {
    pub fn healthy(model: &ModelInfo, api_configured: bool, test_response: &str) -> Self {
        let preview = if test_response.is_empty() {
            "No response".to_string()
        } else {
            let head: String = test_response
                .chars()
                .take(TEST_RESPONSE_PREVIEW_CHARS)
                .collect();
            format!("{}...", head)
        };

        Self {
            status: HealthStatus::Healthy,
            service: SERVICE_NAME,
            model: Some(model.name.clone()),
            provider: Some(model.provider.clone()),
            api_configured,
            api_test: Some("success"),
            test_response: Some(preview),
            daily_limit: model.daily_limit.as_ref().map(|limit| {
                if model.cost.as_deref() == Some("FREE") {
                    format!("{} (FREE)", limit)
                } else {
                    limit.clone()
                }
            }),
            error: None,
            setup_url: None,
            timestamp: format_timestamp(&Local::now()),
        }
    }

    pub fn failed(api_configured: bool, error: String) -> Self {
        Self {
            status: HealthStatus::Error,
            service: SERVICE_NAME,
            model: None,
            provider: None,
            api_configured,
            api_test: None,
            test_response: None,
            daily_limit: None,
            error: Some(error),
            setup_url: Some(API_KEY_SETUP_URL),
            timestamp: format_timestamp(&Local::now()),
        }
    }
}

/// Reply to `GET /info`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub features: Vec<&'static str>,
    pub cost: String,
    pub supported_formats: Vec<&'static str>,
    pub max_file_size: String,
    pub response_time: &'static str,
    pub accuracy: String,
}

impl ServiceInfo {
    pub fn new(model: &ModelInfo) -> Self {
        let cost = match (&model.cost, &model.daily_limit) {
            (Some(cost), Some(limit)) => format!("{} ({} per day)", cost, limit),
            (Some(cost), None) => cost.clone(),
            _ => "Unspecified".to_string(),
        };

        Self {
            service: SERVICE_NAME,
            version: SERVICE_VERSION,
            provider: model.provider.clone(),
            model: short_model_name(&model.name).to_string(),
            features: FEATURES.to_vec(),
            cost,
            supported_formats: SUPPORTED_FORMATS.to_vec(),
            max_file_size: format!("{}MB", MAX_UPLOAD_BYTES / (1024 * 1024)),
            response_time: "5-15 seconds",
            accuracy: format!("High (powered by {})", platform_vendor(&model.provider)),
        }
    }
}

/// "Google Gemini 1.5 Flash" is listed as "Gemini 1.5 Flash".
fn short_model_name(name: &str) -> &str {
    name.strip_prefix("Google ").unwrap_or(name)
}

/// "Google AI Studio" is credited as "Google AI".
fn platform_vendor(provider: &str) -> &str {
    provider.strip_suffix(" Studio").unwrap_or(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mib_core::AnalysisRequest;
    use serde_json::Value;

    fn gemini_info() -> ModelInfo {
        ModelInfo::new("Google Gemini 1.5 Flash", "Google AI Studio")
            .with_cost("FREE")
            .with_daily_limit("100 requests")
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            image_bytes: Vec::new(),
            filename: "test.png".to_string(),
            query: "What is this?".to_string(),
        }
    }

    #[test]
    fn test_completed_envelope() {
        let result = AnalysisResult::completed(gemini_info(), &request(), "Looks benign.".into());
        let json = serde_json::to_value(AnalysisEnvelope::from(result)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["model_info"]["name"], "Google Gemini 1.5 Flash");
        assert_eq!(json["model_info"]["daily_limit"], "100 requests");
        assert_eq!(json["analysis"]["content"], "Looks benign.");
        assert_eq!(json["analysis"]["image_filename"], "test.png");
        assert_eq!(json["analysis"]["query"], "What is this?");
        assert!(json.get("error").is_none());

        let timestamp = json["analysis"]["timestamp"].as_str().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_failed_envelope() {
        let result = AnalysisResult::failed(gemini_info(), &request(), "quota exceeded".into());
        let json = serde_json::to_value(AnalysisEnvelope::from(result)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["message"], "quota exceeded");
        assert_eq!(json["error"]["suggestions"].as_array().unwrap().len(), 5);
        assert!(json["error"]["timestamp"].is_string());
        assert!(json.get("analysis").is_none());
    }

    #[test]
    fn test_health_reports() {
        let long = "x".repeat(80);
        let json = serde_json::to_value(HealthReport::healthy(&gemini_info(), true, &long)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["api_test"], "success");
        assert_eq!(json["test_response"], format!("{}...", "x".repeat(50)));
        assert_eq!(json["daily_limit"], "100 requests (FREE)");
        assert!(json.get("error").is_none());

        let json = serde_json::to_value(HealthReport::healthy(&gemini_info(), true, "")).unwrap();
        assert_eq!(json["test_response"], "No response");

        let json = serde_json::to_value(HealthReport::failed(true, "bad key".into())).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "bad key");
        assert_eq!(json["setup_url"], API_KEY_SETUP_URL);
        assert!(json.get("test_response").is_none());
    }

    #[test]
    fn test_service_info() {
        let json: Value = serde_json::to_value(ServiceInfo::new(&gemini_info())).unwrap();
        assert_eq!(json["service"], SERVICE_NAME);
        assert_eq!(json["version"], "2.0");
        assert_eq!(json["provider"], "Google AI Studio");
        assert_eq!(json["model"], "Gemini 1.5 Flash");
        assert_eq!(json["accuracy"], "High (powered by Google AI)");
        assert_eq!(json["cost"], "FREE (100 requests per day)");
        assert_eq!(json["max_file_size"], "10MB");
        assert_eq!(json["supported_formats"], serde_json::json!(["JPG", "JPEG", "PNG", "GIF"]));
        assert_eq!(json["features"].as_array().unwrap().len(), 5);
    }
}
