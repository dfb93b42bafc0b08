use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One upload as received by the handler.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image_bytes: Vec<u8>,
    pub filename: String,
    pub query: String,
}

/// Static description of a model client, echoed back in every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<String>,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            cost: None,
            daily_limit: None,
        }
    }

    pub fn with_cost(mut self, cost: impl Into<String>) -> Self {
        self.cost = Some(cost.into());
        self
    }

    pub fn with_daily_limit(mut self, daily_limit: impl Into<String>) -> Self {
        self.daily_limit = Some(daily_limit.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Completed { content: String },
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub model: ModelInfo,
    pub outcome: AnalysisOutcome,
    pub timestamp: DateTime<Local>,
    pub image_filename: String,
    pub query: String,
}

impl AnalysisResult {
    pub fn completed(model: ModelInfo, request: &AnalysisRequest, content: String) -> Self {
        Self {
            model,
            outcome: AnalysisOutcome::Completed { content },
            timestamp: Local::now(),
            image_filename: request.filename.clone(),
            query: request.query.clone(),
        }
    }

    pub fn failed(model: ModelInfo, request: &AnalysisRequest, message: String) -> Self {
        Self {
            model,
            outcome: AnalysisOutcome::Failed { message },
            timestamp: Local::now(),
            image_filename: request.filename.clone(),
            query: request.query.clone(),
        }
    }
}
