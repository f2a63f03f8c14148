/// Value types returned by the job server client
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of an execution context on the job server
pub type ContextName = String;

/// Configuration of a job, passed through as returned by the server
pub type JobConfig = Map<String, Value>;

/// An uploaded application jar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JarInfo {
    /// Application name the jar was uploaded under
    pub name: String,

    /// Upload timestamp, verbatim from the server
    pub uploaded_at: String,
}

/// One entry of the job listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub job_id: String,

    /// Fully qualified entry class of the job
    pub class_path: String,

    pub context: String,

    pub start_time: String,

    /// Human-readable duration (e.g. "0.56 secs")
    #[serde(rename = "duration")]
    pub duration_display: String,

    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_class: Option<String>,

    /// Stack frames in server order; empty when no error was reported
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack_trace: Vec<String>,
}

impl JobSummary {
    pub fn has_error(&self) -> bool {
        self.error_message.is_some() || self.error_class.is_some() || !self.stack_trace.is_empty()
    }
}
