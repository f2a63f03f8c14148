/// Job outcomes
use crate::error::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::fmt;

/// Status tokens the job server puts in the top-level `status` key
pub mod status {
    pub const FINISHED: &str = "FINISHED";
    pub const OK: &str = "OK";
    pub const STARTED: &str = "STARTED";
    pub const RUNNING: &str = "RUNNING";
    pub const ERROR: &str = "ERROR";

    /// Statuses meaning the job ran to completion
    pub const COMPLETED: [&str; 2] = [FINISHED, OK];

    /// Statuses meaning the job is still in flight
    pub const ASYNC: [&str; 2] = [STARTED, RUNNING];

    pub fn is_completed(token: &str) -> bool {
        COMPLETED.contains(&token)
    }

    pub fn is_async(token: &str) -> bool {
        ASYNC.contains(&token)
    }
}

/// JSON text kept exactly as the server wrote it
///
/// Two values are equal when their text is equal, so `[1,2]` and `[1, 2]`
/// differ.
#[derive(Debug, Clone)]
pub struct RawJson(Box<RawValue>);

impl RawJson {
    /// Wrap `text`, which must be a single JSON value
    pub fn from_text(text: impl Into<String>) -> ClientResult<Self> {
        Ok(Self(RawValue::from_string(text.into())?))
    }

    /// Compact text of an already parsed value
    pub fn from_value(value: &Value) -> ClientResult<Self> {
        Ok(Self(serde_json::value::to_raw_value(value)?))
    }

    pub fn null() -> Self {
        Self(RawValue::NULL.to_owned())
    }

    pub fn as_str(&self) -> &str {
        self.0.get()
    }

    pub fn to_value(&self) -> ClientResult<Value> {
        self.parse()
    }

    /// Deserialize the text into a caller type
    pub fn parse<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_str(self.as_str()).map_err(|e| {
            ClientError::parse(format!("cannot interpret job result: {e}"))
        })
    }
}

impl From<Box<RawValue>> for RawJson {
    fn from(raw: Box<RawValue>) -> Self {
        Self(raw)
    }
}

impl PartialEq for RawJson {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for RawJson {}

impl fmt::Display for RawJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RawJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Result of starting or querying a job
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The job finished; `raw_result` is the server's `result` text untouched
    Completed {
        job_id: Option<String>,
        raw_result: RawJson,
    },

    /// The job was started asynchronously
    Accepted { job_id: String, context: String },

    /// The job terminated with an error
    Failed {
        message: String,
        error_class: Option<String>,
        stack_trace: Vec<String>,
    },

    /// The server has no job with this id
    NotFound { job_id: String },

    /// A shape none of the other cases describe.
    ///
    /// `fields` holds every top-level key except `status`, verbatim.
    Unstructured {
        status: String,
        fields: Map<String, Value>,
    },
}

impl JobOutcome {
    pub fn job_id(&self) -> Option<&str> {
        match self {
            Self::Completed { job_id, .. } => job_id.as_deref(),
            Self::Accepted { job_id, .. } | Self::NotFound { job_id } => Some(job_id.as_str()),
            Self::Failed { .. } | Self::Unstructured { .. } => None,
        }
    }

    /// Whether polling this job again can change the answer
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Completed { .. } | Self::Failed { .. } | Self::NotFound { .. } => true,
            Self::Accepted { .. } => false,
            Self::Unstructured { status: token, .. } => !status::is_async(token),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The raw `result` of a completed job
    pub fn raw_result(&self) -> Option<&RawJson> {
        match self {
            Self::Completed { raw_result, .. } => Some(raw_result),
            _ => None,
        }
    }
}
