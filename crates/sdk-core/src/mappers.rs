/// Mapping of listing responses into value types
use crate::classifier::{json_type, keys, ErrorDetail};
use crate::error::{ClientError, ClientResult};
use crate::outcome::status;
use crate::types::{ContextName, JarInfo, JobConfig, JobSummary};
use serde_json::{Map, Value};

/// Map a jar listing (`{"<name>": "<uploaded at>", ...}`).
///
/// Entries come back in the order the server wrote them, but callers should
/// not rely on that order.
pub fn map_jars(body: &Value) -> ClientResult<Vec<JarInfo>> {
    let object = expect_object(body, "jar listing")?;

    object
        .iter()
        .map(|(name, uploaded_at)| {
            let uploaded_at = uploaded_at.as_str().ok_or_else(|| {
                ClientError::parse(format!(
                    "upload time of jar '{name}' must be a string, got {}",
                    json_type(uploaded_at)
                ))
            })?;
            Ok(JarInfo {
                name: name.clone(),
                uploaded_at: uploaded_at.to_owned(),
            })
        })
        .collect()
}

/// Map a context listing (`["ctx-a", "ctx-b"]`), keeping server order.
pub fn map_contexts(body: &Value) -> ClientResult<Vec<ContextName>> {
    let array = body.as_array().ok_or_else(|| {
        ClientError::parse(format!(
            "expected an array in context listing, got {}",
            json_type(body)
        ))
    })?;

    array
        .iter()
        .enumerate()
        .map(|(index, name)| {
            name.as_str().map(str::to_owned).ok_or_else(|| {
                ClientError::parse(format!(
                    "context #{index} must be a string, got {}",
                    json_type(name)
                ))
            })
        })
        .collect()
}

/// Map a job listing.
///
/// One malformed element fails the whole listing.
pub fn map_jobs(body: &Value) -> ClientResult<Vec<JobSummary>> {
    let array = body.as_array().ok_or_else(|| {
        ClientError::parse(format!(
            "expected an array in job listing, got {}",
            json_type(body)
        ))
    })?;

    array
        .iter()
        .enumerate()
        .map(|(index, entry)| map_job(index, entry))
        .collect()
}

fn map_job(index: usize, entry: &Value) -> ClientResult<JobSummary> {
    let fields = entry.as_object().ok_or_else(|| {
        ClientError::parse(format!(
            "job #{index} must be an object, got {}",
            json_type(entry)
        ))
    })?;

    let required = |key: &str| -> ClientResult<String> {
        match fields.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Err(ClientError::parse(format!(
                "job #{index} is missing required key `{key}`"
            ))),
            Some(other) => Ok(other.to_string()),
        }
    };

    let duration_display = required(keys::DURATION)?;
    let class_path = required(keys::CLASS_PATH)?;
    let start_time = required(keys::START_TIME)?;
    let context = required(keys::CONTEXT)?;
    let job_status = required(keys::STATUS)?;
    let job_id = required(keys::JOB_ID)?;

    // Error details only belong to failed jobs; a finished job's result is payload.
    let detail = match fields.get(keys::RESULT) {
        Some(Value::Object(result)) if job_status == status::ERROR => ErrorDetail::extract(result),
        _ => ErrorDetail::default(),
    };

    Ok(JobSummary {
        duration_display,
        class_path,
        start_time,
        context,
        status: job_status,
        job_id,
        error_message: detail.message,
        error_class: detail.error_class,
        stack_trace: detail.stack,
    })
}

/// Pass a job configuration object through unchanged.
pub fn map_job_config(body: &Value) -> ClientResult<JobConfig> {
    expect_object(body, "job config").cloned()
}

fn expect_object<'a>(body: &'a Value, what: &str) -> ClientResult<&'a Map<String, Value>> {
    body.as_object().ok_or_else(|| {
        ClientError::parse(format!(
            "expected an object in {what}, got {}",
            json_type(body)
        ))
    })
}
