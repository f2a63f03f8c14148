/// Job response classification
use crate::error::{ClientError, ClientResult};
use crate::outcome::{status, JobOutcome, RawJson};
use crate::reader::DecodedResponse;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};

/// Keys used in job server payloads
pub mod keys {
    pub const STATUS: &str = "status";
    pub const RESULT: &str = "result";
    pub const ERROR: &str = "ERROR";
    pub const MESSAGE: &str = "message";
    pub const ERROR_CLASS: &str = "errorClass";
    pub const STACK: &str = "stack";
    pub const JOB_ID: &str = "jobId";
    pub const CONTEXT: &str = "context";
    pub const CLASS_PATH: &str = "classPath";
    pub const START_TIME: &str = "startTime";
    pub const DURATION: &str = "duration";
}

/// Marker the server puts in `result` when a job id is unknown
pub const NO_SUCH_JOB_MARKER: &str = "No such job ID";

/// Error details carried by a failed job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: Option<String>,
    pub error_class: Option<String>,
    pub stack: Vec<String>,
}

impl ErrorDetail {
    /// Read `message`, `errorClass` and `stack` from an error object.
    /// Missing keys are left empty; stack order is preserved.
    pub fn extract(fields: &Map<String, Value>) -> Self {
        let stack = match fields.get(keys::STACK) {
            Some(Value::Array(frames)) => frames.iter().map(text_of).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![text_of(other)],
        };

        Self {
            message: optional_text(fields, keys::MESSAGE),
            error_class: optional_text(fields, keys::ERROR_CLASS),
            stack,
        }
    }
}

/// Classify a decoded job-start or job-status response.
///
/// The job server wraps job-start and job-status answers in envelopes that
/// differ between the synchronous, asynchronous and error paths. Decision
/// order for a response object `O`:
///
/// 1. no `status` key: [`JobOutcome::Completed`] with `O["result"]`
/// 2. `status` is `FINISHED` or `OK`: [`JobOutcome::Completed`]
/// 3. `status` is `STARTED` and `O["result"]` is an object holding both
///    `jobId` and `context`: [`JobOutcome::Accepted`]
/// 4. `status` is `ERROR` and `O["result"]` is a string mentioning
///    `No such job ID`: [`JobOutcome::NotFound`]
/// 5. `status` is `ERROR`: [`JobOutcome::Failed`] built from `O["ERROR"]`,
///    or `O["result"]` when there is no `ERROR` key
/// 6. anything else: [`JobOutcome::Unstructured`]
///
/// `requested_job_id` is the id the caller asked about, when there is one;
/// it names the job in a [`JobOutcome::NotFound`]. A completed result is the
/// compact text of the parsed value; use [`classify_response`] to keep the
/// server's own text.
pub fn classify(body: &Value, requested_job_id: Option<&str>) -> ClientResult<JobOutcome> {
    classify_with(body, requested_job_id, || match body.get(keys::RESULT) {
        Some(result) => RawJson::from_value(result),
        None => Ok(RawJson::null()),
    })
}

/// Classify a decoded response, keeping a completed job's `result` exactly
/// as it appears in the response text.
pub fn classify_response(
    response: &DecodedResponse,
    requested_job_id: Option<&str>,
) -> ClientResult<JobOutcome> {
    classify_with(&response.body, requested_job_id, || {
        verbatim_result(&response.text)
    })
}

fn classify_with(
    body: &Value,
    requested_job_id: Option<&str>,
    raw_result: impl FnOnce() -> ClientResult<RawJson>,
) -> ClientResult<JobOutcome> {
    let object = body.as_object().ok_or_else(|| {
        ClientError::parse(format!(
            "expected a JSON object in job response, got {}",
            json_type(body)
        ))
    })?;

    let Some(status_value) = object.get(keys::STATUS) else {
        return Ok(completed(object, raw_result()?));
    };

    let Some(token) = status_value.as_str() else {
        return Ok(unstructured(status_value.to_string(), object));
    };

    if status::is_completed(token) {
        return Ok(completed(object, raw_result()?));
    }

    match token {
        status::STARTED => {
            if let Some(outcome) = accepted(object) {
                return Ok(outcome);
            }
        }
        status::ERROR => return failed(object, requested_job_id),
        _ => {}
    }

    Ok(unstructured(token.to_string(), object))
}

fn completed(object: &Map<String, Value>, raw_result: RawJson) -> JobOutcome {
    JobOutcome::Completed {
        job_id: object
            .get(keys::JOB_ID)
            .and_then(Value::as_str)
            .map(str::to_owned),
        raw_result,
    }
}

#[derive(Deserialize)]
struct ResultSlice<'a> {
    #[serde(borrow, default)]
    result: Option<&'a RawValue>,
}

fn verbatim_result(text: &str) -> ClientResult<RawJson> {
    let slice: ResultSlice<'_> = serde_json::from_str(text)?;
    Ok(slice
        .result
        .map(|raw| RawJson::from(raw.to_owned()))
        .unwrap_or_else(RawJson::null))
}

// Only the full nested shape counts; partial shapes stay unstructured.
fn accepted(object: &Map<String, Value>) -> Option<JobOutcome> {
    let result = object.get(keys::RESULT)?.as_object()?;
    let job_id = result.get(keys::JOB_ID)?.as_str()?;
    let context = result.get(keys::CONTEXT)?.as_str()?;

    Some(JobOutcome::Accepted {
        job_id: job_id.to_owned(),
        context: context.to_owned(),
    })
}

fn failed(object: &Map<String, Value>, requested_job_id: Option<&str>) -> ClientResult<JobOutcome> {
    if let Some(text) = object.get(keys::RESULT).and_then(Value::as_str) {
        if let Some(pos) = text.find(NO_SUCH_JOB_MARKER) {
            let job_id = match requested_job_id {
                Some(id) => id.to_owned(),
                None => {
                    let rest = text[pos + NO_SUCH_JOB_MARKER.len()..]
                        .trim_start_matches([':', ' '])
                        .trim();
                    let id = if rest.is_empty() { text.trim() } else { rest };
                    id.to_owned()
                }
            };
            return Ok(JobOutcome::NotFound { job_id });
        }
    }

    let detail = object
        .get(keys::ERROR)
        .or_else(|| object.get(keys::RESULT))
        .ok_or_else(|| {
            ClientError::parse("ERROR response has neither an `ERROR` nor a `result` key")
        })?;

    match detail {
        Value::String(message) => Ok(JobOutcome::Failed {
            message: message.clone(),
            error_class: None,
            stack_trace: Vec::new(),
        }),
        Value::Object(fields) => {
            let detail = ErrorDetail::extract(fields);
            let message = detail
                .message
                .ok_or_else(|| ClientError::parse("error detail has no `message`"))?;
            Ok(JobOutcome::Failed {
                message,
                error_class: detail.error_class,
                stack_trace: detail.stack,
            })
        }
        other => Err(ClientError::parse(format!(
            "error detail must be an object or a string, got {}",
            json_type(other)
        ))),
    }
}

fn unstructured(status: String, object: &Map<String, Value>) -> JobOutcome {
    let fields = object
        .iter()
        .filter(|(key, _)| key.as_str() != keys::STATUS)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    JobOutcome::Unstructured { status, fields }
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(text_of(value)),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::decode;
    use crate::transport::TransportResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn classify_json(body: Value) -> JobOutcome {
        classify(&body, None).unwrap()
    }

    fn classify_text(text: &str) -> JobOutcome {
        let decoded = decode(&TransportResponse::new(200, text)).unwrap();
        classify_response(&decoded, None).unwrap()
    }

    fn raw(value: Value) -> RawJson {
        RawJson::from_value(&value).unwrap()
    }

    #[test]
    fn test_missing_status_is_completed() {
        let outcome = classify_json(json!({"result": [1, 2, 3]}));
        assert_eq!(
            outcome,
            JobOutcome::Completed {
                job_id: None,
                raw_result: raw(json!([1, 2, 3])),
            }
        );
    }

    #[test]
    fn test_missing_status_and_result_is_completed_with_null() {
        let outcome = classify_json(json!({"duration": "1 sec"}));
        assert_eq!(
            outcome,
            JobOutcome::Completed {
                job_id: None,
                raw_result: RawJson::null(),
            }
        );
    }

    #[test]
    fn test_finished_and_ok_are_completed() {
        for token in ["FINISHED", "OK"] {
            let outcome = classify_json(json!({
                "jobId": "j1",
                "status": token,
                "result": {"words": {"a": 2, "b": 1}}
            }));
            assert_eq!(
                outcome,
                JobOutcome::Completed {
                    job_id: Some("j1".to_string()),
                    raw_result: raw(json!({"words": {"a": 2, "b": 1}})),
                }
            );
        }
    }

    #[test]
    fn test_started_with_nested_ids_is_accepted() {
        let outcome = classify_json(json!({
            "status": "STARTED",
            "result": {"jobId": "j1", "context": "c1"}
        }));
        assert_eq!(
            outcome,
            JobOutcome::Accepted {
                job_id: "j1".to_string(),
                context: "c1".to_string(),
            }
        );
    }

    #[test]
    fn test_started_with_partial_shape_is_unstructured() {
        let missing_context = json!({"status": "STARTED", "result": {"jobId": "j1"}});
        let missing_job_id = json!({"status": "STARTED", "result": {"context": "c1"}});
        let flat = json!({"status": "STARTED", "jobId": "j1", "context": "c1"});

        for body in [missing_context, missing_job_id, flat] {
            let outcome = classify(&body, None).unwrap();
            assert!(
                matches!(&outcome, JobOutcome::Unstructured { status, .. } if status == "STARTED"),
                "unexpected outcome {outcome:?}"
            );
        }
    }

    #[test]
    fn test_no_such_job_is_not_found() {
        let body = json!({"status": "ERROR", "result": "No such job ID 5e1a"});

        assert_eq!(
            classify(&body, Some("5e1a")).unwrap(),
            JobOutcome::NotFound {
                job_id: "5e1a".to_string()
            }
        );
        assert_eq!(
            classify(&body, None).unwrap(),
            JobOutcome::NotFound {
                job_id: "5e1a".to_string()
            }
        );
    }

    #[test]
    fn test_error_detail_under_error_key() {
        let outcome = classify_json(json!({
            "status": "ERROR",
            "ERROR": {
                "message": "boom",
                "errorClass": "java.lang.Exception",
                "stack": ["a", "b"]
            }
        }));
        assert_eq!(
            outcome,
            JobOutcome::Failed {
                message: "boom".to_string(),
                error_class: Some("java.lang.Exception".to_string()),
                stack_trace: vec!["a".to_string(), "b".to_string()],
            }
        );
    }

    #[test]
    fn test_error_detail_under_result_key() {
        let outcome = classify_json(json!({
            "status": "ERROR",
            "result": {
                "message": "Job aborted",
                "errorClass": "org.apache.spark.SparkException",
                "stack": ["frame 3", "frame 1", "frame 2"]
            }
        }));
        assert_eq!(
            outcome,
            JobOutcome::Failed {
                message: "Job aborted".to_string(),
                error_class: Some("org.apache.spark.SparkException".to_string()),
                stack_trace: vec![
                    "frame 3".to_string(),
                    "frame 1".to_string(),
                    "frame 2".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_error_key_wins_over_result() {
        let outcome = classify_json(json!({
            "status": "ERROR",
            "result": {"message": "from result"},
            "ERROR": {"message": "from ERROR"}
        }));
        assert!(matches!(outcome, JobOutcome::Failed { message, .. } if message == "from ERROR"));
    }

    #[test]
    fn test_error_with_only_message() {
        let outcome = classify_json(json!({"status": "ERROR", "result": {"message": "boom"}}));
        assert_eq!(
            outcome,
            JobOutcome::Failed {
                message: "boom".to_string(),
                error_class: None,
                stack_trace: Vec::new(),
            }
        );
    }

    #[test]
    fn test_error_with_plain_string_result() {
        let outcome = classify_json(json!({"status": "ERROR", "result": "classPath not found"}));
        assert!(
            matches!(outcome, JobOutcome::Failed { message, .. } if message == "classPath not found")
        );
    }

    #[test]
    fn test_error_without_message_is_parse_error() {
        let body = json!({"status": "ERROR", "result": {"errorClass": "java.lang.Exception"}});
        assert!(classify(&body, None).unwrap_err().is_parse_error());

        let body = json!({"status": "ERROR"});
        assert!(classify(&body, None).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_unknown_status_is_unstructured() {
        let outcome = classify_json(json!({
            "status": "RUNNING",
            "jobId": "j1",
            "progress": {"stage": 3}
        }));

        let mut fields = Map::new();
        fields.insert("jobId".to_string(), json!("j1"));
        fields.insert("progress".to_string(), json!({"stage": 3}));
        assert_eq!(
            outcome,
            JobOutcome::Unstructured {
                status: "RUNNING".to_string(),
                fields,
            }
        );
    }

    #[test]
    fn test_non_string_status_is_unstructured() {
        let outcome = classify_json(json!({"status": 7, "result": "x"}));
        assert!(matches!(outcome, JobOutcome::Unstructured { status, .. } if status == "7"));
    }

    #[test]
    fn test_non_object_body_is_parse_error() {
        let error = classify(&json!(["FINISHED"]), None).unwrap_err();
        assert!(error.is_parse_error());
    }

    #[test]
    fn test_completed_result_reserializes_byte_identical() {
        let result = r#"{"zeta":[1,2.50,{"y":null,"x":"é"}],"alpha":1e3,"big":1E-7,"nested":{"b":true,"a":-0}}"#;
        let outcome = classify_text(&format!(r#"{{"status":"FINISHED","result":{result}}}"#));

        let raw = outcome.raw_result().unwrap();
        assert_eq!(serde_json::to_string(raw).unwrap(), result);
        assert_eq!(raw.to_value().unwrap(), serde_json::from_str::<Value>(result).unwrap());
    }

    #[test]
    fn test_completed_result_keeps_inner_whitespace() {
        let result = "{\"a\": [1, 2],\n  \"b\" : { }}";
        let outcome = classify_text(&format!("{{ \"jobId\": \"j1\", \"result\": {result} }}"));

        assert_eq!(outcome.job_id(), Some("j1"));
        assert_eq!(outcome.raw_result().unwrap().as_str(), result);
        assert_eq!(serde_json::to_string(outcome.raw_result().unwrap()).unwrap(), result);
    }

    #[test]
    fn test_completed_without_result_text_is_null() {
        let outcome = classify_text(r#"{"status": "OK"}"#);
        assert_eq!(outcome.raw_result().unwrap().as_str(), "null");
    }

    #[test]
    fn test_bare_no_such_job_keeps_message_as_id() {
        let body = json!({"status": "ERROR", "result": "No such job ID"});
        assert_eq!(
            classify(&body, None).unwrap(),
            JobOutcome::NotFound {
                job_id: "No such job ID".to_string()
            }
        );
    }

    #[test]
    fn test_error_detail_extract_defaults() {
        let fields = json!({"message": "m"});
        let detail = ErrorDetail::extract(fields.as_object().unwrap());
        assert_eq!(
            detail,
            ErrorDetail {
                message: Some("m".to_string()),
                error_class: None,
                stack: Vec::new(),
            }
        );
    }
}
