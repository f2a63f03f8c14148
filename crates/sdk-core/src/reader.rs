/// Response decoding
use crate::error::{ClientError, ClientResult};
use crate::transport::TransportResponse;
use serde_json::Value;

/// A transport response whose body has been decoded as JSON
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResponse {
    pub status: u16,
    pub body: Value,
    /// Body text the tree was parsed from, without surrounding whitespace
    pub text: String,
}

/// Decode the body of `response` into a JSON tree.
///
/// Leading and trailing whitespace is ignored. An empty body is a parse
/// error: every endpoint the client reads answers with a JSON document.
pub fn decode(response: &TransportResponse) -> ClientResult<DecodedResponse> {
    let text = std::str::from_utf8(&response.body)
        .map_err(|e| ClientError::parse(format!("response body is not UTF-8: {e}")))?
        .trim();

    if text.is_empty() {
        return Err(ClientError::parse(format!(
            "empty response body (status {})",
            response.status
        )));
    }

    let body = serde_json::from_str(text)?;
    Ok(DecodedResponse {
        status: response.status,
        body,
        text: text.to_owned(),
    })
}
