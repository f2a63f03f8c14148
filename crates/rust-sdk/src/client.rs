/// Client for the job server REST API
use crate::params::{PARAM_APP_NAME, PARAM_CLASS_PATH};
use jobserver_sdk_core::{
    classify_response, decode, mappers, normalize_base_url, ClientConfig, ClientError, ClientResult,
    ContextName, DecodedResponse, JarInfo, JobConfig, JobOutcome, JobSummary, ReqwestTransport,
    Transport, TransportRequest, TransportResponse, Url,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const JAR_CONTENT_TYPE: &str = "application/java-archive";
const PAYLOAD_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Main client for interacting with a job server
///
/// Every operation performs exactly one HTTP round trip and keeps no state
/// between calls, so a client can be cloned and shared freely across tasks.
#[derive(Clone)]
pub struct JobServerClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for JobServerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobServerClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl JobServerClient {
    /// Create a new client with default timeouts
    ///
    /// # Example
    /// ```no_run
    /// use jobserver_rust_sdk::JobServerClient;
    ///
    /// let client = JobServerClient::new("http://localhost:8090")
    ///     .expect("Failed to create client");
    /// ```
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Create a new client with custom configuration
    ///
    /// # Example
    /// ```no_run
    /// use jobserver_rust_sdk::{ClientConfig, JobServerClient};
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new("http://localhost:8090")
    ///     .with_timeout(Duration::from_secs(120));
    ///
    /// let client = JobServerClient::with_config(config).expect("Failed to create client");
    /// ```
    pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(&config.base_url, Arc::new(transport))
    }

    /// Create a client that sends its requests through `transport`
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> ClientResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self {
            base_url,
            transport,
        })
    }

    /// Normalized base URL, always ending in `/`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List uploaded jars
    pub async fn list_jars(&self) -> ClientResult<Vec<JarInfo>> {
        debug!("Listing jars");
        let url = self.endpoint(&["jars"])?;
        let response = self.execute(TransportRequest::get(url.clone())).await?;
        let decoded = self.expect_success(&url, &response)?;
        mappers::map_jars(&decoded.body)
    }

    /// Upload a jar under `app_name`
    ///
    /// # Example
    /// ```no_run
    /// # use jobserver_rust_sdk::JobServerClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = JobServerClient::new("http://localhost:8090")?;
    ///
    /// let jar = std::fs::read("target/wordcount.jar")?;
    /// client.upload_jar(jar, "wordcount").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn upload_jar(&self, jar: impl Into<Vec<u8>>, app_name: &str) -> ClientResult<bool> {
        require_non_empty("appName", app_name)?;
        let jar = jar.into();
        if jar.is_empty() {
            return Err(ClientError::invalid_argument("jar contents are empty"));
        }

        info!("Uploading jar {} ({} bytes)", app_name, jar.len());
        let url = self.endpoint(&["jars", app_name])?;
        let request = TransportRequest::post(url.clone()).with_body(jar, JAR_CONTENT_TYPE);
        let response = self.execute(request).await?;
        if !response.is_success() {
            return Err(self.server_error(&url, &response));
        }
        Ok(true)
    }

    /// List the names of live contexts, in server order
    pub async fn list_contexts(&self) -> ClientResult<Vec<ContextName>> {
        debug!("Listing contexts");
        let url = self.endpoint(&["contexts"])?;
        let response = self.execute(TransportRequest::get(url.clone())).await?;
        let decoded = self.expect_success(&url, &response)?;
        mappers::map_contexts(&decoded.body)
    }

    /// Create a context.
    ///
    /// Returns `false` when the server refuses, which usually means a context
    /// with this name already exists.
    pub async fn create_context(
        &self,
        name: &str,
        params: &HashMap<String, String>,
    ) -> ClientResult<bool> {
        require_non_empty("context name", name)?;

        info!("Creating context: {}", name);
        let url = self.endpoint_with_query(&["contexts", name], params)?;
        let response = self.execute(TransportRequest::post(url.clone())).await?;
        Ok(self.soft_status(&url, &response))
    }

    /// Delete a context. Returns `false` when the server refuses.
    pub async fn delete_context(&self, name: &str) -> ClientResult<bool> {
        require_non_empty("context name", name)?;

        info!("Deleting context: {}", name);
        let url = self.endpoint(&["contexts", name])?;
        let response = self.execute(TransportRequest::delete(url.clone())).await?;
        Ok(self.soft_status(&url, &response))
    }

    /// List jobs known to the server
    pub async fn list_jobs(&self) -> ClientResult<Vec<JobSummary>> {
        debug!("Listing jobs");
        let url = self.endpoint(&["jobs"])?;
        let response = self.execute(TransportRequest::get(url.clone())).await?;
        let decoded = self.expect_success(&url, &response)?;
        mappers::map_jobs(&decoded.body)
    }

    /// Start a job.
    ///
    /// `params` must name the application (`appName`) and entry class
    /// (`classPath`); `payload` is sent verbatim as the request body.
    ///
    /// # Example
    /// ```no_run
    /// # use jobserver_rust_sdk::{JobOutcome, JobParams, JobServerClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = JobServerClient::new("http://localhost:8090")?;
    ///
    /// let params = JobParams::new("wordcount", "spark.jobserver.WordCountExample").build();
    /// match client.start_job(Some("input.string = a b c a"), &params).await? {
    ///     JobOutcome::Accepted { job_id, .. } => println!("Started job: {}", job_id),
    ///     other => println!("Job answered: {:?}", other),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start_job(
        &self,
        payload: Option<&str>,
        params: &HashMap<String, String>,
    ) -> ClientResult<JobOutcome> {
        validate_job_params(params)?;

        info!(
            "Starting job {} from {}",
            params[PARAM_CLASS_PATH], params[PARAM_APP_NAME]
        );
        let url = self.endpoint_with_query(&["jobs"], params)?;
        let mut request = TransportRequest::post(url.clone());
        if let Some(payload) = payload {
            request = request.with_body(payload, PAYLOAD_CONTENT_TYPE);
        }

        let response = self.execute(request).await?;
        let decoded = self.expect_success(&url, &response)?;
        classify_response(&decoded, None)
    }

    /// Start a job with the contents of `path` as payload
    pub async fn start_job_from_file(
        &self,
        path: impl AsRef<Path>,
        params: &HashMap<String, String>,
    ) -> ClientResult<JobOutcome> {
        validate_job_params(params)?;

        let path = path.as_ref();
        let payload = tokio::fs::read_to_string(path).await.map_err(|e| {
            ClientError::invalid_argument(format!(
                "cannot read job payload {}: {}",
                path.display(),
                e
            ))
        })?;
        self.start_job(Some(&payload), params).await
    }

    /// Get the status or result of a job.
    ///
    /// A job the server does not know is reported as [`JobOutcome::NotFound`].
    pub async fn get_job_result(&self, job_id: &str) -> ClientResult<JobOutcome> {
        require_non_empty("jobId", job_id)?;

        debug!("Getting job result: {}", job_id);
        let url = self.endpoint(&["jobs", job_id])?;
        let response = self.execute(TransportRequest::get(url.clone())).await?;
        if response.status == 404 {
            debug!("Job {} not found", job_id);
            return Ok(JobOutcome::NotFound {
                job_id: job_id.to_string(),
            });
        }

        let decoded = self.expect_success(&url, &response)?;
        let outcome = match classify_response(&decoded, Some(job_id))? {
            JobOutcome::Completed {
                job_id: None,
                raw_result,
            } => JobOutcome::Completed {
                job_id: Some(job_id.to_string()),
                raw_result,
            },
            other => other,
        };
        Ok(outcome)
    }

    /// Get the configuration a job was started with
    pub async fn get_job_config(&self, job_id: &str) -> ClientResult<JobConfig> {
        require_non_empty("jobId", job_id)?;

        debug!("Getting job config: {}", job_id);
        let url = self.endpoint(&["jobs", job_id, "config"])?;
        let response = self.execute(TransportRequest::get(url.clone())).await?;
        let decoded = self.expect_success(&url, &response)?;
        mappers::map_job_config(&decoded.body)
    }

    /// Kill a running job
    pub async fn kill_job(&self, job_id: &str) -> ClientResult<bool> {
        require_non_empty("jobId", job_id)?;

        info!("Killing job: {}", job_id);
        let url = self.endpoint(&["jobs", job_id])?;
        let response = self.execute(TransportRequest::delete(url.clone())).await?;
        if !response.is_success() {
            return Err(self.server_error(&url, &response));
        }
        Ok(true)
    }

    #[cfg(test)]
    pub(crate) fn shares_transport_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.transport, &other.transport)
    }

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::invalid_argument(format!(
                    "base url {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // Keys are sorted so the same parameters always produce the same URL.
    fn endpoint_with_query(
        &self,
        segments: &[&str],
        params: &HashMap<String, String>,
    ) -> ClientResult<Url> {
        let mut url = self.endpoint(segments)?;
        if !params.is_empty() {
            let mut pairs: Vec<_> = params.iter().collect();
            pairs.sort();
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn execute(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
        let method = request.method.clone();
        let url = request.url.clone();
        let response = self.transport.send(request).await.map_err(|e| {
            error!("{} {} failed: {}", method, url, e);
            e
        })?;
        debug!("{} {} -> {}", method, url, response.status);
        Ok(response)
    }

    fn expect_success(&self, url: &Url, response: &TransportResponse) -> ClientResult<DecodedResponse> {
        if !response.is_success() {
            return Err(self.server_error(url, response));
        }
        decode(response)
    }

    fn server_error(&self, url: &Url, response: &TransportResponse) -> ClientError {
        let body = response.text();
        error!("Job server {} responded {} {}", url, response.status, body);
        ClientError::server_error(response.status, url.as_str(), body)
    }

    fn soft_status(&self, url: &Url, response: &TransportResponse) -> bool {
        if response.status == 200 {
            return true;
        }
        warn!(
            "Job server {} responded {} {}",
            url,
            response.status,
            response.text()
        );
        false
    }
}

fn require_non_empty(what: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::invalid_argument(format!("{what} is empty")));
    }
    Ok(())
}

fn validate_job_params(params: &HashMap<String, String>) -> ClientResult<()> {
    for key in [PARAM_APP_NAME, PARAM_CLASS_PATH] {
        match params.get(key) {
            Some(value) if !value.trim().is_empty() => {}
            _ => {
                return Err(ClientError::invalid_argument(format!(
                    "job parameters must contain {PARAM_APP_NAME} and {PARAM_CLASS_PATH} (missing {key})"
                )));
            }
        }
    }
    Ok(())
}
