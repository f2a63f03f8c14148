/// Job server Rust SDK - async client for a job server REST API
///
/// The client uploads application jars, manages long-lived contexts, starts
/// jobs and reports their outcome. Job responses are classified into a
/// [`JobOutcome`] so callers can match on what the server meant instead of
/// inspecting raw JSON.
///
/// # Example
/// ```no_run
/// use jobserver_rust_sdk::{JobOutcome, JobParams, JobServerClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = JobServerClient::new("http://localhost:8090")?;
///
///     let params = JobParams::new("wordcount", "spark.jobserver.WordCountExample")
///         .sync(false)
///         .build();
///
///     if let JobOutcome::Accepted { job_id, .. } =
///         client.start_job(Some("input.string = a b c"), &params).await?
///     {
///         println!("Job started: {}", job_id);
///     }
///     Ok(())
/// }
/// ```

pub mod client;
pub mod params;
pub mod registry;

// Re-export core types
pub use jobserver_sdk_core::{
    status, ClientConfig, ClientError, ClientResult, ConfigError, ContextName, ErrorKind,
    JarInfo, JobConfig, JobOutcome, JobSummary, RawJson, Transport, TransportRequest,
    TransportResponse,
};

pub use client::JobServerClient;
pub use params::{ContextParams, JobParams};
pub use registry::ClientRegistry;
