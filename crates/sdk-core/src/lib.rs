/// Job server SDK Core - building blocks for the job server client
///
/// This crate holds the value types, error taxonomy, transport port and the
/// response interpretation used by `jobserver-rust-sdk`. It performs no I/O
/// of its own apart from the reqwest transport.

pub mod classifier;
pub mod config;
pub mod error;
pub mod http;
pub mod mappers;
pub mod outcome;
pub mod reader;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use classifier::{classify, classify_response, ErrorDetail};
pub use config::{normalize_base_url, ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use http::ReqwestTransport;
pub use outcome::{status, JobOutcome, RawJson};
pub use reader::{decode, DecodedResponse};
pub use transport::{Method, Transport, TransportRequest, TransportResponse, Url};
pub use types::{ContextName, JarInfo, JobConfig, JobSummary};
