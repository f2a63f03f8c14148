/// Builders for job and context request parameters
use std::collections::HashMap;

/// Name of the uploaded application jar (required to start a job)
pub const PARAM_APP_NAME: &str = "appName";
/// Entry class of the job (required to start a job)
pub const PARAM_CLASS_PATH: &str = "classPath";
/// Context to run the job in
pub const PARAM_CONTEXT: &str = "context";
/// Whether the server should wait for the job to finish
pub const PARAM_SYNC: &str = "sync";
/// Seconds the server waits for a synchronous job
pub const PARAM_TIMEOUT: &str = "timeout";
pub const PARAM_CONTEXT_TYPE: &str = "context-factory";
pub const PARAM_NUM_CPU_CORES: &str = "num-cpu-cores";
pub const PARAM_MEM_PER_NODE: &str = "mem-per-node";
pub const PARAM_NUM_EXECUTORS: &str = "spark.executor.instances";
pub const PARAM_SPARK_CORES_MAX: &str = "spark.cores.max";
pub const PARAM_SPARK_EXECUTOR_MEMORY: &str = "spark.executor.memory";

/// Builder for the query parameters of a job submission
///
/// # Example
/// ```
/// use jobserver_rust_sdk::JobParams;
///
/// let params = JobParams::new("wordcount", "spark.jobserver.WordCountExample")
///     .context("shared")
///     .sync(true)
///     .timeout(60)
///     .build();
///
/// assert_eq!(params["appName"], "wordcount");
/// assert_eq!(params["sync"], "true");
/// ```
#[derive(Debug, Clone, Default)]
pub struct JobParams {
    params: HashMap<String, String>,
}

impl JobParams {
    /// Start from the two parameters every submission needs
    pub fn new(app_name: impl Into<String>, class_path: impl Into<String>) -> Self {
        Self::default()
            .param(PARAM_APP_NAME, app_name)
            .param(PARAM_CLASS_PATH, class_path)
    }

    /// Run the job in an existing context
    pub fn context(self, context: impl Into<String>) -> Self {
        self.param(PARAM_CONTEXT, context)
    }

    /// Wait for the job to finish before responding
    pub fn sync(self, sync: bool) -> Self {
        self.param(PARAM_SYNC, sync.to_string())
    }

    /// Server-side wait limit for synchronous jobs, in seconds
    pub fn timeout(self, seconds: u64) -> Self {
        self.param(PARAM_TIMEOUT, seconds.to_string())
    }

    /// Add an arbitrary parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Build the parameter map
    pub fn build(self) -> HashMap<String, String> {
        self.params
    }
}

/// Builder for the parameters of a new context
#[derive(Debug, Clone, Default)]
pub struct ContextParams {
    params: HashMap<String, String>,
}

impl ContextParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_cpu_cores(self, cores: u32) -> Self {
        self.param(PARAM_NUM_CPU_CORES, cores.to_string())
    }

    /// Memory per node, in job server notation (e.g. "512m")
    pub fn memory_per_node(self, memory: impl Into<String>) -> Self {
        self.param(PARAM_MEM_PER_NODE, memory)
    }

    pub fn context_factory(self, factory: impl Into<String>) -> Self {
        self.param(PARAM_CONTEXT_TYPE, factory)
    }

    pub fn executors(self, instances: u32) -> Self {
        self.param(PARAM_NUM_EXECUTORS, instances.to_string())
    }

    pub fn executor_memory(self, memory: impl Into<String>) -> Self {
        self.param(PARAM_SPARK_EXECUTOR_MEMORY, memory)
    }

    pub fn cores_max(self, cores: u32) -> Self {
        self.param(PARAM_SPARK_CORES_MAX, cores.to_string())
    }

    /// Add an arbitrary parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> HashMap<String, String> {
        self.params
    }
}
