/// Upload a jar, run a job asynchronously and poll until it finishes
use jobserver_rust_sdk::{ClientConfig, JobOutcome, JobParams, JobServerClient};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // JOBSERVER_URL, optionally JOBSERVER_TIMEOUT_SECS
    let client = JobServerClient::with_config(ClientConfig::from_env()?)?;

    let jar_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "target/wordcount.jar".to_string());
    let jar = tokio::fs::read(&jar_path).await?;

    println!("Uploading {}...", jar_path);
    client.upload_jar(jar, "wordcount").await?;

    for jar in client.list_jars().await? {
        println!("  {} (uploaded {})", jar.name, jar.uploaded_at);
    }

    let params = JobParams::new("wordcount", "spark.jobserver.WordCountExample")
        .sync(false)
        .build();

    let job_id = match client
        .start_job(Some("input.string = a b c a b see"), &params)
        .await?
    {
        JobOutcome::Accepted { job_id, context } => {
            println!("✓ Job {} accepted in context {}", job_id, context);
            job_id
        }
        JobOutcome::Completed { raw_result, .. } => {
            println!("✓ Job finished immediately: {}", raw_result);
            return Ok(());
        }
        other => {
            eprintln!("Job was not started: {:?}", other);
            return Ok(());
        }
    };

    println!("\nWaiting for job completion...");
    let outcome = loop {
        let outcome = client.get_job_result(&job_id).await?;
        if outcome.is_terminal() {
            break outcome;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    };

    match outcome {
        JobOutcome::Completed { raw_result, .. } => println!("\n✓ Result: {}", raw_result),
        JobOutcome::Failed {
            message,
            error_class,
            stack_trace,
        } => {
            println!("\n✗ Job failed: {} ({:?})", message, error_class);
            for frame in stack_trace {
                println!("    {}", frame);
            }
        }
        other => println!("\n{:?}", other),
    }

    let config = client.get_job_config(&job_id).await?;
    println!("\nJob ran with {} config sections", config.len());

    Ok(())
}
