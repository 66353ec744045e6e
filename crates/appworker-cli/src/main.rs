use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appworker_core::domain::Priority;
use appworker_core::impls::RedisQueueStore;
use appworker_core::ports::QueueStore;
use appworker_core::typed::ActionCodec;
use appworker_core::{Action, ActionArgs, Handler, WorkerBuilder, WorkerConfig, WorkerIdentity};

const WORKER_NAME: &str = "Sample";
const WORKER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "appworker")]
#[command(about = "Claims actions from the shared queue and runs them", long_about = None)]
struct Cli {
    /// Queue store address
    #[arg(long, env = "REDIS_URI")]
    redis_uri: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sample worker until it goes idle
    Run {
        /// Seconds without a claim before exiting
        #[arg(long, env = "IDLE_TIMEOUT_SECS")]
        idle_timeout_secs: Option<u64>,

        /// Cap on concurrently executing actions
        #[arg(long, env = "MAX_IN_FLIGHT")]
        max_in_flight: Option<usize>,
    },

    /// Push one action onto the sample worker's queue
    Enqueue {
        #[arg(long)]
        id: String,

        #[arg(long)]
        action_name: String,

        #[arg(long)]
        workflow_execution_id: String,

        /// 5 = highest, 1 = lowest
        #[arg(long, default_value_t = 5)]
        priority: u8,

        /// name=value; value is parsed as JSON, falling back to a string
        #[arg(long = "arg", value_parser = parse_argument)]
        args: Vec<(String, serde_json::Value)>,
    },
}

fn parse_argument(s: &str) -> Result<(String, serde_json::Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {s:?}"))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

// ---- sample capabilities ----

#[derive(Debug, Deserialize)]
struct Echo {
    text: String,
}

impl ActionArgs for Echo {
    const ACTION_NAME: &'static str = "echo";
    const PARAM_NAMES: &'static [&'static str] = &["text"];
}

struct EchoHandler;

#[async_trait]
impl Handler<Echo> for EchoHandler {
    type Output = String;

    async fn handle(&self, args: Echo) -> anyhow::Result<String> {
        Ok(args.text)
    }
}

#[derive(Debug, Deserialize)]
struct Add {
    x: f64,
    y: f64,
}

impl ActionArgs for Add {
    const ACTION_NAME: &'static str = "add";
    const PARAM_NAMES: &'static [&'static str] = &["x", "y"];
}

struct AddHandler;

#[async_trait]
impl Handler<Add> for AddHandler {
    type Output = f64;

    async fn handle(&self, args: Add) -> anyhow::Result<f64> {
        Ok(args.x + args.y)
    }
}

#[derive(Debug, Deserialize)]
struct Sleep {
    ms: u64,
}

impl ActionArgs for Sleep {
    const ACTION_NAME: &'static str = "sleep";
    const PARAM_NAMES: &'static [&'static str] = &["ms"];
}

struct SleepHandler;

#[async_trait]
impl Handler<Sleep> for SleepHandler {
    type Output = u64;

    async fn handle(&self, args: Sleep) -> anyhow::Result<u64> {
        tokio::time::sleep(Duration::from_millis(args.ms)).await;
        Ok(args.ms)
    }
}

#[derive(Debug, Deserialize)]
struct Fail {
    reason: String,
}

impl ActionArgs for Fail {
    const ACTION_NAME: &'static str = "fail";
    const PARAM_NAMES: &'static [&'static str] = &["reason"];
}

struct FailHandler;

#[async_trait]
impl Handler<Fail> for FailHandler {
    type Output = ();

    async fn handle(&self, args: Fail) -> anyhow::Result<()> {
        anyhow::bail!("intentional failure: {}", args.reason)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = WorkerConfig::from_env().context("reading worker config")?;
    if let Some(uri) = cli.redis_uri {
        config.redis_uri = uri;
    }

    let store = Arc::new(
        RedisQueueStore::connect(&config.redis_uri)
            .await
            .context("connecting to queue store")?,
    );
    let identity = WorkerIdentity::new(WORKER_NAME, WORKER_VERSION);

    match cli.command {
        Command::Run {
            idle_timeout_secs,
            max_in_flight,
        } => {
            if let Some(secs) = idle_timeout_secs {
                config.idle_timeout = Duration::from_secs(secs);
            }
            if max_in_flight.is_some() {
                config.max_in_flight = max_in_flight.filter(|n| *n > 0);
            }

            let worker = WorkerBuilder::new(identity)
                .register::<Echo, _>(EchoHandler)?
                .register::<Add, _>(AddHandler)?
                .register::<Sleep, _>(SleepHandler)?
                .register::<Fail, _>(FailHandler)?
                .expose("version", WORKER_VERSION)?
                .expect_capabilities(&["echo", "add", "sleep", "fail"])
                .config(config)
                .build(store)?;

            let Err(err) = worker.run().await;
            tracing::warn!(error = %err, stats = ?worker.stats(), "worker exiting");
            std::process::exit(err.exit_code());
        }
        Command::Enqueue {
            id,
            action_name,
            workflow_execution_id,
            priority,
            args,
        } => {
            let priority = Priority::new(priority).context("priority must be between 1 and 5")?;
            let mut action = Action::new(id, action_name, workflow_execution_id);
            for (name, value) in args {
                action = action.with_argument(name, value);
            }

            let queue = identity.queue_key(priority);
            store.lpush(&queue, ActionCodec::encode(&action)?).await?;
            tracing::info!(queue = %queue, action_id = %action.id, "enqueued action");
            Ok(())
        }
    }
}
