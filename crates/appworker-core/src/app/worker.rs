//! Worker - claim loop と実行タスクをつなぐ composition root
//!
//! # フロー
//! 1. ClaimLoop::claim_next() で 1 件 claim（tracking list へ移動）
//! 2. claim ごとに実行タスクを spawn して、すぐに次の claim へ戻る
//! 3. 実行タスク: decode → resolve → STARTED 報告 → invoke → 終端 status 報告
//!
//! 実行タスク内の decode 失敗はそのタスクだけで終わります。
//! status の報告失敗（store 障害）は claim loop に伝わり、プロセス全体を止めます。

use std::convert::Infallible;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info};

use crate::app::claim_loop::ClaimLoop;
use crate::app::config::WorkerConfig;
use crate::app::dispatcher::{Dispatcher, not_found_message};
use crate::app::reporter::ResultReporter;
use crate::app::stats::{StatsSnapshot, WorkerStats};
use crate::domain::{
    ActionStatus, ExecutionError, QueueKeys, QueueStoreError, StatusKind, WorkerError, WorkerId,
    WorkerIdentity,
};
use crate::ports::{Clock, IdGenerator, QueueStore, SystemClock, UlidGenerator};
use crate::typed::{ActionCodec, CapabilityRegistry};

/// Per-claim pipeline shared by every execution task.
struct Executor {
    worker_id: WorkerId,
    dispatcher: Dispatcher,
    reporter: ResultReporter,
    clock: Arc<dyn Clock>,
    stats: WorkerStats,
}

impl Executor {
    async fn execute(&self, raw: &[u8]) -> Result<StatusKind, ExecutionError> {
        let action = ActionCodec::decode(raw)?;
        debug!(
            worker = %self.worker_id,
            action_id = %action.id,
            workflow_execution_id = %action.workflow_execution_id,
            "attempting execution of {}", action.name
        );

        let status = match self.dispatcher.resolve(&action.action_name) {
            None => {
                error!(
                    worker = %self.worker_id,
                    action_id = %action.id,
                    workflow_execution_id = %action.workflow_execution_id,
                    "no capability named {}", action.action_name
                );
                ActionStatus::not_found(
                    &action,
                    not_found_message(&action.action_name),
                    self.clock.now(),
                )
            }
            Some(capability) => {
                self.reporter
                    .report(&ActionStatus::started(&action, self.clock.now()))
                    .await?;

                match self.dispatcher.invoke(capability, &action).await {
                    Ok(result) => {
                        debug!(
                            worker = %self.worker_id,
                            action_id = %action.id,
                            %result,
                            "executed {}", action.name
                        );
                        ActionStatus::success(&action, result, self.clock.now())
                    }
                    Err(e) => {
                        error!(
                            worker = %self.worker_id,
                            action_id = %action.id,
                            workflow_execution_id = %action.workflow_execution_id,
                            error = %e,
                            "failed to execute {}", action.name
                        );
                        ActionStatus::failure(&action, e.to_string(), self.clock.now())
                    }
                }
            }
        };

        self.reporter.report(&status).await?;
        self.stats.record_terminal(status.status);
        Ok(status.status)
    }
}

pub struct Worker {
    identity: WorkerIdentity,
    claim_loop: ClaimLoop,
    limiter: Option<Arc<Semaphore>>,
    executor: Arc<Executor>,
}

impl Worker {
    pub(crate) fn new(
        identity: WorkerIdentity,
        registry: CapabilityRegistry,
        config: WorkerConfig,
        clock: Arc<dyn Clock>,
        store: Arc<dyn QueueStore>,
    ) -> Self {
        let worker_id = UlidGenerator::new(SystemClock).generate_worker_id();
        let keys = QueueKeys::for_identity(&identity);
        let claim_loop = ClaimLoop::new(
            Arc::clone(&store),
            keys,
            config.actions_in_process.clone(),
            config.idle_timeout,
        )
        .with_poll_interval(config.poll_interval);

        let executor = Executor {
            worker_id,
            dispatcher: Dispatcher::new(Arc::new(registry)),
            reporter: ResultReporter::new(store, config.action_result_ch.clone()),
            clock,
            stats: WorkerStats::default(),
        };

        Self {
            identity,
            claim_loop,
            limiter: config.max_in_flight.map(|n| Arc::new(Semaphore::new(n))),
            executor: Arc::new(executor),
        }
    }

    pub fn id(&self) -> WorkerId {
        self.executor.worker_id
    }

    pub fn identity(&self) -> &WorkerIdentity {
        &self.identity
    }

    pub fn queue_keys(&self) -> &QueueKeys {
        self.claim_loop.keys()
    }

    pub fn capabilities(&self) -> Vec<String> {
        self.executor.dispatcher.registry().names()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.executor.stats.snapshot()
    }

    /// Run the decode → dispatch → report pipeline for one claimed payload.
    pub async fn execute_raw(&self, raw: &[u8]) -> Result<StatusKind, ExecutionError> {
        self.executor.execute(raw).await
    }

    /// Claim and execute forever.
    ///
    /// Only returns on idle timeout or a queue-store failure (from the claim
    /// loop or from any execution task's status report).
    pub async fn run(&self) -> Result<Infallible, WorkerError> {
        let (fatal_tx, mut fatal_rx) = mpsc::channel::<QueueStoreError>(1);
        let queues: Vec<&str> = self.queue_keys().iter().collect();
        info!(
            worker = %self.id(),
            identity = %self.identity,
            ?queues,
            capabilities = ?self.capabilities(),
            "worker started"
        );

        loop {
            // 上限ありの場合のみ permit を待つ（既定は無制限）
            let permit = match &self.limiter {
                Some(limiter) => Arc::clone(limiter).acquire_owned().await.ok(),
                None => None,
            };

            let claimed = tokio::select! {
                biased;
                Some(err) = fatal_rx.recv() => {
                    error!(worker = %self.id(), error = %err, "status report failed; stopping");
                    return Err(err.into());
                }
                claimed = self.claim_loop.claim_next() => claimed?,
            };

            self.executor.stats.record_claim();
            let executor = Arc::clone(&self.executor);
            let fatal_tx = fatal_tx.clone();
            tokio::spawn(async move {
                let _permit = permit;
                match executor.execute(&claimed.payload).await {
                    Ok(_) => {}
                    Err(ExecutionError::Decode(e)) => {
                        executor.stats.record_decode_error();
                        error!(worker = %executor.worker_id, queue = %claimed.queue, error = %e, "dropping undecodable action");
                    }
                    Err(ExecutionError::Report(e)) => {
                        let _ = fatal_tx.try_send(e);
                    }
                }
                executor.stats.record_done();
            });
        }
    }
}
