//! Multi-account sweep orchestration.
//!
//! # Responsibilities
//! - Run the engine once per configured key
//! - Bound the number of accounts in flight with a semaphore
//! - Collect exactly one result per key, in input order
//!
//! # Design Decisions
//! - One task per account; a failing account never stops the others
//! - The result slots are the only shared mutable state
//! - No chain calls are made here

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::client::ChainClient;
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;
use crate::resilience::timeouts::CallContext;
use crate::sweep::engine::SweepEngine;
use crate::sweep::types::{SweepReport, SweepResult};

/// Drives a [`SweepEngine`] across many accounts.
pub struct SweepOrchestrator<C> {
    engine: Arc<SweepEngine<C>>,
    ctx: CallContext,
    max_concurrency: usize,
}

impl<C: ChainClient + 'static> SweepOrchestrator<C> {
    /// Create an orchestrator running at most `max_concurrency` sweeps at once.
    pub fn new(engine: SweepEngine<C>, ctx: CallContext, max_concurrency: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            ctx,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Sweep every key and return one result per key, in the order supplied.
    pub async fn run(&self, sender_keys: Vec<SecretString>) -> SweepReport {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        let total = sender_keys.len();

        tracing::info!(
            %run_id,
            accounts = total,
            max_concurrency = self.max_concurrency,
            receiver = %self.engine.receiver(),
            "Starting sweep run"
        );

        let limit = Arc::new(Semaphore::new(self.max_concurrency));
        let slots: Arc<Mutex<Vec<Option<SweepResult>>>> =
            Arc::new(Mutex::new((0..total).map(|_| None).collect()));
        let mut tasks = JoinSet::new();

        for (index, key) in sender_keys.into_iter().enumerate() {
            let engine = self.engine.clone();
            let ctx = self.ctx.clone();
            let limit = limit.clone();
            let slots = slots.clone();
            let span = tracing::info_span!("sweep", %run_id, account = index);

            tasks.spawn(
                async move {
                    // Permits are only released, never closed.
                    let Ok(_permit) = limit.acquire_owned().await else {
                        return;
                    };

                    let account_started = Instant::now();
                    let result = match Wallet::from_secret(&key) {
                        Ok(wallet) => {
                            // Left in place if the sweep panics.
                            slots.lock().await[index] =
                                Some(SweepResult::aborted(index, Some(wallet.address()), "sweep task panicked"));
                            engine.sweep_wallet(index, &wallet, &ctx).await
                        }
                        Err(e) => SweepResult::invalid_key(index, e),
                    };
                    metrics::record_account(result.outcome_label(), account_started.elapsed());

                    slots.lock().await[index] = Some(result);
                }
                .instrument(span),
            );
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(%run_id, error = %e, "Sweep task aborted");
            }
        }

        let results: Vec<SweepResult> = slots
            .lock()
            .await
            .drain(..)
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| SweepResult::aborted(index, None, "task ended without a result"))
            })
            .collect();

        let report = SweepReport {
            run_id,
            results,
            elapsed: started.elapsed(),
        };
        metrics::record_run(report.succeeded(), report.failed());
        report
    }
}
