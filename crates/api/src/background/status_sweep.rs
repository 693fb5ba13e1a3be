//! Periodic time-driven heist status advancement.
//!
//! Every tick, PLANNING heists whose start has passed become IN_PROGRESS
//! and IN_PROGRESS heists whose end has passed become FINISHED. A tick is
//! one transaction: candidates are locked with `FOR UPDATE SKIP LOCKED`,
//! planned by [`heist_core::sweep::plan`], and both status changes commit
//! together or not at all.

use std::time::Duration;

use chrono::Utc;
use heist_core::sweep::{self, SweepCandidate, SweepPlan};
use heist_core::types::Timestamp;
use heist_db::models::status::HeistStatus;
use heist_db::repositories::HeistRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// The heist status sweep task.
pub struct StatusSweep {
    pool: PgPool,
    interval: Duration,
}

impl StatusSweep {
    pub fn new(pool: PgPool, interval: Duration) -> Self {
        Self { pool, interval }
    }

    /// Run the sweep loop until `cancel` is triggered.
    ///
    /// A tick that has begun runs to completion; cancellation is observed
    /// between ticks. A failed tick is logged and retried on the next one.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Heist status sweep started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Heist status sweep stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.tick().await {
                        Ok(plan) if plan.is_empty() => {
                            tracing::debug!("Heist status sweep: nothing to advance");
                        }
                        Ok(plan) => {
                            tracing::info!(
                                started = plan.to_start.len(),
                                finished = plan.to_finish.len(),
                                "Heist status sweep: advanced heists",
                            );
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Heist status sweep failed");
                        }
                    }
                }
            }
        }
    }

    /// One sweep at the current time.
    pub async fn tick(&self) -> Result<SweepPlan, sqlx::Error> {
        self.tick_at(Utc::now()).await
    }

    /// One sweep as of `now`. Returns what was advanced.
    pub async fn tick_at(&self, now: Timestamp) -> Result<SweepPlan, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let candidates: Vec<SweepCandidate> = HeistRepo::lock_sweep_candidates(&mut tx, now)
            .await?
            .iter()
            .map(SweepCandidate::from)
            .collect();
        let plan = sweep::plan(&candidates, now);

        if plan.is_empty() {
            tx.rollback().await?;
            return Ok(plan);
        }

        HeistRepo::advance_status(
            &mut tx,
            &plan.to_finish,
            HeistStatus::InProgress,
            HeistStatus::Finished,
        )
        .await?;
        HeistRepo::advance_status(
            &mut tx,
            &plan.to_start,
            HeistStatus::Planning,
            HeistStatus::InProgress,
        )
        .await?;
        tx.commit().await?;

        for heist_id in &plan.to_start {
            tracing::debug!(heist_id, "Heist started by sweep");
        }
        for heist_id in &plan.to_finish {
            tracing::debug!(heist_id, "Heist finished by sweep");
        }
        Ok(plan)
    }
}
