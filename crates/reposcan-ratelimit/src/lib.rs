// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token-bucket rate limiting for the two remote hosts.
//!
//! One process-wide [`RemoteLimiter`] holds two independent buckets, so a
//! burst against one host cannot starve the other. Each bucket refills
//! continuously at `rpm / 60` tokens per second up to a capacity of `rpm`
//! (one minute of quota). Waiters are admitted roughly FIFO: the bucket state
//! sits behind a [`tokio::sync::Mutex`], whose queued acquirers wake in
//! arrival order.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use reposcan_core::ScanError;

/// A single continuously-refilling token bucket.
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(rpm: u32) -> Self {
        let capacity = f64::from(rpm);
        Self {
            capacity,
            refill_per_sec: capacity / 60.0,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Take one token, sleeping until one accrues.
    ///
    /// Fails with [`ScanError::Cancelled`] if `cancel` fires first.
    async fn acquire(&self, cancel: &CancellationToken) -> Result<(), ScanError> {
        loop {
            if cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }

            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
                state.last_refill = now;

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return Ok(());
                }
                Duration::from_secs_f64((1.0 - state.tokens) / self.refill_per_sec)
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = cancel.cancelled() => return Err(ScanError::Cancelled),
            }
        }
    }
}

/// Process-wide pair of token buckets, one per remote host.
#[derive(Debug)]
pub struct RemoteLimiter {
    github: TokenBucket,
    openai: TokenBucket,
}

impl RemoteLimiter {
    /// Creates a limiter with the configured per-minute quotas.
    pub fn new(github_rpm: u32, openai_rpm: u32) -> Self {
        Self {
            github: TokenBucket::new(github_rpm),
            openai: TokenBucket::new(openai_rpm),
        }
    }

    /// Blocks until a version-control host token is available.
    pub async fn wait_github(&self, cancel: &CancellationToken) -> Result<(), ScanError> {
        self.github.acquire(cancel).await
    }

    /// Blocks until a language-model host token is available.
    pub async fn wait_openai(&self, cancel: &CancellationToken) -> Result<(), ScanError> {
        self.openai.acquire(cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_up_to_capacity_is_immediate() {
        let limiter = RemoteLimiter::new(10, 10);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        for _ in 0..10 {
            limiter.wait_github(&cancel).await.unwrap();
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn drained_bucket_enforces_refill_rate() {
        // 60 rpm = 1 token per second.
        let limiter = RemoteLimiter::new(60, 60);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        // Capacity is 60; the 63rd call needs 3 seconds of refill.
        for _ in 0..63 {
            limiter.wait_github(&cancel).await.unwrap();
        }

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn buckets_are_independent() {
        let limiter = RemoteLimiter::new(1, 60);
        let cancel = CancellationToken::new();

        // Drain the github bucket entirely.
        limiter.wait_github(&cancel).await.unwrap();

        // The openai bucket is unaffected.
        let start = Instant::now();
        limiter.wait_openai(&cancel).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_a_blocked_wait() {
        let limiter = std::sync::Arc::new(RemoteLimiter::new(1, 1));
        let cancel = CancellationToken::new();

        // Drain the bucket so the next wait blocks for ~60s.
        limiter.wait_github(&cancel).await.unwrap();

        let waiter = {
            let limiter = limiter.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.wait_github(&cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(ScanError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn tokens_do_not_accrue_past_capacity() {
        let limiter = RemoteLimiter::new(2, 2);
        let cancel = CancellationToken::new();

        // Idle far longer than one refill period.
        tokio::time::sleep(Duration::from_secs(600)).await;

        let start = Instant::now();
        limiter.wait_github(&cancel).await.unwrap();
        limiter.wait_github(&cancel).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        // Third call must wait for a refill (2 rpm = 30s per token).
        limiter.wait_github(&cancel).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(29));
    }
}
