//! Shared test utilities for repoll integration tests

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Install a test-friendly tracing subscriber (idempotent)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("repoll=debug")
        .with_test_writer()
        .try_init();
}

/// Health states reported by a `FakeService`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Starting,
    Healthy,
}

/// A service that refuses connections, then starts, then becomes healthy
#[derive(Debug, Clone)]
pub struct FakeService {
    probes: Arc<AtomicU32>,
    refuse_until: u32,
    healthy_from: u32,
}

impl FakeService {
    /// Probes `1..=refuse_until` fail; probes from `healthy_from` on report healthy
    pub fn new(refuse_until: u32, healthy_from: u32) -> Self {
        Self {
            probes: Arc::new(AtomicU32::new(0)),
            refuse_until,
            healthy_from,
        }
    }

    /// Perform one health probe
    pub async fn probe(&self) -> anyhow::Result<Health> {
        let probe = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
        if probe <= self.refuse_until {
            anyhow::bail!("connection refused (probe {})", probe);
        }
        if probe >= self.healthy_from {
            Ok(Health::Healthy)
        } else {
            Ok(Health::Starting)
        }
    }

    /// Number of probes performed so far
    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }
}
