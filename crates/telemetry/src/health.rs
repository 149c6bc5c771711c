//! Component health for the two data sources.
//!
//! The dashboard has exactly two ways to get tables: the live upstream
//! page and the persisted snapshot. The view layer reads this registry to
//! decide between fresh data, a staleness notice, and a visible error
//! state.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Health status for the pipeline as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Live data is flowing.
    Healthy,
    /// Serving stale snapshot data.
    Degraded,
    /// No data source available.
    Unhealthy,
}

impl HealthStatus {
    pub fn is_serving(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

/// Health state of one data source.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    healthy: AtomicBool,
    message: parking_lot::RwLock<Option<String>>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            healthy: AtomicBool::new(false),
            message: parking_lot::RwLock::new(None),
        }
    }

    pub fn set_healthy(&self) {
        self.healthy.store(true, Ordering::Relaxed);
        *self.message.write() = None;
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        self.healthy.store(false, Ordering::Relaxed);
        *self.message.write() = Some(msg.into());
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> Option<String> {
        self.message.read().clone()
    }
}

/// Point-in-time health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealthReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealthReport {
    pub name: String,
    pub healthy: bool,
    pub message: Option<String>,
}

/// Global health registry.
pub struct HealthRegistry {
    /// The live source page.
    pub upstream: ComponentHealth,
    /// The persisted CSV fallback.
    pub snapshot: ComponentHealth,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            upstream: ComponentHealth::new("upstream"),
            snapshot: ComponentHealth::new("snapshot"),
        }
    }

    /// Generate a health report.
    ///
    /// Healthy requires live data; a working snapshot alone is degraded
    /// (stale but serving); neither source means there is nothing to
    /// render.
    pub fn report(&self) -> HealthReport {
        let components = vec![
            ComponentHealthReport {
                name: self.upstream.name().to_string(),
                healthy: self.upstream.is_healthy(),
                message: self.upstream.message(),
            },
            ComponentHealthReport {
                name: self.snapshot.name().to_string(),
                healthy: self.snapshot.is_healthy(),
                message: self.snapshot.message(),
            },
        ];

        let status = if self.upstream.is_healthy() {
            HealthStatus::Healthy
        } else if self.snapshot.is_healthy() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        };

        HealthReport { status, components }
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global health registry.
pub static HEALTH: std::sync::LazyLock<HealthRegistry> =
    std::sync::LazyLock::new(HealthRegistry::new);

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
