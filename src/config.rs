// Session configuration

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    // Simulated latency of the mock authentication backend
    pub auth_latency_ms: u64,
    // Simulated processing time of the mock payment gateway
    pub payment_latency_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_latency_ms: 1000,
            payment_latency_ms: 2000,
        }
    }
}

impl SessionConfig {
    // No simulated latency at all, handy for tests and benchmarks
    pub fn instant() -> Self {
        Self {
            auth_latency_ms: 0,
            payment_latency_ms: 0,
        }
    }

    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }

    pub fn payment_latency(&self) -> Duration {
        Duration::from_millis(self.payment_latency_ms)
    }
}
