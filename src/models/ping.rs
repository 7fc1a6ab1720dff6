//! Ping/status command models

/// Bot ping metrics and uptime information
#[derive(Debug)]
pub struct PingMetrics {
    pub response_latency: u64,
    pub response_roundtrip: u64,
    pub uptime: String,
}
