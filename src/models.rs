//! Response Models
//!
//! JSON shapes served by the backend. Feeds treat payloads as opaque
//! `serde_json::Value` unless one of these is requested as the payload type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Latest gamma exposure summary (`/api/gex/summary`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GexSummary {
    pub timestamp: String,
    pub net_gex: f64,
    pub total_call_gex: f64,
    pub total_put_gex: f64,
    pub put_call_ratio: f64,
    #[serde(default)]
    pub gamma_flip: Option<f64>,
    #[serde(default)]
    pub max_pain: Option<f64>,
    #[serde(default)]
    pub call_wall: Option<f64>,
    #[serde(default)]
    pub put_wall: Option<f64>,
}

/// Gamma exposure at a single strike (`/api/gex/by-strike`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GexByStrike {
    pub strike: f64,
    pub net_gex: f64,
    pub call_gex: f64,
    pub put_gex: f64,
    pub total_oi: f64,
    #[serde(default)]
    pub gex_level: Option<String>,
}

/// One heatmap cell source row (`/api/gex/heatmap`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaDataPoint {
    pub timestamp: String,
    pub strike: f64,
    pub net_gex: f64,
}

/// Aggregated option flow (`/api/flow/by-type`, `/api/flow/smart-money`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionFlow {
    pub time_window_end: String,
    pub option_type: String,
    #[serde(default)]
    pub strike: Option<f64>,
    pub total_volume: f64,
    pub total_premium: f64,
    #[serde(default)]
    pub avg_iv: Option<f64>,
    #[serde(default)]
    pub size_class: Option<String>,
    #[serde(default)]
    pub unusual_activity_score: Option<f64>,
}

/// Call/put notional per interval (`/api/flow/timeseries`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDataPoint {
    pub timestamp: String,
    pub call_notional: f64,
    pub put_notional: f64,
}

/// Underlying bar (`/api/market/quote`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderlyingQuote {
    pub timestamp: String,
    pub symbol: String,
    pub close: f64,
    pub volume: f64,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
}

/// Backend health (`/api/health`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub services: Option<HashMap<String, serde_json::Value>>,
}
