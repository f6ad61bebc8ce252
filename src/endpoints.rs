//! Backend Endpoints
//!
//! Typed builders for the endpoint paths the dashboard consumes. Paths are
//! relative to the API base URL (or the WebSocket base URL for live feeds).
//!
//! # Paths
//!
//! ## GEX
//! - `GET /api/gex/summary`
//! - `GET /api/gex/by-strike?limit=`
//! - `GET /api/gex/heatmap?window_minutes=&interval_minutes=`
//! - `GET /api/gex/historical?symbol=&start_date=&end_date=`
//!
//! ## Flow
//! - `GET /api/flow/by-type?window_minutes=`
//! - `GET /api/flow/by-strike?limit=`
//! - `GET /api/flow/timeseries?window_minutes=&interval_minutes=`
//! - `GET /api/flow/smart-money?limit=`
//!
//! ## Market
//! - `GET /api/market/quote`
//! - `GET /api/market/previous-close`
//! - `GET /api/market/historical?symbol=&start_date=&end_date=`
//!
//! ## Intraday
//! - `GET /api/intraday/vwap-deviation`
//! - `GET /api/intraday/opening-range`
//! - `GET /api/intraday/gamma-levels`
//! - `GET /api/intraday/volume-spikes`
//! - `GET /api/intraday/momentum-divergence`
//!
//! ## Health
//! - `GET /api/health`

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// An endpoint on the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    GexSummary,
    GexByStrike {
        limit: u32,
    },
    GexHeatmap {
        window_minutes: u32,
        interval_minutes: u32,
    },
    GexHistorical {
        symbol: String,
        start_date: Option<String>,
        end_date: Option<String>,
    },
    FlowByType {
        window_minutes: u32,
    },
    FlowByStrike {
        limit: u32,
    },
    FlowTimeseries {
        window_minutes: u32,
        interval_minutes: u32,
    },
    SmartMoneyFlow {
        limit: u32,
    },
    MarketQuote,
    PreviousClose,
    MarketHistorical {
        symbol: String,
        start_date: Option<String>,
        end_date: Option<String>,
    },
    VwapDeviation,
    OpeningRange,
    GammaLevels,
    VolumeSpikes,
    MomentumDivergence,
    Health,
}

impl Endpoint {
    /// Path relative to the API base URL, including any query string
    pub fn path(&self) -> String {
        match self {
            Endpoint::GexSummary => "/api/gex/summary".to_string(),
            Endpoint::GexByStrike { limit } => format!("/api/gex/by-strike?limit={}", limit),
            Endpoint::GexHeatmap {
                window_minutes,
                interval_minutes,
            } => format!(
                "/api/gex/heatmap?window_minutes={}&interval_minutes={}",
                window_minutes, interval_minutes
            ),
            Endpoint::GexHistorical {
                symbol,
                start_date,
                end_date,
            } => historical_path("/api/gex/historical", symbol, start_date, end_date),
            Endpoint::FlowByType { window_minutes } => {
                format!("/api/flow/by-type?window_minutes={}", window_minutes)
            }
            Endpoint::FlowByStrike { limit } => format!("/api/flow/by-strike?limit={}", limit),
            Endpoint::FlowTimeseries {
                window_minutes,
                interval_minutes,
            } => format!(
                "/api/flow/timeseries?window_minutes={}&interval_minutes={}",
                window_minutes, interval_minutes
            ),
            Endpoint::SmartMoneyFlow { limit } => {
                format!("/api/flow/smart-money?limit={}", limit)
            }
            Endpoint::MarketQuote => "/api/market/quote".to_string(),
            Endpoint::PreviousClose => "/api/market/previous-close".to_string(),
            Endpoint::MarketHistorical {
                symbol,
                start_date,
                end_date,
            } => historical_path("/api/market/historical", symbol, start_date, end_date),
            Endpoint::VwapDeviation => "/api/intraday/vwap-deviation".to_string(),
            Endpoint::OpeningRange => "/api/intraday/opening-range".to_string(),
            Endpoint::GammaLevels => "/api/intraday/gamma-levels".to_string(),
            Endpoint::VolumeSpikes => "/api/intraday/volume-spikes".to_string(),
            Endpoint::MomentumDivergence => "/api/intraday/momentum-divergence".to_string(),
            Endpoint::Health => "/api/health".to_string(),
        }
    }

    /// Refresh cadence the dashboard polls this endpoint at
    pub fn default_refresh_interval(&self) -> Duration {
        let ms = match self {
            Endpoint::MarketQuote => 1000,
            Endpoint::GexByStrike { .. } | Endpoint::SmartMoneyFlow { .. } => 10_000,
            Endpoint::GexHistorical { .. }
            | Endpoint::MarketHistorical { .. }
            | Endpoint::PreviousClose => 60_000,
            _ => 5000,
        };
        Duration::from_millis(ms)
    }

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::GexSummary => "gex-summary",
            Endpoint::GexByStrike { .. } => "gex-by-strike",
            Endpoint::GexHeatmap { .. } => "gex-heatmap",
            Endpoint::GexHistorical { .. } => "gex-historical",
            Endpoint::FlowByType { .. } => "flow-by-type",
            Endpoint::FlowByStrike { .. } => "flow-by-strike",
            Endpoint::FlowTimeseries { .. } => "flow-timeseries",
            Endpoint::SmartMoneyFlow { .. } => "smart-money",
            Endpoint::MarketQuote => "quote",
            Endpoint::PreviousClose => "previous-close",
            Endpoint::MarketHistorical { .. } => "market-historical",
            Endpoint::VwapDeviation => "vwap-deviation",
            Endpoint::OpeningRange => "opening-range",
            Endpoint::GammaLevels => "gamma-levels",
            Endpoint::VolumeSpikes => "volume-spikes",
            Endpoint::MomentumDivergence => "momentum-divergence",
            Endpoint::Health => "health",
        }
    }
}

fn historical_path(
    base: &str,
    symbol: &str,
    start_date: &Option<String>,
    end_date: &Option<String>,
) -> String {
    let mut path = format!("{}?symbol={}", base, urlencoding::encode(symbol));
    if let Some(start) = start_date {
        path.push_str(&format!("&start_date={}", urlencoding::encode(start)));
    }
    if let Some(end) = end_date {
        path.push_str(&format!("&end_date={}", urlencoding::encode(end)));
    }
    path
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Unknown endpoint name
#[derive(Debug, Error)]
#[error("Unknown endpoint: {0}")]
pub struct ParseEndpointError(String);

impl FromStr for Endpoint {
    type Err = ParseEndpointError;

    /// Parse a short name using the dashboard's default parameters
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let endpoint = match s {
            "gex-summary" => Endpoint::GexSummary,
            "gex-by-strike" => Endpoint::GexByStrike { limit: 50 },
            "gex-heatmap" => Endpoint::GexHeatmap {
                window_minutes: 60,
                interval_minutes: 5,
            },
            "gex-historical" => Endpoint::GexHistorical {
                symbol: "SPY".to_string(),
                start_date: None,
                end_date: None,
            },
            "flow-by-type" => Endpoint::FlowByType { window_minutes: 60 },
            "flow-by-strike" => Endpoint::FlowByStrike { limit: 10 },
            "flow-timeseries" => Endpoint::FlowTimeseries {
                window_minutes: 60,
                interval_minutes: 5,
            },
            "smart-money" => Endpoint::SmartMoneyFlow { limit: 10 },
            "quote" => Endpoint::MarketQuote,
            "previous-close" => Endpoint::PreviousClose,
            "market-historical" => Endpoint::MarketHistorical {
                symbol: "SPY".to_string(),
                start_date: None,
                end_date: None,
            },
            "vwap-deviation" => Endpoint::VwapDeviation,
            "opening-range" => Endpoint::OpeningRange,
            "gamma-levels" => Endpoint::GammaLevels,
            "volume-spikes" => Endpoint::VolumeSpikes,
            "momentum-divergence" => Endpoint::MomentumDivergence,
            "health" => Endpoint::Health,
            other => return Err(ParseEndpointError(other.to_string())),
        };
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_paths() {
        assert_eq!(Endpoint::GexSummary.path(), "/api/gex/summary");
        assert_eq!(
            Endpoint::GexByStrike { limit: 50 }.path(),
            "/api/gex/by-strike?limit=50"
        );
        assert_eq!(
            Endpoint::FlowTimeseries {
                window_minutes: 60,
                interval_minutes: 5
            }
            .path(),
            "/api/flow/timeseries?window_minutes=60&interval_minutes=5"
        );
        assert_eq!(
            Endpoint::SmartMoneyFlow { limit: 10 }.to_string(),
            "/api/flow/smart-money?limit=10"
        );
    }

    #[test]
    fn test_historical_params_are_encoded() {
        let endpoint = Endpoint::MarketHistorical {
            symbol: "BRK B".to_string(),
            start_date: Some("2026-10-01".to_string()),
            end_date: None,
        };
        assert_eq!(
            endpoint.path(),
            "/api/market/historical?symbol=BRK%20B&start_date=2026-10-01"
        );
    }

    #[test]
    fn test_default_refresh_intervals() {
        assert_eq!(
            Endpoint::MarketQuote.default_refresh_interval(),
            Duration::from_millis(1000)
        );
        assert_eq!(
            Endpoint::GexByStrike { limit: 50 }.default_refresh_interval(),
            Duration::from_millis(10_000)
        );
        assert_eq!(
            Endpoint::GexSummary.default_refresh_interval(),
            Duration::from_millis(5000)
        );
    }

    #[test]
    fn test_names_parse_back() {
        for name in [
            "gex-summary",
            "gex-heatmap",
            "flow-by-type",
            "smart-money",
            "quote",
            "momentum-divergence",
            "health",
        ] {
            let endpoint: Endpoint = name.parse().unwrap();
            assert_eq!(endpoint.name(), name);
        }

        assert!("gex-everything".parse::<Endpoint>().is_err());
    }
}
