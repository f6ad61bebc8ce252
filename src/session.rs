//! US equity market session, by local wall-clock time

use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use std::fmt;

const PRE_MARKET_START: u32 = 4 * 60;
const MARKET_OPEN: u32 = 9 * 60 + 30;
const MARKET_CLOSE: u32 = 16 * 60;
const AFTER_HOURS_END: u32 = 20 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketSession {
    PreMarket,
    Open,
    AfterHours,
    Closed,
    ClosedWeekend,
}

impl MarketSession {
    /// Session at the given wall-clock time
    ///
    /// Holidays and halts are not detected.
    pub fn classify(at: NaiveDateTime) -> Self {
        if matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
            return MarketSession::ClosedWeekend;
        }

        let minutes = at.hour() * 60 + at.minute();
        match minutes {
            m if (MARKET_OPEN..MARKET_CLOSE).contains(&m) => MarketSession::Open,
            m if (PRE_MARKET_START..MARKET_OPEN).contains(&m) => MarketSession::PreMarket,
            m if (MARKET_CLOSE..AFTER_HOURS_END).contains(&m) => MarketSession::AfterHours,
            _ => MarketSession::Closed,
        }
    }

    /// Session right now, in the local timezone
    pub fn current() -> Self {
        Self::classify(Local::now().naive_local())
    }

    /// Badge label as shown in the dashboard header
    pub fn label(&self) -> &'static str {
        match self {
            MarketSession::PreMarket => "PRE-MARKET",
            MarketSession::Open => "MARKET OPEN",
            MarketSession::AfterHours => "AFTER HOURS",
            MarketSession::Closed => "CLOSED",
            MarketSession::ClosedWeekend => "CLOSED",
        }
    }

    pub fn is_trading(&self) -> bool {
        matches!(self, MarketSession::Open)
    }
}

impl fmt::Display for MarketSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
