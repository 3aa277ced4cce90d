//! Vault snapshots: risk label, yield figures and market prices.
//!
//! Snapshots are append-only; "the current vault state" is simply the most
//! recent one, read by the caller and passed in explicitly.

use core::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use aurum_core::{DomainError, DomainResult, VaultStateId};

use crate::ledger::LedgerError;
use crate::quote::GoldPriceQuote;

/// Display label for the vault's positioning. Has no effect on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    RiskOn,
    RiskOff,
}

impl RiskStatus {
    pub fn toggled(self) -> Self {
        match self {
            RiskStatus::RiskOn => RiskStatus::RiskOff,
            RiskStatus::RiskOff => RiskStatus::RiskOn,
        }
    }

    /// Demo agent sentiment: risk-on for the first minute of every
    /// two-minute window.
    pub fn sentiment_at(unix_secs: i64) -> Self {
        if unix_secs.rem_euclid(120) < 60 {
            RiskStatus::RiskOn
        } else {
            RiskStatus::RiskOff
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::RiskOn => "RISK_ON",
            RiskStatus::RiskOff => "RISK_OFF",
        }
    }
}

impl core::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RISK_ON" => Ok(RiskStatus::RiskOn),
            "RISK_OFF" => Ok(RiskStatus::RiskOff),
            other => Err(DomainError::validation(format!(
                "risk status must be RISK_ON or RISK_OFF, got {other}"
            ))),
        }
    }
}

/// Values for a new snapshot (the periodic "agent update" path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultStateInput {
    pub status: RiskStatus,
    pub current_apy: f64,
    pub tvl: f64,
    pub gold_price: f64,
    pub qie_price: f64,
    #[serde(default)]
    pub analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultState {
    pub id: VaultStateId,
    pub status: RiskStatus,
    pub current_apy: f64,
    pub tvl: f64,
    pub gold_price: f64,
    pub qie_price: f64,
    pub analysis: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl VaultState {
    /// Build a snapshot from submitted figures. The gold price must be a
    /// usable quote; the other figures must be finite and non-negative.
    pub fn from_input(input: VaultStateInput, recorded_at: DateTime<Utc>) -> DomainResult<Self> {
        GoldPriceQuote::new(input.gold_price).map_err(|e| DomainError::validation(e.to_string()))?;
        for (field, value) in [
            ("current_apy", input.current_apy),
            ("tvl", input.tvl),
            ("qie_price", input.qie_price),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::validation(format!(
                    "{field} must be a finite non-negative number, got {value}"
                )));
            }
        }

        Ok(Self {
            id: VaultStateId::new(),
            status: input.status,
            current_apy: input.current_apy,
            tvl: input.tvl,
            gold_price: input.gold_price,
            qie_price: input.qie_price,
            analysis: input.analysis,
            recorded_at,
        })
    }

    /// Next snapshot: same figures, flipped status.
    pub fn toggled(&self, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: VaultStateId::new(),
            status: self.status.toggled(),
            recorded_at,
            ..self.clone()
        }
    }

    /// Gold price of this snapshot as a quote; fails if the stored price is
    /// not usable for conversion.
    pub fn quote(&self) -> Result<GoldPriceQuote, LedgerError> {
        GoldPriceQuote::new(self.gold_price)
    }
}

const BASE_GOLD_USD: f64 = 2000.0;
const BASE_QIE_USD: f64 = 0.5;

/// Simulated daily history: `points` snapshots, one per day, the last one a
/// day before `now`. Oldest first.
pub fn simulated_history<R: Rng>(now: DateTime<Utc>, points: u32, rng: &mut R) -> Vec<VaultState> {
    (0..points)
        .map(|i| {
            let x = f64::from(i);
            let status = if rng.gen_bool(0.3) {
                RiskStatus::RiskOff
            } else {
                RiskStatus::RiskOn
            };
            VaultState {
                id: VaultStateId::new(),
                status,
                current_apy: 5.0 + rng.gen_range(0.0..10.0),
                tvl: 1_000_000.0 + rng.gen_range(0.0..50_000.0),
                gold_price: BASE_GOLD_USD + x.sin() * 50.0 + rng.gen_range(0.0..20.0),
                qie_price: BASE_QIE_USD + x.cos() * 0.1 + rng.gen_range(0.0..0.05),
                analysis: Some("Historical data point".to_string()),
                recorded_at: now - Duration::days(i64::from(points - i)),
            }
        })
        .collect()
}
