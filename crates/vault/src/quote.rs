use serde::{Deserialize, Serialize};

use aurum_core::ValueObject;

use crate::ledger::LedgerError;

/// USD price of one unit of gold (one ARM token), supplied by the price source.
///
/// Always finite and strictly positive; construction and deserialization both
/// go through [`GoldPriceQuote::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GoldPriceQuote {
    usd_per_unit: f64,
}

impl GoldPriceQuote {
    /// Price assumed when no vault snapshot has been recorded yet.
    pub const FALLBACK_USD: f64 = 2000.0;

    pub fn new(usd_per_unit: f64) -> Result<Self, LedgerError> {
        if !usd_per_unit.is_finite() || usd_per_unit <= 0.0 {
            return Err(LedgerError::InvalidQuote(format!(
                "gold price must be a finite positive number, got {usd_per_unit}"
            )));
        }
        Ok(Self { usd_per_unit })
    }

    pub fn fallback() -> Self {
        Self {
            usd_per_unit: Self::FALLBACK_USD,
        }
    }

    pub fn usd_per_unit(&self) -> f64 {
        self.usd_per_unit
    }

    /// Convert a USD amount into gold units at this quote.
    pub fn to_gold_units(&self, usd: f64) -> f64 {
        usd / self.usd_per_unit
    }
}

impl ValueObject for GoldPriceQuote {}

impl TryFrom<f64> for GoldPriceQuote {
    type Error = LedgerError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GoldPriceQuote> for f64 {
    fn from(value: GoldPriceQuote) -> Self {
        value.usd_per_unit
    }
}
