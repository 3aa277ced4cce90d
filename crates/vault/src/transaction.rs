use core::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use aurum_core::{DomainError, TransactionId, UserId, ValueObject};

use crate::ledger::TransactionKind;

const REFERENCE_HEX_DIGITS: usize = 64;

/// Mock on-chain hash shown next to a transaction (`0x` + 64 hex digits).
///
/// Display only; it is not tied to any settlement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxReference(String);

impl TxReference {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut s = String::with_capacity(2 + REFERENCE_HEX_DIGITS);
        s.push_str("0x");
        for _ in 0..REFERENCE_HEX_DIGITS {
            s.push(HEX[rng.gen_range(0..16)] as char);
        }
        Self(s)
    }

    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for TxReference {}

impl core::fmt::Display for TxReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TxReference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| DomainError::validation("tx reference must start with 0x"))?;
        if digits.len() != REFERENCE_HEX_DIGITS
            || !digits.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(DomainError::validation(format!(
                "tx reference must be {REFERENCE_HEX_DIGITS} lowercase hex digits"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for TxReference {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TxReference> for String {
    fn from(value: TxReference) -> Self {
        value.0
    }
}

/// Immutable, append-only record of one applied ledger operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// USD amount.
    pub amount: f64,
    pub reference: TxReference,
    pub recorded_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount: f64,
        reference: TxReference,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            kind,
            amount,
            reference,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_reference_is_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = TxReference::generate(&mut rng);
        assert_eq!(r.as_str().len(), 66);
        assert_eq!(r.as_str().parse::<TxReference>().unwrap(), r);
    }

    #[test]
    fn malformed_references_are_rejected() {
        assert!("deadbeef".parse::<TxReference>().is_err());
        assert!("0x1234".parse::<TxReference>().is_err());
        let upper = format!("0x{}", "A".repeat(64));
        assert!(upper.parse::<TxReference>().is_err());
    }

    #[test]
    fn record_serializes_kind_under_type_key() {
        let rec = TransactionRecord::new(
            UserId::new(),
            TransactionKind::Withdraw,
            12.5,
            TxReference::random(),
            Utc::now(),
        );
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "WITHDRAW");
        assert_eq!(json["amount"], 12.5);

        let back: TransactionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }
}
