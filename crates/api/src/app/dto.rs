use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use aurum_vault::{Account, TransactionRecord, VaultState};

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Wire name of the kind (`DEPOSIT`, `WITHDRAW`, `REBALANCE`); parsed by
    /// the handler so unknown names map to a domain error.
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
}

pub fn account_to_json(account: &Account) -> JsonValue {
    json!({
        "cash_balance": account.cash_balance(),
        "gold_balance": account.gold_balance(),
    })
}

pub fn transaction_to_json(record: &TransactionRecord) -> JsonValue {
    json!({
        "id": record.id.to_string(),
        "type": record.kind.as_str(),
        "amount": record.amount,
        "reference": record.reference.as_str(),
        "recorded_at": record.recorded_at.to_rfc3339(),
    })
}

pub fn vault_state_to_json(state: &VaultState) -> JsonValue {
    json!({
        "id": state.id.to_string(),
        "status": state.status.as_str(),
        "current_apy": state.current_apy,
        "tvl": state.tvl,
        "gold_price": state.gold_price,
        "qie_price": state.qie_price,
        "analysis": state.analysis,
        "recorded_at": state.recorded_at.to_rfc3339(),
    })
}
