//! Ledger update rule: `(account, request) -> account | error`.
//!
//! Balances are tracked separately: deposits and withdrawals move USD cash,
//! and only an explicit rebalance converts cash into gold units at the quote
//! supplied with the request.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aurum_core::ValueObject;

use crate::quote::GoldPriceQuote;

/// Kind of ledger operation requested by the transaction recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    /// One-way conversion of cash into gold at the current quote.
    Rebalance,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
            TransactionKind::Rebalance => "REBALANCE",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEPOSIT" => Ok(TransactionKind::Deposit),
            "WITHDRAW" => Ok(TransactionKind::Withdraw),
            "REBALANCE" => Ok(TransactionKind::Rebalance),
            _ => Err(LedgerError::UnknownKind(s.to_string())),
        }
    }
}

/// Ledger rule failure. Returned to the caller untouched; the rule never
/// logs or retries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    /// Withdrawal or rebalance exceeds the cash balance.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },

    /// Amount is zero, negative, or not a finite number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Missing or non-positive gold price on rebalance.
    #[error("invalid gold price quote: {0}")]
    InvalidQuote(String),

    /// Transaction kind name not recognized.
    #[error("unknown transaction kind: {0:?}")]
    UnknownKind(String),
}

/// One user's holdings: USD cash and gold-pegged ARM units.
///
/// Both balances are finite and never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawAccount")]
pub struct Account {
    cash_balance: f64,
    gold_balance: f64,
}

#[derive(Deserialize)]
struct RawAccount {
    cash_balance: f64,
    gold_balance: f64,
}

impl TryFrom<RawAccount> for Account {
    type Error = LedgerError;

    fn try_from(raw: RawAccount) -> Result<Self, Self::Error> {
        Account::new(raw.cash_balance, raw.gold_balance)
    }
}

impl Account {
    pub fn new(cash_balance: f64, gold_balance: f64) -> Result<Self, LedgerError> {
        for (name, value) in [("cash_balance", cash_balance), ("gold_balance", gold_balance)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LedgerError::InvalidAmount(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(Self {
            cash_balance,
            gold_balance,
        })
    }

    /// Account with nothing deposited yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    pub fn gold_balance(&self) -> f64 {
        self.gold_balance
    }

    /// Apply the ledger rule to this snapshot (see [`apply`]).
    pub fn apply(&self, request: &LedgerRequest) -> Result<Account, LedgerError> {
        apply(self, request)
    }
}

impl ValueObject for Account {}

/// A requested ledger operation.
///
/// `gold_price` is only consulted for [`TransactionKind::Rebalance`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerRequest {
    pub kind: TransactionKind,
    pub amount: f64,
    pub gold_price: Option<f64>,
}

impl LedgerRequest {
    pub fn new(kind: TransactionKind, amount: f64) -> Self {
        Self {
            kind,
            amount,
            gold_price: None,
        }
    }

    pub fn deposit(amount: f64) -> Self {
        Self::new(TransactionKind::Deposit, amount)
    }

    pub fn withdraw(amount: f64) -> Self {
        Self::new(TransactionKind::Withdraw, amount)
    }

    pub fn rebalance(amount: f64, gold_price: f64) -> Self {
        Self::new(TransactionKind::Rebalance, amount).with_gold_price(gold_price)
    }

    pub fn with_gold_price(mut self, gold_price: f64) -> Self {
        self.gold_price = Some(gold_price);
        self
    }

    pub fn with_quote(self, quote: GoldPriceQuote) -> Self {
        self.with_gold_price(quote.usd_per_unit())
    }
}

/// Compute the account snapshot that results from `request`.
///
/// Checks run in order: amount, quote (rebalance only), then funds. The input
/// snapshot is never modified; on error the caller still holds it unchanged.
pub fn apply(account: &Account, request: &LedgerRequest) -> Result<Account, LedgerError> {
    let amount = request.amount;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be a finite positive number, got {amount}"
        )));
    }

    match request.kind {
        TransactionKind::Deposit => {
            let cash = account.cash_balance + amount;
            if !cash.is_finite() {
                return Err(LedgerError::InvalidAmount(format!(
                    "deposit of {amount} overflows the cash balance"
                )));
            }
            Ok(Account {
                cash_balance: cash,
                ..*account
            })
        }
        TransactionKind::Withdraw => {
            ensure_funds(account, amount)?;
            Ok(Account {
                cash_balance: account.cash_balance - amount,
                ..*account
            })
        }
        TransactionKind::Rebalance => {
            let quote = match request.gold_price {
                Some(price) => GoldPriceQuote::new(price)?,
                None => {
                    return Err(LedgerError::InvalidQuote(
                        "rebalance requires a gold price".to_string(),
                    ));
                }
            };
            ensure_funds(account, amount)?;

            let gold = account.gold_balance + quote.to_gold_units(amount);
            if !gold.is_finite() {
                return Err(LedgerError::InvalidQuote(format!(
                    "gold price {} yields a non-finite gold balance",
                    quote.usd_per_unit()
                )));
            }
            Ok(Account {
                cash_balance: account.cash_balance - amount,
                gold_balance: gold,
            })
        }
    }
}

fn ensure_funds(account: &Account, amount: f64) -> Result<(), LedgerError> {
    if amount > account.cash_balance {
        return Err(LedgerError::InsufficientFunds {
            requested: amount,
            available: account.cash_balance,
        });
    }
    Ok(())
}
