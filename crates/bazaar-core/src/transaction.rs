//! # Transactions
//!
//! A `Transaction` captures one purchase or sale attempt: who, what, how
//! much, when, and how it ended. The pricing engine's outputs feed into it,
//! but the lifecycle itself is thin by design - the orchestrator runs the
//! external checks (funds, inventory space) and sets the terminal status
//! exactly once. The core records, it does not referee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Status
// =============================================================================

/// Outcome of a transaction attempt.
///
/// A transaction starts in `Processing` and moves to exactly one terminal
/// value. The core trusts the orchestrator to perform that single
/// transition; `is_terminal` is provided so callers can assert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Never-started marker; a constructed transaction skips straight past
    /// this to `Processing`.
    Invalid,
    /// Created, checks still running.
    Processing,
    /// The player has no room to receive the goods.
    PlayerSpaceFullFailure,
    /// The requested quantity was rejected (non-positive or over limits).
    PlayerInvalidQuantityFailure,
    /// The player cannot afford the computed price.
    PlayerFundsFailure,
    /// The market cannot absorb more stock of this good.
    MarketStockFullFailure,
    /// The market has too little stock to fill the purchase.
    MarketStockEmptyFailure,
    /// Completed; stock has been mutated.
    Success,
}

impl Status {
    /// Everything except `Processing` ends the transaction.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Status::Processing)
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Processing
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Purchase or sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Purchase,
    Sale,
}

/// One purchase/sale attempt, owned by the caller for the duration of one
/// command.
///
/// The actor is an opaque identity the core never interprets; the target is
/// the good's catalog id (the orchestrator owns the catalog and resolves
/// it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    actor: String,
    kind: TransactionType,
    good_id: u32,
    quantity: i32,
    created_at: DateTime<Utc>,
    status: Status,
}

impl Transaction {
    /// Opens a transaction in `Processing`.
    pub fn new(
        actor: impl Into<String>,
        kind: TransactionType,
        good_id: u32,
        quantity: i32,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            actor: actor.into(),
            kind,
            good_id,
            quantity,
            created_at: Utc::now(),
            status: Status::Processing,
        }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    #[inline]
    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    #[inline]
    pub fn good_id(&self) -> u32 {
        self.good_id
    }

    #[inline]
    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Records the outcome. The orchestrator calls this exactly once with a
    /// terminal status; the core does not enforce that contract.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_is_processing() {
        let tx = Transaction::new("player-1", TransactionType::Purchase, 7, 10);
        assert_eq!(tx.status(), Status::Processing);
        assert!(!tx.status().is_terminal());
        assert_eq!(tx.actor(), "player-1");
        assert_eq!(tx.kind(), TransactionType::Purchase);
        assert_eq!(tx.good_id(), 7);
        assert_eq!(tx.quantity(), 10);
    }

    #[test]
    fn test_terminal_transition() {
        let mut tx = Transaction::new("player-1", TransactionType::Sale, 7, 3);
        tx.set_status(Status::Success);
        assert!(tx.status().is_terminal());
        assert!(tx.status().is_success());

        let mut failed = Transaction::new("player-2", TransactionType::Purchase, 7, 3);
        failed.set_status(Status::PlayerFundsFailure);
        assert!(failed.status().is_terminal());
        assert!(!failed.status().is_success());
    }

    #[test]
    fn test_every_status_but_processing_is_terminal() {
        for status in [
            Status::Invalid,
            Status::PlayerSpaceFullFailure,
            Status::PlayerInvalidQuantityFailure,
            Status::PlayerFundsFailure,
            Status::MarketStockFullFailure,
            Status::MarketStockEmptyFailure,
            Status::Success,
        ] {
            assert!(status.is_terminal(), "{status:?}");
        }
        assert!(!Status::Processing.is_terminal());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&Status::MarketStockEmptyFailure).unwrap();
        assert_eq!(json, "\"market_stock_empty_failure\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::MarketStockEmptyFailure);
    }

    #[test]
    fn test_transaction_round_trips_through_json() {
        let tx = Transaction::new("player-1", TransactionType::Sale, 7, 5);
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), tx.id());
        assert_eq!(back.status(), tx.status());
        assert_eq!(back.created_at(), tx.created_at());
    }
}
