use crate::domain::ports::PaymentJournal;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One recorded journal event for a payment.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    Submission {
        transaction_id: Uuid,
        success: bool,
        at: SystemTime,
        elapsed: Duration,
    },
    Processing {
        transaction_id: Uuid,
        success: bool,
        at: SystemTime,
        reason: Option<String>,
    },
}

impl JournalEntry {
    pub fn transaction_id(&self) -> Uuid {
        match self {
            Self::Submission { transaction_id, .. } | Self::Processing { transaction_id, .. } => {
                *transaction_id
            }
        }
    }

    pub fn success(&self) -> bool {
        match self {
            Self::Submission { success, .. } | Self::Processing { success, .. } => *success,
        }
    }

    pub fn is_submission(&self) -> bool {
        matches!(self, Self::Submission { .. })
    }
}

/// A thread-safe in-memory journal.
///
/// Uses `Arc<RwLock<HashMap<Uuid, Vec<JournalEntry>>>>` to allow shared
/// concurrent access; entries are kept in arrival order per payment. Backs
/// the test suites and the demo driver; deployments plug in their own
/// `PaymentJournal`.
#[derive(Default, Clone)]
pub struct InMemoryJournal {
    entries: Arc<RwLock<HashMap<Uuid, Vec<JournalEntry>>>>,
}

impl InMemoryJournal {
    /// Creates a new, empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded for one payment, in arrival order.
    pub async fn entries(&self, payment_id: Uuid) -> Vec<JournalEntry> {
        let entries = self.entries.read().await;
        entries.get(&payment_id).cloned().unwrap_or_default()
    }

    /// Snapshot of the whole journal.
    pub async fn all(&self) -> HashMap<Uuid, Vec<JournalEntry>> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl PaymentJournal for InMemoryJournal {
    async fn record_submission(
        &self,
        payment_id: Uuid,
        success: bool,
        transaction_id: Uuid,
        at: SystemTime,
        elapsed: Duration,
    ) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries
            .entry(payment_id)
            .or_default()
            .push(JournalEntry::Submission {
                transaction_id,
                success,
                at,
                elapsed,
            });
        Ok(())
    }

    async fn record_processing_result(
        &self,
        payment_id: Uuid,
        success: bool,
        at: SystemTime,
        transaction_id: Uuid,
        reason: Option<String>,
    ) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries
            .entry(payment_id)
            .or_default()
            .push(JournalEntry::Processing {
                transaction_id,
                success,
                at,
                reason,
            });
        Ok(())
    }
}
