use std::sync::Arc;

use tokio::sync::Mutex;

use prep_core::model::PanelSessionRecord;
use storage::keys;
use storage::repository::{KeyValueStore, load, save};

use crate::confirmation::Confirmation;
use crate::error::HistoryError;

/// Completed panels, newest first, written through to `panel-simulation-history`.
///
/// Records are never edited; the only removal is clearing everything.
pub struct PanelHistory {
    store: Arc<dyn KeyValueStore>,
    records: Mutex<Vec<PanelSessionRecord>>,
}

impl PanelHistory {
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the stored history cannot be read.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, HistoryError> {
        let mut records: Vec<PanelSessionRecord> = load(store.as_ref(), keys::PANEL_HISTORY)
            .await?
            .unwrap_or_default();
        sort_newest_first(&mut records);
        Ok(Self {
            store,
            records: Mutex::new(records),
        })
    }

    pub async fn list(&self) -> Vec<PanelSessionRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the write fails; history is unchanged.
    pub async fn append(&self, record: PanelSessionRecord) -> Result<(), HistoryError> {
        let mut records = self.records.lock().await;
        let mut next = Vec::with_capacity(records.len() + 1);
        next.push(record);
        next.extend(records.iter().cloned());
        sort_newest_first(&mut next);
        save(self.store.as_ref(), keys::PANEL_HISTORY, &next).await?;
        *records = next;
        tracing::debug!(total = records.len(), "panel recorded");
        Ok(())
    }

    /// Remove every record. Returns whether anything was cleared.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the write fails.
    pub async fn clear(&self, confirmation: Confirmation) -> Result<bool, HistoryError> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }
        let mut records = self.records.lock().await;
        save(self.store.as_ref(), keys::PANEL_HISTORY, &Vec::<PanelSessionRecord>::new()).await?;
        records.clear();
        tracing::info!("panel history cleared");
        Ok(true)
    }
}

// stable, so records with equal timestamps keep insertion order
fn sort_newest_first(records: &mut [PanelSessionRecord]) {
    records.sort_by(|a, b| b.completed_at().cmp(&a.completed_at()));
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use prep_core::model::{PanelRecordId, QuestionId, QuestionKind, QuestionRef};
    use prep_core::time::fixed_now;
    use storage::repository::InMemoryStore;

    fn record(minutes_after: i64) -> PanelSessionRecord {
        PanelSessionRecord::new(
            PanelRecordId::generate(),
            fixed_now() + Duration::minutes(minutes_after),
            vec![QuestionRef {
                id: QuestionId::generate(),
                question_text: "Why us?".into(),
                kind: QuestionKind::Freestyle,
                category: "Fit".into(),
            }],
            30,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn append_keeps_newest_first_and_persists() {
        let store = Arc::new(InMemoryStore::new());
        let history = PanelHistory::load(store.clone()).await.unwrap();
        assert!(history.is_empty().await);

        let older = record(0);
        let newer = record(10);
        history.append(newer.clone()).await.unwrap();
        history.append(older.clone()).await.unwrap();
        assert_eq!(history.list().await, vec![newer.clone(), older.clone()]);

        let reloaded = PanelHistory::load(store).await.unwrap();
        assert_eq!(reloaded.list().await, vec![newer, older]);
    }

    #[tokio::test]
    async fn clear_needs_confirmation() {
        let store = Arc::new(InMemoryStore::new());
        let history = PanelHistory::load(store).await.unwrap();
        history.append(record(0)).await.unwrap();

        assert!(!history.clear(Confirmation::Declined).await.unwrap());
        assert_eq!(history.len().await, 1);

        assert!(history.clear(Confirmation::Confirmed).await.unwrap());
        assert!(history.is_empty().await);
    }
}
