//! Week documents: lazy default generation, atomic persistence, and the
//! three slot mutations (reserve, confirm, release), each serialized per
//! week key.

use std::sync::Arc;

use chrono::{NaiveTime, Utc};

use atelier_core::calendar::WeekKey;
use atelier_core::errors::AtelierResult;
use atelier_core::models::week::{WeekDocument, WeekTemplate, Weekday};

use crate::document::{decode, encode, DocumentStore};
use crate::locks::KeyLocks;

pub struct WeekStore {
    docs: Arc<dyn DocumentStore>,
    template: WeekTemplate,
    locks: KeyLocks,
}

impl WeekStore {
    pub fn new(docs: Arc<dyn DocumentStore>, template: WeekTemplate) -> Self {
        Self {
            docs,
            template,
            locks: KeyLocks::new(),
        }
    }

    /// Returns the persisted document for `week`, or a freshly synthesized
    /// default when none exists. The default is not persisted; that happens
    /// on first mutation.
    ///
    /// Undecodable bytes are logged and masked by a default document, so
    /// callers always receive something usable.
    pub async fn get_week(&self, week: WeekKey) -> AtelierResult<WeekDocument> {
        let id = week.to_string();
        match self.docs.get(&id).await? {
            Some(bytes) => match decode(&id, &bytes) {
                Ok(doc) => Ok(doc),
                Err(err) => {
                    tracing::error!(week = %week, error = %err, "corrupt week document, regenerating default");
                    Ok(WeekDocument::generate(week, &self.template))
                }
            },
            None => Ok(WeekDocument::generate(week, &self.template)),
        }
    }

    /// Serializes and atomically overwrites the week's persisted record.
    /// Encode and storage failures surface to the caller.
    pub async fn save_week(&self, doc: &WeekDocument) -> AtelierResult<()> {
        let id = doc.week.to_string();
        let bytes = encode(&id, doc)?;
        self.docs.put(&id, &bytes).await
    }

    /// Reserves the available slot at `(day, time)` for `client_id` and
    /// persists the whole document. `NotFound` when the slot is taken or
    /// absent — the expected outcome of a double-booking race.
    pub async fn reserve_slot(
        &self,
        week: WeekKey,
        day: Weekday,
        time: NaiveTime,
        client_id: &str,
    ) -> AtelierResult<()> {
        let _guard = self.locks.lock(&week.to_string()).await;
        let mut doc = self.get_week(week).await?;
        doc.reserve(day, time, client_id, Utc::now())?;
        tracing::debug!(week = %week, day = day.as_str(), time = %time.format("%H:%M"), client_id, "slot reserved");
        self.save_week(&doc).await
    }

    /// Marks a reserved slot confirmed. The explicit second mutation that
    /// accompanies request approval.
    pub async fn confirm_slot(
        &self,
        week: WeekKey,
        day: Weekday,
        time: NaiveTime,
    ) -> AtelierResult<()> {
        let _guard = self.locks.lock(&week.to_string()).await;
        let mut doc = self.get_week(week).await?;
        doc.confirm(day, time)?;
        self.save_week(&doc).await
    }

    /// Returns a speculatively reserved slot to available, the follow-up a
    /// rejection requires.
    pub async fn release_slot(
        &self,
        week: WeekKey,
        day: Weekday,
        time: NaiveTime,
    ) -> AtelierResult<()> {
        let _guard = self.locks.lock(&week.to_string()).await;
        let mut doc = self.get_week(week).await?;
        doc.release(day, time)?;
        tracing::debug!(week = %week, day = day.as_str(), time = %time.format("%H:%M"), "slot released");
        self.save_week(&doc).await
    }
}
