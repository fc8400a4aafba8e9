//! Undo bounded to the records written during the current session.
//!
//! The stack lives in memory only, so it disappears with the process that
//! owns it. Records from earlier sessions are never reachable through undo.

use tracing::{info, warn};

use coin_domain::{AppData, CoinRecord};

use crate::{ledger_service::LedgerService, CoreError};

/// LIFO of record ids created in this session.
#[derive(Debug, Clone, Default)]
pub struct SessionUndoStack {
    ids: Vec<String>,
}

impl SessionUndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>) {
        self.ids.push(id.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.ids.pop()
    }

    pub fn peek(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }

    pub fn has_undo(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forgets every pending undo, e.g. after the ledger was replaced by an import.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Pops the newest session id and removes that exact record from `data`.
    ///
    /// The id is consumed even when the record is missing, so a stale id can
    /// never block older entries on the stack.
    pub fn undo_last_session_record(
        &mut self,
        data: &AppData,
    ) -> Result<(AppData, CoinRecord), CoreError> {
        let id = self.pop().ok_or(CoreError::NoSessionUndo)?;
        match LedgerService::remove_record(data, &id) {
            Ok((next, removed)) => {
                info!(id = %removed.id, date = %removed.date, "undid session record");
                Ok((next, removed))
            }
            Err(err) => {
                warn!(%id, "session undo target missing from ledger");
                Err(err)
            }
        }
    }
}
