//! In-process change notification so views can refresh after writes.

use std::fmt;

/// What kind of write just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEvent {
    Initialized,
    RecordAdded,
    RecordUndone,
    SettingsSaved,
    DataImported,
}

impl LedgerEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            LedgerEvent::Initialized => "ledger:initialized",
            LedgerEvent::RecordAdded => "ledger:record-added",
            LedgerEvent::RecordUndone => "ledger:record-undone",
            LedgerEvent::SettingsSaved => "settings:saved",
            LedgerEvent::DataImported => "ledger:imported",
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Listener = Box<dyn Fn(LedgerEvent) + Send + Sync>;

/// Fans a change out to every subscriber and counts revisions.
///
/// Listeners run synchronously, in subscription order, after the write
/// has been persisted.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Listener>,
    revision: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(LedgerEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn notify(&mut self, event: LedgerEvent) {
        self.revision += 1;
        tracing::debug!(%event, revision = self.revision, "ledger changed");
        for listener in &self.listeners {
            listener(event);
        }
    }

    /// Number of notifications sent so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}
