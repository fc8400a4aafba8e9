//! Stateful facade tying the pure services to a store, a clock and the
//! session-scoped undo stack.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use coin_core::{
    ledger_warnings, AppDataStorage, ChangeNotifier, Clock, CoreError, DebtDay, DebtService,
    LedgerEvent, LedgerService, MigrationService, SessionUndoStack, SettingsService,
    SummaryService,
};
use coin_domain::{
    AppData, CategoryTotals, CoinRecord, DayProgress, PeriodStats, RecordMode, Settings,
    TodayProgress, UsageBreakdown,
};
use coin_storage_json::{load_app_data_from_path, save_app_data_to_path};

use crate::errors::{Result, WalletError};

/// Owns the in-memory ledger for one session.
///
/// Every mutation persists first and only then replaces the in-memory state,
/// so a failed save leaves both the store and memory as they were.
pub struct WalletManager {
    storage: Box<dyn AppDataStorage>,
    clock: Box<dyn Clock>,
    data: Option<AppData>,
    session: SessionUndoStack,
    notifier: ChangeNotifier,
}

impl WalletManager {
    pub fn new(storage: Box<dyn AppDataStorage>, clock: Box<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            data: None,
            session: SessionUndoStack::new(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Creates the manager and loads whatever the store holds.
    pub fn open(storage: Box<dyn AppDataStorage>, clock: Box<dyn Clock>) -> Result<Self> {
        let mut manager = Self::new(storage, clock);
        manager.reload()?;
        Ok(manager)
    }

    /// Re-reads the store. Returns anomalies found in the loaded ledger.
    pub fn reload(&mut self) -> Result<Vec<String>> {
        self.data = self.storage.load()?;
        self.session.clear();
        let warnings = self.data.as_ref().map(ledger_warnings).unwrap_or_default();
        for warning in &warnings {
            warn!(%warning, "ledger anomaly");
        }
        Ok(warnings)
    }

    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Result<&AppData> {
        self.data.as_ref().ok_or(WalletError::NotInitialized)
    }

    pub fn settings(&self) -> Result<&Settings> {
        Ok(&self.data()?.settings)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn revision(&self) -> u64 {
        self.notifier.revision()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(LedgerEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener);
    }

    /// Starts a ledger from `initial_coin_amount`.
    ///
    /// Allowed while no ledger exists or while the existing one has no records.
    pub fn initialize(&mut self, initial_coin_amount: i64) -> Result<()> {
        if initial_coin_amount < 0 {
            return Err(WalletError::InvalidInput(
                "initial coin amount must not be negative".into(),
            ));
        }
        if let Some(existing) = &self.data {
            if !existing.records.is_empty() {
                return Err(WalletError::AlreadyInitialized {
                    records: existing.records.len(),
                });
            }
        }
        let settings = self
            .data
            .as_ref()
            .map(|existing| existing.settings.clone())
            .unwrap_or_default();
        let data = SettingsService::apply(&LedgerService::initialize(initial_coin_amount), settings);
        self.persist(data)?;
        info!(initial_coin_amount, "wallet initialized");
        self.notifier.notify(LedgerEvent::Initialized);
        Ok(())
    }

    pub fn last_coin_amount(&self) -> Result<i64> {
        Ok(LedgerService::last_coin_amount(self.data()?))
    }

    /// Records a new balance reading. `date` defaults to today.
    pub fn add_record(
        &mut self,
        date: Option<NaiveDate>,
        new_coin_amount: i64,
        mode: RecordMode,
    ) -> Result<CoinRecord> {
        if new_coin_amount < 0 {
            return Err(WalletError::InvalidInput(
                "coin amount must not be negative".into(),
            ));
        }
        let date = date.unwrap_or_else(|| self.clock.today());
        let (next, record) = LedgerService::add_record(
            self.data()?,
            date,
            new_coin_amount,
            mode,
            self.clock.as_ref(),
        )?;
        self.persist(next)?;
        self.session.push(record.id.clone());
        info!(id = %record.id, %date, %mode, "record added");
        self.notifier.notify(LedgerEvent::RecordAdded);
        Ok(record)
    }

    pub fn has_undo(&self) -> bool {
        self.session.has_undo()
    }

    /// The record the next [`undo`](Self::undo) would remove.
    pub fn pending_undo(&self) -> Option<&CoinRecord> {
        let id = self.session.peek()?;
        self.data.as_ref()?.record(id)
    }

    /// Removes the newest record written in this session.
    pub fn undo(&mut self) -> Result<CoinRecord> {
        let mut session = self.session.clone();
        match session.undo_last_session_record(self.data()?) {
            Ok((next, removed)) => {
                self.persist(next)?;
                self.session = session;
                self.notifier.notify(LedgerEvent::RecordUndone);
                Ok(removed)
            }
            Err(err @ CoreError::RecordNotFound(_)) => {
                self.session = session;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save_settings(&mut self, settings: Settings) -> Result<()> {
        for goal in [
            settings.primary_goal,
            settings.secondary_goal,
            settings.daily_goal,
        ]
        .into_iter()
        .flatten()
        .chain(
            [settings.primary_goals, settings.secondary_goals, settings.daily_goals]
                .into_iter()
                .flatten()
                .flatten(),
        ) {
            if goal < 0 {
                return Err(WalletError::InvalidInput("goals must not be negative".into()));
            }
        }
        let next = SettingsService::apply(self.data()?, settings);
        self.persist(next)?;
        self.notifier.notify(LedgerEvent::SettingsSaved);
        Ok(())
    }

    /// Restarts debt accrual from today and returns that date.
    pub fn reset_debt(&mut self) -> Result<NaiveDate> {
        let today = self.clock.today();
        let next = SettingsService::reset_debt(self.data()?, today);
        self.persist(next)?;
        self.notifier.notify(LedgerEvent::SettingsSaved);
        Ok(today)
    }

    pub fn debt(&self) -> Result<i64> {
        let data = self.data()?;
        Ok(DebtService::calculate_debt(
            &data.records,
            &data.settings,
            self.clock.today(),
        ))
    }

    pub fn debt_timeline(&self) -> Result<Vec<DebtDay>> {
        let data = self.data()?;
        Ok(DebtService::debt_timeline(
            &data.records,
            &data.settings,
            self.clock.today(),
        ))
    }

    pub fn totals(&self) -> Result<CategoryTotals> {
        Ok(SummaryService::totals(&self.data()?.records))
    }

    pub fn weekly_stats(&self) -> Result<Vec<PeriodStats>> {
        Ok(SummaryService::weekly_stats(&self.data()?.records))
    }

    pub fn monthly_stats(&self) -> Result<Vec<PeriodStats>> {
        Ok(SummaryService::monthly_stats(&self.data()?.records))
    }

    pub fn usage_breakdown(&self) -> Result<UsageBreakdown> {
        Ok(SummaryService::usage_breakdown(&self.data()?.records))
    }

    pub fn recent_days(&self, days: u32) -> Result<Vec<DayProgress>> {
        let data = self.data()?;
        Ok(SummaryService::recent_days(
            &data.records,
            &data.settings,
            self.clock.today(),
            days,
        ))
    }

    pub fn today_progress(&self) -> Result<TodayProgress> {
        Ok(SummaryService::today_progress(
            self.data()?,
            self.clock.today(),
        ))
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(MigrationService::export_data(self.data()?)?)
    }

    pub fn export_to_path(&self, path: &Path) -> Result<()> {
        save_app_data_to_path(self.data()?, path)?;
        info!(path = %path.display(), "ledger exported");
        Ok(())
    }

    /// Replaces the whole ledger. On any schema problem nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let data = MigrationService::import_data(json)?;
        self.replace(data)
    }

    pub fn import_from_path(&mut self, path: &Path) -> Result<()> {
        let data = load_app_data_from_path(path)?;
        self.replace(data)?;
        info!(path = %path.display(), "ledger imported");
        Ok(())
    }

    fn replace(&mut self, data: AppData) -> Result<()> {
        for warning in ledger_warnings(&data) {
            warn!(%warning, "imported ledger anomaly");
        }
        self.persist(data)?;
        // Session ids refer to the replaced ledger.
        self.session.clear();
        self.notifier.notify(LedgerEvent::DataImported);
        Ok(())
    }

    fn persist(&mut self, data: AppData) -> Result<()> {
        self.storage.save(&data)?;
        self.data = Some(data);
        Ok(())
    }
}
