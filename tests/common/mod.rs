#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use chrono::{DateTime, NaiveDate, Utc};
use coin_core::{AppDataStorage, Clock, CoreError, FixedClock};
use coin_domain::AppData;
use coin_ledger::WalletManager;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory store shared between a test and the manager under test.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<Option<AppData>>>,
    saves: Arc<AtomicUsize>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn stored(&self) -> Option<AppData> {
        self.data.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl AppDataStorage for MemoryStorage {
    fn load(&self) -> Result<Option<AppData>, CoreError> {
        Ok(self.stored())
    }

    fn save(&self, data: &AppData) -> Result<(), CoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("disk full".into()));
        }
        *self.data.lock().unwrap() = Some(data.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Clock the test can move forward while the manager holds it.
#[derive(Clone)]
pub struct SharedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl SharedClock {
    pub fn at(day: NaiveDate) -> Self {
        Self {
            now: Arc::new(Mutex::new(FixedClock::at_date(day).now())),
        }
    }

    pub fn set_date(&self, day: NaiveDate) {
        *self.now.lock().unwrap() = FixedClock::at_date(day).now();
    }
}

impl Clock for SharedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn open_manager(storage: &MemoryStorage, clock: &SharedClock) -> WalletManager {
    WalletManager::open(Box::new(storage.clone()), Box::new(clock.clone())).expect("open")
}
