//! Clock and control number management

use chrono::{Local, NaiveDateTime};

/// Source of envelope timestamps
pub trait Clock {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;
}

/// Clock reading the local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at one instant, for reproducible output
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// ISA09 date (YYMMDD)
pub fn isa_date(at: NaiveDateTime) -> String {
    at.format("%y%m%d").to_string()
}

/// ISA10 time (HHMM)
pub fn isa_time(at: NaiveDateTime) -> String {
    at.format("%H%M").to_string()
}

/// GS04 date (CCYYMMDD)
pub fn gs_date(at: NaiveDateTime) -> String {
    at.format("%Y%m%d").to_string()
}

/// GS05 time (HHMMSS)
pub fn gs_time(at: NaiveDateTime) -> String {
    at.format("%H%M%S").to_string()
}

/// Nine-digit interchange control number: YYMMDDHHMM without its first digit
pub fn interchange_control_number(at: NaiveDateTime) -> String {
    let stamp = at.format("%y%m%d%H%M").to_string();
    stamp[1..].to_string()
}

/// Control numbers handed out during one generation run
#[derive(Debug, Default)]
pub struct ControlNumbers {
    interchange: String,
    transaction_counter: u32,
}

impl ControlNumbers {
    /// Create a fresh set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive and remember the interchange control number
    pub fn start_interchange(&mut self, at: NaiveDateTime) -> &str {
        self.interchange = interchange_control_number(at);
        &self.interchange
    }

    /// Interchange control number of the current interchange
    pub fn interchange(&self) -> &str {
        &self.interchange
    }

    /// Advance to the next transaction set control number
    pub fn next_transaction(&mut self) -> String {
        self.transaction_counter += 1;
        self.transaction()
    }

    /// Current transaction set control number, zero-padded to four digits
    pub fn transaction(&self) -> String {
        format!("{:04}", self.transaction_counter)
    }
}
