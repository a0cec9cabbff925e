//! Logging macros gated on a module-level `ENABLE_LOGS` const, so chatty
//! per-tick logging can be silenced per module without touching call sites.
//!
//! Define `const ENABLE_LOGS: bool = true;` in the using module, then
//! `use crate::{log_info, log_warn, log_error};`.

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
