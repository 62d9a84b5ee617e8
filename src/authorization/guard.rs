//! Fault boundary around calls into plugin code.
//!
//! Every call the adapter makes into a plugin runs through [`contain`] or
//! [`contain_panic`]. Both an `Err` return and an unwinding panic come back
//! as a [`Fault`] the caller has to match on.
//!
//! Containment does not silence the process panic hook. Each contained
//! panic still runs it, and the default hook prints to stderr. Hosts that
//! want plugin panics only in their `tracing` output should install their
//! own hook with `std::panic::set_hook`.

use crate::plugin::{PluginError, PluginResult};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Failure raised by plugin code.
#[derive(Clone, Debug)]
pub enum Fault {
    /// The plugin returned an error
    Rejected(PluginError),
    /// The plugin panicked
    Panicked(String),
}

impl Fault {
    /// Whether the fault was a panic rather than a returned error.
    pub fn is_panic(&self) -> bool {
        matches!(self, Fault::Panicked(_))
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fault::Rejected(err) => write!(f, "{}", err),
            Fault::Panicked(msg) => write!(f, "panic: {}", msg),
        }
    }
}

/// Result of a guarded plugin call.
pub type Outcome<T> = Result<T, Fault>;

/// Extract a human-readable message from a panic payload.
pub fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}

/// Run a fallible plugin call, folding errors and panics into [`Fault`].
pub fn contain<T>(f: impl FnOnce() -> PluginResult<T>) -> Outcome<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(Fault::Rejected(err)),
        Err(payload) => Err(Fault::Panicked(panic_message(payload))),
    }
}

/// Run an infallible plugin call, folding panics into [`Fault`].
pub fn contain_panic<T>(f: impl FnOnce() -> T) -> Outcome<T> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| Fault::Panicked(panic_message(payload)))
}
