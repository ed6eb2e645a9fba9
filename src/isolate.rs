//! Fault-isolation boundary for decode backends.
//!
//! A decode call runs on its own named scoped thread. If the decode logic
//! terminates abnormally — a panic from an unreachable invariant or from a
//! decoder wrapper — the failure is observed at `join` and converted into an
//! ordinary [`ThumbError::DecodeCrash`], leaving the caller's state intact
//! and the process alive for subsequent calls. The boundary applies no
//! timeout: bounding latency is the caller's concern (wrap the whole
//! `process` call and discard the result; the guarded unit's later
//! completion cannot corrupt an abandoning caller because nothing is
//! shared with it).

use std::any::Any;
use std::thread;

use crate::error::ThumbError;

/// Run `op` inside the isolation boundary.
///
/// `label` names the guarded unit (it shows up in the thread name and in
/// crash reports).
pub(crate) fn guarded<T, F>(label: &str, op: F) -> Result<T, ThumbError>
where
    T: Send,
    F: FnOnce() -> Result<T, ThumbError> + Send,
{
    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name(format!("decode-{label}"))
            .spawn_scoped(scope, op)
            .map_err(ThumbError::Io)?;

        match handle.join() {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(label, message, "decode backend crashed");
                Err(ThumbError::DecodeCrash(format!("{label}: {message}")))
            }
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}
