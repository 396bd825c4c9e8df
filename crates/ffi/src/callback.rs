//! Progress callback support for the C API.

use crate::types::SnapshotJson;
use std::cell::Cell;
use std::ffi::CString;
use std::os::raw::{c_char, c_void};

/// Progress callback invoked after every unit commit.
///
/// Receives the snapshot as a null-terminated JSON string, valid only for the
/// duration of the call, and the caller's `user_data`.
/// Return non-zero to continue, zero to cancel.
pub type UbinfitProgressCallback =
    Option<unsafe extern "C" fn(snapshot_json: *const c_char, user_data: *mut c_void) -> i32>;

/// Wraps a C callback and remembers whether it asked to cancel.
pub(crate) struct CallbackWrapper {
    callback: UbinfitProgressCallback,
    user_data: *mut c_void,
    cancelled: Cell<bool>,
}

impl CallbackWrapper {
    pub(crate) fn new(callback: UbinfitProgressCallback, user_data: *mut c_void) -> Self {
        Self {
            callback,
            user_data,
            cancelled: Cell::new(false),
        }
    }

    /// Sends a snapshot to the callback. Returns `false` if the run should stop.
    ///
    /// A missing callback always continues. A snapshot that cannot be encoded
    /// is skipped rather than aborting the run.
    pub(crate) fn invoke(&self, snapshot: &SnapshotJson) -> bool {
        let Some(callback) = self.callback else {
            return true;
        };

        let json = match serde_json::to_string(snapshot).map(CString::new) {
            Ok(Ok(json)) => json,
            _ => {
                log::warn!("Skipping progress snapshot {}: encoding failed", snapshot.sequence);
                return true;
            }
        };

        // SAFETY: the caller of the `*_with_progress` entry point guarantees
        // that `callback` and `user_data` are valid for the whole run.
        let keep_going = unsafe { callback(json.as_ptr(), self.user_data) } != 0;
        if !keep_going {
            self.cancelled.set(true);
        }
        keep_going
    }

    /// Whether the callback returned zero at some point.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
