//! Mutex poisoning helpers
//!
//! Report collectors and exporter writers sit behind `std::sync::Mutex`. A
//! worker that panics while holding one poisons it; these helpers turn that
//! into an ordinary module error instead of a cascading panic.

use std::sync::LockResult;

/// Map a poisoned lock into an error built by `error_constructor`
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use drydock::core::sync::handle_mutex_poison;
/// use drydock::scanner::api::ScanError;
///
/// let results = Mutex::new(vec![1, 2, 3]);
/// let guard = handle_mutex_poison(results.lock(), |message| ScanError::Internal { message })
///     .unwrap();
/// assert_eq!(guard.len(), 3);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poisoned| {
        error_constructor(format!(
            "lock poisoned by a panicked task ({})",
            poisoned
        ))
    })
}
