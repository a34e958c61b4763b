use std::cell::Cell;

thread_local! {
    static FIXED_NOW_MILLIS: Cell<Option<i64>> = const { Cell::new(None) };
}

/// Overrides "now" (milliseconds since the Unix epoch) for the current thread.
///
/// Badge UIDs fold the current timestamp in last, and cache freshness compares stored
/// timestamps against the current time. Both would make fixtures non-reproducible, so tests
/// run under a fixed clock. `None` uses the system clock.
pub fn with_fixed_now_millis<R>(now: Option<i64>, f: impl FnOnce() -> R) -> R {
    FIXED_NOW_MILLIS.with(|cell| {
        let prev = cell.replace(now);
        let out = f();
        cell.set(prev);
        out
    })
}

pub(crate) fn now_millis() -> i64 {
    FIXED_NOW_MILLIS
        .with(|cell| cell.get())
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis())
}
