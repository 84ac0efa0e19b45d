//! `Date` header value service.
//!
//! Formatting an IMF-fixdate for every response is wasted work when thousands of
//! responses share the same second. The service keeps the formatted value behind an
//! [`ArcSwap`] and refreshes it from a background task, so readers never block and
//! never format.

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;

/// Maintains the current HTTP date string, refreshed periodically.
///
/// The refresh task is spawned on the tokio runtime that creates the service and is
/// aborted when the service is dropped.
pub struct DateService {
    current: Arc<ArcSwap<String>>,
    handle: tokio::task::JoinHandle<()>,
}

static DATE_SERVICE: Lazy<DateService> = Lazy::new(|| DateService::new_with_update_interval(Duration::from_millis(800)));

impl DateService {
    /// Returns the shared instance, creating it on first use.
    ///
    /// The first call must happen inside a tokio runtime.
    pub fn get_global_instance() -> &'static DateService {
        &DATE_SERVICE
    }

    pub fn new_with_update_interval(update_interval: Duration) -> Self {
        let current = Arc::new(ArcSwap::from_pointee(http_date_now()));
        let current_arc = Arc::clone(&current);

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(update_interval).await;
                current_arc.store(Arc::new(http_date_now()));
            }
        });

        DateService { current, handle }
    }

    /// The date as of the last refresh.
    pub fn current(&self) -> Arc<String> {
        self.current.load_full()
    }

    /// Runs `f` with the current date without cloning it.
    pub fn with_http_date<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let date = self.current.load();
        f(date.as_str())
    }
}

impl std::fmt::Debug for DateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateService").field("current", &self.current.load().as_str()).finish_non_exhaustive()
    }
}

impl Drop for DateService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn http_date_now() -> String {
    let mut buf = faf_http_date::get_date_buff_no_key();
    faf_http_date::get_date_no_key(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
