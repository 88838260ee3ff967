use chrono::Utc;

pub const DEFAULT_LOOKBACK_MINUTES: u32 = 60;

/// The time range Zipkin aggregates dependency links over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    /// End of the window, epoch millis.
    pub end_ts: i64,
    /// Window length in millis.
    pub lookback: i64,
}

impl QueryWindow {
    /// Window of `minutes` ending at `until`, or now when `until` is absent.
    pub fn new(until: Option<i64>, minutes: u32) -> Self {
        Self {
            end_ts: until.unwrap_or_else(|| Utc::now().timestamp_millis()),
            lookback: i64::from(minutes) * 60 * 1000,
        }
    }
}

impl Default for QueryWindow {
    fn default() -> Self {
        Self::new(None, DEFAULT_LOOKBACK_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookback_in_millis() {
        let window = QueryWindow::new(Some(1_000), 60);
        assert_eq!(window.end_ts, 1_000);
        assert_eq!(window.lookback, 3_600_000);
    }

    #[test]
    fn test_until_defaults_to_now() {
        let before = Utc::now().timestamp_millis();
        let window = QueryWindow::new(None, 5);
        assert!(window.end_ts >= before);
        assert_eq!(window.lookback, 300_000);
    }

    #[test]
    fn test_default_window() {
        assert_eq!(QueryWindow::default().lookback, 3_600_000);
    }
}
