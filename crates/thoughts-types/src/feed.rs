use chrono::{DateTime, Duration, Utc};

/// Trailing time windows for the feed endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedWindow {
    Daily,
    Weekly,
    Monthly,
}

impl FeedWindow {
    pub fn span(self) -> Duration {
        match self {
            FeedWindow::Daily => Duration::hours(24),
            FeedWindow::Weekly => Duration::days(7),
            FeedWindow::Monthly => Duration::days(30),
        }
    }

    /// Inclusive lower bound on `created_at` for a feed requested at `now`.
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.span()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeedWindow::Daily => "daily",
            FeedWindow::Weekly => "weekly",
            FeedWindow::Monthly => "monthly",
        }
    }
}
