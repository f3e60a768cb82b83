use serde::Serialize;

/// Counters shown on the admin landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardDto {
    pub projects: usize,
    pub categories: usize,
    pub unread_messages: usize,
    pub pending_reviews: usize,
}
