//! Paths of the backend endpoints, relative to the API base URI.
//!
//! The backend routes every path with a trailing slash.

pub const LOGIN: &str = "auth/login/";
pub const REGISTER: &str = "auth/register/";
pub const REFRESH: &str = "auth/refresh/";
pub const LOGOUT: &str = "auth/logout/";
pub const VERIFY_EMAIL: &str = "auth/verify-email/";
pub const PASSWORD_RESET: &str = "auth/passwordreset/";
pub const PASSWORD_RESET_DONE: &str = "auth/password_reset_done/";

pub const PROFILE: &str = "profile/";
pub const PROFILE_EVENTS: &str = "profile/events/";

pub const EVENT_CREATE: &str = "event/create/";
pub const EVENTS_UNPUBLISHED: &str = "event/unpublished/";
pub const EVENTS_PUBLISHED: &str = "event/published/";
pub const EVENTS_SEARCH: &str = "event/search/";

pub fn event(event_id: u64) -> String {
    format!("event/{event_id}/")
}

pub fn publish(event_id: u64) -> String {
    format!("event/{event_id}/publish/")
}

pub fn categories(event_id: u64) -> String {
    format!("event/{event_id}/categories/")
}

pub fn category(event_id: u64, category_id: u64) -> String {
    format!("event/{event_id}/categories/{category_id}/")
}

pub fn contestants(event_id: u64) -> String {
    format!("event/{event_id}/contestants/")
}

pub fn contestant(event_id: u64, contestant_id: u64) -> String {
    format!("event/{event_id}/contestants/{contestant_id}/")
}

pub fn public_event(event_id: u64) -> String {
    format!("event/public/{event_id}/")
}

pub fn results(event_id: u64) -> String {
    format!("event/{event_id}/results/")
}

pub fn vote(event_id: u64, contestant_id: u64) -> String {
    format!("event/{event_id}/vote/{contestant_id}/")
}

pub fn analytics_dashboard(event_id: u64) -> String {
    format!("analytics/dashboard/{event_id}/")
}

pub fn live_votes(event_id: u64) -> String {
    format!("analytics/live-votes/{event_id}/")
}

pub fn leaderboard(event_id: u64) -> String {
    format!("analytics/leaderboard/{event_id}/")
}
