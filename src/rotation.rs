//! Daily rotation of the standup order.
//!
//! The order is a pure function of the user list and the day of the month, so
//! everyone opening the dashboard on the same day sees the same first speaker
//! and no state needs to be stored.

use crate::jira::User;

/// Account type Jira assigns to real people (as opposed to apps and bots).
pub const HUMAN_ACCOUNT_TYPE: &str = "atlassian";

/// Rotates `items` left by `day % items.len()`.
///
/// `rotated[i] == items[(i + day) % items.len()]`. An empty slice yields an
/// empty vector.
pub fn rotate<T: Clone>(items: &[T], day: u32) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let offset = day as usize % items.len();
    items[offset..]
        .iter()
        .chain(&items[..offset])
        .cloned()
        .collect()
}

/// Users that take part in the standup: active human accounts, order kept.
pub fn eligible_users(users: Vec<User>) -> Vec<User> {
    users
        .into_iter()
        .filter(|user| user.active && user.account_type == HUMAN_ACCOUNT_TYPE)
        .collect()
}

pub fn standup_order(users: Vec<User>, day_of_month: u32) -> Vec<User> {
    rotate(&eligible_users(users), day_of_month)
}
