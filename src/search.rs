//! In-memory search and ordering over fetched users.
//!
//! These helpers never mutate the base collection; the visible collection is
//! always rebuilt from it so that shortening a query restores hidden matches.

use crate::model::UserRecord;

/// Field the directory can be ordered by. Only one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Email,
}

impl SortKey {
    pub fn field<'a>(&self, user: &'a UserRecord) -> &'a str {
        match self {
            SortKey::Name => &user.name,
            SortKey::Email => &user.email,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Email => "email",
        }
    }
}

/// Users whose name contains `query`, ignoring case. Empty query keeps everyone.
pub fn filter_by_name(base: &[UserRecord], query: &str) -> Vec<UserRecord> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return base.to_vec();
    }
    base.iter()
        .filter(|u| u.name.to_lowercase().contains(&q))
        .cloned()
        .collect()
}

/// Stable, case-insensitive ordering on the chosen field.
pub fn sort_users(users: &mut [UserRecord], key: SortKey) {
    users.sort_by_cached_key(|u| key.field(u).to_lowercase());
}

/// Rebuild the visible collection from scratch.
pub fn derive_visible(base: &[UserRecord], query: &str, sort: Option<SortKey>) -> Vec<UserRecord> {
    let mut visible = filter_by_name(base, query);
    if let Some(key) = sort {
        sort_users(&mut visible, key);
    }
    visible
}
