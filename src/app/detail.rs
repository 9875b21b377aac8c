//! Detail presenter for one user handed over from the directory.
//!
//! The screen shows a loading state for a fixed delay before revealing the
//! record. The delay is a deadline polled from the event loop; leaving the
//! screen cancels it, so a dismissed view can never flip to ready.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::UserRecord;

/// Default loading delay of the detail screen.
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_millis(1000);

/// One-shot deadline that can be cancelled before it fires.
#[derive(Clone, Copy, Debug)]
pub struct DelayTimer {
    deadline: Option<Instant>,
}

impl DelayTimer {
    pub fn start(now: Instant, delay: Duration) -> Self {
        Self {
            deadline: Some(now + delay),
        }
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct DetailView {
    user: Option<UserRecord>,
    ready: bool,
    timer: DelayTimer,
    map_host: String,
}

impl DetailView {
    /// Build the view for `user` and arm the loading delay.
    ///
    /// A missing record is not an error: the view renders blank fields.
    pub fn initialize(user: Option<UserRecord>, delay: Duration, map_host: &str, now: Instant) -> Self {
        debug!(id = user.as_ref().map(|u| u.id), "detail view opened");
        let mut view = Self {
            user,
            ready: false,
            timer: DelayTimer::start(now, delay),
            map_host: map_host.to_string(),
        };
        view.tick(now);
        view
    }

    /// Advance the loading delay. Returns `true` when the view just became ready.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timer.poll(now) {
            self.ready = true;
            return true;
        }
        false
    }

    /// Cancel any pending delay; called when navigating away.
    pub fn teardown(&mut self) {
        self.timer.cancel();
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    /// Screen title: the user's name, blank when unknown.
    pub fn title(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }

    /// Map link for the address, or `None` when there are no coordinates.
    pub fn resolve_map_link(&self) -> Option<String> {
        self.user.as_ref()?.map_link(&self.map_host)
    }

    pub fn resolve_website_link(&self) -> Option<String> {
        self.user.as_ref()?.website_link()
    }

    /// Labelled display rows; every value is blank when the record lacks it.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let u = self.user.clone().unwrap_or_default();
        vec![
            ("Name", u.name.clone()),
            ("Email", u.email.clone()),
            ("Phone Number", u.phone.clone()),
            ("Address", u.address_line()),
            ("Website", u.website.clone()),
        ]
    }

    pub fn company_fields(&self) -> Vec<(&'static str, String)> {
        let u = self.user.clone().unwrap_or_default();
        vec![
            ("Company Name", u.company_name().to_string()),
            ("Bio", u.company_bio().to_string()),
        ]
    }
}
