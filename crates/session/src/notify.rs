use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub expires_at: Instant,
}

/// Queue of toasts, oldest first. Expired entries are dropped on `prune`.
#[derive(Debug)]
pub struct Notifications {
    ttl: Duration,
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match level {
            Level::Error => tracing::warn!(%message, "notify"),
            _ => tracing::info!(%message, "notify"),
        }
        self.queue.push_back(Notification {
            level,
            message,
            expires_at: now + self.ttl,
        });
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.push(Level::Success, message, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.push(Level::Error, message, now);
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) {
        self.push(Level::Info, message, now);
    }

    /// Drop everything that has expired by `now`.
    pub fn prune(&mut self, now: Instant) {
        self.queue.retain(|n| n.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Earliest expiry, so an idle loop knows when to wake.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.queue.iter().map(|n| n.expires_at).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_ttl() {
        let t0 = Instant::now();
        let mut n = Notifications::new(Duration::from_secs(4));
        n.success("done", t0);
        n.error("oops", t0 + Duration::from_secs(2));
        assert_eq!(n.len(), 2);

        n.prune(t0 + Duration::from_secs(4));
        assert_eq!(n.len(), 1);
        assert_eq!(n.iter().next().unwrap().level, Level::Error);

        n.prune(t0 + Duration::from_secs(6));
        assert!(n.is_empty());
    }

    #[test]
    fn next_expiry_is_earliest() {
        let t0 = Instant::now();
        let mut n = Notifications::new(Duration::from_secs(4));
        assert_eq!(n.next_expiry(), None);
        n.info("a", t0 + Duration::from_secs(1));
        n.info("b", t0);
        assert_eq!(n.next_expiry(), Some(t0 + Duration::from_secs(4)));
    }
}
