use eduverse_kernel::{AgeGroup, BuildError, Complexity, validate_topic};
use std::fmt;
use std::time::{Duration, Instant};

/// Identity of one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket#{}", self.0)
    }
}

/// A request waiting out its simulated latency.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGeneration {
    pub ticket: Ticket,
    /// Already trimmed and known to be non-empty.
    pub topic: String,
    pub age_group: AgeGroup,
    pub complexity: Complexity,
    pub ready_at: Instant,
}

/// Single-slot, cancellable generation task.
///
/// Generation is simulated: a request becomes ready after a fixed delay. Only
/// the latest request can complete; issuing a new one cancels the old.
#[derive(Debug)]
pub struct Generator {
    delay: Duration,
    next_ticket: u64,
    pending: Option<PendingGeneration>,
}

impl Generator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_ticket: 1,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue a request. An empty topic is rejected without disturbing any
    /// request already in flight.
    pub fn request(
        &mut self,
        topic: &str,
        age_group: AgeGroup,
        complexity: Complexity,
        now: Instant,
    ) -> Result<Ticket, BuildError> {
        let topic = validate_topic(topic)?;
        if let Some(old) = self.cancel() {
            tracing::debug!(%old, "superseded by a newer request");
        }
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(PendingGeneration {
            ticket,
            topic: topic.to_string(),
            age_group,
            complexity,
            ready_at: now + self.delay,
        });
        tracing::debug!(%ticket, topic, "generation requested");
        Ok(ticket)
    }

    /// Drop the in-flight request. Returns its ticket if there was one.
    pub fn cancel(&mut self) -> Option<Ticket> {
        let cancelled = self.pending.take().map(|p| p.ticket);
        if let Some(ticket) = cancelled {
            tracing::debug!(%ticket, "generation cancelled");
        }
        cancelled
    }

    pub fn pending(&self) -> Option<&PendingGeneration> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the in-flight request becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.ready_at)
    }

    /// Take the request if it is ready at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<PendingGeneration> {
        if self.deadline()? <= now {
            self.pending.take()
        } else {
            None
        }
    }
}
