use crate::action::Action;
use crate::generation::Generator;
use crate::notify::Notifications;
use eduverse_kernel::{BuildError, WorldBuilder, card};
use eduverse_scene::{LoopControl, SceneViewer, ViewerConfig};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("no prebuilt world with id {0}")]
    UnknownCard(u32),
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Simulated latency between a generate request and its world.
    pub generation_delay: Duration,
    /// How long a toast stays up.
    pub notification_ttl: Duration,
    pub viewer: ViewerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            generation_delay: Duration::from_millis(3000),
            notification_ttl: Duration::from_secs(4),
            viewer: ViewerConfig::default(),
        }
    }
}

/// Result of one [`Session::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    pub control: LoopControl,
    /// A world was swapped in during this tick.
    pub world_changed: bool,
    /// Earliest moment something time-based needs attention, even while
    /// the viewer is suspended.
    pub next_wake: Option<Instant>,
}

/// Owned application context. One per window.
pub struct Session {
    config: SessionConfig,
    builder: WorldBuilder,
    generator: Generator,
    viewer: SceneViewer,
    notifications: Notifications,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let viewer = SceneViewer::new(config.viewer.clone());
        Self {
            builder: WorldBuilder::new(),
            generator: Generator::new(config.generation_delay),
            notifications: Notifications::new(config.notification_ttl),
            viewer,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn viewer(&self) -> &SceneViewer {
        &self.viewer
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Apply one user action at time `now`.
    ///
    /// Failures are also reported as error toasts, so front ends may ignore
    /// the returned error.
    pub fn apply(&mut self, action: Action, now: Instant) -> Result<(), SessionError> {
        match action {
            Action::Generate {
                topic,
                age_group,
                complexity,
            } => match self.generator.request(&topic, age_group, complexity, now) {
                Ok(_) => self.viewer.begin_generation(),
                Err(e) => {
                    self.notifications.error(e.to_string(), now);
                    return Err(e.into());
                }
            },
            Action::CancelGeneration => {
                if self.generator.cancel().is_some() {
                    self.viewer.cancel_generation();
                }
            }
            Action::SelectPrebuilt(id) => {
                let Some(card) = card(id) else {
                    self.notifications.error(format!("Unknown world #{id}"), now);
                    return Err(SessionError::UnknownCard(id));
                };
                if self.generator.cancel().is_some() {
                    self.viewer.cancel_generation();
                }
                let world = self.builder.from_card(card)?;
                self.viewer.show_world(world);
            }
            Action::TogglePlayback => self.viewer.toggle_playback(),
            Action::Pause => self.viewer.pause(),
            Action::Resume => self.viewer.resume(),
            Action::ResetCamera => self.viewer.reset_camera(),
            Action::SelectObject(name) => {
                if !self.viewer.select_object(&name) {
                    tracing::debug!(name = %name, "no such object in the current world");
                }
            }
            Action::Resize { width, height } => self.viewer.resize(width, height),
            Action::Noop => {}
        }
        Ok(())
    }

    /// Advance time: complete a ready generation, expire toasts and step
    /// the viewer by `dt` seconds.
    pub fn tick(&mut self, now: Instant, dt: f32) -> FrameOutcome {
        self.notifications.prune(now);

        let mut world_changed = false;
        if let Some(done) = self.generator.poll(now) {
            match self
                .builder
                .build(&done.topic, done.age_group, done.complexity)
            {
                Ok(world) => {
                    self.viewer.show_world(world);
                    self.notifications.success(
                        format!("Generated \"{}\" learning world!", done.topic),
                        now,
                    );
                    world_changed = true;
                }
                Err(e) => {
                    self.viewer.cancel_generation();
                    self.notifications.error(e.to_string(), now);
                }
            }
        }

        let control = self.viewer.frame(dt);
        let next_wake = match (self.generator.deadline(), self.notifications.next_expiry()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        FrameOutcome {
            control,
            world_changed,
            next_wake,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Level;
    use eduverse_kernel::{AgeGroup, Complexity};
    use eduverse_scene::ViewerState;

    fn session() -> Session {
        Session::new(SessionConfig {
            viewer: ViewerConfig {
                star_count: 10,
                ..ViewerConfig::default()
            },
            ..SessionConfig::default()
        })
    }

    fn generate(topic: &str) -> Action {
        Action::generate(topic, AgeGroup::MiddleSchool, Complexity::Basic)
    }

    #[test]
    fn generate_completes_after_delay() {
        let t0 = Instant::now();
        let mut s = session();
        s.apply(generate("Ocean tides"), t0).unwrap();
        assert!(s.viewer().is_generating());

        let early = s.tick(t0 + Duration::from_secs(1), 0.016);
        assert!(!early.world_changed);
        assert_eq!(early.next_wake, Some(t0 + Duration::from_secs(3)));

        let done = s.tick(t0 + Duration::from_secs(3), 0.016);
        assert!(done.world_changed);
        assert_eq!(s.viewer().state(), ViewerState::Populated);
        assert_eq!(s.viewer().world().unwrap().topic(), "Ocean tides");
        let toast = s.notifications().iter().next().unwrap();
        assert_eq!(toast.level, Level::Success);
        assert_eq!(toast.message, "Generated \"Ocean tides\" learning world!");
    }

    #[test]
    fn empty_topic_shows_error_and_starts_nothing() {
        let t0 = Instant::now();
        let mut s = session();
        let err = s.apply(generate("   "), t0).unwrap_err();
        assert!(matches!(err, SessionError::Build(BuildError::EmptyTopic)));
        assert!(!s.generator().is_pending());
        assert_eq!(s.viewer().state(), ViewerState::Empty);
        let toast = s.notifications().iter().next().unwrap();
        assert_eq!(toast.level, Level::Error);
        assert_eq!(toast.message, "Please enter a topic to explore!");
    }

    #[test]
    fn second_request_wins() {
        let t0 = Instant::now();
        let mut s = session();
        s.apply(generate("Oceans"), t0).unwrap();
        s.apply(generate("Planets"), t0 + Duration::from_secs(2))
            .unwrap();

        let mut completions = 0;
        for secs in 1..=10 {
            if s.tick(t0 + Duration::from_secs(secs), 0.1).world_changed {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(s.viewer().world().unwrap().topic(), "Planets");
    }

    #[test]
    fn prebuilt_selection_cancels_generation() {
        let t0 = Instant::now();
        let mut s = session();
        s.apply(generate("Volcanoes"), t0).unwrap();
        s.apply(Action::SelectPrebuilt(2), t0).unwrap();
        assert!(!s.generator().is_pending());
        assert_eq!(s.viewer().state(), ViewerState::Populated);

        let later = s.tick(t0 + Duration::from_secs(5), 0.1);
        assert!(!later.world_changed);
        assert_eq!(s.viewer().world().unwrap().title(), "Atomic Structure");
    }

    #[test]
    fn unknown_card_is_an_error() {
        let mut s = session();
        let err = s.apply(Action::SelectPrebuilt(99), Instant::now()).unwrap_err();
        assert!(matches!(err, SessionError::UnknownCard(99)));
        assert_eq!(s.viewer().state(), ViewerState::Empty);
    }

    #[test]
    fn cancel_restores_previous_state() {
        let t0 = Instant::now();
        let mut s = session();
        s.apply(Action::SelectPrebuilt(1), t0).unwrap();
        s.apply(generate("Leaves"), t0).unwrap();
        s.apply(Action::CancelGeneration, t0).unwrap();
        assert_eq!(s.viewer().state(), ViewerState::Populated);
        assert_eq!(s.viewer().world().unwrap().title(), "Solar System Tour");
    }

    #[test]
    fn paused_session_suspends_but_still_completes() {
        let t0 = Instant::now();
        let mut s = session();
        s.apply(Action::Pause, t0).unwrap();
        s.apply(generate("Rocks"), t0).unwrap();

        let outcome = s.tick(t0 + Duration::from_secs(1), 0.1);
        assert_eq!(outcome.control, LoopControl::Suspend);
        assert!(outcome.next_wake.is_some());

        let done = s.tick(t0 + Duration::from_secs(3), 0.1);
        assert!(done.world_changed);
        assert_eq!(done.control, LoopControl::Suspend);
    }

    #[test]
    fn toasts_expire_on_tick() {
        let t0 = Instant::now();
        let mut s = session();
        let _ = s.apply(generate(""), t0);
        assert_eq!(s.notifications().len(), 1);
        let outcome = s.tick(t0 + Duration::from_secs(5), 0.1);
        assert!(s.notifications().is_empty());
        assert_eq!(outcome.next_wake, None);
    }
}
