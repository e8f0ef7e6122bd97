use crate::camera::OrbitCamera;
use crate::graph::{Light, NodeKind, NodeTag, SceneGraph, SceneNode, Starfield};
use crate::mapping;
use eduverse_common::{Color, NodeId};
use eduverse_kernel::WorldDescriptor;
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tunables for the viewer's persistent content and animation.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub background: Color,
    pub star_count: usize,
    pub star_seed: u64,
    /// Edge length of the cube the stars are scattered in.
    pub star_spread: f32,
    /// Starfield rotation about Y, radians per second.
    pub star_spin: f32,
    pub orbit_radius: f32,
    pub orbit_height: f32,
    /// Camera orbit speed, radians per second.
    pub orbit_speed: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: Color::from_u32(0x000510),
            star_count: 1000,
            star_seed: 42,
            star_spread: 200.0,
            star_spin: 0.06,
            orbit_radius: 15.0,
            orbit_height: 5.0,
            orbit_speed: 0.5,
        }
    }
}

/// What the viewer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    /// No world yet.
    Empty,
    /// A generation is in flight. The scene is left as it was.
    Generating { had_world: bool },
    Populated,
}

/// Whether the frame driver should schedule another frame right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    /// Paused: wait for an event before drawing again.
    Suspend,
}

/// Owned render context: scene graph, camera, current world and playback.
///
/// Long-lived for the life of the view. Everything a frame needs is reached
/// through `&self`/`&mut self`; there is no ambient state.
pub struct SceneViewer {
    config: ViewerConfig,
    graph: SceneGraph,
    camera: OrbitCamera,
    starfield: NodeId,
    star_angle: f32,
    state: ViewerState,
    world: Option<WorldDescriptor>,
    selected: Option<String>,
    playing: bool,
    viewport: (u32, u32),
}

impl SceneViewer {
    pub fn new(config: ViewerConfig) -> Self {
        let mut graph = SceneGraph::new(config.background);

        graph.add(SceneNode::new(
            "Ambient Light",
            NodeKind::Light(Light::Ambient {
                color: Color::from_u32(0x404040),
                intensity: 0.6,
            }),
            NodeTag::Persistent,
        ));
        graph.add(SceneNode::new(
            "Directional Light",
            NodeKind::Light(Light::Directional {
                color: Color::WHITE,
                intensity: 1.0,
                position: Vec3::new(10.0, 10.0, 5.0),
            }),
            NodeTag::Persistent,
        ));
        let starfield = graph.add(SceneNode::new(
            "Starfield",
            NodeKind::Starfield(scatter_stars(&config)),
            NodeTag::Persistent,
        ));

        let camera = OrbitCamera::new(config.orbit_radius, config.orbit_height, config.orbit_speed);
        tracing::debug!(stars = config.star_count, "scene viewer ready");

        Self {
            config,
            graph,
            camera,
            starfield,
            star_angle: 0.0,
            state: ViewerState::Empty,
            world: None,
            selected: None,
            playing: true,
            viewport: (1280, 720),
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn world(&self) -> Option<&WorldDescriptor> {
        self.world.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, ViewerState::Generating { .. })
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Enter `Generating`. The current scene stays on screen.
    pub fn begin_generation(&mut self) {
        if self.is_generating() {
            return;
        }
        self.state = ViewerState::Generating {
            had_world: self.world.is_some(),
        };
        tracing::debug!("viewer generating");
    }

    /// Leave `Generating` without a new world.
    pub fn cancel_generation(&mut self) {
        if let ViewerState::Generating { had_world } = self.state {
            self.state = if had_world {
                ViewerState::Populated
            } else {
                ViewerState::Empty
            };
            tracing::debug!(state = ?self.state, "generation abandoned");
        }
    }

    /// Swap in a new world, replacing every node of the previous one.
    ///
    /// Used both when a generation completes and when a prebuilt world is
    /// selected; either way the viewer ends up `Populated`.
    pub fn show_world(&mut self, world: WorldDescriptor) {
        let removed = self.graph.remove_world_objects();
        let added = mapping::populate(&mut self.graph, &world);
        tracing::info!(
            world = %world.id(),
            title = world.title(),
            removed,
            added,
            "world replaced"
        );
        self.world = Some(world);
        self.selected = None;
        self.state = ViewerState::Populated;
    }

    pub fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            tracing::debug!("playback paused");
        }
    }

    pub fn resume(&mut self) {
        if !self.playing {
            self.playing = true;
            tracing::debug!("playback resumed");
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera.set_viewport(width, height);
    }

    /// Highlight an object of the current world by name.
    pub fn select_object(&mut self, name: &str) -> bool {
        let exists = self
            .world
            .as_ref()
            .is_some_and(|w| w.object(name).is_some());
        if exists {
            self.selected = Some(name.to_string());
        }
        exists
    }

    pub fn selected_object(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn starfield_id(&self) -> NodeId {
        self.starfield
    }

    /// Advance one frame by `dt` seconds.
    ///
    /// Reads the playing flag every call. While paused nothing moves and the
    /// caller should stop scheduling frames until something changes.
    pub fn frame(&mut self, dt: f32) -> LoopControl {
        if !self.playing {
            return LoopControl::Suspend;
        }
        self.camera.advance(dt);
        self.star_angle = (self.star_angle + self.config.star_spin * dt)
            .rem_euclid(std::f32::consts::TAU);
        if let Some(node) = self.graph.get(self.starfield) {
            let mut transform = node.transform;
            transform.rotation = Quat::from_rotation_y(self.star_angle);
            self.graph.set_transform(self.starfield, transform);
        }
        LoopControl::Continue
    }
}

fn scatter_stars(config: &ViewerConfig) -> Starfield {
    let mut rng = StdRng::seed_from_u64(config.star_seed);
    let half = config.star_spread * 0.5;
    let points = (0..config.star_count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
            )
        })
        .collect();
    Starfield {
        points,
        color: Color::WHITE,
        size: 0.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduverse_kernel::{AgeGroup, Complexity, WorldBuilder, card};

    fn viewer() -> SceneViewer {
        SceneViewer::new(ViewerConfig {
            star_count: 50,
            ..ViewerConfig::default()
        })
    }

    fn starfield_count(graph: &SceneGraph) -> usize {
        graph
            .nodes()
            .filter(|(_, n)| matches!(n.kind, NodeKind::Starfield(_)))
            .count()
    }

    #[test]
    fn starts_empty_with_persistent_content() {
        let v = viewer();
        assert_eq!(v.state(), ViewerState::Empty);
        assert_eq!(v.graph().lights().count(), 2);
        assert_eq!(starfield_count(v.graph()), 1);
        assert_eq!(v.graph().world_object_count(), 0);
        assert!(v.is_playing());
    }

    #[test]
    fn generation_lifecycle() {
        let builder = WorldBuilder::new();
        let mut v = viewer();
        v.begin_generation();
        assert_eq!(v.state(), ViewerState::Generating { had_world: false });
        assert_eq!(v.graph().world_object_count(), 0);

        let world = builder
            .build("Ocean currents", AgeGroup::Elementary, Complexity::Basic)
            .unwrap();
        v.show_world(world);
        assert_eq!(v.state(), ViewerState::Populated);
        assert!(v.graph().world_object_count() > 0);
    }

    #[test]
    fn generating_does_not_touch_the_scene() {
        let builder = WorldBuilder::new();
        let mut v = viewer();
        v.show_world(builder.from_card(card(1).unwrap()).unwrap());
        let revision = v.graph().revision();
        v.begin_generation();
        v.frame(0.016);
        assert_eq!(v.graph().revision(), revision);
        assert_eq!(v.world().unwrap().title(), "Solar System Tour");
    }

    #[test]
    fn cancel_returns_to_previous_state() {
        let builder = WorldBuilder::new();
        let mut v = viewer();
        v.begin_generation();
        v.cancel_generation();
        assert_eq!(v.state(), ViewerState::Empty);

        v.show_world(builder.from_card(card(2).unwrap()).unwrap());
        v.begin_generation();
        v.cancel_generation();
        assert_eq!(v.state(), ViewerState::Populated);
    }

    #[test]
    fn selecting_two_worlds_fully_replaces_objects() {
        let builder = WorldBuilder::new();
        let mut v = viewer();
        let persistent = v.graph().persistent_count();

        v.show_world(builder.from_card(card(1).unwrap()).unwrap());
        v.show_world(builder.from_card(card(3).unwrap()).unwrap());

        let second = v.world().unwrap().id();
        for (_, node) in v.graph().nodes() {
            if let NodeTag::WorldObject { world, .. } = &node.tag {
                assert_eq!(*world, second);
            }
        }
        assert!(v.graph().nodes().all(|(_, n)| !n.name.starts_with("Sun")));
        assert_eq!(v.graph().persistent_count(), persistent);
        assert_eq!(v.graph().lights().count(), 2);
        assert_eq!(starfield_count(v.graph()), 1);
        // DNA: 3 bodies + 3 glows, no rings
        assert_eq!(v.graph().world_object_count(), 6);
    }

    #[test]
    fn pause_resume_keeps_camera_and_is_idempotent() {
        let mut v = viewer();
        v.frame(0.5);
        let before = v.camera().position();

        v.pause();
        v.pause();
        assert_eq!(v.frame(1.0), LoopControl::Suspend);
        assert_eq!(v.camera().position(), before);

        v.resume();
        v.resume();
        assert!(v.is_playing());
        assert_eq!(v.camera().position(), before);
        assert_eq!(v.frame(0.0), LoopControl::Continue);
    }

    #[test]
    fn toggle_flips_playback() {
        let mut v = viewer();
        v.toggle_playback();
        assert!(!v.is_playing());
        v.toggle_playback();
        assert!(v.is_playing());
    }

    #[test]
    fn animation_runs_while_generating() {
        let mut v = viewer();
        v.begin_generation();
        let before = v.camera().position();
        assert_eq!(v.frame(0.1), LoopControl::Continue);
        assert_ne!(v.camera().position(), before);
    }

    #[test]
    fn frame_spins_starfield() {
        let mut v = viewer();
        v.frame(1.0);
        let stars = v.graph().get(v.starfield_id()).unwrap();
        assert_ne!(stars.transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn stars_are_reproducible_and_bounded() {
        let a = scatter_stars(&ViewerConfig::default());
        let b = scatter_stars(&ViewerConfig::default());
        assert_eq!(a, b);
        assert_eq!(a.points.len(), 1000);
        assert!(a.points.iter().all(|p| p.abs().max_element() <= 100.0));
    }

    #[test]
    fn select_object_only_in_current_world() {
        let builder = WorldBuilder::new();
        let mut v = viewer();
        assert!(!v.select_object("Sun"));
        v.show_world(builder.from_card(card(1).unwrap()).unwrap());
        assert!(v.select_object("Mars"));
        assert_eq!(v.selected_object(), Some("Mars"));
        v.show_world(builder.from_card(card(2).unwrap()).unwrap());
        assert_eq!(v.selected_object(), None);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut v = viewer();
        v.resize(1000, 500);
        assert_eq!(v.viewport(), (1000, 500));
        assert_eq!(v.camera().aspect, 2.0);
    }
}
