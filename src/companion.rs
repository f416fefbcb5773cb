//! The dog the player escorts.
//!
//! The dog walks a path smoothed once at load time from authored control
//! points. It waits while the player lags behind, sits when the path runs
//! out, barks at zombies nearby and dies when a zombie reaches it.

use glam::Vec2;
use log::{debug, info};

use crate::agent::TickContext;
use crate::anim::{Animator, ClipKey};
use crate::audio::SoundCue;
use crate::constants::{DOG_HEIGHT, DOG_WIDTH};
use crate::entity::EntityId;
use crate::path::{smooth_path, Path};
use crate::spatial::{Body, Tag};
use crate::vector_math::{distance, heading_towards, step_towards};

/// Dog animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DogState {
    /// Moving along the path.
    Walking,
    /// Waiting for the player.
    Sniffing,
    /// At the end of the path.
    Sitting,
    /// Caught by a zombie.
    Dead,
}

/// What the dog is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DogMode {
    /// Walking the path.
    Following,
    /// The player is beyond the leash distance.
    Waiting,
    /// The path is exhausted.
    Resting,
    /// Terminal.
    Dead,
}

impl DogMode {
    const fn clip_state(self) -> DogState {
        match self {
            Self::Following => DogState::Walking,
            Self::Waiting => DogState::Sniffing,
            Self::Resting => DogState::Sitting,
            Self::Dead => DogState::Dead,
        }
    }
}

/// Companion path follower.
#[derive(Debug, Clone)]
pub struct Dog {
    id: EntityId,
    position: Vec2,
    angle: f32,
    path: Path,
    mode: DogMode,
    animator: Animator,
    last_bark: Option<u64>,
}

impl Dog {
    /// A dog at `start` that will follow `path`.
    #[must_use]
    pub fn new(id: EntityId, start: Vec2, path: Path) -> Self {
        Self {
            id,
            position: start,
            angle: 0.0,
            path,
            mode: DogMode::Following,
            animator: Animator::default(),
            last_bark: None,
        }
    }

    /// A dog whose path is the smoothed curve from `start` through
    /// `control_points`.
    #[must_use]
    pub fn with_control_points(
        id: EntityId,
        start: Vec2,
        control_points: &[Vec2],
        resolution: u32,
    ) -> Self {
        let mut knots = Vec::with_capacity(control_points.len() + 1);
        knots.push(start);
        knots.extend_from_slice(control_points);
        let path = Path::new(smooth_path(&knots, resolution));
        debug!("dog path has {} points", path.len());
        Self::new(id, start, path)
    }

    /// Collision footprint for the spatial index.
    #[must_use]
    pub fn body(&self) -> Body {
        Body::new(
            self.id,
            Tag::Dog,
            self.position,
            Vec2::new(DOG_WIDTH, DOG_HEIGHT),
        )
    }

    /// Spatial-index id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Centre position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Facing, radians.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Current behaviour.
    #[must_use]
    pub const fn mode(&self) -> DogMode {
        self.mode
    }

    /// Current animation state.
    #[must_use]
    pub const fn state(&self) -> DogState {
        self.mode.clip_state()
    }

    /// The precomputed path and its cursor.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Current sprite frame.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.animator.frame()
    }

    /// Whether a zombie has caught the dog.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.mode == DogMode::Dead
    }

    /// Enters the terminal state. Returns `false` if already dead.
    pub fn kill(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        info!("dog {} was caught", self.id);
        self.mode = DogMode::Dead;
        true
    }

    /// One tick of following. `threats` are the positions of live zombies.
    pub fn update(&mut self, ctx: &mut TickContext<'_>, player: Vec2, threats: &[Vec2]) {
        if !self.is_dead() {
            self.bark_at(ctx, threats);
            self.mode = self.next_mode(ctx, player);
            if self.mode == DogMode::Following {
                self.follow(ctx);
            }
        }
        let clip = ctx.clips.clip(ClipKey::Dog(self.state()));
        self.animator
            .advance(ctx.tick, ctx.config.frame_divisor, clip);
    }

    fn next_mode(&self, ctx: &TickContext<'_>, player: Vec2) -> DogMode {
        if self.path.target().is_none() {
            DogMode::Resting
        } else if distance(self.position, player) > ctx.config.dog.leash_distance {
            DogMode::Waiting
        } else {
            DogMode::Following
        }
    }

    fn bark_at(&mut self, ctx: &mut TickContext<'_>, threats: &[Vec2]) {
        let dog = &ctx.config.dog;
        let near = threats
            .iter()
            .any(|t| distance(self.position, *t) <= dog.bark_range);
        let rested = self
            .last_bark
            .is_none_or(|at| ctx.tick.saturating_sub(at) >= dog.bark_cooldown_ticks);
        if near && rested {
            ctx.audio.restart(SoundCue::DogBark);
            self.last_bark = Some(ctx.tick);
        }
    }

    fn follow(&mut self, ctx: &mut TickContext<'_>) {
        let dog = ctx.config.dog;
        let Some(mut target) = self.path.target() else {
            return;
        };
        if distance(self.position, target) <= dog.arrive_epsilon {
            self.path.advance(dog.path_end);
            let Some(next) = self.path.target() else {
                self.mode = DogMode::Resting;
                return;
            };
            target = next;
        }

        self.angle = heading_towards(self.position, target, self.angle);
        let step = step_towards(self.position, target, dog.speed);
        if step == Vec2::ZERO {
            return;
        }
        if ctx
            .index
            .check(self.id, step.x, step.y, &[Tag::Mob, Tag::Wall])
            .is_none()
        {
            self.position += step;
            ctx.index.move_to(self.id, self.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::DefaultClips;
    use crate::audio::RecordingAudio;
    use crate::config::SimConfig;
    use crate::path::PathEnd;
    use crate::spatial::{CellIndex, SpatialIndex};
    use rstest::{fixture, rstest};

    struct Yard {
        config: SimConfig,
        index: CellIndex,
        audio: RecordingAudio,
        tick: u64,
    }

    impl Yard {
        fn step(&mut self, dog: &mut Dog, player: Vec2, threats: &[Vec2]) {
            let mut ctx = TickContext {
                tick: self.tick,
                config: &self.config,
                clips: &DefaultClips,
                index: &mut self.index,
                audio: &mut self.audio,
                targets: &[],
            };
            dog.update(&mut ctx, player, threats);
            self.tick += 1;
        }
    }

    #[fixture]
    fn yard() -> Yard {
        let mut config = SimConfig::default();
        config.dog.speed = 2.0;
        Yard {
            config,
            index: CellIndex::new(16.0),
            audio: RecordingAudio::default(),
            tick: 0,
        }
    }

    fn straight_dog(yard: &mut Yard) -> Dog {
        let dog = Dog::new(
            EntityId(3),
            Vec2::ZERO,
            Path::new(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]),
        );
        yard.index.add(dog.body());
        dog
    }

    #[rstest]
    fn holds_the_last_point_indefinitely(mut yard: Yard) {
        let mut dog = straight_dog(&mut yard);
        for _ in 0..500 {
            yard.step(&mut dog, Vec2::ZERO, &[]);
        }
        assert_eq!(dog.mode(), DogMode::Resting);
        assert_eq!(dog.state(), DogState::Sitting);
        assert!(distance(dog.position(), Vec2::new(10.0, 0.0)) <= 1.0);
        assert!(dog.angle().is_finite());
        assert!(dog.path().is_finished());
    }

    #[rstest]
    fn looping_path_keeps_walking(mut yard: Yard) {
        yard.config.dog.path_end = PathEnd::Loop;
        let mut dog = straight_dog(&mut yard);
        for _ in 0..100 {
            yard.step(&mut dog, Vec2::ZERO, &[]);
        }
        assert_eq!(dog.mode(), DogMode::Following);
    }

    #[rstest]
    fn waits_for_a_distant_player(mut yard: Yard) {
        let mut dog = straight_dog(&mut yard);
        yard.step(&mut dog, Vec2::new(1000.0, 0.0), &[]);
        assert_eq!(dog.mode(), DogMode::Waiting);
        assert_eq!(dog.position(), Vec2::ZERO);
    }

    #[rstest]
    fn barks_once_per_cooldown(mut yard: Yard) {
        let mut dog = straight_dog(&mut yard);
        let threat = [Vec2::new(20.0, 0.0)];
        for _ in 0..10 {
            yard.step(&mut dog, Vec2::ZERO, &threat);
        }
        let barks = yard
            .audio
            .played()
            .filter(|c| *c == SoundCue::DogBark)
            .count();
        assert_eq!(barks, 1);
    }

    #[rstest]
    fn zombies_block_the_way(mut yard: Yard) {
        let mut dog = straight_dog(&mut yard);
        yard.index.add(Body::new(
            EntityId(9),
            Tag::Mob,
            Vec2::new(20.0, 0.0),
            Vec2::splat(8.0),
        ));
        for _ in 0..10 {
            yard.step(&mut dog, Vec2::ZERO, &[]);
        }
        assert_eq!(dog.position(), Vec2::new(8.0, 0.0));
        assert_eq!(dog.mode(), DogMode::Following);
    }

    #[rstest]
    fn dead_dogs_stay_put(mut yard: Yard) {
        let mut dog = straight_dog(&mut yard);
        assert!(dog.kill());
        assert!(!dog.kill());
        yard.step(&mut dog, Vec2::ZERO, &[]);
        assert_eq!(dog.state(), DogState::Dead);
        assert_eq!(dog.position(), Vec2::ZERO);
    }

    #[rstest]
    fn control_points_are_smoothed_from_the_start() {
        let dog = Dog::with_control_points(
            EntityId(1),
            Vec2::new(16.0, 16.0),
            &[Vec2::new(80.0, 16.0), Vec2::new(80.0, 80.0)],
            4,
        );
        assert_eq!(dog.path().points().first(), Some(&Vec2::new(16.0, 16.0)));
        assert_eq!(dog.path().last(), Some(Vec2::new(80.0, 80.0)));
        assert!(dog.path().len() > 3);
    }
}
