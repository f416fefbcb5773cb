//! One play-through of a level.
//!
//! [`Session`] owns the world: grid, player, gun, dog, zombies and spawn
//! points, plus the spatial index and audio sink it was constructed with.
//! [`Session::tick`] advances everything by one step in a fixed order:
//!
//! 1. player input: movement, reload, fire (combat resolution)
//! 2. dog
//! 3. zombies, including removal of those whose terminal clip ended
//! 4. spawn points
//! 5. collision checks, which decide the [`Outcome`]
//!
//! Terminal outcomes latch; later ticks return the same outcome and change
//! nothing.

use glam::Vec2;
use log::{debug, info, warn};
use thiserror::Error;

use crate::agent::{AgentSignal, SpriteFrame, TickContext, ZombieBehaviour};
use crate::anim::{AnimationSource, DefaultClips};
use crate::audio::{AudioSink, SoundCue};
use crate::combat::{FireOutcome, Gunner};
use crate::companion::Dog;
use crate::config::{ConfigError, SimConfig};
use crate::entity::{EntityId, EntityIds};
use crate::grid::GridMap;
use crate::level::{LevelData, LevelError};
use crate::path::PathPlanner;
use crate::spatial::{Body, SpatialIndex, Tag};
use crate::spawn::{Horde, SpawnContext, SpawnRegistry};
use crate::vector_math::vec_normalize;

/// Errors raised while building a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The level is unusable.
    #[error(transparent)]
    Level(#[from] LevelError),
    /// The tunables are out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Player commands for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Desired movement direction; normalised, so only the direction counts.
    pub movement: Vec2,
    /// Facing angle, radians.
    pub aim: f32,
    /// Trigger pulled this tick.
    pub fire: bool,
    /// Reload requested this tick.
    pub reload: bool,
}

/// Game state reported after each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Play continues.
    #[default]
    Running,
    /// A zombie reached the player.
    PlayerDied,
    /// A zombie reached the dog.
    CompanionDied,
    /// The boss died for good.
    BossDefeated,
    /// The player reached the exit.
    LevelComplete,
}

impl Outcome {
    /// Whether play has stopped.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// The player's body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    id: EntityId,
    position: Vec2,
    angle: f32,
}

impl Player {
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
}

/// A running level.
pub struct Session<I, A> {
    config: SimConfig,
    clips: Box<dyn AnimationSource>,
    grid: GridMap,
    index: I,
    audio: A,
    ids: EntityIds,
    player: Player,
    gunner: Gunner,
    dog: Dog,
    horde: Horde,
    spawns: SpawnRegistry,
    checkpoints: Vec<(EntityId, u32)>,
    checkpoint: u32,
    tick: u64,
    outcome: Outcome,
}

impl<I: SpatialIndex, A: AudioSink> Session<I, A> {
    /// Loads `level` into `index`, spawns the initial zombies and starts the
    /// music.
    ///
    /// # Errors
    /// Returns [`SessionError`] when the level or config is invalid.
    pub fn new(
        level: &LevelData,
        config: SimConfig,
        mut index: I,
        mut audio: A,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        level.validate()?;
        let grid = level.grid()?;
        let mut ids = EntityIds::default();

        let tile = Vec2::splat(level.tile_size);
        for cell in &level.obstacles {
            let centre = level.cell_centre((*cell).into());
            index.add(Body::new(ids.next_id(), Tag::Wall, centre, tile));
        }

        let player = Player {
            id: ids.next_id(),
            position: level.player.into(),
            angle: 0.0,
        };
        index.add(Body::new(
            player.id,
            Tag::Player,
            player.position,
            Vec2::splat(config.player.size),
        ));

        let dog = Dog::with_control_points(
            ids.next_id(),
            level.dog.start.into(),
            &level.dog_control_points(),
            config.bezier_resolution,
        );
        index.add(dog.body());

        let mut checkpoints = Vec::with_capacity(level.checkpoints.len());
        for cp in &level.checkpoints {
            let id = ids.next_id();
            index.add(Body::new(
                id,
                Tag::Checkpoint(cp.number),
                cp.zone.centre(),
                cp.zone.size(),
            ));
            checkpoints.push((id, cp.number));
        }
        index.add(Body::new(
            ids.next_id(),
            Tag::End,
            level.end.centre(),
            level.end.size(),
        ));

        let mut horde = Horde::new();
        let mut spawns = SpawnRegistry::new(level.spawn_specs());
        spawns.populate(&mut SpawnContext {
            ids: &mut ids,
            config: &config,
            index: &mut index,
            horde: &mut horde,
        });

        audio.play(SoundCue::Music);
        info!(
            "level loaded: {}x{} tiles, {} walls, {} zombies",
            level.width,
            level.height,
            level.obstacles.len(),
            horde.len()
        );

        Ok(Self {
            gunner: Gunner::new(&config.player),
            config,
            clips: Box::new(DefaultClips),
            grid,
            index,
            audio,
            ids,
            player,
            dog,
            horde,
            spawns,
            checkpoints,
            checkpoint: 0,
            tick: 0,
            outcome: Outcome::Running,
        })
    }

    /// Replaces the animation metadata provider.
    #[must_use]
    pub fn with_clips(mut self, clips: Box<dyn AnimationSource>) -> Self {
        self.clips = clips;
        self
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }

    /// Latest outcome.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Tunables in use.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Player body.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// The player's weapon.
    #[must_use]
    pub const fn gunner(&self) -> &Gunner {
        &self.gunner
    }

    /// The companion.
    #[must_use]
    pub const fn dog(&self) -> &Dog {
        &self.dog
    }

    /// Live and dying zombies.
    pub fn zombies(&self) -> impl Iterator<Item = &dyn ZombieBehaviour> + '_ {
        self.horde.values().map(|z| &**z)
    }

    /// Looks up a zombie.
    #[must_use]
    pub fn zombie(&self, id: EntityId) -> Option<&dyn ZombieBehaviour> {
        self.horde.get(&id).map(|z| &**z)
    }

    /// Spawn bookkeeping.
    #[must_use]
    pub const fn spawns(&self) -> &SpawnRegistry {
        &self.spawns
    }

    /// Highest checkpoint reached, 0 for none.
    #[must_use]
    pub const fn checkpoint(&self) -> u32 {
        self.checkpoint
    }

    /// The spatial index.
    #[must_use]
    pub const fn index(&self) -> &I {
        &self.index
    }

    /// The audio sink.
    #[must_use]
    pub const fn audio(&self) -> &A {
        &self.audio
    }

    /// Mutable access to the audio sink.
    pub const fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Obstacle grid of the level.
    #[must_use]
    pub const fn grid(&self) -> &GridMap {
        &self.grid
    }

    /// Planner over the level grid.
    #[must_use]
    pub fn planner(&self) -> PathPlanner<'_> {
        PathPlanner::new(&self.grid, self.config.tile_size)
    }

    /// Frames to draw for every zombie.
    #[must_use]
    pub fn sprites(&self) -> Vec<SpriteFrame> {
        self.horde.values().map(|z| z.sprite()).collect()
    }

    /// Advances the world by one tick.
    pub fn tick(&mut self, input: &TickInput) -> Outcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }
        self.tick += 1;

        self.apply_input(input);
        self.update_dog();
        let boss_defeated = self.update_zombies();
        self.spawns.tick(&mut SpawnContext {
            ids: &mut self.ids,
            config: &self.config,
            index: &mut self.index,
            horde: &mut self.horde,
        });

        self.outcome = self.resolve_collisions(boss_defeated);
        if self.outcome.is_terminal() {
            info!("tick {}: {:?}", self.tick, self.outcome);
        }
        self.outcome
    }

    fn apply_input(&mut self, input: &TickInput) {
        if let Some(dir) = vec_normalize(input.movement) {
            self.move_player(dir * self.config.player.speed);
        }
        self.player.angle = input.aim;

        self.gunner.tick();
        if input.reload {
            self.gunner.reload(&mut self.audio);
        }
        if input.fire {
            let horde = &mut self.horde;
            let outcome = self.gunner.fire(
                self.player.position,
                self.player.angle,
                self.config.player.fire_range,
                &self.index,
                &mut self.audio,
                |id| horde.get_mut(&id).is_some_and(|z| z.hit()),
            );
            debug!("tick {}: fire -> {outcome:?}", self.tick);
            if outcome == FireOutcome::Dry {
                warn!("out of ammo");
            }
        }
    }

    fn move_player(&mut self, step: Vec2) {
        let id = self.player.id;
        for candidate in [step, Vec2::new(step.x, 0.0), Vec2::new(0.0, step.y)] {
            if candidate == Vec2::ZERO {
                continue;
            }
            if self
                .index
                .check(id, candidate.x, candidate.y, &[Tag::Wall])
                .is_none()
            {
                self.player.position += candidate;
                self.index.move_to(id, self.player.position);
                return;
            }
        }
    }

    fn update_dog(&mut self) {
        let threats: Vec<Vec2> = self
            .horde
            .values()
            .filter(|z| z.is_alive())
            .map(|z| z.position())
            .collect();
        let mut ctx = TickContext {
            tick: self.tick,
            config: &self.config,
            clips: &*self.clips,
            index: &mut self.index,
            audio: &mut self.audio,
            targets: &[],
        };
        self.dog.update(&mut ctx, self.player.position, &threats);
    }

    /// Runs every zombie, removes those that finished dying and reports
    /// whether the boss was defeated this tick.
    fn update_zombies(&mut self) -> bool {
        let mut targets = vec![self.player.position];
        if !self.dog.is_dead() {
            targets.push(self.dog.position());
        }

        let mut ctx = TickContext {
            tick: self.tick,
            config: &self.config,
            clips: &*self.clips,
            index: &mut self.index,
            audio: &mut self.audio,
            targets: &targets,
        };
        let mut finished = Vec::new();
        let mut boss_defeated = false;
        for (id, zombie) in &mut self.horde {
            for signal in zombie.update(&mut ctx) {
                match signal {
                    AgentSignal::Remove => finished.push(*id),
                    AgentSignal::BossDefeated => boss_defeated = true,
                }
            }
        }

        for id in finished {
            if let Some(mut zombie) = self.horde.remove(&id) {
                let removal = zombie.remove(&mut self.index);
                self.spawns.notify_removed(removal);
                debug!("tick {}: removed zombie {id}", self.tick);
            }
        }
        boss_defeated
    }

    fn live_mob_among(&self, ids: Option<Vec<EntityId>>) -> bool {
        ids.unwrap_or_default()
            .into_iter()
            .any(|id| self.horde.get(&id).is_some_and(|z| z.is_alive()))
    }

    fn stop_music(&mut self) {
        self.audio.pause(SoundCue::Music);
        self.audio.rewind(SoundCue::Music);
    }

    fn resolve_collisions(&mut self, boss_defeated: bool) -> Outcome {
        let player = self.player.id;

        let on_player = self.index.check(player, 0.0, 0.0, &[Tag::Mob]);
        if self.live_mob_among(on_player) {
            self.stop_music();
            self.audio.restart(SoundCue::PlayerDies);
            return Outcome::PlayerDied;
        }

        let reached = self
            .index
            .check(player, 0.0, 0.0, &[Tag::Checkpoint(0)])
            .unwrap_or_default();
        let best = self
            .checkpoints
            .iter()
            .filter(|(id, _)| reached.contains(id))
            .map(|(_, n)| *n)
            .max();
        if let Some(n) = best.filter(|n| *n > self.checkpoint) {
            self.checkpoint = n;
            self.audio.restart(SoundCue::Checkpoint(n));
            info!("checkpoint {n} reached");
        }

        if self.index.check(player, 0.0, 0.0, &[Tag::End]).is_some() {
            return Outcome::LevelComplete;
        }

        let dog = self.dog.id();
        let on_dog = self.index.check(dog, 0.0, 0.0, &[Tag::Mob]);
        if self.live_mob_among(on_dog) {
            self.dog.kill();
        }
        if self.dog.is_dead() {
            self.stop_music();
            return Outcome::CompanionDied;
        }

        if boss_defeated {
            return Outcome::BossDefeated;
        }
        Outcome::Running
    }
}
