//! Zombie and boss behaviour driven through spawn points.

use escort::agent::{dispatch, AgentSignal};
use escort::anim::ClipKey;
use escort::entity::EntityId;
use escort::spawn::{Horde, SpawnSpec};
use escort::{BossState, SoundCue, SpawnPointId, SpawnRegistry, ZombieKind, ZombieState};
use glam::Vec2;
use rstest::{fixture, rstest};
use test_utils::AgentHarness;

struct Arena {
    harness: AgentHarness,
    horde: Horde,
    registry: SpawnRegistry,
}

impl Arena {
    fn populate(&mut self) -> usize {
        let mut ctx = self.harness.spawner(&mut self.horde);
        self.registry.populate(&mut ctx)
    }

    fn respawn(&mut self) -> usize {
        let mut ctx = self.harness.spawner(&mut self.horde);
        self.registry.tick(&mut ctx)
    }

    /// Ticks `id` until it asks to be removed, then removes it and tells
    /// the registry.
    fn run_until_removed(&mut self, id: EntityId) -> bool {
        for _ in 0..20 {
            let Some(agent) = self.horde.get_mut(&id) else {
                return false;
            };
            let mut ctx = self.harness.next_tick(&[]);
            if agent.update(&mut ctx).contains(&AgentSignal::Remove) {
                let Some(mut removed) = self.horde.remove(&id) else {
                    return false;
                };
                let removal = removed.remove(&mut self.harness.index);
                return self.registry.notify_removed(removal);
            }
        }
        false
    }

    fn first_id(&self) -> EntityId {
        self.horde
            .keys()
            .next()
            .copied()
            .unwrap_or_else(|| panic!("horde is empty"))
    }
}

fn arena(specs: Vec<SpawnSpec>) -> Arena {
    Arena {
        harness: AgentHarness::default(),
        horde: Horde::new(),
        registry: SpawnRegistry::new(specs),
    }
}

#[fixture]
fn shamblers() -> Arena {
    arena(vec![SpawnSpec {
        position: Vec2::new(200.0, 200.0),
        kind: ZombieKind::Normal,
        initial_count: 3,
        continuous: true,
    }])
}

#[rstest]
#[case(false, 8, ZombieState::Idle, Some(BossState::Idle1))]
#[case(false, 7, ZombieState::Walking, Some(BossState::Walking2))]
#[case(false, 2, ZombieState::Hit, Some(BossState::Death1))]
#[case(false, 1, ZombieState::Hit, Some(BossState::Death2))]
#[case(true, 1, ZombieState::Hit, Some(BossState::Death2))]
#[case(true, 2, ZombieState::Walking, Some(BossState::Running))]
#[case(true, 5, ZombieState::Walking, None)]
fn boss_dispatch_picks_the_first_matching_row(
    #[case] daemon: bool,
    #[case] hits: i32,
    #[case] base: ZombieState,
    #[case] expected: Option<BossState>,
) {
    assert_eq!(dispatch(daemon, hits, base), expected);
}

#[rstest]
fn continuous_point_replaces_each_loss_once(mut shamblers: Arena) {
    assert_eq!(shamblers.populate(), 3);
    let victim = shamblers.first_id();
    let Some(agent) = shamblers.horde.get_mut(&victim) else {
        panic!("victim missing");
    };
    assert!(agent.hit());
    assert!(agent.hit());
    assert!(!agent.is_alive());

    assert!(shamblers.run_until_removed(victim));
    assert_eq!(shamblers.horde.len(), 2);
    assert_eq!(shamblers.respawn(), 1);
    assert_eq!(shamblers.respawn(), 0);
    assert_eq!(shamblers.horde.len(), 3);
    assert_eq!(shamblers.registry.alive_total(), 3);
    assert!(!shamblers.harness.index.contains(victim));
}

#[rstest]
fn one_shot_point_does_not_refill() {
    let mut arena = arena(vec![SpawnSpec {
        position: Vec2::new(64.0, 64.0),
        kind: ZombieKind::Sprinter,
        initial_count: 1,
        continuous: false,
    }]);
    arena.populate();
    let id = arena.first_id();
    if let Some(agent) = arena.horde.get_mut(&id) {
        assert!(agent.hit());
    }
    assert!(arena.run_until_removed(id));
    assert_eq!(arena.respawn(), 0);
    assert!(arena.horde.is_empty());
    let point = arena.registry.get(SpawnPointId(0));
    assert_eq!(point.map(|p| p.alive_count()), Some(0));
}

#[rstest]
fn big_spawns_are_bosses() {
    let mut arena = arena(vec![SpawnSpec {
        position: Vec2::new(300.0, 300.0),
        kind: ZombieKind::Big,
        initial_count: 1,
        continuous: false,
    }]);
    arena.populate();
    let id = arena.first_id();
    let Some(boss) = arena.horde.get_mut(&id) else {
        panic!("boss missing");
    };
    let mut ctx = arena.harness.next_tick(&[]);
    assert!(boss.update(&mut ctx).is_empty());
    assert_eq!(boss.sprite().clip, ClipKey::Boss(BossState::Idle1));
    assert_eq!(boss.hit_to_die(), 10);
}

#[rstest]
fn boss_fights_through_both_phases() {
    let mut arena = arena(vec![SpawnSpec {
        position: Vec2::new(300.0, 300.0),
        kind: ZombieKind::Big,
        initial_count: 1,
        continuous: false,
    }]);
    arena.populate();
    let id = arena.first_id();

    let mut signals = Vec::new();
    for _ in 0..400 {
        let Some(boss) = arena.horde.get_mut(&id) else {
            break;
        };
        if boss.is_alive() {
            boss.hit();
        }
        let mut ctx = arena.harness.next_tick(&[]);
        signals.extend(boss.update(&mut ctx));
        if signals.contains(&AgentSignal::Remove) {
            break;
        }
    }

    assert_eq!(signals, vec![AgentSignal::BossDefeated, AgentSignal::Remove]);
    for cue in [
        SoundCue::BigZombieDeath1,
        SoundCue::BigZombieScream,
        SoundCue::BigZombieDeath2,
    ] {
        assert!(arena.harness.audio.was_played(cue), "{cue} was not played");
    }
}
