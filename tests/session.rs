//! Whole sessions from level load to a terminal outcome.

use escort::audio::AudioCall;
use escort::{
    CellIndex, LevelData, Outcome, RecordingAudio, Session, SimConfig, SoundCue, TickInput,
};
use glam::Vec2;
use rstest::rstest;
use serde_json::json;
use test_utils::{corridor_level, fast_config};

type TestSession = Session<CellIndex, RecordingAudio>;

fn start(level: &LevelData, config: SimConfig) -> TestSession {
    Session::new(
        level,
        config,
        CellIndex::new(config.spatial_cell_size),
        RecordingAudio::default(),
    )
    .unwrap_or_else(|e| panic!("session: {e}"))
}

fn run(session: &mut TestSession, input: TickInput, limit: u32) -> Outcome {
    for _ in 0..limit {
        let outcome = session.tick(&input);
        if outcome.is_terminal() {
            return outcome;
        }
    }
    session.outcome()
}

#[rstest]
fn shooting_clears_a_crawler() {
    let level = corridor_level(
        12,
        &json!([{ "x": 240.0, "y": 80.0, "kind": "crawler", "initial": 1 }]),
    );
    let mut session = start(&level, fast_config());
    assert_eq!(session.zombies().count(), 1);

    let fire_east = TickInput {
        fire: true,
        ..TickInput::default()
    };
    assert_eq!(run(&mut session, fire_east, 100), Outcome::Running);

    assert_eq!(session.zombies().count(), 0);
    assert_eq!(session.spawns().alive_total(), 0);
    let shots = session
        .audio()
        .played()
        .filter(|cue| *cue == SoundCue::GunShot)
        .count();
    assert!(shots >= 3, "crawler needs three hits, fired {shots}");
}

#[rstest]
fn zombie_reaching_the_player_ends_play() {
    let level = corridor_level(
        12,
        &json!([{ "x": 48.0, "y": 144.0, "kind": "sprinter", "initial": 1 }]),
    );
    let mut session = start(&level, fast_config());

    assert_eq!(
        run(&mut session, TickInput::default(), 400),
        Outcome::PlayerDied
    );
    let calls = session.audio().calls();
    assert!(calls.contains(&AudioCall::Pause(SoundCue::Music)));
    assert!(session.audio().was_played(SoundCue::PlayerDies));
}

#[rstest]
fn zombie_reaching_the_dog_ends_play() {
    let level = corridor_level(
        12,
        &json!([{ "x": 144.0, "y": 144.0, "kind": "sprinter", "initial": 1 }]),
    );
    let mut session = start(&level, fast_config());

    assert_eq!(
        run(&mut session, TickInput::default(), 600),
        Outcome::CompanionDied
    );
    assert!(session.dog().is_dead());
}

#[rstest]
fn demo_level_loads_and_has_a_route_to_the_exit() -> anyhow::Result<()> {
    let level = LevelData::demo()?;
    let config = SimConfig::default();
    let mut session = Session::new(
        &level,
        config,
        CellIndex::new(config.spatial_cell_size),
        RecordingAudio::default(),
    )?;

    assert_eq!(session.zombies().count(), 6);
    assert_eq!(session.spawns().points().len(), 4);
    assert!(session.audio().was_played(SoundCue::Music));

    let route = session
        .planner()
        .find_path(session.player().position(), level.end.centre())?;
    assert!(route.len() >= 2);
    assert_eq!(route.first(), Some(&Vec2::new(80.0, 400.0)));

    assert_eq!(run(&mut session, TickInput::default(), 50), Outcome::Running);
    assert_eq!(session.ticks(), 50);
    Ok(())
}
