//! Headless runner: plays a level with a scripted player and logs how it ended.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::prelude::*;
use clap::Parser;
use escort::plugin::{PendingInput, SessionStatus};
use escort::{
    init_logging, CellIndex, DogMode, EscortPlugin, LevelData, RecordingAudio, Session,
    SimConfig, SoundCue, TickInput,
};
use glam::Vec2;
use log::{info, warn};

type HeadlessSession = Session<CellIndex, RecordingAudio>;

/// Plays a level headlessly with a scripted player
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level JSON file; the bundled demo level when omitted
    #[arg(short, long)]
    level: Option<PathBuf>,
    /// Simulation config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Stop after this many ticks
    #[arg(short, long, default_value_t = 20_000)]
    ticks: u64,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Where the scripted player heads: the exit once the dog is sitting at the
/// end of its path, otherwise the dog.
#[derive(Resource, Debug, Clone, Copy)]
struct ExitZone(Vec2);

fn load_config(file: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = file else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    SimConfig::from_json_str(&json).with_context(|| format!("loading config {}", path.display()))
}

fn load_level(file: Option<&PathBuf>) -> Result<LevelData> {
    match file {
        Some(path) => {
            LevelData::from_path(path).with_context(|| format!("loading level {}", path.display()))
        }
        None => LevelData::demo().context("loading bundled demo level"),
    }
}

/// Direction towards the next turn point of a planned route, falling back to
/// a straight line when no route exists.
fn route_towards(session: &HeadlessSession, target: Vec2) -> Vec2 {
    let here = session.player().position();
    let waypoint = session
        .planner()
        .find_path(here, target)
        .ok()
        .and_then(|points| points.into_iter().find(|p| p.distance(here) > 4.0));
    waypoint.unwrap_or(target) - here
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn scripted_player_system(
    session: NonSend<HeadlessSession>,
    exit: Res<ExitZone>,
    mut input: ResMut<PendingInput>,
) {
    let player = session.player();
    let gun = session.gunner();
    let range = session.config().player.fire_range;

    let nearest = session
        .zombies()
        .filter(|z| z.is_alive())
        .map(|z| z.position())
        .filter(|p| p.distance(player.position()) <= range)
        .min_by(|a, b| {
            a.distance(player.position())
                .total_cmp(&b.distance(player.position()))
        });

    let dog = session.dog();
    let (goal, keep_within) = if dog.mode() == DogMode::Resting {
        (exit.0, 0.0)
    } else {
        (dog.position(), 40.0)
    };
    let movement = if goal.distance(player.position()) > keep_within {
        route_towards(&session, goal)
    } else {
        Vec2::ZERO
    };

    input.0 = TickInput {
        movement,
        aim: nearest.map_or(player.angle(), |z| {
            escort::vector_math::heading_towards(player.position(), z, player.angle())
        }),
        fire: nearest.is_some() && gun.ammo() > 0,
        reload: gun.ammo() == 0,
    };
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_ref())?;
    let level = load_level(args.level.as_ref())?;
    let session = Session::new(
        &level,
        config,
        CellIndex::new(config.spatial_cell_size),
        RecordingAudio::default(),
    )
    .context("starting session")?;

    let mut app = App::new();
    app.insert_non_send_resource(session);
    app.insert_resource(ExitZone(level.end.centre()));
    app.add_plugins(EscortPlugin::<CellIndex, RecordingAudio>::default());
    app.add_systems(
        Update,
        scripted_player_system
            .before(escort::plugin::advance_session_system::<CellIndex, RecordingAudio>),
    );

    for _ in 0..args.ticks {
        app.update();
        if app.world().resource::<SessionStatus>().outcome.is_terminal() {
            break;
        }
    }

    let status = *app.world().resource::<SessionStatus>();
    let finished = app
        .world()
        .get_non_send_resource::<HeadlessSession>()
        .context("session resource missing")?;
    let shots = finished
        .audio()
        .played()
        .filter(|c| *c == SoundCue::GunShot)
        .count();
    if status.outcome.is_terminal() {
        info!(
            "{:?} after {} ticks; {shots} shots, checkpoint {}",
            status.outcome,
            status.ticks,
            finished.checkpoint()
        );
    } else {
        warn!(
            "still running after {} ticks; {shots} shots, checkpoint {}",
            status.ticks,
            finished.checkpoint()
        );
    }
    Ok(())
}
