//! Bevy plugin driving a [`Session`] from the app schedule.
//!
//! The session lives in the world as a non-send resource because its
//! collaborators (spatial index, audio sink) are not required to be `Send`.
//! Each `Update` runs one simulation tick with the latest [`PendingInput`],
//! mirrors the result into [`SessionStatus`] and, once play stops, triggers a
//! [`SessionEnded`] event.

use std::marker::PhantomData;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::info;

use crate::audio::AudioSink;
use crate::session::{Outcome, Session, TickInput};
use crate::spatial::SpatialIndex;

/// Player commands consumed by the next tick.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PendingInput(pub TickInput);

/// Progress of the session, readable by other systems.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    /// Ticks run so far.
    pub ticks: u64,
    /// Latest outcome.
    pub outcome: Outcome,
}

/// Raised once when the session reaches a terminal outcome.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnded {
    /// How play ended.
    pub outcome: Outcome,
    /// Tick on which it ended.
    pub ticks: u64,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_session_end(event: On<SessionEnded>) {
    let SessionEnded { outcome, ticks } = *event.event();
    info!("session ended after {ticks} ticks: {outcome:?}");
}

/// Runs one tick of the session and publishes the outcome.
///
/// Input is consumed, so a fire or reload request acts on exactly one tick.
pub fn advance_session_system<I, A>(
    mut session: NonSendMut<Session<I, A>>,
    mut input: ResMut<PendingInput>,
    mut status: ResMut<SessionStatus>,
    mut commands: Commands,
) where
    I: SpatialIndex + 'static,
    A: AudioSink + 'static,
{
    if status.outcome.is_terminal() {
        return;
    }
    let tick_input = std::mem::take(&mut input.0);
    let outcome = session.tick(&tick_input);
    status.ticks = session.ticks();
    status.outcome = outcome;
    if outcome.is_terminal() {
        commands.trigger(SessionEnded {
            outcome,
            ticks: status.ticks,
        });
    }
}

/// Installs the session systems for a session with index `I` and audio `A`.
///
/// The session itself must be inserted with
/// [`App::insert_non_send_resource`] before the first update.
pub struct EscortPlugin<I, A> {
    marker: PhantomData<fn() -> (I, A)>,
}

impl<I, A> Default for EscortPlugin<I, A> {
    fn default() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<I, A> Plugin for EscortPlugin<I, A>
where
    I: SpatialIndex + 'static,
    A: AudioSink + 'static,
{
    fn build(&self, app: &mut App) {
        app.add_observer(log_session_end);
        app.init_resource::<PendingInput>();
        app.init_resource::<SessionStatus>();
        app.add_systems(Update, advance_session_system::<I, A>);
    }
}
