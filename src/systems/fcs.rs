use bevy::prelude::*;

use crate::fcs::{FlightControlSystem, RunOutcome};

/// Global hold: while set, the engine skips every frame.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FcsHold(pub bool);

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FcsStatus {
    pub last: RunOutcome,
    /// Number of executed ticks since startup.
    pub ticks: u64,
}

/// Advances the flight-control engine by one frame.
pub fn flight_control_system(
    mut fcs: ResMut<FlightControlSystem>,
    hold: Res<FcsHold>,
    mut status: ResMut<FcsStatus>,
) {
    let outcome = fcs.run(hold.0);
    if outcome == RunOutcome::Executed {
        status.ticks += 1;
    }
    status.last = outcome;
}
