#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Phase director for the wave cycle.
//!
//! The director owns no game state. It reads the current phase and the
//! events of the previous tick and emits the command that moves the world
//! to its next phase: wipe, convergence pause, active play and, after the
//! last life, game over until a restart.

use robotron_core::{Command, Event, Phase};

/// Ticks the convergence pause lasts when convergences do not finish earlier.
pub const SPAWN_PAUSE_TICKS: u32 = 90;

/// Facts the director needs about the rest of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectorView {
    /// Phase the world is in.
    pub phase: Phase,
    /// Whether the screen wipe has fully revealed the scene.
    pub transition_finished: bool,
    /// Number of convergence effects still playing.
    pub active_convergences: usize,
    /// Whether the player asked to restart this tick.
    pub restart_requested: bool,
}

/// Emits phase commands for the wave cycle.
#[derive(Debug, Default)]
pub struct WaveDirector {
    booted: bool,
    pause_ticks: u32,
}

impl WaveDirector {
    /// Creates a director that starts the first wave on its first tick.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the previous tick's events and emits at most one phase command.
    pub fn handle(&mut self, events: &[Event], view: DirectorView, out: &mut Vec<Command>) {
        if !self.booted {
            self.booted = true;
            out.push(Command::StartWave);
            return;
        }

        for event in events {
            match event {
                Event::WaveCleared { wave } => {
                    tracing::debug!(wave, "wave cleared, starting the next one");
                    out.push(Command::StartWave);
                    return;
                }
                Event::GameReset => {
                    out.push(Command::StartWave);
                    return;
                }
                Event::PhaseChanged {
                    phase: Phase::SpawnConverge,
                } => self.pause_ticks = 0,
                _ => {}
            }
        }

        match view.phase {
            Phase::TransitionIn => {
                if view.transition_finished {
                    out.push(Command::BeginConvergence);
                }
            }
            Phase::SpawnConverge => {
                self.pause_ticks += 1;
                let settled = self.pause_ticks > 1 && view.active_convergences == 0;
                if settled || self.pause_ticks >= SPAWN_PAUSE_TICKS {
                    tracing::debug!(ticks = self.pause_ticks, "convergence pause over");
                    out.push(Command::Activate);
                }
            }
            Phase::GameOver => {
                if view.restart_requested {
                    out.push(Command::Restart);
                }
            }
            Phase::Active => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_starts_a_wave_regardless_of_phase() {
        let mut director = WaveDirector::new();
        let mut out = Vec::new();
        director.handle(
            &[],
            DirectorView {
                phase: Phase::GameOver,
                transition_finished: false,
                active_convergences: 0,
                restart_requested: true,
            },
            &mut out,
        );
        assert_eq!(out, vec![Command::StartWave]);
    }
}
