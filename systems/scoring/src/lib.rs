#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score, lives and wave progression.

use robotron_core::{Event, Species};

/// Lives granted at the start of a playthrough.
pub const STARTING_LIVES: u32 = 3;
/// Base points for saving a rescuable, scaled by the multiplier.
pub const RESCUE_POINTS: u32 = 1000;
/// Highest rescue multiplier reachable within one wave.
pub const MAX_MULTIPLIER: u32 = 5;
/// Points for destroying an enemy shot.
pub const INTERCEPT_POINTS: u32 = 25;
/// Score interval at which a bonus life is granted.
pub const LIFE_BONUS_INTERVAL: u32 = 25_000;

/// Reason points are being awarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Award {
    /// An enemy of the given species was destroyed.
    Kill(Species),
    /// An enemy shot was destroyed.
    Intercept,
    /// A rescuable was saved.
    Rescue,
}

/// Running totals for one playthrough.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progression {
    score: u32,
    lives: u32,
    starting_lives: u32,
    wave: u32,
    multiplier: u32,
    next_life_bonus: u32,
}

impl Progression {
    /// Creates a fresh progression before the first wave.
    #[must_use]
    pub const fn new(starting_lives: u32) -> Self {
        Self {
            score: 0,
            lives: starting_lives,
            starting_lives,
            wave: 0,
            multiplier: 1,
            next_life_bonus: LIFE_BONUS_INTERVAL,
        }
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Lives left.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Current wave, zero before the first wave starts.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Multiplier applied to the next rescue.
    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Reports whether every life has been spent.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Advances to the next wave and resets the rescue multiplier.
    pub fn begin_wave(&mut self) -> u32 {
        self.wave += 1;
        self.multiplier = 1;
        self.wave
    }

    /// Adds the points for `award`, granting bonus lives as thresholds are crossed.
    ///
    /// Returns the number of points added.
    pub fn award(&mut self, award: Award, out: &mut Vec<Event>) -> u32 {
        let points = match award {
            Award::Kill(species) => kill_points(species),
            Award::Intercept => INTERCEPT_POINTS,
            Award::Rescue => {
                let points = RESCUE_POINTS * self.multiplier;
                self.multiplier = (self.multiplier + 1).min(MAX_MULTIPLIER);
                points
            }
        };
        if points == 0 {
            return 0;
        }

        self.score = self.score.saturating_add(points);
        out.push(Event::ScoreAwarded {
            points,
            score: self.score,
        });

        while self.score >= self.next_life_bonus {
            self.lives += 1;
            self.next_life_bonus = self.next_life_bonus.saturating_add(LIFE_BONUS_INTERVAL);
            tracing::info!(lives = self.lives, score = self.score, "bonus life");
            out.push(Event::LifeGained { lives: self.lives });
        }
        points
    }

    /// Spends one life and returns how many remain.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Clears every counter back to its starting value.
    pub fn reset(&mut self) {
        *self = Self::new(self.starting_lives);
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(STARTING_LIVES)
    }
}

fn kill_points(species: Species) -> u32 {
    match species.profile().points {
        Some(points) => points,
        None if species.is_invulnerable() => 0,
        None => {
            tracing::error!(species = species.name(), "no point value for destroyed species");
            0
        }
    }
}
