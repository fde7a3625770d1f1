#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave population system.
//!
//! Reacts to [`Event::WaveStarted`] by looking up per-species counts in the
//! wave-intensity table and emitting one [`Command::SpawnActor`] per actor,
//! placed uniformly inside the play area but outside the hero's safe zone.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use robotron_core::{display_center, play_area, Command, Event, Rect, Species};
use serde::Deserialize;
use thiserror::Error;

/// Wave table shipped with the game.
pub const BUNDLED_WAVES: &str = include_str!("../../../assets/waves.toml");

/// Half the side length of the square kept clear around the hero spawn point.
pub const SAFE_ZONE_HALF_EXTENT: i32 = 30;

/// Positions drawn per actor before the safe zone is deemed to cover the arena.
pub const MAX_SPAWN_ATTEMPTS: u32 = 1_000;

/// Species populated from the table, in spawn order.
pub const SPAWN_ORDER: [Species; 9] = [
    Species::Grunt,
    Species::Hulk,
    Species::Electrode,
    Species::Brain,
    Species::Spheroid,
    Species::Quark,
    Species::Dad,
    Species::Mom,
    Species::Mike,
];

/// Failures raised while loading or querying the wave table.
#[derive(Debug, Error)]
pub enum WaveTableError {
    /// The table has no row for a species that must be spawned.
    #[error("wave table has no entry for species `{species}`")]
    MissingSpecies {
        /// Name of the missing species.
        species: &'static str,
    },
    /// The species row has no count for the requested wave.
    #[error("wave table has no wave {wave} for species `{species}`")]
    MissingWave {
        /// Name of the species that was queried.
        species: &'static str,
        /// One-based wave number that was queried.
        wave: u32,
    },
    /// Every sampled position overlapped the safe zone.
    #[error("no room to spawn `{species}` outside the safe zone after {attempts} attempts")]
    NoSpawnRoom {
        /// Name of the species being placed.
        species: &'static str,
        /// Positions drawn before giving up.
        attempts: u32,
    },
    /// A row names something that is not a species.
    #[error("wave table has a row for unknown species `{name}`")]
    UnknownSpecies {
        /// Row name as written in the table.
        name: String,
    },
    /// The table is not valid TOML or has the wrong shape.
    #[error("failed to parse wave table")]
    Parse(#[from] toml::de::Error),
    /// The table file could not be read.
    #[error("failed to read wave table from {path}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Per-species actor counts keyed by wave number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct WaveTable {
    rows: BTreeMap<String, BTreeMap<String, u32>>,
}

impl WaveTable {
    /// Parses a table from TOML text.
    ///
    /// Rows must be named after species; a misspelt row is rejected rather than
    /// silently ignored.
    pub fn from_toml_str(source: &str) -> Result<Self, WaveTableError> {
        let table: Self = toml::from_str(source)?;
        if let Some(name) = table
            .rows
            .keys()
            .find(|name| Species::from_name(name).is_none())
        {
            return Err(WaveTableError::UnknownSpecies { name: name.clone() });
        }
        Ok(table)
    }

    /// Reads and parses a table from disk.
    pub fn load(path: &Path) -> Result<Self, WaveTableError> {
        let source = fs::read_to_string(path).map_err(|source| WaveTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Parses the table shipped with the game.
    pub fn bundled() -> Result<Self, WaveTableError> {
        Self::from_toml_str(BUNDLED_WAVES)
    }

    /// Number of actors of `species` spawned at the start of `wave`.
    pub fn count(&self, species: Species, wave: u32) -> Result<u32, WaveTableError> {
        let name = species.name();
        let row = self
            .rows
            .get(name)
            .ok_or(WaveTableError::MissingSpecies { species: name })?;
        row.get(&wave.to_string())
            .copied()
            .ok_or(WaveTableError::MissingWave {
                species: name,
                wave,
            })
    }

    /// Checks that every spawned species has a count for `wave`.
    pub fn validate(&self, wave: u32) -> Result<(), WaveTableError> {
        for species in SPAWN_ORDER {
            let _ = self.count(species, wave)?;
        }
        Ok(())
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    safe_zone: Rect,
}

impl Config {
    /// Creates a configuration with the default safe zone around the display centre.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        let centre = display_center();
        let extent = SAFE_ZONE_HALF_EXTENT;
        Self {
            rng_seed,
            safe_zone: Rect::new(
                centre.x as i32 - extent,
                centre.y as i32 - extent,
                extent * 2,
                extent * 2,
            ),
        }
    }

    /// Replaces the rectangle no spawned actor may overlap.
    #[must_use]
    pub const fn with_safe_zone(mut self, safe_zone: Rect) -> Self {
        self.safe_zone = safe_zone;
        self
    }
}

/// System that populates each wave from the wave table.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    safe_zone: Rect,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            safe_zone: config.safe_zone,
        }
    }

    /// Consumes events and emits spawn commands for every wave that started.
    pub fn handle(
        &mut self,
        events: &[Event],
        table: &WaveTable,
        out: &mut Vec<Command>,
    ) -> Result<(), WaveTableError> {
        for event in events {
            if let Event::WaveStarted { wave, .. } = event {
                self.populate(*wave, table, out)?;
            }
        }
        Ok(())
    }

    /// Emits spawn commands for every actor of `wave`.
    ///
    /// Every count is looked up before anything is emitted, so a broken table
    /// never produces a partially populated wave.
    pub fn populate(
        &mut self,
        wave: u32,
        table: &WaveTable,
        out: &mut Vec<Command>,
    ) -> Result<(), WaveTableError> {
        let counts = SPAWN_ORDER
            .iter()
            .map(|&species| table.count(species, wave).map(|count| (species, count)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut planned = Vec::new();
        for (species, count) in counts {
            for _ in 0..count {
                let position = self.sample_position(species)?;
                planned.push(Command::SpawnActor { species, position });
            }
        }
        tracing::debug!(wave, spawned = planned.len(), "wave populated");
        out.extend(planned);
        Ok(())
    }

    fn sample_position(&mut self, species: Species) -> Result<Vec2, WaveTableError> {
        let size = species.profile().size;
        let area = play_area();
        let max_x = (area.right() - size.width()).max(area.left() + 1);
        let max_y = (area.bottom() - size.height()).max(area.top() + 1);
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let x = self.rng.gen_range(area.left()..max_x);
            let y = self.rng.gen_range(area.top()..max_y);
            let rect = Rect::new(x, y, size.width(), size.height());
            if !rect.intersects(&self.safe_zone) {
                return Ok(Vec2::new(x as f32, y as f32));
            }
        }
        Err(WaveTableError::NoSpawnRoom {
            species: species.name(),
            attempts: MAX_SPAWN_ATTEMPTS,
        })
    }
}
