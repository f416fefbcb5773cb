//! Simulation tuning.
//!
//! Every value has a default in [`crate::constants`]; a JSON document may
//! override any subset of them.

use serde::Deserialize;
use thiserror::Error;

use crate::agent::ZombieKind;
use crate::constants as k;
use crate::path::PathEnd;

/// Errors raised while loading or validating a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("invalid simulation config: {field} {reason}")]
    Invalid {
        /// Offending field, dotted path.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Movement and toughness of one zombie variant.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ZombieStats {
    /// Distance moved per tick.
    pub speed: f32,
    /// Hits needed to kill.
    pub hit_to_die: i32,
    /// Side length of the square footprint.
    pub size: f32,
}

/// Zombie variants and shared perception.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZombieConfig {
    /// Ordinary shambler.
    pub normal: ZombieStats,
    /// Fast, fragile runner.
    pub sprinter: ZombieStats,
    /// Slow, tough crawler.
    pub crawler: ZombieStats,
    /// The boss, phase one.
    pub big: ZombieStats,
    /// Zombies chase targets closer than this.
    pub sight_range: f32,
}

impl ZombieConfig {
    /// Stats for `kind`.
    #[must_use]
    pub const fn stats(&self, kind: ZombieKind) -> ZombieStats {
        match kind {
            ZombieKind::Normal => self.normal,
            ZombieKind::Sprinter => self.sprinter,
            ZombieKind::Crawler => self.crawler,
            ZombieKind::Big => self.big,
        }
    }
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            normal: ZombieStats {
                speed: k::ZOMBIE_NORMAL_SPEED,
                hit_to_die: k::ZOMBIE_NORMAL_HITS,
                size: k::ZOMBIE_SIZE,
            },
            sprinter: ZombieStats {
                speed: k::ZOMBIE_SPRINTER_SPEED,
                hit_to_die: k::ZOMBIE_SPRINTER_HITS,
                size: k::ZOMBIE_SIZE,
            },
            crawler: ZombieStats {
                speed: k::ZOMBIE_CRAWLER_SPEED,
                hit_to_die: k::ZOMBIE_CRAWLER_HITS,
                size: k::ZOMBIE_SIZE,
            },
            big: ZombieStats {
                speed: k::ZOMBIE_BIG_SPEED,
                hit_to_die: k::ZOMBIE_BIG_HITS,
                size: k::BOSS_SIZE,
            },
            sight_range: k::ZOMBIE_SIGHT_RANGE,
        }
    }
}

/// Companion behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DogConfig {
    /// Distance moved per tick.
    pub speed: f32,
    /// Distance at which a path point counts as reached.
    pub arrive_epsilon: f32,
    /// The dog waits while the player is further away than this.
    pub leash_distance: f32,
    /// Zombies inside this radius make the dog bark.
    pub bark_range: f32,
    /// Minimum ticks between barks.
    pub bark_cooldown_ticks: u64,
    /// Behaviour at the end of the authored path.
    pub path_end: PathEnd,
}

impl Default for DogConfig {
    fn default() -> Self {
        Self {
            speed: k::DOG_SPEED,
            arrive_epsilon: k::DOG_ARRIVE_EPSILON,
            leash_distance: k::DOG_LEASH_DISTANCE,
            bark_range: k::DOG_BARK_RANGE,
            bark_cooldown_ticks: k::DOG_BARK_COOLDOWN_TICKS,
            path_end: PathEnd::Clamp,
        }
    }
}

/// Player movement and weapon.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Distance moved per tick.
    pub speed: f32,
    /// Side length of the square footprint.
    pub size: f32,
    /// Maximum distance of a shot.
    pub fire_range: f32,
    /// Rounds per magazine.
    pub ammo_capacity: u32,
    /// Duration of a reload.
    pub reload_ticks: u32,
    /// Recovery time after a shot.
    pub shot_ticks: u32,
    /// Recovery time after a dry fire.
    pub dry_fire_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: k::PLAYER_SPEED,
            size: k::PLAYER_SIZE,
            fire_range: k::FIRE_RANGE,
            ammo_capacity: k::AMMO_CAPACITY,
            reload_ticks: k::RELOAD_TICKS,
            shot_ticks: k::SHOT_TICKS,
            dry_fire_ticks: k::DRY_FIRE_TICKS,
        }
    }
}

/// All simulation tunables.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World units per grid tile.
    pub tile_size: f32,
    /// Animation frames advance every this many ticks.
    pub frame_divisor: u64,
    /// Samples per Bezier segment.
    pub bezier_resolution: u32,
    /// Cell size of the reference spatial index.
    pub spatial_cell_size: f32,
    /// Companion settings.
    pub dog: DogConfig,
    /// Zombie settings.
    pub zombies: ZombieConfig,
    /// Player settings.
    pub player: PlayerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tile_size: k::TILE_SIZE,
            frame_divisor: k::FRAME_DIVISOR,
            bezier_resolution: k::BEZIER_RESOLUTION,
            spatial_cell_size: k::SPATIAL_CELL_SIZE,
            dog: DogConfig::default(),
            zombies: ZombieConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

fn positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a positive finite number",
        })
    }
}

impl SimConfig {
    /// Parses a JSON document, filling gaps with defaults, and validates it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that sizes and speeds are positive and counts are non-zero.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.tile_size, "tile_size")?;
        positive(self.spatial_cell_size, "spatial_cell_size")?;
        positive(self.dog.speed, "dog.speed")?;
        positive(self.dog.arrive_epsilon, "dog.arrive_epsilon")?;
        positive(self.player.speed, "player.speed")?;
        positive(self.player.size, "player.size")?;
        positive(self.player.fire_range, "player.fire_range")?;
        for (stats, field) in [
            (self.zombies.normal, "zombies.normal"),
            (self.zombies.sprinter, "zombies.sprinter"),
            (self.zombies.crawler, "zombies.crawler"),
            (self.zombies.big, "zombies.big"),
        ] {
            positive(stats.speed, field)?;
            positive(stats.size, field)?;
            if stats.hit_to_die < 1 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "hit_to_die must be at least 1",
                });
            }
        }
        if self.frame_divisor == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_divisor",
                reason: "must be non-zero",
            });
        }
        if self.bezier_resolution == 0 {
            return Err(ConfigError::Invalid {
                field: "bezier_resolution",
                reason: "must be non-zero",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[rstest]
    fn partial_documents_keep_defaults() {
        let config = SimConfig::from_json_str(r#"{ "frame_divisor": 1, "dog": { "path_end": "loop" } }"#)
            .unwrap_or_else(|e| panic!("config: {e}"));
        assert_eq!(config.frame_divisor, 1);
        assert_eq!(config.dog.path_end, PathEnd::Loop);
        assert!((config.dog.speed - k::DOG_SPEED).abs() < f32::EPSILON);
    }

    #[rstest]
    #[case(r#"{ "frame_divisor": 0 }"#, "frame_divisor")]
    #[case(r#"{ "tile_size": -1.0 }"#, "tile_size")]
    fn rejects_out_of_range_values(#[case] json: &str, #[case] expected: &str) {
        match SimConfig::from_json_str(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }
}
