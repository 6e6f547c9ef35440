//! Tunable constants of the movement system.
//!
//! Every value has a default, a rules file only needs to list the values
//! it changes:
//!
//! ```toml
//! max_path_length = 40
//!
//! [formation]
//! max_slot_distance = 8
//! ```

use crate::error::{Error, ErrorConversion, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementRules {
    /// Paths with more steps than this are treated as nonexistent
    pub max_path_length: usize,
    /// Movement points needed to enter one cell
    pub movement_points_per_cell: u32,
    /// Search cost of a cell no hostile creature threatens
    pub safe_cell_cost: u32,
    /// Search cost of a cell at least one hostile creature threatens
    pub threatened_cell_cost: u32,
    pub formation: FormationRules,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationRules {
    /// Number of rings searched around a taken formation slot
    pub max_search_radius: usize,
    /// Farthest a follower may end up from the leader's destination
    pub max_slot_distance: usize,
    /// A follower's path may be at most this many times longer than its
    /// straight-line distance to the leader's destination
    pub max_detour_ratio: usize,
}

static_assertions::const_assert!(MovementRules::DEFAULT_MOVEMENT_POINTS_PER_CELL > 0);

impl MovementRules {
    pub const DEFAULT_MAX_PATH_LENGTH: usize = 60;
    pub const DEFAULT_MOVEMENT_POINTS_PER_CELL: u32 = 5;

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(Error::from)
            .with_trace_step(format!("reading {}", path.display()))?;
        Self::from_toml_str(&content).with_trace_step(format!("parsing {}", path.display()))
    }
}

impl Default for MovementRules {
    fn default() -> Self {
        Self {
            max_path_length: Self::DEFAULT_MAX_PATH_LENGTH,
            movement_points_per_cell: Self::DEFAULT_MOVEMENT_POINTS_PER_CELL,
            safe_cell_cost: 1,
            threatened_cell_cost: 2,
            formation: FormationRules::default(),
        }
    }
}

impl Default for FormationRules {
    fn default() -> Self {
        Self {
            max_search_radius: 4,
            max_slot_distance: 6,
            max_detour_ratio: 3,
        }
    }
}

// builder
impl MovementRules {
    #[must_use]
    pub fn max_path_length(mut self, value: usize) -> Self {
        self.max_path_length = value;
        self
    }

    #[must_use]
    pub fn threatened_cell_cost(mut self, value: u32) -> Self {
        self.threatened_cell_cost = value;
        self
    }

    #[must_use]
    pub fn formation(mut self, value: FormationRules) -> Self {
        self.formation = value;
        self
    }
}
