//! Workout / exercise categories.
//!
//! The string forms must match the `CHECK` constraint on `workouts.workout_type`
//! in `20260301000002_create_workouts_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const EXERCISE_CARDIO: &str = "cardio";
pub const EXERCISE_STRENGTH: &str = "strength";
pub const EXERCISE_FLEXIBILITY: &str = "flexibility";
pub const EXERCISE_BALANCE: &str = "balance";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    #[default]
    Cardio,
    Strength,
    Flexibility,
    Balance,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Cardio => EXERCISE_CARDIO,
            ExerciseType::Strength => EXERCISE_STRENGTH,
            ExerciseType::Flexibility => EXERCISE_FLEXIBILITY,
            ExerciseType::Balance => EXERCISE_BALANCE,
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = CoreError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            EXERCISE_CARDIO => Ok(ExerciseType::Cardio),
            EXERCISE_STRENGTH => Ok(ExerciseType::Strength),
            EXERCISE_FLEXIBILITY => Ok(ExerciseType::Flexibility),
            EXERCISE_BALANCE => Ok(ExerciseType::Balance),
            other => Err(CoreError::Validation(format!(
                "Unknown workout type '{other}'. Expected one of: cardio, strength, flexibility, balance"
            ))),
        }
    }
}
