//! Repository layer: one zero-sized struct per table, all methods take the pool.

pub mod exercise_repo;
pub mod map_point_repo;
pub mod tracking_data_repo;
pub mod user_repo;
pub mod workout_repo;

pub use exercise_repo::ExerciseRepo;
pub use map_point_repo::MapPointRepo;
pub use tracking_data_repo::TrackingDataRepo;
pub use user_repo::UserRepo;
pub use workout_repo::WorkoutRepo;
