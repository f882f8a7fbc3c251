pub mod exercise;
pub mod tracking;
pub mod users;
pub mod workout;
