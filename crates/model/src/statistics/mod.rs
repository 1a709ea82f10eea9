pub mod activity;
pub mod day;
pub mod training;
pub mod user;
