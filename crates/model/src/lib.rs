pub mod attendance;
pub mod errors;
pub mod event;
pub mod ids;
pub mod recurrence;
pub mod roster;
pub mod statistics;
pub mod table;
pub mod time;
pub mod window;
