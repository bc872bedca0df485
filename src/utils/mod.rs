//! Small shared helpers.

pub mod plural;
pub mod time;
