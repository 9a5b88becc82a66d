pub mod day;
pub mod materialize;
pub mod recur;
pub mod stats;
pub mod week;
pub mod zone;
