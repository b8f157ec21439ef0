pub mod dates;
pub mod ids;
