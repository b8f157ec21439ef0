pub mod driver;
pub mod pacer;
