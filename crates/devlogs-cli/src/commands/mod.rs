pub mod account;
pub mod entries;
pub mod misc;
