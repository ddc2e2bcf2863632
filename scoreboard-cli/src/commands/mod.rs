pub mod award;
pub mod board;
pub mod config;
pub mod export;
pub mod profile;
pub mod sync;
