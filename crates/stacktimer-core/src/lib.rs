pub mod config;
pub mod emoji;
pub mod limits;
pub mod protocol;
pub mod task;
