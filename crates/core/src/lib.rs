pub mod classification;
pub mod config;
pub mod detection;
pub mod notification;
pub mod pipeline;
pub mod preview;
pub mod shared;
pub mod video;
