pub mod aggregate;
pub mod artifacts;
pub mod config;
pub mod pipeline;
pub mod render;
pub mod sentiment;
pub mod thumbnail;
pub mod video_id;
pub mod youtube;
