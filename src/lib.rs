pub mod champions;
pub mod classifier;
pub mod config;
pub mod demo_feed;
pub mod features;
pub mod http_client;
pub mod live_feed;
pub mod objectives;
pub mod predict;
pub mod roster;
pub mod session;
