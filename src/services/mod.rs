pub mod activity;
pub mod ladder;
pub mod server;
