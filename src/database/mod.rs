pub mod challenges;
pub mod connection;
pub mod cycles;
pub mod entities;
pub mod matches;
pub mod models;
pub mod players;
pub mod setup;
pub mod teams;
pub mod tournaments;

pub use connection::{
    DbConn, DbPool, create_memory_pool, create_pool, get_connection, in_transaction,
};
pub use models::*;
