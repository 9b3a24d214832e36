pub mod settings;

pub use settings::{ActivitySettings, AppConfig, DatabaseSettings};
