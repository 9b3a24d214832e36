#[derive(Debug, Clone)]
pub struct ActivitySettings {
    pub emitted_weight: i64,
    pub accepted_weight: i64,
    pub won_weight: i64,
    pub defended_weight: i64,
    pub green_threshold: i64,
    pub yellow_threshold: i64,
    pub rejection_limit: i64,
}

impl Default for ActivitySettings {
    fn default() -> Self {
        Self {
            emitted_weight: 1,
            accepted_weight: 2,
            won_weight: 3,
            defended_weight: 1,
            green_threshold: 12,
            yellow_threshold: 6,
            rejection_limit: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "tennis_ladder.db".to_string()),
            max_connections: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub activity: ActivitySettings,
    pub database: DatabaseSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            activity: ActivitySettings::default(),
            database: DatabaseSettings::default(),
        }
    }
}
