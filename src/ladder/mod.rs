pub mod activity;
pub mod challenge_rules;
pub mod resolver;
pub mod types;

pub use activity::{ActivityCounters, PlayerActivity, TeamActivity};
pub use challenge_rules::{ChallengeVerdict, validate};
pub use resolver::{MatchOutcome, ScoreError, resolve};
pub use types::{
    ActivityStatus, ChallengeStatus, Discipline, EntityId, Gender, Pool, Position, SetScore,
};
