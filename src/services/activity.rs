use log::debug;
use rusqlite::Connection;

use crate::config::settings::ActivitySettings;
use crate::database::{players, teams};
use crate::errors::{LadderError, LadderResult};
use crate::ladder::activity::{player_activity, team_activity};
use crate::ladder::{Discipline, EntityId, PlayerActivity, TeamActivity};

/// Recomputes the derived activity fields from stored counters.
///
/// Never touches the counters themselves.
pub struct ActivityService {
    settings: ActivitySettings,
}

impl ActivityService {
    pub fn new(settings: ActivitySettings) -> Self {
        Self { settings }
    }

    pub fn refresh_player(&self, conn: &Connection, id: EntityId) -> LadderResult<PlayerActivity> {
        let player = players::find_by_id(conn, id)?
            .ok_or_else(|| LadderError::not_found(format!("player {id}")))?;

        let activity = player_activity(
            &player.singles,
            &player.doubles,
            player.rejections_current_cycle,
            &self.settings,
        );
        players::update_activity(conn, id, &activity)?;

        debug!(
            "Player {} activity: singles {} ({}), doubles {} ({}), general {}",
            id,
            activity.singles.index,
            activity.singles.status,
            activity.doubles.index,
            activity.doubles.status,
            activity.general
        );
        Ok(activity)
    }

    pub fn refresh_team(&self, conn: &Connection, id: EntityId) -> LadderResult<TeamActivity> {
        let team = teams::find_by_id(conn, id)?
            .ok_or_else(|| LadderError::not_found(format!("team {id}")))?;

        let activity = team_activity(
            &team.counters,
            team.rejections_current_cycle,
            &self.settings,
        );
        teams::update_activity(conn, id, &activity)?;

        debug!(
            "Team {} activity: {} ({})",
            id, activity.doubles.index, activity.general
        );
        Ok(activity)
    }

    /// Refreshes a ladder participant; for a team, its two members as well.
    pub fn refresh_participant(
        &self,
        conn: &Connection,
        discipline: Discipline,
        id: EntityId,
    ) -> LadderResult<()> {
        match discipline {
            Discipline::Singles => {
                self.refresh_player(conn, id)?;
            }
            Discipline::Doubles => {
                let team = teams::find_by_id(conn, id)?
                    .ok_or_else(|| LadderError::not_found(format!("team {id}")))?;
                self.refresh_team(conn, id)?;
                for member in team.members() {
                    self.refresh_player(conn, member)?;
                }
            }
        }
        Ok(())
    }

    /// Full recompute pass over every player and team.
    pub fn refresh_all(&self, conn: &Connection) -> LadderResult<usize> {
        let player_ids = players::list_ids(conn)?;
        let team_ids = teams::list_ids(conn)?;

        for id in &player_ids {
            self.refresh_player(conn, *id)?;
        }
        for id in &team_ids {
            self.refresh_team(conn, *id)?;
        }

        Ok(player_ids.len() + team_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::{CounterDeltas, CounterTarget, apply_counter_deltas};
    use crate::database::{NewPlayer, create_memory_pool, get_connection, setup::init_database};
    use crate::ladder::{ActivityStatus, Gender};

    fn new_player(email: &str) -> NewPlayer {
        NewPlayer {
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            email: email.to_string(),
            gender: Gender::Female,
            category: None,
        }
    }

    #[test]
    fn test_refresh_player_writes_derived_fields() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        init_database(&conn).unwrap();
        let player = players::insert_player(&conn, &new_player("ana@club.es"), 1).unwrap();

        let target = CounterTarget::Player {
            id: player.id,
            discipline: Discipline::Singles,
        };
        let deltas = CounterDeltas {
            emitted: 2,
            accepted: 1,
            won: 1,
            ..CounterDeltas::default()
        };
        apply_counter_deltas(&conn, target, &deltas).unwrap();

        let service = ActivityService::new(ActivitySettings::default());
        let activity = service.refresh_player(&conn, player.id).unwrap();
        assert_eq!(activity.singles.index, 7);

        let stored = players::find_by_id(&conn, player.id).unwrap().unwrap();
        assert_eq!(stored.activity_index_singles, 7);
        assert_eq!(stored.activity_status_singles, ActivityStatus::Yellow);
        assert_eq!(stored.activity_status, ActivityStatus::Yellow);
        assert_eq!(stored.singles.challenges_emitted, 2);
    }

    #[test]
    fn test_refresh_missing_player_is_not_found() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        init_database(&conn).unwrap();

        let service = ActivityService::new(ActivitySettings::default());
        let err = service.refresh_player(&conn, 99).unwrap_err();
        assert!(matches!(err, LadderError::NotFound(_)));
    }
}
