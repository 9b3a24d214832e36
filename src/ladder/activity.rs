use serde::Serialize;

use super::types::ActivityStatus;
use crate::config::settings::ActivitySettings;

/// Participation counters for one discipline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCounters {
    pub challenges_emitted: i64,
    pub challenges_accepted: i64,
    pub challenges_won: i64,
    pub defenses_successful: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisciplineActivity {
    pub index: i64,
    pub status: ActivityStatus,
}

/// Derived fields persisted for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerActivity {
    pub singles: DisciplineActivity,
    pub doubles: DisciplineActivity,
    pub general: ActivityStatus,
}

/// Derived fields persisted for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamActivity {
    pub doubles: DisciplineActivity,
    pub general: ActivityStatus,
}

pub fn activity_index(counters: &ActivityCounters, settings: &ActivitySettings) -> i64 {
    counters.challenges_emitted * settings.emitted_weight
        + counters.challenges_accepted * settings.accepted_weight
        + counters.challenges_won * settings.won_weight
        + counters.defenses_successful * settings.defended_weight
}

pub fn status_for_index(index: i64, settings: &ActivitySettings) -> ActivityStatus {
    if index >= settings.green_threshold {
        ActivityStatus::Green
    } else if index >= settings.yellow_threshold {
        ActivityStatus::Yellow
    } else {
        ActivityStatus::Red
    }
}

pub fn discipline_activity(
    counters: &ActivityCounters,
    settings: &ActivitySettings,
) -> DisciplineActivity {
    let index = activity_index(counters, settings);
    DisciplineActivity {
        index,
        status: status_for_index(index, settings),
    }
}

/// Best status across disciplines, forced to red once the cycle's rejections
/// reach the configured limit.
pub fn general_status(
    statuses: &[ActivityStatus],
    rejections_current_cycle: i64,
    settings: &ActivitySettings,
) -> ActivityStatus {
    if rejections_current_cycle >= settings.rejection_limit {
        return ActivityStatus::Red;
    }
    statuses
        .iter()
        .copied()
        .max()
        .unwrap_or(ActivityStatus::Red)
}

pub fn player_activity(
    singles: &ActivityCounters,
    doubles: &ActivityCounters,
    rejections_current_cycle: i64,
    settings: &ActivitySettings,
) -> PlayerActivity {
    let singles = discipline_activity(singles, settings);
    let doubles = discipline_activity(doubles, settings);
    let general = general_status(
        &[singles.status, doubles.status],
        rejections_current_cycle,
        settings,
    );
    PlayerActivity {
        singles,
        doubles,
        general,
    }
}

pub fn team_activity(
    counters: &ActivityCounters,
    rejections_current_cycle: i64,
    settings: &ActivitySettings,
) -> TeamActivity {
    let doubles = discipline_activity(counters, settings);
    let general = general_status(&[doubles.status], rejections_current_cycle, settings);
    TeamActivity { doubles, general }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(emitted: i64, accepted: i64, won: i64, defended: i64) -> ActivityCounters {
        ActivityCounters {
            challenges_emitted: emitted,
            challenges_accepted: accepted,
            challenges_won: won,
            defenses_successful: defended,
        }
    }

    #[test]
    fn test_weighted_index() {
        let settings = ActivitySettings::default();
        let activity = discipline_activity(&counters(2, 1, 1, 0), &settings);
        assert_eq!(activity.index, 7);
        assert_eq!(activity.status, ActivityStatus::Yellow);
    }

    #[test]
    fn test_threshold_edges() {
        let settings = ActivitySettings::default();
        assert_eq!(status_for_index(5, &settings), ActivityStatus::Red);
        assert_eq!(status_for_index(6, &settings), ActivityStatus::Yellow);
        assert_eq!(status_for_index(11, &settings), ActivityStatus::Yellow);
        assert_eq!(status_for_index(12, &settings), ActivityStatus::Green);
    }

    #[test]
    fn test_general_takes_best_discipline() {
        let settings = ActivitySettings::default();
        let activity = player_activity(&counters(0, 0, 0, 0), &counters(0, 0, 4, 0), 0, &settings);
        assert_eq!(activity.singles.status, ActivityStatus::Red);
        assert_eq!(activity.doubles.status, ActivityStatus::Green);
        assert_eq!(activity.general, ActivityStatus::Green);

        let activity = player_activity(&counters(6, 0, 0, 0), &counters(1, 0, 0, 0), 0, &settings);
        assert_eq!(activity.general, ActivityStatus::Yellow);
    }

    #[test]
    fn test_rejections_force_general_red_only() {
        let settings = ActivitySettings::default();
        let activity = player_activity(&counters(4, 4, 4, 4), &counters(0, 0, 0, 0), 2, &settings);
        assert_eq!(activity.singles.index, 28);
        assert_eq!(activity.singles.status, ActivityStatus::Green);
        assert_eq!(activity.general, ActivityStatus::Red);

        let activity = player_activity(&counters(4, 4, 4, 4), &counters(0, 0, 0, 0), 1, &settings);
        assert_eq!(activity.general, ActivityStatus::Green);
    }

    #[test]
    fn test_team_override_is_independent() {
        let settings = ActivitySettings::default();
        let team = team_activity(&counters(0, 2, 3, 0), 0, &settings);
        assert_eq!(team.doubles.index, 13);
        assert_eq!(team.general, ActivityStatus::Green);

        let team = team_activity(&counters(0, 2, 3, 0), 3, &settings);
        assert_eq!(team.doubles.status, ActivityStatus::Green);
        assert_eq!(team.general, ActivityStatus::Red);
    }
}
