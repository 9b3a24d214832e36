use chrono::Utc;
use log::{debug, info};
use rusqlite::Connection;
use serde::Serialize;

use super::activity::ActivityService;
use crate::config::settings::AppConfig;
use crate::database::entities::{self, CounterDeltas, CounterTarget};
use crate::database::{
    ActivityCycle, Challenge, Match, MatchResult, MatchSummary, NewPlayer, PendingChallengeRow,
    Player, RankedEntity, Team, challenges, cycles, in_transaction, matches, players, teams,
    tournaments,
};
use crate::errors::{LadderError, LadderResult};
use crate::ladder::resolver::{count_sets, parse_score_text};
use crate::ladder::{
    ChallengeStatus, ChallengeVerdict, Discipline, EntityId, Gender, MatchOutcome, Pool, Position,
    SetScore, resolve, validate,
};

/// The active tournament doubles operations are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentContext {
    pub tournament_id: i64,
}

impl TournamentContext {
    pub fn resolve(conn: &Connection, discipline: Discipline) -> LadderResult<Self> {
        let tournament = tournaments::find_active(conn, discipline)?
            .ok_or_else(|| LadderError::not_found(format!("active {discipline} tournament")))?;
        Ok(Self {
            tournament_id: tournament.id,
        })
    }

    pub fn pool(&self, gender: Gender) -> Pool {
        Pool::Doubles {
            tournament_id: self.tournament_id,
            gender,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    #[serde(rename = "match")]
    pub record: Match,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(rename = "match")]
    pub record: Match,
    pub sets: Vec<SetScore>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub player: Player,
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetail {
    pub team: Team,
    pub members: Vec<Player>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReset {
    pub cycle: ActivityCycle,
    pub players_reset: usize,
    pub teams_reset: usize,
    pub entities_refreshed: usize,
}

pub struct LadderService {
    activity: ActivityService,
}

impl LadderService {
    pub fn new(config: AppConfig) -> Self {
        Self {
            activity: ActivityService::new(config.activity),
        }
    }

    // ---- challenges ----

    pub fn validate_challenge(
        &self,
        conn: &Connection,
        discipline: Discipline,
        challenger_id: EntityId,
        challenged_id: EntityId,
    ) -> LadderResult<ChallengeVerdict> {
        let (challenger, challenged) = load_pair(conn, discipline, challenger_id, challenged_id)?;
        let total = entities::count_in_pool(conn, challenger.pool)?;
        Ok(validate(
            challenger.current_position,
            challenged.current_position,
            total,
        ))
    }

    pub fn propose_challenge(
        &self,
        conn: &mut Connection,
        discipline: Discipline,
        challenger_id: EntityId,
        challenged_id: EntityId,
    ) -> LadderResult<Challenge> {
        in_transaction(conn, |tx| {
            if let Some(existing) =
                challenges::find_pending_between(tx, discipline, challenger_id, challenged_id)?
            {
                return Err(LadderError::conflict(format!(
                    "challenge {} is already pending between these {}s",
                    existing.id,
                    entity_label(discipline)
                )));
            }

            let verdict = self.validate_challenge(tx, discipline, challenger_id, challenged_id)?;
            if !verdict.valid {
                return Err(LadderError::RuleViolation(verdict.message));
            }

            let challenge =
                challenges::insert_challenge(tx, discipline, challenger_id, challenged_id)?;
            self.apply_deltas(tx, discipline, challenger_id, CounterDeltas::emitted())?;
            self.activity
                .refresh_participant(tx, discipline, challenger_id)?;

            info!(
                "Challenge {} proposed: {} {} -> {}",
                challenge.id, discipline, challenger_id, challenged_id
            );
            Ok(challenge)
        })
    }

    pub fn reject_challenge(
        &self,
        conn: &mut Connection,
        challenge_id: i64,
    ) -> LadderResult<Challenge> {
        in_transaction(conn, |tx| {
            let challenge = self.close_challenge(tx, challenge_id, ChallengeStatus::Rejected)?;
            self.apply_deltas(
                tx,
                challenge.discipline,
                challenge.challenged_id,
                CounterDeltas::rejection(),
            )?;
            self.activity
                .refresh_participant(tx, challenge.discipline, challenge.challenged_id)?;
            Ok(challenge)
        })
    }

    /// Closes a challenge the challenged side never answered; the challenger is
    /// credited as if it had been accepted.
    pub fn ignore_challenge(
        &self,
        conn: &mut Connection,
        challenge_id: i64,
    ) -> LadderResult<Challenge> {
        in_transaction(conn, |tx| {
            let challenge = self.close_challenge(tx, challenge_id, ChallengeStatus::Ignored)?;
            self.apply_deltas(
                tx,
                challenge.discipline,
                challenge.challenger_id,
                CounterDeltas::accepted(),
            )?;
            self.activity
                .refresh_participant(tx, challenge.discipline, challenge.challenger_id)?;
            Ok(challenge)
        })
    }

    pub fn cancel_challenge(
        &self,
        conn: &mut Connection,
        challenge_id: i64,
    ) -> LadderResult<Challenge> {
        in_transaction(conn, |tx| {
            self.close_challenge(tx, challenge_id, ChallengeStatus::Cancelled)
        })
    }

    fn close_challenge(
        &self,
        conn: &Connection,
        challenge_id: i64,
        status: ChallengeStatus,
    ) -> LadderResult<Challenge> {
        load_pending_challenge(conn, challenge_id)?;
        if !challenges::resolve(conn, challenge_id, status, Utc::now().naive_utc())? {
            return Err(LadderError::conflict(format!(
                "challenge {challenge_id} is no longer pending"
            )));
        }

        info!("Challenge {} {}", challenge_id, status);
        challenges::find_by_id(conn, challenge_id)?
            .ok_or_else(|| LadderError::not_found(format!("challenge {challenge_id}")))
    }

    // ---- matches ----

    pub fn submit_result(
        &self,
        conn: &mut Connection,
        discipline: Discipline,
        challenger_id: EntityId,
        challenged_id: EntityId,
        sets: &[SetScore],
        challenge_id: Option<i64>,
    ) -> LadderResult<MatchReport> {
        count_sets(sets)?;

        in_transaction(conn, |tx| {
            let (challenger, challenged) = load_pair(tx, discipline, challenger_id, challenged_id)?;
            if let Some(id) = challenge_id {
                let challenge = load_pending_challenge(tx, id)?;
                if challenge.discipline != discipline
                    || challenge.challenger_id != challenger_id
                    || challenge.challenged_id != challenged_id
                {
                    return Err(LadderError::validation(format!(
                        "challenge {id} is not between these participants"
                    )));
                }
            }

            let outcome = resolve(
                challenger.current_position,
                challenged.current_position,
                sets,
            )?;
            apply_outcome(tx, &challenger, &challenged, &outcome)?;

            let now = Utc::now().naive_utc();
            let result = match_result(&challenger, &challenged, &outcome);
            let record = matches::insert_match(
                tx,
                discipline,
                challenge_id,
                challenger_id,
                challenged_id,
                &result,
                now,
            )?;

            match challenge_id {
                Some(id) => {
                    if !challenges::resolve(tx, id, ChallengeStatus::Played, now)? {
                        return Err(LadderError::conflict(format!(
                            "challenge {id} is no longer pending"
                        )));
                    }
                }
                None => {
                    self.apply_deltas(tx, discipline, challenger_id, CounterDeltas::emitted())?
                }
            }

            self.apply_deltas(tx, discipline, challenged_id, CounterDeltas::accepted())?;
            if outcome.challenger_won {
                self.apply_deltas(tx, discipline, challenger_id, CounterDeltas::won())?;
            } else {
                self.apply_deltas(tx, discipline, challenged_id, CounterDeltas::defended())?;
            }

            self.activity
                .refresh_participant(tx, discipline, challenger_id)?;
            self.activity
                .refresh_participant(tx, discipline, challenged_id)?;

            info!(
                "Match {} recorded ({}): {} vs {} {} swapped={}",
                record.id,
                discipline,
                challenger_id,
                challenged_id,
                record.score_text,
                record.positions_swapped
            );
            Ok(MatchReport { record, outcome })
        })
    }

    /// Replaces a match's score, undoing its position effect before applying the new one.
    pub fn edit_match(
        &self,
        conn: &mut Connection,
        match_id: i64,
        sets: &[SetScore],
    ) -> LadderResult<MatchReport> {
        count_sets(sets)?;

        in_transaction(conn, |tx| {
            let existing = load_match(tx, match_id)?;
            revert_positions(tx, &existing)?;

            let challenger = load_entity(tx, existing.discipline, existing.challenger_id)?;
            let challenged = load_entity(tx, existing.discipline, existing.challenged_id)?;

            let outcome = resolve(
                challenger.current_position,
                challenged.current_position,
                sets,
            )?;
            apply_outcome(tx, &challenger, &challenged, &outcome)?;

            let result = match_result(&challenger, &challenged, &outcome);
            let record = matches::update_result(tx, match_id, &result, Utc::now().naive_utc())?;

            self.activity
                .refresh_participant(tx, record.discipline, record.challenger_id)?;
            self.activity
                .refresh_participant(tx, record.discipline, record.challenged_id)?;

            info!(
                "Match {} edited: {} -> {} swapped={}",
                match_id, existing.score_text, record.score_text, record.positions_swapped
            );
            Ok(MatchReport { record, outcome })
        })
    }

    pub fn delete_match(&self, conn: &mut Connection, match_id: i64) -> LadderResult<Match> {
        in_transaction(conn, |tx| {
            let existing = load_match(tx, match_id)?;
            revert_positions(tx, &existing)?;
            matches::delete_match(tx, match_id)?;

            self.activity
                .refresh_participant(tx, existing.discipline, existing.challenger_id)?;
            self.activity
                .refresh_participant(tx, existing.discipline, existing.challenged_id)?;

            info!(
                "Match {} deleted (positions restored: {})",
                match_id, existing.positions_swapped
            );
            Ok(existing)
        })
    }

    // ---- ladder management ----

    /// Adds a player to the singles ladder, at `position` or at the bottom.
    pub fn create_player(
        &self,
        conn: &mut Connection,
        new_player: &NewPlayer,
        position: Option<Position>,
    ) -> LadderResult<Player> {
        if new_player.first_name.trim().is_empty() || new_player.last_name.trim().is_empty() {
            return Err(LadderError::validation("first and last name are required"));
        }
        if !new_player.email.contains('@') {
            return Err(LadderError::validation(format!(
                "invalid email: {}",
                new_player.email
            )));
        }

        in_transaction(conn, |tx| {
            if players::find_by_email(tx, &new_player.email)?.is_some() {
                return Err(LadderError::conflict(format!(
                    "a player with email {} already exists",
                    new_player.email
                )));
            }

            let bottom = players::count(tx)? + 1;
            let position = position.unwrap_or(bottom);
            if !(1..=bottom).contains(&position) {
                return Err(LadderError::validation(format!(
                    "position must be between 1 and {bottom}, got {position}"
                )));
            }

            if position < bottom {
                let shifted = players::shift_down_from(tx, position)?;
                debug!(
                    "Shifted {} players down from position {}",
                    shifted, position
                );
            }

            let player = players::insert_player(tx, new_player, position)?;
            self.activity.refresh_player(tx, player.id)?;

            info!(
                "Player {} ({}) added at position {}",
                player.id,
                player.full_name(),
                position
            );
            Ok(player)
        })
    }

    /// Registers a doubles team at the bottom of its (tournament, gender) pool.
    pub fn create_team(
        &self,
        conn: &mut Connection,
        ctx: TournamentContext,
        player1_id: EntityId,
        player2_id: EntityId,
        team_name: &str,
    ) -> LadderResult<Team> {
        if player1_id == player2_id {
            return Err(LadderError::validation(
                "a team needs two different players",
            ));
        }
        let team_name = team_name.trim();
        if team_name.is_empty() {
            return Err(LadderError::validation("team name is required"));
        }

        in_transaction(conn, |tx| {
            let player1 = load_player(tx, player1_id)?;
            let player2 = load_player(tx, player2_id)?;
            if player1.gender != player2.gender {
                return Err(LadderError::validation(
                    "both players must have the same gender",
                ));
            }

            for player in [&player1, &player2] {
                if let Some(existing) = teams::find_for_player(tx, ctx.tournament_id, player.id)? {
                    return Err(LadderError::conflict(format!(
                        "{} already plays in team '{}'",
                        player.full_name(),
                        existing.team_name
                    )));
                }
            }

            let position = entities::max_position(tx, ctx.pool(player1.gender))? + 1;
            let team = teams::insert_team(
                tx,
                ctx.tournament_id,
                player1_id,
                player2_id,
                team_name,
                player1.gender,
                position,
            )?;
            self.activity.refresh_team(tx, team.id)?;

            info!(
                "Team {} '{}' added at {} position {}",
                team.id, team.team_name, team.gender, position
            );
            Ok(team)
        })
    }

    pub fn reset_cycle_activity(&self, conn: &mut Connection) -> LadderResult<CycleReset> {
        in_transaction(conn, |tx| {
            let players_reset = players::reset_cycle_rejections(tx)?;
            let teams_reset = teams::reset_cycle_rejections(tx)?;
            if let Some(previous) = cycles::latest(tx)? {
                debug!(
                    "Closing activity cycle {} started at {}",
                    previous.id, previous.started_at
                );
            }
            let cycle = cycles::insert_cycle(tx, Utc::now().naive_utc())?;
            let entities_refreshed = self.activity.refresh_all(tx)?;

            info!(
                "Activity cycle {} started: {} players and {} teams reset",
                cycle.id, players_reset, teams_reset
            );
            Ok(CycleReset {
                cycle,
                players_reset,
                teams_reset,
                entities_refreshed,
            })
        })
    }

    /// Freezes current positions as the initial positions of a new ranking period.
    pub fn start_new_period(&self, conn: &mut Connection) -> LadderResult<usize> {
        in_transaction(conn, |tx| {
            let updated = entities::snapshot_initial_positions(tx)?;
            info!("New ranking period started for {} entities", updated);
            Ok(updated)
        })
    }

    // ---- read models ----

    pub fn singles_standings(&self, conn: &Connection) -> LadderResult<Vec<Player>> {
        Ok(players::list_by_position(conn)?)
    }

    pub fn doubles_standings(
        &self,
        conn: &Connection,
        ctx: TournamentContext,
        gender: Option<Gender>,
    ) -> LadderResult<Vec<Team>> {
        Ok(teams::list_by_position(conn, ctx.tournament_id, gender)?)
    }

    pub fn player_detail(
        &self,
        conn: &Connection,
        player_id: EntityId,
    ) -> LadderResult<PlayerDetail> {
        let player = load_player(conn, player_id)?;
        let memberships = teams::list_ids_for_player(conn, player_id)?
            .into_iter()
            .filter_map(|id| teams::find_by_id(conn, id).transpose())
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(PlayerDetail {
            player,
            teams: memberships,
        })
    }

    pub fn team_detail(&self, conn: &Connection, team_id: EntityId) -> LadderResult<TeamDetail> {
        let team = teams::find_by_id(conn, team_id)?
            .ok_or_else(|| LadderError::not_found(format!("team {team_id}")))?;
        let members = team
            .members()
            .into_iter()
            .map(|id| load_player(conn, id))
            .collect::<LadderResult<Vec<_>>>()?;

        Ok(TeamDetail { team, members })
    }

    pub fn pending_challenges(
        &self,
        conn: &Connection,
        discipline: Option<Discipline>,
    ) -> LadderResult<Vec<PendingChallengeRow>> {
        Ok(challenges::list_pending(conn, discipline)?)
    }

    pub fn match_detail(&self, conn: &Connection, match_id: i64) -> LadderResult<MatchDetail> {
        let record = load_match(conn, match_id)?;
        let sets = parse_score_text(&record.score_text)?;
        Ok(MatchDetail { record, sets })
    }

    pub fn player_history(
        &self,
        conn: &Connection,
        player_id: EntityId,
        limit: i64,
    ) -> LadderResult<Vec<MatchSummary>> {
        load_player(conn, player_id)?;
        Ok(matches::list_for_player(conn, player_id, limit)?)
    }

    /// Applies a counter delta to an entity; team deltas reach both members' doubles counters too.
    fn apply_deltas(
        &self,
        conn: &Connection,
        discipline: Discipline,
        id: EntityId,
        deltas: CounterDeltas,
    ) -> LadderResult<()> {
        match discipline {
            Discipline::Singles => {
                entities::apply_counter_deltas(
                    conn,
                    CounterTarget::Player { id, discipline },
                    &deltas,
                )?;
            }
            Discipline::Doubles => {
                let team = teams::find_by_id(conn, id)?
                    .ok_or_else(|| LadderError::not_found(format!("team {id}")))?;
                entities::apply_counter_deltas(conn, CounterTarget::Team(id), &deltas)?;
                // Rejections stay on the team; members keep their own override.
                let member_deltas = CounterDeltas {
                    rejections: 0,
                    ..deltas
                };
                for member in team.members() {
                    let target = CounterTarget::Player {
                        id: member,
                        discipline,
                    };
                    entities::apply_counter_deltas(conn, target, &member_deltas)?;
                }
            }
        }
        Ok(())
    }
}

fn entity_label(discipline: Discipline) -> &'static str {
    match discipline {
        Discipline::Singles => "player",
        Discipline::Doubles => "team",
    }
}

fn load_entity(
    conn: &Connection,
    discipline: Discipline,
    id: EntityId,
) -> LadderResult<RankedEntity> {
    entities::find_entity(conn, discipline, id)?
        .ok_or_else(|| LadderError::not_found(format!("{} {id}", entity_label(discipline))))
}

fn load_player(conn: &Connection, id: EntityId) -> LadderResult<Player> {
    players::find_by_id(conn, id)?.ok_or_else(|| LadderError::not_found(format!("player {id}")))
}

fn load_match(conn: &Connection, id: i64) -> LadderResult<Match> {
    matches::find_by_id(conn, id)?.ok_or_else(|| LadderError::not_found(format!("match {id}")))
}

fn load_pending_challenge(conn: &Connection, id: i64) -> LadderResult<Challenge> {
    let challenge = challenges::find_by_id(conn, id)?
        .ok_or_else(|| LadderError::not_found(format!("challenge {id}")))?;
    if challenge.status.is_terminal() {
        return Err(LadderError::conflict(format!(
            "challenge {id} is already {}",
            challenge.status
        )));
    }
    Ok(challenge)
}

/// Loads both sides of a challenge or match and checks they share a ladder pool.
fn load_pair(
    conn: &Connection,
    discipline: Discipline,
    challenger_id: EntityId,
    challenged_id: EntityId,
) -> LadderResult<(RankedEntity, RankedEntity)> {
    if challenger_id == challenged_id {
        return Err(LadderError::validation(format!(
            "a {} cannot challenge itself",
            entity_label(discipline)
        )));
    }

    let challenger = load_entity(conn, discipline, challenger_id)?;
    let challenged = load_entity(conn, discipline, challenged_id)?;
    if challenger.pool != challenged.pool {
        return Err(LadderError::validation(format!(
            "{} and {} are not on the same ladder",
            challenger.name, challenged.name
        )));
    }

    Ok((challenger, challenged))
}

fn move_entity(
    conn: &Connection,
    entity: &RankedEntity,
    from: Position,
    to: Position,
) -> LadderResult<()> {
    if from == to {
        return Ok(());
    }
    if !entities::update_position(conn, entity.discipline(), entity.id, from, to)? {
        return Err(LadderError::conflict(format!(
            "{} is no longer at position {from}",
            entity.name
        )));
    }
    Ok(())
}

fn apply_outcome(
    conn: &Connection,
    challenger: &RankedEntity,
    challenged: &RankedEntity,
    outcome: &MatchOutcome,
) -> LadderResult<()> {
    if !outcome.positions_swapped {
        return Ok(());
    }

    move_entity(
        conn,
        challenger,
        challenger.current_position,
        outcome.new_challenger_position,
    )?;
    move_entity(
        conn,
        challenged,
        challenged.current_position,
        outcome.new_challenged_position,
    )?;
    info!(
        "Swapped {} ({} -> {}) with {} ({} -> {})",
        challenger.name,
        challenger.current_position,
        outcome.new_challenger_position,
        challenged.name,
        challenged.current_position,
        outcome.new_challenged_position
    );
    Ok(())
}

/// Puts both sides back where they stood before `record` was applied.
///
/// Fails with a conflict when a later result has already moved either side.
fn revert_positions(conn: &Connection, record: &Match) -> LadderResult<()> {
    if !record.positions_swapped {
        return Ok(());
    }

    let challenger = load_entity(conn, record.discipline, record.challenger_id)?;
    let challenged = load_entity(conn, record.discipline, record.challenged_id)?;
    let (challenger_after, challenged_after) = record.positions_after();

    if challenger.current_position != challenger_after
        || challenged.current_position != challenged_after
    {
        return Err(LadderError::conflict(format!(
            "positions changed since match {}; revert the later results first",
            record.id
        )));
    }

    move_entity(
        conn,
        &challenger,
        challenger_after,
        record.challenger_position_before,
    )?;
    move_entity(
        conn,
        &challenged,
        challenged_after,
        record.challenged_position_before,
    )?;
    debug!("Reverted swap of match {}", record.id);
    Ok(())
}

fn match_result(
    challenger: &RankedEntity,
    challenged: &RankedEntity,
    outcome: &MatchOutcome,
) -> MatchResult {
    let (winner_id, loser_id) = if outcome.challenger_won {
        (challenger.id, challenged.id)
    } else {
        (challenged.id, challenger.id)
    };

    MatchResult {
        winner_id,
        loser_id,
        score_text: outcome.score_text.clone(),
        is_challenger_winner: outcome.challenger_won,
        positions_swapped: outcome.positions_swapped,
        challenger_position_before: challenger.current_position,
        challenged_position_before: challenged.current_position,
    }
}
