//! Basketball sport layout.
//!
//! Item numbers follow the All Sport 5000 basketball RTD insert. The home
//! and guest trees are shape-identical except that the console only
//! transmits a period-by-period score block for the home team.

use serde::Serialize;

use crate::boolean_field::BooleanField;
use crate::field::{Field, Justify};
use crate::schema_group;

use super::common::{GameClock, Timeouts};

/// Complete basketball schema tree.
///
/// Construct once, then apply decoded packets with [`apply`](crate::apply);
/// each packet touches only the leaves its window covers.
pub struct Basketball {
    pub clock: GameClock,
    pub shot: ShotClock,
    pub home: Team,
    pub guest: Team,
    pub game: GameInfo,
}

schema_group!(Basketball { clock, shot, home, guest, game });

impl Basketball {
    pub fn new() -> Self {
        Self {
            clock: GameClock::new(),
            shot: ShotClock::new(),
            home: Team::home(),
            guest: Team::guest(),
            game: GameInfo::new(),
        }
    }
}

impl Default for Basketball {
    fn default() -> Self {
        Self::new()
    }
}

/// Shot clock time and horn.
pub struct ShotClock {
    /// Shot clock time (item 201).
    pub time: Field<String>,
    /// Shot clock horn sounding (item 209).
    pub horn: BooleanField,
}

schema_group!(ShotClock { time, horn });

impl ShotClock {
    fn new() -> Self {
        Self {
            time: Field::text(201, 8, Justify::Left),
            horn: BooleanField::new(209, 'h'),
        }
    }
}

/// One side of the scoreboard.
pub struct Team {
    pub name: Field<String>,
    pub abbreviation: Field<String>,
    pub score: Field<u32>,
    pub timeouts: Timeouts,
    pub possession: Possession,
    pub bonus: Bonus,
    pub fouls: Fouls,
    /// Period-by-period scores; the console only sends these for home.
    pub score_by_period: Option<ScoreByPeriod>,
    /// The five players currently on the floor.
    pub in_game: Vec<PlayerGroup>,
    /// The full fifteen-player roster.
    pub roster: Vec<PlayerGroup>,
}

schema_group!(Team {
    name,
    abbreviation,
    score,
    timeouts,
    possession,
    bonus,
    fouls,
    score_by_period,
    in_game,
    roster,
});

impl Team {
    fn home() -> Self {
        Self {
            name: Field::text(48, 20, Justify::Left),
            abbreviation: Field::text(88, 10, Justify::Left),
            score: Field::number(108, 4),
            timeouts: Timeouts::new(116, 132, '<', Some(133)),
            possession: Possession::new(210, 211, '<', 212),
            bonus: Bonus::new(222, 223, '<', 224),
            fouls: Fouls::new(236, 240),
            score_by_period: Some(ScoreByPeriod::new(282, 264)),
            in_game: player_groups(304, 5),
            roster: player_groups(346, 15),
        }
    }

    fn guest() -> Self {
        Self {
            name: Field::text(68, 20, Justify::Left),
            abbreviation: Field::text(98, 10, Justify::Left),
            score: Field::number(112, 4),
            timeouts: Timeouts::new(124, 137, '>', Some(138)),
            possession: Possession::new(216, 217, '>', 218),
            bonus: Bonus::new(229, 230, '>', 231),
            fouls: Fouls::new(238, 248),
            score_by_period: None,
            in_game: player_groups(475, 5),
            roster: player_groups(517, 15),
        }
    }
}

/// Possession indicator, arrow, and caption.
pub struct Possession {
    pub indicator: BooleanField,
    pub arrow: BooleanField,
    pub text: Field<String>,
}

schema_group!(Possession { indicator, arrow, text });

impl Possession {
    fn new(indicator_item: usize, arrow_item: usize, arrow_char: char, text_item: usize) -> Self {
        Self {
            indicator: BooleanField::new(indicator_item, arrow_char),
            arrow: BooleanField::new(arrow_item, arrow_char),
            text: Field::text(text_item, 4, Justify::Left),
        }
    }
}

/// Bonus free-throw indicators and caption.
pub struct Bonus {
    pub one_on_one: BooleanField,
    pub two_shot: BooleanField,
    pub text: Field<String>,
}

schema_group!(Bonus { one_on_one, two_shot, text });

impl Bonus {
    fn new(one_item: usize, two_item: usize, arrow_char: char, text_item: usize) -> Self {
        Self {
            one_on_one: BooleanField::new(one_item, arrow_char),
            two_shot: BooleanField::new(two_item, arrow_char),
            text: Field::text(text_item, 5, Justify::Left),
        }
    }
}

/// Team foul count and the foul/points display line.
pub struct Fouls {
    pub team: Field<u32>,
    pub player_foul_points: Field<String>,
}

schema_group!(Fouls { team, player_foul_points });

impl Fouls {
    fn new(team_item: usize, display_item: usize) -> Self {
        Self {
            team: Field::number(team_item, 2),
            player_foul_points: Field::text(display_item, 8, Justify::Left),
        }
    }
}

/// Score broken down by period, plus the in-progress period's score.
pub struct ScoreByPeriod {
    pub current: Field<u32>,
    /// Periods one through nine (four quarters plus overtimes).
    pub periods: Vec<Field<u32>>,
}

schema_group!(ScoreByPeriod { current, periods });

impl ScoreByPeriod {
    fn new(current_item: usize, first_period_item: usize) -> Self {
        Self {
            current: Field::number(current_item, 2),
            periods: (0..9).map(|i| Field::number(first_period_item + i * 2, 2)).collect(),
        }
    }
}

/// One player line: an in-game flag plus number, fouls, and points.
pub struct PlayerGroup {
    pub status: BooleanField,
    /// Jersey number, kept as text to preserve leading zeros ("00").
    pub number: Field<String>,
    pub fouls: Field<u32>,
    pub points: Field<u32>,
}

schema_group!(PlayerGroup { status, number, fouls, points });

impl PlayerGroup {
    fn new(start_item: usize) -> Self {
        Self {
            status: BooleanField::new(start_item, '>'),
            number: Field::text(start_item + 1, 2, Justify::Right),
            fouls: Field::number(start_item + 3, 2),
            points: Field::number(start_item + 5, 2),
        }
    }

    /// Copy the current values out into a serializable snapshot.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            number: self.number.value().cloned(),
            in_game: self.status.value(),
            fouls: self.fouls.value().copied(),
            points: self.points.value().copied(),
        }
    }
}

fn player_groups(first_item: usize, count: usize) -> Vec<PlayerGroup> {
    (0..count).map(|i| PlayerGroup::new(first_item + i * 7)).collect()
}

/// Point-in-time copy of a [`PlayerGroup`], `None` for unreceived fields.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub number: Option<String>,
    pub in_game: Option<bool>,
    pub fouls: Option<u32>,
    pub points: Option<u32>,
}

/// Game-level state: period and the ad panel caption flags.
pub struct GameInfo {
    pub period: Field<u32>,
    /// Period as displayed, e.g. `1st` (item 144).
    pub period_text: Field<String>,
    /// Longer period caption, e.g. `1st Quarter` (item 148).
    pub period_description: Field<String>,
    pub internal_relay: Field<String>,
    pub ad_panels: AdPanels,
}

schema_group!(GameInfo { period, period_text, period_description, internal_relay, ad_panels });

impl GameInfo {
    fn new() -> Self {
        Self {
            period: Field::number(142, 2),
            period_text: Field::text(144, 4, Justify::Left),
            period_description: Field::text(148, 12, Justify::Left),
            internal_relay: Field::text(160, 1, Justify::Left),
            ad_panels: AdPanels::new(),
        }
    }
}

/// Ad panel power and caption flags (items 161 through 165).
pub struct AdPanels {
    pub power: BooleanField,
    pub captions: [BooleanField; 4],
}

schema_group!(AdPanels { power, captions });

impl AdPanels {
    fn new() -> Self {
        Self {
            power: BooleanField::new(161, 'c'),
            captions: [
                BooleanField::new(162, 'c'),
                BooleanField::new(163, 'c'),
                BooleanField::new(164, 'c'),
                BooleanField::new(165, 'c'),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::apply;
    use crate::test_utils::packet;

    #[test]
    fn clock_and_scores_update_from_one_window() {
        let mut game = Basketball::new();

        // Items 106..=115: home score at 108, guest score at 112.
        let payload = b"   67   54  ";
        assert!(apply(&mut game, &packet(105, payload)));

        assert_eq!(game.home.score.value(), Some(&67));
        assert_eq!(game.guest.score.value(), Some(&54));
    }

    #[test]
    fn shot_clock_window_starts_at_item_201() {
        let mut game = Basketball::new();

        assert!(apply(&mut game, &packet(200, b"00:24   ")));
        assert_eq!(game.shot.time.value().map(String::as_str), Some("00:24"));
        assert_eq!(game.shot.horn.value(), None);
    }

    #[test]
    fn guest_has_no_score_by_period() {
        let game = Basketball::new();
        assert!(game.home.score_by_period.is_some());
        assert!(game.guest.score_by_period.is_none());
    }

    #[test]
    fn home_period_scores_are_consecutive_two_wide_items() {
        let mut game = Basketball::new();

        // Items 264..=269: first three period scores.
        assert!(apply(&mut game, &packet(263, b"181220")));

        let by_period = game.home.score_by_period.as_ref().unwrap();
        assert_eq!(by_period.periods[0].value(), Some(&18));
        assert_eq!(by_period.periods[1].value(), Some(&12));
        assert_eq!(by_period.periods[2].value(), Some(&20));
        assert_eq!(by_period.periods[3].value(), None);
    }

    #[test]
    fn player_snapshot_reflects_group_state() {
        let mut game = Basketball::new();

        // First home in-game player group, items 304..=310.
        assert!(apply(&mut game, &packet(303, b">23 214 ")));

        let snapshot = game.home.in_game[0].snapshot();
        assert_eq!(snapshot.number.as_deref(), Some("23"));
        assert_eq!(snapshot.in_game, Some(true));
        assert_eq!(snapshot.fouls, Some(2));
        assert_eq!(snapshot.points, Some(14));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["number"], "23");
        assert_eq!(json["points"], 14);
    }

    #[test]
    fn jersey_number_keeps_leading_zero() {
        let mut game = Basketball::new();

        assert!(apply(&mut game, &packet(303, b">00 0  0")));
        assert_eq!(game.home.in_game[0].number.value().map(String::as_str), Some("00"));
    }

    #[test]
    fn possession_arrows_are_team_specific() {
        let mut game = Basketball::new();

        // Items 210..=217: home indicator/arrow then guest's.
        assert!(apply(&mut game, &packet(209, b"<<      ")));
        assert_eq!(game.home.possession.indicator.value(), Some(true));
        assert_eq!(game.guest.possession.indicator.value(), Some(false));
    }
}
