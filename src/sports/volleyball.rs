//! Volleyball sport layout.
//!
//! Item numbers follow the All Sport 5000 volleyball RTD insert. The item
//! space below 200 matches basketball; above it the insert carries serve
//! indicators and set counts instead of possession and bonus state.

use serde::Serialize;

use crate::boolean_field::BooleanField;
use crate::field::{Field, Justify};
use crate::schema_group;

use super::common::{GameClock, Timeouts};

/// Complete volleyball schema tree.
pub struct Volleyball {
    pub clock: GameClock,
    pub home: Team,
    pub guest: Team,
    pub game: GameInfo,
}

schema_group!(Volleyball { clock, home, guest, game });

impl Volleyball {
    pub fn new() -> Self {
        Self {
            clock: GameClock::new(),
            home: Team::home(),
            guest: Team::guest(),
            game: GameInfo::new(),
        }
    }
}

impl Default for Volleyball {
    fn default() -> Self {
        Self::new()
    }
}

/// One side of the net.
pub struct Team {
    pub name: Field<String>,
    pub abbreviation: Field<String>,
    pub score: Field<u32>,
    pub timeouts: Timeouts,
    /// Set while this team is serving.
    pub serving: BooleanField,
    pub sets_won: Field<u32>,
    /// The six players currently on the court.
    pub in_game: Vec<PlayerGroup>,
    /// The full fifteen-player roster.
    pub roster: Vec<PlayerGroup>,
}

schema_group!(Team {
    name,
    abbreviation,
    score,
    timeouts,
    serving,
    sets_won,
    in_game,
    roster,
});

impl Team {
    fn home() -> Self {
        Self {
            name: Field::text(48, 20, Justify::Left),
            abbreviation: Field::text(88, 10, Justify::Left),
            score: Field::number(108, 4),
            timeouts: Timeouts::new(116, 132, '<', None),
            serving: BooleanField::new(201, '<'),
            sets_won: Field::number(215, 2),
            in_game: player_groups(262, 6),
            roster: player_groups(304, 15),
        }
    }

    fn guest() -> Self {
        Self {
            name: Field::text(68, 20, Justify::Left),
            abbreviation: Field::text(98, 10, Justify::Left),
            score: Field::number(112, 4),
            timeouts: Timeouts::new(124, 137, '>', None),
            serving: BooleanField::new(208, '>'),
            sets_won: Field::number(217, 2),
            in_game: player_groups(429, 6),
            roster: player_groups(471, 15),
        }
    }
}

/// One player line: an in-court flag, jersey number, and the two
/// console-defined stat columns.
pub struct PlayerGroup {
    pub status: BooleanField,
    /// Jersey number, kept as text to preserve leading zeros ("00").
    pub number: Field<String>,
    pub user_defined_1: Field<String>,
    pub user_defined_2: Field<String>,
}

schema_group!(PlayerGroup { status, number, user_defined_1, user_defined_2 });

impl PlayerGroup {
    fn new(start_item: usize) -> Self {
        Self {
            status: BooleanField::new(start_item, '>'),
            number: Field::text(start_item + 1, 2, Justify::Right),
            user_defined_1: Field::text(start_item + 3, 2, Justify::Right),
            user_defined_2: Field::text(start_item + 5, 2, Justify::Right),
        }
    }

    /// Copy the current values out into a serializable snapshot.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            number: self.number.value().cloned(),
            in_game: self.status.value(),
            user_defined_1: self.user_defined_1.value().cloned(),
            user_defined_2: self.user_defined_2.value().cloned(),
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
    pub user_defined_1: Option<String>,
    pub user_defined_2: Option<String>,
}

/// Game- and match-level counters.
pub struct GameInfo {
    /// Game (set) number within the match (item 142).
    pub number: Field<u32>,
    /// Match number (item 219).
    pub match_number: Field<u32>,
    /// Home games won this match (item 240).
    pub home_games_won: Field<u32>,
    /// Guest games won this match (item 260).
    pub guest_games_won: Field<u32>,
}

schema_group!(GameInfo { number, match_number, home_games_won, guest_games_won });

impl GameInfo {
    fn new() -> Self {
        Self {
            number: Field::number(142, 2),
            match_number: Field::number(219, 3),
            home_games_won: Field::number(240, 2),
            guest_games_won: Field::number(260, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::apply;
    use crate::test_utils::packet;

    #[test]
    fn serve_indicators_are_team_specific() {
        let mut game = Volleyball::new();

        // Items 201..=208: home serve flag then guest's.
        assert!(apply(&mut game, &packet(200, b"<       ")));
        assert_eq!(game.home.serving.value(), Some(true));
        assert_eq!(game.guest.serving.value(), Some(false));

        assert!(apply(&mut game, &packet(200, b"       >")));
        assert_eq!(game.home.serving.value(), Some(false));
        assert_eq!(game.guest.serving.value(), Some(true));
    }

    #[test]
    fn sets_won_sit_in_adjacent_items() {
        let mut game = Volleyball::new();

        // Items 215..=218.
        assert!(apply(&mut game, &packet(214, b" 2 1")));
        assert_eq!(game.home.sets_won.value(), Some(&2));
        assert_eq!(game.guest.sets_won.value(), Some(&1));
    }

    #[test]
    fn timeouts_carry_no_caption() {
        let game = Volleyball::new();
        assert!(game.home.timeouts.text.is_none());
        assert!(game.guest.timeouts.text.is_none());
    }

    #[test]
    fn player_snapshot_keeps_user_defined_columns_as_text() {
        let mut game = Volleyball::new();

        // First home in-court player group, items 262 onward.
        assert!(apply(&mut game, &packet(261, b">07 512 ")));

        let snapshot = game.home.in_game[0].snapshot();
        assert_eq!(snapshot.number.as_deref(), Some("07"));
        assert_eq!(snapshot.in_game, Some(true));
        assert_eq!(snapshot.user_defined_1.as_deref(), Some("5"));
        assert_eq!(snapshot.user_defined_2.as_deref(), Some("12"));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["number"], "07");
        assert_eq!(json["in_game"], true);
    }
}
