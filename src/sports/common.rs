//! Field groups shared by every sport layout.
//!
//! Item numbers below 48 are common to all All Sport 5000 sport inserts;
//! the clock block in particular is byte-identical across sports.

use crate::boolean_field::BooleanField;
use crate::field::{Field, Justify};
use crate::schema_group;

/// Main clock block: game time, time-out time, time of day, and horns.
pub struct GameClock {
    /// Main clock time, `mm:ss` or `ss.t` (item 1).
    pub short: Field<String>,
    /// Main clock time with tenths, `mm:ss.t` (item 6).
    pub long: Field<String>,
    /// Main clock / time out / time of day, whichever is showing (item 14).
    pub combined_short: Field<String>,
    /// Combined display with tenths (item 19).
    pub combined_long: Field<String>,
    /// Set while the main clock reads zero (item 27).
    pub zero: BooleanField,
    /// Set while the main clock is stopped (item 28).
    pub stopped: BooleanField,
    pub horn: Horn,
    /// Time-out clock, `mm:ss` (item 32).
    pub timeout_time: Field<String>,
    /// Wall clock, `hh:mm:ss` (item 40).
    pub time_of_day: Field<String>,
}

schema_group!(GameClock {
    short,
    long,
    combined_short,
    combined_long,
    zero,
    stopped,
    horn,
    timeout_time,
    time_of_day,
});

impl GameClock {
    pub(crate) fn new() -> Self {
        Self {
            short: Field::text(1, 5, Justify::Left),
            long: Field::text(6, 8, Justify::Left),
            combined_short: Field::text(14, 5, Justify::Left),
            combined_long: Field::text(19, 8, Justify::Left),
            zero: BooleanField::new(27, 'z'),
            stopped: BooleanField::new(28, 's'),
            horn: Horn::new(),
            timeout_time: Field::text(32, 8, Justify::Left),
            time_of_day: Field::text(40, 8, Justify::Left),
        }
    }
}

/// Horn status flags (items 29 through 31).
pub struct Horn {
    /// Main or time-out horn sounding.
    pub main_or_timeout: BooleanField,
    /// Main horn sounding.
    pub main: BooleanField,
    /// Time-out horn sounding.
    pub timeout: BooleanField,
}

schema_group!(Horn { main_or_timeout, main, timeout });

impl Horn {
    pub(crate) fn new() -> Self {
        Self {
            main_or_timeout: BooleanField::new(29, 'h'),
            main: BooleanField::new(30, 'h'),
            timeout: BooleanField::new(31, 'h'),
        }
    }
}

/// Per-team time-out counters.
///
/// The four counters sit in consecutive two-character items; the active
/// indicator and its caption live elsewhere in the item space and only some
/// sports carry the caption.
pub struct Timeouts {
    pub full: Field<u32>,
    pub partial: Field<u32>,
    pub television: Field<u32>,
    pub total: Field<u32>,
    /// Set while this team is in a time-out.
    pub active: BooleanField,
    /// Time-out caption, absent on sports that do not transmit one.
    pub text: Option<Field<String>>,
}

schema_group!(Timeouts { full, partial, television, total, active, text });

impl Timeouts {
    pub(crate) fn new(
        first_item: usize,
        active_item: usize,
        active_char: char,
        text_item: Option<usize>,
    ) -> Self {
        Self {
            full: Field::number(first_item, 2),
            partial: Field::number(first_item + 2, 2),
            television: Field::number(first_item + 4, 2),
            total: Field::number(first_item + 6, 2),
            active: BooleanField::new(active_item, active_char),
            text: text_item.map(|item| Field::text(item, 4, Justify::Left)),
        }
    }
}
