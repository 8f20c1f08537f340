//! Generic fixed-width field extraction with change detection.
//!
//! A [`Field`] is a long-lived schema leaf bound to a 1-based item number
//! and a fixed width. Each incoming [`Packet`] covers only a window of the
//! full item space, so most updates are out-of-window no-ops; when the field
//! is covered, the raw slice is trimmed by justification, parsed, and
//! compared against the stored value.
//!
//! Notifications are explicit per-field broadcast channels rather than named
//! events: [`samples`](Field::samples) fires on every successful parse (for
//! per-frame consumers like timestamping UIs), [`changes`](Field::changes)
//! only when the parsed value actually differs.

use tokio::sync::broadcast;
use tracing::trace;

use crate::packet::{Packet, latin1};

pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Justification of a field within the payload.
///
/// Determines which side is padding: right-justified values are padded on
/// the left, left-justified values on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Right,
}

/// Emitted on every packet that successfully parses into a field, even when
/// the value is unchanged.
#[derive(Debug, Clone)]
pub struct FieldSample<T> {
    pub value: T,
    /// The raw, untrimmed slice the value was parsed from.
    pub raw: String,
}

/// Emitted only when a field's parsed value changes.
#[derive(Debug, Clone)]
pub struct FieldChange<T> {
    pub value: T,
    /// The previous value; `None` on the first ever successful parse.
    pub previous: Option<T>,
    /// The raw, untrimmed slice the value was parsed from.
    pub raw: String,
}

/// A fixed-width, positionally addressed scoreboard value.
///
/// The stored value starts uninitialized and only ever changes through a
/// successful [`update`](Field::update); a blank or unparseable sample keeps
/// the last known value.
#[derive(Debug)]
pub struct Field<T> {
    item: usize,
    length: usize,
    justify: Justify,
    parse: fn(&str) -> Option<T>,
    equals: fn(&T, &T) -> bool,
    value: Option<T>,
    raw: String,
    samples: Option<broadcast::Sender<FieldSample<T>>>,
    changes: Option<broadcast::Sender<FieldChange<T>>>,
}

impl Field<String> {
    /// A plain text field (identity parse).
    pub fn text(item: usize, length: usize, justify: Justify) -> Self {
        Self::with_parser(item, length, justify, |s| Some(s.to_owned()))
    }
}

impl Field<u32> {
    /// A right-justified decimal field (scores, foul counts, timeouts).
    ///
    /// The parse is permissive about residual whitespace on either side.
    pub fn number(item: usize, length: usize) -> Self {
        Self::with_parser(item, length, Justify::Right, |s| s.trim().parse().ok())
    }
}

impl<T: Clone + PartialEq> Field<T> {
    /// A field with a custom parse function and `PartialEq` equality.
    pub fn with_parser(
        item: usize,
        length: usize,
        justify: Justify,
        parse: fn(&str) -> Option<T>,
    ) -> Self {
        Self {
            item,
            length,
            justify,
            parse,
            equals: |a, b| a == b,
            value: None,
            raw: String::new(),
            samples: None,
            changes: None,
        }
    }
}

impl<T: Clone> Field<T> {
    /// Replace the equality comparator used for change detection.
    pub fn with_equality(mut self, equals: fn(&T, &T) -> bool) -> Self {
        self.equals = equals;
        self
    }

    /// Current parsed value, `None` until the first successful parse.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Last raw slice (unparsed, untrimmed).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 1-based item number this field is addressed at.
    pub fn item(&self) -> usize {
        self.item
    }

    /// Fixed width in payload characters.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Subscribe to per-sample notifications.
    pub fn samples(&mut self) -> broadcast::Receiver<FieldSample<T>> {
        self.samples
            .get_or_insert_with(|| broadcast::channel(EVENT_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Subscribe to value-change notifications.
    pub fn changes(&mut self) -> broadcast::Receiver<FieldChange<T>> {
        self.changes
            .get_or_insert_with(|| broadcast::channel(EVENT_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Apply a packet to this field.
    ///
    /// Returns whether the parsed value changed. Out-of-window packets,
    /// blank slices, and unparseable samples all return `false` and leave
    /// the stored value untouched; none of them is an error.
    pub fn update(&mut self, packet: &Packet) -> bool {
        let Some(slice) = packet.item_slice(self.item, self.length) else {
            return false;
        };

        // The raw slice is stored even when it trims to nothing.
        self.raw = latin1(slice);

        let trimmed = match self.justify {
            Justify::Right => self.raw.trim_start(),
            Justify::Left => self.raw.trim_end(),
        };
        if trimmed.is_empty() {
            return false;
        }

        let Some(new_value) = (self.parse)(trimmed) else {
            trace!(item = self.item, raw = %self.raw, "field sample failed to parse");
            return false;
        };

        if let Some(tx) = &self.samples {
            let _ = tx.send(FieldSample { value: new_value.clone(), raw: self.raw.clone() });
        }

        let changed = match &self.value {
            Some(current) => !(self.equals)(current, &new_value),
            None => true,
        };

        if changed {
            let previous = self.value.take();
            self.value = Some(new_value.clone());
            if let Some(tx) = &self.changes {
                let _ = tx.send(FieldChange { value: new_value, previous, raw: self.raw.clone() });
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::packet;

    #[test]
    fn left_justified_extraction_trims_trailing_whitespace() {
        let mut clock = Field::text(1, 5, Justify::Left);
        let changed = clock.update(&packet(0, b"00:30     "));

        assert!(changed);
        assert_eq!(clock.value().map(String::as_str), Some("00:30"));
        assert_eq!(clock.raw(), "00:30");
    }

    #[test]
    fn right_justified_numeric_trims_leading_whitespace() {
        let mut score = Field::number(1, 4);
        let changed = score.update(&packet(0, b"  12"));

        assert!(changed);
        assert_eq!(score.value(), Some(&12));
        assert_eq!(score.raw(), "  12");
    }

    #[test]
    fn repeat_sample_fires_sample_but_not_change() {
        let mut score = Field::number(1, 4);
        let mut samples = score.samples();
        let mut changes = score.changes();

        assert!(score.update(&packet(0, b"  12")));
        assert!(!score.update(&packet(0, b"  12")));

        assert_eq!(samples.try_recv().unwrap().value, 12);
        assert_eq!(samples.try_recv().unwrap().value, 12);
        assert!(samples.try_recv().is_err());

        let change = changes.try_recv().unwrap();
        assert_eq!(change.value, 12);
        assert_eq!(change.previous, None);
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn change_event_carries_previous_value() {
        let mut score = Field::number(1, 4);
        let mut changes = score.changes();

        score.update(&packet(0, b"  12"));
        score.update(&packet(0, b"  14"));

        let first = changes.try_recv().unwrap();
        assert_eq!((first.value, first.previous), (12, None));
        let second = changes.try_recv().unwrap();
        assert_eq!((second.value, second.previous), (14, Some(12)));
    }

    #[test]
    fn out_of_window_leaves_value_untouched() {
        let mut score = Field::number(108, 4);
        score.update(&packet(107, b"  21"));
        assert_eq!(score.value(), Some(&21));

        // Window of a different packet does not cover item 108.
        assert!(!score.update(&packet(200, b"05:00   ")));
        assert_eq!(score.value(), Some(&21));
        assert_eq!(score.raw(), "  21");
    }

    #[test]
    fn blank_slice_keeps_last_known_value() {
        let mut name = Field::text(1, 6, Justify::Left);
        name.update(&packet(0, b"TIGERS"));
        assert_eq!(name.value().map(String::as_str), Some("TIGERS"));

        let mut changes = name.changes();
        assert!(!name.update(&packet(0, b"      ")));
        // Raw slice is recorded, value and events are not.
        assert_eq!(name.raw(), "      ");
        assert_eq!(name.value().map(String::as_str), Some("TIGERS"));
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn parse_failure_keeps_previous_state() {
        let mut score = Field::number(1, 4);
        score.update(&packet(0, b"  12"));

        assert!(!score.update(&packet(0, b"??!!")));
        assert_eq!(score.value(), Some(&12));
    }

    #[test]
    fn custom_equality_suppresses_changes() {
        // Case-insensitive equality: recased text is not a change.
        let mut text = Field::text(1, 4, Justify::Left)
            .with_equality(|a, b| a.eq_ignore_ascii_case(b));

        assert!(text.update(&packet(0, b"POSS")));
        assert!(!text.update(&packet(0, b"poss")));
        assert_eq!(text.value().map(String::as_str), Some("POSS"));
    }

    #[test]
    fn field_honors_packet_offset() {
        // Item 201 at offset 200 is payload index 0.
        let mut shot = Field::text(201, 8, Justify::Left);
        assert!(shot.update(&packet(200, b"00:24   ")));
        assert_eq!(shot.value().map(String::as_str), Some("00:24"));
    }
}
