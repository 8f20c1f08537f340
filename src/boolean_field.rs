//! Single-character two-state flag fields.
//!
//! Horn indicators, possession arrows, clock-stopped flags and the like are
//! one character wide: one character means "on", another (usually space)
//! means "off". Any other character is transient garbage and is ignored.

use tokio::sync::broadcast;

use crate::field::{EVENT_CHANNEL_CAPACITY, FieldChange, FieldSample};
use crate::packet::Packet;

/// A scoreboard flag mapping a single payload character to a boolean.
///
/// The value is `None` until the first character match; the first resolution
/// counts as a change.
#[derive(Debug)]
pub struct BooleanField {
    item: usize,
    true_char: char,
    false_char: char,
    value: Option<bool>,
    raw: String,
    samples: Option<broadcast::Sender<FieldSample<bool>>>,
    changes: Option<broadcast::Sender<FieldChange<bool>>>,
}

impl BooleanField {
    /// A flag whose "off" state is the usual space character.
    pub fn new(item: usize, true_char: char) -> Self {
        Self::with_false_char(item, true_char, ' ')
    }

    /// A flag with an explicit "off" character.
    pub fn with_false_char(item: usize, true_char: char, false_char: char) -> Self {
        Self {
            item,
            true_char,
            false_char,
            value: None,
            raw: String::new(),
            samples: None,
            changes: None,
        }
    }

    /// Current value, `None` until a character has matched.
    pub fn value(&self) -> Option<bool> {
        self.value
    }

    /// Whether a valid state has ever been observed.
    pub fn initialized(&self) -> bool {
        self.value.is_some()
    }

    /// Last raw character slice.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 1-based item number this flag is addressed at.
    pub fn item(&self) -> usize {
        self.item
    }

    /// Subscribe to per-sample notifications.
    pub fn samples(&mut self) -> broadcast::Receiver<FieldSample<bool>> {
        self.samples
            .get_or_insert_with(|| broadcast::channel(EVENT_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Subscribe to value-change notifications.
    pub fn changes(&mut self) -> broadcast::Receiver<FieldChange<bool>> {
        self.changes
            .get_or_insert_with(|| broadcast::channel(EVENT_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Apply a packet to this flag.
    ///
    /// Returns whether the resolved boolean changed. Out-of-window packets
    /// and unrecognized characters leave the stored value untouched.
    pub fn update(&mut self, packet: &Packet) -> bool {
        let Some(slice) = packet.item_slice(self.item, 1) else {
            return false;
        };

        let raw_char = slice[0] as char;
        self.raw = raw_char.to_string();

        let new_value = if raw_char == self.true_char {
            true
        } else if raw_char == self.false_char {
            false
        } else {
            // Unknown character: transient garbage, ignore silently.
            return false;
        };

        if let Some(tx) = &self.samples {
            let _ = tx.send(FieldSample { value: new_value, raw: self.raw.clone() });
        }

        // First resolution counts as a change.
        let changed = self.value != Some(new_value);
        if changed {
            let previous = self.value.replace(new_value);
            if let Some(tx) = &self.changes {
                let _ = tx.send(FieldChange { value: new_value, previous, raw: self.raw.clone() });
            }
        }

        changed
    }
}
