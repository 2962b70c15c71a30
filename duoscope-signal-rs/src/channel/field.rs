use super::{CHANNEL_COUNT, FIELD_COUNT};
use crate::transfer::ChannelId;

/// Which quantity of a channel a field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Frequency,
    Amplitude,
    Phase,
}

/// Direction of a single edit step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepDirection {
    Add,
    Sub,
}

/// Index of one of the six editable fields (row-major, see the module docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldIndex(u8);

impl FieldIndex {
    /// Every field in cursor order.
    pub const ALL: [FieldIndex; FIELD_COUNT] = [
        FieldIndex(0),
        FieldIndex(1),
        FieldIndex(2),
        FieldIndex(3),
        FieldIndex(4),
        FieldIndex(5),
    ];

    /// Returns `None` if `index >= FIELD_COUNT`.
    pub const fn new(index: usize) -> Option<Self> {
        if index < FIELD_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The channel column this field belongs to.
    pub const fn channel(self) -> ChannelId {
        if self.index() % CHANNEL_COUNT == 0 {
            ChannelId::Ch1
        } else {
            ChannelId::Ch2
        }
    }

    /// The quantity this field edits.
    pub const fn field(self) -> Field {
        match self.index() / CHANNEL_COUNT {
            0 => Field::Frequency,
            1 => Field::Amplitude,
            _ => Field::Phase,
        }
    }

    /// Next field, wrapping from the last back to the first.
    pub const fn next(self) -> Self {
        Self(((self.index() + 1) % FIELD_COUNT) as u8)
    }

    /// Previous field, wrapping from the first to the last.
    pub const fn prev(self) -> Self {
        Self(((self.index() + FIELD_COUNT - 1) % FIELD_COUNT) as u8)
    }
}
