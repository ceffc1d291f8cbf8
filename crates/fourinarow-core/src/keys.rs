//! Key bitmask sampled once per frame

use std::ops::{BitAnd, BitOr};

/// Set of keys held down during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeySet(u8);

impl KeySet {
    pub const NONE: KeySet = KeySet(0);
    pub const X: KeySet = KeySet(0x01);
    pub const DOWN: KeySet = KeySet(0x02);
    pub const LEFT: KeySet = KeySet(0x04);
    pub const RIGHT: KeySet = KeySet(0x08);
    pub const UP: KeySet = KeySet(0x10);
    pub const O: KeySet = KeySet(0x20);
    /// Terminal-only escape hatch (Esc, Ctrl-C, q)
    pub const QUIT: KeySet = KeySet(0x40);

    /// Every button on the device. Used as the "previous frame" before the
    /// first sample so keys already held at startup do not register as presses.
    pub const ALL: KeySet = KeySet(0x3f);

    /// Keys that drop a piece
    pub const DROP: KeySet = KeySet(Self::DOWN.0 | Self::O.0 | Self::X.0);

    /// Keys that pick a menu entry
    pub const SELECT: KeySet = KeySet(Self::O.0 | Self::X.0);

    pub const fn from_bits(bits: u8) -> Self {
        KeySet(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether any key of `other` is held
    pub const fn intersects(self, other: KeySet) -> bool {
        self.0 & other.0 != 0
    }

    /// Keys held now that were not held in `previous`
    pub const fn pressed_since(self, previous: KeySet) -> KeySet {
        KeySet(self.0 & !previous.0)
    }
}

impl BitOr for KeySet {
    type Output = KeySet;

    fn bitor(self, rhs: KeySet) -> KeySet {
        KeySet(self.0 | rhs.0)
    }
}

impl BitAnd for KeySet {
    type Output = KeySet;

    fn bitand(self, rhs: KeySet) -> KeySet {
        KeySet(self.0 & rhs.0)
    }
}
