//! Bitset flag types.
//!
//! [`GameCommandFlags`] are ambient to one invocation and supplied by the
//! dispatcher; they travel over the wire in the command envelope.
//! [`ActionFlags`] describe how an action type behaves and are declared by
//! the action itself.

use core::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Per-invocation command flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCommandFlags(pub u32);

impl GameCommandFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// The call mutates the world (execute phase).
    pub const APPLY: Self = Self(1 << 0);
    /// The call is being re-applied from a replay log.
    pub const REPLAY: Self = Self(1 << 1);
    /// The call may run while the game is paused.
    pub const ALLOW_DURING_PAUSED: Self = Self(1 << 3);
    /// The call must not charge the park.
    pub const NO_SPEND: Self = Self(1 << 5);
    /// The call targets ghost (preview) elements only.
    pub const GHOST: Self = Self(1 << 6);
    /// The call is part of an area sweep; costs are deduplicated per object.
    pub const PATH_SCENERY: Self = Self(1 << 7);
    /// The call arrived from a network peer.
    pub const NETWORKED: Self = Self(1 << 31);

    const NAMED: [(&'static str, Self); 7] = [
        ("apply", Self::APPLY),
        ("replay", Self::REPLAY),
        ("allow_during_paused", Self::ALLOW_DURING_PAUSED),
        ("no_spend", Self::NO_SPEND),
        ("ghost", Self::GHOST),
        ("path_scenery", Self::PATH_SCENERY),
        ("networked", Self::NETWORKED),
    ];

    /// Return the raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return `self` with the bits of `other` added.
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Return `self` with the bits of `other` cleared.
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Look up a flag by its script name (e.g. `"ghost"`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(flag_name, _)| *flag_name == name)
            .map(|(_, flag)| *flag)
    }

    /// Script names of every set flag, in bit order.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl BitOr for GameCommandFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl BitOrAssign for GameCommandFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.with(rhs);
    }
}

/// Behavioural flags an action type declares about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionFlags(pub u16);

impl ActionFlags {
    /// No behavioural flags.
    pub const NONE: Self = Self(0);
    /// The action may run while the game is paused.
    pub const ALLOW_WHILE_PAUSED: Self = Self(1 << 0);
    /// The action only affects the local client and is never sent to peers.
    pub const CLIENT_ONLY: Self = Self(1 << 1);
    /// The action is only available in the scenario editor.
    pub const EDITOR_ONLY: Self = Self(1 << 2);
    /// The action is not recorded in replay logs.
    pub const IGNORE_FOR_REPLAYS: Self = Self(1 << 3);

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return `self` with the bits of `other` added.
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for ActionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bits_match_wire_values() {
        assert_eq!(GameCommandFlags::GHOST.bits(), 0x40);
        assert_eq!(GameCommandFlags::PATH_SCENERY.bits(), 0x80);
        assert_eq!(GameCommandFlags::NETWORKED.bits(), 0x8000_0000);
    }

    #[test]
    fn with_and_without_toggle_bits() {
        let flags = GameCommandFlags::GHOST | GameCommandFlags::APPLY;
        assert!(flags.contains(GameCommandFlags::GHOST));
        assert!(!flags.without(GameCommandFlags::GHOST).contains(GameCommandFlags::GHOST));
        assert!(flags.without(GameCommandFlags::GHOST).contains(GameCommandFlags::APPLY));
    }

    #[test]
    fn empty_set_is_contained_everywhere() {
        assert!(GameCommandFlags::NONE.contains(GameCommandFlags::NONE));
        assert!(ActionFlags::EDITOR_ONLY.contains(ActionFlags::NONE));
    }

    #[test]
    fn names_round_trip_through_lookup() {
        let flags = GameCommandFlags::NO_SPEND | GameCommandFlags::PATH_SCENERY;
        let rebuilt = flags
            .names()
            .into_iter()
            .filter_map(GameCommandFlags::from_name)
            .fold(GameCommandFlags::NONE, GameCommandFlags::with);
        assert_eq!(rebuilt, flags);
        assert_eq!(GameCommandFlags::from_name("teleport"), None);
    }
}
