//! Typed identifiers.
//!
//! Replay recordings carry a UUID v7 so logs from different sessions are
//! never confused. Everything that is part of simulation state uses small
//! sequential indices instead ([`BannerIndex`], [`ObjectEntryIndex`]), so
//! that peers applying the same commands allocate the same values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for one replay recording.
    ReplayId
}

/// Index of a banner (signage attached to scenery) in the world's banner table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BannerIndex(pub u16);

impl core::fmt::Display for BannerIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "banner {}", self.0)
    }
}

/// Index of a loaded object definition in the scenery catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectEntryIndex(pub u16);

impl core::fmt::Display for ObjectEntryIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_ids_are_unique() {
        assert_ne!(ReplayId::new(), ReplayId::new());
        assert_ne!(ReplayId::new().into_inner(), Uuid::nil());
    }

    #[test]
    fn replay_id_roundtrip_serde() {
        let original = ReplayId::new();
        let json = serde_json::to_string(&original).ok();
        let restored: Option<ReplayId> = json
            .as_deref()
            .and_then(|text| serde_json::from_str(text).ok());
        assert_eq!(restored, Some(original));
    }

    #[test]
    fn entry_index_is_transparent() {
        let json = serde_json::to_string(&ObjectEntryIndex(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
        assert_eq!(ObjectEntryIndex(7).to_string(), "#7");
        assert_eq!(BannerIndex(2).to_string(), "banner 2");
    }
}
