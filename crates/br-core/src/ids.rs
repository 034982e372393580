//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  `ComponentId` and `BusinessId` are
//! arena indices into `World`; `ExposureId` is the building identifier used
//! by the exposure dataset; `NodeId` is a road-network node; `TripId` is the
//! OD table's agent id.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a component (building, bridge, roadway, …) in `World`.
    pub struct ComponentId(u32);
}

typed_id! {
    /// Index of a business in `World`.
    pub struct BusinessId(u32);
}

typed_id! {
    /// Road-network node identifier as used by the traffic simulator.
    pub struct NodeId(u32);
}

typed_id! {
    /// Building identifier from the exposure dataset (the `AIM_id` column).
    pub struct ExposureId(u32);
}

typed_id! {
    /// Agent id of one OD trip.  `u64` so synthetic trips can be minted from
    /// a range far above anything the source dataset uses.
    pub struct TripId(u64);
}

impl NodeId {
    /// Parse a node id from the textual form found in external tables.
    ///
    /// Accepts plain integers and integral floats (`"42"`, `"42.0"`), since
    /// geospatial joins frequently emit node ids as floating-point columns.
    pub fn parse(raw: &str) -> Option<NodeId> {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<u32>() {
            return Some(NodeId(n));
        }
        let f = raw.parse::<f64>().ok()?;
        if f.fract() == 0.0 && f >= 0.0 && f < u32::MAX as f64 {
            Some(NodeId(f as u32))
        } else {
            None
        }
    }
}
