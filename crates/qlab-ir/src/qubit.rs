//! Wire identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! wire_index {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self(index)
            }
        }
    };
}

wire_index!(
    /// A qubit. Qubit `i` is bit `i` of a measured integer outcome.
    QubitId,
    "q"
);

wire_index!(
    /// A classical bit.
    ClbitId,
    "c"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        assert_eq!(QubitId(3).to_string(), "q3");
        assert_eq!(ClbitId::from(0).to_string(), "c0");
    }

    #[test]
    fn test_serializes_as_plain_index() {
        assert_eq!(serde_json::to_string(&QubitId(5)).unwrap(), "5");
        assert_eq!(QubitId(5).index(), 5);
    }
}
