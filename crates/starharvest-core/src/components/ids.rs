//! Strongly typed identifiers.
//!
//! Identifiers are strings on the wire (`"planet-sol-2"`, `"robot-1700000000000"`)
//! so persisted records stay readable; in code each kind gets its own type so
//! a robot id can never be looked up as a resource id.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Identity of a star system (`"sol"`)
    SystemId
);
string_id!(
    /// Identity of a planet (`"planet-sol-{index}"`)
    PlanetId
);
string_id!(
    /// Identity of a resource node (`"resource-sol-{planet}-{node}"`)
    ResourceId
);
string_id!(
    /// Identity of a harvesting robot (`"robot-{created_at_ms}"`)
    RobotId
);
