use crate::error::Result;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// What an ICO header's type field says the file holds.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ResourceType {
    /// Type 1: icons (`.ico`).
    Icon,
    /// Type 2: cursors (`.cur`).
    Cursor,
}

impl TryFrom<u16> for ResourceType {
    /// The unrecognized type value.
    type Error = u16;

    fn try_from(number: u16) -> std::result::Result<ResourceType, u16> {
        match number {
            1 => Ok(ResourceType::Icon),
            2 => Ok(ResourceType::Cursor),
            other => Err(other),
        }
    }
}

impl From<ResourceType> for u16 {
    fn from(restype: ResourceType) -> u16 {
        match restype {
            ResourceType::Icon => 1,
            ResourceType::Cursor => 2,
        }
    }
}

//===========================================================================//

/// How the reader treats the header's type field.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum TypePolicy {
    /// Accept any value; unknown ones resolve to `None`.
    #[default]
    Permissive,
    /// Reject anything other than icon (1) or cursor (2).
    Strict,
}

impl TypePolicy {
    /// Interprets a raw type field under this policy.  Unknown values are
    /// `Ok(None)` when permissive and a format error when strict.
    pub fn resolve(&self, number: u16) -> Result<Option<ResourceType>> {
        match (ResourceType::try_from(number), *self) {
            (Ok(restype), _) => Ok(Some(restype)),
            (Err(_), TypePolicy::Permissive) => Ok(None),
            (Err(number), TypePolicy::Strict) => {
                invalid_data!(
                    "Invalid resource type ({}, but must be 1 or 2)",
                    number
                );
            }
        }
    }
}

//===========================================================================//


//===========================================================================//
