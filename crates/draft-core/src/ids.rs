//! Branded ID newtypes.
//!
//! The chat platform hands us opaque numeric snowflakes for members and
//! messages. Wrapping them in distinct newtypes keeps a participant id from
//! ever being passed where a surface id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a draft participant (a chat platform member id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

/// Identity of a rendered output surface (a chat platform message id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(u64);

/// Handle of a draft session.
///
/// A session is keyed by the id of its *primary* output surface, so the
/// handle is a `SurfaceId` under a different brand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(u64);

macro_rules! id_impls {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                /// Wrap a raw platform snowflake.
                #[must_use]
                pub const fn new(raw: u64) -> Self {
                    Self(raw)
                }

                /// The raw snowflake value.
                #[must_use]
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $ty {
                fn from(raw: u64) -> Self {
                    Self(raw)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

id_impls!(ParticipantId, SurfaceId, SessionHandle);

impl From<SurfaceId> for SessionHandle {
    fn from(surface: SurfaceId) -> Self {
        Self(surface.get())
    }
}

impl SessionHandle {
    /// The primary surface this handle was derived from.
    #[must_use]
    pub const fn primary_surface(self) -> SurfaceId {
        SurfaceId::new(self.0)
    }
}
