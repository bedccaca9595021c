use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

/// Identifier of an anonymous browsing session, minted by the HTTP layer and
/// carried in a cookie. Scopes the ephemeral cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
