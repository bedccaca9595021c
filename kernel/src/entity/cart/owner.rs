use serde::{Deserialize, Serialize};

use crate::entity::{SessionId, UserId};

/// Scoping key for a cart: an authenticated account or an anonymous session.
/// Always passed explicitly; the engines never infer a current user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartOwner {
    User(UserId),
    Session(SessionId),
}
