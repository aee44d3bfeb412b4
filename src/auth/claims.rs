use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// JWT payload: the identity fields at top level plus the timing claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    pub iat: i64, // issued at (unix timestamp)
    pub exp: i64, // expires at (unix timestamp)
}
