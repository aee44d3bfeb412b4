use serde::{Deserialize, Serialize};

use super::google::AuthProviderError;

/// One address reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEmail {
    pub value: String,
    pub verified: bool,
}

/// Authenticated profile as handed back by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub subject: String,
    pub display_name: String,
    pub emails: Vec<ProfileEmail>,
}

/// Local identity signed into the session token. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub google_id: String,
    pub email: String,
    pub display_name: String,
}

impl Identity {
    /// Takes the first verified, non-blank email of the profile.
    pub fn from_profile(profile: ProviderProfile) -> Result<Self, AuthProviderError> {
        let email = profile
            .emails
            .into_iter()
            .find(|e| e.verified && !e.value.trim().is_empty())
            .map(|e| e.value)
            .ok_or(AuthProviderError::NoUsableEmail)?;

        Ok(Self {
            google_id: profile.subject,
            email,
            display_name: profile.display_name,
        })
    }
}
