use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::UserId;
use super::repository::{ProfileRepository, RepositoryError};

/// Where company identities manage their listings instead of browsing.
pub const MANAGEMENT_PATH: &str = "/api/v1/employer/jobs";

/// Row of the `profiles` table; its presence marks a user as a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub id: UserId,
    pub company_name: String,
    #[serde(default)]
    pub website: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Identity of the current viewer, resolved once per request and handed to
/// whatever needs it.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user_id: Option<UserId>,
    profile: Option<CompanyProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseGate {
    Allowed,
    RedirectTo(&'static str),
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(user_id: Option<UserId>, profile: Option<CompanyProfile>) -> Self {
        Self { user_id, profile }
    }

    /// Resolve the profile of an asserted identity. Anonymous viewers skip the lookup.
    pub fn resolve<P>(profiles: &P, user_id: Option<UserId>) -> Result<Self, RepositoryError>
    where
        P: ProfileRepository + ?Sized,
    {
        let profile = match &user_id {
            Some(id) => profiles.fetch(id)?,
            None => None,
        };
        Ok(Self { user_id, profile })
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn profile(&self) -> Option<&CompanyProfile> {
        self.profile.as_ref()
    }

    pub fn is_company(&self) -> bool {
        self.user_id.is_some() && self.profile.is_some()
    }

    /// Company name stamped on new listings.
    pub fn company_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(|profile| profile.company_name.as_str())
            .unwrap_or("Empresa")
    }

    pub fn browse_gate(&self) -> BrowseGate {
        if self.is_company() {
            BrowseGate::RedirectTo(MANAGEMENT_PATH)
        } else {
            BrowseGate::Allowed
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub company_name: String,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("company name is required")]
    MissingCompanyName,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub fn upsert_profile<P>(
    profiles: &P,
    user_id: &UserId,
    update: ProfileUpdate,
    now: DateTime<Utc>,
) -> Result<CompanyProfile, ProfileError>
where
    P: ProfileRepository + ?Sized,
{
    let company_name = update.company_name.trim();
    if company_name.is_empty() {
        return Err(ProfileError::MissingCompanyName);
    }
    let website = update
        .website
        .map(|site| site.trim().to_string())
        .filter(|site| !site.is_empty());

    let stored = profiles.upsert(CompanyProfile {
        id: user_id.clone(),
        company_name: company_name.to_string(),
        website,
        updated_at: now,
    })?;
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CompanyProfile {
        CompanyProfile {
            id: UserId("emp-1".to_string()),
            company_name: "Soda La Esquina".to_string(),
            website: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn anonymous_and_profileless_users_may_browse() {
        assert_eq!(SessionContext::anonymous().browse_gate(), BrowseGate::Allowed);

        let seeker = SessionContext::new(Some(UserId("u-1".to_string())), None);
        assert!(!seeker.is_company());
        assert_eq!(seeker.browse_gate(), BrowseGate::Allowed);
        assert_eq!(seeker.company_name(), "Empresa");
    }

    #[test]
    fn company_identities_are_redirected_to_management() {
        let company = SessionContext::new(Some(UserId("emp-1".to_string())), Some(profile()));
        assert!(company.is_company());
        assert_eq!(company.browse_gate(), BrowseGate::RedirectTo(MANAGEMENT_PATH));
        assert_eq!(company.company_name(), "Soda La Esquina");
    }
}
