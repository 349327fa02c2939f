use shared_types::OrganisationId;

/// Caller session as resolved by the transport layer.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait SessionProvider: Send + Sync {
    fn session(&self) -> Option<Session>;
}

pub struct NoSessionProvider;

impl SessionProvider for NoSessionProvider {
    fn session(&self) -> Option<Session> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub organisation_id: OrganisationId,
    pub user_id: String,
}
