use shared_types::OrganisationId;

use crate::proto::session_provider::SessionProvider;
use crate::service::error::ValidationError;

/// Rejects calls whose explicit organisation differs from the session one.
/// Calls without a session (internal workers) pass.
pub(crate) fn throw_if_org_not_matching_session(
    organisation_id: &OrganisationId,
    session_provider: &dyn SessionProvider,
) -> Result<(), ValidationError> {
    if session_provider
        .session()
        .is_some_and(|session| session.organisation_id != *organisation_id)
    {
        return Err(ValidationError::Forbidden);
    }

    Ok(())
}
