use lettre::transport::smtp::authentication::Mechanism;
use tracing::{debug, info};

use super::error::RelayError;
use super::options::RelayCredential;
use super::session::RelaySession;

/// Logs in over an open session. A rejection is logged and returned, never
/// escalated past the caller's profile.
pub fn authenticate<S: RelaySession + ?Sized>(
    session: &mut S,
    credential: &RelayCredential,
    mechanisms: &[Mechanism],
) -> Result<(), RelayError> {
    debug!(target: "relaycheck", username = %credential.username, ?mechanisms, "authenticating");
    match session.login(credential, mechanisms) {
        Ok(()) => Ok(()),
        Err(err) => {
            info!(
                target: "relaycheck",
                username = %credential.username,
                error = %err,
                "authentication failed"
            );
            Err(err)
        }
    }
}
