use chrono::{DateTime, Local};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{Address, Message};
use tracing::{debug, info};

use super::error::RelayError;
use super::options::RelayCredential;
use super::session::RelaySession;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sender and recipient of the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addresses {
    pub from: Address,
    pub to: Address,
}

impl Addresses {
    pub fn new(from: Address, to: Address) -> Self {
        Self { from, to }
    }
}

/// Plain-text body embedding the credential identifiers so the delivered
/// message can be traced back to the run that produced it.
pub fn diagnostic_body(credential: &RelayCredential, sent_at: &DateTime<Local>) -> String {
    format!(
        "This is a test message sent through the SMTP relay service.\n\
         \n\
         Test details:\n\
         - Sent at: {}\n\
         - Credential ID: {}\n\
         - User ID: {}\n\
         - SMTP username: {}\n\
         \n\
         If you received this message, the SMTP relay service is working.\n\
         \n\
         ---\n\
         SMTP Relay Service Test\n",
        sent_at.format(TIMESTAMP_FORMAT),
        credential.credential_id,
        credential.user_id,
        credential.username,
    )
}

pub fn build_diagnostic_message(
    addresses: &Addresses,
    subject: &str,
    credential: &RelayCredential,
    sent_at: &DateTime<Local>,
) -> Result<Message, RelayError> {
    Message::builder()
        .from(Mailbox::new(None, addresses.from.clone()))
        .to(Mailbox::new(None, addresses.to.clone()))
        .subject(subject)
        .date_now()
        .header(ContentType::TEXT_PLAIN)
        .body(diagnostic_body(credential, sent_at))
        .map_err(RelayError::message)
}

/// Builds the diagnostic message and submits it to exactly one recipient.
pub fn send_diagnostic<S: RelaySession + ?Sized>(
    session: &mut S,
    addresses: &Addresses,
    subject: &str,
    credential: &RelayCredential,
) -> Result<(), RelayError> {
    let message = build_diagnostic_message(addresses, subject, credential, &Local::now())?;
    debug!(
        target: "relaycheck",
        from = %addresses.from,
        to = %addresses.to,
        subject,
        "submitting message"
    );
    match session.transmit(message.envelope(), &message.formatted()) {
        Ok(()) => Ok(()),
        Err(err) => {
            info!(
                target: "relaycheck",
                to = %addresses.to,
                error = %err,
                "message submission failed"
            );
            Err(err)
        }
    }
}
