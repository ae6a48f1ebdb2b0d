use std::ops::{Deref, DerefMut};
use std::time::Duration;

use lettre::address::Envelope;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use tracing::{debug, warn};

use super::error::RelayError;
use super::options::{PortProfile, RelayCredential, RelayTestOptions, SecurityMode};
use super::probe;

/// An open transport session against the relay.
pub trait RelaySession {
    /// Server name and capabilities reported by the greeting exchange.
    fn greeting(&self) -> String;

    fn login(
        &mut self,
        credential: &RelayCredential,
        mechanisms: &[Mechanism],
    ) -> Result<(), RelayError>;

    fn transmit(&mut self, envelope: &Envelope, raw: &[u8]) -> Result<(), RelayError>;

    fn close(&mut self) -> Result<(), RelayError>;
}

/// Opens sessions for the runner. The production implementation is
/// [`LettreConnector`]; tests substitute a stub.
pub trait Connector {
    type Session: RelaySession;

    fn is_reachable(&self, host: &str, port: u16, timeout: Duration) -> bool;

    fn connect(
        &self,
        profile: &PortProfile,
        options: &RelayTestOptions,
    ) -> Result<Self::Session, RelayError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LettreConnector;

impl Connector for LettreConnector {
    type Session = LettreSession;

    fn is_reachable(&self, host: &str, port: u16, timeout: Duration) -> bool {
        probe::is_port_reachable(host, port, timeout)
    }

    fn connect(
        &self,
        profile: &PortProfile,
        options: &RelayTestOptions,
    ) -> Result<LettreSession, RelayError> {
        LettreSession::open(&options.host, profile, options)
    }
}

pub struct LettreSession {
    host: String,
    port: u16,
    connection: SmtpConnection,
}

impl LettreSession {
    /// Implicit TLS wraps the socket before the greeting; STARTTLS upgrades
    /// right after it. lettre re-issues EHLO after the upgrade.
    pub fn open(
        host: &str,
        profile: &PortProfile,
        options: &RelayTestOptions,
    ) -> Result<Self, RelayError> {
        let port = profile.port;
        let hello = ClientId::Domain(options.helo_name.clone());
        let mode = profile.mode();

        let tls = match mode {
            SecurityMode::ImplicitTls | SecurityMode::StartTls => Some(
                TlsParameters::new(host.to_string())
                    .map_err(|err| RelayError::connection(host, port, err))?,
            ),
            SecurityMode::Plaintext => None,
        };
        let wrapped = match mode {
            SecurityMode::ImplicitTls => tls.as_ref(),
            _ => None,
        };

        debug!(target: "relaycheck", host, port, %mode, "opening session");
        let mut connection = SmtpConnection::connect(
            (host, port),
            Some(options.connect_timeout),
            &hello,
            wrapped,
            None,
        )
        .map_err(|err| RelayError::connection(host, port, err))?;

        if let (SecurityMode::StartTls, Some(params)) = (mode, tls.as_ref()) {
            if let Err(err) = connection.starttls(params, &hello) {
                connection.abort();
                return Err(RelayError::connection(host, port, err));
            }
        }
        debug!(
            target: "relaycheck",
            host,
            port,
            encrypted = connection.is_encrypted(),
            "session established"
        );

        Ok(Self {
            host: host.to_string(),
            port,
            connection,
        })
    }
}

impl RelaySession for LettreSession {
    fn greeting(&self) -> String {
        self.connection.server_info().to_string()
    }

    fn login(
        &mut self,
        credential: &RelayCredential,
        mechanisms: &[Mechanism],
    ) -> Result<(), RelayError> {
        let credentials =
            Credentials::new(credential.username.clone(), credential.password.clone());
        let response = self
            .connection
            .auth(mechanisms, &credentials)
            .map_err(|err| RelayError::auth(&credential.username, err))?;
        debug!(target: "relaycheck", code = %response.code(), "AUTH accepted");
        Ok(())
    }

    fn transmit(&mut self, envelope: &Envelope, raw: &[u8]) -> Result<(), RelayError> {
        let response = self.connection.send(envelope, raw).map_err(RelayError::send)?;
        debug!(target: "relaycheck", code = %response.code(), "DATA accepted");
        Ok(())
    }

    fn close(&mut self) -> Result<(), RelayError> {
        match self.connection.quit() {
            Ok(_) => Ok(()),
            Err(err) => {
                self.connection.abort();
                Err(RelayError::connection(&self.host, self.port, err))
            }
        }
    }
}

/// Owns the single live session of a profile and closes it exactly once,
/// either through [`SessionGuard::finish`] or on drop.
pub struct SessionGuard<S: RelaySession> {
    session: S,
    closed: bool,
}

impl<S: RelaySession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    pub fn finish(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.session.close() {
            warn!(target: "relaycheck", error = %err, "closing session failed");
        }
    }
}

impl<S: RelaySession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: RelaySession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: RelaySession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.close_once();
    }
}
