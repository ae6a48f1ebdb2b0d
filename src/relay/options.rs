use std::fmt;
use std::time::Duration;

use lettre::transport::smtp::authentication::Mechanism;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT: &str = "SMTP relay test";

const IMPLICIT_TLS_PORT: u16 = 465;
const SUBMISSION_PORT: u16 = 587;

/// Transport security used for one profile, derived from its `tls`/`ssl` flags.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityMode {
    /// TLS from the first byte (classically port 465).
    ImplicitTls,
    /// Plaintext connect followed by a `STARTTLS` upgrade.
    StartTls,
    Plaintext,
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImplicitTls => f.write_str("implicit TLS"),
            Self::StartTls => f.write_str("STARTTLS"),
            Self::Plaintext => f.write_str("plaintext"),
        }
    }
}

/// One `(port, security mode)` pair under test.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortProfile {
    pub port: u16,
    pub tls: bool,
    pub ssl: bool,
}

impl PortProfile {
    pub const fn new(port: u16, tls: bool, ssl: bool) -> Self {
        Self { port, tls, ssl }
    }

    pub const fn plaintext(port: u16) -> Self {
        Self::new(port, false, false)
    }

    /// Profile for an explicitly requested port: 465 gets implicit TLS, 587
    /// gets STARTTLS, anything else is plaintext.
    pub const fn for_port(port: u16) -> Self {
        match port {
            IMPLICIT_TLS_PORT => Self::new(port, false, true),
            SUBMISSION_PORT => Self::new(port, true, false),
            _ => Self::plaintext(port),
        }
    }

    /// Profiles tested when no port is given. 587 and 465 are deliberately
    /// plaintext here: the relay under test exposes them without certificates.
    pub fn default_set() -> Vec<Self> {
        vec![
            Self::plaintext(2525),
            Self::plaintext(SUBMISSION_PORT),
            Self::plaintext(IMPLICIT_TLS_PORT),
        ]
    }

    /// `ssl` wins when both flags are set.
    pub fn mode(&self) -> SecurityMode {
        if self.ssl {
            SecurityMode::ImplicitTls
        } else if self.tls {
            SecurityMode::StartTls
        } else {
            SecurityMode::Plaintext
        }
    }
}

/// Credential used for every authentication attempt of a run.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayCredential {
    pub username: String,
    pub password: String,
    pub user_id: String,
    pub credential_id: String,
}

impl RelayCredential {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        user_id: impl Into<String>,
        credential_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            user_id: user_id.into(),
            credential_id: credential_id.into(),
        }
    }

    /// Credential provisioned for the diagnostic relay account.
    pub fn builtin() -> Self {
        Self::new(
            "relay_687057f1_66a7",
            "f0278935404826a1d738b220ed2d6b95",
            "687057f17058540b74a19a75",
            "68705c72ef7445ddb0602bd2",
        )
    }

    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}

impl fmt::Debug for RelayCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayCredential")
            .field("username", &self.username)
            .field("password", &self.masked_password())
            .field("user_id", &self.user_id)
            .field("credential_id", &self.credential_id)
            .finish()
    }
}

/// Knobs for [`run_relay_test`](crate::relay::run_relay_test).
#[derive(Debug, Clone, PartialEq)]
pub struct RelayTestOptions {
    pub host: String,
    pub probe_timeout: Duration,
    pub connect_timeout: Duration,
    pub helo_name: String,
    pub subject: String,
    pub mechanisms: Vec<Mechanism>,
}

impl Default for RelayTestOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            probe_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
            helo_name: "localhost".to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            mechanisms: vec![Mechanism::Plain, Mechanism::Login],
        }
    }
}

impl RelayTestOptions {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        if !subject.trim().is_empty() {
            self.subject = subject;
        }
        self
    }

    pub fn with_helo_name(mut self, helo: impl Into<String>) -> Self {
        let helo = helo.into();
        if !helo.trim().is_empty() {
            self.helo_name = helo;
        }
        self
    }

    /// A zero duration keeps the default.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.probe_timeout = timeout;
        }
        self
    }

    /// A zero duration keeps the default.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.connect_timeout = timeout;
        }
        self
    }
}
