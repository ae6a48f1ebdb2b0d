use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use super::error::RelayError;
use super::options::PortProfile;

/// Furthest point a profile reached. Each stage is a precondition for the next.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Untested,
    Reachable,
    Connected,
    Authenticated,
    Sent,
}

/// Tagged result of one profile's pipeline.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    Sent,
    Unreachable,
    ConnectionFailure(String),
    AuthFailure(String),
    SendFailure(String),
}

impl ProfileOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }

    /// Stage the pipeline stood at when this outcome was produced.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Unreachable => Stage::Untested,
            Self::ConnectionFailure(_) => Stage::Reachable,
            Self::AuthFailure(_) => Stage::Connected,
            Self::SendFailure(_) => Stage::Authenticated,
            Self::Sent => Stage::Sent,
        }
    }
}

impl From<&RelayError> for ProfileOutcome {
    fn from(err: &RelayError) -> Self {
        match err {
            RelayError::Unreachable { .. } => Self::Unreachable,
            RelayError::Connection { .. } => Self::ConnectionFailure(err.to_string()),
            RelayError::Auth { .. } => Self::AuthFailure(err.to_string()),
            RelayError::Send { .. } | RelayError::Message(_) => Self::SendFailure(err.to_string()),
        }
    }
}

impl fmt::Display for ProfileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => f.write_str("Sent"),
            Self::Unreachable => f.write_str("Unreachable"),
            Self::ConnectionFailure(reason) => write!(f, "ConnectionFailure ({reason})"),
            Self::AuthFailure(reason) => write!(f, "AuthFailure ({reason})"),
            Self::SendFailure(reason) => write!(f, "SendFailure ({reason})"),
        }
    }
}

/// Per-profile record, derived once and never persisted.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub profile: PortProfile,
    pub outcome: ProfileOutcome,
    /// Server capability line returned by the greeting exchange, if connected.
    pub greeting: Option<String>,
}

impl TestOutcome {
    pub fn new(profile: PortProfile, outcome: ProfileOutcome, greeting: Option<String>) -> Self {
        Self {
            profile,
            outcome,
            greeting,
        }
    }

    pub fn port(&self) -> u16 {
        self.profile.port
    }

    pub fn reachable(&self) -> bool {
        self.outcome.stage() >= Stage::Reachable
    }

    pub fn connected(&self) -> bool {
        self.outcome.stage() >= Stage::Connected
    }

    pub fn authenticated(&self) -> bool {
        self.outcome.stage() >= Stage::Authenticated
    }

    pub fn sent(&self) -> bool {
        self.outcome.is_sent()
    }
}

/// Aggregate produced by [`run_relay_test`](crate::relay::run_relay_test).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayTestReport {
    pub host: String,
    pub outcomes: Vec<TestOutcome>,
}

impl RelayTestReport {
    pub fn new(host: impl Into<String>, outcomes: Vec<TestOutcome>) -> Self {
        Self {
            host: host.into(),
            outcomes,
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.sent()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.total() - self.success_count()
    }

    /// One working configuration is enough.
    pub fn is_success(&self) -> bool {
        self.success_count() > 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    pub fn working_ports(&self) -> Vec<u16> {
        self.outcomes
            .iter()
            .filter(|o| o.sent())
            .map(TestOutcome::port)
            .collect()
    }
}
