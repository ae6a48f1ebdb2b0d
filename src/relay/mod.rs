//! SMTP relay credential checks.
//!
//! The public entry point is [`run_relay_test`], which walks a list of
//! [`PortProfile`]s in order: a raw TCP probe, a session opened in the
//! profile's security mode, a login with the [`RelayCredential`], and the
//! submission of one diagnostic message. Each profile ends in a
//! [`ProfileOutcome`]; the run passes when at least one profile reaches
//! [`ProfileOutcome::Sent`].

mod auth;
mod error;
mod message;
mod options;
mod probe;
mod runner;
mod session;
mod types;

pub use auth::authenticate;
pub use error::{BoxError, RelayError};
pub use message::{Addresses, build_diagnostic_message, diagnostic_body, send_diagnostic};
pub use options::{DEFAULT_SUBJECT, PortProfile, RelayCredential, RelayTestOptions, SecurityMode};
pub use probe::is_port_reachable;
pub use runner::{RunEvent, run_relay_test, run_relay_test_with};
pub use session::{Connector, LettreConnector, LettreSession, RelaySession, SessionGuard};
pub use types::{ProfileOutcome, RelayTestReport, Stage, TestOutcome};
