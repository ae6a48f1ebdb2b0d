#![forbid(unsafe_code)]
//! relaycheck — vérification des identifiants d'un relais SMTP

pub mod relay;
pub use relay::{
    Addresses, Connector, PortProfile, ProfileOutcome, RelayCredential, RelayError,
    RelaySession, RelayTestOptions, RelayTestReport, RunEvent, SecurityMode, Stage, TestOutcome,
    run_relay_test, run_relay_test_with,
};

pub use lettre::Address;
