use tracing::{info, info_span};

use super::auth::authenticate;
use super::error::RelayError;
use super::message::{Addresses, send_diagnostic};
use super::options::{PortProfile, RelayCredential, RelayTestOptions};
use super::session::{Connector, LettreConnector, RelaySession, SessionGuard};
use super::types::{ProfileOutcome, RelayTestReport, TestOutcome};

/// Progress notifications emitted while profiles are tested, in order.
#[derive(Debug)]
pub enum RunEvent<'a> {
    ProfileStarted(&'a PortProfile),
    Reachability { port: u16, reachable: bool },
    Connected { greeting: &'a str },
    Authenticated,
    Sent,
    /// A stage failed; the profile is abandoned.
    Failed(&'a RelayError),
    SessionClosed { port: u16 },
}

/// Tests every profile in order against the real relay.
pub fn run_relay_test(
    profiles: &[PortProfile],
    credential: &RelayCredential,
    addresses: &Addresses,
    options: &RelayTestOptions,
) -> RelayTestReport {
    run_relay_test_with(
        &LettreConnector,
        profiles,
        credential,
        addresses,
        options,
        |_| {},
    )
}

/// Same as [`run_relay_test`] with an explicit connector and a progress
/// callback. Profiles run strictly one after the other; at most one session
/// is open at any time and it is closed before the next profile starts.
pub fn run_relay_test_with<C, F>(
    connector: &C,
    profiles: &[PortProfile],
    credential: &RelayCredential,
    addresses: &Addresses,
    options: &RelayTestOptions,
    mut observer: F,
) -> RelayTestReport
where
    C: Connector,
    F: FnMut(RunEvent<'_>),
{
    let mut outcomes = Vec::with_capacity(profiles.len());
    for profile in profiles {
        // stage events below inherit host/port from this span
        let span = info_span!(
            target: "relaycheck",
            "profile",
            host = %options.host,
            port = profile.port
        );
        let _entered = span.enter();
        let outcome = test_profile(
            connector,
            profile,
            credential,
            addresses,
            options,
            &mut observer,
        );
        info!(target: "relaycheck", outcome = %outcome.outcome, "profile finished");
        outcomes.push(outcome);
    }

    let report = RelayTestReport::new(options.host.clone(), outcomes);
    info!(
        target: "relaycheck",
        succeeded = report.success_count(),
        total = report.total(),
        "relay test finished"
    );
    report
}

fn test_profile<C, F>(
    connector: &C,
    profile: &PortProfile,
    credential: &RelayCredential,
    addresses: &Addresses,
    options: &RelayTestOptions,
    observer: &mut F,
) -> TestOutcome
where
    C: Connector,
    F: FnMut(RunEvent<'_>),
{
    let host = options.host.as_str();
    let port = profile.port;
    observer(RunEvent::ProfileStarted(profile));

    let reachable = connector.is_reachable(host, port, options.probe_timeout);
    observer(RunEvent::Reachability { port, reachable });
    if !reachable {
        let err = RelayError::unreachable(host, port);
        info!(target: "relaycheck", "port not reachable");
        observer(RunEvent::Failed(&err));
        return TestOutcome::new(*profile, ProfileOutcome::from(&err), None);
    }

    let session = match connector.connect(profile, options) {
        Ok(session) => session,
        Err(err) => {
            info!(target: "relaycheck", error = %err, "connection failed");
            observer(RunEvent::Failed(&err));
            return TestOutcome::new(*profile, ProfileOutcome::from(&err), None);
        }
    };

    let mut guard = SessionGuard::new(session);
    let greeting = guard.greeting();
    observer(RunEvent::Connected {
        greeting: &greeting,
    });

    let outcome = drive_session(&mut *guard, credential, addresses, options, observer);

    guard.finish();
    observer(RunEvent::SessionClosed { port });
    TestOutcome::new(*profile, outcome, Some(greeting))
}

fn drive_session<S, F>(
    session: &mut S,
    credential: &RelayCredential,
    addresses: &Addresses,
    options: &RelayTestOptions,
    observer: &mut F,
) -> ProfileOutcome
where
    S: RelaySession,
    F: FnMut(RunEvent<'_>),
{
    if let Err(err) = authenticate(session, credential, &options.mechanisms) {
        observer(RunEvent::Failed(&err));
        return ProfileOutcome::from(&err);
    }
    observer(RunEvent::Authenticated);

    match send_diagnostic(session, addresses, &options.subject, credential) {
        Ok(()) => {
            observer(RunEvent::Sent);
            ProfileOutcome::Sent
        }
        Err(err) => {
            observer(RunEvent::Failed(&err));
            ProfileOutcome::from(&err)
        }
    }
}
