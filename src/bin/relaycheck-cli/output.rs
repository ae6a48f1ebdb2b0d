use relaycheck::relay::{
    Addresses, PortProfile, RelayCredential, RelayError, RelayTestOptions, RelayTestReport,
    RunEvent,
};

const WIDE: usize = 60;
const NARROW: usize = 40;

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

pub fn print_header(
    options: &RelayTestOptions,
    profiles: &[PortProfile],
    credential: &RelayCredential,
    addresses: &Addresses,
) {
    let ports: Vec<String> = profiles.iter().map(|p| p.port.to_string()).collect();
    println!("{}", "=".repeat(WIDE));
    println!("SMTP relay test");
    println!("{}", "=".repeat(WIDE));
    println!("Host:      {}", options.host);
    println!("Ports:     {}", ports.join(", "));
    println!("Username:  {}", credential.username);
    println!("From:      {}", addresses.from);
    println!("To:        {}", addresses.to);
}

/// Prints human progress lines as the runner reports each stage.
pub struct ProgressPrinter<'a> {
    credential: &'a RelayCredential,
    addresses: &'a Addresses,
    subject: &'a str,
}

impl<'a> ProgressPrinter<'a> {
    pub fn new(
        credential: &'a RelayCredential,
        addresses: &'a Addresses,
        subject: &'a str,
    ) -> Self {
        Self {
            credential,
            addresses,
            subject,
        }
    }

    pub fn print(&mut self, event: &RunEvent<'_>) {
        match event {
            RunEvent::ProfileStarted(profile) => {
                println!();
                println!("{}", "=".repeat(NARROW));
                println!("Port {} ({})", profile.port, profile.mode());
                println!("{}", "=".repeat(NARROW));
                println!("  TLS: {}  SSL: {}", on_off(profile.tls), on_off(profile.ssl));
            }
            RunEvent::Reachability { port, reachable } => {
                if *reachable {
                    println!("[OK]    port {port} reachable");
                }
            }
            RunEvent::Connected { greeting } => {
                println!("[OK]    SMTP session established");
                println!("        server: {greeting}");
                println!(
                    "  auth: {} / {}",
                    self.credential.username,
                    self.credential.masked_password()
                );
            }
            RunEvent::Authenticated => {
                println!("[OK]    authenticated");
                println!(
                    "  mail: {} -> {} ({})",
                    self.addresses.from, self.addresses.to, self.subject
                );
            }
            RunEvent::Sent => println!("[OK]    message sent"),
            RunEvent::Failed(err) => self.print_failure(err),
            RunEvent::SessionClosed { .. } => println!("        connection closed"),
        }
    }

    fn print_failure(&self, err: &RelayError) {
        match err {
            RelayError::Unreachable { host, port } => {
                println!("[FAIL]  port {port} unreachable");
                println!("        is the relay running on {host}:{port}?");
            }
            RelayError::Connection { .. } => println!("[FAIL]  connection failed: {err}"),
            RelayError::Auth { .. } => println!("[FAIL]  authentication failed: {err}"),
            RelayError::Send { .. } | RelayError::Message(_) => {
                println!("[FAIL]  sending failed: {err}")
            }
        }
    }
}

pub fn print_summary(report: &RelayTestReport) {
    let total = report.total();
    println!();
    println!("{}", "=".repeat(WIDE));
    println!("Summary");
    println!("{}", "=".repeat(WIDE));
    println!("Succeeded: {}/{}", report.success_count(), total);
    println!("Failed:    {}/{}", report.failure_count(), total);
    for outcome in &report.outcomes {
        println!("  port {:<5} {}", outcome.port(), outcome.outcome);
    }

    if report.is_success() {
        let ports: Vec<String> = report
            .working_ports()
            .iter()
            .map(u16::to_string)
            .collect();
        println!();
        println!("[PASS]  SMTP relay test passed");
        println!("        the credential works; use port(s) {}", ports.join(", "));
    } else {
        println!();
        println!("[FAIL]  SMTP relay test failed");
        println!("        check the relay status and network connectivity");
    }
}
