use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Raw TCP probe. Any resolution or socket error counts as "not reachable";
/// the probe socket is dropped before returning.
pub fn is_port_reachable(host: &str, port: u16, timeout: Duration) -> bool {
    match resolve(host, port) {
        Ok(addrs) => probe_addrs(&addrs, timeout),
        Err(err) => {
            debug!(target: "relaycheck", host, port, error = %err, "address resolution failed");
            false
        }
    }
}

/// All addresses share one deadline, so the probe never outlives `timeout`.
fn probe_addrs(addrs: &[SocketAddr], timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            debug!(target: "relaycheck", %addr, "probe deadline exhausted");
            break;
        }
        match TcpStream::connect_timeout(addr, remaining) {
            Ok(_stream) => {
                trace!(target: "relaycheck", %addr, "probe connected");
                return true;
            }
            Err(err) => {
                debug!(target: "relaycheck", %addr, error = %err, "probe failed");
            }
        }
    }
    false
}

fn resolve(host: &str, port: u16) -> std::io::Result<Vec<SocketAddr>> {
    (host, port).to_socket_addrs().map(|iter| iter.collect())
}
