use std::time::Duration;

use tokio::net::{lookup_host, TcpStream};
use tokio::time;

use crate::types::PortOutcome;

/// Message reported when name resolution fails during a probe. Emitted per
/// failing probe, never deduplicated across workers.
pub const NETWORK_ERROR_MESSAGE: &str = "Invalid target or network issue";

/// Attempt exactly one TCP connect to `target:port`, bounded by `timeout`.
///
/// Resolution happens per call, so a broken resolver surfaces on every probe
/// rather than once. Both the lookup and the connect are bounded by `timeout`
/// so a hung resolver cannot stall a worker past the per-probe budget.
/// `None` means no answer within the timeout; the port is treated as closed
/// or filtered and nothing is reported for it.
pub async fn probe_port(target: &str, port: u16, timeout: Duration) -> Option<PortOutcome> {
    let mut addrs = match time::timeout(timeout, lookup_host((target, port))).await {
        Ok(Ok(addrs)) => addrs,
        Ok(Err(_)) => return Some(PortOutcome::NetworkError(NETWORK_ERROR_MESSAGE.to_string())),
        // A resolver that never answers gets the same silent treatment as a
        // connect that never answers.
        Err(_) => return None,
    };
    let Some(addr) = addrs.next() else {
        return Some(PortOutcome::NetworkError(NETWORK_ERROR_MESSAGE.to_string()));
    };

    match time::timeout(timeout, TcpStream::connect(addr)).await {
        // Drop the stream right away: a connect scan exchanges no data.
        Ok(Ok(stream)) => {
            drop(stream);
            Some(PortOutcome::Open(port))
        }
        Ok(Err(e)) => Some(PortOutcome::UnexpectedError(port, e.to_string())),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::{TcpListener, TcpSocket};

    /// A loopback listener whose accept queue is full and never drained.
    /// Further SYNs are dropped by the kernel, so a connect hangs until it
    /// times out. Returned streams keep the queue occupied.
    async fn saturated_listener() -> (TcpListener, u16, Vec<TcpStream>) {
        let socket = TcpSocket::new_v4().unwrap();
        socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let listener = socket.listen(1).unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut fillers = Vec::new();
        for _ in 0..4 {
            let attempt = time::timeout(
                Duration::from_millis(100),
                TcpStream::connect(("127.0.0.1", port)),
            )
            .await;
            match attempt {
                Ok(Ok(stream)) => fillers.push(stream),
                _ => break,
            }
        }
        (listener, port, fillers)
    }

    #[tokio::test]
    async fn saturated_backlog_probe_times_out_silently() {
        let (_listener, port, _fillers) = saturated_listener().await;

        let outcome = probe_port("127.0.0.1", port, Duration::from_millis(100)).await;
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn listening_port_probes_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let outcome = probe_port("127.0.0.1", port, Duration::from_millis(500)).await;
        assert_eq!(outcome, Some(PortOutcome::Open(port)));
    }

    #[tokio::test]
    async fn refused_port_probes_unexpected_error() {
        // Bind then drop so the port is very likely free again.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let outcome = probe_port("127.0.0.1", port, Duration::from_millis(500)).await;
        match outcome {
            Some(PortOutcome::UnexpectedError(p, _)) => assert_eq!(p, port),
            other => panic!("expected UnexpectedError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unresolvable_target_probes_network_error() {
        // RFC 6761 reserves .invalid: resolution always fails.
        let outcome = probe_port("no-such-host.invalid", 80, Duration::from_millis(500)).await;
        assert_eq!(
            outcome,
            Some(PortOutcome::NetworkError(NETWORK_ERROR_MESSAGE.to_string()))
        );
    }
}
