use anyhow::{Context, Result};
use socket2::Socket;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::Instant;

use super::{AttemptResult, ResponseBuffer};
use crate::util::AddressCandidate;

/// One connect/read/validate cycle. `Err` means the read itself failed and
/// the whole run has to stop.
pub async fn attempt(candidates: &[AddressCandidate]) -> Result<AttemptResult> {
    let start = Instant::now();

    let Some(stream) = connect_first(candidates) else {
        tracing::error!("client: failed to connect");
        return Ok(AttemptResult::ConnectFailure);
    };
    let mut stream = TcpStream::from_std(stream.into()).context("register connected socket")?;

    let mut buf = ResponseBuffer::new();
    let numbytes = stream.read(buf.read_slot()).await.context("recv")?;
    buf.set_len(numbytes);
    drop(stream);

    tracing::debug!(bytes = numbytes, elapsed = ?start.elapsed(), "status read");

    if buf.is_expected() {
        Ok(AttemptResult::Success)
    } else {
        tracing::error!(
            "Socket read expected 'OK' but instead got '{}'",
            String::from_utf8_lossy(buf.terminated())
        );
        Ok(AttemptResult::UnexpectedResponse(buf.received().to_vec()))
    }
}

/// Blocking connect, first candidate wins. Anything the peer does after the
/// handshake surfaces on the read, not here.
fn connect_first(candidates: &[AddressCandidate]) -> Option<Socket> {
    for candidate in candidates {
        let socket = match Socket::new(candidate.family, candidate.socket_type, Some(candidate.protocol)) {
            Ok(socket) => socket,
            Err(e) => {
                tracing::warn!(addr = %candidate.addr, "client: socket: {}", e);
                continue;
            }
        };

        match socket.connect(&candidate.addr.into()).and_then(|()| socket.set_nonblocking(true)) {
            Ok(()) => {
                tracing::trace!(addr = %candidate.addr, "connected");
                return Some(socket);
            }
            Err(e) => {
                // dropping the socket closes it
                tracing::warn!(addr = %candidate.addr, "client: connect: {}", e);
            }
        }
    }
    None
}


#[cfg(test)]
mod tests {
    use super::testing::{refused_port, serve_replies};
    use super::*;
    use socket2::SockRef;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    #[tokio::test]
    async fn ok_reply_is_success() {
        let (addr, _) = serve_replies(&["OK"]).await;
        let result = attempt(&[AddressCandidate::new(addr)]).await.unwrap();
        assert_eq!(result, AttemptResult::Success);
    }

    #[tokio::test]
    async fn lowercase_ok_is_unexpected() {
        let (addr, _) = serve_replies(&["ok"]).await;
        let result = attempt(&[AddressCandidate::new(addr)]).await.unwrap();
        assert_eq!(result, AttemptResult::UnexpectedResponse(b"ok".to_vec()));
    }

    #[tokio::test]
    async fn long_reply_is_truncated_to_nine_bytes() {
        let (addr, _) = serve_replies(&["OKOKOKOKOKOKOKOK"]).await;
        let result = attempt(&[AddressCandidate::new(addr)]).await.unwrap();
        assert_eq!(result, AttemptResult::UnexpectedResponse(b"OKOKOKOKO".to_vec()));
    }

    #[tokio::test]
    async fn empty_reply_is_unexpected() {
        let (addr, _) = serve_replies(&[""]).await;
        let result = attempt(&[AddressCandidate::new(addr)]).await.unwrap();
        assert_eq!(result, AttemptResult::UnexpectedResponse(Vec::new()));
    }

    #[tokio::test]
    async fn refused_everywhere_is_connect_failure() {
        let refused = refused_port();
        let result = attempt(&[AddressCandidate::new(refused.addr)]).await.unwrap();
        assert_eq!(result, AttemptResult::ConnectFailure);
    }

    #[tokio::test]
    async fn empty_candidate_list_is_connect_failure() {
        assert_eq!(attempt(&[]).await.unwrap(), AttemptResult::ConnectFailure);
    }

    #[tokio::test]
    async fn falls_through_to_next_candidate() {
        let dead = refused_port();
        let (live, accepted) = serve_replies(&["OK"]).await;
        let candidates = [AddressCandidate::new(dead.addr), AddressCandidate::new(live)];

        let result = attempt(&candidates).await.unwrap();
        assert_eq!(result, AttemptResult::Success);
        assert_eq!(accepted.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reset_right_after_accept_is_fatal() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            SockRef::from(&stream).set_linger(Some(Duration::ZERO)).unwrap();
            drop(stream);
        });

        let err = attempt(&[AddressCandidate::new(addr)]).await.unwrap_err();
        assert!(err.to_string().contains("recv"));
        server.join().unwrap();
    }
}
