// Host resolution helpers

use std::net::SocketAddr;
use anyhow::{Context, Result};
use socket2::{Domain, Protocol, Type};

/// Service port the status server listens on.
pub const PORT: u16 = 9090;

/// One resolved endpoint the client may connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCandidate {
    pub family: Domain,
    pub socket_type: Type,
    pub protocol: Protocol,
    pub addr: SocketAddr,
}

impl AddressCandidate {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            family: Domain::for_address(addr),
            socket_type: Type::STREAM,
            protocol: Protocol::TCP,
            addr,
        }
    }
}

pub async fn resolve(host: &str) -> Result<Vec<AddressCandidate>> {
    resolve_with_port(host, PORT).await
}

/// Candidates come back in resolver order, which is also connect order.
pub async fn resolve_with_port(host: &str, port: u16) -> Result<Vec<AddressCandidate>> {
    let addrs = tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("getaddrinfo: could not resolve {}", host))?;

    let candidates: Vec<AddressCandidate> = addrs.map(AddressCandidate::new).collect();
    if candidates.is_empty() {
        return Err(anyhow::anyhow!("getaddrinfo: no addresses found for {}", host));
    }

    tracing::debug!(host, count = candidates.len(), "resolved candidates");
    Ok(candidates)
}
