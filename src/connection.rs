use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Per-client connection state.
#[derive(Debug)]
pub struct ClientState {
    pub id: u64,
    pub peer_addr: SocketAddr,
    pub commands_processed: u64,
}

impl ClientState {
    pub fn new(peer_addr: SocketAddr) -> Self {
        ClientState {
            id: NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed),
            peer_addr,
            commands_processed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ids_are_unique() {
        let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let a = ClientState::new(addr);
        let b = ClientState::new(addr);
        assert_ne!(a.id, b.id);
        assert_eq!(a.commands_processed, 0);
    }
}
