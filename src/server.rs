use crate::command::{self, Command};
use crate::config::Config;
use crate::connection::ClientState;
use crate::error::{KvError, KvResult};
use crate::resp::{RespParser, RespValue};
use crate::store::SharedStore;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// Size of the per-connection read buffer. One read is one request.
const READ_BUFFER_SIZE: usize = 1024;

pub async fn run_server(config: Config, store: SharedStore) -> KvResult<()> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| KvError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("tinykv server listening on {addr}");

    serve(listener, store).await
}

/// Accept loop. Each connection is handled on its own task against the shared store.
pub async fn serve(listener: TcpListener, store: SharedStore) -> KvResult<()> {
    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = result?;
                debug!("New connection from {peer_addr}");

                let store = store.clone();
                tokio::spawn(async move {
                    let client = ClientState::new(peer_addr);
                    if let Err(e) = handle_connection(stream, store, client).await {
                        debug!("Connection error from {peer_addr}: {e}");
                    }
                    debug!("Connection closed: {peer_addr}");
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                return Ok(());
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    store: SharedStore,
    mut client: ClientState,
) -> KvResult<()> {
    let mut chunk = [0u8; READ_BUFFER_SIZE];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            debug!(
                "client {} disconnected after {} commands",
                client.id, client.commands_processed
            );
            return Ok(());
        }

        // Every request starts from a fresh buffer holding exactly this read.
        let mut buf = BytesMut::from(&chunk[..n]);
        let command = match RespParser::parse(&mut buf) {
            Ok(Some(frame)) => Command::from_frame(frame),
            // Truncated request: nothing reassembles it, so it has no command name.
            Ok(None) => Command::Unknown(String::new()),
            Err(e) => {
                let err = KvError::from(e);
                write_reply(&mut stream, &client, &err.to_resp_error()).await;
                return Err(err);
            }
        };

        client.commands_processed += 1;
        debug!(
            "client {} ({}) command '{}'",
            client.id,
            client.peer_addr,
            command.name()
        );

        let response = command::dispatch(command, &store).await;
        write_reply(&mut stream, &client, &response).await;
    }
}

/// Write a reply. Failures are logged and the read loop carries on.
async fn write_reply(stream: &mut TcpStream, client: &ClientState, reply: &RespValue) {
    if let Err(e) = stream.write_all(&reply.serialize()).await {
        warn!(
            "Error writing reply to client {} ({}): {e}",
            client.id, client.peer_addr
        );
    }
}
