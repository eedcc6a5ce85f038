//! TCP link to an RS-485 converter.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use homenet_app::gateway::Inbound;

use crate::error::TransportError;
use crate::{OpenTransport, TransportHandle};

/// Size of a single read; several frames fit in one chunk.
const READ_BUFFER: usize = 256;

pub(crate) async fn open(
    host: &str,
    port: u16,
    inbound: mpsc::Sender<Inbound>,
) -> Result<OpenTransport, TransportError> {
    let stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| TransportError::Connect {
            endpoint: format!("tcp://{host}:{port}"),
            source,
        })?;
    stream.set_nodelay(true)?;
    tracing::info!(host, port, "connected to wall-pad");

    let (reader, writer) = stream.into_split();
    let (outbound, queued) = mpsc::unbounded_channel();
    let tasks = vec![
        tokio::spawn(read_loop(reader, inbound)),
        tokio::spawn(write_loop(writer, queued)),
    ];
    Ok(OpenTransport {
        handle: TransportHandle { outbound },
        tasks,
    })
}

async fn read_loop<R: AsyncRead + Unpin>(mut reader: R, inbound: mpsc::Sender<Inbound>) {
    let mut buffer = [0u8; READ_BUFFER];
    let reason = loop {
        match reader.read(&mut buffer).await {
            Ok(0) => break "connection closed by peer".to_string(),
            Ok(n) => {
                tracing::trace!(bytes = n, "received from transport");
                if inbound.send(Inbound::Bytes(buffer[..n].to_vec())).await.is_err() {
                    return;
                }
            }
            Err(err) => break err.to_string(),
        }
    };
    let _ = inbound.send(Inbound::TransportClosed { reason }).await;
}

async fn write_loop<W: AsyncWrite + Unpin>(mut writer: W, mut queued: mpsc::UnboundedReceiver<Vec<u8>>) {
    while let Some(bytes) = queued.recv().await {
        if let Err(err) = writer.write_all(&bytes).await {
            tracing::warn!(error = %err, "failed to write to transport");
        }
    }
}
