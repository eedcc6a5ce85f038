//! Local serial link, served from blocking tasks.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use tokio::sync::mpsc;

use homenet_app::gateway::Inbound;

use crate::error::TransportError;
use crate::{OpenTransport, TransportHandle};

/// Read timeout; bounds how long the reader takes to notice shutdown.
const READ_TIMEOUT: Duration = Duration::from_millis(200);

const READ_BUFFER: usize = 256;

pub(crate) fn open(
    path: &str,
    baud_rate: u32,
    inbound: mpsc::Sender<Inbound>,
) -> Result<OpenTransport, TransportError> {
    let reader = serialport::new(path, baud_rate)
        .timeout(READ_TIMEOUT)
        .open()?;
    let writer = reader.try_clone()?;
    tracing::info!(path, baud_rate, "opened serial port");

    let (outbound, queued) = mpsc::unbounded_channel();
    let tasks = vec![
        tokio::task::spawn_blocking(move || read_loop(reader, &inbound)),
        tokio::task::spawn_blocking(move || write_loop(writer, queued)),
    ];
    Ok(OpenTransport {
        handle: TransportHandle { outbound },
        tasks,
    })
}

fn read_loop(mut port: Box<dyn serialport::SerialPort>, inbound: &mpsc::Sender<Inbound>) {
    let mut buffer = [0u8; READ_BUFFER];
    let reason = loop {
        if inbound.is_closed() {
            return;
        }
        match port.read(&mut buffer) {
            Ok(0) => break "serial port returned end of stream".to_string(),
            Ok(n) => {
                if inbound
                    .blocking_send(Inbound::Bytes(buffer[..n].to_vec()))
                    .is_err()
                {
                    return;
                }
            }
            Err(err) if err.kind() == ErrorKind::TimedOut => {}
            Err(err) => break err.to_string(),
        }
    };
    let _ = inbound.blocking_send(Inbound::TransportClosed { reason });
}

fn write_loop(
    mut port: Box<dyn serialport::SerialPort>,
    mut queued: mpsc::UnboundedReceiver<Vec<u8>>,
) {
    while let Some(bytes) = queued.blocking_recv() {
        if let Err(err) = port.write_all(&bytes).and_then(|()| port.flush()) {
            tracing::warn!(error = %err, "failed to write to serial port");
        }
    }
}
