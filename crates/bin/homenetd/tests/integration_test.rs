//! End-to-end tests for the gateway wired to a real TCP transport.
//!
//! Each test binds a local listener playing the wall-pad, opens the TCP
//! transport against it and runs the gateway loop with a recording bus in
//! place of the MQTT broker.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use homenet_adapter_transport::{OpenTransport, TransportConfig};
use homenet_app::gateway::{Gateway, GatewaySettings, Inbound};
use homenet_app::ports::BusPublisher;
use homenet_app::topic::TopicLayout;
use homenet_domain::dictionary::ProtocolDictionary;
use homenet_domain::error::HomenetError;
use homenet_domain::time::now;

const LIGHT_STATUS: &str = "f7200121810100000000000000c4aa";
const THERMO_STATUS: &str = "f720014a81151d061b051b0f1d8baa";
const IDLE: &str = "f72001719f0000000000000000b0aa";
const LIGHT_ACK: &str = "f72001219f0101000000000000e1aa";
const LIGHT1_ON: &str = "f720210111010000000000000054aa";

#[derive(Default)]
struct RecordingBus {
    published: Mutex<Vec<(String, String)>>,
}

impl RecordingBus {
    fn messages(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    fn payload(&self, topic: &str) -> Option<String> {
        self.messages()
            .into_iter()
            .rev()
            .find(|(t, _)| t == topic)
            .map(|(_, p)| p)
    }
}

impl BusPublisher for RecordingBus {
    fn publish(
        &self,
        topic: String,
        payload: String,
        _retain: bool,
    ) -> impl Future<Output = Result<(), HomenetError>> + Send {
        self.published.lock().unwrap().push((topic, payload));
        async { Ok(()) }
    }
}

struct Harness {
    wall_pad: TcpStream,
    inbound: mpsc::Sender<Inbound>,
    bus: Arc<RecordingBus>,
    gateway: JoinHandle<Result<(), HomenetError>>,
    transport: OpenTransport,
}

async fn start() -> Harness {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (inbound, inbound_rx) = mpsc::channel(64);

    let config = TransportConfig::Tcp {
        host: "127.0.0.1".to_string(),
        port,
    };
    let (transport, accepted) = tokio::join!(
        homenet_adapter_transport::open(&config, inbound.clone()),
        listener.accept()
    );
    let transport = transport.unwrap();
    let (wall_pad, _) = accepted.unwrap();

    let bus = Arc::new(RecordingBus::default());
    let settings = GatewaySettings {
        grace_period: Duration::ZERO,
        ..GatewaySettings::default()
    };
    let gateway = Gateway::new(
        &settings,
        Arc::new(ProtocolDictionary::builtin()),
        TopicLayout::default(),
        transport.handle(),
        Arc::clone(&bus),
        now(),
    );
    let gateway = tokio::spawn(gateway.run(inbound_rx));

    Harness {
        wall_pad,
        inbound,
        bus,
        gateway,
        transport,
    }
}

async fn send_frames(wall_pad: &mut TcpStream, frames: &[&str]) {
    for frame in frames {
        wall_pad
            .write_all(&hex::decode(frame).unwrap())
            .await
            .unwrap();
    }
}

async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not met in time");
}

#[tokio::test]
async fn should_publish_wall_pad_state() {
    let mut harness = start().await;
    send_frames(&mut harness.wall_pad, &[LIGHT_STATUS, THERMO_STATUS]).await;

    let bus = Arc::clone(&harness.bus);
    eventually(|| bus.payload("homenet/Thermo4/curTemp").is_some()).await;

    assert_eq!(bus.payload("homenet/Light1/power").as_deref(), Some("ON"));
    assert_eq!(bus.payload("homenet/Light1/brightness").as_deref(), Some("1"));
    assert_eq!(bus.payload("homenet/Light2/power").as_deref(), Some("OFF"));
    assert_eq!(bus.payload("homenet/Thermo1/setTemp").as_deref(), Some("21"));
    assert_eq!(bus.payload("homenet/Thermo1/curTemp").as_deref(), Some("29"));
    assert_eq!(bus.payload("homenet/Thermo1/power").as_deref(), Some("off"));

    harness.transport.shutdown();
    harness.gateway.abort();
}

#[tokio::test]
async fn should_send_command_and_publish_ack() {
    let mut harness = start().await;
    harness
        .inbound
        .send(Inbound::Message {
            topic: "homenet/Light1/power".to_string(),
            payload: "ON".to_string(),
        })
        .await
        .unwrap();

    send_frames(&mut harness.wall_pad, &[IDLE]).await;
    let mut command = [0u8; 15];
    tokio::time::timeout(Duration::from_secs(5), harness.wall_pad.read_exact(&mut command))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hex::encode(command), LIGHT1_ON);

    send_frames(&mut harness.wall_pad, &[LIGHT_ACK]).await;
    let bus = Arc::clone(&harness.bus);
    eventually(|| bus.payload("homenet/Light1/status").is_some()).await;
    assert_eq!(
        bus.payload("homenet/Light1/status").as_deref(),
        Some("success")
    );

    harness.transport.shutdown();
    harness.gateway.abort();
}

#[tokio::test]
async fn should_stop_gateway_when_wall_pad_disconnects() {
    let harness = start().await;
    drop(harness.wall_pad);

    let result = tokio::time::timeout(Duration::from_secs(5), harness.gateway)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(result, Err(HomenetError::Transport(_))));
    harness.transport.shutdown();
}
