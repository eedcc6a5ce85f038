//! # homenetd — homenet daemon
//!
//! Composition root that wires the wall-pad transport and the MQTT bus into
//! the gateway loop.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Open the transport and connect to the MQTT broker
//! - Construct the gateway, injecting both adapters via port traits
//! - Run until Ctrl-C or until the transport goes away
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no protocol logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use homenet_adapter_mqtt::MqttBus;
use homenet_app::gateway::Gateway;
use homenet_domain::dictionary::ProtocolDictionary;
use homenet_domain::time::now;

use crate::config::Config;

/// Capacity of the channel feeding the gateway loop.
const INBOUND_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter)?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dictionary = Arc::new(ProtocolDictionary::builtin());
    tracing::info!(
        signatures = dictionary.states().len(),
        commands = dictionary.command_count(),
        "protocol dictionary loaded"
    );

    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);

    // Transport
    let transport =
        homenet_adapter_transport::open(&config.transport, inbound_tx.clone()).await?;

    // MQTT
    let topics = config.mqtt.topic_layout();
    let bus = MqttBus::connect(&config.mqtt, topics.command_filter(), inbound_tx);

    // Gateway
    let gateway = Gateway::new(
        &config.gateway.settings(),
        dictionary,
        topics,
        transport.handle(),
        bus.publisher(),
        now(),
    );

    let result = tokio::select! {
        result = gateway.run(inbound_rx) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown requested");
            Ok(())
        }
    };

    if let Err(err) = bus.disconnect().await {
        tracing::warn!(error = %err, "MQTT disconnect failed");
    }
    transport.shutdown();

    result.map_err(Into::into)
}
