use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use vacuum_bridge::config::{Config, load_dotenv};
use vacuum_bridge::mqtt::{AutoconfOptions, AutoconfPublisher, DeviceSpecification, MqttClient};
use vacuum_bridge::robots::{Robot, build_robot};
use vacuum_bridge::transport::SimulatedViomi;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

/// Refresh state and consumables until cancelled.
async fn poll_loop(robot: Arc<Robot>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if let Err(e) = robot.poll_state().await {
            warn!("[Viomi] State poll failed: {}", e);
        }
        match robot.consumable_monitoring() {
            Ok(capability) => {
                if let Err(e) = capability.poll_consumables().await {
                    warn!("[Viomi] Consumable poll failed: {}", e);
                }
            }
            Err(e) => warn!("{}", e),
        }
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_logger();
    info!("Starting Vacuum Bridge");

    let config = Config::from_env();
    let model: &'static str = config.robot.model.into();
    info!("Configuration loaded:");
    info!("  Robot: {} ({})", config.robot.identifier, model);
    info!(
        "  MQTT broker: {}:{}",
        config.mqtt.broker_host, config.mqtt.broker_port
    );
    info!("  Poll interval: {:?}", config.robot.poll_interval());

    // No network transport yet; the simulator answers every command
    let transport = Arc::new(SimulatedViomi::new());
    let robot = Arc::new(build_robot(&config.robot, transport));

    let options = AutoconfOptions::new(
        config.mqtt.topic_prefix.clone(),
        config.mqtt.autoconf_prefix.clone(),
        robot.identifier(),
        DeviceSpecification::new(robot.identifier(), robot.model()),
    );

    let mqtt_client = MqttClient::new(&config.mqtt, &options.availability_topic);
    let publisher = AutoconfPublisher::new(mqtt_client.client(), options, robot.context());

    let (connected_tx, connected_rx) = oneshot::channel();
    let mqtt_loop = tokio::spawn(async move {
        mqtt_client.run(Some(connected_tx)).await;
    });

    match tokio::time::timeout(Duration::from_secs(10), connected_rx).await {
        Ok(Ok(())) => info!("[MQTT] Connection established"),
        Ok(Err(_)) => warn!("[MQTT] Connection signal channel dropped"),
        Err(_) => warn!("[MQTT] Not connected after 10 seconds, continuing"),
    }

    let cancel = CancellationToken::new();
    let publisher_task = publisher.start(cancel.clone());
    let poll_task = tokio::spawn(poll_loop(
        robot.clone(),
        config.robot.poll_interval(),
        cancel.clone(),
    ));

    info!("Vacuum Bridge is running");
    info!("  - Press Ctrl+C to exit");

    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }

    cancel.cancel();
    for (name, task) in [("poller", poll_task), ("publisher", publisher_task)] {
        if let Err(e) = task.await {
            error!("{} task failed: {}", name, e);
        }
    }

    // Give the offline message a moment to leave before the loop goes away
    tokio::time::sleep(Duration::from_millis(200)).await;
    mqtt_loop.abort();

    info!("Vacuum Bridge stopped");
}
