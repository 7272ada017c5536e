mod common;

use smokemon_alert::engine::Engine;
use smokemon_common::types::{AlertKind, ChannelConfig, RejectReason};
use smokemon_server::config::AppConfig;
use smokemon_server::consumer;
use smokemon_server::queue;
use smokemon_server::replay::CsvReplay;
use smokemon_server::sink::CollectingSink;

fn test_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig::rapid_change("01-smoker", 5, 15.0, 2.5),
        ChannelConfig::stall("02-food-A", 5, 1.0, 10.0),
        ChannelConfig::stall("03-food-B", 5, 1.0, 10.0),
    ]
}

#[tokio::test]
async fn replay_drives_alerts_per_channel() {
    let (_dir, csv_path) = common::write_csv(&[
        "09/20/23 12:00:00,225.0,150.0,140.0",
        "09/20/23 12:00:30,224.0,150.5,142.0",
        "09/20/23 12:01:00,223.0,150.2,n/a",
        "09/20/23 12:01:30,210.0,150.1,146.0",
        "09/20/23 12:02:00,205.0,150.3,148.0",
    ])
    .unwrap();

    let mut engine = Engine::new(test_channels()).unwrap();
    let (publisher, mut deliveries) = queue::queue(0);
    let replay = CsvReplay::from_config(&common::replay_config(csv_path));
    let producer = tokio::spawn(async move { replay.run(&publisher).await });

    let sink = CollectingSink::default();
    let summary = consumer::run(&mut engine, &mut deliveries, &sink).await;
    let replayed = producer.await.unwrap().unwrap();

    assert_eq!(replayed.rows, 5);
    assert_eq!(replayed.published, 15);
    assert_eq!(summary.delivered, 15);
    assert_eq!(summary.redelivered, 0);

    let alerts = sink.alerts();
    assert_eq!(alerts.len(), 2, "alerts: {alerts:?}");
    let smoker = alerts.iter().find(|a| a.channel_id == "01-smoker").unwrap();
    assert_eq!(smoker.kind, AlertKind::RapidChange);
    assert_eq!(smoker.magnitude, 20.0);
    assert!((smoker.elapsed_minutes - 2.0).abs() < 1e-9);
    let food = alerts.iter().find(|a| a.channel_id == "02-food-A").unwrap();
    assert_eq!(food.kind, AlertKind::Stall);

    let rejected = sink.rejected_inputs();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].channel_id, "03-food-B");
    assert_eq!(rejected[0].reason, RejectReason::UnparsableValue);

    let food_b = engine.processor("03-food-B").unwrap();
    assert_eq!(food_b.window().len(), 4);
    assert_eq!(food_b.stats().rejected, 1);
}

#[tokio::test]
async fn empty_cells_are_skipped_or_forwarded_as_dropouts() {
    let rows = [
        "2023-09-20 12:00:00,225.0,,",
        "2023-09-20 12:00:30,224.0,,",
    ];

    let (_dir, csv_path) = common::write_csv(&rows).unwrap();
    let mut engine = Engine::new(test_channels()).unwrap();
    let (publisher, mut deliveries) = queue::queue(0);
    let replay = CsvReplay::from_config(&common::replay_config(csv_path.clone()));
    let producer = tokio::spawn(async move { replay.run(&publisher).await });
    let sink = CollectingSink::default();
    consumer::run(&mut engine, &mut deliveries, &sink).await;
    let replayed = producer.await.unwrap().unwrap();
    assert_eq!(replayed.published, 2);
    assert_eq!(replayed.skipped_cells, 4);
    assert!(engine.processor("02-food-A").unwrap().window().is_empty());

    let mut engine = Engine::new(test_channels()).unwrap();
    let (publisher, mut deliveries) = queue::queue(0);
    let mut config = common::replay_config(csv_path);
    config.forward_dropouts = true;
    let replay = CsvReplay::from_config(&config);
    let producer = tokio::spawn(async move { replay.run(&publisher).await });
    consumer::run(&mut engine, &mut deliveries, &sink).await;
    let replayed = producer.await.unwrap().unwrap();
    assert_eq!(replayed.published, 6);
    let food_a = engine.processor("02-food-A").unwrap();
    assert_eq!(food_a.window().len(), 2);
    assert!(food_a.window().valid_values().is_empty());
    assert!(sink.rejected_inputs().is_empty());
}

#[tokio::test]
async fn unmapped_column_channel_is_rejected() {
    let (_dir, csv_path) = common::write_csv(&["2023-09-20 12:00:00,225.0"]).unwrap();
    let mut engine = Engine::new(vec![ChannelConfig::stall("02-food-A", 5, 1.0, 10.0)]).unwrap();
    let (publisher, mut deliveries) = queue::queue(0);
    let mut config = common::replay_config(csv_path);
    config.columns = vec!["01-smoker".to_string()];
    let replay = CsvReplay::from_config(&config);
    let producer = tokio::spawn(async move { replay.run(&publisher).await });

    let sink = CollectingSink::default();
    consumer::run(&mut engine, &mut deliveries, &sink).await;
    producer.await.unwrap().unwrap();

    let rejected = sink.rejected_inputs();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].reason, RejectReason::MalformedFormat);
    assert!(engine.processor("02-food-A").unwrap().window().is_empty());
}

#[tokio::test]
async fn missing_csv_fails_replay_and_ends_consumer() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::new(test_channels()).unwrap();
    let (publisher, mut deliveries) = queue::queue(0);
    let replay = CsvReplay::from_config(&common::replay_config(dir.path().join("missing.csv")));
    let producer = tokio::spawn(async move { replay.run(&publisher).await });

    let summary = consumer::run(&mut engine, &mut deliveries, &CollectingSink::default()).await;
    assert_eq!(summary.delivered, 0);
    assert!(producer.await.unwrap().is_err());
}

#[test]
fn config_file_round_trips_into_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smokemon.toml");
    std::fs::write(
        &path,
        r#"
        [replay]
        interval_ms = 0

        [[channels]]
        channel_id = "01-smoker"
        policy = "rapid_change"
        window_capacity = 5
        alert_threshold = 15.0
        max_window_minutes = 2.5

        [[channels]]
        channel_id = "02-food-A"
        policy = "stall"
        window_capacity = 1
        alert_threshold = 1.0
        max_window_minutes = 10.0
        "#,
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.replay.interval_ms, 0);
    assert_eq!(config.channels.len(), 2);
    assert!(Engine::new(config.channels).is_err());
    assert!(AppConfig::load(dir.path().join("absent.toml")).is_err());
}
