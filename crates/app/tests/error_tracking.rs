//! Error reports reach a Sentry-compatible collector

mod common;

use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;

use qube::error_tracking;
use qube::ErrorTrackingConfig;

use crate::common::{collector, serve, Recorder};

#[tokio::test]
async fn test_warnings_and_errors_are_reported() {
    let recorder = Recorder::default();
    let url = serve(collector(recorder.clone())).await;
    let dsn = format!(
        "http://public-key@{}:{}/7",
        url.host_str().unwrap(),
        url.port().unwrap()
    );

    let config = ErrorTrackingConfig {
        dsn: Some(dsn),
        environment: "test".to_string(),
    };
    let (layer, handle) = error_tracking::spawn(&config).unwrap().unwrap();

    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("not reported");
        tracing::warn!("NFT minted successfully, but couldn't retrieve token ID");
        tracing::error!(stage = "pinning file", "Error minting NFT: boom");
    });

    assert!(handle.flush(Duration::from_secs(5)).await);

    let reports = recorder.at("/api/7/envelope/");
    assert_eq!(reports.len(), 2);
    for report in &reports {
        let auth = report.sentry_auth.as_deref().unwrap();
        assert!(auth.contains("sentry_key=public-key"));
        assert_eq!(report.body["environment"], "test");
    }

    let warning = &reports[0].body;
    assert_eq!(warning["level"], "warning");
    assert_eq!(
        warning["message"]["formatted"],
        "NFT minted successfully, but couldn't retrieve token ID"
    );
    assert!(warning.get("exception").is_none());

    let error = &reports[1].body;
    assert_eq!(error["level"], "error");
    assert_eq!(
        error["exception"]["values"][0]["value"],
        "Error minting NFT: boom"
    );
    assert_eq!(error["extra"]["stage"], "pinning file");
}

#[tokio::test]
async fn test_unreachable_collector_does_not_block_flush() {
    let config = ErrorTrackingConfig {
        dsn: Some("http://key@127.0.0.1:9/1".to_string()),
        environment: "test".to_string(),
    };
    let (layer, handle) = error_tracking::spawn(&config).unwrap().unwrap();

    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, || {
        tracing::error!("lost");
    });

    assert!(handle.flush(Duration::from_secs(10)).await);
}

#[tokio::test]
async fn test_invalid_dsn_is_an_error() {
    let config = ErrorTrackingConfig {
        dsn: Some("https://sentry.example.com/1".to_string()),
        environment: "test".to_string(),
    };
    assert!(error_tracking::spawn(&config).is_err());
}
