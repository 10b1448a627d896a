//! Error tracking
//!
//! A `tracing` layer that forwards WARN events as messages and ERROR events
//! as exceptions to a Sentry-compatible envelope endpoint. Events are queued on a
//! bounded channel and posted by a background task, so logging never waits
//! on the network. A full queue drops the event.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::oneshot;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;
use url::Url;

use crate::state::ErrorTrackingConfig;

const QUEUE_CAPACITY: usize = 64;
const SENTRY_VERSION: u8 = 7;
const CLIENT_NAME: &str = concat!("qube/", env!("CARGO_PKG_VERSION"));

/// Parsed `https://<public_key>@<host>/<project_id>` DSN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    raw: String,
    public_key: String,
    project_id: String,
    envelope_url: Url,
}

#[derive(Debug, thiserror::Error)]
pub enum DsnError {
    #[error("invalid DSN: {0}")]
    Url(#[from] url::ParseError),
    #[error("DSN has no public key")]
    MissingKey,
    #[error("DSN has no project id")]
    MissingProject,
}

impl Dsn {
    pub fn parse(raw: &str) -> Result<Self, DsnError> {
        let url = Url::parse(raw)?;

        let public_key = url.username().to_string();
        if public_key.is_empty() {
            return Err(DsnError::MissingKey);
        }

        let path = url.path().trim_end_matches('/');
        let (prefix, project_id) = match path.rsplit_once('/') {
            Some((prefix, id)) if !id.is_empty() => (prefix, id.to_string()),
            _ => return Err(DsnError::MissingProject),
        };

        let mut envelope_url = url.clone();
        // credentials travel in the auth header, not the URL
        let _ = envelope_url.set_username("");
        let _ = envelope_url.set_password(None);
        envelope_url.set_path(&format!("{}/api/{}/envelope/", prefix, project_id));

        Ok(Self {
            raw: raw.to_string(),
            public_key,
            project_id,
            envelope_url,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn envelope_url(&self) -> &Url {
        &self.envelope_url
    }

    /// Value of the `X-Sentry-Auth` header
    pub fn auth_header(&self) -> String {
        format!(
            "Sentry sentry_version={}, sentry_client={}, sentry_key={}",
            SENTRY_VERSION, CLIENT_NAME, self.public_key
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMessage {
    pub formatted: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Exception {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Exceptions {
    pub values: Vec<Exception>,
}

/// One event, carried as the single item of an envelope
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub event_id: String,
    pub timestamp: String,
    pub level: Severity,
    pub platform: &'static str,
    pub logger: String,
    pub environment: String,
    pub release: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<ReportMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<Exceptions>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

enum Command {
    Capture(Box<Report>),
    Flush(oneshot::Sender<()>),
}

/// Layer half: turns events into reports and queues them
pub struct ErrorTrackingLayer {
    tx: flume::Sender<Command>,
    environment: String,
    release: String,
}

/// Reporter half: lets the owner wait for queued reports to go out
#[derive(Clone)]
pub struct ErrorTrackingHandle {
    tx: flume::Sender<Command>,
}

/// Start the reporter task. Returns `None` when no DSN is configured.
///
/// Must be called from within a tokio runtime.
pub fn spawn(
    config: &ErrorTrackingConfig,
) -> Result<Option<(ErrorTrackingLayer, ErrorTrackingHandle)>, DsnError> {
    let dsn = match config.dsn.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Dsn::parse(raw)?,
        _ => return Ok(None),
    };

    let (tx, rx) = flume::bounded(QUEUE_CAPACITY);
    tokio::spawn(run_reporter(rx, reqwest::Client::new(), dsn));

    let layer = ErrorTrackingLayer {
        tx: tx.clone(),
        environment: config.environment.clone(),
        release: common::version::build_info().version.to_string(),
    };
    Ok(Some((layer, ErrorTrackingHandle { tx })))
}

impl ErrorTrackingHandle {
    /// Wait until every report queued so far has been posted, or `timeout`
    /// elapses. Returns whether the queue drained in time.
    pub async fn flush(&self, timeout: Duration) -> bool {
        let (done, wait) = oneshot::channel();
        if self.tx.send_async(Command::Flush(done)).await.is_err() {
            return false;
        }
        matches!(tokio::time::timeout(timeout, wait).await, Ok(Ok(())))
    }
}

async fn run_reporter(rx: flume::Receiver<Command>, client: reqwest::Client, dsn: Dsn) {
    while let Ok(command) = rx.recv_async().await {
        match command {
            Command::Capture(report) => {
                if let Err(e) = post_report(&client, &dsn, &report).await {
                    // debug only: anything louder would be captured again
                    tracing::debug!("dropping error report {}: {}", report.event_id, e);
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum PostError {
    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("send: {0}")]
    Send(#[from] reqwest::Error),
}

/// Newline-delimited envelope: envelope header, item header, event payload
pub fn envelope(dsn: &Dsn, report: &Report) -> Result<Vec<u8>, serde_json::Error> {
    let payload = serde_json::to_vec(report)?;
    let header = serde_json::json!({
        "event_id": report.event_id,
        "sent_at": report.timestamp,
        "dsn": dsn.raw,
    });
    let item = serde_json::json!({ "type": "event", "length": payload.len() });

    let mut body = serde_json::to_vec(&header)?;
    body.push(b'\n');
    body.extend(serde_json::to_vec(&item)?);
    body.push(b'\n');
    body.extend(payload);
    body.push(b'\n');
    Ok(body)
}

async fn post_report(
    client: &reqwest::Client,
    dsn: &Dsn,
    report: &Report,
) -> Result<(), PostError> {
    let body = envelope(dsn, report)?;
    client
        .post(dsn.envelope_url().clone())
        .header("X-Sentry-Auth", dsn.auth_header())
        .header(reqwest::header::CONTENT_TYPE, "application/x-sentry-envelope")
        .body(body)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

impl ErrorTrackingLayer {
    fn report(&self, severity: Severity, event: &Event<'_>) -> Report {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let target = event.metadata().target().to_string();
        let text = visitor.message.unwrap_or_default();
        let (message, exception) = match severity {
            Severity::Warning => (Some(ReportMessage { formatted: text }), None),
            Severity::Error => (
                None,
                Some(Exceptions {
                    values: vec![Exception {
                        kind: target.clone(),
                        value: text,
                    }],
                }),
            ),
        };

        Report {
            event_id: uuid::Uuid::new_v4().simple().to_string(),
            timestamp: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            level: severity,
            platform: "other",
            logger: target,
            environment: self.environment.clone(),
            release: self.release.clone(),
            message,
            exception,
            extra: visitor.fields,
        }
    }
}

impl<S: Subscriber> Layer<S> for ErrorTrackingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = if *metadata.level() == Level::ERROR {
            Severity::Error
        } else if *metadata.level() == Level::WARN {
            Severity::Warning
        } else {
            return;
        };
        if metadata.target().starts_with(module_path!()) {
            return;
        }

        let report = self.report(severity, event);
        let _ = self.tx.try_send(Command::Capture(Box::new(report)));
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}
