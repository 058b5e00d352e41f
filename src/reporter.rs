//! The reporting loop: acquire, send, log, wait, repeat.

use std::future::Future;

use crate::outcome::Outcome;
use crate::prelude::*;
use crate::settings::Settings;
use crate::source::MeasurementSource;
use crate::transport::{Payload, Transport};

pub struct Reporter<'s, S, T> {
    settings: &'s Settings,
    source: S,
    transport: T,
}

impl<'s, S: MeasurementSource, T: Transport> Reporter<'s, S, T> {
    pub fn new(settings: &'s Settings, source: S, transport: T) -> Self {
        Self {
            settings,
            source,
            transport,
        }
    }

    /// Runs a single acquire-and-send attempt. Never fails: every error ends up in the outcome.
    pub async fn cycle(&mut self) -> Outcome {
        let value = match self.source.produce() {
            Ok(value) => value,
            Err(error) => return Outcome::Unexpected(anyhow::Error::new(error).context("Failed to read the value")),
        };
        let payload = Payload {
            p_api_key: &self.settings.api_key,
            p_value: value,
            p_unit: &self.settings.unit,
        };
        match self.transport.post(&payload).await {
            Ok(reply) => Outcome::from_reply(reply, value, &self.settings.unit),
            Err(error) => error.into(),
        }
    }

    /// Runs a cycle, logs its outcome and waits for the send interval.
    pub async fn tick(&mut self) -> bool {
        let outcome = self.cycle().await;
        outcome.log();
        tokio::time::sleep(self.settings.interval()).await;
        outcome.is_success()
    }

    /// Repeats [`Reporter::tick`] until `shutdown` completes.
    pub async fn run<F: Future<Output = ()>>(mut self, shutdown: F) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = self.tick() => {}
            }
        }
        debug!("The reporting loop has stopped.");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use tokio::time::Instant;

    use super::*;
    use crate::outcome::{Rejection, Transient};
    use crate::source::{AcquisitionError, Fixed};
    use crate::transport::{Reply, TransportError};

    /// Replies with the scripted results in order, then with the last one forever.
    struct Stub {
        replies: RefCell<VecDeque<Result<Reply, TransportError>>>,
        sent: RefCell<Vec<(Instant, serde_json::Value)>>,
    }

    impl Stub {
        fn new(replies: Vec<Result<Reply, TransportError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn ok(body: &str) -> Result<Reply, TransportError> {
            Ok(Reply {
                status: 200,
                body: body.into(),
            })
        }

        fn times(&self) -> Vec<Instant> {
            self.sent.borrow().iter().map(|(at, _)| *at).collect()
        }
    }

    impl Transport for Stub {
        async fn post(&self, payload: &Payload<'_>) -> Result<Reply, TransportError> {
            self.sent
                .borrow_mut()
                .push((Instant::now(), serde_json::to_value(payload).unwrap()));
            let mut replies = self.replies.borrow_mut();
            if replies.len() > 1 {
                replies.pop_front().unwrap()
            } else {
                match replies.front().unwrap() {
                    Ok(reply) => Ok(reply.clone()),
                    Err(TransportError::Timeout) => Err(TransportError::Timeout),
                    Err(error) => Err(TransportError::Connection(error.to_string())),
                }
            }
        }
    }

    fn settings() -> Settings {
        Settings {
            url: "https://abcdefgh.supabase.co/rest/v1/rpc/insert_live_data".into(),
            api_key: "key".into(),
            header_key: "secret".into(),
            unit: "m³/h".into(),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn every_cycle_sends_the_value() {
        let settings = settings();
        let stub = Stub::new(vec![Stub::ok(r#"{"success": true}"#)]);
        let mut reporter = Reporter::new(&settings, Fixed(12.0), &stub);
        for _ in 0..3 {
            assert!(reporter.cycle().await.is_success());
        }
        let sent = stub.sent.borrow();
        assert_eq!(sent.len(), 3);
        for (_, body) in sent.iter() {
            assert_eq!(
                body,
                &serde_json::json!({"p_api_key": "key", "p_value": 12.0, "p_unit": "m³/h"}),
            );
        }
    }

    #[tokio::test]
    async fn success_is_logged_with_value_and_unit() {
        let settings = settings();
        let stub = Stub::new(vec![Stub::ok(r#"{"success": true}"#)]);
        let outcome = Reporter::new(&settings, Fixed(3.25), &stub).cycle().await;
        assert!(outcome.to_string().contains("3.25 m³/h"));
    }

    #[tokio::test]
    async fn rejection() {
        let settings = settings();
        let stub = Stub::new(vec![Stub::ok(r#"{"success": false, "error": "x"}"#)]);
        let outcome = Reporter::new(&settings, Fixed(1.0), &stub).cycle().await;
        assert!(matches!(outcome, Outcome::Rejected(Rejection::Application(_))));
        assert!(outcome.to_string().contains('x'));
    }

    #[tokio::test]
    async fn server_error() {
        let settings = settings();
        let stub = Stub::new(vec![Ok(Reply {
            status: 500,
            body: "oops".into(),
        })]);
        let outcome = Reporter::new(&settings, Fixed(1.0), &stub).cycle().await;
        assert!(!outcome.is_success());
        assert!(outcome.to_string().contains("500"));
    }

    #[tokio::test]
    async fn timeout_does_not_propagate() {
        let settings = settings();
        let stub = Stub::new(vec![Err(TransportError::Timeout)]);
        let outcome = Reporter::new(&settings, Fixed(1.0), &stub).cycle().await;
        assert!(matches!(outcome, Outcome::Transient(Transient::Timeout)));
    }

    #[tokio::test]
    async fn acquisition_failure_skips_the_request() {
        let settings = settings();
        let stub = Stub::new(vec![Stub::ok(r#"{"success": true}"#)]);
        let source = || -> Result<f64, AcquisitionError> { Err(AcquisitionError::Other("sensor is offline".into())) };
        let outcome = Reporter::new(&settings, source, &stub).cycle().await;
        assert!(matches!(outcome, Outcome::Unexpected(_)));
        assert!(outcome.to_string().contains("sensor is offline"));
        assert!(stub.sent.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_interval_whatever_the_outcome() {
        let settings = settings();
        let stub = Stub::new(vec![
            Stub::ok(r#"{"success": true}"#),
            Err(TransportError::Timeout),
            Stub::ok(r#"{"success": false}"#),
            Stub::ok(r#"{"success": true}"#),
        ]);
        let started_at = Instant::now();
        Reporter::new(&settings, Fixed(1.0), &stub)
            .run(tokio::time::sleep(Duration::from_secs(17)))
            .await;
        let times: Vec<Duration> = stub.times().iter().map(|at| *at - started_at).collect();
        assert_eq!(
            times,
            vec![
                Duration::from_secs(0),
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(15),
            ],
        );
    }

    #[tokio::test(start_paused = true)]
    async fn tick_reports_the_outcome() {
        let settings = settings();
        let stub = Stub::new(vec![Stub::ok(r#"{"success": true}"#), Stub::ok(r#"{"success": false}"#)]);
        let mut reporter = Reporter::new(&settings, Fixed(1.0), &stub);
        assert!(reporter.tick().await);
        assert!(!reporter.tick().await);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_the_wait() {
        let settings = Settings {
            interval_secs: 3600,
            ..settings()
        };
        let stub = Stub::new(vec![Stub::ok(r#"{"success": true}"#)]);
        let started_at = Instant::now();
        Reporter::new(&settings, Fixed(1.0), &stub)
            .run(tokio::time::sleep(Duration::from_secs(1)))
            .await;
        assert_eq!(stub.sent.borrow().len(), 1);
        assert!(Instant::now() - started_at < Duration::from_secs(2));
    }
}
