//! Heartbeat pinger for an external health-check service.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::AppConfig;

pub struct HealthPinger {
    client: reqwest::Client,
    check_url: String,
    interval: Duration,
}

impl HealthPinger {
    pub fn new(base_url: &str, check_id: &str, interval: Duration, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            check_url: format!("{}/{}", base_url.trim_end_matches('/'), check_id),
            interval,
        }
    }

    /// Build a pinger from the configuration, if a check id is set.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        if !config.heartbeat_enabled() {
            return None;
        }

        Some(Self::new(
            &config.healthcheck_base_url,
            &config.healthcheck_uuid,
            Duration::from_secs(config.ping_interval),
            Duration::from_secs(config.api_timeout_secs),
        ))
    }

    /// Ping on every tick until shutdown.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Health pinger starting");

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.ping().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health pinger received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Send one heartbeat. Returns whether the service acknowledged it.
    pub async fn ping(&self) -> bool {
        match self.client.get(&self.check_url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Heartbeat rejected");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e.without_url(), "Heartbeat failed");
                false
            }
        }
    }

    /// Report a failure with a short description.
    pub async fn signal_failure(&self, message: &str) {
        let url = format!("{}/fail", self.check_url);
        if let Err(e) = self.client.post(url).body(message.to_string()).send().await {
            tracing::warn!(error = %e.without_url(), "Failed to report failure to health check");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Bytes, extract::State, routing::{get, post}, Router};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Calls {
        pings: Arc<Mutex<usize>>,
        failures: Arc<Mutex<Vec<String>>>,
    }

    async fn serve(calls: Calls) -> String {
        let router = Router::new()
            .route(
                "/check-1",
                get(|State(calls): State<Calls>| async move {
                    *calls.pings.lock().unwrap() += 1;
                    "OK"
                }),
            )
            .route(
                "/check-1/fail",
                post(|State(calls): State<Calls>, body: Bytes| async move {
                    calls
                        .failures
                        .lock()
                        .unwrap()
                        .push(String::from_utf8_lossy(&body).into_owned());
                    "OK"
                }),
            )
            .with_state(calls);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_disabled_without_check_id() {
        assert!(HealthPinger::from_config(&AppConfig::default()).is_none());

        let config = AppConfig {
            healthcheck_uuid: "check-1".into(),
            ping_interval: 30,
            ..AppConfig::default()
        };
        assert!(HealthPinger::from_config(&config).is_some());
    }

    #[tokio::test]
    async fn test_ping_and_failure_report() {
        let calls = Calls::default();
        let base = serve(calls.clone()).await;
        let pinger = HealthPinger::new(&base, "check-1", Duration::from_secs(60), Duration::from_secs(5));

        assert!(pinger.ping().await);
        pinger.signal_failure("sendMessage timed out").await;

        assert_eq!(*calls.pings.lock().unwrap(), 1);
        assert_eq!(*calls.failures.lock().unwrap(), vec!["sendMessage timed out".to_string()]);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let calls = Calls::default();
        let base = serve(calls.clone()).await;
        let pinger = HealthPinger::new(&base, "check-1", Duration::from_millis(20), Duration::from_secs(5));

        let (tx, rx) = broadcast::channel(1);
        let task = tokio::spawn(async move { pinger.run(rx).await });

        time::sleep(Duration::from_millis(100)).await;
        tx.send(()).unwrap();
        time::timeout(Duration::from_secs(2), task).await.unwrap().unwrap();

        assert!(*calls.pings.lock().unwrap() >= 1);
    }
}
