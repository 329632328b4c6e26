//! Bounded-retry loading of a list into a page container.
//!
//! # Design
//! One `load_data` call walks `idle → loading → success | retry-wait →
//! loading | exhausted`. Waits are tokio timers, so other loads and UI work
//! keep running while a retry is pending. Transport failures never escape:
//! exhaustion becomes the error panel and a `None` result. The render
//! function only ever sees fully decoded data.
//!
//! Each call claims a new generation on its container; when a newer load has
//! started by the time this one finishes, its markup is dropped and only the
//! data is returned.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::http::HttpMethod;
use crate::page::Page;
use crate::render::status;
use crate::transport::Transport;

/// Retry budget and linear backoff step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// A zero budget still makes one attempt.
    fn budget(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[derive(Debug)]
pub struct Loader<T> {
    client: ApiClient<T>,
    page: Page,
    policy: RetryPolicy,
}

impl<T> Clone for Loader<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            page: self.page.clone(),
            policy: self.policy,
        }
    }
}

impl<T: Transport> Loader<T> {
    pub fn new(client: ApiClient<T>, page: Page) -> Self {
        Self::with_policy(client, page, RetryPolicy::default())
    }

    pub fn with_policy(client: ApiClient<T>, page: Page, policy: RetryPolicy) -> Self {
        Self { client, page, policy }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Load `path` into container `target` with the default budget.
    pub async fn load_data<D, R>(&self, path: &str, target: &str, render: R) -> Option<D>
    where
        D: DeserializeOwned,
        R: Fn(&D) -> String,
    {
        self.load_data_with_budget(path, target, render, self.policy.max_attempts)
            .await
    }

    /// Returns the data on success; `None` when the container is missing or
    /// every attempt failed.
    pub async fn load_data_with_budget<D, R>(
        &self,
        path: &str,
        target: &str,
        render: R,
        retries: u32,
    ) -> Option<D>
    where
        D: DeserializeOwned,
        R: Fn(&D) -> String,
    {
        let Some(ticket) = self.page.begin_load(target, status::loading_placeholder()) else {
            tracing::error!(container = target, "element with this id not found, nothing to load into");
            return None;
        };
        let policy = RetryPolicy {
            max_attempts: retries,
            ..self.policy
        };
        let budget = policy.budget();

        let mut attempt = 1;
        loop {
            match self
                .client
                .request_as::<D, ()>(HttpMethod::Get, path, None)
                .await
            {
                Ok(data) => {
                    let html = render(&data);
                    if !self.page.finish_load(target, ticket, html) {
                        tracing::debug!(container = target, path, "load superseded, markup discarded");
                    }
                    return Some(data);
                }
                Err(err) if attempt >= budget => {
                    tracing::error!(container = target, path, attempts = attempt, error = %err, "giving up loading data");
                    self.page
                        .finish_load(target, ticket, status::error_panel(&err.to_string()));
                    return None;
                }
                Err(err) => {
                    let delay = policy.delay_after(attempt);
                    tracing::warn!(container = target, path, attempt, ?delay, error = %err, "error loading data, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::time::Instant;

    use crate::testing::ScriptedTransport;
    use crate::types::Customer;
    use crate::ui::{NotificationLevel, NotificationLog, UiService};

    const TARGET: &str = "customersContainer";
    const CUSTOMERS: &str = r#"[{"customer_id":1,"name":"Asha","phone":"9876543210"}]"#;

    fn loader(script: ScriptedTransport) -> (Loader<ScriptedTransport>, Arc<NotificationLog>) {
        let (ui, log) = UiService::recording();
        let client = ApiClient::new("http://localhost:5000", script, ui);
        (Loader::new(client, Page::with_containers([TARGET])), log)
    }

    fn names(customers: &Vec<Customer>) -> String {
        customers
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    #[tokio::test(start_paused = true)]
    async fn success_renders_and_returns_data() {
        let script = ScriptedTransport::new().respond(200, CUSTOMERS);
        let (loader, log) = loader(script.clone());

        let data = loader.load_data("/api/customers", TARGET, names).await.unwrap();
        assert_eq!(data[0].customer_id, 1);
        assert_eq!(loader.page().html(TARGET).as_deref(), Some("Asha"));
        assert_eq!(loader.page().is_loading(TARGET), Some(false));
        assert_eq!(script.requests().len(), 1);
        assert!(log.entries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_transport_exhausts_after_three_attempts() {
        let script = ScriptedTransport::new().always_fail("connection refused");
        let (loader, log) = loader(script.clone());
        let start = Instant::now();

        let data: Option<Vec<Customer>> = loader.load_data("/api/customers", TARGET, names).await;
        assert!(data.is_none());

        let calls = script.call_times();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0] - start, Duration::ZERO);
        assert_eq!(calls[1] - calls[0], Duration::from_millis(1000));
        assert_eq!(calls[2] - calls[1], Duration::from_millis(2000));
        assert_eq!(Instant::now() - calls[2], Duration::ZERO, "no wait after the last attempt");

        let html = loader.page().html(TARGET).unwrap();
        assert!(html.contains("Error loading data:</strong> connection refused"));
        assert!(html.contains(r#"data-action="reload""#));
        assert_eq!(loader.page().is_loading(TARGET), Some(false));
        assert_eq!(log.count(NotificationLevel::Error), 3, "one transient notification per attempt");
    }

    #[tokio::test(start_paused = true)]
    async fn third_attempt_success_wins() {
        let script = ScriptedTransport::new()
            .respond(500, "{}")
            .fail("connection reset")
            .respond(200, CUSTOMERS);
        let (loader, _) = loader(script.clone());

        let data = loader.load_data("/api/customers", TARGET, names).await;
        assert_eq!(data.map(|d| d.len()), Some(1));
        assert_eq!(loader.page().html(TARGET).as_deref(), Some("Asha"));
        assert_eq!(script.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn render_never_sees_failed_data() {
        let script = ScriptedTransport::new()
            .respond(200, "not json")
            .respond(200, r#"{"unexpected":"shape"}"#)
            .respond(200, CUSTOMERS);
        let (loader, _) = loader(script);
        let calls = std::sync::atomic::AtomicUsize::new(0);

        let data = loader
            .load_data("/api/customers", TARGET, |c: &Vec<Customer>| {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                names(c)
            })
            .await;
        assert!(data.is_some());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_container_aborts_without_request() {
        let script = ScriptedTransport::new().respond(200, CUSTOMERS);
        let (loader, log) = loader(script.clone());

        let data = loader.load_data("/api/customers", "nope", names).await;
        assert!(data.is_none());
        assert!(script.requests().is_empty());
        assert!(log.entries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_still_attempts_once() {
        let script = ScriptedTransport::new().always_fail("down");
        let (loader, _) = loader(script.clone());

        let data = loader
            .load_data_with_budget("/api/customers", TARGET, names, 0)
            .await;
        assert!(data.is_none());
        assert_eq!(script.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_load_does_not_overwrite_newer_one() {
        // First load fails once and retries after 1s; the second load starts
        // meanwhile and finishes first.
        let script = ScriptedTransport::new()
            .fail("blip")
            .respond(200, r#"[{"customer_id":2,"name":"Ravi"}]"#)
            .respond(200, CUSTOMERS);
        let (loader, _) = loader(script);

        let first = loader.load_data("/api/customers", TARGET, |c: &Vec<Customer>| format!("first:{}", names(c)));
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            loader
                .load_data("/api/customers", TARGET, |c: &Vec<Customer>| format!("second:{}", names(c)))
                .await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(second.unwrap()[0].name, "Ravi");
        assert_eq!(first.unwrap()[0].name, "Asha", "stale load still returns its data");
        assert_eq!(loader.page().html(TARGET).as_deref(), Some("second:Ravi"));
    }

    #[test]
    fn linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(2000));
    }
}
