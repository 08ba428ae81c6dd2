//! Channel reconciliation.
//!
//! Walks the topic list in order and provisions a remote channel for every
//! topic that lacks one. Failures are recorded per topic and the pass goes on.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chat::ChatApi;
use crate::config::{ConfigStore, Topic};
use crate::observability::metrics;
use crate::provisioning::palette::pick_accent;
use crate::provisioning::ProvisionError;
use crate::routing::slugify;

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// The topic list after the pass, in the original order.
    pub topics: Vec<Topic>,
    /// Names of the topics that got a channel in this pass.
    pub provisioned: Vec<String>,
    /// Per-topic failures. Those topics keep `id == 0`.
    pub failures: Vec<ProvisionError>,
}

impl ReconcileReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct ChannelReconciler {
    api: Arc<dyn ChatApi>,
    rng: StdRng,
}

impl ChannelReconciler {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self {
            api,
            rng: StdRng::from_entropy(),
        }
    }

    /// Same as [`ChannelReconciler::new`] with a fixed accent sequence.
    pub fn with_seed(api: Arc<dyn ChatApi>, seed: u64) -> Self {
        Self {
            api,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Provision every unprovisioned topic under `parent_group_id`.
    pub async fn reconcile(&mut self, parent_group_id: i64, mut topics: Vec<Topic>) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for topic in topics.iter_mut().filter(|t| !t.is_provisioned()) {
            let accent = pick_accent(&mut self.rng);
            match self.api.create_channel(parent_group_id, &topic.name, accent).await {
                Ok(id) => {
                    topic.id = id;
                    if topic.slug.is_empty() {
                        topic.slug = slugify(&topic.name);
                    }
                    tracing::info!(topic = %topic.name, slug = %topic.slug, id, "Channel provisioned");
                    metrics::record_provision(true);
                    report.provisioned.push(topic.name.clone());
                }
                Err(source) => {
                    let err = ProvisionError::CreateChannel {
                        topic: topic.name.clone(),
                        source,
                    };
                    tracing::warn!(error = %err, "Skipping topic");
                    metrics::record_provision(false);
                    report.failures.push(err);
                }
            }
        }

        report.topics = topics;
        report
    }

    /// Reconcile the store's topic list and persist the result.
    ///
    /// The list is written back even when some topics failed.
    pub async fn reconcile_store(&mut self, store: &ConfigStore) -> Result<ReconcileReport, ProvisionError> {
        let config = store.snapshot();
        let pending = config.topics.iter().filter(|t| !t.is_provisioned()).count();

        if pending > 0 && config.chat_id == 0 {
            return Err(ProvisionError::MissingParentGroup);
        }

        let report = self.reconcile(config.chat_id, config.topics.clone()).await;
        store.update_topics(report.topics.clone())?;

        tracing::info!(
            total = report.topics.len(),
            provisioned = report.provisioned.len(),
            failed = report.failures.len(),
            "Reconciliation finished"
        );
        Ok(report)
    }
}
