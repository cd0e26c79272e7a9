//! Fan-out of conflict alerts to the outbound notification service.
//!
//! Dispatch is best-effort: channels run as independent spawned tasks,
//! one channel's failure never cancels another, and the overall dispatch
//! is considered successful as long as the buyer was reached.

use crate::error::{ConflictError, ConflictResult};
use async_trait::async_trait;
use landgate_types::{AlertType, ClaimId, ConflictRecord, ConflictSeverity};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Recipient class of one outbound alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertChannel {
    /// The claimant whose intake triggered the detection run.
    Buyer,
    /// Legal contact registered for the overlapped parcel.
    LegalContact,
    /// Audit flag raised against the grantor side of the transaction.
    SellerAudit,
}

impl AlertChannel {
    pub fn label(&self) -> &'static str {
        match self {
            AlertChannel::Buyer => "buyer",
            AlertChannel::LegalContact => "legal_contact",
            AlertChannel::SellerAudit => "seller_audit",
        }
    }
}

/// Payload handed to the notification collaborator for one channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictAlert {
    pub channel: AlertChannel,
    /// The claim whose intake triggered the detection run.
    pub claim_id: ClaimId,
    /// The previously registered claim it overlaps.
    pub conflicting_claim_id: ClaimId,
    pub alert_type: AlertType,
    pub severity: ConflictSeverity,
    pub overlap_pct: f64,
    pub iou: f64,
    pub message: String,
}

impl ConflictAlert {
    pub fn for_channel(channel: AlertChannel, record: &ConflictRecord) -> Self {
        let message = format!(
            "claim {} overlaps registered claim {}: {:.1}% of the smaller parcel, IoU {:.2}",
            record.claim_a, record.claim_b, record.overlap_pct, record.iou
        );
        Self {
            channel,
            claim_id: record.claim_a.clone(),
            conflicting_claim_id: record.claim_b.clone(),
            alert_type: record.alert_type,
            severity: record.severity,
            overlap_pct: record.overlap_pct,
            iou: record.iou,
            message,
        }
    }
}

/// Delivery receipt reported by the notification collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlertReceipt {
    pub success: bool,
    pub email_sent: bool,
}

/// Outbound notification collaborator.
///
/// Implementations deliver one alert to one channel. Transport faults
/// are `Err`; a delivered-but-refused alert is `Ok` with `success`
/// false. The dispatcher treats both as a failed channel.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_conflict_alert(&self, alert: ConflictAlert) -> ConflictResult<AlertReceipt>;
}

/// Outcome of one channel within a dispatch.
#[derive(Debug, Clone)]
pub struct ChannelOutcome {
    pub channel: AlertChannel,
    pub success: bool,
    pub email_sent: bool,
    pub detail: Option<String>,
}

/// Result of fanning one conflict out to its channels.
#[derive(Debug, Clone)]
pub struct DispatchSummary {
    /// True when the buyer channel succeeded, regardless of the others.
    pub success: bool,
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchSummary {
    pub fn outcome_for(&self, channel: AlertChannel) -> Option<&ChannelOutcome> {
        self.outcomes.iter().find(|o| o.channel == channel)
    }
}

/// Fans one detected conflict out to the channels its severity warrants.
pub struct NotificationDispatcher {
    sink: Arc<dyn AlertSink>,
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self { sink }
    }

    /// The buyer always hears about a conflict. The registered legal
    /// contact is engaged once the pair is critical, and the seller is
    /// flagged for audit when a double sale is suspected.
    fn channels_for(record: &ConflictRecord) -> Vec<AlertChannel> {
        let mut channels = vec![AlertChannel::Buyer];
        if record.is_critical() {
            channels.push(AlertChannel::LegalContact);
        }
        if record.alert_type == AlertType::DoubleSaleSuspected {
            channels.push(AlertChannel::SellerAudit);
        }
        channels
    }

    /// Deliver alerts for one conflicting pair.
    ///
    /// Channels run as independent tasks; none is cancelled because a
    /// sibling failed, and per-channel failures are captured in the
    /// summary rather than propagated.
    pub async fn dispatch(&self, record: &ConflictRecord) -> DispatchSummary {
        let mut handles = Vec::new();
        for channel in Self::channels_for(record) {
            let sink = Arc::clone(&self.sink);
            let alert = ConflictAlert::for_channel(channel, record);
            handles.push((channel, tokio::spawn(async move {
                sink.send_conflict_alert(alert).await
            })));
        }

        let mut outcomes = Vec::new();
        for (channel, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(receipt)) => {
                    if !receipt.success {
                        warn!(
                            channel = channel.label(),
                            conflict_id = %record.conflict_id,
                            "notification service reported delivery failure"
                        );
                    }
                    ChannelOutcome {
                        channel,
                        success: receipt.success,
                        email_sent: receipt.email_sent,
                        detail: None,
                    }
                }
                Ok(Err(error)) => {
                    warn!(
                        channel = channel.label(),
                        conflict_id = %record.conflict_id,
                        error = %error,
                        "conflict alert channel failed"
                    );
                    ChannelOutcome {
                        channel,
                        success: false,
                        email_sent: false,
                        detail: Some(error.to_string()),
                    }
                }
                Err(join_error) => {
                    warn!(
                        channel = channel.label(),
                        conflict_id = %record.conflict_id,
                        error = %join_error,
                        "conflict alert task aborted"
                    );
                    ChannelOutcome {
                        channel,
                        success: false,
                        email_sent: false,
                        detail: Some("alert task aborted".to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let success = outcomes
            .iter()
            .any(|o| o.channel == AlertChannel::Buyer && o.success);
        DispatchSummary { success, outcomes }
    }
}

/// Test sink that records every alert it is asked to deliver.
#[derive(Default)]
pub struct RecordingAlertSink {
    sent: Mutex<Vec<ConflictAlert>>,
}

impl RecordingAlertSink {
    pub fn sent(&self) -> Vec<ConflictAlert> {
        self.sent
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AlertSink for RecordingAlertSink {
    async fn send_conflict_alert(&self, alert: ConflictAlert) -> ConflictResult<AlertReceipt> {
        self.sent
            .lock()
            .map_err(|_| ConflictError::Notification("alert sink lock poisoned".to_string()))?
            .push(alert);
        Ok(AlertReceipt {
            success: true,
            email_sent: true,
        })
    }
}

/// Test sink that fails selected channels with a transport error.
pub struct FailingAlertSink {
    failing: Option<Vec<AlertChannel>>,
}

impl FailingAlertSink {
    /// Every channel fails.
    pub fn all() -> Self {
        Self { failing: None }
    }

    /// Only the given channels fail; the rest deliver normally.
    pub fn for_channels(channels: Vec<AlertChannel>) -> Self {
        Self {
            failing: Some(channels),
        }
    }

    fn fails(&self, channel: AlertChannel) -> bool {
        match &self.failing {
            None => true,
            Some(channels) => channels.contains(&channel),
        }
    }
}

#[async_trait]
impl AlertSink for FailingAlertSink {
    async fn send_conflict_alert(&self, alert: ConflictAlert) -> ConflictResult<AlertReceipt> {
        if self.fails(alert.channel) {
            return Err(ConflictError::Notification(format!(
                "{} channel unreachable",
                alert.channel.label()
            )));
        }
        Ok(AlertReceipt {
            success: true,
            email_sent: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(severity: ConflictSeverity, alert_type: AlertType) -> ConflictRecord {
        ConflictRecord::new(
            ClaimId::generate(),
            ClaimId::generate(),
            82.0,
            0.61,
            severity,
            alert_type,
        )
    }

    #[tokio::test]
    async fn test_double_sale_reaches_all_three_channels() {
        let sink = Arc::new(RecordingAlertSink::default());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        let summary = dispatcher
            .dispatch(&record(
                ConflictSeverity::Critical,
                AlertType::DoubleSaleSuspected,
            ))
            .await;

        assert!(summary.success);
        assert_eq!(summary.outcomes.len(), 3);
        let channels: Vec<AlertChannel> = sink.sent().iter().map(|a| a.channel).collect();
        assert!(channels.contains(&AlertChannel::Buyer));
        assert!(channels.contains(&AlertChannel::LegalContact));
        assert!(channels.contains(&AlertChannel::SellerAudit));
    }

    #[tokio::test]
    async fn test_warning_only_notifies_the_buyer() {
        let sink = Arc::new(RecordingAlertSink::default());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        let summary = dispatcher
            .dispatch(&record(ConflictSeverity::Warning, AlertType::OverlapWarning))
            .await;

        assert!(summary.success);
        assert_eq!(summary.outcomes.len(), 1);
        assert_eq!(sink.sent()[0].channel, AlertChannel::Buyer);
    }

    #[tokio::test]
    async fn test_critical_adds_the_legal_contact() {
        let sink = Arc::new(RecordingAlertSink::default());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        let summary = dispatcher
            .dispatch(&record(
                ConflictSeverity::Critical,
                AlertType::CriticalConflict,
            ))
            .await;

        assert_eq!(summary.outcomes.len(), 2);
        assert!(summary.outcome_for(AlertChannel::LegalContact).is_some());
        assert!(summary.outcome_for(AlertChannel::SellerAudit).is_none());
    }

    #[tokio::test]
    async fn test_buyer_failure_fails_the_dispatch() {
        let sink = Arc::new(FailingAlertSink::for_channels(vec![AlertChannel::Buyer]));
        let dispatcher = NotificationDispatcher::new(sink);

        let summary = dispatcher
            .dispatch(&record(
                ConflictSeverity::Critical,
                AlertType::CriticalConflict,
            ))
            .await;

        assert!(!summary.success);
        let buyer = summary.outcome_for(AlertChannel::Buyer).unwrap();
        assert!(!buyer.success);
        assert!(buyer.detail.as_deref().unwrap().contains("unreachable"));
        // The sibling channel still went out.
        let legal = summary.outcome_for(AlertChannel::LegalContact).unwrap();
        assert!(legal.success);
    }

    #[tokio::test]
    async fn test_secondary_channel_failure_keeps_the_dispatch_successful() {
        let sink = Arc::new(FailingAlertSink::for_channels(vec![
            AlertChannel::LegalContact,
        ]));
        let dispatcher = NotificationDispatcher::new(sink);

        let summary = dispatcher
            .dispatch(&record(
                ConflictSeverity::Critical,
                AlertType::CriticalConflict,
            ))
            .await;

        assert!(summary.success);
        assert!(!summary.outcome_for(AlertChannel::LegalContact).unwrap().success);
    }

    #[tokio::test]
    async fn test_every_channel_down_still_returns_a_summary() {
        let dispatcher = NotificationDispatcher::new(Arc::new(FailingAlertSink::all()));

        let summary = dispatcher
            .dispatch(&record(
                ConflictSeverity::Critical,
                AlertType::DoubleSaleSuspected,
            ))
            .await;

        assert!(!summary.success);
        assert_eq!(summary.outcomes.len(), 3);
        assert!(summary.outcomes.iter().all(|o| !o.success));
    }
}
