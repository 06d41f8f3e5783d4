//! Delivery orchestration: Resolve -> Upload -> Notify -> Record.
//!
//! Stages run strictly in order, one request at a time; no stage starts
//! before the previous external call returned, and nothing retries
//! automatically. A repeat delivery is a brand-new run through the whole
//! pipeline. Every stage call is bounded by the configured timeout so a
//! hung provider cannot stall the operator loop forever.

use crate::notifier::Notifier;
use crate::recorder::{DeliveryOutcome, OutcomeRecorder};
use crate::resolver::RecipientResolver;
use crate::uploader::AssetUploader;
use fotodrop_core::{
    DeliveryError, DeliveryReport, DeliveryRequest, DeliveryResult, DeliveryStatus, Stage,
};
use std::future::Future;
use std::time::Duration;

pub struct DeliveryPipeline {
    resolver: RecipientResolver,
    uploader: AssetUploader,
    notifier: Notifier,
    recorder: OutcomeRecorder,
    stage_timeout: Duration,
}

impl DeliveryPipeline {
    pub fn new(
        resolver: RecipientResolver,
        uploader: AssetUploader,
        notifier: Notifier,
        recorder: OutcomeRecorder,
        stage_timeout: Duration,
    ) -> Self {
        DeliveryPipeline {
            resolver,
            uploader,
            notifier,
            recorder,
            stage_timeout,
        }
    }

    async fn bounded<T, F>(&self, stage: Stage, fut: F) -> DeliveryResult<T>
    where
        F: Future<Output = DeliveryResult<T>>,
    {
        match tokio::time::timeout(self.stage_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout {
                stage: stage.as_str(),
                seconds: self.stage_timeout.as_secs(),
            }),
        }
    }

    /// Run one delivery attempt end to end.
    ///
    /// Errors before any remote side effect (unknown model, empty source,
    /// duplicate alias without force) come back as `Err` and nothing is
    /// recorded. Once the upload stage has started, the attempt always ends
    /// in the recorder and the result is an `Ok` report, success or failure.
    pub async fn deliver(&self, request: DeliveryRequest) -> DeliveryResult<DeliveryReport> {
        let model_id = request.model_id.clone();
        tracing::info!(model_id = %model_id, "Delivery attempt started");

        let recipient = self
            .bounded(Stage::Resolving, self.resolver.resolve(&model_id))
            .await?;
        tracing::info!(model_id = %model_id, recipient = %recipient.email, row = recipient.row_index,
            "Recipient resolved");

        let folder = match self
            .bounded(Stage::Uploading, self.uploader.upload(&request))
            .await
        {
            Ok(folder) => folder,
            Err(e) if e.is_pre_flight() => return Err(e),
            Err(e) => {
                tracing::error!(model_id = %model_id, error = %e, "Upload stage failed");
                let outcome = DeliveryOutcome {
                    model_id: model_id.clone(),
                    recipient,
                    photographer: request.photographer.clone(),
                    status: DeliveryStatus::Failed,
                    message: e.to_string(),
                };
                self.recorder.record(&outcome).await;
                return Ok(DeliveryReport {
                    model_id,
                    status: DeliveryStatus::Failed,
                    failed_stage: Some(Stage::Uploading),
                    message: outcome.message,
                });
            }
        };

        match self
            .bounded(
                Stage::Notifying,
                self.notifier.notify(
                    &recipient,
                    &model_id,
                    &folder.public_link,
                    &request.photographer,
                ),
            )
            .await
        {
            Ok(receipt) => {
                let message = serde_json::to_string(&receipt)
                    .unwrap_or_else(|_| format!("{} {}", receipt.code, receipt.message));
                let outcome = DeliveryOutcome {
                    model_id: model_id.clone(),
                    recipient,
                    photographer: request.photographer.clone(),
                    status: DeliveryStatus::Success,
                    message,
                };
                self.recorder.record(&outcome).await;
                tracing::info!(model_id = %model_id, link = %folder.public_link,
                    "Delivery completed");
                Ok(DeliveryReport {
                    model_id,
                    status: DeliveryStatus::Success,
                    failed_stage: None,
                    message: outcome.message,
                })
            }
            Err(e) => {
                tracing::error!(model_id = %model_id, error = %e, "Notify stage failed");
                let outcome = DeliveryOutcome {
                    model_id: model_id.clone(),
                    recipient,
                    photographer: request.photographer.clone(),
                    status: DeliveryStatus::Failed,
                    message: e.to_string(),
                };
                self.recorder.record(&outcome).await;
                Ok(DeliveryReport {
                    model_id,
                    status: DeliveryStatus::Failed,
                    failed_stage: Some(Stage::Notifying),
                    message: outcome.message,
                })
            }
        }
    }
}
