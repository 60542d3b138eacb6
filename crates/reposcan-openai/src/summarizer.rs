// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The summarizer adapter: one tool-constrained chat-completions call per
//! job, followed by reply validation, pruning, and the usage receipt.
//!
//! The 2-minute call deadline is a fresh timeout, deliberately independent of
//! the caller's per-message deadline: an aggressive message timeout must not
//! truncate an in-flight model call. Only the pre-call rate-limiter wait
//! observes the root cancellation token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use reposcan_config::AppConfig;
use reposcan_core::{
    ScanError, StandupPayload, SummarizeJob, Summarizer, UsageDetails, Variant,
};
use reposcan_ratelimit::RemoteLimiter;

use crate::pricing;
use crate::prompt::system_prompt;
use crate::schema::build_schema;
use crate::types::{
    ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse, FunctionDef, ToolParam,
};

/// Name of the single tool the model must call.
const TOOL_NAME: &str = "emit_structured_standup";

/// Hard deadline for one chat-completions call.
const SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(120);

/// Summarizer backed by the chat-completions endpoint.
pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    limiter: Arc<RemoteLimiter>,
}

impl OpenAiSummarizer {
    /// Creates the adapter.
    ///
    /// The HTTP client carries no per-request timeout of its own; the
    /// 2-minute call deadline is enforced around the whole request.
    pub fn new(
        config: &AppConfig,
        api_key: String,
        limiter: Arc<RemoteLimiter>,
    ) -> Result<Self, ScanError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ScanError::Model {
                message: format!("building http client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            api_base: config.openai.api_base.clone(),
            api_key,
            model: config.openai.model.clone(),
            limiter,
        })
    }

    fn build_request(&self, job_json: String, variant: Variant) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            seed: 0,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: system_prompt(variant).to_string(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: format!(
                        r#"{{"instruction":"Summarize commits into the exact structure","payload":{job_json}}}"#
                    ),
                },
            ],
            tools: vec![ToolParam {
                tool_type: "function".into(),
                function: FunctionDef {
                    name: TOOL_NAME.into(),
                    description:
                        "Return the final standup payload in the exact structure the app expects."
                            .into(),
                    parameters: build_schema(variant),
                },
            }],
        }
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ScanError> {
        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ScanError::Model {
                message: format!("chat completion request: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "openai api error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("api returned {status}: {body}")
            };
            return Err(ScanError::Model {
                message,
                source: None,
            });
        }

        response.json().await.map_err(|e| ScanError::Model {
            message: format!("parsing chat completion: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(
        &self,
        job: &SummarizeJob,
        variant: Variant,
        cancel: &CancellationToken,
    ) -> Result<(StandupPayload, UsageDetails), ScanError> {
        self.limiter.wait_openai(cancel).await?;

        let job_json = serde_json::to_string(job).map_err(|e| ScanError::Model {
            message: format!("marshal job: {e}"),
            source: Some(Box::new(e)),
        })?;
        let request = self.build_request(job_json, variant);

        let response = tokio::time::timeout(SUMMARIZE_TIMEOUT, self.post_chat(&request))
            .await
            .map_err(|_| ScanError::Model {
                message: format!("chat completion timeout after {SUMMARIZE_TIMEOUT:?}"),
                source: None,
            })??;

        let choice = response.choices.first().ok_or(ScanError::NoToolCall)?;
        let call = choice
            .message
            .tool_calls
            .iter()
            .find(|tc| tc.function.name == TOOL_NAME)
            .ok_or(ScanError::NoToolCall)?;

        let mut payload: StandupPayload =
            serde_json::from_str(&call.function.arguments).map_err(ScanError::BadToolArgs)?;

        if payload.repo.is_empty() {
            return Err(ScanError::EmptyPayload);
        }

        info!(
            repo = payload.repo.as_str(),
            since = payload.window.since.as_str(),
            until = payload.window.until.as_str(),
            contributors = payload.contributors.len(),
            variant = %variant,
            "summary generated"
        );

        prune_payload(&mut payload, variant);

        let usage = response.usage;
        let details = UsageDetails {
            model: response.model.clone(),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            estimated_cost: pricing::estimate_cost(
                &response.model,
                usage.prompt_tokens,
                usage.completion_tokens,
            ),
        };

        Ok((payload, details))
    }
}

/// Zeroes the two non-selected variant blocks and drops empty strings from
/// the selected block's lists. The artifact title survives untouched.
pub fn prune_payload(payload: &mut StandupPayload, variant: Variant) {
    match variant {
        Variant::Technical => {
            payload.mildly_technical = Default::default();
            payload.layman = Default::default();
            prune_empty(&mut payload.technical.what_worked_on);
            prune_empty(&mut payload.technical.commits);
        }
        Variant::MildlyTechnical => {
            payload.technical = Default::default();
            payload.layman = Default::default();
            prune_empty(&mut payload.mildly_technical.what_worked_on);
        }
        Variant::Layman => {
            payload.technical = Default::default();
            payload.mildly_technical = Default::default();
            prune_empty(&mut payload.layman.what_worked_on);
        }
    }
}

fn prune_empty(items: &mut Vec<String>) {
    items.retain(|s| !s.is_empty());
}
