//! Sends a validated listing to the listing service.
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde_json::Value;

use crate::domain::{City, Field, FileHandle, ListingDraft, ValidationErrorSet};
use crate::dto::reports_success;
use crate::forms::listing::evaluate;
use crate::models::config::ClientConfig;
use crate::services::session::CredentialSource;
use crate::services::{SubmissionError, SubmissionResult};

/// Result of a single submission attempt.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Success,
    Failure(SubmissionError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success)
    }

    pub fn reason(&self) -> Option<String> {
        match self {
            SubmissionOutcome::Success => None,
            SubmissionOutcome::Failure(err) => Some(err.to_string()),
        }
    }
}

impl From<SubmissionResult<()>> for SubmissionOutcome {
    fn from(result: SubmissionResult<()>) -> Self {
        match result {
            Ok(()) => SubmissionOutcome::Success,
            Err(err) => SubmissionOutcome::Failure(err),
        }
    }
}

/// Listing values that passed every validation rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingSubmission {
    pub car_model: String,
    pub price: f64,
    pub phone: String,
    pub city: City,
    pub photos: Vec<FileHandle>,
}

impl TryFrom<&ListingDraft> for ListingSubmission {
    type Error = ValidationErrorSet;

    fn try_from(draft: &ListingDraft) -> Result<Self, Self::Error> {
        let errors = evaluate(draft);
        if !errors.is_empty() {
            return Err(errors);
        }

        match (draft.price, draft.city) {
            (Some(price), Some(city)) => Ok(Self {
                car_model: draft.car_model.clone(),
                price,
                phone: draft.phone.clone(),
                city,
                photos: draft.photos.files().to_vec(),
            }),
            (price, _) => {
                let mut errors = ValidationErrorSet::new();
                if price.is_none() {
                    errors.insert(Field::Price, "Price is required.");
                } else {
                    errors.insert(Field::City, "City is required.");
                }
                Err(errors)
            }
        }
    }
}

impl ListingSubmission {
    /// Multipart body: scalar fields as text, photos as repeated binary parts.
    pub fn to_multipart(&self) -> SubmissionResult<Form> {
        let mut form = Form::new()
            .text(Field::CarModel.as_str(), self.car_model.clone())
            .text(Field::Price.as_str(), self.price.to_string())
            .text(Field::Phone.as_str(), self.phone.clone())
            .text(Field::City.as_str(), self.city.as_str());

        for photo in &self.photos {
            let part = Part::stream_with_length(Body::from(photo.bytes().clone()), photo.size())
                .file_name(photo.name().as_str().to_string())
                .mime_str(&photo.content_type())
                .map_err(SubmissionError::Payload)?;
            form = form.part(Field::Photos.as_str(), part);
        }
        Ok(form)
    }
}

/// Posts listings, optionally insisting on an explicit bearer credential.
#[derive(Clone, Debug)]
pub struct SubmissionPipeline {
    client: Client,
    endpoint: String,
    requires_explicit_credential: bool,
}

impl SubmissionPipeline {
    pub fn new(client: Client, endpoint: String, requires_explicit_credential: bool) -> Self {
        Self {
            client,
            endpoint,
            requires_explicit_credential,
        }
    }

    pub fn from_config(config: &ClientConfig) -> SubmissionResult<Self> {
        let client = build_client(config).map_err(SubmissionError::Transport)?;
        Ok(Self::new(
            client,
            config.listing_url(),
            config.requires_explicit_credential,
        ))
    }

    pub fn requires_explicit_credential(&self) -> bool {
        self.requires_explicit_credential
    }

    /// One attempt, no retry. The listing itself is never modified.
    pub async fn submit<C>(&self, listing: &ListingSubmission, credentials: &C) -> SubmissionOutcome
    where
        C: CredentialSource + ?Sized,
    {
        let outcome = SubmissionOutcome::from(self.send(listing, credentials).await);
        match &outcome {
            SubmissionOutcome::Success => {
                log::info!("Listing '{}' submitted", listing.car_model)
            }
            SubmissionOutcome::Failure(err) => {
                log::error!("Listing submission failed: {err}")
            }
        }
        outcome
    }

    async fn send<C>(&self, listing: &ListingSubmission, credentials: &C) -> SubmissionResult<()>
    where
        C: CredentialSource + ?Sized,
    {
        let credential = credentials.credential().filter(|token| !token.is_empty());
        if self.requires_explicit_credential && credential.is_none() {
            return Err(SubmissionError::MissingCredential);
        }

        let form = listing.to_multipart()?;
        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = credential {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(SubmissionError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::warn!("Listing service returned {}: {}", status, error_text);
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| SubmissionError::UnexpectedResponse)?;
        if reports_success(&body) {
            Ok(())
        } else {
            Err(SubmissionError::UnexpectedResponse)
        }
    }
}

/// HTTP client honouring the optional transport timeout.
pub fn build_client(config: &ClientConfig) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}
