//! Stateful listing form: field edits, photo management, validation timing and
//! the submit handshake.
use std::collections::BTreeSet;

use crate::domain::{
    City, Field, FileHandle, ListingDraft, PhotoError, PhotoSizePolicy, ValidationErrorSet,
};
use crate::forms::listing::evaluate;
use crate::preview::{PreviewCache, PreviewHandle};
use crate::services::SubmitRefused;
use crate::services::session::CredentialSource;
use crate::services::submission::{ListingSubmission, SubmissionOutcome, SubmissionPipeline};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormPhase {
    Pristine,
    Editing,
    Validating,
    Submitting,
    SubmitSucceeded,
    SubmitFailed,
}

#[derive(Debug)]
pub struct ListingFormController {
    draft: ListingDraft,
    errors: ValidationErrorSet,
    touched: BTreeSet<Field>,
    photo_error: Option<PhotoError>,
    previews: PreviewCache,
    phase: FormPhase,
}

impl ListingFormController {
    pub fn new(size_policy: PhotoSizePolicy) -> Self {
        Self {
            draft: ListingDraft::new(size_policy),
            errors: ValidationErrorSet::new(),
            touched: BTreeSet::new(),
            photo_error: None,
            previews: PreviewCache::new(),
            phase: FormPhase::Pristine,
        }
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn errors(&self) -> &ValidationErrorSet {
        &self.errors
    }

    pub fn photo_error(&self) -> Option<&PhotoError> {
        self.photo_error.as_ref()
    }

    pub fn previews(&self) -> &PreviewCache {
        &self.previews
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Error to render next to `field`; untouched fields stay quiet.
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// The submit control is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    pub fn set_car_model(&mut self, value: impl Into<String>) {
        self.draft.car_model = value.into();
        self.field_changed(Field::CarModel);
    }

    pub fn set_price(&mut self, value: Option<f64>) {
        self.draft.price = value;
        self.field_changed(Field::Price);
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.draft.phone = value.into();
        self.field_changed(Field::Phone);
    }

    pub fn set_city(&mut self, value: Option<City>) {
        self.draft.city = value;
        self.field_changed(Field::City);
    }

    /// Changing the maximum always drops the current selection.
    pub fn set_max_photos(&mut self, value: Option<u8>) -> Vec<PreviewHandle> {
        self.draft.max_photos = value;
        self.draft.photos.reset();
        self.photo_error = None;
        self.field_changed(Field::MaxPhotos);
        self.refresh_field(Field::Photos);
        self.previews.sync(self.draft.photos.files())
    }

    pub fn add_photos(&mut self, candidates: &[FileHandle]) -> Result<(), PhotoError> {
        self.mark_edited();
        let limit = self.draft.photo_limit();
        match self.draft.photos.add_files(candidates, limit) {
            Ok(()) => {
                self.photo_error = None;
                self.refresh_field(Field::Photos);
                self.previews.sync(self.draft.photos.files());
                Ok(())
            }
            Err(err) => {
                log::warn!("Rejected {} photo(s): {err}", candidates.len());
                self.photo_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn remove_photo(&mut self, index: usize) -> Vec<PreviewHandle> {
        self.mark_edited();
        if self.draft.photos.remove_at(index).is_some() {
            self.refresh_field(Field::Photos);
        }
        self.previews.sync(self.draft.photos.files())
    }

    /// Blur runs the whole schema and reveals the field's message.
    pub fn blur(&mut self, field: Field) {
        self.touched.insert(field);
        self.validate_all();
    }

    /// Touch every field and validate; on success the form enters `Submitting`
    /// and hands back the values to send.
    pub fn begin_submit(&mut self) -> Result<ListingSubmission, SubmitRefused> {
        if self.phase == FormPhase::Submitting {
            return Err(SubmitRefused::InFlight);
        }

        self.touched.extend(Field::ALL);
        self.validate_all();

        match ListingSubmission::try_from(&self.draft) {
            Ok(submission) => {
                self.phase = FormPhase::Submitting;
                Ok(submission)
            }
            Err(errors) => {
                log::info!("Submission blocked: {errors}");
                Err(SubmitRefused::Invalid(errors))
            }
        }
    }

    /// Record the pipeline's verdict. The draft stays populated either way.
    pub fn finish_submit(&mut self, outcome: &SubmissionOutcome) {
        if self.phase != FormPhase::Submitting {
            log::warn!("Ignoring submission outcome outside of a submission");
            return;
        }
        self.phase = if outcome.is_success() {
            FormPhase::SubmitSucceeded
        } else {
            FormPhase::SubmitFailed
        };
    }

    /// Validate, send through `pipeline` and record the outcome.
    pub async fn submit<C>(
        &mut self,
        pipeline: &SubmissionPipeline,
        credentials: &C,
    ) -> Result<SubmissionOutcome, SubmitRefused>
    where
        C: CredentialSource + ?Sized,
    {
        let submission = self.begin_submit()?;
        let outcome = pipeline.submit(&submission, credentials).await;
        self.finish_submit(&outcome);
        Ok(outcome)
    }

    /// Release every preview, e.g. when the form goes away.
    pub fn unmount(&mut self) -> Vec<PreviewHandle> {
        self.previews.clear()
    }

    fn validate_all(&mut self) {
        let resume = self.phase;
        self.phase = FormPhase::Validating;
        self.errors = evaluate(&self.draft);
        self.phase = match resume {
            FormPhase::Pristine | FormPhase::Validating => FormPhase::Editing,
            other => other,
        };
    }

    fn field_changed(&mut self, field: Field) {
        self.mark_edited();
        self.refresh_field(field);
    }

    fn refresh_field(&mut self, field: Field) {
        let fresh = evaluate(&self.draft);
        self.errors.refresh_from(&fresh, field);
    }

    fn mark_edited(&mut self) {
        if self.phase != FormPhase::Submitting {
            self.phase = FormPhase::Editing;
        }
    }
}

impl Default for ListingFormController {
    fn default() -> Self {
        Self::new(PhotoSizePolicy::default())
    }
}
