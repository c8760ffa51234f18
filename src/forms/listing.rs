//! Validation rules for the listing form.
use validator::{Validate, ValidationError};

use crate::PHONE_REGEX;
use crate::domain::{City, Field, FileHandle, ListingDraft, ValidationErrorSet};
use crate::forms::{first_messages, new_validation_error};

/// Snapshot of a draft in the shape the rules are declared on.
///
/// Blank text and non-finite prices become `None` so that "required" is
/// reported instead of a format error.
#[derive(Debug, Validate)]
#[validate(schema(function = "validate_photo_bound", skip_on_field_errors = false))]
pub struct ListingForm {
    #[validate(required(message = "Car model is required."))]
    pub car_model: Option<String>,

    #[validate(
        required(message = "Price is required."),
        range(exclusive_min = 0.0, message = "Price must be greater than zero.")
    )]
    pub price: Option<f64>,

    #[validate(
        required(message = "Phone number is required."),
        regex(path = *PHONE_REGEX, message = "Phone number must be 10 digits.")
    )]
    pub phone: Option<String>,

    #[validate(required(message = "City is required."))]
    pub city: Option<City>,

    #[validate(
        required(message = "Please select the maximum number of photos allowed."),
        range(min = 1, message = "You must allow at least one photo.")
    )]
    pub max_photos: Option<u8>,

    #[validate(length(min = 1, message = "At least one photo is required."))]
    pub photos: Vec<FileHandle>,
}

/// Photo count is bounded by the maximum selected in the same draft.
fn validate_photo_bound(form: &ListingForm) -> Result<(), ValidationError> {
    match form.max_photos {
        Some(max) if form.photos.len() > usize::from(max) => Err(new_validation_error(
            "photos",
            "You cannot upload more than the selected number of photos.",
        )),
        _ => Ok(()),
    }
}

impl From<&ListingDraft> for ListingForm {
    fn from(draft: &ListingDraft) -> Self {
        let car_model = Some(draft.car_model.clone()).filter(|m| !m.trim().is_empty());
        let phone = Some(draft.phone.clone()).filter(|p| !p.is_empty());

        Self {
            car_model,
            price: draft.price.filter(|p| p.is_finite()),
            phone,
            city: draft.city,
            max_photos: draft.max_photos,
            photos: draft.photos.files().to_vec(),
        }
    }
}

fn field_from_key(key: &str) -> Option<Field> {
    match key {
        "car_model" => Some(Field::CarModel),
        "price" => Some(Field::Price),
        "phone" => Some(Field::Phone),
        "city" => Some(Field::City),
        "max_photos" => Some(Field::MaxPhotos),
        "photos" => Some(Field::Photos),
        _ => None,
    }
}

/// Evaluate every rule against `draft`, collecting one message per field.
pub fn evaluate(draft: &ListingDraft) -> ValidationErrorSet {
    let mut set = ValidationErrorSet::new();
    let Err(errors) = ListingForm::from(draft).validate() else {
        return set;
    };

    for entry in first_messages(&errors) {
        let key = if entry.is_schema_level() {
            &entry.code
        } else {
            &entry.key
        };
        match field_from_key(key) {
            Some(field) => set.insert(field, entry.message),
            None => log::warn!("Unmapped validation error on {}: {}", entry.key, entry.code),
        }
    }
    set
}

/// Message for `field` from a full evaluation.
pub fn evaluate_field(draft: &ListingDraft, field: Field) -> Option<String> {
    evaluate(draft).get(field).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileName;

    fn photo(name: &str) -> FileHandle {
        FileHandle::new(FileName::try_from_str(name).unwrap(), vec![0u8; 16])
    }

    fn valid_draft() -> ListingDraft {
        let mut draft = ListingDraft::default();
        draft.car_model = "Honda Civic".to_string();
        draft.price = Some(2_500_000.0);
        draft.phone = "0300123456".to_string();
        draft.photos.add_files(&[photo("front.jpg")], 3).unwrap();
        draft
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(evaluate(&valid_draft()).is_empty());
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let draft = ListingDraft {
            city: None,
            ..ListingDraft::default()
        };

        let errors = evaluate(&draft);

        assert_eq!(errors.get(Field::CarModel), Some("Car model is required."));
        assert_eq!(errors.get(Field::Price), Some("Price is required."));
        assert_eq!(errors.get(Field::Phone), Some("Phone number is required."));
        assert_eq!(errors.get(Field::City), Some("City is required."));
        assert_eq!(
            errors.get(Field::Photos),
            Some("At least one photo is required.")
        );
        assert!(!errors.contains(Field::MaxPhotos));
    }

    #[test]
    fn whitespace_model_is_missing() {
        let mut draft = valid_draft();
        draft.car_model = "   ".to_string();
        assert_eq!(
            evaluate_field(&draft, Field::CarModel).as_deref(),
            Some("Car model is required.")
        );
    }

    #[test]
    fn price_must_be_positive() {
        let mut draft = valid_draft();
        for price in [0.0, -10.0] {
            draft.price = Some(price);
            assert_eq!(
                evaluate_field(&draft, Field::Price).as_deref(),
                Some("Price must be greater than zero.")
            );
        }
        draft.price = Some(0.5);
        assert!(evaluate_field(&draft, Field::Price).is_none());
    }

    #[test]
    fn non_finite_price_is_missing() {
        let mut draft = valid_draft();
        for price in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            draft.price = Some(price);
            assert_eq!(
                evaluate_field(&draft, Field::Price).as_deref(),
                Some("Price is required."),
                "{price}"
            );
            assert!(crate::services::submission::ListingSubmission::try_from(&draft).is_err());
        }
    }

    #[test]
    fn validation_runs_with_photos_attached() {
        let mut draft = valid_draft();
        draft.city = None;
        let errors = evaluate(&draft);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::City), Some("City is required."));
    }

    #[test]
    fn phone_needs_exactly_ten_digits() {
        let mut draft = valid_draft();
        for phone in ["12345", "12345678901", "123abc7890", " 012345678"] {
            draft.phone = phone.to_string();
            assert_eq!(
                evaluate_field(&draft, Field::Phone).as_deref(),
                Some("Phone number must be 10 digits."),
                "{phone}"
            );
        }
        draft.phone = "1234567890".to_string();
        assert!(evaluate_field(&draft, Field::Phone).is_none());
    }

    #[test]
    fn max_photos_missing_or_zero() {
        let mut draft = valid_draft();
        draft.max_photos = None;
        assert_eq!(
            evaluate_field(&draft, Field::MaxPhotos).as_deref(),
            Some("Please select the maximum number of photos allowed.")
        );

        draft.max_photos = Some(0);
        let errors = evaluate(&draft);
        assert_eq!(
            errors.get(Field::MaxPhotos),
            Some("You must allow at least one photo.")
        );
        assert_eq!(
            errors.get(Field::Photos),
            Some("You cannot upload more than the selected number of photos.")
        );
    }

    #[test]
    fn photo_bound_follows_selected_maximum() {
        let mut draft = valid_draft();
        draft
            .photos
            .add_files(&[photo("side.jpg"), photo("rear.jpg")], 3)
            .unwrap();
        assert!(evaluate(&draft).is_empty());

        for max in 1..=5u8 {
            draft.max_photos = Some(max);
            let errors = evaluate(&draft);
            if draft.photos.len() > usize::from(max) {
                assert_eq!(
                    errors.get(Field::Photos),
                    Some("You cannot upload more than the selected number of photos.")
                );
            } else {
                assert!(errors.is_empty(), "max {max}: {errors}");
            }
        }
    }

    #[test]
    fn cross_field_rule_runs_alongside_field_errors() {
        let mut draft = valid_draft();
        draft
            .photos
            .add_files(&[photo("side.jpg"), photo("rear.jpg")], 3)
            .unwrap();
        draft.max_photos = Some(1);
        draft.car_model.clear();

        let errors = evaluate(&draft);
        assert!(errors.contains(Field::CarModel));
        assert!(errors.contains(Field::Photos));
    }
}
