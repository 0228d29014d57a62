//! Per-field validation rules.
//!
//! Every rule is a pure function of (field, value, sibling record) plus the
//! validator's notion of the current year. An empty message is represented
//! as `None`.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::wizard::draft::{OnboardingDraft, StepRecord, DEFAULT_BUSINESS_TYPE};
use crate::wizard::field::{Field, FieldValue};
use crate::wizard::step::Step;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref TIME_REGEX: Regex = Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    static ref GST_REGEX: Regex =
        Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").unwrap();
    static ref PAN_REGEX: Regex = Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap();
    static ref IFSC_REGEX: Regex = Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").unwrap();
    static ref UPI_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+$").unwrap();
}

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 8;
const MIN_DESCRIPTION_LEN: usize = 10;
const MAX_DESCRIPTION_LEN: usize = 500;
const MIN_ESTABLISHED_YEAR: i32 = 1900;
const MAX_IMAGE_URL_LEN: usize = 500;
const MAX_SOCIAL_LEN: usize = 255;

/// Field validator.
///
/// Holds the current year so the established-year bound is an input rather
/// than a clock read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldValidator {
    current_year: i32,
}

impl FieldValidator {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Validator pinned to today's UTC year.
    pub fn for_today() -> Self {
        use chrono::Datelike;
        Self::new(chrono::Utc::now().year())
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Validates `value` for `field` against the sibling record of the same step.
    pub fn validate(&self, field: Field, value: &FieldValue, siblings: &StepRecord) -> Option<String> {
        self.check(field, Some(value), siblings)
    }

    /// Validates the field's current value in the draft.
    pub fn validate_current(&self, field: Field, draft: &OnboardingDraft) -> Option<String> {
        let record = draft.record_or_default(field.step());
        let value = record.value(field);
        self.check(field, value.as_ref(), &record)
    }

    /// Every failing field of a step, keyed by field.
    pub fn validate_step(&self, step: Step, draft: &OnboardingDraft) -> BTreeMap<Field, String> {
        step.fields()
            .into_iter()
            .filter_map(|field| {
                self.validate_current(field, draft)
                    .map(|message| (field, message))
            })
            .collect()
    }

    fn check(&self, field: Field, value: Option<&FieldValue>, siblings: &StepRecord) -> Option<String> {
        let text = value.and_then(FieldValue::as_text).unwrap_or("");
        let number = value.and_then(FieldValue::as_number);
        let flag = value.and_then(FieldValue::as_flag).unwrap_or(false);
        let list = value.and_then(FieldValue::as_list).unwrap_or(&[]);
        let sibling_flag = |other: Field| {
            siblings
                .value(other)
                .and_then(|value| value.as_flag())
                .unwrap_or(false)
        };

        match field {
            Field::FirstName => name_rule(text, "First name"),
            Field::LastName => name_rule(text, "Last name"),
            Field::Email => {
                if text.trim().is_empty() {
                    fail("Email is required")
                } else if !EMAIL_REGEX.is_match(text) {
                    fail("Please enter a valid email address")
                } else {
                    None
                }
            }
            Field::PhoneNumber => {
                if text.trim().is_empty() {
                    fail("Phone number is required")
                } else if digits(text).len() != 10 {
                    fail("Please enter a valid 10-digit phone number")
                } else {
                    None
                }
            }

            Field::Password => {
                if text.is_empty() {
                    fail("Password is required")
                } else if text.chars().count() < MIN_PASSWORD_LEN {
                    fail("Password must be at least 8 characters")
                } else {
                    None
                }
            }
            Field::ConfirmPassword => {
                let password = siblings
                    .value(Field::Password)
                    .and_then(|value| value.as_text().map(str::to_string))
                    .unwrap_or_default();
                if text.is_empty() {
                    fail("Please confirm your password")
                } else if text != password {
                    fail("Passwords do not match")
                } else {
                    None
                }
            }
            Field::AgreeToTerms => {
                if flag {
                    None
                } else {
                    fail("You must agree to the terms and conditions")
                }
            }
            Field::AgreeToMarketing => None,

            Field::BusinessName => {
                if text.trim().is_empty() {
                    fail("Business name is required")
                } else if text.trim().chars().count() < MIN_NAME_LEN {
                    fail("Business name must be at least 2 characters")
                } else {
                    None
                }
            }
            Field::BusinessType => non_empty(list, "Please select at least one business type"),
            Field::Description => {
                let len = text.trim().chars().count();
                if len == 0 {
                    fail("Business description is required")
                } else if len < MIN_DESCRIPTION_LEN {
                    fail("Description must be at least 10 characters")
                } else if len > MAX_DESCRIPTION_LEN {
                    fail("Description must be less than 500 characters")
                } else {
                    None
                }
            }
            Field::EstablishedYear => self.established_year_rule(text),

            Field::Street => required(text, "Street address is required"),
            Field::City => required(text, "City is required"),
            Field::State => required(text, "State is required"),
            Field::PostalCode => {
                if text.trim().is_empty() {
                    fail("Postal code is required")
                } else if digits(text).len() != 6 {
                    fail("Please enter a valid 6-digit postal code")
                } else {
                    None
                }
            }
            Field::Country => required(text, "Country is required"),
            Field::OpenTime => time_rule(text, "Opening time"),
            Field::CloseTime => time_rule(text, "Closing time"),
            Field::OperatingDays => non_empty(list, "Please select at least one operating day"),
            Field::DeliveryRadius => range_rule(
                number,
                0.0,
                50.0,
                "Delivery radius cannot be negative",
                "Delivery radius cannot exceed 50 km",
            ),

            Field::CuisineTypes => non_empty(list, "Please select at least one cuisine type"),
            Field::ServiceOptions => {
                if sibling_flag(Field::HasDelivery) || sibling_flag(Field::HasPickup) {
                    None
                } else {
                    fail("Please select at least one service option")
                }
            }
            Field::PaymentMethods => {
                if sibling_flag(Field::AcceptsCash) || sibling_flag(Field::AcceptsCard) {
                    None
                } else {
                    fail("Please select at least one payment method")
                }
            }
            Field::IsVegetarian
            | Field::HasDelivery
            | Field::HasPickup
            | Field::AcceptsCash
            | Field::AcceptsCard => None,
            Field::MinimumOrderAmount => range_rule(
                number,
                50.0,
                1000.0,
                "Minimum order amount must be at least ₹50",
                "Minimum order amount cannot exceed ₹1000",
            ),
            Field::DeliveryFee => range_rule(
                number,
                0.0,
                200.0,
                "Delivery fee cannot be negative",
                "Delivery fee cannot exceed ₹200",
            ),
            Field::EstimatedDeliveryTime => range_rule(
                number,
                15.0,
                120.0,
                "Estimated delivery time must be at least 15 minutes",
                "Estimated delivery time cannot exceed 120 minutes",
            ),

            Field::FssaiLicense => {
                if text.trim().is_empty() {
                    fail("FSSAI License number is required")
                } else if text.trim().len() != 14 || !text.trim().chars().all(|c| c.is_ascii_digit()) {
                    fail("FSSAI License must be 14 digits")
                } else {
                    None
                }
            }
            Field::GstNumber => pattern_rule(
                text,
                &GST_REGEX,
                "GST Number is required",
                "Please enter a valid GST number",
            ),
            Field::PanNumber => pattern_rule(
                text,
                &PAN_REGEX,
                "PAN Number is required",
                "Please enter a valid PAN number",
            ),
            Field::LicenseNumber => required(text, "Business License number is required"),
            Field::FssaiDocument | Field::GstDocument | Field::PanDocument | Field::BankDocument => {
                None
            }

            Field::AccountNumber => {
                let account_digits = digits(text);
                if text.trim().is_empty() {
                    fail("Account number is required")
                } else if !(9..=18).contains(&account_digits.len()) {
                    fail("Account number must be 9-18 digits")
                } else {
                    None
                }
            }
            Field::IfscCode => pattern_rule(
                text,
                &IFSC_REGEX,
                "IFSC code is required",
                "Please enter a valid IFSC code",
            ),
            Field::AccountHolderName => {
                if text.trim().is_empty() {
                    fail("Account holder name is required")
                } else if text.trim().chars().count() < MIN_NAME_LEN {
                    fail("Account holder name must be at least 2 characters")
                } else {
                    None
                }
            }
            Field::BankName => required(text, "Bank name is required"),
            Field::UpiId => {
                if !text.trim().is_empty() && !UPI_REGEX.is_match(text.trim()) {
                    fail("Please enter a valid UPI ID")
                } else {
                    None
                }
            }
            Field::CommissionRate => range_rule(
                number,
                0.0,
                100.0,
                "Commission rate cannot be negative",
                "Commission rate cannot exceed 100%",
            ),

            Field::LogoUrl => max_len(text, MAX_IMAGE_URL_LEN, "Logo URL is too long"),
            Field::BannerUrl => max_len(text, MAX_IMAGE_URL_LEN, "Banner URL is too long"),
            Field::Instagram => max_len(text, MAX_SOCIAL_LEN, "Instagram URL is too long"),
            Field::Facebook => max_len(text, MAX_SOCIAL_LEN, "Facebook URL is too long"),
            Field::Twitter => max_len(text, MAX_SOCIAL_LEN, "Twitter URL is too long"),
        }
    }

    fn established_year_rule(&self, text: &str) -> Option<String> {
        let year = text.trim();
        if year.is_empty() {
            return None;
        }
        let parsed = match year.parse::<i32>() {
            Ok(parsed) if year.len() == 4 => parsed,
            _ => return fail("Please enter a valid year"),
        };
        if parsed < MIN_ESTABLISHED_YEAR {
            fail("Please enter a year after 1900")
        } else if parsed > self.current_year {
            fail("Year cannot be in the future")
        } else {
            None
        }
    }
}

/// Value a selection falls back to when its last item is removed, for
/// selections that must never be empty.
pub fn selection_fallback(field: Field) -> Option<&'static str> {
    match field {
        Field::BusinessType => Some(DEFAULT_BUSINESS_TYPE),
        _ => None,
    }
}

/// Adds `item` to the selection, or removes it if already selected.
pub fn toggle_selection(field: Field, current: &[String], item: &str) -> Vec<String> {
    let mut next: Vec<String> = if current.iter().any(|selected| selected == item) {
        current
            .iter()
            .filter(|selected| selected.as_str() != item)
            .cloned()
            .collect()
    } else {
        let mut extended = current.to_vec();
        extended.push(item.to_string());
        extended
    };

    if next.is_empty() {
        if let Some(fallback) = selection_fallback(field) {
            next.push(fallback.to_string());
        }
    }
    next
}

fn fail(message: &str) -> Option<String> {
    Some(message.to_string())
}

fn digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

fn required(text: &str, message: &str) -> Option<String> {
    if text.trim().is_empty() {
        fail(message)
    } else {
        None
    }
}

fn name_rule(text: &str, label: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Some(format!("{} is required", label))
    } else if trimmed.chars().count() < MIN_NAME_LEN {
        Some(format!("{} must be at least 2 characters", label))
    } else {
        None
    }
}

fn time_rule(text: &str, label: &str) -> Option<String> {
    if text.trim().is_empty() {
        Some(format!("{} is required", label))
    } else if !TIME_REGEX.is_match(text.trim()) {
        Some(format!("{} must be in HH:MM format", label))
    } else {
        None
    }
}

fn non_empty(items: &[String], message: &str) -> Option<String> {
    if items.is_empty() {
        fail(message)
    } else {
        None
    }
}

fn pattern_rule(text: &str, pattern: &Regex, missing: &str, invalid: &str) -> Option<String> {
    if text.trim().is_empty() {
        fail(missing)
    } else if !pattern.is_match(&text.trim().to_uppercase()) {
        fail(invalid)
    } else {
        None
    }
}

fn range_rule(number: Option<f64>, min: f64, max: f64, below: &str, above: &str) -> Option<String> {
    match number {
        Some(value) if !value.is_finite() => fail("Please enter a valid number"),
        Some(value) if value < min => fail(below),
        Some(value) if value > max => fail(above),
        Some(_) => None,
        None => fail("Please enter a valid number"),
    }
}

fn max_len(text: &str, max: usize, message: &str) -> Option<String> {
    if text.trim().chars().count() > max {
        fail(message)
    } else {
        None
    }
}
