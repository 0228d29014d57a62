//! Step records and the accumulated onboarding draft.
//!
//! The draft is data at rest: nothing here validates semantics. Records are
//! shaped exactly as they are persisted under `formData`.

use serde::{Deserialize, Serialize};

use crate::wizard::field::{Field, FieldKind, FieldValue};
use crate::wizard::step::Step;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("field {field} expects a {expected:?} value, got {actual:?}")]
    ValueKindMismatch {
        field: Field,
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("field {0} is validated from its siblings and holds no value")]
    GroupField(Field),
}

pub const DEFAULT_BUSINESS_TYPE: &str = "restaurant";

pub const ALL_WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSetup {
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
    pub agree_to_marketing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessProfile {
    pub business_name: String,
    pub business_type: Vec<String>,
    pub description: String,
    pub established_year: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            business_type: vec![DEFAULT_BUSINESS_TYPE.to_string()],
            description: String::new(),
            established_year: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: "India".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    pub open: String,
    pub close: String,
    pub days: Vec<String>,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open: "09:00".to_string(),
            close: "22:00".to_string(),
            days: ALL_WEEKDAYS.iter().map(|day| day.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationHours {
    pub address: Address,
    pub business_hours: BusinessHours,
    pub delivery_radius: f64,
}

impl Default for LocationHours {
    fn default() -> Self {
        Self {
            address: Address::default(),
            business_hours: BusinessHours::default(),
            delivery_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CuisineServices {
    pub cuisine_types: Vec<String>,
    pub is_vegetarian: bool,
    pub has_delivery: bool,
    pub has_pickup: bool,
    pub accepts_cash: bool,
    pub accepts_card: bool,
    pub minimum_order_amount: f64,
    pub delivery_fee: f64,
    pub estimated_delivery_time: f64,
}

impl Default for CuisineServices {
    fn default() -> Self {
        Self {
            cuisine_types: Vec::new(),
            is_vegetarian: false,
            has_delivery: true,
            has_pickup: true,
            accepts_cash: true,
            accepts_card: true,
            minimum_order_amount: 100.0,
            delivery_fee: 0.0,
            estimated_delivery_time: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentUrls {
    pub fssai_document: String,
    pub gst_document: String,
    pub pan_document: String,
    pub bank_document: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Documents {
    pub fssai_license: String,
    pub gst_number: String,
    pub pan_number: String,
    pub license_number: String,
    pub documents: DocumentUrls,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub bank_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentSetup {
    pub bank_details: BankDetails,
    pub upi_id: String,
    pub commission_rate: f64,
}

impl Default for PaymentSetup {
    fn default() -> Self {
        Self {
            bank_details: BankDetails::default(),
            upi_id: String::new(),
            commission_rate: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialMedia {
    pub instagram: String,
    pub facebook: String,
    pub twitter: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagesBranding {
    pub logo_url: String,
    pub banner_url: String,
    pub social_media: SocialMedia,
}

/// A full record for one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepRecord {
    PersonalInfo(PersonalInfo),
    AccountSetup(AccountSetup),
    BusinessProfile(BusinessProfile),
    LocationHours(LocationHours),
    CuisineServices(CuisineServices),
    Documents(Documents),
    PaymentSetup(PaymentSetup),
    ImagesBranding(ImagesBranding),
}

impl StepRecord {
    /// The record a screen starts from when the draft has nothing yet.
    pub fn default_for(step: Step) -> Self {
        match step {
            Step::PersonalInfo => StepRecord::PersonalInfo(PersonalInfo::default()),
            Step::AccountSetup => StepRecord::AccountSetup(AccountSetup::default()),
            Step::BusinessProfile => StepRecord::BusinessProfile(BusinessProfile::default()),
            Step::LocationHours => StepRecord::LocationHours(LocationHours::default()),
            Step::CuisineServices => StepRecord::CuisineServices(CuisineServices::default()),
            Step::Documents => StepRecord::Documents(Documents::default()),
            Step::PaymentSetup => StepRecord::PaymentSetup(PaymentSetup::default()),
            Step::ImagesBranding => StepRecord::ImagesBranding(ImagesBranding::default()),
        }
    }

    pub fn step(&self) -> Step {
        match self {
            StepRecord::PersonalInfo(_) => Step::PersonalInfo,
            StepRecord::AccountSetup(_) => Step::AccountSetup,
            StepRecord::BusinessProfile(_) => Step::BusinessProfile,
            StepRecord::LocationHours(_) => Step::LocationHours,
            StepRecord::CuisineServices(_) => Step::CuisineServices,
            StepRecord::Documents(_) => Step::Documents,
            StepRecord::PaymentSetup(_) => Step::PaymentSetup,
            StepRecord::ImagesBranding(_) => Step::ImagesBranding,
        }
    }

    /// Reads one field. Returns `None` for group keys and for fields of
    /// another step.
    pub fn value(&self, field: Field) -> Option<FieldValue> {
        let text = |value: &String| Some(FieldValue::Text(value.clone()));
        let list = |items: &Vec<String>| Some(FieldValue::List(items.clone()));
        match (self, field) {
            (StepRecord::PersonalInfo(r), Field::FirstName) => text(&r.first_name),
            (StepRecord::PersonalInfo(r), Field::LastName) => text(&r.last_name),
            (StepRecord::PersonalInfo(r), Field::Email) => text(&r.email),
            (StepRecord::PersonalInfo(r), Field::PhoneNumber) => text(&r.phone_number),

            (StepRecord::AccountSetup(r), Field::Password) => text(&r.password),
            (StepRecord::AccountSetup(r), Field::ConfirmPassword) => text(&r.confirm_password),
            (StepRecord::AccountSetup(r), Field::AgreeToTerms) => {
                Some(FieldValue::Flag(r.agree_to_terms))
            }
            (StepRecord::AccountSetup(r), Field::AgreeToMarketing) => {
                Some(FieldValue::Flag(r.agree_to_marketing))
            }

            (StepRecord::BusinessProfile(r), Field::BusinessName) => text(&r.business_name),
            (StepRecord::BusinessProfile(r), Field::BusinessType) => list(&r.business_type),
            (StepRecord::BusinessProfile(r), Field::Description) => text(&r.description),
            (StepRecord::BusinessProfile(r), Field::EstablishedYear) => {
                text(&r.established_year)
            }

            (StepRecord::LocationHours(r), Field::Street) => text(&r.address.street),
            (StepRecord::LocationHours(r), Field::City) => text(&r.address.city),
            (StepRecord::LocationHours(r), Field::State) => text(&r.address.state),
            (StepRecord::LocationHours(r), Field::PostalCode) => text(&r.address.postal_code),
            (StepRecord::LocationHours(r), Field::Country) => text(&r.address.country),
            (StepRecord::LocationHours(r), Field::OpenTime) => text(&r.business_hours.open),
            (StepRecord::LocationHours(r), Field::CloseTime) => text(&r.business_hours.close),
            (StepRecord::LocationHours(r), Field::OperatingDays) => list(&r.business_hours.days),
            (StepRecord::LocationHours(r), Field::DeliveryRadius) => {
                Some(FieldValue::Number(r.delivery_radius))
            }

            (StepRecord::CuisineServices(r), Field::CuisineTypes) => list(&r.cuisine_types),
            (StepRecord::CuisineServices(r), Field::IsVegetarian) => {
                Some(FieldValue::Flag(r.is_vegetarian))
            }
            (StepRecord::CuisineServices(r), Field::HasDelivery) => {
                Some(FieldValue::Flag(r.has_delivery))
            }
            (StepRecord::CuisineServices(r), Field::HasPickup) => {
                Some(FieldValue::Flag(r.has_pickup))
            }
            (StepRecord::CuisineServices(r), Field::AcceptsCash) => {
                Some(FieldValue::Flag(r.accepts_cash))
            }
            (StepRecord::CuisineServices(r), Field::AcceptsCard) => {
                Some(FieldValue::Flag(r.accepts_card))
            }
            (StepRecord::CuisineServices(r), Field::MinimumOrderAmount) => {
                Some(FieldValue::Number(r.minimum_order_amount))
            }
            (StepRecord::CuisineServices(r), Field::DeliveryFee) => {
                Some(FieldValue::Number(r.delivery_fee))
            }
            (StepRecord::CuisineServices(r), Field::EstimatedDeliveryTime) => {
                Some(FieldValue::Number(r.estimated_delivery_time))
            }

            (StepRecord::Documents(r), Field::FssaiLicense) => text(&r.fssai_license),
            (StepRecord::Documents(r), Field::GstNumber) => text(&r.gst_number),
            (StepRecord::Documents(r), Field::PanNumber) => text(&r.pan_number),
            (StepRecord::Documents(r), Field::LicenseNumber) => text(&r.license_number),
            (StepRecord::Documents(r), Field::FssaiDocument) => text(&r.documents.fssai_document),
            (StepRecord::Documents(r), Field::GstDocument) => text(&r.documents.gst_document),
            (StepRecord::Documents(r), Field::PanDocument) => text(&r.documents.pan_document),
            (StepRecord::Documents(r), Field::BankDocument) => text(&r.documents.bank_document),

            (StepRecord::PaymentSetup(r), Field::AccountNumber) => {
                text(&r.bank_details.account_number)
            }
            (StepRecord::PaymentSetup(r), Field::IfscCode) => text(&r.bank_details.ifsc_code),
            (StepRecord::PaymentSetup(r), Field::AccountHolderName) => {
                text(&r.bank_details.account_holder_name)
            }
            (StepRecord::PaymentSetup(r), Field::BankName) => text(&r.bank_details.bank_name),
            (StepRecord::PaymentSetup(r), Field::UpiId) => text(&r.upi_id),
            (StepRecord::PaymentSetup(r), Field::CommissionRate) => {
                Some(FieldValue::Number(r.commission_rate))
            }

            (StepRecord::ImagesBranding(r), Field::LogoUrl) => text(&r.logo_url),
            (StepRecord::ImagesBranding(r), Field::BannerUrl) => text(&r.banner_url),
            (StepRecord::ImagesBranding(r), Field::Instagram) => text(&r.social_media.instagram),
            (StepRecord::ImagesBranding(r), Field::Facebook) => text(&r.social_media.facebook),
            (StepRecord::ImagesBranding(r), Field::Twitter) => text(&r.social_media.twitter),

            _ => None,
        }
    }

    /// Writes one field. The caller guarantees `field.step() == self.step()`.
    fn set(&mut self, field: Field, value: FieldValue) -> Result<(), DraftError> {
        match self {
            StepRecord::PersonalInfo(r) => match field {
                Field::FirstName => r.first_name = expect_text(field, value)?,
                Field::LastName => r.last_name = expect_text(field, value)?,
                Field::Email => r.email = expect_text(field, value)?,
                Field::PhoneNumber => r.phone_number = expect_text(field, value)?,
                _ => {}
            },
            StepRecord::AccountSetup(r) => match field {
                Field::Password => r.password = expect_text(field, value)?,
                Field::ConfirmPassword => r.confirm_password = expect_text(field, value)?,
                Field::AgreeToTerms => r.agree_to_terms = expect_flag(field, value)?,
                Field::AgreeToMarketing => r.agree_to_marketing = expect_flag(field, value)?,
                _ => {}
            },
            StepRecord::BusinessProfile(r) => match field {
                Field::BusinessName => r.business_name = expect_text(field, value)?,
                Field::BusinessType => r.business_type = expect_list(field, value)?,
                Field::Description => r.description = expect_text(field, value)?,
                Field::EstablishedYear => r.established_year = expect_text(field, value)?,
                _ => {}
            },
            StepRecord::LocationHours(r) => match field {
                Field::Street => r.address.street = expect_text(field, value)?,
                Field::City => r.address.city = expect_text(field, value)?,
                Field::State => r.address.state = expect_text(field, value)?,
                Field::PostalCode => r.address.postal_code = expect_text(field, value)?,
                Field::Country => r.address.country = expect_text(field, value)?,
                Field::OpenTime => r.business_hours.open = expect_text(field, value)?,
                Field::CloseTime => r.business_hours.close = expect_text(field, value)?,
                Field::OperatingDays => r.business_hours.days = expect_list(field, value)?,
                Field::DeliveryRadius => r.delivery_radius = expect_number(field, value)?,
                _ => {}
            },
            StepRecord::CuisineServices(r) => match field {
                Field::CuisineTypes => r.cuisine_types = expect_list(field, value)?,
                Field::IsVegetarian => r.is_vegetarian = expect_flag(field, value)?,
                Field::HasDelivery => r.has_delivery = expect_flag(field, value)?,
                Field::HasPickup => r.has_pickup = expect_flag(field, value)?,
                Field::AcceptsCash => r.accepts_cash = expect_flag(field, value)?,
                Field::AcceptsCard => r.accepts_card = expect_flag(field, value)?,
                Field::MinimumOrderAmount => {
                    r.minimum_order_amount = expect_number(field, value)?
                }
                Field::DeliveryFee => r.delivery_fee = expect_number(field, value)?,
                Field::EstimatedDeliveryTime => {
                    r.estimated_delivery_time = expect_number(field, value)?
                }
                _ => {}
            },
            StepRecord::Documents(r) => match field {
                Field::FssaiLicense => r.fssai_license = expect_text(field, value)?,
                Field::GstNumber => r.gst_number = expect_text(field, value)?,
                Field::PanNumber => r.pan_number = expect_text(field, value)?,
                Field::LicenseNumber => r.license_number = expect_text(field, value)?,
                Field::FssaiDocument => r.documents.fssai_document = expect_text(field, value)?,
                Field::GstDocument => r.documents.gst_document = expect_text(field, value)?,
                Field::PanDocument => r.documents.pan_document = expect_text(field, value)?,
                Field::BankDocument => r.documents.bank_document = expect_text(field, value)?,
                _ => {}
            },
            StepRecord::PaymentSetup(r) => match field {
                Field::AccountNumber => {
                    r.bank_details.account_number = expect_text(field, value)?
                }
                Field::IfscCode => r.bank_details.ifsc_code = expect_text(field, value)?,
                Field::AccountHolderName => {
                    r.bank_details.account_holder_name = expect_text(field, value)?
                }
                Field::BankName => r.bank_details.bank_name = expect_text(field, value)?,
                Field::UpiId => r.upi_id = expect_text(field, value)?,
                Field::CommissionRate => r.commission_rate = expect_number(field, value)?,
                _ => {}
            },
            StepRecord::ImagesBranding(r) => match field {
                Field::LogoUrl => r.logo_url = expect_text(field, value)?,
                Field::BannerUrl => r.banner_url = expect_text(field, value)?,
                Field::Instagram => r.social_media.instagram = expect_text(field, value)?,
                Field::Facebook => r.social_media.facebook = expect_text(field, value)?,
                Field::Twitter => r.social_media.twitter = expect_text(field, value)?,
                _ => {}
            },
        }
        Ok(())
    }
}

fn mismatch(field: Field, value: &FieldValue) -> DraftError {
    DraftError::ValueKindMismatch {
        field,
        expected: field.kind(),
        actual: value.kind(),
    }
}

fn expect_text(field: Field, value: FieldValue) -> Result<String, DraftError> {
    match value {
        FieldValue::Text(text) => Ok(text),
        other => Err(mismatch(field, &other)),
    }
}

fn expect_flag(field: Field, value: FieldValue) -> Result<bool, DraftError> {
    match value {
        FieldValue::Flag(flag) => Ok(flag),
        other => Err(mismatch(field, &other)),
    }
}

fn expect_number(field: Field, value: FieldValue) -> Result<f64, DraftError> {
    match value {
        FieldValue::Number(number) => Ok(number),
        other => Err(mismatch(field, &other)),
    }
}

fn expect_list(field: Field, value: FieldValue) -> Result<Vec<String>, DraftError> {
    match value {
        FieldValue::List(items) => Ok(items),
        other => Err(mismatch(field, &other)),
    }
}

/// Accumulated, not-yet-submitted data across all steps.
///
/// Serializes as the `formData` object: `{ "step1": {...}, ... }`, with
/// absent steps omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingDraft {
    #[serde(rename = "step1", skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(rename = "step2", skip_serializing_if = "Option::is_none")]
    pub account_setup: Option<AccountSetup>,
    #[serde(rename = "step3", skip_serializing_if = "Option::is_none")]
    pub business_profile: Option<BusinessProfile>,
    #[serde(rename = "step4", skip_serializing_if = "Option::is_none")]
    pub location_hours: Option<LocationHours>,
    #[serde(rename = "step5", skip_serializing_if = "Option::is_none")]
    pub cuisine_services: Option<CuisineServices>,
    #[serde(rename = "step6", skip_serializing_if = "Option::is_none")]
    pub documents: Option<Documents>,
    #[serde(rename = "step7", skip_serializing_if = "Option::is_none")]
    pub payment_setup: Option<PaymentSetup>,
    #[serde(rename = "step8", skip_serializing_if = "Option::is_none")]
    pub images_branding: Option<ImagesBranding>,
}

impl OnboardingDraft {
    /// Replaces the stored record for the record's step.
    pub fn update(&mut self, record: StepRecord) {
        match record {
            StepRecord::PersonalInfo(r) => self.personal_info = Some(r),
            StepRecord::AccountSetup(r) => self.account_setup = Some(r),
            StepRecord::BusinessProfile(r) => self.business_profile = Some(r),
            StepRecord::LocationHours(r) => self.location_hours = Some(r),
            StepRecord::CuisineServices(r) => self.cuisine_services = Some(r),
            StepRecord::Documents(r) => self.documents = Some(r),
            StepRecord::PaymentSetup(r) => self.payment_setup = Some(r),
            StepRecord::ImagesBranding(r) => self.images_branding = Some(r),
        }
    }

    pub fn read(&self, step: Step) -> Option<StepRecord> {
        match step {
            Step::PersonalInfo => self.personal_info.clone().map(StepRecord::PersonalInfo),
            Step::AccountSetup => self.account_setup.clone().map(StepRecord::AccountSetup),
            Step::BusinessProfile => self.business_profile.clone().map(StepRecord::BusinessProfile),
            Step::LocationHours => self.location_hours.clone().map(StepRecord::LocationHours),
            Step::CuisineServices => self.cuisine_services.clone().map(StepRecord::CuisineServices),
            Step::Documents => self.documents.clone().map(StepRecord::Documents),
            Step::PaymentSetup => self.payment_setup.clone().map(StepRecord::PaymentSetup),
            Step::ImagesBranding => self.images_branding.clone().map(StepRecord::ImagesBranding),
        }
    }

    /// The stored record, or the step's default record when nothing is stored.
    pub fn record_or_default(&self, step: Step) -> StepRecord {
        self.read(step)
            .unwrap_or_else(|| StepRecord::default_for(step))
    }

    /// Merges one field value over the step's previous record.
    ///
    /// The draft is left untouched when the value has the wrong kind.
    pub fn apply(&mut self, field: Field, value: FieldValue) -> Result<(), DraftError> {
        if field.kind() == FieldKind::Group {
            return Err(DraftError::GroupField(field));
        }
        if value.kind() != field.kind() {
            return Err(mismatch(field, &value));
        }
        let mut record = self.record_or_default(field.step());
        record.set(field, value)?;
        self.update(record);
        Ok(())
    }

    /// Current value of a field, falling back to the step's default record.
    pub fn value(&self, field: Field) -> Option<FieldValue> {
        self.record_or_default(field.step()).value(field)
    }

    /// Whether the field holds a value the screens would treat as entered.
    pub fn is_filled(&self, field: Field) -> bool {
        self.read(field.step())
            .and_then(|record| record.value(field))
            .map(|value| value.is_filled())
            .unwrap_or(false)
    }

    pub fn steps_present(&self) -> Vec<Step> {
        Step::ALL
            .iter()
            .copied()
            .filter(|step| self.read(*step).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.steps_present().is_empty()
    }
}
