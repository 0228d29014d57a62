//! Submission state and the registration payload.

use serde::{Deserialize, Serialize};

use crate::wizard::draft::{BankDetails, BusinessHours, OnboardingDraft, SocialMedia};

pub const PARTNER_ROLE: &str = "partner";

/// Message shown when registration fails for a reason the user cannot fix
/// by editing a field.
pub const GENERIC_RETRY_MESSAGE: &str = "Registration failed. Please try again.";

pub const TERMS_REQUIRED_MESSAGE: &str =
    "Please agree to the terms and conditions before submitting";

/// In-flight guard for the registration call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionState {
    is_submitting: bool,
    last_error: Option<String>,
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Marks a call in flight. Returns `false` if one already is.
    pub fn begin(&mut self) -> bool {
        if self.is_submitting {
            return false;
        }
        self.is_submitting = true;
        self.last_error = None;
        true
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_submitting = false;
        self.last_error = Some(message.into());
    }

    /// Records an error without touching the in-flight flag.
    pub fn reject_locally(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }
}

/// One backend-reported field failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub field: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl FieldErrors {
    pub fn new(field: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            field: field.into(),
            errors,
        }
    }

    /// The message surfaced to the user for this field.
    pub fn first_message(&self) -> String {
        self.errors
            .iter()
            .find(|message| !message.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("{} is invalid", self.field))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The backend rejected specific fields.
    #[error("registration rejected for {} field(s)", .0.len())]
    Rejected(Vec<FieldErrors>),
    /// The backend answered with a plain message.
    #[error("registration failed: {message}")]
    Server {
        status: Option<u16>,
        message: String,
    },
    #[error("registration transport failed: {0}")]
    Transport(String),
    #[error("registration response could not be read: {0}")]
    InvalidResponse(String),
}

impl RegistrationError {
    /// Message surfaced for failures that are not field-scoped.
    pub fn user_message(&self) -> String {
        match self {
            RegistrationError::Server { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => GENERIC_RETRY_MESSAGE.to_string(),
        }
    }

    /// Transport failures are the only ones worth retrying automatically.
    pub fn is_transient(&self) -> bool {
        matches!(self, RegistrationError::Transport(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Successful registration response. Registration signs the partner in.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: RegisteredUser,
    #[serde(default)]
    pub partner: Option<serde_json::Value>,
}

impl std::fmt::Debug for RegistrationReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationReceipt")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("partner", &self.partner.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBundle {
    pub license_documents: Vec<String>,
    pub certification_documents: Vec<String>,
    pub identity_documents: Vec<String>,
    pub other_documents: Vec<String>,
}

impl DocumentBundle {
    fn is_empty(&self) -> bool {
        self.license_documents.is_empty()
            && self.certification_documents.is_empty()
            && self.identity_documents.is_empty()
            && self.other_documents.is_empty()
    }
}

/// Flattened body of the partner registration request.
///
/// Steps absent from the draft leave their fields out entirely; the backend
/// decides what is finally required.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub established_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<BusinessHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_radius: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_delivery: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_pickup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepts_cash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepts_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_order_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fssai_license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentBundle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,

    pub agree_to_terms: bool,
    pub agree_to_marketing: bool,
    pub role: String,
}

impl std::fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationPayload")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("business_name", &self.business_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("agree_to_terms", &self.agree_to_terms)
            .finish_non_exhaustive()
    }
}

impl RegistrationPayload {
    /// Flattens every stored step into the registration request body.
    pub fn assemble(draft: &OnboardingDraft) -> Self {
        let mut payload = RegistrationPayload {
            role: PARTNER_ROLE.to_string(),
            ..Default::default()
        };

        if let Some(personal) = &draft.personal_info {
            payload.first_name = Some(personal.first_name.trim().to_string());
            payload.last_name = Some(personal.last_name.trim().to_string());
            payload.email = non_empty(&personal.email);
            payload.phone_number = Some(normalize_phone(&personal.phone_number));
        }

        if let Some(account) = &draft.account_setup {
            payload.password = non_empty(&account.password);
            payload.agree_to_terms = account.agree_to_terms;
            payload.agree_to_marketing = account.agree_to_marketing;
        }

        if let Some(profile) = &draft.business_profile {
            payload.business_name = Some(profile.business_name.trim().to_string());
            payload.business_type = Some(profile.business_type.clone());
            payload.description = non_empty(&profile.description);
            payload.established_date = non_empty(&profile.established_year)
                .map(|year| format!("{}-01-01", year));
        }

        if let Some(location) = &draft.location_hours {
            let address = &location.address;
            let joined = [
                &address.street,
                &address.city,
                &address.state,
                &address.postal_code,
                &address.country,
            ]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
            payload.address = Some(joined);
            payload.city = non_empty(&address.city);
            payload.state = non_empty(&address.state);
            payload.pincode = non_empty(&address.postal_code);
            payload.country = non_empty(&address.country);
            payload.business_hours = Some(location.business_hours.clone());
            payload.delivery_radius = Some(location.delivery_radius);
        }

        if let Some(cuisine) = &draft.cuisine_services {
            payload.cuisine_types = Some(cuisine.cuisine_types.clone());
            payload.is_vegetarian = Some(cuisine.is_vegetarian);
            payload.has_delivery = Some(cuisine.has_delivery);
            payload.has_pickup = Some(cuisine.has_pickup);
            payload.accepts_cash = Some(cuisine.accepts_cash);
            payload.accepts_card = Some(cuisine.accepts_card);
            payload.minimum_order_amount = Some(cuisine.minimum_order_amount);
            payload.delivery_fee = Some(cuisine.delivery_fee);
            payload.estimated_delivery_time = Some(cuisine.estimated_delivery_time);
        }

        if let Some(documents) = &draft.documents {
            payload.fssai_license = non_empty(&documents.fssai_license);
            payload.gst_number = non_empty(&documents.gst_number).map(|v| v.to_uppercase());
            payload.pan_number = non_empty(&documents.pan_number).map(|v| v.to_uppercase());
            payload.license_number = non_empty(&documents.license_number);

            let urls = &documents.documents;
            let bundle = DocumentBundle {
                license_documents: collect_urls([&urls.fssai_document, &urls.gst_document]),
                certification_documents: Vec::new(),
                identity_documents: collect_urls([&urls.pan_document]),
                other_documents: collect_urls([&urls.bank_document]),
            };
            payload.documents = (!bundle.is_empty()).then_some(bundle);
        }

        if let Some(payment) = &draft.payment_setup {
            let bank = &payment.bank_details;
            payload.bank_details = Some(BankDetails {
                account_number: bank.account_number.trim().to_string(),
                ifsc_code: bank.ifsc_code.trim().to_uppercase(),
                account_holder_name: bank.account_holder_name.trim().to_string(),
                bank_name: bank.bank_name.trim().to_string(),
            });
            payload.upi_id = non_empty(&payment.upi_id);
            payload.commission_rate = Some(payment.commission_rate);
        }

        if let Some(branding) = &draft.images_branding {
            payload.logo_url = non_empty(&branding.logo_url);
            payload.banner_url = non_empty(&branding.banner_url);
            let images = collect_urls([&branding.logo_url, &branding.banner_url]);
            payload.images = (!images.is_empty()).then_some(images);
            let social = SocialMedia {
                instagram: branding.social_media.instagram.trim().to_string(),
                facebook: branding.social_media.facebook.trim().to_string(),
                twitter: branding.social_media.twitter.trim().to_string(),
            };
            let has_social =
                !(social.instagram.is_empty() && social.facebook.is_empty() && social.twitter.is_empty());
            payload.social_media = has_social.then_some(social);
        }

        payload
    }
}

/// Strips a `+91` prefix and any non-digits, keeping the last ten digits.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = trimmed.strip_prefix("+91").unwrap_or(trimmed);
    let digits: Vec<char> = without_prefix.chars().filter(char::is_ascii_digit).collect();
    let start = digits.len().saturating_sub(10);
    digits[start..].iter().collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn collect_urls<const N: usize>(urls: [&String; N]) -> Vec<String> {
    urls.iter().filter_map(|url| non_empty(url)).collect()
}
