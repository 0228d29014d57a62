//! Field identifiers and the backend field → step lookup.

use serde::{Deserialize, Serialize};

use crate::wizard::step::Step;

/// Every field the wizard collects.
///
/// `ServiceOptions` and `PaymentMethods` are group keys: they carry no value of
/// their own and are validated from their sibling flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Field {
    // Step 1
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    // Step 2
    Password,
    ConfirmPassword,
    AgreeToTerms,
    AgreeToMarketing,
    // Step 3
    BusinessName,
    BusinessType,
    Description,
    EstablishedYear,
    // Step 4
    Street,
    City,
    State,
    PostalCode,
    Country,
    OpenTime,
    CloseTime,
    OperatingDays,
    DeliveryRadius,
    // Step 5
    CuisineTypes,
    IsVegetarian,
    HasDelivery,
    HasPickup,
    AcceptsCash,
    AcceptsCard,
    ServiceOptions,
    PaymentMethods,
    MinimumOrderAmount,
    DeliveryFee,
    EstimatedDeliveryTime,
    // Step 6
    FssaiLicense,
    GstNumber,
    PanNumber,
    LicenseNumber,
    FssaiDocument,
    GstDocument,
    PanDocument,
    BankDocument,
    // Step 7
    AccountNumber,
    IfscCode,
    AccountHolderName,
    BankName,
    UpiId,
    CommissionRate,
    // Step 8
    LogoUrl,
    BannerUrl,
    Instagram,
    Facebook,
    Twitter,
}

/// Shape of the value a field holds in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Flag,
    List,
    Group,
}

/// A single field value as produced by a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Flag(_) => FieldKind::Flag,
            FieldValue::List(_) => FieldKind::List,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Presence as the screens judge it: trimmed text, a checked flag, a
    /// non-empty selection. Numbers are always present.
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(value) => !value.trim().is_empty(),
            FieldValue::Number(_) => true,
            FieldValue::Flag(value) => *value,
            FieldValue::List(items) => !items.is_empty(),
        }
    }
}

impl Field {
    pub const ALL: [Field; 51] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::PhoneNumber,
        Field::Password,
        Field::ConfirmPassword,
        Field::AgreeToTerms,
        Field::AgreeToMarketing,
        Field::BusinessName,
        Field::BusinessType,
        Field::Description,
        Field::EstablishedYear,
        Field::Street,
        Field::City,
        Field::State,
        Field::PostalCode,
        Field::Country,
        Field::OpenTime,
        Field::CloseTime,
        Field::OperatingDays,
        Field::DeliveryRadius,
        Field::CuisineTypes,
        Field::IsVegetarian,
        Field::HasDelivery,
        Field::HasPickup,
        Field::AcceptsCash,
        Field::AcceptsCard,
        Field::ServiceOptions,
        Field::PaymentMethods,
        Field::MinimumOrderAmount,
        Field::DeliveryFee,
        Field::EstimatedDeliveryTime,
        Field::FssaiLicense,
        Field::GstNumber,
        Field::PanNumber,
        Field::LicenseNumber,
        Field::FssaiDocument,
        Field::GstDocument,
        Field::PanDocument,
        Field::BankDocument,
        Field::AccountNumber,
        Field::IfscCode,
        Field::AccountHolderName,
        Field::BankName,
        Field::UpiId,
        Field::CommissionRate,
        Field::LogoUrl,
        Field::BannerUrl,
        Field::Instagram,
        Field::Facebook,
        Field::Twitter,
    ];

    /// The step that collects this field.
    pub fn step(self) -> Step {
        match self {
            Field::FirstName | Field::LastName | Field::Email | Field::PhoneNumber => {
                Step::PersonalInfo
            }
            Field::Password
            | Field::ConfirmPassword
            | Field::AgreeToTerms
            | Field::AgreeToMarketing => Step::AccountSetup,
            Field::BusinessName
            | Field::BusinessType
            | Field::Description
            | Field::EstablishedYear => Step::BusinessProfile,
            Field::Street
            | Field::City
            | Field::State
            | Field::PostalCode
            | Field::Country
            | Field::OpenTime
            | Field::CloseTime
            | Field::OperatingDays
            | Field::DeliveryRadius => Step::LocationHours,
            Field::CuisineTypes
            | Field::IsVegetarian
            | Field::HasDelivery
            | Field::HasPickup
            | Field::AcceptsCash
            | Field::AcceptsCard
            | Field::ServiceOptions
            | Field::PaymentMethods
            | Field::MinimumOrderAmount
            | Field::DeliveryFee
            | Field::EstimatedDeliveryTime => Step::CuisineServices,
            Field::FssaiLicense
            | Field::GstNumber
            | Field::PanNumber
            | Field::LicenseNumber
            | Field::FssaiDocument
            | Field::GstDocument
            | Field::PanDocument
            | Field::BankDocument => Step::Documents,
            Field::AccountNumber
            | Field::IfscCode
            | Field::AccountHolderName
            | Field::BankName
            | Field::UpiId
            | Field::CommissionRate => Step::PaymentSetup,
            Field::LogoUrl
            | Field::BannerUrl
            | Field::Instagram
            | Field::Facebook
            | Field::Twitter => Step::ImagesBranding,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::AgreeToTerms
            | Field::AgreeToMarketing
            | Field::IsVegetarian
            | Field::HasDelivery
            | Field::HasPickup
            | Field::AcceptsCash
            | Field::AcceptsCard => FieldKind::Flag,
            Field::BusinessType | Field::OperatingDays | Field::CuisineTypes => FieldKind::List,
            Field::DeliveryRadius
            | Field::MinimumOrderAmount
            | Field::DeliveryFee
            | Field::EstimatedDeliveryTime
            | Field::CommissionRate => FieldKind::Number,
            Field::ServiceOptions | Field::PaymentMethods => FieldKind::Group,
            _ => FieldKind::Text,
        }
    }

    /// Required fields must be non-empty for their step to be valid.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Field::FirstName
                | Field::LastName
                | Field::Email
                | Field::PhoneNumber
                | Field::Password
                | Field::ConfirmPassword
                | Field::AgreeToTerms
                | Field::BusinessName
                | Field::BusinessType
                | Field::Description
                | Field::Street
                | Field::City
                | Field::State
                | Field::PostalCode
                | Field::Country
                | Field::OpenTime
                | Field::CloseTime
                | Field::OperatingDays
                | Field::CuisineTypes
                | Field::FssaiLicense
                | Field::GstNumber
                | Field::PanNumber
                | Field::LicenseNumber
                | Field::AccountNumber
                | Field::IfscCode
                | Field::AccountHolderName
                | Field::BankName
        )
    }

    /// Fields whose stored value is a URL returned by the upload collaborator.
    pub fn is_upload(self) -> bool {
        matches!(
            self,
            Field::FssaiDocument
                | Field::GstDocument
                | Field::PanDocument
                | Field::BankDocument
                | Field::LogoUrl
                | Field::BannerUrl
        )
    }

    /// Fields whose validity depends on this one and must be re-checked
    /// whenever it changes.
    pub fn dependents(self) -> &'static [Field] {
        match self {
            Field::Password => &[Field::ConfirmPassword],
            Field::HasDelivery | Field::HasPickup => &[Field::ServiceOptions],
            Field::AcceptsCash | Field::AcceptsCard => &[Field::PaymentMethods],
            _ => &[],
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::PhoneNumber => "phoneNumber",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::AgreeToTerms => "agreeToTerms",
            Field::AgreeToMarketing => "agreeToMarketing",
            Field::BusinessName => "businessName",
            Field::BusinessType => "businessType",
            Field::Description => "description",
            Field::EstablishedYear => "establishedYear",
            Field::Street => "street",
            Field::City => "city",
            Field::State => "state",
            Field::PostalCode => "postalCode",
            Field::Country => "country",
            Field::OpenTime => "open",
            Field::CloseTime => "close",
            Field::OperatingDays => "days",
            Field::DeliveryRadius => "deliveryRadius",
            Field::CuisineTypes => "cuisineTypes",
            Field::IsVegetarian => "isVegetarian",
            Field::HasDelivery => "hasDelivery",
            Field::HasPickup => "hasPickup",
            Field::AcceptsCash => "acceptsCash",
            Field::AcceptsCard => "acceptsCard",
            Field::ServiceOptions => "services",
            Field::PaymentMethods => "paymentMethods",
            Field::MinimumOrderAmount => "minimumOrderAmount",
            Field::DeliveryFee => "deliveryFee",
            Field::EstimatedDeliveryTime => "estimatedDeliveryTime",
            Field::FssaiLicense => "fssaiLicense",
            Field::GstNumber => "gstNumber",
            Field::PanNumber => "panNumber",
            Field::LicenseNumber => "licenseNumber",
            Field::FssaiDocument => "fssaiDocument",
            Field::GstDocument => "gstDocument",
            Field::PanDocument => "panDocument",
            Field::BankDocument => "bankDocument",
            Field::AccountNumber => "accountNumber",
            Field::IfscCode => "ifscCode",
            Field::AccountHolderName => "accountHolderName",
            Field::BankName => "bankName",
            Field::UpiId => "upiId",
            Field::CommissionRate => "commissionRate",
            Field::LogoUrl => "logoUrl",
            Field::BannerUrl => "bannerUrl",
            Field::Instagram => "instagram",
            Field::Facebook => "facebook",
            Field::Twitter => "twitter",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Field> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.wire_name() == name)
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.wire_name().to_string()
    }
}

impl TryFrom<String> for Field {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Field::from_wire_name(&name).ok_or_else(|| format!("unknown field: {}", name))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Backend names that differ from the wizard's own field names.
///
/// The registration endpoint reports errors against its DTO properties,
/// which flatten or regroup some of the wizard's fields.
const BACKEND_ALIASES: &[(&str, Field)] = &[
    ("address", Field::Street),
    ("pincode", Field::PostalCode),
    ("businessHours", Field::OpenTime),
    ("establishedDate", Field::EstablishedYear),
    ("documents", Field::FssaiDocument),
    ("licenseDocuments", Field::FssaiDocument),
    ("certificationDocuments", Field::FssaiDocument),
    ("identityDocuments", Field::PanDocument),
    ("otherDocuments", Field::BankDocument),
    ("bankDetails", Field::AccountNumber),
    ("socialMedia", Field::Instagram),
    ("images", Field::LogoUrl),
    ("acceptsUPI", Field::PaymentMethods),
];

/// Result of resolving a backend-reported field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLookup {
    Known { field: Field, step: Step },
    /// The name matched nothing; the user is sent to the first step.
    Unknown { step: Step },
}

impl FieldLookup {
    pub fn step(&self) -> Step {
        match self {
            FieldLookup::Known { step, .. } | FieldLookup::Unknown { step } => *step,
        }
    }

    pub fn field(&self) -> Option<Field> {
        match self {
            FieldLookup::Known { field, .. } => Some(*field),
            FieldLookup::Unknown { .. } => None,
        }
    }
}

/// Static table translating backend-reported field names to wizard steps.
pub struct ErrorFieldMap;

impl ErrorFieldMap {
    pub const FALLBACK_STEP: Step = Step::FIRST;

    pub fn resolve(name: &str) -> FieldLookup {
        match Self::field_for(name.trim()) {
            Some(field) => FieldLookup::Known {
                field,
                step: field.step(),
            },
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    field = name,
                    fallback_step = Self::FALLBACK_STEP.number(),
                    "backend reported a field with no known step"
                );
                FieldLookup::Unknown {
                    step: Self::FALLBACK_STEP,
                }
            }
        }
    }

    fn field_for(name: &str) -> Option<Field> {
        if name.is_empty() {
            return None;
        }
        if let Some(field) = Self::lookup_segment(name) {
            return Some(field);
        }
        // Dotted paths such as `address.city`: prefer the leaf, then the root.
        let mut segments = name.split('.').filter(|segment| !segment.is_empty());
        let root = segments.next()?;
        let leaf = name.rsplit('.').find(|segment| !segment.is_empty())?;
        Self::lookup_segment(leaf).or_else(|| Self::lookup_segment(root))
    }

    fn lookup_segment(segment: &str) -> Option<Field> {
        Field::from_wire_name(segment).or_else(|| {
            BACKEND_ALIASES
                .iter()
                .find(|(alias, _)| *alias == segment)
                .map(|(_, field)| *field)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_unique_wire_name() {
        for field in Field::ALL {
            assert_eq!(Field::from_wire_name(field.wire_name()), Some(field));
        }
    }

    #[test]
    fn gst_number_resolves_to_documents_step() {
        let lookup = ErrorFieldMap::resolve("gstNumber");
        assert_eq!(
            lookup,
            FieldLookup::Known {
                field: Field::GstNumber,
                step: Step::Documents
            }
        );
        assert_eq!(lookup.step().number(), 6);
    }

    #[test]
    fn dotted_and_aliased_names_resolve() {
        assert_eq!(ErrorFieldMap::resolve("address.city").field(), Some(Field::City));
        assert_eq!(ErrorFieldMap::resolve("pincode").step(), Step::LocationHours);
        assert_eq!(
            ErrorFieldMap::resolve("bankDetails.ifscCode").field(),
            Some(Field::IfscCode)
        );
        assert_eq!(
            ErrorFieldMap::resolve("businessHours.days").field(),
            Some(Field::OperatingDays)
        );
        assert_eq!(
            ErrorFieldMap::resolve("socialMedia.unknownNetwork").step(),
            Step::ImagesBranding
        );
    }

    #[test]
    fn unknown_field_falls_back_to_first_step() {
        assert_eq!(
            ErrorFieldMap::resolve("role"),
            FieldLookup::Unknown {
                step: Step::PersonalInfo
            }
        );
        assert_eq!(ErrorFieldMap::resolve("").step(), Step::PersonalInfo);
    }

    #[test]
    fn password_change_revalidates_confirmation() {
        assert_eq!(Field::Password.dependents(), &[Field::ConfirmPassword]);
        assert!(Field::ConfirmPassword.dependents().is_empty());
    }

    #[test]
    fn field_value_presence() {
        assert!(!FieldValue::text("   ").is_filled());
        assert!(FieldValue::text(" a ").is_filled());
        assert!(!FieldValue::Flag(false).is_filled());
        assert!(!FieldValue::List(vec![]).is_filled());
        assert!(FieldValue::Number(0.0).is_filled());
    }
}
