//! Wizard step identifiers.

use serde::{Deserialize, Serialize};

use crate::wizard::field::Field;

/// One screen's worth of related fields.
///
/// Steps serialize as their 1-based number so persisted drafts and
/// navigation history stay plain integers on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    PersonalInfo,
    AccountSetup,
    BusinessProfile,
    LocationHours,
    CuisineServices,
    Documents,
    PaymentSetup,
    ImagesBranding,
}

impl Step {
    pub const TOTAL: u8 = 8;

    pub const FIRST: Step = Step::PersonalInfo;

    pub const ALL: [Step; Step::TOTAL as usize] = [
        Step::PersonalInfo,
        Step::AccountSetup,
        Step::BusinessProfile,
        Step::LocationHours,
        Step::CuisineServices,
        Step::Documents,
        Step::PaymentSetup,
        Step::ImagesBranding,
    ];

    pub fn number(self) -> u8 {
        match self {
            Step::PersonalInfo => 1,
            Step::AccountSetup => 2,
            Step::BusinessProfile => 3,
            Step::LocationHours => 4,
            Step::CuisineServices => 5,
            Step::Documents => 6,
            Step::PaymentSetup => 7,
            Step::ImagesBranding => 8,
        }
    }

    pub fn from_number(number: u8) -> Option<Step> {
        Step::ALL.iter().copied().find(|step| step.number() == number)
    }

    /// The step after this one, `None` on the last step.
    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn is_last(self) -> bool {
        self.number() == Step::TOTAL
    }

    /// Key used for this step's record inside the persisted `formData` object.
    pub fn storage_key(self) -> &'static str {
        match self {
            Step::PersonalInfo => "step1",
            Step::AccountSetup => "step2",
            Step::BusinessProfile => "step3",
            Step::LocationHours => "step4",
            Step::CuisineServices => "step5",
            Step::Documents => "step6",
            Step::PaymentSetup => "step7",
            Step::ImagesBranding => "step8",
        }
    }

    /// Every field collected on this step, in screen order.
    pub fn fields(self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|field| field.step() == self)
            .collect()
    }

    /// Fields whose emptiness blocks the step from being valid.
    pub fn required_fields(self) -> Vec<Field> {
        self.fields()
            .into_iter()
            .filter(|field| field.is_required())
            .collect()
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Step::from_number(number).ok_or_else(|| format!("step {} is out of range", number))
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers_round_trip_through_from_number() {
        for step in Step::ALL {
            assert_eq!(Step::from_number(step.number()), Some(step));
        }
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(9), None);
    }

    #[test]
    fn last_step_has_no_next() {
        assert!(Step::ImagesBranding.is_last());
        assert_eq!(Step::ImagesBranding.next(), None);
        assert_eq!(Step::Documents.next(), Some(Step::PaymentSetup));
    }

    #[test]
    fn step_serializes_as_integer() {
        let json = serde_json::to_string(&vec![Step::PersonalInfo, Step::Documents]).unwrap();
        assert_eq!(json, "[1,6]");
        let parsed: Vec<Step> = serde_json::from_str("[3,8]").unwrap();
        assert_eq!(parsed, vec![Step::BusinessProfile, Step::ImagesBranding]);
        assert!(serde_json::from_str::<Step>("12").is_err());
    }

    #[test]
    fn branding_step_has_no_required_fields() {
        assert!(Step::ImagesBranding.required_fields().is_empty());
        assert!(Step::PersonalInfo
            .required_fields()
            .contains(&Field::PhoneNumber));
    }
}
