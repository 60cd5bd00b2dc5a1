//! The three-step checkout wizard.
//!
//! ```text
//! ContactDetails --next--> Delivery --next--> Confirmation --submit--> (order)
//!        ^                    |  ^                 |
//!        +-------back---------+  +------back-------+
//! ```
//!
//! `next` is guarded by the current step's required fields. Editing a step's
//! fields from a later step moves the wizard back to that step, so the
//! guards run again. `submit` is only accepted on the confirmation step,
//! re-checks every guard, and is refused while another submission started
//! less than [`SUBMIT_TIMEOUT_SECS`] ago. The state lives in the visitor's
//! session.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::delivery::{self, HOME_DELIVERY, PICKUP};
use crate::models::{CurrentUser, CustomerInfo, DeliveryAddress, DeliveryInfo, DeliveryOption};

/// Reasons the wizard refuses a transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Please fill in your full name, email and phone number.")]
    MissingContactDetails,

    #[error("Please enter your street and city for home delivery.")]
    MissingAddress,

    #[error("Unknown delivery option: {0}")]
    UnknownDeliveryOption(String),

    #[error("Please review your order before placing it.")]
    NotAtConfirmation,

    #[error("Your order is already being placed.")]
    AlreadySubmitting,

    #[error("Your cart is empty.")]
    EmptyCart,
}

/// Wizard step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CheckoutStep {
    #[default]
    ContactDetails,
    Delivery,
    Confirmation,
}

impl CheckoutStep {
    /// 1-indexed step number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::ContactDetails => 1,
            Self::Delivery => 2,
            Self::Confirmation => 3,
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::ContactDetails => Self::Delivery,
            Self::Delivery | Self::Confirmation => Self::Confirmation,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::ContactDetails | Self::Delivery => Self::ContactDetails,
            Self::Confirmation => Self::Delivery,
        }
    }
}

impl From<CheckoutStep> for u8 {
    fn from(step: CheckoutStep) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for CheckoutStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::ContactDetails),
            2 => Ok(Self::Delivery),
            3 => Ok(Self::Confirmation),
            _ => Err(format!("invalid checkout step: {value}")),
        }
    }
}

/// A submission older than this is treated as abandoned.
pub const SUBMIT_TIMEOUT_SECS: i64 = 60;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Wizard state for one visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutState {
    pub step: CheckoutStep,
    pub customer_info: CustomerInfo,
    pub selected_delivery: DeliveryOption,
    pub delivery_address: DeliveryAddress,
    pub is_submitting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_started_at: Option<DateTime<Utc>>,
}

impl Default for CheckoutState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CheckoutState {
    /// Fresh wizard on step 1 with pickup selected. Name and email are
    /// prefilled from the signed-in user.
    #[must_use]
    pub fn new(user: Option<&CurrentUser>) -> Self {
        let customer_info = user.map_or_else(CustomerInfo::default, |user| CustomerInfo {
            full_name: user.display_name.clone().unwrap_or_default(),
            email: user.email.clone(),
            phone: String::new(),
        });

        Self {
            step: CheckoutStep::ContactDetails,
            customer_info,
            selected_delivery: delivery::pickup(),
            delivery_address: DeliveryAddress::default(),
            is_submitting: false,
            submit_started_at: None,
        }
    }

    /// Return to `step` if the wizard is past it.
    fn reopen(&mut self, step: CheckoutStep) {
        if self.step > step {
            self.step = step;
        }
        self.finish_submit();
    }

    /// Step 1 fields.
    pub fn set_contact(&mut self, info: CustomerInfo) {
        self.customer_info = info;
        self.reopen(CheckoutStep::ContactDetails);
    }

    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownDeliveryOption`] for an id that is not
    /// offered.
    pub fn select_delivery(&mut self, option_id: &str) -> Result<(), CheckoutError> {
        self.selected_delivery = delivery::find_option(option_id)
            .ok_or_else(|| CheckoutError::UnknownDeliveryOption(option_id.to_string()))?;
        self.reopen(CheckoutStep::Delivery);
        Ok(())
    }

    pub fn set_address(&mut self, address: DeliveryAddress) {
        self.delivery_address = address;
        self.reopen(CheckoutStep::Delivery);
    }

    fn contact_complete(&self) -> bool {
        let info = &self.customer_info;
        !is_blank(&info.full_name) && !is_blank(&info.email) && !is_blank(&info.phone)
    }

    fn delivery_complete(&self) -> bool {
        self.selected_delivery.id == PICKUP
            || (!is_blank(&self.delivery_address.street) && !is_blank(&self.delivery_address.city))
    }

    /// Move to the next step if the current one is complete.
    ///
    /// Advancing from the confirmation step is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the missing-field error of the current step.
    pub fn advance(&mut self) -> Result<CheckoutStep, CheckoutError> {
        match self.step {
            CheckoutStep::ContactDetails if !self.contact_complete() => {
                return Err(CheckoutError::MissingContactDetails);
            }
            CheckoutStep::Delivery if !self.delivery_complete() => {
                return Err(CheckoutError::MissingAddress);
            }
            _ => {}
        }
        self.step = self.step.next();
        Ok(self.step)
    }

    /// Go back one step; no-op on step 1. Drops a pending submission.
    pub fn back(&mut self) -> CheckoutStep {
        self.step = self.step.previous();
        self.finish_submit();
        self.step
    }

    /// Delivery part of the order. The address is attached only for home
    /// delivery.
    #[must_use]
    pub fn delivery_info(&self) -> DeliveryInfo {
        DeliveryInfo {
            option: self.selected_delivery.clone(),
            address: (self.selected_delivery.id == HOME_DELIVERY)
                .then(|| self.delivery_address.clone()),
        }
    }

    /// Whether a submission started at or after `now - SUBMIT_TIMEOUT_SECS`
    /// is still pending.
    fn submission_pending(&self, now: DateTime<Utc>) -> bool {
        self.is_submitting
            && self
                .submit_started_at
                .is_some_and(|started| now - started < TimeDelta::seconds(SUBMIT_TIMEOUT_SECS))
    }

    /// Mark an order as in flight at `now`.
    ///
    /// # Errors
    ///
    /// Fails off the confirmation step, when a step's required fields are
    /// missing, or while another recent submission is pending.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Confirmation {
            return Err(CheckoutError::NotAtConfirmation);
        }
        if !self.contact_complete() {
            return Err(CheckoutError::MissingContactDetails);
        }
        if !self.delivery_complete() {
            return Err(CheckoutError::MissingAddress);
        }
        if self.submission_pending(now) {
            return Err(CheckoutError::AlreadySubmitting);
        }
        self.is_submitting = true;
        self.submit_started_at = Some(now);
        Ok(())
    }

    /// Clear the in-flight flag, staying on the current step so the visitor
    /// can retry.
    pub fn finish_submit(&mut self) {
        self.is_submitting = false;
        self.submit_started_at = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use prime_optic_core::{UserId, UserRole};

    fn contact() -> CustomerInfo {
        CustomerInfo {
            full_name: "Arben Hoxha".to_string(),
            email: "arben@example.com".to_string(),
            phone: "+355 69 123 4567".to_string(),
        }
    }

    fn confirmed() -> CheckoutState {
        let mut state = CheckoutState::new(None);
        state.set_contact(contact());
        state.advance().unwrap();
        state.advance().unwrap();
        state
    }

    #[test]
    fn test_contact_step_requires_every_field() {
        let mut state = CheckoutState::new(None);
        assert_eq!(state.advance(), Err(CheckoutError::MissingContactDetails));

        state.set_contact(CustomerInfo {
            phone: "  ".to_string(),
            ..contact()
        });
        assert_eq!(state.advance(), Err(CheckoutError::MissingContactDetails));
        assert_eq!(state.step, CheckoutStep::ContactDetails);

        state.set_contact(contact());
        assert_eq!(state.advance(), Ok(CheckoutStep::Delivery));
    }

    #[test]
    fn test_home_delivery_requires_street_and_city() {
        let mut state = CheckoutState::new(None);
        state.set_contact(contact());
        state.advance().unwrap();

        state.select_delivery(HOME_DELIVERY).unwrap();
        state.set_address(DeliveryAddress {
            street: "Rruga e Durresit 12".to_string(),
            ..DeliveryAddress::default()
        });
        assert_eq!(state.advance(), Err(CheckoutError::MissingAddress));

        state.delivery_address.city = "Tirane".to_string();
        assert_eq!(state.advance(), Ok(CheckoutStep::Confirmation));
    }

    #[test]
    fn test_pickup_needs_no_address() {
        let mut state = CheckoutState::new(None);
        state.set_contact(contact());
        state.advance().unwrap();
        assert_eq!(state.advance(), Ok(CheckoutStep::Confirmation));
        assert!(state.delivery_info().address.is_none());
    }

    #[test]
    fn test_back_regresses_one_step() {
        let mut state = CheckoutState::new(None);
        assert_eq!(state.back(), CheckoutStep::ContactDetails);

        state.set_contact(contact());
        state.advance().unwrap();
        state.advance().unwrap();
        assert_eq!(state.back(), CheckoutStep::Delivery);
        assert_eq!(state.back(), CheckoutStep::ContactDetails);
    }

    #[test]
    fn test_submit_is_one_shot() {
        let mut state = CheckoutState::new(None);
        assert_eq!(state.begin_submit(Utc::now()), Err(CheckoutError::NotAtConfirmation));

        state.set_contact(contact());
        state.advance().unwrap();
        state.advance().unwrap();

        let now = Utc::now();
        assert!(state.begin_submit(now).is_ok());
        assert_eq!(state.begin_submit(now), Err(CheckoutError::AlreadySubmitting));

        state.finish_submit();
        assert_eq!(state.step, CheckoutStep::Confirmation);
        assert!(state.begin_submit(now).is_ok());
    }

    #[test]
    fn test_abandoned_submission_expires() {
        let mut state = confirmed();
        let started = Utc::now();
        state.begin_submit(started).unwrap();

        let later = started + TimeDelta::seconds(SUBMIT_TIMEOUT_SECS - 1);
        assert_eq!(state.begin_submit(later), Err(CheckoutError::AlreadySubmitting));

        let expired = started + TimeDelta::seconds(SUBMIT_TIMEOUT_SECS);
        assert!(state.begin_submit(expired).is_ok());
        assert_eq!(state.submit_started_at, Some(expired));
    }

    #[test]
    fn test_back_drops_pending_submission() {
        let mut state = confirmed();
        let now = Utc::now();
        state.begin_submit(now).unwrap();

        state.back();
        assert!(!state.is_submitting);
        state.advance().unwrap();
        assert!(state.begin_submit(now).is_ok());
    }

    #[test]
    fn test_editing_contact_reopens_first_step() {
        let mut state = confirmed();
        state.set_contact(CustomerInfo::default());
        assert_eq!(state.step, CheckoutStep::ContactDetails);
        assert_eq!(state.advance(), Err(CheckoutError::MissingContactDetails));
    }

    #[test]
    fn test_editing_delivery_reopens_second_step() {
        let mut state = confirmed();
        state.select_delivery(HOME_DELIVERY).unwrap();
        assert_eq!(state.step, CheckoutStep::Delivery);
        assert_eq!(state.advance(), Err(CheckoutError::MissingAddress));

        // Edits on an earlier step leave the wizard where it is
        let mut state = CheckoutState::new(None);
        state.select_delivery(HOME_DELIVERY).unwrap();
        assert_eq!(state.step, CheckoutStep::ContactDetails);
    }

    #[test]
    fn test_submit_rechecks_every_step() {
        let mut state = confirmed();
        state.customer_info.phone.clear();
        assert_eq!(
            state.begin_submit(Utc::now()),
            Err(CheckoutError::MissingContactDetails)
        );

        let mut state = confirmed();
        state.selected_delivery = delivery::home_delivery();
        assert_eq!(state.begin_submit(Utc::now()), Err(CheckoutError::MissingAddress));
        assert!(!state.is_submitting);
    }

    #[test]
    fn test_prefill_from_user() {
        let user = CurrentUser {
            id: UserId::new("u1"),
            email: "ana@example.com".to_string(),
            display_name: Some("Ana".to_string()),
            role: UserRole::User,
        };
        let state = CheckoutState::new(Some(&user));
        assert_eq!(state.customer_info.full_name, "Ana");
        assert_eq!(state.customer_info.email, "ana@example.com");
        assert!(state.customer_info.phone.is_empty());
        assert_eq!(state.selected_delivery.id, PICKUP);
    }

    #[test]
    fn test_unknown_delivery_option() {
        let mut state = CheckoutState::new(None);
        assert!(matches!(
            state.select_delivery("teleport"),
            Err(CheckoutError::UnknownDeliveryOption(_))
        ));
        assert_eq!(state.selected_delivery.id, PICKUP);
    }

    #[test]
    fn test_step_serializes_as_number() {
        let json = serde_json::to_value(CheckoutState::new(None)).unwrap();
        assert_eq!(json["step"], 1);
        let state: CheckoutState = serde_json::from_value(json).unwrap();
        assert_eq!(state.step, CheckoutStep::ContactDetails);
    }
}
