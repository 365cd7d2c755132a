//! Camp registrations.
//!
//! A registration ties one attendee to a camp date and an accommodation
//! choice. Any number of pending registrations may exist for an email, but at
//! most one confirmed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  confirmation::{Confirmable, Confirmation},
  document::{Collection, Document, Projection},
  notify::{ConfirmKind, Recipient},
  validate::{MAX_TEXT_LEN, Validate, Violations, clean, normalize_email},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accommodation {
  Shared,
  Private,
  Couple,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
  pub name:         String,
  pub phone:        String,
  pub relationship: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
  pub id:                   Uuid,
  pub registration_code:    String,
  pub full_name:            String,
  pub email:                String,
  pub phone:                String,
  pub camp_date:            NaiveDate,
  pub accommodation:        Accommodation,
  pub emergency_contact:    EmergencyContact,
  pub dietary_requirements: Option<String>,
  pub medical_conditions:   Option<String>,
  pub goals:                Option<String>,
  pub confirmation:         Confirmation,
  pub user_id:              Option<Uuid>,
  pub created_at:           DateTime<Utc>,
}

impl Document for Registration {
  const COLLECTION: Collection = Collection::Registrations;

  fn id(&self) -> Uuid { self.id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn projection(&self) -> Projection {
    Projection {
      email:              Some(self.email.clone()),
      registration_code:  Some(self.registration_code.clone()),
      token_digest:       self.confirmation.token_digest().map(str::to_owned),
      spent_token_digest: self.confirmation.spent_token_digest().map(str::to_owned),
      role:               None,
      is_confirmed:       self.confirmation.is_confirmed(),
      visible:            false,
    }
  }
}

impl Confirmable for Registration {
  const KIND: ConfirmKind = ConfirmKind::Registration;

  fn confirmation(&self) -> &Confirmation { &self.confirmation }

  fn confirmation_mut(&mut self) -> &mut Confirmation { &mut self.confirmation }

  fn registration_code(&self) -> &str { &self.registration_code }

  fn recipient(&self) -> Recipient {
    Recipient { email: self.email.clone(), name: self.full_name.clone() }
  }
}

// ─── Form ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmergencyContactForm {
  pub name:         String,
  pub phone:        String,
  pub relationship: String,
}

/// Registration form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
  pub full_name:            String,
  pub email:                String,
  pub phone:                String,
  pub camp_date:            Option<NaiveDate>,
  pub accommodation:        Option<Accommodation>,
  pub emergency_contact:    EmergencyContactForm,
  pub dietary_requirements: Option<String>,
  pub medical_conditions:   Option<String>,
  pub goals:                Option<String>,
  pub user_id:              Option<Uuid>,
}

impl Validate for RegistrationForm {
  fn violations(&self) -> Violations {
    let mut v = Violations::new();
    v.required("full_name", &self.full_name);
    v.email("email", &self.email);
    v.phone("phone", &self.phone);
    v.chosen("camp_date", &self.camp_date);
    v.chosen("accommodation", &self.accommodation);
    v.required("emergency_contact.name", &self.emergency_contact.name);
    v.phone("emergency_contact.phone", &self.emergency_contact.phone);
    v.required("emergency_contact.relationship", &self.emergency_contact.relationship);
    v.max_len("dietary_requirements", self.dietary_requirements.as_deref(), MAX_TEXT_LEN);
    v.max_len("medical_conditions", self.medical_conditions.as_deref(), MAX_TEXT_LEN);
    v.max_len("goals", self.goals.as_deref(), MAX_TEXT_LEN);
    v
  }
}

impl RegistrationForm {
  /// Validate and build a new pending registration.
  pub fn into_registration(
    self,
    registration_code: String,
    confirmation: Confirmation,
    now: DateTime<Utc>,
  ) -> Result<Registration> {
    self.validate()?;
    let (Some(camp_date), Some(accommodation)) = (self.camp_date, self.accommodation) else {
      return Err(Error::invalid("form", "incomplete form"));
    };

    Ok(Registration {
      id: Uuid::new_v4(),
      registration_code,
      full_name: self.full_name.trim().to_owned(),
      email: normalize_email(&self.email),
      phone: self.phone.trim().to_owned(),
      camp_date,
      accommodation,
      emergency_contact: EmergencyContact {
        name:         self.emergency_contact.name.trim().to_owned(),
        phone:        self.emergency_contact.phone.trim().to_owned(),
        relationship: self.emergency_contact.relationship.trim().to_owned(),
      },
      dietary_requirements: clean(self.dietary_requirements),
      medical_conditions: clean(self.medical_conditions),
      goals: clean(self.goals),
      confirmation,
      user_id: self.user_id,
      created_at: now,
    })
  }
}
