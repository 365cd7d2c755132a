//! People: participants, volunteers and staff share one collection.
//!
//! The role discriminant decides which extra data a person carries. Volunteer
//! applications are people with the volunteer role; their admin review status
//! is independent of whether they confirmed their own email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  confirmation::{Confirmable, Confirmation},
  document::{Collection, Document, Projection},
  notify::{ConfirmKind, Recipient},
  validate::{MAX_TEXT_LEN, Validate, Violations, clean, normalize_email},
};

/// Volunteers pick at least one and at most this many departments.
pub const MAX_DEPARTMENTS: usize = 2;

// ─── Vocabulary ──────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PersonRole {
  #[default]
  Participant,
  Volunteer,
  Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
  Male,
  Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
  Single,
  Married,
  Widowed,
  Divorced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ministry {
  Pastoral,
  Worship,
  Youth,
  Children,
  Evangelism,
  Prayer,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
  Worship,
  Ushering,
  Media,
  Hospitality,
  Security,
  Medical,
  Children,
  Logistics,
  Prayer,
  Protocol,
  Sanitation,
}

/// Admin review of a volunteer application. Any value may follow any other.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplicationStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

/// Operational status of a person.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PersonStatus {
  #[default]
  Pending,
  Active,
  Cancelled,
}

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
  pub street:  Option<String>,
  pub city:    Option<String>,
  pub state:   Option<String>,
  pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub first_name:     String,
  pub last_name:      String,
  /// Always stored normalised (trimmed, lowercase).
  pub email:          String,
  pub phone:          String,
  pub gender:         Gender,
  pub marital_status: MaritalStatus,
  pub church:         Option<String>,
  pub address:        Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Leadership {
  Member,
  Leader {
    ministry:        Ministry,
    /// Present only when `ministry` is [`Ministry::Other`].
    custom_ministry: Option<String>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerDetails {
  pub departments:        Vec<Department>,
  pub skills:             Vec<String>,
  pub availability:       Option<String>,
  pub application_status: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoleDetails {
  Participant,
  Volunteer(VolunteerDetails),
  Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
  pub checked_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub id:                Uuid,
  pub registration_code: String,
  pub profile:           Profile,
  pub role:              RoleDetails,
  pub leadership:        Leadership,
  pub status:            PersonStatus,
  pub confirmation:      Confirmation,
  /// Set only by an admin check-in, independent of confirmation.
  pub check_in:          Option<CheckIn>,
  /// Soft reference to a site user account; not enforced.
  pub user_id:           Option<Uuid>,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

impl Person {
  pub fn role(&self) -> PersonRole {
    match self.role {
      RoleDetails::Participant => PersonRole::Participant,
      RoleDetails::Volunteer(_) => PersonRole::Volunteer,
      RoleDetails::Staff => PersonRole::Staff,
    }
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.profile.first_name, self.profile.last_name)
  }

  pub fn volunteer(&self) -> Option<&VolunteerDetails> {
    match &self.role {
      RoleDetails::Volunteer(details) => Some(details),
      _ => None,
    }
  }

  pub fn volunteer_mut(&mut self) -> Option<&mut VolunteerDetails> {
    match &mut self.role {
      RoleDetails::Volunteer(details) => Some(details),
      _ => None,
    }
  }
}

impl Document for Person {
  const COLLECTION: Collection = Collection::People;

  fn id(&self) -> Uuid { self.id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn projection(&self) -> Projection {
    Projection {
      email:              Some(self.profile.email.clone()),
      registration_code:  Some(self.registration_code.clone()),
      token_digest:       self.confirmation.token_digest().map(str::to_owned),
      spent_token_digest: self.confirmation.spent_token_digest().map(str::to_owned),
      role:               Some(self.role().to_string()),
      is_confirmed:       self.confirmation.is_confirmed(),
      visible:            false,
    }
  }
}

impl Confirmable for Person {
  const KIND: ConfirmKind = ConfirmKind::Person;

  fn confirmation(&self) -> &Confirmation { &self.confirmation }

  fn confirmation_mut(&mut self) -> &mut Confirmation { &mut self.confirmation }

  fn registration_code(&self) -> &str { &self.registration_code }

  fn recipient(&self) -> Recipient {
    Recipient { email: self.profile.email.clone(), name: self.full_name() }
  }

  fn on_confirmed(&mut self, at: DateTime<Utc>) {
    self.status = PersonStatus::Active;
    self.updated_at = at;
  }
}

// ─── Form ────────────────────────────────────────────────────────────────────

/// Sign-up form as submitted. Every field is optional at the type level so a
/// missing field becomes a field-level violation rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonForm {
  pub role:            Option<PersonRole>,
  pub first_name:      String,
  pub last_name:       String,
  pub email:           String,
  pub phone:           String,
  pub gender:          Option<Gender>,
  pub marital_status:  Option<MaritalStatus>,
  pub church:          Option<String>,
  pub address:         Address,
  pub is_leader:       bool,
  pub ministry:        Option<Ministry>,
  pub custom_ministry: Option<String>,
  /// Volunteers only.
  pub departments:     Vec<Department>,
  /// Volunteers only.
  pub skills:          Vec<String>,
  /// Volunteers only.
  pub availability:    Option<String>,
  pub user_id:         Option<Uuid>,
}

impl Validate for PersonForm {
  fn violations(&self) -> Violations {
    let mut v = Violations::new();
    v.chosen("role", &self.role);
    v.required("first_name", &self.first_name);
    v.required("last_name", &self.last_name);
    v.email("email", &self.email);
    v.phone("phone", &self.phone);
    v.chosen("gender", &self.gender);
    v.chosen("marital_status", &self.marital_status);
    leadership_violations(&mut v, self.is_leader, self.ministry, self.custom_ministry.as_deref());
    if self.role == Some(PersonRole::Volunteer) {
      department_violations(&mut v, &self.departments);
      v.max_len("availability", self.availability.as_deref(), MAX_TEXT_LEN);
    }
    v
  }
}

/// Ministry is required for leaders; a custom ministry is required when the
/// ministry is "other".
pub fn leadership_violations(
  v: &mut Violations,
  is_leader: bool,
  ministry: Option<Ministry>,
  custom_ministry: Option<&str>,
) {
  if !is_leader {
    return;
  }
  match ministry {
    None => v.push("ministry", "is required for leaders"),
    Some(Ministry::Other) => {
      if custom_ministry.is_none_or(|m| m.trim().is_empty()) {
        v.push("custom_ministry", "is required when ministry is other");
      }
    }
    Some(_) => {}
  }
}

/// Volunteers choose between one and [`MAX_DEPARTMENTS`] distinct departments.
pub fn department_violations(v: &mut Violations, departments: &[Department]) {
  if departments.is_empty() {
    v.push("departments", "select at least one department");
  } else if departments.len() > MAX_DEPARTMENTS {
    v.push("departments", format!("select at most {MAX_DEPARTMENTS} departments"));
  } else if departments.len() == 2 && departments[0] == departments[1] {
    v.push("departments", "must not repeat a department");
  }
}

impl PersonForm {
  /// Validate and build a new pending person.
  pub fn into_person(
    self,
    registration_code: String,
    confirmation: Confirmation,
    now: DateTime<Utc>,
  ) -> Result<Person> {
    self.validate()?;
    let (Some(role), Some(gender), Some(marital_status)) =
      (self.role, self.gender, self.marital_status)
    else {
      return Err(Error::invalid("form", "incomplete form"));
    };

    let leadership = match (self.is_leader, self.ministry) {
      (true, Some(ministry)) => Leadership::Leader {
        ministry,
        custom_ministry: (ministry == Ministry::Other)
          .then(|| clean(self.custom_ministry))
          .flatten(),
      },
      _ => Leadership::Member,
    };

    let role = match role {
      PersonRole::Participant => RoleDetails::Participant,
      PersonRole::Staff => RoleDetails::Staff,
      PersonRole::Volunteer => RoleDetails::Volunteer(VolunteerDetails {
        departments:        self.departments,
        skills:             self
          .skills
          .into_iter()
          .filter_map(|s| clean(Some(s)))
          .collect(),
        availability:       clean(self.availability),
        application_status: ApplicationStatus::Pending,
      }),
    };

    Ok(Person {
      id: Uuid::new_v4(),
      registration_code,
      profile: Profile {
        first_name: self.first_name.trim().to_owned(),
        last_name: self.last_name.trim().to_owned(),
        email: normalize_email(&self.email),
        phone: self.phone.trim().to_owned(),
        gender,
        marital_status,
        church: clean(self.church),
        address: Address {
          street:  clean(self.address.street),
          city:    clean(self.address.city),
          state:   clean(self.address.state),
          country: clean(self.address.country),
        },
      },
      role,
      leadership,
      status: PersonStatus::Pending,
      confirmation,
      check_in: None,
      user_id: self.user_id,
      created_at: now,
      updated_at: now,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn volunteer_form(email: &str) -> PersonForm {
    PersonForm {
      role: Some(PersonRole::Volunteer),
      first_name: "Grace".into(),
      last_name: "Okafor".into(),
      email: email.into(),
      phone: "+234 803 555 0101".into(),
      gender: Some(Gender::Female),
      marital_status: Some(MaritalStatus::Single),
      departments: vec![Department::Media, Department::Ushering],
      ..PersonForm::default()
    }
  }

  fn pending() -> Confirmation { Confirmation::pending("digest".into(), Utc::now()) }

  #[test]
  fn empty_form_reports_every_required_field() {
    let v = PersonForm::default().violations();
    for field in ["role", "first_name", "last_name", "email", "phone", "gender", "marital_status"] {
      assert!(v.has(field), "missing violation for {field}");
    }
  }

  #[test]
  fn leader_needs_ministry() {
    let mut form = volunteer_form("g@x.com");
    form.is_leader = true;
    assert!(form.violations().has("ministry"));

    form.ministry = Some(Ministry::Youth);
    assert!(form.violations().is_empty());
  }

  #[test]
  fn other_ministry_needs_custom_text() {
    let mut form = volunteer_form("g@x.com");
    form.is_leader = true;
    form.ministry = Some(Ministry::Other);
    assert!(form.violations().has("custom_ministry"));

    form.custom_ministry = Some("   ".into());
    assert!(form.violations().has("custom_ministry"));

    form.custom_ministry = Some("Campus fellowship".into());
    assert!(form.violations().is_empty());
  }

  #[test]
  fn ministry_ignored_for_non_leaders() {
    let mut form = volunteer_form("g@x.com");
    form.ministry = Some(Ministry::Other);
    let person = form.into_person("RTR-AAAAAAAA".into(), pending(), Utc::now()).unwrap();
    assert_eq!(person.leadership, Leadership::Member);
  }

  #[test]
  fn volunteer_department_bounds() {
    let mut form = volunteer_form("g@x.com");
    form.departments.clear();
    assert!(form.violations().has("departments"));

    form.departments = vec![Department::Media, Department::Prayer, Department::Security];
    assert!(form.violations().has("departments"));

    form.departments = vec![Department::Media, Department::Media];
    assert!(form.violations().has("departments"));

    form.departments = vec![Department::Medical];
    assert!(form.violations().is_empty());
  }

  #[test]
  fn participants_need_no_departments() {
    let mut form = volunteer_form("p@x.com");
    form.role = Some(PersonRole::Participant);
    form.departments.clear();
    assert!(form.violations().is_empty());
  }

  #[test]
  fn into_person_normalises_and_starts_pending() {
    let mut form = volunteer_form("  Grace@X.com ");
    form.skills = vec!["camera".into(), "  ".into()];
    let person = form.into_person("RTR-AAAAAAAA".into(), pending(), Utc::now()).unwrap();

    assert_eq!(person.profile.email, "grace@x.com");
    assert_eq!(person.role(), PersonRole::Volunteer);
    assert_eq!(person.status, PersonStatus::Pending);
    let details = person.volunteer().unwrap();
    assert_eq!(details.skills, vec!["camera".to_string()]);
    assert_eq!(details.application_status, ApplicationStatus::Pending);
    assert!(!person.confirmation.is_confirmed());
  }

  #[test]
  fn projection_carries_lookup_fields() {
    let person = volunteer_form("g@x.com")
      .into_person("RTR-AAAAAAAA".into(), pending(), Utc::now())
      .unwrap();
    let p = person.projection();
    assert_eq!(p.email.as_deref(), Some("g@x.com"));
    assert_eq!(p.role.as_deref(), Some("volunteer"));
    assert_eq!(p.token_digest.as_deref(), Some("digest"));
    assert!(!p.is_confirmed);
  }
}
