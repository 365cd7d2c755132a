//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use retreat_core::{
  confirmation::{Confirmable, Confirmation},
  content::{Resource, Testimony, TestimonyDraft},
  document::Field,
  person::{Department, Gender, MaritalStatus, Person, PersonForm, PersonRole},
  registration::{Accommodation, EmergencyContactForm, Registration, RegistrationForm},
  store::{DocumentStore, StoreError},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn registration(email: &str, code: &str, digest: &str) -> Registration {
  RegistrationForm {
    full_name: "Jane Doe".into(),
    email: email.into(),
    phone: "+1 555 010 2000".into(),
    camp_date: NaiveDate::from_ymd_opt(2026, 8, 14),
    accommodation: Some(Accommodation::Shared),
    emergency_contact: EmergencyContactForm {
      name:         "John Doe".into(),
      phone:        "+1 555 010 2001".into(),
      relationship: "brother".into(),
    },
    ..RegistrationForm::default()
  }
  .into_registration(
    code.into(),
    Confirmation::pending(digest.into(), Utc::now() + Duration::hours(48)),
    Utc::now(),
  )
  .unwrap()
}

fn person(role: PersonRole, email: &str, code: &str) -> Person {
  PersonForm {
    role: Some(role),
    first_name: "Grace".into(),
    last_name: "Okafor".into(),
    email: email.into(),
    phone: "+234 803 555 0101".into(),
    gender: Some(Gender::Female),
    marital_status: Some(MaritalStatus::Single),
    departments: vec![Department::Media],
    ..PersonForm::default()
  }
  .into_person(
    code.into(),
    Confirmation::pending(format!("digest-{code}"), Utc::now()),
    Utc::now(),
  )
  .unwrap()
}

// ─── Basic CRUD ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_by_id() {
  let s = store().await;
  let r = registration("jane@example.org", "RTR-AAAA2222", "d1");
  s.insert(&r).await.unwrap();

  let fetched: Registration = s.find_by_id(r.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, r.id);
  assert_eq!(fetched.email, "jane@example.org");
  assert_eq!(fetched.confirmation, r.confirmation);
}

#[tokio::test]
async fn find_by_id_is_scoped_to_the_collection() {
  let s = store().await;
  let r = registration("jane@example.org", "RTR-AAAA2222", "d1");
  s.insert(&r).await.unwrap();

  let missing: Option<Person> = s.find_by_id(r.id).await.unwrap();
  assert!(missing.is_none());
  let missing: Option<Registration> = s.find_by_id(Uuid::new_v4()).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn replace_and_delete_report_misses() {
  let s = store().await;
  let mut r = registration("jane@example.org", "RTR-AAAA2222", "d1");
  assert!(!s.replace(&r).await.unwrap());
  s.insert(&r).await.unwrap();

  r.goals = Some("rest".into());
  assert!(s.replace(&r).await.unwrap());
  let fetched: Registration = s.find_by_id(r.id).await.unwrap().unwrap();
  assert_eq!(fetched.goals.as_deref(), Some("rest"));

  assert!(s.delete::<Registration>(r.id).await.unwrap());
  assert!(!s.delete::<Registration>(r.id).await.unwrap());
}

#[tokio::test]
async fn find_by_ids_skips_unknown_ids() {
  let s = store().await;
  let a = person(PersonRole::Participant, "a@example.org", "RTR-AAAAAAAA");
  let b = person(PersonRole::Staff, "b@example.org", "RTR-BBBBBBBB");
  s.insert(&a).await.unwrap();
  s.insert(&b).await.unwrap();

  let found: Vec<Person> = s.find_by_ids(&[a.id, Uuid::new_v4(), b.id]).await.unwrap();
  assert_eq!(found.len(), 2);
  let none: Vec<Person> = s.find_by_ids(&[]).await.unwrap();
  assert!(none.is_empty());
}

// ─── Projections ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn confirmation_moves_digest_between_columns() {
  let s = store().await;
  let mut r = registration("jane@example.org", "RTR-AAAA2222", "d1");
  s.insert(&r).await.unwrap();

  let pending: Vec<Registration> = s.find_by_field(Field::TokenDigest, "d1").await.unwrap();
  assert_eq!(pending.len(), 1);

  r.confirmation_mut().confirm(Utc::now());
  s.replace(&r).await.unwrap();

  let pending: Vec<Registration> = s.find_by_field(Field::TokenDigest, "d1").await.unwrap();
  assert!(pending.is_empty());
  let spent: Vec<Registration> = s.find_by_field(Field::SpentTokenDigest, "d1").await.unwrap();
  assert_eq!(spent.len(), 1);
  assert!(spent[0].confirmation.is_confirmed());
}

#[tokio::test]
async fn role_filter_and_newest_first() {
  let s = store().await;
  let first = person(PersonRole::Volunteer, "a@example.org", "RTR-AAAAAAAA");
  let mut second = person(PersonRole::Volunteer, "b@example.org", "RTR-BBBBBBBB");
  second.created_at = first.created_at + Duration::seconds(1);
  let staff = person(PersonRole::Staff, "c@example.org", "RTR-CCCCCCCC");
  for p in [&first, &second, &staff] {
    s.insert(p).await.unwrap();
  }

  let volunteers: Vec<Person> = s.find_by_field(Field::Role, "volunteer").await.unwrap();
  let ids: Vec<Uuid> = volunteers.iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![second.id, first.id]);

  let all: Vec<Person> = s.list(false).await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn list_visible_only_follows_projection() {
  let s = store().await;
  let draft = TestimonyDraft {
    name: "Ruth".into(),
    title: "Restored".into(),
    content: "I came weary and left renewed.".into(),
    ..TestimonyDraft::default()
  };
  let mut t = Testimony::from_draft(draft, Uuid::new_v4(), Utc::now());
  s.insert(&t).await.unwrap();

  let public: Vec<Testimony> = s.list(true).await.unwrap();
  assert!(public.is_empty());

  t.is_approved = true;
  t.is_published = true;
  s.replace(&t).await.unwrap();
  let public: Vec<Testimony> = s.list(true).await.unwrap();
  assert_eq!(public.len(), 1);
}

// ─── Unique indexes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn person_email_is_unique() {
  let s = store().await;
  s.insert(&person(PersonRole::Participant, "a@example.org", "RTR-AAAAAAAA"))
    .await
    .unwrap();
  let err = s
    .insert(&person(PersonRole::Volunteer, "a@example.org", "RTR-BBBBBBBB"))
    .await
    .unwrap_err();
  assert!(err.is_unique_violation(), "got {err}");
}

#[tokio::test]
async fn registration_code_is_unique_per_collection() {
  let s = store().await;
  s.insert(&registration("a@example.org", "RTR-SAME2222", "d1"))
    .await
    .unwrap();
  let err = s
    .insert(&registration("b@example.org", "RTR-SAME2222", "d2"))
    .await
    .unwrap_err();
  assert!(err.is_unique_violation());

  // A person may reuse a code issued in another collection.
  s.insert(&person(PersonRole::Staff, "c@example.org", "RTR-SAME2222"))
    .await
    .unwrap();
}

#[tokio::test]
async fn only_confirmed_registration_emails_are_unique() {
  let s = store().await;
  let mut a = registration("jane@example.org", "RTR-AAAAAAAA", "d1");
  let mut b = registration("jane@example.org", "RTR-BBBBBBBB", "d2");
  s.insert(&a).await.unwrap();
  s.insert(&b).await.unwrap();

  a.confirmation_mut().confirm(Utc::now());
  assert!(s.replace(&a).await.unwrap());

  b.confirmation_mut().confirm(Utc::now());
  let err = s.replace(&b).await.unwrap_err();
  assert!(err.is_unique_violation());
}

#[tokio::test]
async fn reopening_a_file_keeps_documents() {
  let dir = std::env::temp_dir().join(format!("retreat-store-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("retreat.db");

  let r = registration("jane@example.org", "RTR-AAAA2222", "d1");
  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert(&r).await.unwrap();
    s.close().await.unwrap();
  }
  let s = SqliteStore::open(&path).await.unwrap();
  let fetched: Option<Registration> = s.find_by_id(r.id).await.unwrap();
  assert!(fetched.is_some());
  s.close().await.unwrap();
  std::fs::remove_dir_all(&dir).unwrap();
}
