//! Content records served on the public site: sermons, media clips, audio
//! messages, events and testimonies.
//!
//! Each kind's lifecycle is create → publish toggle → counter increments →
//! optional delete. Testimonies instead have two admin gates and are public
//! only when both are open.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  document::{Collection, Document, Projection},
  validate::{Validate, Violations, clean, normalize_email},
};

/// Longest testimony body accepted.
pub const MAX_TESTIMONY_LEN: usize = 5000;

// ─── Resource tags ───────────────────────────────────────────────────────────

/// Resource tag used by the generic admin and public content routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceKind {
  Sermons,
  Media,
  AudioMessages,
  Testimonies,
  Events,
}

/// A public interaction that may bump a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Interaction {
  View,
  Download,
  Play,
}

/// A content record managed through the generic admin routes.
pub trait Resource: Document + Validate {
  const KIND: ResourceKind;

  /// Creation input; server-owned fields (id, timestamps, counters) are not
  /// accepted from callers.
  type Draft: DeserializeOwned + Send;

  fn from_draft(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self;

  fn is_visible(&self) -> bool;

  /// Bump the counter for `interaction`. Returns `false` if this kind does
  /// not count it.
  fn record(&mut self, _interaction: Interaction) -> bool { false }
}

/// Document fields an update patch may never touch.
pub const PROTECTED_FIELDS: &[&str] =
  &["id", "created_at", "views", "downloads", "plays"];

fn visible_projection(visible: bool) -> Projection {
  Projection { visible, ..Projection::default() }
}

// ─── Sermon ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SermonCategory {
  SundayService,
  Retreat,
  Conference,
  Special,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sermon {
  pub id:            Uuid,
  pub title:         String,
  pub preacher:      String,
  pub description:   Option<String>,
  pub preached_on:   NaiveDate,
  pub category:      SermonCategory,
  pub video_url:     Option<String>,
  pub audio_url:     Option<String>,
  pub thumbnail_url: Option<String>,
  pub is_published:  bool,
  pub views:         u64,
  pub downloads:     u64,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SermonDraft {
  pub title:         String,
  pub preacher:      String,
  pub description:   Option<String>,
  pub preached_on:   NaiveDate,
  pub category:      SermonCategory,
  pub video_url:     Option<String>,
  pub audio_url:     Option<String>,
  pub thumbnail_url: Option<String>,
  #[serde(default)]
  pub is_published:  bool,
}

impl Document for Sermon {
  const COLLECTION: Collection = Collection::Sermons;

  fn id(&self) -> Uuid { self.id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn projection(&self) -> Projection { visible_projection(self.is_published) }
}

impl Validate for Sermon {
  fn violations(&self) -> Violations {
    let mut v = Violations::new();
    v.required("title", &self.title);
    v.required("preacher", &self.preacher);
    v.optional_url("video_url", self.video_url.as_deref());
    v.optional_url("audio_url", self.audio_url.as_deref());
    v.optional_url("thumbnail_url", self.thumbnail_url.as_deref());
    v
  }
}

impl Resource for Sermon {
  const KIND: ResourceKind = ResourceKind::Sermons;

  type Draft = SermonDraft;

  fn from_draft(d: SermonDraft, id: Uuid, now: DateTime<Utc>) -> Self {
    Self {
      id,
      title: d.title,
      preacher: d.preacher,
      description: d.description,
      preached_on: d.preached_on,
      category: d.category,
      video_url: d.video_url,
      audio_url: d.audio_url,
      thumbnail_url: d.thumbnail_url,
      is_published: d.is_published,
      views: 0,
      downloads: 0,
      created_at: now,
    }
  }

  fn is_visible(&self) -> bool { self.is_published }

  fn record(&mut self, interaction: Interaction) -> bool {
    match interaction {
      Interaction::View => self.views += 1,
      Interaction::Download => self.downloads += 1,
      Interaction::Play => return false,
    }
    true
  }
}

// ─── Media ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
  Image,
  Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
  Worship,
  Teaching,
  Fellowship,
  Outreach,
  Highlights,
}

/// A hosted image or video clip. Only the URL is stored; uploads happen
/// elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
  pub id:            Uuid,
  pub title:         String,
  pub description:   Option<String>,
  pub media_type:    MediaType,
  pub url:           String,
  pub thumbnail_url: Option<String>,
  pub category:      MediaCategory,
  pub is_published:  bool,
  pub views:         u64,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaDraft {
  pub title:         String,
  pub description:   Option<String>,
  pub media_type:    MediaType,
  pub url:           String,
  pub thumbnail_url: Option<String>,
  pub category:      MediaCategory,
  #[serde(default)]
  pub is_published:  bool,
}

impl Document for Media {
  const COLLECTION: Collection = Collection::Media;

  fn id(&self) -> Uuid { self.id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn projection(&self) -> Projection { visible_projection(self.is_published) }
}

impl Validate for Media {
  fn violations(&self) -> Violations {
    let mut v = Violations::new();
    v.required("title", &self.title);
    v.url("url", &self.url);
    v.optional_url("thumbnail_url", self.thumbnail_url.as_deref());
    v
  }
}

impl Resource for Media {
  const KIND: ResourceKind = ResourceKind::Media;

  type Draft = MediaDraft;

  fn from_draft(d: MediaDraft, id: Uuid, now: DateTime<Utc>) -> Self {
    Self {
      id,
      title: d.title,
      description: d.description,
      media_type: d.media_type,
      url: d.url,
      thumbnail_url: d.thumbnail_url,
      category: d.category,
      is_published: d.is_published,
      views: 0,
      created_at: now,
    }
  }

  fn is_visible(&self) -> bool { self.is_published }

  fn record(&mut self, interaction: Interaction) -> bool {
    if interaction == Interaction::View {
      self.views += 1;
      true
    } else {
      false
    }
  }
}

// ─── Audio message ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCategory {
  Teaching,
  Devotional,
  Worship,
  Testimony,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioMessage {
  pub id:               Uuid,
  pub title:            String,
  pub speaker:          String,
  pub description:      Option<String>,
  pub audio_url:        String,
  pub duration_seconds: Option<u32>,
  pub category:         AudioCategory,
  pub is_published:     bool,
  pub plays:            u64,
  pub downloads:        u64,
  pub created_at:       DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioMessageDraft {
  pub title:            String,
  pub speaker:          String,
  pub description:      Option<String>,
  pub audio_url:        String,
  pub duration_seconds: Option<u32>,
  pub category:         AudioCategory,
  #[serde(default)]
  pub is_published:     bool,
}

impl Document for AudioMessage {
  const COLLECTION: Collection = Collection::AudioMessages;

  fn id(&self) -> Uuid { self.id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn projection(&self) -> Projection { visible_projection(self.is_published) }
}

impl Validate for AudioMessage {
  fn violations(&self) -> Violations {
    let mut v = Violations::new();
    v.required("title", &self.title);
    v.required("speaker", &self.speaker);
    v.url("audio_url", &self.audio_url);
    v
  }
}

impl Resource for AudioMessage {
  const KIND: ResourceKind = ResourceKind::AudioMessages;

  type Draft = AudioMessageDraft;

  fn from_draft(d: AudioMessageDraft, id: Uuid, now: DateTime<Utc>) -> Self {
    Self {
      id,
      title: d.title,
      speaker: d.speaker,
      description: d.description,
      audio_url: d.audio_url,
      duration_seconds: d.duration_seconds,
      category: d.category,
      is_published: d.is_published,
      plays: 0,
      downloads: 0,
      created_at: now,
    }
  }

  fn is_visible(&self) -> bool { self.is_published }

  fn record(&mut self, interaction: Interaction) -> bool {
    match interaction {
      Interaction::Play => self.plays += 1,
      Interaction::Download => self.downloads += 1,
      Interaction::View => return false,
    }
    true
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub id:           Uuid,
  pub title:        String,
  pub description:  String,
  pub starts_at:    DateTime<Utc>,
  pub ends_at:      Option<DateTime<Utc>>,
  pub location:     String,
  pub image_url:    Option<String>,
  pub is_published: bool,
  pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDraft {
  pub title:        String,
  pub description:  String,
  pub starts_at:    DateTime<Utc>,
  pub ends_at:      Option<DateTime<Utc>>,
  pub location:     String,
  pub image_url:    Option<String>,
  #[serde(default)]
  pub is_published: bool,
}

impl Document for Event {
  const COLLECTION: Collection = Collection::Events;

  fn id(&self) -> Uuid { self.id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn projection(&self) -> Projection { visible_projection(self.is_published) }
}

impl Validate for Event {
  fn violations(&self) -> Violations {
    let mut v = Violations::new();
    v.required("title", &self.title);
    v.required("description", &self.description);
    v.required("location", &self.location);
    v.optional_url("image_url", self.image_url.as_deref());
    if self.ends_at.is_some_and(|end| end < self.starts_at) {
      v.push("ends_at", "must not be before starts_at");
    }
    v
  }
}

impl Resource for Event {
  const KIND: ResourceKind = ResourceKind::Events;

  type Draft = EventDraft;

  fn from_draft(d: EventDraft, id: Uuid, now: DateTime<Utc>) -> Self {
    Self {
      id,
      title: d.title,
      description: d.description,
      starts_at: d.starts_at,
      ends_at: d.ends_at,
      location: d.location,
      image_url: d.image_url,
      is_published: d.is_published,
      created_at: now,
    }
  }

  fn is_visible(&self) -> bool { self.is_published }
}

// ─── Testimony ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimony {
  pub id:           Uuid,
  pub name:         String,
  pub email:        Option<String>,
  pub location:     Option<String>,
  pub title:        String,
  pub content:      String,
  pub is_approved:  bool,
  pub is_published: bool,
  pub created_at:   DateTime<Utc>,
}

/// Public testimony submission. Both moderation gates start closed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestimonyDraft {
  pub name:     String,
  pub email:    Option<String>,
  pub location: Option<String>,
  pub title:    String,
  pub content:  String,
}

impl Document for Testimony {
  const COLLECTION: Collection = Collection::Testimonies;

  fn id(&self) -> Uuid { self.id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn projection(&self) -> Projection { visible_projection(self.is_visible()) }
}

impl Validate for Testimony {
  fn violations(&self) -> Violations {
    let mut v = Violations::new();
    v.required("name", &self.name);
    v.required("title", &self.title);
    v.required("content", &self.content);
    v.max_len("content", Some(&self.content), MAX_TESTIMONY_LEN);
    if let Some(email) = &self.email {
      v.email("email", email);
    }
    v
  }
}

impl Resource for Testimony {
  const KIND: ResourceKind = ResourceKind::Testimonies;

  type Draft = TestimonyDraft;

  fn from_draft(d: TestimonyDraft, id: Uuid, now: DateTime<Utc>) -> Self {
    Self {
      id,
      name: d.name.trim().to_owned(),
      email: clean(d.email).map(|e| normalize_email(&e)),
      location: clean(d.location),
      title: d.title.trim().to_owned(),
      content: d.content.trim().to_owned(),
      is_approved: false,
      is_published: false,
      created_at: now,
    }
  }

  /// Public only when an admin has both approved and published it.
  fn is_visible(&self) -> bool { self.is_approved && self.is_published }
}
