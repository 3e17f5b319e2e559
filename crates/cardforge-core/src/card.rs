//! Card holder records, embedded card images and the designation/grade lookup tables.

use crate::color::{CardColor, DEFAULT_ACCENT_HEX};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The data-entry record printed on a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name_with_initials: String,
    pub full_name: String,
    pub designation: String,
    pub grade: String,
    pub nic: String,
    pub issue_date: String,
    pub file_number: String,
    pub official_address: String,
}

impl CardData {
    /// Overwrite fields present in a JSON object, leaving the rest untouched.
    /// Non-string values are ignored.
    pub fn merge_json(&mut self, patch: &serde_json::Map<String, serde_json::Value>) {
        let fields: [(&str, &mut String); 8] = [
            ("nameWithInitials", &mut self.name_with_initials),
            ("fullName", &mut self.full_name),
            ("designation", &mut self.designation),
            ("grade", &mut self.grade),
            ("nic", &mut self.nic),
            ("issueDate", &mut self.issue_date),
            ("fileNumber", &mut self.file_number),
            ("officialAddress", &mut self.official_address),
        ];
        for (key, slot) in fields {
            if let Some(value) = patch.get(key).and_then(|v| v.as_str()) {
                *slot = value.to_string();
            }
        }
    }
}

/// Image slots owned by the card itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSlot {
    ProfilePhoto,
    FrontBackground,
    BackBackground,
    HolderSignature,
    AuthoritySignature,
}

/// Embedded data URIs; an empty string means no image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardImages {
    pub profile_photo: String,
    pub front_background: String,
    pub back_background: String,
    pub holder_signature: String,
    pub authority_signature: String,
}

impl CardImages {
    pub fn get(&self, slot: ImageSlot) -> Option<&str> {
        let src = match slot {
            ImageSlot::ProfilePhoto => &self.profile_photo,
            ImageSlot::FrontBackground => &self.front_background,
            ImageSlot::BackBackground => &self.back_background,
            ImageSlot::HolderSignature => &self.holder_signature,
            ImageSlot::AuthoritySignature => &self.authority_signature,
        };
        (!src.is_empty()).then_some(src.as_str())
    }

    pub fn set(&mut self, slot: ImageSlot, src: String) {
        let target = match slot {
            ImageSlot::ProfilePhoto => &mut self.profile_photo,
            ImageSlot::FrontBackground => &mut self.front_background,
            ImageSlot::BackBackground => &mut self.back_background,
            ImageSlot::HolderSignature => &mut self.holder_signature,
            ImageSlot::AuthoritySignature => &mut self.authority_signature,
        };
        *target = src;
    }
}

/// Entries of a lookup table keyed by title.
pub trait Titled {
    fn id(&self) -> Uuid;
    fn title(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationConfig {
    pub id: Uuid,
    pub title: String,
    /// Accent used for the designation text and the card stripe.
    pub color: String,
}

impl DesignationConfig {
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            color: color.into(),
        }
    }
}

impl Titled for DesignationConfig {
    fn id(&self) -> Uuid {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeConfig {
    pub id: Uuid,
    pub title: String,
    pub text_color: String,
}

impl GradeConfig {
    pub fn new(title: impl Into<String>, text_color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            text_color: text_color.into(),
        }
    }
}

impl Titled for GradeConfig {
    fn id(&self) -> Uuid {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// An ordered lookup table. Titles are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable<T>(Vec<T>);

impl<T> Default for LookupTable<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: Titled> LookupTable<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self(items)
    }

    pub fn add(&mut self, item: T) -> Uuid {
        let id = item.id();
        self.0.push(item);
        id
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.0.iter_mut().find(|item| item.id() == id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let index = self.0.iter().position(|item| item.id() == id)?;
        Some(self.0.remove(index))
    }

    /// First entry whose title matches exactly.
    pub fn find(&self, title: &str) -> Option<&T> {
        self.0.iter().find(|item| item.title() == title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn default_accent() -> CardColor {
    CardColor::parse(DEFAULT_ACCENT_HEX).unwrap_or(CardColor::black())
}

/// Accent color for a designation title, or the default accent.
pub fn designation_color(table: &LookupTable<DesignationConfig>, title: &str) -> CardColor {
    CardColor::parse_or(table.find(title).map(|d| d.color.as_str()), default_accent())
}

/// Text color for a grade title, or the default accent.
pub fn grade_color(table: &LookupTable<GradeConfig>, title: &str) -> CardColor {
    CardColor::parse_or(table.find(title).map(|g| g.text_color.as_str()), default_accent())
}

/// Generated card records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardRecords(Vec<CardData>);

impl CardRecords {
    /// Store a copy of `data` under a fresh id and return the id.
    pub fn generate(&mut self, data: &CardData) -> Uuid {
        let id = Uuid::new_v4();
        self.0.push(CardData {
            id: Some(id),
            ..data.clone()
        });
        log::info!("Generated card record {id}");
        id
    }

    /// Replace the record with `id`, keeping the id. Returns false when absent.
    pub fn edit(&mut self, id: Uuid, data: &CardData) -> bool {
        match self.0.iter_mut().find(|r| r.id == Some(id)) {
            Some(record) => {
                *record = CardData {
                    id: Some(id),
                    ..data.clone()
                };
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<CardData> {
        let index = self.0.iter().position(|r| r.id == Some(id))?;
        Some(self.0.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&CardData> {
        self.0.iter().find(|r| r.id == Some(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardData> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
