//! Standard card fields: fixed slots bound to the card data record.

use crate::card::CardData;
use crate::elements::Side;
use crate::style::{TextAlign, TextStyle};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of a standard field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StandardFieldKey {
    NameWithInitials,
    FullName,
    Designation,
    Grade,
    OfficialAddress,
    FooterLeft,
    FooterRight,
}

impl StandardFieldKey {
    pub const ALL: [StandardFieldKey; 7] = [
        StandardFieldKey::NameWithInitials,
        StandardFieldKey::FullName,
        StandardFieldKey::Designation,
        StandardFieldKey::Grade,
        StandardFieldKey::OfficialAddress,
        StandardFieldKey::FooterLeft,
        StandardFieldKey::FooterRight,
    ];

    pub fn side(self) -> Side {
        match self {
            StandardFieldKey::OfficialAddress => Side::Back,
            _ => Side::Front,
        }
    }

    /// Fixed frame in card-local units.
    pub fn frame(self) -> Rect {
        match self {
            StandardFieldKey::NameWithInitials => Rect::new(20.0, 252.0, 300.0, 276.0),
            StandardFieldKey::FullName => Rect::new(20.0, 278.0, 300.0, 298.0),
            StandardFieldKey::Designation => Rect::new(20.0, 300.0, 300.0, 320.0),
            StandardFieldKey::Grade => Rect::new(20.0, 322.0, 300.0, 340.0),
            StandardFieldKey::OfficialAddress => Rect::new(20.0, 40.0, 300.0, 150.0),
            StandardFieldKey::FooterLeft => Rect::new(12.0, 438.0, 160.0, 470.0),
            StandardFieldKey::FooterRight => Rect::new(160.0, 438.0, 308.0, 470.0),
        }
    }

    /// Display text drawn from the card record.
    pub fn text(self, data: &CardData) -> String {
        match self {
            StandardFieldKey::NameWithInitials => data.name_with_initials.clone(),
            StandardFieldKey::FullName => data.full_name.clone(),
            StandardFieldKey::Designation => data.designation.clone(),
            StandardFieldKey::Grade => data.grade.clone(),
            StandardFieldKey::OfficialAddress => data.official_address.clone(),
            StandardFieldKey::FooterLeft => format!("Date of Issue: {}", data.issue_date),
            StandardFieldKey::FooterRight => format!("File No: {}", data.file_number),
        }
    }

    pub fn default_style(self) -> TextStyle {
        let style = TextStyle::default();
        match self {
            StandardFieldKey::NameWithInitials => {
                style.with_font_size(16.0).with_bold(true).with_align(TextAlign::Center)
            }
            StandardFieldKey::FullName => style.with_font_size(11.0).with_align(TextAlign::Center),
            StandardFieldKey::Designation => {
                style.with_font_size(13.0).with_bold(true).with_align(TextAlign::Center)
            }
            StandardFieldKey::Grade => style.with_font_size(12.0).with_align(TextAlign::Center),
            StandardFieldKey::OfficialAddress => style.with_font_size(12.0),
            StandardFieldKey::FooterLeft => style.with_font_size(10.0),
            StandardFieldKey::FooterRight => {
                style.with_font_size(10.0).with_align(TextAlign::Right)
            }
        }
    }

    /// Standard fields on `side`, in painting order.
    pub fn for_side(side: Side) -> impl Iterator<Item = StandardFieldKey> {
        Self::ALL.into_iter().filter(move |key| key.side() == side)
    }
}

/// One text style per standard field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandardStyles(BTreeMap<StandardFieldKey, TextStyle>);

impl Default for StandardStyles {
    fn default() -> Self {
        Self(
            StandardFieldKey::ALL
                .into_iter()
                .map(|key| (key, key.default_style()))
                .collect(),
        )
    }
}

impl StandardStyles {
    /// Style for `key`; keys missing from a loaded template fall back to their defaults.
    pub fn get(&self, key: StandardFieldKey) -> TextStyle {
        self.0.get(&key).cloned().unwrap_or_else(|| key.default_style())
    }

    pub fn update(&mut self, key: StandardFieldKey, patch: &TextStyle) {
        self.0.entry(key).or_insert_with(|| key.default_style()).merge(patch);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StandardFieldKey, &TextStyle)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_fit_card() {
        let card = Rect::new(0.0, 0.0, 320.0, 500.0);
        for key in StandardFieldKey::ALL {
            let frame = key.frame();
            assert_eq!(card.intersect(frame), frame, "{key:?} outside card");
        }
    }

    #[test]
    fn test_sides() {
        let back: Vec<_> = StandardFieldKey::for_side(Side::Back).collect();
        assert_eq!(back, vec![StandardFieldKey::OfficialAddress]);
        assert_eq!(StandardFieldKey::for_side(Side::Front).count(), 6);
    }

    #[test]
    fn test_footer_text() {
        let data = CardData {
            issue_date: "2024-01-01".into(),
            file_number: "F/12".into(),
            ..Default::default()
        };
        assert_eq!(StandardFieldKey::FooterLeft.text(&data), "Date of Issue: 2024-01-01");
        assert_eq!(StandardFieldKey::FooterRight.text(&data), "File No: F/12");
    }

    #[test]
    fn test_update_and_serde_keys() {
        let mut styles = StandardStyles::default();
        styles.update(StandardFieldKey::Grade, &TextStyle::default().with_color("#ff0000"));
        assert_eq!(styles.get(StandardFieldKey::Grade).color.as_deref(), Some("#ff0000"));
        assert_eq!(styles.get(StandardFieldKey::Grade).font_size, Some(12.0));

        let json = serde_json::to_value(&styles).unwrap();
        assert!(json.get("nameWithInitials").is_some());
        let back: StandardStyles = serde_json::from_value(json).unwrap();
        assert_eq!(back, styles);
    }

    #[test]
    fn test_missing_key_falls_back() {
        let styles: StandardStyles = serde_json::from_str("{}").unwrap();
        assert_eq!(styles.get(StandardFieldKey::FooterRight).text_align, Some(TextAlign::Right));
    }
}
