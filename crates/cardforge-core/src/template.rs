//! Template serialization.
//!
//! A template is a JSON object whose keys are all optional. Loading a template
//! replaces only the slices it carries, so partial templates (for instance one
//! holding just `elements`) can be layered onto an existing card.

use crate::card::{CardData, CardImages, DesignationConfig, GradeConfig, LookupTable};
use crate::config::{BarcodeConfig, ProfilePhotoStyle, SignatureStyle};
use crate::document::CardDocument;
use crate::elements::Element;
use crate::standard::StandardStyles;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or writing templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid template JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Template must be a JSON object")]
    NotAnObject,
}

/// Serialized form of a [`CardDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Template {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_data: Option<CardData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<CardImages>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designations: Option<Vec<DesignationConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grades: Option<Vec<GradeConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode_config: Option<BarcodeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_style: Option<ProfilePhotoStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_signature_style: Option<SignatureStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_signature_style: Option<SignatureStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_styles: Option<StandardStyles>,
}

impl Template {
    /// Capture every slice of `document`.
    pub fn capture(document: &CardDocument) -> Self {
        Self {
            card_data: Some(document.card_data.clone()),
            images: Some(document.images.clone()),
            designations: Some(document.designations.iter().cloned().collect()),
            grades: Some(document.grades.iter().cloned().collect()),
            barcode_config: Some(document.barcode_config.clone()),
            profile_style: Some(document.profile_style.clone()),
            holder_signature_style: Some(document.holder_signature_style.clone()),
            authority_signature_style: Some(document.authority_signature_style.clone()),
            elements: Some(document.elements.clone()),
            standard_styles: Some(document.standard_styles.clone()),
        }
    }

    /// Replace the slices present in this template.
    pub fn apply_to(self, document: &mut CardDocument) {
        if let Some(card_data) = self.card_data {
            document.card_data = card_data;
        }
        if let Some(images) = self.images {
            document.images = images;
        }
        if let Some(designations) = self.designations {
            document.designations = LookupTable::new(designations);
        }
        if let Some(grades) = self.grades {
            document.grades = LookupTable::new(grades);
        }
        if let Some(config) = self.barcode_config {
            document.barcode_config = config;
        }
        if let Some(style) = self.profile_style {
            document.profile_style = style;
        }
        if let Some(style) = self.holder_signature_style {
            document.holder_signature_style = style;
        }
        if let Some(style) = self.authority_signature_style {
            document.authority_signature_style = style;
        }
        if let Some(elements) = self.elements {
            document.elements = elements;
        }
        if let Some(styles) = self.standard_styles {
            document.standard_styles = styles;
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(TemplateError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of slices this template carries.
    pub fn slice_count(&self) -> usize {
        [
            self.card_data.is_some(),
            self.images.is_some(),
            self.designations.is_some(),
            self.grades.is_some(),
            self.barcode_config.is_some(),
            self.profile_style.is_some(),
            self.holder_signature_style.is_some(),
            self.authority_signature_style.is_some(),
            self.elements.is_some(),
            self.standard_styles.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}
