use crate::ids::{RecordId, TenantId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Draws `content` literally.
    Text,
    /// Looks `content` up as an attribute on the contact record.
    Field,
    /// Draws the contact's stored QR image.
    Qr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Normal,
    Bold,
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl Default for TextAlign {
    fn default() -> Self {
        TextAlign::Left
    }
}

/// One positioned element on the design canvas. Coordinates are in canvas
/// units; rendering normalizes them against the template width/height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeElement {
    pub id: String,
    pub kind: ElementKind,
    #[serde(default)]
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub align: TextAlign,
}

fn default_font_size() -> f64 {
    14.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeTemplate {
    pub id: RecordId,
    pub tenant_id: TenantId,
    pub event_id: RecordId,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub elements: Vec<BadgeElement>,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: RecordId,
}

impl BadgeTemplate {
    /// Canvas dims must be positive and every element box must sit inside
    /// the canvas; text and field elements need non-empty content.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ValidationError(
                "template width and height must be positive".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError(
                "template name must not be empty".to_string(),
            ));
        }
        for element in &self.elements {
            if element.width < 0.0 || element.height < 0.0 {
                return Err(ValidationError(format!(
                    "element {} has negative dimensions",
                    element.id
                )));
            }
            if element.x < 0.0
                || element.y < 0.0
                || element.x + element.width > self.width
                || element.y + element.height > self.height
            {
                return Err(ValidationError(format!(
                    "element {} escapes the canvas",
                    element.id
                )));
            }
            match element.kind {
                ElementKind::Text | ElementKind::Field => {
                    if element.content.trim().is_empty() {
                        return Err(ValidationError(format!(
                            "element {} requires content",
                            element.id
                        )));
                    }
                }
                ElementKind::Qr => {}
            }
            if element.font_size <= 0.0 {
                return Err(ValidationError(format!(
                    "element {} font size must be positive",
                    element.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BadgeTemplatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub elements: Option<Vec<BadgeElement>>,
    #[serde(default)]
    pub is_default: Option<bool>,
}

impl BadgeTemplatePatch {
    pub fn apply(&self, template: &mut BadgeTemplate) {
        if let Some(name) = &self.name {
            template.name = name.clone();
        }
        if let Some(width) = self.width {
            template.width = width;
        }
        if let Some(height) = self.height {
            template.height = height;
        }
        if let Some(elements) = &self.elements {
            template.elements = elements.clone();
        }
        if let Some(is_default) = self.is_default {
            template.is_default = is_default;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{RecordId, TenantId};

    fn template_with(elements: Vec<BadgeElement>) -> BadgeTemplate {
        BadgeTemplate {
            id: RecordId::parse("bt-1").expect("id"),
            tenant_id: TenantId::parse("t-1").expect("tenant"),
            event_id: RecordId::parse("ev-1").expect("event"),
            name: "Default Badge".to_string(),
            width: 288.0,
            height: 432.0,
            elements,
            is_default: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: RecordId::parse("u-1").expect("creator"),
        }
    }

    fn text_element() -> BadgeElement {
        BadgeElement {
            id: "el-1".to_string(),
            kind: ElementKind::Text,
            content: "ATTENDEE".to_string(),
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 24.0,
            font_size: 14.0,
            font_weight: FontWeight::Bold,
            align: TextAlign::Left,
        }
    }

    #[test]
    fn valid_template_passes() {
        template_with(vec![text_element()]).validate().expect("valid");
    }

    #[test]
    fn element_outside_canvas_is_rejected() {
        let mut el = text_element();
        el.x = 250.0;
        el.width = 100.0;
        assert!(template_with(vec![el]).validate().is_err());
    }

    #[test]
    fn text_element_requires_content() {
        let mut el = text_element();
        el.content = "  ".to_string();
        assert!(template_with(vec![el]).validate().is_err());
    }

    #[test]
    fn qr_element_needs_no_content() {
        let el = BadgeElement {
            id: "el-qr".to_string(),
            kind: ElementKind::Qr,
            content: String::new(),
            x: 100.0,
            y: 300.0,
            width: 80.0,
            height: 80.0,
            font_size: 14.0,
            font_weight: FontWeight::Normal,
            align: TextAlign::Left,
        };
        template_with(vec![el]).validate().expect("qr without content");
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let mut template = template_with(vec![]);
        template.width = 0.0;
        assert!(template.validate().is_err());
    }

    #[test]
    fn element_kind_wire_form_is_snake_case() {
        let json = serde_json::to_string(&ElementKind::Qr).expect("serialize");
        assert_eq!(json, "\"qr\"");
    }
}
