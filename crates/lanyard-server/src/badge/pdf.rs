// SPDX-License-Identifier: Apache-2.0

//! Badge sheet rendering. One fixed-size page of double badge height holds
//! the badge twice, upright in the lower half and rotated 180 degrees into
//! the upper half, so a single cut produces two correctly oriented badges.
//! Content streams are written uncompressed.

use crate::badge::layout::{
    scale_element, ScaledBox, BADGE_HEIGHT_PT, BADGE_WIDTH_PT, PAGE_HEIGHT_PT, PAGE_WIDTH_PT,
};
use crate::badge::qr::{self, QrImage};
use lanyard_model::{BadgeTemplate, Contact, ElementKind, FontWeight, TextAlign};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use tracing::warn;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
/// Rough Helvetica advance used for center/right alignment without carrying
/// font metric tables.
const APPROX_GLYPH_WIDTH_EM: f64 = 0.5;

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn element_text(
    template_element_kind: ElementKind,
    content: &str,
    contact: &Contact,
    company_name: Option<&str>,
) -> Option<String> {
    match template_element_kind {
        ElementKind::Text => Some(content.to_string()),
        // Field lookup: the named attribute's string form, empty when absent.
        ElementKind::Field => Some(match content {
            "company" | "company_name" => company_name.unwrap_or_default().to_string(),
            other => contact.field_value(other).unwrap_or_default(),
        }),
        ElementKind::Qr => None,
    }
}

fn aligned_x(scaled: &ScaledBox, align: TextAlign, text: &str) -> f64 {
    let text_width = text.chars().count() as f64 * scaled.font_size * APPROX_GLYPH_WIDTH_EM;
    match align {
        TextAlign::Left => scaled.x,
        TextAlign::Center => scaled.x + ((scaled.width - text_width) / 2.0).max(0.0),
        TextAlign::Right => scaled.x + (scaled.width - text_width).max(0.0),
    }
}

fn badge_operations(
    template: &BadgeTemplate,
    contact: &Contact,
    company_name: Option<&str>,
    qr_available: bool,
) -> Vec<Operation> {
    let mut ops = Vec::new();
    for element in &template.elements {
        let scaled = scale_element(template.width, template.height, element);
        match element.kind {
            ElementKind::Text | ElementKind::Field => {
                let Some(text) =
                    element_text(element.kind, &element.content, contact, company_name)
                else {
                    continue;
                };
                let font = match element.font_weight {
                    FontWeight::Normal => FONT_REGULAR,
                    FontWeight::Bold => FONT_BOLD,
                };
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font.into(), real(scaled.font_size)],
                ));
                ops.push(Operation::new(
                    "Td",
                    vec![
                        real(aligned_x(&scaled, element.align, &text)),
                        real(scaled.y),
                    ],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(text.as_str())],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            ElementKind::Qr => {
                if !qr_available {
                    continue;
                }
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(scaled.width),
                        real(0.0),
                        real(0.0),
                        real(scaled.height),
                        real(scaled.x),
                        real(scaled.y),
                    ],
                ));
                ops.push(Operation::new("Do", vec!["Im0".into()]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    ops
}

fn decode_stored_qr(contact: &Contact) -> Option<QrImage> {
    let stored = contact.qr_code.as_deref()?;
    match qr::decode_data_url(stored) {
        Ok(img) => Some(img),
        Err(e) => {
            // A broken stored QR must not sink the whole sheet.
            warn!(contact_id = %contact.id, error = %e, "badge qr decode failed; skipping element");
            None
        }
    }
}

pub fn render_badge_sheet(
    template: &BadgeTemplate,
    contact: &Contact,
    company_name: Option<&str>,
) -> Result<Vec<u8>, String> {
    let qr_image = decode_stored_qr(contact);
    let badge_ops = badge_operations(template, contact, company_name, qr_image.is_some());

    let mut operations = Vec::new();
    // Upright copy in the lower half.
    operations.push(Operation::new("q", vec![]));
    operations.extend(badge_ops.iter().cloned());
    operations.push(Operation::new("Q", vec![]));
    // Rotated copy in the upper half: 180 degrees about the sheet midline.
    operations.push(Operation::new("q", vec![]));
    operations.push(Operation::new(
        "cm",
        vec![
            real(-1.0),
            real(0.0),
            real(0.0),
            real(-1.0),
            real(BADGE_WIDTH_PT),
            real(2.0 * BADGE_HEIGHT_PT),
        ],
    ));
    operations.extend(badge_ops);
    operations.push(Operation::new("Q", vec![]));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica"
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold"
    });
    let mut resources = dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id
        }
    };
    if let Some(img) = qr_image {
        let xobject_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => img.width as i64,
                "Height" => img.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8
            },
            img.pixels,
        ));
        resources.set("XObject", dictionary! { "Im0" => xobject_id });
    }

    let content = Content { operations };
    let content_data = content
        .encode()
        .map_err(|e| format!("content stream encoding: {e}"))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content_data));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            real(PAGE_WIDTH_PT),
            real(PAGE_HEIGHT_PT),
        ],
        "Contents" => content_id,
        "Resources" => resources
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| format!("pdf serialization: {e}"))?;
    Ok(out)
}
