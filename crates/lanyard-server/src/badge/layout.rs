// SPDX-License-Identifier: Apache-2.0

//! Coordinate mapping from the template's design canvas onto the physical
//! badge. Canvas coordinates are top-left origin (as the designer drags
//! them); PDF space is bottom-left origin, so y flips here.

use lanyard_model::BadgeElement;

pub const POINTS_PER_INCH: f64 = 72.0;
pub const BADGE_WIDTH_PT: f64 = 4.0 * POINTS_PER_INCH;
pub const BADGE_HEIGHT_PT: f64 = 6.0 * POINTS_PER_INCH;
/// Double-height sheet: the badge is printed twice so one cut yields two
/// correctly oriented badges.
pub const PAGE_WIDTH_PT: f64 = BADGE_WIDTH_PT;
pub const PAGE_HEIGHT_PT: f64 = 2.0 * BADGE_HEIGHT_PT;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledBox {
    pub x: f64,
    /// Bottom edge of the element box in PDF space.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

/// Normalizes the element against the declared canvas size and scales it
/// into the badge's physical points.
#[must_use]
pub fn scale_element(
    canvas_width: f64,
    canvas_height: f64,
    element: &BadgeElement,
) -> ScaledBox {
    let fx = BADGE_WIDTH_PT / canvas_width;
    let fy = BADGE_HEIGHT_PT / canvas_height;
    let width = element.width * fx;
    let height = element.height * fy;
    let x = element.x * fx;
    let y = BADGE_HEIGHT_PT - (element.y * fy + height);
    ScaledBox {
        x,
        y,
        width,
        height,
        font_size: element.font_size * fy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanyard_model::{ElementKind, FontWeight, TextAlign};

    fn element(x: f64, y: f64, w: f64, h: f64) -> BadgeElement {
        BadgeElement {
            id: "el".to_string(),
            kind: ElementKind::Text,
            content: "x".to_string(),
            x,
            y,
            width: w,
            height: h,
            font_size: 14.0,
            font_weight: FontWeight::Normal,
            align: TextAlign::Left,
        }
    }

    #[test]
    fn identity_canvas_only_flips_y() {
        // Canvas already in badge points: 288 x 432.
        let scaled = scale_element(288.0, 432.0, &element(10.0, 20.0, 100.0, 30.0));
        assert!((scaled.x - 10.0).abs() < 1e-9);
        assert!((scaled.y - (432.0 - 50.0)).abs() < 1e-9);
        assert!((scaled.width - 100.0).abs() < 1e-9);
        assert!((scaled.font_size - 14.0).abs() < 1e-9);
    }

    #[test]
    fn half_size_canvas_doubles_coordinates() {
        let scaled = scale_element(144.0, 216.0, &element(10.0, 20.0, 50.0, 15.0));
        assert!((scaled.x - 20.0).abs() < 1e-9);
        assert!((scaled.width - 100.0).abs() < 1e-9);
        assert!((scaled.height - 30.0).abs() < 1e-9);
        assert!((scaled.y - (432.0 - 70.0)).abs() < 1e-9);
        assert!((scaled.font_size - 28.0).abs() < 1e-9);
    }

    #[test]
    fn element_at_canvas_origin_lands_at_top_left_of_badge() {
        let scaled = scale_element(288.0, 432.0, &element(0.0, 0.0, 10.0, 10.0));
        assert!((scaled.x - 0.0).abs() < 1e-9);
        assert!((scaled.y - 422.0).abs() < 1e-9);
    }
}
