// SPDX-License-Identifier: Apache-2.0

pub mod layout;
pub mod pdf;
pub mod qr;

pub use pdf::render_badge_sheet;
