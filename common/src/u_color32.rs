use serde::{Deserialize, Serialize};

/// Unmultiplied sRGBA, the form colors take in the setting file.
///
/// [`egui::Color32`] is premultiplied, so a half transparent color read back
/// from it would not match what the user wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UColor32(pub [u8; 4]);

impl UColor32 {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const TEAL: Self = Self::from_rgb(0, 128, 128);

    #[inline(always)]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    #[inline(always)]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<egui::Color32> for UColor32 {
    #[inline(always)]
    fn from(value: egui::Color32) -> Self {
        Self(value.to_srgba_unmultiplied())
    }
}

impl From<UColor32> for egui::Color32 {
    #[inline(always)]
    fn from(value: UColor32) -> Self {
        let UColor32([r, g, b, a]) = value;
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}
