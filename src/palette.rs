use crate::constants::SYNTHETIC_SEGMENT;
use crate::geometry::point::Point64;

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn new_opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }

    pub const fn with_opacity(&self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Packs as `0xRRGGBBAA`.
    pub fn to_u32(&self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopColors {
    pub fill: Rgba8,
    pub stroke: Rgba8,
}

const FILL_ALPHA: u8 = 0x40;

const LOOP_STROKES: [Rgba8; 8] = [
    Rgba8::new_opaque(0x1f, 0x77, 0xb4),
    Rgba8::new_opaque(0xd6, 0x27, 0x28),
    Rgba8::new_opaque(0x2c, 0xa0, 0x2c),
    Rgba8::new_opaque(0xff, 0x7f, 0x0e),
    Rgba8::new_opaque(0x94, 0x67, 0xbd),
    Rgba8::new_opaque(0x8c, 0x56, 0x4b),
    Rgba8::new_opaque(0xe3, 0x77, 0xc2),
    Rgba8::new_opaque(0x17, 0xbe, 0xcf),
];

const FALLBACK_STROKE: Rgba8 = Rgba8::new_opaque(0x80, 0x80, 0x80);

const SYNTHETIC_MARKER: Rgba8 = Rgba8::new_opaque(0xff, 0x00, 0xff);

const INHERITED_MARKER: Rgba8 = Rgba8::new_opaque(0x20, 0x20, 0x20);

/// Fill and stroke for a loop id. Ids `1..=8` map onto the table; everything
/// else, the untagged sentinel included, is grey.
pub fn loop_colors(loop_id: i32) -> LoopColors {
    let stroke = usize::try_from(loop_id)
        .ok()
        .and_then(|id| id.checked_sub(1))
        .and_then(|index| LOOP_STROKES.get(index))
        .copied()
        .unwrap_or(FALLBACK_STROKE);

    LoopColors {
        fill: stroke.with_opacity(FILL_ALPHA),
        stroke,
    }
}

/// Marker colour for a result vertex; synthetic vertices stand out.
pub fn vertex_marker(point: &Point64) -> Rgba8 {
    if point.segment_id == SYNTHETIC_SEGMENT {
        SYNTHETIC_MARKER
    } else {
        INHERITED_MARKER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_colors_table() {
        let first = loop_colors(1);

        assert_eq!(first.stroke, LOOP_STROKES[0]);
        assert_eq!(first.fill.a, FILL_ALPHA);
        assert_eq!(first.fill.with_opacity(u8::MAX), first.stroke);
        assert_ne!(loop_colors(2), loop_colors(3));
    }

    #[test]
    fn test_loop_colors_fallback() {
        assert_eq!(loop_colors(-1).stroke, FALLBACK_STROKE);
        assert_eq!(loop_colors(0).stroke, FALLBACK_STROKE);
        assert_eq!(loop_colors(9).stroke, FALLBACK_STROKE);
    }

    #[test]
    fn test_vertex_marker() {
        assert_eq!(vertex_marker(&Point64::synthetic(0, 0, 2)), SYNTHETIC_MARKER);
        assert_eq!(vertex_marker(&Point64::with_meta(0, 0, 3, 2)), INHERITED_MARKER);
    }

    #[test]
    fn test_packing() {
        let color = Rgba8::new(0x12, 0x34, 0x56, 0x78);

        assert_eq!(color.to_u32(), 0x1234_5678);
        assert_eq!(color.to_hex(), "#12345678");
    }
}
