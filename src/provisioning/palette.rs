//! Accent colors for new channels.

use rand::Rng;

/// Forum topic icon colors accepted by the Bot API.
pub const ACCENT_PALETTE: [u32; 6] = [
    0x6FB9F0, // blue
    0xFFD67E, // yellow
    0xCB86DB, // violet
    0x8EEE98, // green
    0xFF93B2, // rose
    0xFB6F5F, // red
];

/// Pick an accent color.
pub fn pick_accent<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    ACCENT_PALETTE[rng.gen_range(0..ACCENT_PALETTE.len())]
}
