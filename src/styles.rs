//! The style catalog.
//!
//! A fixed, ordered list of presets. The first entry is the default
//! selection. Order is the order shown in the style picker.

use crate::types::StylePreset;

/// All style presets, in display order.
pub const CATALOG: &[StylePreset] = &[
    StylePreset {
        id: "photorealistic",
        name: "Photorealistic",
        prompt: "hyper-realistic photography, 8k resolution, cinematic lighting",
        icon: "📷",
    },
    StylePreset {
        id: "anime",
        name: "Anime",
        prompt: "high quality anime style, vibrant colors, makoto shinkai style",
        icon: "🌸",
    },
    StylePreset {
        id: "cyberpunk",
        name: "Cyberpunk",
        prompt: "cyberpunk aesthetic, neon lights, futuristic city, synthwave colors",
        icon: "🌃",
    },
    StylePreset {
        id: "minimalist",
        name: "Minimalist",
        prompt: "flat minimalist design, clean lines, pastel colors, elegant",
        icon: "⚪",
    },
    StylePreset {
        id: "fantasy",
        name: "Fantasy",
        prompt: "epic fantasy art, magical atmosphere, intricate details, ethereal",
        icon: "🐉",
    },
    StylePreset {
        id: "nature",
        name: "Nature",
        prompt: "breathtaking landscape, nature photography, golden hour, serene",
        icon: "🌿",
    },
    StylePreset {
        id: "abstract",
        name: "Abstract",
        prompt: "abstract fluid art, dynamic flow, artistic composition",
        icon: "🎨",
    },
    StylePreset {
        id: "pixel",
        name: "Pixel Art",
        prompt: "retro pixel art, 16-bit style, nostalgic gaming aesthetic",
        icon: "👾",
    },
];

/// The default preset (first catalog entry).
pub fn default_style() -> &'static StylePreset {
    &CATALOG[0]
}

/// Look up a preset by index, clamping out-of-range indices to the default.
pub fn style_at(index: usize) -> &'static StylePreset {
    CATALOG.get(index).unwrap_or_else(default_style)
}

/// Look up a preset by its identifier (case-insensitive).
pub fn find_style(id: &str) -> Option<(usize, &'static StylePreset)> {
    CATALOG
        .iter()
        .enumerate()
        .find(|(_, style)| style.id.eq_ignore_ascii_case(id.trim()))
}

/// Index of the next preset, wrapping at the end.
pub fn next_index(index: usize) -> usize {
    (index + 1) % CATALOG.len()
}

/// Index of the previous preset, wrapping at the start.
pub fn prev_index(index: usize) -> usize {
    if index == 0 || index >= CATALOG.len() {
        CATALOG.len() - 1
    } else {
        index - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn default_is_first_entry() {
        assert_eq!(default_style().id, "photorealistic");
        assert_eq!(style_at(999), default_style());
    }

    #[test]
    fn find_style_ignores_case() {
        let (index, style) = find_style("PIXEL").unwrap();
        assert_eq!(index, 7);
        assert_eq!(style.prompt, "retro pixel art, 16-bit style, nostalgic gaming aesthetic");
        assert!(find_style("watercolor").is_none());
    }

    #[test]
    fn cycling_wraps_both_ways() {
        let last = CATALOG.len() - 1;
        assert_eq!(next_index(last), 0);
        assert_eq!(prev_index(0), last);
        assert_eq!(next_index(0), 1);
        assert_eq!(prev_index(1), 0);
    }
}
