//! Quantized color table with nearest-entry lookup.

use image::Rgba;

/// An ordered table of colors used for quantization.
///
/// Lookup is nearest-entry by sum of squared channel differences; ties are
/// broken by insertion order.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    entries: Vec<Rgba<u8>>,
}

impl ColorTable {
    /// Creates an empty table with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Creates a table from a fixed set of colors.
    pub fn from_colors(colors: Vec<Rgba<u8>>) -> Self {
        Self { entries: colors }
    }

    /// The standard 216-color web-safe table, 6 levels per channel.
    pub fn web_safe() -> Self {
        let mut entries = Vec::with_capacity(216);
        for r in 0..6u16 {
            for g in 0..6u16 {
                for b in 0..6u16 {
                    entries.push(Rgba([(r * 51) as u8, (g * 51) as u8, (b * 51) as u8, 255]));
                }
            }
        }
        Self { entries }
    }

    /// Number of entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no colors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Rgba<u8>> {
        self.entries.get(index).copied()
    }

    /// Returns true if `color` is already an entry.
    pub fn contains(&self, color: Rgba<u8>) -> bool {
        self.entries.contains(&color)
    }

    /// Appends a color to the table.
    pub fn push(&mut self, color: Rgba<u8>) {
        self.entries.push(color);
    }

    /// Index of the entry nearest to `color`, or `None` for an empty table.
    pub fn nearest_index(&self, color: Rgba<u8>) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let d = distance_sq(*entry, color);
            match best {
                // Strict less-than keeps the earliest entry on ties.
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// The entry nearest to `color`, or `None` for an empty table.
    pub fn convert(&self, color: Rgba<u8>) -> Option<Rgba<u8>> {
        self.nearest_index(color).map(|i| self.entries[i])
    }

    /// Iterates the table entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rgba<u8>> {
        self.entries.iter()
    }
}

/// Sum of squared channel differences across all four channels.
fn distance_sq(a: Rgba<u8>, b: Rgba<u8>) -> u32 {
    let mut sum = 0u32;
    for ch in 0..4 {
        let d = a[ch] as i32 - b[ch] as i32;
        sum += (d * d) as u32;
    }
    sum
}
