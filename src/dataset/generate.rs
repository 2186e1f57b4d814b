//! Synthetic datasets for benchmarking at arbitrary sizes.

use std::io::Write;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{DEFAULT_SEARCH_KEY, DEFAULT_SORT_KEY};

const WEAPONS: &[&str] = &[
    "AK-47", "M4A4", "M4A1-S", "AWP", "Desert Eagle", "USP-S", "Glock-18", "P250", "MP9",
    "FAMAS",
];

const FINISHES: &[&str] = &[
    "Redline", "Vulcan", "Asiimov", "Fire Serpent", "Case Hardened", "Hyper Beast", "Neon Rider",
    "Bloodsport", "Wasteland Rebel", "Safari Mesh", "Jungle Spray", "Printstream",
];

const WEARS: &[&str] = &[
    "Factory New",
    "Minimal Wear",
    "Field-Tested",
    "Well-Worn",
    "Battle-Scarred",
];

/// Parameters for [`write_synthetic`].
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub rows: usize,
    pub seed: u64,
    /// Exclusive upper bound for generated quantities.
    pub max_quantity: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            rows: 1000,
            seed: 42,
            max_quantity: 1000,
        }
    }
}

/// Write `options.rows` random rows with the default name and
/// quantity columns. The same seed always yields the same file.
pub fn write_synthetic<W: Write>(writer: W, options: GenerateOptions) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut out = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record([DEFAULT_SEARCH_KEY, DEFAULT_SORT_KEY])?;
    for _ in 0..options.rows {
        let name = format!(
            "{} | {} ({})",
            WEAPONS[rng.gen_range(0..WEAPONS.len())],
            FINISHES[rng.gen_range(0..FINISHES.len())],
            WEARS[rng.gen_range(0..WEARS.len())],
        );
        let quantity = rng.gen_range(0..options.max_quantity.max(1));
        out.write_record([name, quantity.to_string()])?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(options: GenerateOptions) -> String {
        let mut out = Vec::new();
        write_synthetic(&mut out, options).expect("generate");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn writes_header_and_requested_rows() {
        let text = generate(GenerateOptions {
            rows: 25,
            ..GenerateOptions::default()
        });

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Skin Name,Quantity"));
        assert_eq!(lines.count(), 25);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let options = GenerateOptions {
            rows: 50,
            seed: 7,
            max_quantity: 10,
        };
        assert_eq!(generate(options), generate(options));
        assert_ne!(
            generate(options),
            generate(GenerateOptions { seed: 8, ..options })
        );
    }
}
