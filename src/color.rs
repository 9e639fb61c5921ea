use std::fmt;

use palette::{Hsl, IntoColor, Srgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rgba – renderer-neutral colour
// ---------------------------------------------------------------------------

/// An sRGB colour with straight (unmultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }
}

/// CSS form, e.g. `rgba(75,192,192,0.6)`.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alpha = (self.a as f32 / 255.0 * 100.0).round() / 100.0;
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }
}

/// The dashboard's bar colours, 0.6 alpha.
pub const DEFAULT_PALETTE: [Rgba; 6] = [
    Rgba::rgba(75, 192, 192, 153),
    Rgba::rgba(153, 102, 255, 153),
    Rgba::rgba(255, 159, 64, 153),
    Rgba::rgba(255, 99, 132, 153),
    Rgba::rgba(54, 162, 235, 153),
    Rgba::rgba(255, 206, 86, 153),
];

pub const FREE_COLOR: Rgba = Rgba::rgb(0, 0, 255);
pub const PAID_COLOR: Rgba = Rgba::rgb(255, 165, 0);

/// Most-rated bars are coloured by app type: `Free` is blue, anything else orange.
pub fn type_color(app_type: &str) -> Rgba {
    if app_type == "Free" {
        FREE_COLOR
    } else {
        PAID_COLOR
    }
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgba> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgba::rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Colour assignment strategies
// ---------------------------------------------------------------------------

/// Which strategy series colours come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorMode {
    /// Fixed cyclic palette ([`DEFAULT_PALETTE`]).
    #[default]
    Palette,
    /// Evenly spaced hues over the number of labels.
    Hues,
    /// A fresh random colour per label. A seed makes the sequence reproducible.
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl ColorMode {
    pub fn scheme(&self) -> Box<dyn ColorScheme> {
        match self {
            ColorMode::Palette => Box::new(CyclicPalette::default()),
            ColorMode::Hues => Box::new(HuePalette),
            ColorMode::Random { seed: Some(seed) } => Box::new(RandomColors::seeded(*seed)),
            ColorMode::Random { seed: None } => Box::new(RandomColors::from_entropy()),
        }
    }
}

/// Hands out one colour per label of a chart series.
pub trait ColorScheme {
    fn assign(&mut self, count: usize) -> Vec<Rgba>;
}

/// Colour `i` is `palette[i % palette.len()]`.
#[derive(Debug, Clone)]
pub struct CyclicPalette {
    colors: Vec<Rgba>,
}

impl CyclicPalette {
    /// Falls back to [`DEFAULT_PALETTE`] when `colors` is empty.
    pub fn new(colors: Vec<Rgba>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            CyclicPalette { colors }
        }
    }
}

impl Default for CyclicPalette {
    fn default() -> Self {
        CyclicPalette {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl ColorScheme for CyclicPalette {
    fn assign(&mut self, count: usize) -> Vec<Rgba> {
        self.colors.iter().copied().cycle().take(count).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HuePalette;

impl ColorScheme for HuePalette {
    fn assign(&mut self, count: usize) -> Vec<Rgba> {
        generate_palette(count)
    }
}

#[derive(Debug, Clone)]
pub struct RandomColors {
    rng: StdRng,
}

impl RandomColors {
    pub fn seeded(seed: u64) -> Self {
        RandomColors {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        RandomColors {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ColorScheme for RandomColors {
    fn assign(&mut self, count: usize) -> Vec<Rgba> {
        (0..count)
            .map(|_| {
                let [_, r, g, b] = self.rng.gen_range(0..0x0100_0000u32).to_be_bytes();
                Rgba::rgb(r, g, b)
            })
            .collect()
    }
}
