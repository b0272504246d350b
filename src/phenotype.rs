//! Turns structured phenotype choices into natural-language image prompts.
//!
//! Feature sliders run 0-100 and are mapped to qualitative descriptors via
//! threshold tables; color swatches are mapped back to their names.

use crate::prompt::OrganismProfile;
use serde::{Deserialize, Serialize};

pub type DescriptorTable = &'static [(u8, &'static str)];

pub const SIZE_DESCRIPTORS: DescriptorTable = &[
    (0, "extremely small"),
    (25, "small"),
    (50, "average sized"),
    (75, "large"),
    (100, "extremely large"),
];

pub const LENGTH_DESCRIPTORS: DescriptorTable = &[
    (0, "very short"),
    (25, "short"),
    (50, "medium length"),
    (75, "long"),
    (100, "very long"),
];

pub const COLOR_SWATCHES: &[(&str, &str)] = &[
    ("Brown", "#8B4513"),
    ("White", "#FFFFFF"),
    ("Black", "#000000"),
    ("Gray", "#808080"),
    ("Pink", "#FFC0CB"),
    ("Cream", "#FFFDD0"),
    ("Auburn", "#A52A2A"),
    ("Tan", "#D2B48C"),
];

/// Nearest-threshold lookup: a value between two keys takes the lower one
/// below their midpoint and the upper one from the midpoint on.
pub fn descriptor(value: u8, table: DescriptorTable) -> &'static str {
    for pair in table.windows(2) {
        let (low, low_name) = pair[0];
        let (high, high_name) = pair[1];
        if value >= low && value <= high {
            let midpoint = (f32::from(low) + f32::from(high)) / 2.0;
            return if f32::from(value) < midpoint {
                low_name
            } else {
                high_name
            };
        }
    }
    table.last().map(|(_, name)| *name).unwrap_or("")
}

pub fn fur_density_descriptor(value: u8) -> &'static str {
    match value {
        76..=u8::MAX => "very thick",
        51..=75 => "thick",
        26..=50 => "normal",
        _ => "sparse",
    }
}

pub fn paw_size_descriptor(value: u8) -> &'static str {
    match value {
        76..=u8::MAX => "large",
        51..=75 => "average",
        _ => "small",
    }
}

pub fn swatch_name(hex: &str) -> Option<&'static str> {
    COLOR_SWATCHES
        .iter()
        .find(|(_, value)| value.eq_ignore_ascii_case(hex))
        .map(|(name, _)| *name)
}

/// Swatch name for `hex`, or the hex string itself when it is not a swatch.
pub fn color_name(hex: &str) -> String {
    swatch_name(hex)
        .map(str::to_string)
        .unwrap_or_else(|| hex.to_string())
}

macro_rules! trait_choice {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? } default $default:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

trait_choice!(FurPattern {
    Solid => "solid",
    Spotted => "spotted",
    Striped => "striped",
    Patched => "patched",
    Gradient => "gradient",
    Mottled => "mottled",
} default Solid);

trait_choice!(TailShape {
    LongTapered => "long-tapered",
    ShortStubby => "short-stubby",
    Thick => "thick",
    Thin => "thin",
    Bushy => "bushy",
    Hairless => "hairless",
} default LongTapered);

trait_choice!(EarShape {
    Rounded => "rounded",
    Pointed => "pointed",
    LargeFloppy => "large-floppy",
    SmallPerky => "small-perky",
    BatLike => "bat-like",
} default Rounded);

trait_choice!(FurTexture {
    Smooth => "smooth",
    Fluffy => "fluffy",
    Coarse => "coarse",
    Silky => "silky",
    Wiry => "wiry",
} default Smooth);

trait_choice!(BodyBuild {
    Slim => "slim",
    Average => "average",
    Muscular => "muscular",
    Stocky => "stocky",
    Plump => "plump",
} default Average);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureSliders {
    pub body_size: u8,
    pub leg_length: u8,
    pub tail_length: u8,
    pub ear_size: u8,
    pub whisker_length: u8,
    pub fur_density: u8,
    pub snout_length: u8,
    pub eye_size: u8,
    pub neck_length: u8,
    pub paw_size: u8,
}

impl Default for FeatureSliders {
    fn default() -> Self {
        Self {
            body_size: 50,
            leg_length: 50,
            tail_length: 50,
            ear_size: 50,
            whisker_length: 50,
            fur_density: 50,
            snout_length: 50,
            eye_size: 50,
            neck_length: 50,
            paw_size: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorChoices {
    pub body_color: String,
    pub tail_color: String,
    pub eye_color: String,
    pub ear_color: String,
    pub nose_color: String,
}

impl Default for ColorChoices {
    fn default() -> Self {
        Self {
            body_color: "#8B4513".to_string(),
            tail_color: "#FFC0CB".to_string(),
            eye_color: "#FF0000".to_string(),
            ear_color: "#8B4513".to_string(),
            nose_color: "#FFB6C1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraitSelections {
    pub fur_pattern: FurPattern,
    pub tail_shape: TailShape,
    pub ear_shape: EarShape,
    pub fur_texture: FurTexture,
    pub body_build: BodyBuild,
}

/// A complete phenotype design as assembled by the lab UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhenotypeDesign {
    pub features: FeatureSliders,
    pub colors: ColorChoices,
    pub selections: TraitSelections,
}

impl PhenotypeDesign {
    pub fn to_prompt(&self, profile: &OrganismProfile) -> String {
        let f = &self.features;
        let s = &self.selections;
        let c = &self.colors;

        // Hex case is ignored for every swatch, ears included.
        let ear_color = swatch_name(&c.ear_color).unwrap_or("matching body");

        format!(
            "A photorealistic {label} with the following detailed characteristics:\n\
             Body: {body_size} body with {build} build, {density} {texture} fur with {pattern} pattern in {body_color} color.\n\
             Head: {snout} snout, {ear_size} {ear_shape} ears in {ear_color} color, {eye_size} {eye_color} eyes.\n\
             Limbs: {legs} legs with {paws} paws.\n\
             Tail: {tail} {tail_shape} tail in {tail_color} color.\n\
             Details: {whiskers} whiskers.\n\
             Style: High quality, detailed, scientific illustration, white background, clear focus.",
            label = profile.lab_label(),
            body_size = descriptor(f.body_size, SIZE_DESCRIPTORS),
            build = s.body_build,
            density = fur_density_descriptor(f.fur_density),
            texture = s.fur_texture,
            pattern = s.fur_pattern,
            body_color = color_name(&c.body_color),
            snout = descriptor(f.snout_length, LENGTH_DESCRIPTORS),
            ear_size = descriptor(f.ear_size, SIZE_DESCRIPTORS),
            ear_shape = s.ear_shape,
            eye_size = descriptor(f.eye_size, SIZE_DESCRIPTORS),
            eye_color = color_name(&c.eye_color),
            legs = descriptor(f.leg_length, LENGTH_DESCRIPTORS),
            paws = paw_size_descriptor(f.paw_size),
            tail = descriptor(f.tail_length, LENGTH_DESCRIPTORS),
            tail_shape = s.tail_shape,
            tail_color = color_name(&c.tail_color),
            whiskers = descriptor(f.whisker_length, LENGTH_DESCRIPTORS),
        )
    }
}

/// Gene hit as returned by the RAG lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub gene_symbol: String,
    #[serde(default)]
    pub phenotypes: Vec<PhenotypeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeRecord {
    #[serde(default)]
    pub phenotype_name: Option<String>,
}

const ENRICH_GENE_LIMIT: usize = 3;
const ENRICH_PHENOTYPES_PER_GENE: usize = 3;

/// Build the image prompt for a free-text request enriched with gene hits.
pub fn enrich_with_genes(prompt: &str, genes: &[GeneRecord], profile: &OrganismProfile) -> String {
    let top = &genes[..genes.len().min(ENRICH_GENE_LIMIT)];

    let mut traits: Vec<&str> = Vec::new();
    for gene in top {
        for name in gene
            .phenotypes
            .iter()
            .take(ENRICH_PHENOTYPES_PER_GENE)
            .filter_map(|p| p.phenotype_name.as_deref())
        {
            if !traits.contains(&name) {
                traits.push(name);
            }
        }
    }

    let mut parts = vec![format!(
        "A photorealistic genetically modified {} based on this description: {}.",
        profile.lab_label(),
        prompt
    )];
    if !traits.is_empty() {
        parts.push(format!("Visible phenotypic traits: {}.", traits.join(", ")));
    }
    if !top.is_empty() {
        let symbols: Vec<&str> = top.iter().map(|g| g.gene_symbol.as_str()).collect();
        parts.push(format!("Genes involved: {}.", symbols.join(", ")));
    }
    parts.push(
        "Scientific illustration, laboratory setting, high detail, 4k photography, \
         clear anatomical features showing the genetic modifications."
            .to_string(),
    );
    parts.join(" ")
}
