use serde::{Deserialize, Serialize};

/// Generation context used when a journey has no theme.
pub const NEUTRAL_CONTEXT: &str = "Neutral";

/// The shape of the memory particles piled up as answers are sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Stone,
    Feather,
}

/// Presentation tokens consumed by the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualStyle {
    pub preview: String,
    pub capsule_top: String,
    pub capsule_bottom: String,
}

/// The colour a user picks for their year. Chosen once per journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub style: VisualStyle,
    /// Free text threaded into review and chat requests to bias their tone.
    pub generation_context: String,
    pub particle_kind: ParticleKind,
    pub particle_color: String,
}

impl Theme {
    /// The built-in palette.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        CATALOG
            .iter()
            .map(|entry| Self {
                id: entry.id.to_string(),
                name: entry.name.to_string(),
                description: entry.description.to_string(),
                style: VisualStyle {
                    preview: entry.preview.to_string(),
                    capsule_top: entry.capsule_top.to_string(),
                    capsule_bottom: entry.capsule_bottom.to_string(),
                },
                generation_context: entry.generation_context.to_string(),
                particle_kind: entry.particle_kind,
                particle_color: entry.particle_color.to_string(),
            })
            .collect()
    }

    #[must_use]
    pub fn find(id: &str) -> Option<Self> {
        Self::catalog().into_iter().find(|theme| theme.id == id)
    }
}

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    preview: &'static str,
    capsule_top: &'static str,
    capsule_bottom: &'static str,
    generation_context: &'static str,
    particle_kind: ParticleKind,
    particle_color: &'static str,
}

const CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        id: "sunshine",
        name: "阳光金 · Sunshine",
        description: "流动的光斑，温暖的定力。",
        preview: "bg-gradient-to-br from-[#E6C767] to-[#B8933A]",
        capsule_top: "linear-gradient(135deg, #E6C767, #D4AC0D)",
        capsule_bottom: "linear-gradient(45deg, #B8933A, #E6C767)",
        generation_context: "Sunshine Gold. Tone: radiant, warm, optimistic, confident but grounded. \
                             Dwell on brightness and clarity, like the noon sun warming the earth.",
        particle_kind: ParticleKind::Stone,
        particle_color: "rgba(230, 199, 103, 0.9)",
    },
    CatalogEntry {
        id: "serene",
        name: "静谧蓝 · Serene",
        description: "深海的沉默，理性的回响。",
        preview: "bg-gradient-to-br from-[#8E9AAF] to-[#2C3E50]",
        capsule_top: "linear-gradient(135deg, #8E9AAF, #4A5D75)",
        capsule_bottom: "linear-gradient(45deg, #2C3E50, #8E9AAF)",
        generation_context: "Serene Blue. Tone: calm, deep, intellectual, a little melancholic \
                             yet at peace, like the deep sea.",
        particle_kind: ParticleKind::Feather,
        particle_color: "rgba(142, 154, 175, 0.6)",
    },
    CatalogEntry {
        id: "mint",
        name: "薄荷绿 · Healing",
        description: "新生的缝隙，治愈的呼吸。",
        preview: "bg-gradient-to-br from-[#A6B08E] to-[#5F6B4E]",
        capsule_top: "linear-gradient(135deg, #A6B08E, #7A8568)",
        capsule_bottom: "linear-gradient(45deg, #5F6B4E, #A6B08E)",
        generation_context: "Sage Green. Tone: healing, organic, growing, fresh. \
                             Dwell on recovery and nature.",
        particle_kind: ParticleKind::Feather,
        particle_color: "rgba(166, 176, 142, 0.6)",
    },
    CatalogEntry {
        id: "stoic",
        name: "沉稳灰 · Stoic",
        description: "极简的留白，内向的秩序。",
        preview: "bg-gradient-to-br from-[#C4C4C4] to-[#4A4A4A]",
        capsule_top: "linear-gradient(135deg, #C4C4C4, #777777)",
        capsule_bottom: "linear-gradient(45deg, #4A4A4A, #999999)",
        generation_context: "Stoic Gray. Tone: minimalist, rational, objective, quiet and strong. \
                             Dwell on structure and truth.",
        particle_kind: ParticleKind::Stone,
        particle_color: "rgba(150, 150, 150, 0.8)",
    },
    CatalogEntry {
        id: "maple",
        name: "枫叶红 · Maple",
        description: "燃烧的诗意，成熟的深情。",
        preview: "bg-gradient-to-br from-[#D96C63] to-[#8F3630]",
        capsule_top: "linear-gradient(135deg, #D96C63, #A6423A)",
        capsule_bottom: "linear-gradient(45deg, #8F3630, #D96C63)",
        generation_context: "Maple Red. Tone: deep, mature, passionate, poetic, autumnal. \
                             Dwell on harvest, settling, rich emotion and the beauty of passing time.",
        particle_kind: ParticleKind::Feather,
        particle_color: "rgba(217, 108, 99, 0.8)",
    },
];
