//! Organism-specific prompt templates.
//!
//! Every template the proxy sends upstream is derived from an
//! [`OrganismProfile`], selected once at startup through `GENELAB_ORGANISM`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organism {
    #[default]
    Mouse,
    Rat,
}

impl Organism {
    pub fn profile(&self) -> OrganismProfile {
        match self {
            Organism::Mouse => OrganismProfile::mouse(),
            Organism::Rat => OrganismProfile::rat(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Organism::Mouse => "mouse",
            Organism::Rat => "rat",
        }
    }
}

impl FromStr for Organism {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mouse" | "mus musculus" => Ok(Organism::Mouse),
            "rat" | "rattus norvegicus" => Ok(Organism::Rat),
            other => Err(format!("Unsupported organism: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrganismProfile {
    pub organism: Organism,
    /// "mouse", "rat"
    pub common_name: &'static str,
    pub scientific_name: &'static str,
    /// Traits the image model is steered away from.
    pub negative_traits: Vec<&'static str>,
}

const SHARED_NEGATIVE_TRAITS: &[&str] = &[
    "cartoon",
    "anime",
    "illustration",
    "painting",
    "drawing",
    "blurry",
    "low quality",
    "deformed",
    "poorly drawn",
    "extra heads",
    "multiple bodies",
    "human features",
    "normal eyes when description says no eyes",
    "eyes visible when description says eyeless or without eyes",
];

impl OrganismProfile {
    pub fn mouse() -> Self {
        Self::with_names(Organism::Mouse, "mouse", "Mus musculus")
    }

    pub fn rat() -> Self {
        Self::with_names(Organism::Rat, "rat", "Rattus norvegicus")
    }

    fn with_names(
        organism: Organism,
        common_name: &'static str,
        scientific_name: &'static str,
    ) -> Self {
        let normal_anatomy: &'static str = match organism {
            Organism::Mouse => "normal mouse with standard anatomy",
            Organism::Rat => "normal rat with standard anatomy",
        };
        let mut negative_traits = vec![normal_anatomy];
        negative_traits.extend_from_slice(SHARED_NEGATIVE_TRAITS);

        Self {
            organism,
            common_name,
            scientific_name,
            negative_traits,
        }
    }

    /// "laboratory mouse (Mus musculus)"
    pub fn lab_label(&self) -> String {
        format!(
            "laboratory {} ({})",
            self.common_name, self.scientific_name
        )
    }

    /// Wrap a caller's phenotype description in the image template.
    pub fn enhance(&self, prompt: &str) -> String {
        let animal = self.common_name;
        format!(
            "High quality scientific photograph of a genetically modified {label}.\n\
             \n\
             CRITICAL GENETIC MODIFICATIONS - THESE MUST BE VISIBLE:\n\
             {prompt}\n\
             \n\
             Important: If the description mentions \"without eyes\" or \"no eyes\" or \"eyeless\", \
             the {animal} MUST have smooth skin where eyes would be, NO visible eyes at all.\n\
             If the description mentions \"extra legs\" or \"additional limbs\", ALL extra limbs must be clearly visible.\n\
             If the description mentions color/fur mutations, the entire body must show the specified coloration.\n\
             \n\
             Style: Photorealistic scientific specimen photography, laboratory setting, white background, \
             detailed anatomy, 4K quality.\n",
            label = self.lab_label(),
        )
    }

    pub fn negative_prompt(&self) -> String {
        self.negative_traits.join(",\n")
    }

    /// Persona instruction seeded as the first user turn of every chat session.
    pub fn chat_system_instruction(&self) -> String {
        format!(
            "You are a veterinary geneticist specializing in {label}. \
             Answer questions about genetic diseases, inherited disorders, gene knockouts and \
             their phenotypes in {plural}, including symptoms, affected genes, inheritance \
             patterns and husbandry considerations. Keep answers concise and structured, using \
             **bold** headers and bullet lists where helpful. If a question is not about {animal} \
             genetics or health, politely steer the conversation back to that topic.",
            label = self.lab_label(),
            plural = self.plural(),
            animal = self.common_name,
        )
    }

    pub fn chat_acknowledgment(&self) -> String {
        format!(
            "Understood. I'm ready to answer questions about genetic diseases in {}.",
            self.plural()
        )
    }

    fn plural(&self) -> &'static str {
        match self.organism {
            Organism::Mouse => "laboratory mice",
            Organism::Rat => "laboratory rats",
        }
    }
}

impl Default for OrganismProfile {
    fn default() -> Self {
        Self::mouse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhanced_prompt_repeats_caller_text_verbatim() {
        let profile = OrganismProfile::mouse();
        let prompt = "a mouse with no eyes and six legs, glowing green fur";
        let enhanced = profile.enhance(prompt);

        assert!(enhanced.contains("laboratory mouse (Mus musculus)"));
        assert!(enhanced.contains(&format!("MUST BE VISIBLE:\n{}\n", prompt)));
        assert!(enhanced.contains("the mouse MUST have smooth skin"));
        assert!(enhanced.contains("extra limbs must be clearly visible"));
        assert!(enhanced.trim_end().ends_with("4K quality."));
    }

    #[test]
    fn rat_profile_changes_framing() {
        let enhanced = OrganismProfile::rat().enhance("hairless");
        assert!(enhanced.contains("laboratory rat (Rattus norvegicus)"));
        assert!(!enhanced.contains("Mus musculus"));
        assert!(OrganismProfile::rat()
            .negative_prompt()
            .starts_with("normal rat with standard anatomy"));
    }

    #[test]
    fn negative_prompt_lists_every_trait() {
        let negative = OrganismProfile::mouse().negative_prompt();
        for token in ["cartoon", "anime", "human features", "eyeless or without eyes"] {
            assert!(negative.contains(token), "missing {}", token);
        }
        assert_eq!(negative.split(",\n").count(), SHARED_NEGATIVE_TRAITS.len() + 1);
    }

    #[test]
    fn organism_parses_case_insensitively() {
        assert_eq!("Rat".parse::<Organism>().unwrap(), Organism::Rat);
        assert_eq!(" MOUSE ".parse::<Organism>().unwrap(), Organism::Mouse);
        assert!("hamster".parse::<Organism>().is_err());
    }

    #[test]
    fn chat_persona_names_the_species() {
        let profile = OrganismProfile::rat();
        assert!(profile.chat_system_instruction().contains("Rattus norvegicus"));
        assert!(profile.chat_acknowledgment().contains("laboratory rats"));
    }
}
