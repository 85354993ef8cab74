//! Species dispatch.
//!
//! Free-text species names are resolved through an alias table rather than
//! string comparisons scattered across the engines. Anything the table does
//! not know becomes [`Species::Other`] with `recognized == false`, which the
//! engines surface as an `UnrecognizedSpecies` note.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
    /// Generic, species-agnostic rule set.
    Other,
}

const SPECIES_ALIASES: &[(&str, Species)] = &[
    ("dog", Species::Dog),
    ("dogs", Species::Dog),
    ("canine", Species::Dog),
    ("puppy", Species::Dog),
    ("cat", Species::Cat),
    ("cats", Species::Cat),
    ("feline", Species::Cat),
    ("kitten", Species::Cat),
    ("bird", Species::Bird),
    ("birds", Species::Bird),
    ("avian", Species::Bird),
    ("parrot", Species::Bird),
    ("rabbit", Species::Rabbit),
    ("rabbits", Species::Rabbit),
    ("bunny", Species::Rabbit),
    ("other", Species::Other),
];

/// Outcome of resolving a free-text species name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesResolution {
    pub species: Species,
    pub recognized: bool,
    /// The caller's input, trimmed.
    pub provided: String,
}

impl Species {
    pub fn as_str(self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Bird => "bird",
            Species::Rabbit => "rabbit",
            Species::Other => "other",
        }
    }

    /// Look up a species by name or common alias (case-insensitive).
    pub fn lookup(name: &str) -> Option<Self> {
        let key = name.trim().to_lowercase();
        SPECIES_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, species)| *species)
    }

    /// Resolve a species name, falling back to [`Species::Other`].
    pub fn resolve(name: &str) -> SpeciesResolution {
        let provided = name.trim().to_string();
        match Self::lookup(&provided) {
            Some(species) => SpeciesResolution {
                species,
                recognized: true,
                provided,
            },
            None => SpeciesResolution {
                species: Species::Other,
                recognized: false,
                provided,
            },
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
