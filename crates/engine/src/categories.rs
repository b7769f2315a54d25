//! Expense categories and the keyword categorizer.
//!
//! Descriptions written by users are free text in Spanish; when a
//! transaction arrives without an explicit category, [`classify`] assigns
//! one by substring matching against a fixed keyword table.
//!
//! The table order is part of the contract: the first category (in declared
//! order) with any matching keyword wins, so overlapping keywords across
//! categories resolve deterministically.

use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::EngineError;

/// The fixed set of transaction categories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(rename = "alimentación")]
    Alimentacion,
    Transporte,
    Entretenimiento,
    Servicios,
    Salud,
    Ropa,
    #[serde(rename = "educación")]
    Educacion,
    Hogar,
    #[default]
    Otros,
}

impl Category {
    /// Returns the canonical category string used in JSON and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alimentacion => "alimentación",
            Self::Transporte => "transporte",
            Self::Entretenimiento => "entretenimiento",
            Self::Servicios => "servicios",
            Self::Salud => "salud",
            Self::Ropa => "ropa",
            Self::Educacion => "educación",
            Self::Hogar => "hogar",
            Self::Otros => "otros",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "alimentación" => Ok(Self::Alimentacion),
            "transporte" => Ok(Self::Transporte),
            "entretenimiento" => Ok(Self::Entretenimiento),
            "servicios" => Ok(Self::Servicios),
            "salud" => Ok(Self::Salud),
            "ropa" => Ok(Self::Ropa),
            "educación" => Ok(Self::Educacion),
            "hogar" => Ok(Self::Hogar),
            "otros" => Ok(Self::Otros),
            other => Err(EngineError::InvalidField(format!(
                "invalid category: {other}"
            ))),
        }
    }
}

/// Keyword table, one entry per category except [`Category::Otros`].
///
/// Keywords are lowercase and accent-free; [`classify`] normalizes the
/// description the same way before matching. Declared order decides ties.
const CATEGORY_KEYWORDS: [(Category, &[&str]); 8] = [
    (
        Category::Alimentacion,
        &[
            "restaurante",
            "comida",
            "supermercado",
            "mercado",
            "cafe",
            "almuerzo",
            "cena",
            "desayuno",
            "panaderia",
            "pizza",
        ],
    ),
    (
        Category::Transporte,
        &[
            "uber",
            "taxi",
            "bus",
            "metro",
            "gasolina",
            "combustible",
            "peaje",
            "estacionamiento",
            "pasaje",
        ],
    ),
    (
        Category::Entretenimiento,
        &[
            "cine",
            "netflix",
            "spotify",
            "concierto",
            "teatro",
            "juego",
            "videojuego",
            "streaming",
        ],
    ),
    (
        Category::Servicios,
        &[
            "luz",
            "agua",
            "internet",
            "telefono",
            "celular",
            "electricidad",
            "cable",
        ],
    ),
    (
        Category::Salud,
        &[
            "farmacia",
            "medico",
            "doctor",
            "hospital",
            "clinica",
            "dentista",
            "medicina",
            "consulta",
        ],
    ),
    (
        Category::Ropa,
        &["ropa", "zapatos", "camisa", "pantalon", "vestido", "tienda"],
    ),
    (
        Category::Educacion,
        &[
            "curso",
            "libro",
            "universidad",
            "colegio",
            "escuela",
            "matricula",
            "clases",
        ],
    ),
    (
        Category::Hogar,
        &[
            "alquiler",
            "renta",
            "hipoteca",
            "mueble",
            "ferreteria",
            "limpieza",
            "hogar",
        ],
    ),
];

/// Lowercases, trims and strips diacritics so that "Panadería" matches the
/// keyword "panaderia".
fn normalize(description: &str) -> String {
    description
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Assigns a [`Category`] to a free-text transaction description.
///
/// Total over any input: no keyword match (including the empty string)
/// yields [`Category::Otros`]. First match in table order wins.
pub fn classify(description: &str) -> Category {
    let text = normalize(description);

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return category;
        }
    }

    Category::Otros
}
