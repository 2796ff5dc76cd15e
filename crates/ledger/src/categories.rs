//! The fixed spending taxonomy: 16 categories grouped under 5 parents.
//!
//! Categories apply to expenses only; incomes carry none. Wire form is the
//! lowercase snake_case string (`"alimentacion"`), display form is the
//! accented label (`"Alimentación"`). Parsing folds case and accents so
//! both forms resolve.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Parent groups used by analysis and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryParent {
    GastosEsenciales,
    GastosPersonales,
    Financieros,
    Educacion,
    Otros,
}

impl CategoryParent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GastosEsenciales => "gastos_esenciales",
            Self::GastosPersonales => "gastos_personales",
            Self::Financieros => "financieros",
            Self::Educacion => "educacion",
            Self::Otros => "otros",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::GastosEsenciales => "Gastos Esenciales",
            Self::GastosPersonales => "Gastos Personales",
            Self::Financieros => "Financieros",
            Self::Educacion => "Educación",
            Self::Otros => "Otros",
        }
    }
}

/// A specific spending category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Vivienda,
    ServiciosBasicos,
    Alimentacion,
    Transporte,
    Salud,
    Entretenimiento,
    StreamingSuscripciones,
    Mascotas,
    CuidadoPersonal,
    DeudasPrestamos,
    AhorroInversion,
    Seguros,
    EducacionDesarrollo,
    RegalosCelebraciones,
    ViajesVacaciones,
    Imprevistos,
}

impl Category {
    pub const ALL: [Category; 16] = [
        Self::Vivienda,
        Self::ServiciosBasicos,
        Self::Alimentacion,
        Self::Transporte,
        Self::Salud,
        Self::Entretenimiento,
        Self::StreamingSuscripciones,
        Self::Mascotas,
        Self::CuidadoPersonal,
        Self::DeudasPrestamos,
        Self::AhorroInversion,
        Self::Seguros,
        Self::EducacionDesarrollo,
        Self::RegalosCelebraciones,
        Self::ViajesVacaciones,
        Self::Imprevistos,
    ];

    /// Returns the canonical wire string used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vivienda => "vivienda",
            Self::ServiciosBasicos => "servicios_basicos",
            Self::Alimentacion => "alimentacion",
            Self::Transporte => "transporte",
            Self::Salud => "salud",
            Self::Entretenimiento => "entretenimiento",
            Self::StreamingSuscripciones => "streaming_suscripciones",
            Self::Mascotas => "mascotas",
            Self::CuidadoPersonal => "cuidado_personal",
            Self::DeudasPrestamos => "deudas_prestamos",
            Self::AhorroInversion => "ahorro_inversion",
            Self::Seguros => "seguros",
            Self::EducacionDesarrollo => "educacion_desarrollo",
            Self::RegalosCelebraciones => "regalos_celebraciones",
            Self::ViajesVacaciones => "viajes_vacaciones",
            Self::Imprevistos => "imprevistos",
        }
    }

    /// Display label shown in lists and summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vivienda => "Vivienda",
            Self::ServiciosBasicos => "Servicios Básicos",
            Self::Alimentacion => "Alimentación",
            Self::Transporte => "Transporte",
            Self::Salud => "Salud",
            Self::Entretenimiento => "Entretenimiento",
            Self::StreamingSuscripciones => "Streaming y Suscripciones",
            Self::Mascotas => "Mascotas",
            Self::CuidadoPersonal => "Cuidado Personal",
            Self::DeudasPrestamos => "Deudas y Préstamos",
            Self::AhorroInversion => "Ahorro e Inversión",
            Self::Seguros => "Seguros",
            Self::EducacionDesarrollo => "Educación y Desarrollo",
            Self::RegalosCelebraciones => "Regalos y Celebraciones",
            Self::ViajesVacaciones => "Viajes y Vacaciones",
            Self::Imprevistos => "Imprevistos",
        }
    }

    pub fn parent(self) -> CategoryParent {
        match self {
            Self::Vivienda
            | Self::ServiciosBasicos
            | Self::Alimentacion
            | Self::Transporte
            | Self::Salud => CategoryParent::GastosEsenciales,
            Self::Entretenimiento
            | Self::StreamingSuscripciones
            | Self::Mascotas
            | Self::CuidadoPersonal => CategoryParent::GastosPersonales,
            Self::DeudasPrestamos | Self::AhorroInversion | Self::Seguros => {
                CategoryParent::Financieros
            }
            Self::EducacionDesarrollo => CategoryParent::Educacion,
            Self::RegalosCelebraciones | Self::ViajesVacaciones | Self::Imprevistos => {
                CategoryParent::Otros
            }
        }
    }

    /// Parses a category from its wire string or display label.
    ///
    /// Matching folds case, accents and separators, so `"Alimentación"`,
    /// `"alimentacion"` and `"ALIMENTACION"` all resolve to the same
    /// variant. Returns `None` for unknown strings.
    pub fn parse(raw: &str) -> Option<Category> {
        let needle = fold(raw);
        Self::ALL
            .into_iter()
            .find(|category| fold(category.as_str()) == needle || fold(category.label()) == needle)
    }
}

/// Lowercases, strips combining marks (NFKD) and normalizes separators.
fn fold(raw: &str) -> String {
    raw.trim()
        .nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_wire_and_label_forms() {
        assert_eq!(Category::parse("alimentacion"), Some(Category::Alimentacion));
        assert_eq!(Category::parse("Alimentación"), Some(Category::Alimentacion));
        assert_eq!(Category::parse("SALUD"), Some(Category::Salud));
        assert_eq!(
            Category::parse("Streaming y Suscripciones"),
            Some(Category::StreamingSuscripciones)
        );
        assert_eq!(Category::parse("cripto"), None);
    }

    #[test]
    fn every_category_has_a_parent() {
        assert_eq!(
            Category::Transporte.parent(),
            CategoryParent::GastosEsenciales
        );
        assert_eq!(Category::Seguros.parent(), CategoryParent::Financieros);
        assert_eq!(Category::Imprevistos.parent(), CategoryParent::Otros);
    }

    #[test]
    fn wire_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }
}
