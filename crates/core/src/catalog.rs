//! Fixed, ordered skill lists per sport.
//!
//! The catalog is deploy-time configuration: it drives which skills appear on
//! the progress chart and in which order. A sport without an entry yields an
//! empty chart.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Slug, SlugError, SkillKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Slug(#[from] SlugError),

    #[error("sport {0} is listed twice")]
    DuplicateSport(String),

    #[error("sport {0} has an empty skill list")]
    NoSkills(String),

    #[error("sport {sport} has a blank skill name")]
    BlankSkill { sport: String },

    #[error("sport {sport} lists skill {skill:?} twice")]
    DuplicateSkill { sport: String, skill: String },
}

/// Catalog entry for one sport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSport {
    pub slug: Slug,
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCatalog {
    sports: Vec<CatalogSport>,
}

const BUILTIN: &[(&str, &str, &[&str])] = &[
    (
        "futebol",
        "Futebol",
        &["Chute", "Passe", "Velocidade", "Movimentação", "Explosão", "Drible", "Impulsão"],
    ),
    (
        "basquete",
        "Basquete",
        &["Arremesso", "Impulsão", "Passe", "Bandeja", "Movimentação", "Defesa", "Drible"],
    ),
    (
        "volei",
        "Vôlei",
        &["Impulsão", "Levantamento", "Ataque", "Defesa", "Movimentação", "Bloqueio"],
    ),
    (
        "futsal",
        "Futsal",
        &["Chute", "Passe", "Movimentação", "Físico", "Aceleração", "Marcação", "Drible"],
    ),
    (
        "handebol",
        "Handebol",
        &["Arremesso", "Passe", "Defesa", "Movimentação", "Físico", "Drible"],
    ),
    (
        "tenis",
        "Tênis",
        &["Backhand", "Forehand", "Saque", "Defesa", "Velocidade", "Agilidade"],
    ),
    (
        "natacao",
        "Natação",
        &[
            "Nado Crawl",
            "Nado Borboleta",
            "Nado de Costas",
            "Nado Peito",
            "Resistência",
            "Fôlego",
        ],
    ),
    (
        "surf",
        "Surf",
        &["Drop", "Remada", "Tubo", "Rasgada", "Cut Back", "Batida", "Duck Dive"],
    ),
    (
        "box",
        "Box",
        &[
            "Jab",
            "Direto",
            "Cruzado",
            "Uppercut",
            "Gancho",
            "Esquiva",
            "Defesa",
            "Movimentação",
        ],
    ),
    (
        "jiu-jitsu",
        "Jiu-Jitsu",
        &["Guarda", "Passagem", "Montada", "Finalizações", "Quedas", "Defesa", "Transições"],
    ),
    (
        "futevolei",
        "Futevôlei",
        &["Ataque", "Defesa", "Levantamento", "Recepção", "Saque", "Movimentação"],
    ),
    (
        "corrida",
        "Corrida",
        &["Velocidade", "Resistência", "Fôlego", "Técnica", "Ritmo", "Explosão"],
    ),
];

impl SkillCatalog {
    /// The catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN.iter().map(|(slug, name, skills)| {
            (
                (*slug).to_owned(),
                (*name).to_owned(),
                skills.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>(),
            )
        });
        // The builtin table is covered by `builtin_catalog_is_valid`.
        Self::from_entries(entries).unwrap_or(Self { sports: Vec::new() })
    }

    /// Builds a catalog from `(slug, display name, skills)` entries.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for invalid slugs, duplicate sports, empty skill
    /// lists, blank names or skills that share a canonical key.
    pub fn from_entries<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (String, String, Vec<String>)>,
    {
        let mut seen_sports = HashSet::new();
        let mut sports = Vec::new();

        for (slug, name, skills) in entries {
            let slug = Slug::new(slug)?;
            if !seen_sports.insert(slug.clone()) {
                return Err(CatalogError::DuplicateSport(slug.to_string()));
            }
            if skills.is_empty() {
                return Err(CatalogError::NoSkills(slug.to_string()));
            }

            let mut seen_keys = HashSet::new();
            let mut cleaned = Vec::with_capacity(skills.len());
            for skill in skills {
                let key = SkillKey::new(&skill).map_err(|_| CatalogError::BlankSkill {
                    sport: slug.to_string(),
                })?;
                if !seen_keys.insert(key) {
                    return Err(CatalogError::DuplicateSkill {
                        sport: slug.to_string(),
                        skill,
                    });
                }
                cleaned.push(skill.trim().to_owned());
            }

            sports.push(CatalogSport {
                slug,
                name,
                skills: cleaned,
            });
        }

        Ok(Self { sports })
    }

    /// Ordered skill names for a sport; empty for unknown sports.
    #[must_use]
    pub fn skills_for(&self, slug: &str) -> &[String] {
        self.sports
            .iter()
            .find(|s| s.slug.as_str() == slug)
            .map_or(&[], |s| s.skills.as_slice())
    }

    /// Returns true if `skill_name` is one of the sport's catalog skills.
    #[must_use]
    pub fn contains(&self, slug: &str, skill_name: &str) -> bool {
        let Ok(key) = SkillKey::new(skill_name) else {
            return false;
        };
        self.skills_for(slug)
            .iter()
            .any(|s| SkillKey::new(s).is_ok_and(|k| k == key))
    }

    pub fn sports(&self) -> impl Iterator<Item = &CatalogSport> {
        self.sports.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sports.is_empty()
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
