//! Configuration de la calculatrice.
//!
//! Lue depuis les variables d’environnement, avec repli sur les valeurs par défaut.
//! - `CALC_MODE`    : onglet affiché au démarrage (`dms` | `hms`)
//! - `CALC_LARGEUR` : largeur fixe des colonnes de valeurs (bornée à 8..=40)

use std::env;

use crate::noyau::expr::LARGEUR_DEFAUT;
use crate::noyau::Mode;

const LARGEUR_MIN: usize = 8;
const LARGEUR_MAX: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigCalc {
    /// Onglet actif au lancement
    pub mode: Mode,

    /// Largeur des valeurs dans le transcript
    pub largeur: usize,
}

impl Default for ConfigCalc {
    fn default() -> Self {
        Self {
            mode: Mode::Dms,
            largeur: LARGEUR_DEFAUT,
        }
    }
}

impl ConfigCalc {
    /// Charge la configuration depuis l’environnement du processus.
    pub fn load() -> Result<Self, ConfigError> {
        Self::depuis(|cle| env::var(cle).ok())
    }

    /// Même lecture, sur une source quelconque (tests).
    pub fn depuis(lire: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ConfigCalc {
            mode: lire("CALC_MODE")
                .unwrap_or_else(|| "dms".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CALC_MODE".to_string()))?,

            largeur: lire("CALC_LARGEUR")
                .unwrap_or_else(|| LARGEUR_DEFAUT.to_string())
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue("CALC_LARGEUR".to_string()))?
                .clamp(LARGEUR_MIN, LARGEUR_MAX),
        };

        Ok(config)
    }
}

/// Erreurs de configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("valeur invalide pour {0}")]
    InvalidValue(String),
}
