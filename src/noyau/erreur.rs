// src/noyau/erreur.rs
//
// Erreurs du noyau (valeurs + arbres).
// - Aucune ne traverse la frontière du moteur de saisie : le moteur les
//   absorbe (no-op silencieux) et l’affichage les rend en "n/a".

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Texte mal formé (caractère inconnu, séparateur répété, vide…).
    #[error("lecture impossible de {texte:?} : {raison}")]
    Parse { texte: String, raison: &'static str },

    /// Opération entre deux genres de valeurs incompatibles (ex: DMS + HMS).
    #[error("opérandes incompatibles : {gauche} et {droite}")]
    IncompatibleOperands {
        gauche: &'static str,
        droite: &'static str,
    },

    #[error("division par zéro")]
    DivideByZero,

    /// Garde-fou : dépassement de capacité entière.
    #[error("dépassement de capacité")]
    Overflow,
}

impl CalcError {
    pub(crate) fn parse(texte: &str, raison: &'static str) -> Self {
        CalcError::Parse {
            texte: texte.to_string(),
            raison,
        }
    }
}
