//! Noyau sexagésimal (pur, sans I/O)
//!
//! Organisation interne :
//! - erreur.rs    : CalcError (lecture, opérandes incompatibles, division par zéro)
//! - systeme.rs   : Mode DMS/HMS + table de comportement par mode
//! - valeur.rs    : Value (arithmétique base 60, normalisation, lecture, affichage)
//! - expr.rs      : Expr (arbre immuable) + registre de lignes
//! - saisie.rs    : InputEngine (machine à états, une touche à la fois)
//! - affichage.rs : projection état -> lignes visibles

pub mod affichage;
pub mod erreur;
pub mod expr;
pub mod saisie;
pub mod systeme;
pub mod valeur;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::CalcError;
pub use expr::{DisplayLine, Expr, Operator, Trailing};
pub use saisie::{Event, InputEngine};
pub use systeme::Mode;
pub use valeur::{Hint, Value};
