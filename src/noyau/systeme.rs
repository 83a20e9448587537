// src/noyau/systeme.rs
//
// Système de numération (DMS / HMS) : une table de comportement par mode.
// Le moteur de saisie ne « branche » jamais sur le mode : il lit la table
// (marqueurs, indice de lecture, tour complet).

use std::fmt;
use std::str::FromStr;

use super::valeur::{Hint, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Degrés-minutes (angles).
    Dms,
    /// Heures-minutes-secondes (durées).
    Hms,
}

/// Table de comportement d’un mode.
#[derive(Debug)]
pub struct TableMode {
    pub nom: &'static str,
    /// Marqueur de l’unité majeure (° ou h).
    pub majeur: char,
    /// Marqueur des minutes (' ou m).
    pub mineur: char,
    /// Marqueur terminal optionnel (s en HMS).
    pub terminal: Option<char>,
    pub unites: &'static [&'static str],
    pub hint: Hint,
}

static TABLE_DMS: TableMode = TableMode {
    nom: "DMS",
    majeur: '°',
    mineur: '\'',
    terminal: None,
    unites: &["degrés", "minutes"],
    hint: Hint::Dms,
};

static TABLE_HMS: TableMode = TableMode {
    nom: "HMS",
    majeur: 'h',
    mineur: 'm',
    terminal: Some('s'),
    unites: &["heures", "minutes", "secondes"],
    hint: Hint::Hms,
};

/// Tous les marqueurs connus, tous modes confondus.
pub const MARQUEURS: [char; 5] = ['°', '\'', 'h', 'm', 's'];

impl Mode {
    pub fn table(self) -> &'static TableMode {
        match self {
            Mode::Dms => &TABLE_DMS,
            Mode::Hms => &TABLE_HMS,
        }
    }

    /// Valeur retirée par le raccourci « −360 ».
    /// En HMS c’est un jour (24h), pas 360 heures.
    pub fn tour_complet(self) -> Value {
        match self {
            Mode::Dms => Value::dms(360, 0),
            Mode::Hms => Value::hms(24, 0, 0),
        }
    }

    /// Vrai si `c` est un marqueur de CE mode.
    pub fn est_marqueur(self, c: char) -> bool {
        let t = self.table();
        c == t.majeur || c == t.mineur || t.terminal == Some(c)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table().nom)
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dms" => Ok(Mode::Dms),
            "hms" => Ok(Mode::Hms),
            _ => Err(()),
        }
    }
}
