// src/noyau/valeur.rs
//
// Valeur sexagésimale exacte (sans flottants).
// - Empty   : rien (affiché "n/a")
// - Integer : entier (diviseurs)
// - DegreesMinutes      : minutes rationnelles (dixièmes à l’affichage)
// - HoursMinutesSeconds : tout entier
//
// IMPORTANT :
// - normalise() ramène les unités subordonnées dans [0, 60) par retenue/emprunt,
//   mais ne replie JAMAIS degrés/heures modulo 360/24 (250°+251° = 501°, puis /2 = 250°30').
//   Le repli est un geste explicite (touche −360).
// - Affichage signe + grandeur : -0.1' s’affiche "-0°00'1" (et non "-1°59'9").
//   En lecture, un `-` en tête porte sur toutes les unités : "-1°30'" = -(1°30').
// - Toute arithmétique est vérifiée : dépassement => CalcError::Overflow, jamais de panique.

use std::fmt;
use std::ops::{Add, Div, Sub};

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Zero};

use super::erreur::CalcError;

/// Garde-fou : décimales de minutes acceptées à la lecture
/// (autant que de chiffres saisissables).
const MAX_DECIMALES: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Empty,
    Integer(i64),
    DegreesMinutes {
        degrees: i64,
        minutes: Rational64,
    },
    HoursMinutesSeconds {
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
}

/// Indice de lecture : système attendu pour un texte partiel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    Dms,
    Hms,
    Integer,
    /// Déduit des marqueurs présents (aucun marqueur => entier).
    Detect,
}

/// Système effectivement lu, une fois `Detect` résolu.
#[derive(Clone, Copy)]
enum Lecture {
    Entier,
    Dms,
    Hms,
}

impl Hint {
    fn resoudre(self, s: &str) -> Lecture {
        match self {
            Hint::Dms => Lecture::Dms,
            Hint::Hms => Lecture::Hms,
            Hint::Integer => Lecture::Entier,
            Hint::Detect if s.contains(&['°', '\''][..]) => Lecture::Dms,
            Hint::Detect if s.contains(&['h', 'm', 's'][..]) => Lecture::Hms,
            Hint::Detect => Lecture::Entier,
        }
    }
}

/* ------------------------ Constructeurs ------------------------ */

impl Value {
    /// DMS depuis des dixièmes de minute : `Value::dms(1, 23)` = 1°2.3'.
    pub fn dms(degrees: i64, dixiemes: i64) -> Value {
        Value::DegreesMinutes {
            degrees,
            minutes: Rational64::new(dixiemes, 10),
        }
    }

    pub fn hms(hours: i64, minutes: i64, seconds: i64) -> Value {
        Value::HoursMinutesSeconds {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn integer(i: i64) -> Value {
        Value::Integer(i)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Nom court du genre (messages d’erreur).
    pub fn genre(&self) -> &'static str {
        match self {
            Value::Empty => "vide",
            Value::Integer(_) => "entier",
            Value::DegreesMinutes { .. } => "DMS",
            Value::HoursMinutesSeconds { .. } => "HMS",
        }
    }

    fn incompatibles(&self, autre: &Value) -> CalcError {
        CalcError::IncompatibleOperands {
            gauche: self.genre(),
            droite: autre.genre(),
        }
    }
}

/* ------------------------ Normalisation ------------------------ */

impl Value {
    /// Forme canonique : minutes (et secondes) dans [0, 60).
    /// Degrés/heures non bornés (pas de repli 360/24).
    pub fn normalise(&self) -> Value {
        match self {
            Value::DegreesMinutes { degrees, minutes } => {
                let soixante = Rational64::from_integer(60);
                // retenue calculée sur les minutes seules : pas de degrés*60
                let retenue = (minutes / soixante).floor();
                Value::DegreesMinutes {
                    degrees: degrees.saturating_add(retenue.to_integer()),
                    minutes: minutes - retenue * soixante,
                }
            }
            Value::HoursMinutesSeconds {
                hours,
                minutes,
                seconds,
            } => {
                let m = minutes.saturating_add(seconds.div_euclid(60));
                Value::HoursMinutesSeconds {
                    hours: hours.saturating_add(m.div_euclid(60)),
                    minutes: m.rem_euclid(60),
                    seconds: seconds.rem_euclid(60),
                }
            }
            Value::Empty | Value::Integer(_) => self.clone(),
        }
    }
}

/* ------------------------ Arithmétique ------------------------ */

fn deborde<T>(x: Option<T>) -> Result<T, CalcError> {
    x.ok_or(CalcError::Overflow)
}

// Appels qualifiés : les traits Checked* importés masqueraient les méthodes
// inhérentes de i64 sur un `&i64`.
fn rat_add(a: &Rational64, b: &Rational64) -> Result<Rational64, CalcError> {
    deborde(CheckedAdd::checked_add(a, b))
}

fn rat_sub(a: &Rational64, b: &Rational64) -> Result<Rational64, CalcError> {
    deborde(CheckedSub::checked_sub(a, b))
}

fn rat_mul(a: &Rational64, b: &Rational64) -> Result<Rational64, CalcError> {
    deborde(CheckedMul::checked_mul(a, b))
}

fn rat_div(a: &Rational64, b: &Rational64) -> Result<Rational64, CalcError> {
    deborde(CheckedDiv::checked_div(a, b))
}

/// degrés*60 + minutes
fn minutes_totales(degrees: i64, minutes: &Rational64) -> Result<Rational64, CalcError> {
    let d = Rational64::from_integer(deborde(i64::checked_mul(degrees, 60))?);
    rat_add(&d, minutes)
}

/// heures*3600 + minutes*60 + secondes
fn secondes_totales(hours: i64, minutes: i64, seconds: i64) -> Result<i64, CalcError> {
    let h = deborde(i64::checked_mul(hours, 3600))?;
    let m = deborde(i64::checked_mul(minutes, 60))?;
    deborde(i64::checked_add(h, m).and_then(|t| i64::checked_add(t, seconds)))
}

impl Value {
    pub fn adding(&self, autre: &Value) -> Result<Value, CalcError> {
        match (self, autre) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(deborde(i64::checked_add(*a, *b))?)),
            (
                Value::DegreesMinutes { degrees: d1, minutes: m1 },
                Value::DegreesMinutes { degrees: d2, minutes: m2 },
            ) => Ok(Value::DegreesMinutes {
                degrees: deborde(i64::checked_add(*d1, *d2))?,
                minutes: rat_add(m1, m2)?,
            }
            .normalise()),
            (
                Value::HoursMinutesSeconds { hours: h1, minutes: m1, seconds: s1 },
                Value::HoursMinutesSeconds { hours: h2, minutes: m2, seconds: s2 },
            ) => Ok(Value::HoursMinutesSeconds {
                hours: deborde(i64::checked_add(*h1, *h2))?,
                minutes: deborde(i64::checked_add(*m1, *m2))?,
                seconds: deborde(i64::checked_add(*s1, *s2))?,
            }
            .normalise()),
            _ => Err(self.incompatibles(autre)),
        }
    }

    pub fn subtracting(&self, autre: &Value) -> Result<Value, CalcError> {
        match (self, autre) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(deborde(i64::checked_sub(*a, *b))?)),
            (
                Value::DegreesMinutes { degrees: d1, minutes: m1 },
                Value::DegreesMinutes { degrees: d2, minutes: m2 },
            ) => Ok(Value::DegreesMinutes {
                degrees: deborde(i64::checked_sub(*d1, *d2))?,
                minutes: rat_sub(m1, m2)?,
            }
            .normalise()),
            (
                Value::HoursMinutesSeconds { hours: h1, minutes: m1, seconds: s1 },
                Value::HoursMinutesSeconds { hours: h2, minutes: m2, seconds: s2 },
            ) => Ok(Value::HoursMinutesSeconds {
                hours: deborde(i64::checked_sub(*h1, *h2))?,
                minutes: deborde(i64::checked_sub(*m1, *m2))?,
                seconds: deborde(i64::checked_sub(*s1, *s2))?,
            }
            .normalise()),
            _ => Err(self.incompatibles(autre)),
        }
    }

    /// Division par un entier.
    /// - DMS : minutes totales / n, arrondi au dixième (demi => loin de zéro)
    /// - HMS : secondes totales / n, arrondi à la seconde (demi => loin de zéro)
    /// - Integer : division tronquée
    pub fn dividing(&self, diviseur: &Value) -> Result<Value, CalcError> {
        let n = match diviseur {
            Value::Integer(n) => *n,
            _ => return Err(self.incompatibles(diviseur)),
        };
        if n == 0 && !self.is_empty() {
            return Err(CalcError::DivideByZero);
        }

        match self {
            Value::Integer(a) => Ok(Value::Integer(deborde(i64::checked_div(*a, n))?)),

            Value::DegreesMinutes { degrees, minutes } => {
                let total = minutes_totales(*degrees, minutes)?;
                let q = rat_div(&total, &Rational64::from_integer(n))?;
                let dix = Rational64::from_integer(10);
                let q = rat_mul(&q, &dix)?.round() / dix;
                Ok(Value::DegreesMinutes {
                    degrees: 0,
                    minutes: q,
                }
                .normalise())
            }

            Value::HoursMinutesSeconds {
                hours,
                minutes,
                seconds,
            } => {
                let total = secondes_totales(*hours, *minutes, *seconds)?;
                let q = Rational64::new(total, n).round().to_integer();
                Ok(Value::hms(0, 0, q).normalise())
            }

            Value::Empty => Err(self.incompatibles(diviseur)),
        }
    }
}

impl Add for &Value {
    type Output = Result<Value, CalcError>;

    fn add(self, autre: &Value) -> Self::Output {
        self.adding(autre)
    }
}

impl Sub for &Value {
    type Output = Result<Value, CalcError>;

    fn sub(self, autre: &Value) -> Self::Output {
        self.subtracting(autre)
    }
}

impl Div for &Value {
    type Output = Result<Value, CalcError>;

    fn div(self, autre: &Value) -> Self::Output {
        self.dividing(autre)
    }
}

/* ------------------------ Lecture (texte partiel) ------------------------ */

/// Découpe `s` selon des marqueurs ordonnés (rang strictement croissant).
///
/// Retourne un emplacement par unité (+1 pour ce qui suit le dernier marqueur).
/// Les chiffres finaux sans marqueur vont à l’unité qui suit le dernier marqueur
/// vu (ou à l’unité majeure s’il n’y en a aucun).
fn decouper(s: &str, marqueurs: &[char]) -> Result<Vec<Option<String>>, CalcError> {
    let mut slots: Vec<Option<String>> = vec![None; marqueurs.len() + 1];
    let mut tampon = String::new();
    let mut dernier: Option<usize> = None;

    for c in s.chars() {
        if c.is_ascii_digit() {
            tampon.push(c);
            continue;
        }
        let rang = marqueurs
            .iter()
            .position(|m| *m == c)
            .ok_or_else(|| CalcError::parse(s, "caractère inattendu"))?;
        if let Some(d) = dernier {
            if rang == d {
                return Err(CalcError::parse(s, "séparateur répété"));
            }
            if rang < d {
                return Err(CalcError::parse(s, "séparateurs dans le désordre"));
            }
        }
        slots[rang] = Some(std::mem::take(&mut tampon));
        dernier = Some(rang);
    }

    if !tampon.is_empty() {
        let i = dernier.map_or(0, |d| d + 1);
        slots[i] = Some(tampon);
    }
    Ok(slots)
}

fn entier(texte: &str, chiffres: Option<&String>) -> Result<i64, CalcError> {
    match chiffres {
        None => Ok(0),
        Some(c) if c.is_empty() => Ok(0),
        Some(c) => c
            .parse::<i64>()
            .map_err(|_| CalcError::parse(texte, "nombre trop grand")),
    }
}

/// "3" => 3/10, "25" => 25/100
fn fraction(texte: &str, chiffres: Option<&String>) -> Result<Rational64, CalcError> {
    match chiffres {
        None => Ok(Rational64::zero()),
        Some(c) if c.is_empty() => Ok(Rational64::zero()),
        Some(c) if c.len() > MAX_DECIMALES => Err(CalcError::parse(texte, "trop de décimales")),
        Some(c) => {
            let n = entier(texte, Some(c))?;
            Ok(Rational64::new(n, 10_i64.pow(c.len() as u32)))
        }
    }
}

impl Value {
    /// Lit un texte éventuellement partiel.
    ///
    /// - `"1°2'3"` => 1°2.3' ; `"185'"` => 0°185' (non normalisé) ; `"1°2"` => 1°2'
    /// - `"1h02m03s"`, `"1h2"` => 1h2m, `"5s"` => 0h0m5s
    /// - sans marqueur en DMS/HMS : unité majeure
    /// - un `-` en tête s’applique à toutes les unités (`"-0°30'"` = -30')
    pub fn parse(texte: &str, hint: Hint) -> Result<Value, CalcError> {
        let s = texte.trim();
        if s.is_empty() {
            return Err(CalcError::parse(texte, "texte vide"));
        }

        let lecture = hint.resoudre(s);

        let (negatif, corps) = match s.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, s),
        };
        if corps.is_empty() {
            return Err(CalcError::parse(texte, "signe seul"));
        }
        let signe = |x: i64| if negatif { -x } else { x };

        match lecture {
            Lecture::Entier => {
                if !corps.chars().all(|c| c.is_ascii_digit()) {
                    return Err(CalcError::parse(texte, "entier attendu"));
                }
                Ok(Value::Integer(signe(entier(texte, Some(&corps.to_string()))?)))
            }

            Lecture::Dms => {
                let slots = decouper(corps, &['°', '\''])?;
                let degrees = entier(texte, slots[0].as_ref())?;
                let minutes = Rational64::from_integer(entier(texte, slots[1].as_ref())?)
                    + fraction(texte, slots[2].as_ref())?;
                if negatif {
                    Ok(Value::DegreesMinutes {
                        degrees: -degrees,
                        minutes: -minutes,
                    })
                } else {
                    Ok(Value::DegreesMinutes { degrees, minutes })
                }
            }

            Lecture::Hms => {
                let slots = decouper(corps, &['h', 'm', 's'])?;
                if slots[3].is_some() {
                    return Err(CalcError::parse(texte, "chiffres après le marqueur final"));
                }
                let [h, m, sec] = [
                    entier(texte, slots[0].as_ref())?,
                    entier(texte, slots[1].as_ref())?,
                    entier(texte, slots[2].as_ref())?,
                ];
                Ok(Value::hms(signe(h), signe(m), signe(sec)))
            }
        }
    }
}

/* ------------------------ Affichage ------------------------ */

impl Value {
    /// Affichage à largeur fixe (cadré à droite).
    pub fn format_fixe(&self, largeur: usize) -> String {
        format!("{:>largeur$}", self.to_string())
    }
}

/// Grandeur d’un DMS normalisé négatif : (d, m) avec m dans [0,60) => |d°m'|.
fn grandeur_dms(degrees: i64, minutes: Rational64) -> (bool, i64, Rational64) {
    if degrees >= 0 {
        (false, degrees, minutes)
    } else if minutes.is_zero() {
        (true, degrees.saturating_neg(), minutes)
    } else {
        let soixante = Rational64::from_integer(60);
        (true, degrees.saturating_neg() - 1, soixante - minutes)
    }
}

/// Idem en HMS : emprunts secondes -> minutes -> heures.
fn grandeur_hms(hours: i64, minutes: i64, seconds: i64) -> (bool, i64, i64, i64) {
    if hours >= 0 {
        return (false, hours, minutes, seconds);
    }
    let s = (60 - seconds) % 60;
    let m_tot = minutes + i64::from(seconds > 0);
    let m = (60 - m_tot) % 60;
    let h = hours.saturating_neg() - i64::from(m_tot > 0);
    (true, h, m, s)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.normalise() {
            Value::Empty => f.write_str("n/a"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::DegreesMinutes { degrees, minutes } => {
                let (negatif, mut degrees, minutes) = grandeur_dms(degrees, minutes);
                // minutes dans [0,60] : arrondi au dixième, 59.96 => retenue
                let mut dixiemes = (minutes * Rational64::from_integer(10))
                    .round()
                    .to_integer();
                if dixiemes >= 600 {
                    dixiemes -= 600;
                    degrees = degrees.saturating_add(1);
                }
                // pas de "-0°00'0"
                let signe = if negatif && (degrees, dixiemes) != (0, 0) { "-" } else { "" };
                write!(f, "{signe}{degrees}°{:02}'{}", dixiemes / 10, dixiemes % 10)
            }
            Value::HoursMinutesSeconds {
                hours,
                minutes,
                seconds,
            } => {
                let (negatif, hours, minutes, seconds) = grandeur_hms(hours, minutes, seconds);
                let signe = if negatif { "-" } else { "" };
                write!(f, "{signe}{hours}h{minutes:02}m{seconds:02}s")
            }
        }
    }
}
