//! Tests scientifiques (campagne) : invariants + propriétés du noyau sexagésimal.
//!
//! But : vérifier les lois de l’arithmétique base 60 sur des valeurs générées,
//! sans faire chauffer la machine.
//! - RNG déterministe (seed fixe), tailles bornées
//! - budget temps global
//!
//! Notes importantes (aligné avec l’état actuel du noyau) :
//! - Les minutes DMS sont gardées au dixième : les générateurs produisent des dixièmes.
//! - Pas de repli 360/24 : les degrés/heures générés débordent volontairement.

use std::time::{Duration, Instant};

use num_rational::Rational64;
use num_traits::Signed;

use super::expr::{Expr, Trailing};
use super::saisie::{Event, InputEngine};
use super::systeme::Mode;
use super::valeur::{Hint, Value};

/* ------------------------ RNG déterministe minimal ------------------------ */

struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    /// Entier dans [-n, n]
    fn signe(&mut self, n: u32) -> i64 {
        let x = i64::from(self.next_u32() % (2 * n + 1));
        x - i64::from(n)
    }
}

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

fn gen_dms(rng: &mut Rng) -> Value {
    Value::dms(rng.signe(800), rng.signe(20_000))
}

fn gen_hms(rng: &mut Rng) -> Value {
    Value::hms(rng.signe(100), rng.signe(500), rng.signe(5_000))
}

fn moteur(mode: Mode, entree: &str) -> InputEngine {
    let mut m = InputEngine::new(mode);
    m.saisir(entree);
    m
}

/* ------------------------ Normalisation ------------------------ */

#[test]
fn sci_normalisation_idempotente() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);
    let mut rng = Rng::new(0x5E5A_u64);

    for _ in 0..400 {
        budget(t0, max);
        for v in [gen_dms(&mut rng), gen_hms(&mut rng)] {
            let n = v.normalise();
            assert_eq!(n.normalise(), n, "v={v:?}");
        }
    }
}

#[test]
fn sci_normalisation_bornes() {
    let mut rng = Rng::new(0xB0B_u64);
    for _ in 0..400 {
        match gen_dms(&mut rng).normalise() {
            Value::DegreesMinutes { minutes, .. } => {
                assert!(minutes >= Rational64::from_integer(0));
                assert!(minutes < Rational64::from_integer(60));
            }
            autre => panic!("genre inattendu: {autre:?}"),
        }
        match gen_hms(&mut rng).normalise() {
            Value::HoursMinutesSeconds { minutes, seconds, .. } => {
                assert!((0..60).contains(&minutes));
                assert!((0..60).contains(&seconds));
            }
            autre => panic!("genre inattendu: {autre:?}"),
        }
    }
}

#[test]
fn sci_retenues_de_reference() {
    assert_eq!(Value::dms(0, 610).normalise(), Value::dms(1, 10));
    assert_eq!(Value::dms(0, 600).normalise(), Value::dms(1, 0));
    assert_eq!(Value::dms(1, -10).normalise(), Value::dms(0, 590));
    assert_eq!(
        Value::dms(354, 545).adding(&Value::dms(6, 66)),
        Ok(Value::dms(361, 11))
    );
}

/* ------------------------ Aller-retour affichage / lecture ------------------------ */

#[test]
fn sci_aller_retour_format_lecture() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);
    let mut rng = Rng::new(0xFACE_u64);

    for _ in 0..300 {
        budget(t0, max);

        // la lecture rend une forme non normalisée pour les négatifs ("-0°30'0")
        let relire = |texte: &str, hint| Value::parse(texte, hint).map(|v| v.normalise());

        let d = gen_dms(&mut rng).normalise();
        assert_eq!(relire(&d.to_string(), Hint::Dms), Ok(d.clone()), "{d}");
        assert_eq!(relire(&d.to_string(), Hint::Detect), Ok(d));

        let h = gen_hms(&mut rng).normalise();
        assert_eq!(relire(&h.to_string(), Hint::Hms), Ok(h.clone()), "{h}");

        let i = Value::integer(rng.signe(1_000_000));
        assert_eq!(Value::parse(&i.to_string(), Hint::Integer), Ok(i));
    }
}

/* ------------------------ Arithmétique ------------------------ */

#[test]
fn sci_addition_soustraction_inverses() {
    let mut rng = Rng::new(0xADD_u64);
    for _ in 0..300 {
        let (a, b) = (gen_dms(&mut rng), gen_dms(&mut rng));
        let aller = a.adding(&b).and_then(|s| s.subtracting(&b));
        assert_eq!(aller, Ok(a.normalise()), "a={a} b={b}");

        let (a, b) = (gen_hms(&mut rng), gen_hms(&mut rng));
        let aller = a.adding(&b).and_then(|s| s.subtracting(&b));
        assert_eq!(aller, Ok(a.normalise()), "a={a} b={b}");
    }
}

#[test]
fn sci_division_au_dixieme_pres() {
    let mut rng = Rng::new(0xD1D_u64);
    for _ in 0..300 {
        let v = gen_dms(&mut rng);
        let n = 1 + (rng.next_u32() % 9) as i64;
        let q = v.dividing(&Value::integer(n)).unwrap_or_else(|e| panic!("{v} / {n}: {e}"));

        let Value::DegreesMinutes { degrees, minutes } = &q else {
            panic!("genre inattendu: {q:?}");
        };
        // minutes au dixième
        assert_eq!(10 % minutes.denom(), 0, "q={q}");

        // |q*n - v| <= n * 0.05'
        let Value::DegreesMinutes { degrees: dv, minutes: mv } = v.normalise() else {
            unreachable!()
        };
        let total_q = Rational64::from_integer(degrees * 60) + minutes;
        let total_v = Rational64::from_integer(dv * 60) + mv;
        let ecart = (total_q * Rational64::from_integer(n) - total_v).abs();
        assert!(ecart <= Rational64::new(n, 20), "v={v} n={n} q={q}");
    }
}

#[test]
fn sci_division_reference() {
    assert_eq!(
        Value::dms(1023, 63).dividing(&Value::integer(3)),
        Ok(Value::dms(341, 21))
    );
    assert_eq!(Value::dms(9, 0).dividing(&Value::integer(2)), Ok(Value::dms(4, 300)));
}

/* ------------------------ Moteur de saisie ------------------------ */

#[test]
fn sci_saisie_raccourcie() {
    assert_eq!(moteur(Mode::Dms, "185'").current_number(), "0°185'");
}

#[test]
fn sci_marqueur_repete_jamais_effectif() {
    for entree in ["1°", "1°2", "°", "12°34'5"] {
        let mut m = moteur(Mode::Dms, entree);
        let avant = m.current_number().to_string();
        assert!(!m.apply(Event::Entry('°')), "entree={entree:?}");
        assert_eq!(m.current_number(), avant);
    }
}

#[test]
fn sci_chaine_egal_et_projection() {
    let m = moteur(Mode::Dms, "1°2'3 + 4°5'6 =");
    assert_eq!(
        m.built_expressions(),
        [Expr::add(Expr::leaf(Value::dms(1, 23)), Expr::leaf(Value::dms(4, 56)))]
    );
    assert_eq!(m.current_number(), "");

    let lignes = m.display_lines();
    let glyphes: Vec<_> = lignes.iter().map(|l| l.trailing).collect();
    assert_eq!(
        glyphes,
        [Some(Trailing::Add), Some(Trailing::Equal), Some(Trailing::Result)]
    );
    let largeur = lignes[0].value.chars().count();
    assert!(lignes.iter().all(|l| l.value.chars().count() == largeur));
    assert!(lignes.iter().all(|l| l.value.starts_with(' ')));
}

#[test]
fn sci_meme_rendu_dms_hms() {
    // la projection a la même forme dans les deux systèmes
    let d = moteur(Mode::Dms, "1°+2°-3°=").display_lines();
    let h = moteur(Mode::Hms, "1h+2h-3h=").display_lines();
    let forme = |l: &[super::expr::DisplayLine]| -> Vec<_> {
        l.iter().map(|x| (x.id, x.trailing, x.value.chars().count())).collect()
    };
    assert_eq!(forme(&d[..]), forme(&h[..]));
}

#[test]
fn sci_arrondi_negatif_documente() {
    // demi loin de zéro, dans les deux systèmes
    assert_eq!(
        Value::dms(-1, 597).dividing(&Value::integer(2)),
        Ok(Value::dms(-1, 598))
    );
    assert_eq!(
        Value::hms(0, 0, -3).dividing(&Value::integer(2)),
        Ok(Value::hms(-1, 59, 58))
    );
}
