//! Tests fuzz safe : robustesse + déterminisme du moteur de saisie.
//!
//! But : marteler la machine à états sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - séquences d’événements bornées
//! - budget temps global
//! - invariants clés vérifiés après CHAQUE événement :
//!   * autant d’opérandes que d’opérateurs en attente
//!   * int_only => aucun marqueur dans la saisie
//!   * la saisie courante reste lisible
//!   * le transcript ne rétrécit que sur AC
//!   * ids d’affichage = positions
//!   * le journal se termine par la saisie courante

use std::time::{Duration, Instant};

use super::saisie::{Event, InputEngine, MAX_CHIFFRES};
use super::systeme::{Mode, MARQUEURS};
use super::valeur::{Hint, Value};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’événements ------------------------ */

fn gen_event(rng: &mut Rng) -> Event {
    match rng.pick(20) {
        // chiffres majoritaires, sinon la saisie reste vide
        0..=7 => Event::Entry(char::from(b'0' + rng.pick(10) as u8)),
        8..=10 => Event::Entry(MARQUEURS[rng.pick(MARQUEURS.len() as u32) as usize]),
        11 => Event::Entry('x'),
        12 => Event::Add,
        13 => Event::Subtract,
        14 => Event::Divide,
        15 => Event::Equal,
        16 => Event::Delete,
        17 => Event::Ans,
        18 => Event::Minus360,
        _ => {
            if rng.pick(4) == 0 {
                Event::AllClear
            } else {
                Event::Clear
            }
        }
    }
}

fn verifier_invariants(m: &InputEngine, avant_built: usize, ev: Event, applique: bool) {
    let ctx = format!("ev={ev:?} courant={:?}", m.current_number());

    assert_eq!(
        m.pending_expressions().len(),
        m.pending_operators().len(),
        "{ctx}"
    );

    if m.int_only() {
        assert!(
            !m.current_number().contains(&MARQUEURS[..]),
            "diviseur non entier: {ctx}"
        );
    }

    if !m.current_number().is_empty() {
        let hint = if m.int_only() {
            Hint::Integer
        } else {
            m.mode().table().hint
        };
        assert!(
            Value::parse(m.current_number(), hint).is_ok(),
            "saisie illisible: {ctx}"
        );
    }

    // un chiffre accepté ne dépasse jamais le plafond (Ans peut, lui, en poser plus)
    if let (Event::Entry(c), true) = (ev, applique) {
        if c.is_ascii_digit() {
            let chiffres = m
                .current_number()
                .chars()
                .filter(char::is_ascii_digit)
                .count();
            assert!(chiffres <= MAX_CHIFFRES, "{ctx}");
        }
    }

    if ev != Event::AllClear {
        assert!(m.built_expressions().len() >= avant_built, "transcript rétréci: {ctx}");
    }

    assert!(
        m.input_log().ends_with(m.current_number()),
        "journal désynchronisé: {ctx} journal={:?}",
        m.input_log()
    );

    for (i, l) in m.display_lines().iter().enumerate() {
        assert_eq!(l.id, i, "{ctx}");
    }
}

fn campagne(mode: Mode, seed: u64, sequences: usize, longueur: usize) -> (usize, usize) {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);
    let mut rng = Rng::new(seed);

    let mut appliques = 0usize;
    let mut ignores = 0usize;

    for _ in 0..sequences {
        budget(t0, max);
        let mut m = InputEngine::new(mode);
        for _ in 0..longueur {
            let ev = gen_event(&mut rng);
            let avant = m.built_expressions().len();
            let applique = m.apply(ev);
            if applique {
                appliques += 1;
            } else {
                ignores += 1;
            }
            verifier_invariants(&m, avant, ev, applique);
        }
    }
    (appliques, ignores)
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_invariants_dms() {
    let (ok, ignores) = campagne(Mode::Dms, 0xC0FFEE_u64, 150, 60);
    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(ok > 1000, "trop peu d’événements appliqués: {ok}");
    assert!(ignores > 0, "aucun no-op vu: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_invariants_hms() {
    let (ok, ignores) = campagne(Mode::Hms, 0xBADC0DE_u64, 150, 60);
    assert!(ok > 1000, "trop peu d’événements appliqués: {ok}");
    assert!(ignores > 0);
}

#[test]
fn fuzz_safe_determinisme() {
    // Même seed => mêmes événements => même transcript
    let rejouer = |seed: u64| {
        let mut rng = Rng::new(seed);
        let mut m = InputEngine::new(Mode::Dms);
        for _ in 0..200 {
            m.apply(gen_event(&mut rng));
        }
        m.display_lines()
    };
    assert_eq!(rejouer(42), rejouer(42));
}

#[test]
fn fuzz_safe_longue_chaine_sans_egal() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    // 300 termes chaînés : repli à gauche, profondeur linéaire mais bornée
    let mut m = InputEngine::new(Mode::Dms);
    for _ in 0..300 {
        m.saisir("1'+");
        budget(t0, max);
    }
    m.apply(Event::Equal);

    let b = m.built_expressions();
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].value(), Some(Value::dms(5, 0)));
}
