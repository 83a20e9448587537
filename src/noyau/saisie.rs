// src/noyau/saisie.rs
//
// Moteur de saisie incrémentale (une touche à la fois).
//
// État :
// - courant        : nombre en cours de frappe (texte partiel, ex: "1°2")
// - pile en attente: opérandes + opérateurs pas encore terminés par "="
//                    (invariant : autant d’opérandes que d’opérateurs)
// - transcript     : expressions terminées (Expr), en ajout seul
// - journal        : caractères acceptés depuis le dernier effacement ;
//                    se termine toujours par `courant` (préfixes implicites compris)
//
// Contrats :
// - Toute touche est « sûre » : un événement invalide est un no-op silencieux.
// - Aucun branchement sur le mode : tout passe par la TableMode.
// - Chaînage calculatrice : repli à gauche (a + b - c = ((a + b) - c)), sans priorités.

use tracing::{debug, trace};

use super::affichage::project;
use super::expr::{DisplayLine, Expr, Operator, LARGEUR_DEFAUT};
use super::systeme::Mode;
use super::valeur::{Hint, Value};

/// Garde-fou : chiffres par nombre saisi (évite tout dépassement i64).
pub const MAX_CHIFFRES: usize = 12;

/// Trace de la touche −360 dans le journal.
const MARQUE_TOUR: &str = "−360";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Entry(char),
    Add,
    Subtract,
    Divide,
    Equal,
    Clear,
    AllClear,
    Delete,
    Ans,
    Minus360,
}

impl Event {
    /// Correspondance clavier / rejeu : `+ - / =` sont des opérateurs,
    /// les blancs sont ignorés, le reste est une entrée.
    pub fn depuis_char(c: char) -> Option<Event> {
        match c {
            c if c.is_whitespace() => None,
            '+' => Some(Event::Add),
            '-' => Some(Event::Subtract),
            '/' => Some(Event::Divide),
            '=' => Some(Event::Equal),
            c => Some(Event::Entry(c)),
        }
    }
}

/// Opérande en attente : texte tel que saisi + début de son segment de journal.
#[derive(Clone, Debug)]
struct Segment {
    debut: usize,
    texte: String,
}

#[derive(Clone, Debug)]
pub struct InputEngine {
    mode: Mode,
    largeur: usize,
    journal: String,
    /// journal[debut..] == courant
    debut: usize,
    courant: String,
    pending_exprs: Vec<Expr>,
    pending_ops: Vec<Operator>,
    pending_textes: Vec<Segment>,
    built: Vec<Expr>,
}

impl InputEngine {
    pub fn new(mode: Mode) -> Self {
        Self::avec_largeur(mode, LARGEUR_DEFAUT)
    }

    pub fn avec_largeur(mode: Mode, largeur: usize) -> Self {
        Self {
            mode,
            largeur,
            journal: String::new(),
            debut: 0,
            courant: String::new(),
            pending_exprs: Vec::new(),
            pending_ops: Vec::new(),
            pending_textes: Vec::new(),
            built: Vec::new(),
        }
    }

    /* ------------------------ Accès (lecture seule) ------------------------ */

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_number(&self) -> &str {
        &self.courant
    }

    pub fn input_log(&self) -> &str {
        &self.journal
    }

    pub fn built_expressions(&self) -> &[Expr] {
        &self.built
    }

    pub fn pending_expressions(&self) -> &[Expr] {
        &self.pending_exprs
    }

    pub fn pending_operators(&self) -> &[Operator] {
        &self.pending_ops
    }

    /// Vrai exactement pendant la saisie du diviseur d’une division en attente.
    pub fn int_only(&self) -> bool {
        self.pending_ops.last() == Some(&Operator::Divide)
    }

    /// Lignes visibles (transcript + chaîne en attente + saisie).
    pub fn display_lines(&self) -> Vec<DisplayLine> {
        project(
            &self.built,
            &self.pending_exprs,
            &self.pending_ops,
            &self.courant,
            self.largeur,
        )
    }

    /* ------------------------ Point d’entrée ------------------------ */

    /// Applique un événement. Retourne true si l’état a changé.
    pub fn apply(&mut self, ev: Event) -> bool {
        let change = match ev {
            Event::Entry(c) => self.entree(c),
            Event::Add => self.operateur(Operator::Add),
            Event::Subtract => self.operateur(Operator::Subtract),
            Event::Divide => self.operateur(Operator::Divide),
            Event::Equal => self.egal(),
            Event::Clear => self.clear(),
            Event::AllClear => self.all_clear(),
            Event::Delete => self.effacer_dernier(),
            Event::Ans => self.ans(),
            Event::Minus360 => self.moins_tour(),
        };

        if change {
            debug!(mode = %self.mode, ?ev, courant = %self.courant, "événement appliqué");
        } else {
            trace!(mode = %self.mode, ?ev, "événement ignoré");
        }
        change
    }

    /// Rejoue un texte caractère par caractère (blancs ignorés).
    pub fn saisir(&mut self, texte: &str) {
        for ev in texte.chars().filter_map(Event::depuis_char) {
            self.apply(ev);
        }
    }

    /* ------------------------ Entrée de caractères ------------------------ */

    fn entree(&mut self, c: char) -> bool {
        let t = self.mode.table();

        if c.is_ascii_digit() {
            if self.courant.chars().filter(char::is_ascii_digit).count() >= MAX_CHIFFRES {
                return false;
            }
            if let Some(fin) = t.terminal {
                if self.courant.contains(fin) {
                    return false;
                }
            }
            self.courant.push(c);
            self.resynchroniser();
            return true;
        }

        // marqueur d’un autre mode, ou caractère inconnu
        if !self.mode.est_marqueur(c) || self.int_only() {
            return false;
        }

        let a_majeur = self.courant.contains(t.majeur);
        let a_mineur = self.courant.contains(t.mineur);
        let a_terminal = t.terminal.is_some_and(|f| self.courant.contains(f));

        if c == t.majeur {
            if a_majeur || a_mineur || a_terminal {
                return false;
            }
            if self.chiffres_courants().is_empty() {
                self.courant.push('0');
            }
        } else if c == t.mineur {
            if a_mineur || a_terminal {
                return false;
            }
            if !a_majeur {
                self.prefixer_majeur();
            }
        } else {
            // marqueur terminal (HMS : s)
            if a_terminal {
                return false;
            }
            if !a_majeur {
                self.prefixer_majeur();
            }
            if !a_mineur {
                let pos = self.courant.find(t.majeur).map_or(0, |p| p + t.majeur.len_utf8());
                self.courant.insert(pos, t.mineur);
                self.courant.insert(pos, '0');
            }
        }

        self.courant.push(c);
        self.resynchroniser();
        true
    }

    /// Recopie `courant` en fin de journal (après un préfixe implicite, un effacement…).
    fn resynchroniser(&mut self) {
        self.journal.truncate(self.debut);
        self.journal.push_str(&self.courant);
    }

    /// Le prochain nombre commence en fin de journal.
    fn nouveau_segment(&mut self) {
        self.debut = self.journal.len();
    }

    /// Insère "0°" / "0h" en tête (après un signe éventuel).
    fn prefixer_majeur(&mut self) {
        let t = self.mode.table();
        let pos = usize::from(self.courant.starts_with('-'));
        self.courant.insert(pos, t.majeur);
        self.courant.insert(pos, '0');
    }

    fn chiffres_courants(&self) -> &str {
        self.courant.strip_prefix('-').unwrap_or(&self.courant)
    }

    /* ------------------------ Opérateurs ------------------------ */

    /// Termine le nombre courant en feuille (diviseur => entier).
    fn terminer_courant(&self) -> Option<Expr> {
        let hint = if self.int_only() {
            Hint::Integer
        } else {
            self.mode.table().hint
        };
        Value::parse(&self.courant, hint).ok().map(Expr::leaf)
    }

    /// Dernière réponse évaluable du transcript.
    fn derniere_reponse(&self) -> Option<Value> {
        self.built
            .last()
            .and_then(Expr::value)
            .filter(|v| !v.is_empty())
    }

    fn operateur(&mut self, op: Operator) -> bool {
        if !self.courant.is_empty() {
            let Some(feuille) = self.terminer_courant() else {
                return false;
            };
            self.pending_textes.push(Segment {
                debut: self.debut,
                texte: std::mem::take(&mut self.courant),
            });
            self.pending_exprs.push(feuille);
            self.pending_ops.push(op);
            self.journal.push_str(op.glyphe());
            self.nouveau_segment();
            return true;
        }

        match (op, self.pending_ops.last().copied()) {
            // rien à gauche : on ne commence pas par un opérateur…
            (Operator::Add | Operator::Subtract, None) => false,

            // …sauf la division, ancrée sur la dernière réponse
            (Operator::Divide, None) => self.ancrer_division(),

            (Operator::Divide, Some(Operator::Divide)) => false,

            // chaîne +/- ouverte : "=" implicite puis division de la réponse
            (Operator::Divide, Some(_)) => {
                if !self.egal() {
                    return false;
                }
                if self.courant.is_empty() {
                    self.ancrer_division()
                } else {
                    // "5+" puis "/" : l’opérande est rouverte, on la divise
                    self.operateur(Operator::Divide)
                }
            }

            // opérateur en attente : remplacé
            (_, Some(dernier)) => {
                if dernier == op {
                    return false;
                }
                if let Some(o) = self.pending_ops.last_mut() {
                    *o = op;
                }
                if self.journal.ends_with(dernier.glyphe()) {
                    self.journal.pop();
                }
                self.journal.push_str(op.glyphe());
                self.nouveau_segment();
                true
            }
        }
    }

    fn ancrer_division(&mut self) -> bool {
        let Some(ans) = self.derniere_reponse() else {
            return false;
        };
        self.pending_textes.push(Segment {
            debut: self.journal.len(),
            texte: ans.to_string(),
        });
        self.pending_exprs.push(Expr::leaf(ans));
        self.pending_ops.push(Operator::Divide);
        self.journal.push_str(Operator::Divide.glyphe());
        self.nouveau_segment();
        true
    }

    /// "=" : replie la chaîne en attente (à gauche) dans le transcript.
    fn egal(&mut self) -> bool {
        if self.pending_ops.is_empty() {
            return false;
        }

        let derniere = if self.courant.is_empty() {
            None
        } else {
            match self.terminer_courant() {
                Some(f) => Some(f),
                None => return false,
            }
        };

        let mut operandes = std::mem::take(&mut self.pending_exprs);
        let mut ops = std::mem::take(&mut self.pending_ops);
        let mut textes = std::mem::take(&mut self.pending_textes);
        match derniere {
            Some(f) => operandes.push(f),
            // opérateur final sans opérande droite : abandonné
            None => {
                ops.pop();
            }
        }
        self.courant.clear();

        if ops.is_empty() {
            // "5+=" : rien à calculer, l’opérande redevient la saisie
            if let Some(seg) = textes.pop() {
                self.debut = seg.debut;
                self.courant = seg.texte;
            }
            self.resynchroniser();
            return true;
        }

        let mut termes = operandes.into_iter();
        let Some(mut arbre) = termes.next() else {
            return false;
        };
        for (op, droite) in ops.into_iter().zip(termes) {
            arbre = Expr::binary(op, arbre, droite);
        }

        debug!(mode = %self.mode, expr = %arbre, "expression terminée");
        self.built.push(arbre);
        self.journal.push('=');
        self.nouveau_segment();
        true
    }

    /* ------------------------ Édition ------------------------ */

    fn effacer_dernier(&mut self) -> bool {
        if self.courant.pop().is_some() {
            // un signe seul n’est pas un nombre
            if self.courant == "-" {
                self.courant.clear();
            }
            self.resynchroniser();
            return true;
        }
        // rouvre l’opérande gauche, telle que saisie
        if self.pending_ops.pop().is_some() {
            self.pending_exprs.pop();
            if let Some(seg) = self.pending_textes.pop() {
                self.debut = seg.debut.min(self.journal.len());
                self.courant = seg.texte;
            }
            self.resynchroniser();
            return true;
        }
        false
    }

    fn clear(&mut self) -> bool {
        let change = !self.courant.is_empty() || !self.journal.is_empty();
        self.courant.clear();
        self.journal.clear();
        self.debut = 0;
        // les opérandes en attente survivent, leur journal non
        for seg in &mut self.pending_textes {
            seg.debut = 0;
        }
        change
    }

    fn all_clear(&mut self) -> bool {
        let change = !self.courant.is_empty()
            || !self.journal.is_empty()
            || !self.pending_ops.is_empty()
            || !self.built.is_empty();
        self.courant.clear();
        self.journal.clear();
        self.debut = 0;
        self.pending_exprs.clear();
        self.pending_ops.clear();
        self.pending_textes.clear();
        self.built.clear();
        change
    }

    /* ------------------------ Raccourcis ------------------------ */

    fn ans(&mut self) -> bool {
        if !self.courant.is_empty() {
            return false;
        }
        let Some(ans) = self.derniere_reponse() else {
            return false;
        };
        // un diviseur reste entier
        if self.int_only() && !matches!(ans, Value::Integer(_)) {
            return false;
        }
        self.courant = ans.to_string();
        self.resynchroniser();
        true
    }

    /// "−360" : ajoute `total − tour complet` au transcript
    /// (360° en DMS, 24h en HMS).
    fn moins_tour(&mut self) -> bool {
        let total = if !self.courant.is_empty() {
            if self.pending_ops.is_empty() {
                match self.terminer_courant().and_then(|f| f.value()) {
                    Some(v) => v,
                    None => return false,
                }
            } else {
                if !self.egal() {
                    return false;
                }
                match self.derniere_reponse() {
                    Some(v) => v,
                    None => return false,
                }
            }
        } else if self.pending_ops.is_empty() {
            match self.derniere_reponse() {
                Some(v) => v,
                None => return false,
            }
        } else {
            // opérateur ouvert sans opérande droite
            return false;
        };

        let arbre = Expr::subtract(Expr::leaf(total), Expr::leaf(self.mode.tour_complet()));
        debug!(mode = %self.mode, expr = %arbre, "tour retiré");
        self.built.push(arbre);
        self.courant.clear();
        self.journal.push_str(MARQUE_TOUR);
        self.nouveau_segment();
        true
    }
}
