//! src/app/etat.rs
//!
//! État UI : un moteur de saisie par onglet (DMS, HMS) + onglet actif.
//!
//! Contrats :
//! - Aucune arithmétique ici : tout événement est délégué au moteur de l’onglet actif.
//! - Changer d’onglet ne touche à aucun moteur.

use crate::config::ConfigCalc;
use crate::noyau::{DisplayLine, Event, InputEngine, Mode};

#[derive(Clone, Debug)]
pub struct AppCalc {
    engine_dms: InputEngine,
    engine_hms: InputEngine,

    /// Onglet affiché
    pub mode: Mode,

    /// Largeur des valeurs (config)
    pub largeur: usize,

    /// Dernier événement refusé (retour visuel discret)
    pub refuse: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(ConfigCalc::default())
    }
}

impl AppCalc {
    pub fn new(config: ConfigCalc) -> Self {
        Self {
            engine_dms: InputEngine::avec_largeur(Mode::Dms, config.largeur),
            engine_hms: InputEngine::avec_largeur(Mode::Hms, config.largeur),
            mode: config.mode,
            largeur: config.largeur,
            refuse: false,
        }
    }

    pub fn actif(&self) -> &InputEngine {
        match self.mode {
            Mode::Dms => &self.engine_dms,
            Mode::Hms => &self.engine_hms,
        }
    }

    pub fn actif_mut(&mut self) -> &mut InputEngine {
        match self.mode {
            Mode::Dms => &mut self.engine_dms,
            Mode::Hms => &mut self.engine_hms,
        }
    }

    /// Transmet un événement au moteur actif.
    pub fn appliquer(&mut self, ev: Event) -> bool {
        let change = self.actif_mut().apply(ev);
        self.refuse = !change;
        change
    }

    pub fn changer_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.refuse = false;
    }

    pub fn lignes(&self) -> Vec<DisplayLine> {
        self.actif().display_lines()
    }
}
