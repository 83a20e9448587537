// src/app.rs
//
// Calculatrice sexagésimale : module App (racine)
// ----------------------------------------------
// - Déclare les sous-modules (etat.rs + vue.rs)
// - Ré-exporte AppCalc (pour main.rs)
// - Fournit l’impl eframe::App (NATIF + WEB)
//
// Le clavier texte (chiffres, marqueurs, opérateurs) est lu dans vue.rs ;
// ici seulement les touches globales.

pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

use crate::noyau::Event;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = "C" (saisie seulement), Backspace = DEL
        let (esc, retour) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::Backspace),
            )
        });
        if esc {
            self.appliquer(Event::Clear);
        }
        if retour {
            self.appliquer(Event::Delete);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
