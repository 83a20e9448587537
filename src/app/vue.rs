// src/app/vue.rs
//
// Vue (UI egui) : natif + web
// ---------------------------
// - Onglets DMS / HMS (un moteur chacun)
// - Transcript monospace, collé en bas
// - Pavé : chiffres, marqueurs du mode, + - / =, DEL, C, AC, Ans, −360
// - Clavier : texte tapé => même correspondance que le rejeu (Event::depuis_char)
//
// Note :
// - Backspace / Escape sont lus dans app.rs (touches globales)

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::{Event, Mode};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        self.lire_clavier(ui);

        self.ui_onglets(ui);
        ui.separator();

        self.ui_transcript(ui);

        ui.add_space(6.0);
        ui.separator();
        ui.add_space(6.0);

        self.ui_pave(ui);
    }

    fn ui_onglets(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for mode in [Mode::Dms, Mode::Hms] {
                let actif = self.mode == mode;
                if ui.selectable_label(actif, mode.to_string()).clicked() && !actif {
                    self.changer_mode(mode);
                }
            }
        });
    }

    fn ui_transcript(&mut self, ui: &mut egui::Ui) {
        let lignes = self.lignes();
        let hauteur = (ui.available_height() - 220.0).max(120.0);

        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                egui::ScrollArea::vertical()
                    .id_salt("transcript")
                    .max_height(hauteur)
                    .min_scrolled_height(hauteur)
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for l in &lignes {
                            ui.monospace(format!("{} {}", l.value, l.trailing_str()));
                        }
                    });
            });

        if self.refuse {
            ui.weak("touche ignorée");
        } else {
            ui.label("");
        }
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        let t = self.mode.table();

        // marqueurs du mode actif, infobulle = unité
        ui.horizontal(|ui| {
            let marqueurs = [Some(t.majeur), Some(t.mineur), t.terminal];
            for (m, unite) in marqueurs.into_iter().flatten().zip(t.unites) {
                self.bouton(ui, &m.to_string(), unite, Event::Entry(m));
            }
        });

        egui::Grid::new("pave_sexa")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.chiffre(ui, '7');
                self.chiffre(ui, '8');
                self.chiffre(ui, '9');
                self.bouton(ui, "/", "Diviser par un entier", Event::Divide);
                ui.end_row();

                self.chiffre(ui, '4');
                self.chiffre(ui, '5');
                self.chiffre(ui, '6');
                self.bouton(ui, "-", "Soustraire", Event::Subtract);
                ui.end_row();

                self.chiffre(ui, '1');
                self.chiffre(ui, '2');
                self.chiffre(ui, '3');
                self.bouton(ui, "+", "Ajouter", Event::Add);
                ui.end_row();

                self.bouton(ui, "Ans", "Dernière réponse", Event::Ans);
                self.chiffre(ui, '0');
                self.bouton(ui, "−360", "Retirer un tour complet", Event::Minus360);
                self.bouton(ui, "=", "Terminer l’expression", Event::Equal);
                ui.end_row();

                self.bouton(ui, "DEL", "Efface le dernier caractère", Event::Delete);
                self.bouton(ui, "C", "Efface la saisie", Event::Clear);
                self.bouton(ui, "AC", "Remise à zéro totale", Event::AllClear);
                ui.label("");
                ui.end_row();
            });
    }

    fn chiffre(&mut self, ui: &mut egui::Ui, c: char) {
        let resp = ui.add_sized([56.0, 32.0], egui::Button::new(c.to_string()));
        if resp.clicked() {
            self.appliquer(Event::Entry(c));
        }
    }

    fn bouton(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, ev: Event) {
        let resp = ui
            .add_sized([56.0, 32.0], egui::Button::new(label))
            .on_hover_text(tip);
        if resp.clicked() {
            self.appliquer(ev);
        }
    }

    /// Texte tapé au clavier (natif + web).
    fn lire_clavier(&mut self, ui: &mut egui::Ui) {
        let texte: String = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Text(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect()
        });

        for ev in texte.chars().filter_map(Event::depuis_char) {
            self.appliquer(ev);
        }
    }
}
