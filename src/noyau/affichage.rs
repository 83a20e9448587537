// src/noyau/affichage.rs
//
// Projection : état du moteur -> lignes visibles.
// Fonction pure, recalculée après chaque événement.
//
// Ordre :
// 1) transcript (opérandes, "=", total "==")
// 2) chaîne en attente (chaque opérande porte son opérateur)
// 3) saisie en cours (sans glyphe)
// Les id sont positionnels : renumérotés de 0 sur la liste complète.

use super::expr::{DisplayLine, Expr, Operator, Trailing};

pub fn project(
    built: &[Expr],
    pending_exprs: &[Expr],
    pending_ops: &[Operator],
    courant: &str,
    largeur: usize,
) -> Vec<DisplayLine> {
    let mut lignes: Vec<DisplayLine> = Vec::new();

    for e in built {
        lignes.extend(e.display_lines_largeur(true, largeur));
    }

    for (i, e) in pending_exprs.iter().enumerate() {
        let mut rangs = e.display_lines_largeur(false, largeur);
        if let Some(mut derniere) = rangs.pop() {
            derniere.trailing = pending_ops.get(i).map(|op| Trailing::from(*op));
            rangs.push(derniere);
        }
        lignes.extend(rangs);
    }

    if !courant.is_empty() {
        lignes.push(DisplayLine {
            id: 0,
            value: format!("{courant:>largeur$}"),
            trailing: None,
        });
    }

    for (id, l) in lignes.iter_mut().enumerate() {
        l.id = id;
    }
    lignes
}
