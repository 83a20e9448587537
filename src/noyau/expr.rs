// src/noyau/expr.rs
//
// Arbre d’expression immuable (feuilles = Value, nœuds = + - /).
// - Un nœud binaire possède ses deux enfants (pas de partage, pas de cycle).
// - evaluate() n’est jamais mis en cache : les arbres sont courts.
// - Un enfant non évaluable rend tout le sous-arbre non évaluable (pas de panique).

use std::fmt;

use super::erreur::CalcError;
use super::valeur::Value;

/// Largeur d’affichage par défaut des valeurs (lignes du registre).
pub const LARGEUR_DEFAUT: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Divide,
}

impl Operator {
    pub fn glyphe(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Divide => "/",
        }
    }

    pub fn appliquer(self, a: &Value, b: &Value) -> Result<Value, CalcError> {
        match self {
            Operator::Add => a.adding(b),
            Operator::Subtract => a.subtracting(b),
            Operator::Divide => a.dividing(b),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Leaf(Value),
    Binary(Operator, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn leaf(v: Value) -> Expr {
        Expr::Leaf(v)
    }

    pub fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(Operator::Add, lhs, rhs)
    }

    pub fn subtract(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(Operator::Subtract, lhs, rhs)
    }

    pub fn divide(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(Operator::Divide, lhs, rhs)
    }

    /// Évaluation récursive (non mise en cache).
    pub fn evaluate(&self) -> Result<Value, CalcError> {
        match self {
            Expr::Leaf(v) => Ok(v.clone()),
            Expr::Binary(op, a, b) => {
                let va = a.evaluate()?;
                let vb = b.evaluate()?;
                op.appliquer(&va, &vb)
            }
        }
    }

    /// Projection « pas de valeur » : None si l’évaluation échoue.
    pub fn value(&self) -> Option<Value> {
        self.evaluate().ok()
    }

    /// Parcours infixe (gauche, nœud, droite).
    pub fn in_order<F: FnMut(&Expr)>(&self, visit: &mut F) {
        match self {
            Expr::Leaf(_) => visit(self),
            Expr::Binary(_, a, b) => {
                a.in_order(visit);
                visit(self);
                b.in_order(visit);
            }
        }
    }

    /// Registre multi-lignes (largeur par défaut).
    pub fn display_lines(&self, include_result: bool) -> Vec<DisplayLine> {
        self.display_lines_largeur(include_result, LARGEUR_DEFAUT)
    }

    /// Registre multi-lignes :
    /// - chaque opérande sauf la dernière porte l’opérateur qui la suit
    /// - avec résultat : la dernière porte "=", puis une ligne "==" avec le total
    pub fn display_lines_largeur(&self, include_result: bool, largeur: usize) -> Vec<DisplayLine> {
        let mut operandes: Vec<String> = Vec::new();
        let mut operateurs: Vec<Operator> = Vec::new();
        self.in_order(&mut |e| match e {
            Expr::Leaf(v) => operandes.push(v.format_fixe(largeur)),
            Expr::Binary(op, _, _) => operateurs.push(*op),
        });

        let mut lignes: Vec<DisplayLine> = operandes
            .into_iter()
            .enumerate()
            .map(|(i, value)| DisplayLine {
                id: i,
                value,
                trailing: operateurs.get(i).map(|op| Trailing::from(*op)),
            })
            .collect();

        if include_result {
            if let Some(derniere) = lignes.last_mut() {
                derniere.trailing = Some(Trailing::Equal);
            }
            let total = self.value().unwrap_or(Value::Empty);
            lignes.push(DisplayLine {
                id: lignes.len(),
                value: total.format_fixe(largeur),
                trailing: Some(Trailing::Result),
            });
        }
        lignes
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Leaf(v) => write!(f, "{v}"),
            Expr::Binary(op, a, b) => write!(f, "({a} {} {b})", op.glyphe()),
        }
    }
}

/* ------------------------ Lignes d’affichage ------------------------ */

/// Glyphe de fin de ligne.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trailing {
    Add,
    Subtract,
    Divide,
    /// "=" : dernière opérande d’une expression terminée
    Equal,
    /// "==" : ligne du total
    Result,
}

impl Trailing {
    pub fn as_str(self) -> &'static str {
        match self {
            Trailing::Add => "+",
            Trailing::Subtract => "-",
            Trailing::Divide => "/",
            Trailing::Equal => "=",
            Trailing::Result => "==",
        }
    }
}

impl From<Operator> for Trailing {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Add => Trailing::Add,
            Operator::Subtract => Trailing::Subtract,
            Operator::Divide => Trailing::Divide,
        }
    }
}

impl fmt::Display for Trailing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Une ligne rendue : valeur formatée + glyphe optionnel.
/// `id` est positionnel (réattribué à chaque projection).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayLine {
    pub id: usize,
    pub value: String,
    pub trailing: Option<Trailing>,
}

impl DisplayLine {
    pub fn trailing_str(&self) -> &'static str {
        self.trailing.map_or("", Trailing::as_str)
    }
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.trailing_str())
    }
}
