/*!

Substitution of expressions for variables.

Substitution is by name: every variable node named `name` is replaced, whatever its type. Batch substitution is
simultaneous, so `{x -> y, y -> z}` applied to `x + y` gives `y + z`, never `z + z`. The target is never modified;
subtrees that contain none of the substituted names are shared with the result.

*/

use std::rc::Rc;

use fnv::{FnvHashMap, FnvHashSet};

use crate::expression::{Expr, Name};


/// A map from a variable name to the expression substituted for it.
pub type Substitutions = FnvHashMap<Name, Expr>;


/// Replaces every occurrence of the variable `name` in `target` with `replacement`.
pub fn substitute(name: Name, replacement: &Expr, target: &Expr) -> Expr {
  let mut substitutions = Substitutions::default();
  substitutions.insert(name, replacement.clone());
  substitute_all(&substitutions, target)
}

/// Performs all substitutions in the given map on `target` simultaneously.
pub fn substitute_all(substitutions: &Substitutions, target: &Expr) -> Expr {
  if substitutions.is_empty() {
    return target.clone();
  }
  replace_all(target, substitutions).unwrap_or_else(|| target.clone())
}

/// Gives `None` when nothing in `expression` was replaced, so unchanged subtrees keep their `Rc`.
fn replace_all(expression: &Expr, substitutions: &Substitutions) -> Option<Expr> {
  match expression {

    Expr::Variable(v) => substitutions.get(&v.name).cloned(),

    Expr::IntImm(_) | Expr::BoolImm(_) => None,

    Expr::Binary(op, a, b) => {
      let new_a = replace_all(a, substitutions);
      let new_b = replace_all(b, substitutions);
      if new_a.is_none() && new_b.is_none() {
        return None;
      }
      Some(Expr::Binary(
        *op,
        new_a.map(Rc::new).unwrap_or_else(|| a.clone()),
        new_b.map(Rc::new).unwrap_or_else(|| b.clone()),
      ))
    }

    Expr::Not(a) => replace_all(a, substitutions).map(Expr::not),

  }
}


/// The names of all variables occurring in `expression`.
pub fn free_variables(expression: &Expr) -> FnvHashSet<Name> {
  let mut names = FnvHashSet::default();
  collect_free_variables(expression, &mut names);
  names
}

fn collect_free_variables(expression: &Expr, names: &mut FnvHashSet<Name>) {
  match expression {
    Expr::Variable(v) => {
      names.insert(v.name);
    }
    Expr::IntImm(_) | Expr::BoolImm(_) => {}
    Expr::Binary(_, a, b) => {
      collect_free_variables(a, names);
      collect_free_variables(b, names);
    }
    Expr::Not(a) => collect_free_variables(a, names),
  }
}
