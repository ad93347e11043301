/*!

Isolating a variable.

`solve_expression(expr, var)` rewrites `expr` so that `var` ends up in a canonical position:

  * An integer expression becomes `var * cofactor + rest`, the terms linear in `var` gathered first. The cofactor is
    dropped when it is `1`.
  * An integer comparison has `var` moved to the left-hand side, divided through by its coefficient when the division
    is exact: `2*x + 4 == 2*y` becomes `x == y - 2`.
  * Boolean connectives are solved operand by operand.

The result is always equal to `expr` for every assignment of its variables. `fully_solved` reports whether `var` was
isolated completely; it is false when `var` occurs non-linearly or inside a subexpression the polynomial arithmetic
cannot see into, like a quotient or a `min`.

*/

use num_bigint::BigInt;
use num_traits::{One, Signed};

use crate::{
  expression::{BinaryOp, Expr, Name},
  polynomial::{Polynomial, Term},
  simplify::{simplify, to_polynomial},
};


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SolverResult {
  pub result      : Expr,
  pub fully_solved: bool,
}

impl SolverResult {
  fn new(result: Expr, fully_solved: bool) -> SolverResult {
    SolverResult { result, fully_solved }
  }
}


pub fn solve_expression(expr: &Expr, var: Name) -> SolverResult {
  let simplified = simplify(expr);
  if !simplified.contains_variable(var) {
    return SolverResult::new(simplified, true);
  }

  match &simplified {
    Expr::Variable(_) => SolverResult::new(simplified, true),

    Expr::Binary(op, a, b) if op.attributes().comparison() && a.ty().is_integral() => {
      solve_comparison(*op, a, b, var).unwrap_or_else(|| SolverResult::new(simplified.clone(), false))
    }

    Expr::Binary(op @ (BinaryOp::And | BinaryOp::Or), a, b) => {
      let solved_a = solve_expression(a, var);
      let solved_b = solve_expression(b, var);
      let fully_solved = solved_a.fully_solved && solved_b.fully_solved && simplified.occurrences(var) <= 1;
      SolverResult::new(Expr::binary(*op, solved_a.result, solved_b.result), fully_solved)
    }

    Expr::Not(a) => {
      let solved = solve_expression(a, var);
      SolverResult::new(Expr::not(solved.result), solved.fully_solved)
    }

    _ if simplified.ty().is_integral() => solve_integral(&simplified, var),

    _ => SolverResult::new(simplified, false)
  }
}


/// The terms of a polynomial sorted by how they mention the variable being solved for.
struct Partition {
  /// The variable node itself, taken from the first linear term.
  var_atom : Option<Expr>,
  /// The cofactors of the terms in which the variable occurs exactly once, as a direct factor.
  linear   : Polynomial,
  /// Terms in which the variable occurs more than once or inside an atom.
  nonlinear: Polynomial,
  rest     : Polynomial,
}

fn partition(polynomial: &Polynomial, var: Name) -> Partition {
  let mut var_atom              = None;
  let mut linear   : Vec<Term>  = Vec::new();
  let mut nonlinear: Vec<Term>  = Vec::new();
  let mut rest     : Vec<Term>  = Vec::new();

  for term in polynomial.terms() {
    let mentions = term.monomial.iter().filter(|factor| factor.contains_variable(var)).count();
    let direct   = term.monomial.iter().position(|factor| {
      factor.as_variable().map_or(false, |v| v.name == var)
    });

    match (mentions, direct) {
      (0, _) => rest.push(term.clone()),

      (1, Some(index)) if term.monomial[index].occurrences(var) == 1 => {
        let mut monomial = term.monomial.clone();
        let atom = monomial.remove(index);
        var_atom.get_or_insert(atom);
        linear.push(Term { monomial, coefficient: term.coefficient.clone() });
      }

      _ => nonlinear.push(term.clone()),
    }
  }

  Partition {
    var_atom,
    linear   : Polynomial::from_terms(linear),
    nonlinear: Polynomial::from_terms(nonlinear),
    rest     : Polynomial::from_terms(rest),
  }
}


fn solve_integral(expr: &Expr, var: Name) -> SolverResult {
  let ty    = expr.ty();
  let parts = partition(&to_polynomial(expr).reduced(ty), var);

  let var_atom = match parts.var_atom {
    Some(atom) => atom,
    // Only non-linear occurrences. There is nothing to gather.
    None => return SolverResult::new(expr.clone(), false),
  };

  let mut result = match parts.linear.as_constant() {
    Some(c) if c.is_one() => var_atom,
    _ => var_atom * parts.linear.to_expr(ty),
  };

  let remainder = parts.nonlinear.add(&parts.rest);
  if !remainder.is_zero() {
    result = result + remainder.to_expr(ty);
  }

  SolverResult::new(result, parts.nonlinear.is_zero())
}


/// Gives `None` when the comparison cannot be solved for `var`.
fn solve_comparison(op: BinaryOp, a: &Expr, b: &Expr, var: Name) -> Option<SolverResult> {
  let ty = a.ty();
  if ty.is_unsigned() {
    return None;
  }

  let difference = to_polynomial(a).sub(&to_polynomial(b));
  let parts      = partition(&difference, var);
  if !parts.nonlinear.is_zero() {
    return None;
  }
  let var_atom         = parts.var_atom?;
  let cofactor: BigInt = parts.linear.as_constant()?;
  // var * cofactor + rest  op  0
  let negated_rest     = parts.rest.neg();

  let result = match op {
    BinaryOp::Eq | BinaryOp::Ne => {
      let quotient = negated_rest.divide_exact(&cofactor)?;
      Expr::binary(op, var_atom, quotient.to_expr(ty))
    }

    BinaryOp::Lt | BinaryOp::Le if cofactor.is_one() => {
      Expr::binary(op, var_atom, negated_rest.to_expr(ty))
    }

    BinaryOp::Lt | BinaryOp::Le if cofactor.is_negative() && cofactor.abs().is_one() => {
      // -var + rest < 0  <=>  var > rest
      let flipped = if op == BinaryOp::Lt { BinaryOp::Gt } else { BinaryOp::Ge };
      Expr::binary(flipped, var_atom, parts.rest.to_expr(ty))
    }

    _ => return None,
  };

  Some(SolverResult::new(result, true))
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    expression::{and, eq, gt, lt, min},
    types::Type,
  };

  fn int32(name: &str) -> Expr {
    Expr::variable(name, Type::int(32))
  }

  fn c(value: i64) -> Expr {
    Expr::int(value, Type::int(32))
  }

  fn x() -> Name {
    Name::new("x")
  }

  #[test]
  fn linear_terms_come_first() {
    let e = int32("y") + int32("x") * c(3) + c(2);
    let solved = solve_expression(&e, x());
    assert!(solved.fully_solved);
    assert_eq!(solved.result.to_string(), "((x * 3) + (y + 2))");

    let solved = solve_expression(&(int32("z") + int32("x")), x());
    assert!(solved.fully_solved);
    assert_eq!(solved.result, int32("x") + int32("z"));
  }

  #[test]
  fn symbolic_cofactor() {
    let e = int32("x") * int32("y") + int32("x") + int32("z");
    let solved = solve_expression(&e, x());
    assert!(solved.fully_solved);
    assert_eq!(solved.result.to_string(), "((x * (y + 1)) + z)");
  }

  #[test]
  fn nonlinear_occurrences_are_not_solved() {
    let squared = solve_expression(&(int32("x") * int32("x") + int32("y")), x());
    assert!(!squared.fully_solved);

    let quotient = solve_expression(&(int32("x") / int32("y") + int32("x")), x());
    assert!(!quotient.fully_solved);
    assert_eq!(quotient.result.to_string(), "(x + (x / y))");

    let lattice = solve_expression(&min(int32("x"), int32("y")), x());
    assert!(!lattice.fully_solved);
    assert_eq!(lattice.result, min(int32("x"), int32("y")));
  }

  #[test]
  fn absent_variable() {
    let solved = solve_expression(&(c(1) + int32("y")), x());
    assert!(solved.fully_solved);
    assert_eq!(solved.result, int32("y") + c(1));
  }

  #[test]
  fn comparisons() {
    let equation = eq(c(2) * int32("x") + c(4), int32("y") * c(2));
    let solved = solve_expression(&equation, x());
    assert!(solved.fully_solved);
    assert_eq!(solved.result, eq(int32("x"), int32("y") - c(2)));

    let inexact = eq(c(2) * int32("x"), int32("y"));
    assert!(!solve_expression(&inexact, x()).fully_solved);

    let solved = solve_expression(&lt(int32("y"), int32("x")), x());
    assert!(solved.fully_solved);
    assert_eq!(solved.result, gt(int32("x"), int32("y")));
  }

  #[test]
  fn boolean_structure() {
    let p = Expr::variable("x", Type::bool());
    let q = Expr::variable("y", Type::bool());
    let solved = solve_expression(&and(q.clone(), p.clone()), x());
    assert!(solved.fully_solved);
    assert_eq!(solved.result, and(p.clone(), q.clone()));

    let repeated = solve_expression(&and(p.clone(), !p.clone()), x());
    assert!(!repeated.fully_solved);
  }

  #[test]
  fn solving_is_deterministic() {
    let e = (int32("x") - int32("y")) * (int32("x") + int32("z"));
    assert_eq!(solve_expression(&e, x()), solve_expression(&e, x()));
  }

  #[test]
  fn solving_preserves_meaning() {
    let e = (int32("y") + int32("x")) * c(2) - int32("x");
    let solved = solve_expression(&e, x());
    assert_eq!(simplify(&eq(solved.result, e)), Expr::bool(true));
  }
}
