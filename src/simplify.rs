/*!

The simplifier reduces an expression to a normal form.

  * Integer `Add`, `Sub` and `Mul` are expanded into a `Polynomial` over opaque atoms and written back in normal form
    order, constant last.
  * `Div` and `Mod` fold literal operands (truncating) and the divisor `1`. Otherwise they stay as they are, and to
    the surrounding arithmetic they are atoms.
  * Operators whose attributes make them a lattice (`Min`, `Max`, `And`, `Or`) are flattened into A-normal form,
    sorted into C-normal form, deduplicated, and have their literal operands folded.
  * Integer comparisons are decided from the difference of their sides when it is a constant, and otherwise written
    as `(non-constant part) op (constant)`. `Gt` and `Ge` become `Lt` and `Le` with the operands swapped.
  * `Not` folds literals and double negation and flips comparisons.

Simplification is deterministic and idempotent. It is also conservative: a result that is not a literal says nothing
about whether the expression could be decided by a stronger simplifier.

*/

use num_traits::{One, Signed, Zero};

use crate::{
  expression::{BinaryOp, Expr, IntImm},
  normal_form::{commutative_normal_form, NormalFormOrder},
  polynomial::Polynomial,
};


pub fn simplify(expr: &Expr) -> Expr {
  match expr {
    Expr::Variable(_) | Expr::IntImm(_) | Expr::BoolImm(_) => expr.clone(),

    Expr::Not(a) => simplify_not(simplify(a)),

    Expr::Binary(op, a, b) => {
      match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => {
          let ty = expr.ty();
          if ty.is_integral() {
            to_polynomial(expr).reduced(ty).to_expr(ty)
          } else {
            Expr::binary(*op, simplify(a), simplify(b))
          }
        }

        BinaryOp::Div | BinaryOp::Mod => simplify_division(*op, simplify(a), simplify(b)),

        _ if op.attributes().lattice() => simplify_lattice(*op, expr),

        _ => simplify_comparison(*op, simplify(a), simplify(b)),
      }
    }
  }
}


/// Expands an integer expression into a polynomial. Subexpressions that are not sums, differences, products or
/// literals are simplified and become atoms.
pub(crate) fn to_polynomial(expr: &Expr) -> Polynomial {
  match expr {
    Expr::IntImm(imm) => Polynomial::constant(imm.value.clone()),

    Expr::Variable(_) => Polynomial::atom(expr.clone()),

    Expr::Binary(BinaryOp::Add, a, b) => to_polynomial(a).add(&to_polynomial(b)),
    Expr::Binary(BinaryOp::Sub, a, b) => to_polynomial(a).sub(&to_polynomial(b)),
    Expr::Binary(BinaryOp::Mul, a, b) => to_polynomial(a).mul(&to_polynomial(b)),

    _ => {
      let simplified = simplify(expr);
      match &simplified {
        Expr::IntImm(imm) => Polynomial::constant(imm.value.clone()),

        // Simplification exposed more arithmetic, e.g. `(x + y) / 1`.
        Expr::Variable(_)
        | Expr::Binary(BinaryOp::Add, _, _)
        | Expr::Binary(BinaryOp::Sub, _, _)
        | Expr::Binary(BinaryOp::Mul, _, _) => to_polynomial(&simplified),

        _ => Polynomial::atom(simplified),
      }
    }
  }
}


fn simplify_division(op: BinaryOp, a: Expr, b: Expr) -> Expr {
  let ty = a.ty();
  match (&a, &b) {
    (Expr::IntImm(numerator), Expr::IntImm(denominator)) if !denominator.value.is_zero() => {
      let value = match op {
        BinaryOp::Div => &numerator.value / &denominator.value,
        _             => &numerator.value % &denominator.value,
      };
      Expr::int(value, ty)
    }

    (_, Expr::IntImm(denominator)) if denominator.value.is_one() => {
      match op {
        BinaryOp::Div => a.clone(),
        _             => Expr::int(0, ty),
      }
    }

    _ => Expr::binary(op, a.clone(), b.clone())
  }
}


fn simplify_lattice(op: BinaryOp, expr: &Expr) -> Expr {
  // A-normal form
  let mut operands: Vec<Expr> = Vec::new();
  flatten_operands(op, expr, &mut operands);
  // C-normal form. Sorting puts equal operands next to each other, so idempotence is a `dedup`.
  commutative_normal_form(&mut operands);
  operands.dedup();

  let operands: Vec<Expr> = match op {
    BinaryOp::And | BinaryOp::Or => {
      // The absorbing element decides the whole expression, the identity element drops out.
      let absorbing = op == BinaryOp::Or;
      if operands.contains(&Expr::BoolImm(absorbing)) {
        return Expr::bool(absorbing);
      }
      operands.retain(|operand| *operand != Expr::BoolImm(!absorbing));
      if operands.is_empty() {
        return Expr::bool(!absorbing);
      }
      operands
    }

    _ => {
      let (literals, mut rest): (Vec<Expr>, Vec<Expr>)
          = operands.into_iter().partition(|operand| matches!(operand, Expr::IntImm(_)));
      if let Some(literal) = literals.into_iter().reduce(|best, next| pick_extremum(op, best, next)) {
        rest.insert(0, literal);
      }
      rest
    }
  };

  operands.into_iter()
          .reduce(|result, operand| Expr::binary(op, result, operand))
          .unwrap_or_else(|| Expr::bool(true))
}

/// Collects the operands of nested `op` nodes, simplifying each operand.
fn flatten_operands(op: BinaryOp, expr: &Expr, operands: &mut Vec<Expr>) {
  match expr {
    Expr::Binary(inner, a, b) if *inner == op => {
      flatten_operands(op, a, operands);
      flatten_operands(op, b, operands);
    }

    _ => {
      let simplified = simplify(expr);
      // A simplified operand can itself be an `op` node, e.g. `min(min(x, y) / 1, z)`. It is already flat.
      collect_flat(op, &simplified, operands);
    }
  }
}

fn collect_flat(op: BinaryOp, expr: &Expr, operands: &mut Vec<Expr>) {
  match expr {
    Expr::Binary(inner, a, b) if *inner == op => {
      collect_flat(op, a, operands);
      collect_flat(op, b, operands);
    }
    _ => operands.push(expr.clone())
  }
}

fn pick_extremum(op: BinaryOp, best: Expr, next: Expr) -> Expr {
  let keep_next = match (&best, &next) {
    (Expr::IntImm(IntImm { value: b, .. }), Expr::IntImm(IntImm { value: n, .. })) => {
      match op {
        BinaryOp::Min => n < b,
        _             => n > b,
      }
    }
    _ => false
  };
  if keep_next { next } else { best }
}


/// Both operands must already be simplified.
fn simplify_comparison(op: BinaryOp, a: Expr, b: Expr) -> Expr {
  let (op, a, b) = match op {
    BinaryOp::Gt => (BinaryOp::Lt, b, a),
    BinaryOp::Ge => (BinaryOp::Le, b, a),
    _ => (op, a, b)
  };

  let ty = a.ty();
  if !ty.is_integral() || !b.ty().is_integral() {
    return simplify_boolean_comparison(op, a, b);
  }

  if ty.is_unsigned() && matches!(op, BinaryOp::Lt | BinaryOp::Le) {
    // Differences of unsigned values wrap, so only literal comparisons are decided.
    if let (Expr::IntImm(s), Expr::IntImm(t)) = (&a, &b) {
      return Expr::bool(if op == BinaryOp::Lt { s.value < t.value } else { s.value <= t.value });
    }
    return Expr::binary(op, a, b);
  }

  let difference = to_polynomial(&a).sub(&to_polynomial(&b)).reduced(ty);

  if let Some(constant) = difference.as_constant() {
    return Expr::bool(
      match op {
        BinaryOp::Eq => constant.is_zero(),
        BinaryOp::Ne => !constant.is_zero(),
        BinaryOp::Lt => constant.is_negative(),
        _            => !constant.is_positive(),
      }
    );
  }

  let (mut variable_part, mut constant) = difference.split_constant();
  // `a == b` and `b == a` must come out the same.
  if matches!(op, BinaryOp::Eq | BinaryOp::Ne)
      && variable_part.leading_coefficient().map_or(false, |c| c.is_negative())
  {
    variable_part = variable_part.neg();
    constant = -constant;
  }

  Expr::binary(op, variable_part.to_expr(ty), Expr::int(-constant, ty))
}

fn simplify_boolean_comparison(op: BinaryOp, a: Expr, b: Expr) -> Expr {
  if a == b {
    return Expr::bool(matches!(op, BinaryOp::Eq | BinaryOp::Le));
  }

  if let (Expr::BoolImm(s), Expr::BoolImm(t)) = (&a, &b) {
    return Expr::bool(
      match op {
        BinaryOp::Eq => s == t,
        BinaryOp::Ne => s != t,
        BinaryOp::Lt => !*s && *t,
        _            => s <= t,
      }
    );
  }

  if op.attributes().commutative() && b.is_less(&a) {
    Expr::binary(op, b, a)
  } else {
    Expr::binary(op, a, b)
  }
}


/// The operand must already be simplified.
fn simplify_not(a: Expr) -> Expr {
  match &a {
    Expr::BoolImm(value) => Expr::bool(!*value),

    Expr::Not(inner) => inner.as_ref().clone(),

    Expr::Binary(BinaryOp::Eq, x, y) => simplify_comparison(BinaryOp::Ne, x.as_ref().clone(), y.as_ref().clone()),
    Expr::Binary(BinaryOp::Ne, x, y) => simplify_comparison(BinaryOp::Eq, x.as_ref().clone(), y.as_ref().clone()),

    // !(x < y) == (y <= x) for integers.
    Expr::Binary(BinaryOp::Lt, x, y) if x.ty().is_integral() => {
      simplify_comparison(BinaryOp::Le, y.as_ref().clone(), x.as_ref().clone())
    }
    Expr::Binary(BinaryOp::Le, x, y) if x.ty().is_integral() => {
      simplify_comparison(BinaryOp::Lt, y.as_ref().clone(), x.as_ref().clone())
    }

    _ => Expr::not(a.clone())
  }
}
