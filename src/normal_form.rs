/*

# Normalization

Dundua et al describe a formal framework for matching in associative and commutative
theories. A key component of their system is a normal form for terms. The
ordering of function symbols, terms, and term sequences is arbitrary but fixed.

> An _associative normal form_ (A-normal form) of a term or a sequence is obtained
> by rewriting it with the associativity axiom from left to right as long as
> possible. …

> We introduce a strict total order on function symbols and extend it to ground
> terms and term sequences so that the obtained ordering is also total. A
> commutative normal form (C-normal form) of a ground term is obtained by
> rearranging arguments of commutative function symbols to obtain the minimal term
> with respect to the defined ordering.

The simplifier uses both. Operands of an associative operator are collected into
a flat list (A-normal form), and operands of a commutative operator, as well as
the factors of a monomial and the monomials of a polynomial, are sorted with the
order below (C-normal form). Two expressions that differ only by the placement of
parentheses or the order of commutative operands therefore come out of the
simplifier identical.

*/

use std::cmp::Ordering;

use crate::{
  expression::{BinaryOp, Expr, Name, Variable},
  interner::cmp_resolved,
  types::Type,
};

/// A total order on all expressions.
///
/// The total ordering does not use Rust's in-built `Ord` trait, because
/// implementors may have a different ordering that is natural for the type, and
/// normalization does not require Rust's ordering machinery.
///
/// The order agrees with structural equality: `cmp` gives `Equal` exactly when the
/// two values are `==`.
pub trait NormalFormOrder {
  fn cmp(&self, other: &Self) -> Ordering;

  fn is_equal(&self, other: &Self) -> bool {
      self.cmp(other) == Ordering::Equal
  }

  fn is_greater(&self, other: &Self) -> bool {
      self.cmp(other) == Ordering::Greater
  }

  fn is_less(&self, other: &Self) -> bool {
      self.cmp(other) == Ordering::Less
  }
}

impl NormalFormOrder for Name {
  fn cmp(&self, other: &Self) -> Ordering {
    cmp_resolved(self.0, other.0)
  }
}

impl NormalFormOrder for Type {
  fn cmp(&self, other: &Self) -> Ordering {
    fn key(ty: &Type) -> (u8, u8) {
      match ty {
        Type::Bool       => (0, 1),
        Type::Int(bits)  => (1, *bits),
        Type::UInt(bits) => (2, *bits),
      }
    }
    key(self).cmp(&key(other))
  }
}

impl NormalFormOrder for BinaryOp {
  fn cmp(&self, other: &Self) -> Ordering {
    (*self as u32).cmp(&(*other as u32))
  }
}

impl NormalFormOrder for Variable {
  fn cmp(&self, other: &Self) -> Ordering {
    NormalFormOrder::cmp(&self.name, &other.name)
        .then_with(|| NormalFormOrder::cmp(&self.ty, &other.ty))
  }
}

impl NormalFormOrder for Expr {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self, other) {

      // Same expression type //

      (Expr::BoolImm(s), Expr::BoolImm(t)) => s.cmp(t),

      (Expr::IntImm(s), Expr::IntImm(t))
      => {
        s.value.cmp(&t.value).then_with(|| NormalFormOrder::cmp(&s.ty, &t.ty))
      },

      (Expr::Variable(s), Expr::Variable(t)) => NormalFormOrder::cmp(s, t),

      (Expr::Binary(f, f_a, f_b), Expr::Binary(g, g_a, g_b))
      => {
        // Binary nodes are compared via lexicographic comparison of (operator, a, b).
        NormalFormOrder::cmp(f, g)
            .then_with(|| NormalFormOrder::cmp(f_a.as_ref(), g_a.as_ref()))
            .then_with(|| NormalFormOrder::cmp(f_b.as_ref(), g_b.as_ref()))
      },

      (Expr::Not(s), Expr::Not(t)) => NormalFormOrder::cmp(s.as_ref(), t.as_ref()),

      // Different expression types //
      // BoolImm < IntImm < Variable < Binary < Not
      (thing_one, thing_two) => {
        kind_rank(thing_one).cmp(&kind_rank(thing_two))
      }

    } // end match
  }
}

fn kind_rank(expr: &Expr) -> u8 {
  match expr {
    Expr::BoolImm(_)      => 0,
    Expr::IntImm(_)       => 1,
    Expr::Variable(_)     => 2,
    Expr::Binary(_, _, _) => 3,
    Expr::Not(_)          => 4,
  }
}

/// Lexicographic order on sequences of expressions. A proper prefix is less than the longer sequence.
pub fn cmp_sequences(left: &[Expr], right: &[Expr]) -> Ordering {
  for (l, r) in left.iter().zip(right.iter()) {
    let ordering = NormalFormOrder::cmp(l, r);
    if ordering != Ordering::Equal {
      return ordering;
    }
  }
  // If we get this far, expression pairs have been equal. Compare lengths.
  left.len().cmp(&right.len())
}

/// Sorts `operands` into C-normal form.
pub fn commutative_normal_form(operands: &mut [Expr]) {
  operands.sort_by(NormalFormOrder::cmp);
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normal_form_ordering() {
    let a = Expr::variable("albatross", Type::int(32));
    let b = Expr::variable("bacon", Type::int(32));
    let two = Expr::int(2, Type::int(32));

    assert_eq!(NormalFormOrder::cmp(&a, &b), Ordering::Less);
    assert!(two.is_less(&a));
    assert!((a.clone() + b.clone()).is_greater(&b));
    assert!((a.clone() + b.clone()).is_equal(&(a.clone() + b.clone())));
    assert!((a.clone() + b.clone()).is_less(&(a.clone() * b.clone())));
  }

  #[test]
  fn sorted_operands() {
    let x = Expr::variable("x", Type::int(32));
    let y = Expr::variable("y", Type::int(32));
    let one = Expr::int(1, Type::int(32));
    let mut operands = vec![y.clone(), one.clone(), x.clone()];
    commutative_normal_form(&mut operands);
    assert_eq!(operands, vec![one, x, y]);
  }

  #[test]
  fn sequence_order() {
    let x = Expr::variable("x", Type::int(32));
    let y = Expr::variable("y", Type::int(32));
    assert_eq!(cmp_sequences(&[x.clone()], &[x.clone(), y.clone()]), Ordering::Less);
    assert_eq!(cmp_sequences(&[y.clone()], &[x.clone(), y.clone()]), Ordering::Greater);
    assert_eq!(cmp_sequences(&[x.clone(), y.clone()], &[x, y]), Ordering::Equal);
  }
}
