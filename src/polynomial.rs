/*!

Polynomial normal form for integer arithmetic.

A polynomial is a sum of terms, each an arbitrary precision coefficient times a monomial. A monomial is a sorted
multiset of atoms: variables, or any subexpression the polynomial cannot see into (a division, a `min`, …), which
is treated as an opaque unknown. Since sums and products are expanded, two `Add`/`Sub`/`Mul` trees that are equal
as polynomials over their atoms produce the same `Polynomial`, no matter how they were parenthesized.

Terms are kept sorted by the normal form order on their monomials with the constant term last, like terms are
merged, and zero terms are dropped. Two polynomials are therefore equal exactly when they are `==`.

*/

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use smallvec::SmallVec;

use crate::{
  expression::Expr,
  normal_form::{cmp_sequences, commutative_normal_form},
  types::Type,
};


pub(crate) type Monomial = SmallVec<[Expr; 4]>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Term {
  pub monomial   : Monomial,
  pub coefficient: BigInt,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub(crate) struct Polynomial {
  terms: Vec<Term>,
}

/// Monomials are ordered lexicographically, except that the empty (constant) monomial comes last.
fn monomial_order(left: &Monomial, right: &Monomial) -> Ordering {
  match (left.is_empty(), right.is_empty()) {
    (true, true)   => Ordering::Equal,
    (true, false)  => Ordering::Greater,
    (false, true)  => Ordering::Less,
    (false, false) => cmp_sequences(left, right),
  }
}

impl Polynomial {

  pub fn constant(value: BigInt) -> Polynomial {
    Polynomial::from_terms(vec![Term { monomial: Monomial::new(), coefficient: value }])
  }

  /// The polynomial `1·atom`.
  pub fn atom(atom: Expr) -> Polynomial {
    let mut monomial = Monomial::new();
    monomial.push(atom);
    Polynomial { terms: vec![Term { monomial, coefficient: BigInt::one() }] }
  }

  /// Builds a polynomial from terms in any order, possibly with repeated monomials and zero coefficients.
  pub fn from_terms(mut terms: Vec<Term>) -> Polynomial {
    terms.sort_by(|a, b| monomial_order(&a.monomial, &b.monomial));

    let mut merged: Vec<Term> = Vec::with_capacity(terms.len());
    for term in terms {
      if let Some(last) = merged.last_mut() {
        if last.monomial == term.monomial {
          last.coefficient += term.coefficient;
          continue;
        }
      }
      merged.push(term);
    }
    merged.retain(|term| !term.coefficient.is_zero());

    Polynomial { terms: merged }
  }

  pub fn terms(&self) -> &[Term] {
    &self.terms
  }

  pub fn is_zero(&self) -> bool {
    self.terms.is_empty()
  }

  /// If the polynomial has no monomials other than the constant one, gives the constant.
  pub fn as_constant(&self) -> Option<BigInt> {
    match self.terms.as_slice() {
      [] => Some(BigInt::zero()),
      [term] if term.monomial.is_empty() => Some(term.coefficient.clone()),
      _ => None
    }
  }

  /// Splits off the constant term: `self == variable_part + constant`.
  pub fn split_constant(&self) -> (Polynomial, BigInt) {
    match self.terms.last() {
      Some(term) if term.monomial.is_empty() => {
        let variable_part = Polynomial { terms: self.terms[..self.terms.len() - 1].to_vec() };
        (variable_part, term.coefficient.clone())
      }
      _ => (self.clone(), BigInt::zero())
    }
  }

  /// The coefficient of the first term in normal form order.
  pub fn leading_coefficient(&self) -> Option<&BigInt> {
    self.terms.first().map(|term| &term.coefficient)
  }

  pub fn add(&self, other: &Polynomial) -> Polynomial {
    let mut terms = self.terms.clone();
    terms.extend(other.terms.iter().cloned());
    Polynomial::from_terms(terms)
  }

  pub fn neg(&self) -> Polynomial {
    self.scale(&-BigInt::one())
  }

  pub fn sub(&self, other: &Polynomial) -> Polynomial {
    self.add(&other.neg())
  }

  pub fn mul(&self, other: &Polynomial) -> Polynomial {
    let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
    for left in &self.terms {
      for right in &other.terms {
        let mut monomial: Monomial = left.monomial.clone();
        monomial.extend(right.monomial.iter().cloned());
        commutative_normal_form(&mut monomial);
        terms.push(Term { monomial, coefficient: &left.coefficient * &right.coefficient });
      }
    }
    Polynomial::from_terms(terms)
  }

  pub fn scale(&self, factor: &BigInt) -> Polynomial {
    let terms = self.terms
                    .iter()
                    .map(|term| Term { monomial: term.monomial.clone(), coefficient: &term.coefficient * factor })
                    .collect();
    Polynomial::from_terms(terms)
  }

  /// Divides every coefficient by `divisor` if all of them are multiples of it.
  pub fn divide_exact(&self, divisor: &BigInt) -> Option<Polynomial> {
    if divisor.is_zero() || !self.terms.iter().all(|term| term.coefficient.is_multiple_of(divisor)) {
      return None;
    }
    let terms = self.terms
                    .iter()
                    .map(|term| Term { monomial: term.monomial.clone(), coefficient: &term.coefficient / divisor })
                    .collect();
    Some(Polynomial::from_terms(terms))
  }

  /// Reduces the coefficients into the range of `ty`. Only unsigned types change.
  pub fn reduced(&self, ty: Type) -> Polynomial {
    if !ty.is_unsigned() {
      return self.clone();
    }
    let terms = self.terms
                    .iter()
                    .map(|term| Term { monomial: term.monomial.clone(), coefficient: ty.wrap(term.coefficient.clone()) })
                    .collect();
    Polynomial::from_terms(terms)
  }

  /// Writes the polynomial back as a left-nested sum in normal form order. Negative coefficients after the first
  /// term become subtractions.
  pub fn to_expr(&self, ty: Type) -> Expr {
    let mut result: Option<Expr> = None;

    for term in &self.terms {
      result = Some(
        match result {
          None => term_expr(&term.monomial, &term.coefficient, ty),
          Some(sum) if term.coefficient.is_negative() => {
            sum - term_expr(&term.monomial, &-&term.coefficient, ty)
          }
          Some(sum) => sum + term_expr(&term.monomial, &term.coefficient, ty),
        }
      );
    }

    result.unwrap_or_else(|| Expr::int(0, ty))
  }

}

fn term_expr(monomial: &Monomial, coefficient: &BigInt, ty: Type) -> Expr {
  let product = monomial.iter().cloned().reduce(|product, factor| product * factor);
  match product {
    None => Expr::int(coefficient.clone(), ty),
    Some(product) if coefficient.is_one() => product,
    Some(product) => Expr::int(coefficient.clone(), ty) * product,
  }
}
