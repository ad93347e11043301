/*!

Symbolic expression trees.

An `Expr` is immutable. Children are held in `Rc`s, so cloning an expression is cheap and every transformation
(substitution, solving, simplification) builds a new tree that shares whatever subtrees it did not change.

Structural equality (`PartialEq`) is the only equality expressions know about. Whether two structurally different
expressions are equal for all inputs is the simplifier's business.

*/

use std::{
  fmt::{Display, Formatter as StdFormatter},
  ops,
  rc::Rc,
};

use num_bigint::BigInt;
use num_traits::One;
use strum_macros::{EnumIter, IntoStaticStr};

use crate::{
  attributes::{Attribute, Attributes},
  format::{display_formattable_impl, DisplayForm, Formattable, Formatter},
  interner::{interned, with_resolved, InternedString},
  types::Type,
};


/// An interned variable name.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Name(pub InternedString);

impl Name {
  pub fn new(name: &str) -> Name {
    Name(interned(name))
  }
}

impl From<&str> for Name {
  fn from(name: &str) -> Self {
    Name::new(name)
  }
}

impl Display for Name {
  fn fmt(&self, f: &mut StdFormatter<'_>) -> std::fmt::Result {
    with_resolved(self.0, |s| write!(f, "{}", s))
  }
}


#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Variable {
  pub name: Name,
  pub ty  : Type,
}


#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct IntImm {
  pub value: BigInt,
  pub ty   : Type,
}


#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, IntoStaticStr, EnumIter)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  /// Truncating division.
  Div,
  /// Remainder of truncating division. Has the sign of the dividend.
  Mod,
  Min,
  Max,
  And,
  Or,
  Eq,
  Ne,
  Lt,
  Le,
  Gt,
  Ge,
}

impl BinaryOp {
  pub fn attributes(&self) -> Attributes {
    let ring       = Attribute::Arithmetic + Attribute::Associative + Attribute::Commutative;
    let lattice    = Attribute::Associative + Attribute::Commutative + Attribute::Idempotent;
    let comparison = Attributes::from(Attribute::Comparison);

    match self {
      BinaryOp::Add | BinaryOp::Mul => ring,
      BinaryOp::Sub | BinaryOp::Div | BinaryOp::Mod => Attribute::Arithmetic.into(),
      BinaryOp::Min | BinaryOp::Max => lattice + Attribute::Arithmetic,
      BinaryOp::And | BinaryOp::Or  => lattice + Attribute::Logical,
      BinaryOp::Eq  | BinaryOp::Ne  => comparison + Attribute::Commutative,
      BinaryOp::Lt  | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => comparison,
    }
  }

  /// The infix sigil, or the function name for operators written as calls.
  pub fn sigil(&self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Div => "/",
      BinaryOp::Mod => "%",
      BinaryOp::Min => "min",
      BinaryOp::Max => "max",
      BinaryOp::And => "&&",
      BinaryOp::Or  => "||",
      BinaryOp::Eq  => "==",
      BinaryOp::Ne  => "!=",
      BinaryOp::Lt  => "<",
      BinaryOp::Le  => "<=",
      BinaryOp::Gt  => ">",
      BinaryOp::Ge  => ">=",
    }
  }

  /// Operators written `f(a, b)` rather than `a ∘ b`.
  pub fn is_function_call(&self) -> bool {
    matches!(self, BinaryOp::Min | BinaryOp::Max)
  }
}


#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Expr {
  Variable(Variable),
  IntImm(IntImm),
  BoolImm(bool),
  Binary(BinaryOp, Rc<Expr>, Rc<Expr>),
  Not(Rc<Expr>),
}


impl Expr {
  // region Convenience construction functions

  pub fn variable(name: &str, ty: Type) -> Expr {
    Expr::Variable(Variable { name: Name::new(name), ty })
  }

  pub fn variable_named(name: Name, ty: Type) -> Expr {
    Expr::Variable(Variable { name, ty })
  }

  pub fn int<T: Into<BigInt>>(value: T, ty: Type) -> Expr {
    Expr::IntImm(IntImm { value: ty.wrap(value.into()), ty })
  }

  pub fn bool(value: bool) -> Expr {
    Expr::BoolImm(value)
  }

  pub fn binary(op: BinaryOp, a: Expr, b: Expr) -> Expr {
    Expr::Binary(op, Rc::new(a), Rc::new(b))
  }

  pub fn not(a: Expr) -> Expr {
    Expr::Not(Rc::new(a))
  }

  // endregion

  /// The type of the value the expression computes.
  pub fn ty(&self) -> Type {
    match self {
      Expr::Variable(v) => v.ty,
      Expr::IntImm(imm) => imm.ty,
      Expr::BoolImm(_)  => Type::Bool,
      Expr::Not(_)      => Type::Bool,
      Expr::Binary(op, a, _) => {
        if op.attributes().arithmetic() {
          a.ty()
        } else {
          Type::Bool
        }
      }
    }
  }

  /// Does the variable `name` occur anywhere in `self`?
  pub fn contains_variable(&self, name: Name) -> bool {
    self.occurrences(name) > 0
  }

  /// Counts the occurrences of the variable `name` in `self`.
  pub fn occurrences(&self, name: Name) -> usize {
    match self {
      Expr::Variable(v) => (v.name == name) as usize,
      Expr::IntImm(_) | Expr::BoolImm(_) => 0,
      Expr::Binary(_, a, b) => a.occurrences(name) + b.occurrences(name),
      Expr::Not(a) => a.occurrences(name),
    }
  }

  /// If `self` is a variable, returns it.
  pub fn as_variable(&self) -> Option<&Variable> {
    match self {
      Expr::Variable(v) => Some(v),
      _ => None
    }
  }

  pub fn is_literal(&self) -> bool {
    matches!(self, Expr::IntImm(_) | Expr::BoolImm(_))
  }
}


/// Is `expr` the literal truth value (or the integer one)?
pub fn is_one(expr: &Expr) -> bool {
  match expr {
    Expr::BoolImm(value) => *value,
    Expr::IntImm(imm)    => imm.value.is_one(),
    _ => false
  }
}


// region Builders for operators without a `std::ops` trait

pub fn min(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Min, a, b)
}

pub fn max(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Max, a, b)
}

pub fn and(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::And, a, b)
}

pub fn or(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Or, a, b)
}

pub fn eq(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Eq, a, b)
}

pub fn ne(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Ne, a, b)
}

pub fn lt(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Lt, a, b)
}

pub fn le(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Le, a, b)
}

pub fn gt(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Gt, a, b)
}

pub fn ge(a: Expr, b: Expr) -> Expr {
  Expr::binary(BinaryOp::Ge, a, b)
}

// endregion

// region std::ops implementations

macro_rules! binary_ops_impl {
  ($trait_name:ident, $method:ident, $op:expr) => {
    impl ops::$trait_name for Expr {
      type Output = Expr;

      fn $method(self, other: Expr) -> Expr {
        Expr::binary($op, self, other)
      }
    }
  }
}

binary_ops_impl!(Add, add, BinaryOp::Add);
binary_ops_impl!(Sub, sub, BinaryOp::Sub);
binary_ops_impl!(Mul, mul, BinaryOp::Mul);
binary_ops_impl!(Div, div, BinaryOp::Div);
binary_ops_impl!(Rem, rem, BinaryOp::Mod);

impl ops::Neg for Expr {
  type Output = Expr;

  fn neg(self) -> Expr {
    let ty = self.ty();
    Expr::int(0, ty) - self
  }
}

impl ops::Not for Expr {
  type Output = Expr;

  fn not(self) -> Expr {
    Expr::not(self)
  }
}

// endregion


impl Formattable for Expr {
  fn format(&self, formatter: &Formatter) -> String {
    match formatter.form {

      DisplayForm::Input => {
        match self {
          Expr::Variable(v)    => v.name.to_string(),
          Expr::IntImm(imm)    => imm.value.to_string(),
          Expr::BoolImm(value) => value.to_string(),
          Expr::Not(a)         => format!("!{}", a.format(formatter)),
          Expr::Binary(op, a, b) if op.is_function_call() => {
            format!("{}({}, {})", op.sigil(), a.format(formatter), b.format(formatter))
          }
          Expr::Binary(op, a, b) => {
            format!("({} {} {})", a.format(formatter), op.sigil(), b.format(formatter))
          }
        }
      }

      DisplayForm::Full => {
        match self {
          Expr::Variable(v)    => format!("Variable[{}, {}]", v.name, v.ty),
          Expr::IntImm(imm)    => format!("IntImm[{}, {}]", imm.value, imm.ty),
          Expr::BoolImm(value) => format!("BoolImm[{}]", value),
          Expr::Not(a)         => format!("Not[{}]", a.format(formatter)),
          Expr::Binary(op, a, b) => {
            let head: &'static str = op.into();
            format!("{}[{}, {}]", head, a.format(formatter), b.format(formatter))
          }
        }
      }

    }
  }
}

display_formattable_impl!(Expr);


#[cfg(test)]
mod tests {
  use super::*;

  fn int32(name: &str) -> Expr {
    Expr::variable(name, Type::int(32))
  }

  #[test]
  fn formatted_expression() {
    let x = int32("x");
    let y = int32("y");
    let z = int32("z");
    let e = (x.clone() + y.clone()) * z.clone();
    assert_eq!(e.to_string(), "((x + y) * z)");
    assert_eq!(min(x.clone(), y.clone()).to_string(), "min(x, y)");
    assert_eq!((!eq(x, y)).to_string(), "!(x == y)");
  }

  #[test]
  fn full_form() {
    let e = int32("x") / Expr::int(2, Type::int(32));
    assert_eq!(
      e.format(&DisplayForm::Full.into()),
      "Div[Variable[x, int32], IntImm[2, int32]]"
    );
  }

  #[test]
  fn expression_types() {
    let x = int32("x");
    let p = Expr::variable("p", Type::bool());
    assert_eq!((x.clone() + x.clone()).ty(), Type::int(32));
    assert_eq!(lt(x.clone(), x.clone()).ty(), Type::Bool);
    assert_eq!(and(p.clone(), p.clone()).ty(), Type::Bool);
    assert_eq!((-x).ty(), Type::int(32));
  }

  #[test]
  fn occurrences() {
    let x = int32("x");
    let y = int32("y");
    let e = x.clone() * x.clone() + y.clone();
    assert_eq!(e.occurrences(Name::new("x")), 2);
    assert!(e.contains_variable(Name::new("y")));
    assert!(!e.contains_variable(Name::new("z")));
  }

  #[test]
  fn structural_equality() {
    // Building the same construction twice gives equal trees.
    let build = || int32("a") + int32("b") * Expr::int(3, Type::int(32));
    assert_eq!(build(), build());
    assert_ne!(int32("a") + int32("b"), int32("b") + int32("a"));
  }

  #[test]
  fn literal_checks() {
    assert!(is_one(&Expr::bool(true)));
    assert!(is_one(&Expr::int(1, Type::int(32))));
    assert!(!is_one(&Expr::bool(false)));
    assert!(!is_one(&int32("x")));
  }

  #[test]
  fn unsigned_literals_wrap() {
    assert_eq!(Expr::int(-1, Type::uint(8)), Expr::int(255, Type::uint(8)));
  }
}
