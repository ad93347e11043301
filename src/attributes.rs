/*!

The algebraic attributes of a binary operator, e.g. `Commutative`, `Associative`, ….

Attributes are implemented as a bitfield. The simplifier consults them instead of matching on individual operators
so that, for example, every associative-commutative operator is flattened and sorted by the same code.

*/

use std::ops::Add;

use strum_macros::{Display, IntoStaticStr, EnumIter};

#[derive(Copy, Clone, PartialEq, Eq, Display, IntoStaticStr, Debug, EnumIter)]
#[repr(u32)]
pub enum Attribute {
  /// `f(a, b) == f(b, a)`
  Commutative = 0,
  /// `f(f(a, b), c) == f(a, f(b, c))`
  Associative,
  /// `f(a, a) == a`
  Idempotent,
  /// Integer valued, with integer operands.
  Arithmetic,
  /// Boolean valued, with boolean operands.
  Logical,
  /// Boolean valued, with operands of any one type.
  Comparison,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct Attributes(pub u32);

impl From<Attribute> for Attributes {
  fn from(attribute: Attribute) -> Self {
    Attributes(1u32 << attribute as u32)
  }
}

impl Attributes {
  // region Convenience getters and setters

  pub fn get(&self, attribute: Attribute) -> bool {
    (self.0 & (1 << attribute as u32)) != 0
  }

  pub fn set(&mut self, attribute: Attribute) {
    self.0 |= 1 << attribute as u32
  }

  pub fn commutative(&self) -> bool {
    self.get(Attribute::Commutative)
  }

  pub fn associative(&self) -> bool {
    self.get(Attribute::Associative)
  }

  pub fn idempotent(&self) -> bool {
    self.get(Attribute::Idempotent)
  }

  pub fn arithmetic(&self) -> bool {
    self.get(Attribute::Arithmetic)
  }

  pub fn logical(&self) -> bool {
    self.get(Attribute::Logical)
  }

  pub fn comparison(&self) -> bool {
    self.get(Attribute::Comparison)
  }

  /// Associative, commutative and idempotent: the operands form a set.
  pub fn lattice(&self) -> bool {
    self.associative() && self.commutative() && self.idempotent()
  }

  // endregion

}

// region Attribute addition implementations.

impl Add<Attribute> for Attributes {
  type Output = Self;

  fn add(mut self, other: Attribute) -> Self {
    self.set(other);
    self
  }
}


impl Add<Attribute> for Attribute {
  type Output = Attributes;

  fn add(self, other: Attribute) -> Self::Output {
    let mut out: Attributes = self.into();
    out.set(other);
    out
  }
}

// endregion
