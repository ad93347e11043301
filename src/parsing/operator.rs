/*!

The operator table holds the syntactic data of every infix operator: the operator it builds, its precedence, and its
associativity. The parsing algorithm looks an operator up by its sigil.

Operators written as calls (`min(a, b)`) have no entry; the parser treats their names as function heads.

*/

use fnv::FnvHashMap;
use lazy_static::lazy_static;
use strum::IntoEnumIterator;

use crate::expression::BinaryOp;


/// The binding power of prefix `-` and `!`. Higher than every infix operator.
pub const PREFIX_PRECEDENCE: u32 = 70;


#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Associativity {
  Left, // E.g. 3-4-5 == (3-4)-5 != 3 - (4-5)
  Non,  // The operator cannot be adjacent to another operator of the same precedence, e.g. `a < b < c`.
}


#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct OperatorInfo {
  pub op           : BinaryOp,
  pub precedence   : u32,
  pub associativity: Associativity,
}

impl OperatorInfo {
  /// The minimum precedence of the operators allowed in this operator's right operand.
  pub fn right_binding_power(&self) -> u32 {
    self.precedence + 1
  }
}


lazy_static! {
  pub static ref BINARY_OPERATORS: FnvHashMap<&'static str, OperatorInfo> = {
    let mut table = FnvHashMap::default();
    for op in BinaryOp::iter().filter(|op| !op.is_function_call()) {
      let (precedence, associativity) = match op {
        BinaryOp::Or  => (10, Associativity::Left),
        BinaryOp::And => (20, Associativity::Left),

        BinaryOp::Eq
        | BinaryOp::Ne => (30, Associativity::Non),

        BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge => (40, Associativity::Non),

        BinaryOp::Add
        | BinaryOp::Sub => (50, Associativity::Left),

        _ => (60, Associativity::Left),
      };
      table.insert(op.sigil(), OperatorInfo { op, precedence, associativity });
    }
    table
  };
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operator_table() {
    assert_eq!(BINARY_OPERATORS.len(), 13);
    assert!(BINARY_OPERATORS.get("min").is_none());
    assert_eq!(BINARY_OPERATORS["%"].op, BinaryOp::Mod);
    assert!(BINARY_OPERATORS["*"].precedence > BINARY_OPERATORS["+"].precedence);
    assert!(BINARY_OPERATORS["&&"].precedence > BINARY_OPERATORS["||"].precedence);
    assert_eq!(BINARY_OPERATORS["<="].associativity, Associativity::Non);
    assert!(PREFIX_PRECEDENCE > BINARY_OPERATORS["*"].precedence);
  }
}
