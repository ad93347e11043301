/*!

The semantic type carried by variables and literals. Signed integers are assumed never to overflow, so arithmetic
on them is reasoned about over the integers. Unsigned integers wrap modulo `2^bits`.

*/

use std::{
  fmt::{Display, Formatter},
  str::FromStr,
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;
use thiserror::Error;


#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
  Int(u8),
  UInt(u8),
  Bool,
}

impl Type {
  pub fn int(bits: u8) -> Type {
    Type::Int(bits)
  }

  pub fn uint(bits: u8) -> Type {
    Type::UInt(bits)
  }

  pub fn bool() -> Type {
    Type::Bool
  }

  pub fn is_integral(&self) -> bool {
    matches!(self, Type::Int(_) | Type::UInt(_))
  }

  pub fn is_unsigned(&self) -> bool {
    matches!(self, Type::UInt(_))
  }

  /// Reduces `value` into the range of the type. Only unsigned types wrap.
  pub fn wrap(&self, value: BigInt) -> BigInt {
    match self {
      Type::UInt(bits) => {
        let modulus: BigInt = BigInt::one() << (*bits as usize);
        value.mod_floor(&modulus)
      }
      _ => value
    }
  }
}

impl Default for Type {
  fn default() -> Self {
    Type::Int(32)
  }
}

impl Display for Type {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Type::Int(bits)  => write!(f, "int{}", bits),
      Type::UInt(bits) => write!(f, "uint{}", bits),
      Type::Bool       => write!(f, "bool"),
    }
  }
}


#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("unknown type '{0}', expected intN, uintN or bool")]
pub struct UnknownType(pub String);

impl FromStr for Type {
  type Err = UnknownType;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bits = |digits: &str| digits.parse::<u8>().ok().filter(|bits| *bits > 0);

    let ty = if s == "bool" {
      Some(Type::Bool)
    } else if let Some(digits) = s.strip_prefix("uint") {
      bits(digits).map(Type::UInt)
    } else if let Some(digits) = s.strip_prefix("int") {
      bits(digits).map(Type::Int)
    } else {
      None
    };

    ty.ok_or_else(|| UnknownType(s.to_string()))
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unsigned_wraps() {
    let t = Type::uint(8);
    assert_eq!(t.wrap(BigInt::from(256)), BigInt::from(0));
    assert_eq!(t.wrap(BigInt::from(-1)), BigInt::from(255));
    assert_eq!(Type::int(8).wrap(BigInt::from(300)), BigInt::from(300));
  }

  #[test]
  fn formatted_types() {
    assert_eq!(Type::default().to_string(), "int32");
    assert_eq!(Type::uint(16).to_string(), "uint16");
    assert_eq!(Type::bool().to_string(), "bool");
  }

  #[test]
  fn parsed_types() {
    assert_eq!("int32".parse::<Type>(), Ok(Type::int(32)));
    assert_eq!("uint8".parse::<Type>(), Ok(Type::uint(8)));
    assert_eq!("bool".parse::<Type>(), Ok(Type::Bool));
    assert_eq!("int0".parse::<Type>(), Err(UnknownType("int0".to_string())));
    assert!("float".parse::<Type>().is_err());
  }
}
