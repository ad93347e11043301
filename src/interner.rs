/*!
A dictionary of interned strings. Expressions are built from `Rc`s and never cross threads, so the dictionary is
thread-local. Provides an abstraction API for any interner library.

*/

use std::cell::RefCell;

use string_interner::{
  StringInterner,
  symbol::SymbolU32
};

pub type InternedString = SymbolU32;

thread_local! {
  static STRING_INTERNER: RefCell<StringInterner> = RefCell::new(StringInterner::default());
}


pub fn interned(string: &str) -> InternedString {
  STRING_INTERNER.with(|interner| interner.borrow_mut().get_or_intern(string))
}


/// Calls `f` on the string behind `symbol` without copying it. An interned symbol always resolves on the thread that
/// created it.
pub fn with_resolved<F, R>(symbol: InternedString, f: F) -> R
  where F: FnOnce(&str) -> R
{
  STRING_INTERNER.with(|interner| {
    let interner = interner.borrow();
    f(interner.resolve(symbol).unwrap_or(""))
  })
}

/// Compares the strings behind two symbols lexicographically.
pub fn cmp_resolved(left: InternedString, right: InternedString) -> std::cmp::Ordering {
  if left == right {
    return std::cmp::Ordering::Equal;
  }
  STRING_INTERNER.with(|interner| {
    let interner = interner.borrow();
    interner.resolve(left).cmp(&interner.resolve(right))
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn intern_and_resolve() {
    let a = interned("alpha");
    let b = interned("alpha");
    assert_eq!(a, b);
    assert_eq!(with_resolved(a, |s| s.to_string()), "alpha");
    assert_ne!(a, interned("beta"));
  }

  #[test]
  fn resolved_order() {
    let a = interned("apple");
    let b = interned("banana");
    assert_eq!(cmp_resolved(a, b), std::cmp::Ordering::Less);
    assert_eq!(cmp_resolved(b, a), std::cmp::Ordering::Greater);
    assert_eq!(cmp_resolved(a, a), std::cmp::Ordering::Equal);
  }
}
