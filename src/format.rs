/*!

  A `Formatter` holds information about how to format an expression, that is, how
  to express the expression as a string.

  "Formatting" needs to be distinct from Rust's standard `Display` trait, because
  expressions are formatted differently depending on the context. The input form
  is the infix notation the parser reads, fully parenthesized so that the two
  groupings of an operator are visibly different. The full form writes every node
  as `Head[child, child]`, which is easier to read when debugging the normal form.

*/

use strum::EnumString;


#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, Hash, Default)]
pub enum DisplayForm {
  #[default]
  #[strum(serialize = "InputForm")]
  Input,
  #[strum(serialize = "FullForm")]
  Full,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
/// Parameters used in methods that transform expressions into strings.
pub struct Formatter {
  pub form: DisplayForm,
}

impl From<DisplayForm> for Formatter {
  fn from(form: DisplayForm) -> Self {
    Formatter {
      form
    }
  }
}

pub trait Formattable {
  fn format(&self, formatter: &Formatter) -> String;
}


macro_rules! display_formattable_impl {
  ($type_name:ty) => {
    impl std::fmt::Display for $type_name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format(&$crate::format::Formatter::default()))
      }
    }
  }
}
pub(crate) use display_formattable_impl;
