use thiserror::Error;


#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ParseError {
  #[error("unexpected character '{character}' at position {position}")]
  UnexpectedCharacter { character: char, position: usize },

  #[error("unexpected token '{token}' at position {position}")]
  UnexpectedToken { token: String, position: usize },

  #[error("unexpected end of input")]
  UnexpectedEnd,

  #[error("unknown function '{0}'")]
  UnknownFunction(String),

  /// Two adjacent comparisons, like `a < b < c`.
  #[error("the operator '{0}' is not associative and cannot be chained")]
  NonAssociative(&'static str),

  #[error("malformed integer literal '{0}'")]
  MalformedInteger(String),
}
