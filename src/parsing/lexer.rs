/*!

Minimal lexer. The whole input is split into tokens up front; the parser only ever looks one token ahead.

Identifiers and integers are recognized with anchored regular expressions. Punctuation (operator sigils,
parentheses, the argument separator) is recognized with a leftmost-longest Aho-Corasick automaton, so that `<=` is
never read as `<` followed by `=`.

*/

use std::fmt::{Display, Formatter};

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use lazy_static::lazy_static;
use regex::Regex;
use strum::AsRefStr;

use crate::parsing::{error::ParseError, operator::BINARY_OPERATORS};


/// Punctuation that is not a binary operator sigil.
static OTHER_PUNCTUATION: [&str; 4] = ["!", "(", ")", ","];

lazy_static! {
  static ref WHITESPACE: Regex = Regex::new(r"^[ \t\r\n]+").unwrap();
  static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z_0-9]*").unwrap();
  static ref INTEGER   : Regex = Regex::new(r"^[0-9]+").unwrap();

  static ref PUNCTUATION: Vec<&'static str> = {
    let mut sigils: Vec<&'static str> = BINARY_OPERATORS.keys().copied().collect();
    sigils.extend(OTHER_PUNCTUATION.iter());
    sigils.sort_unstable();
    sigils
  };
  static ref PUNCTUATION_MATCHER: AhoCorasick = AhoCorasickBuilder::new()
      .match_kind(MatchKind::LeftmostLongest)
      .anchored(true)
      .build(PUNCTUATION.iter());
}


#[derive(Clone, PartialEq, Eq, Debug, AsRefStr)]
pub enum Token {
  Identifier(String),
  Integer(String),
  Punctuation(&'static str),
}

impl Token {
  /// Is `self` the punctuation `sigil`?
  pub fn is(&self, sigil: &str) -> bool {
    matches!(self, Token::Punctuation(p) if *p == sigil)
  }
}

impl Display for Token {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Token::Identifier(name) => write!(f, "{}", name),
      Token::Integer(digits)  => write!(f, "{}", digits),
      Token::Punctuation(p)   => write!(f, "{}", p),
    }
  }
}


/// A token together with the byte offset at which it starts.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Spanned {
  pub token   : Token,
  pub position: usize,
}


pub fn tokenize(text: &str) -> Result<Vec<Spanned>, ParseError> {
  let mut tokens: Vec<Spanned> = Vec::new();
  let mut position             = 0;

  while position < text.len() {
    let rest = &text[position..];

    if let Some(m) = WHITESPACE.find(rest) {
      position += m.end();
      continue;
    }

    let (token, length) =
      if let Some(m) = IDENTIFIER.find(rest) {
        (Token::Identifier(m.as_str().to_string()), m.end())
      } else if let Some(m) = INTEGER.find(rest) {
        (Token::Integer(m.as_str().to_string()), m.end())
      } else if let Some(m) = PUNCTUATION_MATCHER.find(rest) {
        (Token::Punctuation(PUNCTUATION[m.pattern()]), m.end())
      } else {
        // `rest` is non-empty, so there is a next character.
        let character = rest.chars().next().unwrap_or_default();
        return Err(ParseError::UnexpectedCharacter { character, position });
      };

    tokens.push(Spanned { token, position });
    position += length;
  }

  Ok(tokens)
}


#[cfg(test)]
mod tests {
  use super::*;

  fn lexemes(text: &str) -> Vec<String> {
    tokenize(text).unwrap().into_iter().map(|s| s.token.to_string()).collect()
  }

  #[test]
  fn lex_test() {
    assert_eq!(lexemes("min(x_1, 42)<=y"), vec!["min", "(", "x_1", ",", "42", ")", "<=", "y"]);
    assert_eq!(lexemes("a&&!b || c != d"), vec!["a", "&&", "!", "b", "||", "c", "!=", "d"]);
    assert_eq!(lexemes("  "), Vec::<String>::new());
  }

  #[test]
  fn token_kinds_and_positions() {
    let tokens = tokenize("x + 10").unwrap();
    assert_eq!(tokens[0].token.as_ref(), "Identifier");
    assert_eq!(tokens[1], Spanned { token: Token::Punctuation("+"), position: 2 });
    assert_eq!(tokens[2].token.as_ref(), "Integer");
    assert_eq!(tokens[2].position, 4);
  }

  #[test]
  fn unexpected_character() {
    assert_eq!(
      tokenize("x # y"),
      Err(ParseError::UnexpectedCharacter { character: '#', position: 2 })
    );
    // A lone `&` is not an operator.
    assert!(tokenize("x & y").is_err());
  }
}
