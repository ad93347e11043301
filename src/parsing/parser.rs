/*!

A Pratt parser for operator templates: `x + y`, `min(x, y)`, `x*y + x + y`, `x && !y`.

The algorithm is the usual precedence climbing loop. A null token (a leaf, a parenthesized expression, a call, or a
prefix operator) starts an expression; then, as long as the next token is an infix operator that binds at least as
tightly as the caller allows, the expression built so far becomes its left operand and the right operand is parsed
with the operator's right binding power. Infix operator data lives in the operator table.

See Theodore S. Norvell, "From Precedence Climbing to Pratt Parsing," 2016:
https://www.engr.mun.ca/~theo/Misc/pratt_parsing.htm

Variables are typed when they are parsed. A name that was declared with `Parser::declare` gets its declared type.
Any other name gets `bool` if it is a direct operand of `&&`, `||` or `!` anywhere in the input, and the parser's
default type otherwise.

*/

use std::{iter::Peekable, vec::IntoIter};

use fnv::{FnvHashMap, FnvHashSet};
use num_bigint::BigInt;

use crate::{
  expression::{BinaryOp, Expr, Name},
  parsing::{
    error::ParseError,
    lexer::{tokenize, Spanned, Token},
    operator::{Associativity, BINARY_OPERATORS, PREFIX_PRECEDENCE},
  },
  substitute::{substitute_all, Substitutions},
  types::Type,
};


type Tokens = Peekable<IntoIter<Spanned>>;


/// Parses `text` with every undeclared variable of type `int32` (or `bool` where used as a boolean).
pub fn parse(text: &str) -> Result<Expr, ParseError> {
  Parser::default().parse(text)
}


#[derive(Clone, Debug, Default)]
pub struct Parser {
  default_type: Type,
  declared    : FnvHashMap<Name, Type>,
}

impl Parser {

  pub fn new(default_type: Type) -> Parser {
    Parser { default_type, declared: FnvHashMap::default() }
  }

  /// Gives the variable `name` the type `ty` wherever it occurs.
  pub fn declare(&mut self, name: &str, ty: Type) -> &mut Parser {
    self.declared.insert(Name::new(name), ty);
    self
  }

  pub fn parse(&self, text: &str) -> Result<Expr, ParseError> {
    let mut tokens: Tokens = tokenize(text)?.into_iter().peekable();

    let expression = self.parse_expression(0, &mut tokens)?;

    // The whole input must be consumed.
    if let Some(spanned) = tokens.next() {
      return Err(unexpected(spanned));
    }

    Ok(self.infer_boolean_variables(expression))
  }

  fn parse_expression(&self, previous_binding_power: u32, tokens: &mut Tokens) -> Result<Expr, ParseError> {
    let mut current_root = self.null_denotation(tokens)?;

    loop {
      let info = match tokens.peek() {
        Some(Spanned { token: Token::Punctuation(sigil), .. }) => {
          match BINARY_OPERATORS.get(sigil) {
            Some(info) => *info,
            // An o-token like `)` or `,` ends the expression. The caller decides if it belongs there.
            None => break,
          }
        }
        Some(_) | None => break,
      };

      if previous_binding_power > info.precedence {
        break;
      }
      tokens.next();

      let rhs = self.parse_expression(info.right_binding_power(), tokens)?;
      current_root = Expr::binary(info.op, current_root, rhs);

      if info.associativity == Associativity::Non {
        if let Some(Spanned { token: Token::Punctuation(sigil), .. }) = tokens.peek() {
          if let Some(next) = BINARY_OPERATORS.get(sigil) {
            if next.precedence == info.precedence {
              return Err(ParseError::NonAssociative(info.op.sigil()));
            }
          }
        }
      }
    }

    Ok(current_root)
  }

  /// Parses a token that can begin an expression, together with whatever operands it takes on its right.
  fn null_denotation(&self, tokens: &mut Tokens) -> Result<Expr, ParseError> {
    let Spanned { token, position } = tokens.next().ok_or(ParseError::UnexpectedEnd)?;

    match token {
      Token::Integer(digits) => {
        let value: BigInt = digits.parse().map_err(|_| ParseError::MalformedInteger(digits.clone()))?;
        Ok(Expr::int(value, self.default_type))
      }

      Token::Identifier(name) => {
        match name.as_str() {
          "true"  => return Ok(Expr::bool(true)),
          "false" => return Ok(Expr::bool(false)),
          _ => { /* pass */ }
        }

        let is_call = tokens.peek().map_or(false, |next| next.token.is("("));
        if !is_call {
          return Ok(Expr::variable(&name, self.default_type));
        }

        let op = match name.as_str() {
          "min" => BinaryOp::Min,
          "max" => BinaryOp::Max,
          _ => return Err(ParseError::UnknownFunction(name)),
        };
        tokens.next();
        let a = self.parse_expression(0, tokens)?;
        expect(tokens, ",")?;
        let b = self.parse_expression(0, tokens)?;
        expect(tokens, ")")?;
        Ok(Expr::binary(op, a, b))
      }

      Token::Punctuation("(") => {
        let inner = self.parse_expression(0, tokens)?;
        expect(tokens, ")")?;
        Ok(inner)
      }

      Token::Punctuation("-") => {
        match self.parse_expression(PREFIX_PRECEDENCE, tokens)? {
          Expr::IntImm(imm) => Ok(Expr::int(-imm.value, imm.ty)),
          operand => Ok(-operand),
        }
      }

      Token::Punctuation("!") => Ok(!self.parse_expression(PREFIX_PRECEDENCE, tokens)?),

      Token::Punctuation(sigil) => Err(ParseError::UnexpectedToken { token: sigil.to_string(), position }),
    }
  }

  fn infer_boolean_variables(&self, expression: Expr) -> Expr {
    let mut names: FnvHashSet<Name> = FnvHashSet::default();
    collect_boolean_operands(&expression, &mut names);

    let mut substitutions = Substitutions::default();
    for name in names {
      let ty = self.declared.get(&name).copied().unwrap_or(Type::Bool);
      substitutions.insert(name, Expr::variable_named(name, ty));
    }
    for (name, ty) in &self.declared {
      substitutions.entry(*name).or_insert_with(|| Expr::variable_named(*name, *ty));
    }

    substitute_all(&substitutions, &expression)
  }

}


fn collect_boolean_operands(expression: &Expr, names: &mut FnvHashSet<Name>) {
  match expression {
    Expr::Binary(op, a, b) => {
      if op.attributes().logical() {
        names.extend(a.as_variable().map(|v| v.name));
        names.extend(b.as_variable().map(|v| v.name));
      }
      collect_boolean_operands(a, names);
      collect_boolean_operands(b, names);
    }

    Expr::Not(a) => {
      names.extend(a.as_variable().map(|v| v.name));
      collect_boolean_operands(a, names);
    }

    _ => { /* pass */ }
  }
}

fn expect(tokens: &mut Tokens, sigil: &'static str) -> Result<(), ParseError> {
  match tokens.next() {
    Some(spanned) if spanned.token.is(sigil) => Ok(()),
    Some(spanned) => Err(unexpected(spanned)),
    None => Err(ParseError::UnexpectedEnd),
  }
}

fn unexpected(spanned: Spanned) -> ParseError {
  ParseError::UnexpectedToken { token: spanned.token.to_string(), position: spanned.position }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::expression::{and, eq, lt, max, min, or};

  fn int32(name: &str) -> Expr {
    Expr::variable(name, Type::int(32))
  }

  fn boolean(name: &str) -> Expr {
    Expr::variable(name, Type::bool())
  }

  fn c(value: i64) -> Expr {
    Expr::int(value, Type::int(32))
  }

  #[test]
  fn precedence() {
    assert_eq!(parse("x + y * 2").unwrap(), int32("x") + int32("y") * c(2));
    assert_eq!(parse("(x + y) * 2").unwrap(), (int32("x") + int32("y")) * c(2));
    assert_eq!(parse("x - y - z").unwrap(), (int32("x") - int32("y")) - int32("z"));
    assert_eq!(parse("x / y % z").unwrap(), (int32("x") / int32("y")) % int32("z"));
    assert_eq!(
      parse("x < y + 1 == true").unwrap(),
      eq(lt(int32("x"), int32("y") + c(1)), Expr::bool(true))
    );
  }

  #[test]
  fn calls_and_prefix_operators() {
    assert_eq!(parse("min(x, y)").unwrap(), min(int32("x"), int32("y")));
    assert_eq!(parse("max(x*2, -y)").unwrap(), max(int32("x") * c(2), -int32("y")));
    assert_eq!(parse("-3 * x").unwrap(), c(-3) * int32("x"));
    assert_eq!(parse("-(x)").unwrap(), -int32("x"));
  }

  #[test]
  fn boolean_operands_are_typed_bool() {
    assert_eq!(parse("x && y").unwrap(), and(boolean("x"), boolean("y")));
    assert_eq!(parse("x || !y").unwrap(), or(boolean("x"), !boolean("y")));
    assert_eq!(parse("x < y && z").unwrap(), and(lt(int32("x"), int32("y")), boolean("z")));
  }

  #[test]
  fn declared_types() {
    let mut parser = Parser::new(Type::int(32));
    parser.declare("x", Type::uint(8)).declare("y", Type::uint(8));
    assert_eq!(
      parser.parse("x + y").unwrap(),
      Expr::variable("x", Type::uint(8)) + Expr::variable("y", Type::uint(8))
    );
  }

  #[test]
  fn errors() {
    assert_eq!(parse("x +"), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse("pow(x, y)"), Err(ParseError::UnknownFunction("pow".to_string())));
    assert_eq!(parse("a < b < c"), Err(ParseError::NonAssociative("<")));
    assert_eq!(
      parse("x y"),
      Err(ParseError::UnexpectedToken { token: "y".to_string(), position: 2 })
    );
    assert_eq!(
      parse("min(x y)"),
      Err(ParseError::UnexpectedToken { token: "y".to_string(), position: 6 })
    );
    assert_eq!(parse(")"), Err(ParseError::UnexpectedToken { token: ")".to_string(), position: 0 }));
    assert!(matches!(parse("x $ y"), Err(ParseError::UnexpectedCharacter { character: '$', .. })));
  }
}
