/*!

Parsing of operator templates from text.

 */
mod error;
mod lexer;
mod operator;
mod parser;

pub use error::ParseError;
pub use parser::{parse, Parser};
