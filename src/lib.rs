/*!

Proves that binary operators are associative.

Both groupings of three operands, `op(op(x, y), z)` and `op(x, op(y, z))`, are built symbolically, canonicalized by
solving for each operand in turn, and compared by the simplifier. The prover accepts an operator as a closure over
expressions or as a template expression in two operands, which can also be parsed from text:

```
use assoclib::{AssociativityProver, SilentLogger, Template};

let prover = AssociativityProver::new(&SilentLogger);
assert!(prover.prove(&Template::parse("x*y + x + y").unwrap().into()));
assert!(!prover.prove(&Template::parse("x - y").unwrap().into()));
```

*/

mod attributes;
mod format;
mod interner;
mod normal_form;
mod polynomial;
mod simplify;
mod solve;
mod substitute;

pub mod associativity;
pub mod expression;
pub mod logging;
pub mod parsing;
pub mod types;

pub use associativity::{is_associative, is_associative_template, AssociativityProver, Operator, ProverConfig, Template};
pub use expression::{Expr, Name};
pub use format::{DisplayForm, Formattable, Formatter};
pub use logging::{CaptureLogger, Channel, Logger, SilentLogger, StdoutLogger};
pub use parsing::{parse, ParseError, Parser};
pub use self_test::{run_self_test, CaseReport, SelfTestReport};
pub use simplify::simplify;
pub use solve::{solve_expression, SolverResult};
pub use substitute::{free_variables, substitute, substitute_all, Substitutions};
pub use types::Type;
