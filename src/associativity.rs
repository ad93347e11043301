/*!

Proving that a binary operator is associative.

An operator `op` is associative if `op(op(x, y), z) == op(x, op(y, z))` for all `x`, `y`, `z`. The prover builds both
groupings over three fresh variables, canonicalizes each by solving for `x`, then `y`, then `z`, and asks the
simplifier whether the two canonical forms are equal. The verdict is `true` only if the comparison simplifies to the
literal `true`.

The procedure is one-sided. `true` is a proof, given a sound solver and simplifier. `false` means no proof was found:
the operator may not be associative, or the simplifier may not be strong enough to tell.

An operator is given either as a Rust closure that builds `op(a, b)` from any two operands (`Operator::Compositional`)
or as a body expression in two named operands (`Operator::Template`). The two forms differ only in how the
groupings are built.

*/

use std::{
  fmt::{Display, Formatter},
  rc::Rc,
};

use fnv::FnvHashSet;

use crate::{
  expression::{eq, is_one, Expr, Name},
  logging::{Channel, Logger},
  parsing::{parse, ParseError},
  simplify::simplify,
  solve::solve_expression,
  substitute::{free_variables, substitute, substitute_all, Substitutions},
  types::Type,
};


/// Placeholder operand names used to find the names a compositional operator captures. They are not valid
/// identifiers, so they can collide neither with parsed names nor with the prover's own.
static PROBE_NAMES: [&str; 2] = ["_probe.0", "_probe.1"];


pub type OperatorFn = dyn Fn(Expr, Expr) -> Expr;

#[derive(Clone)]
pub enum Operator {
  /// A function from two operand expressions to the expression `op(a, b)`.
  Compositional(Rc<OperatorFn>),
  Template(Template),
}

impl Operator {
  pub fn compositional<F>(f: F) -> Operator
    where F: Fn(Expr, Expr) -> Expr + 'static
  {
    Operator::Compositional(Rc::new(f))
  }
}

impl From<Template> for Operator {
  fn from(template: Template) -> Self {
    Operator::Template(template)
  }
}

impl Display for Operator {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Operator::Compositional(op) => {
        let a = Expr::variable("a", Type::default());
        let b = Expr::variable("b", Type::default());
        write!(f, "op(a, b) = {}", op(a, b))
      }
      Operator::Template(template) => write!(f, "{}", template),
    }
  }
}


/// The body of an operator written in terms of two operand variables.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Template {
  pub body: Expr,
  pub lhs : Name,
  pub rhs : Name,
}

impl Template {
  /// A template with operands named `x` and `y`.
  pub fn new(body: Expr) -> Template {
    Template::with_operands(body, "x", "y")
  }

  pub fn with_operands(body: Expr, lhs: &str, rhs: &str) -> Template {
    Template { body, lhs: Name::new(lhs), rhs: Name::new(rhs) }
  }

  /// Parses the body of a template with operands `x` and `y`, e.g. `"x*y + x + y"`.
  pub fn parse(text: &str) -> Result<Template, ParseError> {
    parse(text).map(Template::new)
  }
}

impl Display for Template {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "op({}, {}) = {}", self.lhs, self.rhs, self.body)
  }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ProverConfig {
  /// The type of the fresh variables of a compositional operator.
  pub representative_type: Type,
  /// Preferred names of the three fresh variables. A template only uses the third.
  pub names              : [String; 3],
}

impl Default for ProverConfig {
  fn default() -> Self {
    ProverConfig {
      representative_type: Type::int(32),
      names              : ["x".to_string(), "y".to_string(), "z".to_string()],
    }
  }
}


/// Both groupings of three operands, and the names to solve for, in order.
struct Groupings {
  lhs  : Expr,
  rhs  : Expr,
  names: [Name; 3],
}


pub struct AssociativityProver<'l> {
  logger: &'l dyn Logger,
  config: ProverConfig,
}

impl<'l> AssociativityProver<'l> {

  pub fn new(logger: &'l dyn Logger) -> AssociativityProver<'l> {
    AssociativityProver::with_config(logger, ProverConfig::default())
  }

  pub fn with_config(logger: &'l dyn Logger, config: ProverConfig) -> AssociativityProver<'l> {
    AssociativityProver { logger, config }
  }

  pub fn config(&self) -> &ProverConfig {
    &self.config
  }

  pub fn logger(&self) -> &'l dyn Logger {
    self.logger
  }

  /// Is `op` provably associative?
  pub fn prove(&self, op: &Operator) -> bool {
    let groupings = match op {
      Operator::Compositional(f) => self.compositional_groupings(f.as_ref()),
      Operator::Template(template) => self.template_groupings(template),
    };
    self.canonicalize_and_compare(groupings)
  }

  fn compositional_groupings(&self, op: &OperatorFn) -> Groupings {
    let ty = self.config.representative_type;

    let probes = PROBE_NAMES.map(Name::new);
    let probe  = op(Expr::variable_named(probes[0], ty), Expr::variable_named(probes[1], ty));
    let mut taken = free_variables(&probe);
    for name in &probes {
      taken.remove(name);
    }

    let names = [
      fresh_name(&self.config.names[0], &mut taken),
      fresh_name(&self.config.names[1], &mut taken),
      fresh_name(&self.config.names[2], &mut taken),
    ];
    let [x, y, z] = names.map(|name| Expr::variable_named(name, ty));

    Groupings {
      lhs: op(op(x.clone(), y.clone()), z.clone()),
      rhs: op(x, op(y, z)),
      names,
    }
  }

  fn template_groupings(&self, template: &Template) -> Groupings {
    let body = &template.body;
    let ty   = variable_type(body, template.rhs)
        .or_else(|| variable_type(body, template.lhs))
        .unwrap_or(self.config.representative_type);

    // An operand may be absent from the body, but its name is still bound.
    let mut taken = free_variables(body);
    taken.insert(template.lhs);
    taken.insert(template.rhs);
    let z_name    = fresh_name(&self.config.names[2], &mut taken);
    let y         = Expr::variable_named(template.rhs, ty);
    let z         = Expr::variable_named(z_name, ty);

    // op(op(x, y), z)
    let lhs = substitute(template.rhs, &z, body);
    let lhs = substitute(template.lhs, body, &lhs);

    // op(x, op(y, z))
    let mut shift = Substitutions::default();
    shift.insert(template.lhs, y);
    shift.insert(template.rhs, z);
    let rhs = substitute_all(&shift, body);
    let rhs = substitute(template.rhs, &rhs, body);

    Groupings { lhs, rhs, names: [template.lhs, template.rhs, z_name] }
  }

  fn canonicalize_and_compare(&self, groupings: Groupings) -> bool {
    let Groupings { mut lhs, mut rhs, names } = groupings;

    self.logger.log(Channel::Debug, 4, &format!("Before solving: lhs: {}; rhs: {}", lhs, rhs));

    for name in names {
      let solved_lhs = solve_expression(&lhs, name);
      let solved_rhs = solve_expression(&rhs, name);
      if !(solved_lhs.fully_solved && solved_rhs.fully_solved) {
        self.logger.log(Channel::Debug, 5, &format!("Could not fully solve for {}", name));
      }
      lhs = solved_lhs.result;
      rhs = solved_rhs.result;
    }

    self.logger.log(Channel::Debug, 4, &format!("After solving: lhs: {}; rhs: {}", lhs, rhs));

    let compare = simplify(&eq(lhs, rhs));
    self.logger.log(Channel::Debug, 4, &format!("Checking for associativity: {}", compare));

    is_one(&compare)
  }

}


/// Is the operator `op`, given as a closure, provably associative over `int32`?
pub fn is_associative<F>(op: F, logger: &dyn Logger) -> bool
  where F: Fn(Expr, Expr) -> Expr + 'static
{
  AssociativityProver::new(logger).prove(&Operator::compositional(op))
}

/// Is the operator with the given body in operands `x` and `y` provably associative?
pub fn is_associative_template(body: Expr, logger: &dyn Logger) -> bool {
  AssociativityProver::new(logger).prove(&Template::new(body).into())
}


/// Gives `preferred`, or `preferred` with the smallest numeric suffix that makes it unused, and marks it as used.
fn fresh_name(preferred: &str, taken: &mut FnvHashSet<Name>) -> Name {
  let mut name   = Name::new(preferred);
  let mut suffix = 0;
  while taken.contains(&name) {
    suffix += 1;
    name = Name::new(&format!("{}.{}", preferred, suffix));
  }
  taken.insert(name);
  name
}

/// The type of the first variable named `name` in `expr`.
fn variable_type(expr: &Expr, name: Name) -> Option<Type> {
  match expr {
    Expr::Variable(v) if v.name == name => Some(v.ty),
    Expr::Binary(_, a, b) => variable_type(a, name).or_else(|| variable_type(b, name)),
    Expr::Not(a) => variable_type(a, name),
    _ => None
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    expression::{and, max, min, or},
    logging::{CaptureLogger, SilentLogger},
  };

  fn template(text: &str) -> Operator {
    Template::parse(text).unwrap().into()
  }

  #[test]
  fn compositional_verdicts() {
    let logger = SilentLogger;
    assert!(is_associative(|a, b| a + b, &logger));
    assert!(is_associative(|a, b| a * b, &logger));
    assert!(!is_associative(|a, b| a - b, &logger));
    assert!(!is_associative(|a, b| a / b, &logger));
    assert!(is_associative(min, &logger));
    assert!(is_associative(max, &logger));
  }

  #[test]
  fn template_verdicts() {
    let prover = AssociativityProver::new(&SilentLogger);
    let proven = [
      "x + y", "x * y", "x + y + 1", "x*y + x + y", "x", "y", "min(x, y)", "max(x, y)", "x && y", "x || y",
      "max(min(x, y), min(x, y))",
    ];
    for text in proven {
      assert!(prover.prove(&template(text)), "expected {} to be associative", text);
    }

    let unproven = ["x - y", "x / y", "x % y", "2*x + y", "x*x + y", "min(x, y) + 1"];
    for text in unproven {
      assert!(!prover.prove(&template(text)), "expected {} not to be associative", text);
    }
  }

  #[test]
  fn boolean_compositional_operators() {
    let config = ProverConfig { representative_type: Type::bool(), ..ProverConfig::default() };
    let prover = AssociativityProver::with_config(&SilentLogger, config);
    assert!(prover.prove(&Operator::compositional(and)));
    assert!(prover.prove(&Operator::compositional(or)));
  }

  #[test]
  fn unsigned_representative_type() {
    let config = ProverConfig { representative_type: Type::uint(8), ..ProverConfig::default() };
    let prover = AssociativityProver::with_config(&SilentLogger, config);
    assert!(prover.prove(&Operator::compositional(|a, b| a + b)));
    assert!(!prover.prove(&Operator::compositional(|a, b| a - b)));
  }

  #[test]
  fn representations_agree() {
    let prover = AssociativityProver::new(&SilentLogger);
    let pairs: Vec<(Operator, &str)> = vec![
      (Operator::compositional(|a, b| a + b), "x + y"),
      (Operator::compositional(|a, b| a - b), "x - y"),
      (Operator::compositional(|a, b| a * b), "x * y"),
      (Operator::compositional(|a, b| a / b), "x / y"),
    ];
    for (compositional, text) in pairs {
      assert_eq!(prover.prove(&compositional), prover.prove(&template(text)), "{}", text);
    }
  }

  #[test]
  fn proving_is_idempotent() {
    let prover = AssociativityProver::new(&SilentLogger);
    let op = template("x*y + x + y");
    assert_eq!(prover.prove(&op), prover.prove(&op));
    let op = template("x - y");
    assert_eq!(prover.prove(&op), prover.prove(&op));
  }

  #[test]
  fn naming_independence() {
    let config = ProverConfig {
      names: ["a".to_string(), "b".to_string(), "c".to_string()],
      ..ProverConfig::default()
    };
    let prover = AssociativityProver::with_config(&SilentLogger, config);
    assert!(prover.prove(&Operator::compositional(|a, b| a + b)));
    assert!(!prover.prove(&Operator::compositional(|a, b| a - b)));

    let sum = Template::with_operands(parse("a + b").unwrap(), "a", "b");
    let difference = Template::with_operands(parse("a - b").unwrap(), "a", "b");
    assert!(prover.prove(&sum.into()));
    assert!(!prover.prove(&difference.into()));
  }

  #[test]
  fn captured_names_are_avoided() {
    let logger = CaptureLogger::new();
    let captured = Expr::variable("z", Type::int(32));
    let op = Operator::compositional(move |a, b| a + b + captured.clone());
    assert!(AssociativityProver::new(&logger).prove(&op));

    let before = &logger.messages(Channel::Debug)[0];
    assert!(before.contains("z.1"), "{}", before);

    // The same operator as a template: `z` is free in the body.
    assert!(AssociativityProver::new(&logger).prove(&template("x + y + z")));
  }

  #[test]
  fn operands_absent_from_the_body_are_not_reused() {
    let int32  = Type::int(32);
    let prover = AssociativityProver::new(&SilentLogger);

    // Right projections with the operands named so that the preferred third name is the first operand's.
    let right = Template::with_operands(Expr::variable("w", int32), "z", "w");
    assert!(prover.prove(&right.into()));
    let left = Template::with_operands(Expr::variable("z", int32), "z", "w");
    assert!(prover.prove(&left.into()));
    assert!(prover.prove(&template("y")));

    // The preferred third name is the first operand, which the body never mentions.
    let config = ProverConfig {
      names: ["x".to_string(), "y".to_string(), "x".to_string()],
      ..ProverConfig::default()
    };
    let logger = CaptureLogger::new();
    let prover = AssociativityProver::with_config(&logger, config);
    assert!(prover.prove(&template("y")));
    assert!(!prover.prove(&template("y - x")));
    assert_eq!(logger.messages(Channel::Debug)[0], "Before solving: lhs: x.1; rhs: x.1");
  }

  #[test]
  fn progress_is_logged() {
    let logger = CaptureLogger::new();
    assert!(AssociativityProver::new(&logger).prove(&template("x + y")));

    let messages = logger.messages(Channel::Debug);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], "Before solving: lhs: ((x + y) + z); rhs: (x + (y + z))");
    assert!(messages[1].starts_with("After solving: "));
    assert_eq!(messages[2], "Checking for associativity: true");
  }

  #[test]
  fn fresh_names() {
    let mut taken: FnvHashSet<Name> = ["z", "z.1"].iter().map(|s| Name::new(s)).collect();
    assert_eq!(fresh_name("z", &mut taken), Name::new("z.2"));
    assert_eq!(fresh_name("x", &mut taken), Name::new("x"));
    assert_eq!(fresh_name("x", &mut taken), Name::new("x.1"));
  }

  #[test]
  fn displayed_operators() {
    assert_eq!(template("x - y").to_string(), "op(x, y) = (x - y)");
    assert_eq!(Operator::compositional(min).to_string(), "op(a, b) = min(a, b)");
  }
}
