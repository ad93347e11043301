use std::process::ExitCode;

use clap::Parser as ClapParser;

use assoclib::{
  associativity::{AssociativityProver, ProverConfig, Template},
  logging::{Channel, Logger, StdoutLogger},
  parsing::Parser,
  self_test::{extended_cases, run_cases, run_self_test, SelfTestReport},
  types::Type,
  DisplayForm,
  Formattable,
};


/// Proves binary operators associative. With no templates, runs the built-in self-test.
#[derive(ClapParser, Debug)]
#[command(name = "assoc-prove")]
struct Cli {
  /// Operator bodies in the operands `x` and `y`, e.g. "x*y + x + y" or "min(x, y)".
  templates: Vec<String>,

  /// Type of operands that are not used as booleans: intN, uintN or bool.
  #[arg(short = 't', long = "type", default_value = "int32")]
  ty: Type,

  /// 1 reports results, 4 traces each proof, 5 adds solver detail.
  #[arg(short, long, env = "ASSOC_VERBOSITY", default_value_t = 1)]
  verbosity: i32,

  /// Print each parsed template in full form.
  #[arg(long)]
  full_form: bool,

  /// Also run the cases for `min`, `max`, `&&`, `||` and `%` in the self-test.
  #[arg(long)]
  extended: bool,
}


fn main() -> ExitCode {
  let cli    = Cli::parse();
  let logger = StdoutLogger::new(cli.verbosity);

  if cli.templates.is_empty() {
    return self_test(&cli, &logger);
  }

  let parser     = Parser::new(cli.ty);
  let config     = ProverConfig { representative_type: cli.ty, ..ProverConfig::default() };
  let prover     = AssociativityProver::with_config(&logger, config);
  let mut status = ExitCode::SUCCESS;

  for text in &cli.templates {
    match parser.parse(text) {
      Ok(body) => {
        if cli.full_form {
          logger.log(Channel::Debug, 4, &body.format(&DisplayForm::Full.into()));
        }
        let template = Template::new(body);
        let verdict  = prover.prove(&template.clone().into());
        println!("{}: {}", template, if verdict { "associative" } else { "not proven associative" });
      }

      Err(error) => {
        logger.log(Channel::Error, 1, &format!("{}: {}", text, error));
        status = ExitCode::FAILURE;
      }
    }
  }

  status
}

fn self_test(cli: &Cli, logger: &StdoutLogger) -> ExitCode {
  let mut report = run_self_test(logger);

  if cli.extended {
    let prover   = AssociativityProver::new(logger);
    let extended = SelfTestReport { cases: run_cases(&prover, &extended_cases()) };
    for failure in extended.failures() {
      logger.log(Channel::Error, 1, &failure.to_string());
    }
    report.cases.extend(extended.cases);
  }

  for case in &report.cases {
    logger.log(Channel::Info, 2, &case.to_string());
  }

  if report.is_success() {
    ExitCode::SUCCESS
  } else {
    eprintln!("{} of {} associativity checks failed", report.failures().count(), report.cases.len());
    ExitCode::FAILURE
  }
}
