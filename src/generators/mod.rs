//! Generator directives: `#g <type> <arg>...`.
//!
//! A generator replaces its directive with freshly computed pattern tokens.
//! Type names are matched case-insensitively.

pub mod bits;

use std::str::FromStr;
use std::time::Instant;

use crate::engine::log::SharedLog;
use crate::errors::ErrorKind;
use crate::lattice::NumberSolver;
use crate::syntax::{Token, TokenKind};

pub use bits::encode_bits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorType {
    /// Lattice search for the closest self-avoiding pattern.
    Num,
    /// Direct significand encoding.
    Bits,
}

impl GeneratorType {
    pub const ALL: [GeneratorType; 2] = [GeneratorType::Num, GeneratorType::Bits];

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorType::Num => "Num",
            GeneratorType::Bits => "Bits",
        }
    }
}

impl FromStr for GeneratorType {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneratorType::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ErrorKind::UnknownGenerator {
                found: s.to_string(),
            })
    }
}

/// Runs `generator` for `directive`, returning the tokens that replace it.
pub fn generate(
    generator: GeneratorType,
    args: &[&str],
    directive: &Token,
    solver: &mut NumberSolver,
    log: &SharedLog,
) -> Result<Vec<Token>, ErrorKind> {
    let number = parse_number(generator, args)?;
    let pattern = match generator {
        GeneratorType::Num => synthesize(number, directive, solver, log),
        GeneratorType::Bits => encode_bits(number),
    };
    Ok(vec![Token::new(
        directive.origin.clone(),
        directive.position,
        pattern,
        TokenKind::Pattern,
    )])
}

fn parse_number(generator: GeneratorType, args: &[&str]) -> Result<f64, ErrorKind> {
    let [literal] = args else {
        return Err(ErrorKind::GeneratorArguments {
            generator: generator.name().to_string(),
            expected: 1,
            actual: args.len(),
        });
    };
    match literal.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ErrorKind::InvalidNumber {
            value: literal.to_string(),
        }),
    }
}

fn synthesize(number: f64, directive: &Token, solver: &mut NumberSolver, log: &SharedLog) -> String {
    let hits = solver.stats().cache_hits;
    let started = Instant::now();
    let solution = solver.solve(number);

    if solver.stats().cache_hits > hits {
        log.verbose(format!("number cache hit for {}", number));
    } else {
        log.verbose(format!(
            "synthesized {} as {} in {:?}",
            number,
            solution.pattern,
            started.elapsed()
        ));
    }

    if !solution.exact {
        log.warn(format!(
            "{} {}: couldn't reach {} exactly, closest is {} (off by {})",
            directive.origin, directive.position, number, solution.value, solution.residual
        ));
    }
    solution.pattern
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::cli::output::BufferedLog;
    use crate::lattice::SolverConfig;
    use crate::syntax::Position;

    fn directive() -> Token {
        Token::new(
            Arc::from("main.macrohex"),
            Position::new(2, 0),
            "g num 10",
            TokenKind::CompilerAction,
        )
    }

    #[test]
    fn type_names_are_case_insensitive() {
        assert_eq!("num".parse::<GeneratorType>(), Ok(GeneratorType::Num));
        assert_eq!("NUM".parse::<GeneratorType>(), Ok(GeneratorType::Num));
        assert_eq!("Bits".parse::<GeneratorType>(), Ok(GeneratorType::Bits));
        assert_eq!(
            "str".parse::<GeneratorType>(),
            Err(ErrorKind::UnknownGenerator { found: "str".into() })
        );
    }

    #[test]
    fn num_emits_one_pattern_token_at_the_directive() {
        let mut solver = NumberSolver::new(SolverConfig::default());
        let tokens = generate(
            GeneratorType::Num,
            &["10"],
            &directive(),
            &mut solver,
            &SharedLog::null(),
        )
        .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Pattern);
        assert_eq!(tokens[0].content, "aqaae");
        assert_eq!(tokens[0].position, Position::new(2, 0));
    }

    #[test]
    fn rejects_bad_arguments() {
        let mut solver = NumberSolver::default();
        let log = SharedLog::null();
        let err = generate(GeneratorType::Num, &["1", "2"], &directive(), &mut solver, &log)
            .unwrap_err();
        assert_eq!(
            err,
            ErrorKind::GeneratorArguments {
                generator: "Num".into(),
                expected: 1,
                actual: 2
            }
        );
        for bad in ["ten", "NaN", "inf"] {
            let err = generate(GeneratorType::Num, &[bad], &directive(), &mut solver, &log)
                .unwrap_err();
            assert_eq!(err, ErrorKind::InvalidNumber { value: bad.into() });
        }
    }

    #[test]
    fn inexact_results_warn_but_succeed() {
        let buffer = Rc::new(RefCell::new(BufferedLog::new(true)));
        let log = SharedLog(buffer.clone());
        let mut solver = NumberSolver::new(SolverConfig {
            max_expansions: 10,
            ..SolverConfig::default()
        });
        let tokens = generate(GeneratorType::Num, &["1000000"], &directive(), &mut solver, &log)
            .unwrap();
        assert!(tokens[0].content.starts_with("aqaa"));
        let warnings = buffer.borrow().warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("couldn't reach 1000000 exactly"));
    }

    #[test]
    fn second_request_is_a_cache_hit() {
        let buffer = Rc::new(RefCell::new(BufferedLog::new(true)));
        let log = SharedLog(buffer.clone());
        let mut solver = NumberSolver::default();
        for _ in 0..2 {
            generate(GeneratorType::Num, &["5"], &directive(), &mut solver, &log).unwrap();
        }
        assert_eq!(solver.stats().searches, 1);
        assert!(buffer
            .borrow()
            .verbose_lines()
            .iter()
            .any(|line| line == "number cache hit for 5"));
    }
}
