//! Compile-time evaluation of constant sub-expressions.
//!
//! Folding never fails just because an operand is not constant: it returns
//! `Ok(None)` so the caller can try the next interpretation. Errors are only
//! raised for malformed calls and integer overflow.

use crate::{
    error::{BuildError, Result},
    function::Function,
};
use filter_syntax::{Call, Constant, Expr};
use tracing::trace;

/// Source of the current Unix timestamp, in seconds.
pub type Clock = fn() -> i64;

pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

pub(crate) fn expect_args(call: &Call, expected: usize) -> Result<()> {
    if call.args.len() != expected {
        return Err(BuildError::WrongArgumentCount {
            function: call.function.clone(),
            expected,
            found: call.args.len(),
        });
    }
    Ok(())
}

pub(crate) fn constant_int(constant: &Constant) -> Result<Option<i64>> {
    match constant {
        Constant::Int(v) => Ok(Some(*v)),
        Constant::Uint(v) => i64::try_from(*v)
            .map(Some)
            .map_err(|_| BuildError::IntegerOutOfRange(*v)),
        // Doubles participate in integer arithmetic truncated toward zero.
        Constant::Double(v) => Ok(Some(*v as i64)),
        _ => Ok(None),
    }
}

/// Folds `+`, `-`, `*` and `now()` over integer constants.
pub(crate) fn evaluate_numeric(expr: &Expr, clock: Clock) -> Result<Option<i64>> {
    let call = match expr {
        Expr::Const(constant) => return constant_int(constant),
        Expr::Call(call) => call,
        Expr::Ident(_) | Expr::List(_) => return Ok(None),
    };

    match Function::from_symbol(&call.function) {
        Some(Function::Now) => {
            expect_args(call, 0)?;
            let now = clock();
            trace!(now, "folded now()");
            Ok(Some(now))
        }
        Some(Function::Arithmetic(op)) => {
            expect_args(call, 2)?;
            let Some(left) = evaluate_numeric(&call.args[0], clock)? else {
                return Ok(None);
            };
            let Some(right) = evaluate_numeric(&call.args[1], clock)? else {
                return Ok(None);
            };
            op.apply(left, right)
                .map(Some)
                .ok_or_else(|| BuildError::ArithmeticOverflow(format!("{left} {op} {right}")))
        }
        _ => Ok(None),
    }
}

/// Folds boolean literals and `!` over them.
pub(crate) fn evaluate_bool(expr: &Expr) -> Result<Option<bool>> {
    match expr {
        Expr::Const(Constant::Bool(v)) => Ok(Some(*v)),
        Expr::Call(call) if Function::from_symbol(&call.function) == Some(Function::Not) => {
            expect_args(call, 1)?;
            Ok(evaluate_bool(&call.args[0])?.map(|v| !v))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_clock() -> i64 {
        1_700_000_000
    }

    #[test]
    fn test_numeric_folding() {
        let expr = Expr::sub(Expr::now(), Expr::mul(Expr::int(60), Expr::int(60)));
        assert_eq!(evaluate_numeric(&expr, fixed_clock), Ok(Some(1_699_996_400)));

        let expr = Expr::add(Expr::double(2.9), Expr::uint(1));
        assert_eq!(evaluate_numeric(&expr, fixed_clock), Ok(Some(3)));
    }

    #[test]
    fn test_numeric_not_foldable() {
        let expr = Expr::add(Expr::ident("created_ts"), Expr::int(1));
        assert_eq!(evaluate_numeric(&expr, fixed_clock), Ok(None));
        assert_eq!(evaluate_numeric(&Expr::string("1"), fixed_clock), Ok(None));
        assert_eq!(evaluate_numeric(&Expr::size(Expr::ident("tags")), fixed_clock), Ok(None));
    }

    #[test]
    fn test_numeric_errors() {
        let expr = Expr::mul(Expr::int(i64::MAX), Expr::int(2));
        assert!(matches!(
            evaluate_numeric(&expr, fixed_clock),
            Err(BuildError::ArithmeticOverflow(_))
        ));

        let expr = Expr::call("_+_", vec![Expr::int(1)]);
        assert!(matches!(
            evaluate_numeric(&expr, fixed_clock),
            Err(BuildError::WrongArgumentCount { expected: 2, found: 1, .. })
        ));

        assert_eq!(
            evaluate_numeric(&Expr::uint(u64::MAX), fixed_clock),
            Err(BuildError::IntegerOutOfRange(u64::MAX))
        );
    }

    #[test]
    fn test_bool_folding() {
        assert_eq!(evaluate_bool(&Expr::not(Expr::not(Expr::bool(true)))), Ok(Some(true)));
        assert_eq!(evaluate_bool(&Expr::not(Expr::ident("pinned"))), Ok(None));
        assert_eq!(evaluate_bool(&Expr::int(1)), Ok(None));
    }
}
