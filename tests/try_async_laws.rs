#![cfg(feature = "effect")]
//! Property-based tests for `TryAsync` and `TryOptionAsync` Monad laws.
//!
//! - Left Identity: success(a).bind(f) == f(a)
//! - Right Identity: m.bind(success) == m
//! - Associativity: m.bind(f).bind(g) == m.bind(|x| f(x).bind(g))
//!
//! Also verifies the Functor laws and that failures short-circuit.

use proptest::prelude::*;
use tryflow::control::{Error, OptionOutcome, Outcome};
use tryflow::effect::{TryAsync, TryOptionAsync};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn halve(n: i32) -> TryAsync<i32> {
    if n % 2 == 0 {
        TryAsync::success(n / 2)
    } else {
        TryAsync::failure(Error::msg(format!("{n} is odd")))
    }
}

fn decrement(n: i32) -> TryAsync<i32> {
    TryAsync::success(n.wrapping_sub(1))
}

// =============================================================================
// Monad Laws
// =============================================================================

proptest! {
    /// Left Identity Law: success(a).bind(f) == f(a)
    #[test]
    fn prop_try_async_left_identity(value: i32) {
        let runtime = runtime();

        let left = runtime.block_on(TryAsync::success(value).bind(halve).run());
        let right = runtime.block_on(halve(value).run());

        prop_assert_eq!(left, right);
    }

    /// Right Identity Law: m.bind(success) == m
    #[test]
    fn prop_try_async_right_identity(value: i32, fails: bool) {
        let runtime = runtime();
        let computation = if fails {
            TryAsync::failure(Error::msg("left"))
        } else {
            TryAsync::success(value)
        };

        let left = runtime.block_on(computation.clone().bind(TryAsync::success).run());
        let right = runtime.block_on(computation.run());

        prop_assert_eq!(left, right);
    }

    /// Associativity Law: m.bind(f).bind(g) == m.bind(|x| f(x).bind(g))
    #[test]
    fn prop_try_async_associativity(value: i32) {
        let runtime = runtime();

        let left = runtime.block_on(TryAsync::success(value).bind(decrement).bind(halve).run());
        let right = runtime.block_on(
            TryAsync::success(value)
                .bind(|x| decrement(x).bind(halve))
                .run(),
        );

        prop_assert_eq!(left, right);
    }

    /// Functor Identity: m.map(id) == m
    #[test]
    fn prop_try_async_functor_identity(value: i32) {
        let runtime = runtime();
        let outcome = runtime.block_on(TryAsync::success(value).map(|x| x).run());
        prop_assert_eq!(outcome, Outcome::Success(value));
    }

    /// Functor Composition: m.map(f).map(g) == m.map(|x| g(f(x)))
    #[test]
    fn prop_try_async_functor_composition(value: i32) {
        let runtime = runtime();
        let function1 = |n: i32| n.wrapping_add(7);
        let function2 = |n: i32| n.wrapping_mul(3);

        let left = runtime.block_on(TryAsync::success(value).map(function1).map(function2).run());
        let right = runtime.block_on(
            TryAsync::success(value)
                .map(move |x| function2(function1(x)))
                .run(),
        );

        prop_assert_eq!(left, right);
    }

    /// A failure short-circuits every later bind.
    #[test]
    fn prop_try_async_failure_short_circuits(message in "[a-z]{1,12}") {
        let runtime = runtime();
        let outcome = runtime.block_on(
            TryAsync::<i32>::failure(Error::msg(message.clone()))
                .bind(decrement)
                .map(|x| x * 2)
                .run(),
        );
        prop_assert_eq!(outcome, Outcome::Failure(Error::msg(message)));
    }

    /// Left Identity Law for the optional computation.
    #[test]
    fn prop_try_option_async_left_identity(value: i32) {
        let runtime = runtime();
        let function = |n: i32| {
            if n > 0 {
                TryOptionAsync::some(n)
            } else {
                TryOptionAsync::none()
            }
        };

        let left = runtime.block_on(TryOptionAsync::some(value).bind(function).run());
        let right = runtime.block_on(function(value).run());

        prop_assert_eq!(left, right);
    }

    /// `None` short-circuits like a failure but stays `None`.
    #[test]
    fn prop_try_option_async_none_short_circuits(value: i32) {
        let runtime = runtime();
        let outcome = runtime.block_on(
            TryOptionAsync::<i32>::none()
                .bind(move |x| TryOptionAsync::some(x.wrapping_add(value)))
                .run(),
        );
        prop_assert_eq!(outcome, OptionOutcome::None);
    }
}
