#![cfg(feature = "effect")]
//! Projection of computations through `match_with`, `fold` and defaults.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::rstest;
use tryflow::control::{Error, Outcome};
use tryflow::effect::{Pure, Suspend, TryAsync, TryOptionAsync};

#[derive(Default)]
struct Calls {
    success: AtomicUsize,
    none: AtomicUsize,
    failure: AtomicUsize,
}

impl Calls {
    fn snapshot(&self) -> (usize, usize, usize) {
        (
            self.success.load(Ordering::SeqCst),
            self.none.load(Ordering::SeqCst),
            self.failure.load(Ordering::SeqCst),
        )
    }
}

// =============================================================================
// TryAsync
// =============================================================================

#[rstest]
#[case(TryAsync::success(4), (1, 0, 0), 8)]
#[case(TryAsync::failure(Error::msg("x")), (0, 0, 1), -1)]
#[tokio::test]
async fn test_match_with_invokes_exactly_one_handler(
    #[case] computation: TryAsync<i32>,
    #[case] expected_calls: (usize, usize, usize),
    #[case] expected: i32,
) {
    let calls = Calls::default();
    let result = computation
        .match_with(
            |value| {
                calls.success.fetch_add(1, Ordering::SeqCst);
                value * 2
            },
            |_| {
                calls.failure.fetch_add(1, Ordering::SeqCst);
                -1_i32
            },
        )
        .await;

    assert_eq!(result, expected);
    assert_eq!(calls.snapshot(), expected_calls);
}

#[rstest]
#[tokio::test]
async fn test_match_with_accepts_suspending_handlers() {
    let length = TryAsync::success("tokio")
        .match_with(
            |text| {
                Suspend(async move {
                    tokio::task::yield_now().await;
                    text.len()
                })
            },
            |_| Pure(0_usize),
        )
        .await;
    assert_eq!(length, 5);
}

#[rstest]
#[tokio::test]
async fn test_match_with_handlers_may_return_computations() {
    let outcome = TryAsync::success(10)
        .match_with(
            |value| TryAsync::success(value + 1),
            |error| TryAsync::<i32>::failure(error),
        )
        .await;
    assert_eq!(outcome, Outcome::Success(11));
}

#[rstest]
#[tokio::test]
async fn test_match_with_failure_handler_receives_the_error() {
    let message = TryAsync::<i32>::failure(Error::msg("db down"))
        .match_with(|_| String::from("ok"), |error| error.to_string())
        .await;
    assert_eq!(message, "db down");
}

#[rstest]
#[tokio::test]
async fn test_fold_and_defaults() {
    let success = TryAsync::success(5);
    let failure = TryAsync::<i32>::failure(Error::msg("x"));

    assert_eq!(success.fold(10, |state, value| state + value).await, 15);
    assert_eq!(failure.fold(10, |state, value| state + value).await, 10);
    assert_eq!(failure.if_fail(0).await, 0);
    assert_eq!(
        failure
            .if_fail_with(|error| i32::try_from(error.to_string().len()).unwrap())
            .await,
        1
    );
    assert_eq!(success.if_fail(0).await, 5);
}

// =============================================================================
// TryOptionAsync
// =============================================================================

#[rstest]
#[case(TryOptionAsync::some(3), (1, 0, 0), "some 3")]
#[case(TryOptionAsync::none(), (0, 1, 0), "none")]
#[case(TryOptionAsync::failure(Error::msg("e")), (0, 0, 1), "failure e")]
#[tokio::test]
async fn test_option_match_with_invokes_exactly_one_handler(
    #[case] computation: TryOptionAsync<i32>,
    #[case] expected_calls: (usize, usize, usize),
    #[case] expected: &str,
) {
    let calls = Arc::new(Calls::default());
    let result = computation
        .match_with(
            |value| {
                calls.success.fetch_add(1, Ordering::SeqCst);
                format!("some {value}")
            },
            || {
                calls.none.fetch_add(1, Ordering::SeqCst);
                String::from("none")
            },
            |error| {
                calls.failure.fetch_add(1, Ordering::SeqCst);
                format!("failure {error}")
            },
        )
        .await;

    assert_eq!(result, expected);
    assert_eq!(calls.snapshot(), expected_calls);
}

#[rstest]
#[tokio::test]
async fn test_option_fold_and_default() {
    assert_eq!(TryOptionAsync::some(2).fold(1, |s, v| s * v).await, 2);
    assert_eq!(TryOptionAsync::<i32>::none().fold(1, |s, v| s * v).await, 1);
    assert_eq!(TryOptionAsync::<i32>::none().if_none_or_fail(9).await, 9);
    assert_eq!(
        TryOptionAsync::<i32>::failure(Error::msg("x"))
            .if_none_or_fail(9)
            .await,
        9
    );
}

#[rstest]
#[tokio::test]
async fn test_tri_map_collapses_to_try_async() {
    let describe = |computation: TryOptionAsync<i32>| {
        computation.tri_map(
            |value| value.to_string(),
            || String::from("-"),
            |error| format!("!{error}"),
        )
    };

    assert_eq!(
        describe(TryOptionAsync::some(1)).await,
        Outcome::Success(String::from("1"))
    );
    assert_eq!(
        describe(TryOptionAsync::none()).await,
        Outcome::Success(String::from("-"))
    );
    assert_eq!(
        describe(TryOptionAsync::failure(Error::msg("x"))).await,
        Outcome::Success(String::from("!x"))
    );
}
