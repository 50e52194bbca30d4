//! Uniform handler results for `match_with`.
//!
//! A `match_with` handler may produce its result synchronously or by
//! suspending. Instead of one overload per combination, every handler
//! returns something implementing [`IntoProjection`], and a single code
//! path awaits it.
//!
//! - primitives and `String` project to themselves;
//! - [`Pure`] wraps any other ready value;
//! - [`Suspend`] wraps any `Send` future;
//! - `TryAsync` and `TryOptionAsync` project to their run result.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tryflow::effect::{Pure, Suspend, TryAsync};
//!
//! let computation = TryAsync::lift(|| async { 21 });
//!
//! // Synchronous handlers
//! let doubled = computation.match_with(|x| x * 2, |_| 0).await;
//! assert_eq!(doubled, 42);
//!
//! // Suspending handlers
//! let doubled = computation
//!     .match_with(
//!         |x| Suspend(async move { x * 2 }),
//!         |_| Suspend(async { 0 }),
//!     )
//!     .await;
//! assert_eq!(doubled, 42);
//!
//! // Any other type goes through Pure
//! let pair = computation.match_with(|x| Pure((x, x)), |_| Pure((0, 0))).await;
//! assert_eq!(pair, (21, 21));
//! ```

use std::future::{Future, Ready, ready};

/// A handler result that yields `Output`, possibly after suspending.
pub trait IntoProjection {
    /// The projected value.
    type Output;

    /// The future yielding the projected value.
    type Future: Future<Output = Self::Output> + Send;

    /// Converts the handler result into a future.
    fn into_projection(self) -> Self::Future;
}

/// A ready value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pure<A>(pub A);

impl<A> Pure<A> {
    /// Creates a new `Pure` wrapper around the given value.
    pub const fn new(value: A) -> Self {
        Self(value)
    }

    /// Unwraps and returns the inner value.
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A: Send> IntoProjection for Pure<A> {
    type Output = A;
    type Future = Ready<A>;

    fn into_projection(self) -> Self::Future {
        ready(self.0)
    }
}

/// A suspending handler result.
#[derive(Debug)]
pub struct Suspend<F>(pub F);

impl<F> IntoProjection for Suspend<F>
where
    F: Future + Send,
{
    type Output = F::Output;
    type Future = F;

    fn into_projection(self) -> Self::Future {
        self.0
    }
}

macro_rules! impl_into_projection_for_primitives {
    ($($ty:ty),*) => {
        $(
            impl IntoProjection for $ty {
                type Output = $ty;
                type Future = Ready<$ty>;

                fn into_projection(self) -> Self::Future {
                    ready(self)
                }
            }
        )*
    };
}

impl_into_projection_for_primitives!(
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    bool,
    char,
    (),
    String,
    &'static str
);

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_primitive_projects_to_itself() {
        assert_eq!(42_i32.into_projection().await, 42);
        assert_eq!("text".into_projection().await, "text");
    }

    #[tokio::test]
    async fn test_pure_projects_inner_value() {
        assert_eq!(Pure(vec![1, 2]).into_projection().await, vec![1, 2]);
        assert_eq!(Pure::new(3_u8).into_inner(), 3);
    }

    #[tokio::test]
    async fn test_suspend_awaits_future() {
        let projected = Suspend(async {
            tokio::task::yield_now().await;
            "done".to_string()
        })
        .into_projection()
        .await;
        assert_eq!(projected, "done");
    }
}
