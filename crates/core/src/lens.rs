//! # Lenses - Bidirectional Stages
//!
//! A lens `(X, S, Y, R)` is a stage of a game seen from two directions:
//!
//! - **view** `X → Y`: what the stage does with an observation going forward
//! - **update** `(X, R) → S`: how an outcome coming back is turned into a
//!   co-outcome, given the observation the stage originally saw
//!
//! ```text
//!          ┌────────┐
//!    X ───▶│        │───▶ Y
//!          │  Lens  │
//!    S ◀───│        │◀─── R
//!          └────────┘
//! ```
//!
//! ## Composition
//!
//! | Operator | Method | Meaning |
//! |----------|--------|---------|
//! | `t ∘ l` | `l.then(&t)` | forward through `l` then `t`, backward through `t` then `l` |
//! | `l₁ ⊗ l₂` | `l1.tensor(&l2)` | both stages side by side on paired wires |
//!
//! Both operators are associative up to the obvious re-bracketing of tuples,
//! and `⊗` is functorial in `∘` (interchange law). The integration tests in
//! `tests/lens_laws.rs` check these on sample inputs.
//!
//! ## Equality
//!
//! A lens is a pair of functions, so two lenses are equal exactly when they
//! share the same underlying functions. Clones compare equal; two lenses
//! built separately from identical closures do not.

use std::fmt;
use std::sync::Arc;

/// Values that can travel along a lens wire.
///
/// Lenses store their functions behind `Arc<dyn Fn>` so they can be cloned
/// into composites and shared across solver threads.
pub trait Wire: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Wire for T {}

/// Forward half of a lens.
pub type ViewFn<X, Y> = Arc<dyn Fn(&X) -> Y + Send + Sync>;

/// Backward half of a lens.
pub type UpdateFn<X, R, S> = Arc<dyn Fn(&X, &R) -> S + Send + Sync>;

/// A shared function from actions to outcomes (the continuation of a context).
pub type OutcomeFn<Y, R> = Arc<dyn Fn(&Y) -> R + Send + Sync>;

/// A bidirectional transformer with forward `view` and backward `update`.
pub struct Lens<X, S, Y, R> {
    view: ViewFn<X, Y>,
    update: UpdateFn<X, R, S>,
    label: Option<Arc<str>>,
}

impl<X, S, Y, R> Lens<X, S, Y, R> {
    /// Build a lens from its two halves.
    pub fn new<V, U>(view: V, update: U) -> Self
    where
        V: Fn(&X) -> Y + Send + Sync + 'static,
        U: Fn(&X, &R) -> S + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(view), Arc::new(update))
    }

    /// Build a lens from already shared halves.
    pub fn from_parts(view: ViewFn<X, Y>, update: UpdateFn<X, R, S>) -> Self {
        Self {
            view,
            update,
            label: None,
        }
    }

    /// Attach a display label (shown by `Debug`, ignored by equality).
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The display label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Run the forward pass.
    pub fn view(&self, x: &X) -> Y {
        (self.view)(x)
    }

    /// Run the backward pass for observation `x` and outcome `r`.
    pub fn update(&self, x: &X, r: &R) -> S {
        (self.update)(x, r)
    }
}

impl<X: Wire, S: Wire, Y: Wire, R: Wire> Lens<X, S, Y, R> {
    /// Sequential composition `next ∘ self`.
    ///
    /// The composite update re-derives the intermediate observation
    /// `y = self.view(x)` so that each stage sees the context it was
    /// originally played in.
    pub fn then<Z: Wire, Q: Wire>(&self, next: &Lens<Y, R, Z, Q>) -> Lens<X, S, Z, Q> {
        let first_view = Arc::clone(&self.view);
        let second_view = Arc::clone(&next.view);
        let view = move |x: &X| second_view(&first_view(x));

        let first_view = Arc::clone(&self.view);
        let first_update = Arc::clone(&self.update);
        let second_update = Arc::clone(&next.update);
        let update = move |x: &X, q: &Q| {
            let y = first_view(x);
            let r = second_update(&y, q);
            first_update(x, &r)
        };

        Lens::new(view, update)
    }

    /// Parallel composition `self ⊗ other`: each lens acts on its own half of
    /// the paired wires, with no cross-talk.
    pub fn tensor<X2: Wire, S2: Wire, Y2: Wire, R2: Wire>(
        &self,
        other: &Lens<X2, S2, Y2, R2>,
    ) -> Lens<(X, X2), (S, S2), (Y, Y2), (R, R2)> {
        let (left_view, right_view) = (Arc::clone(&self.view), Arc::clone(&other.view));
        let view = move |x: &(X, X2)| (left_view(&x.0), right_view(&x.1));

        let (left_update, right_update) = (Arc::clone(&self.update), Arc::clone(&other.update));
        let update = move |x: &(X, X2), r: &(R, R2)| {
            (left_update(&x.0, &r.0), right_update(&x.1, &r.1))
        };

        Lens::new(view, update)
    }

    /// A deterministic single-step lens: observe through `choose_action`,
    /// send outcomes back through `propagate`. The original observation is
    /// not consulted on the way back.
    pub fn computational<V, P>(choose_action: V, propagate: P) -> Self
    where
        V: Fn(&X) -> Y + Send + Sync + 'static,
        P: Fn(&R) -> S + Send + Sync + 'static,
    {
        Lens::new(choose_action, move |_x: &X, r: &R| propagate(r))
    }
}

impl<X: Wire, R: Wire> Lens<X, R, X, R> {
    /// The identity lens: passes observations forward and outcomes back.
    pub fn identity() -> Self {
        Lens::new(|x: &X| x.clone(), |_x: &X, r: &R| r.clone()).with_label("id")
    }
}

impl<X: Wire, S: Wire> Lens<(), (), X, S> {
    /// A state lens: always observes `x`, discards whatever comes back.
    pub fn state(x: X) -> Self {
        Lens::new(move |_: &()| x.clone(), |_: &(), _: &S| ())
    }

    /// The observation a closed-on-the-left lens produces.
    pub fn observation(&self) -> X {
        self.view(&())
    }
}

impl<Z: Wire, Q: Wire> Lens<Z, Q, (), ()> {
    /// An effect lens: forwards nothing, and on the way back applies `k` to
    /// the observation it was given.
    pub fn effect(k: OutcomeFn<Z, Q>) -> Self {
        Lens::new(|_: &Z| (), move |z: &Z, _: &()| k(z))
    }

    /// A counit lens: collapses the action/outcome wires to `()` and computes
    /// the co-outcome from the forward observation alone.
    pub fn counit<F>(co_outcome: F) -> Self
    where
        F: Fn(&Z) -> Q + Send + Sync + 'static,
    {
        Lens::new(|_: &Z| (), move |z: &Z, _: &()| co_outcome(z)).with_label("counit")
    }

    /// Read a closed-on-the-right lens as an outcome function.
    pub fn outcome_function(&self) -> OutcomeFn<Z, Q> {
        let lens = self.clone();
        Arc::new(move |z: &Z| lens.update(z, &()))
    }
}

impl<X, S, Y, R> Clone for Lens<X, S, Y, R> {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
            update: Arc::clone(&self.update),
            label: self.label.clone(),
        }
    }
}

impl<X, S, Y, R> PartialEq for Lens<X, S, Y, R> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.view), Arc::as_ptr(&other.view))
            && std::ptr::addr_eq(Arc::as_ptr(&self.update), Arc::as_ptr(&other.update))
    }
}

impl<X, S, Y, R> fmt::Debug for Lens<X, S, Y, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Lens({})", label),
            None => write!(f, "Lens(<anonymous>)"),
        }
    }
}
