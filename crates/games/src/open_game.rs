//! Open games: lenses indexed by options, plus a best-response relation.
//!
//! An open game `G : (X, S) → (Y, R)` has
//!
//! - a finite set of **options** `O` (strategies, or strategy profiles for
//!   composites)
//! - **play** `O → Lens<X, S, Y, R>`: what the game does once an option is fixed
//! - **best response** `(X, Y → R) → (O → set of O)`: given an observation
//!   `x` and a continuation `k` saying how actions turn into outcomes, which
//!   options would the players rather be playing than the queried one
//!
//! ```text
//!             ┌───────────────┐
//!     X ─────▶│               │─────▶ Y
//!             │  OpenGame<O>  │
//!     S ◀─────│               │◀───── R
//!             └───────────────┘
//! ```
//!
//! ## Building Blocks
//!
//! | Constructor | Options | Best response |
//! |-------------|---------|---------------|
//! | [`OpenGame::atom`] | the given lenses | a selection function, ignoring the query |
//! | [`OpenGame::decision`] | one constant lens per action | optimal actions under `k` |
//! | [`OpenGame::computation`] | a single computational lens | always that lens |
//! | [`OpenGame::counit`] | a single terminal lens | always that lens |
//!
//! ## Composition
//!
//! `g.then(&h)` plays `h` after `g`; `g.tensor(&h)` plays them side by side.
//! In both, the composite's options are pairs, `play` composes the chosen
//! lenses, and the composite best response is the product of the two
//! stages' best responses.
//!
//! Each stage's best response is computed holding the *other* stage at its
//! queried option. Taking the product of the two answers therefore assumes
//! the stages' deviations are independent given the query. That holds for
//! the atoms above (whose selections ignore the query); it is not a law for
//! arbitrary user-supplied relations.

use std::fmt;
use std::sync::Arc;

use open_games_core::{cartesian2, Lens, OutcomeFn, StructuralSet, Wire};

use crate::optimizer::Optimizer;

/// Play function of an open game.
pub type PlayFn<O, X, S, Y, R> = Arc<dyn Fn(&O) -> Lens<X, S, Y, R> + Send + Sync>;

/// Best-response relation of an open game, uncurried: observation,
/// continuation and queried option in, admissible options out.
pub type BestResponseRelation<O, X, Y, R> =
    Arc<dyn Fn(&X, &OutcomeFn<Y, R>, &O) -> StructuralSet<O> + Send + Sync>;

/// An option-indexed family of lenses with a best-response relation.
pub struct OpenGame<O, X, S, Y, R> {
    options: Vec<O>,
    play: PlayFn<O, X, S, Y, R>,
    best_response: BestResponseRelation<O, X, Y, R>,
}

impl<O, X, S, Y, R> OpenGame<O, X, S, Y, R>
where
    O: Wire + PartialEq,
    X: Wire,
    S: Wire,
    Y: Wire,
    R: Wire,
{
    /// Assemble an open game from its three fields.
    ///
    /// `play` and `best_response` must agree: the best response at a queried
    /// option has to be judged against the lens `play` returns for it.
    pub fn new<P, B>(options: Vec<O>, play: P, best_response: B) -> Self
    where
        P: Fn(&O) -> Lens<X, S, Y, R> + Send + Sync + 'static,
        B: Fn(&X, &OutcomeFn<Y, R>, &O) -> StructuralSet<O> + Send + Sync + 'static,
    {
        Self {
            options,
            play: Arc::new(play),
            best_response: Arc::new(best_response),
        }
    }

    /// The option universe.
    pub fn options(&self) -> &[O] {
        &self.options
    }

    /// The lens played under `option`.
    pub fn play(&self, option: &O) -> Lens<X, S, Y, R> {
        (self.play)(option)
    }

    /// Options admissible as a response to `option` in context `(x, k)`.
    pub fn best_response(&self, x: &X, k: &OutcomeFn<Y, R>, option: &O) -> StructuralSet<O> {
        (self.best_response)(x, k, option)
    }

    /// `option` is an equilibrium in context `(x, k)` if it is among its own
    /// best responses.
    pub fn is_equilibrium(&self, x: &X, k: &OutcomeFn<Y, R>, option: &O) -> bool {
        self.best_response(x, k, option).contains(option)
    }

    /// Every option that is an equilibrium in context `(x, k)`, in option order.
    pub fn equilibria(&self, x: &X, k: &OutcomeFn<Y, R>) -> StructuralSet<O> {
        self.options
            .iter()
            .filter(|option| self.is_equilibrium(x, k, option))
            .cloned()
            .collect()
    }

    /// Sequential composition: play `next` after `self`.
    ///
    /// For a queried `(o1, o2)` in context `(x, k)`:
    /// - `self` is judged against the outcome function obtained by playing
    ///   `next`'s lens for `o2` and scoring with `k`
    /// - `next` is judged at the observation `self`'s lens for `o1` makes of `x`
    pub fn then<O2, Z, Q>(&self, next: &OpenGame<O2, Y, R, Z, Q>) -> OpenGame<(O, O2), X, S, Z, Q>
    where
        O2: Wire + PartialEq,
        Z: Wire,
        Q: Wire,
    {
        let options = cartesian2(&self.options, &next.options);

        let (first_play, second_play) = (Arc::clone(&self.play), Arc::clone(&next.play));
        let play = move |(o1, o2): &(O, O2)| first_play(o1).then(&second_play(o2));

        let (first_play, second_play) = (Arc::clone(&self.play), Arc::clone(&next.play));
        let (first_br, second_br) = (
            Arc::clone(&self.best_response),
            Arc::clone(&next.best_response),
        );
        let best_response = move |x: &X, k: &OutcomeFn<Z, Q>, (o1, o2): &(O, O2)| {
            let first_lens = first_play(o1);
            let second_lens = second_play(o2);

            let first_outcome = second_lens
                .then(&Lens::effect(Arc::clone(k)))
                .outcome_function();
            let second_observation = Lens::state(x.clone()).then(&first_lens).observation();

            let first = first_br(x, &first_outcome, o1);
            let second = second_br(&second_observation, k, o2);
            first.product(&second)
        };

        OpenGame::new(options, play, best_response)
    }

    /// Parallel composition: play `self` and `other` side by side.
    ///
    /// For a queried `(o1, o2)` each branch's outcome function fixes the
    /// other branch's action at what its queried lens plays, and reads its own
    /// coordinate of `k`.
    pub fn tensor<O2, X2, S2, Y2, R2>(
        &self,
        other: &OpenGame<O2, X2, S2, Y2, R2>,
    ) -> OpenGame<(O, O2), (X, X2), (S, S2), (Y, Y2), (R, R2)>
    where
        O2: Wire + PartialEq,
        X2: Wire,
        S2: Wire,
        Y2: Wire,
        R2: Wire,
    {
        let options = cartesian2(&self.options, &other.options);

        let (left_play, right_play) = (Arc::clone(&self.play), Arc::clone(&other.play));
        let play = move |(o1, o2): &(O, O2)| left_play(o1).tensor(&right_play(o2));

        let (left_play, right_play) = (Arc::clone(&self.play), Arc::clone(&other.play));
        let (left_br, right_br) = (
            Arc::clone(&self.best_response),
            Arc::clone(&other.best_response),
        );
        let best_response = move |x: &(X, X2),
                                  k: &OutcomeFn<(Y, Y2), (R, R2)>,
                                  (o1, o2): &(O, O2)| {
            let left_action = left_play(o1).view(&x.0);
            let right_action = right_play(o2).view(&x.1);

            let k_left = Arc::clone(k);
            let left_outcome: OutcomeFn<Y, R> =
                Arc::new(move |y: &Y| k_left(&(y.clone(), right_action.clone())).0);
            let k_right = Arc::clone(k);
            let right_outcome: OutcomeFn<Y2, R2> =
                Arc::new(move |y: &Y2| k_right(&(left_action.clone(), y.clone())).1);

            let left = left_br(&x.0, &left_outcome, o1);
            let right = right_br(&x.1, &right_outcome, o2);
            left.product(&right)
        };

        OpenGame::new(options, play, best_response)
    }
}

// ============================================================================
// Atoms
// ============================================================================

impl<X, S, Y, R> OpenGame<Lens<X, S, Y, R>, X, S, Y, R>
where
    X: Wire,
    S: Wire,
    Y: Wire,
    R: Wire,
{
    /// An atomic game over a finite set of lenses.
    ///
    /// The chosen lens is what gets played, and the best response to any
    /// queried lens is whatever `selection` picks in the given context.
    pub fn atom<F>(lenses: Vec<Lens<X, S, Y, R>>, selection: F) -> Self
    where
        F: Fn(&X, &OutcomeFn<Y, R>) -> StructuralSet<Lens<X, S, Y, R>> + Send + Sync + 'static,
    {
        OpenGame::new(
            lenses,
            |lens: &Lens<X, S, Y, R>| lens.clone(),
            move |x: &X, k: &OutcomeFn<Y, R>, _queried: &Lens<X, S, Y, R>| selection(x, k),
        )
    }

    /// A pure data-transformation stage with no strategic choice.
    pub fn computation<V, P>(choose_action: V, propagate: P) -> Self
    where
        V: Fn(&X) -> Y + Send + Sync + 'static,
        P: Fn(&R) -> S + Send + Sync + 'static,
    {
        let lens = Lens::computational(choose_action, propagate).with_label("computation");
        let only = lens.clone();
        Self::atom(vec![lens], move |_: &X, _: &OutcomeFn<Y, R>| {
            StructuralSet::singleton(only.clone())
        })
    }
}

impl<X, Y, R> OpenGame<Lens<X, (), Y, R>, X, (), Y, R>
where
    X: Wire,
    Y: Wire + PartialEq + fmt::Debug,
    R: Wire,
{
    /// A single player choosing among `actions` without looking at the
    /// observation.
    ///
    /// Each action becomes a constant lens. In context `(x, k)` the
    /// admissible lenses are those whose action `optimizer` rates optimal for
    /// the task `action ↦ k(action)`. The optimizer should range over the
    /// same actions; anything else it returns is ignored.
    pub fn decision<Opt>(actions: Vec<Y>, optimizer: Opt) -> Self
    where
        Opt: Optimizer<Y, R> + 'static,
    {
        let lenses: Vec<Lens<X, (), Y, R>> = actions
            .iter()
            .map(|action| {
                let played = action.clone();
                Lens::new(move |_: &X| played.clone(), |_: &X, _: &R| ())
                    .with_label(format!("{:?}", action))
            })
            .collect();

        let candidates = lenses.clone();
        Self::atom(lenses, move |_: &X, k: &OutcomeFn<Y, R>| {
            let task = |action: &Y| k(action);
            let optimal = optimizer.optimize(&task);
            candidates
                .iter()
                .zip(&actions)
                .filter(|(_, action)| optimal.contains(action))
                .map(|(lens, _)| lens.clone())
                .collect()
        })
    }
}

impl<X, S> OpenGame<Lens<X, S, (), ()>, X, S, (), ()>
where
    X: Wire,
    S: Wire,
{
    /// A terminal game turning the observation directly into a payoff.
    pub fn counit<F>(co_outcome: F) -> Self
    where
        F: Fn(&X) -> S + Send + Sync + 'static,
    {
        let lens = Lens::counit(co_outcome);
        let only = lens.clone();
        Self::atom(vec![lens], move |_: &X, _: &OutcomeFn<(), ()>| {
            StructuralSet::singleton(only.clone())
        })
    }
}

impl<O, X, S, Y, R> Clone for OpenGame<O, X, S, Y, R>
where
    O: Clone,
{
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            play: Arc::clone(&self.play),
            best_response: Arc::clone(&self.best_response),
        }
    }
}

impl<O: fmt::Debug, X, S, Y, R> fmt::Debug for OpenGame<O, X, S, Y, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenGame")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
