//! # Core - Lenses for Open Games
//!
//! This crate provides the bidirectional plumbing that open games are built
//! from:
//!
//! - **Lenses**: stages with a forward `view` and a backward `update`,
//!   composed sequentially (`then`) and in parallel (`tensor`)
//! - **Structural sets**: value-equality sets for composite values such as
//!   option profiles, plus n-ary cartesian products
//!
//! ## Design Philosophy
//!
//! Composite games are values. A lens built from smaller lenses is just
//! another lens, so whole subgames can be wired together, inspected and
//! re-used before anything is solved.
//!
//! ```rust
//! use open_games_core::Lens;
//!
//! let observe: Lens<i32, i32, i32, i32> = Lens::new(|x: &i32| x + 1, |_x: &i32, r: &i32| *r);
//! let report: Lens<i32, i32, (), ()> = Lens::counit(|y: &i32| y * 10);
//!
//! let closed = observe.then(&report);
//! assert_eq!(closed.update(&4, &()), 50);
//! ```

pub mod lens;
pub mod set;

pub use lens::{Lens, OutcomeFn, UpdateFn, ViewFn, Wire};
pub use set::{cartesian, cartesian2, StructuralSet};
