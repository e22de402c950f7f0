//! Integration tests for normal-form solving.
//!
//! These tests drive the public API end to end:
//! - The prisoner's dilemma has exactly one pure equilibrium
//! - Profile universes grow as `m^n` and are enumerated first-player-slowest
//! - Best responses keep ties and compare profiles by value
//! - Parallel and guarded solves agree with the plain brute force

use std::sync::Arc;

use open_games::{
    find_nash_equilibria_by_brute_force, get_all_option_profiles, is_nash_equilibrium,
    scalar_maximizer, utility_maximizer, BestResponse, BestResponseFunction, CausalDeviation,
    CountingHook, GameError, NashSolver, NormalFormGame, Optimizer, PayoffFn, SolverConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Cooperate,
    Defect,
}

use Move::{Cooperate, Defect};

fn prisoners_dilemma() -> NormalFormGame<&'static str, Move, Vec<f64>> {
    NormalFormGame::from_constants(
        "prisoner's dilemma",
        vec!["row", "column"],
        vec![Cooperate, Defect],
        |p: &[Move]| match (p[0], p[1]) {
            (Cooperate, Cooperate) => vec![2.0, 2.0],
            (Cooperate, Defect) => vec![0.0, 3.0],
            (Defect, Cooperate) => vec![3.0, 0.0],
            (Defect, Defect) => vec![1.0, 1.0],
        },
    )
}

fn maximizers<O>(players: usize, options: &[O]) -> Vec<Box<dyn Optimizer<O, Vec<f64>>>>
where
    O: Clone + PartialEq + Send + Sync + 'static,
{
    (0..players)
        .map(|i| {
            Box::new(utility_maximizer(i, options.to_vec())) as Box<dyn Optimizer<O, Vec<f64>>>
        })
        .collect()
}

// ============================================================================
// Prisoner's Dilemma
// ============================================================================

#[test]
fn pd_profiles_in_enumeration_order() {
    let game = prisoners_dilemma();
    assert_eq!(
        game.all_option_profiles(),
        vec![
            vec![Cooperate, Cooperate],
            vec![Cooperate, Defect],
            vec![Defect, Cooperate],
            vec![Defect, Defect],
        ]
    );
}

#[test]
fn pd_unique_equilibrium_is_mutual_defection() {
    let game = prisoners_dilemma();
    let equilibria = game.nash_equilibria(maximizers(2, &[Cooperate, Defect])).unwrap();
    assert_eq!(equilibria.into_vec(), vec![vec![Defect, Defect]]);
}

#[test]
fn pd_through_free_functions() {
    let game = prisoners_dilemma();
    let best_response = BestResponse::new(
        game.players(),
        maximizers(2, &[Cooperate, Defect]),
        game.payoff_fn(),
        &CausalDeviation,
    )
    .unwrap();

    let profiles = get_all_option_profiles(&[vec![Cooperate, Defect], vec![Cooperate, Defect]]);
    let equilibria = find_nash_equilibria_by_brute_force(&profiles, &best_response).unwrap();
    assert_eq!(equilibria.len(), 1);
    assert!(equilibria.contains(&vec![Defect, Defect]));
}

#[test]
fn pd_unilateral_best_responses() {
    let game = prisoners_dilemma();
    let best_response = game.best_response(maximizers(2, &[Cooperate, Defect])).unwrap();

    let row = best_response
        .unilateral_best_responses(&[Cooperate, Cooperate], 0)
        .unwrap();
    assert_eq!(row.into_vec(), vec![vec![Defect, Cooperate]]);

    let column = best_response
        .unilateral_best_responses(&[Cooperate, Cooperate], 1)
        .unwrap();
    assert_eq!(column.into_vec(), vec![vec![Cooperate, Defect]]);

    // Nobody endorses the other's deviation, so the intersection is empty.
    assert!(best_response
        .best_responses(&[Cooperate, Cooperate])
        .unwrap()
        .is_empty());

    let err = best_response.unilateral_best_responses(&[Defect, Defect], 2);
    assert_eq!(
        err.unwrap_err(),
        GameError::DeviationIndexOutOfRange {
            index: 2,
            players: 2
        }
    );
}

#[test]
fn pd_parallel_solve_with_hook() {
    let game = prisoners_dilemma();
    let hook = CountingHook::new();
    let solver = NashSolver::new(SolverConfig::default().with_parallel(true).with_max_profiles(4))
        .unwrap()
        .with_hook(hook.clone());

    let report = game
        .solve_with(&solver, maximizers(2, &[Cooperate, Defect]))
        .unwrap();
    assert_eq!(report.equilibria.into_vec(), vec![vec![Defect, Defect]]);
    assert_eq!(report.profiles_checked, 4);
    assert_eq!(hook.checked(), 4);
    assert_eq!(hook.equilibria(), 1);
}

// ============================================================================
// Scaling
// ============================================================================

#[test]
fn universe_size_is_m_to_the_n() {
    for players in 0..4u32 {
        for options in 1..4u8 {
            let lists: Vec<Vec<u8>> = (0..players).map(|_| (0..options).collect()).collect();
            let profiles = get_all_option_profiles(&lists);
            assert_eq!(profiles.len(), usize::from(options).pow(players));
        }
    }
}

#[test]
fn empty_option_list_gives_empty_universe() {
    let profiles = get_all_option_profiles(&[vec![0u8, 1], Vec::new()]);
    assert!(profiles.is_empty());
}

/// Three players, three options; payoff is how many players share your choice.
fn three_way_coordination() -> NormalFormGame<usize, u8, Vec<f64>> {
    NormalFormGame::from_constants("coordination", vec![0, 1, 2], vec![0u8, 1, 2], |p: &[u8]| {
        p.iter()
            .map(|mine| p.iter().filter(|other| *other == mine).count() as f64)
            .collect::<Vec<f64>>()
    })
}

#[test]
fn three_players_three_options() {
    let game = three_way_coordination();
    assert_eq!(game.all_option_profiles().len(), 27);

    let equilibria = game.nash_equilibria(maximizers(3, &[0u8, 1, 2])).unwrap();
    assert_eq!(
        equilibria.into_vec(),
        vec![vec![0, 0, 0], vec![1, 1, 1], vec![2, 2, 2]]
    );
}

#[test]
fn three_players_parallel_matches_sequential() {
    let game = three_way_coordination();
    let sequential = game.nash_equilibria(maximizers(3, &[0u8, 1, 2])).unwrap();

    let solver = NashSolver::new(SolverConfig::default().with_parallel(true)).unwrap();
    let parallel = game
        .solve_with(&solver, maximizers(3, &[0u8, 1, 2]))
        .unwrap();

    assert_eq!(parallel.equilibria.as_slice(), sequential.as_slice());
    assert_eq!(parallel.profiles_checked, 27);
}

#[test]
fn indifferent_players_make_every_profile_an_equilibrium() {
    let game = NormalFormGame::from_constants(
        "flat",
        vec![0, 1, 2, 3],
        vec![0u8, 1, 2, 3, 4],
        |_: &[u8]| vec![0.0; 4],
    );
    let universe = game.all_option_profiles();
    assert_eq!(universe.len(), 625);

    let report = game
        .solve_with(&NashSolver::default(), maximizers(4, &[0u8, 1, 2, 3, 4]))
        .unwrap();
    assert_eq!(report.profiles_checked, 625);
    assert_eq!(report.equilibria.into_vec(), universe);
}

#[test]
fn profile_limit_refuses_large_universe() {
    let game = three_way_coordination();
    let solver = NashSolver::new(SolverConfig::default().with_max_profiles(26)).unwrap();
    let err = game
        .solve_with(&solver, maximizers(3, &[0u8, 1, 2]))
        .unwrap_err();
    assert_eq!(err, GameError::ProfileLimitExceeded { size: 27, limit: 26 });
}

// ============================================================================
// Best-response properties
// ============================================================================

#[test]
fn tied_optima_are_all_kept() {
    // The row player is indifferent among all four options.
    let payoff: PayoffFn<u8, Vec<f64>> = Arc::new(|p: &[u8]| vec![1.0, f64::from(p[1])]);
    let optimizers: Vec<Box<dyn Optimizer<u8, Vec<f64>>>> = vec![
        Box::new(utility_maximizer(0, vec![0u8, 1, 2, 3])),
        Box::new(utility_maximizer(1, vec![0u8, 1])),
    ];
    let best_response =
        BestResponse::new(&["row", "column"], optimizers, payoff, &CausalDeviation).unwrap();

    let row = best_response.unilateral_best_responses(&[0, 1], 0).unwrap();
    assert_eq!(row.len(), 4);

    // Every row option is an equilibrium once the column plays 1.
    let profiles = get_all_option_profiles(&[vec![0u8, 1, 2, 3], vec![0u8, 1]]);
    let equilibria = find_nash_equilibria_by_brute_force(&profiles, &best_response).unwrap();
    assert_eq!(
        equilibria.into_vec(),
        vec![vec![0, 1], vec![1, 1], vec![2, 1], vec![3, 1]]
    );
}

#[test]
fn profiles_compare_by_value() {
    let game = prisoners_dilemma();
    let best_response = game.best_response(maximizers(2, &[Cooperate, Defect])).unwrap();

    let built_separately: Vec<Move> = [Defect].iter().chain(&[Defect]).copied().collect();
    assert!(is_nash_equilibrium(&built_separately, &best_response).unwrap());

    let responses = best_response.best_responses(&[Defect, Defect]).unwrap();
    assert!(responses.contains(&vec![Defect, Defect]));
}

#[test]
fn empty_domain_means_no_equilibrium() {
    let game = NormalFormGame::new(
        "stuck",
        vec![2u8, 0],
        |player: &u8| (0..*player).collect::<Vec<u8>>(),
        |_: &[u8]| vec![0.0, 0.0],
    );
    assert!(game.all_option_profiles().is_empty());

    let optimizers: Vec<Box<dyn Optimizer<u8, Vec<f64>>>> = vec![
        Box::new(utility_maximizer(0, game.options(&2))),
        Box::new(utility_maximizer(1, game.options(&0))),
    ];
    let best_response = game.best_response(optimizers).unwrap();
    // A profile from outside the universe still gets an answer: nobody can move.
    assert!(best_response.best_responses(&[0, 0]).unwrap().is_empty());
}

#[test]
fn scalar_payoff_single_player() {
    let game = NormalFormGame::from_constants("solo", vec!["me"], vec![3i32, 9, 4], |p: &[i32]| {
        f64::from(p[0])
    });
    let optimizers: Vec<Box<dyn Optimizer<i32, f64>>> =
        vec![Box::new(scalar_maximizer(vec![3, 9, 4]))];

    let equilibria = game.nash_equilibria(optimizers).unwrap();
    assert_eq!(equilibria.into_vec(), vec![vec![9]]);
}
