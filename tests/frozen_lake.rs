extern crate float_eq;
extern crate rl_dp;
mod common;

use common::*;
use float_eq::*;
use rand::prelude::*;
use rl_dp::prelude::*;
use rstest::rstest;

#[test]
fn deterministic_4x4_policy() {
    let lake = FrozenLake::four_by_four(false).unwrap();
    let (_, pi, vi) = solve_both(&lake, &SolverConfig::new(0.9, 1e-6));

    assert_eq!(pi.pi, vi.pi);
    insta::assert_snapshot!(lake.render_policy(&vi.pi).unwrap(), @r###"
    ↓→↓←
    ↓H↓H
    →↓↓H
    H→→G
    "###);
}

#[test]
fn deterministic_4x4_values_are_discounted_path_lengths() {
    let lake = FrozenLake::four_by_four(false).unwrap();
    let (_, _, vi) = solve_both(&lake, &SolverConfig::new(0.9, 1e-6));

    let g = |steps: i32| 0.9f64.powi(steps - 1);
    assert_float_eq!(vi.v[14], g(1), abs <= 1e-9);
    assert_float_eq!(vi.v[13], g(2), abs <= 1e-9);
    assert_float_eq!(vi.v[2], g(4), abs <= 1e-9);
    assert_float_eq!(vi.v[0], g(6), abs <= 1e-9);
    for terminal in [5, 7, 11, 12, 15] {
        assert_float_eq!(vi.v[terminal], 0., abs <= 1e-12);
    }
}

#[rstest]
#[case(FrozenLake::four_by_four(true).unwrap())]
#[case(FrozenLake::eight_by_eight(true).unwrap())]
#[case(FrozenLake::eight_by_eight(false).unwrap())]
fn policy_and_value_iteration_agree(#[case] lake: FrozenLake) {
    let config = SolverConfig::new(0.9, 1e-10);
    let (tensor, pi, vi) = solve_both(&lake, &config);

    assert_float_eq!(pi.v.to_vec(), vi.v.to_vec(), abs_all <= 1e-8);
    assert!(greedy_gap(&tensor, &vi, &pi.pi, config.gamma) < 1e-8);
    assert!(greedy_gap(&tensor, &vi, &vi.pi, config.gamma) < 1e-12);
}

#[test]
fn optimal_policy_reaches_goal_on_deterministic_lake() {
    let lake = FrozenLake::eight_by_eight(false).unwrap();
    let (_, _, vi) = solve_both(&lake, &SolverConfig::new(0.9, 1e-3));

    let summary = TransitionSimulator::new(&lake)
        .evaluate(&vi, 10, 100, 2718)
        .unwrap();

    assert_eq!(summary.terminated, 10);
    assert_float_eq!(summary.mean_return, 1., abs <= 1e-12);
}

#[test]
fn optimal_policy_beats_a_fixed_direction_on_slippery_lake() {
    let lake = FrozenLake::four_by_four(true).unwrap();
    let (_, pi, _) = solve_both(&lake, &SolverConfig::new(0.9, 1e-3));
    let sim = TransitionSimulator::new(&lake);

    let optimal = sim.evaluate(&pi, 500, 100, 7).unwrap();
    let always_right = sim.evaluate(&vec![2; 16], 500, 100, 7).unwrap();

    assert!(optimal.mean_return > always_right.mean_return);
    assert!(optimal.mean_return > 0.4);
}

#[test]
fn optimal_episode_renders_the_route_to_the_goal() {
    let lake = FrozenLake::four_by_four(false).unwrap();
    let (_, _, vi) = solve_both(&lake, &SolverConfig::new(0.9, 1e-6));

    let episode = TransitionSimulator::new(&lake)
        .run_episode(&mut StdRng::seed_from_u64(0), &vi, 100)
        .unwrap();
    let rendered = lake.render_episode(&episode).unwrap();
    let frames: Vec<&str> = rendered.split("\n\n").collect();

    assert_eq!(frames.len(), 7);
    assert_eq!(frames[0], "@FFF\nFHFH\nFFFH\nHFFG");
    assert_eq!(frames[6], "  (Right)\nSFFF\nFHFH\nFFFH\nHFF@");
    assert_eq!(lake.tile(episode.events[6].s), Some('G'));
}
