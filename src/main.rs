use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::prelude::*;
use rl_dp::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Env {
    #[value(name = "frozen-lake-4x4")]
    FrozenLake4x4,
    #[value(name = "frozen-lake-8x8")]
    FrozenLake8x8,
    SimpleGolf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algo {
    Pi,
    Vi,
    Both,
}

/// Solve a finite MDP with policy iteration and/or value iteration.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value_t = Env::FrozenLake4x4)]
    env: Env,

    /// Gymnasium `transitions` JSON document; overrides --env.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Non-slippery FrozenLake.
    #[arg(long)]
    deterministic: bool,

    #[arg(long, default_value_t = 0.9)]
    gamma: f64,

    #[arg(long, default_value_t = 1e-3)]
    tol: f64,

    #[arg(long, default_value_t = 10_000)]
    max_iterations: usize,

    #[arg(long, value_enum, default_value_t = Algo::Both)]
    algo: Algo,

    /// Break Q-value ties uniformly at random with this seed.
    #[arg(long)]
    random_ties: Option<u64>,

    /// Rollouts used to measure the empirical return of each policy.
    #[arg(long, default_value_t = 100)]
    episodes: usize,

    #[arg(long, default_value_t = 100)]
    max_steps: usize,

    #[arg(long, default_value_t = 2718)]
    seed: u64,

    /// Write the model as a gymnasium `transitions` document and exit.
    #[arg(long)]
    dump_model: Option<PathBuf>,

    /// Print one seeded episode of each policy step by step.
    #[arg(long)]
    render: bool,

    /// Print one JSON report per solver instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    env: String,
    solver: &'a str,
    gamma: f64,
    tol: f64,
    iterations: usize,
    sweeps: usize,
    v: Vec<f64>,
    pi: Vec<Discrete>,
    mean_return: f64,
    terminated: usize,
    episodes: usize,
}

fn render(episode: &Episode, lake: Option<&FrozenLake>) -> anyhow::Result<()> {
    let last = episode.events.last().map_or(0, |e| e.s);
    match lake {
        Some(lake) => {
            println!("\n{}", lake.render_episode(episode)?);
            let tile = lake.tile(last).unwrap_or('?');
            println!(
                "Episode ended on tile {tile} after {} steps, return {}",
                episode.events.len() - 1,
                episode.total_reward()
            );
        }
        None => {
            for (step, e) in episode.events.iter().enumerate() {
                println!("step {step}: s = {}, a = {:?}, r = {}", e.s, e.a, e.r);
            }
            println!("Episode return {}", episode.total_reward());
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let (mdp, lake): (Rc<dyn Mdp>, Option<Rc<FrozenLake>>) = match (&args.model, args.env) {
        (Some(path), _) => (Rc::new(RecordedMdp::from_path(path)?), None),
        (None, Env::SimpleGolf) => (Rc::new(SimpleGolf::new()), None),
        (None, env) => {
            let slippery = !args.deterministic;
            let lake = Rc::new(match env {
                Env::FrozenLake8x8 => FrozenLake::eight_by_eight(slippery)?,
                _ => FrozenLake::four_by_four(slippery)?,
            });
            (Rc::clone(&lake) as Rc<dyn Mdp>, Some(lake))
        }
    };
    info!(env = %mdp.name(), n_s = mdp.n_s(), n_a = mdp.n_a(), "model loaded");

    if let Some(path) = &args.dump_model {
        let json = RecordedMdp::record(mdp.as_ref()).to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        return Ok(());
    }

    let tensor = TransitionTensor::from_mdp(mdp.as_ref())?;
    let tie_break = args
        .random_ties
        .map_or(TieBreak::Lowest, |seed| TieBreak::Random { seed });
    let config = SolverConfig::new(args.gamma, args.tol)
        .with_max_iterations(args.max_iterations)
        .with_tie_break(tie_break);
    config.validate()?;

    let simulator = TransitionSimulator::new(mdp.as_ref());
    let chosen = solvers().into_iter().filter(|solver| match args.algo {
        Algo::Pi => solver.name() == PolicyIteration.name(),
        Algo::Vi => solver.name() == ValueIteration.name(),
        Algo::Both => true,
    });

    for solver in chosen {
        let solution = solver
            .solve(&tensor, &config)
            .with_context(|| format!("{} on {}", solver.name(), mdp.name()))?;
        let rollouts = simulator.evaluate(&solution, args.episodes, args.max_steps, args.seed)?;

        if args.json {
            let report = Report {
                env: mdp.name(),
                solver: solver.name(),
                gamma: config.gamma,
                tol: config.tol,
                iterations: solution.iterations,
                sweeps: solution.sweeps,
                v: solution.v.to_vec(),
                pi: solution.pi.clone(),
                mean_return: rollouts.mean_return,
                terminated: rollouts.terminated,
                episodes: rollouts.episodes,
            };
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }

        println!("\n{}\n{}\n{}", "-".repeat(25), solver.name(), "-".repeat(25));
        println!(
            "Gamma: {}, Tol: {}, Iterations: {}, Sweeps: {}",
            config.gamma, config.tol, solution.iterations, solution.sweeps
        );
        println!("{:.3?}", solution.v.to_vec());
        println!("{:?}", solution.pi);
        if let Some(lake) = &lake {
            println!("{}", lake.render_policy(&solution.pi)?);
        }
        println!(
            "Average return over {} episodes: {} ({} terminated)",
            rollouts.episodes, rollouts.mean_return, rollouts.terminated
        );

        if args.render {
            let rng = &mut StdRng::seed_from_u64(args.seed);
            let episode = simulator.run_episode(rng, &solution, args.max_steps)?;
            render(&episode, lake.as_deref())?;
        }
    }

    Ok(())
}
