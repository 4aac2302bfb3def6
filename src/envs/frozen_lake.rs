//! FrozenLake with the gym transition model.
//!
//! Refer: https://gymnasium.farama.org/environments/toy_text/frozen_lake/

use crate::common::defs::*;
use crate::error::{MdpError, Result};
use crate::mdp::Mdp;
use crate::simulator::Episode;
use std::rc::Rc;

pub const LEFT: Discrete = 0;
pub const DOWN: Discrete = 1;
pub const RIGHT: Discrete = 2;
pub const UP: Discrete = 3;

fn action_name(a: Discrete) -> Option<&'static str> {
    match a {
        LEFT => Some("Left"),
        DOWN => Some("Down"),
        RIGHT => Some("Right"),
        UP => Some("Up"),
        _ => None,
    }
}

pub const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

pub const MAP_8X8: [&str; 8] = [
    "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF",
    "FFFHFFFG",
];

pub struct FrozenLake {
    name: String,
    desc: Vec<Vec<u8>>,
    ncol: usize,
    start: Discrete,
    transitions: Rc<Transitions>,
}

impl FrozenLake {
    pub fn four_by_four(slippery: bool) -> Result<Self> {
        Self::new(&MAP_4X4, slippery)
    }

    pub fn eight_by_eight(slippery: bool) -> Result<Self> {
        Self::new(&MAP_8X8, slippery)
    }

    /// `desc` rows use `S` (start), `F` (frozen), `H` (hole), `G` (goal).
    /// On a slippery lake the intended move and both perpendicular moves are
    /// taken with probability 1/3 each.
    pub fn new(desc: &[&str], slippery: bool) -> Result<Self> {
        let desc: Vec<Vec<u8>> = desc.iter().map(|row| row.as_bytes().to_vec()).collect();
        let nrow = desc.len();
        let ncol = desc.first().map_or(0, Vec::len);
        if nrow == 0 || ncol == 0 {
            return Err(MdpError::format("lake map is empty"));
        }
        if let Some(r) = desc.iter().position(|row| row.len() != ncol) {
            return Err(MdpError::format(format!(
                "lake map row {r} has {} tiles, expected {ncol}",
                desc[r].len()
            )));
        }
        if let Some(&tile) = desc.iter().flatten().find(|&&t| !b"SFHG".contains(&t)) {
            return Err(MdpError::format(format!(
                "unknown lake tile '{}'",
                tile as char
            )));
        }
        let starts: Vec<Discrete> = desc
            .iter()
            .flatten()
            .enumerate()
            .filter(|(_, &t)| t == b'S')
            .map(|(s, _)| s)
            .collect();
        let start = match starts.as_slice() {
            [s] => *s,
            _ => {
                return Err(MdpError::format(format!(
                    "lake map needs exactly one start tile, found {}",
                    starts.len()
                )))
            }
        };

        let transitions = Self::build_transitions(&desc, nrow, ncol, slippery);
        let name = format!(
            "{}-{nrow}x{ncol}-FrozenLake",
            if slippery { "Stochastic" } else { "Deterministic" }
        );

        Ok(Self {
            name,
            desc,
            ncol,
            start,
            transitions: Rc::new(transitions),
        })
    }

    fn build_transitions(
        desc: &[Vec<u8>],
        nrow: usize,
        ncol: usize,
        slippery: bool,
    ) -> Transitions {
        let to_s = |row: usize, col: usize| row * ncol + col;
        let inc = |row: usize, col: usize, a: Discrete| match a {
            LEFT => (row, col.saturating_sub(1)),
            DOWN => ((row + 1).min(nrow - 1), col),
            RIGHT => (row, (col + 1).min(ncol - 1)),
            _ => (row.saturating_sub(1), col),
        };
        let outcome = |row: usize, col: usize, a: Discrete, p: Continous| {
            let (row, col) = inc(row, col, a);
            let tile = desc[row][col];
            Transition::new(
                p,
                to_s(row, col),
                if tile == b'G' { 1. } else { 0. },
                tile == b'G' || tile == b'H',
            )
        };

        let mut transitions = Transitions::new();
        for row in 0..nrow {
            for col in 0..ncol {
                let s = to_s(row, col);
                for a in [LEFT, DOWN, RIGHT, UP] {
                    let ts = if b"GH".contains(&desc[row][col]) {
                        vec![Transition::new(1., s, 0., true)]
                    } else if slippery {
                        [(a + 3) % 4, a, (a + 1) % 4]
                            .into_iter()
                            .map(|b| outcome(row, col, b, 1. / 3.))
                            .collect()
                    } else {
                        vec![outcome(row, col, a, 1.)]
                    };
                    transitions.insert((s, a), ts);
                }
            }
        }

        transitions
    }

    pub fn tile(&self, s: Discrete) -> Option<char> {
        self.desc
            .get(s / self.ncol)
            .and_then(|row| row.get(s % self.ncol))
            .map(|&t| t as char)
    }

    /// Policy drawn on the lake: holes and the goal keep their letter,
    /// every other tile shows the arrow of its action.
    pub fn render_policy(&self, pi: &[Discrete]) -> Result<String> {
        if pi.len() != self.n_s() {
            return Err(MdpError::shape(format!(
                "policy has {} entries, lake has {} tiles",
                pi.len(),
                self.n_s()
            )));
        }

        let lines = self
            .desc
            .iter()
            .enumerate()
            .map(|(row, tiles)| {
                tiles
                    .iter()
                    .enumerate()
                    .map(|(col, &tile)| match tile {
                        b'H' | b'G' => tile as char,
                        _ => match pi[row * self.ncol + col] {
                            LEFT => '←',
                            DOWN => '↓',
                            RIGHT => '→',
                            UP => '↑',
                            _ => '?',
                        },
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>();

        Ok(lines.join("\n"))
    }

    /// The lake with the agent drawn as `@` on tile `s`, under the name of
    /// the action that led there.
    pub fn render_state(&self, s: Discrete, last_action: Option<Discrete>) -> Result<String> {
        if self.tile(s).is_none() {
            return Err(MdpError::shape(format!("state {s} is not on the lake")));
        }

        let mut out = String::new();
        if let Some(a) = last_action {
            let name = action_name(a)
                .ok_or_else(|| MdpError::shape(format!("{a} is not a lake action")))?;
            out.push_str(&format!("  ({name})\n"));
        }
        let grid = self
            .desc
            .iter()
            .enumerate()
            .map(|(row, tiles)| {
                tiles
                    .iter()
                    .enumerate()
                    .map(|(col, &tile)| {
                        if row * self.ncol + col == s {
                            '@'
                        } else {
                            tile as char
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        out.push_str(&grid);

        Ok(out)
    }

    /// One frame per visited state, separated by blank lines.
    pub fn render_episode(&self, episode: &Episode) -> Result<String> {
        let mut last_action = None;
        let mut frames = Vec::with_capacity(episode.events.len());
        for event in &episode.events {
            frames.push(self.render_state(event.s, last_action)?);
            last_action = event.a;
        }

        Ok(frames.join("\n\n"))
    }
}

impl Mdp for FrozenLake {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn n_s(&self) -> usize {
        self.desc.len() * self.ncol
    }

    fn n_a(&self) -> usize {
        4
    }

    fn transitions(&self) -> Rc<Transitions> {
        Rc::clone(&self.transitions)
    }

    fn initial_state(&self) -> Discrete {
        self.start
    }
}
