use crate::common::defs::*;
use crate::mdp::Mdp;
use std::rc::Rc;

/// Three-state golf hole: `0` fairway, `1` green, `2` in the hole.
///
/// Actions are `0` hit to green, `1` hit to fairway, `2` putt. Moves that
/// make no sense from a state leave the ball where it is.
///
/// https://towardsdatascience.com/reinforcement-learning-an-easy-introduction-to-value-iteration-e4cfe0731fd5
pub struct SimpleGolf {
    n_s: usize,
    n_a: usize,
    transitions: Rc<Transitions>,
}

impl SimpleGolf {
    pub fn new() -> Self {
        let (n_s, n_a) = (3, 3);
        let mut transitions = Transitions::from([
            (
                (0, 0),
                vec![
                    Transition::new(0.9, 1, 0., false),
                    Transition::new(0.1, 0, 0., false),
                ],
            ),
            (
                (1, 1),
                vec![
                    Transition::new(0.9, 0, 0., false),
                    Transition::new(0.1, 1, 0., false),
                ],
            ),
            (
                (1, 2),
                vec![
                    Transition::new(0.9, 2, 10., true),
                    Transition::new(0.1, 1, 0., false),
                ],
            ),
        ]);

        for s in 0..n_s {
            for a in 0..n_a {
                transitions
                    .entry((s, a))
                    .or_insert_with(|| vec![Transition::new(1., s, 0., s == 2)]);
            }
        }

        Self {
            n_s,
            n_a,
            transitions: Rc::new(transitions),
        }
    }
}

impl Default for SimpleGolf {
    fn default() -> Self {
        Self::new()
    }
}

impl Mdp for SimpleGolf {
    fn name(&self) -> String {
        "SimpleGolf".to_string()
    }

    fn n_s(&self) -> usize {
        self.n_s
    }

    fn n_a(&self) -> usize {
        self.n_a
    }

    fn transitions(&self) -> Rc<Transitions> {
        Rc::clone(&self.transitions)
    }
}
