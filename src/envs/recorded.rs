//! Models recorded from the gymnasium HTTP API.
//!
//! The document is what `GET /v1/envs/<instance_id>/transitions/` returns:
//! `{"transitions": {"<s>": {"<a>": [[p, s', r, done], ...]}}}`.

use crate::common::defs::*;
use crate::error::{MdpError, Result};
use crate::mdp::Mdp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawOutcome(Continous, Discrete, Continous, bool);

#[derive(Debug, Serialize, Deserialize)]
struct TransitionsDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    transitions: BTreeMap<String, BTreeMap<String, Vec<RawOutcome>>>,
}

#[derive(Debug, Clone)]
pub struct RecordedMdp {
    name: String,
    n_s: usize,
    n_a: usize,
    transitions: Rc<Transitions>,
}

impl RecordedMdp {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: TransitionsDoc =
            serde_json::from_str(json).map_err(|e| MdpError::format(e.to_string()))?;

        // Parses a key and returns the space size it implies.
        let parse_key = |key: &str| {
            let index = key
                .parse::<Discrete>()
                .map_err(|_| MdpError::format(format!("'{key}' is not a state or action index")))?;
            let size = index
                .checked_add(1)
                .ok_or_else(|| MdpError::format(format!("index '{key}' is out of range")))?;
            Ok::<_, MdpError>((index, size))
        };

        let mut transitions = Transitions::new();
        let (mut n_s, mut n_a) = (0, 0);
        for (s, actions) in &doc.transitions {
            let (s, s_size) = parse_key(s)?;
            n_s = n_s.max(s_size);
            for (a, outcomes) in actions {
                let (a, a_size) = parse_key(a)?;
                n_a = n_a.max(a_size);
                let ts = outcomes
                    .iter()
                    .map(|RawOutcome(p, next, r, done)| Transition::new(*p, *next, *r, *done))
                    .collect();
                transitions.insert((s, a), ts);
            }
        }

        if transitions.is_empty() {
            return Err(MdpError::format("document has no transitions"));
        }

        Ok(Self {
            name: doc.name.unwrap_or_else(|| "recorded".to_string()),
            n_s,
            n_a,
            transitions: Rc::new(transitions),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| MdpError::format(format!("cannot read {}: {e}", path.display())))?;

        Self::from_json_str(&json)
    }

    /// Snapshot of any model, e.g. to replay a built-in lake elsewhere.
    pub fn record(mdp: &dyn Mdp) -> Self {
        Self {
            name: mdp.name(),
            n_s: mdp.n_s(),
            n_a: mdp.n_a(),
            transitions: mdp.transitions(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let mut transitions: BTreeMap<String, BTreeMap<String, Vec<RawOutcome>>> = BTreeMap::new();
        for (&(s, a), ts) in self.transitions.iter() {
            let outcomes = ts
                .iter()
                .map(|t| RawOutcome(t.probability, t.next_state, t.reward, t.done))
                .collect();
            transitions
                .entry(s.to_string())
                .or_default()
                .insert(a.to_string(), outcomes);
        }

        let doc = TransitionsDoc {
            name: Some(self.name.clone()),
            transitions,
        };
        serde_json::to_string(&doc).map_err(|e| MdpError::format(e.to_string()))
    }
}

impl Mdp for RecordedMdp {
    fn name(&self) -> String {
        self.name.clone()
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
