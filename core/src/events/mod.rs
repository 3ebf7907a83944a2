//! Progress events streamed by a running search.
//!
//! One run produces exactly one `Start`, then `Update`s with sequence numbers
//! 0, 1, 2, ... and finally one `End`. Nothing follows `End` for that run.

pub mod cancel;
pub mod channel;

pub use cancel::CancelToken;
pub use channel::EventChannel;

use crate::graph::Weight;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum SearchEvent<V: Eq + Hash> {
    Start,
    Update {
        sequence: u64,
        distances: FxHashMap<V, Weight>,
    },
    End {
        found: bool,
        path: Vec<V>,
    },
}

impl<V: Eq + Hash> SearchEvent<V> {
    pub fn is_start(&self) -> bool {
        matches!(self, SearchEvent::Start)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, SearchEvent::End { .. })
    }

    pub fn sequence(&self) -> Option<u64> {
        match self {
            SearchEvent::Update { sequence, .. } => Some(*sequence),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchEvent::Start => "START",
            SearchEvent::Update { .. } => "UPDATE",
            SearchEvent::End { .. } => "END",
        }
    }
}
