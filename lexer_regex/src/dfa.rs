//! Deterministic automaton whose states stand for sets of NFA states.
//!
//! Building a [`Dfa`] out of an [`Nfa`] (subset construction) is left to the
//! caller. This module only provides the state representation it needs:
//! states are keyed by the set of NFA states they summarize, so a worklist
//! algorithm can ask whether a set was already discovered.

use crate::error::{RegexError, RegexErrorKind};
use crate::nfa::{Nfa, StateId, StateSet};
use indexmap::IndexMap;
use indexmap::map::Entry;
#[cfg(feature = "logging")]
use log::*;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Index of a state in its [`Dfa`], in insertion order.
pub type DfaStateId = usize;

#[derive(Debug, Clone)]
pub struct DfaState {
    nfa_states: StateSet,
    transitions: BTreeMap<char, DfaStateId>,
    accepting: bool,
}

impl DfaState {
    pub fn new<I>(nfa_states: I) -> Self
    where
        I: IntoIterator<Item = StateId>,
    {
        DfaState {
            nfa_states: nfa_states.into_iter().collect(),
            transitions: BTreeMap::new(),
            accepting: false,
        }
    }

    /// Builds the state for `nfa_states`, accepting if any of them accepts
    /// in `nfa`.
    pub fn from_nfa<I>(nfa: &Nfa, nfa_states: I) -> Self
    where
        I: IntoIterator<Item = StateId>,
    {
        let mut state = DfaState::new(nfa_states);
        state.accepting = nfa.contains_accepting(&state.nfa_states);
        state
    }

    /// Overrides any previous transition on `symbol`.
    pub fn add_transition(&mut self, symbol: char, to: DfaStateId) {
        self.transitions.insert(symbol, to);
    }

    pub fn transition(&self, symbol: char) -> Option<DfaStateId> {
        self.transitions.get(&symbol).copied()
    }

    pub fn transitions(&self) -> &BTreeMap<char, DfaStateId> {
        &self.transitions
    }

    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn nfa_states(&self) -> &StateSet {
        &self.nfa_states
    }
}

// Identity is the represented set, not the transitions or the flag.
impl PartialEq for DfaState {
    fn eq(&self, other: &Self) -> bool {
        self.nfa_states == other.nfa_states
    }
}

impl Eq for DfaState {}

impl Hash for DfaState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nfa_states.hash(state);
    }
}

impl Display for DfaState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.nfa_states.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "}}")?;
        if self.accepting {
            write!(f, "*")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Dfa {
    states: IndexMap<StateSet, DfaState>,
}

impl Dfa {
    /// Creates a DFA whose start state, with id 0, is `start`.
    pub fn new(start: DfaState) -> Self {
        let mut states = IndexMap::new();
        states.insert(start.nfa_states.clone(), start);
        Dfa { states }
    }

    pub fn start(&self) -> DfaStateId {
        0
    }

    /// Inserts `state` unless an equal one is already present.
    ///
    /// Returns the id of the state standing for that NFA set and whether it
    /// was newly inserted. An existing state is left untouched.
    pub fn add_state(&mut self, state: DfaState) -> (DfaStateId, bool) {
        match self.states.entry(state.nfa_states.clone()) {
            Entry::Occupied(entry) => (entry.index(), false),
            Entry::Vacant(entry) => {
                let id = entry.index();

                #[cfg(feature = "logging")]
                trace!("dfa: new state {id} for {state}");

                entry.insert(state);
                (id, true)
            }
        }
    }

    pub fn find(&self, nfa_states: &StateSet) -> Option<DfaStateId> {
        self.states.get_index_of(nfa_states)
    }

    pub fn add_transition(
        &mut self,
        from: DfaStateId,
        symbol: char,
        to: DfaStateId,
    ) -> Result<(), RegexError> {
        if to >= self.states.len() {
            return Err(RegexError::new_general(RegexErrorKind::UnknownDfaState(to)));
        }
        let (_, state) = self
            .states
            .get_index_mut(from)
            .ok_or_else(|| RegexError::new_general(RegexErrorKind::UnknownDfaState(from)))?;
        state.add_transition(symbol, to);
        Ok(())
    }

    pub fn state(&self, id: DfaStateId) -> Option<&DfaState> {
        self.states.get_index(id).map(|(_, state)| state)
    }

    pub fn state_mut(&mut self, id: DfaStateId) -> Option<&mut DfaState> {
        self.states.get_index_mut(id).map(|(_, state)| state)
    }

    /// States in id order.
    pub fn states(&self) -> impl Iterator<Item = &DfaState> {
        self.states.values()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Follows exactly one transition per char. A missing transition rejects
    /// right away.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.start();

        for c in input.chars() {
            match self.state(current).and_then(|state| state.transition(c)) {
                Some(next) => current = next,
                None => return false,
            }
        }

        self.state(current).is_some_and(DfaState::is_accepting)
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (id, state) in self.states.values().enumerate() {
            write!(f, "{id} {state}:")?;
            for (symbol, to) in &state.transitions {
                write!(f, " '{symbol}' -> {to}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
