use std::collections::{BTreeSet, VecDeque};
use std::fmt::{Display, Formatter};

/// Index of a state inside the arena of the automaton that owns it.
pub type StateId = usize;

/// Sorted set of states, so equal sets compare and hash equal whatever order
/// they were built in.
pub type StateSet = BTreeSet<StateId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// `None` marks an epsilon transition.
    symbol: Option<char>,
    to: StateId,
}

impl Transition {
    pub fn symbol(&self) -> Option<char> {
        self.symbol
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbol.is_none()
    }

    fn matches(&self, c: char) -> bool {
        self.symbol == Some(c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    transitions: Vec<Transition>,
    accepting: bool,
}

impl State {
    fn new(id: StateId) -> Self {
        State {
            id,
            transitions: vec![],
            accepting: false,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Outgoing transitions in insertion order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn epsilon_transitions(&self) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .iter()
            .filter(|t| t.is_epsilon())
            .map(|t| t.to)
    }

    pub fn transitions_on(&self, c: char) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .iter()
            .filter(move |t| t.matches(c))
            .map(|t| t.to)
    }
}

/// Thompson NFA: exactly one start and one accepting state.
///
/// Every state lives in the `states` arena and is referred to by its index,
/// so back edges introduced by `*` and `+` are plain indices. Combining two
/// automata moves the states of the right hand side into the left arena with
/// their ids shifted past the existing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<State>,
    start_state: StateId,
    accept_state: StateId,
}

impl Nfa {
    fn add_transition(&mut self, from: StateId, to: StateId, symbol: Option<char>) {
        self.states[from].transitions.push(Transition { symbol, to });
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, to, None);
    }

    fn add_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(State::new(id));
        id
    }

    /// Moves the accepting flag so that only `state` carries it.
    fn set_accept_state(&mut self, state: StateId) {
        self.states[self.accept_state].accepting = false;
        self.states[state].accepting = true;
        self.accept_state = state;
    }

    /// Moves `other`'s states into this arena and returns its start and
    /// accept states renumbered. The absorbed accept state stops accepting.
    fn absorb(&mut self, other: Nfa) -> (StateId, StateId) {
        let offset = self.states.len();

        self.states.extend(other.states.into_iter().map(|mut state| {
            state.id += offset;
            state.accepting = false;
            for t in &mut state.transitions {
                t.to += offset;
            }
            state
        }));

        (other.start_state + offset, other.accept_state + offset)
    }

    /// Wraps the current automaton into a new start and accept state, linked
    /// to the old ones by epsilons. Returns the old `(start, accept)` pair.
    fn wrap(&mut self) -> (StateId, StateId) {
        let old_start = self.start_state;
        let old_accept = self.accept_state;

        let new_start = self.add_state();
        let new_accept = self.add_state();

        self.start_state = new_start;
        self.set_accept_state(new_accept);

        (old_start, old_accept)
    }

    /// Automaton of the language containing only the empty string.
    pub(crate) fn empty() -> Self {
        let mut nfa = Nfa {
            states: vec![],
            start_state: 0,
            accept_state: 0,
        };
        nfa.add_state();
        nfa.states[0].accepting = true;
        nfa
    }

    pub(crate) fn from_char(c: char) -> Self {
        let mut nfa = Nfa::empty();
        let accept = nfa.add_state();
        nfa.add_transition(nfa.start_state, accept, Some(c));
        nfa.set_accept_state(accept);
        nfa
    }

    pub(crate) fn concatenate(&mut self, other: Nfa) {
        let (other_start, other_accept) = self.absorb(other);

        // connect two machines using the epsilon
        self.add_epsilon(self.accept_state, other_start);
        self.set_accept_state(other_accept);
    }

    pub(crate) fn alternate(&mut self, other: Nfa) {
        let (other_start, other_accept) = self.absorb(other);
        let (old_start, old_accept) = self.wrap();

        // new start branches into both machines
        self.add_epsilon(self.start_state, old_start);
        self.add_epsilon(self.start_state, other_start);

        // both old accepts lead to the new one
        self.add_epsilon(old_accept, self.accept_state);
        self.add_epsilon(other_accept, self.accept_state);
    }

    pub(crate) fn kleene_star(&mut self) {
        let (old_start, old_accept) = self.wrap();

        // zero repetitions
        self.add_epsilon(self.start_state, self.accept_state);
        self.add_epsilon(self.start_state, old_start);
        self.add_epsilon(old_accept, self.accept_state);
        // repeat
        self.add_epsilon(old_accept, old_start);
    }

    pub(crate) fn zero_or_one(&mut self) {
        let (old_start, old_accept) = self.wrap();

        self.add_epsilon(self.start_state, old_start);
        self.add_epsilon(old_accept, self.accept_state);
        // skip
        self.add_epsilon(self.start_state, self.accept_state);
    }

    pub(crate) fn one_or_more(&mut self) {
        let (old_start, old_accept) = self.wrap();

        self.add_epsilon(self.start_state, old_start);
        self.add_epsilon(old_accept, self.accept_state);
        // repeat, no way around the first occurrence
        self.add_epsilon(self.accept_state, self.start_state);
    }

    pub fn start(&self) -> StateId {
        self.start_state
    }

    pub fn accept(&self) -> StateId {
        self.accept_state
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Every symbol some transition is labelled with.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.iter().filter_map(|t| t.symbol))
            .collect()
    }

    pub fn contains_accepting(&self, states: &StateSet) -> bool {
        states
            .iter()
            .any(|&id| self.state(id).is_some_and(State::is_accepting))
    }

    /// States reachable from `initial_states` through epsilon transitions
    /// only, the initial states included.
    ///
    /// Ids that do not belong to this automaton are ignored.
    pub fn epsilon_closure<I>(&self, initial_states: I) -> StateSet
    where
        I: IntoIterator<Item = StateId>,
    {
        let mut reachable = StateSet::new();
        let mut queue: VecDeque<StateId> = VecDeque::new();

        for state in initial_states {
            if state < self.states.len() && reachable.insert(state) {
                queue.push_back(state);
            }
        }

        while let Some(cur) = queue.pop_front() {
            for next in self.states[cur].epsilon_transitions() {
                if reachable.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        reachable
    }

    /// Epsilon-closed set of states reached from `current` by consuming `c`.
    pub fn step(&self, current: &StateSet, c: char) -> StateSet {
        let after_char: Vec<StateId> = current
            .iter()
            .filter_map(|&id| self.state(id))
            .flat_map(|state| state.transitions_on(c))
            .collect();

        self.epsilon_closure(after_char)
    }

    /// Whether the whole `input` is in the language of the automaton.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current_states = self.epsilon_closure([self.start_state]);

        for c in input.chars() {
            current_states = self.step(&current_states, c);
            if current_states.is_empty() {
                return false;
            }
        }

        self.contains_accepting(&current_states)
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.symbol {
            Some(c) => write!(f, "'{}' -> {}", c, self.to),
            None => write!(f, "ε -> {}", self.to),
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if self.accepting {
            write!(f, "*")?;
        }
        write!(f, ": [")?;
        for (i, t) in self.transitions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t}")?;
        }
        write!(f, "]")
    }
}

impl Display for Nfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "start: {}, accept: {}", self.start_state, self.accept_state)?;
        for state in &self.states {
            writeln!(f, "{state}")?;
        }
        Ok(())
    }
}
