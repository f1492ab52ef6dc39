//! Resolution solver
//!
//! Depth-first SLD resolution in continuation-passing style. Every solve
//! call receives the listener to invoke for each solution and returns a
//! [`Code`] describing how its caller should proceed. Conjunctions chain
//! listeners, choice points loop over alternatives until a non-continue code
//! comes back, and cut is a code carrying the level of the choice point it
//! commits to.
//!
//! # Levels
//!
//! Each choice point that can be cut (a predicate call, a disjunction, a
//! `call/N`, the condition of an if-then-else, a negation) opens a new level
//! one deeper than its scope. Goals inside it run with that level as their
//! cut barrier. A `!` reports `cut_to(barrier)`; every frame deeper than the
//! barrier stops trying alternatives and passes the code up, and the frame
//! owning the level turns it back into "continue".
//!
//! # Stack depth
//!
//! Proof depth maps onto the native call stack: every nested predicate call
//! costs several Rust frames (predicate scan, clause activation, the
//! conjunction continuation). A counting loop such as
//! `cnt(N) :- N > 0, M is N - 1, cnt(M).` overflows the default 2 MiB test
//! thread somewhere below a depth of 2000, so budget on the order of a
//! few hundred levels per MiB. Deep programs should run on a thread with a
//! larger stack (`std::thread::Builder::stack_size`).

use crate::code::Code;
use crate::config::{SolverConfig, UnknownPredicate};
use crate::primitive::{Primitive, PrimitiveCall, PrimitiveRegistry};
use prolog_core::{Bindings, Clause, ClauseProvider, DataFactProvider, Frame};
use prolog_term::{Struct, Term, Value};

/// Solution callback. Receives the bindings of one solution and returns the
/// code the search should continue with.
pub type Listener<'l> = dyn FnMut(&Bindings) -> Code + 'l;

/// Where a goal runs: the frame its variables live in, the level a `!`
/// cuts to and the current nesting level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub frame: Frame,
    pub barrier: u32,
    pub depth: u32,
}

impl Scope {
    pub const TOP_LEVEL: u32 = 1;

    /// Scope of a top-level goal
    pub fn top() -> Scope {
        Scope {
            frame: 0,
            barrier: Scope::TOP_LEVEL,
            depth: Scope::TOP_LEVEL,
        }
    }

    pub fn in_frame(self, frame: Frame) -> Scope {
        Scope { frame, ..self }
    }

    /// Open a new cut level below this scope
    pub fn enter(self) -> (u32, Scope) {
        let level = self.depth + 1;
        let inner = Scope {
            frame: self.frame,
            barrier: level,
            depth: level,
        };
        (level, inner)
    }
}

/// A candidate source registered with the solver
#[derive(Clone, Copy)]
pub enum Provider<'a> {
    Clauses(&'a dyn ClauseProvider),
    Facts(&'a dyn DataFactProvider),
}

pub struct Solver<'a> {
    registry: &'a PrimitiveRegistry,
    providers: Vec<Provider<'a>>,
    config: SolverConfig,
}

impl<'a> Solver<'a> {
    pub fn new(registry: &'a PrimitiveRegistry) -> Self {
        Solver {
            registry,
            providers: Vec::new(),
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clauses(mut self, provider: &'a dyn ClauseProvider) -> Self {
        self.providers.push(Provider::Clauses(provider));
        self
    }

    pub fn with_facts(mut self, provider: &'a dyn DataFactProvider) -> Self {
        self.providers.push(Provider::Facts(provider));
        self
    }

    /// Providers are consulted in the order they were added
    pub fn add_provider(&mut self, provider: Provider<'a>) {
        self.providers.push(provider);
    }

    pub fn registry(&self) -> &'a PrimitiveRegistry {
        self.registry
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve a normalized top-level goal living in frame 0.
    ///
    /// Returns [`Code::ABORT`] if the listener aborted, otherwise
    /// [`Code::CONTINUE`].
    pub fn solve(&self, goal: &Term, bindings: &Bindings, listener: &mut Listener<'_>) -> Code {
        self.solve_scoped(goal, Scope::top(), bindings, listener)
            .absorb(Scope::TOP_LEVEL)
    }

    /// Solve `goal` in `scope`
    pub fn solve_scoped(
        &self,
        goal: &Term,
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let (goal, frame) = bindings.deref(goal, scope.frame);
        let scope = scope.in_frame(frame);

        match goal {
            Term::Atomic(Value::Atom(name)) => match name.as_str() {
                "true" => listener(bindings),
                "fail" | "false" => Code::CONTINUE,
                "!" => listener(bindings).through_cut(scope.barrier),
                _ => self.solve_predicate(goal, None, scope, bindings, listener),
            },
            Term::Struct(node) => self.solve_compound(goal, node, scope, bindings, listener),
            Term::Var(_) | Term::Atomic(_) => {
                tracing::warn!(goal = %goal, "goal is not callable");
                Code::CONTINUE
            }
        }
    }

    fn solve_compound(
        &self,
        goal: &Term,
        node: &Struct,
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let args = node.args();
        match (node.name(), args.len()) {
            (",", n) if n >= 2 => self.solve_conjunction(args, scope, bindings, listener),
            (";", 2) => {
                let (first, frame) = bindings.deref(&args[0], scope.frame);
                match first.as_struct() {
                    Some(cond) if cond.name() == "->" && cond.arity() == 2 => self
                        .solve_if_then_else(
                            &cond.args()[0],
                            &cond.args()[1],
                            frame,
                            Some(&args[1]),
                            scope,
                            bindings,
                            listener,
                        ),
                    _ => self.solve_disjunction(args, scope, bindings, listener),
                }
            }
            (";", n) if n > 2 => self.solve_disjunction(args, scope, bindings, listener),
            ("->", 2) => self.solve_if_then_else(
                &args[0],
                &args[1],
                scope.frame,
                None,
                scope,
                bindings,
                listener,
            ),
            ("call", _) => self.solve_call(args, scope, bindings, listener),
            ("\\+", 1) | ("not", 1) => self.solve_negation(&args[0], scope, bindings, listener),
            _ => self.solve_predicate(goal, Some(node), scope, bindings, listener),
        }
    }

    fn solve_conjunction(
        &self,
        goals: &[Term],
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        match goals {
            [] => listener(bindings),
            [last] => self.solve_scoped(last, scope, bindings, listener),
            [first, rest @ ..] => self.solve_scoped(first, scope, bindings, &mut |next: &Bindings| {
                self.solve_conjunction(rest, scope, next, listener)
            }),
        }
    }

    fn solve_disjunction(
        &self,
        goals: &[Term],
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let (level, inner) = scope.enter();
        for goal in goals {
            let code = self.solve_scoped(goal, inner, bindings, listener);
            if !code.is_continue() {
                return code.absorb(level);
            }
        }
        Code::CONTINUE
    }

    /// `(Cond -> Then ; Else)` and `(Cond -> Then)`. The condition runs at a
    /// private level and only its first solution is kept. The branches run
    /// in the enclosing scope, so a cut inside them cuts the clause.
    #[allow(clippy::too_many_arguments)]
    fn solve_if_then_else(
        &self,
        cond: &Term,
        then: &Term,
        branch_frame: Frame,
        otherwise: Option<&Term>,
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let (level, inner) = scope.enter();
        let mut committed = None;
        let code = self.solve_scoped(cond, inner.in_frame(branch_frame), bindings, &mut |next: &Bindings| {
            committed = Some(next.clone());
            Code::cut_to(level)
        });
        if code.is_abort() {
            return Code::ABORT;
        }
        match (committed, otherwise) {
            (Some(next), _) => self.solve_scoped(then, scope.in_frame(branch_frame), &next, listener),
            (None, Some(otherwise)) => self.solve_scoped(otherwise, scope, bindings, listener),
            (None, None) => Code::CONTINUE,
        }
    }

    fn solve_negation(
        &self,
        goal: &Term,
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let (level, inner) = scope.enter();
        let code = self.solve_scoped(goal, inner, bindings, &mut |_: &Bindings| Code::cut_to(level));
        if code.is_abort() {
            return Code::ABORT;
        }
        if code.cut_level() == Some(level) {
            Code::CONTINUE
        } else {
            listener(bindings)
        }
    }

    /// `call/N`: the first argument is the goal, further arguments are
    /// appended to it. A cut inside the goal stops at the call.
    fn solve_call(
        &self,
        args: &[Term],
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let (level, inner) = scope.enter();
        let (goal, frame) = bindings.deref(&args[0], scope.frame);
        let code = if args.len() == 1 {
            self.solve_scoped(goal, inner.in_frame(frame), bindings, listener)
        } else {
            match extend_goal(goal, frame, &args[1..], scope.frame, bindings) {
                Some(extended) => self.solve_scoped(&extended, inner.in_frame(0), bindings, listener),
                None => {
                    tracing::warn!(goal = %goal, "call/{} on a non-callable goal", args.len());
                    Code::CONTINUE
                }
            }
        };
        code.absorb(level)
    }

    fn solve_predicate(
        &self,
        goal: &Term,
        node: Option<&Struct>,
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let Some(signature) = goal.signature() else {
            return Code::CONTINUE;
        };

        let primitive = self
            .registry
            .resolve(node.and_then(Struct::primitive), signature);
        if let Some(primitive) = primitive {
            tracing::trace!(goal = %goal, "primitive");
            return self.call_primitive(primitive, goal, scope, bindings, listener);
        }

        let (level, _) = scope.enter();
        tracing::trace!(goal = %goal, level, "call");
        let mut candidates = 0usize;
        for provider in &self.providers {
            match *provider {
                Provider::Clauses(clauses) => {
                    for clause in clauses.matching_clauses(goal, scope.frame, bindings) {
                        candidates += 1;
                        let code = self.resolve_clause(&clause, goal, scope.frame, level, bindings, listener);
                        if !code.is_continue() {
                            return code.absorb(level);
                        }
                    }
                }
                Provider::Facts(facts) => {
                    for fact in facts.matching_facts(goal, scope.frame, bindings) {
                        candidates += 1;
                        let Some(next) = bindings.unify_in(goal, scope.frame, &fact, 0) else {
                            continue;
                        };
                        let code = listener(&next);
                        if !code.is_continue() {
                            return code.absorb(level);
                        }
                    }
                }
            }
        }

        if candidates == 0 && self.config.unknown_predicate == UnknownPredicate::Warn {
            tracing::warn!(predicate = %signature, "no clauses or facts for predicate");
        }
        Code::CONTINUE
    }

    fn call_primitive(
        &self,
        primitive: &dyn Primitive,
        goal: &Term,
        scope: Scope,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let mut call = PrimitiveCall::new(self, goal, scope, bindings, listener);
        primitive.call(&mut call)
    }

    /// Try one clause: unify its head in a fresh frame, then report the
    /// fact or solve the body with `level` as cut barrier
    fn resolve_clause(
        &self,
        clause: &Clause,
        goal: &Term,
        frame: Frame,
        level: u32,
        bindings: &Bindings,
        listener: &mut Listener<'_>,
    ) -> Code {
        let (base, next) = bindings.allocate(clause.var_count());
        let Some(next) = next.unify_in(goal, frame, clause.head(), base) else {
            return Code::CONTINUE;
        };
        tracing::trace!(goal = %goal, head = %clause.head(), level, "redo");
        match clause.body() {
            None => listener(&next),
            Some(body) => {
                let body_scope = Scope {
                    frame: base,
                    barrier: level,
                    depth: level,
                };
                self.solve_scoped(body, body_scope, &next, listener)
            }
        }
    }
}

/// Build the goal of `call(G, A1, ..., An)` by appending the extra
/// arguments to `G`. The result lives in frame 0.
fn extend_goal(
    goal: &Term,
    frame: Frame,
    extra: &[Term],
    extra_frame: Frame,
    bindings: &Bindings,
) -> Option<Term> {
    let signature = goal.signature()?;
    let goal = bindings.reify_in(goal, frame);
    let mut args = goal.args().to_vec();
    args.extend(extra.iter().map(|arg| bindings.reify_in(arg, extra_frame)));
    Term::compound_sym(signature.name, args).ok()
}
