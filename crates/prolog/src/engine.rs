use crate::config::EngineConfig;
use crate::query::Query;
use crate::EngineError;
use prolog_core::{
    normalize, Bindings, Clause, ClauseDatabase, ClauseProvider, DataFactProvider, FactDatabase,
};
use prolog_solver::{Code, Listener, PrimitiveRegistry, Provider, Solver};
use prolog_term::Term;

/// Provider registered from outside the engine
enum External {
    Clauses(Box<dyn ClauseProvider>),
    Facts(Box<dyn DataFactProvider>),
}

impl External {
    fn as_provider(&self) -> Provider<'_> {
        match self {
            External::Clauses(provider) => Provider::Clauses(provider.as_ref()),
            External::Facts(provider) => Provider::Facts(provider.as_ref()),
        }
    }
}

/// Embeddable resolution engine.
///
/// Owns its primitive registry, a clause database, a data fact database
/// and any external providers. Distinct engines share no mutable state.
pub struct Engine {
    config: EngineConfig,
    registry: PrimitiveRegistry,
    clauses: ClauseDatabase,
    facts: FactDatabase,
    external: Vec<External>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the standard primitives registered
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut registry = PrimitiveRegistry::new();
        if config.standard_builtins {
            prolog_builtins::register_standard(&mut registry);
        }
        Engine {
            config,
            registry,
            clauses: ClauseDatabase::new(),
            facts: FactDatabase::new(),
            external: Vec::new(),
        }
    }

    pub fn from_json_config(text: &str) -> Result<Self, EngineError> {
        Ok(Self::with_config(EngineConfig::from_json(text)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &PrimitiveRegistry {
        &self.registry
    }

    /// Register custom primitives. Clauses added before a primitive was
    /// registered still reach it through lookup by name and arity.
    pub fn registry_mut(&mut self) -> &mut PrimitiveRegistry {
        &mut self.registry
    }

    pub fn clauses(&self) -> &ClauseDatabase {
        &self.clauses
    }

    pub fn facts(&self) -> &FactDatabase {
        &self.facts
    }

    /// Normalize a term against this engine's primitives
    pub fn normalize(&self, term: &Term) -> Term {
        normalize(term, &self.registry)
    }

    pub fn add_fact(&mut self, head: Term) -> Result<(), EngineError> {
        let clause = Clause::fact(head, &self.registry)?;
        self.add_clause(clause);
        Ok(())
    }

    pub fn add_rule(&mut self, head: Term, body: Term) -> Result<(), EngineError> {
        let clause = Clause::rule(head, body, &self.registry)?;
        self.add_clause(clause);
        Ok(())
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.add(clause);
    }

    /// Store a ground fact. Returns `false` if it was already present.
    pub fn add_data_fact(&mut self, fact: Term) -> Result<bool, EngineError> {
        Ok(self.facts.insert(fact)?)
    }

    /// Consulted after the built-in databases, in registration order
    pub fn add_clause_provider(&mut self, provider: impl ClauseProvider + 'static) {
        self.external.push(External::Clauses(Box::new(provider)));
    }

    /// Consulted after the built-in databases, in registration order
    pub fn add_fact_provider(&mut self, provider: impl DataFactProvider + 'static) {
        self.external.push(External::Facts(Box::new(provider)));
    }

    /// Prepare a query. The goal is normalized; nothing runs until the
    /// query is consumed.
    pub fn query(&self, goal: Term) -> Result<Query<'_>, EngineError> {
        if !goal.is_callable() {
            return Err(EngineError::NotCallable {
                goal: goal.to_string(),
            });
        }
        Ok(Query::new(self, self.normalize(&goal)))
    }

    pub(crate) fn solver(&self) -> Solver<'_> {
        let mut solver = Solver::new(&self.registry)
            .with_config(self.config.solver.clone())
            .with_clauses(&self.clauses)
            .with_facts(&self.facts);
        for provider in &self.external {
            solver.add_provider(provider.as_provider());
        }
        solver
    }

    /// Run a normalized goal to completion or until `listener` aborts
    pub(crate) fn run(&self, goal: &Term, listener: &mut Listener<'_>) -> Code {
        let bindings = Bindings::for_goal(goal);
        tracing::trace!(goal = %goal, "solving");
        self.solver().solve(goal, &bindings, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prolog_core::Arity;
    use prolog_solver::PrimitiveCall;
    use std::ops::ControlFlow;

    fn compound(functor: &str, args: Vec<Term>) -> Term {
        Term::compound(functor, args).unwrap()
    }

    fn atom(name: &str) -> Term {
        Term::atom(name)
    }

    fn int(n: i64) -> Term {
        Term::integer(n)
    }

    fn var(name: &str) -> Term {
        Term::var(name)
    }

    fn family() -> Engine {
        let mut engine = Engine::new();
        for (parent, child) in [("tom", "bob"), ("bob", "ann"), ("bob", "pat"), ("pat", "jim")] {
            engine
                .add_data_fact(compound("parent", vec![atom(parent), atom(child)]))
                .unwrap();
        }
        let (x, y, z) = (var("X"), var("Y"), var("Z"));
        engine
            .add_rule(
                compound("ancestor", vec![x.clone(), y.clone()]),
                compound("parent", vec![x.clone(), y.clone()]),
            )
            .unwrap();
        engine
            .add_rule(
                compound("ancestor", vec![x.clone(), z.clone()]),
                compound(
                    ",",
                    vec![
                        compound("parent", vec![x, y.clone()]),
                        compound("ancestor", vec![y, z]),
                    ],
                ),
            )
            .unwrap();
        engine
    }

    /// Yields nat(0), nat(1), ... without end
    struct Naturals;

    impl DataFactProvider for Naturals {
        fn matching_facts<'a>(
            &'a self,
            _goal: &Term,
            _frame: prolog_core::Frame,
            _bindings: &Bindings,
        ) -> Box<dyn Iterator<Item = Term> + 'a> {
            Box::new((0..).map(|n| compound("nat", vec![int(n)])))
        }
    }

    #[test]
    fn test_recursive_query() {
        let engine = family();
        let query = engine.query(compound("ancestor", vec![atom("tom"), var("Who")])).unwrap();
        let names: Vec<String> = query
            .all()
            .iter()
            .map(|s| s.get("Who").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["bob", "ann", "pat", "jim"]);
    }

    #[test]
    fn test_query_is_restartable() {
        let engine = family();
        let query = engine.query(compound("parent", vec![atom("bob"), var("C")])).unwrap();
        assert_eq!(query.count(), 2);
        assert_eq!(query.count(), 2);
        assert_eq!(query.first().unwrap().get("C"), Some(&atom("ann")));
        assert!(query.exists());
    }

    #[test]
    fn test_take_stops_an_infinite_search() {
        let mut engine = Engine::new();
        engine.add_fact_provider(Naturals);
        let query = engine.query(compound("nat", vec![var("N")])).unwrap();
        let first = query.take(3);
        assert_eq!(first.len(), 3);
        assert_eq!(first[2].get("N"), Some(&int(2)));
        assert!(query.take(0).is_empty());
    }

    #[test]
    fn test_for_each_break() {
        let engine = family();
        let query = engine.query(compound("ancestor", vec![var("A"), var("B")])).unwrap();
        let mut seen = Vec::new();
        let delivered = query.for_each(|solution| {
            seen.push(solution.to_string());
            if seen.len() == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(delivered, 2);
        assert_eq!(seen[0], "A = tom, B = bob");
    }

    #[test]
    fn test_ground_query_solution_has_no_variables() {
        let engine = family();
        let query = engine.query(compound("parent", vec![atom("tom"), atom("bob")])).unwrap();
        let solution = query.first().unwrap();
        assert!(solution.is_empty());
        assert_eq!(solution.to_string(), "true");
        assert!(!engine.query(compound("parent", vec![atom("jim"), atom("tom")])).unwrap().exists());
    }

    #[test]
    fn test_underscore_variables_are_not_reported() {
        let engine = family();
        let query = engine.query(compound("parent", vec![var("_P"), var("C")])).unwrap();
        let names: Vec<&str> = query.variable_names().collect();
        assert_eq!(names, vec!["C"]);
    }

    #[test]
    fn test_builtins_available_by_default() {
        let engine = Engine::new();
        let goal = compound("is", vec![var("X"), compound("+", vec![int(2), int(3)])]);
        let solution = engine.query(goal).unwrap().first().unwrap();
        assert_eq!(solution.get("X"), Some(&int(5)));

        let bare = Engine::with_config(EngineConfig {
            standard_builtins: false,
            ..EngineConfig::default()
        });
        let goal = compound("is", vec![var("X"), int(1)]);
        assert!(!bare.query(goal).unwrap().exists());
    }

    #[test]
    fn test_custom_primitive() {
        fn double(call: &mut PrimitiveCall<'_, '_>) -> Code {
            let Some(n) = call.value(0).ok().and_then(|t| t.as_integer()) else {
                return Code::CONTINUE;
            };
            match call.unify_value(1, &Term::integer(n * 2)) {
                Ok(next) => call.succeed_with(next),
                Err(_) => Code::CONTINUE,
            }
        }

        let mut engine = Engine::new();
        engine
            .add_rule(
                compound("quad", vec![var("X"), var("Z")]),
                compound(
                    ",",
                    vec![
                        compound("double", vec![var("X"), var("Y")]),
                        compound("double", vec![var("Y"), var("Z")]),
                    ],
                ),
            )
            .unwrap();
        // registered after the rule was added
        engine.registry_mut().register("double", Arity::Exact(2), double);

        let solution = engine
            .query(compound("quad", vec![int(3), var("R")]))
            .unwrap()
            .first()
            .unwrap();
        assert_eq!(solution.get("R"), Some(&int(12)));
    }

    #[test]
    fn test_errors() {
        let mut engine = Engine::new();
        assert!(matches!(
            engine.query(int(1)),
            Err(EngineError::NotCallable { .. })
        ));
        assert!(matches!(engine.query(var("G")), Err(EngineError::NotCallable { .. })));
        assert!(matches!(
            engine.add_data_fact(compound("p", vec![var("X")])),
            Err(EngineError::Insert(_))
        ));
        assert!(matches!(engine.add_fact(int(3)), Err(EngineError::Clause(_))));
        assert!(matches!(
            Engine::from_json_config("not json"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_external_providers_follow_databases() {
        let mut engine = Engine::new();
        engine.add_data_fact(compound("nat", vec![int(-1)])).unwrap();
        engine.add_fact_provider(Naturals);
        let firsts = engine.query(compound("nat", vec![var("N")])).unwrap().take(2);
        assert_eq!(firsts[0].get("N"), Some(&int(-1)));
        assert_eq!(firsts[1].get("N"), Some(&int(0)));
    }

    #[test]
    fn test_deep_recursion_on_a_larger_stack() {
        // cnt(0).
        // cnt(N) :- N > 0, M is N - 1, cnt(M).
        fn counter() -> Engine {
            let mut engine = Engine::new();
            engine.add_fact(compound("cnt", vec![int(0)])).unwrap();
            engine
                .add_rule(
                    compound("cnt", vec![var("N")]),
                    compound(
                        ",",
                        vec![
                            compound(">", vec![var("N"), int(0)]),
                            compound("is", vec![var("M"), compound("-", vec![var("N"), int(1)])]),
                            compound("cnt", vec![var("M")]),
                        ],
                    ),
                )
                .unwrap();
            engine
        }

        assert_eq!(counter().query(compound("cnt", vec![int(10)])).unwrap().count(), 1);

        let deep = std::thread::Builder::new()
            .stack_size(256 << 20)
            .spawn(|| counter().query(compound("cnt", vec![int(2000)])).unwrap().count())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(deep, 1);
    }
}
