//! Property-based tests for normalization and unification using proptest
//!
//! Terms are generated as shapes over a small pool of atoms, integers and
//! variable names so that random pairs unify often enough to be interesting.

use prolog_core::{normalize, Bindings, NoPrimitives};
use prolog_term::Term;
use proptest::prelude::*;

const VAR_NAMES: &[&str] = &["X", "Y", "Z", "W"];
const ATOMS: &[&str] = &["a", "b", "c"];
const FUNCTORS: &[&str] = &["f", "g"];

#[derive(Debug, Clone)]
enum Shape {
    Atom(usize),
    Int(i64),
    Var(usize),
    Anonymous,
    Node(usize, Vec<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        (0..ATOMS.len()).prop_map(Shape::Atom),
        (0i64..4).prop_map(Shape::Int),
        (0..VAR_NAMES.len()).prop_map(Shape::Var),
        Just(Shape::Anonymous),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        (0..FUNCTORS.len(), prop::collection::vec(inner, 1..4))
            .prop_map(|(functor, args)| Shape::Node(functor, args))
    })
}

fn ground_shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        (0..ATOMS.len()).prop_map(Shape::Atom),
        (0i64..4).prop_map(Shape::Int),
    ];
    leaf.prop_recursive(2, 8, 2, |inner| {
        (0..FUNCTORS.len(), prop::collection::vec(inner, 1..3))
            .prop_map(|(functor, args)| Shape::Node(functor, args))
    })
}

/// One variable instance per name, shared by every shape built from it
struct Pool {
    vars: Vec<Term>,
}

impl Pool {
    fn new() -> Self {
        Pool {
            vars: VAR_NAMES.iter().map(|name| Term::var(name)).collect(),
        }
    }

    fn build(&self, shape: &Shape) -> Term {
        self.build_with(shape, &|i| self.vars[i].clone())
    }

    /// Every variable occurrence becomes a distinct variable, so no
    /// unification can close a cycle
    fn build_linear(&self, shape: &Shape) -> Term {
        self.build_with(shape, &|i| Term::var(VAR_NAMES[i]))
    }

    fn build_with(&self, shape: &Shape, var: &dyn Fn(usize) -> Term) -> Term {
        match shape {
            Shape::Atom(i) => Term::atom(ATOMS[*i]),
            Shape::Int(n) => Term::integer(*n),
            Shape::Var(i) => var(*i),
            Shape::Anonymous => Term::anonymous(),
            Shape::Node(functor, args) => Term::compound(
                FUNCTORS[*functor],
                args.iter().map(|arg| self.build_with(arg, var)).collect(),
            )
            .unwrap(),
        }
    }
}

/// Normalize `a` and `b` together so their variables share slots
fn normalized_pair(a: &Term, b: &Term) -> (Term, Term, Term) {
    let pair = normalize(
        &Term::compound("pair", vec![a.clone(), b.clone()]).unwrap(),
        &NoPrimitives,
    );
    let [a, b] = pair.args() else {
        unreachable!("pair/2 has two arguments");
    };
    (a.clone(), b.clone(), pair.clone())
}

fn assert_symmetric(a: &Term, b: &Term, pair: &Term) -> Result<(), TestCaseError> {
    let context = Bindings::for_goal(pair);
    let forward = context.unify(a, b);
    let backward = context.unify(b, a);
    prop_assert_eq!(forward.is_some(), backward.is_some());

    if let (Some(forward), Some(backward)) = (forward, backward) {
        prop_assert_eq!(forward.reify(a), forward.reify(b));
        prop_assert_eq!(backward.reify(a), backward.reify(b));
        prop_assert_eq!(forward.reify(pair), backward.reify(pair));
        // each result already entails the other
        prop_assert_eq!(forward.unify(b, a).map(|c| c.len()), Some(forward.len()));
        prop_assert_eq!(backward.unify(a, b).map(|c| c.len()), Some(backward.len()));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_unify_is_symmetric_against_ground(left in shape_strategy(), right in ground_shape_strategy()) {
        let pool = Pool::new();
        let (a, b, pair) = normalized_pair(&pool.build(&left), &pool.build(&right));
        assert_symmetric(&a, &b, &pair)?;
    }

    #[test]
    fn test_unify_is_symmetric_for_linear_terms(left in shape_strategy(), right in shape_strategy()) {
        let pool = Pool::new();
        let (a, b, pair) = normalized_pair(&pool.build_linear(&left), &pool.build_linear(&right));
        assert_symmetric(&a, &b, &pair)?;
    }

    #[test]
    fn test_normalize_is_idempotent(shape in shape_strategy()) {
        let term = Pool::new().build(&shape);
        let once = normalize(&term, &NoPrimitives);
        let twice = normalize(&once, &NoPrimitives);
        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(twice.var_bound(), once.var_bound());
    }

    #[test]
    fn test_reify_of_ground_solution_is_fixpoint(
        shape in shape_strategy(),
        values in prop::collection::vec(ground_shape_strategy(), VAR_NAMES.len()),
    ) {
        let pool = Pool::new();

        // bind every variable of the pool to a ground value
        let binder = normalize(
            &Term::compound(
                "bind",
                vec![
                    pool.build(&shape),
                    Term::list(pool.vars.clone()),
                    Term::list(values.iter().map(|value| pool.build(value)).collect()),
                ],
            )
            .unwrap(),
            &NoPrimitives,
        );
        let [term, vars, values] = binder.args() else {
            unreachable!("bind/3 has three arguments");
        };
        let context = Bindings::for_goal(&binder).unify(vars, values).unwrap();

        let once = context.reify(term);
        prop_assert!(once.is_ground() || shape_has_anonymous(&shape));
        prop_assert_eq!(context.reify(&once), once);
    }

    #[test]
    fn test_sibling_branches_are_isolated(first in any::<i64>(), second in any::<i64>()) {
        let x = normalize(&Term::var("X"), &NoPrimitives);
        let root = Bindings::for_goal(&x);

        let left = root.unify(&x, &Term::integer(first)).unwrap();
        let right = root.unify(&x, &Term::integer(second)).unwrap();

        prop_assert_eq!(left.reify(&x), Term::integer(first));
        prop_assert_eq!(right.reify(&x), Term::integer(second));
        prop_assert!(root.is_empty());
        prop_assert_eq!(root.reify(&x), x);
    }
}

fn shape_has_anonymous(shape: &Shape) -> bool {
    match shape {
        Shape::Anonymous => true,
        Shape::Node(_, args) => args.iter().any(shape_has_anonymous),
        _ => false,
    }
}
