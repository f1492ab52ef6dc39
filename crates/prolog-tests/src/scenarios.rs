//! End-to-end search scenarios run through the engine facade

use prolog::{Engine, Solution, Term, TermError};

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

fn and(goals: Vec<Term>) -> Term {
    compound(",", goals)
}

fn or(left: Term, right: Term) -> Term {
    compound(";", vec![left, right])
}

/// `a/1` and `b/1` each holding 1, 2 and 3
fn abc_engine() -> Engine {
    let mut engine = Engine::new();
    for n in 1..=3 {
        engine.add_fact(compound("a", vec![int(n)])).unwrap();
        engine.add_fact(compound("b", vec![int(n)])).unwrap();
    }
    engine
}

fn pairs(solutions: &[Solution]) -> Vec<(i64, i64)> {
    solutions
        .iter()
        .map(|s| {
            (
                s.get("X").and_then(Term::as_integer).unwrap(),
                s.get("Y").and_then(Term::as_integer).unwrap(),
            )
        })
        .collect()
}

fn count(engine: &Engine, goal: Term) -> usize {
    engine.query(goal).unwrap().count()
}

#[test]
fn test_conjunction_enumerates_cross_product_in_order() {
    let engine = abc_engine();
    let goal = and(vec![
        compound("a", vec![var("X")]),
        compound("b", vec![var("Y")]),
    ]);
    let solutions = engine.query(goal).unwrap().all();

    let expected: Vec<(i64, i64)> = (1..=3)
        .flat_map(|x| (1..=3).map(move |y| (x, y)))
        .collect();
    assert_eq!(solutions.len(), 9);
    assert_eq!(pairs(&solutions), expected);
}

#[test]
fn test_cut_commits_to_first_choice() {
    let engine = abc_engine();
    let goal = and(vec![
        compound("a", vec![var("X")]),
        atom("!"),
        compound("b", vec![var("Y")]),
    ]);
    let solutions = engine.query(goal).unwrap().all();
    assert_eq!(pairs(&solutions), vec![(1, 1), (1, 2), (1, 3)]);
}

#[test]
fn test_cut_after_disjunction() {
    let engine = Engine::new();
    let goal = and(vec![or(atom("true"), atom("true")), atom("!")]);
    assert_eq!(count(&engine, goal), 1);
}

#[test]
fn test_call_is_opaque_to_cut() {
    let engine = abc_engine();

    let goal = compound("call", vec![or(atom("fail"), atom("true"))]);
    assert_eq!(count(&engine, goal), 1);

    // the cut inside call/1 leaves the caller's alternatives alone
    let goal = and(vec![
        compound("a", vec![var("X")]),
        compound("call", vec![atom("!")]),
    ]);
    assert_eq!(count(&engine, goal), 3);

    let goal = and(vec![
        compound("a", vec![var("X")]),
        compound(
            "call",
            vec![and(vec![compound("b", vec![var("Y")]), atom("!")])],
        ),
    ]);
    let solutions = engine.query(goal).unwrap().all();
    assert_eq!(pairs(&solutions), vec![(1, 1), (2, 1), (3, 1)]);
}

#[test]
fn test_cut_in_rule_body_is_local_to_the_rule() {
    let mut engine = abc_engine();
    // first_a(X) :- a(X), !.
    engine
        .add_rule(
            compound("first_a", vec![var("X")]),
            and(vec![compound("a", vec![var("X")]), atom("!")]),
        )
        .unwrap();

    let goal = and(vec![
        compound("b", vec![var("Y")]),
        compound("first_a", vec![var("X")]),
    ]);
    let solutions = engine.query(goal).unwrap().all();
    assert_eq!(pairs(&solutions), vec![(1, 1), (1, 2), (1, 3)]);
}

#[test]
fn test_list_shape() {
    let list = Term::cons(int(1), Term::cons(int(2), Term::cons(int(3), Term::nil())));
    assert_eq!(list.list_len().unwrap(), 3);
    assert_eq!(list.head().unwrap(), &int(1));
    assert_eq!(list, Term::list(vec![int(1), int(2), int(3)]));

    assert!(matches!(
        atom("plain").head(),
        Err(TermError::NotAList { .. })
    ));
}

#[test]
fn test_list_builtins() {
    let engine = Engine::new();
    let list = Term::list(vec![atom("x"), atom("y"), atom("z")]);

    let solution = engine
        .query(compound("length", vec![list.clone(), var("N")]))
        .unwrap()
        .first()
        .unwrap();
    assert_eq!(solution.get("N"), Some(&int(3)));

    let goal = compound(
        "findall",
        vec![
            var("X"),
            compound("a", vec![var("X")]),
            var("All"),
        ],
    );
    let engine = abc_engine();
    let solution = engine.query(goal).unwrap().first().unwrap();
    assert_eq!(
        solution.get("All"),
        Some(&Term::list(vec![int(1), int(2), int(3)]))
    );
}

#[test]
fn test_family_tree() {
    let mut engine = Engine::new();
    let parents = [
        ("abraham", "isaac"),
        ("isaac", "jacob"),
        ("jacob", "joseph"),
        ("jacob", "benjamin"),
    ];
    for (parent, child) in parents {
        engine
            .add_data_fact(compound("parent", vec![atom(parent), atom(child)]))
            .unwrap();
    }
    // ancestor(X, Y) :- parent(X, Y).
    // ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).
    engine
        .add_rule(
            compound("ancestor", vec![var("X"), var("Y")]),
            compound("parent", vec![var("X"), var("Y")]),
        )
        .unwrap();
    engine
        .add_rule(
            compound("ancestor", vec![var("X"), var("Y")]),
            and(vec![
                compound("parent", vec![var("X"), var("Z")]),
                compound("ancestor", vec![var("Z"), var("Y")]),
            ]),
        )
        .unwrap();

    let descendants: Vec<String> = engine
        .query(compound("ancestor", vec![atom("abraham"), var("D")]))
        .unwrap()
        .all()
        .iter()
        .map(|s| s.get("D").unwrap().to_string())
        .collect();
    assert_eq!(descendants, vec!["isaac", "jacob", "joseph", "benjamin"]);

    // siblings share a parent and differ
    let goal = and(vec![
        compound("parent", vec![var("P"), var("A")]),
        compound("parent", vec![var("P"), var("B")]),
        compound("\\==", vec![var("A"), var("B")]),
    ]);
    let siblings: Vec<String> = engine
        .query(goal)
        .unwrap()
        .all()
        .iter()
        .map(|s| format!("{}-{}", s.get("A").unwrap(), s.get("B").unwrap()))
        .collect();
    assert_eq!(siblings, vec!["joseph-benjamin", "benjamin-joseph"]);

    let goal = compound("\\+", vec![compound("ancestor", vec![atom("joseph"), var("_")])]);
    assert!(engine.query(goal).unwrap().exists());
}

#[test]
fn test_if_then_else_picks_one_branch() {
    let engine = abc_engine();
    // ( a(X) -> Y = yes ; Y = no )
    let goal = or(
        compound(
            "->",
            vec![
                compound("a", vec![var("X")]),
                compound("=", vec![var("Y"), atom("yes")]),
            ],
        ),
        compound("=", vec![var("Y"), atom("no")]),
    );
    let solutions = engine.query(goal).unwrap().all();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].get("X"), Some(&int(1)));
    assert_eq!(solutions[0].get("Y"), Some(&atom("yes")));
}
