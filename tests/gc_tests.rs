// ABOUTME: Collector and tail-call properties exercised through the
// public engine surface

use bamboo::{Interp, Value};

#[test]
fn test_tail_recursion_depth_one_million() {
    let mut interp = Interp::new();
    interp
        .eval_source("(define (loop n) (if (= n 0) 'done (loop (- n 1))))")
        .unwrap();
    let done = interp.eval_source("(loop 1000000)").unwrap();
    assert_eq!(interp.print_expr(done), "DONE");
}

#[test]
fn test_collections_reclaim_garbage() {
    let mut interp = Interp::new();
    interp
        .eval_source("(define (churn n) (if (= n 0) 'ok (churn (- n 1))))")
        .unwrap();
    interp.eval_source("(churn 200000)").unwrap();
    // Without sweeping, the loop above leaves millions of dead cells;
    // the live set stays bounded by one collection interval.
    assert!(
        interp.live_pairs() < 500_000,
        "live pairs after churn: {}",
        interp.live_pairs()
    );
}

#[test]
fn test_aggressive_collection_preserves_reachable_structure() {
    let mut interp = Interp::new();
    // Collect on every evaluator step.
    interp.set_gc_threshold(1);
    interp
        .eval_source("(define xs '(1 2 3)) (define (snd l) (car (cdr l)))")
        .unwrap();
    assert_eq!(interp.eval_source("(snd xs)"), Ok(Value::Integer(2)));
    assert_eq!(
        interp.eval_source("(car (cons 10 xs))"),
        Ok(Value::Integer(10))
    );
}

#[test]
fn test_aggressive_collection_through_closures_and_macros() {
    let mut interp = Interp::new();
    interp.set_gc_threshold(1);
    let src = "
        (define (list . xs) xs)
        (define (compose f g) (lambda (x) (f (g x))))
        (define inc (lambda (n) (+ n 1)))
        (define inc2 (compose inc inc))
        (defmacro (twice x) (list '+ x x))
        (+ (inc2 40) (twice 0))";
    assert_eq!(interp.eval_source(src), Ok(Value::Integer(42)));
}

#[test]
fn test_strings_survive_collection_when_reachable() {
    let mut interp = Interp::new();
    interp.set_gc_threshold(1);
    interp.eval_source("(define s \"keep me\")").unwrap();
    // Burn through enough steps to force many collections.
    interp
        .eval_source("(define (spin n) (if (= n 0) 'ok (spin (- n 1)))) (spin 50)")
        .unwrap();
    let s = interp.eval_source("s").unwrap();
    assert_eq!(interp.string_text(s), Some("keep me"));
}

#[test]
fn test_collection_during_cons_heavy_recursion() {
    let mut interp = Interp::new();
    interp.set_gc_threshold(100);
    // The accumulator list is only reachable through evaluator frames
    // while it grows; collections along the way must not eat it.
    let src = "
        (define (grow n acc) (if (= n 0) acc (grow (- n 1) (cons n acc))))
        (grow 1000 nil)";
    let list = interp.eval_source(src).unwrap();
    assert_eq!(interp.list_len(list), 1000);
    assert_eq!(interp.eval_source("(car (grow 5 nil))"), Ok(Value::Integer(1)));
}

#[test]
fn test_destroy_sweeps_unconditionally() {
    let mut interp = Interp::new();
    interp.eval_source("(define xs '(1 2 3))").unwrap();
    assert!(interp.live_pairs() > 0);
    interp.destroy();
    assert_eq!(interp.live_pairs(), 0);
    assert_eq!(interp.live_strings(), 0);
}
