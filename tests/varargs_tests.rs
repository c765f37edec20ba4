//! Tests for `&` rest parameters on functions

use jlisp::{run, Error};

fn eval(source: &str) -> String {
    run(source).unwrap_or_else(|e| panic!("{} failed: {}", source, e))
}

#[test]
fn test_rest_count() {
    assert_eq!(eval("(defn slice (a b & rest) (len rest)) (slice 0 1 2 3)"), "2");
    assert_eq!(eval("(defn slice (a b & rest) (len rest)) (slice 0 1 2 3 4 5)"), "4");
}

#[test]
fn test_rest_values_are_evaluated() {
    assert_eq!(
        eval("(defn tail (a & rest) rest) (tail 1 (+ 1 1) (* 3 1))"),
        "(2 3)"
    );
}

#[test]
fn test_empty_rest() {
    assert_eq!(eval("(defn tail (a & rest) rest) (tail 1)"), "()");
    assert_eq!(eval("(defn count (& all) (len all)) (count)"), "0");
}

#[test]
fn test_rest_with_reduce() {
    let source = r#"
(defn sum (& xs) (reduce + 0 xs))
(sum 1 2 3 4 5)
"#;
    assert_eq!(eval(source), "15");
}

#[test]
fn test_missing_required_argument() {
    let err = run("(defn pair (a b & rest) a) (pair 1)").unwrap_err();
    assert!(matches!(err, Error::InvalidArguments { .. }), "{:?}", err);
    assert!(err
        .to_string()
        .contains("Insufficient number of arguments to the function: 1 received, at least 2 expected"));
}

#[test]
fn test_misplaced_ampersand() {
    let err = run("(defn bad (& a b) a)").unwrap_err();
    assert!(matches!(err, Error::Expansion(_)), "{:?}", err);
}
