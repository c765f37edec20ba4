//! End-to-end tests for jlisp programs
//!
//! Each test runs a whole program through `jlisp::run` (prelude loaded) or
//! `jlisp::run_without_includes` and checks the printed form of the last
//! top-level form. Coverage:
//! - the regression scenarios (arithmetic, lambdas, recursion, loops, macros, try, rest args)
//! - list and string primitives
//! - rebinding builtins and prelude functions
//! - lexical scoping and shared mutable closure state
//! - reader round-trips and fatal read errors

use jlisp::{parse, run, run_without_includes, Error};

fn eval(source: &str) -> String {
    run(source).unwrap_or_else(|e| panic!("{} failed: {}", source, e))
}

fn assert_eval(source: &str, expected: &str) {
    assert_eq!(eval(source), expected, "program: {}", source);
}

fn eval_bare(source: &str) -> String {
    run_without_includes(source).unwrap_or_else(|e| panic!("{} failed: {}", source, e))
}

// ============================================================================
// Regression scenarios
// ============================================================================

#[test]
fn test_nested_arithmetic() {
    assert_eval("(+ 1 1 (+ 1 1))", "4");
}

#[test]
fn test_lambda_binding() {
    assert_eval("(define sum (lambda (a b) (+ a b))) (sum 2 3)", "5");
}

#[test]
fn test_recursive_factorial() {
    assert_eval(
        "(defn factorial (n) (if (= 1 n) 1 (* n (factorial (- n 1))))) (factorial 5)",
        "120",
    );
}

#[test]
fn test_while_countdown() {
    assert_eval(
        "(define a 10) (while (> a 0) (begin (set! a (- a 1)))) (+ a 0)",
        "0",
    );
}

#[test]
fn test_unless_macro() {
    assert_eval(
        "(defmacro unless (test arg1 arg2) `(if (not ,test) ,arg1 ,arg2)) (unless (= 1 0) 5 0)",
        "5",
    );
}

#[test]
fn test_try_unbound_symbol() {
    assert_eval("(try (+ 1 ff) 20)", "20");
}

#[test]
fn test_rest_arguments() {
    assert_eval("(defn slice (a b & rest) (len rest)) (slice 0 1 2 3)", "2");
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn test_only_last_form_is_printed() {
    assert_eval("1 2 3", "3");
    assert_eval("", "");
    assert_eval("(defmacro nothing () (quote 1))", "");
}

#[test]
fn test_printed_forms() {
    assert_eval("(list 1 \"a\" true)", "(1 \"a\" true)");
    assert_eval("(/ 1 4)", "0.25");
    assert_eval("car", "#<Function 'car'>");
}

#[test]
fn test_list_primitives() {
    assert_eval("(cons 4 (list 5))", "(4 5)");
    assert_eval("(car (cdr (list 1 2 3)))", "2");
    assert_eval("(car (list))", "nil");
    assert_eval("(map (lambda (x) (* x x)) (list 1 2 3))", "(1 4 9)");
    assert_eval("(reduce + (list 1 2 3 4))", "10");
    assert_eval("(reduce + 7 (list))", "7");
}

#[test]
fn test_data_list_is_not_callable() {
    let err = run_without_includes("(car (2 3 4 5))").unwrap_err();
    assert!(err.to_string().contains("Item is not a function"), "{}", err);
}

#[test]
fn test_string_primitives() {
    assert_eval("(car (cdr (str->list \"Hello\")))", "\"e\"");
    assert_eval("(concat \"A\" \"B\")", "\"AB\"");
    assert_eval("(len \"héllo\")", "5");
    assert_eval("(empty? \"\")", "true");
    assert_eval("(empty? (list 1))", "false");
}

#[test]
fn test_strlen() {
    assert_eval("(strlen \"Hello\")", "5");
    assert_eval("(strlen \"\")", "0");
    let err = run("(strlen 3)").unwrap_err();
    assert!(err.to_string().contains("takes 1 string argument"), "{}", err);
}

#[test]
fn test_operator_table() {
    for (source, expected) in [
        ("(!= 1 0)", "true"),
        ("(!= 1 1)", "false"),
        ("(<= 2 2)", "true"),
        ("(>= 1 2)", "false"),
        ("(> 3 2)", "true"),
        ("(and true false)", "false"),
        ("(or false true)", "true"),
        ("(not false)", "true"),
        ("(/ 2 2)", "1"),
        ("(* 2 2 2)", "8"),
        ("(- 10 3)", "7"),
        ("(= \"a\" \"a\")", "true"),
    ] {
        assert_eval(source, expected);
    }
}

#[test]
fn test_prelude_is_optional() {
    assert_eq!(eval_bare("(+ 1 2)"), "3");
    let err = run_without_includes("(not true)").unwrap_err();
    assert!(matches!(err, Error::SymbolNotFound { ref name, .. } if name == "not"));
}

// ============================================================================
// Bindings and scope
// ============================================================================

#[test]
fn test_builtins_can_be_rebound() {
    assert_eval("(define + -) (+ 2 1)", "1");
    assert_eval("(defn print () 1) (print)", "1");
}

#[test]
fn test_fibonacci() {
    assert_eval(
        "(defn fib (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2))))) (fib 9)",
        "34",
    );
}

#[test]
fn test_lexical_scope() {
    assert_eval(
        "(define x 1)
         (defn get-x () x)
         (defn shadow (x) (get-x))
         (shadow 99)",
        "1",
    );
}

#[test]
fn test_closures_share_mutable_scope() {
    assert_eval(
        "(defn make-counter ()
             (begin
                 (define n 0)
                 (lambda () (begin (set! n (+ n 1)) n))))
         (define c (make-counter))
         (c)
         (c)
         (c)",
        "3",
    );
}

#[test]
fn test_set_updates_owning_scope() {
    assert_eval(
        "(define total 0)
         (defn add! (n) (set! total (+ total n)))
         (add! 5)
         (add! 6)
         total",
        "11",
    );
}

#[test]
fn test_if_only_runs_chosen_branch() {
    assert_eval("(if true 1 (undefined-thing))", "1");
    assert_eval("(if false 1)", "nil");
}

#[test]
fn test_break_leaves_loop() {
    assert_eval(
        "(define i 0)
         (while true (set! i (+ i 1)) (if (= i 4) (break)))
         i",
        "4",
    );
}

#[test]
fn test_eval_read_string() {
    assert_eval("(eval (read-string \"(+ 1 2)\"))", "3");
    assert_eval("(eval (read-string (concat \"(* 2\" \" 5)\")))", "10");
}

#[test]
fn test_doc_strings() {
    assert_eval(
        "(define sq (lambda \"sq\" \"Squares a number\" (x) (* x x))) (doc sq)",
        "\"Squares a number\"",
    );
    assert_eval("(defn named (x) x) named", "#<Function 'named'>");
}

#[test]
fn test_native_escape_hatch() {
    assert_eval("(define a 2) (native \"a * 21\" a)", "42");
}

// ============================================================================
// Reader
// ============================================================================

#[test]
fn test_reader_round_trip() {
    for program in [
        "(= 1 1)",
        "(map + (list 1 2 3))",
        "(if (cond) true false)",
        "(begin (define myvalue 15) (+ (if (= 15 myvalue) 10 (+ 8 8)) 0))",
        "(begin (define factorial (lambda (n) (if (= 1 n) 1 (* n (factorial (- n 1)))))) (factorial 5))",
    ] {
        let terms = parse(program).unwrap();
        assert_eq!(terms[0].to_string(), program);
    }
}

#[test]
fn test_unterminated_string_aborts() {
    let err = run("(print \"hello)").unwrap_err();
    assert!(matches!(err, Error::Read { .. }), "{:?}", err);
}

#[test]
fn test_expansion_errors_abort() {
    let err = run("(try (if) 1)").unwrap_err();
    assert!(matches!(err, Error::Expansion(_)), "{:?}", err);
}

#[test]
fn test_large_and_small_numbers_print_in_exponent_form() {
    assert_eval("(* 100000000000 100000000000 10)", "1e+23");
    assert_eval("(/ 1 10000000)", "1e-7");
    assert_eval("(* 1000000 1000000)", "1000000000000");
}
