#[cfg(test)]
mod interpreter_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rox as lox;

    use lox::error::{Diagnostics, LoxError};
    use lox::interpreter::Interpreter;

    /// Interpreter whose `print` output lands in a shared buffer.
    fn capturing_interpreter() -> (Interpreter, Rc<RefCell<Vec<u8>>>) {
        let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let interpreter = Interpreter::with_output(Rc::clone(&buffer) as Rc<RefCell<dyn std::io::Write>>);

        (interpreter, buffer)
    }

    fn output_of(buffer: &Rc<RefCell<Vec<u8>>>) -> String {
        String::from_utf8(buffer.borrow().clone()).expect("utf-8 output")
    }

    fn run(source: &str) -> (String, Result<(), Diagnostics>) {
        let (mut interpreter, buffer) = capturing_interpreter();
        let result = lox::run(&mut interpreter, source);

        (output_of(&buffer), result)
    }

    fn run_ok(source: &str) -> String {
        let (output, result) = run(source);

        if let Err(diagnostics) = result {
            panic!("unexpected diagnostics: {:?}", diagnostics.into_vec());
        }

        output
    }

    /// Output so far plus the one runtime error that stopped the program.
    fn run_err(source: &str) -> (String, LoxError) {
        let (output, result) = run(source);

        let mut errors = result.expect_err("program should fail").into_vec();
        assert_eq!(errors.len(), 1, "{:?}", errors);

        let error = errors.remove(0);
        assert!(error.is_runtime(), "expected runtime error, got {}", error);

        (output, error)
    }

    // ───────────────────────────── expressions ─────────────────────────────

    #[test]
    fn test_arithmetic_and_precedence() {
        assert_eq!(
            run_ok("print 1 + 2 * 3; print (1 + 2) * 3; print 10 / 4; print -3 - -1;"),
            "7\n9\n2.5\n-2\n"
        );
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        assert_eq!(run_ok("print 1 / 0; print -1 / 0;"), "inf\n-inf\n");
    }

    #[test]
    fn test_plus_concatenates_when_either_side_is_a_string() {
        assert_eq!(
            run_ok(r#"print "a" + 1; print 1 + "a"; print "x" + nil; print "n" + 2.5; print "b" + true;"#),
            "a1\n1a\nxnil\nn2.5\nbtrue\n"
        );
    }

    #[test]
    fn test_plus_rejects_other_mixes() {
        let (output, error) = run_err("print 0; print 1 + true;");

        assert_eq!(output, "0\n");
        assert_eq!(
            error.message(),
            "Operands of '+' must be two numbers or include a string."
        );
        assert_eq!(error.offset(), Some(17));
    }

    #[test]
    fn test_numeric_operators_require_numbers() {
        let (_, error) = run_err(r#"print "a" < 1;"#);
        assert_eq!(error.message(), "Operands of '<' must be numbers.");

        let (_, error) = run_err(r#"print -"x";"#);
        assert_eq!(error.message(), "Operand of '-' must be a number.");
    }

    #[test]
    fn test_equality_and_truthiness() {
        assert_eq!(
            run_ok(r#"print nil == nil; print 1 == "1"; print "a" == "a"; print !nil; print !0; print !"";"#),
            "true\nfalse\ntrue\ntrue\nfalse\nfalse\n"
        );
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        assert_eq!(
            run_ok(r#"print nil or "x"; print 1 and 2; print false and missing; print true or missing;"#),
            "x\n2\nfalse\ntrue\n"
        );
    }

    #[test]
    fn test_ternary_evaluates_one_branch() {
        assert_eq!(
            run_ok("print true ? 1 : missing; print nil ? missing : 2; print false ? 1 : nil ? 2 : 3;"),
            "1\n2\n3\n"
        );
    }

    #[test]
    fn test_chained_ternary_is_right_associative() {
        // grouped to the left this would print 2
        assert_eq!(run_ok("print true ? 1 : true ? 2 : 3;"), "1\n");
    }

    // ────────────────────────── variables & scope ──────────────────────────

    #[test]
    fn test_block_shadowing() {
        assert_eq!(
            run_ok("var a = 1; { var a = 2; print a; } print a;"),
            "2\n1\n"
        );
    }

    #[test]
    fn test_closures_bind_statically() {
        let source = r#"
            var a = "global";
            {
                fun show() { print a; }
                show();
                var a = "block";
                show();
            }
        "#;

        assert_eq!(run_ok(source), "global\nglobal\n");
    }

    #[test]
    fn test_undefined_variable() {
        let (_, error) = run_err("print nope;");
        assert_eq!(error.message(), "Undefined variable 'nope'.");
        assert_eq!(error.offset(), Some(6));

        let (_, error) = run_err("nope = 1;");
        assert_eq!(error.message(), "Undefined variable 'nope'.");
    }

    #[test]
    fn test_globals_may_be_used_before_their_declaration_runs() {
        assert_eq!(run_ok("fun f() { return g; } var g = 3; print f();"), "3\n");
    }

    #[test]
    fn test_loops() {
        assert_eq!(
            run_ok("for (var i = 0; i < 3; i = i + 1) print i; var n = 0; while (n < 2) n = n + 1; print n;"),
            "0\n1\n2\n2\n"
        );
    }

    // ───────────────────────────── functions ───────────────────────────────

    #[test]
    fn test_closure_counter_keeps_state() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    return i;
                }
                return count;
            }

            var counter = makeCounter();
            counter();
            print counter();
        "#;

        assert_eq!(run_ok(source), "2\n");
    }

    #[test]
    fn test_recursion() {
        let source = r#"
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(10);
        "#;

        assert_eq!(run_ok(source), "55\n");
    }

    #[test]
    fn test_function_without_return_yields_nil() {
        assert_eq!(run_ok("fun f() {} print f(); print f; print clock;"), "nil\n<fn f>\n<native fn>\n");
    }

    #[test]
    fn test_clock_returns_a_number() {
        assert_eq!(run_ok("print clock() > 0;"), "true\n");
    }

    #[test]
    fn test_arity_mismatch_names_both_counts() {
        let (_, error) = run_err("fun f(a, b) {} f(1);");
        assert_eq!(error.message(), "Expected 2 arguments but got 1.");

        let (_, error) = run_err("class P { init(a) {} } P();");
        assert_eq!(error.message(), "Expected 1 arguments but got 0.");

        let (_, error) = run_err("class Q {} Q(1);");
        assert_eq!(error.message(), "Expected 0 arguments but got 1.");
    }

    #[test]
    fn test_calling_a_non_callable() {
        let (_, error) = run_err(r#""str"();"#);

        assert_eq!(
            error.message(),
            "Value of type string is not callable; can only call functions and classes."
        );
    }

    // ────────────────────────────── classes ────────────────────────────────

    #[test]
    fn test_constructor_fields_and_methods() {
        let source = r#"
            class Point {
                init(x) { this.x = x; }
                get() { return this.x; }
            }

            var p = Point(5);
            print p.get();
            print p;
            print Point;
            print p.init(7).x;
        "#;

        assert_eq!(run_ok(source), "5\nPoint instance\nPoint\n7\n");
    }

    #[test]
    fn test_fields_shadow_methods_and_bound_methods_keep_this() {
        let source = r#"
            class A {
                init() { this.n = "a"; }
                m() { return this.n; }
            }

            var a = A();
            var m = a.m;
            print m();

            a.m = 2;
            print a.m;
        "#;

        assert_eq!(run_ok(source), "a\n2\n");
    }

    #[test]
    fn test_inheritance_and_super_dispatch() {
        let source = r#"
            class A {
                hi() { return "A"; }
                who() { return "A.who"; }
            }

            class B < A {
                hi() { return "B+" + super.hi(); }
            }

            class C < B {}

            print C().hi();
            print C().who();
        "#;

        assert_eq!(run_ok(source), "B+A\nA.who\n");
    }

    #[test]
    fn test_inherited_initializer() {
        let source = r#"
            class A { init(v) { this.v = v; } }
            class B < A {}
            print B(4).v;
        "#;

        assert_eq!(run_ok(source), "4\n");
    }

    #[test]
    fn test_superclass_must_be_a_class() {
        let (_, error) = run_err("var NotClass = 1; class B < NotClass {}");

        assert_eq!(error.message(), "Superclass must be a class.");
    }

    #[test]
    fn test_property_errors() {
        let (output, error) = run_err("class A {} var a = A(); a.f = 1; print a.f; print a.g;");
        assert_eq!(output, "1\n");
        assert_eq!(error.message(), "Undefined property 'g'.");

        let (_, error) = run_err("print 1.x;");
        assert_eq!(error.message(), "Only instances have properties.");

        let (_, error) = run_err(r#"var s = "s"; s.x = 1;"#);
        assert_eq!(error.message(), "Only instances have fields.");
    }

    // ─────────────────────────── pipeline rules ────────────────────────────

    #[test]
    fn test_runtime_error_stops_execution_but_keeps_output() {
        let (output, error) = run_err(r#"print 1; print -"x"; print 2;"#);

        assert_eq!(output, "1\n");
        assert_eq!(error.offset(), Some(15));
    }

    #[test]
    fn test_static_errors_prevent_execution() {
        let (output, result) = run("print 1; return 2;");

        assert_eq!(output, "");
        let errors = result.expect_err("resolver should reject").into_vec();
        assert_eq!(errors.len(), 1);
        assert!(!errors[0].is_runtime());

        let (output, result) = run("print 1; print (;");
        assert_eq!(output, "");
        assert!(result.is_err());
    }

    #[test]
    fn test_runs_are_deterministic() {
        let source = r#"
            class Node { init(v, next) { this.v = v; this.next = next; } }
            var list = Node(1, Node(2, Node(3, nil)));
            var sum = 0;
            while (list != nil) { sum = sum + list.v; list = list.next; }
            print sum;
        "#;

        let first = run_ok(source);
        let second = run_ok(source);

        assert_eq!(first, "6\n");
        assert_eq!(first, second);
    }

    // ───────────────────────────── interactive ─────────────────────────────

    #[test]
    fn test_run_line_prints_lone_expressions() {
        let (mut interpreter, buffer) = capturing_interpreter();

        lox::run_line(&mut interpreter, "var a = 1;").expect("declaration");
        lox::run_line(&mut interpreter, "a + 2").expect("expression");
        lox::run_line(&mut interpreter, "print a;").expect("statement");

        assert_eq!(output_of(&buffer), "3\n1\n");
    }

    #[test]
    fn test_run_line_keeps_closures_across_lines() {
        let (mut interpreter, buffer) = capturing_interpreter();

        lox::run_line(
            &mut interpreter,
            "fun mk() { var x = 10; fun g() { return x; } return g; }",
        )
        .expect("definition");
        lox::run_line(&mut interpreter, "var g = mk();").expect("call");
        lox::run_line(&mut interpreter, "g()").expect("closure call");

        assert_eq!(output_of(&buffer), "10\n");
    }

    #[test]
    fn test_frame_is_restored_when_an_error_escapes_a_block() {
        let (mut interpreter, buffer) = capturing_interpreter();

        assert!(lox::run_line(&mut interpreter, "{ var q = 1; q(); }").is_err());
        lox::run_line(&mut interpreter, "var y = 2;").expect("declaration");
        lox::run_line(&mut interpreter, "fun f() { return y; }").expect("definition");
        lox::run_line(&mut interpreter, "f()").expect("global read");

        assert_eq!(output_of(&buffer), "2\n");

        let error = lox::run_line(&mut interpreter, "print q;")
            .expect_err("block local must be gone")
            .into_vec()
            .remove(0);
        assert_eq!(error.message(), "Undefined variable 'q'.");
    }

    #[test]
    fn test_frame_is_restored_when_an_error_escapes_a_call() {
        let (mut interpreter, buffer) = capturing_interpreter();

        lox::run_line(&mut interpreter, "fun boom(n) { var inner = n; return -nil; }")
            .expect("definition");
        assert!(lox::run_line(&mut interpreter, "boom(1);").is_err());
        lox::run_line(&mut interpreter, "var after = 3;").expect("declaration");
        lox::run_line(&mut interpreter, "fun read() { return after; }").expect("definition");
        lox::run_line(&mut interpreter, "read()").expect("global read");

        assert_eq!(output_of(&buffer), "3\n");
    }

    #[test]
    fn test_state_survives_a_runtime_error() {
        let (mut interpreter, buffer) = capturing_interpreter();

        lox::run_line(&mut interpreter, "var z = 1;").expect("declaration");
        assert!(lox::run_line(&mut interpreter, "z = -nil;").is_err());
        lox::run_line(&mut interpreter, "print z;").expect("statement");

        assert_eq!(output_of(&buffer), "1\n");
    }
}
