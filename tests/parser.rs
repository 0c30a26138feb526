#[cfg(test)]
mod parser_tests {
    use rox as lox;

    use lox::ast_printer::AstPrinter;
    use lox::error::LoxError;
    use lox::stmt::Stmt;

    fn parse_source(source: &str) -> (Vec<Stmt>, Vec<LoxError>) {
        let (tokens, lexical) = lox::scan(source);
        assert!(lexical.is_empty(), "unexpected lexical errors in {:?}", source);

        let (statements, diagnostics) = lox::parse(&tokens);
        (statements, diagnostics.into_vec())
    }

    fn print_program(source: &str) -> String {
        let (statements, errors) = parse_source(source);
        assert!(errors.is_empty(), "unexpected syntax errors: {:?}", errors);

        AstPrinter.print_program(&statements)
    }

    #[test]
    fn test_recovery_reports_each_broken_statement_once() {
        let (statements, errors) = parse_source("var = 1; print 2; var x = ; print 3;");

        assert_eq!(errors.len(), 2, "errors: {:?}", errors);
        assert_eq!(errors[0].offset(), Some(4));
        assert_eq!(errors[0].message(), "at '=': Expect variable name.");
        assert_eq!(errors[1].message(), "at ';': Expect expression.");

        assert_eq!(
            AstPrinter.print_program(&statements),
            "(print 2.0)\n(print 3.0)"
        );
    }

    #[test]
    fn test_recovery_inside_block_keeps_the_block() {
        let (statements, errors) = parse_source("{ var = 1; print 2; } print 3;");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            AstPrinter.print_program(&statements),
            "(block (print 2.0))\n(print 3.0)"
        );
    }

    #[test]
    fn test_error_at_end_uses_source_length() {
        let (_, errors) = parse_source("print 1");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset(), Some(7));
        assert_eq!(errors[0].message(), "at end: Expect ';' after value.");
    }

    #[test]
    fn test_invalid_assignment_target_does_not_desync() {
        let (statements, errors) = parse_source("1 = 2; a + b = c; print 4;");

        let messages: Vec<String> = errors.iter().map(LoxError::message).collect();
        assert_eq!(
            messages,
            vec!["Invalid assignment target.", "Invalid assignment target."]
        );
        assert_eq!(errors[0].offset(), Some(2));

        // All three statements survive; the bad targets keep their lhs.
        assert_eq!(statements.len(), 3);
    }

    #[test]
    fn test_argument_count_ceiling() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let (statements, errors) = parse_source(&source);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Can't have more than 255 arguments.");
        assert_eq!(statements.len(), 1);

        let args: Vec<String> = (0..255).map(|i| i.to_string()).collect();
        let (_, errors) = parse_source(&format!("f({});", args.join(", ")));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_parameter_count_ceiling() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (_, errors) = parse_source(&source);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Can't have more than 255 parameters.");
    }

    #[test]
    fn test_for_loop_desugars_to_while() {
        assert_eq!(
            print_program("for (var i = 0; i < 3; i = i + 1) print i;"),
            "(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"
        );

        assert_eq!(print_program("for (;;) print 1;"), "(while true (print 1.0))");
    }

    #[test]
    fn test_if_else_binds_to_nearest_if() {
        assert_eq!(
            print_program("if (a) if (b) print 1; else print 2;"),
            "(if a (if b (print 1.0) (print 2.0)))"
        );
    }

    #[test]
    fn test_functions_and_returns() {
        assert_eq!(
            print_program("fun add(a, b) { return a + b; } fun noop() { return; }"),
            "(fun add (a b) (return (+ a b)))\n(fun noop () (return))"
        );
    }

    #[test]
    fn test_super_and_this_expressions() {
        assert_eq!(
            print_program("class B < A { m() { return super.m(this); } }"),
            "(class B < A (method m () (return (call (super m) this))))"
        );
    }

    #[test]
    fn test_super_requires_method_name() {
        let (_, errors) = parse_source("class B < A { m() { super; } }");

        assert!(!errors.is_empty());
        assert_eq!(errors[0].message(), "at ';': Expect '.' after 'super'.");
    }

    #[test]
    fn test_missing_ternary_colon() {
        let (_, errors) = parse_source("print a ? b;");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "at ';': Expect ':' in ternary expression.");
    }

    #[test]
    fn test_ternary_groups_to_the_right() {
        let (tokens, _) = lox::scan("a ? b : c ? d : e");
        let expr = lox::parse_expression(&tokens).expect("lone expression");

        assert_eq!(AstPrinter.print(&expr), "(?: a b (?: c d e))");
        assert_eq!(
            print_program("print a ? b ? c : d : e;"),
            "(print (?: a (?: b c d) e))"
        );
    }

    #[test]
    fn test_literals_carry_their_offsets() {
        let (tokens, _) = lox::scan("  42");
        let expr = lox::parse_expression(&tokens).expect("lone expression");
        assert_eq!(expr.offset(), 2);

        let (tokens, _) = lox::scan("x ? nil : \"s\"");
        let expr = lox::parse_expression(&tokens).expect("lone expression");
        match expr {
            lox::expr::Expr::Ternary {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.offset(), 4);
                assert_eq!(else_branch.offset(), 10);
            }
            other => panic!("expected ternary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_expression_accepts_only_a_lone_expression() {
        let expr_of = |source: &str| {
            let (tokens, _) = lox::scan(source);
            lox::parse_expression(&tokens)
        };

        let expr = expr_of("1 + 2 * 3").expect("lone expression");
        assert_eq!(AstPrinter.print(&expr), "(+ 1.0 (* 2.0 3.0))");

        assert!(expr_of("1 + 2;").is_none());
        assert!(expr_of("print 1;").is_none());
        assert!(expr_of("").is_none());
        assert!(expr_of("1 = 2").is_none());
        assert!(expr_of("(1").is_none());
    }
}
