#[cfg(test)]
mod resolver_tests {
    use rox as lox;

    use lox::resolver::Locals;

    fn resolve_source(source: &str) -> (Locals, Vec<String>) {
        let (tokens, lexical) = lox::scan(source);
        let (statements, syntax) = lox::parse(&tokens);
        assert!(lexical.is_empty() && syntax.is_empty(), "{:?}", syntax);

        let (locals, diagnostics) = lox::resolve(&statements);
        let messages = diagnostics.iter().map(|e| e.message()).collect();

        (locals, messages)
    }

    fn messages(source: &str) -> Vec<String> {
        resolve_source(source).1
    }

    #[test]
    fn test_clean_program_has_no_diagnostics() {
        let (locals, errors) = resolve_source(
            "var g = 1;
             fun f(x) { var y = x; return y + g; }
             class A { init() { this.v = 1; } get() { return this.v; } }
             class B < A { get() { return super.get(); } }",
        );

        assert!(errors.is_empty(), "{:?}", errors);
        // x, y, this (twice), super, this (via super) are local; g and A are global
        assert!(!locals.is_empty());
    }

    #[test]
    fn test_globals_are_left_unresolved() {
        let (locals, errors) = resolve_source("var a = 1; print a; a = 2;");

        assert!(errors.is_empty());
        assert!(locals.is_empty());
    }

    #[test]
    fn test_closure_capture_is_recorded() {
        let (locals, errors) = resolve_source("{ var a = 1; fun f() { print a; } }");

        assert!(errors.is_empty());
        assert_eq!(locals.len(), 1);
    }

    #[test]
    fn test_self_initializer_is_rejected_at_every_level() {
        assert_eq!(
            messages("{ var a = a; }"),
            vec!["at 'a': Can't read local variable in its own initializer."]
        );
        assert_eq!(
            messages("var a = a;"),
            vec!["at 'a': Can't read local variable in its own initializer."]
        );

        // Shadowing an outer binding is fine once the initializer is done.
        assert!(messages("var a = 1; { var b = a; }").is_empty());
    }

    #[test]
    fn test_duplicate_local_declaration() {
        assert_eq!(
            messages("{ var a = 1; var a = 2; }"),
            vec!["at 'a': Already a variable with this name in this scope."]
        );
        assert_eq!(
            messages("fun f(a, a) {}"),
            vec!["at 'a': Already a variable with this name in this scope."]
        );

        // Globals may be redeclared.
        assert!(messages("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_return_outside_function() {
        assert_eq!(
            messages("return 1;"),
            vec!["at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn test_return_value_from_initializer() {
        assert_eq!(
            messages("class A { init() { return 1; } }"),
            vec!["at 'return': Can't return a value from an initializer."]
        );

        // A bare return is allowed.
        assert!(messages("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_this_outside_class() {
        assert_eq!(
            messages("print this;"),
            vec!["at 'this': Can't use 'this' outside of a class."]
        );
        assert_eq!(
            messages("fun f() { return this; }"),
            vec!["at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn test_super_misuse() {
        assert_eq!(
            messages("fun f() { super.m(); }"),
            vec!["at 'super': Can't use 'super' outside of a class."]
        );
        assert_eq!(
            messages("class A { m() { super.m(); } }"),
            vec!["at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_class_cannot_inherit_from_itself() {
        assert_eq!(
            messages("class A < A {}"),
            vec!["at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_all_errors_are_collected() {
        let errors = messages("return; print this; { var a = a; }");

        assert_eq!(errors.len(), 3, "{:?}", errors);
    }
}
