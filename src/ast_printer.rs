use crate::expr::{Expr, LiteralValue};
use crate::stmt::{FunctionDecl, Stmt};

/// Renders the tree as parenthesised prefix text, e.g. `(+ 1.0 (group 2.0))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_program(&self, statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(|stmt| self.print_stmt(stmt))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", self.print(expr)),

            Stmt::Print(expr) => format!("(print {})", self.print(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(expr) => format!("(var {} {})", name.lexeme, self.print(expr)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => self.parenthesize_stmts("block", statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch)
                ),
            },

            Stmt::While { condition, body } => {
                format!("(while {} {})", self.print(condition), self.print_stmt(body))
            }

            Stmt::Function(decl) => self.print_function("fun", decl),

            Stmt::Return { value, .. } => match value {
                Some(expr) => format!("(return {})", self.print(expr)),
                None => "(return)".to_string(),
            },

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let mut out = format!("(class {}", name.lexeme);

                if let Some(superclass) = superclass {
                    out.push_str(&format!(" < {}", self.print(superclass)));
                }

                for method in methods {
                    out.push(' ');
                    out.push_str(&self.print_function("method", method));
                }

                out.push(')');
                out
            }
        }
    }

    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal { value, .. } => match value {
                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }
                LiteralValue::Str(s) => s.to_string(),
                LiteralValue::True => "true".to_string(),
                LiteralValue::False => "false".to_string(),
                LiteralValue::Nil => "nil".to_string(),
            },

            Expr::Grouping(inner) => self.parenthesize("group", &[&**inner]),

            Expr::Unary { operator, right } => self.parenthesize(&operator.lexeme, &[&**right]),

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => self.parenthesize(&operator.lexeme, &[&**left, &**right]),

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.parenthesize("?:", &[&**condition, &**then_branch, &**else_branch]),

            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                self.parenthesize(&format!("= {}", name.lexeme), &[&**value])
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut parts: Vec<&Expr> = vec![&**callee];
                parts.extend(arguments.iter());
                self.parenthesize("call", &parts)
            }

            Expr::Get { object, name } => self.parenthesize(&format!(". {}", name.lexeme), &[&**object]),

            Expr::Set {
                object,
                name,
                value,
            } => self.parenthesize(&format!(".= {}", name.lexeme), &[&**object, &**value]),

            Expr::This { .. } => "this".to_string(),

            Expr::Super { method, .. } => format!("(super {})", method.lexeme),
        }
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);

        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print(expr));
        }

        out.push(')');
        out
    }

    fn parenthesize_stmts(&self, name: &str, statements: &[Stmt]) -> String {
        let mut out = format!("({}", name);

        for stmt in statements {
            out.push(' ');
            out.push_str(&self.print_stmt(stmt));
        }

        out.push(')');
        out
    }

    fn print_function(&self, keyword: &str, decl: &FunctionDecl) -> String {
        let params: Vec<&str> = decl.params.iter().map(|p| p.lexeme.as_str()).collect();

        let mut out = format!("({} {} ({})", keyword, decl.name.lexeme, params.join(" "));

        for stmt in &decl.body {
            out.push(' ');
            out.push_str(&self.print_stmt(stmt));
        }

        out.push(')');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_expression};
    use crate::scanner::scan;

    fn print_expr(source: &str) -> String {
        let (tokens, _) = scan(source);
        let expr = parse_expression(&tokens).expect("single expression");
        AstPrinter.print(&expr)
    }

    #[test]
    fn precedence_shows_in_nesting() {
        assert_eq!(print_expr("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(print_expr("-(4 - 1.5)"), "(- (group (- 4.0 1.5)))");
        assert_eq!(print_expr("a or b and c"), "(or a (and b c))");
    }

    #[test]
    fn ternary_is_right_associative() {
        assert_eq!(print_expr("a ? b : c ? d : e"), "(?: a b (?: c d e))");
    }

    #[test]
    fn call_and_property_chains() {
        assert_eq!(print_expr("a.b(c).d"), "(. d (call (. b a) c))");
        assert_eq!(print_expr("a.b = 1"), "(.= b a 1.0)");
    }

    #[test]
    fn statements_render() {
        let (tokens, _) = scan("class B < A { init(x) { this.x = x; } } var y; print y;");
        let (statements, diagnostics) = parse(&tokens);
        assert!(diagnostics.is_empty());

        assert_eq!(
            AstPrinter.print_program(&statements),
            "(class B < A (method init (x) (; (.= x this x))))\n(var y)\n(print y)"
        );
    }
}
