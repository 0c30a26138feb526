use std::sync::atomic::{AtomicUsize, Ordering};

use crate::token::Token;

/// Identity of one syntactic occurrence.  The resolver keys its distance
/// table by this id, never by variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(usize);

static NEXT_EXPR_ID: AtomicUsize = AtomicUsize::new(0);

impl ExprId {
    /// Allocate an id no other node in this process carries, so tables
    /// produced for separate parses (interactive lines) can be merged.
    pub fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A literal constant copied out of its token at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    True,
    False,
    Nil,
}

#[derive(Debug, Clone)]
pub enum Expr {
    /// `offset` is the literal token's, or the `for` keyword's for an
    /// omitted loop condition.
    Literal { value: LiteralValue, offset: usize },

    // Parenthesised sub-expression
    Grouping(Box<Expr>),

    Unary {
        operator: Token,
        right: Box<Expr>,
    },

    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    // `and` / `or`, short-circuiting
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    // cond ? then : else
    Ternary {
        condition: Box<Expr>,
        question: Token,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    Variable {
        id: ExprId,
        name: Token,
    },

    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        // closing ')' kept for error positions
        paren: Token,
        arguments: Vec<Expr>,
    },

    Get {
        object: Box<Expr>,
        name: Token,
    },

    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    This {
        id: ExprId,
        keyword: Token,
    },

    Super {
        id: ExprId,
        keyword: Token,
        method: Token,
    },
}

impl Expr {
    /// Source offset used when a diagnostic has to point at this expression.
    pub fn offset(&self) -> usize {
        match self {
            Expr::Literal { offset, .. } => *offset,

            Expr::Grouping(expr) => expr.offset(),

            Expr::Unary { operator, .. } => operator.offset,

            Expr::Binary { operator, .. } | Expr::Logical { operator, .. } => operator.offset,

            Expr::Ternary { question, .. } => question.offset,

            Expr::Variable { name, .. } | Expr::Assign { name, .. } => name.offset,

            Expr::Call { paren, .. } => paren.offset,

            Expr::Get { name, .. } | Expr::Set { name, .. } => name.offset,

            Expr::This { keyword, .. } | Expr::Super { keyword, .. } => keyword.offset,
        }
    }
}
