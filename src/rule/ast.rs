//! AST types for parsed rules

use std::fmt;
use std::sync::Arc;

/// A binary rule operator, in descending binding strength after unary `!`:
/// `&&`, `||`, `^^`, then the implication family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleOp {
    /// Conjunction `&&`
    And,
    /// Disjunction `||`
    Or,
    /// Exclusive or `^^`
    Xor,
    /// Implication `=>`
    Implies,
    /// Reverse implication `<=`
    ImpliedBy,
    /// Equivalence `=` (also written `<=>`)
    Equiv,
}

impl RuleOp {
    /// The operator as it appears in rule strings.
    pub fn symbol(&self) -> &'static str {
        match self {
            RuleOp::And => "&&",
            RuleOp::Or => "||",
            RuleOp::Xor => "^^",
            RuleOp::Implies => "=>",
            RuleOp::ImpliedBy => "<=",
            RuleOp::Equiv => "=",
        }
    }
}

impl fmt::Display for RuleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed rule: either a (possibly negated) variable reference or a binary
/// operation over two sub-rules.
///
/// Negation exists only on variables; the parser rejects `!(…)` outright, so
/// no `Not` node is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAst {
    /// A variable reference with its negation flag
    Var {
        /// Whether the reference is negated (`!name`)
        negated: bool,
        /// The variable name
        name: Arc<str>,
    },
    /// A binary operation over two sub-rules
    Op {
        /// The operator
        op: RuleOp,
        /// Left operand
        left: Box<RuleAst>,
        /// Right operand
        right: Box<RuleAst>,
    },
}

impl RuleAst {
    /// Build a variable node.
    pub fn var(negated: bool, name: impl Into<Arc<str>>) -> Self {
        RuleAst::Var {
            negated,
            name: name.into(),
        }
    }

    /// Build an operation node.
    pub fn op(op: RuleOp, left: RuleAst, right: RuleAst) -> Self {
        RuleAst::Op {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The `(negated, name)` pair when this node is a variable.
    pub fn as_var(&self) -> Option<(bool, &str)> {
        match self {
            RuleAst::Var { negated, name } => Some((*negated, name)),
            RuleAst::Op { .. } => None,
        }
    }

    /// Whether this node is a variable reference.
    pub fn is_var(&self) -> bool {
        matches!(self, RuleAst::Var { .. })
    }
}

impl fmt::Display for RuleAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAst::Var { negated, name } => {
                if *negated {
                    write!(f, "!{}", name)
                } else {
                    f.write_str(name)
                }
            }
            RuleAst::Op { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
