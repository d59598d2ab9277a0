//! Parsing support for rule strings

use std::collections::BTreeMap;
use std::sync::Arc;

use lalrpop_util::lexer::Token;
use lalrpop_util::{lalrpop_mod, ParseError};

use super::ast::RuleAst;
use super::error::RuleError;

// Lalrpop-generated parser module (generated into OUT_DIR at build time)
lalrpop_mod!(
    #[allow(clippy::all)]
    #[allow(dead_code)]
    #[allow(unused_imports)]
    grammar,
    "/rule/grammar.rs"
);

/// Parses rule strings into a [`RuleAst`], validating every identifier
/// against the engine's variable map.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use vector_logic::{RuleAst, RuleOp, RuleParser};
///
/// let map: BTreeMap<Arc<str>, i32> = [(Arc::from("x1"), 1), (Arc::from("x2"), 2)]
///     .into_iter()
///     .collect();
/// let parser = RuleParser::new(Arc::new(map));
///
/// let ast = parser.parse("x1 => !x2").unwrap();
/// assert_eq!(
///     ast,
///     RuleAst::op(RuleOp::Implies, RuleAst::var(false, "x1"), RuleAst::var(true, "x2"))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RuleParser {
    variable_map: Arc<BTreeMap<Arc<str>, i32>>,
}

impl RuleParser {
    /// Create a parser over the given variable map.
    pub fn new(variable_map: Arc<BTreeMap<Arc<str>, i32>>) -> Self {
        RuleParser { variable_map }
    }

    /// Parse a rule string into an AST.
    ///
    /// # Errors
    ///
    /// Fails on an empty string, any syntax error (mismatched brackets,
    /// invalid characters, trailing tokens, a negated parenthesized
    /// subexpression), and on identifiers missing from the variable map.
    pub fn parse(&self, rule: &str) -> Result<RuleAst, RuleError> {
        if rule.is_empty() {
            return Err(RuleError::EmptyRule);
        }
        let ast = grammar::ExprParser::new()
            .parse(rule)
            .map_err(|err| invalid_syntax(rule, err))?;
        self.check_variables(&ast)?;
        Ok(ast)
    }

    /// Reject identifiers that are not in the variable map.
    fn check_variables(&self, ast: &RuleAst) -> Result<(), RuleError> {
        match ast {
            RuleAst::Var { name, .. } => {
                if self.variable_map.contains_key(name.as_ref()) {
                    Ok(())
                } else {
                    Err(RuleError::UndefinedVariable {
                        name: Arc::clone(name),
                    })
                }
            }
            RuleAst::Op { left, right, .. } => {
                self.check_variables(left)?;
                self.check_variables(right)
            }
        }
    }
}

/// Map a lalrpop parse error into the crate's error type, keeping the token
/// position where the error model provides one.
fn invalid_syntax(input: &str, err: ParseError<usize, Token<'_>, &'static str>) -> RuleError {
    let (message, position) = match err {
        ParseError::InvalidToken { location } => ("invalid character".to_string(), Some(location)),
        ParseError::UnrecognizedEof { location, .. } => {
            ("unexpected end of rule".to_string(), Some(location))
        }
        ParseError::UnrecognizedToken {
            token: (start, token, _),
            ..
        } => (format!("unexpected token `{}`", token), Some(start)),
        ParseError::ExtraToken {
            token: (start, token, _),
        } => (format!("unexpected trailing token `{}`", token), Some(start)),
        ParseError::User { error } => (error.to_string(), None),
    };
    RuleError::InvalidSyntax {
        message: Arc::from(message.as_str()),
        input: Arc::from(input),
        position,
    }
}
