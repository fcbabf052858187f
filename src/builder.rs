use crate::error::Error;
use crate::node::Node;
use crate::numeric::Numeric;
use crate::operation::Operation;
use crate::token::{Category, Token};
use crate::variables::Variables;
use log::{debug, trace};
use std::sync::Arc;

/// Deepest tree a builder accepts unless configured otherwise. Compiling,
/// evaluating and dropping a tree recurse once per level.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Builds expression trees from postfix token sequences, resolving variables
/// against a registry.
pub struct Builder<'a, T> {
    variables: &'a Variables<T>,
    max_depth: usize,
}

impl<'a, T: Numeric> Builder<'a, T> {
    /// Create a builder resolving variables in `variables`
    pub fn new(variables: &'a Variables<T>) -> Self {
        Self {
            variables,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Reject trees with more than `max_depth` levels, a leaf being one
    /// level.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Construct the tree for a sequence of tokens in reverse polish
    /// notation, and return its root.
    ///
    /// Replaying the sequence must leave exactly one node: operators and
    /// functions consume as many nodes as their arity, the last one pushed
    /// being their rightmost operand.
    pub fn build(&self, tokens: &[Token]) -> Result<Node<T>, Error> {
        if tokens.is_empty() {
            return Err(Error::EmptyExpression);
        }

        // nodes with the depth of their subtree
        let mut stack: Vec<(Node<T>, usize)> = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            trace!("building {:?} with {} node(s) on the stack", token, stack.len());
            match token.category() {
                Category::Number => {
                    let value = T::from_literal(token.text())
                        .ok_or_else(|| Error::InvalidLiteral(token.text().into()))?;
                    stack.push((Node::Constant(value), 1));
                }
                Category::Variable => {
                    let accessor = self
                        .variables
                        .get(token.text())
                        .ok_or_else(|| Error::UnresolvedVariable(token.text().into()))?;
                    stack.push((Node::variable(token.text(), Arc::clone(accessor)), 1));
                }
                Category::Operator => {
                    let operation = token
                        .symbol()
                        .and_then(Operation::operator)
                        .ok_or_else(|| Error::UnknownOperator(token.text().into()))?;
                    let node = self.pop_operands(&mut stack, operation)?;
                    stack.push(node);
                }
                Category::Function => {
                    let operation = Operation::function(token.text())
                        .ok_or_else(|| Error::UnknownFunction(token.text().into()))?;
                    let node = self.pop_operands(&mut stack, operation)?;
                    stack.push(node);
                }
                Category::Invalid => {
                    return Err(Error::Lexical {
                        position: index,
                        lexeme: token.text().into(),
                    });
                }
            }
        }

        if stack.len() != 1 {
            return Err(Error::Malformed(stack.len()));
        }
        let (root, depth) = stack.pop().ok_or(Error::Malformed(0))?;
        if depth > self.max_depth {
            return Err(Error::TooDeep(self.max_depth));
        }
        debug!("built expression tree {}", root);
        Ok(root)
    }

    fn pop_operands(
        &self,
        stack: &mut Vec<(Node<T>, usize)>,
        operation: Operation,
    ) -> Result<(Node<T>, usize), Error> {
        let arity = operation.arity();
        if stack.len() < arity {
            return Err(Error::Arity {
                name: operation.name().into(),
                expected: arity,
                found: stack.len(),
            });
        }
        let (operands, depths): (Vec<_>, Vec<_>) =
            stack.split_off(stack.len() - arity).into_iter().unzip();
        let depth = depths.into_iter().max().unwrap_or(0) + 1;
        if depth > self.max_depth {
            return Err(Error::TooDeep(self.max_depth));
        }
        Node::apply(operation, operands).map(|node| (node, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::Builder;
    use crate::error::Error;
    use crate::token::Token;
    use crate::variables::Variables;

    fn variables() -> Variables<f64> {
        let mut variables = Variables::new();
        variables.insert_constant("@a", 2.0);
        variables.insert_constant("@b", 3.0);
        variables.insert_constant("@c", 4.0);
        variables
    }

    #[test]
    fn builds_from_postfix() {
        let variables = variables();
        let builder = Builder::new(&variables);

        // @a @b @c * +
        let tokens = vec![
            Token::variable("@a"),
            Token::variable("@b"),
            Token::variable("@c"),
            Token::operator('*'),
            Token::operator('+'),
        ];
        let root = builder.build(&tokens).unwrap();
        assert_eq!(root.to_string(), "add(@a, mul(@b, @c))");
        assert_eq!(root.compile()(), 14.0);

        // 1 @a atan2 log10
        let tokens = vec![
            Token::number("1"),
            Token::variable("@a"),
            Token::function("atan2"),
            Token::function("log10"),
        ];
        let root = builder.build(&tokens).unwrap();
        assert_eq!(root.to_string(), "log10(atan2(1.0, @a))");
    }

    #[test]
    fn arity_law() {
        let variables = variables();
        let builder = Builder::new(&variables);

        // @a @b +, read as one postfix sequence, is well formed
        let tokens = vec![
            Token::variable("@a"),
            Token::variable("@b"),
            Token::operator('+'),
        ];
        assert!(builder.build(&tokens).is_ok());

        let tokens = vec![Token::variable("@a"), Token::variable("@b")];
        assert_eq!(builder.build(&tokens).unwrap_err(), Error::Malformed(2));

        let tokens = vec![Token::variable("@a"), Token::operator('+')];
        assert_eq!(
            builder.build(&tokens).unwrap_err(),
            Error::Arity {
                name: "add".into(),
                expected: 2,
                found: 1
            }
        );

        let tokens = vec![Token::variable("@a"), Token::function("pow")];
        assert!(builder.build(&tokens).is_err());

        assert_eq!(builder.build(&[]).unwrap_err(), Error::EmptyExpression);
    }

    #[test]
    fn depth_limit() {
        let variables = variables();
        let builder = Builder::new(&variables).with_max_depth(2);

        // @a @b +
        let tokens = vec![
            Token::variable("@a"),
            Token::variable("@b"),
            Token::operator('+'),
        ];
        assert!(builder.build(&tokens).is_ok());

        // @a @b @c * +
        let tokens = vec![
            Token::variable("@a"),
            Token::variable("@b"),
            Token::variable("@c"),
            Token::operator('*'),
            Token::operator('+'),
        ];
        assert_eq!(builder.build(&tokens).unwrap_err(), Error::TooDeep(2));

        // @a neg neg
        let tokens = vec![
            Token::variable("@a"),
            Token::function("neg"),
            Token::function("neg"),
        ];
        assert_eq!(builder.build(&tokens).unwrap_err(), Error::TooDeep(2));
    }

    #[test]
    fn resolution_failures() {
        let variables = variables();
        let builder = Builder::new(&variables);

        let tokens = vec![Token::variable("@z")];
        assert_eq!(
            builder.build(&tokens).unwrap_err(),
            Error::UnresolvedVariable("@z".into())
        );

        let tokens = vec![Token::variable("@a"), Token::function("sqrt")];
        assert_eq!(
            builder.build(&tokens).unwrap_err(),
            Error::UnknownFunction("sqrt".into())
        );

        let tokens = vec![
            Token::variable("@a"),
            Token::variable("@b"),
            Token::operator('%'),
        ];
        assert_eq!(
            builder.build(&tokens).unwrap_err(),
            Error::UnknownOperator("%".into())
        );

        let tokens = vec![Token::number("1x")];
        assert_eq!(
            builder.build(&tokens).unwrap_err(),
            Error::InvalidLiteral("1x".into())
        );
    }
}
