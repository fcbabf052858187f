use crate::error::Error;
use crate::numeric::Numeric;
use crate::operation::{Binary, Operation, Unary};
use crate::variables::Accessor;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// A compiled expression: every call recomputes the expression from the
/// current values of its variables.
pub type Evaluator<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Nodes of an expression tree over values of type `T`
pub enum Node<T> {
    /// A variable, read through its accessor at every evaluation
    Variable {
        /// The variable lexeme, sentinel included
        name: String,
        /// Source of the variable value
        accessor: Accessor<T>,
    },
    /// A number literal
    Constant(T),
    /// fn(<input>)
    Unary(Unary, Box<Node<T>>),
    /// <left> op <right>, or fn(<left>, <right>)
    Binary(Binary, Box<Node<T>>, Box<Node<T>>),
}

impl<T: Numeric> Node<T> {
    /// Shorthand for a `Variable` node
    pub fn variable<S: Into<String>>(name: S, accessor: Accessor<T>) -> Self {
        Self::Variable {
            name: name.into(),
            accessor,
        }
    }

    /// Apply `operation` to `operands`, which must hold exactly as many nodes
    /// as the operation's arity, in left to right order.
    pub fn apply(operation: Operation, mut operands: Vec<Self>) -> Result<Self, Error> {
        if operands.len() != operation.arity() {
            return Err(Error::Arity {
                name: operation.name().into(),
                expected: operation.arity(),
                found: operands.len(),
            });
        }
        let node = match operation {
            Operation::Unary(unary) => {
                let input = operands.pop().map(Box::new);
                input.map(|input| Self::Unary(unary, input))
            }
            Operation::Binary(binary) => {
                let right = operands.pop().map(Box::new);
                let left = operands.pop().map(Box::new);
                left.zip(right)
                    .map(|(left, right)| Self::Binary(binary, left, right))
            }
        };
        node.ok_or(Error::Malformed(0))
    }

    /// Number of children of this node
    pub fn arity(&self) -> usize {
        match *self {
            Self::Variable { .. } | Self::Constant(_) => 0,
            Self::Unary(..) => 1,
            Self::Binary(..) => 2,
        }
    }

    /// Children of this node, left to right
    pub fn children(&self) -> Vec<&Self> {
        match *self {
            Self::Variable { .. } | Self::Constant(_) => Vec::new(),
            Self::Unary(_, ref input) => vec![&**input],
            Self::Binary(_, ref left, ref right) => vec![&**left, &**right],
        }
    }

    /// Compile this node and its subtree into an evaluator.
    ///
    /// Each node captures the evaluators of its children, and calls each of
    /// them once per evaluation. The evaluator owns everything it needs, so
    /// it stays valid after the tree is dropped.
    pub fn compile(&self) -> Evaluator<T> {
        match *self {
            Self::Variable { ref accessor, .. } => {
                let accessor = Arc::clone(accessor);
                Box::new(move || accessor())
            }
            Self::Constant(ref value) => {
                let value = value.clone();
                Box::new(move || value.clone())
            }
            Self::Unary(unary, ref input) => {
                let function = unary.function::<T>();
                let input = input.compile();
                Box::new(move || function(input()))
            }
            Self::Binary(binary, ref left, ref right) => {
                let function = binary.function::<T>();
                let left = left.compile();
                let right = right.compile();
                Box::new(move || function(left(), right()))
            }
        }
    }

    /// Names of the variables in this subtree, in evaluation order and with
    /// repetitions.
    pub(crate) fn collect_variables<'a>(&'a self, variables: &mut Vec<&'a str>) {
        match *self {
            Self::Variable { ref name, .. } => variables.push(name),
            Self::Constant(_) => {}
            Self::Unary(_, ref input) => input.collect_variables(variables),
            Self::Binary(_, ref left, ref right) => {
                left.collect_variables(variables);
                right.collect_variables(variables);
            }
        }
    }
}

impl<T: Numeric> Display for Node<T> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match *self {
            Self::Variable { ref name, .. } => write!(fmt, "{}", name),
            Self::Constant(ref value) => write!(fmt, "{:?}", value),
            Self::Unary(unary, ref input) => write!(fmt, "{}({})", unary.name(), input),
            Self::Binary(binary, ref left, ref right) => {
                write!(fmt, "{}({}, {})", binary.name(), left, right)
            }
        }
    }
}

impl<T: Debug> Debug for Node<T> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match *self {
            Self::Variable { ref name, .. } => fmt.debug_tuple("Variable").field(name).finish(),
            Self::Constant(ref value) => fmt.debug_tuple("Constant").field(value).finish(),
            Self::Unary(unary, ref input) => {
                fmt.debug_tuple("Unary").field(&unary).field(input).finish()
            }
            Self::Binary(binary, ref left, ref right) => fmt
                .debug_tuple("Binary")
                .field(&binary)
                .field(left)
                .field(right)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Node;
    use crate::error::Error;
    use crate::numeric::Batch;
    use crate::operation::{Binary, Operation, Unary};
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Arc;

    fn constant(value: f64) -> Node<f64> {
        Node::Constant(value)
    }

    #[test]
    fn apply_checks_arity() {
        let add = Operation::Binary(Binary::Add);
        let node = Node::apply(add, vec![constant(1.0), constant(2.0)]).unwrap();
        assert_eq!(node.arity(), 2);
        assert_eq!(node.to_string(), "add(1.0, 2.0)");

        assert_eq!(
            Node::apply(add, vec![constant(1.0)]).unwrap_err(),
            Error::Arity {
                name: "add".into(),
                expected: 2,
                found: 1
            }
        );
        assert!(Node::<f64>::apply(Operation::Unary(Unary::Sin), vec![]).is_err());
    }

    #[test]
    fn operand_order() {
        let sub = Node::apply(
            Operation::Binary(Binary::Sub),
            vec![constant(10.0), constant(4.0)],
        )
        .unwrap();
        assert_eq!(sub.compile()(), 6.0);

        let atan2 = Node::apply(
            Operation::Binary(Binary::Atan2),
            vec![constant(1.0), constant(0.0)],
        )
        .unwrap();
        assert!((atan2.compile()() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn evaluators_read_live_values() {
        let x = Arc::new(AtomicU64::new(1.0_f64.to_bits()));
        let source = Arc::clone(&x);
        let leaf = Node::<f64>::variable(
            "@x",
            Arc::new(move || f64::from_bits(source.load(Ordering::Relaxed))),
        );
        let tree = Node::apply(Operation::Binary(Binary::Mul), vec![leaf, constant(3.0)]).unwrap();
        let evaluator = tree.compile();
        assert_eq!(evaluator(), 3.0);
        assert_eq!(evaluator(), 3.0);

        x.store(2.0_f64.to_bits(), Ordering::Relaxed);
        assert_eq!(evaluator(), 6.0);
    }

    #[test]
    fn evaluator_outlives_tree() {
        let tree = Node::apply(
            Operation::Unary(Unary::Exp),
            vec![constant(0.0)],
        )
        .unwrap();
        let evaluator = tree.compile();
        drop(tree);
        assert_eq!(evaluator(), 1.0);
    }

    #[test]
    fn children_evaluated_once_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let leaf = Node::<f64>::variable(
            "@n",
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                1.0
            }),
        );
        let tree = Node::apply(
            Operation::Unary(Unary::Log),
            vec![Node::apply(Operation::Binary(Binary::Add), vec![leaf, constant(1.0)]).unwrap()],
        )
        .unwrap();
        let evaluator = tree.compile();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        evaluator();
        evaluator();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn batched_values() {
        let leaf = Node::<Batch>::variable(
            "@v",
            Arc::new(|| Batch::from(vec![1.0, 2.0, 4.0])),
        );
        let tree = Node::apply(
            Operation::Binary(Binary::Pow),
            vec![leaf, Node::Constant(Batch::scalar(2.0))],
        )
        .unwrap();
        assert_eq!(tree.compile()().values(), &[1.0, 4.0, 16.0]);
        assert_eq!(tree.to_string(), "pow(@v, Batch { values: [2.0] })");
    }

    #[test]
    fn variables_in_order() {
        let a = Node::<f64>::variable("@a", Arc::new(|| 1.0));
        let b = Node::<f64>::variable("@b", Arc::new(|| 2.0));
        let a2 = Node::<f64>::variable("@a", Arc::new(|| 1.0));
        let inner = Node::apply(Operation::Binary(Binary::Div), vec![b, a2]).unwrap();
        let tree = Node::apply(Operation::Binary(Binary::Add), vec![a, inner]).unwrap();

        let mut names = Vec::new();
        tree.collect_variables(&mut names);
        assert_eq!(names, vec!["@a", "@b", "@a"]);
        assert_eq!(tree.children().len(), 2);
    }
}
