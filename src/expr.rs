use crate::builder::Builder;
use crate::error::Error;
use crate::node::{Evaluator, Node};
use crate::numeric::Numeric;
use crate::shunter::Shunter;
use crate::token::Token;
use crate::variables::Variables;
use log::debug;
use std::collections::HashSet;

/// Compile a single expression from `input`, resolving its variables in
/// `variables`.
///
/// Returns the evaluator if parsing and building the expression succeeds,
/// or `Err(cause)` if it failed.
///
/// # Example
///
/// ```
/// # use yardstick::{compile, Variables};
/// let evaluator = compile::<f64>("2 ^ 3 ^ 2", &Variables::new()).unwrap();
/// assert_eq!(evaluator(), 512.0);
/// ```
pub fn compile<T: Numeric>(input: &str, variables: &Variables<T>) -> Result<Evaluator<T>, Error> {
    Expression::parse(input, variables).map(|expr| expr.compile())
}

/// Evaluate a single expression from `input` once.
///
/// # Example
///
/// ```
/// # use yardstick::{eval, Variables};
/// assert_eq!(eval::<f64>("45 - 2^3", &Variables::new()), Ok(37.0));
///
/// let mut variables = Variables::new();
/// variables.insert_constant("@a", -5.0);
/// assert_eq!(eval("3 * @a", &variables), Ok(-15.0));
/// ```
pub fn eval<T: Numeric>(input: &str, variables: &Variables<T>) -> Result<T, Error> {
    compile(input, variables).map(|evaluator| evaluator())
}

/// A parsed mathematical expression, with its variables bound.
///
/// # Examples
/// ```
/// # use yardstick::{Expression, Variables};
/// let mut variables = Variables::new();
/// variables.insert_constant("@a", 42.0);
///
/// let expr = Expression::parse("2 * @a + 1", &variables).unwrap();
/// assert_eq!(expr.to_string(), "add(mul(2.0, @a), 1.0)");
///
/// let evaluator = expr.compile();
/// assert_eq!(evaluator(), 85.0);
/// ```
#[derive(Debug)]
pub struct Expression<T> {
    postfix: Vec<Token>,
    root: Node<T>,
}

impl<T: Numeric> Expression<T> {
    /// Parse the given mathematical `expression` with the default grammar.
    ///
    /// # Examples
    /// ```
    /// # use yardstick::{Expression, Variables};
    /// let variables = Variables::<f64>::new();
    /// // A valid expression
    /// assert!(Expression::parse("3 + 5 * 2", &variables).is_ok());
    /// // an invalid expression
    /// assert!(Expression::parse("3eff + 5 * 2", &variables).is_err());
    /// ```
    pub fn parse(expression: &str, variables: &Variables<T>) -> Result<Self, Error> {
        Self::from_shunter(&Shunter::new(expression), variables)
    }

    /// Parse an expression with a configured `shunter`, for custom operator
    /// tables or tokenizers.
    pub fn from_shunter(shunter: &Shunter, variables: &Variables<T>) -> Result<Self, Error> {
        let postfix = shunter.shunt()?;
        let root = Builder::new(variables).build(&postfix)?;
        Ok(Self { postfix, root })
    }

    /// Compile the expression tree into an evaluator. The evaluator does not
    /// borrow the expression, and reads the variables anew on every call.
    pub fn compile(&self) -> Evaluator<T> {
        debug!("compiling {}", self.root);
        self.root.compile()
    }

    /// Names of the variables used in this expression.
    ///
    /// # Examples
    /// ```
    /// # use yardstick::{Expression, Variables};
    /// # use std::collections::HashSet;
    /// let mut variables = Variables::new();
    /// variables.insert_constant("@a", 1.0);
    /// variables.insert_constant("@b", 2.0);
    ///
    /// let expr = Expression::parse("3 + 5 * 2", &variables).unwrap();
    /// assert_eq!(expr.variables(), HashSet::new());
    ///
    /// let expr = Expression::parse("(@a + @b) ^ @a", &variables).unwrap();
    /// assert_eq!(expr.variables(), HashSet::from(["@a", "@b"]));
    /// ```
    pub fn variables(&self) -> HashSet<&str> {
        let mut variables = Vec::new();
        self.root.collect_variables(&mut variables);
        variables.into_iter().collect()
    }

    /// The postfix sequence the tree was built from
    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    /// The root of the expression tree
    pub fn root(&self) -> &Node<T> {
        &self.root
    }

    /// Consume the expression, returning its tree
    pub fn into_root(self) -> Node<T> {
        self.root
    }
}

impl<T: Numeric> std::fmt::Display for Expression<T> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::{compile, eval, Expression};
    use crate::builder::DEFAULT_MAX_DEPTH;
    use crate::error::{Error, ErrorKind};
    use crate::numeric::Batch;
    use crate::shunter::Shunter;
    use crate::token::render;
    use crate::tokenizer;
    use crate::variables::{Accessor, Variables};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, RwLock};
    use test_case::test_case;

    fn context() -> Variables<f64> {
        let _ = pretty_env_logger::try_init();
        let mut variables = Variables::new();
        variables.insert_constant("@a", 1.0);
        variables.insert_constant("@b", 2.0);
        variables
    }

    #[test_case("2*3+4" => Ok(10.0) ; "precedence")]
    #[test_case("2^3^2" => Ok(512.0) ; "right associative power")]
    #[test_case("3 + 5" => Ok(8.0) ; "addition")]
    #[test_case("2 - 5" => Ok(-3.0) ; "subtraction")]
    #[test_case("10 / 4" => Ok(2.5) ; "division")]
    #[test_case("20 / 2 / 5" => Ok(2.0) ; "left associative division")]
    #[test_case("(@a + @b)^2" => Ok(9.0) ; "variables")]
    #[test_case("pow(@b, 10)" => Ok(1024.0) ; "pow function")]
    #[test_case("exp(0) + log(1)" => Ok(1.0) ; "exp and log")]
    #[test_case("log10(100) * 0" => Ok(0.0) ; "log10")]
    #[test_case("-2^2" => Ok(-4.0) ; "negated power")]
    #[test_case("-@b * 3" => Ok(-6.0) ; "negated product")]
    #[test_case("2 * (-@a)" => Ok(-2.0) ; "negated group")]
    #[test_case("neg(@b) - 1" => Ok(-3.0) ; "neg function")]
    #[test_case("2 * z" => Err(Error::Unexpected { position: 5, found: "function z without arguments".into() }) ; "bare name")]
    #[test_case("2 * @z" => Err(Error::UnresolvedVariable("@z".into())) ; "unresolved variable")]
    #[test_case("sqrt(4)" => Err(Error::UnknownFunction("sqrt".into())) ; "unknown function")]
    fn evaluation(expression: &str) -> Result<f64, Error> {
        eval(expression, &context())
    }

    #[test]
    fn functions() {
        let variables = context();
        let close = |expression: &str, expected: f64| {
            let value = eval(expression, &variables).unwrap();
            assert!(
                (value - expected).abs() < 1e-12,
                "{} = {}, expected {}",
                expression,
                value,
                expected
            );
        };
        close("sin(@a) * 3", 3.0 * 1.0_f64.sin());
        close("cos(@b)", 2.0_f64.cos());
        close("tan(@a)", 1.0_f64.tan());
        close("sinh(@a) + cosh(@a)", 1.0_f64.exp());
        close("tanh(@b)", 2.0_f64.tanh());
        close("asin(@a)", std::f64::consts::FRAC_PI_2);
        close("acos(@a)", 0.0);
        close("atan(@a)", std::f64::consts::FRAC_PI_4);
        close("asinh(@a)", 1.0_f64.asinh());
        close("acosh(@b)", 2.0_f64.acosh());
        close("atanh(@a / @b)", 0.5_f64.atanh());
        close("atan2(@a, 0)", std::f64::consts::FRAC_PI_2);
        close("atan2(0 - @a, 0)", -std::f64::consts::FRAC_PI_2);
        close("atan2(-1, 0)", -std::f64::consts::FRAC_PI_2);
        close("log(exp(@b))", 2.0);
    }

    #[test]
    fn numeric_domain_is_not_an_error() {
        let variables = context();
        assert_eq!(eval("@a / 0", &variables), Ok(f64::INFINITY));
        assert!(eval("log(0 - @a)", &variables).unwrap().is_nan());
        assert!(eval("asin(@b)", &variables).unwrap().is_nan());
    }

    #[test]
    fn live_binding() {
        let x = Arc::new(AtomicU64::new(3.0_f64.to_bits()));
        let source = Arc::clone(&x);
        let mut variables = Variables::new();
        variables.insert("@x", move || f64::from_bits(source.load(Ordering::Relaxed)));

        let evaluator = compile("@x * @x + 1", &variables).unwrap();
        // the evaluator keeps its own handle on the accessor
        drop(variables);

        assert_eq!(evaluator(), 10.0);
        assert_eq!(evaluator(), 10.0);
        x.store(0.5_f64.to_bits(), Ordering::Relaxed);
        assert_eq!(evaluator(), 1.25);
    }

    #[test]
    fn rebinding_needs_a_new_build() {
        let mut variables = context();
        let expr = Expression::parse("@a + @b", &variables).unwrap();
        variables.insert_constant("@a", 10.0);
        assert_eq!(expr.compile()(), 3.0);

        let expr = Expression::parse("@a + @b", &variables).unwrap();
        assert_eq!(expr.compile()(), 12.0);
    }

    #[test]
    fn swappable_source() {
        let initial: Accessor<f64> = Arc::new(|| 1.0);
        let source = Arc::new(RwLock::new(initial));
        let current = Arc::clone(&source);
        let mut variables = Variables::new();
        variables.insert("@x", move || {
            current.read().map_or(f64::NAN, |accessor| (*accessor)())
        });

        let evaluator = compile("@x + 1", &variables).unwrap();
        assert_eq!(evaluator(), 2.0);

        let replacement: Accessor<f64> = Arc::new(|| 41.0);
        *source.write().unwrap() = replacement;
        assert_eq!(evaluator(), 42.0);
    }

    #[test]
    fn nesting_limit() {
        let variables = context();
        let sum = vec!["1"; 1000].join(" + ");
        assert_eq!(eval(&sum, &variables), Ok(1000.0));

        let sum = vec!["1"; 5000].join(" + ");
        let error = compile(&sum, &variables).err();
        assert_eq!(error, Some(Error::TooDeep(DEFAULT_MAX_DEPTH)));

        let negations = format!("{}@a", "-(".repeat(2000)) + &")".repeat(2000);
        let error = Expression::parse(&negations, &variables).unwrap_err();
        assert_eq!(error, Error::TooDeep(DEFAULT_MAX_DEPTH));
        assert_eq!(error.kind(), ErrorKind::Syntactic);
    }

    #[test]
    fn evaluators_are_independent() {
        let variables = context();
        let expr = Expression::parse("@a - @b", &variables).unwrap();
        let first = expr.compile();
        let second = expr.compile();
        drop(expr);
        assert_eq!(first(), -1.0);
        assert_eq!(second(), -1.0);
    }

    #[test]
    fn concurrent_evaluation() {
        let variables = context();
        let evaluator = Arc::new(compile("(@a + @b) * 10", &variables).unwrap());
        let handles = (0..4)
            .map(|_| {
                let evaluator = Arc::clone(&evaluator);
                std::thread::spawn(move || evaluator())
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 30.0);
        }
    }

    #[test]
    fn introspection() {
        let variables = context();
        let expr = Expression::parse("@a + @b * atan2(@a, 2)", &variables).unwrap();
        assert_eq!(render(expr.postfix()), "@a @b @a 2 atan2 * +");
        assert_eq!(expr.to_string(), "add(@a, mul(@b, atan2(@a, 2.0)))");
        assert_eq!(expr.root().arity(), 2);
        assert_eq!(expr.variables().len(), 2);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        let variables = context();
        let error = Expression::parse("(@a+@b", &variables).unwrap_err();
        assert_eq!(error, Error::MismatchedParenthesis);
        assert_eq!(error.kind(), ErrorKind::Syntactic);

        let error = Expression::parse("@a @b +", &variables).unwrap_err();
        assert_eq!(
            error,
            Error::Unexpected {
                position: 3,
                found: "operand @b".into()
            }
        );
        assert_eq!(error.kind(), ErrorKind::Syntactic);

        let error = Expression::parse("@a # @b", &variables).unwrap_err();
        assert_eq!(error, Error::UnknownOperator("#".into()));

        let error = Expression::parse("@a + @c", &variables).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnresolvedVariable);
    }

    #[test]
    fn configured_shunter() {
        let variables = context();
        let mut shunter = Shunter::new("0.5 * @a + 1e1");
        shunter.set_number_tokenizer(tokenizer::float);
        let expr = Expression::from_shunter(&shunter, &variables).unwrap();
        assert_eq!(expr.compile()(), 10.5);
    }

    #[test]
    fn other_value_types() {
        let mut variables = Variables::<f32>::new();
        variables.insert_constant("@a", 1.5);
        assert_eq!(eval("@a * 4 - 1", &variables), Ok(5.0_f32));

        let mut batches = Variables::<Batch>::new();
        batches.insert("@v", || Batch::from(vec![1.0, 2.0, 3.0]));
        batches.insert_constant("@w", Batch::from(vec![10.0, 20.0, 30.0]));
        let evaluator = compile("@v * 2 + @w", &batches).unwrap();
        assert_eq!(evaluator().values(), &[12.0, 24.0, 36.0]);
        assert_eq!(
            eval("exp(@v - @v)", &batches).unwrap().values(),
            &[1.0, 1.0, 1.0]
        );
    }
}
