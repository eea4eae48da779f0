//! The operator and function table.
//!
//! Entries are kept in priority order. The reducer walks them top to bottom
//! and restarts from the top after every substitution, so an entry always
//! wins over everything registered after it. The table is built once per
//! process and shared read-only.

use std::f64::consts;
use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use super::error::SolveError;
use super::lexer::{Token, TokenKind};

lazy_static! {
    static ref GLOBAL: Registry = Registry::standard();

    /// `log<base>` where the base is a plain decimal numeral.
    static ref LOG_N: Regex = Regex::new(r"^log([0-9]+(?:\.[0-9]+)?)$").unwrap();
}

/// How an entry appears in a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notation {
    /// A bare name such as `pi`.
    Constant,
    /// `name(arg, ...)`.
    Call,
    /// A symbol after its operand, `5!`.
    Postfix,
    /// A symbol before its operand. Only negation, never listed.
    Prefix,
    /// A symbol between two operands.
    Infix,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Nullary,
    Unary,
    Binary,
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Nullary => count == 0,
            Self::Unary => count == 1,
            Self::Binary => count == 2,
            Self::Range(min, max) => (min..=max).contains(&count),
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Nullary => "no arguments".to_string(),
            Self::Unary => "exactly one argument".to_string(),
            Self::Binary => "exactly 2 arguments".to_string(),
            Self::Range(min, max) => format!("{min} to {max} arguments"),
        }
    }
}

/// The numeric side of an entry. Arity is derived from the variant.
#[derive(Clone, Copy)]
pub enum Compute {
    Constant(f64),
    Unary(fn(f64) -> Result<f64, SolveError>),
    Binary(fn(f64, f64) -> Result<f64, SolveError>),
    Variadic {
        min: usize,
        max: usize,
        apply: fn(&[f64]) -> Result<f64, SolveError>,
    },
}

impl Compute {
    pub fn arity(&self) -> Arity {
        match self {
            Self::Constant(_) => Arity::Nullary,
            Self::Unary(_) => Arity::Unary,
            Self::Binary(_) => Arity::Binary,
            Self::Variadic { min, max, .. } => Arity::Range(*min, *max),
        }
    }
}

/// One application of an entry found in a flat token run.
#[derive(Clone, Debug, PartialEq)]
pub struct Occurrence {
    /// Token indices to replace with the result.
    pub span: Range<usize>,
    /// Operands in call order.
    pub args: Vec<f64>,
}

/// Immutable description of one operation.
pub struct OperatorSpec {
    pub token: &'static str,
    pub notation: Notation,
    pub compute: Compute,
    pub doc: &'static str,
}

impl OperatorSpec {
    pub fn arity(&self) -> Arity {
        self.compute.arity()
    }

    fn is_symbol(&self, kind: &TokenKind) -> bool {
        kind.symbol() == Some(self.token)
    }

    /// Find the leftmost application of this entry to literal operands.
    ///
    /// Calls never match here: their parentheses are resolved by the driver
    /// before the argument list reaches the reducer.
    pub fn detect(&self, tokens: &[Token]) -> Option<Occurrence> {
        match self.notation {
            Notation::Call => None,
            Notation::Constant => tokens
                .iter()
                .position(|t| matches!(&t.kind, TokenKind::Name(n) if n == self.token))
                .map(|i| Occurrence {
                    span: i..i + 1,
                    args: Vec::new(),
                }),
            Notation::Postfix => tokens.windows(2).enumerate().find_map(|(i, w)| {
                match (&w[0].kind, &w[1].kind) {
                    (TokenKind::Number(x), op) if self.is_symbol(op) => Some(Occurrence {
                        span: i..i + 2,
                        args: vec![*x],
                    }),
                    _ => None,
                }
            }),
            Notation::Prefix => tokens.windows(2).enumerate().find_map(|(i, w)| {
                let leading = i == 0
                    || matches!(&tokens[i - 1].kind, k if k.is_infix() || *k == TokenKind::Comma);
                match (&w[0].kind, &w[1].kind) {
                    (op, TokenKind::Number(x)) if leading && self.is_symbol(op) => {
                        Some(Occurrence {
                            span: i..i + 2,
                            args: vec![*x],
                        })
                    }
                    _ => None,
                }
            }),
            Notation::Infix => tokens.windows(3).enumerate().find_map(|(i, w)| {
                match (&w[0].kind, &w[1].kind, &w[2].kind) {
                    (TokenKind::Number(a), op, TokenKind::Number(b)) if self.is_symbol(op) => {
                        Some(Occurrence {
                            span: i..i + 3,
                            args: vec![*a, *b],
                        })
                    }
                    _ => None,
                }
            }),
        }
    }

    /// Run the compute function on `args`.
    ///
    /// Infinite results are reported as overflow and NaN as a domain error.
    pub fn apply(&self, args: &[f64]) -> Result<f64, SolveError> {
        let arity = self.arity();
        if !arity.accepts(args.len()) {
            return Err(SolveError::malformed(format!(
                "{}() takes {} ({} given)",
                self.token,
                arity.describe(),
                args.len()
            )));
        }

        let value = match (self.compute, args) {
            (Compute::Constant(value), _) => value,
            (Compute::Unary(f), [x]) => f(*x)?,
            (Compute::Binary(f), [x, y]) => f(*x, *y)?,
            (Compute::Variadic { apply, .. }, args) => apply(args)?,
            _ => unreachable!("arity checked above"),
        };

        if value.is_nan() {
            Err(SolveError::domain("math domain error"))
        } else if value.is_infinite() {
            Err(SolveError::Overflow)
        } else {
            Ok(value)
        }
    }
}

/// A name resolved to its entry, with the base of a `logN` call bound.
#[derive(Clone, Copy)]
pub struct Callee<'r> {
    pub spec: &'r OperatorSpec,
    pub bound: Option<f64>,
}

impl Callee<'_> {
    pub fn call(&self, args: &[f64]) -> Result<f64, SolveError> {
        match self.bound {
            Some(base) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(base);
                full.extend_from_slice(args);
                self.spec.apply(&full)
            }
            None => self.spec.apply(args),
        }
    }
}

pub struct Registry {
    entries: Vec<OperatorSpec>,
}

impl Registry {
    /// The process-wide table.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Entries in priority order, including the unlisted negation tier.
    pub fn entries(&self) -> &[OperatorSpec] {
        &self.entries
    }

    /// Entries shown to users, in priority order.
    pub fn listed(&self) -> impl Iterator<Item = &OperatorSpec> {
        self.entries
            .iter()
            .filter(|spec| spec.notation != Notation::Prefix)
    }

    /// Case-insensitive doc lookup by token.
    pub fn lookup_doc(&self, name: &str) -> Option<&'static str> {
        let name = name.trim().to_lowercase();
        self.listed()
            .find(|spec| spec.token.to_lowercase() == name)
            .map(|spec| spec.doc)
    }

    /// Resolve a name used in a query to a constant or function.
    pub fn callee(&self, name: &str) -> Option<Callee<'_>> {
        let named = self.entries.iter().find(|spec| {
            matches!(spec.notation, Notation::Constant | Notation::Call) && spec.token == name
        });
        if let Some(spec) = named {
            return Some(Callee { spec, bound: None });
        }

        let base: f64 = LOG_N.captures(name)?.get(1)?.as_str().parse().ok()?;
        let spec = self.entries.iter().find(|spec| spec.token == "logN")?;
        Some(Callee {
            spec,
            bound: Some(base),
        })
    }

    /// Whether `name` refers to a registry entry.
    pub fn is_name(&self, name: &str) -> bool {
        self.callee(name).is_some()
    }

    fn standard() -> Self {
        let mut entries = vec![
            constant("pi", consts::PI, PI_DOC),
            constant("e", consts::E, E_DOC),
        ];
        entries.extend(functions());
        entries.extend([
            spec(
                "logN",
                Notation::Call,
                Compute::Binary(|base, x| log(x, Some(base))),
                "Alias for log(x, y) => logY(x)",
            ),
            spec(
                "!",
                Notation::Postfix,
                Compute::Unary(factorial),
                "Alias for factorial\n\nFind n!.\n\nRaise a ValueError if n is negative or non-integral.",
            ),
            spec(
                "!!",
                Notation::Postfix,
                Compute::Unary(semifactorial),
                "Alias for semifactorial\n\nFind n!! = n*(n-2)*(n-4)*..., stopping at 1 or 2.\n\nRaise a ValueError if n is negative or non-integral.",
            ),
            spec("**", Notation::Infix, Compute::Binary(power), "X ** Y"),
            spec("-", Notation::Prefix, Compute::Unary(|x| Ok(-x)), "-X"),
            spec(
                "*",
                Notation::Infix,
                Compute::Binary(|x, y| Ok(x * y)),
                "X * Y",
            ),
            spec("/", Notation::Infix, Compute::Binary(divide), "X / Y"),
            spec(
                "+",
                Notation::Infix,
                Compute::Binary(|x, y| Ok(x + y)),
                "X + Y",
            ),
            spec(
                "-",
                Notation::Infix,
                Compute::Binary(|x, y| Ok(x - y)),
                "X - Y",
            ),
        ]);
        Self { entries }
    }
}

/// `(token, doc)` of every user-visible entry, in priority order.
pub fn list_operators() -> Vec<(&'static str, &'static str)> {
    Registry::global()
        .listed()
        .map(|spec| (spec.token, spec.doc))
        .collect()
}

/// Doc string for a single operator or function name, ignoring case.
pub fn lookup_doc(name: &str) -> Option<&'static str> {
    Registry::global().lookup_doc(name)
}

const PI_DOC: &str = "The mathematical constant pi = 3.141592..., to available precision.";
const E_DOC: &str = "The mathematical constant e = 2.718281..., to available precision.";

fn spec(
    token: &'static str,
    notation: Notation,
    compute: Compute,
    doc: &'static str,
) -> OperatorSpec {
    OperatorSpec {
        token,
        notation,
        compute,
        doc,
    }
}

fn constant(token: &'static str, value: f64, doc: &'static str) -> OperatorSpec {
    spec(token, Notation::Constant, Compute::Constant(value), doc)
}

fn unary(
    token: &'static str,
    f: fn(f64) -> Result<f64, SolveError>,
    doc: &'static str,
) -> OperatorSpec {
    spec(token, Notation::Call, Compute::Unary(f), doc)
}

fn binary(
    token: &'static str,
    f: fn(f64, f64) -> Result<f64, SolveError>,
    doc: &'static str,
) -> OperatorSpec {
    spec(token, Notation::Call, Compute::Binary(f), doc)
}

fn functions() -> Vec<OperatorSpec> {
    vec![
        unary(
            "acos",
            |x| Ok(x.acos()),
            "Return the arc cosine (measured in radians) of x.\n\nThe result is between 0 and pi.",
        ),
        unary(
            "acosh",
            |x| Ok(x.acosh()),
            "Return the inverse hyperbolic cosine of x.",
        ),
        unary(
            "asin",
            |x| Ok(x.asin()),
            "Return the arc sine (measured in radians) of x.\n\nThe result is between -pi/2 and pi/2.",
        ),
        unary(
            "asinh",
            |x| Ok(x.asinh()),
            "Return the inverse hyperbolic sine of x.",
        ),
        unary(
            "atan",
            |x| Ok(x.atan()),
            "Return the arc tangent (measured in radians) of x.\n\nThe result is between -pi/2 and pi/2.",
        ),
        binary(
            "atan2",
            |y, x| Ok(y.atan2(x)),
            "Return the arc tangent (measured in radians) of y/x.\n\nUnlike atan(y/x), the signs of both x and y are considered.",
        ),
        unary(
            "atanh",
            atanh,
            "Return the inverse hyperbolic tangent of x.",
        ),
        unary("cbrt", |x| Ok(x.cbrt()), "Return the cube root of x."),
        unary(
            "ceil",
            |x| Ok(x.ceil()),
            "Return the ceiling of x as an Integral.\n\nThis is the smallest integer >= x.",
        ),
        binary(
            "comb",
            comb,
            "Number of ways to choose k items from n items without repetition and without order.\n\nEvaluates to n! / (k! * (n - k)!) when k <= n and evaluates to zero when k > n.",
        ),
        binary(
            "copysign",
            |x, y| Ok(x.copysign(y)),
            "Return a float with the magnitude (absolute value) of x but the sign of y.",
        ),
        unary(
            "cos",
            |x| Ok(x.cos()),
            "Return the cosine of x (measured in radians).",
        ),
        unary(
            "cosh",
            |x| Ok(x.cosh()),
            "Return the hyperbolic cosine of x.",
        ),
        unary(
            "degrees",
            |x| Ok(x.to_degrees()),
            "Convert angle x from radians to degrees.",
        ),
        unary("exp", |x| Ok(x.exp()), "Return e raised to the power of x."),
        unary(
            "exp2",
            |x| Ok(x.exp2()),
            "Return 2 raised to the power of x.",
        ),
        unary(
            "expm1",
            |x| Ok(x.exp_m1()),
            "Return exp(x)-1.\n\nThis function avoids the loss of precision involved in the direct evaluation of exp(x)-1 for small x.",
        ),
        unary(
            "fabs",
            |x| Ok(x.abs()),
            "Return the absolute value of the float x.",
        ),
        unary(
            "factorial",
            factorial,
            "Find n!.\n\nRaise a ValueError if n is negative or non-integral.",
        ),
        unary(
            "floor",
            |x| Ok(x.floor()),
            "Return the floor of x as an Integral.\n\nThis is the largest integer <= x.",
        ),
        binary(
            "fmod",
            fmod,
            "Return fmod(x, y), according to platform C.\n\nx % y may differ.",
        ),
        binary("gcd", gcd, "Greatest Common Divisor."),
        binary(
            "hypot",
            |x, y| Ok(x.hypot(y)),
            "Return the Euclidean distance, sqrt(x*x + y*y).",
        ),
        unary(
            "isqrt",
            isqrt,
            "Return the integer part of the square root of the input.",
        ),
        binary("lcm", lcm, "Least Common Multiple."),
        spec(
            "log",
            Notation::Call,
            Compute::Variadic {
                min: 1,
                max: 2,
                apply: |args| log(args[0], args.get(1).copied()),
            },
            "log(x, [base=math.e])\nReturn the logarithm of x to the given base.\n\nIf the base not specified, returns the natural logarithm (base e) of x.",
        ),
        unary(
            "log10",
            |x| log(x, Some(10.0)),
            "Return the base 10 logarithm of x.",
        ),
        unary(
            "log1p",
            log1p,
            "Return the natural logarithm of 1+x (base e).\n\nThe result is computed in a way which is accurate for x near zero.",
        ),
        unary(
            "log2",
            |x| log(x, Some(2.0)),
            "Return the base 2 logarithm of x.",
        ),
        binary(
            "perm",
            perm,
            "Number of ways to choose k items from n items without repetition and with order.\n\nEvaluates to n! / (n - k)! when k <= n and evaluates to zero when k > n.",
        ),
        binary("pow", math_pow, "Return x**y (x to the power of y)."),
        unary(
            "radians",
            |x| Ok(x.to_radians()),
            "Convert angle x from degrees to radians.",
        ),
        unary(
            "sin",
            |x| Ok(x.sin()),
            "Return the sine of x (measured in radians).",
        ),
        unary("sinh", |x| Ok(x.sinh()), "Return the hyperbolic sine of x."),
        unary("sqrt", |x| Ok(x.sqrt()), "Return the square root of x."),
        unary(
            "tan",
            |x| Ok(x.tan()),
            "Return the tangent of x (measured in radians).",
        ),
        unary(
            "tanh",
            |x| Ok(x.tanh()),
            "Return the hyperbolic tangent of x.",
        ),
        unary(
            "trunc",
            |x| Ok(x.trunc()),
            "Truncates the Real x to the nearest Integral toward 0.\n\nUses the __trunc__ magic method.",
        ),
    ]
}

fn domain_error() -> SolveError {
    SolveError::domain("math domain error")
}

/// Operand of an integer-only operation.
fn integral(x: f64) -> Result<f64, SolveError> {
    if x.fract() == 0.0 {
        Ok(x)
    } else {
        Err(SolveError::domain(
            "'float' object cannot be interpreted as an integer",
        ))
    }
}

/// Shared checks of `!` and `!!`.
fn factorial_operand(name: &str, x: f64) -> Result<f64, SolveError> {
    if x.fract() != 0.0 {
        return Err(SolveError::domain(format!(
            "{name}() only accepts integral values"
        )));
    }
    if x < 0.0 {
        return Err(SolveError::domain(format!(
            "{name}() not defined for negative values"
        )));
    }
    Ok(x)
}

/// `n * (n - step) * ...` while the factor stays above 1.
///
/// Stops as soon as the product overflows, so huge operands end quickly.
fn stepped_product(n: f64, step: f64) -> Result<f64, SolveError> {
    let mut product = 1.0;
    let mut factor = n;
    while factor > 1.0 {
        product *= factor;
        if product.is_infinite() {
            return Err(SolveError::Overflow);
        }
        factor -= step;
    }
    Ok(product)
}

fn factorial(x: f64) -> Result<f64, SolveError> {
    stepped_product(factorial_operand("factorial", x)?, 1.0)
}

fn semifactorial(x: f64) -> Result<f64, SolveError> {
    stepped_product(factorial_operand("semifactorial", x)?, 2.0)
}

fn power(x: f64, y: f64) -> Result<f64, SolveError> {
    if x == 0.0 && y < 0.0 {
        return Err(SolveError::domain(
            "0.0 cannot be raised to a negative power",
        ));
    }
    Ok(x.powf(y))
}

fn math_pow(x: f64, y: f64) -> Result<f64, SolveError> {
    if x == 0.0 && y < 0.0 {
        return Err(domain_error());
    }
    Ok(x.powf(y))
}

fn divide(x: f64, y: f64) -> Result<f64, SolveError> {
    if y == 0.0 {
        return Err(SolveError::domain("float division by zero"));
    }
    Ok(x / y)
}

fn log(x: f64, base: Option<f64>) -> Result<f64, SolveError> {
    if x <= 0.0 {
        return Err(domain_error());
    }
    match base {
        None => Ok(x.ln()),
        Some(base) if base <= 0.0 => Err(domain_error()),
        Some(base) if base == 1.0 => Err(SolveError::domain("float division by zero")),
        Some(base) => Ok(x.ln() / base.ln()),
    }
}

fn log1p(x: f64) -> Result<f64, SolveError> {
    if x <= -1.0 {
        return Err(domain_error());
    }
    Ok(x.ln_1p())
}

fn atanh(x: f64) -> Result<f64, SolveError> {
    if x.abs() >= 1.0 {
        return Err(domain_error());
    }
    Ok(x.atanh())
}

fn fmod(x: f64, y: f64) -> Result<f64, SolveError> {
    if y == 0.0 {
        return Err(domain_error());
    }
    Ok(x % y)
}

fn gcd(a: f64, b: f64) -> Result<f64, SolveError> {
    let (mut a, mut b) = (integral(a)?.abs(), integral(b)?.abs());
    while b != 0.0 {
        (a, b) = (b, a % b);
    }
    Ok(a)
}

fn lcm(a: f64, b: f64) -> Result<f64, SolveError> {
    let divisor = gcd(a, b)?;
    if divisor == 0.0 {
        return Ok(0.0);
    }
    Ok((a / divisor * b).abs())
}

fn isqrt(n: f64) -> Result<f64, SolveError> {
    if integral(n)? < 0.0 {
        return Err(SolveError::domain(
            "isqrt() argument must be nonnegative",
        ));
    }
    Ok(n.sqrt().floor())
}

fn choose_operands(n: f64, k: f64) -> Result<(f64, f64), SolveError> {
    let (n, k) = (integral(n)?, integral(k)?);
    if n < 0.0 {
        return Err(SolveError::domain("n must be a non-negative integer"));
    }
    if k < 0.0 {
        return Err(SolveError::domain("k must be a non-negative integer"));
    }
    Ok((n, k))
}

fn comb(n: f64, k: f64) -> Result<f64, SolveError> {
    let (n, k) = choose_operands(n, k)?;
    if k > n {
        return Ok(0.0);
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    let mut i = 1.0;
    while i <= k {
        result = result * (n - k + i) / i;
        if result.is_infinite() {
            return Err(SolveError::Overflow);
        }
        i += 1.0;
    }
    Ok(result.round())
}

fn perm(n: f64, k: f64) -> Result<f64, SolveError> {
    let (n, k) = choose_operands(n, k)?;
    if k > n {
        return Ok(0.0);
    }
    let mut result = 1.0;
    let mut factor = n;
    while factor > n - k {
        result *= factor;
        if result.is_infinite() {
            return Err(SolveError::Overflow);
        }
        factor -= 1.0;
    }
    Ok(result)
}
