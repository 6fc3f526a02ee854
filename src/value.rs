//! Typed values and the converters that produce them from argv tokens.

use std::fmt;
use std::ops::{Add, Div, Mul};
use std::str::FromStr;

/// A complex number with `f64` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Modulus.
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Phase angle in radians.
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Self::new(re, 0.0)
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div<f64> for Complex {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.re / rhs, self.im / rhs)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{}-{}j", self.re, -self.im)
        } else {
            write!(f, "{}+{}j", self.re, self.im)
        }
    }
}

impl FromStr for Complex {
    type Err = String;

    /// Accepts `a`, `bj`, `a+bj` and `a-bj`. The imaginary unit is `j`; `4i` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid complex value: '{s}'");
        let text = s.trim();
        if text.is_empty() {
            return Err(invalid());
        }

        let Some(body) = text.strip_suffix('j') else {
            return text.parse::<f64>().map(Self::from).map_err(|_| invalid());
        };

        // Split at the last sign that is not the leading one or an exponent sign.
        let split = body
            .char_indices()
            .filter(|&(idx, c)| {
                idx > 0
                    && (c == '+' || c == '-')
                    && !body[..idx].ends_with(['e', 'E'])
            })
            .map(|(idx, _)| idx)
            .last();

        let (re, im) = match split {
            Some(idx) => (&body[..idx], &body[idx..]),
            None => ("0", body),
        };

        let re = re.parse::<f64>().map_err(|_| invalid())?;
        let im = match im {
            "" | "+" => 1.0,
            "-" => -1.0,
            other => other.parse::<f64>().map_err(|_| invalid())?,
        };
        Ok(Self::new(re, im))
    }
}

/// A parsed argument value or a declared default.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// True only for `Bool(false)`, the default that turns a keyword into a flag.
    pub fn is_false(&self) -> bool {
        matches!(self, Value::Bool(false))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Integers and floats widen to complex numbers.
    pub fn as_complex(&self) -> Option<Complex> {
        match self {
            Value::Complex(z) => Some(*z),
            other => other.as_float().map(Complex::from),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Name of the runtime type, as used in help text.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "str",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            // Debug keeps the fractional part: 1.0 rather than 1.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Complex(z) => write!(f, "{z}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Complex> for Value {
    fn from(z: Complex) -> Self {
        Value::Complex(z)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Parses one argv token.
pub type ParseFn = fn(&str) -> Result<Value, String>;

/// A named string-to-value conversion.
///
/// The name is what help text shows (`float. Default: 1.0`), so two
/// converters are considered equal when their names match.
#[derive(Clone, Copy)]
pub struct Converter {
    name: &'static str,
    parse: ParseFn,
}

impl Converter {
    pub const INT: Converter = Converter::new("int", parse_int);
    pub const FLOAT: Converter = Converter::new("float", parse_float);
    pub const COMPLEX: Converter = Converter::new("complex", parse_complex);
    pub const STR: Converter = Converter::new("str", parse_str);
    pub const BOOL: Converter = Converter::new("bool", parse_bool);

    pub const fn new(name: &'static str, parse: ParseFn) -> Self {
        Self { name, parse }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        (self.parse)(raw)
    }

    /// Implicit converter inferred from a default's runtime type.
    ///
    /// | default   | converter |
    /// |-----------|-----------|
    /// | `Bool`    | `bool`    |
    /// | `Int`     | `int`     |
    /// | `Float`   | `float`   |
    /// | `Complex` | `complex` |
    /// | `Str`     | `str`     |
    /// | `None`    | none      |
    /// | `List`    | none      |
    pub fn for_default(value: &Value) -> Option<Converter> {
        match value {
            Value::Bool(_) => Some(Self::BOOL),
            Value::Int(_) => Some(Self::INT),
            Value::Float(_) => Some(Self::FLOAT),
            Value::Complex(_) => Some(Self::COMPLEX),
            Value::Str(_) => Some(Self::STR),
            Value::None | Value::List(_) => None,
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Converter").field(&self.name).finish()
    }
}

impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

fn parse_int(raw: &str) -> Result<Value, String> {
    raw.trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| format!("invalid int value: '{raw}'"))
}

fn parse_float(raw: &str) -> Result<Value, String> {
    raw.trim()
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|_| format!("invalid float value: '{raw}'"))
}

fn parse_complex(raw: &str) -> Result<Value, String> {
    raw.parse::<Complex>().map(Value::Complex)
}

fn parse_str(raw: &str) -> Result<Value, String> {
    Ok(Value::Str(raw.to_string()))
}

fn parse_bool(raw: &str) -> Result<Value, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
        "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
        _ => Err(format!("invalid bool value: '{raw}'")),
    }
}
