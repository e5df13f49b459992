//! The brace grammar: `Name{parameter{child}{context}parameter{child}}`.
//!
//! The primitives are `nom` parsers over `&str` and slice their input
//! without allocating. Each returns the part it extracted plus whatever is
//! left to read, so callers can walk a list of sibling parameters left to
//! right.

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    combinator::{all_consuming, recognize, verify},
    multi::{many0, separated_list1},
    number::complete::double,
    sequence::{delimited, preceded},
    IResult,
};

use crate::{
    error::{GenError, GenResult},
    signal::Real,
};

/// Strip all whitespace.
pub fn scrub(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Strip all whitespace and lowercase. Used for matching names.
pub fn scrub_lower(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Format a number the way `%g` does with six significant digits: no
/// trailing zeros, no decimal point for integral values, scientific notation
/// for very small or very large magnitudes.
pub fn format_number(v: Real) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let sci = format!("{:.5e}", v);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (5 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, v)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Comma joined, no spaces.
pub fn format_list(values: &[Real]) -> String {
    values
        .iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(",")
}

/// A finite number. `nan` and `inf` are not accepted.
fn finite(input: &str) -> IResult<&str, Real> {
    verify(double, |v: &Real| v.is_finite())(input)
}

/// A single finite number, or `None`.
pub fn parse_number(s: &str) -> Option<Real> {
    all_consuming(finite)(s.trim()).ok().map(|(_, v)| v)
}

/// A comma separated list of numbers. A single number is a list of one.
pub fn parse_list(s: &str) -> Option<Vec<Real>> {
    all_consuming(separated_list1(char(','), finite))(s.trim())
        .ok()
        .map(|(_, vs)| vs)
}

/// Text up to the next brace.
fn plain(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c != '{' && c != '}')(input)
}

/// A balanced `{...}` block, yielding its body.
fn block(input: &str) -> IResult<&str, &str> {
    delimited(
        char('{'),
        recognize(many0(alt((plain, recognize(block))))),
        char('}'),
    )(input)
}

fn head(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == '{')(input)
}

/// Braces balance and never close more than they open.
pub fn is_well_formed(s: &str) -> bool {
    all_consuming(many0(alt((plain, block))))(s).is_ok()
}

fn unmatched(s: &str) -> GenError {
    GenError::parse("unmatched brace", s)
}

/// Everything before the first `{`, and the rest starting at that brace.
pub fn first_name(s: &str) -> (&str, &str) {
    match head(s) {
        Ok((rest, name)) => (name, rest),
        Err(_) => (s, ""),
    }
}

/// The body of the first balanced brace block, and what follows it. Without
/// any brace the body is empty and the input is returned untouched.
pub fn first_arguments(s: &str) -> GenResult<(&str, &str)> {
    if !s.contains('{') {
        return Ok(("", s));
    }
    let (rest, body) = preceded(head, block)(s).map_err(|_| unmatched(s))?;
    Ok((body, rest))
}

/// A context tag directly after the first brace block, and what follows it.
/// Without a tag the context is empty and the input is returned untouched.
pub fn first_context(s: &str) -> GenResult<(&str, &str)> {
    if !s.contains('{') {
        return Ok(("", s));
    }
    let (_, rest) = first_arguments(s)?;
    match tag_block(rest)? {
        Some((context, remainder)) => Ok((context, remainder)),
        None => Ok(("", s)),
    }
}

fn tag_block(s: &str) -> GenResult<Option<(&str, &str)>> {
    if !s.starts_with('{') {
        return Ok(None);
    }
    let (rest, body) = block(s).map_err(|_| unmatched(s))?;
    Ok(Some((body, rest)))
}

/// One `name{arguments}{context}` group and the text after it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Trio<'a> {
    pub name: &'a str,
    pub arguments: &'a str,
    pub context: &'a str,
    pub remainder: &'a str,
}

/// Split off the first parameter group of `s`.
pub fn first_trio(s: &str) -> GenResult<Trio<'_>> {
    let (name, braces) = first_name(s);
    if braces.is_empty() {
        return Ok(Trio {
            name,
            arguments: "",
            context: "",
            remainder: "",
        });
    }
    let (arguments, rest) = first_arguments(s)?;
    let (context, remainder) = tag_block(rest)?.unwrap_or(("", rest));
    Ok(Trio {
        name,
        arguments,
        context,
        remainder,
    })
}

/// Iterator over sibling parameter groups.
pub struct Trios<'a> {
    rest: &'a str,
}

pub fn trios(s: &str) -> Trios<'_> {
    Trios { rest: s }
}

impl<'a> Iterator for Trios<'a> {
    type Item = GenResult<Trio<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match first_trio(self.rest) {
            Ok(trio) => {
                self.rest = trio.remainder;
                Some(Ok(trio))
            }
            Err(e) => {
                self.rest = "";
                Some(Err(e))
            }
        }
    }
}
