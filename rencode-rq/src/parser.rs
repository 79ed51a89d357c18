use nom::{
    character::complete::{char, digit1, none_of, one_of},
    Finish,
    IResult,
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    branch::alt,
    bytes::complete::{tag, take_while, escaped_transform},
};
use rencode::Value;
use anyhow::{anyhow, Result};
use num_bigint::BigInt;
use std::borrow::Cow;

const WHITESPACE: &str = " \t\r\n";

fn white(i: &str) -> IResult<&str, &str> {
    take_while(move |c| WHITESPACE.contains(c))(i)
}

fn keyword(i: &str) -> IResult<&str, Value<'static>> {
    alt((
            value(Value::Null, tag("null")),
            value(Value::Bool(true), tag("true")),
            value(Value::Bool(false), tag("false")),
    ))(i)
}

/// Anything `Display` produces for floats, which never uses an exponent but may be infinite or NaN
fn float(i: &str) -> IResult<&str, &str> {
    recognize(tuple((
            opt(char('-')),
            alt((
                    tag("inf"),
                    tag("NaN"),
                    recognize(tuple((
                            digit1,
                            opt(pair(char('.'), digit1)),
                            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1)))))),
            )),
    )))(i)
}

fn float32(i: &str) -> IResult<&str, f32> {
    map_res(preceded(tag("$"), float), |n| n.parse())(i)
}

fn float64(i: &str) -> IResult<&str, f64> {
    map_res(preceded(tag("$$"), float), |n| n.parse())(i)
}

fn int(i: &str) -> IResult<&str, BigInt> {
    map_res(recognize(pair(opt(char('-')), digit1)), |n: &str| n.parse())(i)
}

fn b64(i: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=')(i)
}

fn bytes(i: &str) -> IResult<&str, Vec<u8>> {
    map_res(delimited(char('\''), b64, char('\'')), |b: &str| base64::decode(b))(i)
}

fn string(i: &str) -> IResult<&str, String> {
    delimited(
            tag("\""),
            map(opt(escaped_transform(
                none_of("\\\""),
                '\\',
                alt((
                        value("\\", tag("\\")),
                        value("\"", tag("\"")),
                        value("\n", tag("n")),
                )))), |c| c.unwrap_or_default()),
            tag("\"")
    )(i)
}

/// Lists and dicts may carry a comma after their last entry
fn entries<'a, O, F>(open: char, entry: F, close: char) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<O>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(
        char(open),
        terminated(separated_list0(preceded(white, char(',')), entry), opt(preceded(white, char(',')))),
        preceded(white, char(close)),
    )
}

fn list(i: &str) -> IResult<&str, Vec<Value<'static>>> {
    entries('[', rq_value, ']')(i)
}

fn dict(i: &str) -> IResult<&str, Vec<(Value<'static>, Value<'static>)>> {
    entries('{', separated_pair(rq_value, preceded(white, char(':')), rq_value), '}')(i)
}

fn rq_value(i: &str) -> IResult<&str, Value<'static>> {
    preceded(white, alt((
        map(string, |s| Value::Str(Cow::Owned(s))),
        map(bytes, |b| Value::Bytes(Cow::Owned(b))),
        map(list, Value::List),
        map(dict, Value::Dict),
        map(float64, Value::F64),
        map(float32, Value::F32),
        map(int, Value::Int),
        keyword,
    )))(i)
}

/// Parses the textual representation of a value as produced by its `Display` implementation.
pub fn parse(i: &str) -> Result<Value<'static>> {
    Ok(all_consuming(terminated(rq_value, white))(i).finish().map_err(|e| anyhow!("{}", e))?.1)
}
