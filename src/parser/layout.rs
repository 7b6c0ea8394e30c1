// size(...), margin(...) and padding(...)

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    multi::separated_list0,
    sequence::delimited,
    IResult,
};

use crate::config::MarginOptions;
use crate::parser::lexer::{named_number, number_literal, ws};

/// Parse `size(width: N, height: N)`, either argument optional
pub fn parse_size(input: &str) -> IResult<&str, (Option<u32>, Option<u32>)> {
    let (input, _) = ws(tag("size"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(named_number("width"), |v| ("width", v)),
            map(named_number("height"), |v| ("height", v)),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut size = (None, None);
    for (key, val) in args {
        let pixels = val.max(1.0).round() as u32;
        match key {
            "width" => size.0 = Some(pixels),
            "height" => size.1 = Some(pixels),
            _ => {}
        }
    }

    Ok((input, size))
}

/// Parse `margin(top: N, right: N, bottom: N, left: N)`, any subset
pub fn parse_margin(input: &str) -> IResult<&str, MarginOptions> {
    let (input, _) = ws(tag("margin"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(named_number("top"), |v| ("top", v)),
            map(named_number("right"), |v| ("right", v)),
            map(named_number("bottom"), |v| ("bottom", v)),
            map(named_number("left"), |v| ("left", v)),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut margin = MarginOptions::default();
    for (key, val) in args {
        match key {
            "top" => margin.top = Some(val),
            "right" => margin.right = Some(val),
            "bottom" => margin.bottom = Some(val),
            "left" => margin.left = Some(val),
            _ => {}
        }
    }

    Ok((input, margin))
}

/// Parse `padding(P)`
pub fn parse_padding(input: &str) -> IResult<&str, f64> {
    let (input, _) = ws(tag("padding"))(input)?;
    delimited(ws(char('(')), ws(number_literal), ws(char(')')))(input)
}
