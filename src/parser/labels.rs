use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    multi::separated_list0,
    IResult,
};

use crate::config::LabelOptions;
use crate::parser::lexer::{named_string, ws};

/// Parse `labs(title: "..", x: "..", y: "..")`, any subset in any order
pub fn parse_labs(input: &str) -> IResult<&str, LabelOptions> {
    let (input, _) = ws(tag("labs"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(named_string("title"), |v| ("title", v)),
            map(named_string("x"), |v| ("x", v)),
            map(named_string("y"), |v| ("y", v)),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut labels = LabelOptions::default();
    for (key, val) in args {
        match key {
            "title" => labels.title = Some(val),
            "x" => labels.x = Some(val),
            "y" => labels.y = Some(val),
            _ => {}
        }
    }

    Ok((input, labels))
}
