// palette(...) and order(...): lists of string literals

use nom::{
    bytes::complete::tag,
    character::complete::char,
    sequence::delimited,
    IResult,
};

use crate::parser::lexer::{string_list, ws};

/// Parse `palette("#003366", "orange", ...)`
pub fn parse_palette(input: &str) -> IResult<&str, Vec<String>> {
    let (input, _) = ws(tag("palette"))(input)?;
    delimited(ws(char('(')), string_list, ws(char(')')))(input)
}

/// Parse `order("Facebook", "Instagram", ...)`
pub fn parse_order(input: &str) -> IResult<&str, Vec<String>> {
    let (input, _) = ws(tag("order"))(input)?;
    delimited(ws(char('(')), string_list, ws(char(')')))(input)
}
