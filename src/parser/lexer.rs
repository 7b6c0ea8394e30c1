// Lexer utilities for the style DSL

use nom::{
    bytes::complete::{tag, take_while},
    character::complete::{char, multispace0},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded},
    IResult,
};

/// Parse and consume surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a string literal
/// Format: "..." (may be empty, no escapes)
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let (input, content) = delimited(char('"'), take_while(|c| c != '"'), char('"'))(input)?;
    Ok((input, content.to_string()))
}

/// Parse a number literal (integer or float)
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// Parse `name: <number>`
pub fn named_number<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, f64> {
    preceded(ws(tag(name)), preceded(ws(char(':')), ws(number_literal)))
}

/// Parse `name: "<string>"`
pub fn named_string<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    preceded(ws(tag(name)), preceded(ws(char(':')), ws(string_literal)))
}

/// Parse `"a", "b", ...` with at least one entry
pub fn string_list(input: &str) -> IResult<&str, Vec<String>> {
    separated_list1(ws(char(',')), ws(string_literal))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal(r#""Instagram""#), Ok(("", "Instagram".to_string())));
        assert_eq!(string_literal(r##""#003366""##), Ok(("", "#003366".to_string())));
        assert_eq!(string_literal(r#""""#), Ok(("", String::new())));
    }

    #[test]
    fn test_string_literal_unclosed() {
        assert!(string_literal(r#""hello"#).is_err());
        assert!(string_literal(r#"hello""#).is_err());
    }

    #[test]
    fn test_number_literal() {
        assert_eq!(number_literal("42"), Ok(("", 42.0)));
        assert_eq!(number_literal("0.3"), Ok(("", 0.3)));
        assert_eq!(number_literal("-3.5"), Ok(("", -3.5)));
    }

    #[test]
    fn test_ws() {
        let mut parser = ws(tag("size"));
        assert_eq!(parser("  size  "), Ok(("", "size")));
        assert_eq!(parser("\n\tsize\t\n"), Ok(("", "size")));
    }

    #[test]
    fn test_named_values() {
        assert_eq!(named_number("width")("width: 800"), Ok(("", 800.0)));
        assert_eq!(named_number("top")(" top :30 "), Ok(("", 30.0)));
        assert!(named_number("width")("height: 800").is_err());
        assert_eq!(named_string("x")(r#"x: "Platform""#), Ok(("", "Platform".to_string())));
    }

    #[test]
    fn test_string_list() {
        assert_eq!(
            string_list(r#""a", "b" ,"c""#),
            Ok(("", vec!["a".to_string(), "b".to_string(), "c".to_string()]))
        );
        assert!(string_list("").is_err());
    }
}
