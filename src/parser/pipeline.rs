// Pipeline parser for the style DSL: `command | command | ...`

use anyhow::{anyhow, Result};
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{eof, map, opt},
    multi::separated_list0,
    IResult,
};

use super::categories::{parse_order, parse_palette};
use super::labels::parse_labs;
use super::layout::{parse_margin, parse_padding, parse_size};
use super::lexer::ws;
use crate::config::{ChartOptions, LabelOptions, MarginOptions};

/// One parsed style command
#[derive(Debug, Clone, PartialEq)]
pub enum StyleCommand {
    Size(Option<u32>, Option<u32>),
    Margin(MarginOptions),
    Padding(f64),
    Palette(Vec<String>),
    Labels(LabelOptions),
    Order(Vec<String>),
}

fn parse_command(input: &str) -> IResult<&str, StyleCommand> {
    alt((
        map(parse_size, |(w, h)| StyleCommand::Size(w, h)),
        map(parse_margin, StyleCommand::Margin),
        map(parse_padding, StyleCommand::Padding),
        map(parse_palette, StyleCommand::Palette),
        map(parse_labs, StyleCommand::Labels),
        map(parse_order, StyleCommand::Order),
    ))(input)
}

/// Parse a complete style string
/// Format: command | command | ...
pub fn parse_commands(input: &str) -> IResult<&str, Vec<StyleCommand>> {
    // If input starts with "|", consume it
    let (input, _) = opt(ws(tag("|")))(input)?;

    let (input, commands) = separated_list0(ws(tag("|")), parse_command)(input)?;

    // Consume trailing whitespace and ensure end of input
    let (input, _) = ws(eof)(input)?;

    Ok((input, commands))
}

/// Parse a style string into chart overrides. Later commands win.
pub fn parse_style(input: &str) -> Result<ChartOptions> {
    let (_, commands) = parse_commands(input).map_err(|e| anyhow!("Invalid style '{}': {:?}", input, e))?;

    let options = commands
        .into_iter()
        .map(command_options)
        .fold(ChartOptions::default(), ChartOptions::merge);

    Ok(options)
}

fn command_options(command: StyleCommand) -> ChartOptions {
    match command {
        StyleCommand::Size(width, height) => ChartOptions { width, height, ..Default::default() },
        StyleCommand::Margin(margin) => ChartOptions { margin: Some(margin), ..Default::default() },
        StyleCommand::Padding(padding) => ChartOptions { padding: Some(padding), ..Default::default() },
        StyleCommand::Palette(colors) => ChartOptions { palette: Some(colors), ..Default::default() },
        StyleCommand::Labels(labels) => ChartOptions { labels: Some(labels), ..Default::default() },
        StyleCommand::Order(order) => ChartOptions { order: Some(order), ..Default::default() },
    }
}
