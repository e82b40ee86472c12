use std::str::FromStr;

use winnow::ascii::{dec_uint, float, till_line_ending, Caseless};
use winnow::combinator::{
    alt, cut_err, delimited, fail, not, preceded, repeat, separated, terminated,
};
use winnow::error::{ContextError, ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::{Condition, GasType, SimpleRule, SpectrType, StarType, VeinType};

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_word_char).parse_next(input)
}

/// A case-insensitive keyword that is not the prefix of a longer word.
fn keyword<'i>(kw: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    terminated(Caseless(kw), not(one_of(is_word_char)))
}

// -- Operands ---------------------------------------------------------------

fn number(input: &mut &str) -> ModalResult<f64> {
    ws.parse_next(input)?;
    float
        .context(StrContext::Expected(StrContextValue::Description("number")))
        .parse_next(input)
}

fn enum_name<T>(input: &mut &str) -> ModalResult<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    ws.parse_next(input)?;
    word.try_map(str::parse::<T>).parse_next(input)
}

/// `(Name)` argument of the vein and gas rules.
fn argument<T>(input: &mut &str) -> ModalResult<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    delimited((ws, '('), enum_name::<T>, (ws, ')')).parse_next(input)
}

/// `in [A, B, ...]` set operand.
fn set<T>(input: &mut &str) -> ModalResult<Vec<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    (ws, keyword("in"), ws, '[').parse_next(input)?;
    let items: Vec<T> = separated(0.., enum_name::<T>, (ws, ',')).parse_next(input)?;
    (ws, ']').parse_next(input)?;
    Ok(items)
}

fn range(input: &mut &str) -> ModalResult<(f64, f64)> {
    (ws, keyword("between"), ws, '(').parse_next(input)?;
    let low = cut_err(number).parse_next(input)?;
    cut_err((ws, ',')).parse_next(input)?;
    let high = cut_err(number).parse_next(input)?;
    cut_err((ws, ')')).parse_next(input)?;
    Ok((low, high))
}

// -- Conditions -------------------------------------------------------------

fn condition(input: &mut &str) -> ModalResult<Condition> {
    ws.parse_next(input)?;
    alt((
        preceded((keyword("not"), ws), cut_err(range)).map(|(a, b)| Condition::not_between(a, b)),
        range.map(|(a, b)| Condition::between(a, b)),
        preceded(">=", cut_err(number)).map(Condition::gte),
        preceded("<=", cut_err(number)).map(Condition::lte),
        preceded("==", cut_err(number)).map(Condition::eq),
        preceded("!=", cut_err(number)).map(Condition::neq),
        preceded('>', cut_err(number)).map(Condition::gt),
        preceded('<', cut_err(number)).map(Condition::lt),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "condition",
    )))
    .parse_next(input)
}

// -- Rules ------------------------------------------------------------------

fn ocean_id(input: &mut &str) -> ModalResult<u32> {
    (ws, "==", ws).parse_next(input)?;
    dec_uint
        .context(StrContext::Expected(StrContextValue::Description(
            "ocean item id",
        )))
        .parse_next(input)
}

fn simple_rule(input: &mut &str) -> ModalResult<SimpleRule> {
    ws.parse_next(input)?;
    let name = word
        .context(StrContext::Expected(StrContextValue::Description("rule")))
        .parse_next(input)?;
    match name {
        "none" => Ok(SimpleRule::Unset),
        "luminosity" => cut_err(condition)
            .map(|condition| SimpleRule::Luminosity { condition })
            .parse_next(input),
        "dyson_radius" => cut_err(condition)
            .map(|condition| SimpleRule::DysonRadius { condition })
            .parse_next(input),
        "avg_vein_amount" => cut_err((argument::<VeinType>, condition))
            .map(|(vein, condition)| SimpleRule::AverageVeinAmount { vein, condition })
            .parse_next(input),
        "avg_vein_patch" => cut_err((argument::<VeinType>, condition))
            .map(|(vein, condition)| SimpleRule::AverageVeinPatch { vein, condition })
            .parse_next(input),
        "spectr" => cut_err(set::<SpectrType>)
            .map(|spectr| SimpleRule::Spectr { spectr })
            .parse_next(input),
        "tidal_lock_count" => cut_err(condition)
            .map(|condition| SimpleRule::TidalLockCount { condition })
            .parse_next(input),
        "ocean_type" => cut_err(ocean_id)
            .map(|ocean_type| SimpleRule::OceanType { ocean_type })
            .parse_next(input),
        "star_type" => cut_err(set::<StarType>)
            .map(|star_type| SimpleRule::StarType { star_type })
            .parse_next(input),
        "gas_count" => cut_err((argument::<GasType>, condition))
            .map(|(gas, condition)| SimpleRule::GasCount { gas, condition })
            .parse_next(input),
        "satellite_count" => cut_err(condition)
            .map(|condition| SimpleRule::SatelliteCount { condition })
            .parse_next(input),
        "birth" => cut_err(condition)
            .map(|condition| SimpleRule::Birth { condition })
            .parse_next(input),
        _ => cut_err(fail)
            .context(StrContext::Expected(StrContextValue::Description(
                "rule keyword",
            )))
            .parse_next(input),
    }
}

fn group(input: &mut &str) -> ModalResult<Vec<SimpleRule>> {
    separated(1.., simple_rule, (ws, keyword("OR"))).parse_next(input)
}

// -- Top-level parser -------------------------------------------------------

/// Conjunction of disjunctive groups. `OR` binds tighter than `AND`.
pub fn parse_groups(input: &mut &str) -> ModalResult<Vec<Vec<SimpleRule>>> {
    ws.parse_next(input)?;
    let groups: Vec<Vec<SimpleRule>> =
        separated(0.., group, (ws, keyword("AND"))).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(groups)
}
