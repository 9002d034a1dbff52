use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::{Comparator, Outcome, StandardCondition};

use super::parser::{ParsedCondition, ParsedRule, ParsedRuleset};

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

fn ws1(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)?;
    ws(input)
}

// -- Identifiers ------------------------------------------------------------

/// Rule, condition and ruleset names. Dots are reserved for paths.
fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '-'
        }),
    )
        .take()
        .parse_next(input)
}

/// Attribute names may start with a digit.
fn attribute<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    })
    .parse_next(input)
}

fn path<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    (
        ident,
        cut_err(preceded('.', attribute)).context(StrContext::Expected(
            StrContextValue::Description("subject.attribute"),
        )),
    )
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any).parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = cut_err(any).parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt(one_of(['-', '+'])),
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .parse_next(input)
}

fn bool_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic())
        .verify(|s: &str| s == "true" || s == "false")
        .parse_next(input)
}

/// The literal a fact attribute is compared against, as text.
fn literal(input: &mut &str) -> ModalResult<String> {
    alt((
        string_literal,
        number_literal.map(str::to_owned),
        bool_literal.map(str::to_owned),
    ))
    .context(StrContext::Expected(StrContextValue::Description("literal")))
    .parse_next(input)
}

// -- Comparators & outcomes -------------------------------------------------

fn comparator(input: &mut &str) -> ModalResult<Comparator> {
    alt((
        alt((">=", "<=", "==", "!=", ">", "<")),
        (opt('!'), take_while(1.., |c: char| c.is_ascii_alphabetic())).take(),
    ))
    .try_map(str::parse::<Comparator>)
    .context(StrContext::Expected(StrContextValue::Description(
        "comparator",
    )))
    .parse_next(input)
}

/// `PASS`, `FAIL`, `ERROR`, or the name of a rule to redirect to.
fn outcome(input: &mut &str) -> ModalResult<Outcome> {
    ident
        .map(Outcome::from)
        .context(StrContext::Expected(StrContextValue::Description(
            "outcome",
        )))
        .parse_next(input)
}

// -- Conditions & rules -----------------------------------------------------

fn condition_def(input: &mut &str) -> ModalResult<ParsedCondition> {
    ws.parse_next(input)?;
    let name = ident.parse_next(input)?;
    ws.parse_next(input)?;
    ':'.parse_next(input)?;

    ws.parse_next(input)?;
    let (subject, attr) = cut_err(path).parse_next(input)?;
    ws.parse_next(input)?;
    let cmp = cut_err(comparator).parse_next(input)?;
    ws.parse_next(input)?;
    let lit = cut_err(literal).parse_next(input)?;

    let on_pass = opt(preceded((ws, "->", ws), cut_err(outcome))).parse_next(input)?;
    let on_fail = opt(preceded((ws, "else", ws1), cut_err(outcome))).parse_next(input)?;

    let mut check = StandardCondition::new(subject, attr, cmp, lit);
    if let Some(outcome) = on_pass {
        check = check.on_pass(outcome);
    }
    if let Some(outcome) = on_fail {
        check = check.on_fail(outcome);
    }

    Ok(ParsedCondition {
        name: name.to_owned(),
        check,
    })
}

fn rule_def(input: &mut &str) -> ModalResult<ParsedRule> {
    ws.parse_next(input)?;
    "rule".parse_next(input)?;
    ws1.parse_next(input)?;

    let name = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "rule name",
        )))
        .parse_next(input)?;

    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let conditions: Vec<ParsedCondition> = repeat(0.., condition_def).parse_next(input)?;

    Ok(ParsedRule {
        name: name.to_owned(),
        conditions,
    })
}

fn ruleset_header(input: &mut &str) -> ModalResult<String> {
    ws.parse_next(input)?;
    "ruleset".parse_next(input)?;
    ws1.parse_next(input)?;
    cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "ruleset name",
        )))
        .map(str::to_owned)
        .parse_next(input)
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_ruleset(input: &mut &str) -> ModalResult<ParsedRuleset> {
    let name = opt(ruleset_header).parse_next(input)?;
    let rules: Vec<ParsedRule> = repeat(0.., rule_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(ParsedRuleset { name, rules })
}
