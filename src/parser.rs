use crate::ast::{Arg, ParseResult};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Operator characters
// ---------------------------------------------------------------------------

/// Characters that may form operator tokens, alone or fused in pairs
/// (`&&`, `||`, `==`, `>=`, `<=`).
const OPERATOR_CHARS: &[char] = &['!', '&', '|', '>', '<', '=', '-', '+', '*', '/', '%'];

fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Parse a full expression string.
///
/// Text without a top-level call — no `(` at all, or a `(` as the very first
/// character — is returned as [`ParseResult::Raw`] for a backend to resolve.
/// Otherwise the text before the first `(` is the function name and the text
/// between it and the final `)` is split into arguments.
pub fn parse(expression: &str) -> Result<ParseResult, ParseError> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(ParseError::Empty);
    }
    match expression.find('(') {
        None | Some(0) => Ok(ParseResult::raw(expression)),
        Some(open) => {
            // The closing paren of the call must be the last character.
            if !expression.ends_with(')') {
                return Err(ParseError::Unterminated(')'));
            }
            let name = expression[..open].trim();
            let inner = &expression[open + 1..expression.len() - 1];
            Ok(ParseResult::func(name, parse_args(inner)?))
        }
    }
}

// ---------------------------------------------------------------------------
// Argument segmenter
// ---------------------------------------------------------------------------

/// Scanner state for one position inside an argument list.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// Between segments; skipping whitespace and commas.
    Idle,
    /// Unquoted, unparenthesized text; becomes a call candidate if a `(`
    /// appears before the segment closes.
    Plain { start: usize },
    /// Inside a quoted literal; `start` is the opening quote.
    Quoted { start: usize },
    /// Inside a parenthesized region; `start` is the segment start, which
    /// precedes the `(` when a name came first. Quotes are not tracked in
    /// here; the nested `parse` call sees them instead.
    Parens { start: usize, depth: usize },
}

/// Split the comma-separated argument list of a call into classified [`Arg`]s.
/// Quoted strings and parenthesized regions are atomic: commas inside them
/// never split.
fn parse_args(inner: &str) -> Result<Vec<Arg>, ParseError> {
    let mut results: Vec<Arg> = Vec::new();
    // Index into `results` of the value a later operator prefix may fuse
    // onto. Reset at every comma boundary, kept across segment closes that
    // happen inside the same comma group.
    let mut last: Option<usize> = None;
    let mut state = State::Idle;

    for (i, c) in inner.char_indices() {
        state = match state {
            State::Idle => match c {
                ',' => {
                    last = None;
                    State::Idle
                }
                '\'' => State::Quoted { start: i },
                '(' => State::Parens { start: i, depth: 1 },
                c if c.is_whitespace() => State::Idle,
                _ => State::Plain { start: i },
            },
            State::Plain { start } => match c {
                ',' => {
                    classify(&mut results, last, &inner[start..i], Candidate::Raw)?;
                    last = None;
                    State::Idle
                }
                '(' => State::Parens { start, depth: 1 },
                '\'' => {
                    return Err(ParseError::AmbiguousSegment(
                        inner[start..=i].trim().to_string(),
                    ));
                }
                _ => State::Plain { start },
            },
            State::Quoted { start } => match c {
                '\'' => {
                    last = classify(
                        &mut results,
                        last,
                        &inner[start + 1..i],
                        Candidate::Constant,
                    )?;
                    State::Idle
                }
                _ => State::Quoted { start },
            },
            State::Parens { start, depth } => match c {
                '(' => State::Parens { start, depth: depth + 1 },
                ')' if depth == 1 => {
                    last = classify(&mut results, last, &inner[start..=i], Candidate::Call)?;
                    State::Idle
                }
                ')' => State::Parens { start, depth: depth - 1 },
                _ => State::Parens { start, depth },
            },
        };
    }

    match state {
        State::Idle => {}
        State::Plain { start } => {
            classify(&mut results, last, &inner[start..], Candidate::Raw)?;
        }
        State::Quoted { .. } => return Err(ParseError::Unterminated('\'')),
        State::Parens { .. } => return Err(ParseError::Unterminated(')')),
    }

    Ok(results)
}

// ---------------------------------------------------------------------------
// Node classifier
// ---------------------------------------------------------------------------

/// What the segmenter saw when the segment closed.
enum Candidate {
    /// Quoted literal, quotes already stripped.
    Constant,
    /// The segment contains a parenthesized region.
    Call,
    /// Plain token closed by a comma or end of text.
    Raw,
}

/// Turn one closed segment into an [`Arg`], appending to `results` or fusing
/// into the group's previous argument. Returns the index of the argument a
/// subsequent operator prefix in the same comma group may fuse onto.
fn classify(
    results: &mut Vec<Arg>,
    last: Option<usize>,
    text: &str,
    candidate: Candidate,
) -> Result<Option<usize>, ParseError> {
    let arg = match candidate {
        Candidate::Constant => Arg::Constant(text.to_string()),
        Candidate::Raw => Arg::Raw(text.trim().to_string()),
        Candidate::Call => {
            let open = text.find('(').unwrap_or(0);
            let head = text[..open].trim();
            if !head.is_empty() && head.chars().all(|c| is_operator_char(c) || c.is_whitespace())
            {
                // Not a call at all: an operator expression such as `a>(b)`
                // seen from its operator onward. Left for the backend.
                Arg::Raw(text.trim().to_string())
            } else if head.starts_with(is_operator_char) {
                // Operator-prefixed call: fuse into the group's chain.
                return fuse(results, last, text);
            } else {
                // Ordinary call name (or none at all, for a parenthesized
                // sub-expression): recurse.
                Arg::Call(parse(text)?)
            }
        }
    };

    // At most one primary value per comma group; a second one has nothing
    // to attach to and is rejected instead of silently replacing the first.
    if last.is_some() {
        return Err(ParseError::AmbiguousSegment(text.trim().to_string()));
    }
    results.push(arg);
    Ok(Some(results.len() - 1))
}

/// Merge an operator-prefixed call (`!contains(...)`, `&& f(...)`) into the
/// comma group: extend the previous call/chain in place, or start a fresh
/// chain when the operators open the group.
fn fuse(
    results: &mut Vec<Arg>,
    last: Option<usize>,
    text: &str,
) -> Result<Option<usize>, ParseError> {
    let (operators, consumed) = extract_operators(text);
    let nested = parse(text[consumed..].trim())?;

    let mut addition: Vec<Arg> = operators.into_iter().map(Arg::Operator).collect();
    addition.push(Arg::Call(nested));

    match last {
        Some(idx) => {
            match &mut results[idx] {
                Arg::Call(_) => {
                    // Promote the bare call into a chain, then extend it.
                    let prev = std::mem::replace(&mut results[idx], Arg::OperatorChain(Vec::new()));
                    let mut chain = Vec::with_capacity(addition.len() + 1);
                    chain.push(prev);
                    chain.append(&mut addition);
                    results[idx] = Arg::OperatorChain(chain);
                }
                Arg::OperatorChain(chain) => chain.append(&mut addition),
                _ => {
                    return Err(ParseError::AmbiguousSegment(text.trim().to_string()));
                }
            }
            Ok(Some(idx))
        }
        None => {
            results.push(Arg::OperatorChain(addition));
            Ok(Some(results.len() - 1))
        }
    }
}

// ---------------------------------------------------------------------------
// Operator extractor
// ---------------------------------------------------------------------------

/// Split the leading operator characters of `text` into operator tokens,
/// fusing doubled characters (`&&`, `||`, `==`, ...) and `<=`/`>=` pairs.
/// Whitespace between operators is skipped without flushing a pending
/// character. Returns the tokens in source order and the byte index of the
/// first unconsumed character.
pub fn extract_operators(text: &str) -> (Vec<String>, usize) {
    let mut operators = Vec::new();
    let mut pending: Option<char> = None;

    for (i, c) in text.char_indices() {
        if is_operator_char(c) {
            match pending {
                None => pending = Some(c),
                Some(p) => {
                    if p == c || (c == '=' && (p == '<' || p == '>')) {
                        operators.push(format!("{}{}", p, c));
                        pending = None;
                    } else {
                        operators.push(p.to_string());
                        pending = Some(c);
                    }
                }
            }
        } else if !c.is_whitespace() {
            if let Some(p) = pending {
                operators.push(p.to_string());
            }
            return (operators, i);
        }
    }

    if let Some(p) = pending {
        operators.push(p.to_string());
    }
    (operators, text.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn func_args(result: &ParseResult) -> &[Arg] {
        match result {
            ParseResult::Func { args, .. } => args,
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn simple_call_keeps_argument_order() {
        let result = parse("f(a,b,c)").unwrap();
        assert_eq!(
            result,
            ParseResult::func(
                "f",
                vec![
                    Arg::Raw("a".into()),
                    Arg::Raw("b".into()),
                    Arg::Raw("c".into()),
                ]
            )
        );
    }

    #[test]
    fn empty_expression_is_rejected() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn text_without_call_stays_raw() {
        assert_eq!(parse("a>b").unwrap(), ParseResult::raw("a>b"));
        assert_eq!(parse("someVar").unwrap(), ParseResult::raw("someVar"));
    }

    #[test]
    fn leading_paren_stays_raw() {
        assert_eq!(parse("(a>b-a)").unwrap(), ParseResult::raw("(a>b-a)"));
    }

    #[test]
    fn operator_tokens_inside_argument_stay_raw() {
        let result = parse("println(a+b)").unwrap();
        assert_eq!(
            result,
            ParseResult::func("println", vec![Arg::Raw("a+b".into())])
        );
    }

    #[test]
    fn comparison_arguments_stay_raw() {
        let result = parse("ifs(a>b,c,a1>b1,c1)").unwrap();
        assert_eq!(
            result,
            ParseResult::func(
                "ifs",
                vec![
                    Arg::Raw("a>b".into()),
                    Arg::Raw("c".into()),
                    Arg::Raw("a1>b1".into()),
                    Arg::Raw("c1".into()),
                ]
            )
        );
    }

    #[test]
    fn constant_strips_quotes_exactly_once() {
        let result = parse("f('literal text')").unwrap();
        assert_eq!(func_args(&result), &[Arg::Constant("literal text".into())]);

        // Commas and parens inside a quoted literal never split.
        let result = parse("f('a,b(c')").unwrap();
        assert_eq!(func_args(&result), &[Arg::Constant("a,b(c".into())]);
    }

    #[test]
    fn nested_calls_parse_to_nested_results() {
        let result = parse("print(toJson(date_format(date,noArg())))").unwrap();
        let to_json = match func_args(&result) {
            [Arg::Call(inner)] => inner,
            other => panic!("unexpected args: {:?}", other),
        };
        let date_format = match to_json {
            ParseResult::Func { name, args } if name == "toJson" => match args.as_slice() {
                [Arg::Call(inner)] => inner,
                other => panic!("unexpected args: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        };
        match date_format {
            ParseResult::Func { name, args } if name == "date_format" => {
                assert_eq!(args[0], Arg::Raw("date".into()));
                assert_eq!(args[1], Arg::Call(ParseResult::func("noArg", vec![])));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn call_without_arguments_has_empty_args() {
        assert_eq!(parse("noArg()").unwrap(), ParseResult::func("noArg", vec![]));
    }

    #[test]
    fn whitespace_between_arguments_is_skipped() {
        let result = parse("f( a , 'b' )").unwrap();
        assert_eq!(
            func_args(&result),
            &[Arg::Raw("a".into()), Arg::Constant("b".into())]
        );
    }

    #[test]
    fn operator_prefix_fuses_into_a_chain() {
        let result = parse("f(!contains(a,'x'))").unwrap();
        assert_eq!(
            func_args(&result),
            &[Arg::OperatorChain(vec![
                Arg::Operator("!".into()),
                Arg::Call(ParseResult::func(
                    "contains",
                    vec![Arg::Raw("a".into()), Arg::Constant("x".into())]
                )),
            ])]
        );
    }

    #[test]
    fn chain_extends_across_segments_in_one_group() {
        let result = parse("print(contains(a,'x') && contains(b,'b'))").unwrap();
        match func_args(&result) {
            [Arg::OperatorChain(chain)] => {
                assert_eq!(chain.len(), 3);
                assert!(matches!(&chain[0], Arg::Call(ParseResult::Func { name, .. }) if name == "contains"));
                assert_eq!(chain[1], Arg::Operator("&&".into()));
                assert!(matches!(&chain[2], Arg::Call(ParseResult::Func { name, .. }) if name == "contains"));
            }
            other => panic!("expected one chain, got {:?}", other),
        }
    }

    #[test]
    fn parenthesized_subexpression_nests_as_raw() {
        let result = parse("ifs((a>b-a),(c1-c))").unwrap();
        assert_eq!(
            func_args(&result),
            &[
                Arg::Call(ParseResult::raw("(a>b-a)")),
                Arg::Call(ParseResult::raw("(c1-c)")),
            ]
        );
    }

    #[test]
    fn comma_resets_the_fusion_group() {
        // The second group starts fresh: its chain does not touch foo's.
        let result = parse("f(foo(), !bar())").unwrap();
        assert_eq!(func_args(&result).len(), 2);
        assert!(matches!(func_args(&result)[1], Arg::OperatorChain(_)));
    }

    #[test]
    fn unbalanced_call_is_a_parse_error() {
        assert_eq!(parse("f(a,b"), Err(ParseError::Unterminated(')')));
        assert_eq!(parse("f(g(a)"), Err(ParseError::Unterminated(')')));
    }

    #[test]
    fn unterminated_literal_is_a_parse_error() {
        assert_eq!(parse("f('abc"), Err(ParseError::Unterminated('\'')));
    }

    #[test]
    fn two_primaries_in_one_group_are_ambiguous() {
        assert!(matches!(
            parse("f('a' 'b')"),
            Err(ParseError::AmbiguousSegment(_))
        ));
        assert!(matches!(
            parse("f(foo() bar())"),
            Err(ParseError::AmbiguousSegment(_))
        ));
    }

    #[test]
    fn operator_prefix_on_a_constant_is_ambiguous() {
        assert!(matches!(
            parse("f('a' !foo())"),
            Err(ParseError::AmbiguousSegment(_))
        ));
    }

    #[test]
    fn extract_fuses_two_character_operators() {
        for op in [">=", "==", "&&", "||", "<="] {
            let (tokens, consumed) = extract_operators(op);
            assert_eq!(tokens, vec![op.to_string()], "operator {}", op);
            assert_eq!(consumed, 2);
        }
    }

    #[test]
    fn extract_stops_at_the_first_name_character() {
        let (tokens, consumed) = extract_operators(">b");
        assert_eq!(tokens, vec![">".to_string()]);
        assert_eq!(consumed, 1);

        let (tokens, consumed) = extract_operators("&&contains(b,'b')");
        assert_eq!(tokens, vec!["&&".to_string()]);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn extract_skips_whitespace_without_flushing() {
        let (tokens, consumed) = extract_operators("|| ! false");
        assert_eq!(tokens, vec!["||".to_string(), "!".to_string()]);
        assert_eq!(consumed, 5);
    }

    #[test]
    fn extract_splits_unrelated_neighbours() {
        let (tokens, consumed) = extract_operators("!-abs(x)");
        assert_eq!(tokens, vec!["!".to_string(), "-".to_string()]);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn deeply_nested_calls_are_bounded_only_by_input() {
        let mut expr = String::from("x");
        for _ in 0..64 {
            expr = format!("f({})", expr);
        }
        let mut node = parse(&expr).unwrap();
        let mut depth = 0;
        loop {
            match node {
                ParseResult::Func { name, mut args } => {
                    assert_eq!(name, "f");
                    depth += 1;
                    match args.pop() {
                        Some(Arg::Call(inner)) => node = inner,
                        Some(Arg::Raw(token)) => {
                            assert_eq!(token, "x");
                            break;
                        }
                        other => panic!("unexpected arg: {:?}", other),
                    }
                }
                other => panic!("unexpected node: {:?}", other),
            }
        }
        assert_eq!(depth, 64);
    }
}
