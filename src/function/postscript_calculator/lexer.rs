use std::{borrow::Cow, io::Read};

use crate::{
    error::{PostScriptError, PostScriptResult},
    lex::{is_delimiter, is_whitespace, ScanBuffer},
};

use super::{classify::classify, operator::OperatorId, options::UnknownTokenPolicy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PostScriptFunctionToken {
    Number(f64),
    Boolean(bool),
    /// Includes the procedure braces, as `ProcedureStart` and `ProcedureEnd`
    Operator(OperatorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Skipping whitespace, looking for the start of a token
    Scanning,
    InNumber,
    InIdentifier,

    /// A token starting with `t` or `f`. Resolved once the token ends, since
    /// `truncate` and `floor` start the same way
    InBoolean,
    InStructural,
}

impl LexState {
    /// The state entered on the first byte of a token
    fn for_first_byte(b: u8) -> Self {
        match b {
            b'{' | b'}' => LexState::InStructural,
            b't' | b'f' => LexState::InBoolean,
            b if b < b'A' => LexState::InNumber,
            _ => LexState::InIdentifier,
        }
    }
}

/// Splits the body of a type 4 function into tokens, reading it through a
/// fixed size buffer
#[derive(Debug)]
pub(crate) struct PostScriptFunctionLexer<R> {
    source: ScanBuffer<R>,
    unknown_tokens: UnknownTokenPolicy,
}

impl<R: Read> PostScriptFunctionLexer<R> {
    pub fn new(reader: R, buffer_capacity: usize, unknown_tokens: UnknownTokenPolicy) -> Self {
        Self {
            source: ScanBuffer::with_capacity(reader, buffer_capacity),
            unknown_tokens,
        }
    }

    /// Returns `None` once the stream is exhausted. A token cut off by the end of
    /// the stream is still returned
    pub fn next_token(&mut self) -> PostScriptResult<Option<PostScriptFunctionToken>> {
        let mut state = LexState::Scanning;

        loop {
            let b = match self.source.peek_byte()? {
                Some(b) => b,
                None if state == LexState::Scanning => return Ok(None),
                None => return self.finish_token(state).map(Some),
            };

            if state == LexState::Scanning {
                if is_whitespace(b) {
                    self.source.advance();
                    continue;
                }

                self.source.start_token();
                self.source.advance();
                state = LexState::for_first_byte(b);

                if state == LexState::InStructural {
                    return self.finish_token(state).map(Some);
                }

                continue;
            }

            // the delimiter is left in the buffer to start the next token
            if is_whitespace(b) || is_delimiter(b) {
                return self.finish_token(state).map(Some);
            }

            self.source.advance();
        }
    }

    fn finish_token(&mut self, state: LexState) -> PostScriptResult<PostScriptFunctionToken> {
        let policy = self.unknown_tokens;
        let span = self.source.take_token();

        let token = match state {
            LexState::InStructural => PostScriptFunctionToken::Operator(classify(span)),
            LexState::InNumber => match lex_number(span) {
                Some(n) => PostScriptFunctionToken::Number(n),
                None => return malformed_number(policy, span),
            },
            LexState::InBoolean => match lex_boolean(span) {
                Some(b) => PostScriptFunctionToken::Boolean(b),
                None => lex_operator(policy, span)?,
            },
            LexState::InIdentifier => lex_operator(policy, span)?,
            LexState::Scanning => unreachable!("no token in progress"),
        };

        log::trace!("lexed {:?}", token);

        Ok(token)
    }
}

fn lex_number(span: &[u8]) -> Option<f64> {
    let digits = match span {
        [b'+', rest @ ..] if rest.first() != Some(&b'-') => rest,
        _ => span,
    };

    // `-inf` and `-nan` parse, but are not PostScript numbers
    fast_float::parse::<f64, _>(digits)
        .ok()
        .filter(|n| n.is_finite())
}

/// `true` and `false` are told apart from `truncate` and `floor` by length and
/// a couple of fixed offsets
fn lex_boolean(span: &[u8]) -> Option<bool> {
    match span.len() {
        4 if span[0] == b't' && span[1] == b'r' && span[3] == b'e' && span[2] == b'u' => {
            Some(true)
        }
        5 if span[0] == b'f' && span[1] == b'a' && span[4] == b'e' && span[2..4] == *b"ls" => {
            Some(false)
        }
        _ => None,
    }
}

fn lex_operator(
    policy: UnknownTokenPolicy,
    span: &[u8],
) -> PostScriptResult<PostScriptFunctionToken> {
    let op = classify(span);

    if op == OperatorId::NoOp {
        let name = String::from_utf8_lossy(span);

        match policy {
            UnknownTokenPolicy::Strict => anyhow::bail!(PostScriptError::Undefined {
                name: name.into_owned(),
            }),
            UnknownTokenPolicy::Lenient => log::warn!("ignoring unknown operator {:?}", name),
        }
    }

    Ok(PostScriptFunctionToken::Operator(op))
}

fn malformed_number(
    policy: UnknownTokenPolicy,
    span: &[u8],
) -> PostScriptResult<PostScriptFunctionToken> {
    let text = String::from_utf8_lossy(span);

    match policy {
        UnknownTokenPolicy::Strict => anyhow::bail!(PostScriptError::SyntaxError(Cow::Owned(
            format!("invalid number {:?}", text)
        ))),
        UnknownTokenPolicy::Lenient => {
            log::warn!("ignoring invalid number {:?}", text);
            Ok(PostScriptFunctionToken::Operator(OperatorId::NoOp))
        }
    }
}

impl<R: Read> Iterator for PostScriptFunctionLexer<R> {
    type Item = PostScriptResult<PostScriptFunctionToken>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
