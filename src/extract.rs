//! Extraction of the JSON payloads understat embeds in inline scripts as
//! `var data = JSON.parse('<js-escaped json>');`.

use serde_json::Value;
use swc_common::{FileName, SourceMap, sync::Lrc};
use swc_ecma_ast::{Expr, Lit};
use swc_ecma_parser::{Parser, StringInput, Syntax, lexer::Lexer};

use crate::ScrapeError;

/// Zero-based script positions as laid out by the site. A layout change
/// on understat means updating these and nothing else.
pub const MATCH_SHOTS_SCRIPT: usize = 1;
pub const SEASON_TEAMS_SCRIPT: usize = 2;
pub const SEASON_PLAYERS_SCRIPT: usize = 3;

const OPEN: &str = "('";
const CLOSE: &str = "')";

/// Extracts the payload from the script at `index`.
pub fn extract_at(scripts: &[String], index: usize) -> Result<Value, ScrapeError> {
    let script = scripts.get(index).ok_or_else(|| {
        ScrapeError::malformed(format!(
            "expected a script at position {index}, page has {}",
            scripts.len()
        ))
    })?;
    extract_embedded_json(script)
}

/// Slices the first `('...')` literal out of `script`, decodes it as a
/// JavaScript string and parses the result as JSON.
pub fn extract_embedded_json(script: &str) -> Result<Value, ScrapeError> {
    let literal = embedded_literal(script)?;
    let json = decode_js_string(literal)?;
    serde_json::from_str(&json)
        .map_err(|err| ScrapeError::malformed(format!("embedded literal is not json: {err}")))
}

fn embedded_literal(script: &str) -> Result<&str, ScrapeError> {
    let start = script
        .find(OPEN)
        .ok_or_else(|| ScrapeError::malformed("no `('` delimiter in script"))?
        + OPEN.len();
    let len = script[start..]
        .find(CLOSE)
        .ok_or_else(|| ScrapeError::malformed("no `')` delimiter after `('`"))?;
    Ok(&script[start..start + len])
}

/// Decodes the body of a single-quoted JavaScript string literal with the
/// swc lexer, so escapes follow the language exactly: `\xHH`, `\uHHHH`
/// pairs, line continuations and the rest. Unpaired surrogates become
/// U+FFFD.
pub fn decode_js_string(body: &str) -> Result<String, ScrapeError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), format!("'{body}'"));

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        Default::default(),
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let expr = parser.parse_expr().map_err(|err| lex_error(&err))?;
    if let Some(err) = parser.take_errors().first() {
        return Err(lex_error(err));
    }
    match *expr {
        Expr::Lit(Lit::Str(s)) => Ok(s.value.to_string_lossy().into_owned()),
        _ => Err(ScrapeError::malformed("embedded literal is not a single string")),
    }
}

fn lex_error(err: &impl std::fmt::Debug) -> ScrapeError {
    ScrapeError::malformed(format!("embedded literal does not lex: {err:?}"))
}
