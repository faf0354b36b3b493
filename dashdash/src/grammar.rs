//! The token grammar: `--name` or `--name=value`, where name and value are non-empty runs of
//! `[0-9A-Za-z_-]`.

/////////////////////////////////////////////// Token //////////////////////////////////////////////

/// A token that passed the grammar check.  Everything borrows from the original argument.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    /// The whole argument as provided.
    pub text: &'a str,
    /// The `--name` portion of the argument.
    pub alias: &'a str,
    /// The name, without leading dashes.
    pub name: &'a str,
    /// The value following `=`, if one was supplied.
    pub value: Option<&'a str>,
}

////////////////////////////////////////////// grammar /////////////////////////////////////////////

/// The leading marker of every token.
pub const DASHDASH: &str = "--";

/// True iff `c` may appear in an option name or value.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// True iff `s` is a non-empty run of name characters.
pub fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_name_char)
}

/// The display form of a name.
pub fn alias(name: &str) -> String {
    format!("{}{}", DASHDASH, name)
}

/// Split `text` into a token, or return None if it is neither `--name` nor `--name=value`.
///
/// The split happens at the first `=`, so `--a=b=c` is rejected because `b=c` is not a valid
/// value.  A trailing `=` with nothing after it is likewise rejected.
pub fn tokenize(text: &str) -> Option<Token<'_>> {
    let rest = text.strip_prefix(DASHDASH)?;
    let (name, value) = match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    };
    if !is_name(name) {
        return None;
    }
    if let Some(value) = value {
        if !is_name(value) {
            return None;
        }
    }
    let alias = &text[..DASHDASH.len() + name.len()];
    Some(Token {
        text,
        alias,
        name,
        value,
    })
}
