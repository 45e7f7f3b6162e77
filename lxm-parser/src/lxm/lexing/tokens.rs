//! Token definitions for command arguments
//!
//! Values are bare words or quoted with `"…"`, `'…'` or `{…}`. Quoted contents are taken
//! literally, there is no escaping inside them.
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone)]
pub enum ArgToken {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    #[regex(r"'[^']*'")]
    SingleQuoted,

    #[regex(r"\{[^}]*\}")]
    Braced,

    // Anything up to whitespace or an opening quote
    #[regex(r#"[^ \t"'{]+"#)]
    Bare,
}

impl ArgToken {
    pub fn is_quoted(&self) -> bool {
        matches!(
            self,
            ArgToken::DoubleQuoted | ArgToken::SingleQuoted | ArgToken::Braced
        )
    }

    /// The value carried by the token's source slice.
    pub fn content<'a>(&self, slice: &'a str) -> &'a str {
        if self.is_quoted() && slice.len() >= 2 {
            &slice[1..slice.len() - 1]
        } else {
            slice
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Result<ArgToken, ()>> {
        ArgToken::lexer(source).collect()
    }

    #[test]
    fn test_bare_and_whitespace() {
        assert_eq!(
            lex("mode:on  x"),
            vec![
                Ok(ArgToken::Bare),
                Ok(ArgToken::Whitespace),
                Ok(ArgToken::Bare)
            ]
        );
    }

    #[test]
    fn test_quote_styles() {
        assert_eq!(
            lex(r#""a b"'c d'{e f}"#),
            vec![
                Ok(ArgToken::DoubleQuoted),
                Ok(ArgToken::SingleQuoted),
                Ok(ArgToken::Braced)
            ]
        );
    }

    #[test]
    fn test_named_value_splits_before_quote() {
        let mut lexer = ArgToken::lexer(r#"preset:"prim.cube""#);
        assert_eq!(lexer.next(), Some(Ok(ArgToken::Bare)));
        assert_eq!(lexer.slice(), "preset:");
        assert_eq!(lexer.next(), Some(Ok(ArgToken::DoubleQuoted)));
        assert_eq!(lexer.slice(), "\"prim.cube\"");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        let mut lexer = ArgToken::lexer("\"open");
        assert_eq!(lexer.next(), Some(Err(())));
        assert_eq!(lexer.span().start, 0);
    }

    #[test]
    fn test_content_strips_delimiters() {
        assert_eq!(ArgToken::Braced.content("{1 2 3}"), "1 2 3");
        assert_eq!(ArgToken::Bare.content("on"), "on");
        assert_eq!(ArgToken::DoubleQuoted.content("\"\""), "");
    }
}
