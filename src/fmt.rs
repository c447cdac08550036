use crate::{
    error::{ParseError, ParseErrorKind},
    url::Url,
};
use std::fmt::{self, Debug, Display, Formatter};

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ParseErrorKind::EmptyInput => return f.write_str("empty input"),
            ParseErrorKind::InvalidSchemeChar => "unexpected character in scheme at index ",
            ParseErrorKind::InvalidScheme => "scheme not terminated by a colon at index ",
            ParseErrorKind::EmptyScheme => "empty scheme at index ",
            ParseErrorKind::InvalidUserinfo => "invalid userinfo at index ",
            ParseErrorKind::InvalidHost => "invalid host at index ",
            ParseErrorKind::InvalidPort => "invalid port at index ",
            ParseErrorKind::InvalidPath => "invalid path segment at index ",
            ParseErrorKind::InvalidQuery => "invalid query at index ",
            ParseErrorKind::InvalidFragment => "invalid fragment at index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

impl Display for Url {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self.as_str(), f)
    }
}

impl Debug for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Url")
            .field("url", &self.as_str())
            .field("scheme", &self.scheme())
            .field("userinfo", &self.userinfo())
            .field("host", &self.host())
            .field("port", &self.port())
            .field("path", &self.path())
            .field("query", &self.query())
            .field("fragment", &self.fragment())
            .field("error", &self.error())
            .finish()
    }
}
