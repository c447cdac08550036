use crate::{
    error::ParseError,
    internal::{Meta, Span},
    ip::HostKind,
    normalize, parser,
};
use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    num::ParseIntError,
    slice,
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A URI reference that owns its input, as per [RFC 3986].
///
/// Parsing never fails outward: [`Url::new`] always returns a `Url`, and
/// validity is queried through [`is_valid`] and [`error`]. On an invalid
/// `Url` every component accessor returns an empty view, while [`as_str`]
/// always reflects the original input.
///
/// A `Url` is immutable after construction. Component accessors return
/// string slices borrowed from the owned input; no component is ever
/// percent-decoded.
///
/// [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
/// [`is_valid`]: Self::is_valid
/// [`error`]: Self::error
/// [`as_str`]: Self::as_str
///
/// # Comparison
///
/// Two `Url`s compare by the raw bytes of their inputs, in
/// [lexicographic](Ord#lexicographical-comparison) order; neither side is
/// normalized first.
///
/// # Examples
///
/// ```
/// use span_url::Url;
///
/// let url = Url::new("foo://user@example.com:8042/over/there?name=ferret#nose");
/// assert!(url.is_valid());
/// assert_eq!(url.scheme(), "foo");
/// assert_eq!(url.authority(), "user@example.com:8042");
/// assert_eq!(url.userinfo(), "user");
/// assert_eq!(url.host(), "example.com");
/// assert_eq!(url.port(), "8042");
/// assert_eq!(url.path(), "/over/there");
/// assert_eq!(url.query(), "name=ferret");
/// assert_eq!(url.fragment(), "nose");
/// ```
#[derive(Clone)]
pub struct Url {
    src: String,
    meta: Meta,
}

impl Url {
    /// Parses a URI reference, keeping the input and the outcome together.
    ///
    /// This constructor never fails: on invalid input the returned `Url`
    /// reports the first violated rule through [`error`](Self::error) and
    /// its component accessors return empty views.
    ///
    /// # Examples
    ///
    /// ```
    /// use span_url::{ParseErrorKind, Url};
    ///
    /// let url = Url::new("not a url");
    /// assert!(!url.is_valid());
    /// assert_eq!(url.error().unwrap().kind(), ParseErrorKind::InvalidSchemeChar);
    /// assert_eq!(url.as_str(), "not a url");
    /// assert_eq!(url.scheme(), "");
    /// ```
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        let src = src.into();
        let meta = parser::parse(src.as_bytes());
        Self { src, meta }
    }

    /// Parses a URI reference, rejecting invalid input eagerly.
    ///
    /// # Errors
    ///
    /// Returns the error that [`Url::new`] would have recorded; the
    /// invalid input is discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use span_url::Url;
    ///
    /// assert!(Url::parse("http://example.com/").is_ok());
    /// assert!(Url::parse("http://[::3").is_err());
    /// ```
    pub fn parse(src: impl Into<String>) -> Result<Self, ParseError> {
        let url = Self::new(src);
        match url.meta.error {
            Some(e) => Err(e),
            None => Ok(url),
        }
    }

    /// Returns the original input as a string slice.
    ///
    /// This always reflects the input, whether or not it parsed.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.src
    }

    /// Gives the owned input back, consuming the `Url`.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.src
    }

    /// Checks whether the input parsed without error.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.meta.error.is_none()
    }

    /// Returns the error recorded while parsing, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use span_url::{ParseErrorKind, Url};
    ///
    /// let url = Url::new("exam=ple:foo");
    /// let e = url.error().unwrap();
    /// assert_eq!(e.kind(), ParseErrorKind::InvalidSchemeChar);
    /// assert_eq!(e.index(), 4);
    /// ```
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<ParseError> {
        self.meta.error
    }

    fn view(&self, span: Span) -> &str {
        if self.is_valid() {
            &self.src[span.start..span.end]
        } else {
            ""
        }
    }

    fn opt_view(&self, span: Option<Span>) -> &str {
        span.map_or("", |s| self.view(s))
    }

    /// Returns the scheme component, or `""` if the `Url` is invalid.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.view(self.meta.scheme)
    }

    /// Returns the authority component without its `//` prefix, or `""`
    /// if there is none.
    ///
    /// An authority is present iff the scheme colon is followed by `//`;
    /// it may be present and empty, as in `file:///etc/hosts`. Use
    /// [`has_authority`](Self::has_authority) to tell the two apart.
    #[must_use]
    pub fn authority(&self) -> &str {
        self.opt_view(self.meta.auth.map(|a| a.span))
    }

    /// Returns the userinfo subcomponent, or `""` if there is none.
    #[must_use]
    pub fn userinfo(&self) -> &str {
        self.opt_view(self.meta.auth.and_then(|a| a.userinfo()))
    }

    /// Returns the host subcomponent, or `""` if there is none.
    ///
    /// For an IP literal the enclosing brackets are excluded:
    ///
    /// ```
    /// use span_url::Url;
    ///
    /// let url = Url::new("ldap://[2001:db8::7]/c=GB");
    /// assert_eq!(url.host(), "2001:db8::7");
    /// assert_eq!(url.authority(), "[2001:db8::7]");
    /// ```
    ///
    /// IPv6 addresses are recognized permissively: every byte must be a
    /// hexadecimal digit, `:`, or `.` in a dotted tail, but the group
    /// structure is not checked. Strings accepted here may be rejected by
    /// a strict IPv6 parser.
    #[must_use]
    pub fn host(&self) -> &str {
        self.opt_view(self.meta.auth.map(|a| a.host))
    }

    /// Returns the kind of the host, or `None` if the `Url` is invalid or
    /// has no authority.
    #[must_use]
    pub fn host_kind(&self) -> Option<HostKind> {
        if self.is_valid() {
            self.meta.auth.map(|a| a.kind)
        } else {
            None
        }
    }

    /// Returns the port subcomponent, or `""` if there is none.
    ///
    /// The port is all-digits but not range-checked; it may be empty,
    /// have leading zeros, or exceed [`u16::MAX`].
    #[must_use]
    pub fn port(&self) -> &str {
        self.opt_view(self.meta.auth.and_then(|a| a.port()))
    }

    /// Converts the port subcomponent to `u16`, if present and nonempty.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the port does not fit into `u16`.
    ///
    /// # Examples
    ///
    /// ```
    /// use span_url::Url;
    ///
    /// assert_eq!(Url::new("ssh://device.local:4673/").port_to_u16(), Ok(Some(4673)));
    /// assert_eq!(Url::new("ssh://device.local:/").port_to_u16(), Ok(None));
    /// assert!(Url::new("ssh://device.local:1234567890/").port_to_u16().is_err());
    /// ```
    pub fn port_to_u16(&self) -> Result<Option<u16>, ParseIntError> {
        let port = self.port();
        if port.is_empty() {
            return Ok(None);
        }
        port.parse().map(Some)
    }

    /// Returns the path component, or `""` if the `Url` is invalid.
    #[must_use]
    pub fn path(&self) -> &str {
        self.view(self.meta.path)
    }

    /// Returns the query component without its `?` prefix, or `""` if
    /// there is none.
    #[must_use]
    pub fn query(&self) -> &str {
        self.opt_view(self.meta.query)
    }

    /// Returns the fragment component without its `#` prefix, or `""` if
    /// there is none.
    #[must_use]
    pub fn fragment(&self) -> &str {
        self.opt_view(self.meta.fragment)
    }

    /// Checks whether an authority component is present.
    ///
    /// Always `false` on an invalid `Url`, as with the other presence
    /// checks.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.is_valid() && self.meta.auth.is_some()
    }

    /// Checks whether a userinfo subcomponent is present.
    #[must_use]
    pub fn has_userinfo(&self) -> bool {
        self.is_valid() && self.meta.auth.is_some_and(|a| a.userinfo().is_some())
    }

    /// Checks whether a port subcomponent is present.
    ///
    /// The port may be present and empty, as in `//host:/`.
    #[must_use]
    pub fn has_port(&self) -> bool {
        self.is_valid() && self.meta.auth.is_some_and(|a| a.port().is_some())
    }

    /// Checks whether a query component is present.
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.is_valid() && self.meta.query.is_some()
    }

    /// Checks whether a fragment component is present.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        self.is_valid() && self.meta.fragment.is_some()
    }

    /// Returns the path segments, in order.
    ///
    /// The segments of an empty path are empty. A leading `/` belongs to
    /// no segment, a run of slashes produces empty segments, and a
    /// trailing `/` does not produce a final empty segment:
    ///
    /// ```
    /// use span_url::Url;
    ///
    /// let url = Url::new("x://h/a//b/");
    /// assert_eq!(url.segments().collect::<Vec<_>>(), ["a", "", "b"]);
    ///
    /// let url = Url::new("x://h/");
    /// assert_eq!(url.segments().collect::<Vec<_>>(), [""]);
    ///
    /// let url = Url::new("mailto:John.Doe@example.com");
    /// assert_eq!(url.segments().collect::<Vec<_>>(), ["John.Doe@example.com"]);
    /// ```
    #[must_use]
    pub fn segments(&self) -> Views<'_> {
        self.views(&self.meta.segments)
    }

    /// Returns the query items, split on `&` in order, preserving empty
    /// items.
    ///
    /// An absent or empty query has no items.
    ///
    /// ```
    /// use span_url::Url;
    ///
    /// let url = Url::new("x:?with&a&query=param");
    /// assert_eq!(url.query_items().collect::<Vec<_>>(), ["with", "a", "query=param"]);
    /// assert_eq!(Url::new("x:?").query_items().count(), 0);
    /// ```
    #[must_use]
    pub fn query_items(&self) -> Views<'_> {
        self.views(&self.meta.query_items)
    }

    fn views<'a>(&'a self, spans: &'a [Span]) -> Views<'a> {
        let spans = if self.is_valid() { spans } else { &[] };
        Views {
            src: &self.src,
            spans: spans.iter(),
        }
    }

    /// Returns the path truncated after its `min(n, last)`-th segment,
    /// inclusive.
    ///
    /// The returned slice always begins at the start of the path. Returns
    /// `""` when there are no segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use span_url::Url;
    ///
    /// let url = Url::new("url://address:1234/this/is/a/path");
    /// assert_eq!(url.path_prefix(0), "/this");
    /// assert_eq!(url.path_prefix(1), "/this/is");
    /// assert_eq!(url.path_prefix(1000), "/this/is/a/path");
    /// ```
    #[must_use]
    pub fn path_prefix(&self, n: usize) -> &str {
        if !self.is_valid() || self.meta.segments.is_empty() {
            return "";
        }
        let last = self.meta.segments[n.min(self.meta.segments.len() - 1)];
        &self.src[self.meta.path.start..last.end]
    }

    /// Checks whether the path is absolute, i.e. non-empty and starting
    /// with `/`.
    #[must_use]
    pub fn is_path_absolute(&self) -> bool {
        self.path().starts_with('/')
    }

    /// Returns a normalized copy of this `Url`.
    ///
    /// The scheme is lowercased. In the authority, ASCII letters are
    /// lowercased and percent-encoded triplets are rewritten with
    /// uppercase hexadecimal digits, or replaced by the octet itself when
    /// it is unreserved. Path, query and fragment carry over unchanged;
    /// in particular dot-segments are not removed. The result is parsed
    /// over the freshly built buffer, so its views point into that
    /// buffer.
    ///
    /// Normalizing is idempotent. An invalid `Url` normalizes to a copy
    /// of itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use span_url::Url;
    ///
    /// let url = Url::new("eXamPLE://us%65r@Address:1234/Path");
    /// assert_eq!(url.normalize().as_str(), "example://user@address:1234/Path");
    /// ```
    #[must_use]
    pub fn normalize(&self) -> Url {
        normalize::normalize(self)
    }
}

impl From<&str> for Url {
    #[inline]
    fn from(src: &str) -> Self {
        Self::new(src)
    }
}

impl From<String> for Url {
    #[inline]
    fn from(src: String) -> Self {
        Self::new(src)
    }
}

impl FromStr for Url {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, ParseError> {
        Self::parse(s)
    }
}

impl PartialEq for Url {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src
    }
}

impl Eq for Url {}

impl PartialEq<str> for Url {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.src == other
    }
}

impl PartialEq<&str> for Url {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.src == *other
    }
}

impl PartialEq<Url> for str {
    #[inline]
    fn eq(&self, other: &Url) -> bool {
        self == other.src
    }
}

impl PartialOrd for Url {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Url {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.src.cmp(&other.src)
    }
}

impl Hash for Url {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.src.hash(state);
    }
}

#[cfg(feature = "serde")]
impl Serialize for Url {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Url {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Url::parse(s).map_err(de::Error::custom)
    }
}

/// An iterator over component views of a [`Url`], in source order.
///
/// Created by [`Url::segments`] and [`Url::query_items`].
#[derive(Clone, Debug)]
pub struct Views<'a> {
    src: &'a str,
    spans: slice::Iter<'a, Span>,
}

impl<'a> Iterator for Views<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.spans.next().map(|s| &self.src[s.start..s.end])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl DoubleEndedIterator for Views<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.spans.next_back().map(|s| &self.src[s.start..s.end])
    }
}

impl ExactSizeIterator for Views<'_> {}

impl FusedIterator for Views<'_> {}
