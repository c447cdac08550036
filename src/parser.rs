use crate::{
    error::{ParseError, ParseErrorKind},
    internal::{AuthMeta, Meta, Span},
    ip::{self, HostKind},
    table::{FRAGMENT, PCHAR, PORT, QUERY, SCHEME, USERINFO},
};
use std::ops::{Deref, DerefMut};

type Result<T> = std::result::Result<T, ParseError>;

/// Short-circuits the calling stage with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
        })
    };
}

/// Parses a URI reference into its metadata.
///
/// Never fails outward: the first stage error is recorded in the output
/// and the remaining stages are skipped, leaving their bounds at the
/// defaults.
pub(crate) fn parse(bytes: &[u8]) -> Meta {
    let mut parser = Parser {
        reader: Reader { bytes, pos: 0 },
        out: Meta::default(),
    };
    if let Err(e) = parser.run() {
        parser.out.error = Some(e);
    }
    parser.out
}

/// URI reference parser.
///
/// # Invariants
///
/// `pos` never exceeds the input length and never moves backward.
struct Parser<'a> {
    reader: Reader<'a>,
    out: Meta,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Deref for Parser<'a> {
    type Target = Reader<'a>;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl DerefMut for Parser<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

impl Reader<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    // Callers are responsible for upholding the invariants.
    fn skip(&mut self, n: usize) {
        // INVARIANT: `pos` only moves forward.
        self.pos += n;
        debug_assert!(self.pos <= self.len());
    }

    fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            // INVARIANT: `s` was just matched, so advancing by its
            // length stays in bounds.
            self.skip(s.len());
            true
        } else {
            false
        }
    }

    /// Advances to the next occurrence of one of `stops`, or to the end
    /// of input, and returns the position advanced past.
    fn take_until(&mut self, stops: &[u8]) -> usize {
        while let Some(x) = self.peek(0) {
            if stops.contains(&x) {
                break;
            }
            // INVARIANT: Skipping a non-stop byte is fine.
            self.skip(1);
        }
        self.pos
    }
}

/// Driver states, in source order. Any stage error is sticky: the
/// remaining states are skipped.
enum Stage {
    Scheme,
    HierPart,
    Authority,
    Path,
    QueryOrFragment,
    Query,
    Fragment,
}

impl Parser<'_> {
    fn run(&mut self) -> Result<()> {
        if self.bytes.is_empty() {
            err!(0, EmptyInput);
        }

        let mut stage = Stage::Scheme;
        loop {
            stage = match stage {
                Stage::Scheme => {
                    self.parse_scheme()?;
                    Stage::HierPart
                }
                Stage::HierPart => {
                    // INVARIANT: The reader sits on the scheme colon.
                    self.skip(1);
                    if self.read_str("//") {
                        Stage::Authority
                    } else {
                        Stage::Path
                    }
                }
                Stage::Authority => {
                    self.parse_authority()?;
                    Stage::Path
                }
                Stage::Path => {
                    self.parse_path()?;
                    Stage::QueryOrFragment
                }
                Stage::QueryOrFragment => match self.peek(0) {
                    Some(b'?') => Stage::Query,
                    Some(b'#') => Stage::Fragment,
                    _ => return Ok(()),
                },
                Stage::Query => {
                    self.parse_query()?;
                    Stage::Fragment
                }
                Stage::Fragment => {
                    if self.peek(0) == Some(b'#') {
                        self.parse_fragment()?;
                    }
                    return Ok(());
                }
            };
        }
    }

    /// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
    ///
    /// On success the recorded bounds exclude the terminating `:` and the
    /// reader stops on it.
    fn parse_scheme(&mut self) -> Result<()> {
        let start = self.pos;
        if !self.has_remaining() {
            err!(start, EmptyScheme);
        }
        if !self.bytes[start].is_ascii_alphabetic() {
            err!(start, InvalidSchemeChar);
        }
        // INVARIANT: Skipping the leading letter is fine.
        self.skip(1);

        while let Some(x) = self.peek(0) {
            if x == b':' {
                self.out.scheme = Span::new(start, self.pos);
                return Ok(());
            }
            if !SCHEME.allows(x) {
                err!(self.pos, InvalidSchemeChar);
            }
            // INVARIANT: Skipping a scheme character is fine.
            self.skip(1);
        }
        err!(self.pos, InvalidScheme);
    }

    /// `authority = [ userinfo "@" ] host [ ":" port ]`
    ///
    /// The authority runs to the first `/`, `?`, `#` or end of input. The
    /// last `:` after the last `]` (so that colons inside an IP literal
    /// are bypassed) starts the port; the last `@` before the port ends
    /// the userinfo. Subcomponents are validated in source order.
    fn parse_authority(&mut self) -> Result<()> {
        let start = self.pos;
        let end = self.take_until(b"/?#");
        let auth = &self.bytes[start..end];

        let tail = match auth.iter().rposition(|&x| x == b']') {
            Some(i) => i + 1,
            None => 0,
        };
        let colon = auth[tail..]
            .iter()
            .rposition(|&x| x == b':')
            .map(|i| tail + i);
        let pre_port = colon.unwrap_or(auth.len());

        let at = auth[..pre_port].iter().rposition(|&x| x == b'@');
        let host_off = at.map_or(0, |i| i + 1);

        if let Some(i) = at {
            if !USERINFO.validate(&auth[..i]) {
                err!(start, InvalidUserinfo);
            }
        }

        let kind = match ip::classify_host(&auth[host_off..pre_port]) {
            Some(kind) => kind,
            None => err!(start + host_off, InvalidHost),
        };

        if let Some(i) = colon {
            if !PORT.validate(&auth[i + 1..]) {
                err!(start + i + 1, InvalidPort);
            }
        }

        // Bracketed hosts record the bounds between the brackets.
        let bracket = matches!(kind, HostKind::Ipv6 | HostKind::IpvFuture) as usize;
        self.out.auth = Some(AuthMeta {
            span: Span::new(start, end),
            host: Span::new(start + host_off + bracket, start + pre_port - bracket),
            kind,
        });
        Ok(())
    }

    /// `path = *( pchar / "/" )`, empty allowed.
    ///
    /// With an authority present, a non-empty path must start with `/`;
    /// without one, it must not start with `//` (which would read as an
    /// authority). A leading `/` is not part of any segment; each further
    /// `/` terminates one, and the piece after the last `/` is recorded
    /// only when non-empty or when it is the only one.
    fn parse_path(&mut self) -> Result<()> {
        let start = self.pos;
        let end = self.take_until(b"?#");
        self.out.path = Span::new(start, end);
        if start == end {
            return Ok(());
        }

        let bytes = self.bytes;
        let rooted = bytes[start] == b'/';
        if self.out.auth.is_some() {
            if !rooted {
                err!(start, InvalidPath);
            }
        } else if rooted && bytes[start..end].starts_with(b"//") {
            err!(start, InvalidPath);
        }

        let mut seg_start = if rooted { start + 1 } else { start };
        let mut segments = Vec::new();
        for i in seg_start..end {
            if bytes[i] == b'/' {
                segments.push(Span::new(seg_start, i));
                seg_start = i + 1;
            }
        }
        if seg_start < end || segments.is_empty() {
            segments.push(Span::new(seg_start, end));
        }

        for seg in &segments {
            if !PCHAR.validate(&bytes[seg.start..seg.end]) {
                err!(seg.start, InvalidPath);
            }
        }
        self.out.segments = segments;
        Ok(())
    }

    /// `query = *( pchar / "/" / "?" )`, split on `&` into items.
    fn parse_query(&mut self) -> Result<()> {
        // INVARIANT: The reader sits on the `?`.
        self.skip(1);
        let start = self.pos;
        let end = self.take_until(b"#");

        let bytes = self.bytes;
        if !QUERY.validate(&bytes[start..end]) {
            err!(start, InvalidQuery);
        }
        self.out.query = Some(Span::new(start, end));

        // Items split on every `&`, preserving order and empties; an
        // empty query has no items.
        if start < end {
            let mut item_start = start;
            let mut items = Vec::new();
            for i in start..end {
                if bytes[i] == b'&' {
                    items.push(Span::new(item_start, i));
                    item_start = i + 1;
                }
            }
            items.push(Span::new(item_start, end));
            self.out.query_items = items;
        }
        Ok(())
    }

    /// `fragment = *( pchar / "/" / "?" )`, running to the end of input.
    fn parse_fragment(&mut self) -> Result<()> {
        // INVARIANT: The reader sits on the `#`.
        self.skip(1);
        let start = self.pos;
        // INVARIANT: The fragment runs to the end of input.
        let remaining = self.len() - self.pos;
        self.skip(remaining);

        if !FRAGMENT.validate(&self.bytes[start..]) {
            err!(start, InvalidFragment);
        }
        self.out.fragment = Some(Span::new(start, self.len()));
        Ok(())
    }
}
