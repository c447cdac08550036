//! Scheme and authority normalization.

use crate::{pct, table::UNRESERVED, url::Url};

/// Rewrites the URI into its normal form and re-parses the result.
///
/// The scheme is lowercased. The authority is lowercased with its
/// percent-encoded triplets rewritten in uppercase hexadecimal, decoding
/// octets that are unreserved. The remaining components carry over
/// unchanged. An invalid `Url` normalizes to a copy of itself, since its
/// components are not available to serialize.
pub(crate) fn normalize(url: &Url) -> Url {
    if !url.is_valid() {
        return url.clone();
    }

    let mut buf = String::with_capacity(url.as_str().len());

    buf.push_str(url.scheme());
    buf.make_ascii_lowercase();
    buf.push(':');

    if url.has_authority() {
        buf.push_str("//");
        write_authority(&mut buf, url.authority());
    }

    buf.push_str(url.path());
    if url.has_query() {
        buf.push('?');
        buf.push_str(url.query());
    }
    if url.has_fragment() {
        buf.push('#');
        buf.push_str(url.fragment());
    }

    Url::new(buf)
}

fn write_authority(buf: &mut String, auth: &str) {
    let bytes = auth.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let x = bytes[i];
        if x == b'%' {
            // A valid authority contains only complete triplets.
            let octet = pct::decode_octet(bytes[i + 1], bytes[i + 2]);
            if UNRESERVED.allows(octet) {
                buf.push(octet.to_ascii_lowercase() as char);
            } else {
                pct::push_pct_encoded(buf, octet);
            }
            i += 3;
        } else {
            buf.push(x.to_ascii_lowercase() as char);
            i += 1;
        }
    }
}
