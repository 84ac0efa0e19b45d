use crate::model::Headers;
use http::header;
use micro_wire::protocol::{WireHeaders, WireVersion};

/// How the length of an outgoing body is communicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferFraming {
    /// `Content-Length` only.
    FixedLength(u64),
    /// `Transfer-Encoding`: the declared codings other than `chunked`, then `chunked`.
    Chunked { codings: Vec<String> },
    /// No framing header; the body ends when the connection does.
    Undefined,
}

impl TransferFraming {
    pub(crate) fn write_to(&self, headers: &mut WireHeaders) {
        match self {
            TransferFraming::FixedLength(length) => {
                headers.add("Content-Length", length.to_string());
            }
            TransferFraming::Chunked { codings } => {
                for coding in codings {
                    headers.add("Transfer-Encoding", coding.as_str());
                }
                headers.add("Transfer-Encoding", "chunked");
            }
            TransferFraming::Undefined => {}
        }
    }
}

/// Decides the framing of an entity-carrying response from what the application declared.
///
/// A valid `Content-Length` wins unless a `chunked` transfer-coding is declared as
/// well, and even then it wins for HTTP/1.0 peers, which cannot read chunked bodies.
/// Without a usable length, HTTP/1.1 gets chunked framing and anything else gets none.
/// A `Content-Length` that is not an unsigned integer counts as absent.
pub fn decide_framing(version: WireVersion, headers: &Headers, minor_is_zero: bool) -> TransferFraming {
    let content_length = headers.get(header::CONTENT_LENGTH.as_str()).and_then(|value| value.trim().parse::<u64>().ok());
    let codings = transfer_codings(headers);
    let chunked = codings.iter().any(|coding| coding.eq_ignore_ascii_case("chunked"));

    match content_length {
        Some(length) if !chunked || minor_is_zero => TransferFraming::FixedLength(length),
        _ if version == WireVersion::HTTP_11 => TransferFraming::Chunked {
            codings: codings.into_iter().filter(|coding| !coding.eq_ignore_ascii_case("chunked")).collect(),
        },
        _ => TransferFraming::Undefined,
    }
}

/// Returns true if any declared transfer-coding is `chunked`.
pub(crate) fn declares_chunked(headers: &Headers) -> bool {
    headers.contains_token(header::TRANSFER_ENCODING.as_str(), "chunked")
}

fn transfer_codings(headers: &Headers) -> Vec<String> {
    headers
        .get_all(header::TRANSFER_ENCODING.as_str())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|coding| !coding.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(entries: &[(&str, &str)]) -> Headers {
        entries.iter().copied().collect()
    }

    const V11: WireVersion = WireVersion::HTTP_11;
    const V10: WireVersion = WireVersion::HTTP_10;

    #[test]
    fn decision_table() {
        let cases: Vec<(WireVersion, bool, Vec<(&str, &str)>, TransferFraming)> = vec![
            (V11, false, vec![], TransferFraming::Chunked { codings: vec![] }),
            (V11, false, vec![("Content-Length", "12")], TransferFraming::FixedLength(12)),
            (V11, false, vec![("Content-Length", "12"), ("Transfer-Encoding", "gzip")], TransferFraming::FixedLength(12)),
            (V11, false, vec![("Content-Length", "12"), ("Transfer-Encoding", "gzip, chunked")], TransferFraming::Chunked { codings: vec!["gzip".into()] }),
            (V11, false, vec![("Transfer-Encoding", "gzip"), ("transfer-encoding", "Chunked")], TransferFraming::Chunked { codings: vec!["gzip".into()] }),
            (V11, false, vec![("Content-Length", "twelve")], TransferFraming::Chunked { codings: vec![] }),
            (V10, true, vec![], TransferFraming::Undefined),
            (V10, true, vec![("Transfer-Encoding", "chunked")], TransferFraming::Undefined),
            (V10, true, vec![("Content-Length", "3"), ("Transfer-Encoding", "chunked")], TransferFraming::FixedLength(3)),
            (WireVersion::parse("HTTP/2.0").unwrap(), false, vec![], TransferFraming::Undefined),
        ];

        for (version, minor_is_zero, entries, expected) in cases {
            assert_eq!(decide_framing(version, &headers(&entries), minor_is_zero), expected, "{version} {entries:?}");
        }
    }

    #[test]
    fn never_both_length_and_chunked() {
        let mut wire = WireHeaders::new();
        decide_framing(V11, &headers(&[("Content-Length", "5"), ("Transfer-Encoding", "chunked")]), false).write_to(&mut wire);

        assert!(!wire.contains("Content-Length"));
        assert_eq!(wire.get_all("Transfer-Encoding").collect::<Vec<_>>(), vec!["chunked"]);
    }

    #[test]
    fn chunked_goes_last() {
        let mut wire = WireHeaders::new();
        TransferFraming::Chunked { codings: vec!["gzip".into(), "br".into()] }.write_to(&mut wire);
        assert_eq!(wire.get_all("transfer-encoding").collect::<Vec<_>>(), vec!["gzip", "br", "chunked"]);
    }
}
