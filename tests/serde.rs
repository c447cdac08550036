#![cfg(feature = "serde")]

use span_url::Url;

#[test]
fn round_trip() {
    let url = Url::new("http://user@example.com:8042/over/there?name=ferret#nose");
    let json = serde_json::to_string(&url).unwrap();
    assert_eq!(json, "\"http://user@example.com:8042/over/there?name=ferret#nose\"");

    let back: Url = serde_json::from_str(&json).unwrap();
    assert_eq!(back, url);
    assert_eq!(back.host(), "example.com");
}

#[test]
fn rejects_invalid() {
    assert!(serde_json::from_str::<Url>("\"foo\"").is_err());
    assert!(serde_json::from_str::<Url>("\"\"").is_err());
    assert!(serde_json::from_str::<Url>("42").is_err());
}
