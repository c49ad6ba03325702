// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(feature = "serde")]

//! Serialization of parsed links.

use web_linking::{LinkValue, parse_link};

#[test]
fn link_round_trips_through_json() {
    let link = parse_link(r#"</a>;rel=self;title="A""#).unwrap().remove(0);
    let json = serde_json::to_string(&link).unwrap();
    assert_eq!(json, r#"{"url":"/a","rel":"self","attributes":[["title","A"]]}"#);

    let restored: LinkValue = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, link);
}

#[test]
fn attributes_are_optional() {
    let link: LinkValue = serde_json::from_str(r#"{"url":"/a","rel":"self"}"#).unwrap();
    assert_eq!(link, LinkValue::new("/a", "self").unwrap());
}

#[test]
fn invalid_links_fail_to_deserialize() {
    let inputs = [
        r#"{"url":"/a","rel":"next last"}"#,
        r#"{"url":"/a>","rel":"self"}"#,
        r#"{"url":"/a","rel":"self","attributes":[["a=b","v"]]}"#,
    ];
    for json in inputs {
        let result: Result<LinkValue, _> = serde_json::from_str(json);
        assert!(result.is_err(), "{json}");
    }
}
