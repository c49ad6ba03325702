// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `Link` header parsing and rendering.

use insta::assert_snapshot;
use web_linking::{LinkHeaderError, LinkValue, LinkValueError, format_links, parse_link, parse_links};

fn link(url: &str, rel: &str) -> LinkValue {
    LinkValue::new(url, rel).unwrap()
}

fn single(input: &str) -> LinkValue {
    let mut links = parse_link(input).unwrap();
    assert_eq!(links.len(), 1, "{input}");
    links.remove(0)
}

#[test]
fn splits_multiple_relations() {
    let links = parse_links(r#"<http://x>;rel="self next""#).unwrap();
    assert_eq!(links, [link("http://x", "self"), link("http://x", "next")]);

    assert_eq!(
        parse_links("<url>;rel=next last").unwrap(),
        [link("url", "next"), link("url", "last")]
    );
    assert_eq!(
        parse_links("</prev>;rel=prev first,</next>;rel=next last").unwrap(),
        [
            link("/prev", "prev"),
            link("/prev", "first"),
            link("/next", "next"),
            link("/next", "last"),
        ]
    );
}

#[test]
fn relations_share_attributes() {
    let links = parse_links(r#"</a>;rel="a b";title=T"#).unwrap();
    assert!(links.iter().all(|link| link.title() == Some("T")));
}

#[test]
fn unescapes_quoted_strings() {
    let link = single(r#"<http://x>;rel="a";title="he said \"hi\"""#);
    assert_eq!(link.title(), Some(r#"he said "hi""#));

    let cases = [
        (r#"<url>;title="\"bar\"";rel=next"#, r#""bar""#),
        (r"<url>;title='\'bar\'';rel=next", "'bar'"),
        (r#"<url>;title="'bar'";rel=next"#, "'bar'"),
        (r#"<url>;title='"bar"';rel=next"#, r#""bar""#),
        (r#"<url>;title="foo\\bar";rel=next"#, r"foo\bar"),
        (r"<url>;title='foo\\bar';rel=next", r"foo\bar"),
        (r#"<url>;title="\f\o\o";rel=next"#, "foo"),
        (r#"<url>;title="\r\n\t";rel=next"#, "rnt"),
        (r"<url>;title='\r\n\t';rel=next", "rnt"),
        (r#"<url>;title=foo"bar";rel=next"#, r#"foo"bar""#),
        (r"<url>;title=foo'bar';rel=next", "foo'bar'"),
    ];
    for (input, title) in cases {
        let link = single(input);
        assert_eq!(link.rel(), "next", "{input}");
        assert_eq!(link.title(), Some(title), "{input}");
    }
}

#[test]
fn delimiters_inside_values_are_not_special() {
    assert_eq!(single(r#"<url>;title=foo>;rel="next""#).title(), Some("foo>"));
    assert_eq!(single(r#"<url>;title="foo;bar";rel=next"#).title(), Some("foo;bar"));
    assert_eq!(single(r#"<url>;title="foo,bar";rel=next"#).title(), Some("foo,bar"));
    assert_eq!(
        single("<http://example.com/?param=foo,bar;baz>;rel=next").url(),
        "http://example.com/?param=foo,bar;baz"
    );
    assert_eq!(single("<url1>;rel=foo#").rel(), "foo#");
}

#[test]
fn empty_values() {
    let inputs = [
        "<url>;rel=next;title",
        "<url>;rel=next;title=",
        r#"<url>;rel=next;title="""#,
        "<url>;rel=next;title=''",
    ];
    for input in inputs {
        assert_eq!(single(input), link("url", "next").with_attribute("title", "").unwrap(), "{input}");
    }

    let inputs = [
        "<url>;rel=next;title;name=a",
        "<url>;rel=next;title=;name=a",
        r#"<url>;rel=next;title="";name=a"#,
        "<url>;rel=next;title='';name=a",
    ];
    let expected = link("url", "next").with_attribute("title", "").unwrap().with_attribute("name", "a").unwrap();
    for input in inputs {
        assert_eq!(single(input), expected, "{input}");
    }
}

#[test]
fn single_link_ignores_trailing_separators() {
    assert_eq!(single("<url1>;rel=foo,"), link("url1", "foo"));
    assert_eq!(single("<url1>;rel=foo;"), link("url1", "foo"));
    assert_eq!(single("  <url>;rel=next"), link("url", "next"));
}

#[test]
fn tolerates_empty_list_elements() {
    assert_eq!(
        parse_links(" , <a>;rel=x,, ,<b>;rel=y ,").unwrap(),
        [link("a", "x"), link("b", "y")]
    );
}

#[test]
fn whitespace_other_than_space() {
    let source = concat!(
        "\n\r\t <url1>\n\r\t ;\n\r\t rel\n\r\t =\r\n\t next \r\n\t , \r\n\t ,",
        " \r\n\t <url2>\r\n\t ;\r\n\t rel \r\n\t = \r\n\t \"foo\"\r\n\t ; title=\"\r\n\t bar\r\n\t \"\r\n\t "
    );

    assert_eq!(
        parse_links(source).unwrap(),
        [
            link("url1", "next"),
            link("url2", "foo").with_attribute("title", "\r\n\t bar\r\n\t ").unwrap(),
        ]
    );
}

#[test]
fn unexpected_data() {
    let cases = [
        (r#"<url1>;rel="foo"<url2>;rel= "bar""#, 16),
        (r#"<url1>; rel="foo" <url2>;rel= "bar""#, 18),
        (r#"<url1> ; rel= "foo" <url2>;rel= "bar""#, 20),
        (r##"<url1>;rel="foo"#"##, 16),
        (r#"<url1>;rel="foo" foo bar"#, 17),
        ("<url1>;rel=foo,bar", 15),
        (r#"foo bar <url>;rel="next""#, 0),
    ];
    for (input, position) in cases {
        assert_eq!(
            parse_links(input).unwrap_err(),
            LinkHeaderError::UnexpectedData { position },
            "{input}"
        );
    }

    assert_snapshot!(
        parse_links(r#"<url1>;rel="foo"<url2>;rel= "bar""#).unwrap_err().to_string(),
        @"Unexpected data at the end of Link header at index 16"
    );
}

#[test]
fn missing_data() {
    let error = parse_link("<https://example.com/;rel=next").unwrap_err();
    assert_snapshot!(error.to_string(), @"Missing closing '>' at index 30");

    let error = parse_link(r#"<https://example.com/>;rel="next"#).unwrap_err();
    assert_snapshot!(error.to_string(), @"Missing final quote at index 32");

    let error = parse_link("<https://example.com/>;rel='next").unwrap_err();
    assert_eq!(error, LinkHeaderError::UnterminatedQuotedString { position: 32 });
}

#[test]
fn missing_rel() {
    assert_eq!(
        parse_links(r#"<http://x>;title="t""#).unwrap_err(),
        LinkHeaderError::MissingRel { position: 20 }
    );

    let error = parse_link("<url>;rel=''").unwrap_err();
    assert_snapshot!(error.to_string(), @"Missing 'rel' attribute at index 12");

    let error = parse_link("<url>;rel=' '").unwrap_err();
    assert_eq!(error, LinkHeaderError::MissingRel { position: 13 });
}

#[test]
fn direct_link_requires_opening_bracket() {
    let error = parse_link("foo <url>;rel=next").unwrap_err();
    assert_snapshot!(error.to_string(), @"Expecting '<' at index 0");
    assert_eq!(error.position(), 0);
}

#[test]
fn rendered_links_parse_back() {
    let links = [
        link("http://x", "self"),
        link("/search?q=a,b;c", "search").with_attribute("title", r#"quote " and \ backslash"#).unwrap(),
        link("/a", "alternate").with_attribute("hreflang", "de").unwrap().with_attribute("type", "text/html").unwrap(),
    ];

    for original in &links {
        assert_eq!(parse_link(&original.to_string()).unwrap(), [original.clone()]);
    }
    assert_eq!(parse_links(&format_links(&links)).unwrap(), links);
}

#[test]
fn builders_only_produce_links_that_parse_back() {
    assert_eq!(
        LinkValue::new("/a", "next last"),
        Err(LinkValueError::InvalidRelation {
            rel: "next last".to_string()
        })
    );
    assert_eq!(
        link("/a", "self").with_attribute("a=b", "v"),
        Err(LinkValueError::InvalidAttributeName { name: "a=b".to_string() })
    );
    assert_eq!(
        link("/a", "self").with_attribute("a b", "v"),
        Err(LinkValueError::InvalidAttributeName { name: "a b".to_string() })
    );
    assert_eq!(
        LinkValue::new("/a>b", "self"),
        Err(LinkValueError::InvalidTarget { url: "/a>b".to_string() })
    );

    let accepted = link("/a", "self")
        .with_attribute("X-Trace", r#"a=b; c, "d""#)
        .unwrap()
        .with_rel("https://example.com/rels/item")
        .unwrap();
    assert_eq!(parse_link(&accepted.to_string()).unwrap(), [accepted]);
}
