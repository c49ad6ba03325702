// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reads the paging links of a response and renders an updated header.

use web_linking::{LinkValue, format_links, parse_links};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let header = r#"</orders?page=1>; rel="first prev", </orders?page=3>; rel=next; title="Page 3""#;
    let links = parse_links(header)?;

    for link in &links {
        println!("{:<6} -> {} {}", link.rel(), link.url(), link.title().unwrap_or_default());
    }

    let next = links.iter().find(|link| link.rel() == "next").map(LinkValue::url);
    println!("Next page: {}", next.unwrap_or("none"));

    let mut updated: Vec<_> = links.into_iter().filter(|link| link.rel() != "prev").collect();
    updated.push(LinkValue::new("/orders?page=9", "last")?.with_attribute("title", "Page \"9\"")?);
    println!("Link: {}", format_links(&updated));

    Ok(())
}
