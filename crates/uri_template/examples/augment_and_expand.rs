// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builds a template for a paged collection resource and expands it in stages.

use uri_template::{Parameters, TemplateError, TemplateVariable, UriTemplate, Value};

fn main() -> Result<(), TemplateError> {
    let template = UriTemplate::parse("/events?sort=date")?.augment([
        TemplateVariable::path_segment("city"),
        TemplateVariable::query("page").with_description("Zero-based page index"),
        TemplateVariable::query("tags").composite(),
    ])?;

    println!("Template: {template}");
    for variable in template.variables() {
        println!("  {variable}");
    }

    let partial = template.expand_partial(&Parameters::new().with("city", "Munich"));
    println!("Partially expanded: {partial}");

    let expanded = UriTemplate::parse(&partial)?.expand(
        &Parameters::new()
            .with("page", 2)
            .with("tags", Value::list(["rock", "live"])),
    );
    println!("Expanded: {expanded}");

    Ok(())
}
