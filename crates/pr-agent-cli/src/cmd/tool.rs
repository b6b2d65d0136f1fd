use crate::output::{print_json, print_table, truncate_cell};
use crate::tools::ToolRegistry;
use anyhow::Context;
use serde_json::Value;

const DESCRIPTION_WIDTH: usize = 72;

pub fn list(registry: &ToolRegistry, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&registry.descriptors());
    }
    let rows = registry
        .tools()
        .iter()
        .map(|t| {
            vec![
                t.name().to_string(),
                truncate_cell(t.description(), DESCRIPTION_WIDTH),
            ]
        })
        .collect();
    print_table(&["NAME", "DESCRIPTION"], rows);
    Ok(())
}

/// Invoke one tool and print its text payload. Error payloads are printed
/// like any other result, matching what an agent would receive.
pub fn call(
    registry: &ToolRegistry,
    name: &str,
    args: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let args: Value = match args {
        Some(raw) => serde_json::from_str(raw).context("--args must be a JSON object")?,
        None => Value::Null,
    };
    let result = registry.call(name, args);
    if json {
        print_json(&result)
    } else {
        println!("{}", result.first_text());
        Ok(())
    }
}
