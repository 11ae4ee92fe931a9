//! Given/when steps for catalogue-planning scenarios.

use rstest_bdd_macros::{given, when};
use stackbench::api::types::{CommandDef, Sample, Stack};
use stackbench::catalog::{Catalog, expand_command_line, order_commands};

use super::StepResult;
use super::state::CatalogState;

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

fn command(name: &str) -> CommandDef {
    CommandDef {
        name: String::from(name),
        command_line: format!("run {name}"),
        kind: String::from("custom"),
    }
}

fn compute_pairings(catalog_state: &CatalogState, filter: Option<&str>) -> StepResult<()> {
    let stack_tags = catalog_state
        .stack_tags
        .get()
        .ok_or_else(|| String::from("stack tags should be configured"))?;
    let sample_tags = catalog_state
        .sample_tags
        .get()
        .ok_or_else(|| String::from("sample tags should be configured"))?;

    let stack = Stack {
        id: String::from("stack-under-test"),
        tags: stack_tags,
        ..Stack::default()
    };
    let sample = Sample {
        path: String::from("/sample-under-test"),
        tags: sample_tags,
        ..Sample::default()
    };

    let catalog = Catalog::new(vec![stack], vec![sample]);
    catalog_state.pairing_count.set(catalog.pairings(filter).len());
    Ok(())
}

#[given("a stack tagged {tags}")]
fn given_stack_tagged(catalog_state: &CatalogState, tags: String) {
    catalog_state.stack_tags.set(split_list(&tags));
}

#[given("a stack with no tags")]
fn given_stack_untagged(catalog_state: &CatalogState) {
    catalog_state.stack_tags.set(Vec::new());
}

#[given("a sample tagged {tags}")]
fn given_sample_tagged(catalog_state: &CatalogState, tags: String) {
    catalog_state.sample_tags.set(split_list(&tags));
}

#[given("the planned commands {names}")]
fn given_planned_commands(catalog_state: &CatalogState, names: String) {
    catalog_state.command_names.set(split_list(&names));
}

#[given("the command line {line}")]
fn given_command_line(catalog_state: &CatalogState, line: String) {
    catalog_state.command_line.set(line);
}

#[given("a sample at path {path}")]
fn given_sample_path(catalog_state: &CatalogState, path: String) {
    catalog_state.sample_path.set(path);
}

#[when("pairings are computed")]
fn when_pairings_computed(catalog_state: &CatalogState) -> StepResult<()> {
    compute_pairings(catalog_state, None)
}

#[when("pairings are computed with filter tag {tag}")]
fn when_pairings_computed_with_filter(catalog_state: &CatalogState, tag: String) -> StepResult<()> {
    compute_pairings(catalog_state, Some(&tag))
}

#[when("the commands are ordered")]
fn when_commands_ordered(catalog_state: &CatalogState) -> StepResult<()> {
    let names = catalog_state
        .command_names
        .get()
        .ok_or_else(|| String::from("planned commands should be configured"))?;

    let commands: Vec<CommandDef> = names.iter().map(|name| command(name)).collect();
    let ordered = order_commands(commands)
        .into_iter()
        .map(|c| c.name)
        .collect();
    catalog_state.ordered_names.set(ordered);
    Ok(())
}

#[when("placeholders are expanded")]
fn when_placeholders_expanded(catalog_state: &CatalogState) -> StepResult<()> {
    let line = catalog_state
        .command_line
        .get()
        .ok_or_else(|| String::from("command line should be configured"))?;
    let path = catalog_state
        .sample_path
        .get()
        .ok_or_else(|| String::from("sample path should be configured"))?;

    catalog_state.expanded.set(expand_command_line(&line, &path));
    Ok(())
}
