//! Assertion helpers for catalogue-planning behavioural tests.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::CatalogState;

#[then("the stack and sample are paired")]
fn stack_and_sample_paired(catalog_state: &CatalogState) -> StepResult<()> {
    let count = catalog_state
        .pairing_count
        .get()
        .ok_or_else(|| String::from("pairings should have been computed"))?;
    if count == 1 {
        Ok(())
    } else {
        Err(format!("expected exactly one pairing, got {count}"))
    }
}

#[then("no pairing is produced")]
fn no_pairing_produced(catalog_state: &CatalogState) -> StepResult<()> {
    let count = catalog_state
        .pairing_count
        .get()
        .ok_or_else(|| String::from("pairings should have been computed"))?;
    if count == 0 {
        Ok(())
    } else {
        Err(format!("expected no pairings, got {count}"))
    }
}

#[then("the command order is {expected}")]
fn command_order_is(catalog_state: &CatalogState, expected: String) -> StepResult<()> {
    let ordered = catalog_state
        .ordered_names
        .get()
        .ok_or_else(|| String::from("commands should have been ordered"))?;
    let expected_names: Vec<String> = expected
        .split(',')
        .map(|part| String::from(part.trim()))
        .collect();

    if ordered == expected_names {
        Ok(())
    } else {
        Err(format!("expected order {expected_names:?}, got {ordered:?}"))
    }
}

#[then("the expanded command line is {expected}")]
fn expanded_command_line_is(catalog_state: &CatalogState, expected: String) -> StepResult<()> {
    let expanded = catalog_state
        .expanded
        .get()
        .ok_or_else(|| String::from("placeholders should have been expanded"))?;
    if expanded == expected {
        Ok(())
    } else {
        Err(format!("expected '{expected}', got '{expanded}'"))
    }
}
