//! Interactive prompts

use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use greentick_sdk::views::Confirmation;
use greentick_types::{Customer, RecordId};

/// Asks before deleting, unless `--yes` was given
#[derive(Debug, Clone, Copy)]
pub struct DeletePrompt {
    pub assume_yes: bool,
}

impl Confirmation for DeletePrompt {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Use `value` when given, otherwise ask for it.
pub fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String, String> {
    match value {
        Some(value) => Ok(value),
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| format!("Failed to read {}: {}", prompt.to_lowercase(), e)),
    }
}

pub fn password_or_prompt(value: Option<String>) -> Result<String, String> {
    match value {
        Some(value) => Ok(value),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()
            .map_err(|e| format!("Failed to read password: {}", e)),
    }
}

/// Let the user choose one of `customers`.
pub fn pick_customer(customers: &[Customer]) -> Result<RecordId, String> {
    if customers.is_empty() {
        return Err("No customers yet. Add one with `greentick customers add`.".to_string());
    }
    let labels: Vec<String> = customers.iter().map(Customer::label).collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Customer")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| format!("Failed to get customer selection: {}", e))?;
    Ok(customers[index].id)
}

/// Parse a `key=value` template variable
pub fn parse_variable(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Invalid variable '{}': expected key=value", input)),
    }
}
