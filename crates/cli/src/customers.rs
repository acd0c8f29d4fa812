use clap::{Parser, Subcommand};
use console::style;
use greentick_sdk::{ApiResponse, views::CustomersController};
use greentick_types::{CustomerInput, RecordId};

use crate::{
    Context,
    output::{flush_notices, heading, truncate},
    prompt::{DeletePrompt, text_or_prompt},
};

#[derive(Subcommand, PartialEq, Clone, Debug)]
pub enum CustomersCommand {
    /// List customers
    List(ListCommand),
    /// Add a customer
    Add(AddCommand),
    /// Change a customer's details
    Edit(EditCommand),
    /// Delete a customer
    Delete(DeleteCommand),
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct ListCommand {
    /// Only show customers whose name or phone contains this text
    #[arg(long = "filter", short = 'f')]
    pub filter: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct AddCommand {
    #[arg(long = "name")]
    pub name: Option<String>,
    #[arg(long = "phone")]
    pub phone: Option<String>,
    #[arg(long = "notes")]
    pub notes: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct EditCommand {
    pub id: RecordId,
    #[arg(long = "name")]
    pub name: Option<String>,
    #[arg(long = "phone")]
    pub phone: Option<String>,
    /// New notes; an empty value clears them
    #[arg(long = "notes")]
    pub notes: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct DeleteCommand {
    pub id: RecordId,
    /// Skip the confirmation prompt
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

impl CustomersCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let mut screen = CustomersController::new(ctx.api.clone());
        match self {
            CustomersCommand::List(cmd) => {
                screen.on_visible().await;
                if let Some(filter) = &cmd.filter {
                    screen.set_filter(filter.clone());
                }
                print_customers(&screen);
            }
            CustomersCommand::Add(cmd) => {
                let name = text_or_prompt(cmd.name.clone(), "Name")?;
                let phone = text_or_prompt(cmd.phone.clone(), "Phone")?;
                let mut input = CustomerInput::new(name, phone);
                if let Some(notes) = &cmd.notes {
                    input = input.with_notes(notes.clone());
                }
                if let Some(ApiResponse::Data(customer)) = screen.create(&input).await {
                    println!("  {} {}", style("ID:").bold(), customer.id);
                }
            }
            CustomersCommand::Edit(cmd) => {
                let current = ctx
                    .api
                    .get_customer(cmd.id)
                    .await
                    .map_err(|e| format!("Failed to load customer: {}", e))?;
                let mut input = CustomerInput::from(&current);
                if let Some(name) = &cmd.name {
                    input.name = name.clone();
                }
                if let Some(phone) = &cmd.phone {
                    input.phone = phone.clone();
                }
                if let Some(notes) = &cmd.notes {
                    input = input.with_notes(notes.clone());
                }
                screen.update(cmd.id, &input).await;
            }
            CustomersCommand::Delete(cmd) => {
                let prompt = DeletePrompt {
                    assume_yes: cmd.yes,
                };
                if !screen.delete(cmd.id, &prompt).await && screen.notices().is_empty() {
                    println!("Cancelled.");
                }
            }
        }
        flush_notices(screen.notices())
    }
}

fn print_customers(screen: &CustomersController) {
    let customers = screen.filtered();
    heading("Customers");
    if customers.is_empty() {
        println!("No customers found");
        return;
    }
    for customer in customers {
        println!(
            "{:>5}  {:<24} {:<16} {}",
            style(customer.id).dim(),
            truncate(&customer.name),
            customer.phone,
            style(truncate(customer.notes.as_deref().unwrap_or(""))).dim()
        );
    }
}
