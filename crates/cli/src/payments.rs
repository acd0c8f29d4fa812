use clap::{Parser, Subcommand};
use console::style;
use greentick_sdk::{ApiResponse, views::PaymentsController};
use greentick_types::{PaymentInput, RecordId};

use crate::{
    Context,
    output::{flush_notices, format_currency, format_date, heading, status_badge, truncate},
    prompt::{DeletePrompt, pick_customer},
};

#[derive(Subcommand, PartialEq, Clone, Debug)]
pub enum PaymentsCommand {
    /// List payment requests
    List(ListCommand),
    /// Request a payment from a customer
    Add(AddCommand),
    /// Delete a payment request
    Delete(DeleteCommand),
    /// Send the payment link to the customer again
    SendLink(IdCommand),
    /// Open the invoice in the browser
    Invoice(InvoiceCommand),
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct ListCommand {
    /// Only show payments whose description contains this text
    #[arg(long = "filter", short = 'f')]
    pub filter: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct AddCommand {
    /// Customer id (picked interactively when omitted)
    #[arg(long = "customer", short = 'c')]
    pub customer: Option<RecordId>,

    #[arg(long = "amount", short = 'a')]
    pub amount: f64,

    #[arg(long = "description", short = 'd', default_value = "")]
    pub description: String,

    /// Do not send the payment link right away
    #[arg(long = "no-link")]
    pub no_link: bool,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct DeleteCommand {
    pub id: RecordId,
    /// Skip the confirmation prompt
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct IdCommand {
    pub id: RecordId,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct InvoiceCommand {
    pub id: RecordId,
    /// Print the URL instead of opening it
    #[arg(long = "print")]
    pub print: bool,
}

impl PaymentsCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let mut screen = PaymentsController::new(ctx.api.clone());
        match self {
            PaymentsCommand::List(cmd) => {
                screen.on_visible().await;
                if let Some(filter) = &cmd.filter {
                    screen.set_filter(filter.clone());
                }
                print_payments(&screen);
            }
            PaymentsCommand::Add(cmd) => {
                let customer_id = match cmd.customer {
                    Some(id) => id,
                    None => {
                        let customers = screen.load_customers().await.to_vec();
                        flush_notices(screen.notices())?;
                        pick_customer(&customers)?
                    }
                };
                let input = PaymentInput::new(customer_id, cmd.amount, cmd.description.clone())
                    .with_send_payment_link(!cmd.no_link);
                if let Some(ApiResponse::Data(payment)) = screen.create(&input).await {
                    println!("  {} {}", style("ID:").bold(), payment.id);
                    if let Some(link) = &payment.payment_link {
                        println!("  {} {}", style("Link:").bold(), link);
                    }
                }
            }
            PaymentsCommand::Delete(cmd) => {
                let prompt = DeletePrompt {
                    assume_yes: cmd.yes,
                };
                if !screen.delete(cmd.id, &prompt).await && screen.notices().is_empty() {
                    println!("Cancelled.");
                }
            }
            PaymentsCommand::SendLink(cmd) => {
                screen.send_link(cmd.id).await;
            }
            PaymentsCommand::Invoice(cmd) => {
                if let Some(url) = screen.invoice_url(cmd.id) {
                    if cmd.print {
                        println!("{}", url);
                    } else {
                        println!("Opening {}", url);
                        open::that(url.as_str())
                            .map_err(|e| format!("Failed to open browser: {}", e))?;
                    }
                }
            }
        }
        flush_notices(screen.notices())
    }
}

fn print_payments(screen: &PaymentsController) {
    let payments = screen.filtered();
    heading("Payments");
    if payments.is_empty() {
        println!("No payments found");
        return;
    }
    for payment in payments {
        println!(
            "{:>5}  {:<12} {:>12}  {:<33} {:<10} {}",
            style(payment.id).dim(),
            format!("Customer {}", payment.customer_id),
            format_currency(payment.amount),
            truncate(&payment.description),
            status_badge(&payment.status),
            format_date(&payment.created_at)
        );
    }
}
