use clap::{Parser, Subcommand};
use console::style;
use greentick_sdk::{ApiResponse, views::RemindersController};
use greentick_types::{RecordId, ReminderInput, frequency, status};
use indexmap::IndexMap;

use crate::{
    Context,
    output::{flush_notices, format_date, heading, parse_date, parse_send_time, status_badge, truncate},
    prompt::{DeletePrompt, parse_variable, pick_customer},
};

#[derive(Subcommand, PartialEq, Clone, Debug)]
pub enum RemindersCommand {
    /// List reminders
    List(ListCommand),
    /// Schedule a reminder
    Add(AddCommand),
    /// Change a scheduled reminder
    Edit(EditCommand),
    /// Delete a reminder
    Delete(DeleteCommand),
    /// Send a pending reminder now
    Send(SendCommand),
    /// List message templates
    Templates,
    /// Render a template with variables
    Preview(PreviewCommand),
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct ListCommand {
    /// Only show reminders whose message contains this text
    #[arg(long = "filter", short = 'f')]
    pub filter: Option<String>,

    /// Only show reminders with this status
    #[arg(long = "status", value_parser = [status::PENDING, status::SENT, status::FAILED, status::COMPLETED])]
    pub status: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct AddCommand {
    /// Customer id (picked interactively when omitted)
    #[arg(long = "customer", short = 'c')]
    pub customer: Option<RecordId>,

    #[arg(long = "message", short = 'm')]
    pub message: Option<String>,

    /// Send time: YYYY-MM-DD HH:MM (local) or RFC 3339
    #[arg(long = "at")]
    pub at: String,

    #[arg(long = "frequency", default_value = frequency::ONE_TIME, value_parser = frequency::ALL)]
    pub frequency: String,

    /// Last day of a recurring reminder (YYYY-MM-DD)
    #[arg(long = "until")]
    pub until: Option<String>,

    /// Template id; its preview becomes the message when none is given
    #[arg(long = "template", short = 't')]
    pub template: Option<String>,

    /// Template variable as key=value, repeatable
    #[arg(long = "var", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct EditCommand {
    pub id: RecordId,

    #[arg(long = "message", short = 'm')]
    pub message: Option<String>,

    /// Send time: YYYY-MM-DD HH:MM (local) or RFC 3339
    #[arg(long = "at")]
    pub at: Option<String>,

    #[arg(long = "frequency", value_parser = frequency::ALL)]
    pub frequency: Option<String>,

    /// Last day of a recurring reminder (YYYY-MM-DD)
    #[arg(long = "until")]
    pub until: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct DeleteCommand {
    pub id: RecordId,
    /// Skip the confirmation prompt
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct SendCommand {
    pub id: RecordId,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct PreviewCommand {
    pub template: String,

    /// Template variable as key=value, repeatable
    #[arg(long = "var", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,
}

fn variables(vars: &[(String, String)]) -> IndexMap<String, String> {
    vars.iter().cloned().collect()
}

impl RemindersCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let mut screen = RemindersController::new(ctx.api.clone());
        match self {
            RemindersCommand::List(cmd) => {
                screen.set_status_filter(cmd.status.clone());
                screen.load_customers().await;
                screen.on_visible().await;
                if let Some(filter) = &cmd.filter {
                    screen.set_filter(filter.clone());
                }
                print_reminders(&screen);
            }
            RemindersCommand::Add(cmd) => {
                let customer_id = match cmd.customer {
                    Some(id) => id,
                    None => {
                        let customers = screen.load_customers().await.to_vec();
                        flush_notices(screen.notices())?;
                        pick_customer(&customers)?
                    }
                };

                let vars = variables(&cmd.vars);
                let message = match (&cmd.message, &cmd.template) {
                    (Some(message), _) => message.clone(),
                    (None, Some(template)) => screen.preview(template, &vars).await.unwrap_or_default(),
                    (None, None) => String::new(),
                };

                let mut input = ReminderInput::new(customer_id, message, parse_send_time(&cmd.at)?)
                    .with_frequency(cmd.frequency.clone());
                if let Some(until) = &cmd.until {
                    input = input.with_recurring_end_date(parse_date(until)?);
                }
                if let Some(template) = &cmd.template {
                    input = input.with_template(template.clone(), vars);
                }

                if let Some(ApiResponse::Data(reminder)) = screen.create(&input).await {
                    println!("  {} {}", style("ID:").bold(), reminder.id);
                }
            }
            RemindersCommand::Edit(cmd) => {
                let current = ctx
                    .api
                    .get_reminder(cmd.id)
                    .await
                    .map_err(|e| format!("Failed to load reminder: {}", e))?;
                let mut input = ReminderInput::from(&current);
                if let Some(message) = &cmd.message {
                    input.message = message.clone();
                }
                if let Some(at) = &cmd.at {
                    input.send_time = parse_send_time(at)?;
                }
                if let Some(value) = &cmd.frequency {
                    input = input.with_frequency(value.clone());
                }
                if let Some(until) = &cmd.until {
                    input = input.with_recurring_end_date(parse_date(until)?);
                }
                screen.update(cmd.id, &input).await;
            }
            RemindersCommand::Delete(cmd) => {
                let prompt = DeletePrompt {
                    assume_yes: cmd.yes,
                };
                if !screen.delete(cmd.id, &prompt).await && screen.notices().is_empty() {
                    println!("Cancelled.");
                }
            }
            RemindersCommand::Send(cmd) => {
                screen.send_now(cmd.id).await;
            }
            RemindersCommand::Templates => {
                let templates = screen.load_templates().await;
                heading("Templates");
                if templates.is_empty() {
                    println!("No templates found");
                }
                for template in templates {
                    println!(
                        "{}  {}",
                        style(&template.id).bold(),
                        template.name.as_deref().unwrap_or("")
                    );
                    if !template.variables.is_empty() {
                        println!(
                            "    {} {}",
                            style("Variables:").dim(),
                            template.variables.join(", ")
                        );
                    }
                }
            }
            RemindersCommand::Preview(cmd) => {
                if let Some(preview) = screen.preview(&cmd.template, &variables(&cmd.vars)).await {
                    println!("{}", preview);
                }
            }
        }
        flush_notices(screen.notices())
    }
}

fn print_reminders(screen: &RemindersController) {
    let reminders = screen.filtered();
    heading("Reminders");
    if reminders.is_empty() {
        println!("No reminders found");
        return;
    }
    for reminder in reminders {
        let customer = screen
            .customer_name(reminder.customer_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Customer {}", reminder.customer_id));
        let repeat = if frequency::is_recurring(&reminder.frequency) {
            format!(" ({})", reminder.frequency)
        } else {
            String::new()
        };
        println!(
            "{:>5}  {:<20} {:<33} {:<10} {}{}",
            style(reminder.id).dim(),
            truncate(&customer),
            truncate(&reminder.message),
            status_badge(&reminder.status),
            format_date(&reminder.send_time),
            style(repeat).dim()
        );
    }
}
