use clap::{Parser, Subcommand};
use console::style;
use greentick_sdk::views::ProfileController;

use crate::{Context, output::flush_notices};

#[derive(Subcommand, PartialEq, Clone, Debug)]
pub enum ProfileCommand {
    /// Show the business profile
    Show,
    /// Change the business name or WhatsApp number
    Update(UpdateCommand),
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct UpdateCommand {
    #[arg(long = "business-name")]
    pub business_name: Option<String>,

    /// WhatsApp number reminders are sent from
    #[arg(long = "whatsapp")]
    pub whatsapp: Option<String>,
}

impl ProfileCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let mut screen = ProfileController::new(ctx.api.clone());
        screen.on_visible().await;
        flush_notices(screen.notices())?;

        match self {
            ProfileCommand::Show => print_profile(&screen),
            ProfileCommand::Update(cmd) => {
                if cmd.business_name.is_none() && cmd.whatsapp.is_none() {
                    return Err("Nothing to update: pass --business-name or --whatsapp".to_string());
                }
                if let Some(name) = &cmd.business_name {
                    screen.business_name = name.clone();
                }
                if let Some(number) = &cmd.whatsapp {
                    screen.business_whatsapp = number.clone();
                }
                screen.save().await;
            }
        }
        flush_notices(screen.notices())
    }
}

fn print_profile(screen: &ProfileController) {
    println!("{} {}", style("Email:").bold(), screen.email());
    println!(
        "{} {}",
        style("Phone:").bold(),
        screen.phone().unwrap_or_default()
    );
    println!("{} {}", style("Business name:").bold(), screen.business_name);
    println!("{} {}", style("WhatsApp:").bold(), screen.business_whatsapp);
}
