//! Login, signup and session status

use clap::Parser;
use console::style;
use greentick_types::SignupRequest;

use crate::{
    Context,
    prompt::{password_or_prompt, text_or_prompt},
};

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct LoginCommand {
    /// Email address for authentication
    #[arg(long = "email", short = 'e')]
    pub email: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(long = "password", short = 'p', requires = "email")]
    pub password: Option<String>,
}

impl LoginCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        if self.email.is_none()
            && let Some(name) = ctx.session.display_name()
        {
            println!("{} Logged in as {}.", style("✓").green(), name);
            return Ok(());
        }

        let email = text_or_prompt(self.email.clone(), "Email")?;
        let password = password_or_prompt(self.password.clone())?;
        let session = ctx
            .session
            .login(&ctx.api, &email, &password)
            .await
            .map_err(|e| e.to_string())?;

        println!(
            "{} Logged in as {}.",
            style("✓").green(),
            session.user.display_name()
        );
        Ok(())
    }
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct SignupCommand {
    #[arg(long = "email", short = 'e')]
    pub email: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(long = "password", short = 'p')]
    pub password: Option<String>,

    /// Contact phone number
    #[arg(long = "phone")]
    pub phone: Option<String>,

    #[arg(long = "business-name")]
    pub business_name: Option<String>,

    /// WhatsApp number reminders are sent from (default: the phone number)
    #[arg(long = "whatsapp")]
    pub whatsapp: Option<String>,
}

impl SignupCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let email = text_or_prompt(self.email.clone(), "Email")?;
        let password = password_or_prompt(self.password.clone())?;
        let phone = text_or_prompt(self.phone.clone(), "Phone")?;
        let business_name = text_or_prompt(self.business_name.clone(), "Business name")?;

        let mut request = SignupRequest::new(email, password, phone, business_name);
        if let Some(number) = &self.whatsapp {
            request = request.with_business_whatsapp(number.clone());
        }

        let session = ctx
            .session
            .signup(&ctx.api, &request)
            .await
            .map_err(|e| format!("Signup failed: {}", e))?;

        println!(
            "{} Account created. Logged in as {}.",
            style("✓").green(),
            session.user.display_name()
        );
        Ok(())
    }
}

pub fn logout(ctx: &Context) -> Result<(), String> {
    ctx.session.logout();
    println!("Logged out successfully.");
    Ok(())
}

pub fn status(ctx: &Context) -> Result<(), String> {
    match ctx.session.user() {
        Some(user) => {
            println!("Logged in as: {}", user.display_name());
            println!("Email: {}", user.email);
            if let Some(number) = &user.business_whatsapp {
                println!("WhatsApp: {}", number);
            }
            println!("Backend: {}", ctx.api.config().base_url);
        }
        None => {
            println!("Not logged in. Run `greentick login` to authenticate.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct Harness {
        #[clap(flatten)]
        login: LoginCommand,
    }

    #[test]
    fn test_password_requires_email() {
        assert!(Harness::try_parse_from(["login", "-p", "secret"]).is_err());

        let parsed = Harness::try_parse_from(["login", "-e", "a@b.c", "-p", "secret"]).unwrap();
        assert_eq!(parsed.login.email.as_deref(), Some("a@b.c"));
    }
}
