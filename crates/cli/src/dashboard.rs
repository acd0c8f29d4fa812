use console::style;
use greentick_sdk::views::DashboardController;

use crate::{
    Context,
    output::{flush_notices, format_currency, format_date, heading, status_badge, truncate},
};

pub async fn show(ctx: &Context) -> Result<(), String> {
    let mut screen = DashboardController::new(ctx.api.clone());
    screen.on_visible().await;
    flush_notices(screen.notices())?;

    println!("{}", style(screen.greeting()).bold().green());
    println!();

    let stats = screen.stats();
    println!("  {:<18} {}", "Total customers", stats.total_customers);
    println!("  {:<18} {}", "Active reminders", stats.active_reminders);
    println!("  {:<18} {}", "Total revenue", format_currency(stats.total_revenue));
    println!("  {:<18} {}%", "Delivery rate", stats.delivery_rate);
    println!();

    heading("Recent reminders");
    if screen.recent_reminders().is_empty() {
        println!("No reminders found");
    }
    for reminder in screen.recent_reminders() {
        println!(
            "  Customer {:<6} {:<33} {:<10} {}",
            reminder.customer_id,
            truncate(&reminder.message),
            status_badge(&reminder.status),
            format_date(&reminder.send_time)
        );
    }
    println!();

    heading("Recent payments");
    if screen.recent_payments().is_empty() {
        println!("No payments found");
    }
    for payment in screen.recent_payments() {
        println!(
            "  Customer {:<6} {:>12}  {:<10} {}",
            payment.customer_id,
            format_currency(payment.amount),
            status_badge(&payment.status),
            format_date(&payment.created_at)
        );
    }
    Ok(())
}
