use super::ui;
use crate::SubsCommand;
use crate::core::subs::{self, BillingCycle, SubsBook, Subscription};
use crate::store::Store;
use anyhow::{Result, bail};
use chrono::Local;
use comfy_table::{Cell, CellAlignment};

pub async fn run(store: &dyn Store, command: SubsCommand) -> Result<()> {
    let book = SubsBook::new(store)?;
    match command {
        SubsCommand::List => list(&book).await,
        SubsCommand::Add {
            name,
            amount,
            cycle,
            due,
            category,
        } => add(&book, &name, amount, &cycle, &due, category.as_deref()).await,
        SubsCommand::Remove { id } => remove(&book, &id).await,
    }
}

async fn add(
    book: &SubsBook,
    name: &str,
    amount: f64,
    cycle: &str,
    due: &str,
    category: Option<&str>,
) -> Result<()> {
    if amount <= 0.0 {
        bail!("Amount must be positive, got {amount}");
    }

    let cycle: BillingCycle = cycle.parse()?;
    let due = super::parse_date(due)?;
    let subscription = Subscription::new(name, amount, cycle, due, category);
    book.add(&subscription).await?;

    println!(
        "Added {} at {} {} (id {})",
        subscription.name,
        ui::format_usd(subscription.amount),
        subscription.billing_cycle,
        subscription.id
    );
    Ok(())
}

async fn list(book: &SubsBook) -> Result<()> {
    let subscriptions = book.list().await?;
    if subscriptions.is_empty() {
        println!(
            "{}",
            ui::style_text("No subscriptions tracked yet.", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let today = Local::now().date_naive();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Amount"),
        ui::header_cell("Cycle"),
        ui::header_cell("Next Due"),
        ui::header_cell("Category"),
        ui::header_cell("Status"),
    ]);

    for subscription in &subscriptions {
        let due_in = subs::days_until_due(subscription.next_due_date, today);
        table.add_row(vec![
            Cell::new(&subscription.id),
            Cell::new(&subscription.name),
            Cell::new(ui::format_usd(subscription.amount)).set_alignment(CellAlignment::Right),
            Cell::new(subscription.billing_cycle.to_string()),
            Cell::new(format!("{} ({})", subscription.next_due_date, due_phrase(due_in))),
            Cell::new(&subscription.category),
            Cell::new(if subscription.active { "active" } else { "paused" }),
        ]);
    }

    println!("{table}");
    println!(
        "\n{} {}   {} {}",
        ui::style_text("Monthly:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_usd(subs::monthly_total(&subscriptions)),
            ui::StyleType::TotalValue
        ),
        ui::style_text("Yearly:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_usd(subs::yearly_total(&subscriptions)),
            ui::StyleType::TotalValue
        ),
    );
    Ok(())
}

async fn remove(book: &SubsBook, id: &str) -> Result<()> {
    if !book.remove(id).await? {
        bail!("No subscription with id {id}");
    }
    println!("Removed subscription {id}");
    Ok(())
}

fn due_phrase(days: i64) -> String {
    match days {
        0 => "due today".to_string(),
        d if d > 0 => format!("due in {d} days"),
        d => format!("overdue by {} days", -d),
    }
}
