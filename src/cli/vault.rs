use super::ui;
use crate::VaultCommand;
use crate::core::savings::{SavingsVault, VaultBook};
use crate::store::Store;
use anyhow::{Context, Result, bail};
use chrono::Local;
use comfy_table::{Cell, CellAlignment};

pub async fn run(store: &dyn Store, command: VaultCommand) -> Result<()> {
    let book = VaultBook::new(store)?;
    match command {
        VaultCommand::List => list(&book).await,
        VaultCommand::Add {
            name,
            target,
            deadline,
        } => add(&book, &name, target, deadline.as_deref()).await,
        VaultCommand::Deposit { id, amount } => deposit(&book, &id, amount).await,
    }
}

async fn add(book: &VaultBook, name: &str, target: f64, deadline: Option<&str>) -> Result<()> {
    if target <= 0.0 {
        bail!("Target must be positive, got {target}");
    }

    let deadline = deadline.map(super::parse_date).transpose()?;
    let vault = SavingsVault::new(name, target, deadline);
    book.save(&vault).await?;

    println!(
        "Created vault {} targeting {} (id {})",
        vault.name,
        ui::format_usd(vault.target_amount),
        vault.id
    );
    Ok(())
}

async fn deposit(book: &VaultBook, id: &str, amount: f64) -> Result<()> {
    let mut vault = book
        .get(id)
        .await?
        .with_context(|| format!("No savings vault with id {id}"))?;

    vault.deposit(amount)?;
    book.save(&vault).await?;

    println!(
        "Saved {} into {}, now at {:.1}% of target",
        ui::format_usd(amount),
        vault.name,
        vault.progress_pct()
    );
    Ok(())
}

async fn list(book: &VaultBook) -> Result<()> {
    let vaults = book.list().await?;
    if vaults.is_empty() {
        println!(
            "{}",
            ui::style_text("No savings vaults yet.", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let today = Local::now().date_naive();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Saved"),
        ui::header_cell("Target"),
        ui::header_cell("Progress"),
        ui::header_cell("Deadline"),
    ]);

    for vault in &vaults {
        let deadline = ui::format_optional_cell(
            vault.deadline.zip(vault.days_left(today)),
            |(date, left)| {
                if left >= 0 {
                    format!("{date} ({left} days left)")
                } else {
                    format!("{date} (passed)")
                }
            },
        );

        table.add_row(vec![
            Cell::new(&vault.id),
            Cell::new(&vault.name),
            Cell::new(ui::format_usd(vault.current_amount)).set_alignment(CellAlignment::Right),
            Cell::new(ui::format_usd(vault.target_amount)).set_alignment(CellAlignment::Right),
            ui::format_percentage_cell(vault.progress_pct(), |p| format!("{p:.1}%")),
            deadline,
        ]);
    }

    println!("{table}");
    Ok(())
}
