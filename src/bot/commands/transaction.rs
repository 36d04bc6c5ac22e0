//! Transaction Discord commands - `history`, `receipt` and `void`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, require_operator},
        core::{report, transaction},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    const DEFAULT_HISTORY_LIMIT: u32 = 10;

    /// Shows recent sales, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many sales to show (default 10)"]
        #[min = 1]
        #[max = 50]
        limit: Option<u32>,
        #[description = "Only today's sales (shop time)"] today: Option<bool>,
    ) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let scope = data.shop.scope_for(&operator);
        let offset = data.shop.utc_offset()?;

        let (title, records) = if today.unwrap_or(false) {
            let date = Utc::now().with_timezone(&offset).date_naive();
            let records =
                transaction::get_transactions_for_day(&data.database, scope, date, offset).await?;
            (format!("**Sales on {date}**"), records)
        } else {
            let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
            let records =
                transaction::get_recent_transactions(&data.database, scope, u64::from(limit))
                    .await?;
            ("**Recent sales**".to_string(), records)
        };

        if records.is_empty() {
            ctx.say("No sales to show.").await?;
            return Ok(());
        }

        let symbol = &data.shop.currency_symbol;
        let total: f64 = records.iter().map(|r| r.total_amount).sum();
        let lines: Vec<String> = records
            .iter()
            .map(|r| report::format_transaction_summary(r, offset, symbol))
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title(title)
            .color(0x0058_65F2) // Discord purple
            .description(lines.join("\n"))
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} sales · {}",
                records.len(),
                report::format_amount(total, symbol)
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows one sale in full.
    #[poise::command(slash_command, prefix_command)]
    pub async fn receipt(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Transaction ID or the first characters shown in /history"]
        #[autocomplete = "autocomplete::autocomplete_transaction_id"]
        id: String,
    ) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let scope = data.shop.scope_for(&operator);

        let id = transaction::resolve_transaction_id(&data.database, &id, scope).await?;
        let record = transaction::get_transaction_by_id(&data.database, &id, scope)
            .await?
            .ok_or(Error::TransactionNotFound { id })?;

        let symbol = &data.shop.currency_symbol;
        let offset = data.shop.utc_offset()?;
        let lines: Vec<String> = record
            .items
            .iter()
            .map(|item| report::format_line_item(item, symbol))
            .collect();

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("🧾 {}", data.shop.name))
            .color(0x0058_65F2)
            .description(lines.join("\n"))
            .field(
                "Total",
                format!("**{}**", report::format_amount(record.total_amount, symbol)),
                true,
            )
            .field("Cashier", &record.created_by, true)
            .field(
                "Time",
                record
                    .created_at
                    .with_timezone(&offset)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
                true,
            );
        if let Some(customer) = &record.customer_name {
            embed = embed.field("Customer", customer, true);
        }
        embed = embed.footer(serenity::CreateEmbedFooter::new(record.id.clone()));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Voids a sale. By default the sold quantities are put back on the shelf.
    #[poise::command(slash_command, prefix_command)]
    pub async fn void(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Transaction ID or the first characters shown in /history"]
        #[autocomplete = "autocomplete::autocomplete_transaction_id"]
        id: String,
        #[description = "Put the sold items back in stock (default yes)"]
        restore_stock: Option<bool>,
    ) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let scope = data.shop.scope_for(&operator);
        let restore = restore_stock.unwrap_or(true);

        let id = transaction::resolve_transaction_id(&data.database, &id, scope).await?;
        let outcome =
            transaction::reverse_transaction(&data.database, &id, scope, restore).await?;

        let mut message = format!(
            "✅ Sale `{}` voided.",
            report::short_id(&outcome.transaction_id)
        );
        if !outcome.restored.is_empty() {
            let restored: Vec<String> = outcome
                .restored
                .iter()
                .map(|r| format!("{} × {}", r.product_name, r.quantity))
                .collect();
            message.push_str(&format!("\nRestocked: {}", restored.join(", ")));
        }
        if !outcome.skipped.is_empty() {
            message.push_str(&format!(
                "\n⚠️ Could not restock (product no longer exists): {}",
                outcome.skipped.join(", ")
            ));
        }

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
