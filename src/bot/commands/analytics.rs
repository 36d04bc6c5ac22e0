//! Analytics Discord command - `/analytics`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, require_operator},
        core::{analytics, report},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Days shown in the daily breakdown; the full 30-day series is in the core result.
    const DAYS_SHOWN: usize = 7;

    /// Shows revenue, best sellers, daily and per-category sales.
    #[poise::command(slash_command, prefix_command)]
    pub async fn analytics(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let report_data =
            analytics::generate_analytics(&data.database, data.shop.scope_for(&operator)).await?;
        let symbol = &data.shop.currency_symbol;
        let summary = &report_data.summary;

        let top_products = if report_data.top_products.is_empty() {
            "No sales yet".to_string()
        } else {
            report_data
                .top_products
                .iter()
                .enumerate()
                .map(|(rank, p)| {
                    format!(
                        "{}. {} · {} sold · {}",
                        rank + 1,
                        p.name,
                        p.quantity,
                        report::format_amount(p.revenue, symbol)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let skip = report_data.sales_by_day.len().saturating_sub(DAYS_SHOWN);
        let daily = report_data
            .sales_by_day
            .iter()
            .skip(skip)
            .map(|d| format!("{} · {}", d.date, report::format_amount(d.amount, symbol)))
            .collect::<Vec<_>>()
            .join("\n");

        let by_category = report_data
            .sales_by_category
            .iter()
            .map(|c| format!("{} · {}", c.category, report::format_amount(c.amount, symbol)))
            .collect::<Vec<_>>()
            .join("\n");

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("📊 {} analytics", data.shop.name))
            .color(0x0058_65F2)
            .field(
                "Revenue",
                report::format_amount(summary.total_revenue, symbol),
                true,
            )
            .field("Sales", summary.total_transactions.to_string(), true)
            .field(
                "Products",
                format!(
                    "{} ({} low)",
                    summary.total_products, summary.low_stock_count
                ),
                true,
            )
            .field("Top products", top_products, false);
        if !daily.is_empty() {
            embed = embed.field("Daily sales (UTC)", daily, false);
        }
        if !by_category.is_empty() {
            embed = embed.field("By category", by_category, false);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
