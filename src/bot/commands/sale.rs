//! Sale Discord command - `/sell`.
//!
//! Parses the cart text, resolves products, and hands the cart to the sale
//! workflow. Any failure leaves stock untouched.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, cart_input, require_operator},
        core::{
            report,
            sale::{self, SaleRequest},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Rings up a sale.
    ///
    /// Items are separated by `;`, each written as `name x2 @ 1.50` or
    /// `#barcode x1 @ 3`. The quantity defaults to 1.
    #[poise::command(slash_command, prefix_command)]
    pub async fn sell(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Items, e.g. \"Milk x2 @ 1.50; #4901234 x1 @ 3\""] items: String,
        #[description = "Customer name"] customer: Option<String>,
    ) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();

        let entries = cart_input::parse_cart(&items)?;
        let items = cart_input::resolve_entries(
            &data.database,
            entries,
            data.shop.scope_for(&operator),
        )
        .await?;

        let record = sale::complete_sale(
            &data.database,
            SaleRequest {
                items,
                operator,
                customer_name: customer,
            },
        )
        .await?;

        let symbol = &data.shop.currency_symbol;
        let lines: Vec<String> = record
            .items
            .iter()
            .map(|item| report::format_line_item(item, symbol))
            .collect();

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("🧾 Sale {}", report::short_id(&record.id)))
            .color(0x0057_F287) // Discord green
            .description(lines.join("\n"))
            .field(
                "Total",
                format!("**{}**", report::format_amount(record.total_amount, symbol)),
                true,
            )
            .field("Cashier", &record.created_by, true);
        if let Some(customer) = &record.customer_name {
            embed = embed.field("Customer", customer, true);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
