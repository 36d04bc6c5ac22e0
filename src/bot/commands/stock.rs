//! Stock Discord commands - the `/stock` command group.
//!
//! Receiving stock, listing and finding products, editing product details and
//! overwriting quantities after a count.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, require_operator},
        core::{
            category::Category,
            product::{self, NewProduct, ProductUpdate, StockIntake},
            report,
        },
        entities::product::Model as ProductModel,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Products shown in one list embed.
    const LIST_LIMIT: usize = 40;

    /// Parent command for stock management.
    #[poise::command(
        slash_command,
        subcommands(
            "stock_add",
            "stock_list",
            "stock_low",
            "stock_find",
            "stock_edit",
            "stock_set"
        )
    )]
    pub async fn stock(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Stock management command. Available subcommands:\n\
            `/stock add` - Receive stock\n\
            `/stock list` - List all products\n\
            `/stock low` - List low-stock products\n\
            `/stock find` - Find a product by barcode\n\
            `/stock edit` - Edit a product\n\
            `/stock set` - Overwrite a product's quantity";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Receives stock. If a product of the same name exists it is topped up.
    ///
    /// On a top-up the category, threshold and barcode are only replaced when given.
    #[poise::command(slash_command, rename = "add")]
    pub async fn stock_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product name"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        name: String,
        #[description = "Units received"] quantity: i64,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Warn when the quantity drops to this level (default 10)"]
        threshold: Option<i64>,
        #[description = "Barcode"] barcode: Option<String>,
    ) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let category = category.as_deref().map(Category::parse).transpose()?;

        let input = NewProduct {
            name,
            quantity,
            category,
            low_stock_threshold: threshold,
            barcode,
        };
        let intake = product::receive_stock(&ctx.data().database, input, &operator).await?;

        let message = match &intake {
            StockIntake::Created(p) => format!(
                "✅ New product **{}** added with {} on hand.",
                p.name, p.quantity
            ),
            StockIntake::Merged(p) => format!(
                "✅ Received {} × **{}**. Now {} on hand.",
                quantity, p.name, p.quantity
            ),
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Lists all products.
    #[poise::command(slash_command, rename = "list")]
    pub async fn stock_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let products =
            product::get_all_products(&data.database, data.shop.scope_for(&operator)).await?;

        if products.is_empty() {
            ctx.say("No products yet. Use `/stock add` to receive some!")
                .await?;
            return Ok(());
        }

        ctx.send(poise::CreateReply::default().embed(stock_embed("**Stock**", &products)))
            .await?;
        Ok(())
    }

    /// Lists products at or below their low-stock threshold.
    #[poise::command(slash_command, rename = "low")]
    pub async fn stock_low(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let products =
            product::get_low_stock_products(&data.database, data.shop.scope_for(&operator))
                .await?;

        if products.is_empty() {
            ctx.say("✅ Nothing is running low.").await?;
            return Ok(());
        }

        ctx.send(poise::CreateReply::default().embed(stock_embed("**⚠️ Low stock**", &products)))
            .await?;
        Ok(())
    }

    /// Looks a product up by barcode.
    #[poise::command(slash_command, rename = "find")]
    pub async fn stock_find(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Barcode to look up"] barcode: String,
    ) -> Result<()> {
        if require_operator(ctx).await?.is_none() {
            return Ok(());
        }

        let Some(found) = product::get_product_by_barcode(&ctx.data().database, &barcode).await?
        else {
            ctx.say(format!("❌ No product has barcode `{}`.", barcode.trim()))
                .await?;
            return Ok(());
        };

        ctx.say(report::format_stock_line(&found)).await?;
        Ok(())
    }

    /// Edits a product's name, category, threshold or barcode.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn stock_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to edit"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "New low-stock threshold"] threshold: Option<i64>,
        #[description = "New barcode (\"-\" removes it)"] barcode: Option<String>,
    ) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let update = ProductUpdate {
            name,
            category: category.as_deref().map(Category::parse).transpose()?,
            low_stock_threshold: threshold,
            barcode: barcode.map(|b| if b.trim() == "-" { String::new() } else { b }),
        };
        if update == ProductUpdate::default() {
            ctx.say("Nothing to change.").await?;
            return Ok(());
        }

        let existing = find_in_scope(ctx, &operator, &product_name).await?;
        let updated = product::update_product(&ctx.data().database, &existing.id, update).await?;

        ctx.say(format!("✅ Updated: {}", report::format_stock_line(&updated)))
            .await?;
        Ok(())
    }

    /// Overwrites the on-hand quantity of a product, e.g. after a stock count.
    #[poise::command(slash_command, rename = "set")]
    pub async fn stock_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to count"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
        #[description = "Units actually on hand"] quantity: i64,
    ) -> Result<()> {
        let Some(operator) = require_operator(ctx).await? else {
            return Ok(());
        };
        let existing = find_in_scope(ctx, &operator, &product_name).await?;
        let updated =
            product::set_product_quantity(&ctx.data().database, &existing.id, quantity).await?;

        ctx.say(format!(
            "✅ **{}** set to {} on hand (was {}).",
            updated.name, updated.quantity, existing.quantity
        ))
        .await?;
        Ok(())
    }

    async fn find_in_scope(
        ctx: poise::Context<'_, BotData, Error>,
        operator: &str,
        name: &str,
    ) -> Result<ProductModel> {
        let data = ctx.data();
        product::get_product_by_name(&data.database, name, data.shop.scope_for(operator))
            .await?
            .ok_or_else(|| Error::ProductNotFound {
                name: name.trim().to_string(),
            })
    }

    fn stock_embed(title: &str, products: &[ProductModel]) -> serenity::CreateEmbed {
        let mut lines: Vec<String> = products
            .iter()
            .take(LIST_LIMIT)
            .map(|p| format!("• {}", report::format_stock_line(p)))
            .collect();
        if products.len() > LIST_LIMIT {
            lines.push(format!("…and {} more", products.len() - LIST_LIMIT));
        }

        serenity::CreateEmbed::default()
            .title(title)
            .color(0x0058_65F2) // Discord purple
            .description(lines.join("\n"))
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} products",
                products.len()
            )))
    }
}

// Re-export all commands
pub use inner::*;
