//! General Discord commands - ping, help and the category list.
//! None of these touch the ledgers.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::category::Category,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = format!(
            "**{} Help**\n\
            Here is a summary of all available commands.\n\n\
            **Stock**\n\
            • `/stock add <name> <quantity> [category] [threshold] [barcode]` - Receives stock; adds to an existing product of the same name.\n\
            • `/stock list` - Lists all products.\n\
            • `/stock low` - Lists products at or below their low-stock threshold.\n\
            • `/stock find <barcode>` - Looks a product up by barcode.\n\
            • `/stock edit <product> [name] [category] [threshold] [barcode]` - Edits a product.\n\
            • `/stock set <product> <quantity>` - Overwrites the on-hand quantity after a count.\n\n\
            **Sales**\n\
            • `/sell <items> [customer]` - Rings up a sale, e.g. `Milk x2 @ 1.50; #4901234 x1 @ 3`.\n\
            • `/history [limit] [today]` - Shows recent sales.\n\
            • `/receipt <id>` - Shows one sale in full.\n\
            • `/void <id> [restore_stock]` - Voids a sale, putting the stock back by default.\n\
            • `/analytics` - Revenue, best sellers and daily sales.\n\n\
            **Utility**\n\
            • `/categories` - Lists product categories.\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.",
            ctx.data().shop.name
        );

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists the product categories and their keys.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let lines: Vec<String> = Category::ALL
            .iter()
            .map(|c| format!("• **{}** - `{}`", c.label(), c.key()))
            .collect();

        ctx.say(format!("**Categories**\n{}", lines.join("\n")))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
