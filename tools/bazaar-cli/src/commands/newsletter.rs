//! Newsletter commands.

use anyhow::Result;

use super::{NewsletterArgs, NewsletterCommand};
use crate::context::Context;

/// Run the newsletter command.
pub async fn run(args: NewsletterArgs, ctx: &Context) -> Result<()> {
    let shop = ctx.shop().await?;
    let result = match args.command {
        NewsletterCommand::Subscribe { email } => shop.subscribe(&email).await,
        NewsletterCommand::Unsubscribe { email } => shop.unsubscribe(&email).await,
    };

    if let Some(subscription) = ctx.output.action(result)? {
        ctx.output.kv("Email", &subscription.email);
        ctx.output.kv(
            "Since",
            &subscription.subscribed_at.format("%Y-%m-%d").to_string(),
        );
    }
    Ok(())
}
