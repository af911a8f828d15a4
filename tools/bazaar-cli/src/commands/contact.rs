//! Contact form command.

use anyhow::Result;
use bazaar_commerce::contact::ContactForm;

use super::{ContactArgs, ContactCommand};
use crate::context::Context;

/// Run the contact command.
pub async fn run(args: ContactArgs, ctx: &Context) -> Result<()> {
    let ContactCommand::Send {
        name,
        email,
        subject,
        message,
    } = args.command;

    let form = ContactForm {
        name,
        email,
        subject,
        message,
    };

    let shop = ctx.shop().await?;
    if let Some(sent) = ctx.output.action(shop.submit_contact(&form).await)? {
        ctx.output.kv("Reference", sent.id.as_str());
    }
    Ok(())
}
