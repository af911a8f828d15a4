//! Admin commands.
//!
//! `admin login` stores the session token under `.bazaar/session`; the other
//! subcommands send it with each request. Sessions outlive the process only
//! when the cache is file-backed.

use anyhow::{Context as _, Result};
use bazaar_commerce::checkout::{Order, OrderStatus};
use bazaar_commerce::contact::MessageStatus;
use bazaar_commerce::dashboard::DashboardSummary;
use dialoguer::Password;

use super::{AdminArgs, AdminCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the admin command.
pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AdminCommand::Login { password } => login(password, ctx).await,
        AdminCommand::Logout => logout(ctx).await,
        AdminCommand::Orders { limit } => orders(limit, ctx).await,
        AdminCommand::Status { order_id, status } => set_status(&order_id, &status, ctx).await,
        AdminCommand::Messages {
            mark: Some(id),
            status: Some(status),
        } => mark_message(&id, &status, ctx).await,
        AdminCommand::Messages { .. } => messages(ctx).await,
        AdminCommand::Dashboard => dashboard(ctx).await,
    }
}

async fn login(password: Option<String>, ctx: &Context) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Admin password")
            .interact()
            .context("Failed to read password")?,
    };

    let shop = ctx.shop().await?;
    if let Some(session) = ctx.output.action(shop.admin_login(&password))? {
        ctx.write_session(session.token.as_str())?;
        ctx.output.kv(
            "Expires",
            &session.expires_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        );
        if ctx.settings.cache.path.is_none() {
            ctx.output
                .warn("The cache is in memory; set [cache] path to keep the session between runs.");
        }
    }
    Ok(())
}

async fn logout(ctx: &Context) -> Result<()> {
    let Some(token) = ctx.read_session()? else {
        ctx.output.info("Not logged in");
        return Ok(());
    };

    let shop = ctx.shop().await?;
    let result = shop.admin_logout(&token);
    ctx.clear_session()?;
    ctx.output.action(result)?;
    Ok(())
}

fn print_orders(orders: &[Order], ctx: &Context) {
    let widths = [22, 22, 14, 12, 18];
    ctx.output.table_row(
        &["ORDER", "CUSTOMER", "TOTAL", "STATUS", "PLACED"],
        &widths,
    );
    for order in orders {
        ctx.output.table_row(
            &[
                &order.order_number,
                &truncate(&order.customer.full_name, 22),
                &order.total_amount.to_string(),
                &status_badge(order.status.as_str()),
                &order.placed_at.format("%Y-%m-%d %H:%M").to_string(),
            ],
            &widths,
        );
    }
}

async fn orders(limit: Option<usize>, ctx: &Context) -> Result<()> {
    let token = ctx.read_session()?;
    let shop = ctx.shop().await?;
    let mut orders = ctx
        .output
        .action(shop.list_orders(token.as_deref()).await)?
        .unwrap_or_default();

    if let Some(limit) = limit {
        orders.truncate(limit);
    }
    ctx.output.header("Orders");
    print_orders(&orders, ctx);
    Ok(())
}

async fn set_status(order_id: &str, status: &str, ctx: &Context) -> Result<()> {
    let status = OrderStatus::parse(status)?;
    let token = ctx.read_session()?;
    let shop = ctx.shop().await?;

    let result = shop
        .update_order_status(token.as_deref(), order_id, status)
        .await;
    if let Some(order) = ctx.output.action(result)? {
        ctx.output.kv("Order", &order.order_number);
        ctx.output.kv("Status", &status_badge(order.status.as_str()));
    }
    Ok(())
}

async fn messages(ctx: &Context) -> Result<()> {
    let token = ctx.read_session()?;
    let shop = ctx.shop().await?;
    let messages = ctx
        .output
        .action(shop.list_messages(token.as_deref()).await)?
        .unwrap_or_default();

    ctx.output.header("Messages");
    let widths = [18, 20, 28, 8, 16];
    ctx.output
        .table_row(&["ID", "FROM", "SUBJECT", "STATUS", "SENT"], &widths);
    for m in &messages {
        ctx.output.table_row(
            &[
                &truncate(m.id.as_str(), 18),
                &truncate(&m.email, 20),
                &truncate(&m.subject, 28),
                &status_badge(m.status.as_str()),
                &m.sent_at.format("%Y-%m-%d %H:%M").to_string(),
            ],
            &widths,
        );
    }
    Ok(())
}

async fn mark_message(id: &str, status: &str, ctx: &Context) -> Result<()> {
    let status = MessageStatus::parse(status)?;
    let token = ctx.read_session()?;
    let shop = ctx.shop().await?;

    ctx.output
        .action(shop.mark_message(token.as_deref(), id, status).await)?;
    Ok(())
}

fn print_dashboard(summary: &DashboardSummary, ctx: &Context) {
    ctx.output.header("Dashboard");
    ctx.output.kv("Orders", &summary.total_orders.to_string());
    ctx.output.kv("Pending", &summary.pending_orders.to_string());
    ctx.output.kv("Revenue", &summary.revenue.to_string());
    ctx.output
        .kv("Average order", &summary.average_order_value.to_string());
    ctx.output.kv("Products", &summary.product_count.to_string());
    ctx.output
        .kv("Subscribers", &summary.subscriber_count.to_string());

    ctx.output.header("Sales");
    for bar in &summary.chart {
        let width = usize::from(bar.height_percent) / 4;
        ctx.output.table_row(
            &[&bar.label, &"█".repeat(width), &bar.value.to_string()],
            &[4, 25, 14],
        );
    }
}

async fn dashboard(ctx: &Context) -> Result<()> {
    let token = ctx.read_session()?;
    let shop = ctx.shop().await?;
    let spinner = ctx.output.spinner("Loading dashboard...");
    let result = shop.dashboard(token.as_deref()).await;
    spinner.finish_and_clear();

    if let Some(summary) = ctx.output.action(result)? {
        print_dashboard(&summary, ctx);
    }
    Ok(())
}
