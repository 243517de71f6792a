use anyhow::Result;
use scrub_admin::AdminServer;

use super::Context;

pub async fn handle(ctx: Context, host: Option<String>, port: Option<u16>) -> Result<()> {
    let admin = &ctx.config.admin;
    let host = host.unwrap_or_else(|| admin.host.clone());
    let port = port.unwrap_or(admin.port);

    println!("Admin server: http://{}:{}/settings", host, port);

    let server = AdminServer::new(ctx.storage, ctx.masked_ip, admin);
    server.serve(&host, port).await
}
