use clap::Parser;
use skillswap::constants::{DEFAULT_SESSION_TTL_HOURS, SESSION_COOKIE_NAME};
use skillswap::utils::session::{Claims, issue_token};
use uuid::Uuid;

/// Mints a session cookie token for local development and testing. Session
/// issuance is otherwise the external auth layer's job.
#[derive(Parser, Debug)]
#[command(name = "mint_session")]
struct Args {
    /// User id to embed in the token; random when omitted
    #[arg(long)]
    user_id: Option<Uuid>,

    /// Email claim
    #[arg(long, default_value = "dev@example.com")]
    email: String,

    /// Token lifetime in hours
    #[arg(long, default_value_t = DEFAULT_SESSION_TTL_HOURS)]
    ttl_hours: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    let secret = std::env::var("SESSION_SECRET")
        .map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set"))?;

    let user_id = args.user_id.unwrap_or_else(Uuid::new_v4);
    let claims = Claims::new(user_id, args.email, args.ttl_hours);
    let token = issue_token(&secret, &claims)?;

    println!("user id: {user_id}");
    println!("{SESSION_COOKIE_NAME}={token}");

    Ok(())
}
