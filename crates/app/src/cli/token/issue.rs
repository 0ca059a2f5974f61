use brewhouse_app::{auth::issue_token, domain::users::UserId, secrets::Secret};
use clap::Args;
use jiff::{SignedDuration, Timestamp};

#[derive(Debug, Args)]
pub(crate) struct IssueTokenArgs {
    /// User id (24 hex characters) the token is issued to
    #[arg(long)]
    user: UserId,

    /// Token lifetime in hours
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    ttl_hours: u32,

    /// HS256 signing secret shared with the JSON API
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Secret,
}

pub(crate) fn run(args: IssueTokenArgs) -> Result<(), String> {
    if args.jwt_secret.is_empty() {
        return Err("jwt secret cannot be empty".to_string());
    }

    let now = Timestamp::now();
    let ttl = SignedDuration::from_hours(i64::from(args.ttl_hours));

    let token = issue_token(&args.jwt_secret, args.user, now, ttl)
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("user: {}", args.user);
    println!("expires_in_hours: {}", args.ttl_hours);
    println!("bearer_token: {token}");

    Ok(())
}
