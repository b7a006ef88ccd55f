use time::macros::format_description;
use tracing_subscriber::{fmt::time::LocalTime, EnvFilter};

pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .init();
}

/// Checks on flag values that only make sense at the command line. Numeric
/// limits are enforced by `Config::validate`.
pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if let Some(user_agent) = &args.user_agent {
        if user_agent.trim().is_empty() {
            anyhow::bail!("--user-agent must not be blank");
        }
    }

    if args.block_selector.trim().is_empty() {
        anyhow::bail!("--block-selector must not be blank");
    }

    if args.link_selector.trim().is_empty() {
        anyhow::bail!("--link-selector must not be blank");
    }

    Ok(())
}
