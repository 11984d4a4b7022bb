//! Flag lookup shared by the binaries: `--name value` or `--name=value`.

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

pub fn args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefixed = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefixed) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    let long = format!("--{name}");
    args.iter().any(|a| *a == long)
}

pub fn parse_flag<T>(args: &[String], name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    flag_value(args, name)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("invalid value for --{name}: {raw}"))
        })
        .transpose()
}

pub fn require_flag<T>(args: &[String], name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_flag(args, name)?.ok_or_else(|| anyhow!("missing required flag --{name}"))
}
