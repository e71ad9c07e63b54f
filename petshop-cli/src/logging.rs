use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

const SHOP_TARGETS: [&str; 3] = ["petshop_cli", "petshop_client", "petshop_core"];

/// Уровень `level` для своих crate, сторонние (`reqwest`, `hyper`) только с `warn`.
fn shop_directives(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(SHOP_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Логи идут в stderr, stdout остаётся под вывод команд.
/// `RUST_LOG` перекрывает `LOG_LEVEL` целиком.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(shop_directives(level)))
        .unwrap_or_else(|_| EnvFilter::new(shop_directives("info")));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_applies_to_shop_crates_only() {
        assert_eq!(
            shop_directives("debug"),
            "warn,petshop_cli=debug,petshop_client=debug,petshop_core=debug"
        );
    }

    #[test]
    fn directives_parse_as_filter() {
        assert!(EnvFilter::try_new(shop_directives("trace")).is_ok());
    }
}
