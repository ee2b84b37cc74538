use crate::config::{
    Config,
    Severity,
    PASSWORD_ENV,
    USERNAME_ENV,
};
use anyhow::{
    ensure,
    Context,
};
use camino::Utf8Path;

/// Read the config file, then let `DROPCAM_USERNAME` and `DROPCAM_PASSWORD` override its credentials.
///
/// Runs before the logger exists, so everything goes to the stderr.
pub(crate) fn load_config(path: &Utf8Path) -> anyhow::Result<Config> {
    eprintln!("reading config from '{path}'...");
    let mut config =
        Config::load_from_path(path).with_context(|| format!("failed to read '{path}'"))?;

    for var in [USERNAME_ENV, PASSWORD_ENV] {
        if std::env::var_os(var).is_some() {
            eprintln!("using `{var}` from the environment");
        }
    }
    config.apply_env();

    let messages = config.validate();
    let mut num_errors = 0;
    for message in messages.iter() {
        let label = match message.severity() {
            Severity::Warn => "warning",
            Severity::Error => {
                num_errors += 1;
                "error"
            }
        };
        eprintln!("config {label}: {}", message.error());
    }

    ensure!(
        num_errors == 0,
        "'{path}' has {num_errors} config error(s), see above"
    );

    Ok(config)
}
