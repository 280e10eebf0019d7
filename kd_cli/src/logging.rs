use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::io::Write;

/// Install the global logger; `KD_LOG` overrides `level`.
pub fn init_logging(level: &str) {
    let env = Env::default()
        .filter_or("KD_LOG", level)
        .write_style_or("KD_LOG_STYLE", "auto");

    Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:5} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        // stdout carries the results
        .target(Target::Stderr)
        .try_init()
        .ok();
}
