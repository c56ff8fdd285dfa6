use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use log::{info, warn};

pub const DEFAULT_TOUR_PATH: &str = "assets/rumtek_tour/data.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tour_path: PathBuf,
    pub io_threads: usize,
    /// Link indices to follow, one after another, from the entry scene
    pub route: Vec<usize>,
}

impl Config {
    /// Environment first, then positional arguments: `[TOUR_PATH] [LINK ...]`.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self {
            tour_path: try_load("EXPLORER_TOUR_PATH", DEFAULT_TOUR_PATH)?,
            io_threads: try_load("EXPLORER_IO_THREADS", "2")?,
            route: Vec::new(),
        };
        config.apply_args(env::args().skip(1))?;
        Ok(config)
    }

    pub fn apply_args(&mut self, args: impl IntoIterator<Item = String>) -> anyhow::Result<()> {
        let mut args = args.into_iter().peekable();

        if let Some(first) = args.next_if(|arg| arg.parse::<usize>().is_err()) {
            self.tour_path = PathBuf::from(first);
        }

        for arg in args {
            let index = arg
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid link index '{arg}': {e}"))?;
            self.route.push(index);
        }

        self.io_threads = self.io_threads.max(1);
        Ok(())
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().or_else(|e| {
        warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
        default
            .parse()
            .map_err(|e| anyhow::anyhow!("Bad default for {key}: {e}"))
    })
}
