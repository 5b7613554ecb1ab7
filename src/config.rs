use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub seed_mock_data: bool,
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = match env::var("BIND_ADDR") {
            Ok(addr) => addr,
            Err(_) => match env::var("PORT") {
                Ok(port) => {
                    let port: u16 = port
                        .parse()
                        .map_err(|e| anyhow::anyhow!("invalid PORT {port:?}: {e}"))?;
                    format!("0.0.0.0:{port}")
                }
                Err(_) => "0.0.0.0:5000".to_string(),
            },
        };

        let seed_mock_data = env::var("SEED_MOCK_DATA")
            .ok()
            .map(|s| parse_flag(&s))
            .unwrap_or(true);

        let seed_file = env::var("SEED_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            seed_mock_data,
            seed_file,
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
