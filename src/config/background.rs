use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize, Deserialize)]
pub enum Background {
    Image(String),
    Color((u8, u8, u8)),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color((0, 0, 0))
    }
}
