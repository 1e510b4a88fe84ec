use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

impl Health {
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    pub fn ok() -> Self {
        Self { status: "ok", version: Self::VERSION }
    }
}

/// Error body returned by the HTTP surface.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}
