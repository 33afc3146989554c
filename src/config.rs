use std::{fmt::Display, str::FromStr, sync::OnceLock};

use tracing::{info, warn};

pub struct AppConfig {
    pub api_base_url: String,
    pub callback_url: Option<String>,
    pub page_size: u32,
    pub search_debounce_ms: u32,
    pub receipt_logo: String,
}

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::load)
}

impl AppConfig {
    pub fn load() -> Self {
        Self {
            api_base_url: text(
                "NACOS_API_BASE_URL",
                option_env!("NACOS_API_BASE_URL"),
                "http://localhost:8000",
            )
            .trim_end_matches('/')
            .to_string(),
            callback_url: option_env!("NACOS_CALLBACK_URL").map(str::to_string),
            page_size: try_load("NACOS_PAGE_SIZE", option_env!("NACOS_PAGE_SIZE"), 10),
            search_debounce_ms: try_load(
                "NACOS_SEARCH_DEBOUNCE_MS",
                option_env!("NACOS_SEARCH_DEBOUNCE_MS"),
                500,
            ),
            receipt_logo: text(
                "NACOS_RECEIPT_LOGO",
                option_env!("NACOS_RECEIPT_LOGO"),
                "/nacos-logo.png",
            ),
        }
    }

    /// Where the checkout provider should send the student back to.
    pub fn checkout_callback(&self) -> String {
        if let Some(url) = &self.callback_url {
            return url.clone();
        }
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .map(|origin| format!("{origin}/"))
            .unwrap_or_else(|| "/".to_string())
    }
}

fn text(key: &str, value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

fn try_load<T: FromStr + Display + Copy>(key: &str, value: Option<&str>, default: T) -> T
where
    T::Err: Display,
{
    let Some(raw) = value else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_parses_value() {
        assert_eq!(try_load::<u32>("K", Some(" 25 "), 10), 25);
    }

    #[test]
    fn test_try_load_falls_back_on_garbage() {
        assert_eq!(try_load::<u32>("K", Some("ten"), 10), 10);
        assert_eq!(try_load::<u32>("K", None, 10), 10);
    }

    #[test]
    fn test_text_ignores_blank() {
        assert_eq!(text("K", Some("  "), "fallback"), "fallback");
        assert_eq!(text("K", Some("http://api"), "fallback"), "http://api");
    }
}
