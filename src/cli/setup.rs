use crate::core::config::{AppConfig, SourceConfig, UserProfile};
use anyhow::{Context, Result, bail};
use reqwest::Url;
use std::path::Path;

/// What `setup` records about the user and their spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub webapp_url: String,
    pub profile: UserProfile,
}

fn validate_url(webapp_url: &str) -> Result<String> {
    let webapp_url = webapp_url.trim();
    if webapp_url.is_empty() {
        bail!("Please provide a valid web app URL");
    }
    let url = Url::parse(webapp_url)
        .with_context(|| format!("Please provide a valid web app URL: {webapp_url}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("The web app URL must use http or https: {webapp_url}");
    }
    Ok(webapp_url.to_string())
}

/// Links the spreadsheet at the default config location
pub fn setup(options: &SetupOptions) -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path, options)
}

/// Creates the config at `path`, or updates the linked URL and profile of
/// an existing one. Profile fields that are not given keep their value.
pub fn setup_at_path<P: AsRef<Path>>(path: P, options: &SetupOptions) -> Result<()> {
    let path = path.as_ref();
    let webapp_url = validate_url(&options.webapp_url)?;

    let mut config = if path.exists() {
        AppConfig::load_from_path(path)?
    } else {
        AppConfig::default()
    };

    match &mut config.source {
        Some(source) => source.webapp_url = webapp_url,
        None => config.source = Some(SourceConfig::new(&webapp_url)),
    }

    let profile = &options.profile;
    if profile.email.is_some() {
        config.user.email = profile.email.clone();
    }
    if profile.name.is_some() {
        config.user.name = profile.name.clone();
    }
    if profile.picture.is_some() {
        config.user.picture = profile.picture.clone();
    }

    config.save_to_path(path)?;
    tracing::info!("Saved configuration at {}", path.display());
    Ok(())
}
