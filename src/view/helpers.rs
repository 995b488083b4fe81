//! Theme helpers exposed to templates.

use std::sync::Arc;

use minijinja::{Environment, State};

use crate::registry::ThemeRegistry;
use crate::resolver::compose_asset_path;

/// Registers the theme template functions on a minijinja environment.
///
/// - `theme_asset(path, theme_type=None)`: public path of an asset inside the
///   active theme of `theme_type`, prefixed with the configured `asset_url`
///   when there is one. Without an argument the type comes from `themeType`
///   in the render context, then from the registry's default type.
///
/// ```jinja
/// <link rel="stylesheet" href="{{ theme_asset('css/app.css') }}">
/// ```
pub fn register_helpers(env: &mut Environment<'static>, registry: Arc<ThemeRegistry>) {
    env.add_function(
        "theme_asset",
        move |state: &State, path: String, theme_type: Option<String>| -> String {
            let theme_type = theme_type
                .or_else(|| {
                    state
                        .lookup("themeType")
                        .and_then(|value| value.as_str().map(str::to_string))
                })
                .unwrap_or_else(|| registry.default_type());
            let segment = registry.type_path(&theme_type).unwrap_or_default();
            let theme = registry.active_theme(&theme_type);
            let relative = compose_asset_path(&segment, &theme, &path);
            match registry.asset_url() {
                Some(url) => format!("{}/{}", url.trim_end_matches('/'), relative),
                None => relative,
            }
        },
    );
}
