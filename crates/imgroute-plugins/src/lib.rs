//! Optional image operations
//!
//! Each plugin is a transform compiled in behind its own Cargo feature and
//! registered into the shared [`TransformRegistry`] at startup. Plugins obey
//! the same first-registration-wins rule as the built-ins, so a plugin can
//! never replace `origin`, `t` or `r`.

#[cfg(feature = "plugin-blur")]
mod blur;
#[cfg(feature = "plugin-grayscale")]
mod grayscale;
#[cfg(feature = "plugin-invert")]
mod invert;

#[cfg(feature = "plugin-blur")]
pub use blur::blur;
#[cfg(feature = "plugin-grayscale")]
pub use grayscale::grayscale;
#[cfg(feature = "plugin-invert")]
pub use invert::invert;

use imgroute_processing::TransformRegistry;

/// Plugin metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Plugins compiled into this build.
pub fn available_plugins() -> Vec<PluginInfo> {
    let mut plugins = Vec::new();

    #[cfg(feature = "plugin-invert")]
    plugins.push(invert::INFO);
    #[cfg(feature = "plugin-grayscale")]
    plugins.push(grayscale::INFO);
    #[cfg(feature = "plugin-blur")]
    plugins.push(blur::INFO);

    plugins
}

/// Register every compiled-in plugin. Returns the names actually registered.
pub fn register_plugins(registry: &mut TransformRegistry) -> Vec<&'static str> {
    let mut registered = Vec::new();

    #[cfg(feature = "plugin-invert")]
    {
        if registry.register(invert::INFO.name, invert) {
            registered.push(invert::INFO.name);
        }
    }
    #[cfg(feature = "plugin-grayscale")]
    {
        if registry.register(grayscale::INFO.name, grayscale) {
            registered.push(grayscale::INFO.name);
        }
    }
    #[cfg(feature = "plugin-blur")]
    {
        if registry.register(blur::INFO.name, blur) {
            registered.push(blur::INFO.name);
        }
    }

    for plugin in available_plugins()
        .into_iter()
        .filter(|plugin| registered.contains(&plugin.name))
    {
        tracing::info!(
            plugin = %plugin.name,
            description = %plugin.description,
            "Registered plugin transform"
        );
    }
    registered
}

#[cfg(all(
    test,
    feature = "plugin-invert",
    feature = "plugin-grayscale",
    feature = "plugin-blur"
))]
mod tests {
    use super::*;
    use image::DynamicImage;
    use imgroute_processing::TransformError;

    #[test]
    fn test_register_all() {
        let mut registry = TransformRegistry::with_builtins();
        let registered = register_plugins(&mut registry);
        assert_eq!(registered, vec!["invert", "grayscale", "blur"]);
        assert_eq!(
            registry.names(),
            vec!["blur", "grayscale", "invert", "origin", "r", "t"]
        );
        assert_eq!(available_plugins().len(), 3);
    }

    #[test]
    fn test_plugins_do_not_replace_existing_entries() {
        let mut registry = TransformRegistry::new();
        registry.register(
            "invert",
            |image: DynamicImage, _options: &[String]| -> Result<DynamicImage, TransformError> {
                Ok(image)
            },
        );

        let registered = register_plugins(&mut registry);
        assert_eq!(registered, vec!["grayscale", "blur"]);
    }
}
