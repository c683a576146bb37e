//! # Client-module wrapping and loading.
//!
//! A client module is an externally stored code unit injected with an
//! optional configuration payload. The module source is wrapped in an
//! immediately-invoked function that receives the serialized config as its
//! single parameter:
//!
//! ```text
//! ;(function (MODULE_CONFIG) {
//! <module source>
//! })(<config as JSON, or the literal undefined>);
//! ```
//!
//! Loading goes through the [`ModuleLoader`] seam so hosts can supply
//! sources from anywhere (archives, embedded assets, a test fixture map);
//! the default [`FsLoader`] reads from the filesystem with
//! `tokio::fs::read_to_string`.

use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Name of the config parameter visible inside a wrapped client module.
pub const MODULE_CONFIG_PARAM: &str = "MODULE_CONFIG";

/// Wraps client-module source with its serialized config payload.
///
/// `config_json` is the payload already serialized to JSON; `None` yields
/// the literal `undefined` sentinel, so a module without config observes an
/// undefined parameter rather than `null`.
///
/// # Example
/// ```
/// use domvisor::wrap_module;
///
/// let wrapped = wrap_module("console.log(MODULE_CONFIG);", Some(r#"{"a":1}"#));
/// assert!(wrapped.contains(r#"})({"a":1});"#));
///
/// let bare = wrap_module("run();", None);
/// assert!(bare.contains("})(undefined);"));
/// ```
pub fn wrap_module(source: &str, config_json: Option<&str>) -> String {
    let config = config_json.unwrap_or("undefined");
    format!(";(function ({MODULE_CONFIG_PARAM}) {{\n{source}\n}})({config});\n")
}

/// # Seam for reading client-module source text.
///
/// The read is the only inherently asynchronous step of the injection
/// pipeline; its completion re-enters the scheduler's execution context.
#[async_trait]
pub trait ModuleLoader: Send + Sync + 'static {
    /// Reads the module source at `path`.
    async fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// Default loader: reads module source from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

#[async_trait]
impl ModuleLoader for FsLoader {
    async fn read_text(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_with_config_embeds_json() {
        let wrapped = wrap_module("doWork();", Some(r#"{"retries":3}"#));
        assert!(wrapped.starts_with(";(function (MODULE_CONFIG) {"));
        assert!(wrapped.contains("doWork();"));
        assert!(wrapped.ends_with("})({\"retries\":3});\n"));
    }

    #[test]
    fn test_wrap_without_config_uses_undefined_sentinel() {
        let wrapped = wrap_module("doWork();", None);
        assert!(wrapped.ends_with("})(undefined);\n"));
    }

    #[test]
    fn test_source_is_embedded_verbatim() {
        let source = "const a = '})(';\nrun(a);";
        let wrapped = wrap_module(source, None);
        assert!(wrapped.contains(source));
    }
}
