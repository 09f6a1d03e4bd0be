use crate::configuration::SiteConfiguration;
use crate::interceptor::{CallSite, Level, Parameter};

/// Logging configuration of a call site, resolved once and cached by the interceptor.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingDescriptor {
    pub site: String,
    pub method: String,
    pub logger: String,
    pub level: Level,
    pub message: String,
    pub json: bool,
    pub parameters: Vec<Parameter>,
}

impl LoggingDescriptor {
    /// Resolves the descriptor of the site, with configured overrides taking precedence
    /// over the values attached to the site.
    pub fn resolve(site: &CallSite, overrides: Option<&SiteConfiguration>) -> Self {
        let overrides = overrides.cloned().unwrap_or_default();

        // the logger defaults to the top-level type declaring the method
        let logger = overrides
            .logger
            .or_else(|| site.logger.map(|x| x.name().to_string()))
            .unwrap_or_else(|| site.declaring_type().outermost().name().to_string());

        let message = overrides
            .message
            .filter(|x| !x.is_empty())
            .or_else(|| site.message.clone())
            .unwrap_or_else(|| derive_message(site.method(), &site.parameters));

        Self {
            site: site.id().to_string(),
            method: site.method().to_string(),
            logger,
            level: overrides.level.unwrap_or(site.level),
            message,
            json: overrides.json.unwrap_or(site.json),
            parameters: site.parameters.clone(),
        }
    }

    /// Parameters logged positionally, with their argument index.
    pub fn logged_parameters(&self) -> impl Iterator<Item = (usize, &Parameter)> {
        self.parameters.iter().enumerate().filter(|(_, x)| !x.dont_log)
    }

    /// Parameters bound to a context key, with their argument index.
    pub fn context_parameters(&self) -> impl Iterator<Item = (usize, &str)> {
        self.parameters
            .iter()
            .enumerate()
            .filter_map(|(i, x)| x.context_key.as_deref().map(|key| (i, key)))
    }
}

/// Method name split into lowercase words, followed by one placeholder per logged parameter.
pub fn derive_message(method: &str, parameters: &[Parameter]) -> String {
    let mut message = camel_to_spaces(method);
    for _ in parameters.iter().filter(|x| !x.dont_log) {
        message.push_str(" {}");
    }

    message
}

fn camel_to_spaces(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    for c in name.chars() {
        if c.is_uppercase() {
            out.push(' ');
            out.extend(c.to_lowercase());
        } else if c == '_' {
            out.push(' ');
        } else {
            out.push(c);
        }
    }

    out
}
