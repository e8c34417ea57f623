//! Host configuration.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Order in which a [`ServiceHost`](crate::ServiceHost) disposes its services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum DisposalOrder {
    /// Last registered is disposed first (LIFO).
    #[default]
    Reverse,
    /// Registration order.
    Forward,
}

/// Options controlling how a [`ServiceHost`](crate::ServiceHost) drives its services.
///
/// # Examples
///
/// ```
/// use service_base::{DisposalOrder, HostOptions, ServiceHost};
///
/// let options = HostOptions::default()
///     .with_disposal_order(DisposalOrder::Forward)
///     .with_continue_on_error(false);
///
/// let host = ServiceHost::builder().options(options.clone()).build();
/// assert_eq!(host.options(), &options);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HostOptions {
    /// Order used by both disposal entry points
    pub disposal_order: DisposalOrder,
    /// Keep disposing the remaining services after one fails; the first error is still returned
    pub continue_on_error: bool,
}

impl HostOptions {
    pub fn with_disposal_order(mut self, order: DisposalOrder) -> Self {
        self.disposal_order = order;
        self
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            disposal_order: DisposalOrder::Reverse,
            continue_on_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_dispose_lifo_and_continue() {
        let options = HostOptions::default();
        assert_eq!(options.disposal_order, DisposalOrder::Reverse);
        assert!(options.continue_on_error);
    }

    #[cfg(feature = "config")]
    #[test]
    fn deserializes_partial_config() {
        let options: HostOptions = serde_json::from_str(r#"{"disposal_order":"forward"}"#).unwrap();
        assert_eq!(options.disposal_order, DisposalOrder::Forward);
        assert!(options.continue_on_error);
    }
}
