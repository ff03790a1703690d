use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Artificial per-request latency, used to exercise the duration histogram.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LatencyConfig {
    pub enabled: bool,
    /// Exclusive upper bound of the random sleep, in whole seconds.
    pub max_seconds: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        LatencyConfig {
            enabled: true,
            max_seconds: 3,
        }
    }
}

impl LatencyConfig {
    /// A config that never sleeps.
    pub fn disabled() -> Self {
        LatencyConfig {
            enabled: false,
            max_seconds: 0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct MetricsConfig {
    #[serde(default)]
    pub path_label: PathLabel,
}

/// Which value ends up in the `path` label of the request metrics.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PathLabel {
    /// The raw request URI, query string included. Cardinality is unbounded.
    #[default]
    Uri,
    /// The registered route path.
    Route,
}
