use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "request.duration",
    metric_type: MetricType::Histogram,
    description: "Request duration in seconds. Tagged with status.",
};

pub const FETCH_ATTEMPTS: MetricDef = MetricDef {
    name: "fetch.attempts",
    metric_type: MetricType::Counter,
    description: "Number of GET attempts issued against upstream sources",
};

pub const FETCH_FAILURES: MetricDef = MetricDef {
    name: "fetch.failures",
    metric_type: MetricType::Counter,
    description: "Failed fetch attempts. Tagged with kind (transport, timeout, status, decode).",
};

pub const SOURCES_EXHAUSTED: MetricDef = MetricDef {
    name: "sources.exhausted",
    metric_type: MetricType::Counter,
    description: "Sources that failed every attempt within a request",
};

pub const AGGREGATE_TOTAL_FAILURE: MetricDef = MetricDef {
    name: "aggregate.total_failure",
    metric_type: MetricType::Counter,
    description: "Requests where every source failed and no records survived",
};

pub const ALL_METRICS: &[MetricDef] = &[
    REQUEST_DURATION,
    FETCH_ATTEMPTS,
    FETCH_FAILURES,
    SOURCES_EXHAUSTED,
    AGGREGATE_TOTAL_FAILURE,
];
