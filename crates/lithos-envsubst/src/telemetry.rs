// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Optional OpenTelemetry instrumentation.
//!
//! Every `record_*` function is a no-op unless the `telemetry` feature is
//! compiled in and [`enable`] has been called. Crates layered on the engine
//! check [`is_enabled`] so one switch covers all of them.
#![cfg_attr(not(feature = "telemetry"), allow(dead_code))]

#[cfg(feature = "telemetry")]
mod otel {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::OnceLock;
    use std::time::Duration;

    use opentelemetry::global;
    use opentelemetry::metrics::{Counter, Histogram};
    use opentelemetry::trace::{Span, SpanKind};
    use opentelemetry::{trace::Tracer, KeyValue};

    const METER_NAME: &str = "lithos_envsubst";
    const TRACER_NAME: &str = "lithos_envsubst";

    static ENABLED: AtomicBool = AtomicBool::new(false);
    static HANDLES: OnceLock<Handles> = OnceLock::new();

    struct Handles {
        tracer: opentelemetry::global::BoxedTracer,
        parse_hist: Histogram<f64>,
        substitute_hist: Histogram<f64>,
        parse_counter: Counter<u64>,
        substitute_counter: Counter<u64>,
        miss_counter: Counter<u64>,
    }

    impl Handles {
        fn new() -> Self {
            let meter = global::meter(METER_NAME);
            let parse_hist = meter
                .f64_histogram("lithos.envsubst.parse.duration_ms")
                .with_description("Parse duration in milliseconds")
                .init();
            let substitute_hist = meter
                .f64_histogram("lithos.envsubst.substitute.duration_ms")
                .with_description("Substitution duration in milliseconds")
                .init();
            let parse_counter = meter
                .u64_counter("lithos.envsubst.parse.count")
                .with_description("Number of template parses")
                .init();
            let substitute_counter = meter
                .u64_counter("lithos.envsubst.substitute.count")
                .with_description("Number of substitution passes")
                .init();
            let miss_counter = meter
                .u64_counter("lithos.envsubst.lookup.miss")
                .with_description("Lookups that found no value during substitution")
                .init();
            let tracer = global::tracer(TRACER_NAME);
            Self {
                tracer,
                parse_hist,
                substitute_hist,
                parse_counter,
                substitute_counter,
                miss_counter,
            }
        }
    }

    fn handles() -> &'static Handles {
        HANDLES.get_or_init(Handles::new)
    }

    pub fn enable() {
        ENABLED.store(true, Ordering::Relaxed);
    }

    pub fn disable() {
        ENABLED.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled() -> bool {
        ENABLED.load(Ordering::Relaxed)
    }

    pub fn record_parse(template: &str, template_len: usize, duration: Duration, success: bool) {
        if !is_enabled() {
            return;
        }
        let hs = handles();
        let duration_ms = duration.as_secs_f64() * 1_000.0;
        let attrs = [
            KeyValue::new("template.name", template.to_string()),
            KeyValue::new("template.length", template_len as i64),
            KeyValue::new("parse.success", success),
        ];
        hs.parse_counter.add(1, &attrs);
        hs.parse_hist.record(duration_ms, &attrs);
        let mut span = hs
            .tracer
            .span_builder("Template::parse")
            .with_kind(SpanKind::Internal)
            .start(&hs.tracer);
        span.set_attribute(KeyValue::new("template.name", template.to_string()));
        span.set_attribute(KeyValue::new("template.length", template_len as i64));
        span.set_attribute(KeyValue::new("parse.duration_ms", duration_ms));
        span.set_attribute(KeyValue::new("parse.success", success));
        span.end();
    }

    pub fn record_substitute(template: &str, template_len: usize, duration: Duration, misses: usize) {
        if !is_enabled() {
            return;
        }
        let hs = handles();
        let duration_ms = duration.as_secs_f64() * 1_000.0;
        let attrs = [
            KeyValue::new("template.name", template.to_string()),
            KeyValue::new("template.length", template_len as i64),
        ];
        hs.substitute_counter.add(1, &attrs);
        hs.substitute_hist.record(duration_ms, &attrs);
        if misses > 0 {
            hs.miss_counter.add(misses as u64, &attrs);
        }
        let mut span = hs
            .tracer
            .span_builder("Template::substitute")
            .with_kind(SpanKind::Internal)
            .start(&hs.tracer);
        span.set_attribute(KeyValue::new("template.name", template.to_string()));
        span.set_attribute(KeyValue::new("substitute.duration_ms", duration_ms));
        span.set_attribute(KeyValue::new("substitute.misses", misses as i64));
        span.end();
    }

}

#[cfg(not(feature = "telemetry"))]
mod otel {
    use std::time::Duration;

    pub fn enable() {}
    pub fn disable() {}
    pub fn is_enabled() -> bool {
        false
    }
    pub fn record_parse(_template: &str, _template_len: usize, _duration: Duration, _success: bool) {
    }
    pub fn record_substitute(
        _template: &str,
        _template_len: usize,
        _duration: Duration,
        _misses: usize,
    ) {
    }
}

pub use otel::{disable, enable, is_enabled, record_parse, record_substitute};
