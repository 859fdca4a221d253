// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Assembly instrumentation, gated by the engine's telemetry switch.
#![cfg_attr(not(feature = "telemetry"), allow(dead_code))]

pub use lithos_envsubst::telemetry::{disable, enable, is_enabled};

#[cfg(feature = "telemetry")]
mod otel {
    use std::sync::OnceLock;

    use opentelemetry::global;
    use opentelemetry::metrics::Counter;
    use opentelemetry::trace::{Span, SpanKind};
    use opentelemetry::{trace::Tracer, KeyValue};

    const METER_NAME: &str = "lithos_manifest";
    const TRACER_NAME: &str = "lithos_manifest";

    static HANDLES: OnceLock<Handles> = OnceLock::new();

    struct Handles {
        tracer: opentelemetry::global::BoxedTracer,
        assembly_counter: Counter<u64>,
        missing_counter: Counter<u64>,
    }

    impl Handles {
        fn new() -> Self {
            let meter = global::meter(METER_NAME);
            let assembly_counter = meter
                .u64_counter("lithos.manifest.assembly.count")
                .with_description("Number of manifest template assemblies")
                .init();
            let missing_counter = meter
                .u64_counter("lithos.manifest.assembly.missing")
                .with_description("Variables reported unset by failed assemblies")
                .init();
            Self {
                tracer: global::tracer(TRACER_NAME),
                assembly_counter,
                missing_counter,
            }
        }
    }

    pub fn record_assembly(variables: usize, missing: usize, records: usize, success: bool) {
        if !super::is_enabled() {
            return;
        }
        let hs = HANDLES.get_or_init(Handles::new);
        let attrs = [KeyValue::new("assembly.success", success)];
        hs.assembly_counter.add(1, &attrs);
        if missing > 0 {
            hs.missing_counter.add(missing as u64, &[]);
        }
        let mut span = hs
            .tracer
            .span_builder("RenderedTemplate::new")
            .with_kind(SpanKind::Internal)
            .start(&hs.tracer);
        span.set_attribute(KeyValue::new("assembly.variables", variables as i64));
        span.set_attribute(KeyValue::new("assembly.missing", missing as i64));
        span.set_attribute(KeyValue::new("assembly.records", records as i64));
        span.set_attribute(KeyValue::new("assembly.success", success));
        span.end();
    }
}

#[cfg(not(feature = "telemetry"))]
mod otel {
    pub fn record_assembly(_variables: usize, _missing: usize, _records: usize, _success: bool) {}
}

pub(crate) use otel::record_assembly;
