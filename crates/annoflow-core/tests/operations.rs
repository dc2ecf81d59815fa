use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use polars::prelude::*;
use serde_json::{json, Value};
use uuid::Uuid;

use annoflow_core::{apply, CompositeOperation, Operation, PipelineError, Result, Timeseries};

type CallLog = Rc<RefCell<Vec<&'static str>>>;

fn sample_timeseries() -> Timeseries {
    let series = Series::new("values".into(), &[1.0f64, 2.0, 3.0, 4.0]);
    Timeseries::new(Uuid::new_v4(), series)
}

/// Writes the raw values doubled into a "doubled" annotation.
struct Doubler {
    log: CallLog,
}

impl Operation for Doubler {
    fn name(&self) -> &str {
        "doubler"
    }

    fn process(&self, timeseries: &mut Timeseries) -> Result<()> {
        self.log.borrow_mut().push("doubler");
        let doubled: Vec<Option<f64>> = timeseries
            .series()
            .f64()?
            .into_iter()
            .map(|value| value.map(|v| v * 2.0))
            .collect();
        timeseries.add_annotation(Series::new("doubled".into(), doubled))
    }
}

/// Reads the "doubled" annotation written by an earlier step and sums it
/// into an attribute.
struct DoubledSum {
    log: CallLog,
}

impl Operation for DoubledSum {
    fn name(&self) -> &str {
        "doubled_sum"
    }

    fn process(&self, timeseries: &mut Timeseries) -> Result<()> {
        self.log.borrow_mut().push("doubled_sum");
        let sum: f64 = {
            let column = timeseries.annotations().column("doubled").map_err(|_| {
                PipelineError::Validation("doubled annotation missing".to_string())
            })?;
            column.f64()?.into_iter().flatten().sum()
        };
        timeseries.add_attributes(HashMap::from([("doubled_sum".to_string(), Value::from(sum))]));
        Ok(())
    }
}

/// Records that it ran via an attribute, nothing else.
struct Tagger {
    name: &'static str,
    log: CallLog,
}

impl Operation for Tagger {
    fn name(&self) -> &str {
        self.name
    }

    fn process(&self, timeseries: &mut Timeseries) -> Result<()> {
        self.log.borrow_mut().push(self.name);
        timeseries.add_attributes(HashMap::from([(format!("{}_ran", self.name), json!(true))]));
        Ok(())
    }
}

struct Failing {
    log: CallLog,
}

impl Operation for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn process(&self, _timeseries: &mut Timeseries) -> Result<()> {
        self.log.borrow_mut().push("failing");
        Err(PipelineError::Processing(
            "failing step refused the series".to_string(),
        ))
    }
}

fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn children_run_in_insertion_order_and_observe_prior_writes() {
    let log = new_log();
    let pipeline = CompositeOperation::with_operations(
        "double_then_sum",
        vec![
            Box::new(Doubler { log: log.clone() }),
            Box::new(DoubledSum { log: log.clone() }),
        ],
    );

    let mut ts = sample_timeseries();
    pipeline.process(&mut ts).expect("pipeline succeeded");

    assert_eq!(*log.borrow(), vec!["doubler", "doubled_sum"]);
    // 2 + 4 + 6 + 8
    assert_eq!(ts.attribute("doubled_sum"), Some(&json!(20.0)));
}

#[test]
fn reader_without_its_producer_fails() {
    let log = new_log();
    let pipeline = CompositeOperation::with_operations(
        "sum_only",
        vec![Box::new(DoubledSum { log })],
    );

    let mut ts = sample_timeseries();
    let err = pipeline.process(&mut ts).unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
}

#[test]
fn remove_operation_drops_every_matching_name() {
    let log = new_log();
    let mut pipeline = CompositeOperation::new("edited");
    pipeline.add_operation(Box::new(Tagger {
        name: "dup",
        log: log.clone(),
    }));
    pipeline.add_operation(Box::new(Tagger {
        name: "keep",
        log: log.clone(),
    }));
    pipeline.add_operation(Box::new(Tagger {
        name: "dup",
        log: log.clone(),
    }));

    pipeline.remove_operation("dup");
    assert_eq!(pipeline.operations().len(), 1);

    let mut ts = sample_timeseries();
    pipeline.process(&mut ts).unwrap();

    assert_eq!(*log.borrow(), vec!["keep"]);
    assert_eq!(ts.attribute("keep_ran"), Some(&json!(true)));
    assert!(ts.attribute("dup_ran").is_none());
}

#[test]
fn removing_an_unknown_name_is_a_no_op() {
    let log = new_log();
    let mut pipeline =
        CompositeOperation::with_operations("stable", vec![Box::new(Tagger { name: "only", log })]);

    pipeline.remove_operation("missing");
    assert_eq!(pipeline.operations().len(), 1);
}

#[test]
fn failing_child_propagates_and_keeps_prior_effects() {
    let log = new_log();
    let pipeline = CompositeOperation::with_operations(
        "partial",
        vec![
            Box::new(Doubler { log: log.clone() }),
            Box::new(Failing { log: log.clone() }),
            Box::new(Tagger {
                name: "after",
                log: log.clone(),
            }),
        ],
    );

    let mut ts = sample_timeseries();
    let err = pipeline.process(&mut ts).unwrap_err();

    match err {
        PipelineError::Processing(message) => {
            assert_eq!(message, "failing step refused the series")
        }
        other => panic!("unexpected error: {other}"),
    }

    // The first child's annotation survives, the third child never ran.
    assert!(ts.annotations().column("doubled").is_ok());
    assert!(ts.attribute("after_ran").is_none());
    assert_eq!(*log.borrow(), vec!["doubler", "failing"]);
}

#[test]
fn nested_composite_matches_flattened_children() {
    let nested_log = new_log();
    let inner = CompositeOperation::with_operations(
        "inner",
        vec![
            Box::new(Tagger {
                name: "b",
                log: nested_log.clone(),
            }),
            Box::new(Tagger {
                name: "c",
                log: nested_log.clone(),
            }),
        ],
    );
    let outer = CompositeOperation::with_operations(
        "outer",
        vec![
            Box::new(Tagger {
                name: "a",
                log: nested_log.clone(),
            }),
            Box::new(inner),
        ],
    );

    let flat_log = new_log();
    let flat = CompositeOperation::with_operations(
        "flat",
        vec![
            Box::new(Tagger {
                name: "a",
                log: flat_log.clone(),
            }),
            Box::new(Tagger {
                name: "b",
                log: flat_log.clone(),
            }),
            Box::new(Tagger {
                name: "c",
                log: flat_log.clone(),
            }),
        ],
    );

    let mut nested_ts = sample_timeseries();
    outer.process(&mut nested_ts).unwrap();
    let mut flat_ts = sample_timeseries();
    flat.process(&mut flat_ts).unwrap();

    assert_eq!(*nested_log.borrow(), *flat_log.borrow());
    assert_eq!(nested_ts.attributes(), flat_ts.attributes());
}

#[test]
fn empty_composite_is_a_no_op() {
    let pipeline = CompositeOperation::new("empty");
    let mut ts = sample_timeseries();
    pipeline.process(&mut ts).unwrap();

    assert_eq!(ts.annotations().width(), 0);
    assert!(ts.attributes().is_empty());
}

#[test]
fn apply_returns_the_mutated_container() {
    let log = new_log();
    let pipeline =
        CompositeOperation::with_operations("owned", vec![Box::new(Doubler { log })]);

    let ts = apply(&pipeline, sample_timeseries()).expect("apply succeeded");
    assert!(ts.annotations().column("doubled").is_ok());
}
