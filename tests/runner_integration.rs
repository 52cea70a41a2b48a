//! End-to-end runner behavior: state machine, call ordering, error handling,
//! and learner reuse across sequential runs.

mod common;

use common::{
    call_log, CapturingEvaluator, FailingFilter, RecordingEvaluator, RecordingLearner,
    ScriptedReader, StageCall, TaggingFilter,
};
use streammine_rs::components::{MajorityClassLearner, NullEvaluator, VecReader};
use streammine_rs::pipeline::{
    report_channel, Pipeline, PipelineStages, RunState, Runner, RunnerMessage,
};
use streammine_rs::types::Instance;
use streammine_rs::PipelineError;

#[test]
fn completed_run_calls_predict_train_accept_once_per_instance() {
    let log = call_log();
    let mut pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(ScriptedReader::labeled(5)),
        filters: Vec::new(),
        learner: Box::new(RecordingLearner::new(log.clone())),
        evaluator: Box::new(RecordingEvaluator::new(log.clone())),
    });

    let report = Runner::new().run(&mut pipeline).unwrap();
    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.instances_seen, 5);

    // Per instance: predict, then train, then accept — in that order
    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 15);
    for chunk in calls.chunks(3) {
        assert_eq!(
            chunk,
            &[StageCall::Predict, StageCall::Train, StageCall::Accept]
        );
    }
}

#[test]
fn null_evaluator_reports_no_measures_after_a_full_run() {
    let mut pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(ScriptedReader::labeled(50)),
        filters: Vec::new(),
        learner: Box::new(MajorityClassLearner::new(2)),
        evaluator: Box::new(NullEvaluator::default()),
    });

    let report = Runner::new().run(&mut pipeline).unwrap();
    assert_eq!(report.state, RunState::Completed);
    assert!(report.measures.is_none());
    assert_eq!(report.summary, " ");
}

#[test]
fn reader_error_on_third_call_fails_after_two_instances() {
    let log = call_log();
    let reader = ScriptedReader::new(vec![
        Ok(Instance::labeled(vec![1.0], 0)),
        Ok(Instance::labeled(vec![2.0], 1)),
        Err(streammine_rs::pipeline::ReadError::new("disk on fire")),
        Ok(Instance::labeled(vec![3.0], 0)),
    ]);

    let mut pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(reader),
        filters: Vec::new(),
        learner: Box::new(RecordingLearner::new(log.clone())),
        evaluator: Box::new(RecordingEvaluator::new(log.clone())),
    });

    let report = Runner::new().run(&mut pipeline).unwrap();
    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.instances_seen, 2);
    assert!(matches!(report.error, Some(PipelineError::Read(_))));
    assert_eq!(pipeline.state(), RunState::Failed);

    // Exactly two full predict/train/accept rounds, nothing after the error
    assert_eq!(log.lock().unwrap().len(), 6);
}

#[test]
fn filters_apply_in_declared_order() {
    let evaluator = CapturingEvaluator::new();
    let seen = evaluator.seen();

    let mut pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(ScriptedReader::new(vec![Ok(Instance::labeled(
            vec![0.0],
            0,
        ))])),
        filters: vec![
            Box::new(TaggingFilter::new(1.0)),
            Box::new(TaggingFilter::new(2.0)),
        ],
        learner: Box::new(MajorityClassLearner::new(2)),
        evaluator: Box::new(evaluator),
    });

    Runner::new().run(&mut pipeline).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[vec![0.0, 1.0, 2.0]]);
}

#[test]
fn filter_failure_fails_the_run() {
    let log = call_log();
    let mut pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(ScriptedReader::labeled(3)),
        filters: vec![Box::new(FailingFilter)],
        learner: Box::new(RecordingLearner::new(log.clone())),
        evaluator: Box::new(RecordingEvaluator::new(log.clone())),
    });

    let report = Runner::new().run(&mut pipeline).unwrap();
    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.instances_seen, 0);
    assert!(matches!(report.error, Some(PipelineError::Filter { .. })));
    // The learner and evaluator never saw the poisoned instance
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn learner_state_carries_across_sequential_runs() {
    // Fit run: class 1 dominates
    let fit_data = vec![
        Instance::labeled(vec![0.1], 1),
        Instance::labeled(vec![0.2], 1),
        Instance::labeled(vec![0.3], 1),
        Instance::labeled(vec![0.4], 0),
    ];
    let mut fit_pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(VecReader::new(fit_data)),
        filters: Vec::new(),
        learner: Box::new(MajorityClassLearner::new(2)),
        evaluator: Box::new(NullEvaluator::default()),
    });
    let report = Runner::new().run(&mut fit_pipeline).unwrap();
    assert_eq!(report.state, RunState::Completed);

    // Hand the trained learner to a predict run over unlabeled instances
    let stages = fit_pipeline.dismantle();
    let evaluator = RecordingEvaluator::new(call_log());
    let predictions = evaluator.predictions();

    let predict_data = vec![Instance::new(vec![0.5]), Instance::new(vec![0.6])];
    let mut predict_pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(VecReader::new(predict_data.clone())),
        filters: Vec::new(),
        learner: stages.learner,
        evaluator: Box::new(evaluator),
    });
    Runner::new().run(&mut predict_pipeline).unwrap();

    // Predictions reflect the fit run's majority class
    assert_eq!(predictions.lock().unwrap().as_slice(), &[Some(1), Some(1)]);

    // And are deterministic for identical input
    let stages = predict_pipeline.dismantle();
    let evaluator = RecordingEvaluator::new(call_log());
    let rerun_predictions = evaluator.predictions();
    let mut rerun = Pipeline::from_stages(PipelineStages {
        reader: Box::new(VecReader::new(predict_data)),
        filters: Vec::new(),
        learner: stages.learner,
        evaluator: Box::new(evaluator),
    });
    Runner::new().run(&mut rerun).unwrap();
    assert_eq!(rerun_predictions.lock().unwrap().as_slice(), &[Some(1), Some(1)]);
}

#[test]
fn evaluator_cadence_drives_reports_when_runner_has_none() {
    let (tx, rx) = report_channel();
    let mut pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(ScriptedReader::labeled(10)),
        filters: Vec::new(),
        // NullEvaluator advertises its own -f frequency
        learner: Box::new(MajorityClassLearner::new(2)),
        evaluator: Box::new(NullEvaluator::new(4)),
    });

    Runner::new()
        .with_report_channel(tx)
        .run(&mut pipeline)
        .unwrap();

    let reports: Vec<_> = rx
        .try_iter()
        .filter(|m| matches!(m, RunnerMessage::Report { .. }))
        .collect();
    // Reports at 4 and 8 of 10 instances
    assert_eq!(reports.len(), 2);
}

#[test]
fn runner_cadence_overrides_evaluator_frequency() {
    let (tx, rx) = report_channel();
    let mut pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(ScriptedReader::labeled(10)),
        filters: Vec::new(),
        learner: Box::new(MajorityClassLearner::new(2)),
        evaluator: Box::new(NullEvaluator::new(4)),
    });

    Runner::new()
        .report_every(5)
        .with_report_channel(tx)
        .run(&mut pipeline)
        .unwrap();

    let reports: Vec<_> = rx
        .try_iter()
        .filter(|m| matches!(m, RunnerMessage::Report { .. }))
        .collect();
    // Reports at 5 and 10, not at the evaluator's 4/8 cadence
    assert_eq!(reports.len(), 2);
}

#[test]
fn failed_run_publishes_terminal_message() {
    let (tx, rx) = report_channel();
    let reader = ScriptedReader::new(vec![Err(streammine_rs::pipeline::ReadError::new(
        "gone",
    ))]);
    let mut pipeline = Pipeline::from_stages(PipelineStages {
        reader: Box::new(reader),
        filters: Vec::new(),
        learner: Box::new(MajorityClassLearner::new(2)),
        evaluator: Box::new(NullEvaluator::default()),
    });

    Runner::new()
        .with_report_channel(tx)
        .run(&mut pipeline)
        .unwrap();

    let msgs: Vec<_> = rx.try_iter().collect();
    assert!(matches!(
        msgs.last(),
        Some(RunnerMessage::Failed {
            instances_seen: 0,
            ..
        })
    ));
}
