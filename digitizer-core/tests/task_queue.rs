use digitizer_core::{FailurePolicy, Scheduler, TaskError, TaskQueue};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_producers_run_exactly_once_in_order() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 250;

    let mut queue: TaskQueue<Vec<(usize, usize)>> = TaskQueue::new();
    let barrier = Arc::new(Barrier::new(PRODUCERS));
    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let scheduler = queue.scheduler();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for seq in 0..PER_PRODUCER {
                    assert!(scheduler.schedule(move |log| log.push((producer, seq))));
                }
            })
        })
        .collect();

    let mut log = Vec::new();
    while handles.iter().any(|h| !h.is_finished()) {
        queue.drain(&mut log);
        thread::yield_now();
    }
    for handle in handles {
        handle.join().expect("producer thread");
    }
    queue.drain(&mut log);

    assert_eq!(log.len(), PRODUCERS * PER_PRODUCER);
    for producer in 0..PRODUCERS {
        let seqs: Vec<usize> = log
            .iter()
            .filter(|(p, _)| *p == producer)
            .map(|(_, seq)| *seq)
            .collect();
        assert_eq!(seqs, (0..PER_PRODUCER).collect::<Vec<_>>());
    }
    assert_eq!(queue.pending_len(), 0);
}

struct Recorder {
    log: Vec<u32>,
    scheduler: Scheduler<Recorder>,
}

#[test]
fn callback_scheduled_during_drain_runs_in_next_drain() {
    let mut queue: TaskQueue<Recorder> = TaskQueue::new();
    let mut ctx = Recorder {
        log: Vec::new(),
        scheduler: queue.scheduler(),
    };

    queue.schedule(|ctx: &mut Recorder| {
        ctx.log.push(1);
        ctx.scheduler.schedule(|ctx| ctx.log.push(2));
    });

    let report = queue.drain(&mut ctx);
    assert_eq!(report.executed, 1);
    assert_eq!(ctx.log, vec![1]);
    assert_eq!(queue.pending_len(), 1);

    queue.drain(&mut ctx);
    assert_eq!(ctx.log, vec![1, 2]);
}

#[test]
fn drain_runs_in_insertion_order() {
    let mut queue: TaskQueue<Vec<u32>> = TaskQueue::new();
    for i in 0..5 {
        assert!(queue.schedule(move |log| log.push(i)));
    }
    let mut log = Vec::new();
    queue.drain(&mut log);
    assert_eq!(log, vec![0, 1, 2, 3, 4]);
}

#[test]
fn collect_policy_reports_failures_and_keeps_going() {
    let mut queue: TaskQueue<Vec<u32>> = TaskQueue::with_policy(FailurePolicy::Collect);
    let scheduler = queue.scheduler();
    scheduler.schedule(|log| log.push(1));
    scheduler.schedule_fallible(|_| Err(TaskError::Failed("bad input".to_string())));
    scheduler.schedule(|_| panic!("boom"));
    scheduler.schedule(|log| log.push(4));

    let mut log = Vec::new();
    let report = queue.drain(&mut log);

    assert_eq!(log, vec![1, 4]);
    assert_eq!(report.executed, 4);
    assert_eq!(
        report.failures,
        vec![
            TaskError::Failed("bad input".to_string()),
            TaskError::Panicked("boom".to_string()),
        ]
    );
}

#[test]
fn log_policy_swallows_failures() {
    let mut queue: TaskQueue<Vec<u32>> = TaskQueue::new();
    assert_eq!(queue.policy(), FailurePolicy::Log);
    queue.schedule(|_| panic!("ignored"));
    queue.schedule(|log| log.push(7));

    let mut log = Vec::new();
    let report = queue.drain(&mut log);
    assert_eq!(log, vec![7]);
    assert_eq!(report.executed, 2);
    assert!(report.failures.is_empty());
}

#[test]
fn scheduling_after_queue_dropped_is_rejected() {
    let queue: TaskQueue<Vec<u32>> = TaskQueue::new();
    let scheduler = queue.scheduler();
    assert!(scheduler.is_connected());
    drop(queue);
    assert!(!scheduler.is_connected());
    assert!(!scheduler.schedule(|log| log.push(1)));

    let detached: Scheduler<Vec<u32>> = Scheduler::detached();
    assert!(!detached.is_connected());
}
