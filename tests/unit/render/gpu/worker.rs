use super::*;

fn spawn_or_skip<S: 'static>(
    init: impl FnOnce(&GpuContext) -> RecolorResult<S> + Send + 'static,
) -> Option<GpuWorker<S>> {
    match GpuWorker::spawn("recolor-gpu-test", init) {
        Ok(worker) => Some(worker),
        Err(e) if e.to_string().contains("no gpu adapter available") => None,
        Err(e) => panic!("unexpected gpu worker error: {e}"),
    }
}

#[test]
fn jobs_run_on_the_worker_thread_and_share_state() {
    let Some(mut worker) = spawn_or_skip(|_| Ok(0u32)) else {
        return;
    };
    assert!(!worker.adapter_name().is_empty());

    let caller = std::thread::current().id();
    let ran_on = worker.run(|_, _| Ok(std::thread::current().id())).unwrap();
    assert_ne!(ran_on, caller);

    worker
        .run(|_, n| {
            *n += 2;
            Ok(())
        })
        .unwrap();
    assert_eq!(worker.run(|_, n| Ok(*n)).unwrap(), 2);

    worker.shutdown().unwrap();
    assert!(worker.is_shut_down());
    assert!(worker.run(|_, n| Ok(*n)).is_err());
}

#[test]
fn init_failure_is_reported_by_spawn() {
    let res = GpuWorker::<()>::spawn("recolor-gpu-test", |_| {
        Err(RecolorError::configuration("nope"))
    });
    match res {
        Ok(_) => panic!("spawn should fail"),
        Err(e) if e.to_string().contains("no gpu adapter available") => {}
        Err(e) => assert!(matches!(e, RecolorError::Configuration(_))),
    }
}

#[test]
fn job_errors_are_returned_to_the_caller() {
    let Some(worker) = spawn_or_skip(|_| Ok(())) else {
        return;
    };
    let err = worker
        .run(|_, _| Err::<(), _>(RecolorError::gpu("job failed")))
        .unwrap_err();
    assert!(err.to_string().contains("job failed"));
    // Worker stays usable.
    assert!(worker.run(|_, _| Ok(1)).is_ok());
}
