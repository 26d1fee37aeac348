// ABOUTME: Integration tests verifying commands, signals, and hubs work together.
// ABOUTME: Models a view binding a button to a single-flight save command.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use relay::prelude::*;
use tokio::sync::oneshot;

/// Minimal stand-in for a button that re-queries its command when told to.
struct Button {
    enabled: Arc<AtomicBool>,
    requeries: Arc<AtomicUsize>,
}

impl Button {
    fn bind<C, P>(command: &Arc<C>, parameter: P) -> Self
    where
        C: Command<P> + 'static,
        P: Send + Sync + 'static,
    {
        let enabled = Arc::new(AtomicBool::new(command.can_execute(&parameter)));
        let requeries = Arc::new(AtomicUsize::new(0));

        let e = Arc::clone(&enabled);
        let r = Arc::clone(&requeries);
        let weak = Arc::downgrade(command);
        command.signal().subscribe(move || {
            r.fetch_add(1, Ordering::SeqCst);
            if let Some(command) = weak.upgrade() {
                e.store(command.can_execute(&parameter), Ordering::SeqCst);
            }
        });

        Self { enabled, requeries }
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn requeries(&self) -> usize {
        self.requeries.load(Ordering::SeqCst)
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_button_disabled_while_save_in_flight() {
    let (release, released) = oneshot::channel::<()>();
    let released = Arc::new(parking_lot::Mutex::new(Some(released)));

    let save = Arc::new(SingleFlightCommand::new(move |_: ()| {
        let released = released.lock().take();
        async move {
            if let Some(released) = released {
                released.await?;
            }
            Ok(())
        }
    }));
    let button = Button::bind(&save, ());
    assert!(button.is_enabled());

    let run = save.trigger_execution(()).unwrap();
    assert!(save.is_busy());
    assert!(!save.can_execute(&()));
    assert!(!button.is_enabled());
    assert_eq!(button.requeries(), 1);

    release.send(()).unwrap();
    run.wait().await.unwrap();

    assert!(!save.is_busy());
    assert!(save.can_execute(&()));
    assert!(button.is_enabled());
    assert_eq!(button.requeries(), 2);
}

#[tokio::test]
async fn test_failed_save_reenables_button() {
    let save = Arc::new(
        SingleFlightCommand::<()>::builder()
            .name("save")
            .action(|_| async { Err(anyhow::anyhow!("permission denied")) })
            .fault_policy(FaultPolicy::Ignore)
            .build_single_flight()
            .unwrap(),
    );
    let button = Button::bind(&save, ());

    let run = save.trigger_execution(()).unwrap();
    let message = run.wait().await.unwrap_err();

    assert!(message.contains("permission denied"));
    assert!(button.is_enabled());
    assert_eq!(button.requeries(), 2);
    assert!(!save.is_busy());
}

#[tokio::test(flavor = "current_thread")]
async fn test_guarded_parameter_binding() {
    let (release, released) = oneshot::channel::<()>();
    let released = Arc::new(parking_lot::Mutex::new(Some(released)));

    let delete = Arc::new(SingleFlightCommand::with_guard(
        move |_: i64| {
            let released = released.lock().take();
            async move {
                if let Some(released) = released {
                    released.await?;
                }
                Ok(())
            }
        },
        |id: &i64| *id > 0,
    ));
    let valid = Button::bind(&delete, 5);
    let invalid = Button::bind(&delete, 0);
    assert!(valid.is_enabled());
    assert!(!invalid.is_enabled());

    let run = delete.trigger_execution(5).unwrap();
    assert!(!valid.is_enabled());
    assert!(!invalid.is_enabled());

    release.send(()).unwrap();
    run.wait().await.unwrap();
    assert!(valid.is_enabled());
    assert!(!invalid.is_enabled());
}

#[tokio::test]
async fn test_hub_requeries_every_bound_button() {
    let hub = RequeryHub::new();
    let flag = Arc::new(AtomicBool::new(false));

    let f = Arc::clone(&flag);
    let publish = Arc::new(
        RelayCommand::<()>::builder()
            .sync_action(|_| {})
            .guard(move |_| f.load(Ordering::SeqCst))
            .requery(hub.clone())
            .build_relay()
            .unwrap(),
    );
    let f = Arc::clone(&flag);
    let sync = Arc::new(
        RelayAsyncCommand::<()>::builder()
            .action(|_| async { Ok(()) })
            .guard(move |_| f.load(Ordering::SeqCst))
            .requery(hub.clone())
            .build_async()
            .unwrap(),
    );

    let publish_button = Button::bind(&publish, ());
    let sync_button = Button::bind(&sync, ());
    assert!(!publish_button.is_enabled());
    assert!(!sync_button.is_enabled());

    flag.store(true, Ordering::SeqCst);
    hub.suggest();

    assert!(publish_button.is_enabled());
    assert!(sync_button.is_enabled());
    assert_eq!(hub.observer_count(), 2);
}

#[tokio::test]
async fn test_independent_commands_run_concurrently() {
    let (release_a, released_a) = oneshot::channel::<()>();
    let (release_b, released_b) = oneshot::channel::<()>();
    let gates = Arc::new(parking_lot::Mutex::new(vec![released_a, released_b]));

    let make = |gates: Arc<parking_lot::Mutex<Vec<oneshot::Receiver<()>>>>| {
        SingleFlightCommand::new(move |_: ()| {
            let gate = gates.lock().pop();
            async move {
                if let Some(gate) = gate {
                    gate.await?;
                }
                Ok(())
            }
        })
    };
    let first = make(Arc::clone(&gates));
    let second = make(Arc::clone(&gates));

    let run_a = first.trigger_execution(()).unwrap();
    let run_b = second.trigger_execution(()).unwrap();
    assert!(first.is_busy());
    assert!(second.is_busy());

    release_a.send(()).unwrap();
    release_b.send(()).unwrap();
    run_a.wait().await.unwrap();
    run_b.wait().await.unwrap();

    assert!(!first.is_busy());
    assert!(!second.is_busy());
}

#[tokio::test]
async fn test_dynamic_dispatch_over_async_commands() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c1 = Arc::clone(&calls);
    let c2 = Arc::clone(&calls);

    let commands: Vec<Box<dyn AsyncCommand<usize>>> = vec![
        Box::new(RelayAsyncCommand::new(move |n: usize| {
            let c = Arc::clone(&c1);
            async move {
                c.fetch_add(n, Ordering::SeqCst);
                Ok(())
            }
        })),
        Box::new(SingleFlightCommand::new(move |n: usize| {
            let c = Arc::clone(&c2);
            async move {
                c.fetch_add(n * 10, Ordering::SeqCst);
                Ok(())
            }
        })),
    ];

    for command in &commands {
        assert!(command.can_execute(&1));
        command.execute_async(1).await.unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 11);
}
