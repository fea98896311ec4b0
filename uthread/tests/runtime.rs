use std::{cell::RefCell, rc::Rc};
use uthread::ThreadBuilder;

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn record(log: &Log, event: impl Into<String>) {
    log.borrow_mut().push(event.into());
}

/// Spawn a thread that records `name{i}` and yields, `rounds` times.
fn worker(log: &Log, name: &'static str, rounds: usize) {
    let log = log.clone();
    ThreadBuilder::new(name)
        .spawn(
            move |rounds: usize| {
                for i in 0..rounds {
                    record(&log, format!("{}{}", name, i));
                    uthread::yield_now();
                }
                record(&log, format!("{}!", name));
            },
            rounds,
        )
        .unwrap();
}

mod scheduling {
    use super::*;

    #[test]
    fn yield_then_exit() {
        let log = log();
        worker(&log, "a", 1);
        worker(&log, "b", 2);
        uthread::run();
        record(&log, "run");
        assert_eq!(*log.borrow(), ["a0", "b0", "a!", "b1", "b!", "run"]);
    }

    #[test]
    fn insertion_order() {
        let log = log();
        for name in ["a", "b", "c"] {
            worker(&log, name, 2);
        }
        uthread::run();
        assert_eq!(
            *log.borrow(),
            ["a0", "b0", "c0", "a1", "b1", "c1", "a!", "b!", "c!"]
        );
    }

    #[test]
    fn exit_mid_cycle() {
        let log = log();
        worker(&log, "a", 2);
        worker(&log, "b", 0);
        worker(&log, "c", 2);
        uthread::run();
        assert_eq!(*log.borrow(), ["a0", "b!", "c0", "a1", "c1", "a!", "c!"]);
    }

    #[test]
    fn enqueue_while_running() {
        let log = log();
        {
            let log = log.clone();
            ThreadBuilder::new("a")
                .spawn(
                    move |_| {
                        record(&log, "a0");
                        let inner = log.clone();
                        let handle = uthread::create(move |_| record(&inner, "d"), ()).unwrap();
                        uthread::enqueue(handle);
                        uthread::yield_now();
                        record(&log, "a1");
                    },
                    (),
                )
                .unwrap();
        }
        worker(&log, "b", 0);
        worker(&log, "c", 0);
        uthread::run();
        assert_eq!(*log.borrow(), ["a0", "b!", "c!", "d", "a1"]);
    }

    #[test]
    fn single_thread_yields_to_itself() {
        let log = log();
        worker(&log, "a", 3);
        uthread::run();
        assert_eq!(*log.borrow(), ["a0", "a1", "a2", "a!"]);
    }
}

mod lifecycle {
    use super::*;
    use std::panic;

    #[test]
    fn run_without_threads() {
        uthread::run();
        assert_eq!(uthread::queued(), 0);
    }

    #[test]
    fn run_twice() {
        let log = log();
        worker(&log, "a", 1);
        uthread::run();
        worker(&log, "b", 1);
        uthread::run();
        assert_eq!(*log.borrow(), ["a0", "a!", "b0", "b!"]);
        assert_eq!(uthread::queued(), 0);
    }

    #[test]
    fn created_but_not_enqueued() {
        let handle = uthread::create(|_| unreachable!(), ()).unwrap();
        assert_eq!(handle.name(), "thread");
        uthread::run();
        drop(handle);
    }

    #[test]
    fn explicit_exit() {
        let log = log();
        let inner = log.clone();
        ThreadBuilder::new("quitter")
            .spawn(
                move |quit: bool| {
                    record(&inner, "before");
                    if quit {
                        uthread::exit();
                    }
                    record(&inner, "after");
                },
                true,
            )
            .unwrap();
        worker(&log, "b", 1);
        uthread::run();
        assert_eq!(*log.borrow(), ["before", "b0", "b!"]);
    }

    #[test]
    fn queued_counts_running_thread() {
        let seen = log();
        for name in ["a", "b"] {
            let seen = seen.clone();
            ThreadBuilder::new(name)
                .spawn(move |_| record(&seen, uthread::queued().to_string()), ())
                .unwrap();
        }
        assert_eq!(uthread::queued(), 2);
        uthread::run();
        assert_eq!(*seen.borrow(), ["2", "1"]);
    }

    #[test]
    fn current_thread_id() {
        assert!(uthread::current().is_none());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ids = Vec::new();
        for name in ["a", "b"] {
            let seen = seen.clone();
            let id = ThreadBuilder::new(name)
                .spawn(
                    move |_| {
                        seen.borrow_mut().push(uthread::current());
                        uthread::yield_now();
                        seen.borrow_mut().push(uthread::current());
                    },
                    (),
                )
                .unwrap();
            ids.push(Some(id));
        }
        assert_ne!(ids[0], ids[1]);
        uthread::run();
        assert_eq!(*seen.borrow(), [ids[0], ids[1], ids[0], ids[1]]);
        assert!(uthread::current().is_none());
    }

    #[test]
    fn yield_outside_run() {
        uthread::yield_now();
        assert!(uthread::current().is_none());
    }

    #[test]
    #[should_panic(expected = "exit() outside of a running thread")]
    fn exit_outside_run() {
        uthread::exit();
    }

    #[test]
    fn panic_is_raised_from_run() {
        let log = log();
        worker(&log, "a", 2);
        ThreadBuilder::new("bomb")
            .spawn(
                |_| {
                    uthread::yield_now();
                    panic!("boom");
                },
                (),
            )
            .unwrap();
        worker(&log, "c", 2);

        let result = panic::catch_unwind(|| uthread::run());
        let payload = result.expect_err("the panic was swallowed");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
        // The other threads still ran to completion.
        assert_eq!(*log.borrow(), ["a0", "c0", "a1", "c1", "a!", "c!"]);
        assert_eq!(uthread::queued(), 0);
    }

    #[test]
    fn nested_run() {
        ThreadBuilder::new("nested")
            .spawn(|_| uthread::run(), ())
            .unwrap();
        let payload = panic::catch_unwind(|| uthread::run()).expect_err("nested run() returned");
        assert_eq!(
            payload.downcast_ref::<&str>(),
            Some(&"run() called from a running thread")
        );
    }
}

mod stack {
    use super::*;
    use uthread::{Error, MIN_STACK_SIZE};

    fn depth(n: u64) -> u64 {
        let pad = [n; 16];
        if n == 0 {
            0
        } else {
            std::hint::black_box(pad)[0].min(1) + depth(n - 1)
        }
    }

    #[test]
    fn custom_stack_size() {
        let log = log();
        let inner = log.clone();
        ThreadBuilder::new("small")
            .stack_size(0x8000)
            .spawn(
                move |n| {
                    record(&inner, depth(n).to_string());
                    uthread::yield_now();
                    record(&inner, depth(n).to_string());
                },
                16,
            )
            .unwrap();
        uthread::run();
        assert_eq!(*log.borrow(), ["16", "16"]);
    }

    #[test]
    fn default_stack_takes_deep_recursion() {
        let log = log();
        let inner = log.clone();
        uthread::enqueue(uthread::create(move |n| record(&inner, depth(n).to_string()), 256).unwrap());
        uthread::run();
        assert_eq!(*log.borrow(), ["256"]);
    }

    #[test]
    fn invalid_stack_size() {
        let err = ThreadBuilder::new("tiny")
            .stack_size(16)
            .create(|_| (), ())
            .err();
        assert_eq!(err, Some(Error::InvalidStackSize(16)));
        assert!(ThreadBuilder::new("min")
            .stack_size(MIN_STACK_SIZE)
            .create(|_| (), ())
            .is_ok());
    }
}
